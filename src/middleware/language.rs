use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};

use crate::i18n::SupportedLanguage;

/// Stores the caller's language in the request extensions for [`crate::i18n::I18n`].
pub async fn language_middleware(mut request: Request, next: Next) -> Response {
    let language = detect_language_from_headers(request.headers());
    request.extensions_mut().insert(language);
    next.run(request).await
}

/// `X-Language` first, then `Accept-Language`, then Portuguese.
pub fn detect_language_from_headers(headers: &HeaderMap) -> SupportedLanguage {
    if let Some(language) = headers
        .get("X-Language")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<SupportedLanguage>().ok())
    {
        return language;
    }

    headers
        .get("Accept-Language")
        .and_then(|v| v.to_str().ok())
        .map(SupportedLanguage::from_accept_language)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn explicit_header_beats_accept_language() {
        let mut headers = HeaderMap::new();
        headers.insert("Accept-Language", HeaderValue::from_static("pt-BR"));
        headers.insert("X-Language", HeaderValue::from_static("en"));
        assert_eq!(detect_language_from_headers(&headers), SupportedLanguage::English);
    }

    #[test]
    fn unsupported_explicit_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Language", HeaderValue::from_static("tr"));
        headers.insert("Accept-Language", HeaderValue::from_static("en-US,en;q=0.9"));
        assert_eq!(detect_language_from_headers(&headers), SupportedLanguage::English);
        assert_eq!(
            detect_language_from_headers(&HeaderMap::new()),
            SupportedLanguage::Portuguese
        );
    }
}
