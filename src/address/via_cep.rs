use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{AddressInfo, AddressLookup, AddressLookupError};

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    cep: Option<String>,
    logradouro: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    uf: Option<String>,
    // "erro": true (or "true") for unknown CEPs
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// ViaCEP client: `GET {base_url}/{cep}/json/`.
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, zip_code: &str) -> Result<AddressInfo, AddressLookupError> {
        let url = format!("{}/{}/json/", self.base_url, zip_code);
        debug!(url = %url, "Querying ViaCEP");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AddressLookupError::Unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            return Err(AddressLookupError::InvalidZipCode(zip_code.to_string()));
        }

        let body: ViaCepResponse = response
            .error_for_status()
            .map_err(|e| AddressLookupError::Unavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| AddressLookupError::Unavailable(e.to_string()))?;

        if body.is_error() {
            return Err(AddressLookupError::NotFound(zip_code.to_string()));
        }

        match (non_empty(body.localidade), non_empty(body.uf)) {
            (Some(city), Some(state)) => Ok(AddressInfo {
                zip_code: non_empty(body.cep).unwrap_or_else(|| zip_code.to_string()),
                street: non_empty(body.logradouro),
                neighborhood: non_empty(body.bairro),
                city,
                state,
            }),
            _ => Err(AddressLookupError::NotFound(zip_code.to_string())),
        }
    }
}
