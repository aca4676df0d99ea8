use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

/// Parse a date typed by a driver or sent by a client.
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY` and RFC 3339 timestamps (the date part
/// is kept). Blank input is treated as absent.
pub fn parse_date_like(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .or_else(|_| Date::parse(raw, format_description!("[day]/[month]/[year]")))
        .ok()
        .or_else(|| OffsetDateTime::parse(raw, &Rfc3339).ok().map(|ts| ts.date()))
}

/// Storage representation of a calendar date: midnight UTC.
pub fn to_timestamp(date: Option<Date>) -> Option<OffsetDateTime> {
    date.map(|date| date.midnight().assume_utc())
}

pub fn from_timestamp(timestamp: Option<OffsetDateTime>) -> Option<Date> {
    timestamp.map(|ts| ts.to_offset(UtcOffset::UTC).date())
}

/// Serde adapter for `Option<Date>` fields of the draft.
pub mod optional_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::macros::format_description;
    use time::Date;

    pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => {
                let formatted = date
                    .format(format_description!("[year]-[month]-[day]"))
                    .map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_date_like(value)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn parses_iso_brazilian_and_rfc3339_dates() {
        assert_eq!(parse_date_like("2031-02-28"), Some(date!(2031 - 02 - 28)));
        assert_eq!(parse_date_like("28/02/2031"), Some(date!(2031 - 02 - 28)));
        assert_eq!(
            parse_date_like("2031-02-28T15:30:00Z"),
            Some(date!(2031 - 02 - 28))
        );
        assert_eq!(parse_date_like("   "), None);
        assert_eq!(parse_date_like("31/02/2031"), None);
    }

    #[test]
    fn timestamps_are_midnight_utc() {
        let ts = to_timestamp(Some(date!(2030 - 07 - 01)));
        assert_eq!(ts, Some(datetime!(2030-07-01 0:00 UTC)));
        assert_eq!(from_timestamp(ts), Some(date!(2030 - 07 - 01)));
        assert_eq!(to_timestamp(None), None);
    }
}
