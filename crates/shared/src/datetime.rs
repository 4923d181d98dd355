//! Serde support for the backend's datetime fields.
//!
//! The backend stores MySQL `DATETIME`s and serializes them with Python's
//! `datetime.isoformat()`, so values arrive without a timezone offset. Two
//! sentinel values stand in for "no date": `0000-00-00…` (which is not even
//! a valid calendar date, so it must be caught before parsing) and
//! `9999-12-31…` (the column's max). Both deserialize as `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const UNSET_PREFIX: &str = "0000-00-00";
const FOREVER_PREFIX: &str = "9999-12-31";

pub fn is_sentinel(raw: &str) -> bool {
    raw.starts_with(UNSET_PREFIX) || raw.starts_with(FOREVER_PREFIX)
}

/// Parses RFC 3339, naive ISO (`2024-05-01T09:30:00`), the backend's SQL
/// form (`2024-05-01 09:30:00`), or a bare date. Naive values are taken as
/// UTC.
pub fn parse_flexible(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

/// `#[serde(with = …)]` module for `Option<DateTime<Utc>>` fields that may
/// carry sentinel values. Serializes as RFC 3339, `None` as `null`.
pub mod sentinel_date_serde {
    use chrono::{DateTime, Utc};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(datetime) => serializer.serialize_str(&datetime.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.is_empty() || super::is_sentinel(&raw) => Ok(None),
            Some(raw) => super::parse_flexible(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unrecognized datetime: {raw}"))),
        }
    }
}
