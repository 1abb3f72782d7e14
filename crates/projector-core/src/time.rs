use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// An RFC 3339 timestamp with second precision, as used by object metadata
/// and status fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub OffsetDateTime);

impl Timestamp {
    /// Wraps a datetime, dropping sub-second precision.
    pub fn new(datetime: OffsetDateTime) -> Self {
        Self(datetime.replace_nanosecond(0).unwrap_or(datetime))
    }

    pub fn inner(&self) -> &OffsetDateTime {
        &self.0
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(&Rfc3339).map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for Timestamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let datetime = OffsetDateTime::parse(s, &Rfc3339)
            .map_err(|e| CoreError::invalid_timestamp(format!("'{s}': {e}")))?;
        Ok(Timestamp(datetime))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.0.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timestamp::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub fn now_utc() -> Timestamp {
    Timestamp::new(OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_timestamp_display() {
        let ts = Timestamp::new(datetime!(2025-05-15 14:30:00 UTC));
        assert_eq!(ts.to_string(), "2025-05-15T14:30:00Z");
    }

    #[test]
    fn test_timestamp_drops_subsecond_precision() {
        let ts = Timestamp::new(datetime!(2025-05-15 14:30:00.123456 UTC));
        assert_eq!(ts.to_string(), "2025-05-15T14:30:00Z");
    }

    #[test]
    fn test_timestamp_from_str() {
        let ts: Timestamp = "2025-05-15T14:30:00Z".parse().unwrap();
        assert_eq!(ts.inner(), &datetime!(2025-05-15 14:30:00 UTC));

        let err = "yesterday".parse::<Timestamp>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimestamp(_)));
    }

    #[test]
    fn test_timestamp_serde() {
        let ts = Timestamp::new(datetime!(2025-01-02 03:04:05 UTC));
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2025-01-02T03:04:05Z\"");

        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_now_utc_is_whole_seconds() {
        let now = now_utc();
        assert_eq!(now.inner().nanosecond(), 0);
    }
}
