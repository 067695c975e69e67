use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A point in time, held in UTC.
///
/// Accepts RFC 3339 text, and also the zone-less `YYYY-MM-DDTHH:MM:SS[.fff]`
/// form written by many acquisition systems, which is taken as UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap an existing UTC instant.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Seconds since the UNIX epoch. Returns `None` when out of range.
    pub fn from_unix_seconds(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// The wrapped instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }
}

impl FromStr for Timestamp {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| TypeError::InvalidTimestamp(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts: Timestamp = "2008-02-06T13:43:19+01:00".parse().unwrap();
        assert_eq!(ts.to_string(), "2008-02-06T12:43:19Z");
    }

    #[test]
    fn parses_zoneless_as_utc() {
        let ts: Timestamp = "2008-02-06T13:43:19".parse().unwrap();
        assert_eq!(ts.to_string(), "2008-02-06T13:43:19Z");
        let frac: Timestamp = "2008-02-06T13:43:19.250".parse().unwrap();
        assert!(frac > ts);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "yesterday".parse::<Timestamp>(),
            Err(TypeError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn unix_seconds() {
        let ts = Timestamp::from_unix_seconds(0).unwrap();
        assert_eq!(ts.to_string(), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn serde_is_rfc3339_string() {
        let ts: Timestamp = "2010-04-01T08:00:00Z".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.starts_with("\"2010-04-01T08:00:00"));
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
