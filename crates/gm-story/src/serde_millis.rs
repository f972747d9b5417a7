//! Durations are written as whole milliseconds in story files.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a duration as a millisecond count.
pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(as_millis(*value))
}

/// Deserialize a millisecond count into a duration.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

/// The same encoding for optional durations; `null` or a missing field is `None`.
pub mod option {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize an optional duration as a millisecond count or `null`.
    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_some(&super::as_millis(*d)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional millisecond count.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
    }
}

fn as_millis(value: Duration) -> u64 {
    u64::try_from(value.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct Wrapper {
        #[serde(with = "super")]
        delay: Duration,
        #[serde(default, with = "super::option")]
        extra: Option<Duration>,
    }

    #[test]
    fn reads_millis() {
        let parsed: Wrapper = serde_json::from_str(r#"{"delay":4000}"#).unwrap();
        assert_eq!(parsed.delay, Duration::from_millis(4000));
        assert_eq!(parsed.extra, None);
    }

    #[test]
    fn writes_millis() {
        let w = Wrapper {
            delay: Duration::from_millis(500),
            extra: Some(Duration::from_secs(2)),
        };
        assert_eq!(
            serde_json::to_string(&w).unwrap(),
            r#"{"delay":500,"extra":2000}"#
        );
    }
}
