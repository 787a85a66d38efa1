/*!
 * Serde utilities for common serialization/deserialization patterns.
 *
 * Durations in execution records are written as integer nanoseconds so the
 * result files stay compatible with tooling that already consumes them.
 */

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Serialize a `Duration` as whole nanoseconds.
///
/// Values beyond `u64::MAX` nanoseconds (about 584 years) saturate.
///
/// # Usage with serde
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use std::time::Duration;
///
/// #[derive(Serialize, Deserialize)]
/// struct Timing {
///     #[serde(with = "lbaas_batchops::utils::serde::duration_nanos")]
///     duration: Duration,
/// }
/// ```
pub mod duration_nanos {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}

/// Deserialize an optional non-negative integer that may be written as a
/// number or a quoted string, as happens with hand-edited TOML files.
///
/// ```toml
/// port = 3306      # Direct integer
/// port = "3306"    # String that parses to integer
/// # port omitted   # Returns None (with `#[serde(default)]`)
/// ```
pub fn deserialize_optional_flexible_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flexible {
        Number(u64),
        Text(String),
    }

    match Option::<Flexible>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flexible::Number(n)) => Ok(Some(n)),
        Some(Flexible::Text(s)) => s.trim().parse::<u64>().map(Some).map_err(|_| {
            D::Error::custom(format!("Cannot parse '{s}' as a non-negative integer"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Timing {
        #[serde(with = "duration_nanos")]
        duration: Duration,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Port {
        #[serde(default, deserialize_with = "deserialize_optional_flexible_u64")]
        value: Option<u64>,
    }

    #[test]
    fn test_duration_written_as_nanoseconds() {
        let timing = Timing {
            duration: Duration::from_millis(1500),
        };
        assert_eq!(
            serde_json::to_string(&timing).unwrap(),
            r#"{"duration":1500000000}"#
        );
        let parsed: Timing = serde_json::from_str(r#"{"duration":2000}"#).unwrap();
        assert_eq!(parsed.duration, Duration::from_micros(2));
    }

    #[test]
    fn test_flexible_u64_number_and_string() {
        let numeric: Port = toml::from_str("value = 3306").unwrap();
        assert_eq!(numeric.value, Some(3306));

        let quoted: Port = toml::from_str(r#"value = "3306""#).unwrap();
        assert_eq!(quoted.value, Some(3306));

        let missing: Port = toml::from_str("").unwrap();
        assert_eq!(missing.value, None);
    }

    #[test]
    fn test_flexible_u64_rejects_garbage() {
        let result: Result<Port, _> = toml::from_str(r#"value = "not-a-port""#);
        assert!(result.is_err());
    }
}
