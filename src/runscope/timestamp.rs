//! Serde adapter for optional Runscope timestamps
//!
//! The API reports times as Unix epoch seconds, sometimes with a fractional
//! part. RFC 3339 strings are accepted too. Whole seconds are written back as
//! integers, anything finer as fractional seconds. Fractions are kept to the
//! microsecond, the finest precision an `f64` epoch carries exactly.
//!
//! Use with `#[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]`.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(i64),
    Fractional(f64),
    Text(String),
}

pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(time) if time.timestamp_subsec_nanos() == 0 => {
            serializer.serialize_i64(time.timestamp())
        }
        Some(time) => serializer.serialize_f64(
            time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) / 1e9,
        ),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<RawTimestamp>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let time = match raw {
        RawTimestamp::Seconds(secs) => Utc.timestamp_opt(secs, 0).single(),
        RawTimestamp::Fractional(secs) => {
            let whole = secs.floor();
            let micros = ((secs - whole) * 1_000_000.0).round() as u32;
            // rounding can carry into the next second
            let (whole, micros) = if micros >= 1_000_000 {
                (whole as i64 + 1, 0)
            } else {
                (whole as i64, micros)
            };
            Utc.timestamp_opt(whole, micros * 1_000).single()
        }
        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
    };

    time.map(Some)
        .ok_or_else(|| D::Error::custom("invalid or out of range timestamp"))
}
