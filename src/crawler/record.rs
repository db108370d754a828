//! Product record and its wire format

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format of `timeStamp` in JSON output and in the database
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One product as advertised on a listing page
///
/// Every string field is empty when its markup was missing; a record always
/// carries all six fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub price: String,

    #[serde(default)]
    pub brand: String,

    #[serde(rename = "imageUrl", default)]
    pub image_url: String,

    #[serde(rename = "productUrl", default)]
    pub product_url: String,

    /// Local wall-clock time at which this record was extracted
    #[serde(rename = "timeStamp", with = "timestamp", default = "now")]
    pub timestamp: NaiveDateTime,
}

impl ProductRecord {
    /// An all-empty record stamped with the current time
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            brand: String::new(),
            image_url: String::new(),
            product_url: String::new(),
            timestamp: now(),
        }
    }

    /// True when every string field was found
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.price.is_empty()
            && !self.brand.is_empty()
            && !self.image_url.is_empty()
            && !self.product_url.is_empty()
    }

    /// The record with its timestamp ignored, for comparing extractions
    pub fn fields(&self) -> (&str, &str, &str, &str, &str) {
        (
            &self.name,
            &self.price,
            &self.brand,
            &self.image_url,
            &self.product_url,
        )
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Formats a timestamp the way it is written to every sink
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp, accepting a `T` separator and missing fraction
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ]
    .iter()
    .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

mod timestamp {
    use super::{format_timestamp, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }
}
