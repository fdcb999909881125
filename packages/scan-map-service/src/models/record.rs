use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const UNNAMED_LOCATION: &str = "Unnamed Location";

/// One item location as returned by `GET /item/map`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(rename = "name", default, deserialize_with = "string_or_empty")]
    pub label: String,

    /// Free text expected to hold `"<lat>,<lng>"`.
    #[serde(rename = "message", default, deserialize_with = "string_or_empty")]
    pub raw_message: String,
}

impl LocationRecord {
    pub fn new(label: impl Into<String>, raw_message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            raw_message: raw_message.into(),
        }
    }

    /// Label shown in the marker popup.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            UNNAMED_LOCATION
        } else {
            &self.label
        }
    }
}

/// One scan transaction as returned by `GET /event/:key`.
///
/// Every field tolerates a missing or mistyped value so one odd
/// transaction cannot fail the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub block_time: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub confirmation_status: Option<String>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub memo: Option<String>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub signature: String,
    #[serde(default, deserialize_with = "lenient")]
    pub slot: Option<u64>,
}

impl EventRecord {
    /// Failed transactions carry a non-null `err`.
    pub fn is_failed(&self) -> bool {
        self.err.as_ref().is_some_and(|err| !err.is_null())
    }

    pub fn display_label(&self) -> String {
        let signature = short_signature(&self.signature);
        match self.block_time.and_then(|secs| DateTime::from_timestamp(secs, 0)) {
            Some(time) => format!("{} ({})", time.format("%Y-%m-%d %H:%M:%S UTC"), signature),
            None => match self.slot {
                Some(slot) => format!("Slot {} ({})", slot, signature),
                None => signature.to_string(),
            },
        }
    }
}

fn short_signature(signature: &str) -> &str {
    match signature.char_indices().nth(8) {
        Some((idx, _)) => &signature[..idx],
        None => signature,
    }
}

// Anything but a JSON string becomes empty, which the extractors reject.
fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        _ => Ok(String::new()),
    }
}

// A value of the wrong type reads as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}
