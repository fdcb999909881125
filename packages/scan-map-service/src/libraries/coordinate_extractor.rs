//! Extraction of `"<lat>,<lng>"` pairs from item location messages.

use tracing::warn;

use crate::models::{Coordinate, LocationRecord, MapPoint};

/// Why a location message did not yield a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("expected \"<lat>,<lng>\", found {tokens} comma-separated token(s)")]
    BadFormat { tokens: usize },

    #[error("coordinate token {token:?} is not a finite number")]
    NotNumeric { token: String },
}

impl Rejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::BadFormat { .. } => "bad_format",
            Rejection::NotNumeric { .. } => "not_numeric",
        }
    }
}

/// Parse the record's message as exactly two comma-separated decimal numbers.
///
/// Values pass through unclamped; `"95,200"` is accepted.
pub fn extract(record: &LocationRecord) -> Result<Coordinate, Rejection> {
    let tokens: Vec<&str> = record.raw_message.split(',').collect();

    match tokens.as_slice() {
        [latitude, longitude] => Ok(Coordinate::new(
            parse_finite(latitude)?,
            parse_finite(longitude)?,
        )),
        _ => Err(Rejection::BadFormat {
            tokens: tokens.len(),
        }),
    }
}

/// Extract every record, dropping rejected ones with a warning.
///
/// Survivors keep their input order.
pub fn extract_all(records: &[LocationRecord]) -> Vec<MapPoint> {
    records
        .iter()
        .filter_map(|record| match extract(record) {
            Ok(coordinate) => Some(MapPoint::new(coordinate, record.display_label())),
            Err(rejection) => {
                warn!(
                    label = %record.display_label(),
                    raw_message = %record.raw_message,
                    reason = rejection.reason(),
                    "Skipping location record: {}",
                    rejection
                );
                None
            }
        })
        .collect()
}

fn parse_finite(token: &str) -> Result<f64, Rejection> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Rejection::NotNumeric {
            token: token.to_string(),
        })
}
