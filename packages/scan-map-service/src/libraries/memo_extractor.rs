//! Extraction of scan locations from on-chain tracking memos.
//!
//! A tracking memo reads `<item key> <scanner key> <lat> <lng>`, with any
//! mix of spaces, commas, brackets or quotes between the fields. The RPC
//! node prefixes each memo with its byte length in brackets (`[57] ...`);
//! that prefix is dropped before tokenizing.
//!
//! This format is stricter than the plain `"<lat>,<lng>"` message handled by
//! [`coordinate_extractor`](super::coordinate_extractor); the two are kept
//! apart on purpose and are not interchangeable.

use tracing::{debug, warn};

use crate::models::{Coordinate, EventRecord, MapPoint};

/// Identity tokens preceding the coordinates (item key, scanner key).
const IDENTITY_TOKENS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoRejection {
    #[error("event carries no memo")]
    Missing,

    #[error("expected at least 4 memo tokens, found {found}")]
    TooFewTokens { found: usize },

    #[error("memo token {token:?} is not a finite number")]
    NotNumeric { token: String },
}

impl MemoRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            MemoRejection::Missing => "missing",
            MemoRejection::TooFewTokens { .. } => "too_few_tokens",
            MemoRejection::NotNumeric { .. } => "not_numeric",
        }
    }
}

/// Split a memo into maximal runs of ASCII alphanumerics and `. - + _`.
pub fn tokenize(memo: &str) -> Vec<&str> {
    strip_length_prefix(memo)
        .split(|c: char| !is_token_char(c))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Read the third and fourth memo tokens as latitude and longitude.
///
/// `(0, 0)` is a valid result, never a failure marker.
pub fn extract_memo(memo: Option<&str>) -> Result<Coordinate, MemoRejection> {
    let memo = memo.ok_or(MemoRejection::Missing)?;
    let tokens = tokenize(memo);

    match tokens.get(IDENTITY_TOKENS..IDENTITY_TOKENS + 2) {
        Some([latitude, longitude]) => Ok(Coordinate::new(
            parse_finite(latitude)?,
            parse_finite(longitude)?,
        )),
        _ => Err(MemoRejection::TooFewTokens {
            found: tokens.len(),
        }),
    }
}

/// Turn scan events into path-ordered map points.
///
/// Failed transactions and rejected memos are skipped with a warning. Each
/// point is ordered along the path by its slot; events without one keep
/// response order ahead of the slotted ones.
pub fn extract_events(events: &[EventRecord]) -> Vec<MapPoint> {
    events
        .iter()
        .filter_map(|event| {
            if event.is_failed() {
                warn!(
                    signature = %event.signature,
                    "Skipping failed scan transaction"
                );
                return None;
            }

            match extract_memo(event.memo.as_deref()) {
                Ok(coordinate) => Some(
                    MapPoint::new(coordinate, event.display_label())
                        .with_connect_order(event.slot),
                ),
                Err(rejection) => {
                    warn!(
                        label = %event.display_label(),
                        memo = event.memo.as_deref().unwrap_or_default(),
                        reason = rejection.reason(),
                        "Skipping scan event: {}",
                        rejection
                    );
                    None
                }
            }
        })
        .collect()
}

fn strip_length_prefix(memo: &str) -> &str {
    let trimmed = memo.trim_start();
    let Some(rest) = trimmed.strip_prefix('[') else {
        return memo;
    };
    match rest.split_once(']') {
        Some((len, tail)) if !len.is_empty() && len.bytes().all(|b| b.is_ascii_digit()) => {
            debug!("Dropping memo length prefix [{}]", len);
            tail
        }
        _ => memo,
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_')
}

fn parse_finite(token: &str) -> Result<f64, MemoRejection> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| MemoRejection::NotNumeric {
            token: token.to_string(),
        })
}
