//! # Response Envelopes
//!
//! The catalog API answers list requests in several shapes. An ordered chain
//! of matchers classifies the body; the first match wins.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Wrapped       {"success": true, "data": {"content": [ ... ]}}       │
//! │  2. Paged         {"content": [ ... ], "totalElements": ...}            │
//! │  3. Bare          [ ... ]                                               │
//! │  4. Unrecognized  anything else            → empty list + warn          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Equivalent data yields the same list regardless of the shape it came in.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

/// A classified list response.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Wrapped(Vec<Value>),
    Paged(Vec<Value>),
    Bare(Vec<Value>),
    Unrecognized,
}

/// A matcher either claims the body or hands it back untouched.
type Matcher = fn(Value) -> Result<Envelope, Value>;

const MATCHERS: [Matcher; 3] = [match_wrapped, match_paged, match_bare];

fn match_wrapped(body: Value) -> Result<Envelope, Value> {
    let is_wrapped = body.get("success").and_then(Value::as_bool) == Some(true)
        && body
            .get("data")
            .and_then(|d| d.get("content"))
            .map_or(false, Value::is_array);

    if !is_wrapped {
        return Err(body);
    }

    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Object(mut data)) => match data.remove("content") {
                Some(Value::Array(items)) => Ok(Envelope::Wrapped(items)),
                _ => Ok(Envelope::Unrecognized),
            },
            _ => Ok(Envelope::Unrecognized),
        },
        other => Err(other),
    }
}

fn match_paged(body: Value) -> Result<Envelope, Value> {
    if !body.get("content").map_or(false, Value::is_array) {
        return Err(body);
    }

    match body {
        Value::Object(mut map) => match map.remove("content") {
            Some(Value::Array(items)) => Ok(Envelope::Paged(items)),
            _ => Ok(Envelope::Unrecognized),
        },
        other => Err(other),
    }
}

fn match_bare(body: Value) -> Result<Envelope, Value> {
    match body {
        Value::Array(items) => Ok(Envelope::Bare(items)),
        other => Err(other),
    }
}

impl Envelope {
    /// Runs the matcher chain over a response body.
    pub fn classify(body: Value) -> Envelope {
        let mut body = body;
        for matcher in MATCHERS {
            match matcher(body) {
                Ok(envelope) => return envelope,
                Err(unmatched) => body = unmatched,
            }
        }
        Envelope::Unrecognized
    }

    /// Shape name for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            Envelope::Wrapped(_) => "wrapped",
            Envelope::Paged(_) => "paged",
            Envelope::Bare(_) => "bare",
            Envelope::Unrecognized => "unrecognized",
        }
    }

    /// The raw items; empty for an unrecognized body.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Envelope::Wrapped(items) | Envelope::Paged(items) | Envelope::Bare(items) => items,
            Envelope::Unrecognized => Vec::new(),
        }
    }
}

/// Classifies `body` and decodes every item as `T`.
///
/// An unrecognized body is an empty list. An item that fails to decode fails
/// the whole list, so a store never shows a partial snapshot.
pub fn unwrap_list<T: DeserializeOwned>(body: Value, resource: &str) -> ApiResult<Vec<T>> {
    let envelope = Envelope::classify(body);

    if matches!(envelope, Envelope::Unrecognized) {
        warn!(resource, "Unrecognized list response shape, treating as empty");
    } else {
        debug!(resource, shape = envelope.shape(), "List response unwrapped");
    }

    envelope
        .into_items()
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| ApiError::invalid_response(200, e)))
        .collect()
}
