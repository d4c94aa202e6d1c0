//! # Display Formatting
//!
//! pt-BR presentation helpers. Currency lives on [`Money::format_brl`];
//! this module covers timestamps and image references.
//!
//! [`Money::format_brl`]: crate::money::Money::format_brl

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::messages;

/// Formats a timestamp as `dd/mm/yyyy hh:mm`, or `"Não informado"` when absent.
///
/// ## Example
/// ```rust
/// use backoffice_core::format::format_date_time;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
/// assert_eq!(format_date_time(Some(at)), "07/03/2024 09:05");
/// assert_eq!(format_date_time(None), "Não informado");
/// ```
pub fn format_date_time(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(at) => at.format("%d/%m/%Y %H:%M").to_string(),
        None => messages::NOT_INFORMED.to_string(),
    }
}

/// Parses the timestamp shapes the catalog API emits.
///
/// Accepts RFC 3339 (`2024-03-07T09:05:00Z`), zone-less local date-times
/// (`2024-03-07T09:05:00`, optionally with fractional seconds, read as UTC)
/// and bare dates. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Normalizes a stored image reference into a fetchable URL.
///
/// Blank references yield `None`. References that already carry an `http`
/// scheme pass through; anything else gets `http://` prefixed.
pub fn normalize_image_url(reference: Option<&str>) -> Option<String> {
    let reference = reference.map(str::trim).filter(|r| !r.is_empty())?;

    if reference.starts_with("http://") || reference.starts_with("https://") {
        Some(reference.to_string())
    } else {
        Some(format!("http://{}", reference.trim_start_matches('/')))
    }
}
