//! Filter parsing
//!
//! Parses the `filters` query parameter into validated descriptors.

use crate::core::constants::{MAX_FILTER_JSON_SIZE, MAX_FILTERS};

use super::types::{FilterDescriptor, FilterError, RawFilter};

/// Parse filters from the JSON query param
///
/// A blank payload is the empty filter set. Anything else must be a JSON
/// array of `{field, type, value}` objects within the size and count limits.
pub fn parse_filters(json_str: &str) -> Result<Vec<FilterDescriptor>, FilterError> {
    if json_str.trim().is_empty() {
        return Ok(Vec::new());
    }

    if json_str.len() > MAX_FILTER_JSON_SIZE {
        return Err(FilterError::Malformed(format!(
            "exceeds maximum size of {} bytes",
            MAX_FILTER_JSON_SIZE
        )));
    }

    let raw: Vec<RawFilter> =
        serde_json::from_str(json_str).map_err(|e| FilterError::Malformed(e.to_string()))?;

    if raw.len() > MAX_FILTERS {
        return Err(FilterError::Malformed(format!(
            "maximum {} filters allowed",
            MAX_FILTERS
        )));
    }

    raw.into_iter().map(RawFilter::into_descriptor).collect()
}
