//! Partial-match filters over rule records

use mongodb::bson::Document;

use super::record::{FIELD_KEYS, MAX_FIELDS, PTYPE_KEY};
use crate::error::{AdapterError, AdapterResult};

/// Build the partial-match document used by filtered removal
///
/// `values[i]` targets positional field `field_index + i`; values whose
/// absolute index falls outside `0..MAX_FIELDS` are ignored. Fields that are
/// not targeted act as wildcards.
pub fn field_filter<S: AsRef<str>>(ptype: &str, field_index: usize, values: &[S]) -> Document {
    let mut filter = Document::new();
    filter.insert(PTYPE_KEY, ptype);
    for (offset, value) in values.iter().enumerate() {
        let index = field_index.saturating_add(offset);
        if index >= MAX_FIELDS {
            break;
        }
        filter.insert(FIELD_KEYS[index], value.as_ref());
    }
    filter
}

/// Parse a JSON object into a query document for filtered loads
pub fn filter_from_json(json: &str) -> AdapterResult<Document> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| AdapterError::config(format!("Invalid filter JSON: {}", e)))?;

    if !value.is_object() {
        return Err(AdapterError::config("Filter must be a JSON object"));
    }

    Ok(mongodb::bson::to_document(&value)?)
}
