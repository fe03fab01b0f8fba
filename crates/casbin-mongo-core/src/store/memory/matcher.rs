//! Filter evaluation for the in-memory store
//!
//! Supports top-level field equality plus the `$eq`, `$ne` and `$in`
//! operators. Anything else is rejected rather than silently matching.

use mongodb::bson::{Bson, Document};

use crate::error::{AdapterError, AdapterResult};

/// Check whether `document` satisfies every condition in `filter`
pub(super) fn matches(document: &Document, filter: &Document) -> AdapterResult<bool> {
    for (key, condition) in filter {
        if key.starts_with('$') {
            return Err(AdapterError::operation(format!(
                "unsupported top-level operator '{}'",
                key
            )));
        }

        let value = document.get(key);
        let matched = match condition {
            Bson::Document(ops) if is_operator_document(ops) => matches_operators(value, ops)?,
            _ => equals(value, condition),
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_operator_document(ops: &Document) -> bool {
    !ops.is_empty() && ops.keys().all(|k| k.starts_with('$'))
}

fn matches_operators(value: Option<&Bson>, ops: &Document) -> AdapterResult<bool> {
    for (op, operand) in ops {
        let matched = match op.as_str() {
            "$eq" => equals(value, operand),
            "$ne" => !equals(value, operand),
            "$in" => match operand {
                Bson::Array(candidates) => candidates.iter().any(|c| equals(value, c)),
                _ => {
                    return Err(AdapterError::operation("$in needs an array"));
                }
            },
            other => {
                return Err(AdapterError::operation(format!(
                    "unsupported operator '{}'",
                    other
                )));
            }
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

// A null condition also matches a missing field
fn equals(value: Option<&Bson>, expected: &Bson) -> bool {
    match (value, expected) {
        (None, Bson::Null) => true,
        (None, _) => false,
        (Some(actual), expected) => actual == expected,
    }
}
