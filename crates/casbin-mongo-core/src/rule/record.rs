//! Persisted rule record
//!
//! One document per rule. Keys are `ptype` and the positional fields `v0`..`v5`;
//! records written by add/save also carry `createdAt`/`updatedAt`.

use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::{Bson, Document};

use crate::error::{AdapterError, AdapterResult};

/// Maximum number of positional fields a record holds
pub const MAX_FIELDS: usize = 6;

/// Key of the rule type discriminator
pub const PTYPE_KEY: &str = "ptype";

/// Keys of the positional fields, in order
pub const FIELD_KEYS: [&str; MAX_FIELDS] = ["v0", "v1", "v2", "v3", "v4", "v5"];

/// Creation timestamp key
pub const CREATED_AT_KEY: &str = "createdAt";

/// Update timestamp key
pub const UPDATED_AT_KEY: &str = "updatedAt";

/// A single rule as stored in the collection
///
/// Populated fields always form a contiguous prefix of `fields`; `len` is the
/// number of populated slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    ptype: String,
    fields: [Option<String>; MAX_FIELDS],
    len: usize,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl RuleRecord {
    /// Build an untimestamped record from a rule tuple
    ///
    /// Values beyond the sixth are dropped.
    pub fn new<S: AsRef<str>>(ptype: impl Into<String>, rule: &[S]) -> Self {
        let mut fields: [Option<String>; MAX_FIELDS] = Default::default();
        let len = rule.len().min(MAX_FIELDS);
        for (slot, value) in fields.iter_mut().zip(rule.iter()) {
            *slot = Some(value.as_ref().to_string());
        }

        Self {
            ptype: ptype.into(),
            fields,
            len,
            created_at: None,
            updated_at: None,
        }
    }

    /// Stamp `createdAt`/`updatedAt` with the current time
    pub fn with_timestamps(self) -> Self {
        self.stamped_at(Utc::now())
    }

    /// Stamp `createdAt`/`updatedAt` with a given instant
    pub fn stamped_at(mut self, at: DateTime<Utc>) -> Self {
        let ts = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.created_at = Some(ts.clone());
        self.updated_at = Some(ts);
        self
    }

    /// Rule type (`p`, `p2`, `g`, ...)
    pub fn ptype(&self) -> &str {
        &self.ptype
    }

    /// Number of populated positional fields
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no positional field is populated
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Positional field at `index`, if populated
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).and_then(|f| f.as_deref())
    }

    /// Populated positional fields in order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields[..self.len].iter().filter_map(|f| f.as_deref())
    }

    /// Creation timestamp, if stamped
    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    /// Update timestamp, if stamped
    pub fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    /// The textual policy line handed to the model's parser
    ///
    /// Empty fields are omitted, matching how records written by other
    /// adapter implementations are read back.
    pub fn to_policy_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.len + 1);
        parts.push(self.ptype.as_str());
        parts.extend(self.values().filter(|v| !v.is_empty()));
        parts.join(", ")
    }

    /// Encode as a BSON document
    ///
    /// Unpopulated fields and missing timestamps are left out, so an
    /// untimestamped record doubles as an equality filter.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(PTYPE_KEY, self.ptype.clone());
        for (key, value) in FIELD_KEYS.iter().zip(self.fields.iter()) {
            if let Some(value) = value {
                doc.insert(*key, value.clone());
            }
        }
        if let Some(ts) = &self.created_at {
            doc.insert(CREATED_AT_KEY, ts.clone());
        }
        if let Some(ts) = &self.updated_at {
            doc.insert(UPDATED_AT_KEY, ts.clone());
        }
        doc
    }

    /// Decode a stored document
    ///
    /// Positional values are compacted: missing, null and empty fields are
    /// skipped so the result keeps the contiguous-prefix invariant. Extra keys
    /// such as `_id` are ignored.
    pub fn from_document(doc: &Document) -> AdapterResult<Self> {
        let ptype = match doc.get(PTYPE_KEY) {
            Some(Bson::String(s)) => s.clone(),
            Some(other) => {
                return Err(AdapterError::invalid_record(format!(
                    "'{}' must be a string, found {:?}",
                    PTYPE_KEY,
                    other.element_type()
                )));
            }
            None => {
                return Err(AdapterError::invalid_record(format!(
                    "missing '{}'",
                    PTYPE_KEY
                )));
            }
        };

        let mut values = Vec::with_capacity(MAX_FIELDS);
        for key in FIELD_KEYS {
            match doc.get(key) {
                Some(Bson::String(s)) if !s.is_empty() => values.push(s.clone()),
                Some(Bson::String(_)) | Some(Bson::Null) | None => {}
                Some(other) => {
                    return Err(AdapterError::invalid_record(format!(
                        "'{}' must be a string, found {:?}",
                        key,
                        other.element_type()
                    )));
                }
            }
        }

        let mut record = Self::new(ptype, &values);
        record.created_at = timestamp(doc, CREATED_AT_KEY);
        record.updated_at = timestamp(doc, UPDATED_AT_KEY);
        Ok(record)
    }
}

fn timestamp(doc: &Document, key: &str) -> Option<String> {
    match doc.get(key) {
        Some(Bson::String(s)) => Some(s.clone()),
        Some(Bson::DateTime(dt)) => dt.try_to_rfc3339_string().ok(),
        _ => None,
    }
}
