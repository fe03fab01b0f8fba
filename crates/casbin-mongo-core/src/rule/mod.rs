//! Rule records and the filters built over them

mod filter;
mod record;

pub use filter::{field_filter, filter_from_json};
pub use record::{
    CREATED_AT_KEY, FIELD_KEYS, MAX_FIELDS, PTYPE_KEY, RuleRecord, UPDATED_AT_KEY,
};
