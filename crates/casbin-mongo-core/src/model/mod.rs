//! Policy model seam
//!
//! The authorization engine owns its model. The adapter only needs two things
//! from it: a way to feed textual policy lines back in on load, and read access
//! to the rules of a section on save.

mod memory;

pub use memory::MemoryModel;

/// Permission rules section
pub const POLICY_SECTION: &str = "p";

/// Role/grouping rules section
pub const GROUPING_SECTION: &str = "g";

/// Rules of one rule type within a section
pub type RuleSet<'a> = (&'a str, &'a [Vec<String>]);

/// The engine-side model the adapter reads from and writes into
pub trait PolicyModel: Send + Sync {
    /// Rule types of `section` with their rules, in traversal order
    ///
    /// Returns `None` when the model has no such section at all.
    fn section(&self, section: &str) -> Option<Vec<RuleSet<'_>>>;

    /// Parse one policy line (`ptype, v0, v1, ...`) into the model
    fn load_policy_line(&mut self, line: &str);
}

/// A parsed policy line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyLine {
    /// Section the rule belongs to, derived from the rule type's first character
    pub section: String,
    /// Rule type
    pub ptype: String,
    /// Rule values
    pub rule: Vec<String>,
}

/// Split a policy line into section, rule type and values
///
/// Blank lines and `#` comments yield `None`, as does a line without a rule
/// type.
pub fn parse_policy_line(line: &str) -> Option<PolicyLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut tokens = line.split(',').map(|t| t.trim().to_string());
    let ptype = tokens.next().filter(|t| !t.is_empty())?;
    let section = ptype.chars().next()?.to_string();

    Some(PolicyLine {
        section,
        ptype,
        rule: tokens.collect(),
    })
}
