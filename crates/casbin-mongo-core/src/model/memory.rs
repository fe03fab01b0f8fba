//! In-memory policy model
//!
//! A minimal model holding `section -> rule type -> rules`. Enough for
//! importing/exporting policy files and for exercising the adapter without an
//! engine.

use std::collections::BTreeMap;

use super::{GROUPING_SECTION, POLICY_SECTION, PolicyModel, RuleSet, parse_policy_line};

/// Section-keyed rule storage with set semantics per rule type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryModel {
    sections: BTreeMap<String, BTreeMap<String, Vec<Vec<String>>>>,
}

impl MemoryModel {
    /// Create a model with no sections
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model with the `p` and `g` sections defined and empty
    pub fn rbac() -> Self {
        let mut model = Self::new();
        model.define_section(POLICY_SECTION);
        model.define_section(GROUPING_SECTION);
        model
    }

    /// Build a model from policy text, one rule per line
    pub fn from_policy_text(text: &str) -> Self {
        let mut model = Self::rbac();
        for line in text.lines() {
            model.load_policy_line(line);
        }
        model
    }

    /// Declare a section so it exists even without rules
    pub fn define_section(&mut self, section: &str) {
        self.sections.entry(section.to_string()).or_default();
    }

    /// Whether the section is defined
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Add a rule; returns false if it was already present
    pub fn add_rule(&mut self, section: &str, ptype: &str, rule: Vec<String>) -> bool {
        let rules = self
            .sections
            .entry(section.to_string())
            .or_default()
            .entry(ptype.to_string())
            .or_default();

        if rules.contains(&rule) {
            return false;
        }
        rules.push(rule);
        true
    }

    /// Remove a rule; returns false if it was not present
    pub fn remove_rule(&mut self, section: &str, ptype: &str, rule: &[String]) -> bool {
        let Some(rules) = self
            .sections
            .get_mut(section)
            .and_then(|types| types.get_mut(ptype))
        else {
            return false;
        };

        let before = rules.len();
        rules.retain(|r| r.as_slice() != rule);
        rules.len() < before
    }

    /// Rules of one rule type
    pub fn rules(&self, section: &str, ptype: &str) -> &[Vec<String>] {
        self.sections
            .get(section)
            .and_then(|types| types.get(ptype))
            .map(|rules| rules.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of rules across all sections
    pub fn len(&self) -> usize {
        self.sections
            .values()
            .flat_map(|types| types.values())
            .map(|rules| rules.len())
            .sum()
    }

    /// Whether the model holds no rules
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all rules, keeping defined sections
    pub fn clear_rules(&mut self) {
        for types in self.sections.values_mut() {
            types.clear();
        }
    }

    /// Render every rule as a policy line
    pub fn to_policy_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.len());
        for types in self.sections.values() {
            for (ptype, rules) in types {
                for rule in rules {
                    let mut parts = Vec::with_capacity(rule.len() + 1);
                    parts.push(ptype.as_str());
                    parts.extend(rule.iter().map(String::as_str));
                    lines.push(parts.join(", "));
                }
            }
        }
        lines
    }
}

impl PolicyModel for MemoryModel {
    fn section(&self, section: &str) -> Option<Vec<RuleSet<'_>>> {
        self.sections.get(section).map(|types| {
            types
                .iter()
                .map(|(ptype, rules)| (ptype.as_str(), rules.as_slice()))
                .collect()
        })
    }

    fn load_policy_line(&mut self, line: &str) {
        if let Some(parsed) = parse_policy_line(line) {
            self.add_rule(&parsed.section, &parsed.ptype, parsed.rule);
        }
    }
}
