//! Ordered rule tables with deny-all and allow-all overrides.
//!
//! A fresh table denies everything. Each successful grant appends a rule
//! and drops the deny-all default; a wildcard grant flips the table to
//! allow-all instead. Evaluation checks the flags first and then scans the
//! rules in insertion order until one matches.

use tracing::warn;

use crate::codec;
use crate::entry::GrantEntry;
use crate::rule::NetRule;

/// Rule table for one network scope.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<NetRule>,
    allow_all: bool,
    deny_all: bool,
}

impl RuleTable {
    pub fn new() -> RuleTable {
        RuleTable { rules: Vec::new(), allow_all: false, deny_all: true }
    }

    /// Parse one grant token and append the resulting rule.
    ///
    /// A malformed token is logged and skipped, leaving the table unchanged.
    pub fn grant(&mut self, token: &str) {
        let entry = GrantEntry::parse(token);
        match NetRule::build(&entry) {
            Ok(rule) => {
                self.rules.push(rule);
                self.deny_all = false;
            }
            Err(error) => warn!(grant = token, %error, "skipping malformed network grant"),
        }
    }

    /// Switch the table to allow-all and drop the stored rules.
    ///
    /// Rules granted afterwards are kept but stay inert while the flag
    /// holds.
    pub fn set_allow_all(&mut self) {
        self.deny_all = false;
        self.allow_all = true;
        self.rules.clear();
    }

    /// Evaluate a candidate `address` or `address/port` request.
    ///
    /// Candidates are formed by trusted call sites; one that splits into
    /// more than two non-empty `/` segments is a caller bug and panics.
    pub fn is_granted(&self, candidate: &str) -> bool {
        if self.deny_all {
            return false;
        }
        if self.allow_all {
            return true;
        }
        if candidate.is_empty() {
            return false;
        }

        let segments: Vec<&str> = candidate.split('/').filter(|segment| !segment.is_empty()).collect();
        assert!(
            segments.len() == 1 || segments.len() == 2,
            "candidate must be `address` or `address/port`, got {candidate:?}"
        );
        let address = segments[0];
        let port = if segments.len() == 2 { segments[1] } else { "*" };

        let candidate_bits = match codec::classify(address) {
            Some(family) => match codec::encode(address, family) {
                Some(bits) => Some(bits),
                None => return false,
            },
            None => None,
        };

        self.rules.iter().any(|rule| rule.matches(address, port, candidate_bits))
    }

    /// Stored rules in insertion order.
    pub fn rules(&self) -> &[NetRule] {
        &self.rules
    }

    pub fn allow_all(&self) -> bool {
        self.allow_all
    }

    pub fn deny_all(&self) -> bool {
        self.deny_all
    }
}

impl Default for RuleTable {
    fn default() -> RuleTable {
        RuleTable::new()
    }
}
