//! Scope-keyed permission state.
//!
//! One rule table per network scope. Grants are applied once during
//! startup through `&mut self`; queries borrow immutably, so the
//! startup-then-read-only lifecycle is enforced by the borrow checker and
//! concurrent queries need no locking.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::rule::NetRule;
use crate::table::RuleTable;

/// Network permission scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NetScope {
    Udp,
    Tcp,
}

impl NetScope {
    /// Every scope, in table order.
    pub const ALL: [NetScope; 2] = [NetScope::Udp, NetScope::Tcp];
}

impl fmt::Display for NetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetScope::Udp => "net-udp",
            NetScope::Tcp => "net-tcp",
        };
        write!(f, "{name}")
    }
}

impl FromStr for NetScope {
    type Err = String;

    fn from_str(s: &str) -> Result<NetScope, Self::Err> {
        match s {
            "udp" | "net-udp" => Ok(NetScope::Udp),
            "tcp" | "net-tcp" => Ok(NetScope::Tcp),
            other => Err(format!("unknown network scope: {other}")),
        }
    }
}

/// Network permission state for every scope.
#[derive(Debug, Clone)]
pub struct NetPermission {
    tables: BTreeMap<NetScope, RuleTable>,
}

impl NetPermission {
    /// A permission set with an empty, deny-all table per scope.
    pub fn new() -> NetPermission {
        let mut tables = BTreeMap::new();
        for scope in NetScope::ALL {
            tables.insert(scope, RuleTable::new());
        }
        NetPermission { tables }
    }

    /// Apply raw allow values to `scope`.
    ///
    /// Each value may hold several comma-separated grant tokens; empty
    /// tokens are discarded. A `*` or `*:*` token switches the scope to
    /// allow-all and abandons every remaining token of this call.
    pub fn apply(&mut self, scope: NetScope, values: &[String]) {
        let table = self.tables.entry(scope).or_default();
        for value in values {
            for token in value.split(',').filter(|token| !token.is_empty()) {
                if token == "*" || token == "*:*" {
                    table.set_allow_all();
                    debug!(%scope, "allow-all network grant applied");
                    return;
                }
                table.grant(token);
            }
        }
        debug!(%scope, rules = table.rules().len(), deny_all = table.deny_all(), "network grants applied");
    }

    /// Whether a candidate `address` or `address/port` request is granted
    /// in `scope`.
    pub fn is_granted(&self, scope: NetScope, candidate: &str) -> bool {
        self.tables.get(&scope).is_some_and(|table| table.is_granted(candidate))
    }

    /// Write the diagnostic snapshot of every table, scopes in order.
    pub fn write_debug_snapshot<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for (scope, table) in &self.tables {
            writeln!(out, "{scope}:")?;
            writeln!(out, "  deny_all: {}", table.deny_all())?;
            writeln!(out, "  allow_all: {}", table.allow_all())?;
            let rules: Vec<RuleSnapshot> = table.rules().iter().map(RuleSnapshot::from).collect();
            let rendered = serde_json::to_string(&rules).map_err(io::Error::other)?;
            writeln!(out, "  rules: {rendered}")?;
        }
        Ok(())
    }
}

impl Default for NetPermission {
    fn default() -> NetPermission {
        NetPermission::new()
    }
}

/// Serializable view of one stored rule.
///
/// CIDR fields render as fixed 128-character bit strings, highest position
/// first, and are omitted for literal rules.
#[derive(Debug, Serialize)]
pub struct RuleSnapshot {
    pub address: String,
    pub port: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

impl From<&NetRule> for RuleSnapshot {
    fn from(rule: &NetRule) -> RuleSnapshot {
        RuleSnapshot {
            address: rule.address.clone(),
            port: rule.port.clone(),
            netmask: rule.cidr.map(|cidr| cidr.netmask.to_string()),
            network: rule.cidr.map(|cidr| cidr.network.to_string()),
        }
    }
}
