//! Network egress permission tables for the Warden sandbox.
//!
//! Allow-specifications collected at startup are parsed into per-scope
//! rule tables; at runtime a candidate `address` or `address/port` request
//! is evaluated against the accumulated rules.
//!
//! Rules come in two shapes:
//!
//! - CIDR rules (`10.0.0.0/8`, `127.0.0.1/255.255.255.0`, `[2001:db8::]/32`)
//!   match by network containment over fixed-width address bits;
//! - literal rules (`localhost:53`, `*:8080`) match by exact string
//!   equality, with `"*"` as an address or port wildcard.
//!
//! Hostnames are opaque text here; nothing in this crate resolves names.
//!
//! # Example
//!
//! ```
//! use warden_net::{NetPermission, NetScope};
//!
//! let mut permission = NetPermission::new();
//! permission.apply(NetScope::Udp, &["127.0.0.1/24:53,localhost".to_string()]);
//!
//! assert!(permission.is_granted(NetScope::Udp, "127.0.0.42/53"));
//! assert!(permission.is_granted(NetScope::Udp, "localhost"));
//! assert!(!permission.is_granted(NetScope::Udp, "10.1.2.3/53"));
//! ```

pub mod bits;
pub mod codec;
pub mod entry;
pub mod permission;
pub mod rule;
pub mod table;

pub use bits::AddressBits;
pub use codec::IpFamily;
pub use entry::GrantEntry;
pub use permission::{NetPermission, NetScope, RuleSnapshot};
pub use rule::{Cidr, GrantError, NetRule};
pub use table::RuleTable;
