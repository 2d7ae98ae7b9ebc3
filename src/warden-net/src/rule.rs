//! Grant rules and their match test.
//!
//! A parsed grant entry becomes one of two rule shapes:
//!
//! - a CIDR rule, when the address is an IP literal and a netmask is
//!   present: matching is network containment over address bits;
//! - a literal rule otherwise: matching is exact string equality with `"*"`
//!   accepted as an address or port wildcard.
//!
//! Rule construction is the only fallible step of the grant pipeline. The
//! match test never fails.

use thiserror::Error;

use crate::bits::AddressBits;
use crate::codec::{self, IpFamily};
use crate::entry::GrantEntry;

/// Reasons a grant token is rejected at build time.
#[derive(Debug, Error)]
pub enum GrantError {
    /// Prefix length of zero, beyond the family width, or unparsable.
    #[error("invalid prefix length: {0}")]
    InvalidPrefixLength(String),
    /// Dotted netmask that does not parse in the address's family.
    #[error("invalid netmask: {0}")]
    InvalidNetmask(String),
    /// Address that classified as an IP literal but failed to encode.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Netmask and masked network bits of a CIDR rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    pub netmask: AddressBits,
    pub network: AddressBits,
}

/// One stored grant rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetRule {
    pub address: String,
    pub port: String,
    pub cidr: Option<Cidr>,
}

impl NetRule {
    /// Build a rule from a parsed grant entry.
    ///
    /// The CIDR shape is taken when the address is an IP literal and the
    /// entry carries a netmask; every other combination stores the address
    /// and port as opaque text. A netmask next to a non-IP address is
    /// dropped rather than rejected.
    pub fn build(entry: &GrantEntry<'_>) -> Result<NetRule, GrantError> {
        let mut cidr = None;
        if let Some(family) = codec::classify(entry.address) {
            if !entry.netmask.is_empty() {
                cidr = Some(build_cidr(entry.address, entry.netmask, family)?);
            }
        }
        Ok(NetRule {
            address: entry.address.to_string(),
            port: entry.port.to_string(),
            cidr,
        })
    }

    /// Test this rule against a candidate address and port.
    ///
    /// `candidate_bits` carries the candidate's encoded address when it is
    /// an IP literal. A CIDR rule matches such candidates by network
    /// containment; any other pairing falls back to the literal comparison.
    pub fn matches(&self, address: &str, port: &str, candidate_bits: Option<AddressBits>) -> bool {
        if let (Some(cidr), Some(bits)) = (self.cidr, candidate_bits) {
            cidr.netmask & bits == cidr.network && self.port_matches(port)
        } else {
            (self.address == "*" || self.address == address) && self.port_matches(port)
        }
    }

    fn port_matches(&self, port: &str) -> bool {
        self.port == "*" || self.port == port
    }
}

fn build_cidr(address: &str, netmask: &str, family: IpFamily) -> Result<Cidr, GrantError> {
    let netmask_bits = if is_all_digits(netmask) {
        let prefix_len: u32 = netmask
            .parse()
            .map_err(|_| GrantError::InvalidPrefixLength(netmask.to_string()))?;
        if prefix_len == 0 || prefix_len > family.bit_len() {
            return Err(GrantError::InvalidPrefixLength(netmask.to_string()));
        }
        AddressBits::prefix_mask(family.bit_len(), prefix_len)
    } else {
        codec::encode(netmask, family).ok_or_else(|| GrantError::InvalidNetmask(netmask.to_string()))?
    };
    let address_bits =
        codec::encode(address, family).ok_or_else(|| GrantError::InvalidAddress(address.to_string()))?;
    Ok(Cidr { netmask: netmask_bits, network: netmask_bits & address_bits })
}

fn is_all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}
