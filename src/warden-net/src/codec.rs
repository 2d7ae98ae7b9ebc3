//! Address family classification and binary encoding.
//!
//! Textual operands are probed as IPv4 first, then IPv6. Anything that
//! parses in neither family is treated as an opaque literal by the rule
//! layer, never resolved.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::bits::AddressBits;

/// Address family of a textual IP literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    /// Length of the binary form in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            IpFamily::V4 => 4,
            IpFamily::V6 => 16,
        }
    }

    /// Width of the populated bit range.
    pub fn bit_len(self) -> u32 {
        self.byte_len() as u32 * 8
    }
}

/// Classify `literal` as an IP address, trying IPv4 before IPv6.
///
/// Returns `None` for anything else, hostnames included.
pub fn classify(literal: &str) -> Option<IpFamily> {
    if literal.parse::<Ipv4Addr>().is_ok() {
        Some(IpFamily::V4)
    } else if literal.parse::<Ipv6Addr>().is_ok() {
        Some(IpFamily::V6)
    } else {
        None
    }
}

/// Encode `literal` into address bits in the given family.
///
/// Returns `None` when the literal does not parse in that family. The
/// family is fixed by the caller rather than re-derived, so a dotted
/// netmask is rejected on an IPv6 address and vice versa.
pub fn encode(literal: &str, family: IpFamily) -> Option<AddressBits> {
    match family {
        IpFamily::V4 => {
            let address: Ipv4Addr = literal.parse().ok()?;
            Some(AddressBits::from_network_bytes(&address.octets()))
        }
        IpFamily::V6 => {
            let address: Ipv6Addr = literal.parse().ok()?;
            Some(AddressBits::from_network_bytes(&address.octets()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_families() {
        assert_eq!(classify("127.0.0.1"), Some(IpFamily::V4));
        assert_eq!(classify("255.255.255.0"), Some(IpFamily::V4));
        assert_eq!(classify("::1"), Some(IpFamily::V6));
        assert_eq!(classify("2001:db8::8a2e:370:7334"), Some(IpFamily::V6));
        assert_eq!(classify("::ffff:192.0.2.1"), Some(IpFamily::V6));
    }

    #[test]
    fn test_classify_rejects_non_ip() {
        assert_eq!(classify("localhost"), None);
        assert_eq!(classify("example.com"), None);
        assert_eq!(classify("*"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("256.0.0.1"), None);
        assert_eq!(classify("1.2.3"), None);
        assert_eq!(classify("01.2.3.4"), None);
    }

    #[test]
    fn test_encode_v4() {
        let bits = encode("127.0.0.1", IpFamily::V4).unwrap();
        assert_eq!(bits, AddressBits::from_network_bytes(&[127, 0, 0, 1]));
        assert!(bits.bit(0));
        assert!(bits.bit(24));
    }

    #[test]
    fn test_encode_v6() {
        let bits = encode("::1", IpFamily::V6).unwrap();
        assert_eq!(bits, AddressBits::from_network_bytes(&{
            let mut bytes = [0u8; 16];
            bytes[15] = 1;
            bytes
        }));
    }

    #[test]
    fn test_encode_rejects_family_mismatch() {
        assert_eq!(encode("127.0.0.1", IpFamily::V6), None);
        assert_eq!(encode("::1", IpFamily::V4), None);
        assert_eq!(encode("not-an-ip", IpFamily::V4), None);
    }
}
