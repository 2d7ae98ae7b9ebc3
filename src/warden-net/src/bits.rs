//! Fixed-width address bit vectors.
//!
//! IPv4 and IPv6 operands share one 128-bit representation so that the
//! netmask AND/compare in rule matching is a single integer operation
//! regardless of family. Bit positions follow significance: reading the
//! binary address back to front, the last byte of the network-order form
//! fills positions 0 through 7 and the first byte fills the highest
//! populated positions. The vector therefore holds the address read as a
//! big-endian unsigned integer, with IPv4 populating only positions 0
//! through 31.

use std::fmt;
use std::ops::BitAnd;

/// A 128-bit address bit vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressBits(u128);

impl AddressBits {
    /// Total width of the vector.
    pub const BIT_LEN: u32 = 128;

    /// The all-zero vector.
    pub const ZERO: AddressBits = AddressBits(0);

    /// Build a vector from an address in network byte order.
    ///
    /// Byte `i` of `bytes` contributes its bit `j` at output position
    /// `(bytes.len() - 1 - i) * 8 + j`.
    pub fn from_network_bytes(bytes: &[u8]) -> AddressBits {
        debug_assert!(bytes.len() <= 16, "address longer than 16 bytes");
        let mut value = 0u128;
        for (index, &byte) in bytes.iter().enumerate() {
            let base = (bytes.len() - 1 - index) as u32 * 8;
            for offset in 0..8 {
                if (byte >> offset) & 1 == 1 {
                    value |= 1 << (base + offset);
                }
            }
        }
        AddressBits(value)
    }

    /// Build a netmask covering the top `len` bits of a `width`-bit family.
    ///
    /// Positions `width - 1` down to `width - len` are set. `len` must be
    /// between 1 and `width`.
    pub fn prefix_mask(width: u32, len: u32) -> AddressBits {
        debug_assert!(width <= Self::BIT_LEN, "family wider than the vector");
        debug_assert!(len >= 1 && len <= width, "prefix length out of range");
        let mut value = 0u128;
        let mut position = width;
        for _ in 0..len {
            position -= 1;
            value |= 1 << position;
        }
        AddressBits(value)
    }

    /// Whether bit `position` is set.
    pub fn bit(self, position: u32) -> bool {
        debug_assert!(position < Self::BIT_LEN, "position out of range");
        (self.0 >> position) & 1 == 1
    }
}

impl BitAnd for AddressBits {
    type Output = AddressBits;

    fn bitand(self, rhs: AddressBits) -> AddressBits {
        AddressBits(self.0 & rhs.0)
    }
}

/// Renders all 128 positions, highest first, as `0`/`1` characters.
impl fmt::Display for AddressBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for position in (0..Self::BIT_LEN).rev() {
            f.write_str(if self.bit(position) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_network_bytes_bit_positions() {
        // 127.0.0.1: last byte at positions 0..=7, first byte at 24..=31.
        let bits = AddressBits::from_network_bytes(&[127, 0, 0, 1]);
        assert!(bits.bit(0));
        assert!(!bits.bit(1));
        for position in 24..=30 {
            assert!(bits.bit(position), "position {position} should be set");
        }
        assert!(!bits.bit(31));
        assert!(!bits.bit(32));
        assert_eq!(bits, AddressBits(0x7f00_0001));
    }

    #[test]
    fn test_from_network_bytes_sixteen_bytes() {
        let mut bytes = [0u8; 16];
        bytes[15] = 1;
        assert_eq!(AddressBits::from_network_bytes(&bytes), AddressBits(1));

        bytes[15] = 0;
        bytes[0] = 0x80;
        let bits = AddressBits::from_network_bytes(&bytes);
        assert!(bits.bit(127));
        assert_eq!(bits, AddressBits(1 << 127));
    }

    #[test]
    fn test_from_network_bytes_empty() {
        assert_eq!(AddressBits::from_network_bytes(&[]), AddressBits::ZERO);
    }

    #[test]
    fn test_prefix_mask_v4() {
        assert_eq!(AddressBits::prefix_mask(32, 24), AddressBits(0xffff_ff00));
        assert_eq!(AddressBits::prefix_mask(32, 32), AddressBits(0xffff_ffff));
        assert_eq!(AddressBits::prefix_mask(32, 1), AddressBits(0x8000_0000));
    }

    #[test]
    fn test_prefix_mask_v6() {
        assert_eq!(AddressBits::prefix_mask(128, 1), AddressBits(1 << 127));
        assert_eq!(AddressBits::prefix_mask(128, 128), AddressBits(u128::MAX));
        let upper_half = AddressBits::prefix_mask(128, 64);
        assert!(upper_half.bit(64));
        assert!(!upper_half.bit(63));
    }

    #[test]
    fn test_bitand_masks_network() {
        let address = AddressBits::from_network_bytes(&[192, 168, 4, 27]);
        let mask = AddressBits::prefix_mask(32, 24);
        assert_eq!(address & mask, AddressBits::from_network_bytes(&[192, 168, 4, 0]));
    }

    #[test]
    fn test_display_is_fixed_width() {
        let rendered = AddressBits(1).to_string();
        assert_eq!(rendered.len(), 128);
        assert!(rendered.starts_with('0'));
        assert!(rendered.ends_with('1'));
        assert_eq!(AddressBits::ZERO.to_string(), "0".repeat(128));
    }
}
