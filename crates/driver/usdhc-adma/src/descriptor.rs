//! ADMA2 descriptor record and its 8-byte wire format.
//!
//! ```text
//!  byte 0      byte 1     bytes 2..4        bytes 4..8
//! +-----------+----------+-----------------+---------------------+
//! | attribute | reserved | length (u16 LE) | address (u32 LE)    |
//! +-----------+----------+-----------------+---------------------+
//!
//! attribute: bit0 VALID, bit1 END, bit2 INT, bit3 reserved,
//!            bits5:4 ACT, bits7:6 reserved
//! ```

use core::fmt;

use bitflags::bitflags;

/// Size of one encoded descriptor in bytes.
pub const DESCRIPTOR_SIZE: usize = 8;

/// Largest data length a single transfer descriptor may carry.
///
/// The length field is 16 bits wide, but the engine counts in 32-bit words,
/// so the usable maximum is the largest multiple of four below 65536.
pub const MAX_SEGMENT_LEN: u16 = 65532;

/// Bit position of the two-bit action field in the attribute byte.
const ACT_SHIFT: u8 = 4;
/// Mask of the action field in the attribute byte.
const ACT_MASK: u8 = 0b11 << ACT_SHIFT;
/// Attribute bits that must be zero (bit 3, bits 7:6).
const ATTR_RESERVED_MASK: u8 = !(Attr::all().bits() | ACT_MASK);

bitflags! {
    /// Attribute flag bits (everything but the action field).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Attr: u8 {
        /// Descriptor may be consumed by the engine.
        const VALID = 1 << 0;
        /// Last descriptor of the table.
        const END = 1 << 1;
        /// Raise the DMA interrupt when this descriptor completes.
        const INT = 1 << 2;
    }
}

/// Action code held in attribute bits 5:4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    /// No operation; the engine skips to the next descriptor.
    Nop = 0b00,
    /// Reserved encoding (ADMA1 "set length"); treated as a no-op.
    Reserved = 0b01,
    /// Transfer `length` bytes at `address`.
    Transfer = 0b10,
    /// Continue with the descriptor table at `address`.
    Link = 0b11,
}

impl Action {
    /// Decodes the low two bits of `bits`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Nop,
            0b01 => Self::Reserved,
            0b10 => Self::Transfer,
            _ => Self::Link,
        }
    }

    /// Returns the two-bit action code.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Short mnemonic used in dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::Reserved => "RSV",
            Self::Transfer => "TRAN",
            Self::Link => "LINK",
        }
    }
}

/// One ADMA2 descriptor: a single transfer segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdmaDescriptor {
    /// VALID / END / INT flags.
    pub attr: Attr,
    /// Action code.
    pub action: Action,
    /// Segment length in bytes.
    pub length: u16,
    /// Physical start address of the segment.
    pub address: u32,
}

impl AdmaDescriptor {
    /// Creates a valid transfer descriptor, marked END when `last` is set.
    #[must_use]
    pub const fn transfer(address: u32, length: u16, last: bool) -> Self {
        let attr = if last {
            Attr::VALID.union(Attr::END)
        } else {
            Attr::VALID
        };
        Self {
            attr,
            action: Action::Transfer,
            length,
            address,
        }
    }

    /// Returns the combined attribute byte as written to the table.
    #[must_use]
    pub const fn attribute(&self) -> u8 {
        self.attr.bits() | (self.action.bits() << ACT_SHIFT)
    }

    /// Returns `true` if this descriptor terminates the table.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.attr.contains(Attr::END)
    }

    /// Returns `true` if the engine will consume this descriptor.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.attr.contains(Attr::VALID)
    }

    /// Encodes the descriptor into its 8-byte little-endian wire form.
    #[must_use]
    pub fn encode(&self) -> [u8; DESCRIPTOR_SIZE] {
        let mut raw = [0u8; DESCRIPTOR_SIZE];
        raw[0] = self.attribute();
        raw[2..4].copy_from_slice(&self.length.to_le_bytes());
        raw[4..8].copy_from_slice(&self.address.to_le_bytes());
        raw
    }

    /// Decodes a descriptor from its 8-byte wire form.
    ///
    /// Returns `None` if the reserved byte or any reserved attribute bit is
    /// non-zero.
    #[must_use]
    pub fn decode(raw: &[u8; DESCRIPTOR_SIZE]) -> Option<Self> {
        let attribute = raw[0];
        if attribute & ATTR_RESERVED_MASK != 0 || raw[1] != 0 {
            return None;
        }
        let [.., l0, l1, a0, a1, a2, a3] = *raw;
        Some(Self {
            attr: Attr::from_bits_truncate(attribute),
            action: Action::from_bits(attribute >> ACT_SHIFT),
            length: u16::from_le_bytes([l0, l1]),
            address: u32::from_le_bytes([a0, a1, a2, a3]),
        })
    }
}

impl fmt::Display for AdmaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attr={:#04x} {:<4} {}{}{} len={:5} addr={:#010x}",
            self.attribute(),
            self.action.name(),
            if self.is_valid() { "V" } else { "-" },
            if self.is_end() { "E" } else { "-" },
            if self.attr.contains(Attr::INT) { "I" } else { "-" },
            self.length,
            self.address,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_attribute_bytes() {
        assert_eq!(AdmaDescriptor::transfer(0, 1, false).attribute(), 0x21);
        assert_eq!(AdmaDescriptor::transfer(0, 1, true).attribute(), 0x23);
    }

    #[test]
    fn encode_layout_is_little_endian() {
        let desc = AdmaDescriptor::transfer(0x8800_FFFC, 4468, true);
        assert_eq!(
            desc.encode(),
            [0x23, 0x00, 0x74, 0x11, 0xFC, 0xFF, 0x00, 0x88]
        );
    }

    #[test]
    fn encode_max_segment() {
        let desc = AdmaDescriptor::transfer(0x8800_0000, MAX_SEGMENT_LEN, false);
        assert_eq!(
            desc.encode(),
            [0x21, 0x00, 0xFC, 0xFF, 0x00, 0x00, 0x00, 0x88]
        );
    }

    #[test]
    fn decode_link_descriptor() {
        let desc = AdmaDescriptor::decode(&[0x31, 0, 0, 0, 0x00, 0x10, 0x00, 0x90]).unwrap();
        assert_eq!(desc.action, Action::Link);
        assert!(desc.is_valid());
        assert!(!desc.is_end());
        assert_eq!(desc.address, 0x9000_1000);
    }

    #[test]
    fn decode_keeps_int_flag() {
        let desc = AdmaDescriptor::decode(&[0x27, 0, 0x00, 0x02, 0, 0, 0, 0]).unwrap();
        assert!(desc.attr.contains(Attr::INT));
        assert_eq!(desc.length, 512);
        assert_eq!(desc.attribute(), 0x27);
    }

    #[test]
    fn decode_rejects_reserved_bits() {
        assert!(AdmaDescriptor::decode(&[0x29, 0, 0, 0, 0, 0, 0, 0]).is_none());
        assert!(AdmaDescriptor::decode(&[0x61, 0, 0, 0, 0, 0, 0, 0]).is_none());
        assert!(AdmaDescriptor::decode(&[0xA1, 0, 0, 0, 0, 0, 0, 0]).is_none());
        assert!(AdmaDescriptor::decode(&[0x21, 1, 0, 0, 0, 0, 0, 0]).is_none());
    }

    #[test]
    fn action_bits_round_trip() {
        for action in [Action::Nop, Action::Reserved, Action::Transfer, Action::Link] {
            assert_eq!(Action::from_bits(action.bits()), action);
        }
    }

    #[test]
    fn display_format() {
        let desc = AdmaDescriptor::transfer(0x8800_0000, MAX_SEGMENT_LEN, false);
        assert_eq!(
            format!("{desc}"),
            "attr=0x21 TRAN V-- len=65532 addr=0x88000000"
        );
    }
}
