//! Descriptor table error types.

use core::fmt;

/// Errors that can occur while building, writing or parsing a descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmaError {
    /// A transfer of zero bytes was requested.
    EmptyTransfer,
    /// The transfer would run past the end of the 32-bit physical address space.
    AddressOverflow {
        /// Requested start address.
        address: u32,
        /// Requested transfer length in bytes.
        len: usize,
    },
    /// The destination buffer cannot hold the whole table.
    BufferTooSmall {
        /// Bytes required for the table.
        needed: usize,
        /// Bytes available in the destination.
        available: usize,
    },
    /// The input ended before a descriptor with the END bit set.
    Truncated {
        /// Length of the input in bytes.
        len: usize,
    },
    /// A descriptor has reserved bits set.
    Malformed {
        /// Position of the offending descriptor in the table.
        index: usize,
    },
}

impl fmt::Display for AdmaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTransfer => f.write_str("zero-length transfer"),
            Self::AddressOverflow { address, len } => write!(
                f,
                "transfer of {len} bytes at {address:#010x} exceeds the 32-bit address space"
            ),
            Self::BufferTooSmall { needed, available } => write!(
                f,
                "descriptor table needs {needed} bytes, buffer has {available}"
            ),
            Self::Truncated { len } => {
                write!(f, "descriptor table truncated after {len} bytes (no END descriptor)")
            }
            Self::Malformed { index } => {
                write!(f, "descriptor {index} has reserved bits set")
            }
        }
    }
}

impl core::error::Error for AdmaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_all_variants() {
        assert_eq!(
            format!("{}", AdmaError::EmptyTransfer),
            "zero-length transfer"
        );
        assert_eq!(
            format!(
                "{}",
                AdmaError::AddressOverflow {
                    address: 0xFFFF_0000,
                    len: 0x2_0000,
                }
            ),
            "transfer of 131072 bytes at 0xffff0000 exceeds the 32-bit address space"
        );
        assert_eq!(
            format!(
                "{}",
                AdmaError::BufferTooSmall {
                    needed: 16,
                    available: 8,
                }
            ),
            "descriptor table needs 16 bytes, buffer has 8"
        );
        assert_eq!(
            format!("{}", AdmaError::Truncated { len: 24 }),
            "descriptor table truncated after 24 bytes (no END descriptor)"
        );
        assert_eq!(
            format!("{}", AdmaError::Malformed { index: 3 }),
            "descriptor 3 has reserved bits set"
        );
    }

    #[test]
    fn error_equality() {
        assert_eq!(AdmaError::EmptyTransfer, AdmaError::EmptyTransfer);
        assert_ne!(
            AdmaError::Truncated { len: 0 },
            AdmaError::Truncated { len: 8 }
        );
    }
}
