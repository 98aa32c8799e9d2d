//! DMA mode selection values.

/// Values of the uSDHC `PROT_CTRL.DMASEL` field.
///
/// Descriptor tables built by this crate are only understood by the engine
/// in [`DmaMode::Adma2`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DmaMode {
    /// No DMA, or simple single-buffer DMA.
    None = 0b00,
    /// ADMA1: 32-bit descriptors with a separate "set length" action.
    Adma1 = 0b01,
    /// ADMA2: 64-bit descriptors carrying length and address together.
    Adma2 = 0b10,
}

impl DmaMode {
    /// Returns the two-bit DMASEL encoding.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes a DMASEL field value. The reserved encoding `0b11` yields `None`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b00 => Some(Self::None),
            0b01 => Some(Self::Adma1),
            0b10 => Some(Self::Adma2),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dmasel_encoding() {
        assert_eq!(DmaMode::None.bits(), 0b00);
        assert_eq!(DmaMode::Adma1.bits(), 0b01);
        assert_eq!(DmaMode::Adma2.bits(), 0b10);
    }

    #[test]
    fn from_bits_round_trip() {
        for mode in [DmaMode::None, DmaMode::Adma1, DmaMode::Adma2] {
            assert_eq!(DmaMode::from_bits(mode.bits()), Some(mode));
        }
        assert_eq!(DmaMode::from_bits(0b11), None);
    }
}
