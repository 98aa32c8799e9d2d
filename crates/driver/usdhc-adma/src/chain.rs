//! Descriptor chain construction and table serialization.
//!
//! A transfer of `len` bytes at `address` is split into
//! `ceil(len / MAX_SEGMENT_LEN)` contiguous segments. Every segment but the
//! last carries exactly [`MAX_SEGMENT_LEN`] bytes; the last carries the
//! remainder and is the only one with the END bit set.

use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::descriptor::{Action, AdmaDescriptor, DESCRIPTOR_SIZE, MAX_SEGMENT_LEN};
use crate::error::AdmaError;
use crate::mode::DmaMode;
use crate::{adma_debug, adma_trace, adma_warn};

/// Returns the number of descriptors needed for a `len`-byte transfer.
#[must_use]
pub fn descriptor_count(len: usize) -> usize {
    len.div_ceil(usize::from(MAX_SEGMENT_LEN))
}

/// Returns the table size in bytes needed for a `len`-byte transfer.
#[must_use]
pub fn required_table_len(len: usize) -> usize {
    descriptor_count(len) * DESCRIPTOR_SIZE
}

/// Rejects empty transfers and transfers whose last byte lies above 4 GiB.
fn check_request(address: u32, len: usize) -> Result<(), AdmaError> {
    if len == 0 {
        adma_warn!("ADMA: rejecting zero-length transfer at {:#010x}", address);
        return Err(AdmaError::EmptyTransfer);
    }
    let in_range = u64::try_from(len - 1)
        .ok()
        .and_then(|span| u64::from(address).checked_add(span))
        .is_some_and(|last| last <= u64::from(u32::MAX));
    if !in_range {
        adma_warn!(
            "ADMA: transfer of {} bytes at {:#010x} overflows the address space",
            len,
            address
        );
        return Err(AdmaError::AddressOverflow { address, len });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Segment iterator
// ---------------------------------------------------------------------------

/// Iterator over the transfer descriptors covering one request, in table order.
///
/// Produced descriptors are not allocated anywhere; collect them with
/// [`DescriptorChain::build`] or stream them into a buffer with
/// [`write_table`].
#[derive(Debug, Clone)]
pub struct Segments {
    /// Address of the next segment.
    address: u32,
    /// Bytes not yet covered by a yielded descriptor.
    remaining: usize,
}

impl Segments {
    /// Creates the segment iterator for `len` bytes at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AdmaError::EmptyTransfer`] if `len` is zero and
    /// [`AdmaError::AddressOverflow`] if the transfer does not fit below 4 GiB.
    pub fn new(address: u32, len: usize) -> Result<Self, AdmaError> {
        check_request(address, len)?;
        Ok(Self {
            address,
            remaining: len,
        })
    }
}

impl Iterator for Segments {
    type Item = AdmaDescriptor;

    fn next(&mut self) -> Option<AdmaDescriptor> {
        if self.remaining == 0 {
            return None;
        }
        let desc = match u16::try_from(self.remaining) {
            Ok(length) if length <= MAX_SEGMENT_LEN => {
                self.remaining = 0;
                AdmaDescriptor::transfer(self.address, length, true)
            }
            _ => {
                let desc = AdmaDescriptor::transfer(self.address, MAX_SEGMENT_LEN, false);
                self.remaining -= usize::from(MAX_SEGMENT_LEN);
                // More bytes follow, and the request was checked to end
                // below 4 GiB, so this cannot wrap.
                self.address += u32::from(MAX_SEGMENT_LEN);
                desc
            }
        };
        adma_trace!("ADMA:   {}", desc);
        Some(desc)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = descriptor_count(self.remaining);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Segments {}

impl FusedIterator for Segments {}

// ---------------------------------------------------------------------------
// Owned chain
// ---------------------------------------------------------------------------

/// A complete ADMA2 descriptor table, held in link order.
///
/// The successor of each descriptor is the next element; the table ends at
/// the first descriptor with END set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorChain {
    descriptors: Vec<AdmaDescriptor>,
}

impl DescriptorChain {
    /// DMA mode the controller must be in to consume this table.
    pub const MODE: DmaMode = DmaMode::Adma2;

    /// Builds the descriptor chain for `len` bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AdmaError::EmptyTransfer`] if `len` is zero and
    /// [`AdmaError::AddressOverflow`] if the transfer does not fit below 4 GiB.
    pub fn build(address: u32, len: usize) -> Result<Self, AdmaError> {
        let descriptors: Vec<_> = Segments::new(address, len)?.collect();
        adma_debug!(
            "ADMA: built {} descriptor(s) for {} bytes at {:#010x}",
            descriptors.len(),
            len,
            address
        );
        Ok(Self { descriptors })
    }

    /// Parses a table from its wire form.
    ///
    /// Reads 8-byte records until the first one with END set; any bytes after
    /// it are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AdmaError::Malformed`] if a record has reserved bits set and
    /// [`AdmaError::Truncated`] if the input ends before an END record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AdmaError> {
        let mut descriptors = Vec::new();
        let mut rest = bytes;
        while let Some((raw, tail)) = rest.split_first_chunk::<DESCRIPTOR_SIZE>() {
            let index = descriptors.len();
            let desc = AdmaDescriptor::decode(raw).ok_or(AdmaError::Malformed { index })?;
            descriptors.push(desc);
            if desc.is_end() {
                adma_debug!("ADMA: parsed {} descriptor(s)", descriptors.len());
                return Ok(Self { descriptors });
            }
            rest = tail;
        }
        Err(AdmaError::Truncated { len: bytes.len() })
    }

    /// Returns the number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if the chain holds no descriptors.
    ///
    /// Never the case for a chain obtained from [`build`](Self::build) or
    /// [`from_bytes`](Self::from_bytes).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Returns the descriptors in link order.
    #[must_use]
    pub fn descriptors(&self) -> &[AdmaDescriptor] {
        &self.descriptors
    }

    /// Returns an iterator over the descriptors in link order.
    pub fn iter(&self) -> core::slice::Iter<'_, AdmaDescriptor> {
        self.descriptors.iter()
    }

    /// Returns the terminal (END) descriptor.
    #[must_use]
    pub fn last(&self) -> Option<&AdmaDescriptor> {
        self.descriptors.last()
    }

    /// Returns the address of the first segment.
    #[must_use]
    pub fn base_address(&self) -> Option<u32> {
        self.descriptors.first().map(|d| d.address)
    }

    /// Returns the number of bytes moved by the transfer descriptors.
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.descriptors
            .iter()
            .filter(|d| d.action == Action::Transfer)
            .map(|d| usize::from(d.length))
            .sum()
    }

    /// Returns the size of the serialized table in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.descriptors.len() * DESCRIPTOR_SIZE
    }

    /// Serializes the table into a freshly allocated byte vector.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.descriptors
            .iter()
            .flat_map(AdmaDescriptor::encode)
            .collect()
    }

    /// Serializes the table into `buf` and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`AdmaError::BufferTooSmall`] without touching `buf` if the
    /// table does not fit.
    pub fn write_to(&self, buf: &mut [u8]) -> Result<usize, AdmaError> {
        let needed = self.byte_len();
        if buf.len() < needed {
            return Err(AdmaError::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }
        for (slot, desc) in buf.chunks_exact_mut(DESCRIPTOR_SIZE).zip(&self.descriptors) {
            slot.copy_from_slice(&desc.encode());
        }
        Ok(needed)
    }
}

impl<'a> IntoIterator for &'a DescriptorChain {
    type Item = &'a AdmaDescriptor;
    type IntoIter = core::slice::Iter<'a, AdmaDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds and serializes the table for `len` bytes at `address` directly into
/// `buf`, without allocating. Returns the number of bytes written.
///
/// # Errors
///
/// Fails with the errors of [`DescriptorChain::build`], or with
/// [`AdmaError::BufferTooSmall`] if `buf` is shorter than
/// [`required_table_len`]. On error `buf` is left untouched.
pub fn write_table(address: u32, len: usize, buf: &mut [u8]) -> Result<usize, AdmaError> {
    let segments = Segments::new(address, len)?;
    let needed = segments.len() * DESCRIPTOR_SIZE;
    if buf.len() < needed {
        adma_warn!(
            "ADMA: table for {} bytes needs {} bytes, buffer has {}",
            len,
            needed,
            buf.len()
        );
        return Err(AdmaError::BufferTooSmall {
            needed,
            available: buf.len(),
        });
    }
    for (slot, desc) in buf.chunks_exact_mut(DESCRIPTOR_SIZE).zip(segments) {
        slot.copy_from_slice(&desc.encode());
    }
    adma_debug!(
        "ADMA: wrote {} descriptor(s) for {} bytes at {:#010x}",
        needed / DESCRIPTOR_SIZE,
        len,
        address
    );
    Ok(needed)
}
