//! ADMA2 scatter-gather descriptor tables for the uSDHC controller.
//!
//! The uSDHC ADMA2 engine walks a physically contiguous table of 8-byte
//! descriptors, each describing one segment of at most
//! [`MAX_SEGMENT_LEN`] bytes. This crate splits a transfer into such
//! segments and serializes them in the exact little-endian layout the engine
//! expects. Register programming, command issue and completion handling
//! belong to the driver.
//!
//! # Usage
//!
//! ```
//! use usdhc_adma::DescriptorChain;
//!
//! fn prepare(buf_phys: u32, len: usize, table: &mut [u8]) {
//!     let chain = DescriptorChain::build(buf_phys, len).expect("valid transfer");
//!     chain.write_to(table).expect("table region large enough");
//!     // Program ADMA_SYS_ADDR with the table's physical address and
//!     // select `DescriptorChain::MODE` in PROT_CTRL.DMASEL.
//! }
//! ```
//!
//! Callers without a heap can use [`write_table`], which streams the
//! descriptors straight into the table region.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod chain;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod log;
pub mod mode;

pub use chain::{DescriptorChain, Segments, descriptor_count, required_table_len, write_table};
pub use config::{BLOCK_SIZE, is_block_multiple};
pub use descriptor::{Action, AdmaDescriptor, Attr, DESCRIPTOR_SIZE, MAX_SEGMENT_LEN};
pub use error::AdmaError;
pub use mode::DmaMode;
