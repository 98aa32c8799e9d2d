//! Compile-time configuration.
//!
//! Values that the embedding build may tune are read from the environment
//! when this crate is compiled; everything else is fixed by the controller.

use crate::log::LogLevel;

/// Maximum log level (compile-time). Messages more verbose than this are
/// dropped before reaching the registered sink.
///
/// Set with `ADMA_LOG_LEVEL=error|warn|info|debug|trace` at build time.
/// Unset or unrecognised values select `trace`, leaving verbosity filtering
/// to the registered sink.
pub const MAX_LOG_LEVEL: LogLevel = match option_env!("ADMA_LOG_LEVEL") {
    Some(name) => match LogLevel::from_name(name.as_bytes()) {
        Some(level) => level,
        None => LogLevel::Trace,
    },
    None => LogLevel::Trace,
};

/// Storage block size in bytes. Transfers handed to the builder are expected
/// to be whole blocks.
pub const BLOCK_SIZE: usize = 512;

/// Returns `true` if `len` is a non-zero whole number of [`BLOCK_SIZE`] blocks.
///
/// The builder does not enforce this; the driver may check it before
/// issuing a multi-block command.
#[must_use]
pub const fn is_block_multiple(len: usize) -> bool {
    len != 0 && len % BLOCK_SIZE == 0
}
