//! Error types for atom rendering, forging and layout parsing
//!
//! The encoder itself never returns an error: malformed or unsupported atoms
//! degrade to `null` output and the only rendering failure is
//! [`AtomWriterError::Overflow`].

use thiserror::Error;

/// Failure reported by [`AtomWriter`](crate::AtomWriter) record methods
///
/// Rendering an atom can only fail with `Overflow`. The other variants come
/// from [`AtomWriter::format_forged`](crate::AtomWriter::format_forged),
/// which builds the atom before rendering it.
#[derive(Debug, Error)]
pub enum AtomWriterError {
    /// The record did not fit into the output buffer
    #[error("record overflowed the {capacity} byte output buffer")]
    Overflow {
        /// Capacity of the sink, including the reserved terminator byte
        capacity: usize,
    },

    /// Building the atom failed
    #[error("forge error: {0}")]
    Forge(#[from] ForgeError),

    /// The forged bytes do not hold a complete atom
    #[error("atom error: {0}")]
    Atom(#[from] AtomError),
}

/// Errors raised while building atoms with [`AtomForge`](crate::AtomForge)
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Scratch region is too small for the next write
    #[error("forge overflow: need {needed} bytes, {available} available")]
    Overflow {
        /// Bytes required by the write
        needed: usize,
        /// Bytes left in the scratch region
        available: usize,
    },

    /// `end` was called with a frame that is not the innermost open one
    #[error("frame at offset {0} is not the innermost open frame")]
    FrameMismatch(usize),

    /// Atom body exceeds the 32-bit size field
    #[error("atom body of {0} bytes does not fit a 32-bit size field")]
    BodyTooLarge(usize),

    /// Binary encoding error
    #[error("binary encoding error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Errors raised while reading atom layout from raw bytes
#[derive(Debug, Error)]
pub enum AtomError {
    /// Buffer ends before the atom does
    #[error("truncated atom: need {needed} bytes, {available} available")]
    Truncated {
        /// Bytes required by the header's size field
        needed: usize,
        /// Bytes actually present
        available: usize,
    },

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Errors raised by [`WriterConfig::validate`](crate::WriterConfig::validate)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Output capacity cannot hold even an empty record
    #[error("capacity {capacity} is below the minimum of {minimum} bytes")]
    CapacityTooSmall {
        /// Configured capacity
        capacity: usize,
        /// Smallest accepted capacity
        minimum: usize,
    },

    /// Header buffer has no room for text after the terminator
    #[error("header limit {0} must be at least 2 bytes")]
    HeaderLimitTooSmall(usize),

    /// Depth limit of zero would reject every atom
    #[error("max depth must be non-zero")]
    ZeroDepth,
}

/// Result type for forge operations
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Result type for atom layout parsing
pub type AtomResult<T> = Result<T, AtomError>;
