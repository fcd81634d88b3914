//! Writer configuration
//!
//! All buffers are sized once, when [`AtomWriter`](crate::AtomWriter) is
//! constructed. Nothing is allocated while a record is being produced.
//!
//! # Example
//!
//! ```
//! use atom_writer::WriterConfig;
//!
//! let config = WriterConfig::default()
//!     .with_capacity(16 * 1024)
//!     .with_max_depth(16);
//! config.validate().expect("valid configuration");
//! assert_eq!(config.header_limit, 256);
//! ```

use crate::error::ConfigError;

/// Default output buffer size in bytes
pub const DEFAULT_CAPACITY: usize = 8192;

/// Default size of the plain-text header buffer
pub const DEFAULT_HEADER_LIMIT: usize = 256;

/// Default size of the forge scratch region
pub const DEFAULT_FORGE_CAPACITY: usize = 1024;

/// Default maximum nesting of vectors and objects
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Smallest output capacity accepted by [`WriterConfig::validate`]
///
/// Room for `atom 0 x {"x":null}\n` plus the terminator.
pub const MIN_CAPACITY: usize = 32;

/// Sizes and limits for an [`AtomWriter`](crate::AtomWriter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WriterConfig {
    /// Output buffer size, one byte of which is reserved for the terminator
    pub capacity: usize,
    /// Header buffer size; the header is truncated to `header_limit - 1` bytes
    pub header_limit: usize,
    /// Forge scratch region size
    pub forge_capacity: usize,
    /// Vectors and objects nested deeper than this render as `null`
    pub max_depth: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            header_limit: DEFAULT_HEADER_LIMIT,
            forge_capacity: DEFAULT_FORGE_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl WriterConfig {
    /// Set the output buffer size
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the header buffer size
    #[must_use]
    pub const fn with_header_limit(mut self, header_limit: usize) -> Self {
        self.header_limit = header_limit;
        self
    }

    /// Set the forge scratch region size
    #[must_use]
    pub const fn with_forge_capacity(mut self, forge_capacity: usize) -> Self {
        self.forge_capacity = forge_capacity;
        self
    }

    /// Set the maximum nesting depth
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `capacity` is below [`MIN_CAPACITY`]
    /// - `header_limit` is below 2
    /// - `max_depth` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity < MIN_CAPACITY {
            return Err(ConfigError::CapacityTooSmall {
                capacity: self.capacity,
                minimum: MIN_CAPACITY,
            });
        }
        if self.header_limit < 2 {
            return Err(ConfigError::HeaderLimitTooSmall(self.header_limit));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}
