//! Record writer
//!
//! An [`AtomWriter`] turns one atom into one newline-terminated line:
//!
//! ```text
//! atom <instance> <symbol> {"<symbol>":<json>}\n
//! ```
//!
//! The writer is created once per session and reused; every
//! [`AtomWriter::format_record`] call starts from an empty buffer, so each
//! returned line is independent of the previous one.
//!
//! # Example
//!
//! ```
//! use atom_writer::{AtomTypes, AtomWriter, UridMap, WriterConfig};
//!
//! let mut map = UridMap::new();
//! let types = AtomTypes::new(&mut map);
//! let mut writer = AtomWriter::new(&map, types, WriterConfig::default())
//!     .expect("valid configuration");
//!
//! let line = writer
//!     .format_record(3, "gain", types.int, 4, &10i32.to_ne_bytes())
//!     .expect("fits");
//! assert_eq!(line, b"atom 3 gain {\"gain\":10}\n");
//! ```

use std::fmt::Write;

use tracing::debug;

use crate::atom::AtomRef;
use crate::config::WriterConfig;
use crate::encoder::Encoder;
use crate::error::{AtomWriterError, ConfigError, ForgeResult};
use crate::forge::AtomForge;
use crate::sink::{Sink, TruncatingBuf};
use crate::types::AtomTypes;
use crate::urid::{Unmap, Urid};

/// Output buffers, kept apart from the forge region so both can be
/// borrowed at once
#[derive(Debug)]
struct Output {
    sink: Sink,
    header: Box<[u8]>,
}

/// Renders atoms as line-oriented JSON records
///
/// Holds a borrowed [`Unmap`] for its whole lifetime. The resolver must be
/// `Sync` so a writer built on a setup thread can be moved to the thread
/// that produces records. Access must be exclusive, which `&mut self` on
/// every record method enforces.
pub struct AtomWriter<'a> {
    output: Output,
    unmap: &'a (dyn Unmap + Sync),
    types: AtomTypes,
    config: WriterConfig,
    forge_buf: Box<[u8]>,
}

impl<'a> AtomWriter<'a> {
    /// Bind a writer to `unmap` and allocate its buffers
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` fails [`WriterConfig::validate`].
    pub fn new(
        unmap: &'a (dyn Unmap + Sync),
        types: AtomTypes,
        config: WriterConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            output: Output {
                sink: Sink::new(config.capacity),
                header: vec![0u8; config.header_limit].into_boxed_slice(),
            },
            unmap,
            types,
            config,
            forge_buf: vec![0u8; config.forge_capacity].into_boxed_slice(),
        })
    }

    /// Write one record for the atom `(type_urid, size, body)`
    ///
    /// The buffer is cleared first. On success the returned slice is the
    /// complete line including its trailing newline.
    pub fn format_record(
        &mut self,
        instance: i32,
        symbol: &str,
        type_urid: Urid,
        size: u32,
        body: &[u8],
    ) -> Result<&[u8], AtomWriterError> {
        let atom = AtomRef::new(type_urid, size, body);
        write_record(
            &mut self.output,
            self.unmap,
            &self.types,
            self.config.max_depth,
            instance,
            symbol,
            &atom,
        )?;
        Ok(self.output.sink.as_bytes())
    }

    /// Write one record for an already split atom
    pub fn format_atom(
        &mut self,
        instance: i32,
        symbol: &str,
        atom: &AtomRef<'_>,
    ) -> Result<&[u8], AtomWriterError> {
        self.format_record(instance, symbol, atom.type_urid, atom.size, atom.body)
    }

    /// Build an atom in the forge region with `build`, then write its record
    ///
    /// The first atom written by `build` is the one rendered.
    pub fn format_forged<F, R>(
        &mut self,
        instance: i32,
        symbol: &str,
        build: F,
    ) -> Result<&[u8], AtomWriterError>
    where
        F: FnOnce(&mut AtomForge<'_>) -> ForgeResult<R>,
    {
        let len = {
            let mut forge = AtomForge::new(&mut self.forge_buf, self.types);
            build(&mut forge)?;
            forge.len()
        };
        let atom = AtomRef::parse(&self.forge_buf[..len])?;
        write_record(
            &mut self.output,
            self.unmap,
            &self.types,
            self.config.max_depth,
            instance,
            symbol,
            &atom,
        )?;
        Ok(self.output.sink.as_bytes())
    }

    /// Append the JSON rendering of one atom without clearing the buffer
    ///
    /// Overflow is reported through [`AtomWriter::is_overflowed`].
    pub fn encode_atom(&mut self, type_urid: Urid, size: u32, body: &[u8]) {
        Encoder::new(
            &mut self.output.sink,
            self.unmap,
            &self.types,
            self.config.max_depth,
        )
        .encode_atom(type_urid, size, body);
    }

    /// Forge over the writer's scratch region, starting empty
    pub fn forge(&mut self) -> AtomForge<'_> {
        AtomForge::new(&mut self.forge_buf, self.types)
    }

    /// Contents of the output buffer
    pub fn line(&self) -> &[u8] {
        self.output.sink.as_bytes()
    }

    /// Output buffer
    pub const fn sink(&self) -> &Sink {
        &self.output.sink
    }

    /// Whether the output buffer has overflowed since the last reset
    pub const fn is_overflowed(&self) -> bool {
        self.output.sink.is_overflowed()
    }

    /// Clear the output buffer
    pub fn reset(&mut self) {
        self.output.sink.reset();
    }

    /// Atom type vocabulary
    pub const fn types(&self) -> &AtomTypes {
        &self.types
    }

    /// Active configuration
    pub const fn config(&self) -> &WriterConfig {
        &self.config
    }
}

fn write_record(
    output: &mut Output,
    unmap: &dyn Unmap,
    types: &AtomTypes,
    max_depth: usize,
    instance: i32,
    symbol: &str,
    atom: &AtomRef<'_>,
) -> Result<(), AtomWriterError> {
    output.sink.reset();

    let mut header = TruncatingBuf::new(&mut output.header);
    // TruncatingBuf never fails
    let _ = write!(header, "atom {instance} {symbol} ");
    output.sink.append(header.as_bytes());

    let mut encoder = Encoder::new(&mut output.sink, unmap, types, max_depth);
    encoder.begin_object(symbol.as_bytes());
    encoder.encode(atom);
    encoder.end_object();
    output.sink.append(b"\n");

    if output.sink.is_overflowed() {
        debug!(
            instance,
            symbol,
            capacity = output.sink.capacity(),
            "atom record overflowed output buffer"
        );
        return Err(AtomWriterError::Overflow {
            capacity: output.sink.capacity(),
        });
    }
    Ok(())
}
