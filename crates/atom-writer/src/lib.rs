//! Bounded rendering of LV2 atoms as line-oriented JSON records
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary layout
#![allow(clippy::doc_markdown)] // LV2 terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
//! Real-time audio hosts exchange plugin state as atoms: small
//! self-describing binary values tagged with a URID type. This crate turns
//! one atom into one text line a GUI can parse as JSON, without allocating
//! and without ever writing past a fixed-size buffer.
//!
//! # Components
//!
//! - **Sink**: fixed-capacity output buffer with sticky overflow
//! - **Encoder**: recursive atom to JSON rendering with a depth limit
//! - **Writer**: one `atom <instance> <symbol> {...}\n` record per call
//! - **Forge**: bounded atom builder over a scratch region
//! - **URID map**: in-memory [`Map`]/[`Unmap`] implementation
//!
//! # Example
//!
//! ```
//! use atom_writer::{AtomTypes, AtomWriter, Map, UridMap, WriterConfig};
//!
//! let mut map = UridMap::new();
//! let types = AtomTypes::new(&mut map);
//! let foo = map.map("Foo");
//! let bar = map.map("bar");
//!
//! let mut writer = AtomWriter::new(&map, types, WriterConfig::default())
//!     .expect("valid configuration");
//!
//! let line = writer
//!     .format_forged(3, "state", |forge| {
//!         let frame = forge.begin_object(0, foo.get())?;
//!         forge.key(bar.get())?;
//!         forge.int(7)?;
//!         forge.end(frame)
//!     })
//!     .expect("fits");
//!
//! assert_eq!(
//!     line,
//!     b"atom 3 state {\"state\":{\"Foo\":{\"#type\":null,\"bar\":7}}}\n"
//! );
//! ```
//!
//! # Output format
//!
//! The JSON is lossy and not meant to be turned back into atoms. Only `"`
//! and `\` are escaped inside strings; control characters pass through.
//! Atom types without a rendering (tuples, sequences, MIDI, chunks,
//! literals, unknown URIDs) become `null` so one odd value never fails a
//! whole record.
//!
//! # Trust boundary
//!
//! Bodies are borrowed slices and are never read past their end, but sizes
//! and strides inside them are trusted as far as the slice allows. Nesting
//! is bounded by [`WriterConfig::max_depth`].

pub mod atom;
pub mod config;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod forge;
pub mod sink;
pub mod types;
pub mod urid;
pub mod writer;

pub use atom::{AtomHeader, AtomRef, ObjectRef, PropertyRef, VectorRef};
pub use config::WriterConfig;
pub use encoder::Encoder;
pub use error::{AtomError, AtomWriterError, ConfigError, ForgeError};
pub use escape::escape_and_append;
pub use forge::{AtomForge, Frame};
pub use sink::Sink;
pub use types::{AtomKind, AtomTypes};
pub use urid::{Map, Unmap, Urid, UridMap};
pub use writer::AtomWriter;
