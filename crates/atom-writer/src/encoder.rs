//! Recursive atom to JSON rendering
//!
//! The output is deliberately lossy: an Int and a Long both become a JSON
//! number, String, URI and URID all become JSON strings. Unsupported atoms
//! render as `null` instead of failing the record, and the only failure
//! mode is the sink's overflow flag.
//!
//! | Atom            | Output                                        |
//! |-----------------|-----------------------------------------------|
//! | type 0, size 0  | `null`                                        |
//! | String, URI     | `"text"`                                      |
//! | URID            | `"resolved uri"`                              |
//! | Int, Long       | `-42`                                         |
//! | Float, Double   | `1.500000`                                    |
//! | Bool            | `true` / `false`                              |
//! | Vector          | `[1,2,3]`                                     |
//! | Object          | `{"otype":{"#type":null,"key":value,...}}`    |
//! | Path            | `{"#path":"/some/file"}`                      |
//! | anything else   | `null`                                        |
//!
//! Recursion depth equals container nesting. Containers deeper than the
//! configured limit render as `null`.

use std::fmt::{self, Write};

use tracing::{debug, warn};

use crate::atom::{AtomRef, ObjectRef, VectorRef};
use crate::escape::escape_and_append;
use crate::sink::{Sink, TruncatingBuf};
use crate::types::{AtomKind, AtomTypes};
use crate::urid::{Unmap, Urid};

/// Size of the scratch buffer used for one number
const NUMBER_BUF_SIZE: usize = 64;

/// Renders atoms into a [`Sink`]
pub struct Encoder<'e> {
    sink: &'e mut Sink,
    unmap: &'e dyn Unmap,
    types: &'e AtomTypes,
    max_depth: usize,
}

impl<'e> Encoder<'e> {
    /// Create an encoder writing into `sink`
    pub fn new(
        sink: &'e mut Sink,
        unmap: &'e dyn Unmap,
        types: &'e AtomTypes,
        max_depth: usize,
    ) -> Self {
        Self {
            sink,
            unmap,
            types,
            max_depth,
        }
    }

    /// Render the atom described by `type_urid`, `size` and `body`
    pub fn encode_atom(&mut self, type_urid: Urid, size: u32, body: &[u8]) {
        self.encode(&AtomRef::new(type_urid, size, body));
    }

    /// Render `atom`
    pub fn encode(&mut self, atom: &AtomRef<'_>) {
        self.encode_at(atom, 0);
    }

    /// Append `text` as a quoted, escaped JSON string
    pub fn escaped(&mut self, text: &[u8]) {
        escape_and_append(self.sink, text);
    }

    /// Append `{"name":`
    pub fn begin_object(&mut self, name: &[u8]) {
        self.sink.append(b"{");
        escape_and_append(self.sink, name);
        self.sink.append(b":");
    }

    /// Append `}`
    pub fn end_object(&mut self) {
        self.sink.append(b"}");
    }

    fn encode_at(&mut self, atom: &AtomRef<'_>, depth: usize) {
        if atom.type_urid.is_none() && atom.size == 0 {
            self.sink.append(b"null");
            return;
        }

        match self.types.classify(atom.type_urid) {
            AtomKind::String | AtomKind::Uri => self.escaped(atom.c_str()),
            AtomKind::Urid => match atom.read_u32() {
                Some(urid) => self.escaped_urid(Urid(urid)),
                None => self.null_for(atom, "URID body too short"),
            },
            AtomKind::Int => match atom.read_i32() {
                Some(value) => self.number(format_args!("{value}")),
                None => self.null_for(atom, "Int body too short"),
            },
            AtomKind::Long => match atom.read_i64() {
                Some(value) => self.number(format_args!("{value}")),
                None => self.null_for(atom, "Long body too short"),
            },
            AtomKind::Float => match atom.read_f32() {
                Some(value) => self.fixed(f64::from(value)),
                None => self.null_for(atom, "Float body too short"),
            },
            AtomKind::Double => match atom.read_f64() {
                Some(value) => self.fixed(value),
                None => self.null_for(atom, "Double body too short"),
            },
            AtomKind::Bool => match atom.read_i32() {
                Some(0) => self.sink.append(b"false"),
                Some(_) => self.sink.append(b"true"),
                None => self.null_for(atom, "Bool body too short"),
            },
            AtomKind::Vector => {
                if self.depth_exceeded(atom, depth) {
                    return;
                }
                match VectorRef::new(atom) {
                    Some(vector) => self.vector(&vector, depth),
                    None => self.null_for(atom, "Vector header missing"),
                }
            }
            AtomKind::Object => {
                if self.depth_exceeded(atom, depth) {
                    return;
                }
                match ObjectRef::new(atom) {
                    Some(object) => self.object(atom.type_urid, &object, depth),
                    None => self.null_for(atom, "Object header missing"),
                }
            }
            AtomKind::Path => {
                self.begin_object(b"#path");
                self.escaped(atom.c_str());
                self.end_object();
            }
            AtomKind::Tuple
            | AtomKind::Sequence
            | AtomKind::Literal
            | AtomKind::Chunk
            | AtomKind::Midi
            | AtomKind::Unknown => self.sink.append(b"null"),
        }
    }

    fn vector(&mut self, vector: &VectorRef<'_>, depth: usize) {
        if vector.child_size == 0 {
            debug!(child_type = %vector.child_type, "vector with zero stride");
        }
        self.sink.append(b"[");
        for (index, element) in vector.elements().enumerate() {
            if index > 0 {
                self.sink.append(b",");
            }
            self.encode_at(&element, depth + 1);
        }
        self.sink.append(b"]");
    }

    fn object(&mut self, type_urid: Urid, object: &ObjectRef<'_>, depth: usize) {
        let otype = self.resolve(object.otype);
        self.begin_object(otype);
        self.sink.append(b"{");

        if self.types.is_blank(type_urid, object.id) {
            self.sink.append(b"\"#type\":null");
        } else {
            self.sink.append(b"\"#type\":");
            self.escaped_urid(object.id);
        }

        for property in object.properties() {
            let key = self.resolve(property.key);
            self.sink.append(b",");
            escape_and_append(self.sink, key);
            self.sink.append(b":");
            self.encode_at(&property.value, depth + 1);
        }

        self.sink.append(b"}");
        self.end_object();
    }

    /// Resolve `urid`, an unknown one resolving to the empty string
    fn resolve(&self, urid: Urid) -> &'e [u8] {
        let unmap = self.unmap;
        unmap.unmap(urid).map_or(&[][..], str::as_bytes)
    }

    fn escaped_urid(&mut self, urid: Urid) {
        let name = self.resolve(urid);
        escape_and_append(self.sink, name);
    }

    fn depth_exceeded(&mut self, atom: &AtomRef<'_>, depth: usize) -> bool {
        if depth < self.max_depth {
            return false;
        }
        warn!(
            type_urid = %atom.type_urid,
            max_depth = self.max_depth,
            "atom nesting exceeds depth limit, rendering null"
        );
        self.sink.append(b"null");
        true
    }

    fn null_for(&mut self, atom: &AtomRef<'_>, reason: &str) {
        debug!(
            type_urid = %atom.type_urid,
            size = atom.size,
            available = atom.body.len(),
            "{reason}, rendering null"
        );
        self.sink.append(b"null");
    }

    /// Format a number through a fixed stack buffer
    ///
    /// Text beyond the buffer is cut off, as `snprintf` would.
    fn number(&mut self, args: fmt::Arguments<'_>) {
        let mut storage = [0u8; NUMBER_BUF_SIZE];
        let mut buf = TruncatingBuf::new(&mut storage);
        // TruncatingBuf never fails
        let _ = buf.write_fmt(args);
        self.sink.append(buf.as_bytes());
    }

    /// Six fixed decimals, libc spellings for non-finite values
    fn fixed(&mut self, value: f64) {
        if value.is_nan() {
            let text: &[u8] = if value.is_sign_negative() { b"-nan" } else { b"nan" };
            self.sink.append(text);
        } else if value.is_infinite() {
            let text: &[u8] = if value < 0.0 { b"-inf" } else { b"inf" };
            self.sink.append(text);
        } else {
            self.number(format_args!("{value:.6}"));
        }
    }
}
