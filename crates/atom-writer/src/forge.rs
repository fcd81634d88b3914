//! Bounded atom builder
//!
//! [`AtomForge`] lays atoms out in a caller-provided buffer using the format
//! described in [`crate::atom`]. It never grows the buffer: a write that does
//! not fit fails with [`ForgeError::Overflow`] and leaves the already
//! written prefix untouched.
//!
//! # Example
//!
//! ```
//! use atom_writer::{AtomForge, AtomRef, AtomTypes, Map, UridMap};
//!
//! let mut map = UridMap::new();
//! let types = AtomTypes::new(&mut map);
//! let note = map.map("urn:example:Note");
//! let pitch = map.map("urn:example:pitch");
//!
//! let mut buf = [0u8; 128];
//! let mut forge = AtomForge::new(&mut buf, types);
//! let frame = forge.begin_object(0, note.get()).expect("fits");
//! forge.key(pitch.get()).expect("fits");
//! forge.int(60).expect("fits");
//! forge.end(frame).expect("innermost frame");
//!
//! let atom = AtomRef::parse(forge.finish()).expect("complete atom");
//! assert_eq!(atom.type_urid, types.object);
//! ```

use crate::atom::{
    ATOM_HEADER_SIZE, AtomHeader, FixedLayout, ObjectBodyHeader, VectorBodyHeader, pad_size,
};
use crate::error::{ForgeError, ForgeResult};
use crate::types::AtomTypes;
use crate::urid::Urid;

/// Open container, closed with [`AtomForge::end`]
#[derive(Debug)]
#[must_use = "an open frame must be closed with AtomForge::end"]
pub struct Frame {
    offset: usize,
    parent: Option<usize>,
}

/// Writes atoms into a fixed buffer
#[derive(Debug)]
pub struct AtomForge<'b> {
    buf: &'b mut [u8],
    offset: usize,
    top: Option<usize>,
    types: AtomTypes,
}

impl<'b> AtomForge<'b> {
    /// Start writing at the beginning of `buf`
    pub fn new(buf: &'b mut [u8], types: AtomTypes) -> Self {
        Self {
            buf,
            offset: 0,
            top: None,
            types,
        }
    }

    /// Bytes written so far
    pub const fn len(&self) -> usize {
        self.offset
    }

    /// Whether nothing has been written
    pub const fn is_empty(&self) -> bool {
        self.offset == 0
    }

    /// Written prefix of the buffer
    pub fn bytes(&self) -> &[u8] {
        &self.buf[..self.offset]
    }

    /// Consume the forge, returning the written prefix
    pub fn finish(self) -> &'b [u8] {
        let Self { buf, offset, .. } = self;
        &buf[..offset]
    }

    /// Write an atom with a raw body
    ///
    /// Returns the offset of the atom header.
    pub fn atom(&mut self, type_urid: Urid, body: &[u8]) -> ForgeResult<usize> {
        self.atom_parts(type_urid, &[body])
    }

    /// Write a 32-bit integer atom
    pub fn int(&mut self, value: i32) -> ForgeResult<usize> {
        self.atom(self.types.int, &value.to_ne_bytes())
    }

    /// Write a 64-bit integer atom
    pub fn long(&mut self, value: i64) -> ForgeResult<usize> {
        self.atom(self.types.long, &value.to_ne_bytes())
    }

    /// Write a 32-bit float atom
    pub fn float(&mut self, value: f32) -> ForgeResult<usize> {
        self.atom(self.types.float, &value.to_ne_bytes())
    }

    /// Write a 64-bit float atom
    pub fn double(&mut self, value: f64) -> ForgeResult<usize> {
        self.atom(self.types.double, &value.to_ne_bytes())
    }

    /// Write a boolean atom
    pub fn bool(&mut self, value: bool) -> ForgeResult<usize> {
        self.atom(self.types.bool, &i32::from(value).to_ne_bytes())
    }

    /// Write a URID atom
    pub fn urid(&mut self, value: u32) -> ForgeResult<usize> {
        self.atom(self.types.urid, &value.to_ne_bytes())
    }

    /// Write a NUL-terminated string atom
    pub fn string(&mut self, value: &str) -> ForgeResult<usize> {
        self.atom_parts(self.types.string, &[value.as_bytes(), &[0]])
    }

    /// Write a NUL-terminated URI atom
    pub fn uri(&mut self, value: &str) -> ForgeResult<usize> {
        self.atom_parts(self.types.uri, &[value.as_bytes(), &[0]])
    }

    /// Write a NUL-terminated path atom
    pub fn path(&mut self, value: &str) -> ForgeResult<usize> {
        self.atom_parts(self.types.path, &[value.as_bytes(), &[0]])
    }

    /// Write a vector atom from raw element bodies
    pub fn vector(
        &mut self,
        child_type: Urid,
        child_size: u32,
        elements: &[u8],
    ) -> ForgeResult<usize> {
        let mut header = [0u8; VectorBodyHeader::SIZE];
        VectorBodyHeader {
            child_size,
            child_type: child_type.get(),
        }
        .write_prefix(&mut header)?;
        self.atom_parts(self.types.vector, &[&header, elements])
    }

    /// Write a vector of 32-bit integers
    pub fn int_vector(&mut self, values: &[i32]) -> ForgeResult<usize> {
        self.check(pad_size(
            ATOM_HEADER_SIZE + VectorBodyHeader::SIZE + 4 * values.len(),
        ))?;
        let start = self.begin_atom(self.types.vector)?;
        self.write_layout(&VectorBodyHeader {
            child_size: 4,
            child_type: self.types.int.get(),
        })?;
        for value in values {
            self.write(&value.to_ne_bytes())?;
        }
        self.end_atom(start)?;
        Ok(start)
    }

    /// Open an object atom; `id == 0` makes it anonymous
    pub fn begin_object(&mut self, id: u32, otype: u32) -> ForgeResult<Frame> {
        let object = self.types.object;
        self.begin_frame(object, id, otype)
    }

    /// Open a blank (anonymous) object atom
    pub fn begin_blank(&mut self, otype: u32) -> ForgeResult<Frame> {
        let blank = self.types.blank;
        self.begin_frame(blank, 0, otype)
    }

    /// Write a property key; the next atom written becomes its value
    pub fn key(&mut self, key: u32) -> ForgeResult<()> {
        self.key_with_context(key, 0)
    }

    /// Write a property key with an explicit context URID
    pub fn key_with_context(&mut self, key: u32, context: u32) -> ForgeResult<()> {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&key.to_ne_bytes());
        bytes[4..].copy_from_slice(&context.to_ne_bytes());
        self.write(&bytes)
    }

    /// Close the innermost open frame, fixing up its size
    pub fn end(&mut self, frame: Frame) -> ForgeResult<()> {
        if self.top != Some(frame.offset) {
            return Err(ForgeError::FrameMismatch(frame.offset));
        }
        self.end_atom(frame.offset)?;
        self.top = frame.parent;
        Ok(())
    }

    fn begin_frame(&mut self, type_urid: Urid, id: u32, otype: u32) -> ForgeResult<Frame> {
        let offset = self.begin_atom(type_urid)?;
        self.write_layout(&ObjectBodyHeader { id, otype })?;
        let frame = Frame {
            offset,
            parent: self.top,
        };
        self.top = Some(offset);
        Ok(frame)
    }

    fn atom_parts(&mut self, type_urid: Urid, parts: &[&[u8]]) -> ForgeResult<usize> {
        let body_len: usize = parts.iter().map(|p| p.len()).sum();
        let total = pad_size(ATOM_HEADER_SIZE + body_len);
        self.check(total)?;

        let start = self.begin_atom(type_urid)?;
        for part in parts {
            self.write(part)?;
        }
        self.end_atom(start)?;
        Ok(start)
    }

    fn begin_atom(&mut self, type_urid: Urid) -> ForgeResult<usize> {
        let start = self.offset;
        self.write_layout(&AtomHeader {
            size: 0,
            type_urid: type_urid.get(),
        })?;
        Ok(start)
    }

    /// Patch the size of the atom at `start` and pad to alignment
    fn end_atom(&mut self, start: usize) -> ForgeResult<()> {
        let body_len = self.offset - start - ATOM_HEADER_SIZE;
        let size = u32::try_from(body_len).map_err(|_| ForgeError::BodyTooLarge(body_len))?;
        let type_urid = AtomHeader::parse_prefix(&self.buf[start..])
            .map_or(0, |header| header.type_urid);
        AtomHeader { size, type_urid }.write_prefix(&mut self.buf[start..])?;

        let padded = pad_size(self.offset);
        self.check(padded - self.offset)?;
        self.buf[self.offset..padded].fill(0);
        self.offset = padded;
        Ok(())
    }

    fn write_layout<T: FixedLayout>(&mut self, value: &T) -> ForgeResult<()> {
        self.check(T::SIZE)?;
        value.write_prefix(&mut self.buf[self.offset..self.offset + T::SIZE])?;
        self.offset += T::SIZE;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> ForgeResult<()> {
        self.check(bytes.len())?;
        self.buf[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
        Ok(())
    }

    fn check(&self, needed: usize) -> ForgeResult<()> {
        let available = self.buf.len() - self.offset;
        if needed > available {
            return Err(ForgeError::Overflow { needed, available });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::atom::{AtomRef, ObjectRef, VectorRef};
    use crate::urid::{Map, UridMap};

    fn types() -> (UridMap, AtomTypes) {
        let mut map = UridMap::new();
        let types = AtomTypes::new(&mut map);
        (map, types)
    }

    #[test]
    fn test_scalar_layout() {
        let (_, types) = types();
        let mut buf = [0u8; 64];
        let mut forge = AtomForge::new(&mut buf, types);
        forge.int(-42).expect("Test operation should succeed");
        assert_eq!(forge.len(), 16);

        let atom = AtomRef::parse(forge.bytes()).expect("Test operation should succeed");
        assert_eq!(atom.type_urid, types.int);
        assert_eq!(atom.size, 4);
        assert_eq!(atom.read_i32(), Some(-42));
    }

    #[test]
    fn test_string_is_nul_terminated() {
        let (_, types) = types();
        let mut buf = [0u8; 64];
        let mut forge = AtomForge::new(&mut buf, types);
        forge.string("hello").expect("Test operation should succeed");

        let atom = AtomRef::parse(forge.bytes()).expect("Test operation should succeed");
        assert_eq!(atom.size, 6);
        assert_eq!(atom.c_str(), b"hello");
    }

    #[test]
    fn test_int_vector() {
        let (_, types) = types();
        let mut buf = [0u8; 64];
        let mut forge = AtomForge::new(&mut buf, types);
        forge
            .int_vector(&[1, 2, 3])
            .expect("Test operation should succeed");

        let atom = AtomRef::parse(forge.finish()).expect("Test operation should succeed");
        assert_eq!(atom.size, 20);
        let vector = VectorRef::new(&atom).expect("Test operation should succeed");
        assert_eq!(vector.child_type, types.int);
        assert_eq!(vector.elements().count(), 3);
    }

    #[test]
    fn test_nested_objects() {
        let (mut map, types) = types();
        let outer_type = map.map("urn:outer");
        let inner_type = map.map("urn:inner");
        let child = map.map("urn:child");
        let value = map.map("urn:value");

        let mut buf = [0u8; 256];
        let mut forge = AtomForge::new(&mut buf, types);
        let outer = forge
            .begin_object(0, outer_type.get())
            .expect("Test operation should succeed");
        forge.key(child.get()).expect("Test operation should succeed");
        let inner = forge
            .begin_blank(inner_type.get())
            .expect("Test operation should succeed");
        forge.key(value.get()).expect("Test operation should succeed");
        forge.double(0.25).expect("Test operation should succeed");
        forge.end(inner).expect("Test operation should succeed");
        forge.end(outer).expect("Test operation should succeed");

        let atom = AtomRef::parse(forge.finish()).expect("Test operation should succeed");
        let object = ObjectRef::new(&atom).expect("Test operation should succeed");
        assert_eq!(object.otype, outer_type);
        let props: Vec<_> = object.properties().collect();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].key, child);
        assert_eq!(props[0].value.type_urid, types.blank);

        let inner = ObjectRef::new(&props[0].value).expect("Test operation should succeed");
        let inner_props: Vec<_> = inner.properties().collect();
        assert_eq!(inner_props[0].value.read_f64(), Some(0.25));
    }

    #[test]
    fn test_end_rejects_outer_frame() {
        let (_, types) = types();
        let mut buf = [0u8; 128];
        let mut forge = AtomForge::new(&mut buf, types);
        let outer = forge.begin_object(0, 1).expect("Test operation should succeed");
        forge.key(2).expect("Test operation should succeed");
        let _inner = forge.begin_object(0, 3).expect("Test operation should succeed");
        assert!(matches!(forge.end(outer), Err(ForgeError::FrameMismatch(0))));
    }

    #[test]
    fn test_overflow_leaves_prefix() {
        let (_, types) = types();
        let mut buf = [0u8; 20];
        let mut forge = AtomForge::new(&mut buf, types);
        forge.int(1).expect("Test operation should succeed");
        let result = forge.string("too long for the rest");
        assert!(matches!(result, Err(ForgeError::Overflow { .. })));
        assert_eq!(forge.len(), 16);
    }
}
