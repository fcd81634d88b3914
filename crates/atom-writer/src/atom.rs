//! Atom memory layout
//!
//! Atoms are stored native-endian as an 8-byte header followed by the body:
//!
//! ```text
//! Atom:      size:u32 | type:u32 | body[size] | pad to 8
//! Vector:    child_size:u32 | child_type:u32 | child bodies at child_size stride
//! Object:    id:u32 | otype:u32 | Property...
//! Property:  key:u32 | context:u32 | value Atom | pad to 8
//! ```
//!
//! The views in this module borrow the producer's bytes and never read past
//! the slice they are given. A size field larger than the slice is clamped
//! to the bytes actually present.

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};

use crate::error::{AtomError, AtomResult};
use crate::urid::Urid;

/// Size of the atom header
pub const ATOM_HEADER_SIZE: usize = 8;

/// Size of the vector body header
pub const VECTOR_BODY_HEADER_SIZE: usize = 8;

/// Size of the object body header
pub const OBJECT_BODY_HEADER_SIZE: usize = 8;

/// Size of a property header including the value's atom header
pub const PROPERTY_HEADER_SIZE: usize = 16;

/// Round `size` up to the 8-byte atom alignment
pub const fn pad_size(size: usize) -> usize {
    (size + 7) & !7
}

/// Atom header
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
pub struct AtomHeader {
    /// Body size in bytes, excluding this header
    pub size: u32,
    /// Type URID
    pub type_urid: u32,
}

/// Header at the start of a vector body
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
pub struct VectorBodyHeader {
    /// Size of each element body
    pub child_size: u32,
    /// Type URID shared by every element
    pub child_type: u32,
}

/// Header at the start of an object body
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
pub struct ObjectBodyHeader {
    /// Instance URID, `0` for anonymous objects
    pub id: u32,
    /// Object type URID
    pub otype: u32,
}

/// Header of one object property, followed by the value body
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
pub struct PropertyHeader {
    /// Key URID
    pub key: u32,
    /// Context URID, usually `0`
    pub context: u32,
    /// Header of the value atom
    pub value: AtomHeader,
}

/// Fixed-size native-endian layout
pub trait FixedLayout: Sized {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Decode from the start of `bytes`, `None` if too short
    fn parse_prefix(bytes: &[u8]) -> Option<Self>;

    /// Encode into the start of `out`
    fn write_prefix(&self, out: &mut [u8]) -> binrw::BinResult<()>;
}

macro_rules! fixed_layout {
    ($ty:ty, $size:expr) => {
        impl FixedLayout for $ty {
            const SIZE: usize = $size;

            fn parse_prefix(bytes: &[u8]) -> Option<Self> {
                let bytes = bytes.get(..Self::SIZE)?;
                Self::read_ne(&mut Cursor::new(bytes)).ok()
            }

            fn write_prefix(&self, out: &mut [u8]) -> binrw::BinResult<()> {
                self.write_ne(&mut Cursor::new(out))
            }
        }
    };
}

fixed_layout!(AtomHeader, ATOM_HEADER_SIZE);
fixed_layout!(VectorBodyHeader, VECTOR_BODY_HEADER_SIZE);
fixed_layout!(ObjectBodyHeader, OBJECT_BODY_HEADER_SIZE);
fixed_layout!(PropertyHeader, PROPERTY_HEADER_SIZE);

/// Borrowed atom: type tag, declared size and body bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomRef<'a> {
    /// Type URID
    pub type_urid: Urid,
    /// Declared body size
    pub size: u32,
    /// Body bytes, possibly shorter than `size` for malformed input
    pub body: &'a [u8],
}

impl<'a> AtomRef<'a> {
    /// Wrap an already-split atom
    pub const fn new(type_urid: Urid, size: u32, body: &'a [u8]) -> Self {
        Self {
            type_urid,
            size,
            body,
        }
    }

    /// Read the atom at the start of `bytes`
    ///
    /// # Errors
    ///
    /// Returns `AtomError::Truncated` if `bytes` is shorter than the header
    /// or the body its size field declares.
    pub fn parse(bytes: &'a [u8]) -> AtomResult<Self> {
        if bytes.len() < ATOM_HEADER_SIZE {
            return Err(AtomError::Truncated {
                needed: ATOM_HEADER_SIZE,
                available: bytes.len(),
            });
        }
        let header = AtomHeader::read_ne(&mut Cursor::new(&bytes[..ATOM_HEADER_SIZE]))?;
        let needed = ATOM_HEADER_SIZE + header.size as usize;
        let body = bytes
            .get(ATOM_HEADER_SIZE..needed)
            .ok_or(AtomError::Truncated {
                needed,
                available: bytes.len(),
            })?;
        Ok(Self::new(Urid(header.type_urid), header.size, body))
    }

    /// Header plus body, padded to the atom alignment
    pub const fn padded_len(&self) -> usize {
        pad_size(ATOM_HEADER_SIZE + self.size as usize)
    }

    /// The body limited to the declared size
    pub fn declared_body(&self) -> &'a [u8] {
        let end = (self.size as usize).min(self.body.len());
        &self.body[..end]
    }

    /// Body bytes up to the first NUL
    pub fn c_str(&self) -> &'a [u8] {
        let body = self.declared_body();
        let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
        &body[..end]
    }

    /// First four body bytes as `u32`
    pub fn read_u32(&self) -> Option<u32> {
        Some(u32::from_ne_bytes(self.body.get(..4)?.try_into().ok()?))
    }

    /// First four body bytes as `i32`
    pub fn read_i32(&self) -> Option<i32> {
        Some(i32::from_ne_bytes(self.body.get(..4)?.try_into().ok()?))
    }

    /// First eight body bytes as `i64`
    pub fn read_i64(&self) -> Option<i64> {
        Some(i64::from_ne_bytes(self.body.get(..8)?.try_into().ok()?))
    }

    /// First four body bytes as `f32`
    pub fn read_f32(&self) -> Option<f32> {
        Some(f32::from_ne_bytes(self.body.get(..4)?.try_into().ok()?))
    }

    /// First eight body bytes as `f64`
    pub fn read_f64(&self) -> Option<f64> {
        Some(f64::from_ne_bytes(self.body.get(..8)?.try_into().ok()?))
    }
}

/// Vector body view
#[derive(Debug, Clone, Copy)]
pub struct VectorRef<'a> {
    /// Element type URID
    pub child_type: Urid,
    /// Element stride and size
    pub child_size: u32,
    elements: &'a [u8],
}

impl<'a> VectorRef<'a> {
    /// Interpret `atom`'s body as a vector, `None` if the header is missing
    pub fn new(atom: &AtomRef<'a>) -> Option<Self> {
        let header = VectorBodyHeader::parse_prefix(atom.body)?;
        let body = atom.declared_body();
        let elements = body.get(VECTOR_BODY_HEADER_SIZE..).unwrap_or_default();
        Some(Self {
            child_type: Urid(header.child_type),
            child_size: header.child_size,
            elements,
        })
    }

    /// Element bodies in order
    ///
    /// A trailing partial element is yielded short. A zero stride yields
    /// nothing.
    pub fn elements(&self) -> impl Iterator<Item = AtomRef<'a>> + use<'a> {
        let stride = self.child_size as usize;
        let child_type = self.child_type;
        let child_size = self.child_size;
        let elements = if stride == 0 { &[][..] } else { self.elements };
        elements
            .chunks(stride.max(1))
            .map(move |chunk| AtomRef::new(child_type, child_size, chunk))
    }
}

/// One object property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyRef<'a> {
    /// Key URID
    pub key: Urid,
    /// Context URID
    pub context: Urid,
    /// Value atom
    pub value: AtomRef<'a>,
}

/// Object body view
#[derive(Debug, Clone, Copy)]
pub struct ObjectRef<'a> {
    /// Instance URID, zero when anonymous
    pub id: Urid,
    /// Object type URID
    pub otype: Urid,
    properties: &'a [u8],
}

impl<'a> ObjectRef<'a> {
    /// Interpret `atom`'s body as an object, `None` if the header is missing
    pub fn new(atom: &AtomRef<'a>) -> Option<Self> {
        let header = ObjectBodyHeader::parse_prefix(atom.body)?;
        let body = atom.declared_body();
        let properties = body.get(OBJECT_BODY_HEADER_SIZE..).unwrap_or_default();
        Some(Self {
            id: Urid(header.id),
            otype: Urid(header.otype),
            properties,
        })
    }

    /// Properties in stored order
    pub fn properties(&self) -> Properties<'a> {
        Properties {
            bytes: self.properties,
            offset: 0,
        }
    }
}

/// Iterator over the properties of an object body
#[derive(Debug, Clone)]
pub struct Properties<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for Properties<'a> {
    type Item = PropertyRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.bytes.get(self.offset..)?;
        let header = PropertyHeader::parse_prefix(rest)?;
        let value_start = PROPERTY_HEADER_SIZE;
        let value_end = value_start
            .saturating_add(header.value.size as usize)
            .min(rest.len());
        let body = &rest[value_start..value_end];

        self.offset = self.offset.saturating_add(pad_size(
            PROPERTY_HEADER_SIZE.saturating_add(header.value.size as usize),
        ));

        Some(PropertyRef {
            key: Urid(header.key),
            context: Urid(header.context),
            value: AtomRef::new(Urid(header.value.type_urid), header.value.size, body),
        })
    }
}
