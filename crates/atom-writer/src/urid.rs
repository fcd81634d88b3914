//! URID mapping
//!
//! A URID is a small integer standing in for a URI. Hosts own the mapping;
//! the writer only ever looks names up through [`Unmap`].

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

/// Integer handle for a URI; `0` means "no URID"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Urid(pub u32);

impl Urid {
    /// The reserved "no URID" value
    pub const NONE: Self = Self(0);

    /// Raw integer value
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this is the reserved zero URID
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Urid {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Urid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URI to URID mapping service
pub trait Map {
    /// Return the URID for `uri`, assigning one if needed
    fn map(&mut self, uri: &str) -> Urid;
}

/// URID to URI resolution service
///
/// Implementations are borrowed by the writer and must outlive it.
pub trait Unmap {
    /// Resolve `urid` to its URI, or `None` if it was never mapped
    fn unmap(&self, urid: Urid) -> Option<&str>;
}

impl<S: BuildHasher> Unmap for HashMap<Urid, String, S> {
    fn unmap(&self, urid: Urid) -> Option<&str> {
        self.get(&urid).map(String::as_str)
    }
}

/// In-memory bidirectional URID map
///
/// URIDs are assigned sequentially starting at 1.
#[derive(Debug, Clone, Default)]
pub struct UridMap {
    uris: Vec<String>,
    ids: HashMap<String, Urid>,
}

impl UridMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an already-mapped URI without assigning
    pub fn get(&self, uri: &str) -> Option<Urid> {
        self.ids.get(uri).copied()
    }

    /// Number of mapped URIs
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    /// Whether nothing has been mapped
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}

impl Map for UridMap {
    fn map(&mut self, uri: &str) -> Urid {
        if let Some(&urid) = self.ids.get(uri) {
            return urid;
        }
        self.uris.push(uri.to_string());
        let urid = Urid(self.uris.len() as u32);
        self.ids.insert(uri.to_string(), urid);
        urid
    }
}

impl Unmap for UridMap {
    fn unmap(&self, urid: Urid) -> Option<&str> {
        let index = (urid.0 as usize).checked_sub(1)?;
        self.uris.get(index).map(String::as_str)
    }
}
