//! Atom type vocabulary
//!
//! Atom type tags are URIDs, so their meaning depends on the host's map.
//! [`AtomTypes`] records the URIDs of the well-known types once, and
//! [`AtomTypes::classify`] turns a runtime tag into an [`AtomKind`].

use crate::urid::{Map, Urid};

/// Well-known atom type URIs
pub mod uris {
    /// Atom extension namespace
    pub const ATOM_PREFIX: &str = "http://lv2plug.in/ns/ext/atom#";

    /// Anonymous object (deprecated in favour of `Object` with id 0)
    pub const BLANK: &str = "http://lv2plug.in/ns/ext/atom#Blank";
    /// Boolean stored as a 32-bit integer
    pub const BOOL: &str = "http://lv2plug.in/ns/ext/atom#Bool";
    /// Opaque byte chunk
    pub const CHUNK: &str = "http://lv2plug.in/ns/ext/atom#Chunk";
    /// 64-bit float
    pub const DOUBLE: &str = "http://lv2plug.in/ns/ext/atom#Double";
    /// Timestamped event inside a sequence
    pub const EVENT: &str = "http://lv2plug.in/ns/ext/atom#Event";
    /// 32-bit float
    pub const FLOAT: &str = "http://lv2plug.in/ns/ext/atom#Float";
    /// 32-bit signed integer
    pub const INT: &str = "http://lv2plug.in/ns/ext/atom#Int";
    /// String with datatype or language
    pub const LITERAL: &str = "http://lv2plug.in/ns/ext/atom#Literal";
    /// 64-bit signed integer
    pub const LONG: &str = "http://lv2plug.in/ns/ext/atom#Long";
    /// Object with id and type
    pub const OBJECT: &str = "http://lv2plug.in/ns/ext/atom#Object";
    /// Filesystem path, NUL-terminated
    pub const PATH: &str = "http://lv2plug.in/ns/ext/atom#Path";
    /// Object property
    pub const PROPERTY: &str = "http://lv2plug.in/ns/ext/atom#Property";
    /// Named object (deprecated in favour of `Object`)
    pub const RESOURCE: &str = "http://lv2plug.in/ns/ext/atom#Resource";
    /// Sequence of timestamped events
    pub const SEQUENCE: &str = "http://lv2plug.in/ns/ext/atom#Sequence";
    /// NUL-terminated UTF-8 string
    pub const STRING: &str = "http://lv2plug.in/ns/ext/atom#String";
    /// Sequence of heterogeneous atoms
    pub const TUPLE: &str = "http://lv2plug.in/ns/ext/atom#Tuple";
    /// URI string, NUL-terminated
    pub const URI: &str = "http://lv2plug.in/ns/ext/atom#URI";
    /// Mapped URI as a 32-bit id
    pub const URID: &str = "http://lv2plug.in/ns/ext/atom#URID";
    /// Homogeneous array of fixed-size elements
    pub const VECTOR: &str = "http://lv2plug.in/ns/ext/atom#Vector";

    /// MIDI event type
    pub const MIDI_EVENT: &str = "http://lv2plug.in/ns/ext/midi#MidiEvent";
}

/// Rendering category of an atom type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    /// NUL-terminated UTF-8 text
    String,
    /// NUL-terminated URI text
    Uri,
    /// 32-bit URID resolved through the unmap service
    Urid,
    /// Signed 32-bit integer
    Int,
    /// Signed 64-bit integer
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// 32-bit integer truth value
    Bool,
    /// Uniform-stride array of same-typed children
    Vector,
    /// Object, Blank or Resource with key/value properties
    Object,
    /// NUL-terminated file path
    Path,
    /// Tuple of heterogeneous atoms (rendered as `null`)
    Tuple,
    /// Timestamped event sequence (rendered as `null`)
    Sequence,
    /// Language- or datatype-tagged literal (rendered as `null`)
    Literal,
    /// Opaque binary chunk (rendered as `null`)
    Chunk,
    /// MIDI event (rendered as `null`)
    Midi,
    /// Anything not mapped to a known type
    Unknown,
}

/// URIDs of the well-known atom types as mapped by one host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtomTypes {
    /// `atom:Blank`
    pub blank: Urid,
    /// `atom:Bool`
    pub bool: Urid,
    /// `atom:Chunk`
    pub chunk: Urid,
    /// `atom:Double`
    pub double: Urid,
    /// `atom:Event`
    pub event: Urid,
    /// `atom:Float`
    pub float: Urid,
    /// `atom:Int`
    pub int: Urid,
    /// `atom:Literal`
    pub literal: Urid,
    /// `atom:Long`
    pub long: Urid,
    /// `atom:Object`
    pub object: Urid,
    /// `atom:Path`
    pub path: Urid,
    /// `atom:Property`
    pub property: Urid,
    /// `atom:Resource`
    pub resource: Urid,
    /// `atom:Sequence`
    pub sequence: Urid,
    /// `atom:String`
    pub string: Urid,
    /// `atom:Tuple`
    pub tuple: Urid,
    /// `atom:URI`
    pub uri: Urid,
    /// `atom:URID`
    pub urid: Urid,
    /// `atom:Vector`
    pub vector: Urid,
    /// `midi:MidiEvent`
    pub midi_event: Urid,
}

impl AtomTypes {
    /// Map every well-known type URI through `map`
    pub fn new<M: Map + ?Sized>(map: &mut M) -> Self {
        Self {
            blank: map.map(uris::BLANK),
            bool: map.map(uris::BOOL),
            chunk: map.map(uris::CHUNK),
            double: map.map(uris::DOUBLE),
            event: map.map(uris::EVENT),
            float: map.map(uris::FLOAT),
            int: map.map(uris::INT),
            literal: map.map(uris::LITERAL),
            long: map.map(uris::LONG),
            object: map.map(uris::OBJECT),
            path: map.map(uris::PATH),
            property: map.map(uris::PROPERTY),
            resource: map.map(uris::RESOURCE),
            sequence: map.map(uris::SEQUENCE),
            string: map.map(uris::STRING),
            tuple: map.map(uris::TUPLE),
            uri: map.map(uris::URI),
            urid: map.map(uris::URID),
            vector: map.map(uris::VECTOR),
            midi_event: map.map(uris::MIDI_EVENT),
        }
    }

    /// Whether `type_urid` carries an object body
    pub fn is_object_type(&self, type_urid: Urid) -> bool {
        !type_urid.is_none()
            && (type_urid == self.object || type_urid == self.blank || type_urid == self.resource)
    }

    /// Whether an object of `type_urid` with instance `id` is anonymous
    pub fn is_blank(&self, type_urid: Urid, id: Urid) -> bool {
        type_urid == self.blank || (type_urid == self.object && id.is_none())
    }

    /// Classify a runtime type tag
    ///
    /// The reserved zero URID and anything the host never mapped classify
    /// as [`AtomKind::Unknown`].
    pub fn classify(&self, type_urid: Urid) -> AtomKind {
        if type_urid.is_none() {
            return AtomKind::Unknown;
        }
        if self.is_object_type(type_urid) {
            return AtomKind::Object;
        }
        let table = [
            (self.string, AtomKind::String),
            (self.urid, AtomKind::Urid),
            (self.uri, AtomKind::Uri),
            (self.int, AtomKind::Int),
            (self.long, AtomKind::Long),
            (self.float, AtomKind::Float),
            (self.double, AtomKind::Double),
            (self.bool, AtomKind::Bool),
            (self.vector, AtomKind::Vector),
            (self.path, AtomKind::Path),
            (self.tuple, AtomKind::Tuple),
            (self.sequence, AtomKind::Sequence),
            (self.literal, AtomKind::Literal),
            (self.chunk, AtomKind::Chunk),
            (self.midi_event, AtomKind::Midi),
        ];
        table
            .iter()
            .find(|(urid, _)| *urid == type_urid)
            .map_or(AtomKind::Unknown, |&(_, kind)| kind)
    }
}
