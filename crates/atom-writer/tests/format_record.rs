#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! End-to-end tests for record formatting
//!
//! Lines are checked byte-for-byte and, where the atom has a JSON-safe
//! rendering, parsed back with serde_json the way a GUI consumer would.

use atom_writer::{
    AtomForge, AtomRef, AtomTypes, AtomWriter, AtomWriterError, Map, Urid, UridMap, WriterConfig,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

struct Host {
    map: UridMap,
    types: AtomTypes,
}

impl Host {
    fn new() -> Self {
        let mut map = UridMap::new();
        let types = AtomTypes::new(&mut map);
        Self { map, types }
    }

    fn urid(&mut self, uri: &str) -> u32 {
        self.map.map(uri).get()
    }

    fn writer(&self, config: WriterConfig) -> AtomWriter<'_> {
        AtomWriter::new(&self.map, self.types, config).expect("valid configuration")
    }
}

fn as_text(line: &[u8]) -> String {
    String::from_utf8(line.to_vec()).expect("record should be UTF-8")
}

/// Split a record into its header fields and parsed JSON payload
fn parse_record(line: &str) -> (i32, String, Value) {
    let line = line.strip_suffix('\n').expect("record ends with newline");
    let mut parts = line.splitn(4, ' ');
    assert_eq!(parts.next(), Some("atom"));
    let instance = parts
        .next()
        .expect("instance")
        .parse()
        .expect("numeric instance");
    let symbol = parts.next().expect("symbol").to_string();
    let json = serde_json::from_str(parts.next().expect("payload")).expect("payload is JSON");
    (instance, symbol, json)
}

#[test]
fn record_int_value() {
    let host = Host::new();
    let mut writer = host.writer(WriterConfig::default());

    let line = writer
        .format_record(3, "gain", host.types.int, 4, &10i32.to_ne_bytes())
        .expect("record fits");
    assert_eq!(as_text(line), "atom 3 gain {\"gain\":10}\n");
}

#[test]
fn record_null_atom() {
    let host = Host::new();
    let mut writer = host.writer(WriterConfig::default());

    let line = writer
        .format_record(0, "out", Urid::NONE, 0, &[])
        .expect("record fits");
    assert_eq!(as_text(line), "atom 0 out {\"out\":null}\n");
}

#[test]
fn record_negative_instance() {
    let host = Host::new();
    let mut writer = host.writer(WriterConfig::default());

    let line = writer
        .format_record(-1, "x", host.types.bool, 4, &0i32.to_ne_bytes())
        .expect("record fits");
    assert_eq!(as_text(line), "atom -1 x {\"x\":false}\n");
}

#[test]
fn record_patch_set_object_parses_as_json() {
    let mut host = Host::new();
    let set = host.urid("http://lv2plug.in/ns/ext/patch#Set");
    let property = host.urid("http://lv2plug.in/ns/ext/patch#property");
    let value = host.urid("http://lv2plug.in/ns/ext/patch#value");
    let sample = host.urid("urn:example:sample");
    let mut writer = host.writer(WriterConfig::default());

    let line = writer
        .format_forged(12, "control", |forge| {
            let frame = forge.begin_object(0, set)?;
            forge.key(property)?;
            forge.urid(sample)?;
            forge.key(value)?;
            forge.path("/samples/kick.wav")?;
            forge.end(frame)
        })
        .expect("record fits");

    let (instance, symbol, json) = parse_record(&as_text(line));
    assert_eq!(instance, 12);
    assert_eq!(symbol, "control");
    assert_eq!(
        json,
        json!({
            "control": {
                "http://lv2plug.in/ns/ext/patch#Set": {
                    "#type": null,
                    "http://lv2plug.in/ns/ext/patch#property": "urn:example:sample",
                    "http://lv2plug.in/ns/ext/patch#value": { "#path": "/samples/kick.wav" }
                }
            }
        })
    );
}

#[test]
fn record_vector_and_nested_object() {
    let mut host = Host::new();
    let state = host.urid("State");
    let instance = host.urid("urn:state:1");
    let levels = host.urid("levels");
    let meta = host.urid("meta");
    let meta_type = host.urid("Meta");
    let name = host.urid("name");
    let mut writer = host.writer(WriterConfig::default());

    let line = writer
        .format_forged(1, "s", |forge| {
            let outer = forge.begin_object(instance, state)?;
            forge.key(levels)?;
            forge.int_vector(&[1, -2, 3])?;
            forge.key(meta)?;
            let inner = forge.begin_blank(meta_type)?;
            forge.key(name)?;
            forge.string("Lead \"A\"")?;
            forge.end(inner)?;
            forge.end(outer)
        })
        .expect("record fits");

    assert_eq!(
        as_text(line),
        concat!(
            "atom 1 s {\"s\":{\"State\":{\"#type\":\"urn:state:1\",",
            "\"levels\":[1,-2,3],",
            "\"meta\":{\"Meta\":{\"#type\":null,\"name\":\"Lead \\\"A\\\"\"}}}}}\n"
        )
    );
    let (_, _, json) = parse_record(&as_text(line));
    assert_eq!(json["s"]["State"]["meta"]["Meta"]["name"], "Lead \"A\"");
}

#[test]
fn record_double_vector() {
    let host = Host::new();
    let mut writer = host.writer(WriterConfig::default());
    let elements: Vec<u8> = [0.5f64, -1.25]
        .iter()
        .flat_map(|v| v.to_ne_bytes())
        .collect();
    let double = host.types.double;

    let line = writer
        .format_forged(2, "curve", |forge| forge.vector(double, 8, &elements))
        .expect("record fits");
    assert_eq!(
        as_text(line),
        "atom 2 curve {\"curve\":[0.500000,-1.250000]}\n"
    );
}

#[test]
fn record_unsupported_atoms_degrade_to_null() {
    let mut host = Host::new();
    let custom = host.map.map("urn:example:custom");
    let mut writer = host.writer(WriterConfig::default());

    let tuple = host.types.tuple;
    let line = writer
        .format_forged(0, "t", |forge| forge.atom(tuple, &[0u8; 16]))
        .expect("record fits");
    assert_eq!(as_text(line), "atom 0 t {\"t\":null}\n");

    let line = writer
        .format_record(0, "c", custom, 4, &[1, 2, 3, 4])
        .expect("record fits");
    assert_eq!(as_text(line), "atom 0 c {\"c\":null}\n");
}

#[test]
fn record_overflow_is_reported_and_bounded() {
    let host = Host::new();
    let config = WriterConfig::default().with_capacity(64);
    let mut writer = host.writer(config);

    let values: Vec<i32> = (0..100).collect();
    let result = writer.format_forged(0, "big", |forge| forge.int_vector(&values));
    assert!(matches!(
        result,
        Err(AtomWriterError::Overflow { capacity: 64 })
    ));
    assert!(writer.is_overflowed());
    assert!(writer.line().len() < 64);
    assert!(!writer.line().ends_with(b"\n"));
}

#[test]
fn record_exactly_at_capacity_boundary() {
    let host = Host::new();
    let expected = "atom 3 gain_parameter {\"gain_parameter\":10}\n";
    let body = 10i32.to_ne_bytes();

    // One byte beyond the line is reserved for the terminator
    let mut writer = host.writer(WriterConfig::default().with_capacity(expected.len() + 1));
    let line = writer
        .format_record(3, "gain_parameter", host.types.int, 4, &body)
        .expect("record fits");
    assert_eq!(as_text(line), expected);

    let mut writer = host.writer(WriterConfig::default().with_capacity(expected.len()));
    let result = writer.format_record(3, "gain_parameter", host.types.int, 4, &body);
    assert!(matches!(result, Err(AtomWriterError::Overflow { .. })));
}

#[test]
fn record_depth_limit_renders_null() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut host = Host::new();
    let node = host.urid("Node");
    let next = host.urid("next");
    let mut writer = host.writer(WriterConfig::default().with_max_depth(2));

    let line = writer
        .format_forged(0, "deep", |forge| {
            let a = forge.begin_object(0, node)?;
            forge.key(next)?;
            let b = forge.begin_object(0, node)?;
            forge.key(next)?;
            let c = forge.begin_object(0, node)?;
            forge.end(c)?;
            forge.end(b)?;
            forge.end(a)
        })
        .expect("record fits");
    assert_eq!(
        as_text(line),
        "atom 0 deep {\"deep\":{\"Node\":{\"#type\":null,\"next\":{\"Node\":{\"#type\":null,\"next\":null}}}}}\n"
    );
}

#[test]
fn record_from_parsed_bytes() {
    let host = Host::new();
    let mut buf = [0u8; 64];
    let mut forge = AtomForge::new(&mut buf, host.types);
    forge.long(1 << 40).expect("fits");
    let bytes = forge.finish();

    let atom = AtomRef::parse(bytes).expect("complete atom");
    let mut writer = host.writer(WriterConfig::default());
    let line = writer.format_atom(5, "pos", &atom).expect("record fits");
    assert_eq!(as_text(line), "atom 5 pos {\"pos\":1099511627776}\n");
}

#[test]
fn record_control_characters_pass_through() {
    let host = Host::new();
    let mut writer = host.writer(WriterConfig::default());

    let line = writer
        .format_forged(0, "msg", |forge| forge.string("a\tb"))
        .expect("record fits");
    assert_eq!(as_text(line), "atom 0 msg {\"msg\":\"a\tb\"}\n");
}
