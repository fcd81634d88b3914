//! JSON string quoting
//!
//! Only `"` and `\` are escaped. Control characters such as newline and tab
//! pass through unchanged; consumers of the record format rely on this, so
//! stricter escaping would change the wire output.

use crate::sink::Sink;

/// Append `text` to `sink` as a quoted JSON string
pub fn escape_and_append(sink: &mut Sink, text: &[u8]) {
    sink.append(b"\"");
    let mut rest = text;
    while let Some(pos) = rest.iter().position(|&b| b == b'"' || b == b'\\') {
        sink.append(&rest[..pos]);
        sink.append(&[b'\\', rest[pos]]);
        rest = &rest[pos + 1..];
    }
    sink.append(rest);
    sink.append(b"\"");
}
