//! The textual shape of a dump.
//!
//! Every marker and header the engine emits is produced here, so the walker and
//! the compiled procedures cannot drift apart on spelling.
//!
//! ```text
//! Person (app::model::Person, app::model):
//!   name = "A"
//!   tags = Vec<String>[3]:
//!     "x"
//!     "y"
//!     ... (dumped 2 of 3 entries)
//!   me = <cyclical reference: Person--0>
//! ```

use crate::types::TypeName;
use crate::value::{Scalar, Value};
use crate::visitor::DumpObject;
use std::borrow::Cow;

/// Rendered for null or absent values.
pub const NULL_MARKER: &str = "<null>";

/// A type header: short name, fully qualified name and namespace.
pub fn type_header(name: TypeName) -> String {
    let namespace = name.namespace();
    if namespace.is_empty() {
        format!("{} ({})", name.short(), name.full())
    } else {
        format!("{} ({}, {})", name.short(), name.full(), namespace)
    }
}

/// The header that opens an expanded object.
pub fn object_header(name: TypeName) -> String {
    let mut header = type_header(name);
    header.push(':');
    header
}

/// Marker for an object already visited in this call.
pub fn cyclic_marker(label: &str) -> String {
    format!("<cyclical reference: {label}>")
}

/// Inline rendering of a failed member read.
pub fn error_text(message: &str) -> String {
    format!("<error: {message}>")
}

/// Leaf rendering of a callable.
pub fn callable_text(signature: &str) -> String {
    format!("<callable: {signature}>")
}

/// Leaf rendering of a type descriptor value.
pub fn type_descriptor_text(name: TypeName) -> String {
    format!("<type: {}>", name.full())
}

/// The "type + count" header of a collection.
pub fn collection_header(name: TypeName, count: usize) -> String {
    format!("{}[{count}]:", name.short())
}

/// Marker closing a collection rendered only up to its cap.
pub fn collection_truncated(cap: usize, count: usize) -> String {
    format!("... (dumped {cap} of {count} entries)")
}

/// Notice appended once the writer's budget is exceeded.
pub fn truncation_notice(max_length: usize) -> String {
    format!("\n... output truncated after {max_length} characters")
}

/// Bytes as hyphen-separated uppercase hex pairs, e.g. `0A-FF-10`.
pub fn hex_dump(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        out.push(char::from(HEX[usize::from(b >> 4)]));
        out.push(char::from(HEX[usize::from(b & 0x0F)]));
    }
    out
}

/// Converts a scalar to text. Strings and chars are quoted.
pub fn scalar_text<'s>(scalar: &'s Scalar<'_>) -> Cow<'s, str> {
    match scalar {
        Scalar::Bool(v) => Cow::Borrowed(if *v { "true" } else { "false" }),
        Scalar::Char(v) => Cow::Owned(format!("{v:?}")),
        Scalar::I8(v) => Cow::Owned(v.to_string()),
        Scalar::I16(v) => Cow::Owned(v.to_string()),
        Scalar::I32(v) => Cow::Owned(v.to_string()),
        Scalar::I64(v) => Cow::Owned(v.to_string()),
        Scalar::I128(v) => Cow::Owned(v.to_string()),
        Scalar::Isize(v) => Cow::Owned(v.to_string()),
        Scalar::U8(v) => Cow::Owned(v.to_string()),
        Scalar::U16(v) => Cow::Owned(v.to_string()),
        Scalar::U32(v) => Cow::Owned(v.to_string()),
        Scalar::U64(v) => Cow::Owned(v.to_string()),
        Scalar::U128(v) => Cow::Owned(v.to_string()),
        Scalar::Usize(v) => Cow::Owned(v.to_string()),
        Scalar::F32(v) => Cow::Owned(v.to_string()),
        Scalar::F64(v) => Cow::Owned(v.to_string()),
        Scalar::Str(v) => Cow::Owned(format!("{v:?}")),
        Scalar::DateTime { text, .. } => Cow::Borrowed(text),
        Scalar::Guid(v) => Cow::Owned(v.hyphenated().to_string()),
        Scalar::Duration(v) => Cow::Owned(format!("{v:?}")),
        Scalar::Pointer { address, .. } => Cow::Owned(format!("{address:#x}")),
    }
}

/// Leaf rendering of an object: its display text, else its type header.
pub fn leaf_text(object: &dyn DumpObject) -> String {
    object
        .display()
        .unwrap_or_else(|| type_header(object.type_info().name()))
}

/// The display ("to string") text of a value. Strings are not quoted.
pub fn display_text(value: &Value<'_>) -> String {
    match value {
        Value::Null => NULL_MARKER.to_string(),
        Value::Scalar(Scalar::Str(s)) | Value::Nullable(Scalar::Str(s)) => s.to_string(),
        Value::Scalar(s) | Value::Nullable(s) => scalar_text(s).into_owned(),
        Value::Callable(signature) => (*signature).to_string(),
        Value::Type(name) => name.full().to_string(),
        Value::Bytes(bytes) => hex_dump(bytes),
        Value::Map(m) => m.type_name().short(),
        Value::Sequence(s) => s.type_name().short(),
        Value::Object(o) => leaf_text(*o),
        Value::Boxed(b) => display_text(&b.dump_value()),
    }
}
