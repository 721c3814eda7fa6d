//! The projected view of a runtime value.
//!
//! A [`Value`] is what the walker sees when it reads a member: a scalar, a
//! collection, a nested object, or one of the leaf kinds (callables and type
//! descriptors). Values borrow from the instance being dumped wherever they can;
//! [`Value::Boxed`] carries owned projections such as computed properties.

use crate::types::TypeName;
use crate::visitor::{DumpMap, DumpObject, DumpSequence, Dumpable};
use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

/// A basic scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    /// `bool`.
    Bool(bool),
    /// `char`.
    Char(char),
    /// `i8`.
    I8(i8),
    /// `i16`.
    I16(i16),
    /// `i32`.
    I32(i32),
    /// `i64`.
    I64(i64),
    /// `i128`.
    I128(i128),
    /// `isize`.
    Isize(isize),
    /// `u8`.
    U8(u8),
    /// `u16`.
    U16(u16),
    /// `u32`.
    U32(u32),
    /// `u64`.
    U64(u64),
    /// `u128`.
    U128(u128),
    /// `usize`.
    Usize(usize),
    /// `f32`.
    F32(f32),
    /// `f64`.
    F64(f64),
    /// Text.
    Str(Cow<'a, str>),
    /// A point in time, pre-rendered by the date/time converter.
    DateTime {
        /// Source type name, e.g. `chrono::DateTime<Utc>`.
        type_name: &'static str,
        /// Rendered text.
        text: String,
    },
    /// A globally unique identifier.
    Guid(uuid::Uuid),
    /// A span of time.
    Duration(Duration),
    /// A raw pointer-sized address.
    Pointer {
        /// Source type name, e.g. `*const u8`.
        type_name: &'static str,
        /// The address.
        address: usize,
    },
}

impl Scalar<'_> {
    /// Name of the Rust type the scalar was projected from.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::I128(_) => "i128",
            Self::Isize(_) => "isize",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::U128(_) => "u128",
            Self::Usize(_) => "usize",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Str(_) => "str",
            Self::DateTime { type_name, .. } | Self::Pointer { type_name, .. } => *type_name,
            Self::Guid(_) => "uuid::Uuid",
            Self::Duration(_) => "core::time::Duration",
        }
    }
}

/// A runtime value projected for dumping.
pub enum Value<'a> {
    /// Null or absent.
    Null,
    /// A basic scalar.
    Scalar(Scalar<'a>),
    /// A basic scalar held in an optional slot.
    Nullable(Scalar<'a>),
    /// A callable value; carries its signature.
    Callable(&'static str),
    /// A type descriptor value.
    Type(TypeName),
    /// Raw bytes.
    Bytes(&'a [u8]),
    /// A key to value collection.
    Map(&'a dyn DumpMap),
    /// A sequence.
    Sequence(&'a dyn DumpSequence),
    /// A nested object.
    Object(&'a dyn DumpObject),
    /// An owned projection (computed member, upgraded weak reference).
    Boxed(Box<dyn Dumpable>),
}

impl<'a> Value<'a> {
    /// Projects an owned value.
    pub fn owned<T: Dumpable>(value: T) -> Self {
        Value::Boxed(Box::new(value))
    }

    /// Borrowed text.
    pub fn str(text: &'a str) -> Self {
        Value::Scalar(Scalar::Str(Cow::Borrowed(text)))
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Fully qualified name of the value's type, used for formatter lookup.
    pub fn type_name(&self) -> Cow<'static, str> {
        match self {
            Value::Null => Cow::Borrowed("null"),
            Value::Scalar(s) | Value::Nullable(s) => Cow::Borrowed(s.type_name()),
            Value::Callable(signature) => Cow::Borrowed(*signature),
            Value::Type(_) => Cow::Borrowed("graphdump::types::TypeName"),
            Value::Bytes(_) => Cow::Borrowed("[u8]"),
            Value::Map(m) => Cow::Borrowed(m.type_name().full()),
            Value::Sequence(s) => Cow::Borrowed(s.type_name().full()),
            Value::Object(o) => Cow::Borrowed(o.type_info().name().full()),
            Value::Boxed(b) => b.dump_value().type_name(),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Value::Nullable(s) => f.debug_tuple("Nullable").field(s).finish(),
            Value::Callable(sig) => f.debug_tuple("Callable").field(sig).finish(),
            Value::Type(t) => f.debug_tuple("Type").field(t).finish(),
            Value::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Value::Map(m) => write!(f, "Map({}, {})", m.type_name(), m.len()),
            Value::Sequence(s) => write!(f, "Sequence({}, {})", s.type_name(), s.len()),
            Value::Object(o) => write!(f, "Object({})", o.type_info().name()),
            Value::Boxed(b) => f.debug_tuple("Boxed").field(&b.dump_value()).finish(),
        }
    }
}
