//! Defines the traits through which values expose themselves to the dump engine.
//!
//! [`Dumpable`] is the entry point: every value the engine can render projects
//! itself into a [`Value`]. Objects additionally implement [`DumpObject`], and
//! collections implement [`DumpSequence`] or [`DumpMap`]. The
//! `#[derive(Dumpable)]` macro implements the object traits for structs.

use crate::error::MemberValue;
use crate::types::{MemberDescriptor, TypeInfo, TypeName};
use crate::value::Value;
use std::any::Any;

/// A value that can be dumped.
pub trait Dumpable: Any {
    /// Projects the value for rendering.
    fn dump_value(&self) -> Value<'_>;
}

/// An object with members.
///
/// Member reads always go through the most-derived runtime type: an object
/// whose base level is held by composition forwards reads it does not answer
/// itself to that base.
pub trait DumpObject: Any {
    /// Metadata of the runtime (most-derived) type.
    fn type_info(&self) -> &'static TypeInfo;

    /// Reads a member. `None` means the object does not expose the member.
    fn read_member(&self, member: &MemberDescriptor) -> Option<MemberValue<'_>>;

    /// The object's display text, if it has one.
    fn display(&self) -> Option<String> {
        None
    }

    /// A custom sequence view, rendered when the member asks for enumeration.
    fn as_sequence(&self) -> Option<&dyn DumpSequence> {
        None
    }

    /// Upcast for typed formatters.
    fn as_any(&self) -> &dyn Any;
}

/// Static access to a type's metadata. Implemented by `#[derive(Dumpable)]`.
pub trait DumpType: DumpObject {
    /// The type's metadata.
    fn static_type_info() -> &'static TypeInfo;
}

/// An ordered collection.
pub trait DumpSequence {
    /// Name of the collection type.
    fn type_name(&self) -> TypeName;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns true if the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the entries in order.
    fn entries(&self) -> Box<dyn Iterator<Item = Value<'_>> + '_>;

    /// The raw bytes, when the collection is a byte sequence.
    fn as_bytes(&self) -> Option<&[u8]> {
        None
    }
}

/// A key to value collection.
pub trait DumpMap {
    /// Name of the collection type.
    fn type_name(&self) -> TypeName;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns true if the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the entries.
    fn entries(&self) -> Box<dyn Iterator<Item = (Value<'_>, Value<'_>)> + '_>;
}
