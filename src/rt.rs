//! Runtime helpers for code generated by `#[derive(Dumpable)]`.
//! Do not use directly.

use crate::error::MemberValue;
use crate::types::MemberDescriptor;
use crate::value::Value;
use crate::visitor::Dumpable;
use std::any::TypeId;

pub use std::sync::OnceLock;

/// Returns true if a read of `member` should be answered by the level `Owner`
/// itself rather than forwarded to its base.
///
/// A level answers reads of the members it declares and, for members marked
/// overridable anywhere in the chain, reads of any same-named member: virtual
/// members are always read through the most-derived type.
pub fn answers<Owner: 'static>(member: &MemberDescriptor) -> bool {
    member.declaring_type() == TypeId::of::<Owner>() || member.is_overridable()
}

/// Reads a stored field.
pub fn field<T: Dumpable + ?Sized>(value: &T) -> Option<MemberValue<'_>> {
    Some(Ok(value.dump_value()))
}

/// Wraps a computed value.
pub fn computed<'a, T: Dumpable>(value: T) -> Option<MemberValue<'a>> {
    Some(Ok(Value::owned(value)))
}
