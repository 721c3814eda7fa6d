use crate::config::{MemberFilter, TypeDumpConfig};
use crate::types::TypeInfo;
use crate::visitor::DumpObject;
use std::any::TypeId;
use std::fmt;

/// Identity of an object within one top-level call.
///
/// Objects are identified by address together with their runtime type, so a
/// struct and its first field (which share an address) stay distinct.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    address: usize,
    type_id: TypeId,
}

impl ObjectId {
    /// The identity of `object`, or `None` for zero-sized objects, which have
    /// no meaningful address.
    pub fn of(object: &dyn DumpObject) -> Option<Self> {
        if std::mem::size_of_val(object) == 0 {
            return None;
        }
        Some(Self {
            address: (object as *const dyn DumpObject).cast::<()>() as usize,
            type_id: object.type_info().type_id(),
        })
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({:#x})", self.address)
    }
}

/// Key of a compiled procedure: the runtime type plus everything that changes
/// the decisions recorded for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    type_id: TypeId,
    type_name: &'static str,
    config: TypeDumpConfig,
    metadata: Option<TypeId>,
    filter: MemberFilter,
}

impl CacheKey {
    /// Creates a key for `runtime` under the effective configuration.
    pub fn new(
        runtime: &TypeInfo,
        config: &TypeDumpConfig,
        metadata: Option<&TypeInfo>,
        filter: MemberFilter,
    ) -> Self {
        Self {
            type_id: runtime.type_id(),
            type_name: runtime.name().full(),
            config: config.clone(),
            metadata: metadata.map(TypeInfo::type_id),
            filter,
        }
    }

    /// `TypeId` of the runtime type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified name of the runtime type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The effective type configuration.
    pub fn config(&self) -> &TypeDumpConfig {
        &self.config
    }

    /// Whether a metadata type took part in the decisions.
    pub fn has_metadata(&self) -> bool {
        self.metadata.is_some()
    }

    /// The member filter.
    pub fn filter(&self) -> MemberFilter {
        self.filter
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        if self.metadata.is_some() {
            f.write_str(" +metadata")?;
        }
        Ok(())
    }
}
