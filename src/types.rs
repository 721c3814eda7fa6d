//! Type and member metadata.
//!
//! Rust has no runtime reflection, so every dumpable object type publishes a
//! [`TypeInfo`]: its names, its base level (inheritance is modelled by
//! composition), an optional metadata type supplying member overrides, its
//! [`TypeDumpConfig`] and the [`MemberDescriptor`]s it declares itself.
//!
//! `TypeInfo` values are built once and live for the rest of the process,
//! usually inside a `OnceLock` generated by `#[derive(Dumpable)]`.

use crate::config::{MemberDumpConfig, TypeDumpConfig};
use crate::error::{DumpError, Result};
use serde::Serialize;
use std::any::TypeId;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

/// Upper bound on inheritance chain length. Guards against base links that loop.
const MAX_CHAIN_LEN: usize = 64;

/// The names of a type, derived from [`std::any::type_name`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypeName {
    full: &'static str,
}

impl TypeName {
    /// The name of `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self {
            full: std::any::type_name::<T>(),
        }
    }

    /// Wraps an already fully qualified name.
    pub fn from_full(full: &'static str) -> Self {
        Self { full }
    }

    /// Fully qualified name, e.g. `alloc::vec::Vec<alloc::string::String>`.
    pub fn full(&self) -> &'static str {
        self.full
    }

    /// Name with every path prefix removed, e.g. `Vec<String>`.
    pub fn short(&self) -> String {
        let mut out = String::with_capacity(self.full.len());
        let mut segment_start = 0;
        let mut chars = self.full.chars().peekable();
        while let Some(c) = chars.next() {
            if c == ':' && chars.peek() == Some(&':') {
                chars.next();
                out.truncate(segment_start);
            } else if c.is_alphanumeric() || c == '_' {
                out.push(c);
            } else {
                out.push(c);
                segment_start = out.len();
            }
        }
        out
    }

    /// Module path of the outermost type, e.g. `alloc::vec`. Empty for primitives.
    pub fn namespace(&self) -> &'static str {
        let path_end = self
            .full
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == ':'))
            .unwrap_or(self.full.len());
        let path = &self.full[..path_end];
        path.rfind("::").map_or("", |idx| &path[..idx])
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({})", self.full)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full)
    }
}

/// Whether a member is a stored field or a computed property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MemberKind {
    /// Stored field. Fields sort before properties at equal order.
    Field,
    /// Computed accessor.
    Property,
}

/// Member visibility, used by [`MemberFilter`](crate::MemberFilter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Visibility {
    /// Publicly visible.
    Public,
    /// Crate or module private.
    Private,
}

/// Describes one member declared by a type level.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    name: Cow<'static, str>,
    kind: MemberKind,
    visibility: Visibility,
    declaring_type: TypeId,
    declaring_name: &'static str,
    value_type: Option<&'static str>,
    readable: bool,
    indexer: bool,
    overridable: bool,
    overrides: bool,
    config: Option<MemberDumpConfig>,
}

impl MemberDescriptor {
    fn new(name: impl Into<Cow<'static, str>>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            declaring_type: TypeId::of::<()>(),
            declaring_name: "",
            value_type: None,
            readable: true,
            indexer: false,
            overridable: false,
            overrides: false,
            config: None,
        }
    }

    /// A stored field.
    pub fn field(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, MemberKind::Field)
    }

    /// A computed property.
    pub fn property(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, MemberKind::Property)
    }

    /// Attaches configuration directly to the member.
    pub fn with_config(mut self, config: MemberDumpConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Records the declared value type.
    pub fn value_type<V: ?Sized>(mut self) -> Self {
        self.value_type = Some(std::any::type_name::<V>());
        self
    }

    /// Marks the member as not readable. Unreadable members are never rendered.
    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Marks the member as an indexer. Indexers are never rendered.
    pub fn indexer(mut self) -> Self {
        self.indexer = true;
        self
    }

    /// Marks the member as overridable by derived levels.
    pub fn overridable(mut self) -> Self {
        self.overridable = true;
        self
    }

    /// Marks the member as an override of an ancestor's overridable member.
    pub fn overrides(mut self) -> Self {
        self.overridable = true;
        self.overrides = true;
        self
    }

    /// Member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field or property.
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Member visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// `TypeId` of the level that declares the member.
    pub fn declaring_type(&self) -> TypeId {
        self.declaring_type
    }

    /// Fully qualified name of the declaring level.
    pub fn declaring_name(&self) -> &'static str {
        self.declaring_name
    }

    /// Declared value type, when recorded.
    pub fn declared_value_type(&self) -> Option<&'static str> {
        self.value_type
    }

    /// Whether the member can be read.
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Whether the member is an indexer.
    pub fn is_indexer(&self) -> bool {
        self.indexer
    }

    /// Whether derived levels may override the member.
    pub fn is_overridable(&self) -> bool {
        self.overridable
    }

    /// Whether the member overrides an ancestor's declaration.
    pub fn is_override(&self) -> bool {
        self.overrides
    }

    /// Configuration attached directly to the member.
    pub fn config(&self) -> Option<&MemberDumpConfig> {
        self.config.as_ref()
    }
}

/// Runtime metadata for one type level.
#[derive(Debug)]
pub struct TypeInfo {
    name: TypeName,
    type_id: TypeId,
    base: Option<fn() -> &'static TypeInfo>,
    metadata: Option<fn() -> &'static TypeInfo>,
    config: Option<TypeDumpConfig>,
    members: Vec<MemberDescriptor>,
}

impl TypeInfo {
    /// Starts describing `T`.
    pub fn builder<T: ?Sized + 'static>() -> TypeInfoBuilder {
        TypeInfoBuilder {
            info: TypeInfo {
                name: TypeName::of::<T>(),
                type_id: TypeId::of::<T>(),
                base: None,
                metadata: None,
                config: None,
                members: Vec::new(),
            },
        }
    }

    /// The type's names.
    pub fn name(&self) -> TypeName {
        self.name
    }

    /// The type's `TypeId`.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The immediate base level, if any.
    pub fn base(&self) -> Option<&'static TypeInfo> {
        self.base.map(|f| f())
    }

    /// The metadata type supplying member overrides, if any.
    pub fn metadata(&self) -> Option<&'static TypeInfo> {
        self.metadata.map(|f| f())
    }

    /// Configuration attached to the type.
    pub fn config(&self) -> Option<&TypeDumpConfig> {
        self.config.as_ref()
    }

    /// Members declared by this level only.
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// Finds a member declared by this level.
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// This level followed by its ancestors, most derived first.
    pub fn chain(&'static self) -> Vec<&'static TypeInfo> {
        let mut chain = vec![self];
        let mut current = self.base();
        while let Some(level) = current {
            if chain.len() >= MAX_CHAIN_LEN || chain.iter().any(|l| l.type_id == level.type_id) {
                tracing::warn!(type_name = self.name.full(), "inheritance chain loops or is too deep");
                break;
            }
            chain.push(level);
            current = level.base();
        }
        chain
    }

    /// Finds a member by name anywhere in the chain, most derived first.
    pub fn find_member(&'static self, name: &str) -> Option<&'static MemberDescriptor> {
        self.chain().into_iter().find_map(|level| level.member(name))
    }
}

/// Builder for [`TypeInfo`].
#[derive(Debug)]
pub struct TypeInfoBuilder {
    info: TypeInfo,
}

impl TypeInfoBuilder {
    /// Sets the base level.
    pub fn base(mut self, base: fn() -> &'static TypeInfo) -> Self {
        self.info.base = Some(base);
        self
    }

    /// Sets the metadata type supplying member overrides.
    pub fn metadata(mut self, metadata: fn() -> &'static TypeInfo) -> Self {
        self.info.metadata = Some(metadata);
        self
    }

    /// Attaches type configuration.
    pub fn config(mut self, config: TypeDumpConfig) -> Self {
        self.info.config = Some(config);
        self
    }

    /// Declares a member on this level.
    pub fn member(mut self, mut member: MemberDescriptor) -> Self {
        member.declaring_type = self.info.type_id;
        member.declaring_name = self.info.name.full();
        self.info.members.push(member);
        self
    }

    /// Declares a field with attached configuration.
    pub fn field(self, name: impl Into<Cow<'static, str>>, config: MemberDumpConfig) -> Self {
        self.member(MemberDescriptor::field(name).with_config(config))
    }

    /// Declares a property with attached configuration.
    pub fn property(self, name: impl Into<Cow<'static, str>>, config: MemberDumpConfig) -> Self {
        self.member(MemberDescriptor::property(name).with_config(config))
    }

    /// Validates and finishes the description.
    ///
    /// # Errors
    /// `MissingArgument` for an empty member name, `DuplicateMember` when two
    /// members of this level share a name.
    pub fn build(self) -> Result<TypeInfo> {
        let mut seen = HashSet::new();
        for member in &self.info.members {
            if member.name().is_empty() {
                return Err(DumpError::MissingArgument("member name"));
            }
            if !seen.insert(member.name()) {
                return Err(DumpError::DuplicateMember {
                    type_name: self.info.name.full(),
                    member: member.name().to_string(),
                });
            }
        }
        Ok(self.info)
    }

    /// Finishes the description, dropping invalid members with a warning.
    pub fn finish(mut self) -> TypeInfo {
        let type_name = self.info.name.full();
        let mut seen = HashSet::new();
        self.info.members.retain(|member| {
            let valid = !member.name().is_empty() && seen.insert(member.name().to_string());
            if !valid {
                tracing::warn!(type_name, member = member.name(), "dropping invalid member");
            }
            valid
        });
        self.info
    }
}
