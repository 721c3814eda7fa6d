//! Resolves effective configuration and member order.
//!
//! Member configuration is resolved by priority: the same-named member of the
//! level's metadata type, then the configuration attached to the member itself,
//! then the default. Results are cached for the life of the resolver (type
//! metadata never changes at runtime) until [`TypeDescriptorResolver::reset`].
//!
//! ## Member order
//!
//! Within one level, members with non-negative order come first (ascending),
//! ties broken by fields before properties and then by name. Members with
//! negative order follow, by ascending magnitude. Across levels, a derived
//! level's non-negative members precede everything its ancestors declare, and
//! its negative members come after it:
//!
//! ```text
//! Derived(+)  Base(+)  Root(+)  Root(-)  Base(-)  Derived(-)
//! ```

use crate::config::{MemberDumpConfig, TypeDumpConfig};
use crate::error::{DumpError, Result};
use crate::sync::Memo;
use crate::types::{MemberDescriptor, MemberKind, TypeInfo};
use std::any::TypeId;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemberKey {
    declaring: TypeId,
    name: String,
    metadata: Option<TypeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TypeKey {
    type_id: TypeId,
    metadata: Option<TypeId>,
}

/// Sort key implementing the total member order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OrderKey<'m> {
    slot: usize,
    magnitude: u32,
    kind: MemberKind,
    name: &'m str,
}

/// Resolves and caches dump configuration.
#[derive(Debug, Default)]
pub struct TypeDescriptorResolver {
    members: Memo<MemberKey, Arc<MemberDumpConfig>>,
    types: Memo<TypeKey, Arc<TypeDumpConfig>>,
}

impl TypeDescriptorResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective configuration of `member` under an optional metadata type.
    pub fn member_config(
        &self,
        member: &MemberDescriptor,
        metadata: Option<&TypeInfo>,
    ) -> Arc<MemberDumpConfig> {
        let key = MemberKey {
            declaring: member.declaring_type(),
            name: member.name().to_string(),
            metadata: metadata.map(TypeInfo::type_id),
        };
        self.members.get_or_insert_with(key, || {
            tracing::trace!(
                member = member.name(),
                declaring = member.declaring_name(),
                "resolving member configuration"
            );
            let from_metadata = metadata
                .and_then(|meta| meta.member(member.name()))
                .and_then(MemberDescriptor::config);
            Arc::new(
                from_metadata
                    .or_else(|| member.config())
                    .cloned()
                    .unwrap_or_default(),
            )
        })
    }

    /// Effective configuration of `ty` under an optional metadata type.
    pub fn type_config(&self, ty: &TypeInfo, metadata: Option<&TypeInfo>) -> Arc<TypeDumpConfig> {
        let key = TypeKey {
            type_id: ty.type_id(),
            metadata: metadata.map(TypeInfo::type_id),
        };
        self.types.get_or_insert_with(key, || {
            tracing::trace!(type_name = ty.name().full(), "resolving type configuration");
            Arc::new(
                metadata
                    .and_then(TypeInfo::config)
                    .or_else(|| ty.config())
                    .cloned()
                    .unwrap_or_default(),
            )
        })
    }

    /// Orders members drawn from `runtime`'s inheritance chain.
    ///
    /// `root_metadata` replaces the runtime level's own metadata type when given.
    ///
    /// # Errors
    /// `HierarchyViolation` if a member's declaring type is not `runtime` or
    /// one of its ancestors.
    pub fn order_members<'m>(
        &self,
        runtime: &'static TypeInfo,
        members: &[&'m MemberDescriptor],
        root_metadata: Option<&'static TypeInfo>,
    ) -> Result<Vec<&'m MemberDescriptor>> {
        let chain = runtime.chain();
        let levels = chain.len();

        let mut keyed = Vec::with_capacity(members.len());
        for &member in members {
            let level = chain
                .iter()
                .position(|l| l.type_id() == member.declaring_type())
                .ok_or_else(|| DumpError::HierarchyViolation {
                    type_name: runtime.name().full(),
                    member: member.name().to_string(),
                    declaring_type: member.declaring_name(),
                })?;
            let metadata = level_metadata(&chain, level, root_metadata);
            let order = self.member_config(member, metadata).order;
            let slot = if order >= 0 {
                level
            } else {
                2 * levels - 1 - level
            };
            let key = OrderKey {
                slot,
                magnitude: order.unsigned_abs(),
                kind: member.kind(),
                name: member.name(),
            };
            keyed.push((key, member));
        }

        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(keyed.into_iter().map(|(_, m)| m).collect())
    }

    /// Number of cached member and type configurations.
    pub fn cached_entries(&self) -> (usize, usize) {
        (self.members.len(), self.types.len())
    }

    /// Drops every cached configuration.
    pub fn reset(&self) {
        self.members.clear();
        self.types.clear();
    }
}

/// The metadata type that applies to `chain[level]`.
pub(crate) fn level_metadata(
    chain: &[&'static TypeInfo],
    level: usize,
    root_metadata: Option<&'static TypeInfo>,
) -> Option<&'static TypeInfo> {
    if level == 0 && root_metadata.is_some() {
        return root_metadata;
    }
    chain.get(level).and_then(|l| l.metadata())
}
