//! Tools for inspecting what the procedure cache has compiled.
//! Useful for verifying member order and configuration decisions.

use crate::api::Dumper;
use crate::graph::{CompiledProcedure, Step};
use serde::Serialize;
use std::fmt;

/// A snapshot of a dumper's caches.
#[derive(Debug, Serialize)]
pub struct CacheReport {
    /// Installed procedures.
    pub procedure_count: usize,
    /// Keys being compiled when the snapshot was taken.
    pub building: usize,
    /// Total installs since the dumper was created.
    pub installs: usize,
    /// Cached (member, type) configuration entries.
    pub resolved_members: usize,
    /// Cached type configuration entries.
    pub resolved_types: usize,
    /// One entry per installed procedure, sorted by type name.
    pub procedures: Vec<ProcedureInfo>,
}

/// Summary of one compiled procedure.
#[derive(Debug, Serialize)]
pub struct ProcedureInfo {
    /// Fully qualified runtime type name.
    pub type_name: String,
    /// Whether the procedure was compiled under a metadata type.
    pub has_metadata: bool,
    /// Number of steps.
    pub step_count: usize,
    /// Rendered members in order.
    pub members: Vec<MemberInfo>,
    /// The step listing.
    pub steps: Vec<String>,
}

/// Summary of one rendered member.
#[derive(Debug, Serialize)]
pub struct MemberInfo {
    /// Member name.
    pub name: String,
    /// Declaring level.
    pub declared_by: String,
    /// Expanded label.
    pub label: String,
    /// Effective order weight.
    pub order: i32,
    /// Renderer kind: `value`, `display` or `formatter`.
    pub renderer: String,
    /// Whether null values are omitted.
    pub skip_null: bool,
}

/// The procedure cache inspector.
#[derive(Debug)]
pub struct ProcedureInspector;

impl ProcedureInspector {
    /// Takes a snapshot of `dumper`'s caches.
    pub fn inspect(dumper: &Dumper) -> CacheReport {
        let cache = dumper.cache();
        let (resolved_members, resolved_types) = dumper.resolver().cached_entries();
        let procedures: Vec<ProcedureInfo> = cache
            .snapshot()
            .iter()
            .map(|procedure| Self::inspect_procedure(procedure))
            .collect();

        CacheReport {
            procedure_count: procedures.len(),
            building: cache.building(),
            installs: cache.installs(),
            resolved_members,
            resolved_types,
            procedures,
        }
    }

    fn inspect_procedure(procedure: &CompiledProcedure) -> ProcedureInfo {
        let members = procedure
            .members
            .iter()
            .map(|plan| MemberInfo {
                name: plan.member.name().to_string(),
                declared_by: plan.member.declaring_name().to_string(),
                label: plan.label.clone(),
                order: plan.config.order,
                renderer: plan.renderer.to_string(),
                skip_null: plan.skip_null,
            })
            .collect();

        ProcedureInfo {
            type_name: procedure.key().type_name().to_string(),
            has_metadata: procedure.key().has_metadata(),
            step_count: procedure.steps().len(),
            members,
            steps: procedure.steps().iter().map(Step::to_string).collect(),
        }
    }
}

impl fmt::Display for CacheReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== GRAPHDUMP CACHE REPORT ===")?;
        writeln!(
            f,
            "Procedures: {} | Building: {} | Installs: {}",
            self.procedure_count, self.building, self.installs
        )?;
        writeln!(
            f,
            "Resolved:   {} members, {} types",
            self.resolved_members, self.resolved_types
        )?;
        writeln!(f, "\n[PROCEDURES]")?;
        for (i, procedure) in self.procedures.iter().enumerate() {
            procedure.fmt_tree(f, i + 1 == self.procedures.len())?;
        }
        Ok(())
    }
}

impl ProcedureInfo {
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, is_last: bool) -> fmt::Result {
        let connector = if is_last { "└── " } else { "├── " };
        let child_prefix = if is_last { "    " } else { "│   " };
        let metadata = if self.has_metadata { " +metadata" } else { "" };
        writeln!(
            f,
            "{connector}{}{metadata} ({} steps)",
            self.type_name, self.step_count
        )?;
        for (i, member) in self.members.iter().enumerate() {
            let connector = if i + 1 == self.members.len() {
                "└── "
            } else {
                "├── "
            };
            writeln!(
                f,
                "{child_prefix}{connector}{} [order {}, {}{}] from {}",
                member.name,
                member.order,
                member.renderer,
                if member.skip_null { ", skip nulls" } else { "" },
                member.declared_by
            )?;
        }
        Ok(())
    }
}
