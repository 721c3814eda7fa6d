//! Runs compiled procedures.
//!
//! The executor is a small register machine: a program counter over the
//! procedure's steps and a single value register holding the member most
//! recently read. All rendering goes through the same functions the walker
//! uses, which is what keeps the two paths byte-identical.

use crate::error::{MemberValue, Result};
use crate::graph::{CompiledProcedure, Step};
use crate::render::{DumpContext, projects_null};
use crate::visitor::DumpObject;

/// Runs `procedure` against `object`.
pub(crate) fn run(
    ctx: &mut DumpContext<'_, '_>,
    object: &dyn DumpObject,
    procedure: &CompiledProcedure,
) -> Result<()> {
    debug_assert_eq!(object.type_info().type_id(), procedure.key().type_id());

    let mut register: Option<Option<MemberValue<'_>>> = None;
    let mut pc = 0;
    while let Some(step) = procedure.steps.get(pc) {
        pc += 1;
        match *step {
            Step::WriteHeader => ctx.writer.write_text(&procedure.header),
            Step::Indent => ctx.writer.indent(),
            Step::Outdent => ctx.writer.unindent(),
            Step::EnterLevel(_) => {}
            Step::Label(index) => {
                if let Some(plan) = procedure.members.get(index) {
                    ctx.write_label(plan);
                }
            }
            Step::Read(index) => {
                if let Some(plan) = procedure.members.get(index) {
                    register = Some(object.read_member(plan.member));
                }
            }
            Step::SkipIfNull { resume_at, .. } => {
                if let Some(Some(Ok(value))) = &register
                    && projects_null(value)
                {
                    register = None;
                    pc = resume_at;
                }
            }
            Step::Render(index) => {
                if let (Some(plan), Some(read)) = (procedure.members.get(index), register.take()) {
                    ctx.render_read(object, plan, read)?;
                }
            }
        }
    }
    Ok(())
}
