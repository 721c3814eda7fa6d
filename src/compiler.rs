//! Records the walker's decisions for one [`CacheKey`] as a step list.
//!
//! Compilation needs only metadata, never an instance: the member plans are
//! exactly the ones the walker would build, and the steps replay the walker's
//! traversal (leading members climbing the chain, trailing members coming
//! back down). Nested objects are not compiled inline; their values are
//! dispatched at run time, so each nested runtime type gets its own cache
//! entry.

use crate::error::Result;
use crate::format;
use crate::graph::{CacheKey, CompiledProcedure, Frame, MemberPlan, Planner, Step};

struct StepBuilder {
    members: Vec<MemberPlan>,
    steps: Vec<Step>,
}

impl StepBuilder {
    fn emit_member(&mut self, plan: MemberPlan) {
        let index = self.members.len();
        let skip_null = plan.skip_null;
        self.members.push(plan);

        self.steps.push(Step::Read(index));
        let guard = skip_null.then(|| {
            self.steps.push(Step::SkipIfNull {
                member: index,
                resume_at: 0,
            });
            self.steps.len() - 1
        });
        self.steps.push(Step::Label(index));
        self.steps.push(Step::Render(index));

        // Patch the guard now that the end of the member is known.
        if let Some(at) = guard {
            let resume = self.steps.len();
            if let Some(Step::SkipIfNull { resume_at, .. }) = self.steps.get_mut(at) {
                *resume_at = resume;
            }
        }
    }
}

/// Compiles the procedure for `frame`.
///
/// # Errors
/// Propagates planning failures (hierarchy violations, missing formatters).
pub(crate) fn compile(planner: Planner<'_>, frame: &Frame, key: CacheKey) -> Result<CompiledProcedure> {
    let chain = frame.info.chain();
    let mut levels = Vec::with_capacity(chain.len());
    for level in 0..chain.len() {
        levels.push(planner.plan_level(frame, &chain, level)?);
    }

    let mut builder = StepBuilder {
        members: Vec::new(),
        steps: vec![Step::WriteHeader, Step::Indent],
    };
    let mut trailing = Vec::with_capacity(levels.len());
    for (level, plan) in levels.into_iter().enumerate() {
        builder.steps.push(Step::EnterLevel(level));
        for member in plan.leading {
            builder.emit_member(member);
        }
        trailing.push((level, plan.trailing));
    }
    for (level, members) in trailing.into_iter().rev() {
        if members.is_empty() {
            continue;
        }
        builder.steps.push(Step::EnterLevel(level));
        for member in members {
            builder.emit_member(member);
        }
    }
    builder.steps.push(Step::Outdent);

    tracing::debug!(
        key = %key,
        members = builder.members.len(),
        steps = builder.steps.len(),
        "compiled dump procedure"
    );
    Ok(CompiledProcedure {
        header: format::object_header(frame.info.name()),
        key,
        members: builder.members,
        steps: builder.steps,
    })
}
