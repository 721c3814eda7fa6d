//! The reference interpreter.
//!
//! [`walk`] expands one object as an explicit state machine over its
//! inheritance chain. A [`VisitState`] is pushed for each level as the walk
//! climbs toward the root; the level's leading members are rendered on the
//! way up and its trailing members on the way back down:
//!
//! ```text
//! EnumeratingMembers(L0) -> AtBaseClassLevel -> EnumeratingMembers(L1) -> ...
//!     -> Unwinding(Ln) -> ... -> Unwinding(L0) -> Done
//! ```
//!
//! Nested objects re-enter [`DumpContext::enter_object`], which either walks
//! them again or runs their compiled procedure.

use crate::error::Result;
use crate::format;
use crate::graph::{Frame, LevelPlan, MemberPlan};
use crate::render::DumpContext;
use crate::types::TypeInfo;
use crate::visitor::DumpObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    EnumeratingMembers,
    AtBaseClassLevel,
    Unwinding,
    Done,
}

/// Cursor over one inheritance level of the instance being walked.
#[derive(Debug)]
struct VisitState {
    level: usize,
    plan: LevelPlan,
    cursor: usize,
}

impl VisitState {
    fn new(level: usize, plan: LevelPlan) -> Self {
        Self {
            level,
            plan,
            cursor: 0,
        }
    }

    /// The next leading member, advancing the cursor.
    fn next_leading(&mut self) -> Option<&MemberPlan> {
        let member = self.plan.leading.get(self.cursor)?;
        self.cursor += 1;
        Some(member)
    }

    /// The next trailing member, advancing the cursor.
    fn next_trailing(&mut self) -> Option<&MemberPlan> {
        let index = self.cursor.checked_sub(self.plan.leading.len())?;
        let member = self.plan.trailing.get(index)?;
        self.cursor += 1;
        Some(member)
    }
}

/// Expands `object` member by member.
pub(crate) fn walk(ctx: &mut DumpContext<'_, '_>, object: &dyn DumpObject, frame: &Frame) -> Result<()> {
    let planner = ctx.planner();
    let chain: Vec<&'static TypeInfo> = frame.info.chain();

    ctx.writer.write_text(&format::object_header(frame.info.name()));
    ctx.writer.indent();

    let mut stack = vec![VisitState::new(0, planner.plan_level(frame, &chain, 0)?)];
    let mut state = WalkState::EnumeratingMembers;

    while state != WalkState::Done {
        state = match state {
            WalkState::EnumeratingMembers => {
                let Some(visit) = stack.last_mut() else {
                    break;
                };
                match visit.next_leading() {
                    Some(member) => {
                        ctx.render_member(object, member)?;
                        WalkState::EnumeratingMembers
                    }
                    None => WalkState::AtBaseClassLevel,
                }
            }
            WalkState::AtBaseClassLevel => {
                let next = stack.last().map_or(chain.len(), |visit| visit.level + 1);
                if next < chain.len() {
                    let plan = planner.plan_level(frame, &chain, next)?;
                    stack.push(VisitState::new(next, plan));
                    WalkState::EnumeratingMembers
                } else {
                    WalkState::Unwinding
                }
            }
            WalkState::Unwinding => match stack.last_mut() {
                Some(visit) => {
                    if let Some(member) = visit.next_trailing() {
                        ctx.render_member(object, member)?;
                    } else {
                        stack.pop();
                    }
                    WalkState::Unwinding
                }
                None => WalkState::Done,
            },
            WalkState::Done => WalkState::Done,
        };
    }

    ctx.writer.unindent();
    Ok(())
}
