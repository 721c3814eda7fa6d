//! The decision model shared by the walker and the procedure compiler.
//!
//! An object is first resolved into a [`Frame`] (runtime type, effective
//! configuration, metadata). Each level of the frame's inheritance chain is
//! then planned into a [`LevelPlan`]: the filtered, ordered members with every
//! per-member decision already taken. The walker consumes level plans
//! directly; the compiler flattens them into a [`CompiledProcedure`].

/// Identity and cache key types.
pub mod id;
/// Member and level plans.
pub mod plan;
/// Compiled procedures and their steps.
pub mod procedure;

pub use id::{CacheKey, ObjectId};
pub use plan::{Frame, LevelPlan, MemberPlan, Renderer, ValueStyle};
pub(crate) use plan::Planner;
pub use procedure::{CompiledProcedure, Step};
