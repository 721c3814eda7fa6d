use super::id::CacheKey;
use super::plan::MemberPlan;
use std::fmt;

/// One tagged instruction of a compiled procedure.
///
/// Member steps refer to entries of [`CompiledProcedure::members`] by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Writes the runtime type header.
    WriteHeader,
    /// Increases indentation.
    Indent,
    /// Marks the start of an inheritance level's members. No output.
    EnterLevel(usize),
    /// Reads the member into the value register.
    Read(usize),
    /// Jumps to `resume_at` when the register holds a null value.
    SkipIfNull {
        /// Member index.
        member: usize,
        /// Step to continue at.
        resume_at: usize,
    },
    /// Starts a new line and writes the member label.
    Label(usize),
    /// Renders the register with the member's renderer.
    Render(usize),
    /// Decreases indentation.
    Outdent,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteHeader => f.write_str("header"),
            Self::Indent => f.write_str("indent"),
            Self::EnterLevel(level) => write!(f, "level {level}"),
            Self::Read(m) => write!(f, "read #{m}"),
            Self::SkipIfNull { member, resume_at } => {
                write!(f, "skip-if-null #{member} -> {resume_at}")
            }
            Self::Label(m) => write!(f, "label #{m}"),
            Self::Render(m) => write!(f, "render #{m}"),
            Self::Outdent => f.write_str("outdent"),
        }
    }
}

/// A reusable dump routine for one [`CacheKey`].
///
/// Running it against any instance of the key's runtime type writes exactly
/// what an interpreted walk of that instance writes.
#[derive(Debug, Clone)]
pub struct CompiledProcedure {
    pub(crate) key: CacheKey,
    pub(crate) header: String,
    pub(crate) members: Vec<MemberPlan>,
    pub(crate) steps: Vec<Step>,
}

impl CompiledProcedure {
    /// The key the procedure was compiled for.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// The header line written for every instance.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The instruction list.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Member labels in rendering order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.label.as_str())
    }

    /// Member names in rendering order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.member.name())
    }

    /// Number of members the procedure renders.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
