//! Centralized error handling for graphdump.
//!
//! Dumping distinguishes two very different kinds of failure:
//!
//! 1. **Programming errors** ([`DumpError`]): a caller defect such as bad
//!    configuration, a member ordering request that mixes unrelated types, or
//!    misuse of the procedure cache protocol. These abort the current call and
//!    are returned through [`Result`].
//!
//! 2. **Data access errors** ([`AccessError`]): a member read that fails at
//!    runtime. These are recovered locally and embedded in the output text;
//!    they never escape [`Dumper::dump`](crate::Dumper::dump).
//!
//! Reaching the output budget is not an error at all: the writer silently
//! truncates and appends a single notice.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use graphdump::{DumpError, Dumper};
//!
//! let dumper = Dumper::new();
//! match dumper.dump(&42_i32) {
//!     Ok(text) => assert_eq!(text, "42"),
//!     Err(DumpError::FormatterNotFound { name, .. }) => eprintln!("missing formatter {name}"),
//!     Err(e) => eprintln!("dump failed: {e}"),
//! }
//! ```

use std::borrow::Cow;
use std::fmt;

/// A specialized `Result` type for graphdump operations.
pub type Result<T> = std::result::Result<T, DumpError>;

/// The result of reading one member: a projected value or a recoverable access error.
pub type MemberValue<'a> = std::result::Result<crate::Value<'a>, AccessError>;

/// Programming errors surfaced by the dump engine.
///
/// Every variant signals a caller defect (bad configuration or API misuse),
/// never a problem with the data being dumped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpError {
    /// A required argument was empty or absent.
    MissingArgument(&'static str),

    /// Two members of the same type level share a name.
    DuplicateMember {
        /// Fully qualified name of the type being described.
        type_name: &'static str,
        /// The duplicated member name.
        member: String,
    },

    /// A member ordering request contained a member whose declaring type is not
    /// part of the runtime type's inheritance chain.
    HierarchyViolation {
        /// The runtime type whose chain was used for ordering.
        type_name: &'static str,
        /// The offending member.
        member: String,
        /// The declaring type of the offending member.
        declaring_type: &'static str,
    },

    /// A member is configured with an external formatter that is not registered.
    FormatterNotFound {
        /// Formatter name.
        name: String,
        /// Owner type that was searched.
        owner: String,
    },

    /// The procedure cache protocol was violated (for example installing a
    /// procedure for a key that was never marked as building).
    InvalidCacheState(String),
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument(what) => write!(f, "Missing required argument: {what}"),
            Self::DuplicateMember { type_name, member } => {
                write!(f, "Duplicate member '{member}' on type {type_name}")
            }
            Self::HierarchyViolation {
                type_name,
                member,
                declaring_type,
            } => write!(
                f,
                "Member '{member}' is declared by {declaring_type}, which is not in the hierarchy of {type_name}"
            ),
            Self::FormatterNotFound { name, owner } => {
                write!(f, "Formatter '{name}' is not registered for {owner}")
            }
            Self::InvalidCacheState(s) => write!(f, "Invalid procedure cache state: {s}"),
        }
    }
}

impl std::error::Error for DumpError {}

/// A failure while reading a member value.
///
/// Rendered inline in place of the value; the walk continues with the next member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessError {
    message: Cow<'static, str>,
}

impl AccessError {
    /// Creates an access error with the given message.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error raised when an object does not expose a member it was asked for.
    pub fn missing_member(member: &str, type_name: &str) -> Self {
        Self::new(format!("member '{member}' is not readable on {type_name}"))
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AccessError {}
