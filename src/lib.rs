//! # graphdump
//!
//! Renders arbitrary object graphs as indented, human-readable text for
//! diagnostics and logging, driven by per-type and per-member configuration.
//!
//! ## Overview
//!
//! Dumping an object means walking its members in a deterministic order,
//! rendering scalars inline, expanding collections and nested objects, and
//! stopping at cycles, at the depth limit, or wherever configuration says so.
//! graphdump does this with two cooperating engines:
//!
//! *   **The walker** interprets a type's member metadata on every call. It is
//!     the reference behavior.
//! *   **The procedure compiler** records the walker's decisions for one
//!     (type, configuration) pair as a list of tagged steps. A small executor
//!     replays those steps for every later instance of the type.
//!
//! Both consume the same decision table (the member *plans*), so compiled
//! output is byte-identical to interpreted output.
//!
//! ### Key Features
//!
//! *   **Compile Once:** The first call for a type compiles its procedure;
//!     concurrent callers that arrive meanwhile take the interpreted path and
//!     never block.
//! *   **Cycle Detection:** Objects already visited during a call render as a
//!     `<cyclical reference: Type--n>` marker.
//! *   **Deterministic Order:** Signed order weights, field-before-property and
//!     alphabetical tie breaks, with negative weights placed after ancestors.
//! *   **Bounded Output:** Depth limits, per-collection caps and a global
//!     character budget.
//! *   **No Reflection:** Types describe themselves through a [`TypeInfo`],
//!     usually generated by `#[derive(Dumpable)]`.
//!
//! ## Architecture
//!
//! ```text
//! Dumper::dump ──> DumpContext ──> enter_object ──┬─> ProcedureCache hit ──> executor
//!                                                 └─> miss / building ───> walker
//!                                                          │
//!                                          (one caller) compiler ──> install
//! ```
//!
//! *   [`DumpWriter`]: indentation-aware, length-bounded text sink.
//! *   [`CycleRegistry`]: visited-object tracker, one per top-level call.
//! *   [`TypeDescriptorResolver`]: effective configuration and member order.
//! *   [`ProcedureCache`]: thread-safe, compile-once store of procedures.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use graphdump::{Dumpable, Dumper};
//!
//! #[derive(Dumpable)]
//! struct Order {
//!     id: u32,
//!     #[dump(order = -1)]
//!     note: Option<String>,
//!     lines: Vec<String>,
//! }
//!
//! let order = Order {
//!     id: 7,
//!     note: None,
//!     lines: vec!["apple".into()],
//! };
//! let text = Dumper::new().dump(&order).unwrap();
//! assert!(text.starts_with("Order ("));
//! assert!(text.contains("id = 7"));
//! assert!(text.contains("note = <null>"));
//! ```
//!
//! ### Safety and Error Handling
//!
//! * **No Unsafe:** the crate forbids `unsafe` code.
//! * **No Panics:** No `unwrap()` or `panic!()` calls in the library (enforced by clippy lints).
//! * **Recovered Access Errors:** a failing member read is embedded in the
//!   output as `<error: ...>`; only programming errors surface as [`DumpError`].

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// --- PUBLIC API MODULES ---
pub mod api;
pub mod cache;
pub mod config;
pub mod cycle;
pub mod error;
pub mod format;
pub mod formatter;
pub mod inspector;
pub mod resolver;
pub mod types;
pub mod value;
pub mod visitor;

// --- INTERNAL IMPLEMENTATION MODULES (Hidden from Docs) ---
#[doc(hidden)]
pub mod graph;
#[doc(hidden)]
pub mod io;

mod compiler;
mod executor;
mod render;
mod sync;
mod visitor_impls;
mod walker;

// --- MACRO SUPPORT MODULES ---

/// Runtime utilities used by the derived code.
#[doc(hidden)]
pub mod rt;

// --- RE-EXPORTS ---

pub use api::{DumpOptions, Dumper, DumperBuilder};
pub use cache::{Lookup, ProcedureCache};
pub use config::{
    DEFAULT_LABEL_FORMAT, DEFAULT_MAX_DEPTH, FormatterRef, MemberDumpConfig, MemberFilter,
    NullPolicy, RecursePolicy, TypeDumpConfig,
};
pub use cycle::CycleRegistry;
pub use error::{AccessError, DumpError, MemberValue, Result};
pub use formatter::{FormatterRegistry, ValueFormatter};
pub use graph::{CacheKey, CompiledProcedure, ObjectId, Step};
pub use inspector::{CacheReport, ProcedureInspector};
pub use io::DumpWriter;
pub use resolver::TypeDescriptorResolver;
pub use types::{MemberDescriptor, MemberKind, TypeInfo, TypeInfoBuilder, TypeName, Visibility};
pub use value::{Scalar, Value};
pub use visitor::{DumpMap, DumpObject, DumpSequence, DumpType, Dumpable};

// Re-export the derive macro so it is accessible as `graphdump::Dumpable`
pub use graphdump_derive::Dumpable;
