//! The public entry point.
//!
//! A [`Dumper`] owns the long-lived collaborators of dumping: the type
//! descriptor resolver, the formatter registry and the procedure cache. Every
//! call gets a fresh writer and cycle registry, so one dumper can be shared
//! freely across threads.
//!
//! ```rust
//! use graphdump::{DumpOptions, Dumpable, Dumper};
//!
//! #[derive(Dumpable)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let dumper = Dumper::builder().indent("    ").build();
//! let text = dumper.dump_with(&Point { x: 1, y: 2 }, &DumpOptions::new())?;
//! assert!(text.contains("\n    x = 1"));
//! # Ok::<(), graphdump::DumpError>(())
//! ```

use crate::cache::ProcedureCache;
use crate::config::{MemberFilter, TypeDumpConfig};
use crate::error::Result;
use crate::formatter::FormatterRegistry;
use crate::io::{DEFAULT_INDENT, DumpWriter};
use crate::render::{DumpContext, Engine, RootOverride, Strategy};
use crate::resolver::TypeDescriptorResolver;
use crate::types::TypeInfo;
use crate::visitor::{DumpType, Dumpable};
use rayon::prelude::*;
use std::borrow::Cow;

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    /// Declared type of the root. Its member configuration overrides the
    /// runtime type's, the same way a metadata type does.
    pub declared: Option<&'static TypeInfo>,
    /// Replaces the root object's type configuration.
    pub config: Option<TypeDumpConfig>,
    /// Selects which members take part.
    pub filter: MemberFilter,
}

impl DumpOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `T` as the declared type of the root.
    pub fn declared<T: DumpType>(mut self) -> Self {
        self.declared = Some(T::static_type_info());
        self
    }

    /// Uses `info` as the declared type of the root.
    pub fn declared_info(mut self, info: &'static TypeInfo) -> Self {
        self.declared = Some(info);
        self
    }

    /// Replaces the root's type configuration.
    pub fn config(mut self, config: TypeDumpConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the member filter.
    pub fn filter(mut self, filter: MemberFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// The main entry point for dumping.
///
/// A `Dumper` owns the resolver and procedure caches. It is `Sync`: share one
/// instance between threads and every thread benefits from procedures
/// compiled by the others.
#[derive(Debug)]
pub struct Dumper {
    resolver: TypeDescriptorResolver,
    cache: ProcedureCache,
    formatters: FormatterRegistry,
    indent: Cow<'static, str>,
    max_length: Option<usize>,
}

impl Default for Dumper {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Dumper {
    /// A dumper with default settings and no formatters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts configuring a dumper.
    pub fn builder() -> DumperBuilder {
        DumperBuilder::default()
    }

    /// Dumps `value` with default options.
    ///
    /// # Errors
    /// Only programming errors (see [`DumpError`](crate::DumpError)). Member
    /// access failures are embedded in the text.
    pub fn dump(&self, value: &dyn Dumpable) -> Result<String> {
        self.dump_with(value, &DumpOptions::default())
    }

    /// Dumps `value` with explicit options.
    pub fn dump_with(&self, value: &dyn Dumpable, options: &DumpOptions) -> Result<String> {
        let writer = self.writer(DumpWriter::new());
        self.run(value, options, writer, Strategy::Cached)
            .map(DumpWriter::into_string)
    }

    /// Dumps `value`, appending to `buffer`.
    pub fn dump_into(
        &self,
        value: &dyn Dumpable,
        options: &DumpOptions,
        buffer: &mut String,
    ) -> Result<()> {
        let writer = self.writer(DumpWriter::with_buffer(buffer));
        self.run(value, options, writer, Strategy::Cached)
            .map(|_| ())
    }

    /// Dumps `value` with the reference walker only. The procedure cache is
    /// neither read nor populated.
    pub fn dump_interpreted(&self, value: &dyn Dumpable, options: &DumpOptions) -> Result<String> {
        let writer = self.writer(DumpWriter::new());
        self.run(value, options, writer, Strategy::Interpret)
            .map(DumpWriter::into_string)
    }

    /// Dumps every value in parallel. Each value gets its own cycle registry
    /// and writer; compiled procedures are shared.
    pub fn dump_batch<T: Dumpable + Sync>(&self, values: &[T]) -> Vec<Result<String>> {
        values.par_iter().map(|value| self.dump(value)).collect()
    }

    /// The procedure cache.
    pub fn cache(&self) -> &ProcedureCache {
        &self.cache
    }

    /// The configuration resolver.
    pub fn resolver(&self) -> &TypeDescriptorResolver {
        &self.resolver
    }

    /// The formatter registry.
    pub fn formatters(&self) -> &FormatterRegistry {
        &self.formatters
    }

    /// Drops every compiled procedure and cached configuration.
    pub fn reset(&self) {
        self.cache.reset();
        self.resolver.reset();
    }

    fn writer<'b>(&self, writer: DumpWriter<'b>) -> DumpWriter<'b> {
        writer
            .indent_unit(self.indent.clone())
            .max_length(self.max_length)
    }

    fn run<'b>(
        &self,
        value: &dyn Dumpable,
        options: &DumpOptions,
        writer: DumpWriter<'b>,
        strategy: Strategy,
    ) -> Result<DumpWriter<'b>> {
        let engine = Engine {
            resolver: &self.resolver,
            formatters: &self.formatters,
            cache: &self.cache,
        };
        let root = RootOverride {
            declared: options.declared,
            config: options.config.clone(),
        };
        let mut ctx = DumpContext::new(engine, writer, options.filter, strategy, root);
        let result = ctx.render_root(value.dump_value());
        ctx.writer.close();
        result?;
        Ok(ctx.writer)
    }
}

/// Builder for [`Dumper`].
#[derive(Debug)]
pub struct DumperBuilder {
    indent: Cow<'static, str>,
    max_length: Option<usize>,
    formatters: FormatterRegistry,
}

impl Default for DumperBuilder {
    fn default() -> Self {
        Self {
            indent: Cow::Borrowed(DEFAULT_INDENT),
            max_length: None,
            formatters: FormatterRegistry::new(),
        }
    }
}

impl DumperBuilder {
    /// Sets the indentation unit.
    pub fn indent(mut self, unit: impl Into<Cow<'static, str>>) -> Self {
        self.indent = unit.into();
        self
    }

    /// Caps every dump at `max` characters (plus one truncation notice).
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Uses `formatters` for members configured with an external formatter.
    pub fn formatters(mut self, formatters: FormatterRegistry) -> Self {
        self.formatters = formatters;
        self
    }

    /// Finishes the dumper.
    pub fn build(self) -> Dumper {
        Dumper {
            resolver: TypeDescriptorResolver::new(),
            cache: ProcedureCache::new(),
            formatters: self.formatters,
            indent: self.indent,
            max_length: self.max_length,
        }
    }
}
