//! Per-call rendering state and the value renderers shared by the walker and
//! the procedure executor.

use crate::cache::{Lookup, ProcedureCache};
use crate::config::{DEFAULT_MAX_DEPTH, MemberFilter, RecursePolicy, TypeDumpConfig};
use crate::cycle::CycleRegistry;
use crate::error::{AccessError, MemberValue, Result};
use crate::format;
use crate::formatter::FormatterRegistry;
use crate::graph::{Frame, MemberPlan, ObjectId, Planner, Renderer, ValueStyle};
use crate::io::DumpWriter;
use crate::resolver::TypeDescriptorResolver;
use crate::types::{TypeInfo, TypeName};
use crate::value::Value;
use crate::visitor::{DumpMap, DumpObject, DumpSequence, Dumpable};
use crate::{compiler, executor, walker};
use std::fmt;
use std::sync::Arc;

/// How nested objects are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    /// Always walk; never touch the procedure cache.
    Interpret,
    /// Consult the procedure cache, compiling on first sight.
    Cached,
}

/// Overrides applied to the root object only.
#[derive(Debug, Default)]
pub(crate) struct RootOverride {
    pub(crate) declared: Option<&'static TypeInfo>,
    pub(crate) config: Option<TypeDumpConfig>,
}

/// The shared collaborators of a dump.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Engine<'c> {
    pub(crate) resolver: &'c TypeDescriptorResolver,
    pub(crate) formatters: &'c FormatterRegistry,
    pub(crate) cache: &'c ProcedureCache,
}

/// Owned projections kept alive until the call ends.
///
/// Cycle identity is an address. Freeing a computed value mid-call would let
/// the allocator hand its address to an unrelated sibling, which would then
/// look like a revisit.
#[derive(Default)]
struct Retained(Vec<Box<dyn Dumpable>>);

impl fmt::Debug for Retained {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Retained({})", self.0.len())
    }
}

/// State owned by one top-level call.
#[derive(Debug)]
pub(crate) struct DumpContext<'c, 'b> {
    pub(crate) engine: Engine<'c>,
    pub(crate) writer: DumpWriter<'b>,
    pub(crate) cycles: CycleRegistry,
    filter: MemberFilter,
    strategy: Strategy,
    remaining: usize,
    root: Option<RootOverride>,
    retained: Retained,
}

/// Returns true if `value` is null once owned projections are unwrapped.
pub(crate) fn projects_null(value: &Value<'_>) -> bool {
    match value {
        Value::Null => true,
        Value::Boxed(boxed) => projects_null(&boxed.dump_value()),
        _ => false,
    }
}

impl<'c, 'b> DumpContext<'c, 'b> {
    pub(crate) fn new(
        engine: Engine<'c>,
        writer: DumpWriter<'b>,
        filter: MemberFilter,
        strategy: Strategy,
        root: RootOverride,
    ) -> Self {
        let remaining = root
            .config
            .as_ref()
            .map_or(DEFAULT_MAX_DEPTH, |config| config.max_depth);
        Self {
            engine,
            writer,
            cycles: CycleRegistry::new(),
            filter,
            strategy,
            remaining,
            root: Some(root),
            retained: Retained::default(),
        }
    }

    /// Applies `f` to `value` with owned projections unwrapped. Each unwrapped
    /// projection is retained for the rest of the call.
    fn with_projected(
        &mut self,
        value: Value<'_>,
        f: impl FnOnce(&mut Self, Value<'_>) -> Result<()>,
    ) -> Result<()> {
        match value {
            Value::Boxed(boxed) => {
                let result = self.with_projected(boxed.dump_value(), f);
                self.retained.0.push(boxed);
                result
            }
            other => f(self, other),
        }
    }

    pub(crate) fn planner(&self) -> Planner<'c> {
        Planner {
            resolver: self.engine.resolver,
            formatters: self.engine.formatters,
            filter: self.filter,
        }
    }

    /// Renders the top-level value.
    pub(crate) fn render_root(&mut self, value: Value<'_>) -> Result<()> {
        self.with_projected(value, |ctx, value| {
            if !matches!(value, Value::Object(_)) {
                ctx.root = None;
            }
            let style = ValueStyle {
                cap: ctx
                    .root
                    .as_ref()
                    .and_then(|root| root.config.as_ref())
                    .and_then(|config| config.max_entries),
                ..ValueStyle::default()
            };
            ctx.render_value(value, style)
        })
    }

    /// Renders any value by kind.
    pub(crate) fn render_value(&mut self, value: Value<'_>, style: ValueStyle) -> Result<()> {
        match value {
            Value::Null => self.writer.write_text(format::NULL_MARKER),
            Value::Scalar(s) | Value::Nullable(s) => {
                self.writer.write_text(&format::scalar_text(&s));
            }
            Value::Callable(signature) => {
                self.writer.write_text(&format::callable_text(signature));
            }
            Value::Type(name) => self.writer.write_text(&format::type_descriptor_text(name)),
            Value::Bytes(bytes) => self.render_bytes(TypeName::of::<[u8]>(), bytes, style.cap),
            Value::Map(map) => return self.render_map(map, style),
            Value::Sequence(seq) => match seq.as_bytes() {
                Some(bytes) => self.render_bytes(seq.type_name(), bytes, style.cap),
                None => return self.render_sequence(seq, style),
            },
            Value::Object(object) => {
                if style.enumerate
                    && let Some(seq) = object.as_sequence()
                {
                    return self.render_sequence(seq, style);
                }
                if !style.recurse {
                    self.writer.write_text(&format::leaf_text(object));
                    return Ok(());
                }
                return self.enter_object(object);
            }
            Value::Boxed(boxed) => {
                return self.with_projected(Value::Boxed(boxed), |ctx, value| {
                    ctx.render_value(value, style)
                });
            }
        }
        Ok(())
    }

    /// Renders one member: read, null policy, label, value.
    pub(crate) fn render_member(&mut self, object: &dyn DumpObject, plan: &MemberPlan) -> Result<()> {
        let read = object.read_member(plan.member);
        if plan.skip_null
            && let Some(Ok(value)) = &read
            && projects_null(value)
        {
            return Ok(());
        }
        self.write_label(plan);
        self.render_read(object, plan, read)
    }

    /// Renders the outcome of a member read after its label. Failed reads are
    /// embedded as error text.
    pub(crate) fn render_read(
        &mut self,
        object: &dyn DumpObject,
        plan: &MemberPlan,
        read: Option<MemberValue<'_>>,
    ) -> Result<()> {
        match read {
            None => {
                let error = AccessError::missing_member(
                    plan.member.name(),
                    object.type_info().name().full(),
                );
                self.writer.write_text(&format::error_text(error.message()));
                Ok(())
            }
            Some(Err(error)) => {
                self.writer.write_text(&format::error_text(error.message()));
                Ok(())
            }
            Some(Ok(value)) => {
                self.with_projected(value, |ctx, value| ctx.render_member_value(plan, value))
            }
        }
    }

    pub(crate) fn write_label(&mut self, plan: &MemberPlan) {
        self.writer.newline();
        self.writer.write_text(&plan.label);
    }

    /// Renders a member's (already projected) value with its renderer.
    pub(crate) fn render_member_value(&mut self, plan: &MemberPlan, value: Value<'_>) -> Result<()> {
        if value.is_null() {
            self.writer.write_text(format::NULL_MARKER);
            return Ok(());
        }
        match &plan.renderer {
            Renderer::Formatter(formatter) => {
                self.writer.write_text(&formatter.format(&value));
            }
            Renderer::FormatterLookup(reference) => {
                let formatter = self
                    .engine
                    .formatters
                    .resolve(reference, &value.type_name())?;
                self.writer.write_text(&formatter.format(&value));
            }
            Renderer::Display => self.writer.write_text(&format::display_text(&value)),
            Renderer::Value => return self.render_value(value, plan.style),
        }
        Ok(())
    }

    fn render_bytes(&mut self, name: TypeName, bytes: &[u8], cap: Option<usize>) {
        let shown = cap.map_or(bytes.len(), |cap| cap.min(bytes.len()));
        self.writer
            .write_text(&format::collection_header(name, bytes.len()));
        if !bytes.is_empty() {
            self.writer.write_text(" ");
            self.writer.write_text(&format::hex_dump(&bytes[..shown]));
        }
        if shown < bytes.len() {
            self.writer.write_text(" ");
            self.writer
                .write_text(&format::collection_truncated(shown, bytes.len()));
        }
    }

    fn render_sequence(&mut self, seq: &dyn DumpSequence, style: ValueStyle) -> Result<()> {
        let count = seq.len();
        self.writer
            .write_text(&format::collection_header(seq.type_name(), count));
        self.writer.indent();
        let entry_style = style.for_entries();
        let mut rendered = 0;
        for entry in seq.entries() {
            if style.cap.is_some_and(|cap| rendered >= cap) {
                break;
            }
            self.writer.newline();
            self.render_value(entry, entry_style)?;
            rendered += 1;
        }
        if rendered < count {
            self.writer.newline();
            self.writer
                .write_text(&format::collection_truncated(rendered, count));
        }
        self.writer.unindent();
        Ok(())
    }

    fn render_map(&mut self, map: &dyn DumpMap, style: ValueStyle) -> Result<()> {
        let count = map.len();
        self.writer
            .write_text(&format::collection_header(map.type_name(), count));
        self.writer.indent();
        let entry_style = style.for_entries();
        let mut rendered = 0;
        for (key, value) in map.entries() {
            if style.cap.is_some_and(|cap| rendered >= cap) {
                break;
            }
            self.writer.newline();
            self.writer.write_text("[");
            self.render_value(key, entry_style)?;
            self.writer.write_text("] = ");
            self.render_value(value, entry_style)?;
            rendered += 1;
        }
        if rendered < count {
            self.writer.newline();
            self.writer
                .write_text(&format::collection_truncated(rendered, count));
        }
        self.writer.unindent();
        Ok(())
    }

    /// Expands a nested object: cycle check, depth, recursion policy, then the
    /// body through the walker or a compiled procedure.
    pub(crate) fn enter_object(&mut self, object: &dyn DumpObject) -> Result<()> {
        let Some(frame) = self.prelude(object)? else {
            return Ok(());
        };
        self.remaining -= 1;
        let result = match self.strategy {
            Strategy::Interpret => walker::walk(self, object, &frame),
            Strategy::Cached => self.dispatch(object, &frame),
        };
        self.remaining += 1;
        result
    }

    /// Resolves the frame and handles every case that does not expand the
    /// object. Returns `None` when the object was fully rendered.
    fn prelude(&mut self, object: &dyn DumpObject) -> Result<Option<Frame>> {
        let id = ObjectId::of(object);
        if let Some(id) = &id
            && let Some(label) = self.cycles.contains(id)
        {
            self.writer.write_text(&format::cyclic_marker(label));
            return Ok(None);
        }

        let info = object.type_info();
        let root = self.root.take();
        let is_root = root.is_some();
        let frame = match root {
            Some(root) => {
                let metadata = root.declared.or_else(|| info.metadata());
                let config = match root.config {
                    Some(config) => Arc::new(config),
                    None => self.engine.resolver.type_config(info, metadata),
                };
                self.remaining = config.max_depth;
                Frame {
                    info,
                    config,
                    metadata,
                }
            }
            None => {
                let metadata = info.metadata();
                Frame {
                    info,
                    config: self.engine.resolver.type_config(info, metadata),
                    metadata,
                }
            }
        };

        if self.remaining == 0 {
            self.writer.write_text(&format::leaf_text(object));
            return Ok(None);
        }
        if !is_root && frame.config.recurse == RecursePolicy::Skip {
            self.render_default_property(object, &frame)?;
            return Ok(None);
        }
        if let Some(id) = id {
            self.cycles.add(id, &info.name().short());
        }
        Ok(Some(frame))
    }

    fn render_default_property(&mut self, object: &dyn DumpObject, frame: &Frame) -> Result<()> {
        let member = frame
            .config
            .default_property
            .as_deref()
            .and_then(|name| frame.info.find_member(name));
        let read = member.and_then(|member| object.read_member(member));
        match read {
            Some(Ok(value)) => self.render_value(value, ValueStyle::default()),
            Some(Err(error)) => {
                self.writer.write_text(&format::error_text(error.message()));
                Ok(())
            }
            None => {
                self.writer.write_text(&format::leaf_text(object));
                Ok(())
            }
        }
    }

    /// Runs the cached procedure for the frame, compiling it on first sight.
    fn dispatch(&mut self, object: &dyn DumpObject, frame: &Frame) -> Result<()> {
        let cache = self.engine.cache;
        let key = crate::graph::CacheKey::new(frame.info, &frame.config, frame.metadata, self.filter);
        match cache.try_find(&key) {
            Lookup::Found(procedure) => return executor::run(self, object, &procedure),
            Lookup::Building => {
                tracing::trace!(key = %key, "procedure is compiling; walking instead");
            }
            Lookup::Miss => {
                if cache.mark_building(&key) {
                    match compiler::compile(self.planner(), frame, key.clone()) {
                        Ok(procedure) => {
                            // A concurrent reset dropped our building marker.
                            if let Err(error) = cache.install(key, procedure) {
                                tracing::debug!(%error, "discarding procedure compiled across a reset");
                            }
                        }
                        Err(error) => {
                            tracing::warn!(key = %key, %error, "abandoning procedure compilation");
                            cache.abandon(&key);
                            return Err(error);
                        }
                    }
                }
            }
        }
        walker::walk(self, object, frame)
    }
}
