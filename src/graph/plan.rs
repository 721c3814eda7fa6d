use crate::config::{
    FormatterRef, MemberDumpConfig, MemberFilter, NullPolicy, RecursePolicy, TypeDumpConfig,
};
use crate::error::{DumpError, Result};
use crate::formatter::{FormatterRegistry, ValueFormatter};
use crate::resolver::{TypeDescriptorResolver, level_metadata};
use crate::types::{MemberDescriptor, TypeInfo};
use std::fmt;
use std::sync::Arc;

/// How a member's value is turned into text.
#[derive(Clone)]
pub enum Renderer {
    /// An external formatter resolved while planning.
    Formatter(Arc<dyn ValueFormatter>),
    /// An external formatter looked up on the value's own type at render time.
    FormatterLookup(FormatterRef),
    /// The value's display text.
    Display,
    /// The value's kind decides: scalar, callable, type, bytes, map, sequence
    /// or nested object.
    Value,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formatter(inner) => write!(f, "Formatter({inner:?})"),
            Self::FormatterLookup(r) => write!(f, "FormatterLookup({})", r.name),
            Self::Display => f.write_str("Display"),
            Self::Value => f.write_str("Value"),
        }
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formatter(_) | Self::FormatterLookup(_) => f.write_str("formatter"),
            Self::Display => f.write_str("display"),
            Self::Value => f.write_str("value"),
        }
    }
}

/// Rendering limits that flow from a member into its value and, for
/// collections, into every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueStyle {
    /// Cap on rendered collection entries.
    pub cap: Option<usize>,
    /// Whether nested objects are expanded.
    pub recurse: bool,
    /// Whether objects exposing a custom sequence are enumerated.
    pub enumerate: bool,
}

impl Default for ValueStyle {
    fn default() -> Self {
        Self {
            cap: None,
            recurse: true,
            enumerate: false,
        }
    }
}

impl ValueStyle {
    /// The style applied to collection entries.
    pub(crate) fn for_entries(self) -> Self {
        Self {
            enumerate: false,
            ..self
        }
    }
}

/// Everything decided about one member before any instance is read.
#[derive(Debug, Clone)]
pub struct MemberPlan {
    /// The member.
    pub member: &'static MemberDescriptor,
    /// Its effective configuration.
    pub config: Arc<MemberDumpConfig>,
    /// The expanded label.
    pub label: String,
    /// Omit the member when its value is null.
    pub skip_null: bool,
    /// How the value is rendered.
    pub renderer: Renderer,
    /// Limits for the value.
    pub style: ValueStyle,
}

/// The members one inheritance level contributes, split around its ancestors.
#[derive(Debug, Clone)]
pub struct LevelPlan {
    /// The level's metadata.
    pub info: &'static TypeInfo,
    /// Members rendered before the ancestor levels (order >= 0).
    pub leading: Vec<MemberPlan>,
    /// Members rendered after the ancestor levels (order < 0).
    pub trailing: Vec<MemberPlan>,
}

/// The resolved view of one object about to be expanded.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Runtime (most derived) type.
    pub info: &'static TypeInfo,
    /// Effective type configuration.
    pub config: Arc<TypeDumpConfig>,
    /// Metadata type of the runtime level.
    pub metadata: Option<&'static TypeInfo>,
}

/// Builds member plans. Shared by the walker and the compiler so both take
/// the same decisions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Planner<'c> {
    pub(crate) resolver: &'c TypeDescriptorResolver,
    pub(crate) formatters: &'c FormatterRegistry,
    pub(crate) filter: MemberFilter,
}

impl Planner<'_> {
    /// Plans level `level` of `frame`'s inheritance chain.
    pub(crate) fn plan_level(
        &self,
        frame: &Frame,
        chain: &[&'static TypeInfo],
        level: usize,
    ) -> Result<LevelPlan> {
        let Some(&info) = chain.get(level) else {
            return Err(DumpError::MissingArgument("inheritance level"));
        };
        let metadata = level_metadata(chain, level, frame.metadata);

        let mut kept = Vec::with_capacity(info.members().len());
        for member in info.members() {
            if !member.is_readable()
                || member.is_indexer()
                || member.is_override()
                || !self.filter.accepts(member)
            {
                continue;
            }
            if self.resolver.member_config(member, metadata).skip {
                continue;
            }
            kept.push(member);
        }

        let ordered = self
            .resolver
            .order_members(frame.info, &kept, frame.metadata)?;

        let mut plan = LevelPlan {
            info,
            leading: Vec::new(),
            trailing: Vec::new(),
        };
        for member in ordered {
            let config = self.resolver.member_config(member, metadata);
            let member_plan = self.plan_member(frame, member, config)?;
            if member_plan.config.order >= 0 {
                plan.leading.push(member_plan);
            } else {
                plan.trailing.push(member_plan);
            }
        }
        Ok(plan)
    }

    fn plan_member(
        &self,
        frame: &Frame,
        member: &'static MemberDescriptor,
        config: Arc<MemberDumpConfig>,
    ) -> Result<MemberPlan> {
        let renderer = match &config.formatter {
            Some(reference) => match &reference.owner {
                Some(owner) => Renderer::Formatter(self.formatters.resolve(reference, owner)?),
                None => Renderer::FormatterLookup(reference.clone()),
            },
            None if config.use_display => Renderer::Display,
            None => Renderer::Value,
        };
        let null_policy = config.null_values.unwrap_or(frame.config.null_values);
        let style = ValueStyle {
            cap: config.max_entries.or(frame.config.max_entries),
            recurse: config.recurse != Some(RecursePolicy::Skip),
            enumerate: config.enumerate,
        };
        Ok(MemberPlan {
            member,
            label: config.format_label(member.name()),
            skip_null: null_policy == NullPolicy::Skip,
            renderer,
            style,
            config,
        })
    }
}
