//! Per-type and per-member dump configuration.
//!
//! Configuration is plain data: it is attached to [`TypeInfo`](crate::TypeInfo)
//! and [`MemberDescriptor`](crate::MemberDescriptor) values at registration time
//! (by hand or through `#[derive(Dumpable)]`) and resolved lazily by the
//! [`TypeDescriptorResolver`](crate::TypeDescriptorResolver).

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The default recursion depth for a top-level call.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// The label template used when a member does not configure one.
pub const DEFAULT_LABEL_FORMAT: &str = "{name} = ";

/// Whether members holding a null/absent value are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NullPolicy {
    /// Render the member with a null marker.
    #[default]
    Dump,
    /// Omit the member entirely.
    Skip,
}

/// Whether nested objects are expanded member by member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecursePolicy {
    /// Walk into the nested object.
    #[default]
    Dump,
    /// Render the nested object as a leaf.
    Skip,
}

/// Configuration attached to a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDumpConfig {
    /// Default null policy for the type's members.
    pub null_values: NullPolicy,
    /// Whether instances of the type are expanded when met as nested values.
    pub recurse: RecursePolicy,
    /// Member rendered in place of the whole instance when `recurse` is `Skip`.
    pub default_property: Option<Cow<'static, str>>,
    /// Maximum object nesting for a call rooted at this type.
    pub max_depth: usize,
    /// Default cap on rendered collection entries for the type's members.
    pub max_entries: Option<usize>,
}

impl Default for TypeDumpConfig {
    fn default() -> Self {
        Self {
            null_values: NullPolicy::Dump,
            recurse: RecursePolicy::Dump,
            default_property: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_entries: None,
        }
    }
}

impl TypeDumpConfig {
    /// Omits null members by default.
    pub fn skip_nulls(mut self) -> Self {
        self.null_values = NullPolicy::Skip;
        self
    }

    /// Sets the null policy.
    pub fn null_values(mut self, policy: NullPolicy) -> Self {
        self.null_values = policy;
        self
    }

    /// Sets the recursion policy.
    pub fn recurse(mut self, policy: RecursePolicy) -> Self {
        self.recurse = policy;
        self
    }

    /// Renders the named member instead of recursing into instances.
    pub fn default_property(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.recurse = RecursePolicy::Skip;
        self.default_property = Some(name.into());
        self
    }

    /// Sets the maximum nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Caps collection members at `max` rendered entries.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }
}

/// Reference to an external formatter, resolved through the
/// [`FormatterRegistry`](crate::FormatterRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatterRef {
    /// Registered formatter name.
    pub name: Cow<'static, str>,
    /// Owner type name; when absent the value's own type is used.
    pub owner: Option<Cow<'static, str>>,
}

impl FormatterRef {
    /// A formatter looked up on the value's own type.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            owner: None,
        }
    }

    /// A formatter looked up on an explicit owner type.
    pub fn owned_by(name: impl Into<Cow<'static, str>>, owner: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            owner: Some(owner.into()),
        }
    }
}

/// Configuration attached to a member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberDumpConfig {
    /// Signed order weight. Negative weights sort after the ancestor levels.
    pub order: i32,
    /// Never render the member.
    pub skip: bool,
    /// Null policy; `None` inherits the type's policy.
    pub null_values: Option<NullPolicy>,
    /// Recursion policy for object values; `None` means recurse.
    pub recurse: Option<RecursePolicy>,
    /// Label template; `{name}` is replaced with the member name.
    pub label: Option<Cow<'static, str>>,
    /// Render the value through its display text instead of walking it.
    pub use_display: bool,
    /// External formatter for the value.
    pub formatter: Option<FormatterRef>,
    /// Cap on rendered collection entries; `None` inherits the type's cap.
    pub max_entries: Option<usize>,
    /// Enumerate objects that expose a custom sequence.
    pub enumerate: bool,
}

impl MemberDumpConfig {
    /// Sets the order weight.
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Marks the member as skipped.
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Sets the member's null policy.
    pub fn null_values(mut self, policy: NullPolicy) -> Self {
        self.null_values = Some(policy);
        self
    }

    /// Sets the member's recursion policy.
    pub fn recurse(mut self, policy: RecursePolicy) -> Self {
        self.recurse = Some(policy);
        self
    }

    /// Sets the label template.
    pub fn label(mut self, format: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(format.into());
        self
    }

    /// Renders the value through its display text.
    pub fn use_display(mut self) -> Self {
        self.use_display = true;
        self
    }

    /// Renders the value with an external formatter.
    pub fn formatter(mut self, formatter: FormatterRef) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Caps rendered collection entries.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Enumerates custom sequence objects.
    pub fn enumerate(mut self) -> Self {
        self.enumerate = true;
        self
    }

    /// Expands the label template for `name`.
    pub fn format_label(&self, name: &str) -> String {
        self.label
            .as_deref()
            .unwrap_or(DEFAULT_LABEL_FORMAT)
            .replace("{name}", name)
    }
}

/// Selects which members take part in a dump. Part of the procedure cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberFilter {
    /// Include fields.
    pub fields: bool,
    /// Include properties.
    pub properties: bool,
    /// Include non-public members.
    pub non_public: bool,
}

impl Default for MemberFilter {
    fn default() -> Self {
        Self {
            fields: true,
            properties: true,
            non_public: true,
        }
    }
}

impl MemberFilter {
    /// Only public fields and properties.
    pub fn public_only() -> Self {
        Self {
            non_public: false,
            ..Self::default()
        }
    }

    /// Returns true if the member passes the filter.
    pub fn accepts(&self, member: &crate::MemberDescriptor) -> bool {
        let kind_ok = match member.kind() {
            crate::MemberKind::Field => self.fields,
            crate::MemberKind::Property => self.properties,
        };
        kind_ok && (self.non_public || member.visibility() == crate::Visibility::Public)
    }
}
