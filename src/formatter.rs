//! Pluggable external formatters.
//!
//! A member configured with a [`FormatterRef`] is rendered by a formatter looked
//! up in the [`FormatterRegistry`] instead of by the walker. Formatters are keyed
//! by owner type name and formatter name; when a reference names no owner, the
//! value's own type name is used.

use crate::config::FormatterRef;
use crate::error::{DumpError, Result};
use crate::format;
use crate::sync::FastMap;
use crate::value::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Interface for external formatters.
pub trait ValueFormatter: Send + Sync + fmt::Debug {
    /// Renders `value` as a single piece of text.
    fn format(&self, value: &Value<'_>) -> String;
}

/// A formatter backed by a closure.
struct FnFormatter<F> {
    name: String,
    f: F,
}

impl<F> fmt::Debug for FnFormatter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFormatter").field("name", &self.name).finish()
    }
}

impl<F> ValueFormatter for FnFormatter<F>
where
    F: Fn(&Value<'_>) -> String + Send + Sync,
{
    fn format(&self, value: &Value<'_>) -> String {
        (self.f)(value)
    }
}

/// Registry of external formatters.
#[derive(Debug, Default, Clone)]
pub struct FormatterRegistry {
    formatters: FastMap<(String, String), Arc<dyn ValueFormatter>>,
}

impl FormatterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a formatter under `owner` (a fully qualified type name) and
    /// `name`. An existing entry with the same key is replaced.
    pub fn register<F>(&mut self, owner: impl Into<String>, name: impl Into<String>, f: F)
    where
        F: Fn(&Value<'_>) -> String + Send + Sync + 'static,
    {
        let name = name.into();
        let formatter = FnFormatter {
            name: name.clone(),
            f,
        };
        self.register_formatter(owner, name, Arc::new(formatter));
    }

    /// Registers a formatter implementation.
    pub fn register_formatter(
        &mut self,
        owner: impl Into<String>,
        name: impl Into<String>,
        formatter: Arc<dyn ValueFormatter>,
    ) {
        self.formatters.insert((owner.into(), name.into()), formatter);
    }

    /// Registers a typed formatter owned by `T`.
    ///
    /// The closure receives the object downcast to `T`. Values that are not a
    /// `T` object fall back to their display text.
    pub fn register_for<T, F>(&mut self, name: impl Into<String>, f: F)
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.register(std::any::type_name::<T>(), name, move |value| {
            let typed = match value {
                Value::Object(object) => object.as_any().downcast_ref::<T>(),
                _ => None,
            };
            typed.map_or_else(|| format::display_text(value), &f)
        });
    }

    /// Resolves `reference` for a value of type `value_type`.
    ///
    /// # Errors
    /// `FormatterNotFound` if nothing is registered under the key.
    pub fn resolve(
        &self,
        reference: &FormatterRef,
        value_type: &str,
    ) -> Result<Arc<dyn ValueFormatter>> {
        let owner = reference.owner.as_deref().unwrap_or(value_type);
        self.formatters
            .get(&(owner.to_string(), reference.name.to_string()))
            .cloned()
            .ok_or_else(|| DumpError::FormatterNotFound {
                name: reference.name.to_string(),
                owner: owner.to_string(),
            })
    }

    /// Returns true if a formatter is registered under the key.
    pub fn contains(&self, owner: &str, name: &str) -> bool {
        self.formatters
            .contains_key(&(owner.to_string(), name.to_string()))
    }

    /// Number of registered formatters.
    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}
