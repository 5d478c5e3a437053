//! Evaluation context for runtime visibility checks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::field::FieldConfig;

/// Key/value context a field is bound to, typically the current view,
/// object and user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings {
    values: Map<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value of `key`, if bound to a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A field bound to an evaluation context.
///
/// Visibility can depend on per-request state, so callers that need to know
/// whether a field shows get this view rather than the raw entry.
#[derive(Debug, Clone, Copy)]
pub struct BoundField<'f, 'b> {
    field: &'f FieldConfig,
    bindings: &'b Bindings,
}

impl<'f, 'b> BoundField<'f, 'b> {
    pub(crate) fn new(field: &'f FieldConfig, bindings: &'b Bindings) -> Self {
        Self { field, bindings }
    }

    /// The bound entry. Outlives the bindings it was bound to.
    pub fn field(&self) -> &'f FieldConfig {
        self.field
    }

    pub fn bindings(&self) -> &'b Bindings {
        self.bindings
    }

    pub fn name(&self) -> &'f str {
        self.field.name()
    }

    /// Hidden fields never show; otherwise the field's predicate decides,
    /// defaulting to visible.
    pub fn is_visible(&self) -> bool {
        if self.field.is_hidden() {
            return false;
        }
        self.field
            .visibility()
            .is_none_or(|predicate| predicate(self))
    }
}
