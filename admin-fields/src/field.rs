//! A single field configuration entry.
//!
//! Identity (`name`, `field_type`, `properties`) is fixed at construction;
//! everything a configurator may change is reached through setters.

use std::fmt;
use std::sync::Arc;

use ulid::Ulid;

use crate::bindings::{Bindings, BoundField};
use crate::types::PropertyInfo;

/// Runtime visibility test evaluated against a bound field.
pub type VisibilityPredicate = Arc<dyn Fn(&BoundField<'_, '_>) -> bool + Send + Sync>;

/// Configuration for how one model attribute is represented and edited.
#[derive(Clone)]
pub struct FieldConfig {
    id: Ulid,
    name: String,
    field_type: String,
    properties: Option<PropertyInfo>,
    order: i32,
    defined: bool,
    hidden: bool,
    label: Option<String>,
    help: Option<String>,
    read_only: bool,
    sortable: bool,
    searchable: bool,
    visibility: Option<VisibilityPredicate>,
}

impl FieldConfig {
    /// Create an entry with neutral defaults. Field kinds adjust the
    /// defaults before handing the entry to the registry.
    pub fn new(
        name: impl Into<String>,
        field_type: impl Into<String>,
        properties: Option<PropertyInfo>,
    ) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            field_type: field_type.into(),
            properties,
            order: 0,
            defined: false,
            hidden: false,
            label: None,
            help: None,
            read_only: false,
            sortable: true,
            searchable: true,
            visibility: None,
        }
    }

    /// Identity of this entry. A replaced field gets a new id.
    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &str {
        &self.field_type
    }

    /// Native property metadata, if the model has a property of this name.
    pub fn properties(&self) -> Option<&PropertyInfo> {
        self.properties.as_ref()
    }

    /// True when no native property backs this field.
    pub fn is_virtual(&self) -> bool {
        self.properties.is_none()
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn set_order(&mut self, order: i32) -> &mut Self {
        self.order = order;
        self
    }

    pub fn is_defined(&self) -> bool {
        self.defined
    }

    pub fn set_defined(&mut self, defined: bool) -> &mut Self {
        self.defined = defined;
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn hide(&mut self) -> &mut Self {
        self.hidden = true;
        self
    }

    pub fn show(&mut self) -> &mut Self {
        self.hidden = false;
        self
    }

    /// Display label; falls back to the humanized field name.
    pub fn label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| humanize(&self.name))
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = Some(label.into());
        self
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn set_help(&mut self, help: impl Into<String>) -> &mut Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) -> &mut Self {
        self.read_only = read_only;
        self
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn set_sortable(&mut self, sortable: bool) -> &mut Self {
        self.sortable = sortable;
        self
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    pub fn set_searchable(&mut self, searchable: bool) -> &mut Self {
        self.searchable = searchable;
        self
    }

    /// Show the field only when `predicate` holds for the bound field.
    pub fn visible_if<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&BoundField<'_, '_>) -> bool + Send + Sync + 'static,
    {
        self.visibility = Some(Arc::new(predicate));
        self
    }

    /// Fix visibility regardless of context.
    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.visible_if(move |_| visible)
    }

    pub(crate) fn visibility(&self) -> Option<&VisibilityPredicate> {
        self.visibility.as_ref()
    }

    /// Bind this entry to an evaluation context.
    pub fn bind<'b>(&self, bindings: &'b Bindings) -> BoundField<'_, 'b> {
        BoundField::new(self, bindings)
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("order", &self.order)
            .field("defined", &self.defined)
            .field("hidden", &self.hidden)
            .field("virtual", &self.is_virtual())
            .field("label", &self.label)
            .field("read_only", &self.read_only)
            .field("visibility", &self.visibility.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

/// `team_id` -> `Team`, `born_on` -> `Born on`.
fn humanize(name: &str) -> String {
    let trimmed = name.strip_suffix("_id").unwrap_or(name);
    let spaced = trimmed.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
