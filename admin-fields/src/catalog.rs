//! Field-type catalog: maps a type tag to the representation that builds
//! entries of that type.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::field::FieldConfig;
use crate::types::PropertyInfo;

/// Type tag used for virtual fields declared without a type.
pub const VIRTUAL_FIELD_TYPE: &str = "string";

/// A field representation. New kinds register in a [`FieldTypeCatalog`]
/// under their type tag.
pub trait FieldKind: Send + Sync {
    /// The tag this kind is registered under.
    fn type_name(&self) -> &str;

    /// Construct a fresh, undefined entry for `name`.
    fn build(&self, name: &str, properties: Option<PropertyInfo>) -> FieldConfig {
        FieldConfig::new(name, self.type_name(), properties)
    }
}

/// Scalar column types (`string`, `date`, ...).
///
/// Foreign-key columns come up hidden: the association field next to them
/// is the one meant for display.
#[derive(Debug, Clone)]
pub struct ScalarKind {
    type_name: String,
    sortable: bool,
    searchable: bool,
}

impl ScalarKind {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            sortable: true,
            searchable: true,
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }
}

impl FieldKind for ScalarKind {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn build(&self, name: &str, properties: Option<PropertyInfo>) -> FieldConfig {
        let foreign_key = properties.as_ref().is_some_and(|p| p.foreign_key);
        let mut field = FieldConfig::new(name, self.type_name.as_str(), properties);
        field
            .set_sortable(self.sortable)
            .set_searchable(self.searchable);
        if foreign_key {
            field.hide();
        }
        field
    }
}

/// Association types. Neither sortable nor searchable on their own column.
#[derive(Debug, Clone)]
pub struct AssociationKind {
    type_name: String,
}

impl AssociationKind {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl FieldKind for AssociationKind {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn build(&self, name: &str, properties: Option<PropertyInfo>) -> FieldConfig {
        let mut field = FieldConfig::new(name, self.type_name.as_str(), properties);
        field.set_sortable(false).set_searchable(false);
        field
    }
}

/// Registry of field kinds by type tag.
#[derive(Clone, Default)]
pub struct FieldTypeCatalog {
    kinds: HashMap<String, Arc<dyn FieldKind>>,
}

impl FieldTypeCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog with every built-in kind registered.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for type_name in [
            "string", "text", "integer", "float", "decimal", "boolean", "date", "datetime",
            "time", "enum", "color",
        ] {
            catalog.insert(ScalarKind::new(type_name));
        }
        catalog.insert(ScalarKind::new("password").sortable(false).searchable(false));
        for type_name in [
            "belongs_to_association",
            "has_one_association",
            "has_many_association",
            "has_and_belongs_to_many_association",
        ] {
            catalog.insert(AssociationKind::new(type_name));
        }
        catalog
    }

    /// Register a kind, failing if its tag is already taken.
    pub fn register(&mut self, kind: impl FieldKind + 'static) -> Result<()> {
        if self.contains(kind.type_name()) {
            return Err(FieldsError::DuplicateFieldName {
                name: kind.type_name().to_string(),
            });
        }
        self.insert(kind);
        Ok(())
    }

    /// Register a kind, replacing any existing kind with the same tag.
    pub fn insert(&mut self, kind: impl FieldKind + 'static) {
        let type_name = kind.type_name().to_string();
        debug!(field_type = %type_name, "registered field kind");
        self.kinds.insert(type_name, Arc::new(kind));
    }

    /// Resolve a type tag.
    pub fn resolve(&self, type_name: &str) -> Result<Arc<dyn FieldKind>> {
        self.kinds
            .get(type_name)
            .cloned()
            .ok_or_else(|| FieldsError::UnknownFieldType {
                type_name: type_name.to_string(),
            })
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.kinds.contains_key(type_name)
    }

    /// Registered type tags, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FieldTypeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTypeCatalog")
            .field("kinds", &self.type_names())
            .finish()
    }
}
