//! Model schema types consumed by the field registry.
//!
//! A [`ModelSchema`] is the static description of a model's native
//! attributes. It serializes to/from YAML and implements
//! [`ModelIntrospector`](crate::introspect::ModelIntrospector), so it can seed
//! a registry directly.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::{FieldsError, Result};

/// Metadata for one native model property, as reported by the introspector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyInfo {
    pub name: String,
    /// Declared data type. Doubles as the field-type tag used when seeding.
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Primary key column.
    #[serde(default)]
    pub serial: bool,
    /// Column holding the key of a `belongs_to` association.
    #[serde(default)]
    pub foreign_key: bool,
    /// Target model for association properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_: type_.into(),
            nullable: false,
            length: None,
            serial: false,
            foreign_key: false,
            references: None,
        }
    }

    /// Mark the property as a foreign key column.
    pub fn foreign_key(mut self) -> Self {
        self.foreign_key = true;
        self
    }

    /// Mark the property as an association to `model`.
    pub fn references(mut self, model: impl Into<String>) -> Self {
        self.references = Some(model.into());
        self
    }
}

/// Static schema of a model: its name and native properties in column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSchema {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyInfo>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Add a property to the schema.
    pub fn with_property(mut self, property: PropertyInfo) -> Self {
        self.properties.push(property);
        self
    }

    /// Parse a schema from YAML, rejecting duplicate property names.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let schema: ModelSchema = serde_yaml_ng::from_str(yaml)?;
        schema.check_unique()?;
        Ok(schema)
    }

    /// Load a schema from a YAML file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let schema = Self::from_yaml(&content)?;
        debug!(
            model = %schema.name,
            properties = schema.properties.len(),
            ?path,
            "loaded model schema"
        );
        Ok(schema)
    }

    fn check_unique(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for property in &self.properties {
            if !seen.insert(property.name.as_str()) {
                return Err(FieldsError::DuplicateFieldName {
                    name: property.name.clone(),
                });
            }
        }
        Ok(())
    }
}
