//! Declarative field configuration documents.
//!
//! A [`FieldsConfig`] is the YAML form of a sequence of registry calls for
//! one model:
//!
//! ```yaml
//! fields:
//!   - name: name
//!     label: Full name
//!   - name: notes
//!     type: string
//!     add_to_section: false
//! include: [team]
//! exclude: [id]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::Result;
use crate::field::FieldConfig;
use crate::registry::{Configurator, FieldRegistry};

fn default_true() -> bool {
    true
}

/// One field declaration in a configuration document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDeclaration {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// `false` declares the field without adding it to the active set.
    #[serde(default = "default_true")]
    pub add_to_section: bool,
}

impl FieldDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_: None,
            label: None,
            help: None,
            order: None,
            hidden: None,
            read_only: None,
            sortable: None,
            searchable: None,
            visible: None,
            add_to_section: true,
        }
    }

    fn has_options(&self) -> bool {
        self.label.is_some()
            || self.help.is_some()
            || self.order.is_some()
            || self.hidden.is_some()
            || self.read_only.is_some()
            || self.sortable.is_some()
            || self.searchable.is_some()
            || self.visible.is_some()
    }

    /// Apply the presentation options to `field`.
    pub fn configure(&self, field: &mut FieldConfig) {
        if let Some(label) = &self.label {
            field.set_label(label.as_str());
        }
        if let Some(help) = &self.help {
            field.set_help(help.as_str());
        }
        if let Some(order) = self.order {
            field.set_order(order);
        }
        match self.hidden {
            Some(true) => {
                field.hide();
            }
            Some(false) => {
                field.show();
            }
            None => {}
        }
        if let Some(read_only) = self.read_only {
            field.set_read_only(read_only);
        }
        if let Some(sortable) = self.sortable {
            field.set_sortable(sortable);
        }
        if let Some(searchable) = self.searchable {
            field.set_searchable(searchable);
        }
        if let Some(visible) = self.visible {
            field.set_visible(visible);
        }
    }
}

/// Field configuration for one model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldsConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDeclaration>,
    #[serde(default)]
    pub include_all: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl FieldsConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a configuration document from a YAML file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).await?;
        Self::from_yaml(&content)
    }

    /// Run the document against `registry`: declarations in document order,
    /// then `include_all`, `include`, and `exclude`.
    pub fn apply(&self, registry: &mut FieldRegistry) -> Result<()> {
        for declaration in &self.fields {
            let mut configure = |field: &mut FieldConfig| -> Result<()> {
                declaration.configure(field);
                Ok(())
            };
            let configurator: Option<&mut Configurator<'_>> = if declaration.has_options() {
                Some(&mut configure)
            } else {
                None
            };
            registry.declare(
                &declaration.name,
                declaration.type_.as_deref(),
                declaration.add_to_section,
                configurator,
            )?;
        }
        if self.include_all {
            registry.include_all_fields();
        }
        if !self.include.is_empty() {
            let names: Vec<&str> = self.include.iter().map(String::as_str).collect();
            registry.include_fields(&names);
        }
        if !self.exclude.is_empty() {
            let names: Vec<&str> = self.exclude.iter().map(String::as_str).collect();
            registry.exclude_fields(&names);
        }
        debug!(
            model = %registry.source().model_name(),
            declarations = self.fields.len(),
            "applied field configuration"
        );
        Ok(())
    }
}
