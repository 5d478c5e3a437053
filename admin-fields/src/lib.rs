//! Field registry for model-driven admin interfaces
//!
//! `admin-fields` keeps the field configurations of one model configuration:
//! which attributes are shown, as what type, in which order, and under which
//! conditions. Entries are seeded from the model's native properties and then
//! declared, overridden, included, excluded and re-ordered by the
//! configuration layer.
//!
//! # Architecture
//!
//! - **Registry**: [`FieldRegistry`] owns the entries and resolves the active
//!   list on every query
//! - **Collaborators**: [`ModelIntrospector`] reports native properties,
//!   [`FieldTypeCatalog`] maps type tags to [`FieldKind`]s; [`FieldSource`]
//!   is the narrow seam between them and the registry
//! - **Bindings**: visibility is evaluated on [`BoundField`]s, never on raw
//!   entries
//! - **YAML documents**: [`ModelSchema`] and [`FieldsConfig`] load a model and
//!   its field configuration from disk
//!
//! ```rust
//! use admin_fields::{FieldRegistry, FieldSource, FieldTypeCatalog, ModelSchema, PropertyInfo};
//!
//! let schema = ModelSchema::new("player")
//!     .with_property(PropertyInfo::new("id", "integer"))
//!     .with_property(PropertyInfo::new("name", "string"))
//!     .with_property(PropertyInfo::new("notes", "text"));
//! let source = FieldSource::new(schema, FieldTypeCatalog::with_builtins());
//! let mut registry = FieldRegistry::from_model(source);
//!
//! registry.exclude_fields(&["id"]);
//! let names: Vec<&str> = registry.fields().iter().map(|f| f.name()).collect();
//! assert_eq!(names, ["name", "notes"]);
//! ```

pub mod bindings;
pub mod catalog;
pub mod config;
pub mod error;
pub mod field;
pub mod introspect;
pub mod registry;
pub mod source;
pub mod types;

pub use bindings::{Bindings, BoundField};
pub use catalog::{AssociationKind, FieldKind, FieldTypeCatalog, ScalarKind, VIRTUAL_FIELD_TYPE};
pub use config::{FieldDeclaration, FieldsConfig};
pub use error::{FieldsError, Result};
pub use field::{FieldConfig, VisibilityPredicate};
pub use introspect::ModelIntrospector;
pub use registry::{Configurator, FieldRegistry};
pub use source::FieldSource;
pub use types::{ModelSchema, PropertyInfo};
