//! FieldRegistry: the field configurations of one model configuration.
//!
//! Entries live in an insertion-ordered map keyed by field name. Whether a
//! field is part of the active list, and where, is carried on the entry
//! itself (`defined` and `order`); the active list is computed on every
//! query from that state.

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::bindings::{Bindings, BoundField};
use crate::catalog::VIRTUAL_FIELD_TYPE;
use crate::error::{FieldsError, Result};
use crate::field::FieldConfig;
use crate::source::FieldSource;

/// A caller-supplied mutation applied to one field.
pub type Configurator<'a> = dyn FnMut(&mut FieldConfig) -> Result<()> + 'a;

/// Ordered, de-duplicated field configurations for one model.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    source: FieldSource,
    fields: IndexMap<String, FieldConfig>,
    bindings: Bindings,
}

impl FieldRegistry {
    /// An empty registry.
    pub fn new(source: FieldSource) -> Self {
        Self {
            source,
            fields: IndexMap::new(),
            bindings: Bindings::new(),
        }
    }

    /// A registry seeded with one undefined entry per native property.
    ///
    /// Properties whose type has no registered kind are skipped.
    pub fn from_model(source: FieldSource) -> Self {
        let mut registry = Self::new(source);
        for property in registry.source.native_properties() {
            let kind = match registry.source.resolve_field_type(&property.type_) {
                Ok(kind) => kind,
                Err(e) => {
                    warn!(
                        model = %registry.source.model_name(),
                        name = %property.name,
                        %e,
                        "skipping property"
                    );
                    continue;
                }
            };
            if registry.fields.contains_key(&property.name) {
                warn!(name = %property.name, "skipping duplicate property");
                continue;
            }
            let name = property.name.clone();
            let field = kind.build(&name, Some(property));
            registry.fields.insert(name, field);
        }
        debug!(
            model = %registry.source.model_name(),
            fields = registry.fields.len(),
            "field registry seeded"
        );
        registry
    }

    /// Replace the evaluation context used by [`visible_fields`](Self::visible_fields).
    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Replace the evaluation context in place.
    pub fn set_bindings(&mut self, bindings: Bindings) {
        self.bindings = bindings;
    }

    /// The current evaluation context.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Property lookup and type resolution backing this registry.
    pub fn source(&self) -> &FieldSource {
        &self.source
    }

    // --- Lookup ---

    /// The entry named `name`, defined or not.
    pub fn get(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.get(name)
    }

    /// Mutable access to the entry named `name`. Changes to `order` take
    /// effect on the next query; the registry itself is not re-sorted.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldConfig> {
        self.fields.get_mut(name)
    }

    /// Whether an entry named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of entries, defined or not.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every entry in registry order, defined or not.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldConfig> {
        self.fields.values()
    }

    // --- Declarations ---

    /// Declare a field.
    ///
    /// Resolution, in priority order:
    /// 1. unknown name and no type: a virtual field of the generic text type;
    /// 2. a type differing from the current one (or no current entry): the
    ///    old entry is discarded and a new one is built from freshly looked-up
    ///    native properties;
    /// 3. otherwise the current entry is reused.
    ///
    /// An existing entry is shown if it was hidden, before any replacement;
    /// a replacement keeps its kind's default. With `add_to_section`, an entry
    /// not yet defined is appended to the active ordering. A configurator
    /// runs last, after which the whole registry is stably re-sorted by
    /// `order`.
    pub fn declare(
        &mut self,
        name: &str,
        field_type: Option<&str>,
        add_to_section: bool,
        configurator: Option<&mut Configurator<'_>>,
    ) -> Result<&mut FieldConfig> {
        let current_type = match self.fields.get_mut(name) {
            Some(existing) => {
                if existing.is_hidden() {
                    existing.show();
                }
                Some(existing.field_type().to_string())
            }
            None => None,
        };

        match (current_type.as_deref(), field_type) {
            (None, None) => {
                let kind = self.source.resolve_field_type(VIRTUAL_FIELD_TYPE)?;
                self.fields.insert(name.to_string(), kind.build(name, None));
                debug!(model = %self.source.model_name(), %name, "declared virtual field");
            }
            (current, Some(requested)) if current != Some(requested) => {
                // Resolve before discarding so an unknown type leaves the entry in place.
                let kind = self.source.resolve_field_type(requested)?;
                let properties = self.source.lookup_native_properties(name);
                if self.fields.shift_remove(name).is_some() {
                    debug!(
                        model = %self.source.model_name(),
                        %name,
                        from = ?current,
                        to = %requested,
                        "replacing field type"
                    );
                }
                self.fields
                    .insert(name.to_string(), kind.build(name, properties));
            }
            _ => {}
        }

        let index = self.index_of(name)?;
        if add_to_section {
            self.activate(index);
        }
        if let Some(configurator) = configurator {
            configurator(&mut self.fields[index])?;
            self.sort_by_order();
        }

        self.fields
            .get_mut(name)
            .ok_or_else(|| FieldsError::FieldNotFound {
                name: name.to_string(),
            })
    }

    /// Declare a field and add it to the active set.
    pub fn field(&mut self, name: &str, field_type: Option<&str>) -> Result<&mut FieldConfig> {
        self.declare(name, field_type, true, None)
    }

    /// Declare a field, add it to the active set, and configure it.
    pub fn field_with<F>(
        &mut self,
        name: &str,
        field_type: Option<&str>,
        mut configurator: F,
    ) -> Result<&mut FieldConfig>
    where
        F: FnMut(&mut FieldConfig) -> Result<()>,
    {
        self.declare(name, field_type, true, Some(&mut configurator))
    }

    /// Declare a field without adding it to the active set.
    pub fn configure(&mut self, name: &str, field_type: Option<&str>) -> Result<&mut FieldConfig> {
        self.declare(name, field_type, false, None)
    }

    /// Declare and configure a field without adding it to the active set.
    pub fn configure_with<F>(
        &mut self,
        name: &str,
        field_type: Option<&str>,
        mut configurator: F,
    ) -> Result<&mut FieldConfig>
    where
        F: FnMut(&mut FieldConfig) -> Result<()>,
    {
        self.declare(name, field_type, false, Some(&mut configurator))
    }

    /// Declare a field, then hand the whole registry to `configurator`.
    ///
    /// The configurator may call back into any registry operation, for
    /// example to move or include other fields; its changes are visible to
    /// the calls that follow it. The registry is re-sorted by `order` once it
    /// returns.
    pub fn declare_in<F>(
        &mut self,
        name: &str,
        field_type: Option<&str>,
        add_to_section: bool,
        configurator: F,
    ) -> Result<&mut FieldConfig>
    where
        F: FnOnce(&mut FieldRegistry, &str) -> Result<()>,
    {
        self.declare(name, field_type, add_to_section, None)?;
        configurator(self, name)?;
        self.sort_by_order();
        let index = self.index_of(name)?;
        Ok(&mut self.fields[index])
    }

    /// Declare a field, add it to the active set, and configure it with
    /// access to the registry.
    pub fn field_in<F>(
        &mut self,
        name: &str,
        field_type: Option<&str>,
        configurator: F,
    ) -> Result<&mut FieldConfig>
    where
        F: FnOnce(&mut FieldRegistry, &str) -> Result<()>,
    {
        self.declare_in(name, field_type, true, configurator)
    }

    // --- Include / exclude ---

    /// Add the named fields to the active set, in the given order.
    pub fn include_fields(&mut self, names: &[&str]) {
        self.fields_named(names);
    }

    /// Add the named fields to the active set and configure each.
    pub fn include_fields_with<F>(&mut self, names: &[&str], configurator: F) -> Result<()>
    where
        F: FnMut(&mut FieldConfig) -> Result<()>,
    {
        self.fields_named_with(names, configurator).map(|_| ())
    }

    /// Add every field matching `predicate` to the active set. Fields that
    /// are already active keep their position.
    pub fn include_fields_if<P>(&mut self, predicate: P)
    where
        P: Fn(&FieldConfig) -> bool,
    {
        let matched = self.matching(predicate);
        for index in matched {
            if self.activate(index) {
                trace!(name = %self.fields[index].name(), order = self.fields[index].order(), "included field");
            }
        }
    }

    /// Add every field to the active set.
    pub fn include_all_fields(&mut self) {
        self.include_fields_if(|_| true);
    }

    /// Remove the named fields from the active set.
    pub fn exclude_fields(&mut self, names: &[&str]) {
        self.exclude_fields_if(|field| names.contains(&field.name()));
    }

    /// Remove every field matching `predicate` from the active set.
    ///
    /// When nothing is active yet, everything is made active first, so the
    /// exclusion carves out of the full field list.
    pub fn exclude_fields_if<P>(&mut self, predicate: P)
    where
        P: Fn(&FieldConfig) -> bool,
    {
        if !self.fields.values().any(FieldConfig::is_defined) {
            for field in self.fields.values_mut() {
                field.set_defined(true);
            }
        }
        let matched = self.matching(predicate);
        for index in matched {
            self.fields[index].set_defined(false);
            trace!(name = %self.fields[index].name(), "excluded field");
        }
    }

    // --- Queries ---

    /// The active fields: defined entries sorted by `order`, or every entry
    /// in registry order when none is defined.
    pub fn fields(&self) -> Vec<&FieldConfig> {
        let mut defined: Vec<&FieldConfig> =
            self.fields.values().filter(|f| f.is_defined()).collect();
        if defined.is_empty() {
            return self.fields.values().collect();
        }
        defined.sort_by_key(|f| f.order());
        defined
    }

    /// Configure each active field. Returns the active fields in the order
    /// they were configured.
    pub fn fields_with<F>(&mut self, mut configurator: F) -> Result<Vec<&FieldConfig>>
    where
        F: FnMut(&mut FieldConfig) -> Result<()>,
    {
        let names: Vec<String> = self
            .fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        for name in &names {
            if let Some(field) = self.fields.get_mut(name) {
                configurator(field)?;
            }
        }
        let fields = &self.fields;
        Ok(names.iter().filter_map(|name| fields.get(name)).collect())
    }

    /// Activate the named fields in request order and return them. A name
    /// with no entry yields `None` in its slot.
    pub fn fields_named(&mut self, names: &[&str]) -> Vec<Option<&FieldConfig>> {
        for name in names {
            self.activate_by_name(name);
        }
        self.lookup_all(names)
    }

    /// Like [`fields_named`](Self::fields_named), configuring each entry
    /// found. A configurator error stops the batch; fields already
    /// configured keep their changes.
    pub fn fields_named_with<F>(
        &mut self,
        names: &[&str],
        mut configurator: F,
    ) -> Result<Vec<Option<&FieldConfig>>>
    where
        F: FnMut(&mut FieldConfig) -> Result<()>,
    {
        for name in names {
            if let Some(index) = self.activate_by_name(name) {
                configurator(&mut self.fields[index])?;
            }
        }
        Ok(self.lookup_all(names))
    }

    /// Every entry of `field_type`, in registry order.
    pub fn fields_of_type(&self, field_type: &str) -> Vec<&FieldConfig> {
        self.fields
            .values()
            .filter(|f| f.field_type() == field_type)
            .collect()
    }

    /// Configure every entry of `field_type`. Does not touch the active set.
    pub fn fields_of_type_with<F>(
        &mut self,
        field_type: &str,
        mut configurator: F,
    ) -> Result<Vec<&FieldConfig>>
    where
        F: FnMut(&mut FieldConfig) -> Result<()>,
    {
        for field in self
            .fields
            .values_mut()
            .filter(|f| f.field_type() == field_type)
        {
            configurator(field)?;
        }
        Ok(self.fields_of_type(field_type))
    }

    /// Active fields bound to the registry's bindings, keeping only those
    /// visible in that context.
    pub fn visible_fields(&self) -> Vec<BoundField<'_, '_>> {
        self.visible_fields_in(&self.bindings)
    }

    /// Active fields bound to `bindings`, keeping only those visible in it.
    pub fn visible_fields_in<'b>(&self, bindings: &'b Bindings) -> Vec<BoundField<'_, 'b>> {
        self.fields()
            .into_iter()
            .map(|field| field.bind(bindings))
            .filter(|bound| bound.is_visible())
            .collect()
    }

    // --- Internal ---

    fn index_of(&self, name: &str) -> Result<usize> {
        self.fields
            .get_index_of(name)
            .ok_or_else(|| FieldsError::FieldNotFound {
                name: name.to_string(),
            })
    }

    fn defined_count(&self) -> i32 {
        let count = self.fields.values().filter(|f| f.is_defined()).count();
        i32::try_from(count).unwrap_or(i32::MAX)
    }

    /// Mark the entry defined and append it to the active ordering.
    /// Returns false if it was already defined.
    fn activate(&mut self, index: usize) -> bool {
        if self.fields[index].is_defined() {
            return false;
        }
        self.fields[index].set_defined(true);
        let order = self.defined_count();
        self.fields[index].set_order(order);
        true
    }

    fn activate_by_name(&mut self, name: &str) -> Option<usize> {
        match self.fields.get_index_of(name) {
            Some(index) => {
                self.activate(index);
                Some(index)
            }
            None => {
                warn!(model = %self.source.model_name(), %name, "no such field");
                None
            }
        }
    }

    fn lookup_all(&self, names: &[&str]) -> Vec<Option<&FieldConfig>> {
        names.iter().map(|name| self.fields.get(*name)).collect()
    }

    fn matching<P>(&self, predicate: P) -> Vec<usize>
    where
        P: Fn(&FieldConfig) -> bool,
    {
        self.fields
            .values()
            .enumerate()
            .filter(|(_, field)| predicate(*field))
            .map(|(index, _)| index)
            .collect()
    }

    fn sort_by_order(&mut self) {
        self.fields.sort_by(|_, a, _, b| a.order().cmp(&b.order()));
    }
}
