use crate::error::{ModelError, ModelResult};
use crate::{EntityHook, EntityValidator, FieldDefinition, FieldType};
use datadef_types::{DefinitionKey, Entity};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A named record schema.
///
/// Fields keep their declaration order; validation walks them in that order.
/// Definitions are built once, at module load time, and shared behind an
/// `Arc` afterwards.
pub struct DataDefinition {
    key: DefinitionKey,
    fields: IndexMap<String, FieldDefinition>,
    priority_field: Option<String>,
    validators: Vec<Arc<dyn EntityValidator>>,
    create_hook: Option<Arc<dyn EntityHook>>,
    update_hook: Option<Arc<dyn EntityHook>>,
}

impl DataDefinition {
    /// Starts declaring `plugin.name`.
    pub fn builder(plugin: impl Into<String>, name: impl Into<String>) -> DataDefinitionBuilder {
        DataDefinitionBuilder {
            key: DefinitionKey::new(plugin, name),
            fields: Vec::new(),
            validators: Vec::new(),
            create_hook: None,
            update_hook: None,
        }
    }

    #[must_use]
    pub const fn key(&self) -> &DefinitionKey {
        &self.key
    }

    #[must_use]
    pub fn plugin(&self) -> &str {
        &self.key.plugin
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub const fn fields(&self) -> &IndexMap<String, FieldDefinition> {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// The field driving default ordering, if one was declared.
    #[must_use]
    pub fn priority_field(&self) -> Option<&FieldDefinition> {
        self.priority_field
            .as_deref()
            .and_then(|name| self.fields.get(name))
    }

    #[must_use]
    pub fn validators(&self) -> &[Arc<dyn EntityValidator>] {
        &self.validators
    }

    pub fn call_create_hook(&self, entity: &mut Entity) {
        if let Some(hook) = &self.create_hook {
            debug!(definition = %self.key, "Dispatching create hook");
            hook.call(self, entity);
        }
    }

    pub fn call_update_hook(&self, entity: &mut Entity) {
        if let Some(hook) = &self.update_hook {
            debug!(definition = %self.key, id = ?entity.id(), "Dispatching update hook");
            hook.call(self, entity);
        }
    }
}

impl fmt::Debug for DataDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataDefinition")
            .field("key", &self.key)
            .field("fields", &self.fields)
            .field("priority_field", &self.priority_field)
            .field("validators", &self.validators.len())
            .field("create_hook", &self.create_hook.is_some())
            .field("update_hook", &self.update_hook.is_some())
            .finish()
    }
}

/// Accumulates the declaration of a [`DataDefinition`].
pub struct DataDefinitionBuilder {
    key: DefinitionKey,
    fields: Vec<FieldDefinition>,
    validators: Vec<Arc<dyn EntityValidator>>,
    create_hook: Option<Arc<dyn EntityHook>>,
    update_hook: Option<Arc<dyn EntityHook>>,
}

impl DataDefinitionBuilder {
    #[must_use]
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: impl EntityValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    #[must_use]
    pub fn on_create(mut self, hook: impl EntityHook + 'static) -> Self {
        self.create_hook = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_update(mut self, hook: impl EntityHook + 'static) -> Self {
        self.update_hook = Some(Arc::new(hook));
        self
    }

    /// Checks the declaration and produces the definition.
    ///
    /// Field names must be unique, at most one field may be of the priority
    /// type, and its scope must be a declared field.
    pub fn build(self) -> ModelResult<DataDefinition> {
        let definition = self.key.to_string();
        let mut fields = IndexMap::with_capacity(self.fields.len());
        let mut priority_field: Option<String> = None;

        for field in self.fields {
            if let FieldType::Priority { .. } = field.field_type() {
                if priority_field.is_some() {
                    return Err(ModelError::MultiplePriorityFields { definition });
                }
                priority_field = Some(field.name().to_string());
            }
            let name = field.name().to_string();
            if fields.insert(name.clone(), field).is_some() {
                return Err(ModelError::DuplicateField {
                    definition,
                    field: name,
                });
            }
        }

        if let Some(name) = &priority_field {
            let scope = fields
                .get(name)
                .and_then(|f: &FieldDefinition| f.field_type().scope_field())
                .unwrap_or_default();
            if !fields.contains_key(scope) {
                return Err(ModelError::UnknownScopeField {
                    definition,
                    field: name.clone(),
                    scope: scope.to_string(),
                });
            }
        }

        Ok(DataDefinition {
            key: self.key,
            fields,
            priority_field,
            validators: self.validators,
            create_hook: self.create_hook,
            update_hook: self.update_hook,
        })
    }
}
