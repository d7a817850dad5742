use crate::DataDefinition;
use datadef_types::Entity;

/// A lifecycle callback dispatched after an entity has been validated.
///
/// Hooks are dispatch points, not gates: they run whether or not the entity
/// ended up valid, and may inspect [`Entity::is_valid`] themselves. Use them
/// for derived fields or defaults that depend on the whole record.
pub trait EntityHook: Send + Sync {
    fn call(&self, definition: &DataDefinition, entity: &mut Entity);
}

impl<F> EntityHook for F
where
    F: Fn(&DataDefinition, &mut Entity) + Send + Sync,
{
    fn call(&self, definition: &DataDefinition, entity: &mut Entity) {
        self(definition, entity);
    }
}
