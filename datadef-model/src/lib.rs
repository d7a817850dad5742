//! Schema model for the datadef data layer.
//!
//! Defines how business modules declare their records:
//! - [`FieldType`]: the semantic type of a field (coercion, bounds, capabilities)
//! - [`FieldDefinition`]: a named field with read-only flags and validators
//! - [`DataDefinition`]: an ordered set of fields plus entity validators and hooks
//! - [`DefinitionRegistry`]: the process-wide registry of definitions
//!
//! Collaborators the field types need (reference resolution, dictionaries)
//! are traits passed in through a [`CoercionContext`], so nothing here
//! depends on a live store.

mod collaborators;
mod definition;
mod error;
mod field;
mod field_type;
mod hook;
pub mod messages;
mod registry;
mod validators;

pub use collaborators::{
    CoercionContext, DetachedReferences, DictionaryService, ReferenceResolver, StaticDictionaries,
};
pub use definition::{DataDefinition, DataDefinitionBuilder};
pub use error::{ModelError, ModelResult};
pub use field::FieldDefinition;
pub use field_type::{
    DECIMAL_MAX_INTEGER_PART, FieldType, STRING_MAX_LENGTH, TEXT_MAX_LENGTH, render_value_set,
};
pub use hook::EntityHook;
pub use registry::DefinitionRegistry;
pub use validators::{EntityValidator, FieldValidator, Length, Range, Required};
