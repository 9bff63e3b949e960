//! Generator delegating to another factory.

use rand::RngCore;

use super::Field;
use crate::error::FieldError;
use crate::factory::{Factory, Overrides};
use crate::value::ModelInstance;

/// Builds a model from another factory on every invocation.
///
/// The nested factory is captured when the field is created, so a factory
/// can only nest factories that already exist and cycles cannot be formed.
#[derive(Debug, Clone)]
pub struct FactoryField {
    factory: Factory,
}

impl FactoryField {
    /// Delegates to `factory` with no overrides.
    #[must_use]
    pub fn new(factory: &Factory) -> Self {
        Self {
            factory: factory.clone(),
        }
    }

    /// Returns the nested factory.
    #[must_use]
    pub const fn factory(&self) -> &Factory {
        &self.factory
    }
}

impl Field for FactoryField {
    type Output = ModelInstance;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<ModelInstance, FieldError> {
        Ok(self.factory.build_instance(rng, Overrides::new())?)
    }
}
