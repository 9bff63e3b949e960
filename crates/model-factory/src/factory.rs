//! Factory definitions and model synthesis.
//!
//! A [`Factory`] pairs one model type with an ordered list of named fields.
//! Building evaluates every field (or the caller's override for it) into an
//! [`Arguments`] mapping and hands that to the model constructor.

use std::fmt;
use std::sync::Arc;

use rand::RngCore;
use tracing::trace;

use crate::error::{FactoryError, FieldError};
use crate::fields::{Field, FieldSpec};
use crate::model::{Arguments, Model, ModelBinding};
use crate::value::{IntoValue, ModelInstance};

type Entries = Vec<(String, FieldSpec)>;

/// Inserts `spec` under `name`, replacing an existing entry in place.
fn upsert(entries: &mut Entries, name: String, spec: FieldSpec) {
    match entries.iter_mut().find(|(key, _)| *key == name) {
        Some(entry) => entry.1 = spec,
        None => entries.push((name, spec)),
    }
}

/// Per-build replacements for declared fields.
///
/// An override naming a declared field replaces it for one build; any other
/// override is passed to the constructor as an extra argument. Overrides
/// holding generators are invoked, literal overrides are used as-is.
///
/// # Example
///
/// ```
/// use model_factory::{IntegerField, Overrides};
///
/// let overrides = Overrides::new()
///     .value("x", 400)
///     .field("y", IntegerField::new().min_value(99).max_value(101));
/// assert_eq!(overrides.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    entries: Entries,
}

impl Overrides {
    /// Creates an empty set of overrides.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Overrides `name` with a literal value.
    #[must_use]
    pub fn value(self, name: impl Into<String>, value: impl IntoValue) -> Self {
        self.spec(name, FieldSpec::literal(value))
    }

    /// Overrides `name` with a generator invoked once for this build.
    #[must_use]
    pub fn field<F>(self, name: impl Into<String>, field: F) -> Self
    where
        F: Field + Send + Sync + fmt::Debug + 'static,
        F::Output: IntoValue,
    {
        self.spec(name, FieldSpec::generator(field))
    }

    /// Overrides `name` with an already classified spec.
    #[must_use]
    pub fn spec(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        upsert(&mut self.entries, name.into(), spec);
        self
    }

    /// Number of overrides.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn take(&mut self, name: &str) -> Option<FieldSpec> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }
}

/// Collects the declarations of a [`Factory`].
///
/// # Example
///
/// ```
/// use model_factory::{
///     Arguments, ConstructError, FactoryBuilder, IntegerField, Model, Overrides,
/// };
///
/// #[derive(Debug, Clone)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Model for Point {
///     fn from_arguments(args: &mut Arguments) -> Result<Self, ConstructError> {
///         Ok(Self {
///             x: args.take("x")?,
///             y: args.take("y")?,
///         })
///     }
/// }
///
/// let factory = FactoryBuilder::new("PointFactory")
///     .model::<Point>()
///     .field("x", IntegerField::new().min_value(0).max_value(9))
///     .literal("y", 7)
///     .finish();
///
/// let point: Point = factory.build_with(Overrides::new().value("x", 400))?;
/// assert_eq!((point.x, point.y), (400, 7));
/// # Ok::<(), model_factory::FactoryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FactoryBuilder {
    name: String,
    models: Vec<ModelBinding>,
    fields: Entries,
}

impl FactoryBuilder {
    /// Starts a factory named `name`; the name appears in errors and logs.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: Vec::new(),
            fields: Vec::new(),
        }
    }

    fn bind(&mut self, binding: ModelBinding) {
        if !self.models.contains(&binding) {
            self.models.push(binding);
        }
    }

    /// Declares the model this factory builds.
    ///
    /// Declaring the same model again is harmless; declaring a second,
    /// different model makes every build fail.
    #[must_use]
    pub fn model<M: Model>(mut self) -> Self {
        self.bind(ModelBinding::of::<M>());
        self
    }

    /// Takes over another factory's model declarations and fields.
    ///
    /// Inherited fields keep their order and precede fields declared later;
    /// a later declaration with the same name replaces the inherited one in
    /// place.
    #[must_use]
    pub fn inherit(mut self, parent: &Factory) -> Self {
        for binding in &parent.inner.models {
            self.bind(*binding);
        }
        for (name, spec) in &parent.inner.fields {
            self.register(name.clone(), spec.clone());
        }
        self
    }

    /// Declares a field produced by `field` on every build.
    #[must_use]
    pub fn field<F>(self, name: impl Into<String>, field: F) -> Self
    where
        F: Field + Send + Sync + fmt::Debug + 'static,
        F::Output: IntoValue,
    {
        self.spec(name, FieldSpec::generator(field))
    }

    /// Declares a field passed to the constructor unchanged.
    #[must_use]
    pub fn literal(self, name: impl Into<String>, value: impl IntoValue) -> Self {
        self.spec(name, FieldSpec::literal(value))
    }

    /// Declares a field from an already classified spec.
    #[must_use]
    pub fn spec(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.register(name.into(), spec);
        self
    }

    pub(crate) fn register(&mut self, name: String, spec: FieldSpec) {
        upsert(&mut self.fields, name, spec);
    }

    /// Freezes the declarations into a shareable factory.
    #[must_use]
    pub fn finish(self) -> Factory {
        Factory {
            inner: Arc::new(Definition {
                name: self.name,
                models: self.models,
                fields: self.fields,
            }),
        }
    }
}

#[derive(Debug)]
struct Definition {
    name: String,
    models: Vec<ModelBinding>,
    fields: Entries,
}

/// An immutable recipe for building one model type.
///
/// Clones share the same definition.
#[derive(Debug, Clone)]
pub struct Factory {
    inner: Arc<Definition>,
}

impl Factory {
    /// Returns the factory name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the declared field names in evaluation order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.inner.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the declared spec for `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.inner
            .fields
            .iter()
            .find_map(|(key, spec)| (key == name).then_some(spec))
    }

    /// Resolves the single model this factory builds.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::NoConcreteModel`] when no model was declared
    /// and [`FactoryError::MultipleConcreteModels`] when distinct models
    /// were declared across inherited factories.
    pub fn get_model(&self) -> Result<ModelBinding, FactoryError> {
        match self.inner.models.as_slice() {
            [] => Err(FactoryError::NoConcreteModel {
                factory: self.inner.name.clone(),
            }),
            [binding] => Ok(*binding),
            many => Err(FactoryError::MultipleConcreteModels {
                factory: self.inner.name.clone(),
                models: many.iter().map(ModelBinding::type_name).collect(),
            }),
        }
    }

    /// Builds a model with fresh values for every field.
    ///
    /// # Errors
    ///
    /// See [`Factory::build_with_rng`].
    pub fn build<M: Model>(&self) -> Result<M, FactoryError> {
        self.build_with(Overrides::new())
    }

    /// Builds a model, replacing or extending fields with `overrides`.
    ///
    /// # Errors
    ///
    /// See [`Factory::build_with_rng`].
    pub fn build_with<M: Model>(&self, overrides: Overrides) -> Result<M, FactoryError> {
        self.build_with_rng(&mut rand::rng(), overrides)
    }

    /// Builds a model drawing every random value from `rng`.
    ///
    /// # Errors
    ///
    /// Returns the model resolution errors of [`Factory::get_model`],
    /// [`FactoryError::ModelMismatch`] when `M` is not the declared model,
    /// [`FactoryError::Field`] when a generator fails, and
    /// [`FactoryError::Construct`] when the constructor rejects the
    /// arguments.
    pub fn build_with_rng<M, R>(&self, rng: &mut R, overrides: Overrides) -> Result<M, FactoryError>
    where
        M: Model,
        R: RngCore + ?Sized,
    {
        let binding = self.get_model()?;
        if !binding.is::<M>() {
            return Err(FactoryError::ModelMismatch {
                factory: self.inner.name.clone(),
                declared: binding.type_name(),
                requested: ModelBinding::of::<M>().type_name(),
            });
        }
        let mut source = rng;
        let mut args = self.arguments(&mut source, overrides)?;
        self.log_build(binding, &args);
        Ok(M::from_arguments(&mut args)?)
    }

    /// Builds the declared model without naming its type.
    ///
    /// # Errors
    ///
    /// As [`Factory::build_with_rng`], minus the model mismatch.
    pub fn build_instance(
        &self,
        rng: &mut dyn RngCore,
        overrides: Overrides,
    ) -> Result<ModelInstance, FactoryError> {
        let binding = self.get_model()?;
        let mut args = self.arguments(rng, overrides)?;
        self.log_build(binding, &args);
        Ok(binding.construct(&mut args)?)
    }

    /// Builds `count` independent models.
    ///
    /// # Errors
    ///
    /// Stops at the first failing build; see [`Factory::build_with_rng`].
    pub fn build_batch<M: Model>(&self, count: usize) -> Result<Vec<M>, FactoryError> {
        let mut rng = rand::rng();
        (0..count)
            .map(|_| self.build_with_rng(&mut rng, Overrides::new()))
            .collect()
    }

    fn arguments(
        &self,
        rng: &mut dyn RngCore,
        mut overrides: Overrides,
    ) -> Result<Arguments, FactoryError> {
        let mut args = Arguments::new();
        for (name, declared) in &self.inner.fields {
            let value = match overrides.take(name) {
                Some(spec) => spec.evaluate(rng),
                None => declared.evaluate(rng),
            }
            .map_err(|source| self.field_error(name, source))?;
            args.insert(name.as_str(), value);
        }
        for (name, spec) in overrides.entries {
            let value = spec
                .evaluate(rng)
                .map_err(|source| self.field_error(&name, source))?;
            args.insert(name, value);
        }
        Ok(args)
    }

    fn field_error(&self, field: &str, source: FieldError) -> FactoryError {
        FactoryError::Field {
            factory: self.inner.name.clone(),
            field: field.to_owned(),
            source,
        }
    }

    fn log_build(&self, binding: ModelBinding, args: &Arguments) {
        trace!(
            factory = %self.inner.name,
            model = binding.type_name(),
            arguments = args.len(),
            "building model"
        );
    }
}
