//! Field generators.
//!
//! A field generator produces one value per invocation from constraints fixed
//! at construction time. Leaf generators adapt the `fake` and `rand` crates;
//! collection generators and [`FactoryField`] invoke child generators.
//!
//! Every generator takes its random source explicitly so callers choose
//! between the thread-local generator ([`Field::sample`]) and a seeded one
//! for reproducible runs.

mod collection;
mod nested;
mod numeric;
mod provider;
mod temporal;
mod text;

use std::fmt;
use std::sync::Arc;

use rand::RngCore;
use rand::seq::IndexedRandom;

use crate::error::FieldError;
use crate::value::{IntoValue, Value};

pub use collection::{LengthPolicy, ListField, MapField, SetField, TupleField};
pub use nested::FactoryField;
pub use numeric::{BooleanField, DecimalField, FloatField, IntegerField};
pub use provider::{ALIASES, ProviderField, UuidField};
pub use temporal::{
    DateField, DateTimeField, DurationField, IntoNaive, KNOWN_AREAS, NaiveDateTimeField,
    TimeField, TimezoneField,
};
pub use text::{CharField, StringField, TextField, TextKind};

/// A generator of values of one type.
///
/// Implementations must not mutate themselves while generating; the only
/// state that changes between invocations is the random source.
pub trait Field {
    /// Type of value produced.
    type Output;

    /// Produces one value using `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the generator's constraints are
    /// ill-formed or a nested factory fails.
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Self::Output, FieldError>;

    /// Produces one value using the thread-local random generator.
    ///
    /// # Errors
    ///
    /// See [`Field::generate`].
    fn sample(&self) -> Result<Self::Output, FieldError> {
        self.generate(&mut rand::rng())
    }
}

/// A type-erased field generator producing [`Value`]s.
///
/// Implemented for every [`Field`] whose output converts into a [`Value`];
/// factories store their generators behind this trait.
pub trait AnyField: Send + Sync + fmt::Debug {
    /// Produces one value using `rng`.
    ///
    /// # Errors
    ///
    /// See [`Field::generate`].
    fn generate_value(&self, rng: &mut dyn RngCore) -> Result<Value, FieldError>;
}

impl<F> AnyField for F
where
    F: Field + Send + Sync + fmt::Debug,
    F::Output: IntoValue,
{
    fn generate_value(&self, rng: &mut dyn RngCore) -> Result<Value, FieldError> {
        self.generate(rng).map(IntoValue::into_value)
    }
}

/// A registered field: either a generator to invoke or a literal to copy.
#[derive(Debug, Clone)]
pub enum FieldSpec {
    /// Invoked on every build.
    Generator(Arc<dyn AnyField>),
    /// Passed through unchanged on every build.
    Literal(Value),
}

impl FieldSpec {
    /// Wraps a generator.
    #[must_use]
    pub fn generator<F>(field: F) -> Self
    where
        F: Field + Send + Sync + fmt::Debug + 'static,
        F::Output: IntoValue,
    {
        Self::Generator(Arc::new(field))
    }

    /// Wraps a literal value.
    #[must_use]
    pub fn literal(value: impl IntoValue) -> Self {
        Self::Literal(value.into_value())
    }

    /// Returns `true` for the generator variant.
    #[must_use]
    pub const fn is_generator(&self) -> bool {
        matches!(self, Self::Generator(_))
    }

    /// Produces this field's value for one build.
    ///
    /// # Errors
    ///
    /// Propagates the generator's [`FieldError`]; literals never fail.
    pub fn evaluate(&self, rng: &mut dyn RngCore) -> Result<Value, FieldError> {
        match self {
            Self::Generator(field) => field.generate_value(rng),
            Self::Literal(value) => Ok(value.clone()),
        }
    }
}

/// Returns a fixed value on every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantField<T> {
    value: T,
}

impl<T: Clone> ConstantField<T> {
    /// Creates a generator that always yields `value`.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone> Field for ConstantField<T> {
    type Output = T;

    fn generate(&self, _rng: &mut dyn RngCore) -> Result<T, FieldError> {
        Ok(self.value.clone())
    }
}

/// Draws uniformly from a fixed list of candidates.
///
/// Candidates are cloned out, never removed, so the generator can be
/// invoked indefinitely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceField<T> {
    options: Vec<T>,
}

impl<T: Clone> ChoiceField<T> {
    /// Creates a generator over `options`, preserving their order.
    #[must_use]
    pub fn new(options: impl IntoIterator<Item = T>) -> Self {
        Self {
            options: options.into_iter().collect(),
        }
    }

    /// Returns the candidates.
    #[must_use]
    pub fn options(&self) -> &[T] {
        &self.options
    }
}

impl<T: Clone> Field for ChoiceField<T> {
    type Output = T;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<T, FieldError> {
        self.options
            .choose(rng)
            .cloned()
            .ok_or(FieldError::EmptyChoices)
    }
}

/// A generator backed by a closure.
///
/// # Example
///
/// ```
/// use model_factory::{Field, FnField};
/// use rand::Rng;
///
/// let even = FnField::new(|rng| Ok(rng.random_range(0..50_i64) * 2));
/// let value = even.sample().expect("generates");
/// assert_eq!(value % 2, 0);
/// ```
pub struct FnField<T> {
    generate: Box<dyn Fn(&mut dyn RngCore) -> Result<T, FieldError> + Send + Sync>,
}

impl<T> FnField<T> {
    /// Wraps `generate`.
    pub fn new(
        generate: impl Fn(&mut dyn RngCore) -> Result<T, FieldError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            generate: Box::new(generate),
        }
    }
}

impl<T> fmt::Debug for FnField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnField").finish_non_exhaustive()
    }
}

impl<T> Field for FnField<T> {
    type Output = T;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<T, FieldError> {
        (self.generate)(rng)
    }
}
