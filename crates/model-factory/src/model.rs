//! Model constructor contract and named-argument mapping.

use std::any::{Any, TypeId, type_name};
use std::fmt;

use crate::error::ConstructError;
use crate::value::{FromValue, IntoValue, ModelInstance, Value};

/// A type a factory can construct from named arguments.
///
/// Implementations pull their parameters out of [`Arguments`] and may call
/// [`Arguments::finish`] to reject arguments they do not recognise.
///
/// # Example
///
/// ```
/// use model_factory::{Arguments, ConstructError, Model};
///
/// struct Spam {
///     a: i64,
///     t: String,
/// }
///
/// impl Model for Spam {
///     fn from_arguments(args: &mut Arguments) -> Result<Self, ConstructError> {
///         Ok(Self {
///             a: args.take("a")?,
///             t: args.take_or("t", "Francis".to_owned())?,
///         })
///     }
/// }
///
/// let mut args = Arguments::new();
/// args.insert("a", 3_i64);
/// let spam = Spam::from_arguments(&mut args).expect("constructs");
/// assert_eq!(spam.a, 3);
/// assert_eq!(spam.t, "Francis");
/// ```
pub trait Model: Any + Send + Sync + Sized {
    /// Builds the model from the assembled arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError`] when a required argument is missing, has
    /// the wrong type, or is otherwise rejected by the model.
    fn from_arguments(args: &mut Arguments) -> Result<Self, ConstructError>;
}

/// Ordered named arguments handed to a model constructor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<(String, Value)>,
}

impl Arguments {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets an argument, replacing any previous value of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl IntoValue) {
        let key = name.into();
        let lifted = value.into_value();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = lifted,
            None => self.entries.push((key, lifted)),
        }
    }

    /// Returns the number of arguments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no arguments remain.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` when an argument with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Borrows an argument value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Iterates over argument names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    fn remove(&mut self, name: &str) -> Option<Value> {
        let position = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(position).1)
    }

    /// Removes and converts a required argument.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::MissingArgument`] when absent and
    /// [`ConstructError::TypeMismatch`] when the value does not convert.
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<T, ConstructError> {
        let value = self
            .remove(name)
            .ok_or_else(|| ConstructError::MissingArgument {
                name: name.to_owned(),
            })?;
        convert(name, value)
    }

    /// Removes and converts an argument, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::TypeMismatch`] when a supplied value does
    /// not convert.
    pub fn take_or<T: FromValue>(&mut self, name: &str, default: T) -> Result<T, ConstructError> {
        self.take_or_else(name, || default)
    }

    /// Removes and converts an argument, computing a fallback when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::TypeMismatch`] when a supplied value does
    /// not convert.
    pub fn take_or_else<T: FromValue>(
        &mut self,
        name: &str,
        default: impl FnOnce() -> T,
    ) -> Result<T, ConstructError> {
        self.remove(name)
            .map_or_else(|| Ok(default()), |value| convert(name, value))
    }

    /// Removes a nested model argument and recovers its concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::MissingArgument`] when absent and
    /// [`ConstructError::TypeMismatch`] when the value is not an `M`.
    pub fn take_model<M: Model + Clone>(&mut self, name: &str) -> Result<M, ConstructError> {
        let instance: ModelInstance = self.take(name)?;
        instance
            .downcast::<M>()
            .map_err(|other| ConstructError::TypeMismatch {
                name: name.to_owned(),
                expected: type_name::<M>(),
                found: other.type_name(),
            })
    }

    /// Rejects any argument the constructor did not take.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::UnexpectedArgument`] naming the first
    /// leftover argument.
    pub fn finish(&self) -> Result<(), ConstructError> {
        match self.entries.first() {
            Some((name, _)) => Err(ConstructError::UnexpectedArgument { name: name.clone() }),
            None => Ok(()),
        }
    }
}

fn convert<T: FromValue>(name: &str, value: Value) -> Result<T, ConstructError> {
    T::from_value(value).map_err(|mismatch| ConstructError::TypeMismatch {
        name: name.to_owned(),
        expected: mismatch.expected,
        found: mismatch.found,
    })
}

/// A declared association between a factory and its model type.
#[derive(Clone, Copy)]
pub struct ModelBinding {
    type_id: TypeId,
    type_name: &'static str,
    construct: fn(&mut Arguments) -> Result<ModelInstance, ConstructError>,
}

impl ModelBinding {
    /// Creates the binding for model `M`.
    #[must_use]
    pub fn of<M: Model>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            type_name: type_name::<M>(),
            construct: construct_erased::<M>,
        }
    }

    /// Returns the model type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` when the binding targets `M`.
    #[must_use]
    pub fn is<M: Model>(&self) -> bool {
        self.type_id == TypeId::of::<M>()
    }

    /// Runs the model constructor and erases the result.
    ///
    /// # Errors
    ///
    /// Propagates the constructor's [`ConstructError`].
    pub fn construct(&self, args: &mut Arguments) -> Result<ModelInstance, ConstructError> {
        (self.construct)(args)
    }
}

fn construct_erased<M: Model>(args: &mut Arguments) -> Result<ModelInstance, ConstructError> {
    M::from_arguments(args).map(ModelInstance::new)
}

impl PartialEq for ModelBinding {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModelBinding {}

impl fmt::Debug for ModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelBinding").field(&self.type_name).finish()
    }
}
