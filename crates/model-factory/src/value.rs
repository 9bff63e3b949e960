//! Dynamically-typed values exchanged between generators and models.
//!
//! Factories evaluate heterogeneous field generators into a single named
//! argument mapping, so every generated value is lifted into [`Value`] on the
//! way in and converted back to the parameter type inside the model
//! constructor.

use std::any::{Any, type_name};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A generated or literal argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value; converts to `None`.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Fixed-point decimal value.
    Decimal(Decimal),
    /// Single character.
    Char(char),
    /// Owned string.
    String(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Wall-clock time.
    Time(NaiveTime),
    /// Timezone-aware timestamp.
    DateTime(DateTime<Tz>),
    /// Timestamp without zone information.
    NaiveDateTime(NaiveDateTime),
    /// Signed duration.
    Duration(TimeDelta),
    /// IANA timezone.
    Timezone(Tz),
    /// UUID.
    Uuid(Uuid),
    /// Growable sequence.
    List(Vec<Value>),
    /// Fixed sequence.
    Tuple(Vec<Value>),
    /// Sequence of distinct values.
    Set(Vec<Value>),
    /// Key/value pairs with distinct keys.
    Map(Vec<(Value, Value)>),
    /// A model instance built by a nested factory.
    Model(ModelInstance),
}

impl Value {
    /// Returns a short name for the kind of value held.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "datetime",
            Self::NaiveDateTime(_) => "naive datetime",
            Self::Duration(_) => "duration",
            Self::Timezone(_) => "timezone",
            Self::Uuid(_) => "uuid",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Model(_) => "model",
        }
    }

    /// Wraps a built model so it can be passed as an argument.
    #[must_use]
    pub fn model<M: Any + Send + Sync>(model: M) -> Self {
        Self::Model(ModelInstance::new(model))
    }
}

/// A type-erased model instance.
///
/// Instances are reference counted so argument mappings holding them stay
/// cheap to clone. Equality is identity.
#[derive(Clone)]
pub struct ModelInstance {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ModelInstance {
    /// Erases a concrete model.
    #[must_use]
    pub fn new<M: Any + Send + Sync>(model: M) -> Self {
        Self {
            type_name: type_name::<M>(),
            inner: Arc::new(model),
        }
    }

    /// Returns the type name of the wrapped model.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` when the wrapped model is an `M`.
    #[must_use]
    pub fn is<M: Any>(&self) -> bool {
        self.inner.is::<M>()
    }

    /// Borrows the wrapped model as an `M`.
    #[must_use]
    pub fn downcast_ref<M: Any>(&self) -> Option<&M> {
        self.inner.downcast_ref::<M>()
    }

    /// Recovers the concrete model.
    ///
    /// The model is moved out when this is the only handle and cloned
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns the instance unchanged when it does not hold an `M`.
    pub fn downcast<M: Any + Send + Sync + Clone>(self) -> Result<M, Self> {
        let type_name = self.type_name;
        match self.inner.downcast::<M>() {
            Ok(model) => Ok(Arc::try_unwrap(model).unwrap_or_else(|shared| (*shared).clone())),
            Err(inner) => Err(Self { type_name, inner }),
        }
    }
}

impl fmt::Debug for ModelInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelInstance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ModelInstance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Conversion of a typed value into a [`Value`].
pub trait IntoValue {
    /// Lifts `self` into a [`Value`].
    fn into_value(self) -> Value;
}

/// Conversion failure from [`Value`] to a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueMismatch {
    /// Kind the conversion expected.
    pub expected: &'static str,
    /// Kind the value actually held.
    pub found: &'static str,
}

impl ValueMismatch {
    fn new(expected: &'static str, value: &Value) -> Self {
        Self {
            expected,
            found: value.kind(),
        }
    }
}

/// Conversion of a [`Value`] into a typed value.
pub trait FromValue: Sized {
    /// Converts `value`, reporting what was expected on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ValueMismatch`] when the value holds another kind or does
    /// not fit the target type.
    fn from_value(value: Value) -> Result<Self, ValueMismatch>;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        Ok(value)
    }
}

macro_rules! scalar_value {
    ($($ty:ty => $variant:ident, $kind:literal;)*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueMismatch> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(ValueMismatch::new($kind, &other)),
                    }
                }
            }
        )*
    };
}

scalar_value! {
    bool => Bool, "bool";
    f64 => Float, "float";
    Decimal => Decimal, "decimal";
    char => Char, "char";
    String => String, "string";
    NaiveDate => Date, "date";
    NaiveTime => Time, "time";
    DateTime<Tz> => DateTime, "datetime";
    NaiveDateTime => NaiveDateTime, "naive datetime";
    TimeDelta => Duration, "duration";
    Tz => Timezone, "timezone";
    Uuid => Uuid, "uuid";
    ModelInstance => Model, "model";
}

macro_rules! integer_value {
    (lossless: $($small:ty),*; checked: $($large:ty),*) => {
        $(
            impl IntoValue for $small {
                fn into_value(self) -> Value {
                    Value::Int(i64::from(self))
                }
            }
        )*

        $(
            impl FromValue for $small {
                fn from_value(value: Value) -> Result<Self, ValueMismatch> {
                    match value {
                        Value::Int(inner) => <$small>::try_from(inner)
                            .map_err(|_| ValueMismatch::new(stringify!($small), &value)),
                        other => Err(ValueMismatch::new(stringify!($small), &other)),
                    }
                }
            }
        )*

        $(
            impl FromValue for $large {
                fn from_value(value: Value) -> Result<Self, ValueMismatch> {
                    match value {
                        Value::Int(inner) => <$large>::try_from(inner)
                            .map_err(|_| ValueMismatch::new(stringify!($large), &value)),
                        other => Err(ValueMismatch::new(stringify!($large), &other)),
                    }
                }
            }
        )*
    };
}

integer_value!(lossless: i8, i16, i32, u8, u16, u32; checked: u64, usize, isize);

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Int(inner) => Ok(inner),
            other => Err(ValueMismatch::new("int", &other)),
        }
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_owned())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue> IntoValue for Box<[T]> {
    fn into_value(self) -> Value {
        Value::Tuple(
            self.into_vec()
                .into_iter()
                .map(IntoValue::into_value)
                .collect(),
        )
    }
}

impl<T: IntoValue> IntoValue for BTreeSet<T> {
    fn into_value(self) -> Value {
        Value::Set(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(key, value)| (key.into_value(), value.into_value()))
                .collect(),
        )
    }
}

fn sequence<T: FromValue>(items: Vec<Value>) -> Result<Vec<T>, ValueMismatch> {
    items.into_iter().map(T::from_value).collect()
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => sequence(items),
            other => Err(ValueMismatch::new("list", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Box<[T]> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Tuple(items) | Value::List(items) => {
                sequence(items).map(Vec::into_boxed_slice)
            }
            other => Err(ValueMismatch::new("tuple", &other)),
        }
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Set(items) | Value::List(items) | Value::Tuple(items) => {
                items.into_iter().map(T::from_value).collect()
            }
            other => Err(ValueMismatch::new("set", &other)),
        }
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, item)| Ok((K::from_value(key)?, V::from_value(item)?)))
                .collect(),
            other => Err(ValueMismatch::new("map", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Spam {
        a: i64,
    }

    #[rstest]
    #[case(Value::Int(7), Ok(7))]
    #[case(Value::Int(300), Err(ValueMismatch { expected: "u8", found: "int" }))]
    #[case(Value::Bool(true), Err(ValueMismatch { expected: "u8", found: "bool" }))]
    fn narrows_integers_with_range_checks(
        #[case] value: Value,
        #[case] expected: Result<u8, ValueMismatch>,
    ) {
        assert_eq!(u8::from_value(value), expected);
    }

    #[test]
    fn null_converts_to_none() {
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(
            Option::<String>::from_value(Value::String("Francis".to_owned())),
            Ok(Some("Francis".to_owned()))
        );
    }

    #[test]
    fn sets_accept_lists_and_drop_duplicates() {
        let value = Value::List(vec![Value::Int(2), Value::Int(1), Value::Int(2)]);
        let set = BTreeSet::<i64>::from_value(value).expect("set converts");
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn maps_convert_key_and_value() {
        let mut map = BTreeMap::new();
        map.insert('a', 3_i64);
        let value = map.clone().into_value();
        assert_eq!(BTreeMap::<char, i64>::from_value(value), Ok(map));
    }

    #[test]
    fn model_instances_downcast_to_their_type() {
        let instance = ModelInstance::new(Spam { a: 42 });
        assert!(instance.is::<Spam>());
        assert_eq!(instance.downcast_ref::<Spam>(), Some(&Spam { a: 42 }));
        assert_eq!(instance.downcast::<Spam>(), Ok(Spam { a: 42 }));
    }

    #[test]
    fn shared_model_instances_are_cloned_out() {
        let instance = ModelInstance::new(Spam { a: 1 });
        let shared = instance.clone();
        assert_eq!(instance, shared);
        assert_eq!(shared.downcast::<Spam>(), Ok(Spam { a: 1 }));
        assert!(instance.is::<Spam>());
    }

    #[test]
    fn wrong_downcast_returns_the_instance() {
        let instance = ModelInstance::new(Spam { a: 1 });
        let err = instance.downcast::<String>().expect_err("not a string");
        assert!(err.type_name().ends_with("Spam"));
    }
}
