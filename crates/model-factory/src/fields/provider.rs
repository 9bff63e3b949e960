//! Named fake-data categories and UUIDs.

use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName, Name};
use rand::{Rng, RngCore};
use uuid::{Builder, Uuid};

use super::Field;
use super::numeric::{BooleanField, FloatField, IntegerField};
use super::text::{StringField, TextField, TextKind};
use crate::error::FieldError;
use crate::value::{FromValue, IntoValue, Value};

/// Short category names and the provider categories they stand for.
pub const ALIASES: [(&str, &str); 5] = [
    ("int", "pyint"),
    ("bool", "pybool"),
    ("float", "pyfloat"),
    ("str", "pystr"),
    ("uuid", "uuid4"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    PyInt,
    PyBool,
    PyFloat,
    PyStr,
    Word,
    Sentence,
    Paragraph,
    Name,
    FirstName,
    LastName,
    Email,
    Uuid4,
}

impl Category {
    const ALL: [Self; 12] = [
        Self::PyInt,
        Self::PyBool,
        Self::PyFloat,
        Self::PyStr,
        Self::Word,
        Self::Sentence,
        Self::Paragraph,
        Self::Name,
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Uuid4,
    ];

    const fn name(self) -> &'static str {
        match self {
            Self::PyInt => "pyint",
            Self::PyBool => "pybool",
            Self::PyFloat => "pyfloat",
            Self::PyStr => "pystr",
            Self::Word => "word",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
            Self::Name => "name",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Uuid4 => "uuid4",
        }
    }

    const fn parameters(self) -> &'static [&'static str] {
        match self {
            Self::PyInt | Self::PyFloat => &["min_value", "max_value"],
            Self::PyStr => &["min_chars", "max_chars"],
            Self::Sentence => &["nb_words"],
            Self::Paragraph => &["nb_sentences"],
            Self::PyBool
            | Self::Word
            | Self::Name
            | Self::FirstName
            | Self::LastName
            | Self::Email
            | Self::Uuid4 => &[],
        }
    }

    fn resolve(name: &str) -> Result<Self, FieldError> {
        let canonical = ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, target)| *target);
        Self::ALL
            .into_iter()
            .find(|category| category.name() == canonical)
            .ok_or_else(|| FieldError::UnknownCategory {
                name: name.to_owned(),
            })
    }
}

/// Typed access to the passthrough parameters of one invocation.
struct Params<'a> {
    category: Category,
    entries: &'a [(String, Value)],
}

impl<'a> Params<'a> {
    fn new(category: Category, entries: &'a [(String, Value)]) -> Result<Self, FieldError> {
        if let Some((name, _)) = entries
            .iter()
            .find(|(name, _)| !category.parameters().contains(&name.as_str()))
        {
            return Err(Self::invalid(category, name, "unsupported parameter"));
        }
        Ok(Self { category, entries })
    }

    fn invalid(category: Category, parameter: &str, message: &str) -> FieldError {
        FieldError::InvalidParameter {
            category: category.name().to_owned(),
            parameter: parameter.to_owned(),
            message: message.to_owned(),
        }
    }

    fn get<T: FromValue>(&self, name: &str) -> Result<Option<T>, FieldError> {
        let Some((_, value)) = self.entries.iter().find(|(key, _)| key == name) else {
            return Ok(None);
        };
        T::from_value(value.clone()).map(Some).map_err(|mismatch| {
            Self::invalid(
                self.category,
                name,
                &format!("expected {}, found {}", mismatch.expected, mismatch.found),
            )
        })
    }

    fn or<T: FromValue>(&self, name: &str, default: T) -> Result<T, FieldError> {
        Ok(self.get(name)?.unwrap_or(default))
    }

    /// Floats also accept integers that convert without loss.
    fn float_or(&self, name: &str, default: f64) -> Result<f64, FieldError> {
        match self.get::<Value>(name)? {
            None => Ok(default),
            Some(Value::Int(value)) => i32::try_from(value)
                .map(f64::from)
                .map_err(|_| Self::invalid(self.category, name, "integer too large for float")),
            Some(other) => f64::from_value(other).map_err(|mismatch| {
                Self::invalid(
                    self.category,
                    name,
                    &format!("expected {}, found {}", mismatch.expected, mismatch.found),
                )
            }),
        }
    }
}

/// Generates a value from a named provider category.
///
/// Category names are resolved through [`ALIASES`] first, so `int` and
/// `pyint` are the same category. Parameters are forwarded to the category
/// when the field is invoked.
///
/// | Category | Parameters | Value |
/// |---|---|---|
/// | `pyint` | `min_value`, `max_value` | `Int` |
/// | `pybool` | | `Bool` |
/// | `pyfloat` | `min_value`, `max_value` | `Float` |
/// | `pystr` | `min_chars`, `max_chars` | `String` |
/// | `word` | | `String` |
/// | `sentence` | `nb_words` | `String` |
/// | `paragraph` | `nb_sentences` | `String` |
/// | `name`, `first_name`, `last_name` | | `String` |
/// | `email` | | `String` |
/// | `uuid4` | | `Uuid` |
///
/// # Example
///
/// ```
/// use model_factory::{Field, ProviderField, Value};
///
/// let field = ProviderField::new("int")?
///     .param("min_value", 1)
///     .param("max_value", 3);
/// assert_eq!(field.category(), "pyint");
/// let Value::Int(value) = field.sample()? else {
///     panic!("pyint yields integers");
/// };
/// assert!((1..=3).contains(&value));
/// # Ok::<(), model_factory::FieldError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderField {
    category: Category,
    params: Vec<(String, Value)>,
}

impl ProviderField {
    /// Resolves `category` through the alias table.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnknownCategory`] when the name matches no
    /// category.
    pub fn new(category: &str) -> Result<Self, FieldError> {
        Ok(Self {
            category: Category::resolve(category)?,
            params: Vec::new(),
        })
    }

    /// Adds a passthrough parameter, replacing an earlier one of the same
    /// name.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl IntoValue) -> Self {
        let key = name.into();
        let param = value.into_value();
        match self.params.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = param,
            None => self.params.push((key, param)),
        }
        self
    }

    /// Returns the resolved category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        self.category.name()
    }
}

impl Field for ProviderField {
    type Output = Value;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, FieldError> {
        let params = Params::new(self.category, &self.params)?;
        let value = match self.category {
            Category::PyInt => IntegerField::new()
                .min_value(params.or("min_value", 0)?)
                .max_value(params.or("max_value", 9999)?)
                .generate(rng)?
                .into_value(),
            Category::PyBool => BooleanField::new().generate(rng)?.into_value(),
            Category::PyFloat => FloatField::new()
                .min_value(params.float_or("min_value", 0.0)?)
                .max_value(params.float_or("max_value", 9999.0)?)
                .generate(rng)?
                .into_value(),
            Category::PyStr => {
                let max = params.or("max_chars", 20_usize)?;
                let min = params.or("min_chars", max)?;
                StringField::new()
                    .min_chars(min)
                    .max_chars(max)
                    .generate(rng)?
                    .into_value()
            }
            Category::Word => TextField::new(TextKind::Word).generate(rng)?.into_value(),
            Category::Sentence => {
                let words = params.or("nb_words", 6_usize)?;
                TextField::new(TextKind::Sentence)
                    .words(words, words)
                    .generate(rng)?
                    .into_value()
            }
            Category::Paragraph => {
                let sentences = params.or("nb_sentences", 3_usize)?;
                TextField::new(TextKind::Paragraph)
                    .sentences(sentences, sentences)
                    .generate(rng)?
                    .into_value()
            }
            Category::Name => Name().fake_with_rng::<String, _>(rng).into_value(),
            Category::FirstName => FirstName().fake_with_rng::<String, _>(rng).into_value(),
            Category::LastName => LastName().fake_with_rng::<String, _>(rng).into_value(),
            Category::Email => SafeEmail().fake_with_rng::<String, _>(rng).into_value(),
            Category::Uuid4 => UuidField::new().generate(rng)?.into_value(),
        };
        Ok(value)
    }
}

/// Generates random version-4 UUIDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UuidField;

impl UuidField {
    /// Creates the generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Field for UuidField {
    type Output = Uuid;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Uuid, FieldError> {
        Ok(Builder::from_random_bytes(rng.random()).into_uuid())
    }
}
