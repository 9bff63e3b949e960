//! Declarative test-data factories.
//!
//! This crate builds populated model instances from reusable field
//! generators. A factory declares which model it builds and, for every
//! constructor argument, either a generator invoked on each build or a
//! literal passed through unchanged. Callers can override any field per
//! build.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Leaf generators for numbers, text, dates, times, timezones and UUIDs
//! - Collection generators with configurable length policies
//! - Nested factories, so one model can contain another
//! - Factory inheritance with in-place field replacement
//! - Reproducible builds from a seeded random source
//!
//! # Example
//!
//! ```
//! use model_factory::{
//!     Arguments, CharField, ConstructError, FactoryBuilder, FactoryField, IntegerField,
//!     ListField, Model, Overrides,
//! };
//!
//! #[derive(Debug, Clone)]
//! struct Spam {
//!     a: Vec<i64>,
//!     b: char,
//! }
//!
//! impl Model for Spam {
//!     fn from_arguments(args: &mut Arguments) -> Result<Self, ConstructError> {
//!         Ok(Self { a: args.take("a")?, b: args.take("b")? })
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Bacon {
//!     x: i64,
//!     z: Spam,
//!     t: String,
//! }
//!
//! impl Model for Bacon {
//!     fn from_arguments(args: &mut Arguments) -> Result<Self, ConstructError> {
//!         Ok(Self {
//!             x: args.take("x")?,
//!             z: args.take_model("z")?,
//!             t: args.take_or("t", "Francis".to_owned())?,
//!         })
//!     }
//! }
//!
//! let spam = FactoryBuilder::new("SpamFactory")
//!     .model::<Spam>()
//!     .field("a", ListField::new(IntegerField::new().min_value(1).max_value(100)).length(5))
//!     .field("b", CharField::new())
//!     .finish();
//! let bacon = FactoryBuilder::new("BaconFactory")
//!     .model::<Bacon>()
//!     .field("x", IntegerField::new().min_value(1).max_value(3))
//!     .field("z", FactoryField::new(&spam))
//!     .finish();
//!
//! let built: Bacon = bacon.build_with(Overrides::new().value("x", 400).value("t", "Kevin"))?;
//! assert_eq!(built.x, 400);
//! assert_eq!(built.t, "Kevin");
//! assert_eq!(built.z.a.len(), 5);
//! # Ok::<(), model_factory::FactoryError>(())
//! ```

mod error;
mod factory;
mod fields;
mod legacy;
mod model;
mod settings;
mod value;

pub use error::{ConstructError, FactoryError, FieldError};
pub use factory::{Factory, FactoryBuilder, Overrides};
pub use fields::{
    ALIASES, AnyField, BooleanField, CharField, ChoiceField, ConstantField, DateField,
    DateTimeField, DecimalField, DurationField, FactoryField, Field, FieldSpec, FloatField,
    FnField, IntegerField, IntoNaive, KNOWN_AREAS, LengthPolicy, ListField, MapField,
    NaiveDateTimeField, ProviderField, SetField, StringField, TextField, TextKind, TimeField,
    TimezoneField, TupleField, UuidField,
};
pub use legacy::{Deprecation, FIELD_GROUP_DEPRECATION, FieldGroup};
pub use model::{Arguments, Model, ModelBinding};
pub use settings::FactorySettings;
pub use value::{FromValue, IntoValue, ModelInstance, Value, ValueMismatch};
