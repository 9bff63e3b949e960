//! Error types for the model-factory crate.
//!
//! This module defines semantic error enums for field generation, model
//! construction and factory resolution, following the project's error
//! handling conventions with `thiserror`.

use thiserror::Error;

/// Errors raised while a field generator produces a value.
///
/// Generators only fail when their constraints are ill-formed (for example
/// `min > max`) or when a nested factory cannot build its model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The lower bound of a value range exceeds the upper bound.
    #[error("invalid range: minimum {min} exceeds maximum {max}")]
    InvalidRange {
        /// Rendered lower bound.
        min: String,
        /// Rendered upper bound.
        max: String,
    },

    /// The minimum length of a length policy exceeds the maximum length.
    #[error("invalid length bounds: minimum {min} exceeds maximum {max}")]
    InvalidLength {
        /// Minimum length.
        min: usize,
        /// Maximum length.
        max: usize,
    },

    /// A choice generator was given no candidates.
    #[error("choice field has no candidates to draw from")]
    EmptyChoices,

    /// A floating-point bound is NaN or infinite.
    #[error("float bound {value} is not finite")]
    NonFiniteBound {
        /// Rendered offending bound.
        value: String,
    },

    /// Scaling a decimal bound to the requested precision overflowed.
    #[error("decimal range cannot be represented with {precision} fractional digits")]
    DecimalOverflow {
        /// Requested number of fractional digits.
        precision: u32,
    },

    /// A temporal bound fell outside the representable range.
    #[error("temporal value out of range: {message}")]
    TemporalOverflow {
        /// Description of the failing conversion.
        message: String,
    },

    /// No timezone matched the configured geographic areas.
    #[error("no timezone matches areas [{areas}]")]
    NoMatchingTimezones {
        /// Comma-separated list of requested areas.
        areas: String,
    },

    /// The provider category name is not known, even after alias lookup.
    #[error("unknown provider category '{name}'")]
    UnknownCategory {
        /// The requested category name.
        name: String,
    },

    /// A provider parameter is unsupported or has the wrong type.
    #[error("invalid parameter '{parameter}' for provider category '{category}': {message}")]
    InvalidParameter {
        /// Resolved provider category.
        category: String,
        /// Parameter name.
        parameter: String,
        /// Description of the problem.
        message: String,
    },

    /// A nested factory failed to build its model.
    #[error("nested factory failed: {0}")]
    Factory(Box<FactoryError>),
}

impl FieldError {
    pub(crate) fn invalid_range(min: impl ToString, max: impl ToString) -> Self {
        Self::InvalidRange {
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

impl From<FactoryError> for FieldError {
    fn from(err: FactoryError) -> Self {
        Self::Factory(Box::new(err))
    }
}

/// Errors raised by a model constructor while consuming its arguments.
///
/// These are produced by [`crate::Arguments`] helpers or by model
/// implementations themselves, and reach the caller of a build unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructError {
    /// A required argument was not supplied.
    #[error("missing required argument '{name}'")]
    MissingArgument {
        /// Argument name.
        name: String,
    },

    /// An argument was supplied that the model does not accept.
    #[error("unexpected argument '{name}'")]
    UnexpectedArgument {
        /// Argument name.
        name: String,
    },

    /// An argument could not be converted to the parameter type.
    #[error("argument '{name}' expected {expected}, found {found}")]
    TypeMismatch {
        /// Argument name.
        name: String,
        /// Expected value kind.
        expected: &'static str,
        /// Kind of the supplied value.
        found: &'static str,
    },

    /// The model rejected an otherwise well-typed set of arguments.
    #[error("invalid model arguments: {message}")]
    Invalid {
        /// Description supplied by the model.
        message: String,
    },
}

/// Errors raised while resolving a factory's model or building an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// No model type was declared anywhere in the factory's ancestry.
    #[error("no concrete model found for {factory}")]
    NoConcreteModel {
        /// Factory name.
        factory: String,
    },

    /// More than one distinct model type was declared across the ancestry.
    #[error("multiple concrete models found for {factory}: {}", .models.join(", "))]
    MultipleConcreteModels {
        /// Factory name.
        factory: String,
        /// Type names of every declared model.
        models: Vec<&'static str>,
    },

    /// A typed build asked for a model other than the declared one.
    #[error("factory {factory} builds {declared}, not {requested}")]
    ModelMismatch {
        /// Factory name.
        factory: String,
        /// Declared model type name.
        declared: &'static str,
        /// Requested model type name.
        requested: &'static str,
    },

    /// A field generator failed while the factory evaluated it.
    #[error("failed to generate field '{field}' of {factory}: {source}")]
    Field {
        /// Factory name.
        factory: String,
        /// Field name.
        field: String,
        /// Underlying generator failure.
        #[source]
        source: FieldError,
    },

    /// The model constructor rejected the assembled arguments.
    #[error(transparent)]
    Construct(#[from] ConstructError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_invalid_range_formats_correctly() {
        let err = FieldError::invalid_range(10, 3);
        assert_eq!(err.to_string(), "invalid range: minimum 10 exceeds maximum 3");
    }

    #[test]
    fn field_error_invalid_length_formats_correctly() {
        let err = FieldError::InvalidLength { min: 5, max: 2 };
        assert_eq!(
            err.to_string(),
            "invalid length bounds: minimum 5 exceeds maximum 2"
        );
    }

    #[test]
    fn field_error_unknown_category_formats_correctly() {
        let err = FieldError::UnknownCategory {
            name: "pyspam".to_owned(),
        };
        assert_eq!(err.to_string(), "unknown provider category 'pyspam'");
    }

    #[test]
    fn construct_error_type_mismatch_formats_correctly() {
        let err = ConstructError::TypeMismatch {
            name: "x".to_owned(),
            expected: "int",
            found: "string",
        };
        assert_eq!(err.to_string(), "argument 'x' expected int, found string");
    }

    #[test]
    fn factory_error_no_model_formats_correctly() {
        let err = FactoryError::NoConcreteModel {
            factory: "SpamFactory".to_owned(),
        };
        assert_eq!(err.to_string(), "no concrete model found for SpamFactory");
    }

    #[test]
    fn factory_error_multiple_models_lists_every_model() {
        let err = FactoryError::MultipleConcreteModels {
            factory: "Mixed".to_owned(),
            models: vec!["Spam", "Eggs"],
        };
        assert_eq!(
            err.to_string(),
            "multiple concrete models found for Mixed: Spam, Eggs"
        );
    }

    #[test]
    fn construct_errors_pass_through_unchanged() {
        let inner = ConstructError::MissingArgument {
            name: "a".to_owned(),
        };
        let err = FactoryError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn nested_factory_errors_are_boxed() {
        let err = FieldError::from(FactoryError::NoConcreteModel {
            factory: "Inner".to_owned(),
        });
        assert_eq!(
            err.to_string(),
            "nested factory failed: no concrete model found for Inner"
        );
    }
}
