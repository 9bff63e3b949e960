//! Grouped field declarations kept for older factory definitions.
//!
//! New code declares fields directly on [`FactoryBuilder`]. Groups are
//! registered through the same routine, so both paths build identical
//! factories.

use std::fmt;

use tracing::warn;

use crate::factory::FactoryBuilder;
use crate::fields::{Field, FieldSpec};
use crate::value::IntoValue;

/// Notice attached to a deprecated entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deprecation {
    /// The deprecated item.
    pub subject: &'static str,
    /// What to use instead.
    pub replacement: &'static str,
    /// Release that removes the item.
    pub removal: &'static str,
}

impl fmt::Display for Deprecation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is deprecated and will be removed in `{}`. Use {} instead.",
            self.subject, self.removal, self.replacement
        )
    }
}

/// Notice emitted by [`FactoryBuilder::field_group`].
pub const FIELD_GROUP_DEPRECATION: Deprecation = Deprecation {
    subject: "FactoryBuilder::field_group",
    replacement: "FactoryBuilder::field",
    removal: "v0.7.0",
};

/// An ordered block of field declarations.
#[derive(Debug, Clone, Default)]
pub struct FieldGroup {
    entries: Vec<(String, FieldSpec)>,
}

impl FieldGroup {
    /// Creates an empty group.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a generated field.
    #[must_use]
    pub fn field<F>(mut self, name: impl Into<String>, field: F) -> Self
    where
        F: Field + Send + Sync + fmt::Debug + 'static,
        F::Output: IntoValue,
    {
        self.entries.push((name.into(), FieldSpec::generator(field)));
        self
    }

    /// Adds a literal field.
    #[must_use]
    pub fn literal(mut self, name: impl Into<String>, value: impl IntoValue) -> Self {
        self.entries.push((name.into(), FieldSpec::literal(value)));
        self
    }

    /// Number of declarations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` for an empty group.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FactoryBuilder {
    /// Registers every declaration of `group`, in order.
    #[deprecated(since = "0.1.0", note = "declare fields with `FactoryBuilder::field`")]
    #[must_use]
    pub fn field_group(mut self, group: FieldGroup) -> Self {
        warn!(deprecation = %FIELD_GROUP_DEPRECATION, "legacy field group used");
        for (name, spec) in group.entries {
            self.register(name, spec);
        }
        self
    }
}
