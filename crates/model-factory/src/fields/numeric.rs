//! Boolean and numeric generators.

use fake::Fake;
use fake::faker::boolean::en::Boolean;
use rand::distr::{Bernoulli, Distribution, Uniform};
use rand::{Rng, RngCore};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::Field;
use crate::error::FieldError;

/// Largest number of fractional digits a [`Decimal`] can carry.
const MAX_PRECISION: u32 = 28;

/// Generates booleans, `true` with a configurable percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanField {
    chance_of_true: u8,
}

impl BooleanField {
    /// Creates a fair coin.
    #[must_use]
    pub const fn new() -> Self {
        Self { chance_of_true: 50 }
    }

    /// Sets the percentage chance of `true`, capped at 100.
    #[must_use]
    pub fn chance_of_true(mut self, percent: u8) -> Self {
        self.chance_of_true = percent.min(100);
        self
    }
}

impl Default for BooleanField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for BooleanField {
    type Output = bool;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<bool, FieldError> {
        Ok(Boolean(self.chance_of_true).fake_with_rng(rng))
    }
}

/// Generates integers uniformly within inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerField {
    min_value: i64,
    max_value: i64,
}

impl IntegerField {
    /// Creates a generator over `[0, 9999]`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_value: 0,
            max_value: 9999,
        }
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub const fn min_value(mut self, value: i64) -> Self {
        self.min_value = value;
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub const fn max_value(mut self, value: i64) -> Self {
        self.max_value = value;
        self
    }
}

impl Default for IntegerField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for IntegerField {
    type Output = i64;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<i64, FieldError> {
        if self.min_value > self.max_value {
            return Err(FieldError::invalid_range(self.min_value, self.max_value));
        }
        Ok(rng.random_range(self.min_value..=self.max_value))
    }
}

/// Generates floats uniformly within inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatField {
    min_value: f64,
    max_value: f64,
}

impl FloatField {
    /// Creates a generator over `[0.0, 9999.0]`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_value: 0.0,
            max_value: 9999.0,
        }
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub const fn min_value(mut self, value: f64) -> Self {
        self.min_value = value;
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub const fn max_value(mut self, value: f64) -> Self {
        self.max_value = value;
        self
    }
}

impl Default for FloatField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for FloatField {
    type Output = f64;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<f64, FieldError> {
        for bound in [self.min_value, self.max_value] {
            if !bound.is_finite() {
                return Err(FieldError::NonFiniteBound {
                    value: bound.to_string(),
                });
            }
        }
        if self.min_value > self.max_value {
            return Err(FieldError::invalid_range(self.min_value, self.max_value));
        }
        if let Ok(uniform) = Uniform::new_inclusive(self.min_value, self.max_value) {
            return Ok(uniform.sample(rng));
        }
        // The span overflows, so the bounds straddle zero; draw a sign first.
        let invalid = || FieldError::invalid_range(self.min_value, self.max_value);
        let positive = Bernoulli::new(positive_share(self.min_value, self.max_value))
            .map_err(|_| invalid())?
            .sample(rng);
        let half = if positive {
            Uniform::new_inclusive(0.0, self.max_value)
        } else {
            Uniform::new_inclusive(self.min_value, 0.0)
        };
        Ok(half.map_err(|_| invalid())?.sample(rng))
    }
}

/// Probability that a uniform draw over `[min, max]` lands above zero.
#[expect(clippy::float_arithmetic, reason = "halved bounds cannot overflow")]
fn positive_share(min: f64, max: f64) -> f64 {
    let upper = max / 2.0;
    upper / (upper - min / 2.0)
}

/// Generates decimals with a varying number of fractional digits.
///
/// Each invocation first draws a precision from
/// `[accuracy - variation, accuracy + variation]`, then draws a value with
/// exactly that many fractional digits inside `[min_value, max_value]`.
///
/// # Example
///
/// ```
/// use model_factory::{DecimalField, Field};
/// use rust_decimal::Decimal;
///
/// let field = DecimalField::new()
///     .min_value(Decimal::new(123_123, 3))
///     .max_value(Decimal::new(10_000_314, 3))
///     .accuracy(3);
/// let value = field.sample().expect("generates");
/// assert_eq!(value.scale(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalField {
    min_value: Decimal,
    max_value: Decimal,
    accuracy: u32,
    variation: u32,
}

impl DecimalField {
    /// Creates a generator over `[0, 9999]` with two fractional digits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_value: Decimal::ZERO,
            max_value: Decimal::from_parts(9999, 0, 0, false, 0),
            accuracy: 2,
            variation: 0,
        }
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub const fn min_value(mut self, value: Decimal) -> Self {
        self.min_value = value;
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub const fn max_value(mut self, value: Decimal) -> Self {
        self.max_value = value;
        self
    }

    /// Sets the central number of fractional digits.
    ///
    /// The drawn precision is capped at the number of fractional digits the
    /// larger bound can carry inside a [`Decimal`]'s 96-bit mantissa, so
    /// `accuracy(26)` over `[0, 9999]` yields values with 24 digits.
    #[must_use]
    pub const fn accuracy(mut self, digits: u32) -> Self {
        self.accuracy = digits;
        self
    }

    /// Sets how far the precision may stray from the accuracy.
    #[must_use]
    pub const fn variation(mut self, digits: u32) -> Self {
        self.variation = digits;
        self
    }

    /// Largest precision at which both bounds still fit in a [`Decimal`].
    fn capacity(&self) -> u32 {
        let largest = self.min_value.abs().max(self.max_value.abs());
        (0..=MAX_PRECISION)
            .rev()
            .find(|digits| scale_by(largest, *digits).is_some())
            .unwrap_or(0)
    }

    fn draw_precision(&self, rng: &mut dyn RngCore) -> u32 {
        let high = self
            .accuracy
            .saturating_add(self.variation)
            .min(self.capacity());
        let low = self.accuracy.saturating_sub(self.variation).min(high);
        rng.random_range(low..=high)
    }
}

impl Default for DecimalField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for DecimalField {
    type Output = Decimal;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Decimal, FieldError> {
        if self.min_value > self.max_value {
            return Err(FieldError::invalid_range(self.min_value, self.max_value));
        }
        let precision = self.draw_precision(rng);
        let overflow = || FieldError::DecimalOverflow { precision };

        let scaled = |bound: Decimal| scale_by(bound, precision).ok_or_else(overflow);
        let lowest = scaled(self.min_value)?
            .ceil()
            .to_i128()
            .ok_or_else(overflow)?;
        let highest = scaled(self.max_value)?
            .floor()
            .to_i128()
            .ok_or_else(overflow)?;
        if lowest > highest {
            return Err(overflow());
        }

        let mantissa = rng.random_range(lowest..=highest);
        Decimal::try_from_i128_with_scale(mantissa, precision).map_err(|_| overflow())
    }
}

/// Multiplies `value` by `10^digits`, or `None` when that overflows.
fn scale_by(value: Decimal, digits: u32) -> Option<Decimal> {
    let factor = Decimal::try_from_i128_with_scale(10_i128.checked_pow(digits)?, 0).ok()?;
    value.checked_mul(factor)
}
