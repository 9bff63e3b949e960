//! Length policies and container generators.

use std::collections::{BTreeMap, BTreeSet};

use rand::{Rng, RngCore};

use super::Field;
use crate::error::FieldError;

/// Resolves how many elements a generator produces.
///
/// Bounds come from explicit minimum and maximum lengths or from a central
/// length plus or minus a variation. An exact length, when set, pins both
/// bounds and overrides everything else.
///
/// # Example
///
/// ```
/// use model_factory::LengthPolicy;
///
/// assert_eq!(LengthPolicy::around(5, 2).bounds(), Ok((3, 7)));
/// assert_eq!(LengthPolicy::between(1, 10).with_exact(4).bounds(), Ok((4, 4)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPolicy {
    min: usize,
    max: usize,
    exact: Option<usize>,
}

impl LengthPolicy {
    /// Lengths drawn from `[min, max]`.
    #[must_use]
    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            exact: None,
        }
    }

    /// Lengths drawn from `[length - variation, length + variation]`,
    /// saturating at zero.
    #[must_use]
    pub const fn around(length: usize, variation: usize) -> Self {
        Self::between(
            length.saturating_sub(variation),
            length.saturating_add(variation),
        )
    }

    /// Always exactly `length`.
    #[must_use]
    pub const fn exactly(length: usize) -> Self {
        Self::between(length, length).with_exact(length)
    }

    /// Replaces the lower bound.
    #[must_use]
    pub const fn with_min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    /// Replaces the upper bound.
    #[must_use]
    pub const fn with_max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    /// Pins the length, overriding both bounds.
    #[must_use]
    pub const fn with_exact(mut self, length: usize) -> Self {
        self.exact = Some(length);
        self
    }

    /// Returns the effective inclusive bounds.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidLength`] when the minimum exceeds the
    /// maximum.
    pub const fn bounds(&self) -> Result<(usize, usize), FieldError> {
        if let Some(length) = self.exact {
            return Ok((length, length));
        }
        if self.min > self.max {
            return Err(FieldError::InvalidLength {
                min: self.min,
                max: self.max,
            });
        }
        Ok((self.min, self.max))
    }

    /// Draws a length uniformly from the effective bounds.
    ///
    /// # Errors
    ///
    /// See [`LengthPolicy::bounds`].
    pub fn draw(&self, rng: &mut dyn RngCore) -> Result<usize, FieldError> {
        let (min, max) = self.bounds()?;
        Ok(rng.random_range(min..=max))
    }
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self::between(1, 10)
    }
}

macro_rules! length_setters {
    () => {
        /// Sets the minimum number of elements.
        #[must_use]
        pub const fn min_length(mut self, min: usize) -> Self {
            self.length = self.length.with_min(min);
            self
        }

        /// Sets the maximum number of elements.
        #[must_use]
        pub const fn max_length(mut self, max: usize) -> Self {
            self.length = self.length.with_max(max);
            self
        }

        /// Pins the number of elements, overriding other bounds.
        #[must_use]
        pub const fn length(mut self, length: usize) -> Self {
            self.length = self.length.with_exact(length);
            self
        }

        /// Replaces the whole length policy.
        #[must_use]
        pub const fn length_policy(mut self, policy: LengthPolicy) -> Self {
            self.length = policy;
            self
        }
    };
}

fn repeat<F: Field>(
    field: &F,
    length: &LengthPolicy,
    rng: &mut dyn RngCore,
) -> Result<Vec<F::Output>, FieldError> {
    let count = length.draw(rng)?;
    (0..count).map(|_| field.generate(rng)).collect()
}

/// Generates a `Vec` of child values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListField<F> {
    field: F,
    length: LengthPolicy,
}

impl<F: Field> ListField<F> {
    /// Wraps `field` with the default length policy (1 to 10 elements).
    #[must_use]
    pub fn new(field: F) -> Self {
        Self {
            field,
            length: LengthPolicy::default(),
        }
    }

    length_setters!();
}

impl<F: Field> Field for ListField<F> {
    type Output = Vec<F::Output>;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Self::Output, FieldError> {
        repeat(&self.field, &self.length, rng)
    }
}

/// Generates a fixed-size boxed slice of child values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleField<F> {
    field: F,
    length: LengthPolicy,
}

impl<F: Field> TupleField<F> {
    /// Wraps `field` with the default length policy (1 to 10 elements).
    #[must_use]
    pub fn new(field: F) -> Self {
        Self {
            field,
            length: LengthPolicy::default(),
        }
    }

    length_setters!();
}

impl<F: Field> Field for TupleField<F> {
    type Output = Box<[F::Output]>;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Self::Output, FieldError> {
        repeat(&self.field, &self.length, rng).map(Vec::into_boxed_slice)
    }
}

/// Generates a set of child values.
///
/// The child is invoked exactly the drawn number of times; duplicates
/// collapse, so the set may be smaller than the drawn length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetField<F> {
    field: F,
    length: LengthPolicy,
}

impl<F: Field> SetField<F>
where
    F::Output: Ord,
{
    /// Wraps `field` with the default length policy (1 to 10 elements).
    #[must_use]
    pub fn new(field: F) -> Self {
        Self {
            field,
            length: LengthPolicy::default(),
        }
    }

    length_setters!();
}

impl<F: Field> Field for SetField<F>
where
    F::Output: Ord,
{
    type Output = BTreeSet<F::Output>;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Self::Output, FieldError> {
        Ok(repeat(&self.field, &self.length, rng)?.into_iter().collect())
    }
}

/// Generates a map from a key generator and a value generator.
///
/// Each entry invokes the key generator, then the value generator. Later
/// entries replace earlier ones with the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapField<K, V> {
    key_field: K,
    value_field: V,
    length: LengthPolicy,
}

impl<K: Field, V: Field> MapField<K, V>
where
    K::Output: Ord,
{
    /// Pairs `key_field` and `value_field` with the default length policy.
    #[must_use]
    pub fn new(key_field: K, value_field: V) -> Self {
        Self {
            key_field,
            value_field,
            length: LengthPolicy::default(),
        }
    }

    length_setters!();
}

impl<K: Field, V: Field> Field for MapField<K, V>
where
    K::Output: Ord,
{
    type Output = BTreeMap<K::Output, V::Output>;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Self::Output, FieldError> {
        let count = self.length.draw(rng)?;
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key = self.key_field.generate(rng)?;
            let value = self.value_field.generate(rng)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::fields::{CharField, IntegerField};

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    fn percent() -> IntegerField {
        IntegerField::new().min_value(1).max_value(100)
    }

    #[rstest]
    #[case(LengthPolicy::between(2, 6), Ok((2, 6)))]
    #[case(LengthPolicy::around(1, 3), Ok((0, 4)))]
    #[case(LengthPolicy::between(7, 2).with_exact(3), Ok((3, 3)))]
    #[case(LengthPolicy::between(7, 2), Err(FieldError::InvalidLength { min: 7, max: 2 }))]
    fn resolves_length_bounds(
        #[case] policy: LengthPolicy,
        #[case] expected: Result<(usize, usize), FieldError>,
    ) {
        assert_eq!(policy.bounds(), expected);
    }

    #[rstest]
    fn lists_have_exact_length(mut rng: ChaCha8Rng) {
        let field = ListField::new(percent()).length(5);
        let values = field.generate(&mut rng).expect("generates");
        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|value| (1..=100).contains(value)));
    }

    #[rstest]
    fn lists_respect_bounds(mut rng: ChaCha8Rng) {
        let field = ListField::new(percent()).min_length(3).max_length(7);
        for _ in 0..50 {
            let len = field.generate(&mut rng).expect("generates").len();
            assert!((3..=7).contains(&len));
        }
    }

    #[rstest]
    fn tuples_have_exact_length(mut rng: ChaCha8Rng) {
        let field = TupleField::new(percent()).length(5);
        let values = field.generate(&mut rng).expect("generates");
        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|value| (1..=100).contains(value)));
    }

    #[rstest]
    fn sets_never_exceed_requested_length(mut rng: ChaCha8Rng) {
        let field = SetField::new(percent()).length(5);
        for _ in 0..50 {
            let values = field.generate(&mut rng).expect("generates");
            assert!((1..=5).contains(&values.len()));
            assert!(values.iter().all(|value| (1..=100).contains(value)));
        }
    }

    #[rstest]
    fn sets_collapse_collisions(mut rng: ChaCha8Rng) {
        let field = SetField::new(IntegerField::new().min_value(1).max_value(1)).length(4);
        assert_eq!(
            field.generate(&mut rng).expect("generates"),
            BTreeSet::from([1])
        );
    }

    #[rstest]
    fn maps_pair_keys_and_values(mut rng: ChaCha8Rng) {
        let field = MapField::new(CharField::new(), percent()).length(5);
        let map = field.generate(&mut rng).expect("generates");
        assert!((1..=5).contains(&map.len()));
        for (key, value) in &map {
            assert!(key.is_ascii_lowercase());
            assert!((1..=100).contains(value));
        }
    }

    #[rstest]
    fn invalid_lengths_fail_before_generating(mut rng: ChaCha8Rng) {
        let field = ListField::new(percent()).min_length(4).max_length(1);
        assert_eq!(
            field.generate(&mut rng),
            Err(FieldError::InvalidLength { min: 4, max: 1 })
        );
    }
}
