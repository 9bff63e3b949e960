//! Character, string and free-text generators.

use std::fmt;
use std::str::FromStr;

use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Paragraphs, Sentence, Word};
use rand::RngCore;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::Field;
use super::collection::LengthPolicy;
use crate::error::FieldError;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";

fn pick(alphabet: &[char], rng: &mut dyn RngCore) -> Result<char, FieldError> {
    alphabet.choose(rng).copied().ok_or(FieldError::EmptyChoices)
}

/// Generates single characters from a fixed alphabet.
///
/// The alphabet always contains the lowercase ASCII letters and can be
/// extended with uppercase letters and digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharField {
    include_uppercase: bool,
    include_digits: bool,
    alphabet: Vec<char>,
}

impl CharField {
    /// Creates a generator over the lowercase ASCII letters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_flags(false, false)
    }

    fn with_flags(include_uppercase: bool, include_digits: bool) -> Self {
        let mut alphabet: Vec<char> = LOWERCASE.chars().collect();
        if include_uppercase {
            alphabet.extend(UPPERCASE.chars());
        }
        if include_digits {
            alphabet.extend(DIGITS.chars());
        }
        Self {
            include_uppercase,
            include_digits,
            alphabet,
        }
    }

    /// Adds or removes the uppercase ASCII letters.
    #[must_use]
    pub fn include_uppercase(self, include: bool) -> Self {
        Self::with_flags(include, self.include_digits)
    }

    /// Adds or removes the ASCII digits.
    #[must_use]
    pub fn include_digits(self, include: bool) -> Self {
        Self::with_flags(self.include_uppercase, include)
    }

    /// Returns the characters this generator draws from.
    #[must_use]
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }
}

impl Default for CharField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for CharField {
    type Output = char;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<char, FieldError> {
        pick(&self.alphabet, rng)
    }
}

/// Generates strings of ASCII letters with an optional prefix and suffix.
///
/// The length policy applies to the random part only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringField {
    length: LengthPolicy,
    prefix: String,
    suffix: String,
    alphabet: Vec<char>,
}

impl StringField {
    /// Creates a generator of 1 to 20 letters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            length: LengthPolicy::between(1, 20),
            prefix: String::new(),
            suffix: String::new(),
            alphabet: LOWERCASE.chars().chain(UPPERCASE.chars()).collect(),
        }
    }

    /// Sets the minimum number of random characters.
    #[must_use]
    pub const fn min_chars(mut self, min: usize) -> Self {
        self.length = self.length.with_min(min);
        self
    }

    /// Sets the maximum number of random characters.
    #[must_use]
    pub const fn max_chars(mut self, max: usize) -> Self {
        self.length = self.length.with_max(max);
        self
    }

    /// Pins the number of random characters, overriding other bounds.
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

    /// Sets a fixed prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets a fixed suffix.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

impl Default for StringField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for StringField {
    type Output = String;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<String, FieldError> {
        let count = self.length.draw(rng)?;
        let mut out = String::with_capacity(self.prefix.len() + count + self.suffix.len());
        out.push_str(&self.prefix);
        for _ in 0..count {
            out.push(pick(&self.alphabet, rng)?);
        }
        out.push_str(&self.suffix);
        Ok(out)
    }
}

/// Category of free text produced by [`TextField`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    /// A single lorem word.
    Word,
    /// One sentence.
    Sentence,
    /// One paragraph of sentences.
    Paragraph,
    /// Several paragraphs truncated to a character budget.
    #[default]
    Text,
}

impl TextKind {
    /// Every category, in declaration order.
    pub const ALL: [Self; 4] = [Self::Word, Self::Sentence, Self::Paragraph, Self::Text];

    /// Returns the lowercase category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for TextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FieldError::UnknownCategory { name: s.to_owned() })
    }
}

/// Generates lorem-ipsum text of a selected [`TextKind`].
///
/// Word and sentence counts are forwarded to the provider's category
/// generator; `max_chars` only applies to [`TextKind::Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    kind: TextKind,
    words: (usize, usize),
    sentences: (usize, usize),
    max_chars: usize,
}

impl TextField {
    /// Creates a generator for `kind` with default counts.
    #[must_use]
    pub const fn new(kind: TextKind) -> Self {
        Self {
            kind,
            words: (4, 10),
            sentences: (3, 6),
            max_chars: 200,
        }
    }

    /// Sets the inclusive number of words per sentence.
    #[must_use]
    pub const fn words(mut self, min: usize, max: usize) -> Self {
        self.words = (min, max);
        self
    }

    /// Sets the inclusive number of sentences per paragraph.
    #[must_use]
    pub const fn sentences(mut self, min: usize, max: usize) -> Self {
        self.sentences = (min, max);
        self
    }

    /// Sets the character budget for [`TextKind::Text`].
    #[must_use]
    pub const fn max_chars(mut self, max: usize) -> Self {
        self.max_chars = max;
        self
    }

    /// Returns the selected category.
    #[must_use]
    pub const fn kind(&self) -> TextKind {
        self.kind
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new(TextKind::default())
    }
}

fn half_open((min, max): (usize, usize)) -> Result<std::ops::Range<usize>, FieldError> {
    if min > max {
        return Err(FieldError::InvalidLength { min, max });
    }
    Ok(min..max.saturating_add(1))
}

impl Field for TextField {
    type Output = String;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<String, FieldError> {
        let text: String = match self.kind {
            TextKind::Word => Word().fake_with_rng(rng),
            TextKind::Sentence => Sentence(half_open(self.words)?).fake_with_rng(rng),
            TextKind::Paragraph => Paragraph(half_open(self.sentences)?).fake_with_rng(rng),
            TextKind::Text => {
                let paragraphs: Vec<String> = Paragraphs(1..4).fake_with_rng(rng);
                paragraphs.join("\n").chars().take(self.max_chars).collect()
            }
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[rstest]
    #[case(false, false, "abcdefghijklmnopqrstuvwxyz")]
    #[case(true, false, "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ")]
    #[case(false, true, "abcdefghijklmnopqrstuvwxyz0123456789")]
    #[case(
        true,
        true,
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"
    )]
    fn char_alphabet_follows_flags(
        mut rng: ChaCha8Rng,
        #[case] uppercase: bool,
        #[case] digits: bool,
        #[case] expected: &str,
    ) {
        let field = CharField::new()
            .include_uppercase(uppercase)
            .include_digits(digits);
        assert_eq!(field.alphabet().iter().collect::<String>(), expected);
        for _ in 0..100 {
            let value = field.generate(&mut rng).expect("generates");
            assert!(expected.contains(value));
        }
    }

    #[rstest]
    fn strings_respect_length_and_affixes(mut rng: ChaCha8Rng) {
        let field = StringField::new()
            .min_chars(10)
            .max_chars(12)
            .prefix("spam")
            .suffix("!");
        for _ in 0..100 {
            let value = field.generate(&mut rng).expect("generates");
            assert!(value.starts_with("spam"));
            assert!(value.ends_with('!'));
            assert!((15..=17).contains(&value.len()), "bad length: {value}");
        }
    }

    #[rstest]
    fn exact_string_length_wins(mut rng: ChaCha8Rng) {
        let field = StringField::new().min_chars(1).max_chars(3).length(8);
        assert_eq!(field.generate(&mut rng).expect("generates").len(), 8);
    }

    #[rstest]
    fn every_text_kind_produces_text(mut rng: ChaCha8Rng) {
        for kind in TextKind::ALL {
            let value = TextField::new(kind).generate(&mut rng).expect("generates");
            assert!(!value.is_empty(), "{kind} produced nothing");
        }
    }

    #[rstest]
    fn text_respects_character_budget(mut rng: ChaCha8Rng) {
        let field = TextField::new(TextKind::Text).max_chars(25);
        for _ in 0..20 {
            assert!(field.generate(&mut rng).expect("generates").chars().count() <= 25);
        }
    }

    #[rstest]
    fn words_are_single_tokens(mut rng: ChaCha8Rng) {
        let value = TextField::new(TextKind::Word)
            .generate(&mut rng)
            .expect("generates");
        assert!(!value.contains(' '));
    }

    #[test]
    fn text_kinds_round_trip_through_strings() {
        for kind in TextKind::ALL {
            assert_eq!(kind.to_string().parse::<TextKind>(), Ok(kind));
        }
        assert!("poem".parse::<TextKind>().is_err());
    }

    #[test]
    fn text_kinds_serialize_lowercase() {
        let json = serde_json::to_string(&TextKind::Paragraph).expect("serialize");
        assert_eq!(json, "\"paragraph\"");
    }
}
