//! Shared models and factories for integration tests.

use model_factory::{
    Arguments, CharField, ConstructError, Factory, FactoryBuilder, FactoryField, IntegerField,
    ListField, Model,
};

/// Inner model with a list, a character and a constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Spam {
    pub a: Vec<i64>,
    pub b: char,
    pub c: i64,
}

impl Model for Spam {
    fn from_arguments(args: &mut Arguments) -> Result<Self, ConstructError> {
        let spam = Self {
            a: args.take("a")?,
            b: args.take("b")?,
            c: args.take("c")?,
        };
        args.finish()?;
        Ok(spam)
    }
}

/// Outer model nesting a [`Spam`]; `t` has a constructor default.
#[derive(Debug, Clone, PartialEq)]
pub struct Bacon {
    pub x: i64,
    pub y: char,
    pub z: Spam,
    pub t: String,
}

impl Model for Bacon {
    fn from_arguments(args: &mut Arguments) -> Result<Self, ConstructError> {
        Ok(Self {
            x: args.take("x")?,
            y: args.take("y")?,
            z: args.take_model("z")?,
            t: args.take_or("t", "Francis".to_owned())?,
        })
    }
}

pub fn spam_factory() -> Factory {
    FactoryBuilder::new("SpamFactory")
        .model::<Spam>()
        .field(
            "a",
            ListField::new(IntegerField::new().min_value(1).max_value(100)).length(5),
        )
        .field("b", CharField::new())
        .literal("c", 1024)
        .finish()
}

pub fn bacon_factory() -> Factory {
    FactoryBuilder::new("BaconFactory")
        .model::<Bacon>()
        .field("x", IntegerField::new().min_value(1).max_value(3))
        .field("y", CharField::new())
        .field("z", FactoryField::new(&spam_factory()))
        .finish()
}

/// Asserts `spam` honours every constraint of [`spam_factory`].
pub fn assert_valid_spam(spam: &Spam) {
    assert_eq!(spam.a.len(), 5);
    assert!(spam.a.iter().all(|value| (1..=100).contains(value)));
    assert!(spam.b.is_ascii_lowercase());
    assert_eq!(spam.c, 1024);
}
