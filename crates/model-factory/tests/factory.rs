//! Integration tests for factories and field generators through the public
//! API.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

mod support;

use std::sync::LazyLock;
use std::thread;

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Europe::{London, Paris};
use model_factory::{
    Arguments, ChoiceField, ConstructError, DateTimeField, DecimalField, Factory, FactoryBuilder,
    FactoryError, Field, FieldError, FieldSpec, IntegerField, MapField, Model, ModelInstance,
    NaiveDateTimeField, Overrides, ProviderField, SetField, StringField, TimezoneField, Value,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use support::{Bacon, Spam, assert_valid_spam, bacon_factory, spam_factory};

static SHARED: LazyLock<Factory> = LazyLock::new(bacon_factory);

#[fixture]
fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(2021)
}

#[rstest]
fn nested_builds_satisfy_inner_constraints(mut rng: ChaCha8Rng) {
    for _ in 0..20 {
        let bacon: Bacon = SHARED
            .build_with_rng(&mut rng, Overrides::new())
            .expect("builds");
        assert!((1..=3).contains(&bacon.x));
        assert!(bacon.y.is_ascii_lowercase());
        assert_valid_spam(&bacon.z);
    }
}

#[rstest]
fn overrides_replace_and_extend() {
    let bacon: Bacon = SHARED
        .build_with(Overrides::new().value("x", 400).value("t", "Kevin"))
        .expect("builds");
    assert_eq!(bacon.x, 400);
    assert_eq!(bacon.t, "Kevin");
}

#[rstest]
fn prebuilt_models_can_override_nested_fields() {
    let spam: Spam = spam_factory().build().expect("builds");
    let bacon: Bacon = SHARED
        .build_with(Overrides::new().value("z", Value::model(spam.clone())))
        .expect("builds");
    assert_eq!(bacon.z, spam);
}

#[rstest]
fn factories_are_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| thread::spawn(|| SHARED.build::<Bacon>()))
        .collect();
    for handle in handles {
        let bacon = handle
            .join()
            .expect("thread completes")
            .expect("builds");
        assert_valid_spam(&bacon.z);
    }
}

#[derive(Debug)]
struct Strict {
    name: String,
}

impl Model for Strict {
    fn from_arguments(args: &mut Arguments) -> Result<Self, ConstructError> {
        let name: String = args.take("name")?;
        if name.is_empty() {
            return Err(ConstructError::Invalid {
                message: "name must not be empty".to_owned(),
            });
        }
        args.finish()?;
        Ok(Self { name })
    }
}

#[rstest]
#[case(Overrides::new().value("name", ""), ConstructError::Invalid {
    message: "name must not be empty".to_owned(),
})]
#[case(Overrides::new().value("extra", 1), ConstructError::UnexpectedArgument {
    name: "extra".to_owned(),
})]
#[case(Overrides::new().value("name", 7), ConstructError::TypeMismatch {
    name: "name".to_owned(),
    expected: "string",
    found: "int",
})]
fn constructor_errors_propagate_unchanged(
    #[case] overrides: Overrides,
    #[case] expected: ConstructError,
) {
    let factory = FactoryBuilder::new("StrictFactory")
        .model::<Strict>()
        .field("name", StringField::new().length(6))
        .finish();
    let strict: Strict = factory.build().expect("default build succeeds");
    assert_eq!(strict.name.len(), 6);
    assert_eq!(
        factory.build_with::<Strict>(overrides).map(|built| built.name),
        Err(FactoryError::Construct(expected))
    );
}

#[rstest]
fn erased_builds_report_their_model(mut rng: ChaCha8Rng) {
    let instance: ModelInstance = spam_factory()
        .build_instance(&mut rng, Overrides::new())
        .expect("builds");
    assert!(instance.type_name().ends_with("Spam"));
    assert_valid_spam(instance.downcast_ref::<Spam>().expect("is spam"));
}

#[rstest]
fn declared_specs_are_classified_once() {
    let factory = spam_factory();
    assert!(factory.field("a").is_some_and(FieldSpec::is_generator));
    assert!(factory.field("c").is_some_and(|spec| !spec.is_generator()));
    assert!(factory.field("missing").is_none());
}

#[rstest]
fn choice_draws_survive_many_invocations(mut rng: ChaCha8Rng) {
    let field = ChoiceField::new(["spam", "bacon", "eggs"]);
    for _ in 0..500 {
        let value = field.generate(&mut rng).expect("generates");
        assert!(["spam", "bacon", "eggs"].contains(&value));
    }
    assert_eq!(field.options(), ["spam", "bacon", "eggs"]);
}

#[rstest]
fn decimal_fields_honour_bounds_and_precision(mut rng: ChaCha8Rng) {
    let min = Decimal::new(123_123, 3);
    let max = Decimal::new(10_000_314, 3);
    let field = DecimalField::new()
        .min_value(min)
        .max_value(max)
        .accuracy(3);
    for _ in 0..100 {
        let value = field.generate(&mut rng).expect("generates");
        assert!(min <= value && value <= max);
        assert_eq!(value.scale(), 3);
    }
}

#[rstest]
fn aware_and_naive_datetimes(mut rng: ChaCha8Rng) {
    let day = |d| NaiveDate::from_ymd_opt(2021, 1, d).expect("valid date");
    let min = London
        .from_local_datetime(&day(1).and_hms_opt(1, 0, 15).expect("valid time"))
        .single()
        .expect("unambiguous");
    let max = Paris
        .from_local_datetime(&day(31).and_hms_opt(1, 0, 15).expect("valid time"))
        .single()
        .expect("unambiguous");

    let aware = DateTimeField::new().min_datetime(min).max_datetime(max);
    let naive = NaiveDateTimeField::new().min_datetime(min).max_datetime(max);
    for _ in 0..50 {
        let stamped = aware.generate(&mut rng).expect("generates");
        assert_eq!(stamped.timezone(), London);
        assert!(min <= stamped && stamped <= max);

        let plain = naive.generate(&mut rng).expect("generates");
        assert!(min.naive_local() <= plain && plain <= max.naive_local());
    }
}

#[rstest]
fn timezones_restricted_to_areas(mut rng: ChaCha8Rng) {
    let field = TimezoneField::areas(["Europe", "Antarctica"]);
    for _ in 0..50 {
        let zone = field.generate(&mut rng).expect("generates");
        assert!(
            zone.name().starts_with("Europe/") || zone.name().starts_with("Antarctica/"),
            "unexpected zone {}",
            zone.name()
        );
    }
}

#[rstest]
fn sets_and_maps_may_shrink(mut rng: ChaCha8Rng) {
    let digits = IntegerField::new().min_value(0).max_value(2);
    let set = SetField::new(digits).length(10);
    let map = MapField::new(digits, StringField::new()).length(10);
    for _ in 0..20 {
        assert!(set.generate(&mut rng).expect("generates").len() <= 3);
        assert!(map.generate(&mut rng).expect("generates").len() <= 3);
    }
}

#[rstest]
fn provider_fields_plug_into_factories(mut rng: ChaCha8Rng) {
    #[derive(Debug)]
    struct Person {
        email: String,
        age: i64,
    }

    impl Model for Person {
        fn from_arguments(args: &mut Arguments) -> Result<Self, ConstructError> {
            Ok(Self {
                email: args.take("email")?,
                age: args.take("age")?,
            })
        }
    }

    let factory = FactoryBuilder::new("PersonFactory")
        .model::<Person>()
        .field("email", ProviderField::new("email").expect("known category"))
        .field(
            "age",
            ProviderField::new("int")
                .expect("known category")
                .param("min_value", 18)
                .param("max_value", 99),
        )
        .finish();
    let person: Person = factory
        .build_with_rng(&mut rng, Overrides::new())
        .expect("builds");
    assert!(person.email.contains('@'));
    assert!((18..=99).contains(&person.age));
}

#[rstest]
fn invalid_provider_parameters_fail_the_build() {
    let factory = FactoryBuilder::new("BadFactory")
        .model::<Spam>()
        .field(
            "a",
            ProviderField::new("word")
                .expect("known category")
                .param("nb_words", 2),
        )
        .finish();
    assert!(matches!(
        factory.build::<Spam>(),
        Err(FactoryError::Field {
            source: FieldError::InvalidParameter { .. },
            ..
        })
    ));
}
