//! Date, time, duration and timezone generators.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::{TZ_VARIANTS, Tz};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use super::Field;
use crate::error::FieldError;

/// Geographic areas of the tz database, used when no areas are configured.
pub const KNOWN_AREAS: [&str; 11] = [
    "Africa",
    "America",
    "Antarctica",
    "Arctic",
    "Asia",
    "Atlantic",
    "Australia",
    "Europe",
    "Indian",
    "Pacific",
    "Etc",
];

fn overflow(message: &str) -> FieldError {
    FieldError::TemporalOverflow {
        message: message.to_owned(),
    }
}

fn upper_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2069, 12, 31).unwrap_or(NaiveDate::MAX)
}

fn upper_datetime() -> NaiveDateTime {
    upper_date()
        .and_hms_opt(23, 59, 59)
        .unwrap_or(NaiveDateTime::MAX)
}

fn epoch() -> NaiveDateTime {
    DateTime::UNIX_EPOCH.naive_utc()
}

/// Largest sub-second nanosecond count outside a leap second.
const MAX_NANOS: u32 = 999_999_999;

/// Draws a `(seconds, nanoseconds)` pair between two ordered pairs.
///
/// Seconds are uniform over the whole span; nanoseconds are restricted only
/// inside the boundary seconds, so any range chrono can represent works.
fn draw_split(low: (i64, u32), high: (i64, u32), rng: &mut dyn RngCore) -> (i64, u32) {
    let secs = rng.random_range(low.0..=high.0);
    let first = if secs == low.0 { low.1.min(MAX_NANOS) } else { 0 };
    let last = if secs == high.0 { high.1.min(MAX_NANOS) } else { MAX_NANOS };
    (secs, rng.random_range(first..=last))
}

/// Draws a UTC instant between two naive UTC instants.
fn draw_instant(
    min: NaiveDateTime,
    max: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> Result<NaiveDateTime, FieldError> {
    if min > max {
        return Err(FieldError::invalid_range(min, max));
    }
    let split = |instant: NaiveDateTime| {
        let utc = instant.and_utc();
        (utc.timestamp(), utc.timestamp_subsec_nanos())
    };
    let (secs, nanos) = draw_split(split(min), split(max), rng);
    DateTime::from_timestamp(secs, nanos)
        .map(|instant| instant.naive_utc())
        .ok_or_else(|| overflow("instant outside supported calendar"))
}

/// Splits a duration into floored seconds and a non-negative nanosecond part.
fn split_delta(delta: TimeDelta) -> (i64, u32) {
    let secs = delta.num_seconds();
    let nanos = delta.subsec_nanos();
    if nanos < 0 {
        (secs.saturating_sub(1), 1_000_000_000 - nanos.unsigned_abs())
    } else {
        (secs, nanos.unsigned_abs())
    }
}

/// Generates calendar dates within inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateField {
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl DateField {
    /// Creates a generator over 1970-01-01 to 2069-12-31.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_date: epoch().date(),
            max_date: upper_date(),
        }
    }

    /// Sets the earliest date.
    #[must_use]
    pub const fn min_date(mut self, date: NaiveDate) -> Self {
        self.min_date = date;
        self
    }

    /// Sets the latest date.
    #[must_use]
    pub const fn max_date(mut self, date: NaiveDate) -> Self {
        self.max_date = date;
        self
    }
}

impl Default for DateField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for DateField {
    type Output = NaiveDate;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<NaiveDate, FieldError> {
        if self.min_date > self.max_date {
            return Err(FieldError::invalid_range(self.min_date, self.max_date));
        }
        let day = rng.random_range(self.min_date.num_days_from_ce()..=self.max_date.num_days_from_ce());
        NaiveDate::from_num_days_from_ce_opt(day).ok_or_else(|| overflow("day outside calendar"))
    }
}

/// Generates wall-clock times within inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeField {
    min_time: NaiveTime,
    max_time: NaiveTime,
}

impl TimeField {
    /// Creates a generator over the whole day.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_time: NaiveTime::MIN,
            max_time: NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
                .unwrap_or(NaiveTime::MIN),
        }
    }

    /// Sets the earliest time.
    #[must_use]
    pub const fn min_time(mut self, time: NaiveTime) -> Self {
        self.min_time = time;
        self
    }

    /// Sets the latest time.
    #[must_use]
    pub const fn max_time(mut self, time: NaiveTime) -> Self {
        self.max_time = time;
        self
    }
}

impl Default for TimeField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for TimeField {
    type Output = NaiveTime;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<NaiveTime, FieldError> {
        if self.min_time > self.max_time {
            return Err(FieldError::invalid_range(self.min_time, self.max_time));
        }
        let span = self
            .max_time
            .signed_duration_since(self.min_time)
            .num_nanoseconds()
            .ok_or_else(|| overflow("time span exceeds nanosecond range"))?;
        let offset = TimeDelta::nanoseconds(rng.random_range(0..=span));
        Ok(self.min_time.overflowing_add_signed(offset).0)
    }
}

/// Generates timezone-aware timestamps.
///
/// Bounds are compared as UTC instants; every result is expressed in the
/// timezone of the lower bound.
///
/// # Example
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::Europe::{London, Paris};
/// use model_factory::{DateTimeField, Field};
///
/// let min = London.with_ymd_and_hms(2021, 1, 1, 1, 0, 15).unwrap();
/// let max = Paris.with_ymd_and_hms(2021, 12, 31, 1, 0, 15).unwrap();
/// let value = DateTimeField::new()
///     .min_datetime(min)
///     .max_datetime(max)
///     .sample()
///     .expect("generates");
/// assert!(min <= value && value <= max);
/// assert_eq!(value.timezone(), London);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeField {
    min_datetime: DateTime<Tz>,
    max_datetime: DateTime<Tz>,
}

impl DateTimeField {
    /// Creates a generator over 1970 to the end of 2069, in UTC.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_datetime: Tz::UTC.from_utc_datetime(&epoch()),
            max_datetime: Tz::UTC.from_utc_datetime(&upper_datetime()),
        }
    }

    /// Sets the earliest instant; its timezone is used for every result.
    #[must_use]
    pub const fn min_datetime(mut self, datetime: DateTime<Tz>) -> Self {
        self.min_datetime = datetime;
        self
    }

    /// Sets the latest instant.
    #[must_use]
    pub const fn max_datetime(mut self, datetime: DateTime<Tz>) -> Self {
        self.max_datetime = datetime;
        self
    }
}

impl Default for DateTimeField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for DateTimeField {
    type Output = DateTime<Tz>;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<DateTime<Tz>, FieldError> {
        let zone = self.min_datetime.timezone();
        let instant = draw_instant(
            self.min_datetime.naive_utc(),
            self.max_datetime.naive_utc(),
            rng,
        )?;
        Ok(zone.from_utc_datetime(&instant))
    }
}

/// Conversion of a bound into a zone-less timestamp.
///
/// Aware timestamps keep their local wall-clock reading and lose their zone.
pub trait IntoNaive {
    /// Drops any zone information.
    fn into_naive(self) -> NaiveDateTime;
}

impl IntoNaive for NaiveDateTime {
    fn into_naive(self) -> NaiveDateTime {
        self
    }
}

impl<Z: TimeZone> IntoNaive for DateTime<Z> {
    fn into_naive(self) -> NaiveDateTime {
        self.naive_local()
    }
}

/// Generates timestamps without zone information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveDateTimeField {
    min_datetime: NaiveDateTime,
    max_datetime: NaiveDateTime,
}

impl NaiveDateTimeField {
    /// Creates a generator over 1970 to the end of 2069.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_datetime: epoch(),
            max_datetime: upper_datetime(),
        }
    }

    /// Sets the earliest timestamp, stripping any zone.
    #[must_use]
    pub fn min_datetime(mut self, datetime: impl IntoNaive) -> Self {
        self.min_datetime = datetime.into_naive();
        self
    }

    /// Sets the latest timestamp, stripping any zone.
    #[must_use]
    pub fn max_datetime(mut self, datetime: impl IntoNaive) -> Self {
        self.max_datetime = datetime.into_naive();
        self
    }
}

impl Default for NaiveDateTimeField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for NaiveDateTimeField {
    type Output = NaiveDateTime;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<NaiveDateTime, FieldError> {
        draw_instant(self.min_datetime, self.max_datetime, rng)
    }
}

/// Generates durations within inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationField {
    min_duration: TimeDelta,
    max_duration: TimeDelta,
}

impl DurationField {
    /// Creates a generator over zero to one day.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_duration: TimeDelta::zero(),
            max_duration: TimeDelta::days(1),
        }
    }

    /// Sets the shortest duration.
    #[must_use]
    pub const fn min_duration(mut self, duration: TimeDelta) -> Self {
        self.min_duration = duration;
        self
    }

    /// Sets the longest duration.
    #[must_use]
    pub const fn max_duration(mut self, duration: TimeDelta) -> Self {
        self.max_duration = duration;
        self
    }
}

impl Default for DurationField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for DurationField {
    type Output = TimeDelta;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<TimeDelta, FieldError> {
        if self.min_duration > self.max_duration {
            return Err(FieldError::invalid_range(
                self.min_duration,
                self.max_duration,
            ));
        }
        let (secs, nanos) = draw_split(
            split_delta(self.min_duration),
            split_delta(self.max_duration),
            rng,
        );
        TimeDelta::new(secs, nanos).ok_or_else(|| overflow("duration outside supported range"))
    }
}

/// Generates IANA timezones from selected geographic areas.
///
/// The candidate list is computed once at construction from the tz database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimezoneField {
    areas: Vec<String>,
    candidates: Vec<Tz>,
}

impl TimezoneField {
    /// Creates a generator over every known geographic area.
    #[must_use]
    pub fn new() -> Self {
        Self::areas(KNOWN_AREAS)
    }

    /// Restricts candidates to zones whose first path segment is one of
    /// `areas`. An empty list means every known area.
    #[must_use]
    pub fn areas<I, S>(areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = areas.into_iter().map(Into::into).collect();
        if selected.is_empty() {
            selected = KNOWN_AREAS.iter().map(|area| (*area).to_owned()).collect();
        }
        let candidates = TZ_VARIANTS
            .iter()
            .copied()
            .filter(|zone| {
                zone.name()
                    .split('/')
                    .next()
                    .is_some_and(|area| selected.iter().any(|wanted| wanted == area))
            })
            .collect();
        Self {
            areas: selected,
            candidates,
        }
    }

    /// Returns the zones this generator draws from.
    #[must_use]
    pub fn candidates(&self) -> &[Tz] {
        &self.candidates
    }
}

impl Default for TimezoneField {
    fn default() -> Self {
        Self::new()
    }
}

impl Field for TimezoneField {
    type Output = Tz;

    fn generate(&self, rng: &mut dyn RngCore) -> Result<Tz, FieldError> {
        self.candidates
            .choose(rng)
            .copied()
            .ok_or_else(|| FieldError::NoMatchingTimezones {
                areas: self.areas.join(", "),
            })
    }
}
