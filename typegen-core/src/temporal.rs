//! Date, time and identifier generators.
//!
//! Bounded temporal ranges are bridged through one linear integer axis
//! (nanosecond offset from the start, day number, nanosecond of day), so
//! every range is monotonic, never falls below its start and excludes its
//! end.
//! The `*_now` generators read the wall clock at sampling time and are
//! therefore not reproducible from a seed.

use crate::{combinators::*, error::*, gen::*};
use chrono::{
    DateTime, Datelike, Local, Month, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike,
    Utc, Weekday,
};
use rand::Rng;
use uuid::Uuid;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Instants uniformly in `[start, end)` at nanosecond resolution.
pub fn instants_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Gen<DateTime<Utc>>> {
    let offsets = offsets_within(end - start).map_err(|_| GenError::invalid_range(&start, &end))?;
    Ok(offsets.map(move |offset| start.checked_add_signed(offset).unwrap_or(start)))
}

/// Dates uniformly in `[start, end)`.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Result<Gen<NaiveDate>> {
    let gen = between(start.num_days_from_ce(), end.num_days_from_ce())
        .map_err(|_| GenError::invalid_range(&start, &end))?;
    Ok(gen.map(move |days| NaiveDate::from_num_days_from_ce_opt(days).unwrap_or(start)))
}

/// Times of day uniformly in `[start, end)` at nanosecond resolution.
pub fn times_between(start: NaiveTime, end: NaiveTime) -> Result<Gen<NaiveTime>> {
    let gen = between(nano_of_day(&start), nano_of_day(&end))
        .map_err(|_| GenError::invalid_range(&start, &end))?;
    Ok(gen.map(move |nanos| {
        let secs = (nanos / NANOS_PER_SECOND) as u32;
        let nano = (nanos % NANOS_PER_SECOND) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(secs, nano).unwrap_or(start)
    }))
}

/// Date-times uniformly in `[start, end)` at nanosecond resolution.
pub fn date_times_between(start: NaiveDateTime, end: NaiveDateTime) -> Result<Gen<NaiveDateTime>> {
    let offsets = offsets_within(end - start).map_err(|_| GenError::invalid_range(&start, &end))?;
    Ok(offsets.map(move |offset| start.checked_add_signed(offset).unwrap_or(start)))
}

/// Offsets uniformly in `[0, span)`, counted in nanoseconds.
fn offsets_within(span: TimeDelta) -> Result<Gen<TimeDelta>> {
    // Whole seconds and the sub-second part share a sign for any span.
    let nanos = span.num_seconds() as i128 * NANOS_PER_SECOND as i128 + span.subsec_nanos() as i128;
    let gen = between(0i128, nanos)?;
    Ok(gen.map(|offset| {
        let secs = (offset / NANOS_PER_SECOND as i128) as i64;
        let nanos = (offset % NANOS_PER_SECOND as i128) as u32;
        TimeDelta::new(secs, nanos).unwrap_or_default()
    }))
}

fn nano_of_day(time: &NaiveTime) -> i64 {
    // Leap-second representations carry nanosecond() >= 1e9; they still
    // sort after the preceding second on this axis.
    time.num_seconds_from_midnight() as i64 * NANOS_PER_SECOND + time.nanosecond() as i64
}

/// Days of the week, uniformly.
pub fn weekdays() -> Gen<Weekday> {
    Gen::from_fn(|rng| WEEKDAYS[rng.gen_range(0..WEEKDAYS.len())])
}

/// Months of the year, uniformly.
pub fn months() -> Gen<Month> {
    Gen::from_fn(|rng| MONTHS[rng.gen_range(0..MONTHS.len())])
}

pub(crate) const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub(crate) const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// The current UTC instant at sampling time.
pub fn instant_now() -> Gen<DateTime<Utc>> {
    Gen::supply(Utc::now)
}

/// Today's local date at sampling time.
pub fn date_now() -> Gen<NaiveDate> {
    Gen::supply(|| Local::now().date_naive())
}

/// The current local date-time at sampling time.
pub fn date_time_now() -> Gen<NaiveDateTime> {
    Gen::supply(|| Local::now().naive_local())
}

/// Version 4 UUIDs built from bytes of the random source.
pub fn uuids() -> Gen<Uuid> {
    Gen::from_fn(|rng| {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    })
}

/// Hyphenated UUID strings.
pub fn uuid_strings() -> Gen<String> {
    uuids().map(|id| id.to_string())
}
