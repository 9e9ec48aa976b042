//! Temporal and identifier generator properties

use crate::assert_pass;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::HashSet;
use typegen::*;

/// Property: temporal ranges are end-exclusive
pub fn test_temporal_bounds() {
    let config = Config::default().with_tests(250);

    let start = NaiveDate::from_ymd_opt(1979, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    assert_pass(
        for_all(dates_between(start, end).unwrap(), move |d| *d >= start && *d < end).run(&config),
    );

    let from = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 1).unwrap();
    assert_pass(
        for_all(instants_between(from, to).unwrap(), move |t| *t >= from && *t < to).run(&config),
    );

    let morning = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    assert_pass(
        for_all(times_between(morning, noon).unwrap(), move |t| *t >= morning && *t < noon)
            .run(&config),
    );

    let first = start.and_hms_opt(0, 0, 0).unwrap();
    let last = end.and_hms_opt(0, 0, 0).unwrap();
    assert_pass(
        for_all(date_times_between(first, last).unwrap(), move |t| *t >= first && *t < last)
            .run(&config),
    );

    assert!(matches!(
        dates_between(end, start),
        Err(GenError::InvalidRange { .. })
    ));
}

/// Property: identifiers are distinct and reproducible
pub fn test_identifiers() {
    let mut rng = Random::from_u64(21);
    let ids: HashSet<_> = uuids().samples(&mut rng).take(1_000).map(|u| u.unwrap()).collect();
    assert_eq!(ids.len(), 1_000);

    assert_pass(
        for_all(uuid_strings(), |s| s.len() == 36 && s.chars().filter(|&c| c == '-').count() == 4)
            .run(&Config::default()),
    );

    let now = instant_now().next(&mut rng).unwrap();
    assert!(now > Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
}
