use calspan::{
    at_time, end_of_iso_week, end_of_month, start_of_day, start_of_iso_week, Period, PeriodError,
};
use chrono::{DateTime, Datelike, FixedOffset, TimeDelta, TimeZone, Utc, Weekday};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, d, 0, 0, 0).unwrap()
}

#[test]
fn free_slots_of_a_working_week() {
    // Mon Jan 2 .. Sun Jan 8, half-open at the following Monday.
    let monday = day(2);
    let week = Period::new(
        start_of_iso_week(&monday),
        end_of_iso_week(&monday) + TimeDelta::nanoseconds(1),
    );
    assert!(week.validate().is_ok());
    assert_eq!(week.duration(), Some(TimeDelta::days(7)));

    let meetings = vec![
        Period::new(
            at_time(&day(3), 9, 0, 0, 0).unwrap(),
            at_time(&day(3), 11, 0, 0, 0).unwrap(),
        ),
        Period::new(
            at_time(&day(3), 10, 30, 0, 0).unwrap(),
            at_time(&day(3), 12, 0, 0, 0).unwrap(),
        ),
        Period::new(day(5), day(6)),
    ];

    let free = week.cut(meetings.clone());
    assert_eq!(
        free,
        vec![
            Period::new(day(2), at_time(&day(3), 9, 0, 0, 0).unwrap()),
            Period::new(at_time(&day(3), 12, 0, 0, 0).unwrap(), day(5)),
            Period::new(day(6), day(9)),
        ]
    );

    // Gluing the free slots back onto the meetings reconstructs the week.
    let mut pieces = meetings;
    pieces.extend(free.iter().skip(1).cloned());
    let rebuilt = free[0].merge(pieces);
    assert_eq!(rebuilt, vec![week]);
}

#[test]
fn splitting_a_sprint_at_the_weekend() {
    let sprint = Period::new(day(2), day(9));
    let (worked, remaining) = sprint
        .slice_dates(|date, _| date.date_naive().weekday() == Weekday::Sat)
        .expect("the sprint crosses a Saturday");

    assert_eq!(worked, Period::new(day(2), day(6)));
    assert_eq!(remaining, Period::new(day(7), day(9)));
    assert_eq!(
        remaining.dates(),
        Some(vec![day(7), day(8)]),
        "half-open end excludes Jan 9"
    );
}

#[test]
fn month_decomposition_in_a_fixed_offset_zone() {
    let tz = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
    let t = tz.with_ymd_and_hms(2023, 2, 14, 8, 0, 0).unwrap();

    let month = Period::new(
        start_of_day(&tz.with_ymd_and_hms(2023, 2, 1, 12, 0, 0).unwrap()),
        end_of_month(&t) + TimeDelta::nanoseconds(1),
    );
    let dates = month.dates().expect("valid month period");
    assert_eq!(dates.len(), 28);
    assert_eq!(dates[0], tz.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap());
    assert_eq!(
        dates[27],
        tz.with_ymd_and_hms(2023, 2, 28, 0, 0, 0).unwrap()
    );
    assert_eq!(month.years(), vec![2023]);
}

#[test]
fn unbounded_maintenance_window_truncates_the_schedule() {
    let schedule = Period::new(day(1), day(31));
    let decommissioned = Period::since(day(20));

    let remaining = schedule.cut(vec![decommissioned]);
    assert_eq!(remaining, vec![Period::new(day(1), day(20))]);

    let open_ended = Period::since(day(1));
    assert_eq!(open_ended.validate(), Err(PeriodError::EmptyEnd));
    assert!(open_ended.contains(&day(25)));
}

#[cfg(feature = "serde")]
#[test]
fn serde_period_roundtrips_through_json() {
    let period = Period::new(day(1), day(8));
    let json = serde_json::to_string(&period).unwrap();
    let back: Period<Utc> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, period);
}
