// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar boundary helpers and time comparison predicates.
//!
//! Every `start_of_*` function returns the first instant of the calendar unit
//! containing the given time; every `end_of_*` function returns the last
//! instant, defined as one nanosecond before the next unit begins.  The
//! returned value keeps the timezone of the input, and the boundaries are
//! computed in that timezone's local calendar.
//!
//! Day-level boundaries (`start_of_day` and everything built on top of it)
//! resolve local midnight through the timezone, so they stay correct across
//! DST transitions.  Sub-day truncation (`start_of_second` / `_minute` /
//! `_hour`) is plain offset-preserving arithmetic.

use chrono::{
    DateTime, Datelike, Days, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone, Timelike,
};

// ═══════════════════════════════════════════════════════════════════════════
// Local-time resolution
// ═══════════════════════════════════════════════════════════════════════════

/// Maps a local wall-clock time back onto the timezone's timeline.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
/// Local times skipped by a DST gap are probed forward in 30-minute
/// increments until a representable instant is found.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    let mut probe = local;
    loop {
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(t) => return t,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => probe += TimeDelta::minutes(30),
        }
    }
}

/// First instant of `date` in `tz`.
pub(crate) fn day_start<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Last instant of `date` in `tz`, one nanosecond before the next midnight.
fn day_end<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    day_start(tz, date + Days::new(1)) - TimeDelta::nanoseconds(1)
}

// ═══════════════════════════════════════════════════════════════════════════
// Sub-day boundaries
// ═══════════════════════════════════════════════════════════════════════════

/// Returns `t` with its sub-second part zeroed.
pub fn start_of_second<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    t.clone() - TimeDelta::nanoseconds(t.timestamp_subsec_nanos() as i64)
}

/// Last nanosecond of the second containing `t`.
pub fn end_of_second<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    start_of_second(t) + TimeDelta::seconds(1) - TimeDelta::nanoseconds(1)
}

/// Returns `t` truncated to the start of its minute.
pub fn start_of_minute<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    start_of_second(t) - TimeDelta::seconds(t.second() as i64)
}

/// Last nanosecond of the minute containing `t`.
pub fn end_of_minute<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    start_of_minute(t) + TimeDelta::minutes(1) - TimeDelta::nanoseconds(1)
}

/// Returns `t` truncated to the start of its hour.
pub fn start_of_hour<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    start_of_minute(t) - TimeDelta::minutes(t.minute() as i64)
}

/// Last nanosecond of the hour containing `t`.
pub fn end_of_hour<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    start_of_hour(t) + TimeDelta::hours(1) - TimeDelta::nanoseconds(1)
}

// ═══════════════════════════════════════════════════════════════════════════
// Day / week / month / year boundaries
// ═══════════════════════════════════════════════════════════════════════════

/// Midnight of the local calendar day containing `t`.
///
/// # Examples
///
/// ```
/// use calspan::start_of_day;
/// use chrono::{TimeZone, Utc};
///
/// let t = Utc.with_ymd_and_hms(2020, 3, 1, 15, 15, 15).unwrap();
/// assert_eq!(start_of_day(&t), Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap());
/// ```
pub fn start_of_day<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    day_start(&t.timezone(), t.date_naive())
}

/// Last nanosecond of the local calendar day containing `t`.
pub fn end_of_day<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    day_end(&t.timezone(), t.date_naive())
}

/// Midnight of the Sunday starting the week that contains `t`.
pub fn start_of_week<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let back = t.weekday().num_days_from_sunday() as u64;
    day_start(&t.timezone(), t.date_naive() - Days::new(back))
}

/// Last nanosecond of the Saturday ending the week that contains `t`.
pub fn end_of_week<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let forward = 6 - t.weekday().num_days_from_sunday() as u64;
    day_end(&t.timezone(), t.date_naive() + Days::new(forward))
}

/// Midnight of the Monday starting the ISO 8601 week that contains `t`.
pub fn start_of_iso_week<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let back = t.weekday().num_days_from_monday() as u64;
    day_start(&t.timezone(), t.date_naive() - Days::new(back))
}

/// Last nanosecond of the Sunday ending the ISO 8601 week that contains `t`.
pub fn end_of_iso_week<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let forward = 6 - t.weekday().num_days_from_monday() as u64;
    day_end(&t.timezone(), t.date_naive() + Days::new(forward))
}

/// Midnight of the first day of the month containing `t`.
pub fn start_of_month<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let date = t.date_naive();
    day_start(&t.timezone(), date - Days::new(date.day0() as u64))
}

/// Last nanosecond of the month containing `t`.
pub fn end_of_month<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let date = t.date_naive();
    let first = date - Days::new(date.day0() as u64);
    day_start(&t.timezone(), first + Months::new(1)) - TimeDelta::nanoseconds(1)
}

/// Midnight of January 1st of the year containing `t`.
pub fn start_of_year<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let date = t.date_naive();
    day_start(&t.timezone(), date - Days::new(date.ordinal0() as u64))
}

/// Last nanosecond of the year containing `t`.
pub fn end_of_year<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let date = t.date_naive();
    let first = date - Days::new(date.ordinal0() as u64);
    day_start(&t.timezone(), first + Months::new(12)) - TimeDelta::nanoseconds(1)
}

/// Replaces the time-of-day of `t` while keeping its date and timezone.
///
/// Returns `None` when the components are out of range (chrono rejects them
/// rather than normalizing into the next unit).
pub fn at_time<Tz: TimeZone>(
    t: &DateTime<Tz>,
    hour: u32,
    min: u32,
    sec: u32,
    nano: u32,
) -> Option<DateTime<Tz>> {
    let local = t.date_naive().and_hms_nano_opt(hour, min, sec, nano)?;
    Some(resolve_local(&t.timezone(), local))
}

// ═══════════════════════════════════════════════════════════════════════════
// Comparison predicates
// ═══════════════════════════════════════════════════════════════════════════

/// `true` when `t` is the same instant as `r` or precedes it.
#[inline]
pub fn same_or_before<Tz: TimeZone>(t: &DateTime<Tz>, r: &DateTime<Tz>) -> bool {
    t <= r
}

/// `true` when `t` is the same instant as `l` or follows it.
#[inline]
pub fn same_or_after<Tz: TimeZone>(t: &DateTime<Tz>, l: &DateTime<Tz>) -> bool {
    t >= l
}

/// `true` when `t` lies strictly between `l` and `r`.
#[inline]
pub fn between<Tz: TimeZone>(t: &DateTime<Tz>, l: &DateTime<Tz>, r: &DateTime<Tz>) -> bool {
    l < t && t < r
}

/// `true` when `t` lies in the closed range `[l, r]`.
#[inline]
pub fn between_inclusive<Tz: TimeZone>(
    t: &DateTime<Tz>,
    l: &DateTime<Tz>,
    r: &DateTime<Tz>,
) -> bool {
    same_or_before(t, r) && same_or_after(t, l)
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
