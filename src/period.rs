// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time period / interval algebra.
//!
//! This module provides:
//! - [`Period<Tz>`]: a half-open time interval `[start, end)` over
//!   `chrono::DateTime<Tz>` with optionally unbounded endpoints
//! - [`PeriodError`]: the validity error taxonomy reported by
//!   [`Period::validate`]
//! - [`FormatError`]: template failures from [`Period::format_as`]

use crate::calendar::{between_inclusive, day_start, start_of_day};
use crate::seq;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tinytemplate::TinyTemplate;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serializer};

/// Default template used by [`Period::format`]: `"{start} -> {end}"`.
pub const DEFAULT_PERIOD_FORMAT: &str = "{start} -> {end}";

/// A period of time between two instants.
///
/// Periods are **half-open**: `start` belongs to the period, `end` does not.
/// Each endpoint is optional; a missing `start` means the period is unbounded
/// toward the past and a missing `end` unbounded toward the future.  A period
/// with neither endpoint set is the *zero* period ([`Period::default`]),
/// which is distinct from an invalid one — see [`Period::validate`].
///
/// All operations are pure: they take the receiver by reference (or consume
/// owned arguments) and return new values, so `Period`s can be shared across
/// threads freely.
///
/// The *step* parameter accepted by the `_step` variants is a minimum-overlap
/// tolerance: two ranges only count as touching when they share at least that
/// much time.  Steps are normalized to their absolute value, and the
/// non-stepped entry points use one nanosecond, so merely-adjacent periods do
/// not overlap unless a zero step is requested explicitly.
///
/// # Examples
///
/// ```
/// use calspan::Period;
/// use chrono::{TimeZone, Utc};
///
/// let jan1 = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
/// let jan3 = Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap();
/// let jan7 = Utc.with_ymd_and_hms(2023, 1, 7, 0, 0, 0).unwrap();
///
/// let week = Period::new(jan1, jan7);
/// assert!(week.validate().is_ok());
/// assert!(week.contains(&jan3));
/// assert_eq!(week.years(), vec![2023]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period<Tz: TimeZone = Utc> {
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> Default for Period<Tz> {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
        }
    }
}

/// Validity violations reported by [`Period::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodError<Tz: TimeZone> {
    /// The period has no start.
    EmptyStart,
    /// The period has no end.
    EmptyEnd,
    /// Start and end are the same instant.
    EndEqualsStart { at: DateTime<Tz> },
    /// The end precedes the start.
    EndBeforeStart {
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    },
}

impl<Tz: TimeZone> fmt::Display for PeriodError<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::EmptyStart => write!(f, "period has no start"),
            PeriodError::EmptyEnd => write!(f, "period has no end"),
            PeriodError::EndEqualsStart { at } => {
                write!(f, "end must be after start; both are {at}")
            }
            PeriodError::EndBeforeStart { start, end } => {
                write!(f, "end ({end}) is before start ({start})")
            }
        }
    }
}

impl<Tz: TimeZone + fmt::Debug> std::error::Error for PeriodError<Tz> where Tz::Offset: fmt::Display {}

/// Template failure from [`Period::format_as`].
#[derive(Debug, Error)]
#[error(transparent)]
pub struct FormatError(#[from] tinytemplate::error::Error);

#[derive(Serialize)]
struct FormatContext {
    start: String,
    end: String,
}

fn bound_string<Tz: TimeZone>(bound: &Option<DateTime<Tz>>) -> String
where
    Tz::Offset: fmt::Display,
{
    match bound {
        Some(t) => t.to_string(),
        None => "unbounded".to_owned(),
    }
}

fn nanosecond() -> TimeDelta {
    TimeDelta::nanoseconds(1)
}

/// Later of two optional ends, where a missing end is unbounded and wins.
fn later_end<Tz: TimeZone>(
    a: Option<DateTime<Tz>>,
    b: Option<DateTime<Tz>>,
) -> Option<DateTime<Tz>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if a > b { a } else { b }),
        _ => None,
    }
}

impl<Tz: TimeZone> Period<Tz> {
    /// Creates a period spanning `[start, end)`.
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Creates a period starting at `start` with no end bound.
    pub fn since(start: DateTime<Tz>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Creates a period ending at `end` with no start bound.
    pub fn until(end: DateTime<Tz>) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// `true` when neither endpoint is set.
    pub fn is_zero(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Length of the period, or `None` when an endpoint is missing.
    pub fn duration(&self) -> Option<TimeDelta> {
        Some(self.end.clone()? - self.start.clone()?)
    }

    /// Checks that the period is well-formed: both endpoints present and the
    /// end strictly after the start.
    ///
    /// Other operations do not require a prior `validate` call; they degrade
    /// to empty results on an invalid receiver instead of failing.
    pub fn validate(&self) -> Result<(), PeriodError<Tz>> {
        let start = self.start.as_ref().ok_or(PeriodError::EmptyStart)?;
        let end = self.end.as_ref().ok_or(PeriodError::EmptyEnd)?;
        if end == start {
            return Err(PeriodError::EndEqualsStart { at: end.clone() });
        }
        if end < start {
            return Err(PeriodError::EndBeforeStart {
                start: start.clone(),
                end: end.clone(),
            });
        }
        Ok(())
    }

    /// Half-open membership test: `start <= t < end`.
    ///
    /// A missing endpoint is unbounded and always satisfied on its side, so
    /// the zero period contains every instant.
    pub fn contains(&self, t: &DateTime<Tz>) -> bool {
        let from_start = self.start.as_ref().map_or(true, |start| start <= t);
        let to_end = self.end.as_ref().map_or(true, |end| t < end);
        from_start && to_end
    }

    /// Closed membership test: `start <= t <= end`.
    pub fn contains_inclusive(&self, t: &DateTime<Tz>) -> bool {
        let from_start = self.start.as_ref().map_or(true, |start| start <= t);
        let to_end = self.end.as_ref().map_or(true, |end| t <= end);
        from_start && to_end
    }

    /// Whether `self` and `other` overlap by at least one nanosecond.
    ///
    /// Equivalent to [`Period::overlaps_step`] with a 1 ns step, so periods
    /// sharing only a boundary instant are adjacent, not overlapping.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.overlaps_step(nanosecond(), other)
    }

    /// Whether `self` and `other` overlap by at least `step`.
    ///
    /// With a zero step, merely touching counts:
    ///
    /// ```
    /// use calspan::Period;
    /// use chrono::{TimeDelta, TimeZone, Utc};
    ///
    /// let jan1 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    /// let jan2 = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
    /// let jan3 = Utc.with_ymd_and_hms(2020, 1, 3, 0, 0, 0).unwrap();
    ///
    /// let a = Period::new(jan1, jan2);
    /// let b = Period::new(jan2, jan3);
    /// assert!(a.overlaps_step(TimeDelta::zero(), &b));
    /// assert!(!a.overlaps(&b));
    /// ```
    ///
    /// Returns `false` when either period is zero or missing an endpoint.
    pub fn overlaps_step(&self, step: TimeDelta, other: &Self) -> bool {
        let (Some(start), Some(end)) = (self.start.as_ref(), self.end.as_ref()) else {
            return false;
        };
        let (Some(other_start), Some(other_end)) = (other.start.as_ref(), other.end.as_ref())
        else {
            return false;
        };

        let step = step.abs();
        let shrunk_end = end.clone() - step;
        let other_shrunk_end = other_end.clone() - step;

        between_inclusive(start, other_start, &other_shrunk_end)
            || between_inclusive(&shrunk_end, other_start, &other_shrunk_end)
            || between_inclusive(other_start, start, &shrunk_end)
            || between_inclusive(&other_shrunk_end, start, &shrunk_end)
    }

    /// Calendar years touched by the period for at least one nanosecond.
    pub fn years(&self) -> Vec<i32> {
        self.years_step(nanosecond())
    }

    /// Calendar years the period spends at least `step` in, ascending.
    ///
    /// With a zero step a period ending exactly at a year boundary still
    /// touches the next year; with any positive step it does not.
    pub fn years_step(&self, step: TimeDelta) -> Vec<i32> {
        use chrono::Datelike;

        let (Some(start), Some(end)) = (self.start.as_ref(), self.end.as_ref()) else {
            return Vec::new();
        };

        let mut min = start.year();
        let mut max = (end.clone() - step.abs()).year();
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }

        (min..=max).collect()
    }

    /// Whether the period spends at least one nanosecond in `year`.
    pub fn in_year(&self, year: i32) -> bool {
        self.in_year_step(nanosecond(), year)
    }

    /// Whether the period spends at least `step` in `year`.
    pub fn in_year_step(&self, step: TimeDelta, year: i32) -> bool {
        self.years_step(step).contains(&year)
    }

    /// Calendar dates spanned by the period, each as its local midnight.
    pub fn dates(&self) -> Option<Vec<DateTime<Tz>>> {
        self.dates_step(nanosecond())
    }

    /// Calendar dates the period spans by at least `step`, each as its local
    /// midnight, in chronological order.
    ///
    /// Returns `None` when the period fails [`Period::validate`]; a valid
    /// period always yields at least one date.
    pub fn dates_step(&self, step: TimeDelta) -> Option<Vec<DateTime<Tz>>> {
        self.validate().ok()?;
        let start = self.start.clone()?;
        let end = self.end.clone()? - step.abs();

        let tz = start.timezone();
        let mut out = Vec::new();
        let mut current = start_of_day(&start);
        loop {
            let next = current.date_naive() + chrono::Days::new(1);
            out.push(current);
            current = day_start(&tz, next);
            if current > end {
                break;
            }
        }
        Some(out)
    }

    /// Splits the period at the first date (per [`Period::dates`]) for which
    /// `split_at(date, index)` returns `true`.
    pub fn slice_dates<F>(&self, split_at: F) -> Option<(Self, Self)>
    where
        F: FnMut(&DateTime<Tz>, usize) -> bool,
    {
        self.slice_dates_step(nanosecond(), split_at)
    }

    /// Splits the period at the first date (per [`Period::dates_step`]) for
    /// which `split_at(date, index)` returns `true`.
    ///
    /// On a split, returns `Some((before, after))` where `after` spans from
    /// the matched date to the original end, and `before` spans the
    /// accumulated dates preceding it — both of its endpoints are the date
    /// values themselves.  Returns `None` (caller keeps the original) when
    /// the period is invalid, when no date matches, or when the very first
    /// date matches so that nothing precedes the split.
    pub fn slice_dates_step<F>(&self, step: TimeDelta, mut split_at: F) -> Option<(Self, Self)>
    where
        F: FnMut(&DateTime<Tz>, usize) -> bool,
    {
        let dates = self.dates_step(step)?;

        let mut kept = Vec::new();
        let mut after = None;
        for (index, date) in dates.into_iter().enumerate() {
            if split_at(&date, index) {
                after = Some(Self {
                    start: Some(date),
                    end: self.end.clone(),
                });
                break;
            }
            kept.push(date);
        }

        let after = after?;
        let before = Self {
            start: Some(kept.first()?.clone()),
            end: Some(kept.last()?.clone()),
        };
        Some((before, after))
    }

    /// Removes the given periods from the receiver and returns the surviving
    /// fragments, ascending by start.
    ///
    /// Every interval involved is half-open.  A cut missing its start is
    /// unbounded toward the past, one missing its end unbounded toward the
    /// future; a cut with no bounds at all is ignored.  With no cuts the
    /// receiver is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use calspan::Period;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let day = |d| Utc.with_ymd_and_hms(2023, 1, d, 0, 0, 0).unwrap();
    /// let remaining = Period::new(day(1), day(7)).cut(vec![Period::new(day(3), day(6))]);
    /// assert_eq!(
    ///     remaining,
    ///     vec![Period::new(day(1), day(3)), Period::new(day(6), day(7))],
    /// );
    /// ```
    pub fn cut(&self, mut cuts: Vec<Self>) -> Vec<Self> {
        cuts.retain(|cut| !cut.is_zero());
        cuts.sort_by(|a, b| a.start.cmp(&b.start));

        let mut remaining = vec![self.clone()];
        for cut in &cuts {
            let mut survivors = Vec::with_capacity(remaining.len());
            for fragment in remaining {
                survivors.extend(fragment.cut_one(cut));
            }
            remaining = survivors;
        }
        remaining
    }

    /// Subtracts a single cut from `self`, yielding 0, 1 or 2 fragments.
    fn cut_one(&self, cut: &Self) -> Vec<Self> {
        let covers_start = match (cut.start.as_ref(), self.start.as_ref()) {
            (None, _) => true,
            (Some(cut_start), Some(start)) => cut_start <= start,
            (Some(_), None) => false,
        };
        let covers_end = match (cut.end.as_ref(), self.end.as_ref()) {
            (None, _) => true,
            (Some(cut_end), Some(end)) => cut_end >= end,
            (Some(_), None) => false,
        };
        if covers_start && covers_end {
            return Vec::new();
        }

        let ends_before_cut = match (self.end.as_ref(), cut.start.as_ref()) {
            (Some(end), Some(cut_start)) => end < cut_start,
            _ => false,
        };
        let starts_after_cut = match (self.start.as_ref(), cut.end.as_ref()) {
            (Some(start), Some(cut_end)) => start > cut_end,
            _ => false,
        };
        if ends_before_cut || starts_after_cut {
            return vec![self.clone()];
        }

        let starts_before = match (self.start.as_ref(), cut.start.as_ref()) {
            (Some(start), Some(cut_start)) => start < cut_start,
            (None, Some(_)) => true,
            (_, None) => false,
        };
        let ends_after = match (self.end.as_ref(), cut.end.as_ref()) {
            (Some(end), Some(cut_end)) => end > cut_end,
            (None, Some(_)) => true,
            (_, None) => false,
        };

        match (starts_before, ends_after) {
            (true, true) => vec![
                Self {
                    start: self.start.clone(),
                    end: cut.start.clone(),
                },
                Self {
                    start: cut.end.clone(),
                    end: self.end.clone(),
                },
            ],
            (true, false) => vec![Self {
                start: self.start.clone(),
                end: cut.start.clone(),
            }],
            (false, true) => vec![Self {
                start: cut.end.clone(),
                end: self.end.clone(),
            }],
            // Both endpoints lie inside the cut: the fragment is absorbed.
            (false, false) => Vec::new(),
        }
    }

    /// Like [`Period::cut`], but treats the end of the receiver and of every
    /// cut as part of the interval.
    ///
    /// Implemented by nudging every present end forward one nanosecond,
    /// delegating to the half-open algebra, and nudging the resulting ends
    /// back.  Unbounded ends are left untouched.
    pub fn cut_inclusive(&self, cuts: Vec<Self>) -> Vec<Self> {
        let mut receiver = self.clone();
        let end_bounded = receiver.end.is_some();
        if let Some(end) = receiver.end.take() {
            receiver.end = Some(end + nanosecond());
        }

        let cuts = seq::map(cuts, |mut cut| {
            if let Some(end) = cut.end.take() {
                cut.end = Some(end + nanosecond());
            }
            cut
        });

        let fragments = receiver.cut(cuts);

        if end_bounded {
            seq::map(fragments, |mut fragment| {
                if let Some(end) = fragment.end.take() {
                    fragment.end = Some(end - nanosecond());
                }
                fragment
            })
        } else {
            fragments
        }
    }

    /// Merges the receiver with `periods`, consolidating periods that touch
    /// or overlap into single spans.
    ///
    /// Equivalent to [`Period::merge_step`] with a zero step, so adjacent
    /// periods are joined.
    pub fn merge(&self, periods: Vec<Self>) -> Vec<Self> {
        self.merge_step(TimeDelta::zero(), periods)
    }

    /// Merges the receiver with `periods`, consolidating periods that
    /// overlap by at least `step` into single spans, ascending by start.
    ///
    /// A period that neither overlaps the last consolidated span nor starts
    /// at-or-after its end is dropped.  That takes a period starting inside
    /// the span whose shared portion stays below `step`; the behavior is
    /// pinned by a test rather than hardened, since no caller is known to
    /// rely on either outcome.
    pub fn merge_step(&self, step: TimeDelta, periods: Vec<Self>) -> Vec<Self> {
        if periods.is_empty() {
            return vec![self.clone()];
        }

        let mut all = Vec::with_capacity(periods.len() + 1);
        all.push(self.clone());
        all.extend(periods);
        all.sort_by(|a, b| a.start.cmp(&b.start));

        let mut merged: Vec<Self> = Vec::new();
        for period in all {
            let Some(last) = merged.last_mut() else {
                merged.push(period);
                continue;
            };

            if last.overlaps_step(step, &period) {
                last.end = later_end(last.end.take(), period.end);
            } else if matches!(
                (last.end.as_ref(), period.start.as_ref()),
                (Some(end), Some(start)) if end <= start
            ) {
                merged.push(period);
            }
        }
        merged
    }
}

impl<Tz: TimeZone> Period<Tz>
where
    Tz::Offset: fmt::Display,
{
    /// Renders the period through `format`, a [`tinytemplate`] template with
    /// the named fields `{start}` and `{end}`.
    ///
    /// An empty `format` falls back to [`DEFAULT_PERIOD_FORMAT`].  Unbounded
    /// endpoints render as `unbounded`.  Template parse and render failures
    /// are returned as [`FormatError`]; use [`Period::format`] for the
    /// infallible variant.
    pub fn format_as(&self, format: &str) -> Result<String, FormatError> {
        let format = if format.is_empty() {
            DEFAULT_PERIOD_FORMAT
        } else {
            format
        };

        let context = FormatContext {
            start: bound_string(&self.start),
            end: bound_string(&self.end),
        };

        let mut templates = TinyTemplate::new();
        templates.set_default_formatter(&tinytemplate::format_unescaped);
        templates.add_template("period", format)?;
        Ok(templates.render("period", &context)?)
    }

    /// Renders the period through [`DEFAULT_PERIOD_FORMAT`], encoding any
    /// template failure into the returned string.
    pub fn format(&self) -> String {
        match self.format_as(DEFAULT_PERIOD_FORMAT) {
            Ok(rendered) => rendered,
            Err(err) => format!("<failed to format period: {err}>"),
        }
    }
}

impl<Tz: TimeZone> fmt::Display for Period<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl<Tz: TimeZone> std::ops::Add<TimeDelta> for Period<Tz> {
    type Output = Self;

    /// Shifts both endpoints forward by `rhs`; missing endpoints stay
    /// missing.
    fn add(self, rhs: TimeDelta) -> Self::Output {
        Self {
            start: self.start.map(|start| start + rhs),
            end: self.end.map(|end| end + rhs),
        }
    }
}

impl<Tz: TimeZone> std::ops::Sub<TimeDelta> for Period<Tz> {
    type Output = Self;

    /// Shifts both endpoints backward by `rhs`; missing endpoints stay
    /// missing.
    fn sub(self, rhs: TimeDelta) -> Self::Output {
        Self {
            start: self.start.map(|start| start - rhs),
            end: self.end.map(|end| end - rhs),
        }
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl<Tz: TimeZone> Serialize for Period<Tz> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Period", 2)?;
        s.serialize_field("start", &self.start)?;
        s.serialize_field("end", &self.end)?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Period<Utc> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: Option<DateTime<Utc>>,
            end: Option<DateTime<Utc>>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Period {
            start: raw.start,
            end: raw.end,
        })
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Period<chrono::FixedOffset> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: Option<DateTime<chrono::FixedOffset>>,
            end: Option<DateTime<chrono::FixedOffset>>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Period {
            start: raw.start,
            end: raw.end,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
