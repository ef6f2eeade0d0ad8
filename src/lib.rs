// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar-aware time periods.
//!
//! This crate provides a half-open time interval type, [`Period`], together
//! with the calendar helpers needed to decompose and align it: boundary
//! functions (`start_of_day`, `end_of_month`, …) and comparison predicates
//! over [`chrono`] instants.
//!
//! # Core type
//!
//! - [`Period<Tz>`] — a half-open interval `[start, end)` over
//!   `chrono::DateTime<Tz>`.  Either endpoint may be absent, which makes the
//!   period unbounded in that direction; [`Period::default`] has neither and
//!   is the *zero* period.  The algebra covers containment, overlap with a
//!   configurable minimum-overlap step, calendar decomposition into years and
//!   dates, splitting, subtraction ([`Period::cut`]) and merging
//!   ([`Period::merge`]).
//!
//! # Calendar helpers
//!
//! | Unit | Functions |
//! |------|-----------|
//! | second / minute / hour | [`start_of_second`], [`end_of_hour`], … |
//! | day | [`start_of_day`], [`end_of_day`], [`at_time`] |
//! | week | [`start_of_week`] (Sunday), [`start_of_iso_week`] (Monday), … |
//! | month / year | [`start_of_month`], [`end_of_year`], … |
//!
//! All `end_of_*` helpers return the last representable nanosecond of the
//! unit.  Day-level boundaries resolve local midnight through the value's
//! timezone, so they behave across DST transitions.
//!
//! # Example
//!
//! ```
//! use calspan::{end_of_week, start_of_week, Period};
//! use chrono::{TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2023, 1, 4, 9, 30, 0).unwrap();
//! let week = Period::new(start_of_week(&now), end_of_week(&now));
//!
//! let busy = Period::new(
//!     Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap(),
//! );
//!
//! let free = week.cut(vec![busy]);
//! assert_eq!(free.len(), 2);
//! ```
//!
//! # Feature flags
//!
//! - `serde` — `Serialize` for any `Period<Tz>` and `Deserialize` for
//!   `Period<Utc>` / `Period<FixedOffset>`, plus chrono's serde support.

mod calendar;
mod period;
mod seq;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use calendar::{
    at_time, between, between_inclusive, end_of_day, end_of_hour, end_of_iso_week, end_of_minute,
    end_of_month, end_of_second, end_of_week, end_of_year, same_or_after, same_or_before,
    start_of_day, start_of_hour, start_of_iso_week, start_of_minute, start_of_month,
    start_of_second, start_of_week, start_of_year,
};
pub use period::{FormatError, Period, PeriodError, DEFAULT_PERIOD_FORMAT};
