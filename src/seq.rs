// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Internal sequence helpers.

/// Maps `items` into a new vector by applying `f` to every element.
///
/// The "a sequence may be absent" signal that some callers need is carried by
/// `Option<Vec<_>>` at the API level (see [`crate::Period::dates_step`]);
/// this helper only ever sees sequences that exist.
pub(crate) fn map<T, U, F>(items: Vec<T>, f: F) -> Vec<U>
where
    F: FnMut(T) -> U,
{
    items.into_iter().map(f).collect()
}
