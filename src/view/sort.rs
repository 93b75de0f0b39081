//! Typed sort comparators for record lists.
//!
//! Each record type declares a [`ComparatorTable`] once, mapping sort keys to
//! comparators that know the field's type. Text compares case-insensitively,
//! numbers numerically, dates chronologically. Missing values always sort
//! after present ones regardless of direction.

use std::cmp::Ordering;

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use unicase::UniCase;

/// Sort direction for a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

enum_display_fromstr!(
    SortDirection,
    crate::error::SiteworkError::InvalidSortDirection,
    {
        Ascending => "asc",
        Descending => "desc",
    }
);

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Active sort key and direction. `key == None` keeps source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction,
        }
    }

    /// Select a sort key: reselecting the active key toggles direction,
    /// a different key starts ascending.
    pub fn select(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = self.direction.toggle();
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Ascending;
        }
    }
}

/// A typed comparator for one sortable field of `R`.
pub enum Comparator<R> {
    Text(fn(&R) -> &str),
    OptionalText(fn(&R) -> Option<&str>),
    Number(fn(&R) -> Option<f64>),
    Date(fn(&R) -> Option<Date>),
    Timestamp(fn(&R) -> Option<Timestamp>),
    /// Any total order over the record, e.g. status pipeline order
    By(fn(&R, &R) -> Ordering),
}

impl<R> Clone for Comparator<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Comparator<R> {}

impl<R> std::fmt::Debug for Comparator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Comparator::Text(_) => "Text",
            Comparator::OptionalText(_) => "OptionalText",
            Comparator::Number(_) => "Number",
            Comparator::Date(_) => "Date",
            Comparator::Timestamp(_) => "Timestamp",
            Comparator::By(_) => "By",
        };
        write!(f, "Comparator::{kind}")
    }
}

impl<R> Comparator<R> {
    pub fn compare(&self, a: &R, b: &R, direction: SortDirection) -> Ordering {
        match self {
            Comparator::Text(get) => direction.apply(compare_text(get(a), get(b))),
            Comparator::OptionalText(get) => {
                compare_present(get(a), get(b), direction, |x, y| compare_text(x, y))
            }
            Comparator::Number(get) => compare_present(get(a), get(b), direction, f64::total_cmp),
            Comparator::Date(get) => compare_present(get(a), get(b), direction, Ord::cmp),
            Comparator::Timestamp(get) => {
                compare_present(get(a), get(b), direction, Ord::cmp)
            }
            Comparator::By(cmp) => direction.apply(cmp(a, b)),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    UniCase::new(a).cmp(&UniCase::new(b))
}

fn compare_present<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => direction.apply(cmp(&x, &y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Declared mapping from sort key to comparator for one record type.
pub struct ComparatorTable<R> {
    entries: Vec<(&'static str, Comparator<R>)>,
}

impl<R> Default for ComparatorTable<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<R> Clone for ComparatorTable<R> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<R> std::fmt::Debug for ComparatorTable<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, c)| (k, c)))
            .finish()
    }
}

impl<R> ComparatorTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, comparator: Comparator<R>) -> Self {
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, comparator));
        self
    }

    pub fn text(self, key: &'static str, get: fn(&R) -> &str) -> Self {
        self.with(key, Comparator::Text(get))
    }

    pub fn optional_text(self, key: &'static str, get: fn(&R) -> Option<&str>) -> Self {
        self.with(key, Comparator::OptionalText(get))
    }

    pub fn number(self, key: &'static str, get: fn(&R) -> Option<f64>) -> Self {
        self.with(key, Comparator::Number(get))
    }

    pub fn date(self, key: &'static str, get: fn(&R) -> Option<Date>) -> Self {
        self.with(key, Comparator::Date(get))
    }

    pub fn timestamp(self, key: &'static str, get: fn(&R) -> Option<Timestamp>) -> Self {
        self.with(key, Comparator::Timestamp(get))
    }

    pub fn by(self, key: &'static str, cmp: fn(&R, &R) -> Ordering) -> Self {
        self.with(key, Comparator::By(cmp))
    }

    pub fn get(&self, key: &str) -> Option<&Comparator<R>> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, c)| c)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Stable sort of `rows` per `spec`. No key or an unknown key leaves the
    /// order untouched.
    pub fn sort(&self, rows: &mut [&R], spec: &SortSpec) {
        let Some(comparator) = spec.key.as_deref().and_then(|k| self.get(k)) else {
            return;
        };
        rows.sort_by(|a, b| comparator.compare(a, b, spec.direction));
    }
}
