//! Search and filter state for list views.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unicase::UniCase;

use super::sort::SortSpec;
use crate::domain::Record;

/// Query text, categorical filters and sort of one list view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    /// Field name to required value. Absent means unconstrained.
    pub filters: BTreeMap<String, String>,
    pub sort: SortSpec,
}

impl FilterState {
    /// Set or clear a filter. An empty value removes the constraint.
    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if value.is_empty() {
            self.filters.remove(&name);
        } else {
            self.filters.insert(name, value);
        }
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || !self.filters.is_empty()
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        matches_query(record, &self.query) && matches_filters(record, &self.filters)
    }
}

/// Case-insensitive substring match over the record's searched fields.
/// An empty query matches everything.
pub fn matches_query<R: Record>(record: &R, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Every filter must equal the record's rendering of that field.
pub fn matches_filters<R: Record>(record: &R, filters: &BTreeMap<String, String>) -> bool {
    filters.iter().all(|(field, expected)| {
        record
            .filter_value(field)
            .is_some_and(|actual| UniCase::new(actual.as_str()) == UniCase::new(expected.as_str()))
    })
}
