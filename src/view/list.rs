//! List view model: search, filter, sort, selection and bulk actions
//!
//! `ListState` holds the raw inputs, `reduce_list_state` applies user actions,
//! and `compute_list_view` derives what a list screen renders. The visible
//! rows are a pure function of (records, query, filters, sort).

use std::collections::BTreeSet;

use tracing::debug;

use super::filter::FilterState;
use super::sort::ComparatorTable;
use crate::domain::Record;

/// Raw list state that changes during user interaction
#[derive(Debug, Clone)]
pub struct ListState<R: Record> {
    /// Source records, in backend order
    pub records: Vec<R>,
    pub filter: FilterState,
    /// Selected record ids. May include ids hidden by the current filter.
    pub selected_ids: BTreeSet<String>,
    comparators: ComparatorTable<R>,
}

impl<R: Record> Default for ListState<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// All user actions on a list
#[derive(Debug, Clone)]
pub enum ListAction<R> {
    SetQuery(String),
    /// An empty value clears the filter
    SetFilter { name: String, value: String },
    ClearFilters,
    /// Select a sort key; reselecting toggles direction
    SetSort(String),
    ToggleSelect(String),
    /// Select every visible row, or clear when they already are
    SelectAll,
    ClearSelection,
    /// Drop selected ids that are not currently visible
    PruneSelection,
    /// Replace the source records after a load
    ReplaceRecords(Vec<R>),
}

impl<R: Record> ListState<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self::with_comparators(records, R::comparators())
    }

    pub fn with_comparators(records: Vec<R>, comparators: ComparatorTable<R>) -> Self {
        Self {
            records,
            filter: FilterState::default(),
            selected_ids: BTreeSet::new(),
            comparators,
        }
    }

    pub fn comparators(&self) -> &ComparatorTable<R> {
        &self.comparators
    }

    /// Records passing the query and filters, in sort order
    pub fn visible(&self) -> Vec<&R> {
        let mut rows: Vec<&R> = self
            .records
            .iter()
            .filter(|r| self.filter.matches(*r))
            .collect();
        self.comparators.sort(&mut rows, &self.filter.sort);
        rows
    }

    pub fn visible_ids(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter(|r| self.filter.matches(*r))
            .map(|r| r.id().to_string())
            .collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.contains(id)
    }

    pub fn toggle_select(&mut self, id: &str) {
        if !self.selected_ids.remove(id) {
            self.selected_ids.insert(id.to_string());
        }
    }

    pub fn select_all(&mut self) {
        let visible = self.visible_ids();
        if self.selected_ids == visible {
            self.selected_ids.clear();
        } else {
            self.selected_ids = visible;
        }
    }

    pub fn prune_selection(&mut self) {
        let visible = self.visible_ids();
        self.selected_ids.retain(|id| visible.contains(id));
    }

    /// Replace the source records, forgetting selected ids that no longer exist
    pub fn replace_records(&mut self, records: Vec<R>) {
        self.records = records;
        let records = &self.records;
        self.selected_ids
            .retain(|id| records.iter().any(|r| r.id() == id));
    }

    /// Remove and return the selected ids, in id order
    pub fn take_selection(&mut self) -> Vec<String> {
        std::mem::take(&mut self.selected_ids).into_iter().collect()
    }

    /// Invoke `apply(action, id)` for each selected id, then clear the
    /// selection. Returns the ids the action was applied to.
    pub fn apply_bulk_action(
        &mut self,
        action: &str,
        mut apply: impl FnMut(&str, &str),
    ) -> Vec<String> {
        let ids = self.take_selection();
        debug!(action, count = ids.len(), "applying bulk action");
        for id in &ids {
            apply(action, id);
        }
        ids
    }
}

/// Pure function: apply action to state (reducer pattern)
pub fn reduce_list_state<R: Record>(mut state: ListState<R>, action: ListAction<R>) -> ListState<R> {
    match action {
        ListAction::SetQuery(query) => state.filter.query = query,
        ListAction::SetFilter { name, value } => state.filter.set_filter(name, value),
        ListAction::ClearFilters => state.filter.filters.clear(),
        ListAction::SetSort(key) => state.filter.sort.select(&key),
        ListAction::ToggleSelect(id) => state.toggle_select(&id),
        ListAction::SelectAll => state.select_all(),
        ListAction::ClearSelection => state.selected_ids.clear(),
        ListAction::PruneSelection => state.prune_selection(),
        ListAction::ReplaceRecords(records) => state.replace_records(records),
    }
    state
}

/// Computed view model for rendering a list
#[derive(Debug, Clone)]
pub struct ListViewModel<R> {
    pub rows: Vec<ListRow<R>>,
    /// Number of source records before filtering
    pub total_count: usize,
    pub selected_count: usize,
    /// Selected ids that the current filter hides
    pub hidden_selected: usize,
    /// Every visible row is selected (and there is at least one)
    pub all_selected: bool,
    pub has_active_filters: bool,
}

#[derive(Debug, Clone)]
pub struct ListRow<R> {
    pub record: R,
    pub is_selected: bool,
}

pub fn compute_list_view<R: Record>(state: &ListState<R>) -> ListViewModel<R> {
    let rows: Vec<ListRow<R>> = state
        .visible()
        .into_iter()
        .map(|r| ListRow {
            is_selected: state.is_selected(r.id()),
            record: r.clone(),
        })
        .collect();

    let visible_ids = state.visible_ids();
    let hidden_selected = state
        .selected_ids
        .iter()
        .filter(|id| !visible_ids.contains(*id))
        .count();

    ListViewModel {
        total_count: state.records.len(),
        selected_count: state.selected_ids.len(),
        hidden_selected,
        all_selected: !rows.is_empty() && rows.iter().all(|row| row.is_selected),
        has_active_filters: state.filter.is_active(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bid, BidStatus};
    use crate::view::sort::SortDirection;

    fn state() -> ListState<Bid> {
        ListState::new(Bid::samples())
    }

    fn ids(state: &ListState<Bid>) -> Vec<String> {
        state.visible().iter().map(|b| b.id.clone()).collect()
    }

    fn set_filter(name: &str, value: &str) -> ListAction<Bid> {
        ListAction::SetFilter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_visible_is_subset_and_source_untouched() {
        let state = reduce_list_state(state(), ListAction::SetQuery("WORKS".to_string()));
        let visible = ids(&state);
        assert_eq!(visible, vec!["bid-001", "bid-005"]);
        assert_eq!(state.records.len(), 5);
        assert_eq!(state.records[0].id, "bid-001");
    }

    #[test]
    fn test_sort_twice_toggles_direction_and_keeps_length() {
        let state = reduce_list_state(state(), ListAction::SetSort("amount".to_string()));
        assert_eq!(state.filter.sort.direction, SortDirection::Ascending);
        let asc = ids(&state);
        let state = reduce_list_state(state, ListAction::SetSort("amount".to_string()));
        assert_eq!(state.filter.sort.direction, SortDirection::Descending);
        let desc = ids(&state);
        assert_eq!(asc.len(), 5);
        assert_eq!(desc.len(), 5);
        assert_eq!(asc.first(), desc.last());
        assert_eq!(asc[0], "bid-004");
    }

    #[test]
    fn test_unknown_sort_key_keeps_order() {
        let state = reduce_list_state(state(), ListAction::SetSort("color".to_string()));
        assert_eq!(
            ids(&state),
            vec!["bid-001", "bid-002", "bid-003", "bid-004", "bid-005"]
        );
    }

    #[test]
    fn test_select_all_selects_visible_then_toggles_off() {
        let state = reduce_list_state(state(), set_filter("status", "won"));
        let state = reduce_list_state(state, ListAction::SelectAll);
        assert_eq!(
            state.selected_ids.iter().collect::<Vec<_>>(),
            vec!["bid-003"]
        );
        let state = reduce_list_state(state, ListAction::SelectAll);
        assert!(state.selected_ids.is_empty());
    }

    #[test]
    fn test_select_all_replaces_partial_selection() {
        let state = reduce_list_state(state(), ListAction::ToggleSelect("bid-001".to_string()));
        let state = reduce_list_state(state, ListAction::SelectAll);
        assert_eq!(state.selected_ids.len(), 5);
    }

    #[test]
    fn test_selection_survives_filtering_until_pruned() {
        let state = reduce_list_state(state(), ListAction::ToggleSelect("bid-001".to_string()));
        let state = reduce_list_state(state, set_filter("status", "won"));
        let view = compute_list_view(&state);
        assert_eq!(view.selected_count, 1);
        assert_eq!(view.hidden_selected, 1);
        assert!(!view.all_selected);

        let state = reduce_list_state(state, ListAction::PruneSelection);
        assert!(state.selected_ids.is_empty());
    }

    #[test]
    fn test_replace_records_forgets_missing_ids() {
        let state = reduce_list_state(state(), ListAction::ToggleSelect("bid-001".to_string()));
        let state = reduce_list_state(state, ListAction::ToggleSelect("bid-002".to_string()));
        let remaining: Vec<Bid> = Bid::samples().into_iter().skip(1).collect();
        let state = reduce_list_state(state, ListAction::ReplaceRecords(remaining));
        assert_eq!(
            state.selected_ids.iter().collect::<Vec<_>>(),
            vec!["bid-002"]
        );
    }

    #[test]
    fn test_bulk_action_calls_each_selected_id_then_clears() {
        let mut state = state();
        state.toggle_select("bid-004");
        state.toggle_select("bid-002");

        let mut calls = Vec::new();
        let applied = state.apply_bulk_action("submit", |action, id| {
            calls.push(format!("{action}:{id}"));
        });

        assert_eq!(calls, vec!["submit:bid-002", "submit:bid-004"]);
        assert_eq!(applied.len(), 2);
        assert!(state.selected_ids.is_empty());
    }

    #[test]
    fn test_take_selection_empties_selection() {
        let mut state = state();
        state.toggle_select("bid-005");
        state.toggle_select("bid-001");
        assert_eq!(state.take_selection(), vec!["bid-001", "bid-005"]);
        assert!(state.selected_ids.is_empty());
        assert!(state.take_selection().is_empty());
    }

    #[test]
    fn test_view_model_with_duplicate_ids() {
        let mut records = Bid::samples();
        records[1].id = records[0].id.clone();
        let state = reduce_list_state(
            ListState::new(records),
            ListAction::ToggleSelect("bid-001".to_string()),
        );

        let view = compute_list_view(&state);
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.rows.iter().filter(|row| row.is_selected).count(), 2);
        assert_eq!(view.selected_count, 1);
        assert_eq!(view.hidden_selected, 0);
        assert!(!view.all_selected);

        let state = reduce_list_state(state, set_filter("status", "won"));
        assert_eq!(compute_list_view(&state).hidden_selected, 1);
    }

    #[test]
    fn test_toggle_select_twice_deselects() {
        let mut state = state();
        state.toggle_select("bid-003");
        state.toggle_select("bid-003");
        assert!(state.selected_ids.is_empty());
    }

    #[test]
    fn test_view_model_counts() {
        let mut state = state();
        state.records[0].status = BidStatus::Won;
        let state = reduce_list_state(state, set_filter("status", "won"));
        let state = reduce_list_state(state, ListAction::SelectAll);
        let view = compute_list_view(&state);
        assert_eq!(view.total_count, 5);
        assert_eq!(view.rows.len(), 2);
        assert!(view.all_selected);
        assert!(view.has_active_filters);
        assert_eq!(view.hidden_selected, 0);
    }
}
