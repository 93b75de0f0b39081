//! List view reducer sequences over seeded records.
//!
//! The unit tests in `src/view/list.rs` cover single operations; these run
//! the reducer through the action sequences a list page sees.

use sitework::domain::{Bid, Record, Submittal, SubmittalStatus};
use sitework::view::{ListAction, ListState, compute_list_view, reduce_list_state};

fn run<R: Record>(records: Vec<R>, actions: Vec<ListAction<R>>) -> ListState<R> {
    actions
        .into_iter()
        .fold(ListState::new(records), reduce_list_state)
}

fn visible_ids<R: Record>(state: &ListState<R>) -> Vec<String> {
    compute_list_view(state)
        .rows
        .iter()
        .map(|row| row.record.id().to_string())
        .collect()
}

fn filter<R>(name: &str, value: &str) -> ListAction<R> {
    ListAction::SetFilter {
        name: name.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn test_status_filter_keeps_only_matching_records() {
    let mut records = Submittal::samples();
    records.truncate(2);
    records[0].id = "1".to_string();
    records[0].status = SubmittalStatus::Draft;
    records[1].id = "2".to_string();
    records[1].status = SubmittalStatus::Approved;

    let state = run(records, vec![filter("status", "approved")]);

    insta::assert_debug_snapshot!(visible_ids(&state), @r#"
    [
        "2",
    ]
    "#);
}

#[test]
fn test_sort_by_amount_then_reverse() {
    let ascending = run(Bid::samples(), vec![ListAction::SetSort("amount".to_string())]);
    insta::assert_debug_snapshot!(visible_ids(&ascending), @r#"
    [
        "bid-004",
        "bid-005",
        "bid-003",
        "bid-001",
        "bid-002",
    ]
    "#);

    let descending = reduce_list_state(ascending, ListAction::SetSort("amount".to_string()));
    insta::assert_debug_snapshot!(visible_ids(&descending), @r#"
    [
        "bid-002",
        "bid-001",
        "bid-003",
        "bid-005",
        "bid-004",
    ]
    "#);
}

#[test]
fn test_query_searches_bidder_and_trade() {
    let state = run(Bid::samples(), vec![ListAction::SetQuery("ROOF".to_string())]);
    insta::assert_debug_snapshot!(visible_ids(&state), @r#"
    [
        "bid-004",
    ]
    "#);

    let state = reduce_list_state(state, ListAction::SetQuery(String::new()));
    assert_eq!(visible_ids(&state).len(), 5);
}

#[test]
fn test_selection_outlives_filter_until_pruned() {
    let state = run(
        Bid::samples(),
        vec![
            ListAction::ToggleSelect("bid-001".to_string()),
            ListAction::ToggleSelect("bid-003".to_string()),
            filter("status", "won"),
        ],
    );

    let vm = compute_list_view(&state);
    insta::assert_debug_snapshot!((vm.rows.len(), vm.selected_count, vm.hidden_selected, vm.all_selected), @r"
    (
        1,
        2,
        1,
        true,
    )
    ");

    let state = reduce_list_state(state, ListAction::PruneSelection);
    let vm = compute_list_view(&state);
    assert_eq!(vm.selected_count, 1);
    assert_eq!(vm.hidden_selected, 0);
    assert!(state.is_selected("bid-003"));
}

#[test]
fn test_select_all_on_filtered_view_then_bulk() {
    let mut state = run(
        Bid::samples(),
        vec![filter("trade", "concrete"), ListAction::SelectAll],
    );

    let mut applied = Vec::new();
    let ids = state.apply_bulk_action("award", |action, id| {
        applied.push(format!("{action}:{id}"));
    });

    assert_eq!(ids, vec!["bid-001"]);
    assert_eq!(applied, vec!["award:bid-001"]);
    assert_eq!(compute_list_view(&state).selected_count, 0);
}

#[test]
fn test_clear_filters_restores_full_list() {
    let state = run(
        Bid::samples(),
        vec![
            filter("status", "lost"),
            filter("trade", "sitework"),
            ListAction::ClearFilters,
        ],
    );
    let vm = compute_list_view(&state);
    assert_eq!(vm.rows.len(), 5);
    assert!(!vm.has_active_filters);
}
