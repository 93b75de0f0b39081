use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{Context, print_json};
use crate::cli::ListArgs;
use crate::domain::Record;
use crate::error::{Result, SiteworkError};
use crate::view::list::{ListAction, ListViewModel};
use crate::view::{LoadOutcome, Page, PageAction};

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Project")]
    project: String,
}

impl RecordRow {
    fn from_record<R: Record>(record: &R) -> Self {
        Self {
            id: record.id().to_string(),
            title: record.title().to_string(),
            status: record.status().to_string(),
            project: record.project_id().unwrap_or("-").to_string(),
        }
    }
}

/// Build the list actions a set of `ls` flags stands for, checking names
/// against what the record type supports
fn list_actions<R: Record>(args: &ListArgs) -> Result<Vec<ListAction<R>>> {
    let mut actions = Vec::new();

    if let Some(query) = &args.query {
        actions.push(ListAction::SetQuery(query.clone()));
    }

    for (name, value) in &args.filters {
        if !R::filter_fields().contains(&name.as_str()) {
            return Err(SiteworkError::InvalidField(
                name.clone(),
                format!("filterable fields are: {}", R::filter_fields().join(", ")),
            ));
        }
        actions.push(ListAction::SetFilter {
            name: name.clone(),
            value: value.clone(),
        });
    }

    if let Some(status) = &args.status {
        let status: R::Status = status.parse()?;
        actions.push(ListAction::SetFilter {
            name: "status".to_string(),
            value: status.to_string(),
        });
    }

    if let Some(key) = &args.sort {
        let comparators = R::comparators();
        if comparators.get(key).is_none() {
            let keys: Vec<_> = comparators.keys().collect();
            return Err(SiteworkError::InvalidField(
                key.clone(),
                format!("sort keys are: {}", keys.join(", ")),
            ));
        }
        actions.push(ListAction::SetSort(key.clone()));
        if args.desc {
            // Reselecting the active key flips it to descending
            actions.push(ListAction::SetSort(key.clone()));
        }
    }

    Ok(actions)
}

fn render_table<R: Record>(view: &ListViewModel<R>) -> String {
    let rows: Vec<RecordRow> = view
        .rows
        .iter()
        .map(|row| RecordRow::from_record(&row.record))
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// List records of one collection with search, filters and sorting applied
pub async fn cmd_ls<R: Record>(ctx: &Context, args: ListArgs) -> Result<()> {
    let actions = list_actions::<R>(&args)?;

    let page = Page::<R>::new(ctx.connection.service(), ctx.query(args.project.as_deref()));
    if let LoadOutcome::Failed(err) = page.mount().await {
        return Err(err);
    }
    for action in actions {
        page.dispatch(PageAction::List(action));
    }
    let view = page.view();

    if args.json {
        let records: Vec<&R> = view.rows.iter().map(|row| &row.record).collect();
        return print_json(&records);
    }

    if view.rows.is_empty() {
        println!("No {} found.", R::RESOURCE);
    } else {
        println!("{}", render_table(&view));
    }
    println!("\n{} of {} {}", view.rows.len(), view.total_count, R::RESOURCE);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bid, BidStatus, Status};
    use crate::view::list::{ListState, compute_list_view, reduce_list_state};

    fn visible_ids(args: &ListArgs) -> Vec<String> {
        let state = list_actions::<Bid>(args)
            .unwrap()
            .into_iter()
            .fold(ListState::new(Bid::samples()), reduce_list_state);
        compute_list_view(&state)
            .rows
            .into_iter()
            .map(|row| row.record.id)
            .collect()
    }

    #[test]
    fn test_status_flag_filters() {
        let args = ListArgs {
            status: Some("Won".to_string()),
            ..Default::default()
        };
        assert_eq!(visible_ids(&args), vec!["bid-003"]);
    }

    #[test]
    fn test_desc_flips_sort() {
        let asc = visible_ids(&ListArgs {
            sort: Some("amount".to_string()),
            ..Default::default()
        });
        let desc = visible_ids(&ListArgs {
            sort: Some("amount".to_string()),
            desc: true,
            ..Default::default()
        });
        assert_eq!(asc.len(), desc.len());
        assert_ne!(asc, desc);
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let args = ListArgs {
            filters: vec![("colour".to_string(), "red".to_string())],
            ..Default::default()
        };
        let err = list_actions::<Bid>(&args).unwrap_err();
        assert!(matches!(err, SiteworkError::InvalidField(ref name, _) if name == "colour"));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let args = ListArgs {
            status: Some("pending".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            list_actions::<Bid>(&args).unwrap_err(),
            SiteworkError::InvalidStatus(_)
        ));
        assert_eq!(BidStatus::initial(), BidStatus::Draft);
    }

    #[test]
    fn test_table_lists_visible_rows() {
        let state = ListState::new(Bid::samples());
        let table = render_table(&compute_list_view(&state));
        assert!(table.contains("bid-001"));
        assert!(table.contains("Concrete foundations"));
        assert!(table.contains("Status"));
    }
}
