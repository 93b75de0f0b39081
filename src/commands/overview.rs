use std::collections::BTreeMap;

use owo_colors::OwoColorize;
use serde_json::json;

use super::{Context, print_json};
use crate::domain::Record;
use crate::error::Result;
use crate::view::overview::{OverviewServices, ProjectOverview, status_counts};

/// Status counts across bids, RFIs, submittals, invoices and approvals
pub async fn cmd_overview(ctx: &Context, project: Option<&str>, output_json: bool) -> Result<()> {
    let services = OverviewServices::from_connection(&ctx.connection);
    let overview = services.load(&ctx.query(project)).await?;
    let sections = sections(&overview);

    if output_json {
        let counts: BTreeMap<_, _> = sections
            .iter()
            .map(|(name, counts)| (*name, json!(counts)))
            .collect();
        return print_json(&counts);
    }

    if let Some(project) = ctx.project(project) {
        println!("{} {}\n", "Project".bold(), project.cyan());
    }
    for (name, counts) in sections {
        let total: usize = counts.values().sum();
        println!("{} ({total})", name.bold());
        for (status, count) in counts {
            println!("  {status:<14} {count}");
        }
    }
    Ok(())
}

fn section<R: Record>(records: &[R]) -> (&'static str, BTreeMap<String, usize>) {
    (R::RESOURCE, status_counts(records))
}

fn sections(overview: &ProjectOverview) -> Vec<(&'static str, BTreeMap<String, usize>)> {
    vec![
        section(&overview.bids),
        section(&overview.rfis),
        section(&overview.submittals),
        section(&overview.invoices),
        section(&overview.approvals),
    ]
}
