use std::collections::BTreeSet;

use owo_colors::OwoColorize;

use super::{Context, colored_status, print_toast};
use crate::domain::{Record, Status};
use crate::error::{Result, SiteworkError};
use crate::view::list::ListAction;
use crate::view::{Page, PageAction};

/// Run a named action on one record, or on several as a bulk action
pub async fn cmd_action<R: Record>(ctx: &Context, action: &str, ids: &[String]) -> Result<()> {
    if R::Status::for_action(action).is_none() {
        let err = SiteworkError::InvalidAction(action.to_string(), R::LABEL);
        return Err(SiteworkError::Validation(format!(
            "{err}. Available actions: {}",
            R::Status::actions().join(", ")
        )));
    }

    let page = Page::<R>::new(ctx.connection.service(), ctx.query(None));

    let unique: BTreeSet<&String> = ids.iter().collect();
    if let [id] = ids {
        let record = page.run_action(id, action).await?;
        println!(
            "{} -> {}",
            record.id().cyan(),
            colored_status(record.status())
        );
        return Ok(());
    }

    for id in unique {
        page.dispatch(PageAction::List(ListAction::ToggleSelect(id.clone())));
    }
    let outcome = page.bulk_action(action).await;
    for id in &outcome.succeeded {
        println!("{} {}", "ok".green(), id.cyan());
    }
    for (id, err) in &outcome.failed {
        println!("{} {}: {}", "failed".red(), id.cyan(), err);
    }
    print_toast(&page);

    if outcome.failed.is_empty() {
        Ok(())
    } else {
        Err(SiteworkError::Other(format!(
            "{} failed for {} of {} {}",
            action,
            outcome.failed.len(),
            outcome.failed.len() + outcome.succeeded.len(),
            R::RESOURCE
        )))
    }
}

pub async fn cmd_delete<R: Record>(ctx: &Context, id: &str) -> Result<()> {
    let page = Page::<R>::new(ctx.connection.service(), ctx.query(None));
    page.delete(id).await?;
    println!("Deleted {} {}", R::LABEL, id.cyan());
    Ok(())
}
