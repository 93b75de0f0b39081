use owo_colors::OwoColorize;

use super::{Context, draft_from_fields, print_json};
use crate::domain::Record;
use crate::error::{Result, SiteworkError};
use crate::view::form::{FormDraft, SubmitOutcome, Wizard};
use crate::view::{Page, PageAction};

/// Create a record from `--field` values. Bids and RFIs go through their
/// creation wizard's required-field checks first.
pub async fn cmd_create<R: Record>(
    ctx: &Context,
    fields: Vec<(String, String)>,
    project: Option<&str>,
    output_json: bool,
) -> Result<()> {
    let page = Page::<R>::new(ctx.connection.service(), ctx.query(project));
    page.open_create(ctx.project(project).as_deref());
    for (name, value) in draft_from_fields(fields) {
        page.set_field(name, value);
    }

    if let Some(wizard) = Wizard::for_resource(R::RESOURCE) {
        let draft = page.state().form.map(|form| form.draft).unwrap_or_default();
        if let Some(message) = wizard.validate_all(&draft).error {
            return Err(SiteworkError::Validation(message));
        }
    }

    report(page.submit().await, output_json)
}

/// Change fields of an existing record
pub async fn cmd_update<R: Record>(
    ctx: &Context,
    id: &str,
    fields: Vec<(String, String)>,
    output_json: bool,
) -> Result<()> {
    let service = ctx.connection.service::<R>();
    let record = service.get(id).await?;
    let page = Page::new(service, ctx.query(None));
    page.dispatch(PageAction::OpenForm(FormDraft::edit(&record)?));
    for (name, value) in draft_from_fields(fields) {
        page.set_field(name, value);
    }

    report(page.submit().await, output_json)
}

fn report<R: Record>(outcome: SubmitOutcome<R>, output_json: bool) -> Result<()> {
    let (record, verb) = match outcome {
        SubmitOutcome::Created(record) => (record, "Created"),
        SubmitOutcome::Updated(record) => (record, "Updated"),
        SubmitOutcome::Failed(err) => return Err(err),
        SubmitOutcome::Busy => {
            return Err(SiteworkError::Other("a save is already in progress".to_string()));
        }
    };

    if output_json {
        return print_json(&record);
    }
    println!(
        "{} {} {} ({})",
        verb.green(),
        R::LABEL,
        record.id().cyan(),
        record.title()
    );
    Ok(())
}
