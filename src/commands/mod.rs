mod action;
mod ask;
mod board;
mod config;
mod create;
mod files;
mod ls;
mod overview;
mod show;

pub use action::{cmd_action, cmd_delete};
pub use ask::cmd_ask;
pub use board::cmd_board;
pub use config::{cmd_config_path, cmd_config_set, cmd_config_show};
pub use create::{cmd_create, cmd_update};
pub use files::{cmd_attach, cmd_attachments, cmd_comment, cmd_comments, cmd_download};
pub use ls::cmd_ls;
pub use overview::cmd_overview;
pub use show::cmd_show;

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

use crate::api::{Connection, ListQuery};
use crate::cli::EntityAction;
use crate::config::{Backend, Config};
use crate::domain::{Draft, Record, Status};
use crate::error::Result;
use crate::view::Page;

/// Loaded configuration plus the backend it selects
pub struct Context {
    pub config: Config,
    pub connection: Connection,
}

impl Context {
    pub fn new(mut config: Config, mock: bool) -> Result<Self> {
        if mock {
            config.backend = Backend::Mock;
        }
        let connection = Connection::from_config(&config)?;
        Ok(Self { config, connection })
    }

    /// Project named on the command line, else the configured default
    pub fn project(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .or(self.config.default_project.as_deref())
            .map(str::to_string)
    }

    pub fn query(&self, explicit_project: Option<&str>) -> ListQuery {
        ListQuery {
            project_id: self.project(explicit_project),
            ..Default::default()
        }
    }
}

/// Run one entity subcommand against records of type `R`
pub async fn cmd_entity<R: Record>(ctx: &Context, action: EntityAction) -> Result<()> {
    match action {
        EntityAction::Ls(args) => cmd_ls::<R>(ctx, args).await,
        EntityAction::Show { id, json } => cmd_show::<R>(ctx, &id, json).await,
        EntityAction::Create {
            fields,
            project,
            json,
        } => cmd_create::<R>(ctx, fields, project.as_deref(), json).await,
        EntityAction::Update { id, fields, json } => cmd_update::<R>(ctx, &id, fields, json).await,
        EntityAction::Delete { id } => cmd_delete::<R>(ctx, &id).await,
        EntityAction::Attachments { id, json } => cmd_attachments::<R>(ctx, &id, json).await,
        EntityAction::Attach { id, file } => cmd_attach::<R>(ctx, &id, &file).await,
        EntityAction::Download { id, output } => {
            cmd_download::<R>(ctx, &id, output.as_deref()).await
        }
        EntityAction::Comments { id, json } => cmd_comments::<R>(ctx, &id, json).await,
        EntityAction::Comment { id, text } => cmd_comment::<R>(ctx, &id, &text.join(" ")).await,
        EntityAction::Action { action, ids } => cmd_action::<R>(ctx, &action, &ids).await,
    }
}

pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the page's current toast, if any, to stderr
pub(crate) fn print_toast<R: Record>(page: &Page<R>) {
    if let Some(toast) = page.toast() {
        eprintln!("{}", toast.render());
    }
}

/// Status colored by where it sits in its pipeline
pub fn colored_status<S: Status>(status: S) -> String {
    let label = status.to_string();
    match label.as_str() {
        "won" | "approved" | "paid" | "completed" | "accepted" | "answered" | "closed"
        | "active" => label.green().to_string(),
        "lost" | "rejected" | "overdue" | "failed" | "void" | "cancelled" | "expired" => {
            label.red().to_string()
        }
        "draft" | "archived" => label.dimmed().to_string(),
        _ => label.yellow().to_string(),
    }
}

/// Value of a `--field key=value` argument: JSON when it parses as a number,
/// boolean, array or object, otherwise the raw string
pub fn field_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Number(_) | Value::Bool(_) | Value::Array(_) | Value::Object(_))) => {
            value
        }
        _ => Value::String(raw.to_string()),
    }
}

pub fn draft_from_fields(fields: Vec<(String, String)>) -> Draft {
    fields
        .into_iter()
        .map(|(key, value)| (key, field_value(&value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value() {
        assert_eq!(field_value("42000"), json!(42000));
        assert_eq!(field_value("true"), json!(true));
        assert_eq!(field_value("Concrete"), json!("Concrete"));
        assert_eq!(field_value("2026-03-01"), json!("2026-03-01"));
        assert_eq!(field_value("\"quoted\""), json!("\"quoted\""));
    }

    #[test]
    fn test_project_falls_back_to_default() {
        let config = Config {
            default_project: Some("prj-100".to_string()),
            ..Default::default()
        };
        let ctx = Context::new(config, true).unwrap();
        assert_eq!(ctx.project(None).as_deref(), Some("prj-100"));
        assert_eq!(ctx.project(Some("prj-7")).as_deref(), Some("prj-7"));
        assert_eq!(ctx.query(None), ListQuery::for_project("prj-100"));
    }
}
