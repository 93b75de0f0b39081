use owo_colors::OwoColorize;
use serde_json::Value;

use super::{Context, colored_status, print_json};
use crate::domain::Record;
use crate::error::Result;

/// Display a single record
pub async fn cmd_show<R: Record>(ctx: &Context, id: &str, output_json: bool) -> Result<()> {
    let record = ctx.connection.service::<R>().get(id).await?;

    if output_json {
        return print_json(&record);
    }

    println!("{}", format_record(&record)?);
    Ok(())
}

/// Header line followed by one `key: value` line per remaining field
pub(crate) fn format_record<R: Record>(record: &R) -> Result<String> {
    let mut lines = vec![format!(
        "{} {} [{}]",
        record.id().cyan(),
        record.title().bold(),
        colored_status(record.status())
    )];

    if let Value::Object(fields) = serde_json::to_value(record)? {
        for (key, value) in fields {
            if matches!(key.as_str(), "id" | "status") || value.is_null() {
                continue;
            }
            if value.as_str() == Some(record.title()) {
                continue;
            }
            lines.push(format!("{}: {}", key.dimmed(), display_value(&value)));
        }
    }
    Ok(lines.join("\n"))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) if map.contains_key("name") => map
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::Array(items) if items.is_empty() => "-".to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
