//! Attachments, downloads and comments. These go straight to the REST API.

use std::fs;
use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use serde_json::json;

use super::{Context, print_json};
use crate::domain::{Attachment, Comment, Record};
use crate::error::{Result, SiteworkError};

pub async fn cmd_attachments<R: Record>(ctx: &Context, id: &str, output_json: bool) -> Result<()> {
    let client = ctx.connection.client()?;
    let attachments: Vec<Attachment> = client.list_sub::<R, _>(id, "attachments").await?;

    if output_json {
        return print_json(&attachments);
    }
    if attachments.is_empty() {
        println!("No attachments on {} {}", R::LABEL, id.cyan());
    }
    for attachment in &attachments {
        let size = attachment
            .size
            .map(|s| format!(" ({s} bytes)"))
            .unwrap_or_default();
        println!("{} {}{}", attachment.id.cyan(), attachment.file_name, size.dimmed());
    }
    Ok(())
}

/// Upload `file` under its own file name
pub async fn cmd_attach<R: Record>(ctx: &Context, id: &str, file: &Path) -> Result<()> {
    let client = ctx.connection.client()?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| SiteworkError::Validation(format!("'{}' is not a file", file.display())))?;
    let bytes = fs::read(file)?;

    let attachment = client.upload::<R>(id, &file_name, bytes).await?;
    println!(
        "Attached {} to {} {} as {}",
        attachment.file_name,
        R::LABEL,
        id.cyan(),
        attachment.id.cyan()
    );
    Ok(())
}

pub async fn cmd_download<R: Record>(ctx: &Context, id: &str, output: Option<&Path>) -> Result<()> {
    let client = ctx.connection.client()?;
    let bytes = client.download::<R>(id).await?;

    match output {
        Some(path) => {
            fs::write(path, &bytes)?;
            eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

pub async fn cmd_comments<R: Record>(ctx: &Context, id: &str, output_json: bool) -> Result<()> {
    let client = ctx.connection.client()?;
    let comments: Vec<Comment> = client.list_sub::<R, _>(id, "comments").await?;

    if output_json {
        return print_json(&comments);
    }
    for comment in &comments {
        let when = comment
            .created_at
            .map(|t| t.to_string())
            .unwrap_or_default();
        println!("{} {}", comment.author.name.bold(), when.dimmed());
        println!("  {}", comment.body);
    }
    Ok(())
}

pub async fn cmd_comment<R: Record>(ctx: &Context, id: &str, text: &str) -> Result<()> {
    let body = text.trim();
    if body.is_empty() {
        return Err(SiteworkError::Validation("comment cannot be empty".to_string()));
    }
    let client = ctx.connection.client()?;
    let comment: Comment = client
        .create_sub::<R, _>(id, "comments", &json!({ "body": body }))
        .await?;
    println!("Added comment {} to {} {}", comment.id.cyan(), R::LABEL, id.cyan());
    Ok(())
}
