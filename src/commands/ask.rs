use owo_colors::OwoColorize;

use super::Context;
use crate::api::AssistantSession;
use crate::error::Result;

/// Ask the assistant a one-off question about a project
pub async fn cmd_ask(ctx: &Context, project: Option<&str>, prompt: &[String]) -> Result<()> {
    let assistant = ctx.connection.assistant();
    let mut session = AssistantSession::new(ctx.project(project));
    let reply = session.ask(assistant.as_ref(), &prompt.join(" ")).await?;
    println!("{}\n{}", "assistant:".magenta().bold(), reply.content);
    Ok(())
}
