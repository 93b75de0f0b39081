//! Kanban board command (`sitework board`)
//!
//! Prints the bid pipeline or RFI board as one column per status. With
//! `--move id=status` the card is dropped at the top of the target column
//! first; the status change is persisted and reverted if the backend
//! rejects it.

use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use super::{Context, colored_status, print_toast};
use crate::cli::BoardKind;
use crate::domain::{Bid, Record, Rfi};
use crate::error::{Result, SiteworkError};
use crate::view::board::{DragLocation, DropOutcome, KanbanBoard, column_title};
use crate::view::{LoadOutcome, Page};

pub async fn cmd_board(
    ctx: &Context,
    kind: BoardKind,
    project: Option<&str>,
    move_card: Option<(String, String)>,
) -> Result<()> {
    match kind {
        BoardKind::Bids => show_board::<Bid>(ctx, project, move_card).await,
        BoardKind::Rfis => show_board::<Rfi>(ctx, project, move_card).await,
    }
}

async fn show_board<R: Record>(
    ctx: &Context,
    project: Option<&str>,
    move_card: Option<(String, String)>,
) -> Result<()> {
    let page = Page::<R>::new(ctx.connection.service(), ctx.query(project));
    if let LoadOutcome::Failed(err) = page.mount().await {
        return Err(err);
    }
    let mut board = KanbanBoard::from_records(page.state().list.records);

    if let Some((id, status)) = move_card {
        let status: R::Status = status.parse()?;
        let source = board
            .locate(&id)
            .ok_or_else(|| SiteworkError::NotFound(R::LABEL, id.clone()))?;
        let destination = DragLocation::new(status, 0);
        let outcome = page.move_card(&mut board, source, Some(destination)).await;
        if outcome.is_err() {
            print_toast(&page);
        }
        match outcome? {
            DropOutcome::Moved { id, from, to } => println!(
                "Moved {}: {} -> {}\n",
                id.cyan(),
                colored_status(from.column),
                colored_status(to.column)
            ),
            DropOutcome::Reordered | DropOutcome::NoOp => {
                println!("{} is already in {}\n", id.cyan(), colored_status(status))
            }
        }
    }

    println!("{}", render_board(&board));
    Ok(())
}

pub(crate) fn render_board<R: Record>(board: &KanbanBoard<R>) -> String {
    let columns = board.columns();
    let depth = columns.iter().map(|c| c.cards.len()).max().unwrap_or(0);

    let mut builder = Builder::default();
    builder.push_record(
        columns
            .iter()
            .map(|c| format!("{} ({})", column_title(c.status), c.cards.len())),
    );
    for row in 0..depth {
        builder.push_record(columns.iter().map(|c| {
            c.cards
                .get(row)
                .map(|card| format!("{} {}", card.id(), card.title()))
                .unwrap_or_default()
        }));
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
