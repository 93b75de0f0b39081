//! Kanban board model for status pipelines (bid pipeline, RFI board)
//!
//! Columns are the record's status vocabulary in pipeline order. Dropping a
//! card in another column rewrites its status and reports the change once;
//! [`KanbanBoard::drop_and_persist`] awaits the backend and puts the card back
//! exactly where it was if the change fails.

use std::future::Future;

use tracing::{debug, warn};

use crate::domain::{Record, Status};
use crate::error::Result;

/// A card position: column status and index within the column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragLocation<S> {
    pub column: S,
    pub index: usize,
}

impl<S> DragLocation<S> {
    pub fn new(column: S, index: usize) -> Self {
        Self { column, index }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome<S> {
    NoOp,
    /// Moved within its column; local only
    Reordered,
    /// Moved to another column; the status changed
    Moved {
        id: String,
        from: DragLocation<S>,
        to: DragLocation<S>,
    },
}

#[derive(Debug, Clone)]
pub struct BoardColumn<R: Record> {
    pub status: R::Status,
    pub cards: Vec<R>,
}

#[derive(Debug, Clone)]
pub struct KanbanBoard<R: Record> {
    columns: Vec<BoardColumn<R>>,
}

impl<R: Record> KanbanBoard<R> {
    /// Group records into one column per status, keeping source order
    pub fn from_records(records: Vec<R>) -> Self {
        let mut columns: Vec<BoardColumn<R>> = R::Status::ALL
            .iter()
            .map(|&status| BoardColumn {
                status,
                cards: Vec::new(),
            })
            .collect();
        for record in records {
            if let Some(column) = columns.iter_mut().find(|c| c.status == record.status()) {
                column.cards.push(record);
            }
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[BoardColumn<R>] {
        &self.columns
    }

    pub fn column(&self, status: R::Status) -> &[R] {
        self.columns
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.cards.as_slice())
            .unwrap_or(&[])
    }

    pub fn card_ids(&self, status: R::Status) -> Vec<&str> {
        self.column(status).iter().map(|r| r.id()).collect()
    }

    /// Current location of the card with `id`
    pub fn locate(&self, id: &str) -> Option<DragLocation<R::Status>> {
        self.columns.iter().find_map(|column| {
            column
                .cards
                .iter()
                .position(|r| r.id() == id)
                .map(|index| DragLocation::new(column.status, index))
        })
    }

    fn cards_mut(&mut self, status: R::Status) -> Option<&mut Vec<R>> {
        self.columns
            .iter_mut()
            .find(|c| c.status == status)
            .map(|c| &mut c.cards)
    }

    /// Apply a drop locally. Does not talk to the backend.
    pub fn drop_card(
        &mut self,
        source: DragLocation<R::Status>,
        destination: Option<DragLocation<R::Status>>,
    ) -> DropOutcome<R::Status> {
        let Some(destination) = destination else {
            return DropOutcome::NoOp;
        };
        if source == destination {
            return DropOutcome::NoOp;
        }

        let Some(mut card) = self
            .cards_mut(source.column)
            .filter(|cards| source.index < cards.len())
            .map(|cards| cards.remove(source.index))
        else {
            return DropOutcome::NoOp;
        };

        let moved = source.column != destination.column;
        if moved {
            card.set_status(destination.column);
        }
        let id = card.id().to_string();

        let Some(cards) = self.cards_mut(destination.column) else {
            return DropOutcome::NoOp;
        };
        let index = destination.index.min(cards.len());
        cards.insert(index, card);

        if moved {
            DropOutcome::Moved {
                id,
                from: source,
                to: DragLocation::new(destination.column, index),
            }
        } else {
            DropOutcome::Reordered
        }
    }

    /// Undo a [`DropOutcome::Moved`]: the card returns to its original
    /// column, index and status.
    pub fn revert(&mut self, id: &str, from: DragLocation<R::Status>) {
        let Some(current) = self.locate(id) else {
            return;
        };
        let Some(mut card) = self
            .cards_mut(current.column)
            .map(|cards| cards.remove(current.index))
        else {
            return;
        };
        card.set_status(from.column);
        if let Some(cards) = self.cards_mut(from.column) {
            let index = from.index.min(cards.len());
            cards.insert(index, card);
        }
    }

    /// Drop a card and, when it changed column, await
    /// `on_status_change(id, new_status)` exactly once. A failed change is
    /// reverted and returned as the error.
    pub async fn drop_and_persist<F, Fut>(
        &mut self,
        source: DragLocation<R::Status>,
        destination: Option<DragLocation<R::Status>>,
        on_status_change: F,
    ) -> Result<DropOutcome<R::Status>>
    where
        F: FnOnce(String, R::Status) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let (id, from, to) = match self.drop_card(source, destination) {
            DropOutcome::Moved { id, from, to } => (id, from, to),
            other => return Ok(other),
        };

        debug!(entity = R::LABEL, id = %id, from = %from.column, to = %to.column, "card moved");
        if let Err(err) = on_status_change(id.clone(), to.column).await {
            warn!(entity = R::LABEL, id = %id, error = %err, "status change failed, reverting move");
            self.revert(&id, from);
            return Err(err);
        }
        Ok(DropOutcome::Moved { id, from, to })
    }
}

/// Column heading: `under_review` -> `UNDER REVIEW`
pub fn column_title<S: Status>(status: S) -> String {
    status.to_string().replace('_', " ").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bid, BidStatus, Rfi, RfiStatus};
    use crate::error::SiteworkError;
    use std::cell::RefCell;

    fn board() -> KanbanBoard<Bid> {
        KanbanBoard::from_records(Bid::samples())
    }

    fn at(column: BidStatus, index: usize) -> DragLocation<BidStatus> {
        DragLocation::new(column, index)
    }

    #[test]
    fn test_columns_follow_pipeline_order() {
        let board = board();
        let statuses: Vec<_> = board.columns().iter().map(|c| c.status).collect();
        assert_eq!(statuses, BidStatus::ALL.to_vec());
        assert_eq!(board.card_ids(BidStatus::Submitted), vec!["bid-001"]);
    }

    #[test]
    fn test_missing_destination_and_same_slot_are_noops() {
        let mut board = board();
        assert_eq!(board.drop_card(at(BidStatus::Won, 0), None), DropOutcome::NoOp);
        assert_eq!(
            board.drop_card(at(BidStatus::Won, 0), Some(at(BidStatus::Won, 0))),
            DropOutcome::NoOp
        );
        assert_eq!(board.card_ids(BidStatus::Won), vec!["bid-003"]);
    }

    #[test]
    fn test_reorder_within_column() {
        let mut bids = Bid::samples();
        for bid in &mut bids {
            bid.status = BidStatus::Draft;
        }
        let mut board = KanbanBoard::from_records(bids);
        let outcome = board.drop_card(at(BidStatus::Draft, 0), Some(at(BidStatus::Draft, 2)));
        assert_eq!(outcome, DropOutcome::Reordered);
        assert_eq!(
            board.card_ids(BidStatus::Draft),
            vec!["bid-002", "bid-003", "bid-001", "bid-004", "bid-005"]
        );
    }

    #[tokio::test]
    async fn test_move_rewrites_status_and_calls_back_once() {
        let mut board = board();
        let calls = RefCell::new(Vec::new());

        let outcome = board
            .drop_and_persist(at(BidStatus::Submitted, 0), Some(at(BidStatus::Won, 0)), |id, status| {
                calls.borrow_mut().push((id, status));
                async { Ok(()) }
            })
            .await
            .unwrap();

        assert!(matches!(outcome, DropOutcome::Moved { .. }));
        assert_eq!(
            calls.into_inner(),
            vec![("bid-001".to_string(), BidStatus::Won)]
        );
        assert_eq!(board.card_ids(BidStatus::Won), vec!["bid-001", "bid-003"]);
        assert_eq!(board.column(BidStatus::Won)[0].status, BidStatus::Won);
        assert!(board.column(BidStatus::Submitted).is_empty());
    }

    #[tokio::test]
    async fn test_failed_status_change_reverts_exactly() {
        let mut board = board();
        let before: Vec<Vec<String>> = board
            .columns()
            .iter()
            .map(|c| c.cards.iter().map(|b| b.id.clone()).collect())
            .collect();

        let result = board
            .drop_and_persist(at(BidStatus::UnderReview, 0), Some(at(BidStatus::Lost, 1)), |_, _| async {
                Err(SiteworkError::request_failed("PUT", "/bids/bid-002", Some(500), "boom"))
            })
            .await;

        assert!(result.is_err());
        let after: Vec<Vec<String>> = board
            .columns()
            .iter()
            .map(|c| c.cards.iter().map(|b| b.id.clone()).collect())
            .collect();
        assert_eq!(before, after);
        assert_eq!(board.column(BidStatus::UnderReview)[0].status, BidStatus::UnderReview);
    }

    #[tokio::test]
    async fn test_reorder_does_not_call_back() {
        let mut board = KanbanBoard::from_records(Rfi::samples());
        let open = board.card_ids(RfiStatus::Open).len();
        let mut called = false;
        let outcome = board
            .drop_and_persist(
                DragLocation::new(RfiStatus::Open, 0),
                Some(DragLocation::new(RfiStatus::Open, open)),
                |_, _| {
                    called = true;
                    async { Ok(()) }
                },
            )
            .await
            .unwrap();
        assert!(matches!(outcome, DropOutcome::Reordered | DropOutcome::NoOp));
        assert!(!called);
    }

    #[test]
    fn test_out_of_range_source_is_noop() {
        let mut board = board();
        assert_eq!(
            board.drop_card(at(BidStatus::Lost, 4), Some(at(BidStatus::Won, 0))),
            DropOutcome::NoOp
        );
    }

    #[test]
    fn test_column_title() {
        assert_eq!(column_title(BidStatus::UnderReview), "UNDER REVIEW");
        assert_eq!(column_title(RfiStatus::Closed), "CLOSED");
    }
}
