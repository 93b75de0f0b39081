//! Bids received from subcontractors, tracked through the bid pipeline.

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Attachment, Party, Record, date, party_name, timestamp};
use crate::view::sort::ComparatorTable;

status_vocabulary!(
    /// Column of the bid pipeline board
    BidStatus {
        Draft => "draft" [],
        Submitted => "submitted" ["submit"],
        UnderReview => "under_review" ["review"],
        Won => "won" ["award"],
        Lost => "lost" ["decline"],
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidder: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    pub status: BidStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Record for Bid {
    type Status = BidStatus;

    const RESOURCE: &'static str = "bids";
    const LABEL: &'static str = "bid";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> BidStatus {
        self.status
    }

    fn set_status(&mut self, status: BidStatus) {
        self.status = status;
    }

    fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), party_name(&self.bidder)];
        fields.extend(self.trade.as_deref());
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.to_string()),
            "trade" => self.trade.clone(),
            "bidder" => self.bidder.as_ref().map(|p| p.id.clone()),
            _ => None,
        }
    }

    fn filter_fields() -> &'static [&'static str] {
        &["status", "trade", "bidder"]
    }

    fn comparators() -> ComparatorTable<Self> {
        ComparatorTable::<Self>::new()
            .text("title", |b| b.title.as_str())
            .text("bidder", |b| party_name(&b.bidder))
            .optional_text("trade", |b| b.trade.as_deref())
            .number("amount", |b| b.amount)
            .date("due_date", |b| b.due_date)
            .by("status", |a, b| a.status.cmp(&b.status))
            .timestamp("created_at", |b| b.created_at)
    }

    fn samples() -> Vec<Self> {
        let bid = |id: &str, title: &str, bidder: (&str, &str), trade: &str, amount, due, status| Bid {
            id: id.to_string(),
            project_id: Some("prj-100".to_string()),
            title: title.to_string(),
            bidder: Some(Party::new(bidder.0, bidder.1)),
            trade: Some(trade.to_string()),
            amount: Some(amount),
            due_date: date(due),
            status,
            tags: Vec::new(),
            attachments: Vec::new(),
            created_at: timestamp("2024-09-02T14:00:00Z"),
        };

        vec![
            bid("bid-001", "Concrete foundations", ("co-11", "Granite Works"), "concrete", 184_500.0, "2024-10-01", BidStatus::Submitted),
            bid("bid-002", "Structural steel package", ("co-12", "Ironline Fabrication"), "steel", 412_000.0, "2024-10-08", BidStatus::UnderReview),
            bid("bid-003", "Electrical rough-in", ("co-13", "Bright Current Electric"), "electrical", 96_250.0, "2024-09-27", BidStatus::Won),
            bid("bid-004", "Roofing membrane", ("co-14", "Summit Roofing"), "roofing", 58_900.0, "2024-10-15", BidStatus::Draft),
            bid("bid-005", "Site grading", ("co-15", "Level Earthworks"), "sitework", 71_300.0, "2024-09-20", BidStatus::Lost),
        ]
    }
}
