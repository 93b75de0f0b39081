//! Quotes requested from suppliers.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{LineItem, Party, Record, date, party_name};
use crate::view::sort::ComparatorTable;

status_vocabulary!(
    QuoteStatus {
        Draft => "draft" [],
        Sent => "sent" ["send"],
        Accepted => "accepted" ["accept"],
        Rejected => "rejected" ["reject"],
        Expired => "expired" ["expire"],
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Party>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<Date>,
    pub status: QuoteStatus,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Record for Quote {
    type Status = QuoteStatus;

    const RESOURCE: &'static str = "quotes";
    const LABEL: &'static str = "quote";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> QuoteStatus {
        self.status
    }

    fn set_status(&mut self, status: QuoteStatus) {
        self.status = status;
    }

    fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), party_name(&self.vendor)]
    }

    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.to_string()),
            "vendor" => self.vendor.as_ref().map(|p| p.id.clone()),
            _ => None,
        }
    }

    fn filter_fields() -> &'static [&'static str] {
        &["status", "vendor"]
    }

    fn comparators() -> ComparatorTable<Self> {
        ComparatorTable::<Self>::new()
            .text("title", |q| q.title.as_str())
            .text("vendor", |q| party_name(&q.vendor))
            .number("amount", |q| Some(q.amount))
            .date("valid_until", |q| q.valid_until)
            .by("status", |a, b| a.status.cmp(&b.status))
    }

    fn samples() -> Vec<Self> {
        vec![
            Quote {
                id: "qt-001".to_string(),
                project_id: Some("prj-100".to_string()),
                title: "Ready-mix concrete, 4000 psi".to_string(),
                vendor: Some(Party::new("co-20", "Valley Ready Mix")),
                amount: 31_200.0,
                valid_until: date("2024-10-31"),
                status: QuoteStatus::Sent,
                line_items: vec![LineItem {
                    description: "4000 psi mix, per cubic yard".to_string(),
                    quantity: 240.0,
                    unit_price: 130.0,
                }],
            },
            Quote {
                id: "qt-002".to_string(),
                project_id: Some("prj-100".to_string()),
                title: "Scaffolding rental".to_string(),
                vendor: Some(Party::new("co-21", "Apex Access")),
                amount: 6_750.0,
                valid_until: date("2024-09-15"),
                status: QuoteStatus::Expired,
                line_items: Vec::new(),
            },
        ]
    }
}
