//! Approval requests (change orders, pay applications, and the like).

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Party, Record, date, party_name};
use crate::view::sort::ComparatorTable;

status_vocabulary!(
    ApprovalStatus {
        Pending => "pending" [],
        Approved => "approved" ["approve"],
        Rejected => "rejected" ["reject"],
        Cancelled => "cancelled" ["cancel"],
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub title: String,
    /// change_order, pay_application, purchase_order, ...
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    pub status: ApprovalStatus,
}

impl Record for Approval {
    type Status = ApprovalStatus;

    const RESOURCE: &'static str = "approvals";
    const LABEL: &'static str = "approval";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> ApprovalStatus {
        self.status
    }

    fn set_status(&mut self, status: ApprovalStatus) {
        self.status = status;
    }

    fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.kind.as_str(),
            party_name(&self.requested_by),
            party_name(&self.approver),
        ]
    }

    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.to_string()),
            "kind" => Some(self.kind.clone()),
            "approver" => self.approver.as_ref().map(|p| p.id.clone()),
            _ => None,
        }
    }

    fn filter_fields() -> &'static [&'static str] {
        &["status", "kind", "approver"]
    }

    fn comparators() -> ComparatorTable<Self> {
        ComparatorTable::<Self>::new()
            .text("title", |a| a.title.as_str())
            .text("kind", |a| a.kind.as_str())
            .number("amount", |a| a.amount)
            .date("due_date", |a| a.due_date)
            .by("status", |a, b| a.status.cmp(&b.status))
    }

    fn samples() -> Vec<Self> {
        vec![
            Approval {
                id: "apv-001".to_string(),
                project_id: Some("prj-100".to_string()),
                title: "CO-007 Added footing at grid C4".to_string(),
                kind: "change_order".to_string(),
                requested_by: Some(Party::new("u-21", "Maya Chen")),
                approver: Some(Party::new("u-40", "Jordan Blake")),
                amount: Some(14_250.0),
                due_date: date("2024-09-27"),
                status: ApprovalStatus::Pending,
            },
            Approval {
                id: "apv-002".to_string(),
                project_id: Some("prj-100".to_string()),
                title: "Pay application #4".to_string(),
                kind: "pay_application".to_string(),
                requested_by: Some(Party::new("u-22", "Luis Romero")),
                approver: Some(Party::new("u-40", "Jordan Blake")),
                amount: Some(212_880.0),
                due_date: date("2024-09-05"),
                status: ApprovalStatus::Approved,
            },
        ]
    }
}
