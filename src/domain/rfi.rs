//! Requests for information raised against the design documents.

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Attachment, Party, Record, date, party_name, timestamp};
use crate::error::SiteworkError;
use crate::view::sort::ComparatorTable;

status_vocabulary!(
    /// Column of the RFI board
    RfiStatus {
        Draft => "draft" [],
        Open => "open" ["open", "reopen"],
        Answered => "answered" ["answer"],
        Closed => "closed" ["close"],
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RfiPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

enum_display_fromstr!(
    RfiPriority,
    SiteworkError::InvalidValue,
    {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rfi {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Sequential RFI number shown to users, e.g. `RFI-014`
    #[serde(default)]
    pub number: String,
    pub subject: String,
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default)]
    pub priority: RfiPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    pub status: RfiStatus,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Record for Rfi {
    type Status = RfiStatus;

    const RESOURCE: &'static str = "rfis";
    const LABEL: &'static str = "RFI";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.subject
    }

    fn status(&self) -> RfiStatus {
        self.status
    }

    fn set_status(&mut self, status: RfiStatus) {
        self.status = status;
    }

    fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.number.as_str(),
            self.subject.as_str(),
            self.question.as_str(),
            party_name(&self.assignee),
        ]
    }

    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.to_string()),
            "priority" => Some(self.priority.to_string()),
            "assignee" => self.assignee.as_ref().map(|p| p.id.clone()),
            _ => None,
        }
    }

    fn filter_fields() -> &'static [&'static str] {
        &["status", "priority", "assignee"]
    }

    fn comparators() -> ComparatorTable<Self> {
        ComparatorTable::<Self>::new()
            .text("number", |r| r.number.as_str())
            .text("subject", |r| r.subject.as_str())
            .by("priority", |a, b| a.priority.cmp(&b.priority))
            .text("assignee", |r| party_name(&r.assignee))
            .date("due_date", |r| r.due_date)
            .by("status", |a, b| a.status.cmp(&b.status))
            .timestamp("created_at", |r| r.created_at)
    }

    fn samples() -> Vec<Self> {
        let rfi = |n: u32, subject: &str, priority, assignee: (&str, &str), due, status| Rfi {
            id: format!("rfi-{n:03}"),
            project_id: Some("prj-100".to_string()),
            number: format!("RFI-{n:03}"),
            subject: subject.to_string(),
            question: String::new(),
            answer: None,
            priority,
            assignee: Some(Party::new(assignee.0, assignee.1)),
            due_date: date(due),
            status,
            attachments: Vec::new(),
            created_at: timestamp("2024-09-05T09:30:00Z"),
        };

        vec![
            rfi(1, "Footing depth at grid C4", RfiPriority::High, ("u-21", "Maya Chen"), "2024-09-18", RfiStatus::Open),
            rfi(2, "Curtain wall anchor spacing", RfiPriority::Medium, ("u-22", "Luis Romero"), "2024-09-25", RfiStatus::Answered),
            rfi(3, "Conflicting door hardware schedule", RfiPriority::Low, ("u-21", "Maya Chen"), "2024-10-02", RfiStatus::Draft),
            rfi(4, "Fire damper access panels", RfiPriority::Critical, ("u-23", "Priya Natarajan"), "2024-09-12", RfiStatus::Closed),
        ]
    }
}
