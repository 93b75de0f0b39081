//! Project email threads.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Attachment, Party, Record, timestamp};
use crate::view::sort::ComparatorTable;

status_vocabulary!(
    EmailStatus {
        Draft => "draft" [],
        Sent => "sent" ["send"],
        Archived => "archived" ["archive"],
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub subject: String,
    pub from: Party,
    #[serde(default)]
    pub to: Vec<Party>,
    #[serde(default)]
    pub body: String,
    /// inbox, sent, drafts
    #[serde(default)]
    pub folder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<Timestamp>,
    pub status: EmailStatus,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Record for EmailMessage {
    type Status = EmailStatus;

    const RESOURCE: &'static str = "emails";
    const LABEL: &'static str = "email";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.subject
    }

    fn status(&self) -> EmailStatus {
        self.status
    }

    fn set_status(&mut self, status: EmailStatus) {
        self.status = status;
    }

    fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.subject.as_str(),
            self.from.name.as_str(),
            self.body.as_str(),
        ];
        fields.extend(self.to.iter().map(|p| p.name.as_str()));
        fields
    }

    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.to_string()),
            "folder" => Some(self.folder.clone()),
            _ => None,
        }
    }

    fn filter_fields() -> &'static [&'static str] {
        &["status", "folder"]
    }

    fn comparators() -> ComparatorTable<Self> {
        ComparatorTable::<Self>::new()
            .text("subject", |e| e.subject.as_str())
            .text("from", |e| e.from.name.as_str())
            .timestamp("sent_at", |e| e.sent_at)
    }

    fn samples() -> Vec<Self> {
        vec![
            EmailMessage {
                id: "eml-001".to_string(),
                project_id: Some("prj-100".to_string()),
                subject: "RFI-001 response needed by Friday".to_string(),
                from: Party::new("u-40", "Jordan Blake"),
                to: vec![Party::new("u-21", "Maya Chen")],
                body: "Structural needs the footing depth confirmed before the pour.".to_string(),
                folder: "inbox".to_string(),
                sent_at: timestamp("2024-09-16T13:02:00Z"),
                status: EmailStatus::Sent,
                attachments: Vec::new(),
            },
            EmailMessage {
                id: "eml-002".to_string(),
                project_id: Some("prj-100".to_string()),
                subject: "Draft: weekly owner update".to_string(),
                from: Party::new("u-21", "Maya Chen"),
                to: vec![Party::new("u-50", "Harborview Holdings")],
                body: String::new(),
                folder: "drafts".to_string(),
                sent_at: None,
                status: EmailStatus::Draft,
                attachments: Vec::new(),
            },
        ]
    }
}
