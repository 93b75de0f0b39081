//! Project documents stored in folders, with version history.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Party, Record, party_name, timestamp};
use crate::view::sort::ComparatorTable;

status_vocabulary!(
    /// Documents are soft-archived rather than deleted
    DocumentStatus {
        Active => "active" ["activate"],
        Archived => "archived" ["archive"],
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    pub status: DocumentStatus,
}

fn first_version() -> u32 {
    1
}

/// Entry of a document's version history (`/documents/{id}/versions`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Record for Document {
    type Status = DocumentStatus;

    const RESOURCE: &'static str = "documents";
    const LABEL: &'static str = "document";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn status(&self) -> DocumentStatus {
        self.status
    }

    fn set_status(&mut self, status: DocumentStatus) {
        self.status = status;
    }

    fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), party_name(&self.uploaded_by)];
        fields.extend(self.file_type.as_deref());
        fields
    }

    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.to_string()),
            "folder" => self.folder_id.clone(),
            "file_type" => self.file_type.clone(),
            _ => None,
        }
    }

    fn filter_fields() -> &'static [&'static str] {
        &["status", "folder", "file_type"]
    }

    fn comparators() -> ComparatorTable<Self> {
        ComparatorTable::<Self>::new()
            .text("name", |d| d.name.as_str())
            .optional_text("file_type", |d| d.file_type.as_deref())
            .number("size", |d| d.size.map(|s| s as f64))
            .number("version", |d| Some(f64::from(d.version)))
            .timestamp("updated_at", |d| d.updated_at)
    }

    fn samples() -> Vec<Self> {
        let doc = |id: &str, folder: &str, name: &str, file_type: &str, size: u64, updated: &str| {
            Document {
                id: id.to_string(),
                project_id: Some("prj-100".to_string()),
                folder_id: Some(folder.to_string()),
                name: name.to_string(),
                file_type: Some(file_type.to_string()),
                version: 1,
                size: Some(size),
                uploaded_by: Some(Party::new("u-21", "Maya Chen")),
                updated_at: timestamp(updated),
                status: DocumentStatus::Active,
            }
        };

        vec![
            doc("doc-001", "fld-drawings", "A-201 Floor Plan Level 2.pdf", "pdf", 4_812_330, "2024-09-03T16:20:00Z"),
            doc("doc-002", "fld-drawings", "S-101 Foundation Plan.pdf", "pdf", 3_120_004, "2024-08-28T11:05:00Z"),
            doc("doc-003", "fld-contracts", "Subcontract - Granite Works.docx", "docx", 212_992, "2024-07-30T08:45:00Z"),
        ]
    }
}
