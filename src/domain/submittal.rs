//! Submittals: shop drawings, product data and samples routed for review.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Attachment, Party, Record, date, party_name};
use crate::view::sort::ComparatorTable;

status_vocabulary!(
    SubmittalStatus {
        Draft => "draft" [],
        Submitted => "submitted" ["submit"],
        InReview => "in_review" ["review"],
        Approved => "approved" ["approve"],
        Rejected => "rejected" ["reject"],
        Resubmit => "resubmit" ["revise"],
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submittal {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub number: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_section: Option<String>,
    /// Party that owns the next action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball_in_court: Option<Party>,
    #[serde(default)]
    pub revision: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    pub status: SubmittalStatus,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Record for Submittal {
    type Status = SubmittalStatus;

    const RESOURCE: &'static str = "submittals";
    const LABEL: &'static str = "submittal";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> SubmittalStatus {
        self.status
    }

    fn set_status(&mut self, status: SubmittalStatus) {
        self.status = status;
    }

    fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.number.as_str(),
            self.title.as_str(),
            party_name(&self.ball_in_court),
        ];
        fields.extend(self.spec_section.as_deref());
        fields
    }

    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.to_string()),
            "ball_in_court" => self.ball_in_court.as_ref().map(|p| p.id.clone()),
            "spec_section" => self.spec_section.clone(),
            _ => None,
        }
    }

    fn filter_fields() -> &'static [&'static str] {
        &["status", "ball_in_court", "spec_section"]
    }

    fn comparators() -> ComparatorTable<Self> {
        ComparatorTable::<Self>::new()
            .text("number", |s| s.number.as_str())
            .text("title", |s| s.title.as_str())
            .optional_text("spec_section", |s| s.spec_section.as_deref())
            .text("ball_in_court", |s| party_name(&s.ball_in_court))
            .number("revision", |s| Some(f64::from(s.revision)))
            .date("due_date", |s| s.due_date)
            .by("status", |a, b| a.status.cmp(&b.status))
    }

    fn samples() -> Vec<Self> {
        let submittal = |n: u32, title: &str, section: &str, bic: (&str, &str), due, status| Submittal {
            id: format!("sub-{n:03}"),
            project_id: Some("prj-100".to_string()),
            number: format!("{section}-{n}"),
            title: title.to_string(),
            spec_section: Some(section.to_string()),
            ball_in_court: Some(Party::new(bic.0, bic.1)),
            revision: 0,
            due_date: date(due),
            status,
            attachments: Vec::new(),
        };

        vec![
            submittal(1, "Rebar shop drawings", "03 20 00", ("co-11", "Granite Works"), "2024-09-30", SubmittalStatus::InReview),
            submittal(2, "Storefront product data", "08 41 13", ("u-30", "Harbor Architects"), "2024-10-04", SubmittalStatus::Submitted),
            submittal(3, "Paint color samples", "09 91 23", ("co-16", "Finish Line Painting"), "2024-10-20", SubmittalStatus::Draft),
        ]
    }
}
