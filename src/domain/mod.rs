//! Domain records served by the project-management backend.
//!
//! Every entity is a plain serde record with an opaque backend-assigned `id`
//! and a typed status vocabulary. The [`Record`] trait is the seam the list,
//! board, form and service layers are written against.

pub mod approval;
pub mod bid;
pub mod document;
pub mod email;
pub mod invoice;
pub mod payment;
pub mod quote;
pub mod rfi;
pub mod submittal;

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SiteworkError;
use crate::view::sort::ComparatorTable;

pub use approval::{Approval, ApprovalStatus};
pub use bid::{Bid, BidStatus};
pub use document::{Document, DocumentStatus};
pub use email::{EmailMessage, EmailStatus};
pub use invoice::{Invoice, InvoiceStatus};
pub use payment::{Payment, PaymentStatus};
pub use quote::{Quote, QuoteStatus};
pub use rfi::{Rfi, RfiPriority, RfiStatus};
pub use submittal::{Submittal, SubmittalStatus};

/// A fixed status vocabulary, listed in pipeline order.
pub trait Status:
    Copy
    + Eq
    + Hash
    + Ord
    + Debug
    + Display
    + FromStr<Err = SiteworkError>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    const ALL: &'static [Self];

    /// Status a named action (`PUT /{Xs}/{id}/{action}`) transitions into
    fn for_action(action: &str) -> Option<Self>;

    /// Every named action accepted by this vocabulary
    fn actions() -> &'static [&'static str];

    /// Status given to newly created records
    fn initial() -> Self {
        Self::ALL[0]
    }
}

/// A domain entity as returned by the backend.
pub trait Record: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Status: Status;

    /// Collection path segment, e.g. `bids` for `/bids/{id}`
    const RESOURCE: &'static str;

    /// Singular human label used in messages, e.g. `bid`
    const LABEL: &'static str;

    fn id(&self) -> &str;

    fn title(&self) -> &str;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    fn project_id(&self) -> Option<&str>;

    /// Free-text fields matched by the list search box
    fn search_fields(&self) -> Vec<&str>;

    /// Rendering of a categorical field for exact-match filtering.
    ///
    /// `status` is handled for every record; types add their own fields.
    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status().to_string()),
            _ => None,
        }
    }

    /// Names accepted by [`Record::filter_value`]
    fn filter_fields() -> &'static [&'static str] {
        &["status"]
    }

    fn comparators() -> ComparatorTable<Self>;

    /// Seed data served by the mock backend
    fn samples() -> Vec<Self>;
}

/// In-progress, not-yet-persisted field values of a record, keyed by the
/// record's wire (camelCase) field names
pub type Draft = serde_json::Map<String, serde_json::Value>;

/// Reference to a person or company (owner, assignee, bidder, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
    pub name: String,
}

impl Party {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Display name of an optional party, empty when absent
pub fn party_name(party: &Option<Party>) -> &str {
    party.as_ref().map(|p| p.name.as_str()).unwrap_or("")
}

/// File attached to a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Comment left on a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: Party,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<jiff::Timestamp>,
}

/// Line item on an invoice or quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Parse a `YYYY-MM-DD` literal in seed data
pub(crate) fn date(s: &str) -> Option<jiff::civil::Date> {
    s.parse().ok()
}

/// Parse an RFC 3339 literal in seed data
pub(crate) fn timestamp(s: &str) -> Option<jiff::Timestamp> {
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_name() {
        assert_eq!(party_name(&Some(Party::new("u-1", "Dana Ortiz"))), "Dana Ortiz");
        assert_eq!(party_name(&None), "");
    }

    #[test]
    fn test_attachment_uses_camel_case() {
        let attachment: Attachment =
            serde_json::from_str(r#"{"id":"a-1","fileName":"plan.pdf","size":2048}"#).unwrap();
        assert_eq!(attachment.file_name, "plan.pdf");
        assert_eq!(attachment.size, Some(2048));
        assert!(attachment.url.is_none());
    }

    #[test]
    fn test_line_item_total() {
        let item = LineItem {
            description: "Rebar".to_string(),
            quantity: 12.0,
            unit_price: 40.5,
        };
        assert_eq!(item.total(), 486.0);
    }
}
