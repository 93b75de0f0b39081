//! Outgoing payments against approved invoices.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Party, Record, date, party_name};
use crate::view::sort::ComparatorTable;

status_vocabulary!(
    PaymentStatus {
        Pending => "pending" [],
        Processing => "processing" ["process"],
        Completed => "completed" ["complete"],
        Failed => "failed" ["fail"],
        Cancelled => "cancelled" ["cancel"],
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<Party>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    /// check, ach, wire, card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<Date>,
    pub status: PaymentStatus,
}

impl Record for Payment {
    type Status = PaymentStatus;

    const RESOURCE: &'static str = "payments";
    const LABEL: &'static str = "payment";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.reference
    }

    fn status(&self) -> PaymentStatus {
        self.status
    }

    fn set_status(&mut self, status: PaymentStatus) {
        self.status = status;
    }

    fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.reference.as_str(), party_name(&self.payee)];
        fields.extend(self.invoice_id.as_deref());
        fields
    }

    fn filter_value(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.to_string()),
            "method" => self.method.clone(),
            "payee" => self.payee.as_ref().map(|p| p.id.clone()),
            _ => None,
        }
    }

    fn filter_fields() -> &'static [&'static str] {
        &["status", "method", "payee"]
    }

    fn comparators() -> ComparatorTable<Self> {
        ComparatorTable::<Self>::new()
            .text("reference", |p| p.reference.as_str())
            .text("payee", |p| party_name(&p.payee))
            .number("amount", |p| Some(p.amount))
            .date("paid_on", |p| p.paid_on)
            .by("status", |a, b| a.status.cmp(&b.status))
    }

    fn samples() -> Vec<Self> {
        vec![
            Payment {
                id: "pay-001".to_string(),
                project_id: Some("prj-100".to_string()),
                reference: "ACH-55102".to_string(),
                payee: Some(Party::new("co-15", "Level Earthworks")),
                amount: 8_900.0,
                invoice_id: Some("inv-003".to_string()),
                method: Some("ach".to_string()),
                paid_on: date("2024-08-10"),
                status: PaymentStatus::Completed,
            },
            Payment {
                id: "pay-002".to_string(),
                project_id: Some("prj-100".to_string()),
                reference: "CHK-1049".to_string(),
                payee: Some(Party::new("co-11", "Granite Works")),
                amount: 46_125.0,
                invoice_id: Some("inv-001".to_string()),
                method: Some("check".to_string()),
                paid_on: None,
                status: PaymentStatus::Pending,
            },
        ]
    }
}
