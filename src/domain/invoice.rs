//! Invoices issued by vendors and subcontractors.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{LineItem, Party, Record, date, party_name};
use crate::view::sort::ComparatorTable;

status_vocabulary!(
    InvoiceStatus {
        Draft => "draft" [],
        Sent => "sent" ["send"],
        Paid => "paid" ["pay"],
        Overdue => "overdue" ["mark_overdue"],
        Void => "void" ["void"],
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Party>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    pub status: InvoiceStatus,
    /// Informational; `amount` is authoritative and is not recomputed
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Record for Invoice {
    type Status = InvoiceStatus;

    const RESOURCE: &'static str = "invoices";
    const LABEL: &'static str = "invoice";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.number
    }

    fn status(&self) -> InvoiceStatus {
        self.status
    }

    fn set_status(&mut self, status: InvoiceStatus) {
        self.status = status;
    }

    fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.number.as_str(), party_name(&self.vendor)]
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
            .text("number", |i| i.number.as_str())
            .text("vendor", |i| party_name(&i.vendor))
            .number("amount", |i| Some(i.amount))
            .date("issued_date", |i| i.issued_date)
            .date("due_date", |i| i.due_date)
            .by("status", |a, b| a.status.cmp(&b.status))
    }

    fn samples() -> Vec<Self> {
        vec![
            Invoice {
                id: "inv-001".to_string(),
                project_id: Some("prj-100".to_string()),
                number: "INV-2024-0311".to_string(),
                vendor: Some(Party::new("co-11", "Granite Works")),
                amount: 46_125.0,
                issued_date: date("2024-09-01"),
                due_date: date("2024-10-01"),
                status: InvoiceStatus::Sent,
                line_items: vec![LineItem {
                    description: "Footings, phase 1".to_string(),
                    quantity: 1.0,
                    unit_price: 46_125.0,
                }],
            },
            Invoice {
                id: "inv-002".to_string(),
                project_id: Some("prj-100".to_string()),
                number: "INV-2024-0298".to_string(),
                vendor: Some(Party::new("co-13", "Bright Current Electric")),
                amount: 12_480.0,
                issued_date: date("2024-08-01"),
                due_date: date("2024-08-31"),
                status: InvoiceStatus::Overdue,
                line_items: Vec::new(),
            },
            Invoice {
                id: "inv-003".to_string(),
                project_id: Some("prj-100".to_string()),
                number: "INV-2024-0275".to_string(),
                vendor: Some(Party::new("co-15", "Level Earthworks")),
                amount: 8_900.0,
                issued_date: date("2024-07-15"),
                due_date: date("2024-08-14"),
                status: InvoiceStatus::Paid,
                line_items: Vec::new(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::sort::{SortDirection, SortSpec};

    #[test]
    fn test_amount_sorts_numerically() {
        let invoices = Invoice::samples();
        let mut rows: Vec<&Invoice> = invoices.iter().collect();
        Invoice::comparators().sort(&mut rows, &SortSpec::new("amount", SortDirection::Descending));
        let ids: Vec<_> = rows.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["inv-001", "inv-002", "inv-003"]);
    }
}
