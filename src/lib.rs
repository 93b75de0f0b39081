#[macro_use]
mod macros;

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod view;

pub use api::{ApiClient, CollectionService, Connection, InMemoryService, ListQuery, RestService};
pub use config::{Backend, Config};
pub use domain::{
    Approval, ApprovalStatus, Bid, BidStatus, Document, DocumentStatus, Draft, EmailMessage,
    EmailStatus, Invoice, InvoiceStatus, Payment, PaymentStatus, Quote, QuoteStatus, Record, Rfi,
    RfiPriority, RfiStatus, Status, Submittal, SubmittalStatus,
};
pub use error::{Result, SiteworkError};
pub use view::{KanbanBoard, Page, PageState, RemoteStore};
