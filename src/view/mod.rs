//! Client-side state controllers.
//!
//! Everything here is independent of any rendering layer: reducers and view
//! models are pure, and the async controllers only talk to the backend
//! through [`crate::api::CollectionService`].

pub mod board;
pub mod collection;
pub mod filter;
pub mod form;
pub mod list;
pub mod overview;
pub mod page;
pub mod sort;
pub mod toast;

pub use board::{DragLocation, DropOutcome, KanbanBoard};
pub use collection::{LoadOutcome, RemoteStore};
pub use filter::FilterState;
pub use form::{FormDraft, FormMode, SubmitOutcome, ValidationResult, Wizard};
pub use list::{ListAction, ListState, ListViewModel, compute_list_view, reduce_list_state};
pub use overview::{OverviewServices, ProjectOverview};
pub use page::{Page, PageAction, PageState};
pub use sort::{ComparatorTable, SortDirection, SortSpec};
pub use toast::{Toast, ToastLevel};
