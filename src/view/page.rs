//! Page controller: one list screen's state and its round trips
//!
//! A page composes a [`RemoteStore`] of records, the [`ListState`] fed from
//! it, an optional open [`FormDraft`] and a toast slot. All page state lives
//! in one [`PageState`] value changed through [`reduce_page_state`]; the
//! async operations on [`Page`] call the service, dispatch the result and
//! reload after every mutation.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{info, warn};

use super::board::{DragLocation, DropOutcome, KanbanBoard};
use super::collection::{LoadOutcome, RemoteStore};
use super::form::{self, FormDraft, SubmitOutcome};
use super::list::{ListAction, ListState, ListViewModel, compute_list_view};
use super::toast::Toast;
use crate::api::service::{CollectionService, ListQuery};
use crate::domain::Record;
use crate::error::{Result, SiteworkError};

/// Raw state of one list page
#[derive(Debug, Clone)]
pub struct PageState<R: Record> {
    pub list: ListState<R>,
    pub form: Option<FormDraft>,
    pub toast: Option<Toast>,
    pub is_loading: bool,
    /// Last load error, shown until the next successful load
    pub error: Option<String>,
}

impl<R: Record> Default for PageState<R> {
    fn default() -> Self {
        Self {
            list: ListState::default(),
            form: None,
            toast: None,
            is_loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PageAction<R> {
    List(ListAction<R>),
    LoadStarted,
    Loaded(Vec<R>),
    LoadFailed(String),
    /// Resync the loading flag after a discarded load
    LoadSettled { is_loading: bool },
    OpenForm(FormDraft),
    SetField { name: String, value: Value },
    CloseForm,
    ShowToast(Toast),
    DismissToast,
}

/// Pure function: apply action to state (reducer pattern)
pub fn reduce_page_state<R: Record>(mut state: PageState<R>, action: PageAction<R>) -> PageState<R> {
    match action {
        PageAction::List(action) => {
            state.list = super::list::reduce_list_state(state.list, action);
        }
        PageAction::LoadStarted => state.is_loading = true,
        PageAction::Loaded(records) => {
            state.list.replace_records(records);
            state.is_loading = false;
            state.error = None;
        }
        PageAction::LoadFailed(message) => {
            state.is_loading = false;
            state.error = Some(message);
            state.toast = Some(Toast::request_failed("load", R::RESOURCE));
        }
        PageAction::LoadSettled { is_loading } => state.is_loading = is_loading,
        PageAction::OpenForm(form) => state.form = Some(form),
        PageAction::SetField { name, value } => {
            if let Some(form) = state.form.as_mut() {
                form.set_field(name, value);
            }
        }
        PageAction::CloseForm => state.form = None,
        PageAction::ShowToast(toast) => state.toast = Some(toast),
        PageAction::DismissToast => state.toast = None,
    }
    state
}

/// Toast for a failed operation: the generic retry message for request
/// failures, the error itself otherwise.
fn failure_toast(verb: &str, entity: &str, err: &SiteworkError) -> Toast {
    if err.is_request_failure() {
        Toast::request_failed(verb, entity)
    } else {
        Toast::error(err.to_string())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ids a bulk action succeeded and failed for
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, SiteworkError)>,
}

/// Controller for one list page of `R` records
pub struct Page<R: Record> {
    service: Arc<dyn CollectionService<R>>,
    collection: RemoteStore<ListQuery, Vec<R>>,
    state: Mutex<PageState<R>>,
}

impl<R: Record> Page<R> {
    pub fn new(service: Arc<dyn CollectionService<R>>, query: ListQuery) -> Self {
        let fetch_service = service.clone();
        let collection = RemoteStore::new(R::RESOURCE, query, move |key: ListQuery| {
            let service = fetch_service.clone();
            async move { service.list(&key).await }
        });
        Self {
            service,
            collection,
            state: Mutex::new(PageState::default()),
        }
    }

    pub fn dispatch(&self, action: PageAction<R>) {
        let mut state = self.state.lock();
        *state = reduce_page_state(std::mem::take(&mut *state), action);
    }

    pub fn state(&self) -> PageState<R> {
        self.state.lock().clone()
    }

    pub fn view(&self) -> ListViewModel<R> {
        compute_list_view(&self.state.lock().list)
    }

    pub fn toast(&self) -> Option<Toast> {
        self.state.lock().toast.clone()
    }

    pub fn query(&self) -> ListQuery {
        self.collection.key()
    }

    /// Initial load
    pub async fn mount(&self) -> LoadOutcome {
        self.refresh().await
    }

    /// Reload with the current query
    pub async fn refresh(&self) -> LoadOutcome {
        self.dispatch(PageAction::LoadStarted);
        let outcome = self.collection.refresh().await;
        self.apply_load(&outcome);
        outcome
    }

    /// Change the query (project, backend filters) and reload if it changed
    pub async fn set_query(&self, query: ListQuery) -> Option<LoadOutcome> {
        if self.collection.key() == query {
            return None;
        }
        self.dispatch(PageAction::LoadStarted);
        let outcome = self.collection.load_key(query).await;
        match &outcome {
            Some(outcome) => self.apply_load(outcome),
            None => self.settle_loading(),
        }
        outcome
    }

    fn apply_load(&self, outcome: &LoadOutcome) {
        match outcome {
            LoadOutcome::Applied => self.dispatch(PageAction::Loaded(self.collection.value())),
            LoadOutcome::Failed(err) => self.dispatch(PageAction::LoadFailed(err.to_string())),
            LoadOutcome::Stale => self.settle_loading(),
        }
    }

    fn settle_loading(&self) {
        self.dispatch(PageAction::LoadSettled {
            is_loading: self.collection.is_loading(),
        });
    }

    /// Detach the page; loads still in flight are discarded
    pub fn close(&self) {
        self.collection.close();
        self.settle_loading();
    }

    pub fn open_create(&self, project_id: Option<&str>) {
        self.dispatch(PageAction::OpenForm(FormDraft::create_for::<R>(project_id)));
    }

    /// Open an edit form for a loaded record
    pub fn open_edit(&self, id: &str) -> Result<()> {
        let form = {
            let state = self.state.lock();
            let record = state
                .list
                .records
                .iter()
                .find(|r| r.id() == id)
                .ok_or_else(|| SiteworkError::NotFound(R::LABEL, id.to_string()))?;
            FormDraft::edit(record)?
        };
        self.dispatch(PageAction::OpenForm(form));
        Ok(())
    }

    pub fn set_field(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.dispatch(PageAction::SetField {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Submit the open form. Success closes it and reloads; failure keeps
    /// the draft open and shows a toast.
    pub async fn submit(&self) -> SubmitOutcome<R> {
        let request = {
            let mut state = self.state.lock();
            let Some(form) = state.form.as_mut() else {
                return SubmitOutcome::Failed(SiteworkError::Validation(
                    "no form is open".to_string(),
                ));
            };
            match form.begin_submit() {
                Some(request) => request,
                None => return SubmitOutcome::Busy,
            }
        };

        let verb = match request {
            form::SubmitRequest::Create(_) => "create",
            form::SubmitRequest::Update { .. } => "update",
        };
        let result = form::send(self.service.as_ref(), &request).await;

        let outcome = {
            let mut state = self.state.lock();
            match state.form.as_mut() {
                Some(form) => form.finish_submit(result),
                None => match result {
                    Ok(record) if verb == "create" => SubmitOutcome::Created(record),
                    Ok(record) => SubmitOutcome::Updated(record),
                    Err(err) => SubmitOutcome::Failed(err),
                },
            }
        };

        match &outcome {
            SubmitOutcome::Created(_) | SubmitOutcome::Updated(_) => {
                info!(entity = R::LABEL, verb, "saved");
                self.dispatch(PageAction::CloseForm);
                self.dispatch(PageAction::ShowToast(Toast::success(format!(
                    "{} {verb}d",
                    capitalize(R::LABEL)
                ))));
                self.refresh().await;
            }
            SubmitOutcome::Failed(err) => {
                warn!(entity = R::LABEL, verb, error = %err, "save failed");
                self.dispatch(PageAction::ShowToast(failure_toast(verb, R::LABEL, err)));
            }
            SubmitOutcome::Busy => {}
        }
        outcome
    }

    /// Run a named transition on one record, then reload
    pub async fn run_action(&self, id: &str, action: &str) -> Result<R> {
        match self.service.transition(id, action).await {
            Ok(record) => {
                self.refresh().await;
                Ok(record)
            }
            Err(err) => {
                warn!(entity = R::LABEL, id, action, error = %err, "action failed");
                self.dispatch(PageAction::ShowToast(failure_toast(action, R::LABEL, &err)));
                Err(err)
            }
        }
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        match self.service.delete(id).await {
            Ok(()) => {
                self.dispatch(PageAction::ShowToast(Toast::success(format!(
                    "{} deleted",
                    capitalize(R::LABEL)
                ))));
                self.refresh().await;
                Ok(())
            }
            Err(err) => {
                warn!(entity = R::LABEL, id, error = %err, "delete failed");
                self.dispatch(PageAction::ShowToast(failure_toast("delete", R::LABEL, &err)));
                Err(err)
            }
        }
    }

    /// Apply a named transition to every selected record, clear the
    /// selection and reload once.
    pub async fn bulk_action(&self, action: &str) -> BulkOutcome {
        let ids = self.state.lock().list.take_selection();
        if ids.is_empty() {
            return BulkOutcome::default();
        }

        let results = join_all(ids.iter().map(|id| self.service.transition(id, action))).await;
        let mut outcome = BulkOutcome::default();
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(_) => outcome.succeeded.push(id),
                Err(err) => outcome.failed.push((id, err)),
            }
        }

        info!(
            entity = R::LABEL,
            action,
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "bulk action finished"
        );
        let toast = if outcome.failed.is_empty() {
            Toast::success(format!(
                "Applied {action} to {} {}",
                outcome.succeeded.len(),
                R::RESOURCE
            ))
        } else {
            Toast::request_failed(action, R::RESOURCE)
        };
        self.dispatch(PageAction::ShowToast(toast));
        self.refresh().await;
        outcome
    }

    /// Drop a card on `board`, persisting a column change as a status update.
    /// A failed update reverts the card and shows a toast.
    pub async fn move_card(
        &self,
        board: &mut KanbanBoard<R>,
        source: DragLocation<R::Status>,
        destination: Option<DragLocation<R::Status>>,
    ) -> Result<DropOutcome<R::Status>> {
        let service = self.service.clone();
        let result = board
            .drop_and_persist(source, destination, move |id, status| async move {
                service.update_status(&id, status).await.map(|_| ())
            })
            .await;

        match &result {
            Ok(DropOutcome::Moved { .. }) => {
                self.refresh().await;
            }
            Ok(_) => {}
            Err(err) => {
                self.dispatch(PageAction::ShowToast(failure_toast("update", R::LABEL, err)));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bid;
    use crate::view::toast::ToastLevel;

    #[test]
    fn test_load_failed_sets_error_and_generic_toast() {
        let state = reduce_page_state(
            PageState::<Bid>::default(),
            PageAction::LoadFailed("GET /bids failed (500): boom".to_string()),
        );
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("GET /bids failed (500): boom"));
        let toast = state.toast.unwrap();
        assert_eq!(toast.message, "Failed to load bids. Please try again.");
        assert_eq!(toast.level, ToastLevel::Error);
    }

    #[test]
    fn test_loaded_replaces_records_and_clears_error() {
        let mut state = PageState::<Bid>::default();
        state.error = Some("old".to_string());
        state.is_loading = true;
        let state = reduce_page_state(state, PageAction::Loaded(Bid::samples()));
        assert_eq!(state.list.records.len(), 5);
        assert!(state.error.is_none());
        assert!(!state.is_loading);
    }

    #[test]
    fn test_load_settled_resyncs_loading_flag() {
        let state = reduce_page_state(PageState::<Bid>::default(), PageAction::LoadStarted);
        assert!(state.is_loading);
        let state = reduce_page_state(state, PageAction::LoadSettled { is_loading: false });
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert!(state.toast.is_none());
    }

    #[test]
    fn test_set_field_without_open_form_is_ignored() {
        let state = reduce_page_state(
            PageState::<Bid>::default(),
            PageAction::SetField {
                name: "title".to_string(),
                value: Value::from("x"),
            },
        );
        assert!(state.form.is_none());
    }

    #[test]
    fn test_failure_toast_uses_error_text_for_validation() {
        let toast = failure_toast("create", "bid", &SiteworkError::Validation("invalid bid".into()));
        assert_eq!(toast.message, "invalid bid");
        let toast = failure_toast(
            "create",
            "bid",
            &SiteworkError::request_failed("POST", "/bids", None, "could not connect"),
        );
        assert_eq!(toast.message, "Failed to create bid. Please try again.");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("submittal"), "Submittal");
        assert_eq!(capitalize("RFI"), "RFI");
        assert_eq!(capitalize(""), "");
    }
}
