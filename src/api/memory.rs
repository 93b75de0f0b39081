//! In-process mock backend serving seeded records.
//!
//! Stands in for endpoints that are not integrated yet and backs the tests of
//! the page controllers. Semantics follow the REST conventions: ids are
//! assigned on create, new records start in the vocabulary's initial status,
//! and named actions map through [`Status::for_action`].

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::service::{CollectionService, ListQuery, merge_into};
use crate::domain::{Draft, Record, Status};
use crate::error::{Result, SiteworkError};

/// Operation names used for call recording and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Transition,
}

impl Operation {
    fn method(self) -> &'static str {
        match self {
            Operation::List | Operation::Get => "GET",
            Operation::Create => "POST",
            Operation::Update | Operation::Transition => "PUT",
            Operation::Delete => "DELETE",
        }
    }
}

pub struct InMemoryService<R> {
    records: Mutex<Vec<R>>,
    calls: Mutex<Vec<(Operation, Option<String>)>>,
    /// Operation that fails on its next call
    fail_next: Mutex<Option<Operation>>,
}

impl<R: Record> Default for InMemoryService<R> {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

impl<R: Record> InMemoryService<R> {
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: Mutex::new(records),
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// Service over the record type's seed data
    pub fn seeded() -> Self {
        Self::with_records(R::samples())
    }

    pub fn records(&self) -> Vec<R> {
        self.records.lock().clone()
    }

    /// Make the next call of `operation` fail as a request failure
    pub fn fail_next(&self, operation: Operation) {
        *self.fail_next.lock() = Some(operation);
    }

    /// Calls received so far, with the record id when there was one
    pub fn calls(&self) -> Vec<(Operation, Option<String>)> {
        self.calls.lock().clone()
    }

    fn record_call(&self, operation: Operation, id: Option<&str>) -> Result<()> {
        self.calls.lock().push((operation, id.map(str::to_string)));
        let path = match id {
            Some(id) => format!("/{}/{id}", R::RESOURCE),
            None => format!("/{}", R::RESOURCE),
        };
        debug!(method = operation.method(), %path, "mock request");

        let mut fail_next = self.fail_next.lock();
        if *fail_next == Some(operation) {
            *fail_next = None;
            return Err(SiteworkError::request_failed(
                operation.method(),
                path,
                Some(503),
                "simulated failure",
            ));
        }
        Ok(())
    }

    fn not_found(id: &str) -> SiteworkError {
        SiteworkError::NotFound(R::LABEL, id.to_string())
    }

    fn matches(record: &R, query: &ListQuery) -> bool {
        if let Some(project) = &query.project_id
            && record.project_id() != Some(project.as_str())
        {
            return false;
        }
        query
            .params
            .iter()
            .all(|(field, value)| record.filter_value(field).as_deref() == Some(value.as_str()))
    }
}

#[async_trait]
impl<R: Record> CollectionService<R> for InMemoryService<R> {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>> {
        self.record_call(Operation::List, None)?;
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|r| Self::matches(r, query))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<R> {
        self.record_call(Operation::Get, Some(id))?;
        self.records
            .lock()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, draft: &Draft) -> Result<R> {
        self.record_call(Operation::Create, None)?;
        let mut fields = draft.clone();
        fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        fields
            .entry("status")
            .or_insert_with(|| Value::String(R::Status::initial().to_string()));
        let record: R = serde_json::from_value(Value::Object(fields))
            .map_err(|e| SiteworkError::Validation(format!("invalid {}: {e}", R::LABEL)))?;
        self.records.lock().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, draft: &Draft) -> Result<R> {
        self.record_call(Operation::Update, Some(id))?;
        let mut records = self.records.lock();
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        let updated = merge_into(slot, draft)
            .map_err(|e| SiteworkError::Validation(format!("invalid {}: {e}", R::LABEL)))?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.record_call(Operation::Delete, Some(id))?;
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn transition(&self, id: &str, action: &str) -> Result<R> {
        self.record_call(Operation::Transition, Some(id))?;
        let status = R::Status::for_action(action)
            .ok_or_else(|| SiteworkError::InvalidAction(action.to_string(), R::LABEL))?;
        let mut records = self.records.lock();
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        record.set_status(status);
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bid, BidStatus, Rfi, RfiStatus};
    use serde_json::json;

    fn draft(value: Value) -> Draft {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_list_filters_by_project_and_params() {
        let service = InMemoryService::<Bid>::seeded();
        let all = service.list(&ListQuery::for_project("prj-100")).await.unwrap();
        assert_eq!(all.len(), 5);

        let won = service
            .list(&ListQuery::for_project("prj-100").param("status", "won"))
            .await
            .unwrap();
        assert_eq!(won.len(), 1);
        assert_eq!(won[0].id, "bid-003");

        let other = service.list(&ListQuery::for_project("prj-999")).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_initial_status() {
        let service = InMemoryService::<Bid>::default();
        let created = service
            .create(&draft(json!({"title": "Glazing", "projectId": "prj-1"})))
            .await
            .unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.status, BidStatus::Draft);
        assert_eq!(service.records().len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_invalid_draft_is_validation_error() {
        let service = InMemoryService::<Bid>::default();
        let err = service.create(&draft(json!({"amount": 5}))).await.unwrap_err();
        assert!(matches!(err, SiteworkError::Validation(_)));
    }

    #[tokio::test]
    async fn test_transition_maps_action_to_status() {
        let service = InMemoryService::<Rfi>::seeded();
        let closed = service.transition("rfi-001", "close").await.unwrap();
        assert_eq!(closed.status, RfiStatus::Closed);

        let err = service.transition("rfi-001", "award").await.unwrap_err();
        assert_eq!(err.to_string(), "action 'award' is not available for RFI");
    }

    #[tokio::test]
    async fn test_update_status_partial_update() {
        let service = InMemoryService::<Bid>::seeded();
        let updated = service.update_status("bid-001", BidStatus::Won).await.unwrap();
        assert_eq!(updated.status, BidStatus::Won);
        assert_eq!(updated.title, "Concrete foundations");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let service = InMemoryService::<Bid>::seeded();
        service.delete("bid-001").await.unwrap();
        let err = service.delete("bid-001").await.unwrap_err();
        assert!(matches!(err, SiteworkError::NotFound("bid", _)));
    }

    #[tokio::test]
    async fn test_fail_next_fails_once() {
        let service = InMemoryService::<Bid>::seeded();
        service.fail_next(Operation::List);
        let err = service.list(&ListQuery::default()).await.unwrap_err();
        assert!(err.is_request_failure());
        assert!(service.list(&ListQuery::default()).await.is_ok());
        assert_eq!(
            service.calls(),
            vec![(Operation::List, None), (Operation::List, None)]
        );
    }
}
