//! The per-entity service seam the controllers are written against.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::ApiClient;
use crate::domain::{Draft, Record};
use crate::error::Result;

/// Dependency key of a list load: owning project plus backend filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub project_id: Option<String>,
    pub params: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Query-string pairs, `projectId` first
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.project_id
            .iter()
            .map(|p| ("projectId".to_string(), p.clone()))
            .chain(self.params.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect()
    }
}

/// CRUD and named transitions over one resource
#[async_trait]
pub trait CollectionService<R: Record>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>>;

    async fn get(&self, id: &str) -> Result<R>;

    async fn create(&self, draft: &Draft) -> Result<R>;

    async fn update(&self, id: &str, draft: &Draft) -> Result<R>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Named transition such as `award` or `close`
    async fn transition(&self, id: &str, action: &str) -> Result<R>;

    /// Partial update of the status field only
    async fn update_status(&self, id: &str, status: R::Status) -> Result<R> {
        let mut draft = Draft::new();
        draft.insert("status".to_string(), serde_json::to_value(status)?);
        self.update(id, &draft).await
    }
}

/// [`CollectionService`] backed by the REST API
pub struct RestService<R> {
    client: Arc<ApiClient>,
    _record: PhantomData<fn() -> R>,
}

impl<R> RestService<R> {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Record> CollectionService<R> for RestService<R> {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>> {
        self.client.list(query).await
    }

    async fn get(&self, id: &str) -> Result<R> {
        self.client.get(id).await
    }

    async fn create(&self, draft: &Draft) -> Result<R> {
        self.client.create(draft).await
    }

    async fn update(&self, id: &str, draft: &Draft) -> Result<R> {
        self.client.update(id, draft).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete::<R>(id).await
    }

    async fn transition(&self, id: &str, action: &str) -> Result<R> {
        self.client.transition(id, action).await
    }
}

/// Shallow merge of `patch` into the JSON form of `record`
pub fn merge_into<R: Record>(record: &R, patch: &Draft) -> Result<R> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(fields) = &mut value {
        for (k, v) in patch {
            if k != "id" {
                fields.insert(k.clone(), v.clone());
            }
        }
    }
    Ok(serde_json::from_value(value)?)
}
