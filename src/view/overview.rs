//! Project overview: a composite load of several collections at once.
//!
//! The collections are fetched in parallel and joined with `try_join!`. If any
//! request fails the whole load fails and nothing is applied, so the overview
//! never mixes fresh and stale collections.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::collection::RemoteStore;
use crate::api::Connection;
use crate::api::service::{CollectionService, ListQuery};
use crate::domain::{Approval, Bid, Invoice, Record, Rfi, Submittal};
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectOverview {
    pub bids: Vec<Bid>,
    pub rfis: Vec<Rfi>,
    pub submittals: Vec<Submittal>,
    pub invoices: Vec<Invoice>,
    pub approvals: Vec<Approval>,
}

/// Count of records per status, keyed by the status wire name
pub fn status_counts<R: Record>(records: &[R]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.status().to_string()).or_insert(0) += 1;
    }
    counts
}

#[derive(Clone)]
pub struct OverviewServices {
    pub bids: Arc<dyn CollectionService<Bid>>,
    pub rfis: Arc<dyn CollectionService<Rfi>>,
    pub submittals: Arc<dyn CollectionService<Submittal>>,
    pub invoices: Arc<dyn CollectionService<Invoice>>,
    pub approvals: Arc<dyn CollectionService<Approval>>,
}

impl OverviewServices {
    pub fn from_connection(connection: &Connection) -> Self {
        Self {
            bids: connection.service(),
            rfis: connection.service(),
            submittals: connection.service(),
            invoices: connection.service(),
            approvals: connection.service(),
        }
    }

    /// Fetch every collection for `query` in parallel
    pub async fn load(&self, query: &ListQuery) -> Result<ProjectOverview> {
        let (bids, rfis, submittals, invoices, approvals) = futures::try_join!(
            self.bids.list(query),
            self.rfis.list(query),
            self.submittals.list(query),
            self.invoices.list(query),
            self.approvals.list(query),
        )?;
        Ok(ProjectOverview {
            bids,
            rfis,
            submittals,
            invoices,
            approvals,
        })
    }

    /// Store that reloads the whole overview per project query
    pub fn store(self, query: ListQuery) -> RemoteStore<ListQuery, ProjectOverview> {
        let services = Arc::new(self);
        RemoteStore::new("overview", query, move |key: ListQuery| {
            let services = services.clone();
            async move { services.load(&key).await }
        })
    }
}
