// ── Baseline sources ──
//
// Where the static seed data comes from. Production reads the JSON files
// shipped with the site over HTTP; tests and offline runs use fixed data.

use std::collections::HashMap;
use std::future::Future;

use quannem_api::BaselineClient;

use crate::error::CoreError;
use crate::model::{Record, Resource};

/// Read-only provider of a resource's baseline records.
pub trait BaselineSource: Send + Sync {
    fn fetch(&self, resource: Resource)
    -> impl Future<Output = Result<Vec<Record>, CoreError>> + Send;
}

impl BaselineSource for BaselineClient {
    async fn fetch(&self, resource: Resource) -> Result<Vec<Record>, CoreError> {
        // `null` decodes as no records, matching a missing array.
        let rows: Option<Vec<Record>> =
            BaselineClient::fetch(self, resource.baseline_path()).await?;
        Ok(rows.unwrap_or_default())
    }
}

/// Fixed in-memory baseline.
#[derive(Debug, Clone, Default)]
pub struct StaticBaseline {
    data: HashMap<Resource, Vec<Record>>,
}

impl StaticBaseline {
    /// A baseline with no records for any resource.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, resource: Resource, records: Vec<Record>) -> Self {
        self.data.insert(resource, records);
        self
    }
}

impl BaselineSource for StaticBaseline {
    async fn fetch(&self, resource: Resource) -> Result<Vec<Record>, CoreError> {
        Ok(self.data.get(&resource).cloned().unwrap_or_default())
    }
}

/// A baseline that is always unavailable (offline mode, failure tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl BaselineSource for Unavailable {
    async fn fetch(&self, resource: Resource) -> Result<Vec<Record>, CoreError> {
        Err(CoreError::ConnectionFailed {
            url: resource.baseline_path().into(),
            reason: "baseline disabled".into(),
        })
    }
}
