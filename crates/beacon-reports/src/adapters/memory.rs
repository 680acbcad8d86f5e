//! # In-Memory Report Store
//!
//! Versioned map adapter for the [`ReportStore`] port. Backs tests and
//! single-process deployments; a database adapter plugs in behind the same
//! trait for durable setups.

use crate::ports::outbound::ReportStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Report, ReportId, StoreError};
use std::collections::HashMap;

/// Optimistic-concurrency store over a guarded map.
#[derive(Default)]
pub struct InMemoryReportStore {
    reports: RwLock<HashMap<ReportId, Report>>,
}

impl InMemoryReportStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.read().len()
    }

    /// True if no reports are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.read().is_empty()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn insert(&self, report: Report) -> Result<(), StoreError> {
        let mut reports = self.reports.write();
        if reports.contains_key(&report.id) {
            return Err(StoreError::Backend(format!(
                "duplicate report id {}",
                report.id
            )));
        }
        reports.insert(report.id, report);
        Ok(())
    }

    async fn get(&self, report_id: ReportId) -> Result<Report, StoreError> {
        self.reports
            .read()
            .get(&report_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(report_id.to_string()))
    }

    async fn update(&self, mut report: Report) -> Result<Report, StoreError> {
        let mut reports = self.reports.write();
        let current = reports
            .get(&report.id)
            .ok_or_else(|| StoreError::NotFound(report.id.to_string()))?;

        if current.version != report.version {
            return Err(StoreError::VersionConflict {
                expected: report.version,
                found: current.version,
            });
        }

        report.version += 1;
        reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn list(&self) -> Result<Vec<Report>, StoreError> {
        Ok(self.reports.read().values().cloned().collect())
    }
}
