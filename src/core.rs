//! Core domain types for scan reports.
//!
//! A report is produced once per scan by the update pipeline and handed,
//! read-only, to every active notifier. Nothing in this crate mutates it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque container identifier assigned by the container runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct ContainerId(pub String);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity of a scanned container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Container {
    #[serde(default)]
    pub id: ContainerId,
    pub name: String,
}

impl Container {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: ContainerId(id.to_string()),
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Report Trait
// =============================================================================

/// A read-only view over the outcome of one scan cycle.
///
/// Buckets are returned in the order the pipeline populated them. The
/// pipeline guarantees that they are disjoint by name and deduplicated.
pub trait Report: Send + Sync {
    fn scanned(&self) -> &[Container];
    fn updated(&self) -> &[Container];
    fn failed(&self) -> &[Container];
    fn skipped(&self) -> &[Container];
    fn stale(&self) -> &[Container];
    fn fresh(&self) -> &[Container];

    /// Names of the stale containers joined with `", "`, in bucket order.
    fn stale_names(&self) -> String {
        self.stale()
            .iter()
            .map(Container::name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// True when nothing was scanned.
    fn is_empty(&self) -> bool {
        self.scanned().is_empty()
    }
}

/// The concrete report shape read from the scan pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ScanReport {
    pub scanned: Vec<Container>,
    pub updated: Vec<Container>,
    pub failed: Vec<Container>,
    pub skipped: Vec<Container>,
    pub stale: Vec<Container>,
    pub fresh: Vec<Container>,
}

impl ScanReport {
    /// Checks that the acted-upon buckets fit inside the scanned bucket.
    ///
    /// Returns a description of the violation, if any.
    pub fn validate(&self) -> Option<String> {
        let acted = self.updated.len() + self.failed.len() + self.skipped.len();
        if acted > self.scanned.len() {
            return Some(format!(
                "{} updated/failed/skipped containers exceed {} scanned",
                acted,
                self.scanned.len()
            ));
        }
        None
    }
}

impl Report for ScanReport {
    fn scanned(&self) -> &[Container] {
        &self.scanned
    }

    fn updated(&self) -> &[Container] {
        &self.updated
    }

    fn failed(&self) -> &[Container] {
        &self.failed
    }

    fn skipped(&self) -> &[Container] {
        &self.skipped
    }

    fn stale(&self) -> &[Container] {
        &self.stale
    }

    fn fresh(&self) -> &[Container] {
        &self.fresh
    }
}
