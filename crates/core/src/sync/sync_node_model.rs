//! Sync node domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, ValidationError};
use crate::portfolio::ReconstructionWarning;

/// Status of a sync node. Terminal once `Completed` or `Failed` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncNodeStatus {
    #[default]
    Pending,
    Syncing,
    Completed,
    Failed,
}

impl SyncNodeStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncNodeStatus::Completed | SyncNodeStatus::Failed)
    }
}

/// Kind of entity a sync node targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncableKind {
    Account,
    Connection,
    Household,
}

/// Reference to the syncable entity a node targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncableRef {
    pub kind: SyncableKind,
    pub id: String,
}

impl SyncableRef {
    pub fn account(id: &str) -> Self {
        Self {
            kind: SyncableKind::Account,
            id: id.to_string(),
        }
    }

    pub fn connection(id: &str) -> Self {
        Self {
            kind: SyncableKind::Connection,
            id: id.to_string(),
        }
    }

    pub fn household(id: &str) -> Self {
        Self {
            kind: SyncableKind::Household,
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for SyncableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            SyncableKind::Account => "account",
            SyncableKind::Connection => "connection",
            SyncableKind::Household => "household",
        };
        write!(f, "{}:{}", kind, self.id)
    }
}

/// Date bounds of a recomputation. `start > end` is rejected at construction
/// and never reaches the reconstruction loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SyncWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ValidationError::InvalidWindow { start, end }.into());
        }
        Ok(Self { start, end })
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One unit of scheduled recomputation work with its own lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub syncable: SyncableRef,
    pub status: SyncNodeStatus,
    pub window: SyncWindow,
    /// Message from a terminal failure
    pub error: Option<String>,
    /// Date balances are current through, reported by a successful run
    pub balance_as_of: Option<NaiveDate>,
    /// Guard for the exactly-once post-sync hook
    pub hook_fired: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SyncNode {
    pub fn new(syncable: SyncableRef, window: SyncWindow, parent_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            parent_id,
            syncable,
            status: SyncNodeStatus::Pending,
            window,
            error: None,
            balance_as_of: None,
            hook_fired: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Mark the node as running. Only a pending node starts.
    pub fn start(&mut self) {
        if self.status == SyncNodeStatus::Pending {
            self.status = SyncNodeStatus::Syncing;
            self.updated_at = Utc::now();
        }
    }

    /// Mark the node completed. Terminal states never change again.
    pub fn complete(&mut self) {
        if !self.is_terminal() {
            self.status = SyncNodeStatus::Completed;
            self.updated_at = Utc::now();
        }
    }

    /// Mark the node failed with an error message. Terminal states never
    /// change again.
    pub fn fail(&mut self, error: String) {
        if !self.is_terminal() {
            self.status = SyncNodeStatus::Failed;
            self.error = Some(error);
            self.updated_at = Utc::now();
        }
    }
}

/// Outcome of one syncable's own sync run, carried onto its node.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    pub balance_as_of: Option<NaiveDate>,
    pub warnings: Vec<ReconstructionWarning>,
}
