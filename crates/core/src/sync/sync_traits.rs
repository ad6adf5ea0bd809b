//! Traits connecting the sync tree to the entities it recomputes.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use super::{SyncNodeStatus, SyncOutcome, SyncWindow, SyncableRef};
use crate::errors::Result;

/// An entity the sync tree can recompute: an account, a linked connection,
/// or a whole household.
#[async_trait]
pub trait Syncable: Send + Sync {
    fn syncable_ref(&self) -> SyncableRef;

    /// Entities whose recomputation this one depends on, each becoming a
    /// child node run in parallel (e.g. a household's accounts).
    fn dependents(&self) -> Vec<Arc<dyn Syncable>> {
        Vec::new()
    }

    /// The entity's own sync entry point, invoked by `SyncTree::perform`.
    async fn sync(&self, window: &SyncWindow) -> Result<SyncOutcome>;
}

/// Post-sync hook, fired exactly once per terminal node. Used by UI-refresh,
/// issue-resolution, and transfer-matching collaborators; fire-and-forget
/// from the core's perspective.
#[async_trait]
pub trait SyncObserverTrait: Send + Sync {
    async fn on_sync_completed(
        &self,
        syncable: &SyncableRef,
        status: SyncNodeStatus,
        balance_as_of: Option<NaiveDate>,
        error: Option<&str>,
    );
}
