//! The sync tree state machine.
//!
//! A trigger creates a root node with one child per affected syncable
//! entity. Sibling nodes are independent units of work safe to run
//! concurrently; a parent only reaches a terminal state once every child is
//! terminal, decided bottom-up by `attempt_finalization` under a per-node
//! lock. A failed child never blocks siblings or ancestors from finalizing.

use chrono::NaiveDate;
use futures::future::{join_all, BoxFuture};
use log::{debug, error, warn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::{
    SyncNode, SyncNodeStatus, SyncObserverTrait, SyncOutcome, SyncWindow, Syncable, SyncableRef,
};
use crate::errors::{Error, Result, SyncError};

/// Payload of the exactly-once post-sync hook.
struct HookPayload {
    syncable: SyncableRef,
    status: SyncNodeStatus,
    balance_as_of: Option<NaiveDate>,
    error: Option<String>,
}

/// Outcome of one finalization check, computed under the node's lock.
enum FinalizationStep {
    /// Some child is still running; stop propagating.
    NotReady,
    /// The node is (or just became) terminal; continue to the parent.
    Finalized {
        hook: Option<HookPayload>,
        parent_id: Option<String>,
        completed_window: Option<(SyncableRef, SyncWindow)>,
    },
}

pub struct SyncTree {
    nodes: RwLock<HashMap<String, SyncNode>>,
    children: RwLock<HashMap<String, Vec<String>>>,
    syncables: RwLock<HashMap<String, Arc<dyn Syncable>>>,
    finalization_locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
    last_completed: RwLock<HashMap<SyncableRef, SyncWindow>>,
    observers: Vec<Arc<dyn SyncObserverTrait>>,
}

impl SyncTree {
    pub fn new(observers: Vec<Arc<dyn SyncObserverTrait>>) -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            children: RwLock::new(HashMap::new()),
            syncables: RwLock::new(HashMap::new()),
            finalization_locks: RwLock::new(HashMap::new()),
            last_completed: RwLock::new(HashMap::new()),
            observers,
        }
    }

    /// Inserts a pending node for the syncable, plus one pending child per
    /// dependent (recursively). Returns the root node id.
    pub fn create(&self, syncable: Arc<dyn Syncable>, window: SyncWindow) -> Result<String> {
        Ok(self.create_node(syncable, window, None))
    }

    fn create_node(
        &self,
        syncable: Arc<dyn Syncable>,
        window: SyncWindow,
        parent_id: Option<String>,
    ) -> String {
        let node = SyncNode::new(syncable.syncable_ref(), window, parent_id.clone());
        let node_id = node.id.clone();

        self.nodes
            .write()
            .unwrap()
            .insert(node_id.clone(), node);
        self.finalization_locks
            .write()
            .unwrap()
            .insert(node_id.clone(), Arc::new(Mutex::new(())));
        self.syncables
            .write()
            .unwrap()
            .insert(node_id.clone(), syncable.clone());
        if let Some(parent) = &parent_id {
            self.children
                .write()
                .unwrap()
                .entry(parent.clone())
                .or_default()
                .push(node_id.clone());
        }

        for dependent in syncable.dependents() {
            self.create_node(dependent, window, Some(node_id.clone()));
        }
        node_id
    }

    /// A snapshot of the node's current state.
    pub fn node(&self, node_id: &str) -> Result<SyncNode> {
        self.nodes
            .read()
            .unwrap()
            .get(node_id)
            .cloned()
            .ok_or_else(|| Error::Sync(SyncError::UnknownNode(node_id.to_string())))
    }

    /// Snapshots of every node targeting the given entity.
    pub fn nodes_for(&self, syncable: &SyncableRef) -> Vec<SyncNode> {
        self.nodes
            .read()
            .unwrap()
            .values()
            .filter(|n| &n.syncable == syncable)
            .cloned()
            .collect()
    }

    /// True while the entity has any non-terminal node. Advisory admission
    /// guard for callers; the machine itself accepts any create.
    pub fn has_active_node(&self, syncable: &SyncableRef) -> bool {
        self.nodes
            .read()
            .unwrap()
            .values()
            .any(|n| &n.syncable == syncable && !n.is_terminal())
    }

    /// Advisory admission guard: a new root sync should only start when the
    /// entity has no in-flight node.
    pub fn can_enqueue(&self, syncable: &SyncableRef) -> bool {
        !self.has_active_node(syncable)
    }

    /// Advisory admission guard: a same-day re-sync is redundant when the
    /// last completed sync already covers today's window.
    pub fn resync_redundant(&self, syncable: &SyncableRef, today: NaiveDate) -> bool {
        same_day_resync_redundant(
            self.last_completed.read().unwrap().get(syncable),
            today,
        )
    }

    /// Runs the whole tree: the root's own work first, then all children
    /// concurrently, finalizing bottom-up. Returns the root's final state.
    pub async fn execute(&self, root_id: &str) -> Result<SyncNode> {
        self.execute_subtree(root_id.to_string()).await?;
        self.node(root_id)
    }

    fn execute_subtree<'a>(&'a self, node_id: String) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.perform(&node_id).await?;
            let child_ids = self
                .children
                .read()
                .unwrap()
                .get(&node_id)
                .cloned()
                .unwrap_or_default();
            let results = join_all(
                child_ids
                    .into_iter()
                    .map(|child_id| self.execute_subtree(child_id)),
            )
            .await;
            results.into_iter().collect::<Result<Vec<_>>>()?;
            Ok(())
        })
    }

    /// Transitions the node to syncing, invokes the syncable's own sync
    /// entry point, records a failure with its message, and always attempts
    /// finalization - a failure must not leave the tree stuck.
    pub async fn perform(&self, node_id: &str) -> Result<()> {
        let (syncable, window) = {
            let nodes = self.nodes.read().unwrap();
            let node = nodes
                .get(node_id)
                .ok_or_else(|| Error::Sync(SyncError::UnknownNode(node_id.to_string())))?;
            let syncable = self
                .syncables
                .read()
                .unwrap()
                .get(node_id)
                .cloned()
                .ok_or_else(|| Error::Sync(SyncError::UnknownNode(node_id.to_string())))?;
            (syncable, node.window)
        };

        {
            let mut nodes = self.nodes.write().unwrap();
            let node = nodes
                .get_mut(node_id)
                .ok_or_else(|| Error::Sync(SyncError::UnknownNode(node_id.to_string())))?;
            if node.status != SyncNodeStatus::Pending {
                warn!(
                    "Sync node {} performed in status {:?}; ignoring",
                    node_id, node.status
                );
                return Ok(());
            }
            node.start();
        }
        debug!("Performing sync node {} ({})", node_id, syncable.syncable_ref());

        let result: Result<SyncOutcome> = syncable.sync(&window).await;

        {
            let mut nodes = self.nodes.write().unwrap();
            if let Some(node) = nodes.get_mut(node_id) {
                match &result {
                    Ok(outcome) => node.balance_as_of = outcome.balance_as_of,
                    Err(e) => {
                        error!("Sync node {} failed: {}", node_id, e);
                        node.fail(e.to_string());
                    }
                }
            }
        }

        self.attempt_finalization(node_id).await
    }

    /// Marks a node the caller wants to give up on as failed and re-attempts
    /// finalization, exactly as with any other failure.
    pub async fn abandon(&self, node_id: &str, reason: &str) -> Result<()> {
        {
            let mut nodes = self.nodes.write().unwrap();
            let node = nodes
                .get_mut(node_id)
                .ok_or_else(|| Error::Sync(SyncError::UnknownNode(node_id.to_string())))?;
            node.fail(format!("abandoned: {}", reason));
        }
        self.attempt_finalization(node_id).await
    }

    /// Walks from the node up the parent chain. At each step, under that
    /// node's lock: no-op while any child is non-terminal; otherwise the
    /// node finalizes (`Failed` if its own run or any child failed, else
    /// `Completed`) and the post-sync hook fires exactly once.
    pub async fn attempt_finalization(&self, node_id: &str) -> Result<()> {
        let mut current = Some(node_id.to_string());

        while let Some(id) = current.take() {
            let lock = self
                .finalization_locks
                .read()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| Error::Sync(SyncError::UnknownNode(id.clone())))?;
            let _guard = lock.lock().await;

            match self.finalization_step(&id)? {
                FinalizationStep::NotReady => break,
                FinalizationStep::Finalized {
                    hook,
                    parent_id,
                    completed_window,
                } => {
                    if let Some((syncable, window)) = completed_window {
                        self.last_completed
                            .write()
                            .unwrap()
                            .insert(syncable, window);
                    }
                    if let Some(payload) = hook {
                        self.fire_hook(payload).await;
                    }
                    current = parent_id;
                }
            }
        }
        Ok(())
    }

    /// The pure finalization decision over the node and its children's
    /// statuses. Called with the node's finalization lock held.
    fn finalization_step(&self, node_id: &str) -> Result<FinalizationStep> {
        let child_ids = self
            .children
            .read()
            .unwrap()
            .get(node_id)
            .cloned()
            .unwrap_or_default();

        let mut nodes = self.nodes.write().unwrap();

        let mut any_child_failed = false;
        for child_id in &child_ids {
            match nodes.get(child_id) {
                Some(child) if child.is_terminal() => {
                    any_child_failed |= child.status == SyncNodeStatus::Failed;
                }
                Some(_) => return Ok(FinalizationStep::NotReady),
                None => return Err(Error::Sync(SyncError::UnknownNode(child_id.clone()))),
            }
        }

        let node = nodes
            .get_mut(node_id)
            .ok_or_else(|| Error::Sync(SyncError::UnknownNode(node_id.to_string())))?;

        match node.status {
            // Not started yet; children finishing first must not finalize it.
            SyncNodeStatus::Pending => return Ok(FinalizationStep::NotReady),
            SyncNodeStatus::Syncing => {
                if any_child_failed {
                    node.fail("one or more child syncs failed".to_string());
                } else {
                    node.complete();
                }
                debug!("Sync node {} finalized as {:?}", node.id, node.status);
            }
            // Already terminal (own-run failure or a racing sibling);
            // nothing to decide, but propagation continues.
            SyncNodeStatus::Completed | SyncNodeStatus::Failed => {}
        }

        let hook = if node.hook_fired {
            None
        } else {
            node.hook_fired = true;
            Some(HookPayload {
                syncable: node.syncable.clone(),
                status: node.status,
                balance_as_of: node.balance_as_of,
                error: node.error.clone(),
            })
        };

        let completed_window = (node.status == SyncNodeStatus::Completed)
            .then(|| (node.syncable.clone(), node.window));

        Ok(FinalizationStep::Finalized {
            hook,
            parent_id: node.parent_id.clone(),
            completed_window,
        })
    }

    async fn fire_hook(&self, payload: HookPayload) {
        for observer in &self.observers {
            observer
                .on_sync_completed(
                    &payload.syncable,
                    payload.status,
                    payload.balance_as_of,
                    payload.error.as_deref(),
                )
                .await;
        }
    }
}

/// Caller-side guard: true when the last completed sync already covers
/// today's window, making a same-day re-sync redundant.
pub fn same_day_resync_redundant(
    last_completed: Option<&SyncWindow>,
    today: NaiveDate,
) -> bool {
    last_completed.map(|w| w.covers(today)).unwrap_or(false)
}
