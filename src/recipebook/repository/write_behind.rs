//! Write-behind worker.
//!
//! Store writes are queued on an unbounded channel and applied by a single
//! task, so callers never wait on I/O and writes land in call order. Failed
//! writes are logged and counted; nothing is retried or rolled back.

use crate::model::{Recipe, RecipeId};
use crate::store::PersistentStore;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Cumulative outcome of the writes applied so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub applied: usize,
    pub failed: usize,
}

pub(crate) enum StoreOp {
    Put(Recipe),
    Delete(RecipeId),
    Flush(oneshot::Sender<WriteStats>),
}

pub(crate) struct WriteBehind {
    tx: mpsc::UnboundedSender<StoreOp>,
    handle: JoinHandle<WriteStats>,
}

impl WriteBehind {
    /// Start the worker. Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn PersistentStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(store, rx));
        Self { tx, handle }
    }

    pub fn put(&self, recipe: Recipe) {
        self.submit(StoreOp::Put(recipe));
    }

    pub fn delete(&self, id: RecipeId) {
        self.submit(StoreOp::Delete(id));
    }

    fn submit(&self, op: StoreOp) {
        if self.tx.send(op).is_err() {
            tracing::error!("Write-behind worker is gone; store write dropped");
        }
    }

    /// Wait until every write queued before this call has been applied.
    pub async fn flush(&self) -> WriteStats {
        let (done, wait) = oneshot::channel();
        self.submit(StoreOp::Flush(done));
        wait.await.unwrap_or_else(|_| {
            tracing::error!("Write-behind worker stopped before flushing");
            WriteStats::default()
        })
    }

    /// Drain the queue and stop the worker.
    pub async fn shutdown(self) -> WriteStats {
        let Self { tx, handle } = self;
        drop(tx);
        handle.await.unwrap_or_else(|e| {
            tracing::error!("Write-behind worker failed: {}", e);
            WriteStats::default()
        })
    }
}

async fn run(
    store: Arc<dyn PersistentStore>,
    mut rx: mpsc::UnboundedReceiver<StoreOp>,
) -> WriteStats {
    let mut stats = WriteStats::default();

    while let Some(op) = rx.recv().await {
        let outcome = match op {
            StoreOp::Put(recipe) => store.put(&recipe).await.map(|_| {
                tracing::debug!("Saved recipe {} to store", recipe.id);
            }),
            StoreOp::Delete(id) => store.delete(&id).await.map(|_| {
                tracing::debug!("Deleted recipe {} from store", id);
            }),
            StoreOp::Flush(done) => {
                let _ = done.send(stats);
                continue;
            }
        };

        match outcome {
            Ok(()) => stats.applied += 1,
            Err(e) => {
                stats.failed += 1;
                tracing::error!("{}", e);
            }
        }
    }

    stats
}
