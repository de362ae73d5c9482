use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::event::{AppEvent, DataKind, EventSender, Loaded};
use crate::storage::{self, StorageError};

fn load(kind: DataKind, data_dir: &Path) -> Result<Loaded, StorageError> {
    match kind {
        DataKind::Requests => storage::load_groups(data_dir).map(Loaded::Requests),
        DataKind::Environments => storage::load_environments(data_dir).map(Loaded::Environments),
    }
}

/// Runs loads off the UI thread. Each kind keeps a generation counter so a
/// slow earlier load can never overwrite the result of a later one.
pub struct Loader {
    data_dir: PathBuf,
    requests: Arc<AtomicU64>,
    environments: Arc<AtomicU64>,
}

impl Loader {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            requests: Arc::default(),
            environments: Arc::default(),
        }
    }

    fn generation(&self, kind: DataKind) -> &Arc<AtomicU64> {
        match kind {
            DataKind::Requests => &self.requests,
            DataKind::Environments => &self.environments,
        }
    }

    /// Reads `kind` from disk and posts the outcome to the queue, unless a
    /// newer reload of the same kind was started in the meantime. Stops
    /// quietly once the queue has closed.
    pub fn reload(&self, kind: DataKind, tx: EventSender) -> JoinHandle<()> {
        let counter = Arc::clone(self.generation(kind));
        let generation = counter.fetch_add(1, Ordering::SeqCst) + 1;
        let data_dir = self.data_dir.clone();

        tokio::spawn(async move {
            if tx.is_closed() {
                return;
            }
            let started = std::time::Instant::now();
            let result = tokio::task::spawn_blocking(move || load(kind, &data_dir)).await;

            let event = match result {
                Ok(Ok(loaded)) => {
                    tracing::debug!(
                        %kind,
                        generation,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "loaded"
                    );
                    AppEvent::Loaded(loaded)
                }
                Ok(Err(e)) => {
                    tracing::warn!(%kind, error = %e, "load failed");
                    AppEvent::Error(format!("loading {}: {}", kind, e))
                }
                Err(e) => AppEvent::Error(format!("loading {}: {}", kind, e)),
            };

            if counter.load(Ordering::SeqCst) != generation {
                tracing::debug!(%kind, generation, "superseded, dropping load result");
                return;
            }
            if tx.send(event).is_err() {
                tracing::debug!(%kind, "queue closed, dropping load result");
            }
        })
    }
}
