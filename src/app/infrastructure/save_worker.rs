use std::sync::mpsc;
use std::thread::JoinHandle;

use crate::app::controllers::session::SaveDispatcher;
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::services::gateway::TextStore;
use crate::app::services::write_queue::{SaveOutcome, SaveRequest};

/// Background thread that performs autosave writes in arrival order and
/// reports each outcome through `on_done`.
pub struct SaveWorker {
    tx: Option<mpsc::Sender<SaveRequest>>,
    handle: Option<JoinHandle<()>>,
}

impl SaveWorker {
    pub fn spawn<S, F>(store: S, on_done: F) -> Result<Self>
    where
        S: TextStore + Send + 'static,
        F: Fn(SaveOutcome) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SaveRequest>();
        let handle = std::thread::Builder::new()
            .name("autosave".to_string())
            .spawn(move || {
                for request in rx {
                    let result = store
                        .write_text(&request.path, &request.content)
                        .map_err(|e| e.to_string());
                    on_done(SaveOutcome::for_request(&request, result));
                }
                tracing::debug!(target: "autosave", "worker stopped");
            })?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Stop accepting requests and wait until queued writes are done.
    pub fn shutdown(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!(target: "autosave", "worker thread panicked");
            }
        }
    }

    fn send(&self, request: SaveRequest) -> Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| AppError::Worker("worker already shut down".to_string()))?;
        tx.send(request)
            .map_err(|e| AppError::Worker(format!("request for {} dropped", e.0.path.display())))
    }
}

impl SaveDispatcher for SaveWorker {
    fn dispatch(&mut self, request: SaveRequest) {
        if let Err(e) = self.send(request) {
            tracing::warn!(target: "autosave", error = %e, "could not queue autosave");
        }
    }
}

impl Drop for SaveWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
