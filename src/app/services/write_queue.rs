use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Intent to persist a content snapshot to a bound path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub path: PathBuf,
    pub content: String,
    /// Document revision the snapshot was taken at.
    pub revision: u64,
    /// Document generation (bumped on every load) the snapshot belongs to.
    pub generation: u64,
}

/// Result of a save request, reported back from the autosave worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub revision: u64,
    pub generation: u64,
    pub result: Result<(), String>,
}

impl SaveOutcome {
    pub fn for_request(request: &SaveRequest, result: Result<(), String>) -> Self {
        Self {
            path: request.path.clone(),
            revision: request.revision,
            generation: request.generation,
            result,
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    /// Content of the write currently running.
    in_flight: Option<String>,
    pending: Option<SaveRequest>,
}

/// Per-path write queue of depth 1.
///
/// At most one write per path is in flight. Requests submitted meanwhile
/// collapse into a single pending slot holding the newest snapshot, which is
/// released when the in-flight write completes. An older snapshot can
/// therefore never land on disk after a newer one.
#[derive(Debug, Default)]
pub struct WriteQueue {
    slots: HashMap<PathBuf, Slot>,
}

impl WriteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request. Returns it back when the path is idle and the caller
    /// should dispatch it now; otherwise it replaces the pending slot.
    pub fn submit(&mut self, request: SaveRequest) -> Option<SaveRequest> {
        let slot = self.slots.entry(request.path.clone()).or_default();
        if slot.in_flight.is_some() {
            if let Some(dropped) = slot.pending.replace(request) {
                tracing::trace!(
                    target: "autosave",
                    file = %dropped.path.display(),
                    revision = dropped.revision,
                    "superseded_pending_write"
                );
            }
            None
        } else {
            slot.in_flight = Some(request.content.clone());
            Some(request)
        }
    }

    /// Mark the in-flight write for `path` as finished. Returns the pending
    /// request to dispatch next, if any.
    pub fn complete(&mut self, path: &Path) -> Option<SaveRequest> {
        let slot = self.slots.get_mut(path)?;
        match slot.pending.take() {
            Some(next) => {
                slot.in_flight = Some(next.content.clone());
                Some(next)
            }
            None => {
                self.slots.remove(path);
                None
            }
        }
    }

    pub fn is_busy(&self, path: &Path) -> bool {
        self.slots.get(path).is_some_and(|s| s.in_flight.is_some())
    }

    /// What `path` will hold once its queued writes land: the pending
    /// snapshot if there is one, else the write in flight.
    pub fn latest_content(&self, path: &Path) -> Option<&str> {
        let slot = self.slots.get(path)?;
        match &slot.pending {
            Some(next) => Some(&next.content),
            None => slot.in_flight.as_deref(),
        }
    }

    /// Drop every queued-but-not-dispatched request.
    pub fn clear_pending(&mut self) {
        for slot in self.slots.values_mut() {
            slot.pending = None;
        }
    }
}
