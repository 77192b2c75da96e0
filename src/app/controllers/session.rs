//! File session and autosave lifecycle.
//!
//! `SessionController` is the single authority over which document is open,
//! where it lives on disk, and whether it is saved. It never touches widgets
//! or the filesystem directly: every side effect goes through the borrowed
//! `SessionPorts`, and time is passed in by the caller.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::app::domain::document::{Document, PLACEHOLDER_TEMPLATE};
use crate::app::domain::settings::AppSettings;
use crate::app::infrastructure::error::Result;
use crate::app::services::deferred::DeferredTask;
use crate::app::services::events::{EventBus, Listener, MenuSignal};
use crate::app::services::file_filters::MARKDOWN;
use crate::app::services::gateway::{FilePicker, TextStore};
use crate::app::services::write_queue::{SaveOutcome, SaveRequest, WriteQueue};

/// The markdown editing widget, seen from the controller.
///
/// `set_content` is the load-time push. Implementations must not report the
/// pushed text back as a user edit.
pub trait EditingSurface {
    fn set_content(&mut self, text: &str);
}

/// Hands autosave requests to whatever performs the write.
/// The outcome comes back later through `SessionController::on_save_finished`.
pub trait SaveDispatcher {
    fn dispatch(&mut self, request: SaveRequest);
}

/// Borrowed collaborators needed by session operations.
pub struct SessionPorts<'a> {
    pub picker: &'a mut dyn FilePicker,
    pub store: &'a dyn TextStore,
    pub surface: &'a mut dyn EditingSurface,
    pub saver: &'a mut dyn SaveDispatcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No file bound; edits stay in memory.
    UnsavedNew,
    BoundClean,
    /// Edits waiting for the quiet window, or a failed write waiting for the next edit.
    BoundDirtyPending,
    BoundSaving,
}

pub struct SessionController {
    document: Document,
    autosave: DeferredTask,
    notification: DeferredTask,
    writes: WriteQueue,
    default_file_name: String,
}

impl SessionController {
    pub fn new(settings: &AppSettings) -> Self {
        Self::with_timing(
            settings.autosave_delay(),
            settings.notification_duration(),
            &settings.default_file_name,
        )
    }

    pub fn with_timing(autosave_delay: Duration, notification: Duration, default_file_name: &str) -> Self {
        Self {
            document: Document::default(),
            autosave: DeferredTask::new(autosave_delay),
            notification: DeferredTask::new(notification),
            writes: WriteQueue::new(),
            default_file_name: default_file_name.to_string(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn state(&self) -> SessionState {
        let Some(path) = self.document.path() else {
            return SessionState::UnsavedNew;
        };
        if self.autosave.is_pending() {
            SessionState::BoundDirtyPending
        } else if self.writes.is_busy(path) {
            SessionState::BoundSaving
        } else if self.document.is_dirty() {
            SessionState::BoundDirtyPending
        } else {
            SessionState::BoundClean
        }
    }

    pub fn notification_visible(&self) -> bool {
        self.notification.is_pending()
    }

    /// Earliest instant at which `poll` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.autosave.deadline(), self.notification.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // --- Loading ---

    /// Ask for a markdown file and load it. Returns true if a file was loaded.
    pub fn open_existing(&mut self, ports: &mut SessionPorts) -> bool {
        let Some(path) = ports.picker.pick_open(&MARKDOWN) else {
            tracing::debug!(target: "session", "open cancelled");
            return false;
        };
        self.open_path(ports, path)
    }

    /// Load `path` into the session. Read failures leave the session untouched.
    ///
    /// When writes to `path` are still queued, the newest queued text is
    /// loaded instead of the disk, which is about to be overwritten with it.
    pub fn open_path(&mut self, ports: &mut SessionPorts, path: PathBuf) -> bool {
        // Edits still inside the quiet window belong to the bound file.
        self.flush_autosave(ports.saver);

        if let Some(queued) = self.writes.latest_content(&path) {
            let content = queued.to_string();
            tracing::info!(target: "session", file = %path.display(), size_bytes = content.len(), "opened behind queued write");
            self.load_behind_queue(ports, path, content);
            return true;
        }

        match ports.store.read_text(&path) {
            Ok(content) => {
                tracing::info!(target: "session", file = %path.display(), size_bytes = content.len(), "opened");
                self.load(ports, path, content);
                true
            }
            Err(e) => {
                tracing::warn!(target: "session", file = %path.display(), error = %e, "failed to read file");
                false
            }
        }
    }

    /// Ask for a save location, write the placeholder there, then load it.
    pub fn create_new(&mut self, ports: &mut SessionPorts) -> bool {
        let Some(chosen) = ports.picker.pick_save(&MARKDOWN, &self.default_file_name) else {
            tracing::debug!(target: "session", "new file cancelled");
            return false;
        };
        let path = MARKDOWN.with_default_extension(chosen);
        self.flush_autosave(ports.saver);

        // A direct write could be overtaken by the one already running.
        if self.writes.is_busy(&path) {
            tracing::info!(target: "session", file = %path.display(), "created behind queued write");
            self.load_behind_queue(ports, path, PLACEHOLDER_TEMPLATE.to_string());
            return true;
        }

        if let Err(e) = ports.store.write_text(&path, PLACEHOLDER_TEMPLATE) {
            tracing::warn!(target: "session", file = %path.display(), error = %e, "failed to create file");
            return false;
        }
        tracing::info!(target: "session", file = %path.display(), "created");
        self.load(ports, path, PLACEHOLDER_TEMPLATE.to_string());
        true
    }

    fn load(&mut self, ports: &mut SessionPorts, path: PathBuf, content: String) {
        self.document.load(path, content);
        self.sync_editing_surface(ports.surface);
    }

    /// Load content that still has to reach disk and queue it behind the
    /// writes already pending for that path.
    fn load_behind_queue(&mut self, ports: &mut SessionPorts, path: PathBuf, content: String) {
        self.document.load_unsaved(path, content);
        self.submit_snapshot(ports.saver);
        self.sync_editing_surface(ports.surface);
    }

    /// Push the document into the surface. Load paths only.
    fn sync_editing_surface(&self, surface: &mut dyn EditingSurface) {
        surface.set_content(self.document.content());
    }

    // --- Editing ---

    /// A user edit from the surface: the only writer of content while editing.
    pub fn on_surface_change(&mut self, content: String, now: Instant) {
        if !self.document.apply_edit(content) {
            return;
        }
        if self.document.is_bound() {
            self.autosave.schedule(now);
        }
    }

    pub fn on_surface_error(&self, message: &str) {
        tracing::warn!(target: "surface", error = message, "editing surface reported an error");
    }

    // --- Autosave ---

    /// Run whatever timers are due at `now`.
    pub fn poll(&mut self, saver: &mut dyn SaveDispatcher, now: Instant) {
        if self.autosave.fire_if_due(now) {
            self.submit_snapshot(saver);
        }
        if self.notification.fire_if_due(now) {
            tracing::trace!(target: "autosave", "notification cleared");
        }
    }

    fn flush_autosave(&mut self, saver: &mut dyn SaveDispatcher) {
        if self.autosave.cancel() {
            self.submit_snapshot(saver);
        }
    }

    fn submit_snapshot(&mut self, saver: &mut dyn SaveDispatcher) {
        let Some(path) = self.document.path() else {
            return;
        };
        let request = SaveRequest {
            path: path.to_path_buf(),
            content: self.document.content().to_string(),
            revision: self.document.revision(),
            generation: self.document.generation(),
        };
        tracing::debug!(target: "autosave", file = %request.path.display(), revision = request.revision, "autosave requested");
        if let Some(ready) = self.writes.submit(request) {
            saver.dispatch(ready);
        }
    }

    /// A write finished. Releases the next queued write for that path.
    pub fn on_save_finished(&mut self, outcome: SaveOutcome, saver: &mut dyn SaveDispatcher, now: Instant) {
        if let Some(next) = self.writes.complete(&outcome.path) {
            saver.dispatch(next);
        }
        match outcome.result {
            Ok(()) => {
                self.document.mark_saved(outcome.generation, outcome.revision);
                self.notification.schedule(now);
                tracing::info!(target: "autosave", file = %outcome.path.display(), revision = outcome.revision, "saved");
            }
            Err(e) => {
                tracing::warn!(target: "autosave", file = %outcome.path.display(), error = %e, "autosave failed");
            }
        }
    }

    /// Synchronously write unsaved content of the bound file before exit.
    ///
    /// Must run after the autosave worker has drained, so nothing older can
    /// land afterwards. Returns whether a write happened.
    pub fn flush_on_exit(&mut self, store: &dyn TextStore) -> Result<bool> {
        self.autosave.cancel();
        self.writes.clear_pending();
        let Some(path) = self.document.path() else {
            return Ok(false);
        };
        if !self.document.is_dirty() {
            return Ok(false);
        }
        store.write_text(path, self.document.content())?;
        let (generation, revision) = (self.document.generation(), self.document.revision());
        self.document.mark_saved(generation, revision);
        Ok(true)
    }
}

/// Menu signal subscriptions held for the lifetime of a session.
/// Dropping it releases both listeners.
pub struct SessionBindings {
    _open: Listener,
    _new: Listener,
}

impl SessionBindings {
    pub fn bind(
        bus: &EventBus<MenuSignal>,
        on_open: impl FnMut() + 'static,
        on_new: impl FnMut() + 'static,
    ) -> Self {
        Self {
            _open: bus.listen(MenuSignal::OpenFile, on_open),
            _new: bus.listen(MenuSignal::NewFile, on_new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::path::Path;
    use std::rc::Rc;

    use crate::app::infrastructure::error::AppError;
    use crate::app::services::file_filters::FileFilter;

    const DELAY: Duration = Duration::from_secs(1);
    const NOTIFY: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct FakePicker {
        opens: VecDeque<Option<PathBuf>>,
        saves: VecDeque<Option<PathBuf>>,
        suggested_names: Vec<String>,
        filters: Vec<FileFilter>,
    }

    impl FilePicker for FakePicker {
        fn pick_open(&mut self, filter: &FileFilter) -> Option<PathBuf> {
            self.filters.push(*filter);
            self.opens.pop_front().flatten()
        }

        fn pick_save(&mut self, filter: &FileFilter, default_name: &str) -> Option<PathBuf> {
            self.filters.push(*filter);
            self.suggested_names.push(default_name.to_string());
            self.saves.pop_front().flatten()
        }
    }

    #[derive(Default)]
    struct MemStore {
        files: RefCell<HashMap<PathBuf, String>>,
        unwritable: HashSet<PathBuf>,
        writes: Cell<usize>,
    }

    impl MemStore {
        fn with_file(path: &str, content: &str) -> Self {
            let store = Self::default();
            store.files.borrow_mut().insert(PathBuf::from(path), content.to_string());
            store
        }

        fn file(&self, path: &str) -> Option<String> {
            self.files.borrow().get(Path::new(path)).cloned()
        }
    }

    impl TextStore for MemStore {
        fn read_text(&self, path: &Path) -> Result<String> {
            self.files.borrow().get(path).cloned().ok_or_else(|| {
                AppError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"))
            })
        }

        fn write_text(&self, path: &Path, text: &str) -> Result<()> {
            if self.unwritable.contains(path) {
                return Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            self.writes.set(self.writes.get() + 1);
            self.files.borrow_mut().insert(path.to_path_buf(), text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeSurface {
        pushes: Vec<String>,
    }

    impl EditingSurface for FakeSurface {
        fn set_content(&mut self, text: &str) {
            self.pushes.push(text.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingSaver {
        requests: Vec<SaveRequest>,
    }

    impl SaveDispatcher for RecordingSaver {
        fn dispatch(&mut self, request: SaveRequest) {
            self.requests.push(request);
        }
    }

    struct Harness {
        session: SessionController,
        picker: FakePicker,
        store: MemStore,
        surface: FakeSurface,
        saver: RecordingSaver,
        t0: Instant,
    }

    impl Harness {
        fn new(store: MemStore) -> Self {
            Self {
                session: SessionController::with_timing(DELAY, NOTIFY, "default.md"),
                picker: FakePicker::default(),
                store,
                surface: FakeSurface::default(),
                saver: RecordingSaver::default(),
                t0: Instant::now(),
            }
        }

        fn at(&self, millis: u64) -> Instant {
            self.t0 + Duration::from_millis(millis)
        }

        fn open(&mut self, pick: Option<&str>) -> bool {
            self.picker.opens.push_back(pick.map(PathBuf::from));
            let mut ports = SessionPorts {
                picker: &mut self.picker,
                store: &self.store,
                surface: &mut self.surface,
                saver: &mut self.saver,
            };
            self.session.open_existing(&mut ports)
        }

        fn create(&mut self, pick: Option<&str>) -> bool {
            self.picker.saves.push_back(pick.map(PathBuf::from));
            let mut ports = SessionPorts {
                picker: &mut self.picker,
                store: &self.store,
                surface: &mut self.surface,
                saver: &mut self.saver,
            };
            self.session.create_new(&mut ports)
        }

        fn edit(&mut self, text: &str, millis: u64) {
            let now = self.at(millis);
            self.session.on_surface_change(text.to_string(), now);
        }

        fn poll(&mut self, millis: u64) {
            let now = self.at(millis);
            self.session.poll(&mut self.saver, now);
        }

        /// Complete the oldest dispatched-but-unfinished request.
        fn finish(&mut self, index: usize, result: std::result::Result<(), String>, millis: u64) {
            let outcome = SaveOutcome::for_request(&self.saver.requests[index], result);
            let now = self.at(millis);
            self.session.on_save_finished(outcome, &mut self.saver, now);
        }
    }

    #[test]
    fn test_open_scenario_then_single_autosave() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        assert!(h.open(Some("notes.md")));

        assert_eq!(h.session.document().content(), "# Hi");
        assert_eq!(h.session.document().path(), Some(Path::new("notes.md")));
        assert_eq!(h.surface.pushes, vec!["# Hi".to_string()]);
        assert_eq!(h.picker.filters, vec![MARKDOWN]);
        assert_eq!(h.session.state(), SessionState::BoundClean);

        h.edit("# Hi there", 0);
        h.poll(999);
        assert!(h.saver.requests.is_empty());
        h.poll(1000);
        h.poll(5000);

        assert_eq!(h.saver.requests.len(), 1);
        assert_eq!(h.saver.requests[0].path, PathBuf::from("notes.md"));
        assert_eq!(h.saver.requests[0].content, "# Hi there");
    }

    #[test]
    fn test_burst_within_window_writes_last_content_once() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        h.open(Some("notes.md"));

        for (i, text) in ["# H", "# Ha", "# Hal", "# Hall", "# Hallo"].iter().enumerate() {
            h.edit(text, i as u64 * 300);
            h.poll(i as u64 * 300 + 200);
        }
        assert!(h.saver.requests.is_empty());
        assert_eq!(h.session.state(), SessionState::BoundDirtyPending);

        // Last edit at 1200ms; quiet window ends at 2200ms.
        h.poll(2199);
        assert!(h.saver.requests.is_empty());
        h.poll(2200);
        assert_eq!(h.saver.requests.len(), 1);
        assert_eq!(h.saver.requests[0].content, "# Hallo");
        assert_eq!(h.session.state(), SessionState::BoundSaving);
    }

    #[test]
    fn test_unbound_document_never_writes() {
        let mut h = Harness::new(MemStore::default());
        for i in 0..50 {
            h.edit(&format!("draft {}", i), i * 10);
        }
        h.poll(60_000);

        assert!(h.saver.requests.is_empty());
        assert_eq!(h.store.writes.get(), 0);
        assert_eq!(h.session.next_deadline(), None);
        assert_eq!(h.session.document().content(), "draft 49");
        assert_eq!(h.session.state(), SessionState::UnsavedNew);
    }

    #[test]
    fn test_create_new_scenario() {
        let mut h = Harness::new(MemStore::default());
        assert!(h.create(Some("/docs/default.md")));

        assert_eq!(h.picker.suggested_names, vec!["default.md".to_string()]);
        assert_eq!(h.store.file("/docs/default.md").as_deref(), Some(PLACEHOLDER_TEMPLATE));
        assert_eq!(h.session.document().path(), Some(Path::new("/docs/default.md")));
        assert_eq!(h.session.document().content(), PLACEHOLDER_TEMPLATE);
        assert_eq!(h.surface.pushes, vec![PLACEHOLDER_TEMPLATE.to_string()]);
        assert_eq!(h.session.state(), SessionState::BoundClean);
    }

    #[test]
    fn test_create_new_appends_missing_extension() {
        let mut h = Harness::new(MemStore::default());
        assert!(h.create(Some("/docs/journal")));
        assert_eq!(h.session.document().path(), Some(Path::new("/docs/journal.md")));
        assert!(h.store.file("/docs/journal.md").is_some());
    }

    #[test]
    fn test_create_new_cancelled_changes_nothing() {
        let mut h = Harness::new(MemStore::default());
        h.edit("draft", 0);
        assert!(!h.create(None));

        assert_eq!(h.session.document().content(), "draft");
        assert!(h.session.document().path().is_none());
        assert_eq!(h.store.writes.get(), 0);
        assert!(h.surface.pushes.is_empty());
    }

    #[test]
    fn test_create_new_write_failure_keeps_state() {
        let mut store = MemStore::default();
        store.unwritable.insert(PathBuf::from("/ro/default.md"));
        let mut h = Harness::new(store);
        h.edit("draft", 0);

        assert!(!h.create(Some("/ro/default.md")));
        assert_eq!(h.session.document().content(), "draft");
        assert!(h.session.document().path().is_none());
        assert!(h.surface.pushes.is_empty());
    }

    #[test]
    fn test_open_cancelled_changes_nothing() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        h.open(Some("notes.md"));
        h.edit("# Hi!", 0);

        assert!(!h.open(None));
        assert_eq!(h.session.document().content(), "# Hi!");
        assert_eq!(h.session.document().path(), Some(Path::new("notes.md")));
        assert_eq!(h.surface.pushes.len(), 1);
        // The pending autosave is still armed.
        assert_eq!(h.session.state(), SessionState::BoundDirtyPending);
    }

    #[test]
    fn test_open_read_failure_changes_nothing() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        h.open(Some("notes.md"));

        assert!(!h.open(Some("missing.md")));
        assert_eq!(h.session.document().content(), "# Hi");
        assert_eq!(h.session.document().path(), Some(Path::new("notes.md")));
        assert_eq!(h.surface.pushes.len(), 1);
    }

    #[test]
    fn test_notification_lasts_five_seconds_and_restarts() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        h.open(Some("notes.md"));
        h.edit("one", 0);
        h.poll(1000);
        h.finish(0, Ok(()), 1100);

        assert!(h.session.notification_visible());
        assert_eq!(h.session.state(), SessionState::BoundClean);
        h.poll(2000);
        assert!(h.session.notification_visible());

        // Second save inside the window restarts it instead of stacking.
        h.edit("two", 3000);
        h.poll(4000);
        h.finish(1, Ok(()), 4100);
        h.poll(6100);
        assert!(h.session.notification_visible());
        h.poll(9099);
        assert!(h.session.notification_visible());
        h.poll(9100);
        assert!(!h.session.notification_visible());
        assert_eq!(h.session.next_deadline(), None);
    }

    #[test]
    fn test_failed_write_keeps_content_without_retry() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        h.open(Some("notes.md"));
        h.edit("unsaved work", 0);
        h.poll(1000);
        h.finish(0, Err("disk full".to_string()), 1050);

        assert!(!h.session.notification_visible());
        assert_eq!(h.session.document().content(), "unsaved work");
        assert_eq!(h.session.state(), SessionState::BoundDirtyPending);

        h.poll(30_000);
        assert_eq!(h.saver.requests.len(), 1);

        // The next edit schedules a fresh attempt.
        h.edit("unsaved work!", 31_000);
        h.poll(32_000);
        assert_eq!(h.saver.requests.len(), 2);
        assert_eq!(h.saver.requests[1].content, "unsaved work!");
    }

    #[test]
    fn test_writes_to_one_path_are_serialized() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        h.open(Some("notes.md"));

        h.edit("v1", 0);
        h.poll(1000);
        assert_eq!(h.saver.requests.len(), 1);

        // Two more bursts while v1 is still being written.
        h.edit("v2", 1200);
        h.poll(2200);
        h.edit("v3", 2400);
        h.poll(3400);
        assert_eq!(h.saver.requests.len(), 1);
        assert_eq!(h.session.state(), SessionState::BoundSaving);

        h.finish(0, Ok(()), 3500);
        assert_eq!(h.saver.requests.len(), 2);
        assert_eq!(h.saver.requests[1].content, "v3");
        assert!(h.session.document().is_dirty());

        h.finish(1, Ok(()), 3600);
        assert_eq!(h.saver.requests.len(), 2);
        assert_eq!(h.session.state(), SessionState::BoundClean);
    }

    #[test]
    fn test_open_flushes_pending_edits_of_previous_file() {
        let store = MemStore::with_file("a.md", "A");
        store.files.borrow_mut().insert(PathBuf::from("b.md"), "B".to_string());
        let mut h = Harness::new(store);
        h.open(Some("a.md"));
        h.edit("A edited", 0);

        assert!(h.open(Some("b.md")));
        assert_eq!(h.saver.requests.len(), 1);
        assert_eq!(h.saver.requests[0].path, PathBuf::from("a.md"));
        assert_eq!(h.saver.requests[0].content, "A edited");
        assert_eq!(h.session.document().content(), "B");
        assert_eq!(h.session.state(), SessionState::BoundClean);
    }

    #[test]
    fn test_stale_completion_does_not_clean_new_document() {
        let store = MemStore::with_file("a.md", "A");
        store.files.borrow_mut().insert(PathBuf::from("b.md"), "B".to_string());
        let mut h = Harness::new(store);
        h.open(Some("a.md"));
        h.edit("A1", 0);
        h.poll(1000);

        h.open(Some("b.md"));
        h.edit("B1", 1100);
        h.finish(0, Ok(()), 1200);

        assert!(h.session.document().is_dirty());
        assert_eq!(h.session.state(), SessionState::BoundDirtyPending);
    }

    #[test]
    fn test_open_from_any_state_binds_the_file() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        assert_eq!(h.session.state(), SessionState::UnsavedNew);
        h.open(Some("notes.md"));
        h.edit("x", 0);
        h.poll(1000);
        assert_eq!(h.session.state(), SessionState::BoundSaving);

        // "x" is still being written, so it is what the file is about to hold.
        h.open(Some("notes.md"));
        assert_eq!(h.session.document().content(), "x");
        assert_eq!(h.session.state(), SessionState::BoundSaving);

        h.finish(0, Ok(()), 1100);
        assert_eq!(h.saver.requests.len(), 2);
        h.finish(1, Ok(()), 1200);
        assert_eq!(h.session.state(), SessionState::BoundClean);
    }

    /// Complete every dispatched write in order, applying it to the store.
    fn drain_writes(h: &mut Harness, millis: u64) {
        let mut done = 0;
        while done < h.saver.requests.len() {
            let request = h.saver.requests[done].clone();
            let result = h.store.write_text(&request.path, &request.content).map_err(|e| e.to_string());
            h.finish(done, result, millis);
            done += 1;
        }
    }

    #[test]
    fn test_reopen_bound_file_with_pending_edits_keeps_them() {
        let mut h = Harness::new(MemStore::with_file("/docs/a.md", "A"));
        h.open(Some("/docs/a.md"));
        h.edit("A edited", 0);

        assert!(h.open(Some("/docs/a.md")));
        assert_eq!(h.session.document().content(), "A edited");
        assert_eq!(h.surface.pushes.last().map(String::as_str), Some("A edited"));

        drain_writes(&mut h, 500);
        assert_eq!(h.store.file("/docs/a.md").as_deref(), Some("A edited"));
        assert_eq!(h.session.document().content(), "A edited");
        assert!(!h.session.document().is_dirty());
    }

    #[test]
    fn test_create_over_bound_file_with_pending_edits_writes_placeholder_last() {
        let mut h = Harness::new(MemStore::with_file("/docs/a.md", "A"));
        h.open(Some("/docs/a.md"));
        h.edit("A edited", 0);

        assert!(h.create(Some("/docs/a.md")));
        assert_eq!(h.session.document().content(), PLACEHOLDER_TEMPLATE);
        // Not clean until the placeholder is actually on disk.
        assert_eq!(h.session.state(), SessionState::BoundSaving);

        drain_writes(&mut h, 500);
        assert_eq!(h.store.file("/docs/a.md").as_deref(), Some(PLACEHOLDER_TEMPLATE));
        assert_eq!(h.session.document().content(), PLACEHOLDER_TEMPLATE);
        assert!(!h.session.document().is_dirty());
        assert_eq!(h.session.state(), SessionState::BoundClean);
    }

    #[test]
    fn test_create_over_file_being_written_waits_for_that_write() {
        let mut h = Harness::new(MemStore::with_file("/docs/a.md", "A"));
        h.open(Some("/docs/a.md"));
        h.edit("A1", 0);
        h.poll(1000);
        assert_eq!(h.saver.requests.len(), 1);

        assert!(h.create(Some("/docs/a.md")));
        // No direct write: the placeholder waits behind the running one.
        assert_eq!(h.store.writes.get(), 0);
        assert_eq!(h.saver.requests.len(), 1);

        drain_writes(&mut h, 1500);
        assert_eq!(h.saver.requests.len(), 2);
        assert_eq!(h.store.file("/docs/a.md").as_deref(), Some(PLACEHOLDER_TEMPLATE));
        assert_eq!(h.session.state(), SessionState::BoundClean);
    }

    #[test]
    fn test_failed_placeholder_write_leaves_document_dirty() {
        let mut h = Harness::new(MemStore::with_file("/docs/a.md", "A"));
        h.open(Some("/docs/a.md"));
        h.edit("A1", 0);
        h.poll(1000);
        h.create(Some("/docs/a.md"));

        h.finish(0, Ok(()), 1100);
        h.finish(1, Err("disk full".to_string()), 1200);
        assert!(h.session.document().is_dirty());
        assert_eq!(h.session.state(), SessionState::BoundDirtyPending);
    }

    #[test]
    fn test_identical_change_does_not_schedule() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        h.open(Some("notes.md"));
        h.edit("# Hi", 0);
        assert_eq!(h.session.next_deadline(), None);
        assert_eq!(h.session.state(), SessionState::BoundClean);
    }

    #[test]
    fn test_next_deadline_is_earliest_timer() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        h.open(Some("notes.md"));
        h.edit("one", 0);
        h.poll(1000);
        h.finish(0, Ok(()), 1000);
        h.edit("two", 2000);

        // Autosave at 3000 comes before notification expiry at 6000.
        assert_eq!(h.session.next_deadline(), Some(h.at(3000)));
    }

    #[test]
    fn test_flush_on_exit_writes_dirty_bound_content() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        h.open(Some("notes.md"));
        h.edit("last words", 0);

        assert!(h.session.flush_on_exit(&h.store).unwrap());
        assert_eq!(h.store.file("notes.md").as_deref(), Some("last words"));
        assert!(!h.session.document().is_dirty());
        assert_eq!(h.session.next_deadline(), None);
        assert!(!h.session.flush_on_exit(&h.store).unwrap());
    }

    #[test]
    fn test_flush_on_exit_skips_unbound() {
        let mut h = Harness::new(MemStore::default());
        h.edit("scratch", 0);
        assert!(!h.session.flush_on_exit(&h.store).unwrap());
        assert_eq!(h.store.writes.get(), 0);
    }

    #[test]
    fn test_surface_error_is_not_fatal() {
        let mut h = Harness::new(MemStore::with_file("notes.md", "# Hi"));
        h.open(Some("notes.md"));
        h.session.on_surface_error("renderer exploded");
        assert_eq!(h.session.document().content(), "# Hi");
        assert_eq!(h.session.state(), SessionState::BoundClean);
    }

    #[test]
    fn test_bindings_subscribe_and_release() {
        let bus = EventBus::new();
        let opens = Rc::new(Cell::new(0));
        let news = Rc::new(Cell::new(0));

        let bindings = {
            let o = opens.clone();
            let n = news.clone();
            SessionBindings::bind(&bus, move || o.set(o.get() + 1), move || n.set(n.get() + 1))
        };
        bus.emit(MenuSignal::OpenFile);
        bus.emit(MenuSignal::NewFile);
        bus.emit(MenuSignal::NewFile);
        assert_eq!((opens.get(), news.get()), (1, 2));

        drop(bindings);
        assert_eq!(bus.listener_count(MenuSignal::OpenFile), 0);
        assert_eq!(bus.listener_count(MenuSignal::NewFile), 0);
        bus.emit(MenuSignal::OpenFile);
        assert_eq!(opens.get(), 1);
    }
}
