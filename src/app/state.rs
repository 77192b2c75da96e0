use std::path::PathBuf;
use std::time::{Duration, Instant};

use fltk::{
    app::{self, Sender, TimeoutHandle},
    group::Flex,
    prelude::*,
    window::Window,
};

use super::controllers::session::{SessionBindings, SessionController, SessionPorts};
use super::domain::document::Document;
use super::domain::editor_config::EditorConfig;
use super::domain::messages::Message;
use super::domain::settings::AppSettings;
use super::infrastructure::error::Result;
use super::infrastructure::fs_store::FsStore;
use super::infrastructure::save_worker::SaveWorker;
use super::services::deferred::DeferredTask;
use super::services::events::{EventBus, MenuSignal};
use crate::ui::editing_surface::MarkdownSurface;
use crate::ui::file_dialogs::NativePicker;
use crate::ui::main_window::MainWidgets;
use crate::ui::menu::build_menu;
use crate::ui::notification::SavedBanner;

/// Quiet period before the preview pane re-renders after typing.
const PREVIEW_REFRESH_DELAY: Duration = Duration::from_millis(300);

pub struct AppState {
    pub window: Window,
    pub body: Flex,
    pub banner: SavedBanner,
    pub surface: MarkdownSurface,
    pub session: SessionController,
    pub settings: AppSettings,
    picker: NativePicker,
    store: FsStore,
    saver: SaveWorker,
    bus: EventBus<MenuSignal>,
    bindings: Option<SessionBindings>,
    preview_refresh: DeferredTask,
    /// The one pending FLTK timeout and the deadline it was armed for.
    wakeup: Option<(TimeoutHandle, Instant)>,
    sender: Sender<Message>,
}

impl AppState {
    pub fn new(widgets: MainWidgets, sender: Sender<Message>, settings: AppSettings) -> Result<Self> {
        let MainWidgets {
            wind: window,
            mut menu,
            body,
            text_editor,
            preview,
            banner,
        } = widgets;

        let session = SessionController::new(&settings);
        let surface = MarkdownSurface::new(
            text_editor,
            preview,
            session.document().content(),
            EditorConfig::default(),
            sender,
        );

        let saver = SaveWorker::spawn(FsStore, {
            let s = sender;
            move |outcome| s.send(Message::AutosaveFinished(outcome))
        })?;

        let bus = EventBus::new();
        build_menu(&mut menu, &bus, &sender, &settings);
        let bindings = SessionBindings::bind(
            &bus,
            {
                let s = sender;
                move || s.send(Message::MenuOpenFile)
            },
            {
                let s = sender;
                move || s.send(Message::MenuNewFile)
            },
        );

        let mut state = Self {
            window,
            body,
            banner,
            surface,
            session,
            settings,
            picker: NativePicker::new(),
            store: FsStore,
            saver,
            bus,
            bindings: Some(bindings),
            preview_refresh: DeferredTask::new(PREVIEW_REFRESH_DELAY),
            wakeup: None,
            sender,
        };
        state.apply_view_settings();
        state.sync_ui(Instant::now());
        Ok(state)
    }

    fn apply_view_settings(&mut self) {
        let (preview, wrap, numbers, size) = (
            self.settings.preview_enabled,
            self.settings.word_wrap_enabled,
            self.settings.line_numbers_enabled,
            self.settings.font_size as i32,
        );
        self.surface.set_font_size(size);
        self.surface.set_word_wrap(wrap);
        self.surface.set_line_numbers(numbers);
        self.surface.set_preview_visible(preview);
        self.body.layout();
    }

    /// Open a file given on the command line.
    pub fn open_path(&mut self, path: PathBuf) {
        let mut ports = SessionPorts {
            picker: &mut self.picker,
            store: &self.store,
            surface: &mut self.surface,
            saver: &mut self.saver,
        };
        self.session.open_path(&mut ports, path);
        self.sync_ui(Instant::now());
    }

    /// Dispatch one message. Returns `false` when the app should exit.
    pub fn handle(&mut self, msg: Message) -> bool {
        let now = Instant::now();
        match msg {
            Message::MenuOpenFile | Message::MenuNewFile => {
                let mut ports = SessionPorts {
                    picker: &mut self.picker,
                    store: &self.store,
                    surface: &mut self.surface,
                    saver: &mut self.saver,
                };
                let loaded = if matches!(msg, Message::MenuOpenFile) {
                    self.session.open_existing(&mut ports)
                } else {
                    self.session.create_new(&mut ports)
                };
                if loaded {
                    self.preview_refresh.cancel();
                    self.surface.focus();
                }
            }
            Message::SurfaceChanged(text) => {
                self.session.on_surface_change(text, now);
                self.preview_refresh.schedule(now);
            }
            Message::SurfaceError(err) => self.session.on_surface_error(&err),
            Message::AutosaveFinished(outcome) => {
                self.session.on_save_finished(outcome, &mut self.saver, now);
            }
            Message::TimerFired => {
                // The timeout that sent this has already been consumed.
                self.wakeup = None;
                self.session.poll(&mut self.saver, now);
                if self.preview_refresh.fire_if_due(now) {
                    self.surface.refresh_preview();
                }
            }
            Message::TogglePreview => {
                self.settings.preview_enabled = !self.settings.preview_enabled;
                self.surface.set_preview_visible(self.settings.preview_enabled);
                self.body.layout();
                self.window.redraw();
            }
            Message::ToggleWordWrap => {
                self.settings.word_wrap_enabled = !self.settings.word_wrap_enabled;
                self.surface.set_word_wrap(self.settings.word_wrap_enabled);
            }
            Message::ToggleLineNumbers => {
                self.settings.line_numbers_enabled = !self.settings.line_numbers_enabled;
                self.surface.set_line_numbers(self.settings.line_numbers_enabled);
            }
            Message::FileQuit | Message::WindowClose => return false,
        }
        self.sync_ui(now);
        true
    }

    /// Bring title, banner and wake-up timer in line with the session.
    fn sync_ui(&mut self, now: Instant) {
        self.window.set_label(&window_title(self.session.document()));
        self.banner.set_visible(self.session.notification_visible());
        self.rearm_wakeup(now);
    }

    fn next_deadline(&self) -> Option<Instant> {
        match (self.session.next_deadline(), self.preview_refresh.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Keep a single FLTK timeout armed for the earliest pending deadline.
    fn rearm_wakeup(&mut self, now: Instant) {
        let target = self.next_deadline();
        if self.wakeup.map(|(_, at)| at) == target {
            return;
        }
        if let Some((handle, _)) = self.wakeup.take() {
            app::remove_timeout3(handle);
        }
        if let Some(at) = target {
            let secs = at.saturating_duration_since(now).as_secs_f64();
            let s = self.sender;
            let handle = app::add_timeout3(secs, move |_| s.send(Message::TimerFired));
            self.wakeup = Some((handle, at));
        }
    }

    /// Drain the autosave worker, write anything still unsaved, persist settings.
    pub fn shutdown(&mut self) {
        if let Some((handle, _)) = self.wakeup.take() {
            app::remove_timeout3(handle);
        }
        self.bindings = None;
        tracing::debug!(target: "session", listeners = self.bus.listener_count(MenuSignal::OpenFile), "menu bindings released");

        self.saver.shutdown();
        match self.session.flush_on_exit(&self.store) {
            Ok(true) => tracing::info!(target: "session", "unsaved edits written on exit"),
            Ok(false) => {}
            Err(e) => tracing::error!(target: "session", error = %e, "failed to write unsaved edits on exit"),
        }

        if let Err(e) = self.settings.save() {
            tracing::warn!(target: "settings", error = %e, "failed to save settings");
        }
    }
}

/// "name - MarkPad", prefixed with `*` while there are unsaved edits.
pub fn window_title(doc: &Document) -> String {
    let prefix = if doc.is_dirty() { "*" } else { "" };
    format!("{}{} - MarkPad", prefix, doc.display_name())
}
