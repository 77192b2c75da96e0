use crate::app::services::write_queue::SaveOutcome;

/// All messages that can be sent through the FLTK channel.
/// Menu listeners, widget callbacks, timers and the autosave worker send
/// these; the dispatch loop in main hands them to `AppState::handle`.
#[derive(Debug, Clone)]
pub enum Message {
    // Menu signals
    MenuOpenFile,
    MenuNewFile,
    FileQuit,
    WindowClose,

    // Editing surface
    SurfaceChanged(String),
    SurfaceError(String),

    // View
    TogglePreview,
    ToggleWordWrap,
    ToggleLineNumbers,

    // Background work
    TimerFired,
    AutosaveFinished(SaveOutcome),
}
