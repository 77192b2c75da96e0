use std::path::PathBuf;

use fltk::{app, prelude::*};

use mark_pad::app::domain::messages::Message;
use mark_pad::app::domain::settings::AppSettings;
use mark_pad::app::infrastructure::logging;
use mark_pad::app::state::AppState;
use mark_pad::ui::main_window::build_main_window;

fn main() {
    // Held until exit so buffered log lines are flushed.
    let _log_guard = logging::init();

    let app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let settings = AppSettings::load();
    let mut widgets = build_main_window(&sender);
    widgets.wind.show();

    let mut state = match AppState::new(widgets, sender, settings) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to start");
            fltk::dialog::alert_default(&format!("MarkPad could not start: {}", e));
            return;
        }
    };

    if let Some(arg) = std::env::args_os().nth(1) {
        state.open_path(PathBuf::from(arg));
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "MarkPad started");

    while app.wait() {
        if let Some(msg) = receiver.recv() {
            if !state.handle(msg) {
                break;
            }
        }
    }

    state.shutdown();
    tracing::info!("MarkPad exiting");
    app.quit();
}
