use fltk::{
    app::Sender,
    enums::Shortcut,
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::domain::messages::Message;
use crate::app::domain::settings::AppSettings;
use crate::app::services::events::{EventBus, MenuSignal};

/// Populate the menu bar. File open/new go out as named signals on `bus`;
/// everything else is sent straight to the dispatch loop.
pub fn build_menu(
    menu: &mut MenuBar,
    bus: &EventBus<MenuSignal>,
    sender: &Sender<Message>,
    settings: &AppSettings,
) {
    let s = sender;

    // File
    menu.add("File/New Markdown File...", Shortcut::Ctrl | 'n', MenuFlag::Normal, { let b = bus.clone(); move |_| raise(&b, MenuSignal::NewFile) });
    menu.add("File/Open Markdown File...", Shortcut::Ctrl | 'o', MenuFlag::MenuDivider, { let b = bus.clone(); move |_| raise(&b, MenuSignal::OpenFile) });
    menu.add("File/Quit", Shortcut::Ctrl | 'q', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileQuit) });

    // View
    let pv_flag = if settings.preview_enabled { MenuFlag::Toggle | MenuFlag::Value } else { MenuFlag::Toggle };
    menu.add("View/Toggle Preview", Shortcut::Ctrl | 'm', pv_flag, { let s = *s; move |_| s.send(Message::TogglePreview) });
    let ww_flag = if settings.word_wrap_enabled { MenuFlag::Toggle | MenuFlag::Value } else { MenuFlag::Toggle };
    menu.add("View/Toggle Word Wrap", Shortcut::None, ww_flag, { let s = *s; move |_| s.send(Message::ToggleWordWrap) });
    let ln_flag = if settings.line_numbers_enabled { MenuFlag::Toggle | MenuFlag::Value } else { MenuFlag::Toggle };
    menu.add("View/Toggle Line Numbers", Shortcut::None, ln_flag, { let s = *s; move |_| s.send(Message::ToggleLineNumbers) });
}

fn raise(bus: &EventBus<MenuSignal>, signal: MenuSignal) {
    let delivered = bus.emit(signal);
    tracing::debug!(target: "menu", signal = signal.name(), listeners = delivered, "signal raised");
}
