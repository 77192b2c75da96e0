use fltk::{
    app::{self, Sender},
    enums::{Color, Event},
    group::{Flex, FlexType},
    menu::MenuBar,
    misc::HelpView,
    prelude::*,
    text::TextEditor,
    window::Window,
};

use crate::app::domain::messages::Message;
use super::notification::{SavedBanner, pin_to_corner};

pub const WINDOW_WIDTH: i32 = 960;
pub const WINDOW_HEIGHT: i32 = 640;
pub const MENU_HEIGHT: i32 = 30;

pub struct MainWidgets {
    pub wind: Window,
    pub menu: MenuBar,
    /// Row holding the editor and the preview side by side.
    pub body: Flex,
    pub text_editor: TextEditor,
    pub preview: HelpView,
    pub banner: SavedBanner,
}

pub fn build_main_window(sender: &Sender<Message>) -> MainWidgets {
    let mut wind = Window::new(100, 100, WINDOW_WIDTH, WINDOW_HEIGHT, "Untitled - MarkPad");
    wind.set_xclass("MarkPad");

    let mut flex = Flex::new(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT, None);
    flex.set_type(FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, MENU_HEIGHT, "");
    flex.fixed(&menu, MENU_HEIGHT);

    let mut body = Flex::default();
    body.set_type(FlexType::Row);
    body.set_pad(4);

    let mut text_editor = TextEditor::new(0, 0, 0, 0, "");
    text_editor.set_linenumber_bgcolor(Color::from_rgb(240, 240, 240));
    text_editor.set_linenumber_fgcolor(Color::from_rgb(100, 100, 100));

    let preview = HelpView::new(0, 0, 0, 0, "");

    body.end();
    flex.end();
    wind.resizable(&flex);

    // Drawn last so it stays on top of the editor.
    let banner = SavedBanner::new(WINDOW_WIDTH, WINDOW_HEIGHT);
    wind.end();

    let mut banner_frame = banner.frame();
    wind.resize_callback(move |_, _, _, w, h| pin_to_corner(&mut banner_frame, w, h));

    let s = *sender;
    wind.set_callback(move |_| {
        if app::event() == Event::Close {
            s.send(Message::WindowClose);
        }
    });

    MainWidgets {
        wind,
        menu,
        body,
        text_editor,
        preview,
        banner,
    }
}
