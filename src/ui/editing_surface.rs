use std::cell::Cell;
use std::rc::Rc;

use fltk::{
    app::Sender,
    enums::CallbackTrigger,
    misc::HelpView,
    prelude::*,
    text::{TextBuffer, TextEditor, WrapMode},
};

use crate::app::controllers::session::EditingSurface;
use crate::app::domain::editor_config::EditorConfig;
use crate::app::domain::messages::Message;
use crate::app::infrastructure::buffer::buffer_text;
use crate::app::services::markdown::{MarkdownRenderer, wrap_html_for_helpview};

/// FLTK editing surface: a plain-text markdown editor plus a rendered preview.
///
/// User edits are reported as `Message::SurfaceChanged` with the full text.
/// `set_content` pushes text without reporting it back.
pub struct MarkdownSurface {
    editor: TextEditor,
    buffer: TextBuffer,
    preview: HelpView,
    renderer: MarkdownRenderer,
    /// Set while `set_content` rewrites the buffer.
    pushing: Rc<Cell<bool>>,
    sender: Sender<Message>,
}

impl MarkdownSurface {
    pub fn new(
        mut editor: TextEditor,
        preview: HelpView,
        initial: &str,
        config: EditorConfig,
        sender: Sender<Message>,
    ) -> Self {
        let mut buffer = TextBuffer::default();
        buffer.set_text(initial);
        editor.set_buffer(buffer.clone());

        let pushing = Rc::new(Cell::new(false));
        editor.set_trigger(CallbackTrigger::Changed);
        editor.set_callback({
            let buf = buffer.clone();
            let pushing = pushing.clone();
            let s = sender;
            move |_| {
                if pushing.get() {
                    return;
                }
                s.send(Message::SurfaceChanged(buffer_text(&buf)));
            }
        });

        let mut surface = Self {
            editor,
            buffer,
            preview,
            renderer: MarkdownRenderer::new(config),
            pushing,
            sender,
        };
        surface.refresh_preview();
        surface
    }

    /// Re-render the preview pane from the editor's current text.
    pub fn refresh_preview(&mut self) {
        if !self.preview.visible() {
            return;
        }
        let text = buffer_text(&self.buffer);
        let output = self.renderer.render(&text);
        for error in output.errors {
            self.sender.send(Message::SurfaceError(error));
        }
        self.preview.set_value(&wrap_html_for_helpview(&output.html));
    }

    pub fn set_preview_visible(&mut self, visible: bool) {
        if visible {
            self.preview.show();
            self.refresh_preview();
        } else {
            self.preview.hide();
        }
    }

    pub fn set_word_wrap(&mut self, enabled: bool) {
        let mode = if enabled { WrapMode::AtBounds } else { WrapMode::None };
        self.editor.wrap_mode(mode, 0);
        self.editor.redraw();
    }

    pub fn set_line_numbers(&mut self, enabled: bool) {
        self.editor.set_linenumber_width(if enabled { 40 } else { 0 });
        self.editor.redraw();
    }

    pub fn set_font_size(&mut self, size: i32) {
        self.editor.set_text_size(size);
        self.editor.redraw();
    }

    pub fn focus(&mut self) {
        let _ = self.editor.take_focus();
    }
}

impl EditingSurface for MarkdownSurface {
    fn set_content(&mut self, text: &str) {
        self.pushing.set(true);
        self.buffer.set_text(text);
        self.pushing.set(false);

        self.editor.set_insert_position(0);
        self.editor.show_insert_position();
        self.refresh_preview();
    }
}
