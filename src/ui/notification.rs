use fltk::{
    enums::{Align, Color, FrameType},
    frame::Frame,
    prelude::*,
};

pub const BANNER_WIDTH: i32 = 140;
pub const BANNER_HEIGHT: i32 = 28;
const MARGIN: i32 = 12;

/// Fixed-position "Saved" overlay in the bottom-right corner of the window.
pub struct SavedBanner {
    frame: Frame,
    shown: bool,
}

impl SavedBanner {
    /// Create the banner as a child of the currently open group (the main window).
    pub fn new(window_w: i32, window_h: i32) -> Self {
        let mut frame = Frame::default().with_label("\u{2714} Saved");
        pin_to_corner(&mut frame, window_w, window_h);
        frame.set_frame(FrameType::RFlatBox);
        frame.set_color(Color::from_rgb(46, 125, 50));
        frame.set_label_color(Color::White);
        frame.set_label_size(13);
        frame.set_align(Align::Center | Align::Inside);
        frame.hide();
        Self { frame, shown: false }
    }

    /// Show or hide the banner; only redraws when the state flips.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.shown {
            return;
        }
        self.shown = visible;
        if visible {
            self.frame.show();
        } else {
            self.frame.hide();
        }
        if let Some(mut parent) = self.frame.parent() {
            parent.redraw();
        }
    }

    /// Handle to the underlying widget, for the window resize callback.
    pub fn frame(&self) -> Frame {
        self.frame.clone()
    }
}

/// Keep the banner in the bottom-right corner regardless of window size.
pub fn pin_to_corner(frame: &mut Frame, window_w: i32, window_h: i32) {
    frame.resize(
        window_w - BANNER_WIDTH - MARGIN,
        window_h - BANNER_HEIGHT - MARGIN,
        BANNER_WIDTH,
        BANNER_HEIGHT,
    );
}
