use std::rc::Rc;

use crate::geometry::{Rect, Rgba};
use crate::render::{Font, Renderer};
use crate::widget::Widget;

pub const DANGER_PREFIX: &str = "In danger ";
pub const SAFE_MESSAGE: &str = "YOU'RE SAFE";

/// Elapsed-time display for one puzzle attempt. Stops for good once the
/// puzzle is solved.
#[derive(Debug)]
pub struct Stopwatch {
    widget: Widget,
    start_ms: u64,
    elapsed_ms: u64,
    frozen: bool,
}

impl Stopwatch {
    pub fn new(rect: Rect, fill: Rgba, font: Rc<Font>, label_color: Rgba) -> Self {
        Self {
            widget: Widget::new(rect, fill, font, label_color),
            start_ms: 0,
            elapsed_ms: 0,
            frozen: false,
        }
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn start(&mut self, now_ms: u64) {
        self.start_ms = now_ms;
        self.elapsed_ms = 0;
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R, now_ms: u64, solved: bool) {
        if self.frozen {
            return;
        }

        if solved {
            self.frozen = true;
            self.widget.set_label(renderer, SAFE_MESSAGE);
            tracing::info!(elapsed = %format_elapsed(self.elapsed_ms / 1000), "stopwatch stopped");
            return;
        }

        self.elapsed_ms = now_ms.saturating_sub(self.start_ms);
        let text = format!("{}{}", DANGER_PREFIX, format_elapsed(self.elapsed_ms / 1000));
        self.widget.set_label(renderer, &text);
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        self.widget.render(renderer);
    }

    pub fn free<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        self.widget.free(renderer);
    }
}

/// `HH:MM:SS`, with hours growing past two digits rather than wrapping.
pub fn format_elapsed(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
