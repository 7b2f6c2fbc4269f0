use std::rc::Rc;

use crate::geometry::{Rect, Rgba};
use crate::render::Font;
use crate::widget::{Clickable, Widget};

/// A numbered puzzle tile. The number is the tile's identity and never changes.
#[derive(Debug)]
pub struct Tile {
    widget: Widget,
    number: u32,
}

impl Tile {
    pub fn new(rect: Rect, fill: Rgba, font: Rc<Font>, label_color: Rgba, number: u32) -> Self {
        Self {
            widget: Widget::new(rect, fill, font, label_color),
            number,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn position(&self) -> (i32, i32) {
        let rect = self.widget.rect();
        (rect.x, rect.y)
    }

    /// Advance one unit toward `(x, y)`, finishing the horizontal leg before
    /// starting the vertical one. Returns true once the tile sits on the target.
    pub fn step_toward(&mut self, x: i32, y: i32) -> bool {
        let (cur_x, cur_y) = self.position();

        if cur_x != x {
            self.widget.shift((x - cur_x).signum(), 0);
            return false;
        }

        if cur_y != y {
            self.widget.shift(0, (y - cur_y).signum());
            return false;
        }

        true
    }

    /// Jump straight to `(x, y)`.
    pub fn snap_to(&mut self, x: i32, y: i32) {
        self.widget.set_position(x, y);
    }
}

impl Clickable for Tile {
    fn widget(&self) -> &Widget {
        &self.widget
    }

    fn widget_mut(&mut self) -> &mut Widget {
        &mut self.widget
    }
}
