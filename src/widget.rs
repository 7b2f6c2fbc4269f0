use std::rc::Rc;

use crate::geometry::{Rect, Rgba};
use crate::render::{Font, Renderer, TextImage};

/// A filled rectangle with an optional label centred inside it.
#[derive(Debug)]
pub struct Widget {
    rect: Rect,
    fill: Rgba,
    font: Rc<Font>,
    label_rect: Rect,
    label_color: Rgba,
    label: Option<TextImage>,
}

impl Widget {
    pub fn new(rect: Rect, fill: Rgba, font: Rc<Font>, label_color: Rgba) -> Self {
        Self {
            rect,
            fill,
            font,
            label_rect: Rect::new(0, 0, 0, 0),
            label_color,
            label: None,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn label_rect(&self) -> Rect {
        self.label_rect
    }

    pub fn fill_color(&self) -> Rgba {
        self.fill
    }

    pub fn label_color(&self) -> Rgba {
        self.label_color
    }

    pub fn has_label(&self) -> bool {
        self.label.is_some()
    }

    /// Rasterize `text` with the current font and label colour, replacing
    /// (and releasing) any previous label. A rasterization failure is logged
    /// and leaves the widget without a label.
    pub fn set_label<R: Renderer + ?Sized>(&mut self, renderer: &mut R, text: &str) {
        self.free(renderer);

        match renderer.rasterize_text(text, &self.font, self.label_color) {
            Ok(image) => {
                self.label_rect.w = image.width();
                self.label_rect.h = image.height();
                self.label = Some(image);
            }
            Err(e) => tracing::warn!(error = %e, text, "unable to render label"),
        }
        self.center_label();
    }

    pub fn set_fill_color(&mut self, color: Rgba) {
        self.fill = color;
    }

    /// Applies to the next [`Widget::set_label`].
    pub fn set_label_color(&mut self, color: Rgba) {
        self.label_color = color;
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.fill_rect(self.rect, self.fill);

        if let Some(image) = &self.label {
            renderer.draw_text(image, self.label_rect);
        }
    }

    /// Hand the label image back to the renderer.
    pub fn free<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if let Some(image) = self.label.take() {
            renderer.release_text(image);
        }
    }

    /// Jump to `(x, y)` and recentre the label.
    pub(crate) fn set_position(&mut self, x: i32, y: i32) {
        self.rect.x = x;
        self.rect.y = y;
        self.center_label();
    }

    /// Translate the widget and its label together.
    pub(crate) fn shift(&mut self, dx: i32, dy: i32) {
        self.rect.x += dx;
        self.rect.y += dy;
        self.label_rect.x += dx;
        self.label_rect.y += dy;
    }

    fn center_label(&mut self) {
        self.label_rect = self.rect.centered(self.label_rect.w, self.label_rect.h);
    }
}

impl Drop for Widget {
    fn drop(&mut self) {
        if let Some(image) = &self.label {
            tracing::warn!(id = image.id(), "widget dropped without releasing its label");
        }
    }
}

/// Hit-testing and pressed-state colouring for widgets that react to the pointer.
pub trait Clickable {
    fn widget(&self) -> &Widget;

    fn widget_mut(&mut self) -> &mut Widget;

    /// True when `(x, y)` lies on or inside the widget's bounds.
    fn contains_point(&self, x: i32, y: i32) -> bool {
        self.widget().rect().contains(x, y)
    }

    fn change_color_to(&mut self, color: Rgba) {
        self.widget_mut().set_fill_color(color);
    }

    fn change_label_color_to(&mut self, color: Rgba) {
        self.widget_mut().set_label_color(color);
    }
}

#[derive(Debug)]
pub struct Button {
    widget: Widget,
}

impl Button {
    pub fn new(rect: Rect, fill: Rgba, font: Rc<Font>, label_color: Rgba) -> Self {
        Self {
            widget: Widget::new(rect, fill, font, label_color),
        }
    }
}

impl Clickable for Button {
    fn widget(&self) -> &Widget {
        &self.widget
    }

    fn widget_mut(&mut self) -> &mut Widget {
        &mut self.widget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Canvas;

    fn font() -> Rc<Font> {
        Rc::new(Font::new("test", true))
    }

    #[test]
    fn test_label_is_centered() {
        let mut canvas = Canvas::new(40, 20);
        let mut widget = Widget::new(Rect::new(10, 4, 20, 5), Rgba::BLACK, font(), Rgba::WHITE);
        widget.set_label(&mut canvas, "4x4");
        assert!(widget.has_label());
        assert_eq!(widget.label_rect(), Rect::new(18, 6, 3, 1));
        widget.free(&mut canvas);
    }

    #[test]
    fn test_set_label_releases_previous_image() {
        let mut canvas = Canvas::new(40, 20);
        let mut widget = Widget::new(Rect::new(0, 0, 20, 3), Rgba::BLACK, font(), Rgba::WHITE);
        for text in ["00:00:01", "00:00:02", "00:00:03"] {
            widget.set_label(&mut canvas, text);
            assert_eq!(canvas.live_images(), 1);
        }
        widget.free(&mut canvas);
        assert_eq!(canvas.live_images(), 0);
        assert!(!widget.has_label());
    }

    #[test]
    fn test_failed_label_leaves_widget_blank() {
        let mut canvas = Canvas::new(40, 20);
        let mut widget = Widget::new(Rect::new(0, 0, 20, 3), Rgba::BLACK, font(), Rgba::WHITE);
        widget.set_label(&mut canvas, "ok");
        widget.set_label(&mut canvas, "");
        assert!(!widget.has_label());
        assert_eq!(canvas.live_images(), 0);

        // Rendering with no label only paints the fill.
        widget.render(&mut canvas);
        assert_eq!(canvas.row_text(1).trim(), "");
    }

    #[test]
    fn test_render_draws_fill_then_label() {
        let mut canvas = Canvas::new(10, 3);
        let fill = Rgba::rgb(0, 20, 50);
        let mut widget = Widget::new(Rect::new(0, 0, 10, 3), fill, font(), Rgba::WHITE);
        widget.set_label(&mut canvas, "Menu");
        widget.render(&mut canvas);
        assert_eq!(canvas.row_text(1), "   Menu   ");
        assert_eq!(canvas.cell(0, 0).unwrap().bg, fill);
        assert_eq!(canvas.cell(3, 1).unwrap().bg, fill);
        assert!(canvas.cell(3, 1).unwrap().bold);
        widget.free(&mut canvas);
    }

    #[test]
    fn test_label_color_applies_on_next_set_label() {
        let mut canvas = Canvas::new(10, 1);
        let red = Rgba::rgb(255, 40, 10);
        let mut widget = Widget::new(Rect::new(0, 0, 10, 1), Rgba::BLACK, font(), Rgba::WHITE);
        widget.set_label(&mut canvas, "7");
        widget.set_label_color(red);
        widget.render(&mut canvas);
        assert_eq!(canvas.cell(4, 0).unwrap().fg, Rgba::WHITE);

        widget.set_label(&mut canvas, "7");
        widget.render(&mut canvas);
        assert_eq!(canvas.cell(4, 0).unwrap().fg, red);
        widget.free(&mut canvas);
    }

    #[test]
    fn test_button_hit_test_is_inclusive() {
        let button = Button::new(Rect::new(10, 10, 50, 50), Rgba::BLACK, font(), Rgba::WHITE);
        assert!(button.contains_point(10, 10));
        assert!(button.contains_point(60, 60));
        assert!(!button.contains_point(9, 10));
        assert!(!button.contains_point(10, 61));
    }

    #[test]
    fn test_adjacent_buttons_share_edge() {
        let left = Button::new(Rect::new(0, 0, 10, 4), Rgba::BLACK, font(), Rgba::WHITE);
        let right = Button::new(Rect::new(10, 0, 10, 4), Rgba::BLACK, font(), Rgba::WHITE);
        assert!(left.contains_point(10, 2));
        assert!(right.contains_point(10, 2));
    }

    #[test]
    fn test_pressed_colour() {
        let green = Rgba::rgb(50, 255, 100);
        let mut button = Button::new(Rect::new(0, 0, 5, 5), Rgba::BLACK, font(), Rgba::WHITE);
        button.change_color_to(green);
        button.change_label_color_to(Rgba::BLACK);
        assert_eq!(button.widget().fill_color(), green);
        assert_eq!(button.widget().label_color(), Rgba::BLACK);
    }
}
