//! Drawing surface used by every on-screen element.
//!
//! Widgets never talk to the terminal directly: they fill rectangles and
//! blit rasterized text through a [`Renderer`]. Rasterized text is an owned
//! [`TextImage`] handle that must be handed back with
//! [`Renderer::release_text`] before it is dropped or replaced.

mod canvas;

pub use canvas::{Canvas, Cell};

use crate::geometry::{Rect, Rgba};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("text has zero width")]
    EmptyText,

    #[error("cannot rasterize control character {0:?}")]
    ControlCharacter(char),
}

/// Typeface handle. Loaded once by the screen that owns it and shared by
/// reference with the widgets it creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub name: String,
    pub bold: bool,
}

impl Font {
    pub fn new(name: impl Into<String>, bold: bool) -> Self {
        Self {
            name: name.into(),
            bold,
        }
    }
}

/// Handle to text rasterized by a [`Renderer`].
///
/// Deliberately not `Clone`: there is exactly one owner, and that owner
/// returns it to the renderer that produced it.
#[derive(Debug, PartialEq, Eq)]
pub struct TextImage {
    id: u64,
    width: i32,
    height: i32,
}

impl TextImage {
    pub fn new(id: u64, width: i32, height: i32) -> Self {
        Self { id, width, height }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

pub trait Renderer {
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    fn rasterize_text(&mut self, text: &str, font: &Font, color: Rgba) -> Result<TextImage, RenderError>;

    fn draw_text(&mut self, image: &TextImage, dest: Rect);

    fn release_text(&mut self, image: TextImage);
}
