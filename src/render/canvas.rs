use std::collections::HashMap;
use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{Font, RenderError, Renderer, TextImage};
use crate::geometry::{Rect, Rgba};

/// Marks the right half of a double-width glyph.
const CONTINUATION: char = '\0';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgba,
    pub bg: Rgba,
    pub bold: bool,
}

impl Cell {
    fn blank(bg: Rgba) -> Self {
        Self {
            ch: ' ',
            fg: Rgba::WHITE,
            bg,
            bold: false,
        }
    }
}

#[derive(Debug)]
struct RasterText {
    text: String,
    color: Rgba,
    bold: bool,
}

/// Off-screen cell buffer. One cell is one unit of [`Rect`] space.
///
/// Everything is drawn into memory first and written to the terminal in one
/// pass by [`Canvas::present`].
#[derive(Debug)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    images: HashMap<u64, RasterText>,
    next_id: u64,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(Rgba::BLACK); width as usize * height as usize],
            images: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bounds of the whole drawable area.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Resize the buffer, discarding its contents. Live text images survive.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::blank(Rgba::BLACK); width as usize * height as usize];
    }

    pub fn clear(&mut self, color: Rgba) {
        self.cells.fill(Cell::blank(color));
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Characters of one row, with double-width continuations removed.
    pub fn row_text(&self, y: i32) -> String {
        (0..self.width as i32)
            .filter_map(|x| self.cell(x, y))
            .map(|cell| cell.ch)
            .filter(|&ch| ch != CONTINUATION)
            .collect()
    }

    /// Number of rasterized images not yet released.
    pub fn live_images(&self) -> usize {
        self.images.len()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Write the buffer to `out`. The caller flushes.
    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut current: Option<(Rgba, Rgba, bool)> = None;

        for y in 0..self.height {
            queue!(out, MoveTo(0, y))?;
            for x in 0..self.width {
                let cell = self.cells[y as usize * self.width as usize + x as usize];
                if cell.ch == CONTINUATION {
                    continue;
                }

                let style = (cell.fg, cell.bg, cell.bold);
                if current != Some(style) {
                    let attribute = if cell.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    queue!(
                        out,
                        SetAttribute(attribute),
                        SetForegroundColor(cell.fg.into()),
                        SetBackgroundColor(cell.bg.into())
                    )?;
                    current = Some(style);
                }
                queue!(out, Print(cell.ch))?;
            }
        }

        queue!(out, SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

impl Renderer for Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        if color.a == 0 {
            return;
        }
        for y in rect.y..rect.y + rect.h {
            for x in rect.x..rect.x + rect.w {
                if let Some(i) = self.index(x, y) {
                    self.cells[i] = Cell::blank(color);
                }
            }
        }
    }

    fn rasterize_text(&mut self, text: &str, font: &Font, color: Rgba) -> Result<TextImage, RenderError> {
        if let Some(ch) = text.chars().find(|c| c.is_control()) {
            return Err(RenderError::ControlCharacter(ch));
        }
        let width = text.width();
        if width == 0 {
            return Err(RenderError::EmptyText);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.images.insert(
            id,
            RasterText {
                text: text.to_string(),
                color,
                bold: font.bold,
            },
        );

        Ok(TextImage::new(id, width as i32, 1))
    }

    fn draw_text(&mut self, image: &TextImage, dest: Rect) {
        let Some(raster) = self.images.get(&image.id()) else {
            tracing::warn!(id = image.id(), "draw of released text image");
            return;
        };
        let (color, bold) = (raster.color, raster.bold);
        let glyphs: Vec<(char, usize)> = raster
            .text
            .chars()
            .map(|ch| (ch, ch.width().unwrap_or(0)))
            .collect();

        let mut x = dest.x;
        for (ch, w) in glyphs {
            if w == 0 {
                continue;
            }
            for offset in 0..w as i32 {
                if let Some(i) = self.index(x + offset, dest.y) {
                    let cell = &mut self.cells[i];
                    cell.ch = if offset == 0 { ch } else { CONTINUATION };
                    cell.fg = color;
                    cell.bold = bold;
                }
            }
            x += w as i32;
        }
    }

    fn release_text(&mut self, image: TextImage) {
        if self.images.remove(&image.id()).is_none() {
            tracing::warn!(id = image.id(), "released unknown text image");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> Font {
        Font::new("test", false)
    }

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut canvas = Canvas::new(4, 3);
        let red = Rgba::rgb(255, 0, 0);
        canvas.fill_rect(Rect::new(2, 1, 10, 10), red);
        assert_eq!(canvas.cell(1, 1).unwrap().bg, Rgba::BLACK);
        assert_eq!(canvas.cell(2, 1).unwrap().bg, red);
        assert_eq!(canvas.cell(3, 2).unwrap().bg, red);
        assert!(canvas.cell(4, 2).is_none());
    }

    #[test]
    fn test_rasterize_reports_cell_size() {
        let mut canvas = Canvas::new(10, 2);
        let image = canvas.rasterize_text("12", &font(), Rgba::WHITE).unwrap();
        assert_eq!((image.width(), image.height()), (2, 1));
        assert_eq!(canvas.live_images(), 1);
        canvas.release_text(image);
        assert_eq!(canvas.live_images(), 0);
    }

    #[test]
    fn test_rasterize_failures() {
        let mut canvas = Canvas::new(10, 2);
        assert_eq!(
            canvas.rasterize_text("", &font(), Rgba::WHITE),
            Err(RenderError::EmptyText)
        );
        assert_eq!(
            canvas.rasterize_text("a\nb", &font(), Rgba::WHITE),
            Err(RenderError::ControlCharacter('\n'))
        );
        assert_eq!(canvas.live_images(), 0);
    }

    #[test]
    fn test_draw_text_keeps_background() {
        let mut canvas = Canvas::new(6, 1);
        let bg = Rgba::rgb(0, 20, 50);
        canvas.fill_rect(canvas.bounds(), bg);
        let image = canvas.rasterize_text("hi", &font(), Rgba::WHITE).unwrap();
        canvas.draw_text(&image, Rect::new(2, 0, 2, 1));
        assert_eq!(canvas.row_text(0), "  hi  ");
        let cell = canvas.cell(2, 0).unwrap();
        assert_eq!((cell.fg, cell.bg), (Rgba::WHITE, bg));
        canvas.release_text(image);
    }

    #[test]
    fn test_wide_glyphs_take_two_cells() {
        let mut canvas = Canvas::new(6, 1);
        let image = canvas.rasterize_text("安全", &font(), Rgba::WHITE).unwrap();
        assert_eq!(image.width(), 4);
        canvas.draw_text(&image, Rect::new(0, 0, 4, 1));
        assert_eq!(canvas.row_text(0), "安全  ");
        canvas.release_text(image);
    }

    #[test]
    fn test_present_writes_every_row() {
        let mut canvas = Canvas::new(3, 2);
        canvas.clear(Rgba::BLACK);
        let mut out = Vec::new();
        canvas.present(&mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\u{1b}[1;1H"));
        assert!(written.contains("\u{1b}[2;1H"));
    }
}
