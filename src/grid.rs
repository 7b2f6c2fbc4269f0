use std::rc::Rc;

use rand::Rng;

use crate::config::Palette;
use crate::error::Result;
use crate::geometry::{Rect, Rgba};
use crate::puzzle::{Board, Move, Slot};
use crate::render::{Font, Renderer};
use crate::tile::Tile;
use crate::widget::Clickable;

/// Where the grid's slots sit on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub left: i32,
    pub top: i32,
    pub tile_w: i32,
    pub tile_h: i32,
    pub border: i32,
}

impl GridLayout {
    pub fn slot_rect(&self, (row, col): Slot) -> Rect {
        Rect::new(
            self.left + self.border + col as i32 * (self.tile_w + self.border),
            self.top + self.border + row as i32 * (self.tile_h + self.border),
            self.tile_w,
            self.tile_h,
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Slide {
    number: u32,
    movement: Move,
    origin: (i32, i32),
    target: (i32, i32),
    last_step_ms: u64,
}

/// The tiles on screen together with the board they represent.
///
/// Tiles live in an arena indexed by `number - 1`; the board maps slots to
/// numbers, so nothing holds a reference into the arena.
#[derive(Debug)]
pub struct PuzzleGrid {
    board: Board,
    tiles: Vec<Tile>,
    layout: GridLayout,
    palette: Palette,
    slide: Option<Slide>,
    solved: bool,
}

impl PuzzleGrid {
    /// Lay out a solved grid of `size` x `size` tiles.
    pub fn new<R: Renderer + ?Sized>(
        size: usize,
        layout: GridLayout,
        font: Rc<Font>,
        palette: Palette,
        renderer: &mut R,
    ) -> Result<Self> {
        Ok(Self::from_board(Board::new(size)?, layout, font, palette, renderer))
    }

    /// Lay out tiles in the arrangement given by `board`.
    pub fn from_board<R: Renderer + ?Sized>(
        board: Board,
        layout: GridLayout,
        font: Rc<Font>,
        palette: Palette,
        renderer: &mut R,
    ) -> Self {
        let size = board.size();
        let blank_number = board.blank_number();

        let mut slots = vec![(0, 0); size * size];
        for row in 0..size {
            for col in 0..size {
                slots[board.number_at((row, col)) as usize - 1] = (row, col);
            }
        }

        let mut tiles = Vec::with_capacity(size * size);
        for (index, &slot) in slots.iter().enumerate() {
            let number = index as u32 + 1;
            let fill = if number == blank_number { palette.background } else { palette.tile };
            let mut tile = Tile::new(layout.slot_rect(slot), fill, Rc::clone(&font), palette.label, number);
            tile.widget_mut().set_label(renderer, &number.to_string());
            tiles.push(tile);
        }

        let mut grid = Self {
            board,
            tiles,
            layout,
            palette,
            slide: None,
            solved: false,
        };
        grid.check_solved(renderer);
        grid
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn is_moving(&self) -> bool {
        self.slide.is_some()
    }

    pub fn slot_rect(&self, slot: Slot) -> Rect {
        self.layout.slot_rect(slot)
    }

    pub fn tile(&self, number: u32) -> &Tile {
        &self.tiles[number as usize - 1]
    }

    pub fn tile_at(&self, slot: Slot) -> &Tile {
        self.tile(self.board.number_at(slot))
    }

    fn tile_mut(&mut self, number: u32) -> &mut Tile {
        &mut self.tiles[number as usize - 1]
    }

    /// Scramble with `steps` random legal moves, repositioning tiles
    /// instantly. Returns the moves applied.
    pub fn shuffle<G: Rng + ?Sized, R: Renderer + ?Sized>(
        &mut self,
        steps: usize,
        rng: &mut G,
        renderer: &mut R,
    ) -> Vec<Move> {
        let history = self.board.shuffle(steps, rng);

        for row in 0..self.size() {
            for col in 0..self.size() {
                let rect = self.layout.slot_rect((row, col));
                let number = self.board.number_at((row, col));
                self.tile_mut(number).snap_to(rect.x, rect.y);
            }
        }
        tracing::debug!(steps, "shuffled board:\n{}", self.board);

        self.check_solved(renderer);
        history
    }

    /// Start sliding the tile under `(x, y)` if it borders the blank. Ignored
    /// while another slide is running or once the puzzle is solved.
    pub fn click(&mut self, x: i32, y: i32, now_ms: u64) -> bool {
        if self.slide.is_some() || self.solved {
            return false;
        }

        let blank_number = self.board.blank_number();
        let size = self.size();
        let hit = (0..size)
            .flat_map(|row| (0..size).map(move |col| (row, col)))
            .filter(|&slot| self.board.number_at(slot) != blank_number)
            .filter(|&slot| self.tile_at(slot).contains_point(x, y))
            .find_map(|slot| self.board.move_for(slot).map(|movement| (slot, movement)));

        let Some((slot, movement)) = hit else {
            return false;
        };

        let number = self.board.number_at(slot);
        let origin = self.tile(number).position();
        let target = self.tile(blank_number).position();
        tracing::debug!(number, %movement, "slide started");

        self.slide = Some(Slide {
            number,
            movement,
            origin,
            target,
            last_step_ms: now_ms,
        });
        true
    }

    /// Move the sliding tile by as many cells as the elapsed time allows.
    /// Returns true on the call that completes the slide.
    pub fn advance<R: Renderer + ?Sized>(&mut self, now_ms: u64, ms_per_cell: f64, renderer: &mut R) -> bool {
        let Some(mut slide) = self.slide else {
            return false;
        };

        let elapsed = now_ms.saturating_sub(slide.last_step_ms) as f64;
        if elapsed <= ms_per_cell {
            return false;
        }

        let steps = (elapsed / ms_per_cell) as u64;
        let (tx, ty) = slide.target;
        let tile = self.tile_mut(slide.number);
        let mut arrived = false;
        for _ in 0..steps {
            if tile.step_toward(tx, ty) {
                arrived = true;
                break;
            }
        }
        slide.last_step_ms = now_ms;

        if !arrived {
            self.slide = Some(slide);
            return false;
        }

        let blank_number = self.board.blank_number();
        let (ox, oy) = slide.origin;
        self.tile_mut(blank_number).snap_to(ox, oy);
        self.board.apply_move(slide.movement);
        self.slide = None;
        self.check_solved(renderer);
        if self.solved {
            tracing::info!(size = self.size(), "puzzle solved");
        }
        true
    }

    /// Recolour every tile by whether it sits on its home slot and refresh
    /// the solved flag.
    fn check_solved<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let blank_number = self.board.blank_number();
        let palette = self.palette.clone();
        let size = self.size();

        for row in 0..size {
            for col in 0..size {
                let number = self.board.number_at((row, col));
                if number == blank_number {
                    continue;
                }
                let placed = self.board.is_placed((row, col));
                let (fill, label) = if placed {
                    (palette.tile_done, palette.label_done)
                } else {
                    (palette.tile, palette.label)
                };
                recolor(self.tile_mut(number), fill, label, renderer);
            }
        }

        self.solved = self.board.is_solved();
    }

    /// Draw every tile except the blank.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        let blank_number = self.board.blank_number();
        for tile in self.tiles.iter().filter(|t| t.number() != blank_number) {
            tile.widget().render(renderer);
        }
    }

    pub fn free<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        for tile in &mut self.tiles {
            tile.widget_mut().free(renderer);
        }
    }
}

fn recolor<R: Renderer + ?Sized>(tile: &mut Tile, fill: Rgba, label: Rgba, renderer: &mut R) {
    tile.change_color_to(fill);
    if tile.widget().label_color() != label || !tile.widget().has_label() {
        tile.change_label_color_to(label);
        let text = tile.number().to_string();
        tile.widget_mut().set_label(renderer, &text);
    }
}
