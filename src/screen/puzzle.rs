use std::io::Write;
use std::rc::Rc;

use super::{ScreenOutcome, Session, FONT_NAME};
use crate::clock::Clock;
use crate::error::Result;
use crate::geometry::Rect;
use crate::grid::{GridLayout, PuzzleGrid};
use crate::input::{InputEvent, InputSource};
use crate::render::Font;
use crate::stopwatch::Stopwatch;
use crate::widget::{Button, Clickable};

/// Screen positions of everything on the puzzle screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleLayout {
    pub stopwatch: Rect,
    pub grid: GridLayout,
    pub menu_button: Rect,
}

impl PuzzleLayout {
    /// Split `bounds` into a stopwatch row, `size` rows of tiles and a menu
    /// button row, with `border` between every element.
    pub fn new(bounds: Rect, size: usize, border: i32) -> Self {
        let n = size as i32;
        let rows = n + 2;
        let tile_w = ((bounds.w - (n + 1) * border) / n).max(1);
        let tile_h = ((bounds.h - (rows + 1) * border) / rows).max(1);
        let full_w = (bounds.w - 2 * border).max(1);

        let stopwatch = Rect::new(bounds.x + border, bounds.y + border, full_w, tile_h);
        let grid = GridLayout {
            left: bounds.x,
            top: stopwatch.y + tile_h,
            tile_w,
            tile_h,
            border,
        };
        let menu_y = grid.top + n * (tile_h + border) + border;
        let menu_button = Rect::new(bounds.x + border, menu_y, full_w, tile_h);

        Self {
            stopwatch,
            grid,
            menu_button,
        }
    }
}

struct PuzzleScreen {
    grid: PuzzleGrid,
    stopwatch: Stopwatch,
    menu_button: Button,
}

/// Play one `size` x `size` puzzle until the player quits or goes back to the menu.
pub fn run<I: InputSource, C: Clock, W: Write>(session: &mut Session<I, C, W>, size: usize) -> Result<ScreenOutcome> {
    let palette = session.config.palette.clone();
    let font = Rc::new(Font::new(FONT_NAME, true));
    let layout = PuzzleLayout::new(session.canvas.bounds(), size, session.config.border);

    let mut grid = PuzzleGrid::new(size, layout.grid, Rc::clone(&font), palette.clone(), &mut session.canvas)?;
    grid.shuffle(session.config.shuffle_steps, &mut session.rng, &mut session.canvas);

    let stopwatch = Stopwatch::new(layout.stopwatch, palette.stopwatch, Rc::clone(&font), palette.label);
    let mut menu_button = Button::new(layout.menu_button, palette.button, Rc::clone(&font), palette.label);
    menu_button.widget_mut().set_label(&mut session.canvas, "Menu");

    let mut screen = PuzzleScreen {
        grid,
        stopwatch,
        menu_button,
    };
    tracing::info!(size, "puzzle started");
    let result = puzzle_loop(session, &mut screen);

    screen.grid.free(&mut session.canvas);
    screen.stopwatch.free(&mut session.canvas);
    screen.menu_button.widget_mut().free(&mut session.canvas);
    result
}

fn puzzle_loop<I: InputSource, C: Clock, W: Write>(
    session: &mut Session<I, C, W>,
    screen: &mut PuzzleScreen,
) -> Result<ScreenOutcome> {
    let palette = session.config.palette.clone();
    let ms_per_cell = session.config.ms_per_cell();
    let mut menu_pressed = false;

    screen.stopwatch.start(session.clock.now_ms());

    loop {
        let mut outcome = None;
        for event in session.input.drain()? {
            if event == InputEvent::Quit {
                outcome = Some(ScreenOutcome::Quit);
                continue;
            }
            if screen.grid.is_moving() {
                continue;
            }

            match event {
                InputEvent::PointerDown { x, y } => {
                    screen.grid.click(x, y, session.clock.now_ms());
                    if screen.menu_button.contains_point(x, y) {
                        screen.menu_button.change_color_to(palette.button_down);
                        menu_pressed = true;
                    }
                }
                InputEvent::PointerUp if menu_pressed && outcome.is_none() => {
                    outcome = Some(ScreenOutcome::Menu);
                }
                _ => {}
            }
        }

        let now = session.clock.now_ms();
        screen.grid.advance(now, ms_per_cell, &mut session.canvas);
        screen.stopwatch.tick(&mut session.canvas, now, screen.grid.is_solved());

        session.pace();
        session.canvas.clear(palette.background);
        screen.stopwatch.render(&mut session.canvas);
        screen.grid.render(&mut session.canvas);
        screen.menu_button.widget().render(&mut session.canvas);
        session.present()?;

        if let Some(outcome) = outcome {
            tracing::info!(?outcome, "puzzle closed");
            return Ok(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::input::ScriptedInput;
    use crate::render::Canvas;
    use crate::stopwatch::SAFE_MESSAGE;
    use rand::{rngs::StdRng, SeedableRng};

    fn session(config: Config, frames: Vec<Vec<InputEvent>>) -> Session<ScriptedInput, ManualClock, Vec<u8>> {
        Session::new(
            Canvas::new(41, 31),
            ScriptedInput::new(frames),
            ManualClock::new(0),
            Vec::new(),
            config,
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_layout_matches_screen() {
        let layout = PuzzleLayout::new(Rect::new(0, 0, 41, 31), 4, 1);
        assert_eq!(layout.grid.tile_w, 9);
        assert_eq!(layout.grid.tile_h, 4);
        assert_eq!(layout.stopwatch, Rect::new(1, 1, 39, 4));
        assert_eq!(layout.grid.slot_rect((0, 0)), Rect::new(1, 6, 9, 4));
        assert_eq!(layout.grid.slot_rect((3, 3)), Rect::new(31, 21, 9, 4));
        assert_eq!(layout.menu_button, Rect::new(1, 26, 39, 4));
    }

    #[test]
    fn test_layout_clamps_on_tiny_screens() {
        let layout = PuzzleLayout::new(Rect::new(0, 0, 5, 5), 6, 1);
        assert_eq!(layout.grid.tile_w, 1);
        assert_eq!(layout.grid.tile_h, 1);
    }

    #[test]
    fn test_menu_button_returns_to_menu() {
        let layout = PuzzleLayout::new(Rect::new(0, 0, 41, 31), 3, 1);
        let menu = layout.menu_button;
        let mut s = session(
            Config::default(),
            vec![
                vec![InputEvent::PointerDown { x: menu.x + 1, y: menu.y + 1 }],
                vec![InputEvent::PointerUp],
            ],
        );
        assert_eq!(run(&mut s, 3).unwrap(), ScreenOutcome::Menu);
        assert_eq!(s.canvas.live_images(), 0);
    }

    #[test]
    fn test_quit_is_propagated() {
        let mut s = session(Config::default(), vec![vec![], vec![InputEvent::Quit]]);
        assert_eq!(run(&mut s, 6).unwrap(), ScreenOutcome::Quit);
        assert_eq!(s.canvas.live_images(), 0);
    }

    #[test]
    fn test_unshuffled_puzzle_is_safe_at_once() {
        let config = Config {
            shuffle_steps: 0,
            ..Config::default()
        };
        let mut s = session(config, vec![vec![], vec![InputEvent::Quit]]);
        assert_eq!(run(&mut s, 3).unwrap(), ScreenOutcome::Quit);

        let layout = PuzzleLayout::new(s.canvas.bounds(), 3, 1);
        let row = layout.stopwatch.y + layout.stopwatch.h / 2;
        assert_eq!(s.canvas.row_text(row).trim(), SAFE_MESSAGE);
    }

    #[test]
    fn test_stopwatch_runs_while_unsolved() {
        // A single shuffle step always leaves the board one slide from solved.
        let config = Config {
            shuffle_steps: 1,
            ..Config::default()
        };
        let mut frames: Vec<Vec<InputEvent>> = std::iter::repeat(vec![]).take(101).collect();
        frames.push(vec![InputEvent::Quit]);
        let mut s = session(config, frames);
        assert_eq!(run(&mut s, 3).unwrap(), ScreenOutcome::Quit);

        // 101 paced frames of 16ms before the last tick.
        let layout = PuzzleLayout::new(s.canvas.bounds(), 3, 1);
        let row = layout.stopwatch.y + layout.stopwatch.h / 2;
        assert_eq!(s.canvas.row_text(row).trim(), "In danger 00:00:01");
    }
}
