//! The two interactive screens and the state they share.

pub mod menu;
pub mod puzzle;

use std::io::{self, Write};

use rand::rngs::StdRng;

use crate::clock::Clock;
use crate::config::Config;
use crate::error::Result;
use crate::input::InputSource;
use crate::render::Canvas;

/// Face used for every label.
pub const FONT_NAME: &str = "DS-Digital Bold";

/// What a screen asks for when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenOutcome {
    /// Show the difficulty menu.
    Menu,
    /// Play an N x N puzzle.
    Play(usize),
    Quit,
}

/// Everything a screen needs from the outside world, passed from screen to
/// screen by the outer loop.
pub struct Session<I, C, W> {
    pub canvas: Canvas,
    pub input: I,
    pub clock: C,
    pub out: W,
    pub config: Config,
    pub rng: StdRng,
    last_frame_ms: u64,
}

impl<I: InputSource, C: Clock, W: Write> Session<I, C, W> {
    pub fn new(canvas: Canvas, input: I, clock: C, out: W, config: Config, rng: StdRng) -> Self {
        let last_frame_ms = clock.now_ms();
        Self {
            canvas,
            input,
            clock,
            out,
            config,
            rng,
            last_frame_ms,
        }
    }

    /// Sleep out whatever is left of the current frame's budget.
    fn pace(&mut self) {
        let budget = self.config.frame_budget_ms();
        let elapsed = self.clock.now_ms().saturating_sub(self.last_frame_ms);
        if budget > elapsed {
            self.clock.sleep_ms(budget - elapsed);
        }
        self.last_frame_ms = self.clock.now_ms();
    }

    fn present(&mut self) -> io::Result<()> {
        self.canvas.present(&mut self.out)?;
        self.out.flush()
    }
}

/// Run the screen `next` names and report what should follow it.
pub fn run_screen<I: InputSource, C: Clock, W: Write>(
    session: &mut Session<I, C, W>,
    next: ScreenOutcome,
) -> Result<ScreenOutcome> {
    match next {
        ScreenOutcome::Menu => menu::run(session),
        ScreenOutcome::Play(size) => puzzle::run(session, size),
        ScreenOutcome::Quit => Ok(ScreenOutcome::Quit),
    }
}
