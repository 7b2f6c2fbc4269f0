use std::io::Write;
use std::rc::Rc;

use super::{ScreenOutcome, Session, FONT_NAME};
use crate::clock::Clock;
use crate::error::Result;
use crate::geometry::Rect;
use crate::input::{InputEvent, InputSource};
use crate::puzzle::MIN_SIZE;
use crate::render::Font;
use crate::widget::{Button, Clickable};

const CHOICES: [&str; 4] = ["3x3", "4x4", "5x5", "6x6"];

/// Stack the difficulty buttons vertically inside `bounds`.
pub fn button_rects(bounds: Rect, border: i32) -> Vec<Rect> {
    let count = CHOICES.len() as i32;
    let width = (bounds.w - 2 * border).max(1);
    let height = ((bounds.h - (count + 1) * border) / count).max(1);

    (0..count)
        .map(|i| Rect::new(bounds.x + border, bounds.y + border + i * (height + border), width, height))
        .collect()
}

/// Let the player pick a board size.
pub fn run<I: InputSource, C: Clock, W: Write>(session: &mut Session<I, C, W>) -> Result<ScreenOutcome> {
    let palette = session.config.palette.clone();
    let font = Rc::new(Font::new(FONT_NAME, true));

    let mut buttons: Vec<Button> = button_rects(session.canvas.bounds(), session.config.menu_border)
        .into_iter()
        .zip(CHOICES)
        .map(|(rect, text)| {
            let mut button = Button::new(rect, palette.menu_button, Rc::clone(&font), palette.menu_label);
            button.widget_mut().set_label(&mut session.canvas, text);
            button
        })
        .collect();

    let result = menu_loop(session, &mut buttons);

    for button in &mut buttons {
        button.widget_mut().free(&mut session.canvas);
    }
    result
}

fn menu_loop<I: InputSource, C: Clock, W: Write>(
    session: &mut Session<I, C, W>,
    buttons: &mut [Button],
) -> Result<ScreenOutcome> {
    let palette = session.config.palette.clone();
    let mut difficulty = None;

    loop {
        let mut outcome = None;
        for event in session.input.drain()? {
            match event {
                InputEvent::Quit => outcome = Some(ScreenOutcome::Quit),
                InputEvent::PointerDown { x, y } => {
                    for (i, button) in buttons.iter_mut().enumerate() {
                        if button.contains_point(x, y) {
                            button.change_color_to(palette.button_down);
                            difficulty = Some(MIN_SIZE + i);
                        }
                    }
                }
                InputEvent::PointerUp => {
                    for button in buttons.iter_mut() {
                        button.change_color_to(palette.menu_button);
                    }
                    if let (None, Some(size)) = (outcome, difficulty) {
                        outcome = Some(ScreenOutcome::Play(size));
                    }
                }
            }
        }

        session.pace();
        session.canvas.clear(palette.background);
        for button in buttons.iter() {
            button.widget().render(&mut session.canvas);
        }
        session.present()?;

        if let Some(outcome) = outcome {
            tracing::info!(?outcome, "menu closed");
            return Ok(outcome);
        }
    }
}
