use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    PointerDown { x: i32, y: i32 },
    PointerUp,
}

pub trait InputSource {
    /// Everything that arrived since the last call. Never blocks.
    fn drain(&mut self) -> io::Result<Vec<InputEvent>>;
}

/// Terminal mouse and keyboard. Mouse capture must already be enabled.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn drain(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Some(ev) = translate(event::read()?) {
                events.push(ev);
            }
        }
        Ok(events)
    }
}

fn translate(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(KeyEvent { code, modifiers, .. }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(InputEvent::Quit),
            KeyCode::Char('q') | KeyCode::Esc => Some(InputEvent::Quit),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind, column, row, ..
        }) => match kind {
            MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerDown {
                x: column as i32,
                y: row as i32,
            }),
            MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::PointerUp),
            _ => None,
        },
        _ => None,
    }
}

/// Replays a fixed script, one batch per frame.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn drain(&mut self) -> io::Result<Vec<InputEvent>> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(translate(key(KeyCode::Char('q'), KeyModifiers::NONE)), Some(InputEvent::Quit));
        assert_eq!(translate(key(KeyCode::Esc, KeyModifiers::NONE)), Some(InputEvent::Quit));
        assert_eq!(translate(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(InputEvent::Quit));
        assert_eq!(translate(key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_left_button_maps_to_pointer() {
        assert_eq!(
            translate(mouse(MouseEventKind::Down(MouseButton::Left), 7, 3)),
            Some(InputEvent::PointerDown { x: 7, y: 3 })
        );
        assert_eq!(
            translate(mouse(MouseEventKind::Up(MouseButton::Left), 7, 3)),
            Some(InputEvent::PointerUp)
        );
        assert_eq!(translate(mouse(MouseEventKind::Down(MouseButton::Right), 7, 3)), None);
        assert_eq!(translate(mouse(MouseEventKind::Moved, 1, 1)), None);
    }

    #[test]
    fn test_scripted_input_runs_dry() {
        let mut input = ScriptedInput::new(vec![vec![InputEvent::PointerUp]]);
        assert_eq!(input.drain().unwrap(), vec![InputEvent::PointerUp]);
        assert!(input.is_exhausted());
        assert!(input.drain().unwrap().is_empty());
    }
}
