//! Sliding-tile puzzle ("15 puzzle") played with the mouse in a terminal.

pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod puzzle;
pub mod render;
pub mod screen;
pub mod stopwatch;
pub mod tile;
pub mod widget;

pub use error::{Error, Result};
