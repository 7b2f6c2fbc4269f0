use rand::{seq::SliceRandom, Rng};
use std::fmt;

use crate::error::{Error, Result};

/// Smallest and largest supported board edge.
pub const MIN_SIZE: usize = 3;
pub const MAX_SIZE: usize = 6;

/// A grid slot as `(row, col)`.
pub type Slot = (usize, usize);

/// Direction a tile slides into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    /// Neighbour order used when scanning around the blank: the tile above,
    /// to the right, below, then to the left of it.
    pub const AROUND_BLANK: [Move; 4] = [Move::Down, Move::Left, Move::Up, Move::Right];

    /// How far the blank travels, as `(row, col)`, when this move is applied.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Arrangement of tile numbers on an N x N board.
///
/// Tiles are numbered `1..=N²` in row-major home order; the tile numbered
/// `N²` is the blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    board: Vec<Vec<u32>>,
    blank: Slot,
}

impl Board {
    /// A solved board of the given size.
    pub fn new(size: usize) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(Error::InvalidSize(size));
        }

        let board = (0..size)
            .map(|row| (0..size).map(|col| home_number(size, (row, col))).collect())
            .collect();

        Ok(Self {
            size,
            board,
            blank: (size - 1, size - 1),
        })
    }

    /// Build a board from explicit rows, rejecting anything that is not a
    /// permutation of `1..=N²` or that cannot be reached from the solved state.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self> {
        let size = rows.len();
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(Error::InvalidSize(size));
        }
        if let Some(row) = rows.iter().find(|row| row.len() != size) {
            return Err(Error::InvalidBoard(format!(
                "expected {} columns per row, found {}",
                size,
                row.len()
            )));
        }

        let blank_number = (size * size) as u32;
        let mut seen = vec![false; size * size];
        let mut blank = None;
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value == 0 || value > blank_number {
                    return Err(Error::InvalidBoard(format!("tile {} out of range", value)));
                }
                if std::mem::replace(&mut seen[value as usize - 1], true) {
                    return Err(Error::InvalidBoard(format!("tile {} appears twice", value)));
                }
                if value == blank_number {
                    blank = Some((r, c));
                }
            }
        }
        let blank = blank.ok_or_else(|| Error::InvalidBoard("no blank tile".to_string()))?;

        let board = Self {
            size,
            board: rows,
            blank,
        };
        if !board.is_current_state_solvable() {
            return Err(Error::Unsolvable);
        }
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn blank(&self) -> Slot {
        self.blank
    }

    pub fn blank_number(&self) -> u32 {
        (self.size * self.size) as u32
    }

    pub fn number_at(&self, (row, col): Slot) -> u32 {
        self.board[row][col]
    }

    /// Slot the blank would land on if `movement` were applied.
    pub fn target_of(&self, movement: Move) -> Option<Slot> {
        let (dr, dc) = movement.as_offset();

        let new_row = self.blank.0 as isize + dr;
        let new_col = self.blank.1 as isize + dc;

        if new_row >= 0 && new_row < self.size as isize && new_col >= 0 && new_col < self.size as isize {
            Some((new_row as usize, new_col as usize))
        } else {
            None
        }
    }

    /// Moves that keep the blank on the board: 2 in a corner, 3 on an edge,
    /// 4 in the interior.
    pub fn legal_moves(&self) -> Vec<Move> {
        Move::AROUND_BLANK
            .into_iter()
            .filter(|&m| self.target_of(m).is_some())
            .collect()
    }

    /// The move that would slide the tile at `slot` into the blank, if the
    /// two are orthogonal neighbours.
    pub fn move_for(&self, slot: Slot) -> Option<Move> {
        Move::AROUND_BLANK
            .into_iter()
            .find(|&m| self.target_of(m) == Some(slot))
    }

    pub fn apply_move(&mut self, movement: Move) -> bool {
        match self.target_of(movement) {
            Some((row, col)) => {
                let (blank_row, blank_col) = self.blank;
                self.board[blank_row][blank_col] = self.board[row][col];
                self.board[row][col] = self.blank_number();
                self.blank = (row, col);
                true
            }
            None => false,
        }
    }

    /// Random walk of `steps` uniformly chosen legal moves from the current
    /// state. Returns the moves in the order they were applied.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, steps: usize, rng: &mut R) -> Vec<Move> {
        let mut history = Vec::with_capacity(steps);

        for _ in 0..steps {
            let moves = self.legal_moves();
            if let Some(&movement) = moves.choose(rng) {
                self.apply_move(movement);
                history.push(movement);
            }
        }

        history
    }

    pub fn is_placed(&self, slot: Slot) -> bool {
        self.number_at(slot) == home_number(self.size, slot)
    }

    pub fn is_solved(&self) -> bool {
        let blank_number = self.blank_number();

        for row in 0..self.size {
            for col in 0..self.size {
                let value = self.board[row][col];
                if value != blank_number && !self.is_placed((row, col)) {
                    return false;
                }
            }
        }

        true
    }

    pub fn is_current_state_solvable(&self) -> bool {
        let flat_board: Vec<u32> = self
            .board
            .iter()
            .flat_map(|row| row.iter().cloned())
            .collect();

        Self::is_solvable(&flat_board, self.size, self.blank.0)
    }

    fn is_solvable(flattened: &[u32], size: usize, blank_row: usize) -> bool {
        let inversions = Self::count_inversions(flattened, (size * size) as u32);

        if size % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + blank_row) % 2 == 1
        }
    }

    fn count_inversions(flattened: &[u32], blank_number: u32) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != blank_number)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != blank_number && next < val)
                    .count()
            })
            .sum()
    }
}

/// Number of the tile that belongs at `slot` on a solved board.
pub fn home_number(size: usize, (row, col): Slot) -> u32 {
    (row * size + col + 1) as u32
}

/// Home slot of the tile numbered `number`.
pub fn home_slot(size: usize, number: u32) -> Slot {
    let index = number as usize - 1;
    (index / size, index % size)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blank_number = self.blank_number();
        for row in &self.board {
            for &val in row {
                if val == blank_number {
                    write!(f, "{:>2} ", "")?;
                } else {
                    write!(f, "{:2} ", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
