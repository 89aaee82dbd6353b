//! Square toroidal grid of cell states.

use std::fmt;

use rand::Rng;

use crate::error::ConfigError;

/// Cell state. 0 is dead, 1 is alive, larger values are rule-specific.
pub type Cell = u8;

pub const DEAD: Cell = 0;
pub const ALIVE: Cell = 1;

/// N×N grid stored row-major. Every coordinate lookup wraps modulo N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an all-dead board
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        Ok(Self {
            size,
            cells: vec![DEAD; size * size],
        })
    }

    /// Build a board from rows; every row must have as many cells as there are rows.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Result<Self, ConfigError> {
        let size = rows.len();
        if size == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                return Err(ConfigError::BoardShape {
                    row,
                    len: values.len(),
                    size,
                });
            }
            cells.extend_from_slice(values);
        }
        Ok(Self { size, cells })
    }

    /// Parse a text board: one row per line, digits are states, `.` is dead.
    ///
    /// Blank lines and whitespace inside a line are ignored.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let mut row = Vec::new();
            for ch in line.chars().filter(|c| !c.is_whitespace()) {
                let cell = match ch {
                    '.' => DEAD,
                    '0'..='9' => ch as u8 - b'0',
                    other => return Err(ConfigError::BoardCell(other)),
                };
                row.push(cell);
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }
        Self::from_rows(&rows)
    }

    /// Fill a board with uniformly random 0/1 cells
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, ConfigError> {
        let mut board = Self::new(size)?;
        for cell in &mut board.cells {
            *cell = rng.gen_range(0..=1);
        }
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Wrap a signed coordinate into 0..size
    pub fn wrap(&self, coord: isize) -> usize {
        coord.rem_euclid(self.size as isize) as usize
    }

    /// State at (row, col), both taken modulo N
    pub fn get(&self, row: isize, col: isize) -> Cell {
        self.cells[self.index(self.wrap(row), self.wrap(col))]
    }

    /// State at in-range (row, col)
    pub fn at(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    /// Whether the cell is exactly alive (state 1). Other nonzero states do not count.
    pub fn is_alive(&self, row: isize, col: isize) -> bool {
        self.get(row, col) == ALIVE
    }

    /// Count alive cells in the Moore neighbourhood of (row, col).
    ///
    /// Neighbours whose wrapped coordinates land on the centre are skipped, so
    /// a 1×1 board always reports zero. On a 2×2 board the same cell can be
    /// counted more than once.
    pub fn count_neighbors(&self, row: usize, col: usize) -> usize {
        let mut count = 0;
        for dr in -1..=1isize {
            for dc in -1..=1isize {
                let r = self.wrap(row as isize + dr);
                let c = self.wrap(col as isize + dc);
                if (r != row || c != col) && self.at(r, c) == ALIVE {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == DEAD)
    }

    /// Overwrite this board with another of the same size without reallocating
    pub(crate) fn copy_from(&mut self, other: &Board) {
        debug_assert_eq!(self.size, other.size);
        self.cells.copy_from_slice(&other.cells);
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for &cell in self.row(row) {
                let ch = if cell == DEAD { '.' } else { (b'0' + cell.min(9)) as char };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
