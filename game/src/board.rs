use serde::{Deserialize, Serialize};

use crate::error::InvariantViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Piece {
    /// Rendered red; moves first by default.
    PlayerA,
    /// Rendered yellow.
    PlayerB,
}

impl Piece {
    pub fn other(self) -> Self {
        match self {
            Self::PlayerA => Self::PlayerB,
            Self::PlayerB => Self::PlayerA,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Filled(Piece),
}

impl Cell {
    pub fn piece(self) -> Option<Piece> {
        match self {
            Self::Empty => None,
            Self::Filled(piece) => Some(piece),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

/// Grid of settled pieces. Row `0` is the bottom row, the first to fill.
///
/// Only [`Board::commit`] mutates cells, and it refuses anything except the lowest empty cell of
/// a column, so a board built through this API always satisfies gravity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Row-major, bottom row first.
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn check_column(&self, column: usize) -> Result<(), InvariantViolation> {
        if column >= self.cols {
            return Err(InvariantViolation::ColumnOutOfRange {
                column,
                cols: self.cols,
            });
        }
        Ok(())
    }

    fn index(&self, row: usize, column: usize) -> Result<usize, InvariantViolation> {
        self.check_column(column)?;
        if row >= self.rows {
            return Err(InvariantViolation::RowOutOfRange {
                row,
                rows: self.rows,
            });
        }
        Ok(row * self.cols + column)
    }

    pub fn get(&self, row: usize, column: usize) -> Result<Cell, InvariantViolation> {
        let i = self.index(row, column)?;
        Ok(self.cells[i])
    }

    /// Number of non-empty cells in `column`.
    pub fn filled_count(&self, column: usize) -> Result<usize, InvariantViolation> {
        self.check_column(column)?;
        Ok(self
            .cells
            .iter()
            .skip(column)
            .step_by(self.cols)
            .filter(|cell| !cell.is_empty())
            .count())
    }

    pub fn is_column_full(&self, column: usize) -> Result<bool, InvariantViolation> {
        Ok(self.filled_count(column)? >= self.rows)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Row a piece dropped into `column` would occupy, or `None` when the column is full.
    pub fn landing_row(&self, column: usize) -> Result<Option<usize>, InvariantViolation> {
        let filled = self.filled_count(column)?;
        Ok((filled < self.rows).then_some(filled))
    }

    /// Places `piece` at `(row, column)`.
    ///
    /// The target must be empty and must be the lowest empty cell of its column; anything else
    /// means the caller computed the landing row from a stale board.
    pub fn commit(&mut self, row: usize, column: usize, piece: Piece) -> Result<(), InvariantViolation> {
        let i = self.index(row, column)?;
        if !self.cells[i].is_empty() {
            return Err(InvariantViolation::CellOccupied { row, column });
        }
        let expected = self.filled_count(column)?;
        if row != expected {
            return Err(InvariantViolation::StaleLandingRow {
                row,
                column,
                expected,
            });
        }
        self.cells[i] = Cell::Filled(piece);
        Ok(())
    }

    /// Settled pieces as `(row, column, piece)`, bottom row first.
    pub fn pieces(&self) -> impl Iterator<Item = (usize, usize, Piece)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.piece().map(|piece| (i / self.cols, i % self.cols, piece))
        })
    }

    /// No column holds an empty cell below a filled one.
    pub fn satisfies_gravity(&self) -> bool {
        (0..self.cols).all(|column| {
            let mut seen_empty = false;
            for row in 0..self.rows {
                let empty = self.cells[row * self.cols + column].is_empty();
                if seen_empty && !empty {
                    return false;
                }
                seen_empty |= empty;
            }
            true
        })
    }
}
