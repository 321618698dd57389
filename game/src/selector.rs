use serde::{Deserialize, Serialize};

use crate::board::Piece;
use crate::error::InvariantViolation;

/// The column a waiting piece hovers over. Disarmed while a drop is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    cols: usize,
    column: usize,
    piece: Option<Piece>,
}

impl Selector {
    pub fn new(cols: usize, column: usize, piece: Piece) -> Result<Self, InvariantViolation> {
        let mut selector = Self {
            cols,
            column: 0,
            piece: None,
        };
        selector.arm(column, piece)?;
        Ok(selector)
    }

    /// Like [`Selector::new`], but pulls `column` onto the board instead of failing.
    pub fn clamped(cols: usize, column: usize, piece: Piece) -> Self {
        let cols = cols.max(1);
        Self {
            cols,
            column: column.min(cols - 1),
            piece: Some(piece),
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn piece(&self) -> Option<Piece> {
        self.piece
    }

    pub fn is_armed(&self) -> bool {
        self.piece.is_some()
    }

    pub fn armed(&self) -> Option<(usize, Piece)> {
        self.piece.map(|piece| (self.column, piece))
    }

    /// Wraps from column 0 to the last column. Returns `false` when disarmed.
    pub fn move_left(&mut self) -> bool {
        if !self.is_armed() || self.cols == 0 {
            return false;
        }
        self.column = (self.column + self.cols - 1) % self.cols;
        true
    }

    /// Wraps from the last column to column 0. Returns `false` when disarmed.
    pub fn move_right(&mut self) -> bool {
        if !self.is_armed() || self.cols == 0 {
            return false;
        }
        self.column = (self.column + 1) % self.cols;
        true
    }

    pub fn arm(&mut self, column: usize, piece: Piece) -> Result<(), InvariantViolation> {
        if column >= self.cols {
            return Err(InvariantViolation::ColumnOutOfRange {
                column,
                cols: self.cols,
            });
        }
        self.column = column;
        self.piece = Some(piece);
        Ok(())
    }

    /// Takes the waiting piece; the column is kept for display only.
    pub fn disarm(&mut self) -> Option<Piece> {
        self.piece.take()
    }
}
