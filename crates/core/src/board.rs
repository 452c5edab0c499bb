//! Board module - manages the game grid
//!
//! The board is a rows x cols grid (10x10 by default) where each cell holds a
//! tag: 0 for empty, anything else for a filled cell.
//! Uses a flat vector in row-major order for cache locality.
//! Coordinates: (x, y) where x is the column (left to right) and y the row
//! (top to bottom). Pieces are anchored by their top-left cell.

use tracing::trace;

use crate::error::PlaceError;
use crate::shape::Shape;
use crate::types::{Tag, EMPTY_TAG};

/// The game board - flat storage, dimensions fixed at construction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Flat array of cells, row-major order (y * cols + x)
    cells: Vec<Tag>,
}

impl Board {
    /// Create a new empty board
    pub fn new(rows: u8, cols: u8) -> Self {
        let rows = rows as usize;
        let cols = cols as usize;
        Self {
            rows,
            cols,
            cells: vec![EMPTY_TAG; rows * cols],
        }
    }

    /// Build a board from explicit rows of tags.
    ///
    /// Returns `None` for an empty or ragged grid, or one larger than 255 in
    /// either dimension.
    pub fn from_rows<R: AsRef<[Tag]>>(grid: &[R]) -> Option<Self> {
        let rows = grid.len();
        let cols = grid.first()?.as_ref().len();
        if cols == 0 || rows > u8::MAX as usize || cols > u8::MAX as usize {
            return None;
        }
        let mut cells = Vec::with_capacity(rows * cols);
        for row in grid {
            let row = row.as_ref();
            if row.len() != cols {
                return None;
            }
            cells.extend_from_slice(row);
        }
        Some(Self { rows, cols, cells })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }

    /// Number of rows (height)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (width)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Tag> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, tag: Tag) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = tag;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and empty
    pub fn is_empty_at(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(EMPTY_TAG))
    }

    /// Number of filled cells on the whole board
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&t| t != EMPTY_TAG).count()
    }

    /// Check whether `shape` fits with its top-left cell at (x, y).
    ///
    /// True iff the bounding box lies inside the board and every occupied
    /// cell of the shape lands on an empty board cell.
    pub fn can_place(&self, shape: &Shape, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (ax, ay) = (x as usize, y as usize);
        if ax + shape.width() > self.cols || ay + shape.height() > self.rows {
            return false;
        }
        shape
            .cells()
            .iter()
            .all(|&(dx, dy)| self.cells[(ay + dy as usize) * self.cols + ax + dx as usize] == EMPTY_TAG)
    }

    /// Write `tag` into every occupied cell of `shape` anchored at (x, y).
    ///
    /// Fails without touching the board if the shape does not fit or the tag
    /// is the empty tag. Returns the number of cells written.
    pub fn place(&mut self, shape: &Shape, x: i32, y: i32, tag: Tag) -> Result<usize, PlaceError> {
        if tag == EMPTY_TAG || !self.can_place(shape, x, y) {
            return Err(PlaceError::InvalidPlacement);
        }

        let cells = shape.cells();
        let (ax, ay) = (x as usize, y as usize);
        for &(dx, dy) in &cells {
            self.cells[(ay + dy as usize) * self.cols + ax + dx as usize] = tag;
        }
        Ok(cells.len())
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.rows || self.cols == 0 {
            return false;
        }
        let start = y * self.cols;
        self.cells[start..start + self.cols]
            .iter()
            .all(|&t| t != EMPTY_TAG)
    }

    /// Check if a column is completely filled
    pub fn is_col_full(&self, x: usize) -> bool {
        if x >= self.cols || self.rows == 0 {
            return false;
        }
        (0..self.rows).all(|y| self.cells[y * self.cols + x] != EMPTY_TAG)
    }

    /// Clear every full row and column, then collapse columns.
    ///
    /// Fullness is judged on one snapshot per pass: all full rows and columns
    /// are found first, then cleared together, so a cell shared by a full row
    /// and a full column counts toward both lines. After clearing, each column
    /// compacts its remaining cells toward the bottom edge. Gravity can
    /// complete new rows, so passes repeat until no full line is left.
    ///
    /// Returns the total number of rows plus columns cleared.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut total = 0;
        loop {
            let cleared = self.clear_pass();
            if cleared == 0 {
                break;
            }
            total += cleared;
        }
        total
    }

    /// One detect/clear/collapse pass
    fn clear_pass(&mut self) -> usize {
        let full_rows: Vec<usize> = (0..self.rows).filter(|&y| self.is_row_full(y)).collect();
        let full_cols: Vec<usize> = (0..self.cols).filter(|&x| self.is_col_full(x)).collect();
        let cleared = full_rows.len() + full_cols.len();
        if cleared == 0 {
            return 0;
        }

        for &y in &full_rows {
            let start = y * self.cols;
            self.cells[start..start + self.cols].fill(EMPTY_TAG);
        }
        for &x in &full_cols {
            for y in 0..self.rows {
                self.cells[y * self.cols + x] = EMPTY_TAG;
            }
        }
        trace!(rows = ?full_rows, cols = ?full_cols, "cleared lines");

        self.collapse_columns();
        cleared
    }

    /// Slide the filled cells of every column toward the bottom edge.
    /// Uses a two-pointer pass per column; relative order is preserved.
    fn collapse_columns(&mut self) {
        let cols = self.cols;
        for x in 0..cols {
            let mut write_y = self.rows;
            for read_y in (0..self.rows).rev() {
                let tag = self.cells[read_y * cols + x];
                if tag != EMPTY_TAG {
                    write_y -= 1;
                    if write_y != read_y {
                        self.cells[write_y * cols + x] = tag;
                    }
                }
            }
            for y in 0..write_y {
                self.cells[y * cols + x] = EMPTY_TAG;
            }
        }
    }

    /// Get a reference to the internal cells array (row-major)
    pub fn cells(&self) -> &[Tag] {
        &self.cells
    }

    /// Copy the grid out as rows of tags
    pub fn to_rows(&self) -> Vec<Vec<Tag>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells.chunks(self.cols).map(|row| row.to_vec()).collect()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_TAG);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_ROWS, crate::types::DEFAULT_COLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::find_shape;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(10, 10);
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 9), Some(99));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 10), None);
    }

    #[test]
    fn test_non_square_board_index() {
        let board = Board::new(3, 5);
        assert_eq!(board.rows(), 3);
        assert_eq!(board.cols(), 5);
        assert_eq!(board.index(4, 2), Some(14));
        assert_eq!(board.index(5, 0), None);
        assert_eq!(board.index(0, 3), None);
    }

    #[test]
    fn test_place_rejects_empty_tag() {
        let mut board = Board::new(4, 4);
        let single = find_shape("single").unwrap();
        assert_eq!(board.place(single, 0, 0, EMPTY_TAG), Err(PlaceError::InvalidPlacement));
        assert_eq!(board.filled_count(), 0);
    }

    #[test]
    fn test_collapse_keeps_column_order() {
        let mut board = Board::from_rows(&[[1u8, 0], [0, 0], [2, 0], [0, 3]]).unwrap();
        board.collapse_columns();
        assert_eq!(board.to_rows(), vec![vec![0, 0], vec![0, 0], vec![1, 0], vec![2, 3]]);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let ragged: Vec<Vec<Tag>> = vec![vec![0, 0], vec![0]];
        assert!(Board::from_rows(&ragged).is_none());
        let empty: Vec<Vec<Tag>> = Vec::new();
        assert!(Board::from_rows(&empty).is_none());
    }

    #[test]
    fn test_zero_width_board_has_no_lines() {
        let mut board = Board::new(3, 0);
        assert!(!board.is_row_full(0));
        assert_eq!(board.clear_full_lines(), 0);
        assert_eq!(board.to_rows(), vec![Vec::<Tag>::new(); 3]);

        let mut board = Board::new(0, 0);
        assert_eq!(board.clear_full_lines(), 0);
        assert!(board.to_rows().is_empty());
        let single = find_shape("single").unwrap();
        assert!(!board.can_place(single, 0, 0));
    }
}
