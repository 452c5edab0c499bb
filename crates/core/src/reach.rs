//! Reachability - does any pending piece still fit somewhere?
//!
//! Brute force over every anchor: O(rows * cols * cells) per shape.

use crate::board::Board;
use crate::round::PendingPiece;
use crate::shape::Shape;

/// Iterator over every legal anchor for a shape, row-major (y outer, x inner)
pub struct Placements<'a> {
    board: &'a Board,
    shape: &'a Shape,
    x: usize,
    y: usize,
    max_x: usize,
    max_y: usize,
    done: bool,
}

impl<'a> Iterator for Placements<'a> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let (x, y) = (self.x, self.y);
            if self.x < self.max_x {
                self.x += 1;
            } else {
                self.x = 0;
                if self.y < self.max_y {
                    self.y += 1;
                } else {
                    self.done = true;
                }
            }
            if self.board.can_place(self.shape, x as i32, y as i32) {
                return Some((x as i32, y as i32));
            }
        }
        None
    }
}

/// All anchors at which `shape` can legally be placed
pub fn placements<'a>(board: &'a Board, shape: &'a Shape) -> Placements<'a> {
    let fits = shape.width() <= board.cols() && shape.height() <= board.rows();
    Placements {
        board,
        shape,
        x: 0,
        y: 0,
        max_x: board.cols().saturating_sub(shape.width()),
        max_y: board.rows().saturating_sub(shape.height()),
        done: !fits,
    }
}

/// True iff `shape` fits at one or more anchors
pub fn any_placement_exists(board: &Board, shape: &Shape) -> bool {
    placements(board, shape).next().is_some()
}

/// Number of anchors at which `shape` fits
pub fn count_placements(board: &Board, shape: &Shape) -> usize {
    placements(board, shape).count()
}

/// True iff some unused pending piece can still be placed.
///
/// This is the sole game-over predicate.
pub fn any_move_exists(board: &Board, pending: &[PendingPiece]) -> bool {
    pending
        .iter()
        .filter(|p| !p.used)
        .any(|p| any_placement_exists(board, p.shape))
}
