//! Shape module - polyomino piece shapes and the fixed catalog
//!
//! A shape is a rectangular 0/1 matrix stored row by row. Placing a shape at
//! anchor (x, y) maps matrix cell (dx, dy) onto board cell (x + dx, y + dy).

use arrayvec::ArrayVec;

use crate::types::{MAX_SHAPE_CELLS, MAX_SHAPE_DIM};

/// Offset of a single occupied cell relative to the shape's top-left anchor
pub type CellOffset = (u8, u8);

/// Occupied offsets of a shape, stack-allocated
pub type ShapeCells = ArrayVec<CellOffset, MAX_SHAPE_CELLS>;

/// Immutable piece shape
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    name: &'static str,
    rows: &'static [&'static [u8]],
}

impl Shape {
    /// Create a shape with compile-time validation.
    ///
    /// The matrix must be rectangular, at most 4x4, and have at least one
    /// filled cell in its first and last row and column.
    pub const fn new(name: &'static str, rows: &'static [&'static [u8]]) -> Self {
        assert!(!rows.is_empty(), "shape needs at least one row");
        assert!(rows.len() <= MAX_SHAPE_DIM, "shape exceeds MAX_SHAPE_DIM rows");
        let width = rows[0].len();
        assert!(width > 0, "shape needs at least one column");
        assert!(width <= MAX_SHAPE_DIM, "shape exceeds MAX_SHAPE_DIM columns");

        let mut top = false;
        let mut bottom = false;
        let mut left = false;
        let mut right = false;
        let last_row = rows.len() - 1;
        let mut y = 0;
        while y < rows.len() {
            assert!(rows[y].len() == width, "shape rows must have equal length");
            let mut x = 0;
            while x < width {
                let v = rows[y][x];
                assert!(v <= 1, "shape cells must be 0 or 1");
                if v == 1 {
                    if y == 0 {
                        top = true;
                    }
                    if y == last_row {
                        bottom = true;
                    }
                    if x == 0 {
                        left = true;
                    }
                    if x == width - 1 {
                        right = true;
                    }
                }
                x += 1;
            }
            y += 1;
        }
        assert!(top && bottom && left && right, "shape has an empty border line");

        Self { name, rows }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bounding box width (columns)
    #[inline]
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    /// Bounding box height (rows)
    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Whether matrix cell (dx, dy) is occupied; false outside the bounding box
    #[inline]
    pub fn is_filled(&self, dx: usize, dy: usize) -> bool {
        self.rows
            .get(dy)
            .and_then(|row| row.get(dx))
            .map(|&v| v != 0)
            .unwrap_or(false)
    }

    /// Occupied cell offsets in row-major order
    pub fn cells(&self) -> ShapeCells {
        let mut out = ShapeCells::new();
        for (dy, row) in self.rows.iter().enumerate() {
            for (dx, &v) in row.iter().enumerate() {
                if v != 0 {
                    out.push((dx as u8, dy as u8));
                }
            }
        }
        out
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&v| v != 0).count())
            .sum()
    }

    /// Rows of the underlying 0/1 matrix
    pub fn rows(&self) -> &'static [&'static [u8]] {
        self.rows
    }
}

/// The sixteen canonical piece shapes.
///
/// Order matters: samplers index into this slice.
pub static CATALOG: [Shape; 16] = [
    Shape::new("single", &[&[1]]),
    Shape::new("bar2h", &[&[1, 1]]),
    Shape::new("bar3h", &[&[1, 1, 1]]),
    Shape::new("bar4h", &[&[1, 1, 1, 1]]),
    Shape::new("bar2v", &[&[1], &[1]]),
    Shape::new("bar3v", &[&[1], &[1], &[1]]),
    Shape::new("square", &[&[1, 1], &[1, 1]]),
    Shape::new("small_l", &[&[1, 0], &[1, 1]]),
    Shape::new("small_j", &[&[0, 1], &[1, 1]]),
    Shape::new("t", &[&[1, 1, 1], &[0, 1, 0]]),
    Shape::new("tall_l", &[&[1, 0], &[1, 0], &[1, 1]]),
    Shape::new("tall_j", &[&[0, 1], &[0, 1], &[1, 1]]),
    Shape::new("big_l", &[&[1, 0, 0], &[1, 1, 1]]),
    Shape::new("z", &[&[1, 1, 0], &[0, 1, 1]]),
    Shape::new("s", &[&[0, 1, 1], &[1, 1, 0]]),
    Shape::new("flat_l", &[&[1, 1, 1], &[1, 0, 0]]),
];

/// The full catalog as a slice
pub fn catalog() -> &'static [Shape] {
    &CATALOG
}

/// Look up a catalog shape by name
pub fn find_shape(name: &str) -> Option<&'static Shape> {
    CATALOG.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_sixteen_distinct_shapes() {
        assert_eq!(CATALOG.len(), 16);
        for (i, a) in CATALOG.iter().enumerate() {
            for b in CATALOG.iter().skip(i + 1) {
                assert_ne!(a.rows(), b.rows(), "{} duplicates {}", a.name(), b.name());
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_t_shape_cells() {
        let t = find_shape("t").unwrap();
        assert_eq!(t.width(), 3);
        assert_eq!(t.height(), 2);
        assert_eq!(t.cell_count(), 4);
        assert_eq!(t.cells().as_slice(), &[(0, 0), (1, 0), (2, 0), (1, 1)]);
        assert!(t.is_filled(1, 1));
        assert!(!t.is_filled(0, 1));
        assert!(!t.is_filled(3, 0));
    }

    #[test]
    fn test_cell_count_matches_cells() {
        for shape in catalog() {
            assert_eq!(shape.cells().len(), shape.cell_count());
            assert!(shape.cell_count() > 0);
        }
    }
}
