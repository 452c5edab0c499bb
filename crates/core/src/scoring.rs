//! Scoring module - points for placements and cleared lines
//!
//! - Every placed cell is worth `per_block` points.
//! - Every cleared row or column adds `line_bonus` points. The bonus is per
//!   line, so a clear of N lines scales linearly with N, not with the number
//!   of cells removed.

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Points for the cells written by the placement.
    pub placement: u32,
    /// Points for the lines cleared afterwards.
    pub clear_bonus: u32,
    pub total: u32,
}

/// Points for placing `cells` cells
pub fn calculate_placement_score(cells: u32, per_block: u32) -> u32 {
    cells.saturating_mul(per_block)
}

/// Points for clearing `lines` rows and columns
pub fn calculate_clear_bonus(lines: u32, line_bonus: u32) -> u32 {
    lines.saturating_mul(line_bonus)
}

/// Calculate the complete score for one placement
pub fn calculate_score(cells: u32, lines: u32, per_block: u32, line_bonus: u32) -> ScoreResult {
    let placement = calculate_placement_score(cells, per_block);
    let clear_bonus = calculate_clear_bonus(lines, line_bonus);
    ScoreResult {
        placement,
        clear_bonus,
        total: placement.saturating_add(clear_bonus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_only() {
        let r = calculate_score(4, 0, 10, 50);
        assert_eq!(r.placement, 40);
        assert_eq!(r.clear_bonus, 0);
        assert_eq!(r.total, 40);
    }

    #[test]
    fn test_bonus_is_per_line() {
        assert_eq!(calculate_clear_bonus(1, 50), 50);
        assert_eq!(calculate_clear_bonus(2, 50), 100);
        assert_eq!(calculate_clear_bonus(5, 50), 250);
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        let r = calculate_score(u32::MAX, 2, 10, 50);
        assert_eq!(r.placement, u32::MAX);
        assert_eq!(r.total, u32::MAX);
    }
}
