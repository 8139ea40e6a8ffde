//! Next-move suggestions backed by the optimal solver.

use crate::{
    puzzle::{Direction, Puzzle},
    solver::{solve, SolveOptions},
};

/// Node budget for interactive hints.
pub const HINT_MAX_NODES: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveHint {
    /// Flat index of the tile to move.
    pub tile_index: usize,
    pub tile_id: u8,
    /// Way the tile travels into the blank.
    pub direction: Direction,
}

/// First move of an optimal solution for raw board input.
///
/// `side` is derived from the tile count when omitted. Returns `None` for
/// unsupported or malformed boards, solved boards, and boards the solver
/// could not finish within [`HINT_MAX_NODES`].
///
/// # Examples
///
/// ```
/// use slider_puzzle::{hint::next_optimal_move, Direction, Puzzle};
///
/// let solved = Puzzle::solved(4);
/// let start = solved.apply_move(11);
/// let hint = next_optimal_move(start.tiles(), None).unwrap();
/// assert_eq!(hint.tile_id, 12);
/// assert_eq!(hint.direction, Direction::Up);
/// ```
pub fn next_optimal_move(tiles: &[u8], side: Option<usize>) -> Option<MoveHint> {
    let puzzle = match Puzzle::resolve(tiles, side) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            log::debug!("no hint for malformed board: {err}");
            return None;
        }
    };
    next_optimal_move_for(
        &puzzle,
        &SolveOptions {
            max_nodes: HINT_MAX_NODES,
        },
    )
}

/// [`next_optimal_move`] for an already validated board and explicit budget.
pub fn next_optimal_move_for(puzzle: &Puzzle, options: &SolveOptions) -> Option<MoveHint> {
    let result = solve(puzzle, options);
    if let Some(failure) = result.failure() {
        log::debug!("no hint available: {failure}");
    }
    let &tile_index = result.moves().first()?;
    let direction = Direction::between(puzzle.side(), tile_index, puzzle.empty_index())?;
    Some(MoveHint {
        tile_index,
        tile_id: puzzle.tiles()[tile_index],
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_board_has_no_hint() {
        assert_eq!(next_optimal_move(Puzzle::solved(4).tiles(), Some(4)), None);
    }

    #[test]
    fn tile_pushed_down_is_hinted_up() {
        let solved = Puzzle::solved(4);
        let start = solved.apply_move(solved.empty_index() - 4);

        let hint = next_optimal_move(start.tiles(), Some(4)).unwrap();
        assert_eq!(hint.tile_index, 15);
        assert_eq!(hint.tile_id, 12);
        assert_eq!(hint.direction, Direction::Up);
        assert!(start.apply_move(hint.tile_index).is_solved());
    }

    #[test]
    fn tile_pushed_right_is_hinted_left() {
        let solved = Puzzle::solved(5);
        let start = solved.apply_move(solved.empty_index() - 1);

        let hint = next_optimal_move(start.tiles(), None).unwrap();
        assert_eq!(hint.tile_index, 24);
        assert_eq!(hint.tile_id, 24);
        assert_eq!(hint.direction, Direction::Left);
    }

    #[test]
    fn blank_moved_away_is_hinted_back() {
        let solved = Puzzle::solved(6);
        let start = solved.apply_move(35 - 6).apply_move(35 - 12);

        // Tiles 24 and 30 each slid down one row; the blank sits at 23.
        let hint = next_optimal_move(start.tiles(), Some(6)).unwrap();
        assert_eq!(hint.tile_index, 29);
        assert_eq!(hint.tile_id, 24);
        assert_eq!(hint.direction, Direction::Up);
    }

    #[test]
    fn hint_unwinds_last_move_first() {
        let solved = Puzzle::solved(4);
        let start = solved.apply_move(11).apply_move(10);
        let hint = next_optimal_move(start.tiles(), None).unwrap();
        assert_eq!(hint.tile_index, 11);
        assert_eq!(hint.direction, Direction::Left);

        let start = solved.apply_move(14).apply_move(10);
        let hint = next_optimal_move(start.tiles(), None).unwrap();
        assert_eq!(hint.tile_index, 14);
        assert_eq!(hint.direction, Direction::Up);
    }

    #[test]
    fn unsupported_boards_have_no_hint() {
        assert_eq!(next_optimal_move(&[1, 0, 2], None), None);
        assert_eq!(next_optimal_move(&[1, 2, 3, 0], None), None);
        assert_eq!(next_optimal_move(Puzzle::solved(4).tiles(), Some(5)), None);
        let mut tiles = Puzzle::solved(4).tiles().to_vec();
        tiles[0] = 2;
        assert_eq!(next_optimal_move(&tiles, None), None);
    }

    #[test]
    fn unsolvable_board_has_no_hint() {
        let mut tiles = Puzzle::solved(4).tiles().to_vec();
        tiles.swap(0, 1);
        assert_eq!(next_optimal_move(&tiles, Some(4)), None);
    }

    #[test]
    fn exhausted_budget_has_no_hint() {
        let solved = Puzzle::solved(4);
        let start = solved.apply_move(11);
        assert_eq!(
            next_optimal_move_for(&start, &SolveOptions { max_nodes: 0 }),
            None
        );
    }
}
