//! Shuffled boards produced by walking backwards from the goal.

use rand::{seq::SliceRandom, thread_rng, Rng};

use crate::puzzle::{Puzzle, EMPTY_TILE};

/// Shuffle length used when a caller does not pick one.
pub const DEFAULT_SHUFFLE_MOVES: usize = 80;

/// Shuffles the goal board with `shuffle_moves` uniformly chosen legal moves.
///
/// Every step is a legal move, so the result is solvable. The walk is not a
/// uniform sample over solvable boards; longer walks get closer to one.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use slider_puzzle::generator::generate_puzzle;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let puzzle = generate_puzzle(4, 40, &mut rng);
/// assert!(puzzle.is_solvable());
/// ```
pub fn generate_puzzle<R: Rng + ?Sized>(side: usize, shuffle_moves: usize, rng: &mut R) -> Puzzle {
    let mut puzzle = Puzzle::solved(side);
    if shuffle_moves == 0 {
        return puzzle;
    }

    let mut moves = Vec::with_capacity(4);
    for _ in 0..shuffle_moves {
        moves.clear();
        moves.extend(puzzle.valid_moves());
        if let Some(&index) = moves.choose(rng) {
            puzzle = puzzle.apply_move(index);
        }
    }

    if !puzzle.is_solvable() {
        log::warn!("shuffle produced an unsolvable board, repairing parity");
        puzzle = repair_parity(&puzzle);
    }

    log::debug!(
        "generated {side}x{side} board with {shuffle_moves} shuffle moves: {}",
        puzzle.key()
    );
    puzzle
}

/// [`generate_puzzle`] driven by the thread-local RNG.
pub fn generate_random_puzzle(side: usize, shuffle_moves: usize) -> Puzzle {
    generate_puzzle(side, shuffle_moves, &mut thread_rng())
}

/// Flips permutation parity by swapping the last two numbered tiles.
fn repair_parity(puzzle: &Puzzle) -> Puzzle {
    let mut numbered = puzzle
        .tiles()
        .iter()
        .enumerate()
        .rev()
        .filter(|&(_, &tile)| tile != EMPTY_TILE)
        .map(|(index, _)| index);
    match (numbered.next(), numbered.next()) {
        (Some(b), Some(a)) => puzzle.swap_tiles(a, b),
        _ => puzzle.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::BoardSize;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn zero_shuffle_is_solved() {
        let mut rng = StdRng::seed_from_u64(0);
        for size in BoardSize::ALL {
            assert_eq!(
                generate_puzzle(size.side(), 0, &mut rng),
                Puzzle::solved(size.side())
            );
        }
    }

    #[test]
    fn same_seed_same_board() {
        let a = generate_puzzle(5, 60, &mut StdRng::seed_from_u64(42));
        let b = generate_puzzle(5, 60, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn thread_rng_board_is_solvable() {
        let puzzle = generate_random_puzzle(5, 10);
        assert_eq!(puzzle.tiles().len(), 25);
        assert!(puzzle.is_solvable());
    }

    #[test]
    fn repair_parity_fixes_single_swap() {
        let broken = Puzzle::solved(4).swap_tiles(0, 1);
        assert!(!broken.is_solvable());
        let repaired = repair_parity(&broken);
        assert!(repaired.is_solvable());
        assert_eq!(repaired.empty_index(), broken.empty_index());
        assert_eq!(&repaired.tiles()[13..], &[15, 14, EMPTY_TILE]);
    }

    #[test]
    fn repair_parity_skips_blank() {
        let broken = Puzzle::solved(4).apply_move(14).swap_tiles(0, 1);
        let repaired = repair_parity(&broken);
        assert!(repaired.is_solvable());
        assert_eq!(repaired.tiles()[14], EMPTY_TILE);
    }

    proptest! {
        #[test]
        fn generated_boards_are_solvable(
            side in 4usize..=6,
            shuffle_moves in 0usize..300,
            seed in any::<u64>(),
        ) {
            let puzzle = generate_puzzle(side, shuffle_moves, &mut StdRng::seed_from_u64(seed));
            prop_assert!(Puzzle::from_tiles(side, puzzle.tiles().to_vec()).is_ok());
            prop_assert!(puzzle.is_solvable());
        }
    }
}
