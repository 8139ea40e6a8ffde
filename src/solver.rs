//! Optimal solving with A* over board states.
//!
//! The search is bounded by a node budget rather than by time, and keeps
//! all of its state local to one [`solve`] call.

use std::{
    cmp::Reverse,
    collections::BinaryHeap,
    time::{Duration, Instant},
};

use rustc_hash::FxHashMap;

use crate::puzzle::{Puzzle, EMPTY_TILE};

/// Node budget used by [`SolveOptions::default`].
pub const DEFAULT_MAX_NODES: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveOptions {
    /// Maximum number of expansions before giving up.
    pub max_nodes: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

/// Why a search ended without a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::Error)]
pub enum SolveFailure {
    #[display("unsolvable-state")]
    UnsolvableState,
    #[display("max-nodes-exceeded")]
    MaxNodesExceeded,
    #[display("exhausted-open-set")]
    ExhaustedOpenSet,
}

/// A shortest move sequence and the boards it passes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Flat indices of the moved tiles, in application order.
    pub moves: Vec<usize>,
    /// Start board, each intermediate board, then the goal.
    pub states: Vec<Puzzle>,
}

#[derive(Debug, Clone)]
pub struct SolveResult {
    pub outcome: Result<Solution, SolveFailure>,
    pub nodes_evaluated: usize,
    pub elapsed: Duration,
}

/// One step of a solution playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionFrame<'a> {
    /// Move that produced `state`; `None` for the starting board.
    pub move_index: Option<usize>,
    pub state: &'a Puzzle,
}

impl SolveResult {
    pub fn is_solved(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn failure(&self) -> Option<SolveFailure> {
        self.outcome.as_ref().err().copied()
    }

    /// Moves of the solution, empty on failure.
    pub fn moves(&self) -> &[usize] {
        match &self.outcome {
            Ok(solution) => &solution.moves,
            Err(_) => &[],
        }
    }

    /// Boards of the solution, empty on failure.
    pub fn states(&self) -> &[Puzzle] {
        match &self.outcome {
            Ok(solution) => &solution.states,
            Err(_) => &[],
        }
    }

    pub fn move_count(&self) -> Option<usize> {
        self.outcome.as_ref().ok().map(|solution| solution.moves.len())
    }

    /// Pairs every board with the move that led to it.
    pub fn frames(&self) -> Vec<SolutionFrame<'_>> {
        let moves = self.moves();
        self.states()
            .iter()
            .enumerate()
            .map(|(i, state)| SolutionFrame {
                move_index: i.checked_sub(1).map(|prev| moves[prev]),
                state,
            })
            .collect()
    }
}

/// Sum over numbered tiles of the grid distance to their goal cell.
///
/// Never overestimates the remaining moves, and changes by exactly one per
/// move, which keeps A* optimal.
pub fn manhattan_distance(puzzle: &Puzzle) -> usize {
    puzzle
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != EMPTY_TILE)
        .map(|(index, &tile)| tile_distance(puzzle.side(), tile, index))
        .sum()
}

fn tile_distance(side: usize, tile: u8, index: usize) -> usize {
    let goal = usize::from(tile) - 1;
    (index / side).abs_diff(goal / side) + (index % side).abs_diff(goal % side)
}

struct Node {
    puzzle: Puzzle,
    parent: Option<usize>,
    moved: Option<usize>,
    g: usize,
    h: usize,
}

/// Finds a shortest move sequence from `start` to the goal board.
///
/// Equal-cost frontier entries are expanded closest-to-goal first, then in
/// insertion order, so a given input always yields the same path.
pub fn solve(start: &Puzzle, options: &SolveOptions) -> SolveResult {
    let timer = Instant::now();
    let finish = |outcome: Result<Solution, SolveFailure>, nodes_evaluated: usize| {
        let result = SolveResult {
            outcome,
            nodes_evaluated,
            elapsed: timer.elapsed(),
        };
        log_result(start, &result);
        result
    };

    if start.is_solved() {
        let solution = Solution {
            moves: vec![],
            states: vec![start.clone()],
        };
        return finish(Ok(solution), 0);
    }
    if !start.is_solvable() {
        return finish(Err(SolveFailure::UnsolvableState), 0);
    }

    let side = start.side();
    let goal = Puzzle::solved(side);
    let h = manhattan_distance(start);
    log::debug!(
        "solving {side}x{side} board {} (h={h}, max_nodes={})",
        start.key(),
        options.max_nodes
    );

    let mut nodes = vec![Node {
        puzzle: start.clone(),
        parent: None,
        moved: None,
        g: 0,
        h,
    }];
    // Latest node for each board; older heap entries for it are stale.
    let mut best: FxHashMap<Box<[u8]>, usize> = FxHashMap::default();
    best.insert(start.tiles().into(), 0);
    let mut open = BinaryHeap::new();
    open.push(Reverse((h, h, 0)));

    let mut evaluated = 0;
    while let Some(Reverse((_, _, index))) = open.pop() {
        let node = &nodes[index];
        if best.get(node.puzzle.tiles()) != Some(&index) {
            continue;
        }

        evaluated += 1;
        if evaluated > options.max_nodes {
            return finish(Err(SolveFailure::MaxNodesExceeded), evaluated);
        }
        if node.puzzle == goal {
            return finish(Ok(reconstruct(&nodes, index)), evaluated);
        }

        let g = node.g + 1;
        let h = node.h;
        let puzzle = node.puzzle.clone();
        let empty = puzzle.empty_index();
        for moved in puzzle.valid_moves() {
            let next = puzzle.apply_move(moved);
            let improves = match best.get(next.tiles()) {
                Some(&known) => g < nodes[known].g,
                None => true,
            };
            if !improves {
                continue;
            }

            let tile = puzzle.tiles()[moved];
            let next_h = h + tile_distance(side, tile, empty) - tile_distance(side, tile, moved);
            let next_index = nodes.len();
            best.insert(next.tiles().into(), next_index);
            open.push(Reverse((g + next_h, next_h, next_index)));
            nodes.push(Node {
                puzzle: next,
                parent: Some(index),
                moved: Some(moved),
                g,
                h: next_h,
            });
        }

        if evaluated % 10_000 == 0 {
            log::trace!(
                "{evaluated} nodes evaluated, {} queued, {} seen",
                open.len(),
                best.len()
            );
        }
    }

    finish(Err(SolveFailure::ExhaustedOpenSet), evaluated)
}

fn reconstruct(nodes: &[Node], goal: usize) -> Solution {
    let mut moves = vec![];
    let mut states = vec![];
    let mut current = Some(goal);
    while let Some(index) = current {
        let node = &nodes[index];
        states.push(node.puzzle.clone());
        moves.extend(node.moved);
        current = node.parent;
    }
    moves.reverse();
    states.reverse();
    Solution { moves, states }
}

fn log_result(start: &Puzzle, result: &SolveResult) {
    match &result.outcome {
        Ok(solution) => log::debug!(
            "solved {} in {} moves ({} nodes, {:?})",
            start.key(),
            solution.moves.len(),
            result.nodes_evaluated,
            result.elapsed
        ),
        Err(failure) => log::debug!(
            "gave up on {}: {failure} ({} nodes, {:?})",
            start.key(),
            result.nodes_evaluated,
            result.elapsed
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_puzzle;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn options(max_nodes: usize) -> SolveOptions {
        SolveOptions { max_nodes }
    }

    #[test]
    fn manhattan_of_goal_is_zero() {
        for side in 4..=6 {
            assert_eq!(manhattan_distance(&Puzzle::solved(side)), 0);
        }
    }

    #[test]
    fn manhattan_counts_displaced_tiles() {
        let solved = Puzzle::solved(4);
        assert_eq!(manhattan_distance(&solved.apply_move(14)), 1);
        assert_eq!(manhattan_distance(&solved.apply_move(11)), 1);
        // Tiles 1 and 2 swapped: one column each.
        assert_eq!(manhattan_distance(&solved.swap_tiles(0, 1)), 2);
        // Tiles 1 and 15 swapped: three rows and two columns each.
        assert_eq!(manhattan_distance(&solved.swap_tiles(0, 14)), 10);
    }

    #[test]
    fn already_solved_needs_no_moves() {
        let solved = Puzzle::solved(4);
        let result = solve(&solved, &SolveOptions::default());
        assert!(result.is_solved());
        assert!(result.moves().is_empty());
        assert_eq!(result.states(), &[solved]);
        assert_eq!(result.nodes_evaluated, 0);
    }

    #[test]
    fn unsolvable_short_circuits() {
        let broken = Puzzle::solved(4).swap_tiles(0, 1);
        let result = solve(&broken, &options(1000));
        assert_eq!(result.failure(), Some(SolveFailure::UnsolvableState));
        assert_eq!(result.nodes_evaluated, 0);
        assert!(result.moves().is_empty());
        assert!(result.states().is_empty());
        assert_eq!(result.failure().unwrap().to_string(), "unsolvable-state");
    }

    #[test]
    fn one_move_from_goal() {
        for side in 4..=6 {
            let solved = Puzzle::solved(side);
            let start = solved.apply_move(solved.empty_index() - side);
            let result = solve(&start, &options(20_000));
            assert!(result.is_solved());
            assert_eq!(result.moves(), &[side * side - 1]);
            assert_eq!(result.states().len(), 2);
            assert_eq!(result.states()[0], start);
            assert!(result.states()[1].is_solved());
        }
    }

    #[test]
    fn two_moves_from_goal() {
        let mut state = Puzzle::solved(4);
        state = state.apply_move(state.empty_index() - 4);
        state = state.apply_move(state.empty_index() - 1);
        let result = solve(&state, &options(5000));
        assert_eq!(result.move_count(), Some(2));
        assert!(result.nodes_evaluated > 0);
    }

    #[test]
    fn tiny_budget_gives_up() {
        let start = generate_puzzle(4, 60, &mut StdRng::seed_from_u64(3));
        let result = solve(&start, &options(0));
        if !start.is_solved() {
            assert_eq!(result.failure(), Some(SolveFailure::MaxNodesExceeded));
            assert_eq!(result.nodes_evaluated, 1);
            assert!(result.moves().is_empty());
        }
    }

    #[test]
    fn frames_pair_moves_with_states() {
        let solved = Puzzle::solved(4);
        let start = solved.apply_move(14).apply_move(13);
        let result = solve(&start, &SolveOptions::default());
        let frames = result.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].move_index, None);
        assert_eq!(frames[0].state, &start);
        assert_eq!(frames[1].move_index, Some(14));
        assert_eq!(frames[2].move_index, Some(15));
        assert!(frames[2].state.is_solved());
    }

    #[test]
    fn path_is_replayable() {
        let start = generate_puzzle(4, 20, &mut StdRng::seed_from_u64(11));
        let result = solve(&start, &options(200_000));
        assert!(result.is_solved());
        let mut puzzle = start;
        for (&moved, expected) in result.moves().iter().zip(&result.states()[1..]) {
            assert!(puzzle.can_move(moved));
            puzzle = puzzle.apply_move(moved);
            assert_eq!(&puzzle, expected);
        }
        assert!(puzzle.is_solved());
    }

    #[test]
    fn deterministic_for_same_input() {
        let start = generate_puzzle(5, 40, &mut StdRng::seed_from_u64(5));
        let a = solve(&start, &options(50_000));
        let b = solve(&start, &options(50_000));
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.nodes_evaluated, b.nodes_evaluated);
    }

    proptest! {
        #[test]
        fn incremental_heuristic_matches_full(
            side in 2usize..=6,
            picks in proptest::collection::vec(0usize..4, 1..100),
        ) {
            let mut puzzle = Puzzle::solved(side);
            for pick in picks {
                let moves: Vec<_> = puzzle.valid_moves().collect();
                let moved = moves[pick % moves.len()];
                let tile = puzzle.tiles()[moved];
                let before = manhattan_distance(&puzzle);
                let empty = puzzle.empty_index();
                puzzle = puzzle.apply_move(moved);
                let after = manhattan_distance(&puzzle);
                prop_assert_eq!(
                    after,
                    before + tile_distance(side, tile, empty) - tile_distance(side, tile, moved)
                );
                prop_assert_eq!(after.abs_diff(before), 1);
            }
        }
    }
}
