//! Post-game comparison of a player's moves against the optimum.

use std::fmt;

use crate::{
    puzzle::{Direction, Puzzle},
    solver::{solve, SolveOptions},
};

/// Node budget for post-game analysis, which is off the interactive path.
pub const METRICS_MAX_NODES: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayMetrics {
    pub optimal_move_count: usize,
    /// `actual - optimal`; negative only if the actual count was wrong.
    pub move_difference: isize,
    /// `optimal / actual`, capped at 1.
    pub efficiency: f64,
}

impl PlayMetrics {
    pub fn from_counts(optimal_move_count: usize, actual_move_count: usize) -> Self {
        let efficiency = if actual_move_count == 0 {
            1.0
        } else {
            (optimal_move_count as f64 / actual_move_count as f64).min(1.0)
        };
        Self {
            optimal_move_count,
            move_difference: actual_move_count as isize - optimal_move_count as isize,
            efficiency,
        }
    }

    pub fn rank(&self) -> Rank {
        match self.efficiency {
            e if e >= 0.90 => Rank::S,
            e if e >= 0.75 => Rank::A,
            e if e >= 0.60 => Rank::B,
            e if e >= 0.45 => Rank::C,
            _ => Rank::D,
        }
    }
}

/// Letter grade for an efficiency score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    S,
    A,
    B,
    C,
    D,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::D => "D",
        };
        f.write_str(s)
    }
}

/// Solves `initial` and compares the optimum with `actual_move_count`.
///
/// `side` is resolved the same way as for hints. `None` means the game
/// could not be analyzed, not that it went badly.
pub fn compute_play_metrics(
    initial: &[u8],
    side: Option<usize>,
    actual_move_count: usize,
) -> Option<PlayMetrics> {
    let puzzle = match Puzzle::resolve(initial, side) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            log::debug!("cannot analyze malformed board: {err}");
            return None;
        }
    };
    let result = solve(
        &puzzle,
        &SolveOptions {
            max_nodes: METRICS_MAX_NODES,
        },
    );
    match result.move_count() {
        Some(optimal) => Some(PlayMetrics::from_counts(optimal, actual_move_count)),
        None => {
            log::debug!(
                "analysis unavailable after {} nodes: {:?}",
                result.nodes_evaluated,
                result.failure()
            );
            None
        }
    }
}

/// How often the player slid tiles each way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovePatterns {
    pub up: usize,
    pub down: usize,
    pub left: usize,
    pub right: usize,
}

impl MovePatterns {
    pub fn total(&self) -> usize {
        self.up + self.down + self.left + self.right
    }

    pub fn count(&self, direction: Direction) -> usize {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Most used direction; ties go to the earlier of up, down, left, right.
    pub fn most_frequent(&self) -> Option<Direction> {
        if self.total() == 0 {
            return None;
        }
        let max = Direction::ALL.map(|d| self.count(d)).into_iter().max()?;
        Direction::ALL.into_iter().find(|&d| self.count(d) == max)
    }

    fn record(&mut self, direction: Direction) {
        let slot = match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        };
        *slot += 1;
    }
}

/// Replays `moves` from `initial`, tallying the direction of each slide.
///
/// Returns `None` if any move is illegal at the point it is played.
pub fn analyze_move_patterns(initial: &Puzzle, moves: &[usize]) -> Option<MovePatterns> {
    let mut patterns = MovePatterns::default();
    let mut puzzle = initial.clone();
    for &tile_index in moves {
        if !puzzle.can_move(tile_index) {
            log::debug!("illegal move {tile_index} in history of {}", initial.key());
            return None;
        }
        patterns.record(Direction::between(
            puzzle.side(),
            tile_index,
            puzzle.empty_index(),
        )?);
        puzzle = puzzle.apply_move(tile_index);
    }
    Some(patterns)
}
