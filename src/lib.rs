//! Sliding-tile puzzle engine: board model, move rules, solvability,
//! shuffling, an optimal A* solver, and the hint and play-metrics adapters
//! built on top of it.
//!
//! # Examples
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use slider_puzzle::{generate_puzzle, solve, SolveOptions};
//!
//! let puzzle = generate_puzzle(4, 12, &mut StdRng::seed_from_u64(1));
//! let result = solve(&puzzle, &SolveOptions::default());
//! assert!(result.is_solved());
//! assert!(result.moves().len() <= 12);
//! ```

pub mod generator;
pub mod hint;
pub mod metrics;
pub mod puzzle;
pub mod solver;

pub use generator::{generate_puzzle, generate_random_puzzle, DEFAULT_SHUFFLE_MOVES};
pub use hint::{next_optimal_move, MoveHint};
pub use metrics::{compute_play_metrics, PlayMetrics};
pub use puzzle::{is_complete, BoardSize, Direction, Puzzle, PuzzleError, EMPTY_TILE};
pub use solver::{manhattan_distance, solve, SolveFailure, SolveOptions, SolveResult};
