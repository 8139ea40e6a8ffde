mod render;

use std::io::{stdout, IsTerminal};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use slider_puzzle::{
    compute_play_metrics,
    generator::{generate_puzzle, generate_random_puzzle, DEFAULT_SHUFFLE_MOVES},
    metrics::analyze_move_patterns,
    next_optimal_move,
    solver::{solve, SolveOptions, DEFAULT_MAX_NODES},
    BoardSize, Direction, Puzzle,
};

use crate::render::Renderer;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    board: BoardArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct BoardArgs {
    /// Board side (4, 5 or 6); derived from --tiles when omitted
    #[arg(short, long, global = true, value_name = "N")]
    size: Option<usize>,
    /// Random moves applied to the solved board
    #[arg(long, global = true, default_value_t = DEFAULT_SHUFFLE_MOVES, value_name = "NUM")]
    shuffle: usize,
    /// Seed for a reproducible shuffle
    #[arg(long, global = true, value_name = "SEED")]
    seed: Option<u64>,
    /// Board as comma-separated tiles in row-major order, 0 for the blank
    #[arg(
        short,
        long,
        global = true,
        value_delimiter = ',',
        value_name = "TILES"
    )]
    tiles: Option<Vec<u8>>,
    /// Disable colored output
    #[arg(long, global = true)]
    plain: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Solve the board and print every step (default)
    Solve {
        /// Max states to expand before giving up
        #[arg(long, default_value_t = DEFAULT_MAX_NODES, value_name = "NUM")]
        max_nodes: usize,
    },
    /// Print the board without solving it
    Shuffle,
    /// Suggest the next optimal move
    Hint,
    /// Compare a finished game against the optimal move count
    Analyze {
        /// Number of moves the player made
        #[arg(short, long, value_name = "NUM")]
        moves: Option<usize>,
        /// Comma-separated flat indices of the tiles the player moved
        #[arg(long, value_delimiter = ',', value_name = "INDICES")]
        history: Option<Vec<usize>>,
    },
}

impl BoardArgs {
    fn puzzle(&self) -> Result<Puzzle> {
        if let Some(tiles) = &self.tiles {
            return Puzzle::resolve(tiles, self.size).context("Invalid --tiles board");
        }

        let side = self.size.unwrap_or(4);
        let Some(size) = BoardSize::from_side(side) else {
            bail!("Board size must be 4, 5 or 6, got {side}.");
        };
        let puzzle = match self.seed {
            Some(seed) => generate_puzzle(
                size.side(),
                self.shuffle,
                &mut StdRng::seed_from_u64(seed),
            ),
            None => generate_random_puzzle(size.side(), self.shuffle),
        };
        Ok(puzzle)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let Cli { board, command } = Cli::parse();
    let puzzle = board.puzzle()?;
    log::info!("board {}", puzzle.key());

    let renderer = Renderer::new(!board.plain && stdout().is_terminal());
    let command = command.unwrap_or(Command::Solve {
        max_nodes: DEFAULT_MAX_NODES,
    });

    match command {
        Command::Solve { max_nodes } => run_solve(&renderer, &puzzle, max_nodes),
        Command::Shuffle => {
            println!("{}", puzzle.key());
            println!("{}", renderer.board(&puzzle, None));
            Ok(())
        }
        Command::Hint => run_hint(&renderer, &puzzle),
        Command::Analyze { moves, history } => run_analyze(&puzzle, moves, history.as_deref()),
    }
}

fn run_solve(renderer: &Renderer, puzzle: &Puzzle, max_nodes: usize) -> Result<()> {
    println!("Initial Puzzle:\n{}", renderer.board(puzzle, None));

    let result = solve(puzzle, &SolveOptions { max_nodes });
    if let Some(failure) = result.failure() {
        bail!(
            "No solution: {failure} after {} nodes in {:?}.",
            result.nodes_evaluated,
            result.elapsed
        );
    }

    println!(
        "Found optimal solution with {} moves ({} nodes, {:?})\n",
        result.moves().len(),
        result.nodes_evaluated,
        result.elapsed
    );

    for pair in result.frames().windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        let Some(index) = after.move_index else {
            continue;
        };
        let empty = before.state.empty_index();
        if let Some(direction) = Direction::between(puzzle.side(), index, empty) {
            println!("{} {direction}", before.state.tiles()[index]);
        }
        println!("{}", renderer.board(after.state, Some(empty)));
    }
    Ok(())
}

fn run_hint(renderer: &Renderer, puzzle: &Puzzle) -> Result<()> {
    println!("{}", renderer.board(puzzle, None));
    match next_optimal_move(puzzle.tiles(), Some(puzzle.side())) {
        Some(hint) => {
            println!("Move tile {} {}.", hint.tile_id, hint.direction);
            println!("{}", renderer.board(puzzle, Some(hint.tile_index)));
        }
        None => println!("No hint available."),
    }
    Ok(())
}

fn run_analyze(puzzle: &Puzzle, moves: Option<usize>, history: Option<&[usize]>) -> Result<()> {
    let Some(actual) = moves.or(history.map(<[usize]>::len)) else {
        bail!("Provide --moves or --history.");
    };

    match compute_play_metrics(puzzle.tiles(), Some(puzzle.side()), actual) {
        Some(metrics) => {
            println!("Actual moves:  {actual}");
            println!("Optimal moves: {}", metrics.optimal_move_count);
            println!("Difference:    {:+}", metrics.move_difference);
            println!("Efficiency:    {:.0}%", metrics.efficiency * 100.0);
            println!("Rank:          {}", metrics.rank());
        }
        None => println!("Insufficient data to analyze this game."),
    }

    if let Some(history) = history {
        let patterns = analyze_move_patterns(puzzle, history)
            .context("History contains a move that is not legal")?;
        println!(
            "Directions:    up {} / down {} / left {} / right {}",
            patterns.up, patterns.down, patterns.left, patterns.right
        );
        if let Some(direction) = patterns.most_frequent() {
            println!("Most frequent: {direction}");
        }
    }
    Ok(())
}
