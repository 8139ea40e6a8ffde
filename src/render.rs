use crossterm::style::{style, Stylize};
use slider_puzzle::{Puzzle, EMPTY_TILE};

/// Terminal board drawing, colored when writing to a TTY.
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Draws `puzzle`, marking the tile at `highlight`. Tiles already in
    /// their goal cell are shown in green.
    pub fn board(&self, puzzle: &Puzzle, highlight: Option<usize>) -> String {
        if !self.color {
            return puzzle.to_string();
        }

        let mut out = String::new();
        for (index, &tile) in puzzle.tiles().iter().enumerate() {
            let cell = if tile == EMPTY_TILE {
                style(" . ").dark_grey().to_string()
            } else {
                let text = format!("{tile:2} ");
                if highlight == Some(index) {
                    style(text).yellow().bold().to_string()
                } else if usize::from(tile) == index + 1 {
                    style(text).green().to_string()
                } else {
                    text
                }
            };
            out.push_str(&cell);
            if (index + 1) % puzzle.side() == 0 {
                out.push('\n');
            }
        }
        out
    }
}
