//! Board representation, move rules and the parity solvability test.
//!
//! A [`Puzzle`] is an immutable, row-major permutation of `0..side * side`
//! where [`EMPTY_TILE`] marks the blank. Every move produces a new value.

use std::fmt;

/// Sentinel stored in the blank slot.
pub const EMPTY_TILE: u8 = 0;

/// Board sizes accepted from external input.
///
/// The core algorithms work for any side of at least two; only the
/// adapters that resolve a size from raw tiles restrict to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardSize {
    Four,
    Five,
    Six,
}

impl BoardSize {
    pub const ALL: [BoardSize; 3] = [BoardSize::Four, BoardSize::Five, BoardSize::Six];

    pub fn side(self) -> usize {
        match self {
            BoardSize::Four => 4,
            BoardSize::Five => 5,
            BoardSize::Six => 6,
        }
    }

    pub fn tile_count(self) -> usize {
        self.side() * self.side()
    }

    pub fn from_side(side: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.side() == side)
    }

    pub fn from_tile_count(count: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.tile_count() == count)
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.side())
    }
}

/// The way a tile travels when it slides into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Position of the moving tile relative to the blank, as `(row, col)`.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (1, 0),
            Direction::Left => (0, 1),
            Direction::Down => (-1, 0),
            Direction::Right => (0, -1),
        }
    }

    /// Direction a tile at `tile_index` travels when moved into `empty_index`.
    ///
    /// Returns `None` unless the two cells are 4-adjacent on a board of
    /// width `side`.
    pub fn between(side: usize, tile_index: usize, empty_index: usize) -> Option<Self> {
        if !is_adjacent(side, tile_index, empty_index) {
            return None;
        }
        let direction = if tile_index == empty_index + side {
            Direction::Up
        } else if tile_index + side == empty_index {
            Direction::Down
        } else if tile_index == empty_index + 1 {
            Direction::Left
        } else {
            Direction::Right
        };
        Some(direction)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "up",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Right => "right",
        };
        write!(f, "{}", s)
    }
}

/// Rejected board input.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PuzzleError {
    #[display("board side {side} is not supported")]
    UnsupportedSize { side: usize },
    #[display("{count} tiles do not form a supported square board")]
    UnresolvedSize { count: usize },
    #[display("expected {expected} tiles, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[display("tile {tile} at index {index} is out of range")]
    InvalidTile { tile: u8, index: usize },
    #[display("tile {tile} appears more than once")]
    DuplicateTile { tile: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Puzzle {
    side: usize,
    tiles: Box<[u8]>,
    empty: usize,
}

impl Puzzle {
    /// The goal board: `1, 2, ..` in row-major order with the blank last.
    ///
    /// # Panics
    ///
    /// Panics if `side` is below 2 or the board would not fit `u8` tiles.
    pub fn solved(side: usize) -> Self {
        assert!(side >= 2, "board side must be at least 2");
        let count = side * side;
        assert!(count <= usize::from(u8::MAX) + 1, "board too large");

        let tiles = (1..count)
            .map(|value| value as u8)
            .chain([EMPTY_TILE])
            .collect();

        Self {
            side,
            tiles,
            empty: count - 1,
        }
    }

    /// Builds a board from row-major tiles, checking that they form a
    /// permutation of `0..side * side`.
    pub fn from_tiles(side: usize, tiles: impl Into<Box<[u8]>>) -> Result<Self, PuzzleError> {
        let tiles = tiles.into();
        let count = side * side;
        if side < 2 || count > usize::from(u8::MAX) + 1 {
            return Err(PuzzleError::UnsupportedSize { side });
        }
        if tiles.len() != count {
            return Err(PuzzleError::WrongLength {
                expected: count,
                actual: tiles.len(),
            });
        }

        let mut seen = vec![false; count];
        let mut empty = 0;
        for (index, &tile) in tiles.iter().enumerate() {
            let slot = seen
                .get_mut(usize::from(tile))
                .ok_or(PuzzleError::InvalidTile { tile, index })?;
            if *slot {
                return Err(PuzzleError::DuplicateTile { tile });
            }
            *slot = true;
            if tile == EMPTY_TILE {
                empty = index;
            }
        }

        Ok(Self { side, tiles, empty })
    }

    /// Builds a board from external input, restricted to the supported
    /// [`BoardSize`]s.
    ///
    /// When `side` is `None` it is derived from the tile count.
    pub fn resolve(tiles: &[u8], side: Option<usize>) -> Result<Self, PuzzleError> {
        let size = match side {
            Some(side) => {
                BoardSize::from_side(side).ok_or(PuzzleError::UnsupportedSize { side })?
            }
            None => BoardSize::from_tile_count(tiles.len()).ok_or(PuzzleError::UnresolvedSize {
                count: tiles.len(),
            })?,
        };
        Self::from_tiles(size.side(), tiles)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn empty_index(&self) -> usize {
        self.empty
    }

    /// Flat index of the tile that would travel in `direction`, if any.
    pub fn neighbor(&self, direction: Direction) -> Option<usize> {
        let (dr, dc) = direction.as_offset();
        let row = (self.empty / self.side).checked_add_signed(dr)?;
        let col = (self.empty % self.side).checked_add_signed(dc)?;
        (row < self.side && col < self.side).then_some(row * self.side + col)
    }

    /// Indices of the tiles that may slide into the blank, ordered by the
    /// direction they would travel: up, down, left, right.
    pub fn valid_moves(&self) -> impl Iterator<Item = usize> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.neighbor(direction))
    }

    pub fn can_move(&self, tile_index: usize) -> bool {
        tile_index < self.tiles.len() && is_adjacent(self.side, tile_index, self.empty)
    }

    /// Swaps the tile at `tile_index` with the blank.
    ///
    /// Legality is not checked: gate every call with [`Puzzle::can_move`].
    /// A non-adjacent index still yields a permutation, just not one a
    /// player could reach.
    pub fn apply_move(&self, tile_index: usize) -> Self {
        let mut tiles = self.tiles.clone();
        tiles.swap(tile_index, self.empty);
        Self {
            side: self.side,
            tiles,
            empty: tile_index,
        }
    }

    /// Exchanges two cells regardless of adjacency.
    pub(crate) fn swap_tiles(&self, a: usize, b: usize) -> Self {
        let mut tiles = self.tiles.clone();
        tiles.swap(a, b);
        let empty = if self.empty == a {
            b
        } else if self.empty == b {
            a
        } else {
            self.empty
        };
        Self {
            side: self.side,
            tiles,
            empty,
        }
    }

    /// Slides the tile that travels in `direction`, if one exists.
    pub fn try_move(&self, direction: Direction) -> Option<Self> {
        self.neighbor(direction).map(|index| self.apply_move(index))
    }

    pub fn is_solved(&self) -> bool {
        is_complete(&self.tiles)
    }

    pub fn is_solvable(&self) -> bool {
        let inversions = count_inversions(&self.tiles);

        if self.side % 2 == 1 {
            inversions % 2 == 0
        } else {
            let empty_row_from_bottom = self.side - self.empty / self.side;
            (inversions + empty_row_from_bottom) % 2 == 1
        }
    }

    /// Comma-joined tiles, e.g. `1,2,3,0`.
    pub fn key(&self) -> String {
        self.tiles
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.side) {
            for &val in row {
                if val == EMPTY_TILE {
                    write!(f, " . ")?;
                } else {
                    write!(f, "{:2} ", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Whether `tiles` is exactly the goal board for its own square size.
///
/// Malformed input (non-square length, no blank) is simply not complete.
pub fn is_complete(tiles: &[u8]) -> bool {
    let Some(side) = square_side(tiles.len()) else {
        return false;
    };
    if side < 2 {
        return false;
    }
    let last = tiles.len() - 1;
    tiles.iter().enumerate().all(|(index, &tile)| {
        if index == last {
            tile == EMPTY_TILE
        } else {
            usize::from(tile) == index + 1
        }
    })
}

/// Number of pairs of numbered tiles that appear out of order, ignoring
/// the blank.
pub fn count_inversions(tiles: &[u8]) -> usize {
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != EMPTY_TILE)
        .map(|(i, &val)| {
            tiles[i + 1..]
                .iter()
                .filter(|&&next| next != EMPTY_TILE && next < val)
                .count()
        })
        .sum()
}

fn is_adjacent(side: usize, a: usize, b: usize) -> bool {
    let (ra, ca) = (a / side, a % side);
    let (rb, cb) = (b / side, b % side);
    ra.abs_diff(rb) + ca.abs_diff(cb) == 1
}

fn square_side(len: usize) -> Option<usize> {
    let side = (len as f64).sqrt().round() as usize;
    (side * side == len).then_some(side)
}
