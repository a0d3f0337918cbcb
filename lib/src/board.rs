use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;
use thiserror::Error;

use crate::cell::Cell;
use crate::graph::CellGraph;
use crate::location::{Coord, Location};
use crate::solver::{EncloseSearch, Enclosure};

/// Reasons a text grid cannot be read into a [`Board`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BoardError {
    /// No `H` cell anywhere in the input; an empty input counts.
    #[error("no horse cell on the board")]
    HorseMissing,
    /// A row whose length differs from the first row's.
    #[error("row {row} is {len} cells wide, expected {expected}")]
    RaggedRow { row: Coord, len: usize, expected: usize },
    /// A character outside the `.`/`#`/`H` alphabet.
    #[error("unknown cell {ch:?} at {location}")]
    UnknownCell { ch: char, location: Location },
}

/// The four cardinal steps between grid cells.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, VariantArray)]
pub(crate) enum Step {
    Up,
    Down,
    Left,
    Right,
}

impl Step {
    // underflow wraps to a huge coordinate and fails the bounds check in Board::step
    pub(crate) fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((-1, 0)),
            Self::Down => location.offset_by((1, 0)),
            Self::Left => location.offset_by((0, -1)),
            Self::Right => location.offset_by((0, 1)),
        }
    }
}

/// A rectangular paddock grid: grass, rock, and one horse.
///
/// Boards are read from newline-delimited text with [`str::parse`] and
/// solved with [`Board::solve`]; [`Board::render`] draws a solution back
/// onto the grid.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) cells: Array2<Cell>,
    // rows, cols
    pub(crate) dims: (Coord, Coord),
    pub(crate) horse: Location,
}

impl FromStr for Board {
    type Err = BoardError;

    /// Trailing carriage returns are stripped and empty lines dropped, so
    /// CRLF input and a trailing newline both parse cleanly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.is_empty())
            .collect_vec();

        let Some(first) = rows.first() else {
            return Err(BoardError::HorseMissing);
        };
        let cols = first.chars().count();

        let mut cells = Array2::from_elem((rows.len(), cols), Cell::default());
        let mut horse = None;

        for (r, row) in rows.iter().enumerate() {
            let len = row.chars().count();
            if len != cols {
                return Err(BoardError::RaggedRow { row: r, len, expected: cols });
            }
            for (c, ch) in row.chars().enumerate() {
                let location = Location(r, c);
                let cell =
                    Cell::try_from(ch).map_err(|ch| BoardError::UnknownCell { ch, location })?;
                if cell == Cell::Horse && horse.is_none() {
                    // the first horse in row-major order starts the flood;
                    // any later one is plain unwallable ground
                    horse = Some(location);
                }
                cells[location.as_index()] = cell;
            }
        }

        match horse {
            Some(horse) => Ok(Self { cells, dims: (rows.len(), cols), horse }),
            None => Err(BoardError::HorseMissing),
        }
    }
}

impl Board {
    /// Grid dimensions as `(rows, cols)`.
    pub fn dims(&self) -> (Coord, Coord) {
        self.dims
    }

    /// The horse's starting cell.
    pub fn horse(&self) -> Location {
        self.horse
    }

    /// The cell at `location`, if it is on the board.
    pub fn cell(&self, location: Location) -> Option<Cell> {
        self.cells.get(location.as_index()).copied()
    }

    /// Step from `location`, returning the neighbor if it stays on the board.
    pub(crate) fn step(&self, location: Location, step: Step) -> Option<Location> {
        let next = step.attempt_from(location);
        self.cells.get(next.as_index()).map(|_| next)
    }

    /// True iff `location` lies on the outermost row or column.
    pub(crate) fn on_boundary(&self, location: Location) -> bool {
        location.0 == 0 || location.0 == self.dims.0 - 1 || location.1 == 0 || location.1 == self.dims.1 - 1
    }

    /// Find the largest area the horse can be penned into with at most
    /// `budget` new walls, together with one wall placement achieving it.
    ///
    /// The result is optimal for the 4-connected flood semantics: no
    /// placement of `budget` or fewer walls on grass encloses more cells.
    /// A horse already standing on the rim cannot be penned at all, and
    /// solves to an empty [`Enclosure`].
    pub fn solve(&self, budget: usize) -> Enclosure {
        let graph = CellGraph::build(self);
        if graph.boundary.contains(CellGraph::HORSE) {
            return Enclosure { area: 0, walls: Vec::new() };
        }
        EncloseSearch::new(&graph, budget).run()
    }

    /// Draw `enclosure` onto the grid: new walls as `X`, grass the horse
    /// can still reach as `&`.
    pub fn render(&self, enclosure: &Enclosure) -> String {
        let mut chars = self.cells.map(|cell| cell.to_char());
        for wall in &enclosure.walls {
            chars[wall.as_index()] = 'X';
        }

        // flood over open ground with the new walls up
        let mut seen = Array2::from_elem(self.cells.raw_dim(), false);
        seen[self.horse.as_index()] = true;
        let mut queue = VecDeque::from([self.horse]);
        while let Some(location) = queue.pop_front() {
            for step in Step::VARIANTS {
                let Some(next) = self.step(location, *step) else {
                    continue;
                };
                if seen[next.as_index()] || !matches!(chars[next.as_index()], '.' | 'H') {
                    continue;
                }
                seen[next.as_index()] = true;
                queue.push_back(next);
            }
        }

        for (index, reached) in seen.indexed_iter() {
            if *reached && chars[index] == '.' {
                chars[index] = '&';
            }
        }

        let mut out = String::with_capacity(self.dims.0 * (self.dims.1 + 1));
        for row in chars.rows() {
            for ch in row {
                out.push(*ch);
            }
            out.push('\n');
        }
        out
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut out = String::with_capacity(self.dims.0 * (self.dims.1 + 1));
        for row in self.cells.rows() {
            for cell in row {
                out.push(cell.to_char());
            }
            out.push('\n');
        }
        write!(f, "{}", out)
    }
}
