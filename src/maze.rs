//! Grid model: positions, directions, cells and the maze itself.
//!
//! The maze is a dense `height * width` vector of cells indexed
//! `y * width + x`. A cell records, per direction, whether the wall on
//! that side has been carved open. Entrance sits on row 0, exit on row
//! `height - 1`; generation turns the open walls into a spanning tree,
//! so exactly one path connects any two cells.

use rand::Rng;
use thiserror::Error;

/// Maximum number of cells in either dimension.
pub const MAX_DIMENSION: usize = 200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze dimensions must be between 2 and {MAX_DIMENSION} cells, got {height}x{width}")]
    InvalidDimensions { height: usize, width: usize },
}

/// Cell coordinates, x along the width, y along the height, 0-indexed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
}

impl Direction {
    /// Fixed scan order used wherever a deterministic order is wanted.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

/// One cell: four wall-open flags, indexed by `Direction`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Cell {
    open: [bool; 4],
}

impl Cell {
    pub fn is_open(&self, direction: Direction) -> bool {
        self.open[direction as usize]
    }

    pub(crate) fn open(&mut self, direction: Direction) {
        self.open[direction as usize] = true;
    }

    /// Number of open walls on this cell.
    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|&&o| o).count()
    }
}

#[derive(Debug)]
pub struct Maze {
    height: usize,
    width: usize,
    start: Position,
    finish: Position,
    cells: Vec<Cell>,
}

impl Maze {
    /// Build an ungenerated maze (all walls closed) with entrance and exit
    /// placed. Column placement draws from `rng` unless opposite-corners
    /// mode pins entrance at (0,0) and exit at (width-1, height-1).
    pub fn new<R: Rng>(
        height: usize,
        width: usize,
        rng: &mut R,
        opposite_corners: bool,
    ) -> Result<Self, MazeError> {
        let valid = 2..=MAX_DIMENSION;
        if !valid.contains(&height) || !valid.contains(&width) {
            return Err(MazeError::InvalidDimensions { height, width });
        }

        let (start, finish) = if opposite_corners {
            (Position::new(0, 0), Position::new(width - 1, height - 1))
        } else {
            (
                Position::new(rng.random_range(0..width), 0),
                Position::new(rng.random_range(0..width), height - 1),
            )
        };

        Ok(Self {
            height,
            width,
            start,
            finish,
            cells: vec![Cell::default(); height * width],
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn finish(&self) -> Position {
        self.finish
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Flat index of a position; also the key for visited sets.
    pub fn index(&self, p: Position) -> usize {
        p.y * self.width + p.x
    }

    pub fn at(&self, p: Position) -> &Cell {
        &self.cells[p.y * self.width + p.x]
    }

    pub(crate) fn at_mut(&mut self, p: Position) -> &mut Cell {
        &mut self.cells[p.y * self.width + p.x]
    }

    /// The neighboring position one step in `direction`, or `None` when the
    /// step would leave the grid.
    pub fn neighbor(&self, p: Position, direction: Direction) -> Option<Position> {
        match direction {
            Direction::North if p.y > 0 => Some(Position::new(p.x, p.y - 1)),
            Direction::South if p.y < self.height - 1 => Some(Position::new(p.x, p.y + 1)),
            Direction::West if p.x > 0 => Some(Position::new(p.x - 1, p.y)),
            Direction::East if p.x < self.width - 1 => Some(Position::new(p.x + 1, p.y)),
            _ => None,
        }
    }

    /// Open the wall between `p` and its neighbor in `direction`, on both
    /// sides when the neighbor is in bounds.
    pub(crate) fn carve(&mut self, p: Position, direction: Direction) {
        self.at_mut(p).open(direction);
        if let Some(np) = self.neighbor(p, direction) {
            self.at_mut(np).open(direction.opposite());
        }
    }
}
