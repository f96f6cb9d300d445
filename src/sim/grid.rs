//! Grid model for the maze game
//!
//! A rectangular matrix of cell types parsed from an ASCII layout. The shape is
//! fixed once built; the only mutation is a consumed collectible turning into
//! [`Cell::Empty`].

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DOT_POINTS, PELLET_POINTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    /// Regular collectible
    Dot,
    /// Special collectible that makes rivals vulnerable
    PowerPellet,
    /// Rival house door
    Gate,
}

impl Cell {
    pub fn is_collectible(self) -> bool {
        matches!(self, Cell::Dot | Cell::PowerPellet)
    }

    /// Score awarded for consuming this cell
    pub fn points(self) -> u64 {
        match self {
            Cell::Dot => DOT_POINTS,
            Cell::PowerPellet => PELLET_POINTS,
            _ => 0,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Wall => '#',
            Cell::Dot => '.',
            Cell::PowerPellet => 'o',
            Cell::Gate => '-',
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Unknown character {ch:?} at row {row}, column {col}")]
    UnknownCharacter { ch: char, row: usize, col: usize },
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Layout has no cells")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn parse_char(ch: char) -> Option<Cell> {
        match ch {
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Dot),
            'o' => Some(Cell::PowerPellet),
            '-' => Some(Cell::Gate),
            ' ' => Some(Cell::Empty),
            _ => None,
        }
    }

    /// Parse an ASCII layout, one string per row
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = Self::parse_char(ch).ok_or(GridError::UnknownCharacter { ch, row, col })?;
                cells.push(cell);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// The built-in 28x31 maze
    pub fn classic() -> Self {
        // The layout is a compile-time constant and covered by tests
        Self::parse(&CLASSIC_MAZE).unwrap_or_else(|_| Self::filled(1, 1, Cell::Wall))
    }

    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Grid dimensions in cells
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.y as usize * self.width + cell.x as usize)
    }

    pub fn get(&self, cell: IVec2) -> Option<Cell> {
        self.index(cell).map(|i| self.cells[i])
    }

    pub fn set(&mut self, cell: IVec2, value: Cell) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = value;
        }
    }

    /// Out-of-bounds cells are not walls; callers decide how to treat them.
    pub fn is_wall(&self, cell: IVec2) -> bool {
        self.get(cell) == Some(Cell::Wall)
    }

    /// Clear a collectible and return what was there
    pub fn take_collectible(&mut self, cell: IVec2) -> Option<Cell> {
        let i = self.index(cell)?;
        let found = self.cells[i];
        if found.is_collectible() {
            self.cells[i] = Cell::Empty;
            Some(found)
        } else {
            None
        }
    }

    pub fn count_collectibles(&self) -> u32 {
        self.cells.iter().filter(|c| c.is_collectible()).count() as u32
    }

    /// A row wraps horizontally when both edge cells are open
    pub fn is_tunnel_row(&self, row: i32) -> bool {
        if row < 0 || row as usize >= self.height {
            return false;
        }
        let left = IVec2::new(0, row);
        let right = IVec2::new(self.width as i32 - 1, row);
        !self.is_wall(left) && !self.is_wall(right)
    }

    /// All cells in row-major order with their coordinates
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Cell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (IVec2::new((i % width) as i32, (i / width) as i32), c))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    pub fn to_ascii(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|c| c.to_char()).collect())
            .collect()
    }
}

/// Classic layout: `#` wall, `.` dot, `o` power pellet, `-` rival gate
pub const CLASSIC_MAZE: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###--### ##.#     ",
    "######.## #      # ##.######",
    "      .   #      #   .      ",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];
