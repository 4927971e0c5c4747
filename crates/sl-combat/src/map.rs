//! Grid positions, map cells, cover geometry, and the path-finding seam.
//!
//! The engine never mutates a [`GameMap`]. It reads cells to grant cover
//! bonuses and asks a [`PathFinder`] whether a move is legal. Cells outside
//! the map count as open ground, so a match may be fought on a map smaller
//! than the distance between the two factions.

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, CombatResult};

/// A cell on the combat grid. One cell is one metre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Construct a position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Grid distance allowing diagonal steps (Chebyshev metric).
    pub fn distance_to(self, other: Position) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }

    /// The neighbouring cell one step closer to `target`.
    pub fn step_toward(self, target: Position) -> Position {
        Position::new(
            self.x + (target.x - self.x).signum(),
            self.y + (target.y - self.y).signum(),
        )
    }

    /// The eight surrounding cells.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| Position::new(self.x + dx, self.y + dy))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What occupies a map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    /// Open ground.
    #[default]
    Empty,
    /// Low wall, crates, a car door: +2 defence.
    PartialCover,
    /// Solid wall or pillar: +4 defence, impassable.
    HardCover,
}

impl CellType {
    /// Defence dice granted when this cell sits between attacker and defender.
    pub fn cover_bonus(self) -> i32 {
        match self {
            Self::Empty => 0,
            Self::PartialCover => 2,
            Self::HardCover => 4,
        }
    }

    /// True if the cell provides any cover.
    pub fn is_cover(self) -> bool {
        self != Self::Empty
    }
}

/// A rectangular grid of cells supplied by the map provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMap {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Row-major cell types, `width * height` long.
    pub cells: Vec<CellType>,
}

impl GameMap {
    /// An empty map of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![CellType::Empty; width as usize * height as usize],
        }
    }

    /// Build a map from a flat cell array, checking its length.
    pub fn from_cells(width: u32, height: u32, cells: Vec<CellType>) -> CombatResult<Self> {
        let map = Self {
            width,
            height,
            cells,
        };
        map.validate()?;
        Ok(map)
    }

    /// Check that the cell array matches the declared dimensions.
    pub fn validate(&self) -> CombatResult<()> {
        let expected = self.width as usize * self.height as usize;
        if self.cells.len() != expected {
            return Err(CombatError::invalid(format!(
                "map is {}x{} but has {} cells",
                self.width,
                self.height,
                self.cells.len()
            )));
        }
        Ok(())
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as u32, pos.y as u32);
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// True if `pos` lies on the grid.
    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// The cell at `pos`. Out-of-bounds cells are open ground.
    pub fn cell(&self, pos: Position) -> CellType {
        self.index(pos)
            .and_then(|i| self.cells.get(i).copied())
            .unwrap_or_default()
    }

    /// Set the cell at `pos`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, cell: CellType) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// Builder form of [`GameMap::set`].
    pub fn with_cell(mut self, pos: Position, cell: CellType) -> Self {
        self.set(pos, cell);
        self
    }

    /// True unless the cell is hard cover.
    pub fn is_passable(&self, pos: Position) -> bool {
        self.cell(pos) != CellType::HardCover
    }

    /// Cover cells among the eight neighbours of `pos`.
    pub fn adjacent_cover(&self, pos: Position) -> Vec<Position> {
        pos.neighbors().filter(|&n| self.cell(n).is_cover()).collect()
    }

    /// Defence bonus for a defender at `defender` with recorded cover cells
    /// `cover_cells`, attacked from `attacker`.
    ///
    /// Only recorded cells that lie on the line between the two count; the
    /// best one wins.
    pub fn cover_bonus(&self, cover_cells: &[Position], attacker: Position, defender: Position) -> i32 {
        line_cells(attacker, defender)
            .into_iter()
            .filter(|c| cover_cells.contains(c))
            .map(|c| self.cell(c).cover_bonus())
            .max()
            .unwrap_or(0)
    }
}

/// Cells on the Bresenham line from `from` to `to`, both endpoints excluded.
pub fn line_cells(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = (to.x - from.x).signum();
    let sy = (to.y - from.y).signum();
    let mut err = dx + dy;
    let (mut x, mut y) = (from.x, from.y);
    let mut cells = Vec::new();

    while (x, y) != (to.x, to.y) {
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        if (x, y) != (to.x, to.y) {
            cells.push(Position::new(x, y));
        }
    }
    cells
}

/// Shortest-path oracle supplied by the map collaborator.
///
/// Hard-cover cells and `blocked` (cells held by other combatants) are
/// impassable. Returns `None` when `to` is unreachable.
pub trait PathFinder: Send + Sync {
    /// Length in steps of the shortest path from `from` to `to`.
    fn path_length(
        &self,
        map: &GameMap,
        from: Position,
        to: Position,
        blocked: &[Position],
    ) -> Option<u32>;
}

/// Straight-line stand-in: Chebyshev distance, refusing only blocked destinations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPath;

impl PathFinder for DirectPath {
    fn path_length(
        &self,
        map: &GameMap,
        from: Position,
        to: Position,
        blocked: &[Position],
    ) -> Option<u32> {
        (map.is_passable(to) && !blocked.contains(&to)).then(|| from.distance_to(to))
    }
}
