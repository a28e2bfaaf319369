//! Integer grid model: cells, rectangular footprints, adjacency and
//! placement rules.
//!
//! Adjacency is strict 4-neighbour: two cells touch iff their Manhattan
//! distance is exactly 1. Diagonals never count.

use serde::{Deserialize, Serialize};

use crate::constants::GROUND_ROW;

/// A grid coordinate. Pure value type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &GridCell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn offset(&self, dx: i32, dy: i32) -> GridCell {
        GridCell::new(self.x + dx, self.y + dy)
    }
}

/// True iff the cells are 4-neighbours.
pub fn adjacent(a: GridCell, b: GridCell) -> bool {
    a.manhattan(&b) == 1
}

/// Width × height of a footprint in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    pub const UNIT: GridSize = GridSize { width: 1, height: 1 };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::UNIT
    }
}

/// A w×h rectangle anchored at its bottom-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub anchor: GridCell,
    pub size: GridSize,
}

impl Footprint {
    pub fn new(anchor: GridCell, size: GridSize) -> Self {
        Self { anchor, size }
    }

    pub fn unit(anchor: GridCell) -> Self {
        Self::new(anchor, GridSize::UNIT)
    }

    /// Every cell covered, column by column.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        let anchor = self.anchor;
        let height = self.size.height.max(0);
        (0..self.size.width.max(0))
            .flat_map(move |dx| (0..height).map(move |dy| anchor.offset(dx, dy)))
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x >= self.anchor.x
            && cell.x <= self.right()
            && cell.y >= self.anchor.y
            && cell.y <= self.top()
    }

    /// Rightmost covered column (inclusive).
    pub fn right(&self) -> i32 {
        self.anchor.x + self.size.width - 1
    }

    /// Topmost covered row (inclusive).
    pub fn top(&self) -> i32 {
        self.anchor.y + self.size.height - 1
    }

    /// Geometric centre in cell units.
    pub fn center(&self) -> (f64, f64) {
        (
            self.anchor.x as f64 + self.size.width as f64 / 2.0,
            self.anchor.y as f64 + self.size.height as f64 / 2.0,
        )
    }

    pub fn overlaps(&self, other: &Footprint) -> bool {
        self.anchor.x <= other.right()
            && other.anchor.x <= self.right()
            && self.anchor.y <= other.top()
            && other.anchor.y <= self.top()
    }

    /// True iff any covered cell is a 4-neighbour of any cell of `other`.
    ///
    /// O(w1·h1·w2·h2); footprints are small.
    pub fn is_adjacent_to(&self, other: &Footprint) -> bool {
        self.cells()
            .any(|a| other.cells().any(|b| adjacent(a, b)))
    }
}

/// The cells a footprint occupies.
pub fn occupied_cells(footprint: &Footprint) -> Vec<GridCell> {
    footprint.cells().collect()
}

/// Inclusive bounding box of a set of footprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Number of bounding-box edges the footprint lies on.
    pub fn edges_touched(&self, fp: &Footprint) -> u8 {
        let mut edges = 0;
        if fp.anchor.x == self.min_x {
            edges += 1;
        }
        if fp.right() == self.max_x {
            edges += 1;
        }
        if fp.anchor.y == self.min_y {
            edges += 1;
        }
        if fp.top() == self.max_y {
            edges += 1;
        }
        edges
    }
}

/// Bounding box of all footprints, `None` when empty.
pub fn bounds<'a>(footprints: impl IntoIterator<Item = &'a Footprint>) -> Option<Bounds> {
    footprints.into_iter().fold(None, |acc, fp| {
        Some(match acc {
            None => Bounds {
                min_x: fp.anchor.x,
                max_x: fp.right(),
                min_y: fp.anchor.y,
                max_y: fp.top(),
            },
            Some(b) => Bounds {
                min_x: b.min_x.min(fp.anchor.x),
                max_x: b.max_x.max(fp.right()),
                min_y: b.min_y.min(fp.anchor.y),
                max_y: b.max_y.max(fp.top()),
            },
        })
    })
}

fn occupied_by_any(cell: GridCell, others: &[Footprint]) -> bool {
    others.iter().any(|fp| fp.contains(cell))
}

/// Whether a workspace may be placed at `target`.
///
/// `others` must not include the workspace being placed. When an existing
/// workspace is being moved, `leaving` is its current footprint: it may not
/// leave while anything rests directly on top of it.
pub fn is_valid_placement(target: &Footprint, others: &[Footprint], leaving: Option<&Footprint>) -> bool {
    for cell in target.cells() {
        if cell.y < GROUND_ROW || occupied_by_any(cell, others) {
            return false;
        }
    }

    if let Some(current) = leaving {
        let above = current.top() + 1;
        let blocked = (current.anchor.x..=current.right())
            .any(|x| occupied_by_any(GridCell::new(x, above), others));
        if blocked {
            return false;
        }
    }

    if target.anchor.y == GROUND_ROW {
        return true;
    }

    let below = target.anchor.y - 1;
    (target.anchor.x..=target.right()).any(|x| occupied_by_any(GridCell::new(x, below), others))
}
