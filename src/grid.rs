use itertools::iproduct;
use serde_derive::{Deserialize, Serialize};
use std::str::FromStr;

pub type Index = usize;

/// A cell coordinate. `x` is the column, `y` the row; the origin is a corner
/// of the grid and there is no wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

/// The distance metric that decides which cells lie within the radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Neighborhood {
    /// `dx² + dy² ≤ r²`, the circle of agents within `r` patches.
    Euclidean,
    /// Chebyshev distance, `max(|dx|, |dy|) ≤ r`.
    Moore,
    /// Manhattan distance, `|dx| + |dy| ≤ r`.
    VonNeumann,
}

impl Neighborhood {
    pub fn contains(self, dx: i64, dy: i64, radius: f64) -> bool {
        match self {
            Neighborhood::Euclidean => ((dx * dx + dy * dy) as f64) <= radius * radius,
            Neighborhood::Moore => (dx.abs().max(dy.abs()) as f64) <= radius,
            Neighborhood::VonNeumann => ((dx.abs() + dy.abs()) as f64) <= radius,
        }
    }
}

impl FromStr for Neighborhood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Neighborhood::Euclidean),
            "moore" | "chebyshev" => Ok(Neighborhood::Moore),
            "von-neumann" | "vonneumann" | "manhattan" => Ok(Neighborhood::VonNeumann),
            other => Err(format!("unknown neighborhood `{}`", other)),
        }
    }
}

/// A bounded N×N grid, together with the stencil of cell offsets that lie
/// within the interaction radius. Agents never move, so the stencil is
/// computed once and shared by the interaction sweep and the region analysis.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    offsets: Vec<(i64, i64)>,
}

impl Grid {
    pub fn new(size: usize, radius: f64, neighborhood: Neighborhood) -> Grid {
        // Nothing further away than the grid is wide can be in bounds.
        let reach = (radius.floor() as i64).min(size as i64 - 1).max(0);
        let offsets = iproduct!(-reach..=reach, -reach..=reach)
            .filter(|&(dx, dy)| (dx, dy) != (0, 0) && neighborhood.contains(dx, dy, radius))
            .collect();
        Grid { size, offsets }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.size * self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn position(&self, index: Index) -> Position {
        Position {
            x: index % self.size,
            y: index / self.size,
        }
    }

    pub fn index(&self, position: Position) -> Index {
        position.y * self.size + position.x
    }

    /// All other cells within the radius of `index`, in a fixed order.
    pub fn neighbors(&self, index: Index) -> impl Iterator<Item = Index> + '_ {
        let Position { x, y } = self.position(index);
        let size = self.size as i64;
        self.offsets.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if 0 <= nx && nx < size && 0 <= ny && ny < size {
                Some((ny * size + nx) as Index)
            } else {
                None
            }
        })
    }
}
