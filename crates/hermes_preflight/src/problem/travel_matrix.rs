use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

pub type Distance = f64;
pub type Time = f64;
pub type Cost = f64;

/// Square grid indexed by `[from][to]` point matrix indices.
pub type Grid = Vec<Vec<f64>>;

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatrixDimension {
    Time,
    Distance,
    Value,
}

impl MatrixDimension {
    pub const ALL: [MatrixDimension; 3] = [
        MatrixDimension::Time,
        MatrixDimension::Distance,
        MatrixDimension::Value,
    ];
}

/// Travel matrices of one routing profile. `value` holds the costing grid and
/// is the only one ever rewritten internally; `time` and `distance` report
/// real-world travel.
#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Matrix {
    pub id: String,
    pub time: Option<Grid>,
    pub distance: Option<Grid>,
    pub value: Option<Grid>,
}

impl Matrix {
    pub fn from_time(id: impl Into<String>, time: Grid) -> Self {
        Matrix {
            id: id.into(),
            time: Some(time),
            distance: None,
            value: None,
        }
    }

    pub fn grid(&self, dimension: MatrixDimension) -> Option<&Grid> {
        match dimension {
            MatrixDimension::Time => self.time.as_ref(),
            MatrixDimension::Distance => self.distance.as_ref(),
            MatrixDimension::Value => self.value.as_ref(),
        }
    }

    pub fn grids(&self) -> impl Iterator<Item = &Grid> {
        MatrixDimension::ALL
            .into_iter()
            .filter_map(|dimension| self.grid(dimension))
    }

    pub fn has_time_or_distance(&self) -> bool {
        self.time.is_some() || self.distance.is_some()
    }

    pub fn cost(&self, dimension: MatrixDimension, from: usize, to: usize) -> Option<Cost> {
        self.grid(dimension)
            .and_then(|grid| grid.get(from))
            .and_then(|row| row.get(to))
            .copied()
    }
}

pub fn is_square(grid: &Grid) -> bool {
    grid.iter().all(|row| row.len() == grid.len())
}

/// Returns the first `(i, j, k)` with `grid[i][j] > grid[i][k] + grid[k][j]`.
pub fn find_triangle_violation(grid: &Grid) -> Option<(usize, usize, usize)> {
    let size = grid.len();
    for i in 0..size {
        for j in 0..size {
            for k in 0..size {
                if grid[i][j] > grid[i][k] + grid[k][j] {
                    return Some((i, j, k));
                }
            }
        }
    }

    None
}
