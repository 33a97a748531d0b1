use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Point {
    pub id: String,
    pub matrix_index: Option<usize>,
    pub location: Option<Location>,
}

impl Point {
    pub fn new(id: impl Into<String>, matrix_index: usize) -> Self {
        Point {
            id: id.into(),
            matrix_index: Some(matrix_index),
            location: None,
        }
    }

    pub fn has_coordinates(&self) -> bool {
        self.location.is_some()
    }

    /// Two points share a position when both carry identical coordinates.
    pub fn same_location(&self, other: &Point) -> bool {
        match (&self.location, &other.location) {
            (Some(a), Some(b)) => a.lat == b.lat && a.lon == b.lon,
            _ => false,
        }
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Unit {
    pub id: String,
    pub label: Option<String>,
}

impl Unit {
    pub fn new(id: impl Into<String>) -> Self {
        Unit {
            id: id.into(),
            label: None,
        }
    }
}
