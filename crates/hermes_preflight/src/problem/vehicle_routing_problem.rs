use jiff::{SignedDuration, civil::Date};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
    heuristic::{heuristic::FirstSolutionStrategy, synthesis::SynthesisRecord},
    sub_problem::SolveResult,
};

use super::{
    point::{Point, Unit},
    relation::{Relation, Route, Zone},
    service::{Service, Shipment},
    travel_matrix::Matrix,
    vehicle::{Vehicle, day_offset},
};

/// A routing instance as submitted by the caller. Cloning produces a fully
/// independent copy, sub-problems never share state with their source.
#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default, rename = "VehicleRoutingProblem")]
pub struct VehicleRoutingProblem {
    pub name: Option<String>,
    pub points: Vec<Point>,
    pub units: Vec<Unit>,
    pub vehicles: Vec<Vehicle>,
    pub services: Vec<Service>,
    pub shipments: Vec<Shipment>,
    pub matrices: Vec<Matrix>,
    pub relations: Vec<Relation>,
    pub zones: Vec<Zone>,
    pub routes: Vec<Route>,
    pub configuration: Configuration,
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Configuration {
    pub preprocessing: Preprocessing,
    pub resolution: Resolution,
    pub restitution: Restitution,
    pub schedule: Option<Schedule>,
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PartitionMethod {
    BalancedKmeans,
    Hierarchical,
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PartitionEntity {
    Vehicle,
    WorkDay,
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Partition {
    pub method: PartitionMethod,
    pub metric: Option<String>,
    pub entity: Option<PartitionEntity>,
    pub restarts: Option<u32>,
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Preprocessing {
    pub first_solution_strategy: Vec<FirstSolutionStrategy>,
    pub partitions: Vec<Partition>,
    /// Deprecated single partition method, superseded by `partitions`
    pub partition_method: Option<String>,
    pub partition_metric: Option<String>,
    pub kmeans_centroids: Option<Vec<usize>>,
    pub cluster_threshold: Option<f64>,
    pub max_split_size: Option<usize>,

    pub heuristic_synthesis: Vec<SynthesisRecord>,
    pub heuristic_result: Option<SolveResult>,
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Resolution {
    pub duration: Option<SignedDuration>,
    pub min_duration: Option<SignedDuration>,
    pub initial_time_out: Option<SignedDuration>,
    pub iterations_without_improvment: Option<usize>,
    pub solver: bool,
    pub solver_parameter: Option<i32>,
    pub several_solutions: Option<usize>,
    /// Percentage of random noise applied to matrices of generated variants
    pub variation_ratio: Option<u32>,
    pub batch_heuristic: bool,
    pub repetition: usize,
    pub vehicle_limit: Option<usize>,
    pub evaluate_only: bool,
    pub same_point_day: bool,
    pub allow_partial_assignment: bool,
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution {
            duration: None,
            min_duration: None,
            initial_time_out: None,
            iterations_without_improvment: None,
            solver: true,
            solver_parameter: None,
            several_solutions: None,
            variation_ratio: None,
            batch_heuristic: false,
            repetition: 1,
            vehicle_limit: None,
            evaluate_only: false,
            same_point_day: false,
            allow_partial_assignment: true,
        }
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Restitution {
    pub allow_empty_result: bool,
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: i64,
    pub end: i64,
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Schedule {
    pub range_indices: Option<DayRange>,
    pub range_date: Option<DateRange>,
}

impl Schedule {
    /// First and last day index of the horizon. Date ranges start at the
    /// weekday index of their first date, Monday being 0.
    pub fn indices(&self) -> Option<(i64, i64)> {
        if let Some(range) = self.range_indices {
            return Some((range.start, range.end));
        }

        let range = self.range_date?;
        let start = i64::from(range.start.weekday().to_monday_zero_offset());
        let length = day_offset(range.start, range.end)?;
        Some((start, start + length))
    }
}

impl VehicleRoutingProblem {
    pub fn scheduling(&self) -> bool {
        self.configuration
            .schedule
            .as_ref()
            .is_some_and(|schedule| schedule.indices().is_some())
    }

    pub fn schedule_indices(&self) -> Option<(i64, i64)> {
        self.configuration
            .schedule
            .as_ref()
            .and_then(Schedule::indices)
    }

    pub fn schedule_start_date(&self) -> Option<Date> {
        self.configuration
            .schedule
            .as_ref()
            .and_then(|schedule| schedule.range_date)
            .map(|range| range.start)
    }

    pub fn schedule_range_date(&self) -> bool {
        self.schedule_start_date().is_some()
    }

    pub fn first_solution_strategy(&self) -> &[FirstSolutionStrategy] {
        &self.configuration.preprocessing.first_solution_strategy
    }

    /// The periodic scheduling heuristic is the primary strategy.
    pub fn is_periodic(&self) -> bool {
        self.first_solution_strategy().first() == Some(&FirstSolutionStrategy::PERIODIC)
    }

    pub fn strategy_includes_periodic(&self) -> bool {
        self.first_solution_strategy()
            .contains(&FirstSolutionStrategy::PERIODIC)
    }

    pub fn set_first_solution_strategy(&mut self, strategy: Vec<FirstSolutionStrategy>) {
        self.configuration.preprocessing.first_solution_strategy = strategy;
    }

    pub fn point(&self, point_id: &str) -> Option<&Point> {
        self.points.iter().find(|point| point.id == point_id)
    }

    pub fn point_matrix_index(&self, point_id: Option<&str>) -> Option<usize> {
        point_id
            .and_then(|id| self.point(id))
            .and_then(|point| point.matrix_index)
    }

    pub fn vehicle(&self, vehicle_id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == vehicle_id)
    }

    pub fn service(&self, service_id: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.id == service_id)
    }

    /// Matrix used by `vehicle`, the first one when it does not name any.
    pub fn vehicle_matrix(&self, vehicle: &Vehicle) -> Option<&Matrix> {
        match &vehicle.matrix_id {
            Some(matrix_id) => self.matrices.iter().find(|matrix| &matrix.id == matrix_id),
            None => self.matrices.first(),
        }
    }

    pub fn service_matrix_index(&self, service: &Service) -> Option<usize> {
        service
            .activity
            .as_ref()
            .and_then(|activity| self.point(&activity.point_id))
            .and_then(|point| point.matrix_index)
    }

    pub fn total_rests(&self) -> usize {
        self.vehicles.iter().map(|vehicle| vehicle.rests.len()).sum()
    }
}
