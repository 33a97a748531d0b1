use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{
    time_window::TimeWindow,
    travel_matrix::{Distance, Time},
};

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RouterDimension {
    Time,
    Distance,
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPreference {
    MinimizeSpan,
    ForceStart,
    ForceEnd,
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct VehicleCapacity {
    pub unit_id: String,
    pub limit: Option<f64>,
    pub initial: Option<f64>,
    pub overload_multiplier: Option<f64>,
}

impl VehicleCapacity {
    pub fn new(unit_id: impl Into<String>, limit: f64) -> Self {
        VehicleCapacity {
            unit_id: unit_id.into(),
            limit: Some(limit),
            ..VehicleCapacity::default()
        }
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Rest {
    pub id: String,
    pub duration: Time,
    pub timewindows: Vec<TimeWindow>,
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Vehicle {
    pub id: String,
    pub start_point_id: Option<String>,
    pub end_point_id: Option<String>,
    pub matrix_id: Option<String>,
    pub router_mode: Option<String>,
    pub router_dimension: Option<RouterDimension>,
    pub speed_multiplier: Option<f64>,

    pub capacities: Vec<VehicleCapacity>,

    pub cost_fixed: f64,
    pub cost_time_multiplier: f64,
    pub cost_distance_multiplier: f64,
    pub cost_value_multiplier: f64,
    pub cost_waiting_time_multiplier: Option<f64>,
    pub cost_late_multiplier: Option<f64>,

    pub timewindow: Option<TimeWindow>,
    pub sequence_timewindows: Vec<TimeWindow>,

    /// Alternative skill sets, the vehicle satisfies one of them
    pub skills: Vec<Vec<String>>,

    pub duration: Option<Time>,
    pub distance: Option<Distance>,
    pub overall_duration: Option<Time>,
    pub maximum_ride_distance: Option<Distance>,
    pub rests: Vec<Rest>,

    pub force_start: bool,
    pub shift_preference: Option<ShiftPreference>,
    pub free_approach: bool,
    pub free_return: bool,

    pub unavailable_work_day_indices: Vec<i64>,
    pub unavailable_work_date: Vec<Date>,
}

impl Default for Vehicle {
    fn default() -> Self {
        Vehicle {
            id: String::new(),
            start_point_id: None,
            end_point_id: None,
            matrix_id: None,
            router_mode: None,
            router_dimension: None,
            speed_multiplier: None,
            capacities: Vec::new(),
            cost_fixed: 0.0,
            cost_time_multiplier: 1.0,
            cost_distance_multiplier: 0.0,
            cost_value_multiplier: 0.0,
            cost_waiting_time_multiplier: None,
            cost_late_multiplier: None,
            timewindow: None,
            sequence_timewindows: Vec::new(),
            skills: Vec::new(),
            duration: None,
            distance: None,
            overall_duration: None,
            maximum_ride_distance: None,
            rests: Vec::new(),
            force_start: false,
            shift_preference: None,
            free_approach: false,
            free_return: false,
            unavailable_work_day_indices: Vec::new(),
            unavailable_work_date: Vec::new(),
        }
    }
}

impl Vehicle {
    pub fn forces_start(&self) -> bool {
        self.force_start || self.shift_preference == Some(ShiftPreference::ForceStart)
    }

    pub fn has_late_tolerance(&self) -> bool {
        self.cost_late_multiplier
            .is_some_and(|multiplier| multiplier > 0.0)
    }

    pub fn has_skills(&self) -> bool {
        self.skills.iter().any(|alternative| !alternative.is_empty())
    }

    pub fn capacity_limit(&self, unit_id: &str) -> Option<f64> {
        self.capacities
            .iter()
            .find(|capacity| capacity.unit_id == unit_id)
            .and_then(|capacity| capacity.limit)
    }

    /// Longest working span the vehicle offers, from its timewindow or the
    /// best of its sequence timewindows. `None` means unbounded.
    pub fn max_shift(&self) -> Option<Time> {
        if let Some(span) = self.timewindow.as_ref().and_then(TimeWindow::span) {
            return Some(span);
        }

        self.sequence_timewindows
            .iter()
            .map(TimeWindow::span)
            .collect::<Option<Vec<_>>>()
            .and_then(|spans| spans.into_iter().reduce(f64::max))
    }

    pub fn has_timewindows(&self) -> bool {
        self.timewindow.is_some() || !self.sequence_timewindows.is_empty()
    }

    pub fn is_unavailable_on(&self, day: i64, schedule_start: Option<Date>) -> bool {
        self.unavailable_work_day_indices.contains(&day)
            || schedule_start.is_some_and(|start| {
                self.unavailable_work_date
                    .iter()
                    .any(|date| day_offset(start, *date) == Some(day))
            })
    }
}

/// Number of days from `start` to `date`, if representable.
pub(crate) fn day_offset(start: Date, date: Date) -> Option<i64> {
    date.since(start).ok().map(|span| i64::from(span.get_days()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_shift_from_timewindow() {
        let vehicle = Vehicle {
            timewindow: Some(TimeWindow::bounded(100.0, 400.0)),
            ..Vehicle::default()
        };

        assert_eq!(vehicle.max_shift(), Some(300.0));
    }

    #[test]
    fn test_max_shift_from_sequence_timewindows() {
        let vehicle = Vehicle {
            sequence_timewindows: vec![
                TimeWindow::bounded(0.0, 50.0).on_day(0),
                TimeWindow::bounded(0.0, 80.0).on_day(1),
            ],
            ..Vehicle::default()
        };
        assert_eq!(vehicle.max_shift(), Some(80.0));

        let open_ended = Vehicle {
            sequence_timewindows: vec![TimeWindow::new(Some(0.0), None)],
            ..Vehicle::default()
        };
        assert_eq!(open_ended.max_shift(), None);
    }

    #[test]
    fn test_forces_start() {
        let vehicle = Vehicle {
            shift_preference: Some(ShiftPreference::ForceStart),
            ..Vehicle::default()
        };
        assert!(vehicle.forces_start());
        assert!(!Vehicle::default().forces_start());
    }

    #[test]
    fn test_default_objective() {
        let vehicle: Vehicle = serde_json::from_str(r#"{ "id": "v" }"#).unwrap();

        assert_eq!(vehicle.cost_time_multiplier, 1.0);
        assert_eq!(vehicle.cost_distance_multiplier, 0.0);
    }

    #[test]
    fn test_unavailable_work_date() {
        let start = Date::constant(2025, 6, 2);
        let vehicle = Vehicle {
            unavailable_work_date: vec![Date::constant(2025, 6, 4)],
            ..Vehicle::default()
        };

        assert!(vehicle.is_unavailable_on(2, Some(start)));
        assert!(!vehicle.is_unavailable_on(1, Some(start)));
        assert!(!vehicle.is_unavailable_on(2, None));
    }
}
