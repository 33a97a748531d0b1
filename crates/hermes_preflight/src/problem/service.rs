use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{time_window::TimeWindow, travel_matrix::Time, vehicle::day_offset};

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Activity {
    pub point_id: String,
    pub duration: Time,
    pub setup_duration: Time,
    pub timewindows: Vec<TimeWindow>,
    pub late_multiplier: Option<f64>,
}

impl Activity {
    pub fn at(point_id: impl Into<String>) -> Self {
        Activity {
            point_id: point_id.into(),
            ..Activity::default()
        }
    }

    pub fn has_late_tolerance(&self) -> bool {
        self.late_multiplier.is_some_and(|multiplier| multiplier > 0.0)
    }
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Quantity {
    pub unit_id: String,
    pub value: Option<f64>,
    pub fill: bool,
    pub empty: bool,
}

impl Quantity {
    pub fn new(unit_id: impl Into<String>, value: f64) -> Self {
        Quantity {
            unit_id: unit_id.into(),
            value: Some(value),
            fill: false,
            empty: false,
        }
    }
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Service {
    pub id: String,
    pub priority: Option<u8>,
    pub exclusion_cost: Option<f64>,
    pub visits_number: u32,
    /// Minimum number of days between two visits
    pub minimum_lapse: Option<f64>,
    pub maximum_lapse: Option<f64>,
    pub sticky_vehicle_ids: Vec<String>,
    pub skills: Vec<String>,
    pub quantities: Vec<Quantity>,

    pub activity: Option<Activity>,
    /// Alternative activities, exactly one of them is performed
    pub activities: Vec<Activity>,

    pub unavailable_visit_day_indices: Vec<i64>,
    pub unavailable_visit_day_date: Vec<Date>,
}

impl Default for Service {
    fn default() -> Self {
        Service {
            id: String::new(),
            priority: None,
            exclusion_cost: None,
            visits_number: 1,
            minimum_lapse: None,
            maximum_lapse: None,
            sticky_vehicle_ids: Vec::new(),
            skills: Vec::new(),
            quantities: Vec::new(),
            activity: None,
            activities: Vec::new(),
            unavailable_visit_day_indices: Vec::new(),
            unavailable_visit_day_date: Vec::new(),
        }
    }
}

impl Service {
    pub fn has_activity(&self) -> bool {
        self.activity.is_some() || !self.activities.is_empty()
    }

    /// Shortest duration among the activities the service may perform.
    pub fn min_duration(&self) -> Option<Time> {
        match &self.activity {
            Some(activity) => Some(activity.duration),
            None => self
                .activities
                .iter()
                .map(|activity| activity.duration)
                .reduce(f64::min),
        }
    }

    pub fn timewindows(&self) -> Vec<&TimeWindow> {
        match &self.activity {
            Some(activity) => activity.timewindows.iter().collect(),
            None => self
                .activities
                .iter()
                .flat_map(|activity| activity.timewindows.iter())
                .collect(),
        }
    }

    pub fn has_late_tolerance(&self) -> bool {
        self.activity
            .as_ref()
            .is_some_and(Activity::has_late_tolerance)
    }

    pub fn is_unavailable_on(&self, day: i64, schedule_start: Option<Date>) -> bool {
        self.unavailable_visit_day_indices.contains(&day)
            || schedule_start.is_some_and(|start| {
                self.unavailable_visit_day_date
                    .iter()
                    .any(|date| day_offset(start, *date) == Some(day))
            })
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Shipment {
    pub id: String,
    pub pickup: Activity,
    pub delivery: Activity,
    pub quantities: Vec<Quantity>,
    pub skills: Vec<String>,
    pub sticky_vehicle_ids: Vec<String>,
}
