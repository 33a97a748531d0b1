use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::problem::{
    service::Service, time_window::TimeWindow, travel_matrix::Time,
    vehicle_routing_problem::VehicleRoutingProblem,
};

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfeasibleReason {
    #[serde(rename = "Visits number is 0")]
    ZeroVisits,
    #[serde(rename = "Insufficient capacity in vehicles")]
    InsufficientCapacity,
    #[serde(rename = "Incompatibility between service skills and sticky vehicles")]
    StickySkills,
    #[serde(rename = "Duration bigger than any vehicle timewindow shift")]
    DurationExceedsShift,
    #[serde(rename = "No vehicle with compatible timewindow")]
    NoCompatibleTimewindow,
    #[serde(rename = "Inconsistency between visit number and minimum lapse")]
    LapseInconsistency,
    #[serde(rename = "Unreachable")]
    Unreachable,
    #[serde(rename = "Service cannot be reached within its timewindows")]
    TimewindowUnreachable,
}

impl UnfeasibleReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnfeasibleReason::ZeroVisits => "Visits number is 0",
            UnfeasibleReason::InsufficientCapacity => "Insufficient capacity in vehicles",
            UnfeasibleReason::StickySkills => {
                "Incompatibility between service skills and sticky vehicles"
            }
            UnfeasibleReason::DurationExceedsShift => {
                "Duration bigger than any vehicle timewindow shift"
            }
            UnfeasibleReason::NoCompatibleTimewindow => "No vehicle with compatible timewindow",
            UnfeasibleReason::LapseInconsistency => {
                "Inconsistency between visit number and minimum lapse"
            }
            UnfeasibleReason::Unreachable => "Unreachable",
            UnfeasibleReason::TimewindowUnreachable => {
                "Service cannot be reached within its timewindows"
            }
        }
    }
}

impl fmt::Display for UnfeasibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct QuantityDetail {
    pub unit_id: String,
    pub value: Option<f64>,
}

/// Snapshot of the service as submitted, for the caller's report.
#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
pub struct UnassignedDetail {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub setup_duration: Option<Time>,
    pub duration: Option<Time>,
    pub timewindows: Vec<TimeWindow>,
    pub quantities: Vec<QuantityDetail>,
}

impl UnassignedDetail {
    pub fn from_service(problem: &VehicleRoutingProblem, service: &Service) -> Self {
        let activity = service.activity.as_ref();
        let location = activity
            .and_then(|activity| problem.point(&activity.point_id))
            .and_then(|point| point.location);

        UnassignedDetail {
            lat: location.map(|location| location.lat),
            lon: location.map(|location| location.lon),
            setup_duration: activity.map(|activity| activity.setup_duration),
            duration: activity.map(|activity| activity.duration),
            timewindows: activity
                .map(|activity| {
                    activity
                        .timewindows
                        .iter()
                        .map(|timewindow| TimeWindow::new(timewindow.start, timewindow.end))
                        .collect()
                })
                .unwrap_or_default(),
            quantities: service
                .quantities
                .iter()
                .map(|quantity| QuantityDetail {
                    unit_id: quantity.unit_id.clone(),
                    value: quantity.value,
                })
                .collect(),
        }
    }
}

/// A service that can never be served, with every reason detected for it.
#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct UnassignedRecord {
    pub original_service_id: String,
    /// Visit indexed id for scheduled problems
    pub service_id: String,
    pub point_id: Option<String>,
    pub detail: UnassignedDetail,
    pub reasons: Vec<UnfeasibleReason>,
}

impl UnassignedRecord {
    pub fn new(
        problem: &VehicleRoutingProblem,
        service: &Service,
        reason: UnfeasibleReason,
    ) -> Self {
        let service_id = if problem.scheduling() {
            format!(
                "{}_{}_{}",
                service.id,
                service.visits_number.min(1),
                service.visits_number
            )
        } else {
            service.id.clone()
        };

        UnassignedRecord {
            original_service_id: service.id.clone(),
            service_id,
            point_id: service
                .activity
                .as_ref()
                .map(|activity| activity.point_id.clone()),
            detail: UnassignedDetail::from_service(problem, service),
            reasons: vec![reason],
        }
    }

    pub fn has_reason(&self, reason: UnfeasibleReason) -> bool {
        self.reasons.contains(&reason)
    }

    /// Reasons joined the way they are reported to the caller.
    pub fn reason(&self) -> String {
        self.reasons
            .iter()
            .map(UnfeasibleReason::as_str)
            .collect::<Vec<_>>()
            .join(" && ")
    }
}
