use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    #[default]
    SameRoute,
    Order,
    Sequence,
    Precedence,
    Shipment,
    MeetUp,
    MinimumDayLapse,
    MaximumDayLapse,
    VehicleGroupDuration,
    VehicleGroupDurationOnWeeks,
    VehicleGroupDurationOnMonths,
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Relation {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    pub linked_ids: Vec<String>,
    pub linked_vehicle_ids: Vec<String>,
    pub lapse: Option<f64>,
}

impl Relation {
    pub fn is_empty(&self) -> bool {
        self.linked_ids.is_empty() && self.linked_vehicle_ids.is_empty()
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Zone {
    pub id: String,
    /// Alternative vehicle groups allowed to serve the zone
    pub allocations: Vec<Vec<String>>,
}

#[skip_serializing_none]
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Route {
    pub vehicle_id: String,
    pub day: Option<i64>,
    pub mission_ids: Vec<String>,
}
