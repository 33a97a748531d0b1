use schemars::schema_for;

use crate::problem::vehicle_routing_problem::VehicleRoutingProblem;

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(VehicleRoutingProblem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_json_schema() {
        let schema = generate_json_schema().unwrap();
        let value: serde_json::Value = serde_json::from_str(&schema).unwrap();

        assert_eq!(value["title"], "VehicleRoutingProblem");
        assert!(schema.contains("first_solution_strategy"));
    }
}
