use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::problem::vehicle_routing_problem::VehicleRoutingProblem;

use super::rules::*;

macro_rules! admission_rules {
    ($($variant:ident => $check:ident),* $(,)?) => {
        /// Named assumption a solver backend makes about its input problem.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum AdmissionRule {
            $($variant),*
        }

        impl AdmissionRule {
            pub const ALL: &'static [AdmissionRule] = &[$(AdmissionRule::$variant),*];

            pub fn name(&self) -> &'static str {
                match self {
                    $(AdmissionRule::$variant => stringify!($check)),*
                }
            }

            pub fn is_satisfied(&self, problem: &VehicleRoutingProblem) -> bool {
                match self {
                    $(AdmissionRule::$variant => $check(problem)),*
                }
            }
        }
    };
}

admission_rules! {
    PointsSameDefinition => assert_points_same_definition,
    UnitsOnlyOne => assert_units_only_one,
    VehiclesOnlyOne => assert_vehicles_only_one,
    VehiclesAtLeastOne => assert_vehicles_at_least_one,
    VehiclesStart => assert_vehicles_start,
    VehiclesStartOrEnd => assert_vehicles_start_or_end,
    VehiclesNoTimewindow => assert_vehicles_no_timewindow,
    VehiclesNoRests => assert_vehicles_no_rests,
    ServicesNoCapacities => assert_services_no_capacities,
    VehiclesCapacitiesOnlyOne => assert_vehicles_capacities_only_one,
    VehiclesNoCapacityInitial => assert_vehicles_no_capacity_initial,
    VehiclesNoAlternativeSkills => assert_vehicles_no_alternative_skills,
    NoShipments => assert_no_shipments,
    NoShipmentsWithMultipleTimewindows => assert_no_shipments_with_multiple_timewindows,
    NoPickupTimewindowsAfterDeliveryTimewindows => assert_no_pickup_timewindows_after_delivery_timewindows,
    ServicesNoSkills => assert_services_no_skills,
    ServicesNoTimewindows => assert_services_no_timewindows,
    ServicesNoMultipleTimewindows => assert_services_no_multiple_timewindows,
    ServicesAtMostTwoTimewindows => assert_services_at_most_two_timewindows,
    ServicesNoPriority => assert_services_no_priority,
    VehiclesObjective => assert_vehicles_objective,
    VehiclesNoLateMultiplier => assert_vehicles_no_late_multiplier,
    VehiclesNoOverloadMultiplier => assert_vehicles_no_overload_multiplier,
    VehiclesNoForceStart => assert_vehicles_no_force_start,
    VehiclesNoDurationLimit => assert_vehicles_no_duration_limit,
    VehiclesNoZeroDuration => assert_vehicles_no_zero_duration,
    ServicesNoLateMultiplier => assert_services_no_late_multiplier,
    ShipmentsNoLateMultiplier => assert_shipments_no_late_multiplier,
    ServicesQuantitiesOnlyOne => assert_services_quantities_only_one,
    MatricesOnlyOne => assert_matrices_only_one,
    SquareMatrix => assert_square_matrix,
    CorrectnessProvidedMatrixIndices => assert_correctness_provided_matrix_indices,
    CorrectnessMatricesVehiclesAndPointsDefinition => assert_correctness_matrices_vehicles_and_points_definition,
    OneStickyAtMost => assert_one_sticky_at_most,
    OneVehicleOnlyOrNoStickyVehicle => assert_one_vehicle_only_or_no_sticky_vehicle,
    NoRelations => assert_no_relations,
    NoZones => assert_no_zones,
    ZonesOnlySizeOneAlternative => assert_zones_only_size_one_alternative,
    NoValueMatrix => assert_no_value_matrix,
    NoRoutes => assert_no_routes,
    OnlyEmptyOrFillQuantities => assert_only_empty_or_fill_quantities,
    AtLeastOneMission => assert_at_least_one_mission,
    EndOptimization => assert_end_optimization,
    VehiclesNoEndTimeOrLateMultiplier => assert_vehicles_no_end_time_or_late_multiplier,
    NoDistanceLimitation => assert_no_distance_limitation,
    RangeDateIfMonthDuration => assert_range_date_if_month_duration,
    VehicleTwIfSchedule => assert_vehicle_tw_if_schedule,
    IfSequenceTwThenSchedule => assert_if_sequence_tw_then_schedule,
    IfPeriodicHeuristicThenSchedule => assert_if_periodic_heuristic_then_schedule,
    FirstSolutionStrategyIsPossible => assert_first_solution_strategy_is_possible,
    FirstSolutionStrategyIsValid => assert_first_solution_strategy_is_valid,
    NoPlanningHeuristic => assert_no_planning_heuristic,
    OnlyForceCentroidsIfKmeansMethod => assert_only_force_centroids_if_kmeans_method,
    NoEvaluation => assert_no_evaluation,
    NoShipmentsIfEvaluation => assert_no_shipments_if_evaluation,
    NoSchedulingIfEvaluation => assert_no_scheduling_if_evaluation,
    RouteIfEvaluation => assert_route_if_evaluation,
    WrongVehicleShiftPreferenceWithHeuristic => assert_wrong_vehicle_shift_preference_with_heuristic,
    NoVehicleOverallDurationIfHeuristic => assert_no_vehicle_overall_duration_if_heuristic,
    NoVehicleDistanceIfHeuristic => assert_no_vehicle_distance_if_heuristic,
    PossibleToGetDistancesIfMaximumRideDistance => assert_possible_to_get_distances_if_maximum_ride_distance,
    NoSkillsIfHeuristic => assert_no_skills_if_heuristic,
    NoVehicleFreeApproachOrReturnIfHeuristic => assert_no_vehicle_free_approach_or_return_if_heuristic,
    NoServiceExclusionCostIfHeuristic => assert_no_service_exclusion_cost_if_heuristic,
    NoVehicleLimitIfHeuristic => assert_no_vehicle_limit_if_heuristic,
    NoSamePointDayIfNoHeuristic => assert_no_same_point_day_if_no_heuristic,
    NoAllowPartialIfNoHeuristic => assert_no_allow_partial_if_no_heuristic,
    NoFirstSolutionStrategy => assert_no_first_solution_strategy,
    Solver => assert_solver,
    SolverIfNotPeriodic => assert_solver_if_not_periodic,
    ClusteringCompatibleWithSchedulingHeuristic => assert_clustering_compatible_with_scheduling_heuristic,
    LatLonForPartition => assert_lat_lon_for_partition,
    WorkDayPartitionsOnlySchedule => assert_work_day_partitions_only_schedule,
    VehicleEntityOnlyBeforeWorkDay => assert_vehicle_entity_only_before_work_day,
    DeprecatedPartitions => assert_deprecated_partitions,
    PartitionsEntity => assert_partitions_entity,
    NoPartitions => assert_no_partitions,
    NoInitialCentroidsWithPartitions => assert_no_initial_centroids_with_partitions,
    ValidPartitions => assert_valid_partitions,
    NoRelationWithSchedulingHeuristic => assert_no_relation_with_scheduling_heuristic,
    OnlyOneActivityWithSchedulingHeuristic => assert_only_one_activity_with_scheduling_heuristic,
    NoRouteIfClustering => assert_no_route_if_clustering,
    ServiceWithVisitIndexInRouteIfPeriodic => assert_service_with_visit_index_in_route_if_periodic,
    RouteDayIfPeriodic => assert_route_day_if_periodic,
}

impl fmt::Display for AdmissionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AdmissionRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdmissionRule::ALL
            .iter()
            .find(|rule| rule.name() == s)
            .copied()
            .ok_or_else(|| format!("unknown admission rule {s}"))
    }
}

impl Serialize for AdmissionRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for AdmissionRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
