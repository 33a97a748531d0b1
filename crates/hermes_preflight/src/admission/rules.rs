//! Admission predicates. Each one is pure and returns `true` when the problem
//! satisfies the assumption it is named after.

use fxhash::{FxHashMap, FxHashSet};

use crate::problem::{
    relation::RelationType,
    travel_matrix::is_square,
    vehicle::{RouterDimension, ShiftPreference, Vehicle},
    vehicle_routing_problem::{PartitionEntity, PartitionMethod, VehicleRoutingProblem},
};

use crate::heuristic::heuristic::FirstSolutionStrategy;

type Problem = VehicleRoutingProblem;

const DEFAULT_PRIORITY: u8 = 4;

pub fn assert_points_same_definition(problem: &Problem) -> bool {
    let points = &problem.points;
    (points.iter().all(|point| point.location.is_some())
        || points.iter().all(|point| point.location.is_none()))
        && (points.iter().all(|point| point.matrix_index.is_some())
            || points.iter().all(|point| point.matrix_index.is_none()))
}

pub fn assert_units_only_one(problem: &Problem) -> bool {
    problem.units.len() <= 1
}

pub fn assert_vehicles_only_one(problem: &Problem) -> bool {
    problem.vehicles.len() == 1 && !problem.scheduling()
}

pub fn assert_vehicles_at_least_one(problem: &Problem) -> bool {
    !problem.vehicles.is_empty()
        && (problem.vehicles.iter().all(|vehicle| vehicle.duration.is_none())
            || problem
                .vehicles
                .iter()
                .any(|vehicle| vehicle.duration.is_some_and(|duration| duration > 0.0)))
}

pub fn assert_vehicles_start(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .all(|vehicle| vehicle.start_point_id.is_some())
}

pub fn assert_vehicles_start_or_end(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .all(|vehicle| vehicle.start_point_id.is_some() || vehicle.end_point_id.is_some())
}

pub fn assert_vehicles_no_timewindow(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .all(|vehicle| vehicle.timewindow.is_none())
}

pub fn assert_vehicles_no_rests(problem: &Problem) -> bool {
    problem.vehicles.iter().all(|vehicle| vehicle.rests.is_empty())
}

pub fn assert_services_no_capacities(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .all(|vehicle| vehicle.capacities.is_empty())
}

pub fn assert_vehicles_capacities_only_one(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .all(|vehicle| vehicle.capacities.len() <= 1)
}

pub fn assert_vehicles_no_capacity_initial(problem: &Problem) -> bool {
    problem.vehicles.iter().all(|vehicle| {
        vehicle
            .capacities
            .iter()
            .all(|capacity| capacity.initial.is_none_or(|initial| initial <= 0.0))
    })
}

pub fn assert_vehicles_no_alternative_skills(problem: &Problem) -> bool {
    problem.vehicles.iter().all(|vehicle| vehicle.skills.len() <= 1)
}

pub fn assert_no_shipments(problem: &Problem) -> bool {
    problem.shipments.is_empty()
}

pub fn assert_no_shipments_with_multiple_timewindows(problem: &Problem) -> bool {
    problem.shipments.iter().all(|shipment| {
        shipment.pickup.timewindows.len() <= 1 && shipment.delivery.timewindows.len() <= 1
    })
}

pub fn assert_no_pickup_timewindows_after_delivery_timewindows(problem: &Problem) -> bool {
    const DAY: f64 = 86_400.0;

    problem.shipments.iter().all(|shipment| {
        let first_open = shipment
            .pickup
            .timewindows
            .iter()
            .map(|tw| tw.start.unwrap_or(0.0) + DAY * tw.day_index.unwrap_or(0) as f64)
            .reduce(f64::min);
        let last_close = shipment
            .delivery
            .timewindows
            .iter()
            .map(|tw| tw.end.unwrap_or(DAY - 1.0) + DAY * tw.day_index.unwrap_or(0) as f64)
            .reduce(f64::max);

        match (first_open, last_close) {
            (Some(open), Some(close)) => open <= close,
            _ => true,
        }
    })
}

pub fn assert_services_no_skills(problem: &Problem) -> bool {
    problem.services.iter().all(|service| service.skills.is_empty())
}

pub fn assert_services_no_timewindows(problem: &Problem) -> bool {
    problem
        .services
        .iter()
        .all(|service| service.timewindows().is_empty())
}

pub fn assert_services_no_multiple_timewindows(problem: &Problem) -> bool {
    problem
        .services
        .iter()
        .all(|service| service.timewindows().len() <= 1)
}

pub fn assert_services_at_most_two_timewindows(problem: &Problem) -> bool {
    problem
        .services
        .iter()
        .all(|service| service.timewindows().len() <= 2)
}

pub fn assert_services_no_priority(problem: &Problem) -> bool {
    problem
        .services
        .iter()
        .all(|service| service.priority.is_none_or(|priority| priority == DEFAULT_PRIORITY))
}

pub fn assert_vehicles_objective(problem: &Problem) -> bool {
    problem.vehicles.iter().all(|vehicle| {
        vehicle.cost_time_multiplier > 0.0
            || vehicle.cost_distance_multiplier > 0.0
            || vehicle
                .cost_waiting_time_multiplier
                .is_some_and(|multiplier| multiplier > 0.0)
            || vehicle.cost_value_multiplier > 0.0
    })
}

pub fn assert_vehicles_no_late_multiplier(problem: &Problem) -> bool {
    !problem.vehicles.iter().any(Vehicle::has_late_tolerance)
}

pub fn assert_vehicles_no_overload_multiplier(problem: &Problem) -> bool {
    problem.vehicles.iter().all(|vehicle| {
        vehicle.capacities.iter().all(|capacity| {
            capacity
                .overload_multiplier
                .is_none_or(|multiplier| multiplier <= 0.0)
        })
    })
}

pub fn assert_vehicles_no_force_start(problem: &Problem) -> bool {
    problem.vehicles.iter().all(|vehicle| !vehicle.force_start)
}

pub fn assert_vehicles_no_duration_limit(problem: &Problem) -> bool {
    problem.vehicles.iter().all(|vehicle| vehicle.duration.is_none())
}

pub fn assert_vehicles_no_zero_duration(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .all(|vehicle| vehicle.duration != Some(0.0))
}

pub fn assert_services_no_late_multiplier(problem: &Problem) -> bool {
    !problem
        .services
        .iter()
        .any(|service| service.has_late_tolerance())
}

pub fn assert_shipments_no_late_multiplier(problem: &Problem) -> bool {
    problem.shipments.iter().all(|shipment| {
        !shipment.pickup.has_late_tolerance() && !shipment.delivery.has_late_tolerance()
    })
}

pub fn assert_services_quantities_only_one(problem: &Problem) -> bool {
    problem
        .services
        .iter()
        .all(|service| service.quantities.len() <= 1)
}

#[derive(PartialEq, Eq, Hash)]
enum MatrixKey<'a> {
    Id(&'a str),
    Profile(Option<&'a str>, Option<RouterDimension>, Option<u64>),
}

pub fn assert_matrices_only_one(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .map(|vehicle| match &vehicle.matrix_id {
            Some(matrix_id) => MatrixKey::Id(matrix_id),
            None => MatrixKey::Profile(
                vehicle.router_mode.as_deref(),
                vehicle.router_dimension,
                vehicle.speed_multiplier.map(f64::to_bits),
            ),
        })
        .collect::<FxHashSet<_>>()
        .len()
        == 1
}

pub fn assert_square_matrix(problem: &Problem) -> bool {
    problem
        .matrices
        .iter()
        .all(|matrix| matrix.grids().all(is_square))
}

pub fn assert_correctness_provided_matrix_indices(problem: &Problem) -> bool {
    let max_matrix_index = problem
        .points
        .iter()
        .filter_map(|point| point.matrix_index)
        .max()
        .unwrap_or(0);

    problem.matrices.iter().all(|matrix| {
        matrix.grids().all(|grid| {
            grid.len() > max_matrix_index && grid.iter().all(|row| row.len() > max_matrix_index)
        })
    })
}

pub fn assert_correctness_matrices_vehicles_and_points_definition(problem: &Problem) -> bool {
    let no_matrix = !problem.matrices.iter().any(|matrix| matrix.has_time_or_distance());

    (no_matrix && problem.points.iter().all(|point| point.location.is_some()))
        || (problem.points.iter().all(|point| point.matrix_index.is_some())
            && problem
                .vehicles
                .iter()
                .all(|vehicle| vehicle.matrix_id.is_some()))
}

pub fn assert_one_sticky_at_most(problem: &Problem) -> bool {
    problem
        .services
        .iter()
        .all(|service| service.sticky_vehicle_ids.len() <= 1)
        && problem
            .shipments
            .iter()
            .all(|shipment| shipment.sticky_vehicle_ids.len() <= 1)
}

pub fn assert_one_vehicle_only_or_no_sticky_vehicle(problem: &Problem) -> bool {
    problem.vehicles.len() <= 1
        || (problem
            .services
            .iter()
            .all(|service| service.sticky_vehicle_ids.is_empty())
            && problem
                .shipments
                .iter()
                .all(|shipment| shipment.sticky_vehicle_ids.is_empty()))
}

pub fn assert_no_relations(problem: &Problem) -> bool {
    problem.relations.iter().all(|relation| relation.is_empty())
}

pub fn assert_no_zones(problem: &Problem) -> bool {
    problem.zones.is_empty()
}

pub fn assert_zones_only_size_one_alternative(problem: &Problem) -> bool {
    problem.zones.iter().all(|zone| {
        zone.allocations
            .iter()
            .all(|alternative| alternative.len() <= 1)
    })
}

pub fn assert_no_value_matrix(problem: &Problem) -> bool {
    problem.matrices.iter().all(|matrix| matrix.value.is_none())
}

pub fn assert_no_routes(problem: &Problem) -> bool {
    problem.routes.iter().all(|route| route.mission_ids.is_empty())
}

pub fn assert_only_empty_or_fill_quantities(problem: &Problem) -> bool {
    // (fill, empty) seen per unit
    let mut units: FxHashMap<&str, (bool, bool)> = FxHashMap::default();

    for quantity in problem
        .services
        .iter()
        .flat_map(|service| service.quantities.iter())
    {
        let status = units.entry(quantity.unit_id.as_str()).or_default();
        status.0 |= quantity.fill;
        status.1 |= quantity.empty;

        if status.0 && status.1 {
            return false;
        }
    }

    true
}

pub fn assert_at_least_one_mission(problem: &Problem) -> bool {
    !problem.services.is_empty() || !problem.shipments.is_empty()
}

pub fn assert_end_optimization(problem: &Problem) -> bool {
    let resolution = &problem.configuration.resolution;
    resolution.duration.is_some() || resolution.iterations_without_improvment.is_some()
}

pub fn assert_vehicles_no_end_time_or_late_multiplier(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .all(|vehicle| vehicle.timewindow.is_none() || vehicle.has_late_tolerance())
}

pub fn assert_no_distance_limitation(problem: &Problem) -> bool {
    problem.vehicles.iter().all(|vehicle| vehicle.distance.is_none())
}

pub fn assert_range_date_if_month_duration(problem: &Problem) -> bool {
    !problem
        .relations
        .iter()
        .any(|relation| relation.relation_type == RelationType::VehicleGroupDurationOnMonths)
        || problem.schedule_range_date()
}

pub fn assert_vehicle_tw_if_schedule(problem: &Problem) -> bool {
    !problem.is_periodic()
        || problem.vehicles.iter().all(|vehicle| {
            vehicle
                .timewindow
                .is_some_and(|timewindow| !timewindow.is_empty())
                || vehicle
                    .sequence_timewindows
                    .iter()
                    .any(|timewindow| !timewindow.is_empty())
        })
}

pub fn assert_if_sequence_tw_then_schedule(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .all(|vehicle| vehicle.sequence_timewindows.is_empty())
        || problem.scheduling()
}

pub fn assert_if_periodic_heuristic_then_schedule(problem: &Problem) -> bool {
    !problem.is_periodic() || problem.scheduling()
}

pub fn assert_first_solution_strategy_is_possible(problem: &Problem) -> bool {
    let resolution = &problem.configuration.resolution;

    problem.first_solution_strategy().is_empty()
        || (!resolution.evaluate_only
            && resolution.several_solutions.is_none()
            && !resolution.batch_heuristic
            && resolution
                .solver_parameter
                .is_none_or(|parameter| parameter == -1))
}

/// Modes must be used alone, heuristics may be chained.
pub fn assert_first_solution_strategy_is_valid(problem: &Problem) -> bool {
    let strategies = problem.first_solution_strategy();

    match strategies.first() {
        None => true,
        Some(FirstSolutionStrategy::Mode(_)) => strategies.len() == 1,
        Some(FirstSolutionStrategy::Heuristic(_)) => true,
    }
}

pub fn assert_no_planning_heuristic(problem: &Problem) -> bool {
    !problem.is_periodic()
}

pub fn assert_only_force_centroids_if_kmeans_method(problem: &Problem) -> bool {
    let preprocessing = &problem.configuration.preprocessing;
    preprocessing.kmeans_centroids.is_none()
        || preprocessing.partition_method.as_deref() == Some("balanced_kmeans")
}

pub fn assert_no_evaluation(problem: &Problem) -> bool {
    !problem.configuration.resolution.evaluate_only
}

pub fn assert_no_shipments_if_evaluation(problem: &Problem) -> bool {
    problem.shipments.is_empty() || !problem.configuration.resolution.evaluate_only
}

pub fn assert_no_scheduling_if_evaluation(problem: &Problem) -> bool {
    !problem.scheduling() || !problem.configuration.resolution.evaluate_only
}

pub fn assert_route_if_evaluation(problem: &Problem) -> bool {
    !problem.configuration.resolution.evaluate_only || !problem.routes.is_empty()
}

pub fn assert_wrong_vehicle_shift_preference_with_heuristic(problem: &Problem) -> bool {
    problem.vehicles.iter().all(|vehicle| {
        vehicle
            .shift_preference
            .is_none_or(|preference| preference == ShiftPreference::MinimizeSpan)
    }) || !problem.is_periodic()
}

pub fn assert_no_vehicle_overall_duration_if_heuristic(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .all(|vehicle| vehicle.overall_duration.is_none())
        || !problem.is_periodic()
}

pub fn assert_no_vehicle_distance_if_heuristic(problem: &Problem) -> bool {
    problem.vehicles.iter().all(|vehicle| vehicle.distance.is_none()) || !problem.is_periodic()
}

pub fn assert_possible_to_get_distances_if_maximum_ride_distance(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .all(|vehicle| vehicle.maximum_ride_distance.is_none())
        || problem.points.iter().all(|point| point.location.is_some())
        || problem
            .matrices
            .iter()
            .all(|matrix| matrix.distance.as_ref().is_some_and(|grid| !grid.is_empty()))
}

pub fn assert_no_skills_if_heuristic(problem: &Problem) -> bool {
    problem.services.iter().all(|service| service.skills.is_empty())
        || !problem.vehicles.iter().any(Vehicle::has_skills)
        || !problem.is_periodic()
        || !problem.configuration.preprocessing.partitions.is_empty()
}

pub fn assert_no_vehicle_free_approach_or_return_if_heuristic(problem: &Problem) -> bool {
    problem
        .vehicles
        .iter()
        .all(|vehicle| !vehicle.free_approach && !vehicle.free_return)
        || !problem.is_periodic()
}

pub fn assert_no_service_exclusion_cost_if_heuristic(problem: &Problem) -> bool {
    problem
        .services
        .iter()
        .all(|service| service.exclusion_cost.is_none())
        || !problem.is_periodic()
}

pub fn assert_no_vehicle_limit_if_heuristic(problem: &Problem) -> bool {
    problem
        .configuration
        .resolution
        .vehicle_limit
        .is_none_or(|limit| limit >= problem.vehicles.len())
        || !problem.is_periodic()
}

pub fn assert_no_same_point_day_if_no_heuristic(problem: &Problem) -> bool {
    !problem.configuration.resolution.same_point_day || problem.is_periodic()
}

pub fn assert_no_allow_partial_if_no_heuristic(problem: &Problem) -> bool {
    problem.configuration.resolution.allow_partial_assignment || problem.is_periodic()
}

pub fn assert_no_first_solution_strategy(problem: &Problem) -> bool {
    let strategies = problem.first_solution_strategy();
    strategies.is_empty() || strategies == [FirstSolutionStrategy::SELF_SELECTION]
}

pub fn assert_solver(problem: &Problem) -> bool {
    problem.configuration.resolution.solver
}

pub fn assert_solver_if_not_periodic(problem: &Problem) -> bool {
    let resolution = &problem.configuration.resolution;
    (resolution.solver && resolution.solver_parameter != Some(-1)) || problem.is_periodic()
}

pub fn assert_clustering_compatible_with_scheduling_heuristic(problem: &Problem) -> bool {
    let preprocessing = &problem.configuration.preprocessing;
    !problem.strategy_includes_periodic()
        || (preprocessing.cluster_threshold.is_none() && preprocessing.max_split_size.is_none())
}

pub fn assert_lat_lon_for_partition(problem: &Problem) -> bool {
    problem.configuration.preprocessing.partition_method.is_none()
        || problem.points.iter().all(|point| point.location.is_some())
}

pub fn assert_work_day_partitions_only_schedule(problem: &Problem) -> bool {
    const MINIMUM_WEEKLY_LAPSE: f64 = 7.0;

    problem.configuration.preprocessing.partitions.len() < 2
        || (problem.scheduling()
            && problem
                .services
                .iter()
                .filter_map(|service| service.minimum_lapse)
                .reduce(f64::min)
                .is_none_or(|lapse| lapse >= MINIMUM_WEEKLY_LAPSE))
}

pub fn assert_vehicle_entity_only_before_work_day(problem: &Problem) -> bool {
    let partitions = &problem.configuration.preprocessing.partitions;
    let position = |entity| {
        partitions
            .iter()
            .position(|partition| partition.entity == Some(entity))
    };

    match (
        position(PartitionEntity::Vehicle),
        position(PartitionEntity::WorkDay),
    ) {
        (Some(vehicle), Some(work_day)) => vehicle < work_day,
        _ => true,
    }
}

pub fn assert_deprecated_partitions(problem: &Problem) -> bool {
    let preprocessing = &problem.configuration.preprocessing;
    !((preprocessing.partition_method.is_some() || preprocessing.partition_metric.is_some())
        && !preprocessing.partitions.is_empty())
}

pub fn assert_partitions_entity(problem: &Problem) -> bool {
    problem
        .configuration
        .preprocessing
        .partitions
        .iter()
        .all(|partition| {
            partition.method != PartitionMethod::BalancedKmeans || partition.entity.is_some()
        })
}

pub fn assert_no_partitions(problem: &Problem) -> bool {
    problem.configuration.preprocessing.partitions.is_empty()
}

pub fn assert_no_initial_centroids_with_partitions(problem: &Problem) -> bool {
    let preprocessing = &problem.configuration.preprocessing;
    preprocessing.partitions.is_empty() || preprocessing.kmeans_centroids.is_none()
}

pub fn assert_valid_partitions(problem: &Problem) -> bool {
    let partitions = &problem.configuration.preprocessing.partitions;
    let entities = partitions
        .iter()
        .map(|partition| partition.entity)
        .collect::<FxHashSet<_>>();

    partitions.len() < 3 && entities.len() == partitions.len()
}

pub fn assert_no_relation_with_scheduling_heuristic(problem: &Problem) -> bool {
    !problem.strategy_includes_periodic() || problem.relations.is_empty()
}

pub fn assert_only_one_activity_with_scheduling_heuristic(problem: &Problem) -> bool {
    problem
        .services
        .iter()
        .all(|service| service.activities.is_empty())
        || !problem.strategy_includes_periodic()
}

pub fn assert_no_route_if_clustering(problem: &Problem) -> bool {
    problem.routes.is_empty() || problem.configuration.preprocessing.partitions.is_empty()
}

pub fn assert_service_with_visit_index_in_route_if_periodic(problem: &Problem) -> bool {
    !problem.strategy_includes_periodic()
        || problem
            .routes
            .iter()
            .flat_map(|route| route.mission_ids.iter())
            .all(|mission_id| is_visit_indexed_mission(problem, mission_id))
}

/// `<service>_<visit_index>_<visits_number>` with a known service and
/// `1 <= visit_index <= visits_number`.
fn is_visit_indexed_mission(problem: &Problem, mission_id: &str) -> bool {
    let mut parts = mission_id.rsplitn(3, '_');
    let (Some(visits_number), Some(visit_index), Some(service_id)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let (Ok(visits_number), Ok(visit_index)) =
        (visits_number.parse::<u32>(), visit_index.parse::<u32>())
    else {
        return false;
    };

    (1..=visits_number).contains(&visit_index) && problem.service(service_id).is_some()
}

pub fn assert_route_day_if_periodic(problem: &Problem) -> bool {
    !problem.strategy_includes_periodic() || problem.routes.iter().all(|route| route.day.is_some())
}
