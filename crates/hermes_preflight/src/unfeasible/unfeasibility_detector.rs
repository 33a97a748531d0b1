use fxhash::FxHashSet;
use tracing::{debug, instrument, warn};

use crate::{
    params::PreflightParams,
    problem::{
        service::Service,
        time_window::TimeWindow,
        travel_matrix::{Cost, Grid, MatrixDimension, Time, is_square},
        vehicle::Vehicle,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
};

use super::unassigned_record::{UnassignedRecord, UnfeasibleReason};

/// Runs every static detection on `problem`.
pub fn detect(problem: &VehicleRoutingProblem, params: &PreflightParams) -> Vec<UnassignedRecord> {
    let mut detector = UnfeasibilityDetector::new(problem, params);
    detector.detect_unfeasible_services();
    detector.check_distances();
    detector.into_records()
}

/// Longest shift among all vehicles, `None` when any of them is unbounded.
pub fn compute_vehicles_shift(vehicles: &[Vehicle]) -> Option<Time> {
    vehicles
        .iter()
        .map(Vehicle::max_shift)
        .collect::<Option<Vec<_>>>()?
        .into_iter()
        .reduce(f64::max)
}

/// Largest capacity available for `unit_id`, `None` when any vehicle is
/// unbounded for it.
pub fn compute_vehicles_capacity(vehicles: &[Vehicle], unit_id: &str) -> Option<f64> {
    vehicles
        .iter()
        .map(|vehicle| vehicle.capacity_limit(unit_id))
        .collect::<Option<Vec<_>>>()?
        .into_iter()
        .reduce(f64::max)
}

pub struct UnfeasibilityDetector<'a> {
    problem: &'a VehicleRoutingProblem,
    params: &'a PreflightParams,
    records: Vec<UnassignedRecord>,
}

impl<'a> UnfeasibilityDetector<'a> {
    pub fn new(problem: &'a VehicleRoutingProblem, params: &'a PreflightParams) -> Self {
        UnfeasibilityDetector {
            problem,
            params,
            records: vec![],
        }
    }

    pub fn records(&self) -> &[UnassignedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<UnassignedRecord> {
        self.records
    }

    /// Records `reason` for `service`. A service has at most one record, later
    /// reasons are appended to it.
    pub fn add_unassigned(&mut self, service: &Service, reason: UnfeasibleReason) {
        match self
            .records
            .iter_mut()
            .find(|record| record.original_service_id == service.id)
        {
            Some(record) => {
                if !record.has_reason(reason) {
                    record.reasons.push(reason);
                }
            }
            None => {
                warn!(service = %service.id, %reason, "unfeasible service");
                self.records
                    .push(UnassignedRecord::new(self.problem, service, reason));
            }
        }
    }

    fn is_unreachable(&self, service: &Service) -> bool {
        self.records.iter().any(|record| {
            record.original_service_id == service.id
                && record.has_reason(UnfeasibleReason::Unreachable)
        })
    }

    #[instrument(skip_all, level = "debug")]
    pub fn detect_unfeasible_services(&mut self) {
        let problem = self.problem;
        let vehicle_max_shift = compute_vehicles_shift(&problem.vehicles);
        // With a single sticky vehicle per service the assignment is forced anyway
        let check_sticky_skills = problem
            .services
            .iter()
            .any(|service| service.sticky_vehicle_ids.len() > 1);
        let available_skills = problem
            .vehicles
            .iter()
            .flat_map(|vehicle| vehicle.skills.iter().flatten())
            .map(String::as_str)
            .collect::<FxHashSet<_>>();

        for service in &problem.services {
            if service.visits_number == 0 {
                self.add_unassigned(service, UnfeasibleReason::ZeroVisits);
            }

            for quantity in &service.quantities {
                let capacity = compute_vehicles_capacity(&problem.vehicles, &quantity.unit_id);
                if let (Some(capacity), Some(value)) = (capacity, quantity.value) {
                    if capacity < value {
                        self.add_unassigned(service, UnfeasibleReason::InsufficientCapacity);
                    }
                }
            }

            if check_sticky_skills && !self.sticky_skills_compatible(service, &available_skills) {
                self.add_unassigned(service, UnfeasibleReason::StickySkills);
            }

            let Some(duration) = service.min_duration() else {
                continue;
            };

            if vehicle_max_shift.is_some_and(|shift| duration > shift) {
                self.add_unassigned(service, UnfeasibleReason::DurationExceedsShift);
            }

            let timewindows = service.timewindows();
            if !timewindows.is_empty()
                && !timewindows
                    .iter()
                    .any(|timewindow| self.find_vehicle(service, timewindow))
            {
                self.add_unassigned(service, UnfeasibleReason::NoCompatibleTimewindow);
            }

            if let (Some((first_day, last_day)), Some(lapse)) =
                (problem.schedule_indices(), service.minimum_lapse)
            {
                let days = (last_day - first_day + 1) as f64;
                let required = f64::from(service.visits_number.saturating_sub(1)) * lapse + 1.0;
                if service.visits_number > 1 && days < required {
                    self.add_unassigned(service, UnfeasibleReason::LapseInconsistency);
                }
            }
        }

        debug!(unfeasible = self.records.len(), "services checked");
    }

    /// Whether at least one sticky vehicle of `service` offers an alternative
    /// covering every service skill any vehicle knows of.
    fn sticky_skills_compatible(&self, service: &Service, available_skills: &FxHashSet<&str>) -> bool {
        if service.skills.is_empty() || service.sticky_vehicle_ids.is_empty() {
            return true;
        }

        let known_skills = service
            .skills
            .iter()
            .filter(|skill| available_skills.contains(skill.as_str()))
            .collect::<Vec<_>>();

        known_skills.is_empty()
            || service
                .sticky_vehicle_ids
                .iter()
                .filter_map(|vehicle_id| self.problem.vehicle(vehicle_id))
                .any(|vehicle| {
                    vehicle.skills.iter().any(|alternative| {
                        known_skills
                            .iter()
                            .all(|skill| alternative.contains(*skill))
                    })
                })
    }

    /// Whether some vehicle may serve `service` during `timewindow`.
    pub fn find_vehicle(&self, service: &Service, timewindow: &TimeWindow) -> bool {
        let problem = self.problem;
        let service_late = service.has_late_tolerance();
        let schedule_start = problem.schedule_start_date();

        let bounds_compatible = |vehicle: &Vehicle, vehicle_window: &TimeWindow| {
            let vehicle_late = vehicle.has_late_tolerance();
            let starts_after_end = matches!(
                (vehicle_window.end, timewindow.start),
                (Some(end), Some(start)) if !vehicle_late && start > end
            );
            let ends_before_start = matches!(
                (timewindow.end, vehicle_window.start),
                (Some(end), Some(start)) if !service_late && start > end
            );
            !starts_after_end && !ends_before_start
        };

        // Day-indexed vehicle windows are matched against exclusions on both sides.
        let days_compatible = |vehicle: &Vehicle, vehicle_window: &TimeWindow| {
            if !vehicle_window.days_compatible(timewindow) {
                return false;
            }
            match vehicle_window.day_index {
                Some(day) => {
                    !service.is_unavailable_on(day, schedule_start)
                        && !vehicle.is_unavailable_on(day, schedule_start)
                }
                None if problem.scheduling() => {
                    self.compatible_day(service, timewindow.day_index, vehicle)
                }
                None => true,
            }
        };

        let with_timewindow = problem.vehicles.iter().any(|vehicle| {
            vehicle.timewindow.as_ref().is_some_and(|vehicle_window| {
                days_compatible(vehicle, vehicle_window) && bounds_compatible(vehicle, vehicle_window)
            })
        });

        with_timewindow
            || problem.vehicles.iter().all(|vehicle| !vehicle.has_timewindows())
            || problem.vehicles.iter().any(|vehicle| {
                vehicle.sequence_timewindows.iter().any(|vehicle_window| {
                    days_compatible(vehicle, vehicle_window)
                        && bounds_compatible(vehicle, vehicle_window)
                })
            })
            || problem.vehicles.iter().any(Vehicle::has_late_tolerance)
    }

    /// Whether some day of the schedule suits both `service` and `vehicle`.
    /// A service timewindow pinned to `day` only matches that day.
    pub fn compatible_day(&self, service: &Service, day: Option<i64>, vehicle: &Vehicle) -> bool {
        let Some((first_day, last_day)) = self.problem.schedule_indices() else {
            return true;
        };
        let schedule_start = self.problem.schedule_start_date();

        (first_day..=last_day).any(|candidate| {
            let service_ok = match day {
                Some(day) => day == candidate,
                None => !service.is_unavailable_on(candidate, schedule_start),
            };
            service_ok && !vehicle.is_unavailable_on(candidate, schedule_start)
        })
    }

    /// Marks services located at points every other point fails to reach, or
    /// that fail to reach any other point, in `grid`.
    pub fn check(&mut self, grid: &Grid) {
        let size = grid.len();
        if size < 2 || !is_square(grid) {
            return;
        }

        let sentinel = self.params.unreachable_cost;
        let unreachable = (0..size)
            .filter(|&index| {
                let row = (0..size)
                    .filter(|&other| other != index)
                    .all(|other| grid[index][other] >= sentinel);
                let column = (0..size)
                    .filter(|&other| other != index)
                    .all(|other| grid[other][index] >= sentinel);
                row || column
            })
            .collect::<FxHashSet<_>>();

        if unreachable.is_empty() {
            return;
        }

        let problem = self.problem;
        for service in &problem.services {
            let located = problem
                .service_matrix_index(service)
                .is_some_and(|index| unreachable.contains(&index));

            if located && !self.is_unreachable(service) {
                self.add_unassigned(service, UnfeasibleReason::Unreachable);
            }
        }
    }

    #[instrument(skip_all, level = "debug")]
    pub fn check_distances(&mut self) {
        let problem = self.problem;

        for matrix in &problem.matrices {
            for grid in matrix.grids() {
                self.check(grid);
            }
        }

        if problem.vehicles.is_empty() {
            return;
        }

        for service in &problem.services {
            let Some(index) = problem.service_matrix_index(service) else {
                continue;
            };

            let fits_round_trip = problem
                .vehicles
                .iter()
                .any(|vehicle| self.round_trip_fits(vehicle, index));

            if !fits_round_trip {
                if !self.is_unreachable(service) {
                    self.add_unassigned(service, UnfeasibleReason::Unreachable);
                }
            } else if self.timewindows_unreachable(service, index) {
                self.add_unassigned(service, UnfeasibleReason::TimewindowUnreachable);
            }
        }
    }

    /// Whether a return trip depot, service, depot fits the budget of
    /// `vehicle`. Vehicles without such a budget always fit.
    fn round_trip_fits(&self, vehicle: &Vehicle, index: usize) -> bool {
        let problem = self.problem;
        let (Some(start), Some(end)) = (
            problem.point_matrix_index(vehicle.start_point_id.as_deref()),
            problem.point_matrix_index(vehicle.end_point_id.as_deref()),
        ) else {
            return true;
        };

        let available_time = if vehicle.sequence_timewindows.is_empty() {
            vehicle.timewindow.as_ref().and_then(TimeWindow::span)
        } else {
            vehicle
                .sequence_timewindows
                .iter()
                .filter_map(TimeWindow::span)
                .reduce(f64::max)
        };

        let (dimension, budget) = if vehicle.cost_time_multiplier > 0.0 {
            (MatrixDimension::Time, available_time)
        } else if vehicle.cost_distance_multiplier > 0.0 {
            (MatrixDimension::Distance, vehicle.distance)
        } else {
            return true;
        };

        let Some(budget) = budget else {
            return true;
        };

        match self.round_trip_cost(vehicle, dimension, start, index, end) {
            Some(cost) => budget >= cost,
            None => true,
        }
    }

    fn round_trip_cost(
        &self,
        vehicle: &Vehicle,
        dimension: MatrixDimension,
        start: usize,
        index: usize,
        end: usize,
    ) -> Option<Cost> {
        let matrix = self.problem.vehicle_matrix(vehicle)?;
        Some(matrix.cost(dimension, start, index)? + matrix.cost(dimension, index, end)?)
    }

    /// Whether every vehicle, travelling straight from its start, arrives
    /// after all timewindows of `service` closed, or must leave before they
    /// open to make it back in time.
    fn timewindows_unreachable(&self, service: &Service, index: usize) -> bool {
        let problem = self.problem;
        let Some(activity) = &service.activity else {
            return false;
        };

        if activity.timewindows.is_empty()
            || problem.matrices.is_empty()
            || problem.matrices.iter().any(|matrix| matrix.time.is_none())
        {
            return false;
        }

        problem.vehicles.iter().all(|vehicle| {
            let Some(matrix) = problem.vehicle_matrix(vehicle) else {
                return false;
            };
            let window = vehicle.timewindow.as_ref();

            let earliest_arrival = window.and_then(|window| window.start).and_then(|start| {
                let from = problem.point_matrix_index(vehicle.start_point_id.as_deref())?;
                Some(start + matrix.cost(MatrixDimension::Time, from, index)?)
            });
            let latest_departure = window.and_then(|window| window.end).and_then(|end| {
                let to = problem.point_matrix_index(vehicle.end_point_id.as_deref())?;
                Some(end - activity.duration - matrix.cost(MatrixDimension::Time, index, to)?)
            });

            let too_late = earliest_arrival.is_some_and(|arrival| {
                activity
                    .timewindows
                    .iter()
                    .all(|timewindow| timewindow.end.is_some_and(|end| arrival > end))
            });
            let too_early = latest_departure.is_some_and(|departure| {
                activity
                    .timewindows
                    .iter()
                    .all(|timewindow| timewindow.start.is_some_and(|start| start > departure))
            });
            let crossed = matches!(
                (earliest_arrival, latest_departure),
                (Some(arrival), Some(departure)) if arrival > departure
            );

            too_late || too_early || crossed
        })
    }
}
