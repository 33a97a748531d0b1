use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::problem::vehicle_routing_problem::VehicleRoutingProblem;

use super::admission_rule::AdmissionRule;

/// Solver a sub-problem is dispatched to.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Ortools,
    Vroom,
}

const ORTOOLS_RULES: &[AdmissionRule] = &[
    AdmissionRule::EndOptimization,
    AdmissionRule::VehiclesObjective,
    AdmissionRule::VehiclesNoCapacityInitial,
    AdmissionRule::VehiclesNoAlternativeSkills,
    AdmissionRule::ZonesOnlySizeOneAlternative,
    AdmissionRule::OnlyEmptyOrFillQuantities,
    AdmissionRule::PointsSameDefinition,
    AdmissionRule::CorrectnessMatricesVehiclesAndPointsDefinition,
    AdmissionRule::SquareMatrix,
    AdmissionRule::CorrectnessProvidedMatrixIndices,
    AdmissionRule::NoPickupTimewindowsAfterDeliveryTimewindows,
    AdmissionRule::RangeDateIfMonthDuration,
    AdmissionRule::VehicleTwIfSchedule,
    AdmissionRule::IfSequenceTwThenSchedule,
    AdmissionRule::IfPeriodicHeuristicThenSchedule,
    AdmissionRule::FirstSolutionStrategyIsPossible,
    AdmissionRule::FirstSolutionStrategyIsValid,
    AdmissionRule::OnlyForceCentroidsIfKmeansMethod,
    AdmissionRule::NoSchedulingIfEvaluation,
    AdmissionRule::RouteIfEvaluation,
    AdmissionRule::WrongVehicleShiftPreferenceWithHeuristic,
    AdmissionRule::NoVehicleOverallDurationIfHeuristic,
    AdmissionRule::NoVehicleDistanceIfHeuristic,
    AdmissionRule::PossibleToGetDistancesIfMaximumRideDistance,
    AdmissionRule::NoSkillsIfHeuristic,
    AdmissionRule::NoVehicleFreeApproachOrReturnIfHeuristic,
    AdmissionRule::NoServiceExclusionCostIfHeuristic,
    AdmissionRule::NoVehicleLimitIfHeuristic,
    AdmissionRule::NoSamePointDayIfNoHeuristic,
    AdmissionRule::NoAllowPartialIfNoHeuristic,
    AdmissionRule::SolverIfNotPeriodic,
    AdmissionRule::ClusteringCompatibleWithSchedulingHeuristic,
    AdmissionRule::LatLonForPartition,
    AdmissionRule::WorkDayPartitionsOnlySchedule,
    AdmissionRule::VehicleEntityOnlyBeforeWorkDay,
    AdmissionRule::DeprecatedPartitions,
    AdmissionRule::PartitionsEntity,
    AdmissionRule::NoInitialCentroidsWithPartitions,
    AdmissionRule::ValidPartitions,
    AdmissionRule::NoRelationWithSchedulingHeuristic,
    AdmissionRule::OnlyOneActivityWithSchedulingHeuristic,
    AdmissionRule::NoRouteIfClustering,
    AdmissionRule::ServiceWithVisitIndexInRouteIfPeriodic,
    AdmissionRule::RouteDayIfPeriodic,
];

const VROOM_RULES: &[AdmissionRule] = &[
    AdmissionRule::MatricesOnlyOne,
    AdmissionRule::VehiclesObjective,
    AdmissionRule::VehiclesStartOrEnd,
    AdmissionRule::VehiclesNoCapacityInitial,
    AdmissionRule::VehiclesNoAlternativeSkills,
    AdmissionRule::VehiclesNoLateMultiplier,
    AdmissionRule::VehiclesNoOverloadMultiplier,
    AdmissionRule::VehiclesNoForceStart,
    AdmissionRule::VehiclesNoDurationLimit,
    AdmissionRule::ServicesNoLateMultiplier,
    AdmissionRule::ShipmentsNoLateMultiplier,
    AdmissionRule::NoPickupTimewindowsAfterDeliveryTimewindows,
    AdmissionRule::OnlyEmptyOrFillQuantities,
    AdmissionRule::PointsSameDefinition,
    AdmissionRule::SquareMatrix,
    AdmissionRule::CorrectnessProvidedMatrixIndices,
    AdmissionRule::AtLeastOneMission,
    AdmissionRule::NoDistanceLimitation,
    AdmissionRule::NoRelations,
    AdmissionRule::NoZones,
    AdmissionRule::NoValueMatrix,
    AdmissionRule::NoRoutes,
    AdmissionRule::NoEvaluation,
    AdmissionRule::NoPlanningHeuristic,
    AdmissionRule::NoPartitions,
    AdmissionRule::NoFirstSolutionStrategy,
    AdmissionRule::Solver,
];

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Ortools, Backend::Vroom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Ortools => "ortools",
            Backend::Vroom => "vroom",
        }
    }

    pub fn rules(&self) -> &'static [AdmissionRule] {
        match self {
            Backend::Ortools => ORTOOLS_RULES,
            Backend::Vroom => VROOM_RULES,
        }
    }

    /// Rules of this backend the problem does not satisfy, in declaration
    /// order. An empty list means the backend accepts the problem as is.
    #[instrument(skip_all, level = "debug", fields(backend = %self))]
    pub fn inapplicable_solve(&self, problem: &VehicleRoutingProblem) -> Vec<AdmissionRule> {
        let failing = self
            .rules()
            .iter()
            .filter(|rule| !rule.is_satisfied(problem))
            .copied()
            .collect::<Vec<_>>();

        debug!(failing = failing.len(), "admission checked");
        failing
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|backend| backend.as_str() == s)
            .ok_or_else(|| format!("unknown backend {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        heuristic::heuristic::FirstSolutionStrategy,
        problem::{
            relation::{Relation, RelationType, Route},
            service::Activity,
        },
        test_utils::{create_periodic_problem, create_simple_problem},
    };

    #[test]
    fn test_simple_problem_is_accepted() {
        let problem = create_simple_problem();

        assert!(Backend::Ortools.inapplicable_solve(&problem).is_empty());
        assert!(Backend::Vroom.inapplicable_solve(&problem).is_empty());
    }

    #[test]
    fn test_periodic_problem_is_accepted_by_ortools() {
        let problem = create_periodic_problem();

        assert!(Backend::Ortools.inapplicable_solve(&problem).is_empty());
        assert_eq!(
            Backend::Vroom.inapplicable_solve(&problem),
            vec![
                AdmissionRule::NoPlanningHeuristic,
                AdmissionRule::NoFirstSolutionStrategy,
            ]
        );
    }

    #[test]
    fn test_reject_periodic_with_relations() {
        let mut problem = create_periodic_problem();
        problem.relations.push(Relation {
            relation_type: RelationType::Sequence,
            linked_ids: vec!["service_0".to_owned(), "service_1".to_owned()],
            ..Relation::default()
        });

        assert_eq!(
            Backend::Ortools.inapplicable_solve(&problem),
            vec![AdmissionRule::NoRelationWithSchedulingHeuristic]
        );
    }

    #[test]
    fn test_reject_periodic_gates_in_order() {
        let mut problem = create_periodic_problem();
        problem.services[0].exclusion_cost = Some(10.0);
        problem.vehicles[0].free_approach = true;
        problem.vehicles[1].distance = Some(1000.0);
        problem.configuration.resolution.vehicle_limit = Some(1);
        problem.services[1].activities = vec![Activity::at("point_1"), Activity::at("point_2")];

        assert_eq!(
            Backend::Ortools.inapplicable_solve(&problem),
            vec![
                AdmissionRule::NoVehicleDistanceIfHeuristic,
                AdmissionRule::NoVehicleFreeApproachOrReturnIfHeuristic,
                AdmissionRule::NoServiceExclusionCostIfHeuristic,
                AdmissionRule::NoVehicleLimitIfHeuristic,
                AdmissionRule::OnlyOneActivityWithSchedulingHeuristic,
            ]
        );
    }

    #[test]
    fn test_reject_routes_without_day() {
        let mut problem = create_periodic_problem();
        problem.routes.push(Route {
            vehicle_id: "vehicle_0".to_owned(),
            day: None,
            mission_ids: vec!["service_0_1_1".to_owned()],
        });

        assert_eq!(
            Backend::Ortools.inapplicable_solve(&problem),
            vec![AdmissionRule::RouteDayIfPeriodic]
        );
    }

    #[test]
    fn test_self_selection_rejected_by_vroom() {
        let mut problem = create_simple_problem();
        problem.set_first_solution_strategy(vec![FirstSolutionStrategy::PERIODIC]);

        assert!(
            Backend::Vroom
                .inapplicable_solve(&problem)
                .contains(&AdmissionRule::NoPlanningHeuristic)
        );

        problem.set_first_solution_strategy(vec![FirstSolutionStrategy::SELF_SELECTION]);
        assert!(Backend::Vroom.inapplicable_solve(&problem).is_empty());
    }

    #[test]
    fn test_inapplicable_solve_is_idempotent() {
        let mut problem = create_periodic_problem();
        problem.vehicles[0].overall_duration = Some(100.0);

        let first = Backend::Ortools.inapplicable_solve(&problem);
        let second = Backend::Ortools.inapplicable_solve(&problem);

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_backend() {
        assert_eq!("vroom".parse::<Backend>(), Ok(Backend::Vroom));
        assert!("jsprit".parse::<Backend>().is_err());
    }
}
