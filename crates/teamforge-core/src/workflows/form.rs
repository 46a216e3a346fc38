use crate::core::models::ids::PersonId;
use crate::core::models::roster::Roster;
use crate::core::models::team::Team;
use crate::engine::config::FormationConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::state::{BalanceReport, FloorFill, Placement, StopReason};
use crate::engine::tasks;
use slotmap::SecondaryMap;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct FormationResult {
    pub teams: Vec<Team>,
    /// People in no team, ranked by standing.
    pub leftover: Vec<PersonId>,
    pub stop_reason: StopReason,
    pub floor_fills: Vec<FloorFill>,
    pub placements: Vec<Placement>,
    /// `None` when balancing was disabled.
    pub balance: Option<BalanceReport>,
}

impl FormationResult {
    pub fn assigned_count(&self) -> usize {
        self.teams.iter().map(Team::size).sum()
    }
}

#[instrument(skip_all, name = "formation_workflow")]
pub fn run(
    roster: &Roster,
    config: &FormationConfig,
    reporter: &ProgressReporter,
) -> Result<FormationResult, EngineError> {
    info!(
        people = roster.len(),
        templates = config.templates.len(),
        redistribute = config.redistribute,
        balance = config.balancing.is_some(),
        "Starting team formation."
    );

    // === Phase 1: Allocation ===
    let allocation = tasks::allocation::run(roster, &config.templates, reporter);
    let mut teams = allocation.teams;
    let mut leftover = allocation.leftover;

    // === Phase 2: Redistribution (optional) ===
    let mut placements = Vec::new();
    if config.redistribute && !leftover.is_empty() {
        let outcome =
            tasks::redistribution::run(roster, &config.templates, &mut teams, leftover, reporter)?;
        placements = outcome.placements;
        leftover = outcome.unplaced;
    }

    // === Phase 3: Balancing (optional) ===
    let balance = match &config.balancing {
        Some(balancing) => Some(tasks::balancing::run(
            roster,
            &config.templates,
            &mut teams,
            balancing,
            reporter,
        )?),
        None => None,
    };

    verify_conservation(roster, &teams, &leftover)?;

    info!(
        teams = teams.len(),
        leftover = leftover.len(),
        "Team formation complete."
    );
    Ok(FormationResult {
        teams,
        leftover,
        stop_reason: allocation.stop_reason,
        floor_fills: allocation.floor_fills,
        placements,
        balance,
    })
}

/// Checks that every roster person appears exactly once across teams and leftover.
pub fn verify_conservation(
    roster: &Roster,
    teams: &[Team],
    leftover: &[PersonId],
) -> Result<(), EngineError> {
    let mut seen: SecondaryMap<PersonId, ()> = SecondaryMap::with_capacity(roster.len());
    let everyone = teams
        .iter()
        .flat_map(|team| team.members.iter())
        .chain(leftover.iter());

    for &id in everyone {
        let person = roster
            .person(id)
            .ok_or(EngineError::UnknownPerson { person: id })?;
        if seen.insert(id, ()).is_some() {
            return Err(EngineError::DuplicateAssignment {
                person: person.id.clone(),
            });
        }
    }

    if seen.len() != roster.len() {
        return Err(EngineError::Internal(format!(
            "{} of {} people were accounted for after formation",
            seen.len(),
            roster.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::person::PersonRecord;
    use crate::core::models::template::{RoleRequirement, TeamTemplate, TemplateSet};
    use crate::engine::config::{BalancingConfig, FormationConfigBuilder};
    use crate::engine::progress::Progress;
    use std::sync::{Arc, Mutex};

    fn roster() -> Roster {
        let people = [
            ("fs1", "Full Stack", 3.0, 92.0),
            ("fs2", "full stack", 1.0, 85.0),
            ("fs3", "Full Stack", 2.0, 77.0),
            ("fs4", "FULL STACK", 4.0, 70.0),
            ("fs5", "Full Stack", 1.0, 58.0),
            ("t1", "Tester", 2.0, 81.0),
            ("t2", "Tester", 1.0, 66.0),
            ("t3", "Tester", 3.0, 49.0),
            ("ai1", "AI Engineer", 5.0, 95.0),
            ("ai2", "AI Engineer", 2.0, 60.0),
            ("pm1", "Product Manager", 4.0, 75.0),
        ];
        Roster::from_records(
            people
                .iter()
                .map(|&(id, role, exp, score)| PersonRecord::new(id, id, role, exp, score)),
        )
        .unwrap()
    }

    fn templates() -> TemplateSet {
        let roles = [
            ("Full Stack", RoleRequirement::new(2, 3)),
            ("Tester", RoleRequirement::new(1, 2)),
            ("AI Engineer", RoleRequirement::new(1, 1)),
        ];
        TemplateSet::new(vec![TeamTemplate::new("type1", 4, 5, roles).unwrap()]).unwrap()
    }

    fn config(redistribute: bool, balancing: Option<BalancingConfig>) -> FormationConfig {
        FormationConfigBuilder::new()
            .templates(templates())
            .redistribute(redistribute)
            .balancing_config(balancing)
            .build()
            .unwrap()
    }

    #[test]
    fn full_pipeline_conserves_everyone_and_respects_bounds() {
        let roster = roster();
        let config = config(true, Some(BalancingConfig::default()));

        let result = run(&roster, &config, &ProgressReporter::new()).unwrap();

        assert_eq!(result.teams.len(), 2);
        assert_eq!(result.assigned_count() + result.leftover.len(), roster.len());
        let template = config.templates.get("type1").unwrap();
        for team in &result.teams {
            assert!(team.size() >= template.min_members());
            assert!(team.size() <= template.max_members());
            for (role, count) in team.role_counts(&roster) {
                assert!(count <= template.role_max(&role), "role {role} over max");
            }
        }
        let balance = result.balance.unwrap();
        assert!(balance.final_imbalance <= balance.initial_imbalance);
        assert!(balance.converged);
    }

    #[test]
    fn product_manager_stays_leftover_without_a_declared_slot() {
        let roster = roster();
        let result = run(&roster, &config(true, None), &ProgressReporter::new()).unwrap();

        let leftover: Vec<_> = result
            .leftover
            .iter()
            .map(|&id| roster.person(id).unwrap().id.as_str())
            .collect();
        assert!(leftover.contains(&"pm1"));
        assert!(result.balance.is_none());
    }

    #[test]
    fn disabling_redistribution_keeps_allocation_leftover() {
        let roster = roster();
        let result = run(&roster, &config(false, None), &ProgressReporter::new()).unwrap();
        assert!(result.placements.is_empty());
        assert_eq!(result.leftover.len(), roster.len() - result.assigned_count());
        assert!(matches!(
            result.stop_reason,
            StopReason::InsufficientSupply { .. }
        ));
    }

    #[test]
    fn phases_are_reported_in_order() {
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = phases.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::PhaseStart { name } = event {
                sink.lock().unwrap().push(name);
            }
        }));

        run(&roster(), &config(true, Some(BalancingConfig::default())), &reporter).unwrap();

        assert_eq!(
            *phases.lock().unwrap(),
            vec!["Allocation", "Redistribution", "Balancing"]
        );
    }

    #[test]
    fn conservation_check_catches_duplicates_and_drops() {
        let roster = roster();
        let ids = roster.ids().to_vec();
        let mut team = Team::new("type1");
        team.members = vec![ids[0], ids[1]];

        let err = verify_conservation(&roster, &[team.clone()], &[ids[1]]).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateAssignment { ref person } if person == "fs2"));

        let err = verify_conservation(&roster, &[team], &ids[2..5]).unwrap_err();
        assert!(matches!(err, EngineError::Internal(_)));
    }

    #[test]
    fn empty_roster_forms_nothing() {
        let roster = Roster::new();
        let result = run(
            &roster,
            &config(true, Some(BalancingConfig::default())),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(result.teams.is_empty());
        assert!(result.leftover.is_empty());
        assert_eq!(result.stop_reason, StopReason::PoolExhausted);
    }
}
