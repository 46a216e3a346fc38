use crate::core::models::ids::PersonId;
use crate::core::models::roster::Roster;
use crate::core::models::team::Team;
use crate::core::models::template::{TeamTemplate, TemplateSet};
use crate::engine::error::EngineError;
use crate::engine::metrics::TeamStats;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{Placement, Redistribution};
use tracing::{debug, info, instrument};

/// Places leftover people into existing teams, best marginal gain first.
///
/// People are handled in standing order. A team is a candidate while it is below
/// `max_members` and the person's role is still below the template's maximum for it;
/// a role the template does not declare is disallowed. Each person goes to the candidate
/// whose average score rises the most, earliest team on ties. Placements are never
/// revisited.
#[instrument(skip_all, name = "redistribution_task")]
pub fn run(
    roster: &Roster,
    templates: &TemplateSet,
    teams: &mut [Team],
    leftover: Vec<PersonId>,
    reporter: &ProgressReporter,
) -> Result<Redistribution, EngineError> {
    let team_templates = resolve_templates(templates, teams)?;
    let mut stats = teams
        .iter()
        .map(|team| TeamStats::from_team(team, roster))
        .collect::<Result<Vec<_>, _>>()?;

    let mut queue = leftover;
    if let Some(&person) = queue.iter().find(|&&id| !roster.contains(id)) {
        return Err(EngineError::UnknownPerson { person });
    }
    roster.sort_by_standing(&mut queue);

    reporter.report(Progress::PhaseStart {
        name: "Redistribution",
    });
    reporter.report(Progress::TaskStart {
        total_steps: queue.len() as u64,
    });
    info!(
        leftover = queue.len(),
        teams = teams.len(),
        "Redistributing leftover people."
    );

    let mut result = Redistribution::default();
    for id in queue {
        let Some(person) = roster.person(id) else {
            return Err(EngineError::UnknownPerson { person: id });
        };
        let role_key = person.role.key();

        let mut best: Option<(usize, f64)> = None;
        for (index, (team_stats, template)) in stats.iter().zip(&team_templates).enumerate() {
            if team_stats.size >= template.max_members()
                || team_stats.role_count(role_key) + 1 > template.role_max(role_key)
            {
                continue;
            }
            let current = team_stats.average_score();
            let updated =
                (team_stats.score_sum + person.score) / (team_stats.size + 1) as f64;
            let gain = updated - current;
            if best.is_none_or(|(_, best_gain)| gain > best_gain) {
                best = Some((index, gain));
            }
        }

        match best {
            Some((team_index, gain)) => {
                teams[team_index].members.push(id);
                stats[team_index].add(person);
                debug!(
                    person = %person.id,
                    team = team_index,
                    gain,
                    "Placed leftover person."
                );
                result.placements.push(Placement {
                    person: id,
                    team_index,
                    gain,
                });
            }
            None => {
                debug!(person = %person.id, role = %person.role, "No candidate team for leftover person.");
                result.unplaced.push(id);
            }
        }
        reporter.report(Progress::TaskIncrement);
    }

    info!(
        placed = result.placements.len(),
        unplaced = result.unplaced.len(),
        "Redistribution finished."
    );
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    Ok(result)
}

pub(crate) fn resolve_templates<'t>(
    templates: &'t TemplateSet,
    teams: &[Team],
) -> Result<Vec<&'t TeamTemplate>, EngineError> {
    teams
        .iter()
        .enumerate()
        .map(|(team_index, team)| {
            templates
                .get(&team.template)
                .ok_or_else(|| EngineError::UnknownTemplate {
                    team_index,
                    template: team.template.clone(),
                })
        })
        .collect()
}
