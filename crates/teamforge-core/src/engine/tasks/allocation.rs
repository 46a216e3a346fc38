use crate::core::models::ids::PersonId;
use crate::core::models::roster::Roster;
use crate::core::models::team::Team;
use crate::core::models::template::{TeamTemplate, TemplateSet};
use crate::engine::pool::PersonPool;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{Allocation, FloorFill, RoleOverflow, StopReason};
use tracing::{debug, info, instrument, warn};

enum Attempt {
    Committed {
        team: Team,
        floor_fill: Option<(Vec<PersonId>, Vec<RoleOverflow>)>,
    },
    Stopped(StopReason),
}

/// Builds teams greedily from the whole roster.
///
/// Templates are tried round-robin in declared order. Each attempt claims role minimums
/// first, then grows each role towards its maximum, then floor-fills up to `min_members`
/// with the best remaining people of any role. The first attempt that cannot be committed
/// ends construction for every template: a scarce role therefore starves later teams even
/// when another template could still be satisfied. This keeps the scheme simple and
/// predictable; the reason is reported in [`Allocation::stop_reason`].
#[instrument(skip_all, name = "allocation_task")]
pub fn run(roster: &Roster, templates: &TemplateSet, reporter: &ProgressReporter) -> Allocation {
    reporter.report(Progress::PhaseStart { name: "Allocation" });
    info!(
        people = roster.len(),
        templates = templates.len(),
        "Starting team allocation."
    );

    let mut pool = PersonPool::new(roster);
    let mut teams: Vec<Team> = Vec::new();
    let mut floor_fills: Vec<FloorFill> = Vec::new();

    let stop_reason = if templates.is_empty() {
        StopReason::NoTemplates
    } else {
        let mut cycle = templates.iter().cycle();
        loop {
            // `cycle` over a non-empty set never ends.
            let Some(template) = cycle.next() else {
                break StopReason::NoTemplates;
            };
            match attempt_team(&mut pool, template) {
                Attempt::Committed { team, floor_fill } => {
                    let team_index = teams.len();
                    if let Some((added, role_overflows)) = floor_fill {
                        if role_overflows.is_empty() {
                            debug!(team = team_index, "Floor-fill topped up team within role bounds.");
                        } else {
                            warn!(
                                team = team_index,
                                template = template.name(),
                                overflows = ?role_overflows,
                                "Floor-fill pushed role counts past their template maximum."
                            );
                        }
                        floor_fills.push(FloorFill {
                            team_index,
                            template: template.name().to_string(),
                            added,
                            role_overflows,
                        });
                    }
                    debug!(
                        team = team_index,
                        template = template.name(),
                        size = team.size(),
                        "Committed team."
                    );
                    reporter.report(Progress::StatusUpdate {
                        text: format!("Formed team {} ({})", team_index + 1, template.name()),
                    });
                    teams.push(team);
                }
                Attempt::Stopped(reason) => break reason,
            }
        }
    };

    let leftover = pool.remaining();
    info!(
        teams = teams.len(),
        leftover = leftover.len(),
        reason = %stop_reason,
        "Allocation finished."
    );
    reporter.report(Progress::Message(format!(
        "Formed {} team(s), {} left over ({}).",
        teams.len(),
        leftover.len(),
        stop_reason
    )));
    reporter.report(Progress::PhaseFinish);

    Allocation {
        teams,
        leftover,
        floor_fills,
        stop_reason,
    }
}

fn attempt_team(pool: &mut PersonPool, template: &TeamTemplate) -> Attempt {
    if pool.is_empty() {
        return Attempt::Stopped(StopReason::PoolExhausted);
    }
    let roster = pool.roster();
    let mut claimed: Vec<PersonId> = Vec::new();

    // Minimums: all-or-nothing per role, and a miss abandons the whole attempt.
    for slot in template.roles() {
        let required = slot.requirement.min;
        if required == 0 {
            continue;
        }
        match pool.claim_top_of_role(slot.role.key(), required) {
            Some(ids) => claimed.extend(ids),
            None => {
                let available = pool.available_of_role(slot.role.key());
                pool.release(claimed);
                return Attempt::Stopped(StopReason::InsufficientSupply {
                    template: template.name().to_string(),
                    role: slot.role.display().to_string(),
                    required,
                    available,
                });
            }
        }
    }

    // Maximums, never past the overall size cap.
    for slot in template.roles() {
        let room = template.max_members().saturating_sub(claimed.len());
        if room == 0 {
            break;
        }
        let current = count_role(roster, &claimed, slot.role.key());
        let wanted = slot.requirement.max.saturating_sub(current).min(room);
        if wanted > 0 {
            claimed.extend(pool.claim_up_to_of_role(slot.role.key(), wanted));
        }
    }

    // Floor-fill: any role, best first. May break role maximums.
    let mut floor_fill = None;
    if claimed.len() < template.min_members() {
        let added = pool.claim_top(template.min_members() - claimed.len());
        if !added.is_empty() {
            claimed.extend(added.iter().copied());
            let overflows = role_overflows(roster, template, &claimed, &added);
            floor_fill = Some((added, overflows));
        }
    }

    if claimed.len() < template.min_members() {
        let size = claimed.len();
        pool.release(claimed);
        return Attempt::Stopped(StopReason::BelowMinimumSize {
            template: template.name().to_string(),
            size,
            min_members: template.min_members(),
        });
    }
    if claimed.is_empty() {
        return Attempt::Stopped(StopReason::NoMembersClaimed {
            template: template.name().to_string(),
        });
    }

    let mut team = Team::new(template.name());
    team.members = claimed;
    Attempt::Committed { team, floor_fill }
}

fn count_role(roster: &Roster, ids: &[PersonId], role_key: &str) -> usize {
    ids.iter()
        .filter_map(|&id| roster.person(id))
        .filter(|person| person.role.key() == role_key)
        .count()
}

fn role_overflows(
    roster: &Roster,
    template: &TeamTemplate,
    members: &[PersonId],
    added: &[PersonId],
) -> Vec<RoleOverflow> {
    let mut checked: Vec<&str> = Vec::new();
    let mut overflows = Vec::new();
    for person in added.iter().filter_map(|&id| roster.person(id)) {
        let key = person.role.key();
        if checked.contains(&key) {
            continue;
        }
        checked.push(key);

        let count = count_role(roster, members, key);
        let max = template.role_max(key);
        if count > max {
            let role = template
                .roles()
                .iter()
                .find(|slot| slot.role.key() == key)
                .map_or(person.role.display(), |slot| slot.role.display());
            overflows.push(RoleOverflow {
                role: role.to_string(),
                count,
                max,
            });
        }
    }
    overflows
}
