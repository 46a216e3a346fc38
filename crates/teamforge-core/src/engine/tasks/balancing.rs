use super::redistribution::resolve_templates;
use crate::core::models::ids::PersonId;
use crate::core::models::person::Person;
use crate::core::models::roster::Roster;
use crate::core::models::team::Team;
use crate::core::models::template::TemplateSet;
use crate::engine::config::{BalanceMetric, BalancingConfig};
use crate::engine::error::EngineError;
use crate::engine::metrics::{TeamStats, imbalance, pair_imbalance};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{BalanceReport, Swap};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, instrument, trace};

const EPS: f64 = 1e-9;

/// Teams built from one template, in order of first appearance.
struct Group {
    members: Vec<usize>,
    queue: VecDeque<(usize, usize)>,
    queued: HashSet<(usize, usize)>,
}

impl Group {
    fn new(members: Vec<usize>) -> Self {
        let mut group = Self {
            members,
            queue: VecDeque::new(),
            queued: HashSet::new(),
        };
        group.requeue_all();
        group
    }

    fn pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, &a) in self.members.iter().enumerate() {
            for &b in &self.members[i + 1..] {
                pairs.push((a, b));
            }
        }
        pairs
    }

    /// Queues every pair that is not already waiting.
    fn requeue_all(&mut self) {
        for pair in self.pairs() {
            if self.queued.insert(pair) {
                self.queue.push_back(pair);
            }
        }
    }

    fn pop(&mut self) -> Option<(usize, usize)> {
        let pair = self.queue.pop_front()?;
        self.queued.remove(&pair);
        Some(pair)
    }

    fn total(&self, stats: &[TeamStats], metric: BalanceMetric) -> f64 {
        self.pairs()
            .into_iter()
            .map(|(a, b)| pair_imbalance(metric, &stats[a], &stats[b]))
            .sum()
    }
}

struct Candidate<'r> {
    outgoing_a: &'r Person,
    outgoing_b: &'r Person,
    person_a: PersonId,
    person_b: PersonId,
    pair_before: f64,
    pair_after: f64,
}

/// Equalizes teams of the same template by exchanging same-role members.
///
/// Each template's team pairs sit in a work queue. A popped pair is scanned member by
/// member and the first exchange that lowers both the pair's imbalance and the sum over
/// the whole template group is applied; every pair of that group is then revisited.
/// An empty queue is a fixpoint. Exchanges keep team sizes and role counts intact, and
/// the group sum only ever decreases. `max_iterations` bounds the number of accepted
/// swaps over the whole run.
#[instrument(skip_all, name = "balancing_task")]
pub fn run(
    roster: &Roster,
    templates: &TemplateSet,
    teams: &mut [Team],
    config: &BalancingConfig,
    reporter: &ProgressReporter,
) -> Result<BalanceReport, EngineError> {
    resolve_templates(templates, teams)?;
    let metric = config.metric;
    let mut stats = teams
        .iter()
        .map(|team| TeamStats::from_team(team, roster))
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups = group_by_template(teams);
    let initial_imbalance: f64 = groups.iter().map(|g| g.total(&stats, metric)).sum();

    reporter.report(Progress::PhaseStart { name: "Balancing" });
    info!(
        teams = teams.len(),
        groups = groups.len(),
        %metric,
        max_iterations = config.max_iterations,
        initial = initial_imbalance,
        "Balancing teams."
    );

    let mut swaps: Vec<Swap> = Vec::new();
    let mut converged = true;

    'groups: for group in &mut groups {
        while let Some((a, b)) = group.pop() {
            let Some(candidate) = find_improving_swap(roster, teams, &stats, group, metric, a, b)?
            else {
                continue;
            };
            if swaps.len() >= config.max_iterations {
                debug!(
                    cap = config.max_iterations,
                    "Swap cap reached with improvements still available."
                );
                converged = false;
                break 'groups;
            }

            let placed_a = teams[a].replace_member(candidate.person_a, candidate.person_b);
            let placed_b = teams[b].replace_member(candidate.person_b, candidate.person_a);
            if !(placed_a && placed_b) {
                return Err(EngineError::Internal(format!(
                    "swap between teams {a} and {b} referenced a non-member"
                )));
            }
            stats[a].exchange(candidate.outgoing_a, candidate.outgoing_b);
            stats[b].exchange(candidate.outgoing_b, candidate.outgoing_a);

            debug!(
                team_a = a,
                team_b = b,
                person_a = %candidate.outgoing_a.id,
                person_b = %candidate.outgoing_b.id,
                before = candidate.pair_before,
                after = candidate.pair_after,
                "Applied balancing swap."
            );
            reporter.report(Progress::StatusUpdate {
                text: format!(
                    "Swapped {} and {} between teams {} and {}",
                    candidate.outgoing_a.name,
                    candidate.outgoing_b.name,
                    a + 1,
                    b + 1
                ),
            });
            swaps.push(Swap {
                team_a: a,
                team_b: b,
                person_a: candidate.person_a,
                person_b: candidate.person_b,
                imbalance_before: candidate.pair_before,
                imbalance_after: candidate.pair_after,
            });
            group.requeue_all();
        }
    }

    let final_imbalance: f64 = groups.iter().map(|g| g.total(&stats, metric)).sum();
    info!(
        swaps = swaps.len(),
        converged,
        before = initial_imbalance,
        after = final_imbalance,
        "Balancing finished."
    );
    reporter.report(Progress::Message(format!(
        "Applied {} swap(s); imbalance {:.3} -> {:.3}.",
        swaps.len(),
        initial_imbalance,
        final_imbalance
    )));
    reporter.report(Progress::PhaseFinish);

    Ok(BalanceReport {
        swaps,
        converged,
        initial_imbalance,
        final_imbalance,
    })
}

fn group_by_template(teams: &[Team]) -> Vec<Group> {
    let mut names: Vec<&str> = Vec::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    for (index, team) in teams.iter().enumerate() {
        match names.iter().position(|&name| name == team.template) {
            Some(slot) => members[slot].push(index),
            None => {
                names.push(&team.template);
                members.push(vec![index]);
            }
        }
    }
    members.into_iter().map(Group::new).collect()
}

fn find_improving_swap<'r>(
    roster: &'r Roster,
    teams: &[Team],
    stats: &[TeamStats],
    group: &Group,
    metric: BalanceMetric,
    a: usize,
    b: usize,
) -> Result<Option<Candidate<'r>>, EngineError> {
    let averages = |s: &TeamStats| (s.average_score(), s.average_experience());
    let pair_before = pair_imbalance(metric, &stats[a], &stats[b]);
    let (avg_a, avg_b) = (averages(&stats[a]), averages(&stats[b]));

    for &person_a in &teams[a].members {
        let outgoing_a = lookup(roster, person_a)?;
        for &person_b in &teams[b].members {
            let outgoing_b = lookup(roster, person_b)?;
            if outgoing_a.role != outgoing_b.role {
                continue;
            }

            let new_a = stats[a].averages_after_exchange(outgoing_a, outgoing_b);
            let new_b = stats[b].averages_after_exchange(outgoing_b, outgoing_a);
            let pair_after = imbalance(metric, new_a, new_b);
            if pair_after >= pair_before - EPS {
                continue;
            }

            // The rest of the group sees both teams move.
            let mut delta = pair_after - pair_before;
            for &other in group.members.iter().filter(|&&m| m != a && m != b) {
                let avg_other = averages(&stats[other]);
                delta += imbalance(metric, new_a, avg_other) - imbalance(metric, avg_a, avg_other);
                delta += imbalance(metric, new_b, avg_other) - imbalance(metric, avg_b, avg_other);
            }
            trace!(
                person_a = %outgoing_a.id,
                person_b = %outgoing_b.id,
                pair_before,
                pair_after,
                delta,
                "Evaluated swap candidate."
            );
            if delta < -EPS {
                return Ok(Some(Candidate {
                    outgoing_a,
                    outgoing_b,
                    person_a,
                    person_b,
                    pair_before,
                    pair_after,
                }));
            }
        }
    }
    Ok(None)
}

fn lookup(roster: &Roster, id: PersonId) -> Result<&Person, EngineError> {
    roster
        .person(id)
        .ok_or(EngineError::UnknownPerson { person: id })
}
