use super::config::BalanceMetric;
use super::error::EngineError;
use crate::core::models::person::Person;
use crate::core::models::roster::Roster;
use crate::core::models::team::Team;
use std::collections::HashMap;

/// Running sums for one team, kept in step with its membership.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStats {
    pub size: usize,
    pub score_sum: f64,
    pub experience_sum: f64,
    pub role_counts: HashMap<String, usize>,
}

impl TeamStats {
    pub fn from_team(team: &Team, roster: &Roster) -> Result<Self, EngineError> {
        let mut stats = Self::default();
        for &id in &team.members {
            let person = roster
                .person(id)
                .ok_or(EngineError::UnknownPerson { person: id })?;
            stats.add(person);
        }
        Ok(stats)
    }

    pub fn add(&mut self, person: &Person) {
        self.size += 1;
        self.score_sum += person.score;
        self.experience_sum += person.experience;
        *self
            .role_counts
            .entry(person.role.key().to_string())
            .or_insert(0) += 1;
    }

    pub fn role_count(&self, role_key: &str) -> usize {
        self.role_counts.get(role_key).copied().unwrap_or(0)
    }

    pub fn average_score(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.score_sum / self.size as f64
        }
    }

    pub fn average_experience(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.experience_sum / self.size as f64
        }
    }

    /// Averages after exchanging `outgoing` for `incoming`, as `(score, experience)`.
    pub fn averages_after_exchange(&self, outgoing: &Person, incoming: &Person) -> (f64, f64) {
        if self.size == 0 {
            return (0.0, 0.0);
        }
        let n = self.size as f64;
        (
            (self.score_sum - outgoing.score + incoming.score) / n,
            (self.experience_sum - outgoing.experience + incoming.experience) / n,
        )
    }

    /// Applies an exchange of two people holding the same role.
    pub fn exchange(&mut self, outgoing: &Person, incoming: &Person) {
        self.score_sum += incoming.score - outgoing.score;
        self.experience_sum += incoming.experience - outgoing.experience;
    }
}

/// Imbalance between two teams given their `(score, experience)` averages.
pub fn imbalance(metric: BalanceMetric, a: (f64, f64), b: (f64, f64)) -> f64 {
    let score_gap = (a.0 - b.0).abs();
    match metric {
        BalanceMetric::Score => score_gap,
        BalanceMetric::ScoreAndExperience => score_gap + (a.1 - b.1).abs(),
    }
}

pub fn pair_imbalance(metric: BalanceMetric, a: &TeamStats, b: &TeamStats) -> f64 {
    imbalance(
        metric,
        (a.average_score(), a.average_experience()),
        (b.average_score(), b.average_experience()),
    )
}

/// Sum of pairwise imbalance over every pair of teams built from the same template.
pub fn total_imbalance(
    teams: &[Team],
    roster: &Roster,
    metric: BalanceMetric,
) -> Result<f64, EngineError> {
    let stats = teams
        .iter()
        .map(|team| TeamStats::from_team(team, roster))
        .collect::<Result<Vec<_>, _>>()?;

    let mut total = 0.0;
    for i in 0..teams.len() {
        for j in (i + 1)..teams.len() {
            if teams[i].template == teams[j].template {
                total += pair_imbalance(metric, &stats[i], &stats[j]);
            }
        }
    }
    Ok(total)
}
