use std::fmt;
use teamforge::core::models::roster::Roster;

/// Count, mean, sample standard deviation and quartiles of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// `None` below two observations.
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Summary {
    /// Returns `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = (n > 1).then(|| {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });

        Some(Self {
            count: n,
            mean,
            std,
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }
}

/// Linear interpolation between the closest ranks of a sorted, non-empty sample.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Participant overview printed by `teamforge stats`.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterStats {
    /// Role display name and head count, in order of first appearance.
    pub roles: Vec<(String, usize)>,
    /// Experience level and count, most frequent first.
    pub experience: Vec<(f64, usize)>,
    pub score: Option<Summary>,
}

impl RosterStats {
    pub fn from_roster(roster: &Roster) -> Self {
        let roles = roster
            .roles()
            .into_iter()
            .map(|role| {
                let count = roster
                    .iter()
                    .filter(|(_, person)| person.role == role)
                    .count();
                (role.display().to_string(), count)
            })
            .collect();

        let mut experience: Vec<(f64, usize)> = Vec::new();
        for (_, person) in roster.iter() {
            match experience.iter_mut().find(|(level, _)| *level == person.experience) {
                Some((_, count)) => *count += 1,
                None => experience.push((person.experience, 1)),
            }
        }
        // Stable, so equal counts keep first-appearance order.
        experience.sort_by(|a, b| b.1.cmp(&a.1));

        let scores: Vec<f64> = roster.iter().map(|(_, person)| person.score).collect();

        Self {
            roles,
            experience,
            score: Summary::from_values(&scores),
        }
    }
}

impl fmt::Display for RosterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Available Participants by Role:")?;
        for (role, count) in &self.roles {
            writeln!(f, "  {role}: {count}")?;
        }

        writeln!(f, "\nExperience Distribution:")?;
        for (level, count) in &self.experience {
            writeln!(f, "  {level}: {count}")?;
        }

        writeln!(f, "\nEvaluation Score Stats:")?;
        match &self.score {
            Some(s) => {
                let std = s.std.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"));
                writeln!(f, "  count {:>10}", s.count)?;
                writeln!(f, "  mean  {:>10.3}", s.mean)?;
                writeln!(f, "  std   {std:>10}")?;
                writeln!(f, "  min   {:>10.3}", s.min)?;
                writeln!(f, "  25%   {:>10.3}", s.q1)?;
                writeln!(f, "  50%   {:>10.3}", s.median)?;
                writeln!(f, "  75%   {:>10.3}", s.q3)?;
                writeln!(f, "  max   {:>10.3}", s.max)
            }
            None => writeln!(f, "  no participants"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge::core::models::person::PersonRecord;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn summary_matches_linear_interpolation() {
        let s = Summary::from_values(&[70.0, 90.0, 60.0, 80.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!(close(s.mean, 75.0));
        assert!(close(s.std.unwrap(), 12.909944487358056));
        assert!(close(s.min, 60.0));
        assert!(close(s.q1, 67.5));
        assert!(close(s.median, 75.0));
        assert!(close(s.q3, 82.5));
        assert!(close(s.max, 90.0));
    }

    #[test]
    fn single_value_has_no_spread() {
        let s = Summary::from_values(&[42.0]).unwrap();
        assert_eq!(s.std, None);
        assert!(close(s.q1, 42.0) && close(s.q3, 42.0));
        assert!(Summary::from_values(&[]).is_none());
    }

    #[test]
    fn roster_stats_group_roles_and_experience() {
        let roster = Roster::from_records(vec![
            PersonRecord::new("1", "Ana", "Tester", 2.0, 50.0),
            PersonRecord::new("2", "Bo", "Full Stack", 1.0, 70.0),
            PersonRecord::new("3", "Cy", "tester", 1.0, 90.0),
            PersonRecord::new("4", "Di", "Full Stack", 1.0, 60.0),
        ])
        .unwrap();

        let stats = RosterStats::from_roster(&roster);
        assert_eq!(
            stats.roles,
            vec![("Tester".to_string(), 2), ("Full Stack".to_string(), 2)]
        );
        assert_eq!(stats.experience, vec![(1.0, 3), (2.0, 1)]);
        assert_eq!(stats.score.as_ref().unwrap().count, 4);

        let text = stats.to_string();
        assert!(text.contains("Tester: 2"));
        assert!(text.contains("50%"));
    }
}
