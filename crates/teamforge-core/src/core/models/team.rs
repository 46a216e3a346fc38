use super::ids::PersonId;
use super::roster::Roster;
use std::collections::HashMap;

/// A formed team: the template it was built against and its members.
///
/// Member order carries no meaning; it only reflects the order people were placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub template: String,
    pub members: Vec<PersonId>,
}

impl Team {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            members: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.members.contains(&id)
    }

    pub fn role_count(&self, roster: &Roster, role_key: &str) -> usize {
        self.members
            .iter()
            .filter_map(|&id| roster.person(id))
            .filter(|person| person.role.key() == role_key)
            .count()
    }

    /// Member counts keyed by normalized role.
    pub fn role_counts(&self, roster: &Roster) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for person in self.members.iter().filter_map(|&id| roster.person(id)) {
            *counts.entry(person.role.key().to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn total_score(&self, roster: &Roster) -> f64 {
        self.members
            .iter()
            .filter_map(|&id| roster.person(id))
            .map(|person| person.score)
            .sum()
    }

    /// Average member score; an empty team averages zero.
    pub fn average_score(&self, roster: &Roster) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        self.total_score(roster) / self.members.len() as f64
    }

    /// Average member experience; an empty team averages zero.
    pub fn average_experience(&self, roster: &Roster) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .members
            .iter()
            .filter_map(|&id| roster.person(id))
            .map(|person| person.experience)
            .sum();
        total / self.members.len() as f64
    }

    /// Replaces `outgoing` with `incoming` in place. Returns false if `outgoing` is not a member.
    pub(crate) fn replace_member(&mut self, outgoing: PersonId, incoming: PersonId) -> bool {
        match self.members.iter().position(|&id| id == outgoing) {
            Some(pos) => {
                self.members[pos] = incoming;
                true
            }
            None => false,
        }
    }
}
