use super::ids::PersonId;
use super::person::{Person, PersonRecord, Role};
use slotmap::{SecondaryMap, SlotMap};
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RosterError {
    #[error("Duplicate person id '{id}'")]
    DuplicateId { id: String },

    #[error("Person '{id}' has an empty role")]
    EmptyRole { id: String },

    #[error("Person '{id}' has a non-finite {field}: {value}")]
    NonFiniteValue {
        id: String,
        field: &'static str,
        value: f64,
    },
}

/// The owning collection of people for one formation run.
///
/// The roster remembers the order in which people were registered. That canonical
/// input order is the tie-break whenever two people have the same score.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    people: SlotMap<PersonId, Person>,
    order: Vec<PersonId>,
    ranks: SecondaryMap<PersonId, usize>,
    by_external_id: HashMap<String, PersonId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from loader records, preserving their order.
    pub fn from_records<I>(records: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = PersonRecord>,
    {
        let mut roster = Self::new();
        for record in records {
            roster.add(record)?;
        }
        Ok(roster)
    }

    /// Validates and registers a person, returning its key.
    pub fn add(&mut self, record: PersonRecord) -> Result<PersonId, RosterError> {
        if self.by_external_id.contains_key(&record.id) {
            return Err(RosterError::DuplicateId { id: record.id });
        }
        if !record.score.is_finite() {
            return Err(RosterError::NonFiniteValue {
                id: record.id,
                field: "score",
                value: record.score,
            });
        }
        if !record.experience.is_finite() {
            return Err(RosterError::NonFiniteValue {
                id: record.id,
                field: "experience",
                value: record.experience,
            });
        }

        let person = Person::from(record);
        if person.role.is_empty() {
            return Err(RosterError::EmptyRole { id: person.id });
        }

        let external_id = person.id.clone();
        let id = self.people.insert(person);
        self.ranks.insert(id, self.order.len());
        self.order.push(id);
        self.by_external_id.insert(external_id, id);
        Ok(id)
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.get(id)
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.people.contains_key(id)
    }

    pub fn find(&self, external_id: &str) -> Option<PersonId> {
        self.by_external_id.get(external_id).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in canonical input order.
    pub fn ids(&self) -> &[PersonId] {
        &self.order
    }

    /// People in canonical input order.
    pub fn iter(&self) -> impl Iterator<Item = (PersonId, &Person)> {
        self.order.iter().map(|&id| (id, &self.people[id]))
    }

    /// Position of a person in the canonical input order.
    pub fn rank(&self, id: PersonId) -> Option<usize> {
        self.ranks.get(id).copied()
    }

    /// Distinct roles in order of first appearance.
    pub fn roles(&self) -> Vec<Role> {
        let mut seen: Vec<Role> = Vec::new();
        for (_, person) in self.iter() {
            if !seen.contains(&person.role) {
                seen.push(person.role.clone());
            }
        }
        seen
    }

    /// Orders two people by standing: higher score first, then earlier input order.
    pub fn compare_standing(&self, a: PersonId, b: PersonId) -> Ordering {
        let score_a = self.people.get(a).map_or(f64::NEG_INFINITY, |p| p.score);
        let score_b = self.people.get(b).map_or(f64::NEG_INFINITY, |p| p.score);
        score_b
            .total_cmp(&score_a)
            .then_with(|| self.rank(a).cmp(&self.rank(b)))
    }

    /// Sorts keys by standing (see [`Roster::compare_standing`]).
    pub fn sort_by_standing(&self, ids: &mut [PersonId]) {
        ids.sort_by(|&a, &b| self.compare_standing(a, b));
    }
}
