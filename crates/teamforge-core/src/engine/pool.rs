use crate::core::models::ids::PersonId;
use crate::core::models::roster::Roster;
use slotmap::SecondaryMap;
use std::collections::HashMap;

/// The set of people still available during allocation.
///
/// People are ranked once by standing (score descending, input order ascending). Every
/// removal goes through [`PersonPool::claim`], which takes and removes in one step, so a
/// person can never be handed to two teams. Released people return to their original
/// rank position automatically.
#[derive(Debug, Clone)]
pub struct PersonPool<'r> {
    roster: &'r Roster,
    ranked: Vec<PersonId>,
    by_role: HashMap<String, Vec<PersonId>>,
    available: SecondaryMap<PersonId, ()>,
}

impl<'r> PersonPool<'r> {
    /// Creates a pool holding every person of the roster.
    pub fn new(roster: &'r Roster) -> Self {
        let mut ranked = roster.ids().to_vec();
        roster.sort_by_standing(&mut ranked);

        let mut by_role: HashMap<String, Vec<PersonId>> = HashMap::new();
        let mut available = SecondaryMap::with_capacity(ranked.len());
        for &id in &ranked {
            if let Some(person) = roster.person(id) {
                by_role
                    .entry(person.role.key().to_string())
                    .or_default()
                    .push(id);
            }
            available.insert(id, ());
        }

        Self {
            roster,
            ranked,
            by_role,
            available,
        }
    }

    pub fn roster(&self) -> &'r Roster {
        self.roster
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    pub fn is_available(&self, id: PersonId) -> bool {
        self.available.contains_key(id)
    }

    pub fn available_of_role(&self, role_key: &str) -> usize {
        self.by_role
            .get(role_key)
            .map_or(0, |ids| ids.iter().filter(|&&id| self.is_available(id)).count())
    }

    /// Exclusively claims one person. Returns `false` if they were already taken.
    pub fn claim(&mut self, id: PersonId) -> bool {
        self.available.remove(id).is_some()
    }

    /// Claims exactly `count` top-ranked people of a role, or nobody at all.
    pub fn claim_top_of_role(&mut self, role_key: &str, count: usize) -> Option<Vec<PersonId>> {
        if self.available_of_role(role_key) < count {
            return None;
        }
        Some(self.claim_up_to_of_role(role_key, count))
    }

    /// Claims up to `count` top-ranked people of a role.
    pub fn claim_up_to_of_role(&mut self, role_key: &str, count: usize) -> Vec<PersonId> {
        let candidates: Vec<PersonId> = match self.by_role.get(role_key) {
            Some(ids) => ids
                .iter()
                .copied()
                .filter(|&id| self.is_available(id))
                .take(count)
                .collect(),
            None => Vec::new(),
        };
        candidates.into_iter().filter(|&id| self.claim(id)).collect()
    }

    /// Claims up to `count` top-ranked people regardless of role.
    pub fn claim_top(&mut self, count: usize) -> Vec<PersonId> {
        let candidates: Vec<PersonId> = self
            .ranked
            .iter()
            .copied()
            .filter(|&id| self.is_available(id))
            .take(count)
            .collect();
        candidates.into_iter().filter(|&id| self.claim(id)).collect()
    }

    /// Returns people to the pool. Only people from this pool's roster are accepted.
    pub fn release<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = PersonId>,
    {
        for id in ids {
            if self.roster.contains(id) {
                self.available.insert(id, ());
            }
        }
    }

    /// Still-available people in rank order.
    pub fn remaining(&self) -> Vec<PersonId> {
        self.ranked
            .iter()
            .copied()
            .filter(|&id| self.is_available(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::person::PersonRecord;

    fn roster() -> Roster {
        Roster::from_records(vec![
            PersonRecord::new("a60", "A60", "A", 1.0, 60.0),
            PersonRecord::new("a90", "A90", "A", 1.0, 90.0),
            PersonRecord::new("b50", "B50", "b", 1.0, 50.0),
            PersonRecord::new("a70-first", "A70", "a", 1.0, 70.0),
            PersonRecord::new("a70-second", "A70", "A", 1.0, 70.0),
        ])
        .unwrap()
    }

    fn names(roster: &Roster, ids: &[PersonId]) -> Vec<String> {
        ids.iter()
            .map(|&id| roster.person(id).unwrap().id.clone())
            .collect()
    }

    #[test]
    fn remaining_is_ranked_by_score_then_input_order() {
        let roster = roster();
        let pool = PersonPool::new(&roster);
        assert_eq!(
            names(&roster, &pool.remaining()),
            vec!["a90", "a70-first", "a70-second", "a60", "b50"]
        );
    }

    #[test]
    fn claim_top_of_role_is_all_or_nothing() {
        let roster = roster();
        let mut pool = PersonPool::new(&roster);

        assert!(pool.claim_top_of_role("b", 2).is_none());
        assert_eq!(pool.len(), 5);

        let taken = pool.claim_top_of_role("a", 3).unwrap();
        assert_eq!(names(&roster, &taken), vec!["a90", "a70-first", "a70-second"]);
        assert_eq!(pool.available_of_role("a"), 1);
    }

    #[test]
    fn claims_are_exclusive() {
        let roster = roster();
        let mut pool = PersonPool::new(&roster);
        let id = roster.ids()[0];
        assert!(pool.claim(id));
        assert!(!pool.claim(id));
        assert!(!pool.remaining().contains(&id));
    }

    #[test]
    fn released_people_regain_their_rank() {
        let roster = roster();
        let mut pool = PersonPool::new(&roster);
        let top = pool.claim_top(2);
        assert_eq!(names(&roster, &top), vec!["a90", "a70-first"]);

        pool.release(top);
        assert_eq!(names(&roster, &pool.claim_top(1)), vec!["a90"]);
    }

    #[test]
    fn unknown_roles_yield_nothing() {
        let roster = roster();
        let mut pool = PersonPool::new(&roster);
        assert!(pool.claim_up_to_of_role("designer", 3).is_empty());
        assert_eq!(pool.claim_top_of_role("designer", 0), Some(Vec::new()));
    }
}
