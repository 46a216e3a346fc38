use std::fmt;
use std::hash::{Hash, Hasher};

/// Normalizes a role name into its matching key.
///
/// Keys are trimmed, lower-cased and have inner whitespace collapsed, so that
/// `"Full Stack"`, `" full  stack "` and `"FULL STACK"` all land in the same bucket.
pub fn normalize_role(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A role tag with a normalized matching key and the original display string.
///
/// Equality and hashing only consider the key.
#[derive(Debug, Clone, Eq)]
pub struct Role {
    key: String,
    display: String,
}

impl Role {
    pub fn new(name: &str) -> Self {
        Self {
            key: normalize_role(name),
            display: name.trim().to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// A raw person record as produced by a loader, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    pub role: String,
    pub experience: f64,
    pub score: f64,
}

impl PersonRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        experience: f64,
        score: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            experience,
            score,
        }
    }
}

/// An assignable person. Immutable once registered in a roster.
///
/// `id` is the loader-facing identifier and is stable across runs; inside the engine
/// people are addressed by their [`PersonId`](super::ids::PersonId) key instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub experience: f64,
    pub score: f64,
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            role: Role::new(&record.role),
            experience: record.experience,
            score: record.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn normalize_role_folds_case_and_whitespace() {
        assert_eq!(normalize_role("  Full   Stack "), "full stack");
        assert_eq!(normalize_role("AI Engineer"), "ai engineer");
        assert_eq!(normalize_role("   "), "");
    }

    #[test]
    fn roles_compare_by_key_but_keep_display() {
        let a = Role::new("Full Stack");
        let b = Role::new("full  stack");
        assert_eq!(a, b);
        assert_eq!(a.display(), "Full Stack");
        assert_eq!(b.display(), "full  stack");

        let set: HashSet<Role> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn person_from_record_normalizes_role() {
        let person = Person::from(PersonRecord::new("7", "Grace", " Tester ", 2.0, 80.0));
        assert_eq!(person.role.key(), "tester");
        assert_eq!(person.role.to_string(), "Tester");
        assert_eq!(person.id, "7");
    }
}
