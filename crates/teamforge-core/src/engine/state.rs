use crate::core::models::ids::PersonId;
use crate::core::models::team::Team;
use std::fmt;

/// Why the allocation loop stopped creating teams.
///
/// None of these are failures of the run; they describe the expected end of greedy
/// construction and leave the remaining people in the leftover list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// No templates were configured.
    NoTemplates,
    /// Every person was assigned.
    PoolExhausted,
    /// A role minimum of the next template could not be met.
    InsufficientSupply {
        template: String,
        role: String,
        required: usize,
        available: usize,
    },
    /// The next team could not reach its minimum size even after floor-fill.
    BelowMinimumSize {
        template: String,
        size: usize,
        min_members: usize,
    },
    /// The next attempt claimed nobody, so the loop would never progress.
    NoMembersClaimed { template: String },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTemplates => f.write_str("no templates configured"),
            Self::PoolExhausted => f.write_str("everyone was assigned"),
            Self::InsufficientSupply {
                template,
                role,
                required,
                available,
            } => write!(
                f,
                "template '{template}' needs {required} '{role}' but only {available} remain"
            ),
            Self::BelowMinimumSize {
                template,
                size,
                min_members,
            } => write!(
                f,
                "template '{template}' could only reach {size} of {min_members} required members"
            ),
            Self::NoMembersClaimed { template } => {
                write!(f, "template '{template}' claimed no members")
            }
        }
    }
}

/// A role whose count went past its template maximum during floor-fill.
///
/// `max == 0` also covers roles the template does not declare at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOverflow {
    pub role: String,
    pub count: usize,
    pub max: usize,
}

/// Record of the floor-fill escape valve topping a team up to its minimum size.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorFill {
    pub team_index: usize,
    pub template: String,
    pub added: Vec<PersonId>,
    pub role_overflows: Vec<RoleOverflow>,
}

impl FloorFill {
    pub fn violates_role_bounds(&self) -> bool {
        !self.role_overflows.is_empty()
    }
}

/// Outcome of the allocation phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub teams: Vec<Team>,
    /// Unassigned people, ranked by standing.
    pub leftover: Vec<PersonId>,
    pub floor_fills: Vec<FloorFill>,
    pub stop_reason: StopReason,
}

/// A leftover person placed into an existing team.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub person: PersonId,
    pub team_index: usize,
    /// Increase of the team's average score caused by the placement.
    pub gain: f64,
}

/// Outcome of the redistribution phase.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Redistribution {
    pub placements: Vec<Placement>,
    /// People that fit no team; ranked by standing.
    pub unplaced: Vec<PersonId>,
}

/// An accepted exchange of two same-role members between two teams.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swap {
    pub team_a: usize,
    pub team_b: usize,
    /// Moved from `team_a` to `team_b`.
    pub person_a: PersonId,
    /// Moved from `team_b` to `team_a`.
    pub person_b: PersonId,
    pub imbalance_before: f64,
    pub imbalance_after: f64,
}

/// Outcome of the balancing phase.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BalanceReport {
    pub swaps: Vec<Swap>,
    /// True when no improving swap remains; false when the iteration cap stopped the search.
    pub converged: bool,
    /// Sum of pairwise imbalance over teams sharing a template, before balancing.
    pub initial_imbalance: f64,
    pub final_imbalance: f64,
}
