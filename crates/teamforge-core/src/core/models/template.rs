use super::person::Role;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TemplateError {
    #[error("Template name cannot be empty")]
    EmptyName,

    #[error("Template '{template}' has min-members {min} greater than max-members {max}")]
    SizeBoundsInverted {
        template: String,
        min: usize,
        max: usize,
    },

    #[error("Template '{template}' role '{role}' has min {min} greater than max {max}")]
    RoleBoundsInverted {
        template: String,
        role: String,
        min: usize,
        max: usize,
    },

    #[error(
        "Template '{template}' can never be satisfied: role minimums add up to {total_min} but max-members is {max_members}"
    )]
    UnsatisfiableMinimums {
        template: String,
        total_min: usize,
        max_members: usize,
    },

    #[error("Template '{template}' declares role '{role}' more than once")]
    DuplicateRole { template: String, role: String },

    #[error("Template '{template}' declares a role with an empty name")]
    EmptyRoleName { template: String },

    #[error("Template '{name}' is defined more than once")]
    DuplicateTemplate { name: String },
}

/// Bounds on how many people of one role a team may contain.
///
/// `min == 0 && max == 0` marks the role as disallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirement {
    pub min: usize,
    pub max: usize,
}

impl RoleRequirement {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn is_disallowed(&self) -> bool {
        self.max == 0
    }
}

/// A declared role of a template together with its bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSlot {
    pub role: Role,
    pub requirement: RoleRequirement,
}

/// One team type: overall size bounds and per-role bounds in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamTemplate {
    name: String,
    min_members: usize,
    max_members: usize,
    roles: Vec<RoleSlot>,
}

impl TeamTemplate {
    /// Creates a validated template.
    ///
    /// # Errors
    ///
    /// Fails when any bound is inverted, a role is declared twice, or the role minimums
    /// cannot fit into `max_members`. Bounds are never clamped.
    pub fn new<S, I>(
        name: impl Into<String>,
        min_members: usize,
        max_members: usize,
        roles: I,
    ) -> Result<Self, TemplateError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, RoleRequirement)>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TemplateError::EmptyName);
        }
        if min_members > max_members {
            return Err(TemplateError::SizeBoundsInverted {
                template: name,
                min: min_members,
                max: max_members,
            });
        }

        let mut slots: Vec<RoleSlot> = Vec::new();
        for (role_name, requirement) in roles {
            let role = Role::new(role_name.as_ref());
            if role.is_empty() {
                return Err(TemplateError::EmptyRoleName { template: name });
            }
            if requirement.min > requirement.max {
                return Err(TemplateError::RoleBoundsInverted {
                    template: name,
                    role: role.display().to_string(),
                    min: requirement.min,
                    max: requirement.max,
                });
            }
            if slots.iter().any(|slot| slot.role == role) {
                return Err(TemplateError::DuplicateRole {
                    template: name,
                    role: role.display().to_string(),
                });
            }
            slots.push(RoleSlot { role, requirement });
        }

        let total_min: usize = slots.iter().map(|slot| slot.requirement.min).sum();
        if total_min > max_members {
            return Err(TemplateError::UnsatisfiableMinimums {
                template: name,
                total_min,
                max_members,
            });
        }

        Ok(Self {
            name,
            min_members,
            max_members,
            roles: slots,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_members(&self) -> usize {
        self.min_members
    }

    pub fn max_members(&self) -> usize {
        self.max_members
    }

    /// Declared roles in declaration order.
    pub fn roles(&self) -> &[RoleSlot] {
        &self.roles
    }

    pub fn requirement_for(&self, role_key: &str) -> Option<&RoleRequirement> {
        self.roles
            .iter()
            .find(|slot| slot.role.key() == role_key)
            .map(|slot| &slot.requirement)
    }

    /// Maximum count for a role; undeclared roles are disallowed (zero).
    pub fn role_max(&self, role_key: &str) -> usize {
        self.requirement_for(role_key).map_or(0, |req| req.max)
    }

    pub fn total_minimum(&self) -> usize {
        self.roles.iter().map(|slot| slot.requirement.min).sum()
    }
}

/// Templates in declared order, unique by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateSet {
    templates: Vec<TeamTemplate>,
}

impl TemplateSet {
    pub fn new(templates: Vec<TeamTemplate>) -> Result<Self, TemplateError> {
        for (i, template) in templates.iter().enumerate() {
            if templates[..i].iter().any(|t| t.name == template.name) {
                return Err(TemplateError::DuplicateTemplate {
                    name: template.name.clone(),
                });
            }
        }
        Ok(Self { templates })
    }

    pub fn get(&self, name: &str) -> Option<&TeamTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Templates in declared order. The iterator is `Clone`, so it can be cycled.
    pub fn iter(&self) -> std::slice::Iter<'_, TeamTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
