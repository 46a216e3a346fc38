use super::config::ConfigError;
use crate::core::models::ids::PersonId;
use crate::core::models::template::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid template configuration: {0}")]
    Template(#[from] TemplateError),

    #[error("Invalid formation configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Team {team_index} refers to unknown template '{template}'")]
    UnknownTemplate { team_index: usize, template: String },

    #[error("Person {person:?} is not part of the roster")]
    UnknownPerson { person: PersonId },

    #[error("Person '{person}' is assigned more than once")]
    DuplicateAssignment { person: String },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
