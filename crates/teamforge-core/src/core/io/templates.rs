use crate::core::models::template::{RoleRequirement, TeamTemplate, TemplateError, TemplateSet};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateIoError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Template(#[from] TemplateError),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoleSpec {
    pub name: String,
    #[serde(default)]
    pub min: usize,
    pub max: usize,
}

/// Declarative form of a [`TeamTemplate`] as written in configuration files.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TemplateSpec {
    pub name: String,
    pub min_members: usize,
    pub max_members: usize,
    #[serde(default)]
    pub roles: Vec<RoleSpec>,
}

impl TryFrom<TemplateSpec> for TeamTemplate {
    type Error = TemplateError;

    fn try_from(spec: TemplateSpec) -> Result<Self, Self::Error> {
        TeamTemplate::new(
            spec.name,
            spec.min_members,
            spec.max_members,
            spec.roles
                .into_iter()
                .map(|role| (role.name, RoleRequirement::new(role.min, role.max))),
        )
    }
}

/// Validates specs in order and assembles them into a [`TemplateSet`].
pub fn build_template_set(specs: Vec<TemplateSpec>) -> Result<TemplateSet, TemplateError> {
    let templates = specs
        .into_iter()
        .map(TeamTemplate::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    TemplateSet::new(templates)
}

/// A standalone TOML file holding `[[templates]]` tables.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TemplateCatalogue {
    #[serde(default)]
    pub templates: Vec<TemplateSpec>,
}

impl TemplateCatalogue {
    pub fn load(path: &Path) -> Result<Self, TemplateIoError> {
        let content = std::fs::read_to_string(path).map_err(|e| TemplateIoError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| TemplateIoError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn into_template_set(self) -> Result<TemplateSet, TemplateIoError> {
        Ok(build_template_set(self.templates)?)
    }
}
