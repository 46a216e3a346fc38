use crate::core::models::template::TemplateSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Swap cap used when no explicit limit is configured.
pub const DEFAULT_MAX_BALANCE_ITERATIONS: usize = 100;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Unknown balance metric '{0}'. Expected 'score' or 'score-and-experience'.")]
    UnknownMetric(String),
}

/// What the balancer tries to equalize between teams of the same template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalanceMetric {
    /// Absolute difference of average score.
    #[default]
    Score,
    /// Absolute difference of average score plus absolute difference of average experience.
    ScoreAndExperience,
}

impl FromStr for BalanceMetric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" => Ok(Self::Score),
            "score-and-experience" | "score+experience" => Ok(Self::ScoreAndExperience),
            other => Err(ConfigError::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Display for BalanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score => f.write_str("score"),
            Self::ScoreAndExperience => f.write_str("score-and-experience"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalancingConfig {
    /// Upper bound on accepted swaps for the whole run.
    pub max_iterations: usize,
    pub metric: BalanceMetric,
}

impl Default for BalancingConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_BALANCE_ITERATIONS,
            metric: BalanceMetric::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormationConfig {
    pub templates: TemplateSet,
    pub redistribute: bool,
    /// `None` skips the balancing phase.
    pub balancing: Option<BalancingConfig>,
}

#[derive(Default)]
pub struct FormationConfigBuilder {
    templates: Option<TemplateSet>,
    redistribute: Option<bool>,
    balancing: Option<Option<BalancingConfig>>,
}

impl FormationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn templates(mut self, templates: TemplateSet) -> Self {
        self.templates = Some(templates);
        self
    }
    pub fn redistribute(mut self, enabled: bool) -> Self {
        self.redistribute = Some(enabled);
        self
    }
    pub fn balancing_config(mut self, config: Option<BalancingConfig>) -> Self {
        self.balancing = Some(config);
        self
    }

    pub fn build(self) -> Result<FormationConfig, ConfigError> {
        Ok(FormationConfig {
            templates: self
                .templates
                .ok_or(ConfigError::MissingParameter("templates"))?,
            redistribute: self
                .redistribute
                .ok_or(ConfigError::MissingParameter("redistribute"))?,
            balancing: self
                .balancing
                .ok_or(ConfigError::MissingParameter("balancing"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_every_parameter() {
        let err = FormationConfigBuilder::new()
            .templates(TemplateSet::default())
            .redistribute(true)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("balancing"));
    }

    #[test]
    fn builder_produces_config() {
        let config = FormationConfigBuilder::new()
            .templates(TemplateSet::default())
            .redistribute(false)
            .balancing_config(Some(BalancingConfig::default()))
            .build()
            .unwrap();
        assert!(!config.redistribute);
        assert_eq!(
            config.balancing.unwrap().max_iterations,
            DEFAULT_MAX_BALANCE_ITERATIONS
        );
    }

    #[test]
    fn metric_parses_from_config_strings() {
        assert_eq!("score".parse::<BalanceMetric>(), Ok(BalanceMetric::Score));
        assert_eq!(
            "Score-And-Experience".parse::<BalanceMetric>(),
            Ok(BalanceMetric::ScoreAndExperience)
        );
        assert!(matches!(
            "fairness".parse::<BalanceMetric>(),
            Err(ConfigError::UnknownMetric(_))
        ));
        assert_eq!(BalanceMetric::ScoreAndExperience.to_string(), "score-and-experience");
    }
}
