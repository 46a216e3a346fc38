use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use teamforge::core::io::templates::TemplateSpec;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileRedistributionConfig {
    pub enabled: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBalancingConfig {
    pub enabled: Option<bool>,
    pub max_iterations: Option<usize>,
    pub metric: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub redistribution: Option<FileRedistributionConfig>,
    pub balancing: Option<FileBalancingConfig>,
    pub templates: Option<Vec<TemplateSpec>>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_full_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("teamforge.toml");
        fs::write(
            &path,
            r#"
            [redistribution]
            enabled = false

            [balancing]
            enabled = true
            max-iterations = 25
            metric = "score-and-experience"

            [[templates]]
            name = "type1"
            min-members = 4
            max-members = 5
            roles = [
              { name = "Full Stack", min = 2, max = 3 },
              { name = "Tester", min = 1, max = 1 },
            ]
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.redistribution.unwrap().enabled, Some(false));
        let balancing = config.balancing.unwrap();
        assert_eq!(balancing.max_iterations, Some(25));
        assert_eq!(balancing.metric.as_deref(), Some("score-and-experience"));
        let templates = config.templates.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].roles[1].name, "Tester");
    }

    #[test]
    fn unknown_sections_are_reported_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[annealing]\nsteps = 3\n").unwrap();

        match FileConfig::from_file(&path) {
            Err(CliError::FileParsing { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected FileParsing error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
