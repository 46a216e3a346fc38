use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::FormArgs;
use crate::error::{CliError, Result};
use std::str::FromStr;
use teamforge::core::io::templates::{TemplateCatalogue, build_template_set};
use teamforge::engine::config::{BalanceMetric, BalancingConfig, FormationConfigBuilder};
use tracing::{debug, info};

/// Layers defaults, the config file, `--set` overrides and CLI flags, in that order.
///
/// `--set` edits the file layer, so a dedicated flag such as `--max-iterations` wins over it.
pub fn build_config(args: &FormArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let redistribution_file = file_config.redistribution.take().unwrap_or_default();
    let redistribute = !args.no_redistribute
        && redistribution_file
            .enabled
            .unwrap_or(defaults.redistribute);

    let balancing_file = file_config.balancing.take().unwrap_or_default();
    let balance = !args.no_balance && balancing_file.enabled.unwrap_or(defaults.balance);
    let max_iterations = args
        .max_iterations
        .or(balancing_file.max_iterations)
        .unwrap_or(defaults.max_iterations);
    let metric = match args.metric.as_deref().or(balancing_file.metric.as_deref()) {
        Some(name) => BalanceMetric::from_str(name).map_err(|e| CliError::Config(e.to_string()))?,
        None => defaults.metric,
    };
    let balancing = balance.then_some(BalancingConfig {
        max_iterations,
        metric,
    });

    let specs = match &args.templates {
        Some(path) => {
            info!("Loading team templates from {:?}", path);
            TemplateCatalogue::load(path)
                .map_err(|e| CliError::FileParsing {
                    path: path.clone(),
                    source: e.into(),
                })?
                .templates
        }
        None => file_config.templates.take().unwrap_or_default(),
    };
    if specs.is_empty() {
        return Err(CliError::Config(
            "No team templates configured. Add [[templates]] to the config file or pass --templates."
                .to_string(),
        ));
    }
    let templates = build_template_set(specs).map_err(|e| CliError::Config(e.to_string()))?;
    debug!(
        templates = templates.len(),
        redistribute,
        balance,
        "Resolved formation configuration."
    );

    let core_config = FormationConfigBuilder::new()
        .templates(templates)
        .redistribute(redistribute)
        .balancing_config(balancing)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        input_path: args.input.clone(),
        output_path: args.output.clone(),
        core_config,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Argument(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "balancing.max-iterations" => {
                config
                    .balancing
                    .get_or_insert_with(Default::default)
                    .max_iterations = Some(parse_value(key, value_str, "integer")?);
            }
            "balancing.metric" => {
                config.balancing.get_or_insert_with(Default::default).metric =
                    Some(value_str.trim().to_string());
            }
            "balancing.enabled" => {
                config.balancing.get_or_insert_with(Default::default).enabled =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "redistribution.enabled" => {
                config
                    .redistribution
                    .get_or_insert_with(Default::default)
                    .enabled = Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    const CONFIG: &str = r#"
        [redistribution]
        enabled = false

        [balancing]
        max-iterations = 40
        metric = "score-and-experience"

        [[templates]]
        name = "type1"
        min-members = 4
        max-members = 5
        roles = [
          { name = "Full Stack", min = 2, max = 3 },
          { name = "Tester", min = 1, max = 1 },
          { name = "AI Engineer", min = 1, max = 1 },
        ]
    "#;

    const TEMPLATES: &str = r#"
        [[templates]]
        name = "pair"
        min-members = 2
        max-members = 2
        roles = [{ name = "Dev", min = 2, max = 2 }]
    "#;

    fn base_form_args() -> FormArgs {
        FormArgs {
            input: PathBuf::from("people.csv"),
            config: None,
            templates: None,
            output: None,
            max_iterations: None,
            metric: None,
            no_balance: false,
            no_redistribute: false,
            set_values: vec![],
        }
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn file_values_replace_defaults() {
        let dir = tempdir().unwrap();
        let mut args = base_form_args();
        args.config = Some(write(dir.path(), "teamforge.toml", CONFIG));

        let app = build_config(&args).expect("build ok");
        let cfg = app.core_config;

        assert!(!cfg.redistribute);
        let balancing = cfg.balancing.unwrap();
        assert_eq!(balancing.max_iterations, 40);
        assert_eq!(balancing.metric, BalanceMetric::ScoreAndExperience);
        assert_eq!(cfg.templates.len(), 1);
        assert_eq!(cfg.templates.get("type1").unwrap().max_members(), 5);
        assert_eq!(app.input_path, PathBuf::from("people.csv"));
    }

    #[test]
    fn defaults_apply_when_file_is_silent() {
        let dir = tempdir().unwrap();
        let mut args = base_form_args();
        args.templates = Some(write(dir.path(), "templates.toml", TEMPLATES));

        let cfg = build_config(&args).expect("build ok").core_config;
        let defaults = DefaultsConfig::default();

        assert_eq!(cfg.redistribute, defaults.redistribute);
        let balancing = cfg.balancing.unwrap();
        assert_eq!(balancing.max_iterations, defaults.max_iterations);
        assert_eq!(balancing.metric, defaults.metric);
        assert!(cfg.templates.get("pair").is_some());
    }

    #[test]
    fn cli_flags_override_file_values() {
        let dir = tempdir().unwrap();
        let mut args = base_form_args();
        args.config = Some(write(dir.path(), "teamforge.toml", CONFIG));
        args.templates = Some(write(dir.path(), "templates.toml", TEMPLATES));
        args.max_iterations = Some(7);
        args.metric = Some("score".to_string());

        let cfg = build_config(&args).expect("build ok").core_config;
        let balancing = cfg.balancing.unwrap();
        assert_eq!(balancing.max_iterations, 7);
        assert_eq!(balancing.metric, BalanceMetric::Score);
        assert!(cfg.templates.get("type1").is_none());
        assert!(cfg.templates.get("pair").is_some());

        args.no_balance = true;
        assert!(build_config(&args).unwrap().core_config.balancing.is_none());
    }

    #[test]
    fn set_values_override_file() {
        let dir = tempdir().unwrap();
        let mut args = base_form_args();
        args.config = Some(write(dir.path(), "teamforge.toml", CONFIG));
        args.set_values = vec![
            "balancing.max-iterations=3".to_string(),
            "balancing.metric=score".to_string(),
            "redistribution.enabled=true".to_string(),
        ];

        let cfg = build_config(&args).expect("build ok").core_config;
        assert!(cfg.redistribute);
        let balancing = cfg.balancing.unwrap();
        assert_eq!(balancing.max_iterations, 3);
        assert_eq!(balancing.metric, BalanceMetric::Score);

        args.set_values = vec!["balancing.enabled=false".to_string()];
        assert!(build_config(&args).unwrap().core_config.balancing.is_none());
    }

    #[test]
    fn cli_flag_beats_set_for_redistribution_toggle() {
        let dir = tempdir().unwrap();
        let mut args = base_form_args();
        args.templates = Some(write(dir.path(), "templates.toml", TEMPLATES));
        args.set_values = vec!["redistribution.enabled=true".to_string()];
        args.no_redistribute = true;

        assert!(!build_config(&args).unwrap().core_config.redistribute);
    }

    #[test]
    fn cli_flags_beat_set_values_for_balancing() {
        let dir = tempdir().unwrap();
        let mut args = base_form_args();
        args.config = Some(write(dir.path(), "teamforge.toml", CONFIG));
        args.set_values = vec![
            "balancing.max-iterations=3".to_string(),
            "balancing.metric=score".to_string(),
        ];
        args.max_iterations = Some(9);
        args.metric = Some("score-and-experience".to_string());

        let balancing = build_config(&args).unwrap().core_config.balancing.unwrap();
        assert_eq!(balancing.max_iterations, 9);
        assert_eq!(balancing.metric, BalanceMetric::ScoreAndExperience);
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        let dir = tempdir().unwrap();
        let mut args = base_form_args();
        args.templates = Some(write(dir.path(), "templates.toml", TEMPLATES));

        args.set_values = vec!["balancing.max-iterations".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Argument(msg)) if msg.contains("KEY=VALUE")));

        for bad in ["balancing.max-iterations=lots", "optimization.num-solutions=2"] {
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_config(&args), Err(CliError::Config(_))),
                "{bad} should be rejected"
            );
        }

        args.set_values = vec![];
        args.metric = Some("vibes".to_string());
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn missing_templates_is_a_config_error() {
        let result = build_config(&base_form_args());
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("templates")));
    }

    #[test]
    fn invalid_template_bounds_are_reported() {
        let dir = tempdir().unwrap();
        let mut args = base_form_args();
        args.templates = Some(write(
            dir.path(),
            "templates.toml",
            "[[templates]]\nname = \"t\"\nmin-members = 1\nmax-members = 2\nroles = [{ name = \"A\", min = 3, max = 3 }]\n",
        ));
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }
}
