use std::path::PathBuf;
use teamforge::engine::config::FormationConfig;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub core_config: FormationConfig,
}
