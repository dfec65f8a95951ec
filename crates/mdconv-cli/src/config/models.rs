use mdconv::engine::config::StudyConfig;
use mdconv::workflows::report::OutputFormat;
use std::path::PathBuf;

pub struct AppConfig {
    pub root: PathBuf,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub study: StudyConfig,
}
