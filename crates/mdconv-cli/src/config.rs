mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_config, build_layout};
pub use models::AppConfig;
