use crate::error::{CliError, Result};
use mdconv::core::selection::AtomSelection;
use mdconv::engine::config::SweepLayout;
use mdconv::engine::projection::Probe;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLayoutConfig {
    pub tolerance_prefix: Option<String>,
    pub step_size_prefix: Option<String>,
    pub structure_file: Option<String>,
    pub trajectory_file: Option<String>,
    pub energy_file: Option<String>,
}

impl FileLayoutConfig {
    pub fn merge_onto(self, base: SweepLayout) -> SweepLayout {
        SweepLayout {
            tolerance_prefix: self.tolerance_prefix.unwrap_or(base.tolerance_prefix),
            step_size_prefix: self.step_size_prefix.unwrap_or(base.step_size_prefix),
            structure_file: self.structure_file.unwrap_or(base.structure_file),
            trajectory_file: self.trajectory_file.unwrap_or(base.trajectory_file),
            energy_file: self.energy_file.unwrap_or(base.energy_file),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileRichardsonConfig {
    pub order: Option<u32>,
    pub refinement_ratio: Option<f64>,
    pub probes: Option<Vec<Probe>>,
    pub energy_component: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileReportConfig {
    pub format: Option<String>,
    pub on_failure: Option<String>,
    pub parallel: Option<bool>,
}

/// Every section and key is optional; whatever is missing falls back to the CLI
/// flags and then to [`DefaultsConfig`](super::defaults::DefaultsConfig).
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub layout: Option<FileLayoutConfig>,
    pub selection: Option<AtomSelection>,
    pub richardson: Option<FileRichardsonConfig>,
    pub report: Option<FileReportConfig>,
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
    use mdconv::engine::projection::Axis;

    #[test]
    fn parses_full_file() {
        let config: FileConfig = toml::from_str(
            r#"
            [layout]
            tolerance-prefix = "rtol"
            energy-file = "energies.csv"

            [selection]
            type = "residues"
            include = ["LYS", "ALA"]

            [richardson]
            order = 4
            refinement-ratio = 2.0
            probes = [{ atom = 0, axis = "x" }, { atom = 2, axis = "z" }]
            energy-component = "potential"

            [report]
            format = "csv"
            on-failure = "skip-group"
            parallel = true
            "#,
        )
        .unwrap();

        let layout = config.layout.unwrap().merge_onto(SweepLayout::default());
        assert_eq!(layout.tolerance_prefix, "rtol");
        assert_eq!(layout.step_size_prefix, "ts");
        assert_eq!(layout.energy_file, "energies.csv");
        assert_eq!(
            config.selection,
            Some(AtomSelection::Residues {
                include: vec!["LYS".into(), "ALA".into()]
            })
        );

        let richardson = config.richardson.unwrap();
        assert_eq!(richardson.order, Some(4));
        assert_eq!(
            richardson.probes.unwrap()[1],
            Probe {
                atom: 2,
                axis: Axis::Z
            }
        );
        assert_eq!(config.report.unwrap().on_failure.as_deref(), Some("skip-group"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<FileConfig, _> = toml::from_str("[richardson]\nordr = 2\n");
        assert!(result.is_err());
        let result: std::result::Result<FileConfig, _> = toml::from_str("[plotting]\n");
        assert!(result.is_err());
    }

    #[test]
    fn from_file_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[layout\n").unwrap();
        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
        assert!(matches!(
            FileConfig::from_file(&dir.path().join("missing.toml")),
            Err(CliError::Io(_))
        ));
    }
}
