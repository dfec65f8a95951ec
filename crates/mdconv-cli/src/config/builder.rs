use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::ReportArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use mdconv::core::selection::AtomSelection;
use mdconv::engine::config::{FailurePolicy, RichardsonParams, StudyConfigBuilder, SweepLayout};
use mdconv::engine::projection::EnergyComponent;
use mdconv::workflows::report::OutputFormat;
use std::path::Path;
use tracing::debug;

/// Merges the optional config file, `--set` overrides and CLI flags into the final
/// configuration. Precedence: CLI flags, then `--set`, then the file, then defaults.
pub fn build_config(args: &ReportArgs, threads: Option<usize>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let layout = file_config
        .layout
        .take()
        .unwrap_or_default()
        .merge_onto(defaults.layout);

    let selection = if args.all_atoms {
        AtomSelection::All
    } else {
        file_config.selection.take().unwrap_or(defaults.selection)
    };

    let richardson_file = file_config.richardson.take().unwrap_or_default();
    let order = args
        .order
        .or(richardson_file.order)
        .unwrap_or(defaults.order);
    let refinement_ratio = args
        .ratio
        .or(richardson_file.refinement_ratio)
        .unwrap_or(defaults.refinement_ratio);
    let richardson = RichardsonParams::new(order, refinement_ratio)
        .map_err(|e| CliError::Config(e.to_string()))?;

    let probes = if args.probes.is_empty() {
        richardson_file.probes.unwrap_or(defaults.probes)
    } else {
        args.probes
            .iter()
            .map(|p| parser::parse_probe(p))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| CliError::Argument(e.to_string()))?
    };

    let energy_component = args
        .energy_component
        .as_deref()
        .or(richardson_file.energy_component.as_deref())
        .map(str::parse::<EnergyComponent>)
        .transpose()
        .map_err(CliError::Argument)?;

    let report_file = file_config.report.take().unwrap_or_default();
    let format = match args.format.as_deref().or(report_file.format.as_deref()) {
        Some(name) => name.parse::<OutputFormat>().map_err(CliError::Argument)?,
        None => defaults.format,
    };

    let failure_policy = if args.skip_failed_groups {
        FailurePolicy::SkipGroup
    } else {
        match report_file.on_failure.as_deref() {
            Some(name) => {
                parser::parse_failure_policy(name).map_err(|e| CliError::Config(e.to_string()))?
            }
            None => defaults.failure_policy,
        }
    };

    let parallel = match threads {
        Some(n) => n != 1,
        None => report_file.parallel.unwrap_or(defaults.parallel),
    };

    let study = StudyConfigBuilder::new()
        .layout(layout)
        .selection(selection)
        .richardson(richardson)
        .probes(probes)
        .energy_component(energy_component)
        .failure_policy(failure_policy)
        .parallel(parallel)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    debug!("Final study configuration: {:?}", &study);

    Ok(AppConfig {
        root: args.root.clone(),
        output: args.output.clone(),
        format,
        study,
    })
}

/// Sweep naming convention from an optional config file, for commands that only walk
/// the directory tree.
pub fn build_layout(config_path: Option<&Path>) -> Result<SweepLayout> {
    let file_config = match config_path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    Ok(file_config
        .layout
        .unwrap_or_default()
        .merge_onto(DefaultsConfig::default().layout))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;
        let key = key.trim();
        let value_str = value_str.trim();

        let invalid = |kind: &str| {
            CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
        };

        match key {
            "layout.tolerance-prefix"
            | "layout.step-size-prefix"
            | "layout.structure-file"
            | "layout.trajectory-file"
            | "layout.energy-file" => {
                let layout = config.layout.get_or_insert_with(Default::default);
                let slot = match key {
                    "layout.tolerance-prefix" => &mut layout.tolerance_prefix,
                    "layout.step-size-prefix" => &mut layout.step_size_prefix,
                    "layout.structure-file" => &mut layout.structure_file,
                    "layout.trajectory-file" => &mut layout.trajectory_file,
                    _ => &mut layout.energy_file,
                };
                *slot = Some(value_str.to_string());
            }
            "richardson.order" => {
                config.richardson.get_or_insert_with(Default::default).order =
                    Some(value_str.parse().map_err(|_| invalid("integer"))?);
            }
            "richardson.refinement-ratio" => {
                config
                    .richardson
                    .get_or_insert_with(Default::default)
                    .refinement_ratio = Some(value_str.parse().map_err(|_| invalid("float"))?);
            }
            "richardson.energy-component" => {
                config
                    .richardson
                    .get_or_insert_with(Default::default)
                    .energy_component = Some(value_str.to_string());
            }
            "report.format" => {
                config.report.get_or_insert_with(Default::default).format =
                    Some(value_str.to_string());
            }
            "report.on-failure" => {
                config.report.get_or_insert_with(Default::default).on_failure =
                    Some(value_str.to_string());
            }
            "report.parallel" => {
                config.report.get_or_insert_with(Default::default).parallel =
                    Some(value_str.parse().map_err(|_| invalid("boolean"))?);
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
