use super::sweep::{GroupOutcome, GroupReport, GroupTables, SweepIndex};
use crate::engine::energy_table::EnergyTable;
use crate::engine::richardson::{Availability, Estimate, RichardsonTable};
use serde::Deserialize;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;

const STEP_COLUMN_WIDTH: usize = 10;
const CELL_WIDTH: usize = 16;
const TEXT_PRECISION: usize = 6;

const CONVERGENCE_COLUMNS: [&str; 6] = ["time-step", "A_h", "F_h", "E_h", "p_obs", "A_extrap"];
const ENERGY_COLUMNS: [&str; 3] = ["time-step", "kinetic", "potential"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error while writing report: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error while writing report: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Header line followed by right-aligned columns.
    #[default]
    Text,
    /// One CSV block per table, blocks separated by an empty line.
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!(
                "Unknown output format '{}' (expected text or csv)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Csv => f.write_str("csv"),
        }
    }
}

/// One table of a group together with the parameter it describes.
enum Section<'a> {
    Convergence {
        parameter: &'static str,
        table: &'a RichardsonTable,
    },
    Energies(&'a EnergyTable),
}

impl Section<'_> {
    fn parameter(&self) -> String {
        match self {
            Section::Convergence { parameter, table } => {
                format!("{} [{}]", parameter, table.observable)
            }
            Section::Energies(_) => "energies".to_string(),
        }
    }
}

fn sections(tables: &GroupTables) -> Vec<Section<'_>> {
    let mut sections = Vec::new();
    sections.extend(tables.positions.iter().map(|table| Section::Convergence {
        parameter: "positions",
        table,
    }));
    sections.extend(tables.velocities.iter().map(|table| Section::Convergence {
        parameter: "velocities",
        table,
    }));
    sections.push(Section::Energies(&tables.energies));
    if let Some(table) = &tables.energy_convergence {
        sections.push(Section::Convergence {
            parameter: "energy",
            table,
        });
    }
    sections
}

fn group_header(report: &GroupReport) -> String {
    format!(
        "Force field: {} | Tolerance: {}",
        report.force_field, report.tolerance
    )
}

/// Writes every group of a sweep, in the order given.
pub fn write_reports(
    out: &mut impl Write,
    reports: &[GroupReport],
    format: OutputFormat,
) -> Result<(), ReportError> {
    for report in reports {
        match format {
            OutputFormat::Text => write_group_text(out, report)?,
            OutputFormat::Csv => write_group_csv(out, report)?,
        }
    }
    out.flush()?;
    Ok(())
}

fn write_group_text(out: &mut impl Write, report: &GroupReport) -> Result<(), ReportError> {
    let header = group_header(report);
    let tables = match &report.outcome {
        GroupOutcome::Tables(tables) => tables,
        GroupOutcome::Failed(reason) => {
            writeln!(out, "{} | FAILED: {}", header, reason)?;
            writeln!(out)?;
            return Ok(());
        }
    };

    for section in sections(tables) {
        writeln!(out, "{} | Parameter: {}", header, section.parameter())?;
        match section {
            Section::Convergence { table, .. } => write_convergence_text(out, table)?,
            Section::Energies(table) => write_energy_text(out, table)?,
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_text_row(out: &mut impl Write, step: &str, cells: &[String]) -> io::Result<()> {
    write!(out, "{:>w$}", step, w = STEP_COLUMN_WIDTH)?;
    for cell in cells {
        write!(out, " {:>w$}", cell, w = CELL_WIDTH)?;
    }
    writeln!(out)
}

fn text_number(value: f64) -> String {
    format!("{:.*e}", TEXT_PRECISION, value)
}

fn text_estimate(estimate: Estimate) -> String {
    format!("{:.*}", TEXT_PRECISION, estimate)
}

fn write_convergence_text(out: &mut impl Write, table: &RichardsonTable) -> io::Result<()> {
    let titles: Vec<String> = CONVERGENCE_COLUMNS[1..].iter().map(|s| s.to_string()).collect();
    write_text_row(out, CONVERGENCE_COLUMNS[0], &titles)?;
    for row in &table.rows {
        write_text_row(
            out,
            &row.step_size.to_string(),
            &[
                text_number(row.value),
                text_estimate(row.ratio),
                text_estimate(row.error_estimate),
                text_estimate(row.observed_order),
                text_estimate(row.extrapolated),
            ],
        )?;
    }

    for (column, availability) in [
        ("F_h", table.ratio_availability),
        ("E_h", table.error_availability),
    ] {
        if let Availability::InsufficientData {
            required,
            available,
        } = availability
        {
            writeln!(
                out,
                "note: {} needs at least {} step sizes ({} available); undefined cells read 0",
                column, required, available
            )?;
        }
    }
    if table.has_degenerate_cells() {
        writeln!(
            out,
            "note: some cells are degenerate (equal successive values or non-finite result)"
        )?;
    }
    Ok(())
}

fn write_energy_text(out: &mut impl Write, table: &EnergyTable) -> io::Result<()> {
    let titles: Vec<String> = ENERGY_COLUMNS[1..].iter().map(|s| s.to_string()).collect();
    write_text_row(out, ENERGY_COLUMNS[0], &titles)?;
    for row in &table.rows {
        write_text_row(
            out,
            &row.step_size.to_string(),
            &[text_number(row.kinetic), text_number(row.potential)],
        )?;
    }
    Ok(())
}

fn write_group_csv(out: &mut impl Write, report: &GroupReport) -> Result<(), ReportError> {
    let tolerance = report.tolerance.to_string();
    let tables = match &report.outcome {
        GroupOutcome::Tables(tables) => tables,
        GroupOutcome::Failed(reason) => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(["force_field", "tolerance", "status"])?;
            writer.write_record([
                report.force_field.as_str(),
                tolerance.as_str(),
                format!("failed: {}", reason).as_str(),
            ])?;
            writer.flush()?;
            drop(writer);
            writeln!(out)?;
            return Ok(());
        }
    };

    for section in sections(tables) {
        let parameter = section.parameter();
        let context = [
            report.force_field.as_str(),
            tolerance.as_str(),
            parameter.as_str(),
        ];
        let mut writer = csv::Writer::from_writer(&mut *out);
        match section {
            Section::Convergence { table, .. } => {
                writer.write_record(
                    ["force_field", "tolerance", "parameter"]
                        .iter()
                        .chain(CONVERGENCE_COLUMNS.iter()),
                )?;
                for row in &table.rows {
                    let cells = [
                        row.step_size.to_string(),
                        row.value.to_string(),
                        row.ratio.to_string(),
                        row.error_estimate.to_string(),
                        row.observed_order.to_string(),
                        row.extrapolated.to_string(),
                    ];
                    writer.write_record(context.iter().copied().chain(cells.iter().map(String::as_str)))?;
                }
            }
            Section::Energies(table) => {
                writer.write_record(
                    ["force_field", "tolerance", "parameter"]
                        .iter()
                        .chain(ENERGY_COLUMNS.iter()),
                )?;
                for row in &table.rows {
                    let cells = [
                        row.step_size.to_string(),
                        row.kinetic.to_string(),
                        row.potential.to_string(),
                    ];
                    writer.write_record(context.iter().copied().chain(cells.iter().map(String::as_str)))?;
                }
            }
        }
        writer.flush()?;
        drop(writer);
        writeln!(out)?;
    }
    Ok(())
}

/// Prints the discovered sweep tree without reading any run.
pub fn write_index(out: &mut impl Write, index: &SweepIndex) -> io::Result<()> {
    writeln!(out, "Sweep root: {}", index.root.display())?;
    for ff in &index.force_fields {
        writeln!(out, "{}", ff.name)?;
        for tol in &ff.tolerances {
            writeln!(
                out,
                "  {} (tolerance {}, {} step size(s))",
                tol.label,
                tol.tolerance,
                tol.runs.len()
            )?;
            for run in &tol.runs {
                writeln!(
                    out,
                    "    h = {:<10} {}",
                    run.step_size.to_string(),
                    run.dir.display()
                )?;
            }
        }
    }
    writeln!(
        out,
        "{} group(s), {} run(s)",
        index.group_count(),
        index.run_count()
    )?;
    out.flush()
}
