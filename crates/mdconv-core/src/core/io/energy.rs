use crate::core::models::series::EnergyPair;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

const EXPECTED_COLUMNS: usize = 2;

#[derive(Debug, Error)]
pub enum EnergyLogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Energy log has no header row")]
    MissingHeader,
    #[error("Energy log has no data row after the header")]
    MissingDataRow,
    #[error("{row} row has {found} columns, expected {EXPECTED_COLUMNS} (kinetic, potential)")]
    ColumnCount { row: &'static str, found: usize },
    #[error("Non-numeric {column} energy: '{value}'")]
    NonNumeric { column: &'static str, value: String },
}

/// Two-column, comma-delimited energy log: a header row followed by one
/// `kinetic,potential` row. Any further rows are ignored.
pub struct EnergyLog;

impl EnergyLog {
    pub fn read_from(reader: impl Read) -> Result<EnergyPair, EnergyLogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header_len = csv_reader.headers()?.len();
        if header_len == 0 {
            return Err(EnergyLogError::MissingHeader);
        }
        if header_len != EXPECTED_COLUMNS {
            return Err(EnergyLogError::ColumnCount {
                row: "header",
                found: header_len,
            });
        }

        let record = csv_reader
            .records()
            .next()
            .ok_or(EnergyLogError::MissingDataRow)??;
        if record.len() != EXPECTED_COLUMNS {
            return Err(EnergyLogError::ColumnCount {
                row: "data",
                found: record.len(),
            });
        }

        let cell = |index: usize, column: &'static str| -> Result<f64, EnergyLogError> {
            let raw = record.get(index).unwrap_or("");
            raw.parse().map_err(|_| EnergyLogError::NonNumeric {
                column,
                value: raw.to_string(),
            })
        };

        Ok(EnergyPair {
            kinetic: cell(0, "kinetic")?,
            potential: cell(1, "potential")?,
        })
    }

    pub fn read_from_path(path: &Path) -> Result<EnergyPair, EnergyLogError> {
        let file = std::fs::File::open(path)?;
        Self::read_from(file)
    }
}
