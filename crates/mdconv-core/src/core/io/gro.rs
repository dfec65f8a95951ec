use crate::core::io::traits::{StructureFile, TrajectoryFile};
use crate::core::models::frame::{Frame, Topology, TopologyAtom};
use crate::core::models::units::FrameUnits;
use nalgebra::Vector3;
use std::io::{self, BufRead};
use thiserror::Error;

const COORDINATES_START: usize = 20;
const DEFAULT_FIELD_WIDTH: usize = 8;

#[derive(Debug, Error)]
pub enum GroError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: GroParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum GroParseErrorKind {
    #[error("Invalid integer in {field} (value: '{value}')")]
    InvalidInt { field: &'static str, value: String },
    #[error("Invalid float in {field} (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
    #[error("Atom line is too short (need at least {expected} chars, found {found})")]
    LineTooShort { expected: usize, found: usize },
    #[error("Box line must hold 3 or 9 numbers")]
    InvalidBox,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

/// GROMACS `.gro` files: a title, an atom count, one fixed-column line per atom
/// and a box line. Several such blocks back to back form a trajectory.
pub struct GroFile;

struct GroBlock {
    topology: Topology,
    frame: Frame,
}

struct LineCursor<'a, R: BufRead> {
    lines: io::Lines<&'a mut R>,
    line_num: usize,
}

impl<'a, R: BufRead> LineCursor<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        Self {
            lines: reader.lines(),
            line_num: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, GroError> {
        match self.lines.next() {
            Some(line) => {
                self.line_num += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    fn require_line(&mut self, what: &str) -> Result<String, GroError> {
        self.next_line()?
            .ok_or_else(|| GroError::MissingRecord(format!("{} (after line {})", what, self.line_num)))
    }
}

const MAX_PREALLOCATED_ATOMS: usize = 4096;

impl GroFile {
    fn read_block<R: BufRead>(cursor: &mut LineCursor<'_, R>) -> Result<Option<GroBlock>, GroError> {
        let title = loop {
            match cursor.next_line()? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
            }
        };
        let (time, step) = parse_title_annotations(&title);

        let count_line = cursor.require_line("atom count")?;
        let count_str = count_line.trim();
        let natoms: usize = count_str.parse().map_err(|_| GroError::Parse {
            line: cursor.line_num,
            kind: GroParseErrorKind::InvalidInt {
                field: "atom count",
                value: count_str.into(),
            },
        })?;

        // The count is untrusted until that many records have actually been read.
        let capacity = natoms.min(MAX_PREALLOCATED_ATOMS);
        let mut atoms = Vec::with_capacity(capacity);
        let mut positions = Vec::with_capacity(capacity);
        let mut velocities = Vec::with_capacity(capacity);
        let mut detected_layout: Option<FieldLayout> = None;

        for _ in 0..natoms {
            let line = cursor.require_line("atom record")?;
            let line_num = cursor.line_num;
            let layout = *detected_layout.get_or_insert_with(|| FieldLayout::detect(&line));
            let (atom, position, velocity) = parse_atom_line(&line, line_num, layout)?;
            atoms.push(atom);
            positions.push(position);
            if let Some(v) = velocity {
                velocities.push(v);
            }
        }

        if !velocities.is_empty() && velocities.len() != natoms {
            return Err(GroError::Inconsistency(format!(
                "{} of {} atoms carry velocities; expected all or none",
                velocities.len(),
                natoms
            )));
        }

        let box_line = cursor.require_line("box vectors")?;
        let box_values: Result<Vec<f64>, _> =
            box_line.split_whitespace().map(str::parse::<f64>).collect();
        match box_values {
            Ok(values) if values.len() == 3 || values.len() == 9 => {}
            _ => {
                return Err(GroError::Parse {
                    line: cursor.line_num,
                    kind: GroParseErrorKind::InvalidBox,
                });
            }
        }

        Ok(Some(GroBlock {
            topology: Topology {
                title: title.trim().to_string(),
                atoms,
            },
            frame: Frame {
                step,
                time,
                positions,
                velocities: (!velocities.is_empty()).then_some(velocities),
                units: Self::NATIVE_UNITS,
            },
        }))
    }
}

impl StructureFile for GroFile {
    type Error = GroError;

    fn read_topology_from(reader: &mut impl BufRead) -> Result<Topology, Self::Error> {
        let mut cursor = LineCursor::new(reader);
        Self::read_block(&mut cursor)?
            .map(|block| block.topology)
            .ok_or_else(|| GroError::MissingRecord("title line".into()))
    }
}

impl TrajectoryFile for GroFile {
    type Error = GroError;

    const NATIVE_UNITS: FrameUnits = FrameUnits::NANOMETER_PICOSECOND;

    fn read_last_frame_from(reader: &mut impl BufRead) -> Result<Option<Frame>, Self::Error> {
        let mut cursor = LineCursor::new(reader);
        let mut last = None;
        let mut expected_atoms = None;
        while let Some(block) = Self::read_block(&mut cursor)? {
            let natoms = block.frame.atom_count();
            if *expected_atoms.get_or_insert(natoms) != natoms {
                return Err(GroError::Inconsistency(format!(
                    "frame ending at line {} has {} atoms, earlier frames have {}",
                    cursor.line_num,
                    natoms,
                    expected_atoms.unwrap_or_default()
                )));
            }
            last = Some(block.frame);
        }
        Ok(last)
    }
}

/// Width of the coordinate and velocity fields, derived from the spacing of the
/// decimal points on the first atom line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldLayout {
    width: usize,
}

impl FieldLayout {
    fn detect(line: &str) -> Self {
        let tail = line.get(COORDINATES_START..).unwrap_or("");
        let mut dots = tail.match_indices('.').map(|(i, _)| i);
        let width = match (dots.next(), dots.next()) {
            (Some(first), Some(second)) if second > first => second - first,
            _ => DEFAULT_FIELD_WIDTH,
        };
        Self { width }
    }

    fn position_end(&self) -> usize {
        COORDINATES_START + 3 * self.width
    }
}

fn parse_atom_line(
    line: &str,
    line_num: usize,
    layout: FieldLayout,
) -> Result<(TopologyAtom, Vector3<f64>, Option<Vector3<f64>>), GroError> {
    let position_end = layout.position_end();
    if line.len() < position_end {
        return Err(GroError::Parse {
            line: line_num,
            kind: GroParseErrorKind::LineTooShort {
                expected: position_end,
                found: line.len(),
            },
        });
    }

    let res_num_str = slice_and_trim(line, 0, 5);
    let residue_number: isize = res_num_str.parse().map_err(|_| GroError::Parse {
        line: line_num,
        kind: GroParseErrorKind::InvalidInt {
            field: "residue number",
            value: res_num_str.into(),
        },
    })?;
    let atom = TopologyAtom {
        residue_number,
        residue_name: slice_and_trim(line, 5, 10).to_string(),
        atom_name: slice_and_trim(line, 10, 15).to_string(),
    };

    let field = |start: usize, width: usize, name: &'static str| -> Result<f64, GroError> {
        let raw = slice_and_trim(line, start, start + width);
        raw.parse().map_err(|_| GroError::Parse {
            line: line_num,
            kind: GroParseErrorKind::InvalidFloat {
                field: name,
                value: raw.into(),
            },
        })
    };

    let w = layout.width;
    let position = Vector3::new(
        field(COORDINATES_START, w, "x")?,
        field(COORDINATES_START + w, w, "y")?,
        field(COORDINATES_START + 2 * w, w, "z")?,
    );

    // Velocities use the same field width with one extra decimal.
    let vw = w;
    let has_velocity = line
        .get(position_end..)
        .is_some_and(|rest| !rest.trim().is_empty());
    let velocity = if has_velocity {
        Some(Vector3::new(
            field(position_end, vw, "vx")?,
            field(position_end + vw, vw, "vy")?,
            field(position_end + 2 * vw, vw, "vz")?,
        ))
    } else {
        None
    };

    Ok((atom, position, velocity))
}

/// Extracts `t=` and `step=` annotations that `gmx trjconv` writes into titles.
fn parse_title_annotations(title: &str) -> (Option<f64>, Option<i64>) {
    let mut time = None;
    let mut step = None;
    let mut tokens = title.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        if let Some(rest) = token.strip_prefix("t=") {
            let value = if rest.is_empty() { tokens.next() } else { Some(rest) };
            time = value.and_then(|v| v.parse().ok());
        } else if let Some(rest) = token.strip_prefix("step=") {
            let value = if rest.is_empty() { tokens.next() } else { Some(rest) };
            step = value.and_then(|v| v.parse().ok());
        }
    }
    (time, step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_FRAMES: &str = "\
Lysozyme in water t=   0.00000 step= 0
    3
    1LYS      N    1   1.000   2.000   3.000  0.1000  0.2000  0.3000
    1LYS     CA    2   1.100   2.100   3.100  0.1100  0.2100  0.3100
    2SOL     OW    3   5.000   5.000   5.000  0.0000  0.0000  0.0000
   7.00000   7.00000   7.00000
Lysozyme in water t=   0.02000 step= 10
    3
    1LYS      N    1   1.010   2.020   3.030  0.1500  0.2500  0.3500
    1LYS     CA    2   1.110   2.120   3.130  0.1600  0.2600  0.3600
    2SOL     OW    3   5.010   5.010   5.010  0.0100  0.0100  0.0100
   7.00000   7.00000   7.00000
";

    #[test]
    fn topology_reads_names_from_first_block() {
        let topo = GroFile::read_topology_from(&mut Cursor::new(TWO_FRAMES)).unwrap();
        assert_eq!(topo.len(), 3);
        assert_eq!(topo.atoms[0].residue_name, "LYS");
        assert_eq!(topo.atoms[1].atom_name, "CA");
        assert_eq!(topo.atoms[2].residue_name, "SOL");
        assert_eq!(topo.atoms[2].residue_number, 2);
    }

    #[test]
    fn last_frame_is_kept_and_earlier_frames_dropped() {
        let frame = GroFile::read_last_frame_from(&mut Cursor::new(TWO_FRAMES))
            .unwrap()
            .unwrap();
        assert_eq!(frame.step, Some(10));
        assert_eq!(frame.time, Some(0.02));
        assert_eq!(frame.positions[0], Vector3::new(1.010, 2.020, 3.030));
        let velocities = frame.velocities.unwrap();
        assert_eq!(velocities[1], Vector3::new(0.16, 0.26, 0.36));
        assert_eq!(frame.units, FrameUnits::NANOMETER_PICOSECOND);
    }

    #[test]
    fn high_precision_columns_are_detected() {
        let text = "\
hi-res
    1
    1ALA     CA    1   1.23456   2.34567   3.45678  0.123456  0.234567  0.345678
   1.0 1.0 1.0
";
        let frame = GroFile::read_last_frame_from(&mut Cursor::new(text))
            .unwrap()
            .unwrap();
        assert_eq!(frame.positions[0], Vector3::new(1.23456, 2.34567, 3.45678));
        assert_eq!(
            frame.velocities.unwrap()[0],
            Vector3::new(0.123456, 0.234567, 0.345678)
        );
    }

    #[test]
    fn positions_only_file_has_no_velocities() {
        let text = "\
no velocities
    1
    1ALA     CA    1   1.000   2.000   3.000
   1.0 1.0 1.0
";
        let frame = GroFile::read_last_frame_from(&mut Cursor::new(text))
            .unwrap()
            .unwrap();
        assert!(frame.velocities.is_none());
        assert_eq!(frame.time, None);
    }

    #[test]
    fn empty_input_yields_no_frame() {
        let frame = GroFile::read_last_frame_from(&mut Cursor::new("")).unwrap();
        assert!(frame.is_none());
        assert!(matches!(
            GroFile::read_topology_from(&mut Cursor::new("")),
            Err(GroError::MissingRecord(_))
        ));
    }

    #[test]
    fn truncated_block_is_missing_record() {
        let text = "title\n    2\n    1ALA     CA    1   1.000   2.000   3.000\n";
        assert!(matches!(
            GroFile::read_last_frame_from(&mut Cursor::new(text)),
            Err(GroError::MissingRecord(_))
        ));
    }

    #[test]
    fn huge_atom_count_is_missing_record() {
        let text = "title\n99999999999999\n    1ALA     CA    1   1.000   2.000   3.000\n";
        assert!(matches!(
            GroFile::read_topology_from(&mut Cursor::new(text)),
            Err(GroError::MissingRecord(_))
        ));
    }

    #[test]
    fn non_numeric_coordinate_is_parse_error() {
        let text = "title\n    1\n    1ALA     CA    1   1.000   2.0x0   3.000\n 1 1 1\n";
        let err = GroFile::read_last_frame_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            GroError::Parse {
                line: 3,
                kind: GroParseErrorKind::InvalidFloat { field: "y", .. }
            }
        ));
    }

    #[test]
    fn bad_atom_count_is_parse_error() {
        let text = "title\n  many\n";
        assert!(matches!(
            GroFile::read_last_frame_from(&mut Cursor::new(text)),
            Err(GroError::Parse {
                line: 2,
                kind: GroParseErrorKind::InvalidInt { .. }
            })
        ));
    }

    #[test]
    fn bad_box_line_is_rejected() {
        let text = "title\n    1\n    1ALA     CA    1   1.000   2.000   3.000\n 1 1\n";
        assert!(matches!(
            GroFile::read_last_frame_from(&mut Cursor::new(text)),
            Err(GroError::Parse {
                kind: GroParseErrorKind::InvalidBox,
                ..
            })
        ));
    }

    #[test]
    fn mixed_velocity_presence_is_inconsistent() {
        let text = "\
title
    2
    1ALA     CA    1   1.000   2.000   3.000  0.1000  0.2000  0.3000
    1ALA     CB    2   1.000   2.000   3.000
 1 1 1
";
        assert!(matches!(
            GroFile::read_last_frame_from(&mut Cursor::new(text)),
            Err(GroError::Inconsistency(_))
        ));
    }

    #[test]
    fn changing_atom_count_between_frames_is_inconsistent() {
        let text = "\
a
    1
    1ALA     CA    1   1.000   2.000   3.000
 1 1 1
b
    2
    1ALA     CA    1   1.000   2.000   3.000
    1ALA     CB    2   1.000   2.000   3.000
 1 1 1
";
        assert!(matches!(
            GroFile::read_last_frame_from(&mut Cursor::new(text)),
            Err(GroError::Inconsistency(_))
        ));
    }

    #[test]
    fn title_annotations_accept_attached_values() {
        assert_eq!(
            parse_title_annotations("Generated t=12.5 step=6250"),
            (Some(12.5), Some(6250))
        );
        assert_eq!(parse_title_annotations("plain title"), (None, None));
    }
}
