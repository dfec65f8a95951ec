use crate::core::io::energy::{EnergyLog, EnergyLogError};
use crate::core::io::gro::{GroError, GroFile};
use crate::core::io::traits::{StructureFile, TrajectoryFile};
use crate::core::io::trr::{TrrError, TrrFile};
use crate::core::models::frame::Frame;
use crate::core::models::series::EnergyPair;
use crate::core::selection::AtomSelection;
use nalgebra::Vector3;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error(transparent)]
    Gro(#[from] GroError),
    #[error(transparent)]
    Trr(#[from] TrrError),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Cannot read structure '{path}': {source}", path = path.display())]
    Structure {
        path: PathBuf,
        #[source]
        source: GroError,
    },
    #[error("Cannot read trajectory '{path}': {source}", path = path.display())]
    Trajectory {
        path: PathBuf,
        #[source]
        source: TrajectoryError,
    },
    #[error("Cannot read energy log '{path}': {source}", path = path.display())]
    Energy {
        path: PathBuf,
        #[source]
        source: EnergyLogError,
    },
    #[error("Unsupported {kind} format for '{path}'", path = path.display())]
    UnsupportedFormat { kind: &'static str, path: PathBuf },
    #[error("Trajectory '{path}' contains no frames", path = path.display())]
    NoFrames { path: PathBuf },
    #[error("Final frame of '{path}' has no positions", path = path.display())]
    EmptyFrame { path: PathBuf },
    #[error("Final frame of '{path}' has no velocities", path = path.display())]
    MissingVelocities { path: PathBuf },
    #[error("Structure has {structure} atoms but the trajectory frame has {trajectory}")]
    AtomCountMismatch { structure: usize, trajectory: usize },
    #[error("Atom selection matched no atoms of the structure")]
    EmptySelection,
}

/// The three artifacts one completed simulation run leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    pub structure: PathBuf,
    pub trajectory: PathBuf,
    pub energy_log: PathBuf,
}

/// Final-frame observables of the selected atoms of one run, in nm, nm/ps and the
/// energy log's units.
#[derive(Debug, Clone, PartialEq)]
pub struct RunObservables {
    pub positions: Vec<Vector3<f64>>,
    pub velocities: Vec<Vector3<f64>>,
    pub energies: EnergyPair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrajectoryFormat {
    Trr,
    Gro,
}

impl TrajectoryFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "trr" => Some(TrajectoryFormat::Trr),
            "gro" => Some(TrajectoryFormat::Gro),
            _ => None,
        }
    }
}

fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(expected))
}

/// Reads the terminal state of a run, restricted to a fixed atom selection.
pub struct Extractor<'a> {
    selection: &'a AtomSelection,
}

impl<'a> Extractor<'a> {
    pub fn new(selection: &'a AtomSelection) -> Self {
        Self { selection }
    }

    /// Extracts positions, velocities and energies of the run's final frame.
    ///
    /// # Errors
    ///
    /// Any missing, unreadable or malformed artifact, an empty final frame, or a
    /// selection matching no atoms. No partial result is ever returned.
    pub fn extract(&self, artifacts: &RunArtifacts) -> Result<RunObservables, ExtractError> {
        if !has_extension(&artifacts.structure, "gro") {
            return Err(ExtractError::UnsupportedFormat {
                kind: "structure",
                path: artifacts.structure.clone(),
            });
        }
        let topology = GroFile::read_topology_from_path(&artifacts.structure).map_err(|e| {
            ExtractError::Structure {
                path: artifacts.structure.clone(),
                source: e,
            }
        })?;

        let selected = self.selection.resolve(&topology);
        if selected.is_empty() {
            return Err(ExtractError::EmptySelection);
        }
        trace!(
            "Selected {} of {} atoms from {:?}",
            selected.len(),
            topology.len(),
            &artifacts.structure
        );

        let frame = read_final_frame(&artifacts.trajectory)?.into_nanometers();
        if frame.is_empty() {
            return Err(ExtractError::EmptyFrame {
                path: artifacts.trajectory.clone(),
            });
        }
        if frame.atom_count() != topology.len() {
            return Err(ExtractError::AtomCountMismatch {
                structure: topology.len(),
                trajectory: frame.atom_count(),
            });
        }
        let Some(all_velocities) = frame.velocities else {
            return Err(ExtractError::MissingVelocities {
                path: artifacts.trajectory.clone(),
            });
        };
        debug!(
            "Final frame of {:?}: step {:?}, t = {:?} ps",
            &artifacts.trajectory, frame.step, frame.time
        );

        let positions = selected.iter().map(|&i| frame.positions[i]).collect();
        let velocities = selected.iter().map(|&i| all_velocities[i]).collect();

        let energies =
            EnergyLog::read_from_path(&artifacts.energy_log).map_err(|e| ExtractError::Energy {
                path: artifacts.energy_log.clone(),
                source: e,
            })?;

        Ok(RunObservables {
            positions,
            velocities,
            energies,
        })
    }
}

fn read_final_frame(path: &Path) -> Result<Frame, ExtractError> {
    let format = TrajectoryFormat::from_path(path).ok_or_else(|| ExtractError::UnsupportedFormat {
        kind: "trajectory",
        path: path.to_path_buf(),
    })?;
    let frame = match format {
        TrajectoryFormat::Trr => {
            TrrFile::read_last_frame_from_path(path).map_err(TrajectoryError::from)
        }
        TrajectoryFormat::Gro => {
            GroFile::read_last_frame_from_path(path).map_err(TrajectoryError::from)
        }
    }
    .map_err(|e| ExtractError::Trajectory {
        path: path.to_path_buf(),
        source: e,
    })?;
    frame.ok_or_else(|| ExtractError::NoFrames {
        path: path.to_path_buf(),
    })
}
