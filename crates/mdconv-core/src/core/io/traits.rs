use crate::core::models::frame::{Frame, Topology};
use crate::core::models::units::FrameUnits;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// A file format that carries per-atom identities (residue and atom names).
pub trait StructureFile {
    /// The error type for parsing operations.
    type Error: Error + From<io::Error>;

    /// Reads the topology from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_topology_from(reader: &mut impl BufRead) -> Result<Topology, Self::Error>;

    /// Reads the topology from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_topology_from_path<P: AsRef<Path>>(path: P) -> Result<Topology, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_topology_from(&mut reader)
    }
}

/// A file format holding one or more coordinate frames.
///
/// Convergence studies only look at the terminal state of a run, so the trait
/// exposes the last frame alone; implementors stream through earlier frames and
/// drop them as soon as the next one has been read.
pub trait TrajectoryFile {
    /// The error type for parsing operations.
    type Error: Error + From<io::Error>;

    /// The units positions and velocities are stored in.
    ///
    /// Must be the format's true storage units: the extractor rescales frames to
    /// nm and nm/ps from this value alone, so a wrong declaration silently skews
    /// every observable.
    const NATIVE_UNITS: FrameUnits;

    /// Reads every frame and returns the last one, or `None` for an empty stream.
    ///
    /// # Errors
    ///
    /// Returns an error if any frame is malformed or truncated.
    fn read_last_frame_from(reader: &mut impl BufRead) -> Result<Option<Frame>, Self::Error>;

    /// Reads the last frame from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_last_frame_from_path<P: AsRef<Path>>(path: P) -> Result<Option<Frame>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_last_frame_from(&mut reader)
    }
}
