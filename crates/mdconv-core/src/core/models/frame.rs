use super::units::FrameUnits;
use nalgebra::Vector3;

/// Identity of a single atom as recorded in a structure file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyAtom {
    pub residue_number: isize,
    pub residue_name: String,
    pub atom_name: String,
}

/// Per-atom identities of a simulated system, in file order.
///
/// Coordinates are deliberately not part of the topology; they come from a
/// [`Frame`], which may originate from a different artifact (e.g. a `.trr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    pub title: String,
    pub atoms: Vec<TopologyAtom>,
}

impl Topology {
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// One simulation snapshot: positions and (optionally) velocities of every atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Integration step the frame was written at, when the format records it.
    pub step: Option<i64>,
    /// Simulation time in picoseconds, when the format records it.
    pub time: Option<f64>,
    pub positions: Vec<Vector3<f64>>,
    pub velocities: Option<Vec<Vector3<f64>>>,
    pub units: FrameUnits,
}

impl Frame {
    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Rescales positions to nm and velocities to nm/ps.
    pub fn into_nanometers(mut self) -> Self {
        if self.units.is_canonical() {
            return self;
        }
        let divisor = self.units.length.per_nanometer();
        for p in &mut self.positions {
            *p /= divisor;
        }
        if let Some(velocities) = &mut self.velocities {
            for v in velocities.iter_mut() {
                *v /= divisor;
            }
        }
        self.units = FrameUnits::NANOMETER_PICOSECOND;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(units: FrameUnits) -> Frame {
        Frame {
            step: Some(10),
            time: Some(0.02),
            positions: vec![Vector3::new(10.0, 20.0, -5.0)],
            velocities: Some(vec![Vector3::new(1.0, 0.0, 2.5)]),
            units,
        }
    }

    #[test]
    fn angstrom_frame_is_rescaled_exactly() {
        let converted = frame(FrameUnits::ANGSTROM_PICOSECOND).into_nanometers();
        assert_eq!(converted.units, FrameUnits::NANOMETER_PICOSECOND);
        assert_eq!(converted.positions[0], Vector3::new(1.0, 2.0, -0.5));
        assert_eq!(
            converted.velocities.unwrap()[0],
            Vector3::new(0.1, 0.0, 0.25)
        );
    }

    #[test]
    fn nanometer_frame_is_untouched() {
        let original = frame(FrameUnits::NANOMETER_PICOSECOND);
        assert_eq!(original.clone().into_nanometers(), original);
    }

    #[test]
    fn frame_without_velocities_converts_positions_only() {
        let mut f = frame(FrameUnits::ANGSTROM_PICOSECOND);
        f.velocities = None;
        let converted = f.into_nanometers();
        assert!(converted.velocities.is_none());
        assert_eq!(converted.atom_count(), 1);
    }
}
