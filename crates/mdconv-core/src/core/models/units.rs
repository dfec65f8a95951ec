use std::fmt;

/// Length units a structure or trajectory artifact may natively store coordinates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Nanometer,
    Angstrom,
}

impl LengthUnit {
    /// Number of `self` units in one nanometer. Conversions divide by it.
    #[inline]
    pub const fn per_nanometer(self) -> f64 {
        match self {
            LengthUnit::Nanometer => 1.0,
            LengthUnit::Angstrom => 10.0,
        }
    }

    #[inline]
    pub fn to_nanometers(self, value: f64) -> f64 {
        value / self.per_nanometer()
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Nanometer => "nm",
            LengthUnit::Angstrom => "Å",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The unit pair a frame was recorded in.
///
/// Velocities are always expressed as `length / ps`; only the length part varies
/// between formats, so a single [`LengthUnit`] describes both columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameUnits {
    pub length: LengthUnit,
}

impl FrameUnits {
    pub const NANOMETER_PICOSECOND: Self = Self {
        length: LengthUnit::Nanometer,
    };
    pub const ANGSTROM_PICOSECOND: Self = Self {
        length: LengthUnit::Angstrom,
    };

    pub fn is_canonical(&self) -> bool {
        self.length == LengthUnit::Nanometer
    }
}

impl fmt::Display for FrameUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} and {}/ps", self.length, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angstrom_converts_by_exact_division() {
        assert_eq!(LengthUnit::Angstrom.per_nanometer(), 10.0);
        assert_eq!(LengthUnit::Angstrom.to_nanometers(12.5), 1.25);
        assert_eq!(LengthUnit::Angstrom.to_nanometers(3.0), 3.0 / 10.0);
    }

    #[test]
    fn nanometer_is_identity() {
        assert_eq!(LengthUnit::Nanometer.to_nanometers(0.123), 0.123);
        assert!(FrameUnits::NANOMETER_PICOSECOND.is_canonical());
        assert!(!FrameUnits::ANGSTROM_PICOSECOND.is_canonical());
    }

    #[test]
    fn display_names_velocity_unit() {
        assert_eq!(
            FrameUnits::NANOMETER_PICOSECOND.to_string(),
            "nm and nm/ps"
        );
    }
}
