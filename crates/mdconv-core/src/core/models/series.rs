use nalgebra::Vector3;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("Step size must be a positive, finite number (got {0})")]
    InvalidStepSize(f64),
    #[error("Could not parse '{0}' as a step size")]
    Unparsable(String),
    #[error("Duplicate step size {0} in series")]
    DuplicateStepSize(StepSize),
}

/// A positive, finite integration step size `h`.
///
/// The wrapper gives step sizes a total order so they can be sorted and compared
/// as keys without ever touching NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSize(f64);

impl StepSize {
    pub fn new(value: f64) -> Result<Self, SeriesError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(SeriesError::InvalidStepSize(value))
        }
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Eq for StepSize {}

impl PartialOrd for StepSize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StepSize {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl FromStr for StepSize {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| SeriesError::Unparsable(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for StepSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinetic and potential energy of one run, in the units of the energy log (kJ/mol).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyPair {
    pub kinetic: f64,
    pub potential: f64,
}

/// Observed values keyed by step size, one entry per run of a sweep group.
///
/// Insertion order is irrelevant and not preserved in any meaningful way;
/// consumers that need an order ask for it explicitly via [`descending`](Self::descending).
#[derive(Debug, Clone, PartialEq)]
pub struct StepSizeSeries<V> {
    entries: Vec<(StepSize, V)>,
}

impl<V> Default for StepSizeSeries<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> StepSizeSeries<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a series from `(h, value)` pairs, failing on the first repeated step size.
    pub fn try_from_entries<I>(entries: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (StepSize, V)>,
    {
        let mut series = Self::new();
        for (h, value) in entries {
            series.insert(h, value)?;
        }
        Ok(series)
    }

    /// Adds the observation made at step size `h`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::DuplicateStepSize`] if `h` is already present; a group
    /// holds exactly one run per step size.
    pub fn insert(&mut self, h: StepSize, value: V) -> Result<(), SeriesError> {
        if self.contains(h) {
            return Err(SeriesError::DuplicateStepSize(h));
        }
        self.entries.push((h, value));
        Ok(())
    }

    pub fn contains(&self, h: StepSize) -> bool {
        self.entries.iter().any(|(k, _)| *k == h)
    }

    pub fn get(&self, h: StepSize) -> Option<&V> {
        self.entries.iter().find(|(k, _)| *k == h).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted from the coarsest to the finest step size.
    pub fn descending(&self) -> Vec<(StepSize, &V)> {
        let mut sorted: Vec<_> = self.entries.iter().map(|(h, v)| (*h, v)).collect();
        sorted.sort_by(|a, b| b.0.cmp(&a.0));
        sorted
    }
}

/// Per-atom coordinate triples (positions or velocities) keyed by step size.
pub type VectorSeries = StepSizeSeries<Vec<Vector3<f64>>>;

/// (kinetic, potential) energy pairs keyed by step size.
pub type EnergySeries = StepSizeSeries<EnergyPair>;
