use super::projection::{EnergyComponent, Probe};
use crate::core::selection::AtomSelection;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Assumptions the Richardson diagnostics are evaluated under.
///
/// The refinement sequence is taken on trust: step sizes are assumed to shrink by
/// `refinement_ratio` from one run to the next, and the integrator is assumed to
/// converge with order `order`. Neither is checked against the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RichardsonParams {
    order: u32,
    refinement_ratio: f64,
}

impl RichardsonParams {
    pub const DEFAULT_ORDER: u32 = 2;
    pub const DEFAULT_REFINEMENT_RATIO: f64 = 2.0;

    pub fn new(order: u32, refinement_ratio: f64) -> Result<Self, ConfigError> {
        if order == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "order",
                reason: "must be at least 1".into(),
            });
        }
        if !refinement_ratio.is_finite() || refinement_ratio <= 1.0 {
            return Err(ConfigError::InvalidParameter {
                name: "refinement_ratio",
                reason: format!("must be a finite number greater than 1 (got {})", refinement_ratio),
            });
        }
        let exponent = i32::try_from(order).map_err(|_| ConfigError::InvalidParameter {
            name: "order",
            reason: format!("{} is out of range", order),
        })?;
        let denominator = refinement_ratio.powi(exponent) - 1.0;
        if !denominator.is_finite() || denominator <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "order",
                reason: format!("{}^{} - 1 is not a positive finite number", refinement_ratio, order),
            });
        }
        Ok(Self {
            order,
            refinement_ratio,
        })
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn refinement_ratio(&self) -> f64 {
        self.refinement_ratio
    }

    /// `r^p`, the value the Richardson fraction tends to in the asymptotic regime.
    pub fn asymptotic_ratio(&self) -> f64 {
        // `new` guarantees the order fits an i32.
        self.refinement_ratio.powi(i32::try_from(self.order).unwrap_or(i32::MAX))
    }

    /// `r^p - 1`, the denominator of the error estimate. Always positive.
    pub fn error_denominator(&self) -> f64 {
        self.asymptotic_ratio() - 1.0
    }
}

impl Default for RichardsonParams {
    fn default() -> Self {
        Self {
            order: Self::DEFAULT_ORDER,
            refinement_ratio: Self::DEFAULT_REFINEMENT_RATIO,
        }
    }
}

/// Naming convention of a sweep directory tree:
/// `<root>/<force field>/<tolerance prefix><value>/<step prefix><value>/{files}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepLayout {
    pub tolerance_prefix: String,
    pub step_size_prefix: String,
    pub structure_file: String,
    pub trajectory_file: String,
    pub energy_file: String,
}

impl Default for SweepLayout {
    fn default() -> Self {
        Self {
            tolerance_prefix: "tol".to_string(),
            step_size_prefix: "ts".to_string(),
            structure_file: "confout.gro".to_string(),
            trajectory_file: "traj.trr".to_string(),
            energy_file: "ener.csv".to_string(),
        }
    }
}

/// What the sweep driver does when a run in a group cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the whole sweep at the first failing run.
    #[default]
    AbortSweep,
    /// Report the group as failed and continue with the next group.
    SkipGroup,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyConfig {
    pub layout: SweepLayout,
    pub selection: AtomSelection,
    pub richardson: RichardsonParams,
    pub probes: Vec<Probe>,
    pub energy_component: Option<EnergyComponent>,
    pub failure_policy: FailurePolicy,
    pub parallel: bool,
}

#[derive(Default)]
pub struct StudyConfigBuilder {
    layout: Option<SweepLayout>,
    selection: Option<AtomSelection>,
    richardson: Option<RichardsonParams>,
    probes: Option<Vec<Probe>>,
    energy_component: Option<EnergyComponent>,
    failure_policy: Option<FailurePolicy>,
    parallel: Option<bool>,
}

impl StudyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: SweepLayout) -> Self {
        self.layout = Some(layout);
        self
    }
    pub fn selection(mut self, selection: AtomSelection) -> Self {
        self.selection = Some(selection);
        self
    }
    pub fn richardson(mut self, params: RichardsonParams) -> Self {
        self.richardson = Some(params);
        self
    }
    pub fn probes(mut self, probes: Vec<Probe>) -> Self {
        self.probes = Some(probes);
        self
    }
    pub fn energy_component(mut self, component: Option<EnergyComponent>) -> Self {
        self.energy_component = component;
        self
    }
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    pub fn build(self) -> Result<StudyConfig, ConfigError> {
        let probes = self
            .probes
            .ok_or(ConfigError::MissingParameter("probes"))?;
        if probes.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "probes",
                reason: "at least one (atom, axis) probe is required".into(),
            });
        }
        let layout = self
            .layout
            .ok_or(ConfigError::MissingParameter("layout"))?;
        for (name, value) in [
            ("tolerance_prefix", &layout.tolerance_prefix),
            ("step_size_prefix", &layout.step_size_prefix),
            ("structure_file", &layout.structure_file),
            ("trajectory_file", &layout.trajectory_file),
            ("energy_file", &layout.energy_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: "must not be empty".into(),
                });
            }
        }

        Ok(StudyConfig {
            layout,
            selection: self
                .selection
                .ok_or(ConfigError::MissingParameter("selection"))?,
            richardson: self
                .richardson
                .ok_or(ConfigError::MissingParameter("richardson"))?,
            probes,
            energy_component: self.energy_component,
            failure_policy: self.failure_policy.unwrap_or_default(),
            parallel: self.parallel.unwrap_or(false),
        })
    }
}
