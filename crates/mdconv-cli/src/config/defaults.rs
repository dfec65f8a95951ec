use mdconv::core::selection::AtomSelection;
use mdconv::engine::config::{FailurePolicy, RichardsonParams, SweepLayout};
use mdconv::engine::projection::Probe;
use mdconv::workflows::report::OutputFormat;

pub struct DefaultsConfig {
    pub layout: SweepLayout,
    pub selection: AtomSelection,
    pub order: u32,
    pub refinement_ratio: f64,
    pub probes: Vec<Probe>,
    pub format: OutputFormat,
    pub failure_policy: FailurePolicy,
    pub parallel: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            layout: SweepLayout::default(),
            selection: AtomSelection::Protein,
            order: RichardsonParams::DEFAULT_ORDER,
            refinement_ratio: RichardsonParams::DEFAULT_REFINEMENT_RATIO,
            probes: vec![Probe::default()],
            format: OutputFormat::Text,
            failure_policy: FailurePolicy::AbortSweep,
            parallel: false,
        }
    }
}
