use crate::core::models::series::{EnergySeries, StepSize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRow {
    pub step_size: StepSize,
    pub kinetic: f64,
    pub potential: f64,
}

/// Energies of a group laid out side by side, coarsest step size first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyTable {
    pub rows: Vec<EnergyRow>,
}

/// Sorts the energy pairs of `series` by descending step size. No arithmetic is
/// performed on the energies themselves.
pub fn energy_table(series: &EnergySeries) -> EnergyTable {
    let rows = series
        .descending()
        .into_iter()
        .map(|(step_size, pair)| EnergyRow {
            step_size,
            kinetic: pair.kinetic,
            potential: pair.potential,
        })
        .collect();
    EnergyTable { rows }
}
