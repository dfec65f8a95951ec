//! # Engine Module
//!
//! The numerical and acquisition logic of a convergence study.
//!
//! ## Architecture
//!
//! - **Richardson Engine** ([`richardson`]) - Convergence ratios, error estimates,
//!   observed order and extrapolated values over a step-size refinement sequence
//! - **Energy Tabulator** ([`energy_table`]) - Step-size sorted energy comparison
//! - **Observable Extraction** ([`extract`]) - Final-frame positions, velocities and
//!   energies of the selected atoms of one run
//! - **Projections** ([`projection`]) - Reduction of vector or energy observations to
//!   the single scalar the engine evaluates
//! - **Configuration** ([`config`]) - Study parameters and the sweep naming convention
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-level error type
//!
//! The Richardson engine and the energy tabulator are pure: they take a read-only
//! series and return a newly built table.

pub mod config;
pub mod energy_table;
pub mod error;
pub mod extract;
pub mod progress;
pub mod projection;
pub mod richardson;
