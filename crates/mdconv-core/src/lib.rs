//! # mdconv Core Library
//!
//! Timestep-convergence analysis for molecular-dynamics parameter sweeps. Given runs of
//! the same system at a geometric sequence of integration step sizes, the library
//! reports how the final state converges as the step size shrinks, using Richardson
//! extrapolation to estimate the discretization error left at each step size.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture with one-way data flow:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Frame`, `StepSizeSeries`),
//!   atom selection, and readers for the GROMACS `.gro` / `.trr` files and the
//!   two-column energy log each run leaves behind.
//!
//! - **[`engine`]: The Logic Core.** The Richardson engine and the energy tabulator,
//!   both pure functions from a read-only series to a freshly built table, plus the
//!   extractor that turns one run's artifacts into final-frame observables.
//!
//! - **[`workflows`]: The Public API.** Scans a sweep directory, drives extraction
//!   group by group, and renders the resulting tables.

pub mod core;
pub mod engine;
pub mod workflows;
