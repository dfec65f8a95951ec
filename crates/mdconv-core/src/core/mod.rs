//! # Core Module
//!
//! Stateless building blocks of a convergence study: the data models that flow
//! between components, atom selection, and readers for the per-run artifacts.
//!
//! - **Data Models** ([`models`]) - Frames, topologies, units and step-size series
//! - **Atom Selection** ([`selection`]) - Which atoms of a run are observed
//! - **File I/O** ([`io`]) - `.gro`, `.trr` and energy-log readers

pub mod io;
pub mod models;
pub mod selection;
