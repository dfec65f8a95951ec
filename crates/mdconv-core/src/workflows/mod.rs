//! # Workflows Module
//!
//! High-level entry points that tie the [`core`](crate::core) readers and the
//! [`engine`](crate::engine) diagnostics into a complete convergence study.
//!
//! - **Sweep** ([`sweep`]) - Discovers the `force field -> tolerance -> step size`
//!   tree, extracts every run and builds each group's tables
//! - **Report** ([`report`]) - Renders group tables as text or CSV

pub mod report;
pub mod sweep;
