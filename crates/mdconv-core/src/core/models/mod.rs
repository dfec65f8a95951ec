//! Data models shared by the readers, the extractor and the convergence engine.
//!
//! - [`units`] - Length/velocity units and exact conversion to nm and nm/ps
//! - [`frame`] - Topology (per-atom identities) and single-frame coordinates
//! - [`series`] - Step-size keyed series of observations

pub mod frame;
pub mod series;
pub mod units;
