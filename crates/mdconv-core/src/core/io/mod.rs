//! Readers for the artifacts a completed simulation run leaves behind.
//!
//! Structure and trajectory formats share the trait-based interface in [`traits`];
//! the energy log is a plain two-column CSV handled by [`energy`].

pub mod energy;
pub mod gro;
pub mod traits;
pub mod trr;
