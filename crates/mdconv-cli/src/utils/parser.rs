use mdconv::engine::config::FailurePolicy;
use mdconv::engine::projection::{Axis, Probe};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid probe format for '{0}'. Expected 'atom:axis' (e.g., '0:x').")]
    InvalidProbeFormat(String),

    #[error("Invalid atom index '{0}' in probe. Expected a non-negative integer.")]
    InvalidAtomIndex(String),

    #[error("Invalid axis '{0}' in probe. Expected 'x', 'y' or 'z'.")]
    InvalidAxis(String),

    #[error("Unknown failure policy '{0}'. Expected 'abort' or 'skip-group'.")]
    UnknownFailurePolicy(String),
}

/// Parses a probe of the form `atom:axis`, e.g. `0:x` or `12:Z`.
pub fn parse_probe(s: &str) -> Result<Probe, ParseError> {
    let (atom, axis) = s
        .split_once(':')
        .ok_or_else(|| ParseError::InvalidProbeFormat(s.to_string()))?;
    let atom = atom.trim();
    let axis = axis.trim();
    if atom.is_empty() || axis.is_empty() {
        return Err(ParseError::InvalidProbeFormat(s.to_string()));
    }

    let atom = atom
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidAtomIndex(atom.to_string()))?;
    let axis = axis
        .parse::<Axis>()
        .map_err(|_| ParseError::InvalidAxis(axis.to_string()))?;
    Ok(Probe { atom, axis })
}

pub fn parse_failure_policy(s: &str) -> Result<FailurePolicy, ParseError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "abort" | "abort-sweep" => Ok(FailurePolicy::AbortSweep),
        "skip" | "skip-group" => Ok(FailurePolicy::SkipGroup),
        _ => Err(ParseError::UnknownFailurePolicy(s.to_string())),
    }
}
