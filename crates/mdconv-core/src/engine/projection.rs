use super::error::EngineError;
use crate::core::models::series::EnergyPair;
use nalgebra::Vector3;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown coordinate axis '{0}' (expected x, y or z)")]
pub struct AxisParseError(pub String);

/// Cartesian coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl FromStr for Axis {
    type Err = AxisParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "0" => Ok(Axis::X),
            "y" | "1" => Ok(Axis::Y),
            "z" | "2" => Ok(Axis::Z),
            _ => Err(AxisParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// Reduces one observation of a series to the scalar the Richardson engine works on.
pub trait Projection<V> {
    fn project(&self, value: &V) -> Result<f64, EngineError>;

    /// Short human-readable name of the projected quantity.
    fn label(&self) -> String;
}

/// One coordinate of one atom, indexed within the selected atoms of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct Probe {
    pub atom: usize,
    pub axis: Axis,
}

impl Default for Probe {
    /// First selected atom, x axis.
    fn default() -> Self {
        Self {
            atom: 0,
            axis: Axis::X,
        }
    }
}

impl Projection<Vec<Vector3<f64>>> for Probe {
    fn project(&self, value: &Vec<Vector3<f64>>) -> Result<f64, EngineError> {
        value
            .get(self.atom)
            .map(|v| v[self.axis.index()])
            .ok_or(EngineError::AtomOutOfRange {
                atom: self.atom,
                available: value.len(),
            })
    }

    fn label(&self) -> String {
        format!("atom {}, {}", self.atom, self.axis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyComponent {
    Kinetic,
    Potential,
}

impl Projection<EnergyPair> for EnergyComponent {
    fn project(&self, value: &EnergyPair) -> Result<f64, EngineError> {
        Ok(match self {
            EnergyComponent::Kinetic => value.kinetic,
            EnergyComponent::Potential => value.potential,
        })
    }

    fn label(&self) -> String {
        match self {
            EnergyComponent::Kinetic => "kinetic".to_string(),
            EnergyComponent::Potential => "potential".to_string(),
        }
    }
}

impl FromStr for EnergyComponent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kinetic" | "ke" => Ok(EnergyComponent::Kinetic),
            "potential" | "pe" => Ok(EnergyComponent::Potential),
            other => Err(format!(
                "Unknown energy component '{}' (expected kinetic or potential)",
                other
            )),
        }
    }
}
