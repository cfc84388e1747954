//! Unit declarations and the internal SI convention.
//!
//! All channel values are stored in SI (meters / newtons / newton-meters).
//! `LengthUnit` describes what a raw file or an output file uses; scaling
//! happens at the read and write edges only.

use serde::{Deserialize, Serialize};

/// Physical quantity carried by a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// 3D position (markers, landmarks, center of pressure)
    Position,
    /// Force vector from a plate
    Force,
    /// Free moment vector from a plate
    Moment,
}

/// Length unit declared for a source or output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Millimeters (the common optical-capture export unit)
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
    /// Meters
    #[serde(rename = "m")]
    Meters,
}

impl LengthUnit {
    /// Multiplier converting a value in this unit to meters
    pub fn to_meters(self) -> f64 {
        match self {
            LengthUnit::Millimeters => 1e-3,
            LengthUnit::Meters => 1.0,
        }
    }

    /// Multiplier converting a value in meters to this unit
    pub fn from_meters(self) -> f64 {
        match self {
            LengthUnit::Millimeters => 1e3,
            LengthUnit::Meters => 1.0,
        }
    }

    /// Label used in TRC headers
    pub fn label(self) -> &'static str {
        match self {
            LengthUnit::Millimeters => "mm",
            LengthUnit::Meters => "m",
        }
    }

    /// Parse a TRC-style unit label
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "mm" => Some(LengthUnit::Millimeters),
            "m" => Some(LengthUnit::Meters),
            _ => None,
        }
    }
}
