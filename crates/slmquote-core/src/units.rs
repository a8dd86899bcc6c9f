//! Unit conversion utilities
//!
//! Volumes are measured in mm³ by the analyzer and priced in cm³ by the cost
//! modes. Masses are reported in kg, durations in hours.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// mm³ per cm³
pub const MM3_PER_CM3: f64 = 1000.0;

/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;

/// Volume unit selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeUnit {
    /// Cubic millimetres
    Mm3,
    /// Cubic centimetres
    Cm3,
}

impl Default for VolumeUnit {
    fn default() -> Self {
        Self::Cm3
    }
}

impl fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mm3 => write!(f, "mm³"),
            Self::Cm3 => write!(f, "cm³"),
        }
    }
}

impl FromStr for VolumeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mm3" | "mm³" | "mm" => Ok(Self::Mm3),
            "cm3" | "cm³" | "cc" | "cm" => Ok(Self::Cm3),
            _ => Err(format!("Unknown volume unit: {}", s)),
        }
    }
}

impl VolumeUnit {
    /// Convert a volume given in mm³ into this unit
    pub fn from_mm3(self, value_mm3: f64) -> f64 {
        match self {
            Self::Mm3 => value_mm3,
            Self::Cm3 => value_mm3 / MM3_PER_CM3,
        }
    }

    /// Convert a volume given in cm³ into this unit
    pub fn from_cm3(self, value_cm3: f64) -> f64 {
        match self {
            Self::Mm3 => value_cm3 * MM3_PER_CM3,
            Self::Cm3 => value_cm3,
        }
    }

    /// Decimal places conventionally shown for this unit
    pub fn decimals(self) -> usize {
        match self {
            Self::Mm3 => 0,
            Self::Cm3 => 2,
        }
    }
}

/// Mass in kg of `volume_cm3` at `density_g_cm3`
pub fn mass_kg(volume_cm3: f64, density_g_cm3: f64) -> f64 {
    volume_cm3 * density_g_cm3 / G_PER_KG
}

/// Format a volume given in cm³ for display in `unit`
pub fn format_volume(value_cm3: f64, unit: VolumeUnit) -> String {
    format!("{:.*}", unit.decimals(), unit.from_cm3(value_cm3))
}

/// Format a monetary amount rounded to whole currency units
pub fn format_money(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{:.0}", value)
}
