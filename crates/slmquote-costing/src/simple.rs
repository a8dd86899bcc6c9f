//! Simplified per-part costing
//!
//! Material by density and price, machine time by productivity or a manual
//! override, one margin on top. Every quote can explain itself through
//! [`SimpleQuote::trace`].

use crate::config::ConfigSection;
use serde::{Deserialize, Serialize};
use slmquote_core::units::mass_kg;
use slmquote_core::{
    parse_count, parse_number, FieldSpec, GeometryStats, ParameterSet, PowderMaterial,
    PreconditionError,
};
use std::fmt;
use tracing::debug;

pub const DENSITY: FieldSpec = FieldSpec::nonzero("density", 4.43);
pub const PRICE_PER_KG: FieldSpec = FieldSpec::nonzero("price_per_kg", 15000.0);
pub const SCRAP_PERCENT: FieldSpec = FieldSpec::nonzero("scrap_percent", 5.0);
pub const PRODUCTIVITY: FieldSpec = FieldSpec::zero_ok("productivity", 6.5);
pub const MACHINE_RATE: FieldSpec = FieldSpec::nonzero("machine_rate", 3000.0);
pub const MARGIN_PERCENT: FieldSpec = FieldSpec::nonzero("margin_percent", 20.0);
pub const MANUAL_TIME: &str = "manual_time";
pub const QUANTITY: &str = "quantity";

/// Input of the simplified estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleConfig {
    /// Part density in g/cm³
    pub density: f64,
    pub price_per_kg: f64,
    /// Extra material bought for scrap, as a percentage
    pub scrap_percent: f64,
    /// Build rate in cm³/h; zero disables the machine-time estimate
    pub productivity: f64,
    /// Machine hourly rate
    pub machine_rate: f64,
    pub margin_percent: f64,
    /// Processing hours that override the productivity estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_time: Option<f64>,
    pub quantity: u32,
}

impl Default for SimpleConfig {
    fn default() -> Self {
        Self {
            density: DENSITY.default,
            price_per_kg: PRICE_PER_KG.default,
            scrap_percent: SCRAP_PERCENT.default,
            productivity: PRODUCTIVITY.default,
            machine_rate: MACHINE_RATE.default,
            margin_percent: MARGIN_PERCENT.default,
            manual_time: None,
            quantity: 1,
        }
    }
}

impl SimpleConfig {
    /// Take density and price from a powder preset
    pub fn apply_material(&mut self, material: &PowderMaterial) {
        self.density = material.density_solid;
        self.price_per_kg = material.price_per_kg;
    }
}

/// A manual time counts only when finite and positive
fn manual_hours(value: Option<f64>) -> Option<f64> {
    value.filter(|h| h.is_finite() && *h > 0.0)
}

impl ConfigSection for SimpleConfig {
    fn from_params(params: &ParameterSet) -> Self {
        Self {
            density: params.number(&DENSITY),
            price_per_kg: params.number(&PRICE_PER_KG),
            scrap_percent: params.number(&SCRAP_PERCENT),
            productivity: params.number(&PRODUCTIVITY),
            machine_rate: params.number(&MACHINE_RATE),
            margin_percent: params.number(&MARGIN_PERCENT),
            manual_time: manual_hours(parse_number(params.get(MANUAL_TIME))),
            quantity: parse_count(params.get(QUANTITY), 1, 1),
        }
    }

    fn sanitized(&self) -> Self {
        Self {
            density: DENSITY.sanitize(self.density),
            price_per_kg: PRICE_PER_KG.sanitize(self.price_per_kg),
            scrap_percent: SCRAP_PERCENT.sanitize(self.scrap_percent),
            productivity: PRODUCTIVITY.sanitize(self.productivity),
            machine_rate: MACHINE_RATE.sanitize(self.machine_rate),
            margin_percent: MARGIN_PERCENT.sanitize(self.margin_percent),
            manual_time: manual_hours(self.manual_time),
            quantity: self.quantity.max(1),
        }
    }

    fn write_params(&self, params: &mut ParameterSet) {
        params.set_number(DENSITY.key, self.density);
        params.set_number(PRICE_PER_KG.key, self.price_per_kg);
        params.set_number(SCRAP_PERCENT.key, self.scrap_percent);
        params.set_number(PRODUCTIVITY.key, self.productivity);
        params.set_number(MACHINE_RATE.key, self.machine_rate);
        params.set_number(MARGIN_PERCENT.key, self.margin_percent);
        if let Some(hours) = self.manual_time {
            params.set_number(MANUAL_TIME, hours);
        }
        params.insert(QUANTITY, self.quantity.to_string());
    }
}

/// Where the processing time came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSource {
    Manual,
    Productivity,
    /// Neither a manual time nor a productivity was available
    Unavailable,
}

/// Result of a simplified estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleQuote {
    /// Sanitised inputs the quote was computed from
    pub config: SimpleConfig,
    pub volume_cm3: f64,
    pub mass_kg: f64,
    pub material_cost: f64,
    pub processing_hours: f64,
    pub time_source: TimeSource,
    pub machine_cost: f64,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

/// Estimate one part
pub fn estimate(
    stats: &GeometryStats,
    config: &SimpleConfig,
) -> Result<SimpleQuote, PreconditionError> {
    if stats.is_empty() {
        return Err(PreconditionError::EmptyGeometry);
    }
    let cfg = config.sanitized();

    let volume_cm3 = stats.volume_cm3();
    let mass = mass_kg(volume_cm3, cfg.density);
    let material_cost = mass * cfg.price_per_kg * (1.0 + cfg.scrap_percent / 100.0);

    let (processing_hours, time_source) = match cfg.manual_time {
        Some(hours) => (hours, TimeSource::Manual),
        None if cfg.productivity > 0.0 => (volume_cm3 / cfg.productivity, TimeSource::Productivity),
        None => (0.0, TimeSource::Unavailable),
    };
    let machine_cost = processing_hours * cfg.machine_rate;
    let unit_price = (material_cost + machine_cost) * (1.0 + cfg.margin_percent / 100.0);
    let line_total = unit_price * f64::from(cfg.quantity);

    debug!(
        "Simple estimate: {:.3} kg, {:.2} h ({:?}), unit {:.0}",
        mass, processing_hours, time_source, unit_price
    );

    Ok(SimpleQuote {
        config: cfg,
        volume_cm3,
        mass_kg: mass,
        material_cost,
        processing_hours,
        time_source,
        machine_cost,
        unit_price,
        quantity: cfg.quantity,
        line_total,
    })
}

/// One line of a derivation trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceStep {
    pub label: &'static str,
    pub formula: String,
    pub value: f64,
    pub unit: &'static str,
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {:.3}", self.label, self.formula, self.value)?;
        if !self.unit.is_empty() {
            write!(f, " {}", self.unit)?;
        }
        Ok(())
    }
}

/// Human-readable derivation of a [`SimpleQuote`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    steps: Vec<TraceStep>,
}

impl Trace {
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl SimpleQuote {
    /// Rebuild the derivation trace from the stored intermediate values
    pub fn trace(&self) -> Trace {
        let c = &self.config;
        let time_formula = match self.time_source {
            TimeSource::Manual => "manual override".to_string(),
            TimeSource::Productivity => {
                format!("{:.3} cm³ / {} cm³/h", self.volume_cm3, c.productivity)
            }
            TimeSource::Unavailable => "no manual time, productivity 0".to_string(),
        };

        let steps = vec![
            TraceStep {
                label: "Volume",
                formula: "mesh volume".to_string(),
                value: self.volume_cm3,
                unit: "cm³",
            },
            TraceStep {
                label: "Mass",
                formula: format!("{:.3} cm³ × {} g/cm³ / 1000", self.volume_cm3, c.density),
                value: self.mass_kg,
                unit: "kg",
            },
            TraceStep {
                label: "Material",
                formula: format!(
                    "{:.3} kg × {} × (1 + {}%)",
                    self.mass_kg, c.price_per_kg, c.scrap_percent
                ),
                value: self.material_cost,
                unit: "",
            },
            TraceStep {
                label: "Processing time",
                formula: time_formula,
                value: self.processing_hours,
                unit: "h",
            },
            TraceStep {
                label: "Machine",
                formula: format!("{:.3} h × {}", self.processing_hours, c.machine_rate),
                value: self.machine_cost,
                unit: "",
            },
            TraceStep {
                label: "Unit price",
                formula: format!(
                    "({:.2} + {:.2}) × (1 + {}%)",
                    self.material_cost, self.machine_cost, c.margin_percent
                ),
                value: self.unit_price,
                unit: "",
            },
            TraceStep {
                label: "Line total",
                formula: format!("{:.2} × {}", self.unit_price, self.quantity),
                value: self.line_total,
                unit: "",
            },
        ];

        Trace { steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_time_parsing() {
        let params = ParameterSet::new().with("manual_time", "2.5");
        assert_eq!(SimpleConfig::from_params(&params).manual_time, Some(2.5));

        for raw in ["0", "-1", "", "soon"] {
            let params = ParameterSet::new().with("manual_time", raw);
            assert_eq!(SimpleConfig::from_params(&params).manual_time, None, "{raw:?}");
        }
    }

    #[test]
    fn test_productivity_zero_is_kept() {
        let params = ParameterSet::new().with("productivity", "0");
        assert_eq!(SimpleConfig::from_params(&params).productivity, 0.0);
    }

    #[test]
    fn test_zero_rates_fall_back() {
        let params = ParameterSet::new()
            .with("scrap_percent", "0")
            .with("machine_rate", "0")
            .with("margin_percent", "0");
        assert_eq!(SimpleConfig::from_params(&params), SimpleConfig::default());
    }

    #[test]
    fn test_trace_step_display() {
        let step = TraceStep {
            label: "Mass",
            formula: "1 × 2".to_string(),
            value: 2.0,
            unit: "kg",
        };
        assert_eq!(step.to_string(), "Mass: 1 × 2 = 2.000 kg");
    }
}
