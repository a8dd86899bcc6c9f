//! # Powder-bed costing
//!
//! Detailed cost model of one SLM build: powder charge, fused and lost
//! material, machine time, engineer and technician labor, consumables and
//! pricing.
//!
//! Volumes are in cm³, densities in g/cm³, masses in kg, bed extents and
//! part height in mm, durations in hours.

use crate::config::{ConfigSection, PowderBedConfig};
use serde::{Deserialize, Serialize};
use slmquote_core::units::{mass_kg, MM3_PER_CM3};
use slmquote_core::{GeometryStats, PreconditionError};
use tracing::debug;

/// Build hours per hour of engineer monitoring (one minute in every ten)
pub const MONITORING_RATIO: f64 = 6.0;

/// Material flow of one build
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialUsage {
    pub part_volume_cm3: f64,
    /// Part plus support volume
    pub build_volume_cm3: f64,
    pub fused_mass_kg: f64,
    /// Powder volume filling the bed up to the part height
    pub chamber_volume_cm3: f64,
    /// Powder charge needed to start the build
    pub powder_mass_kg: f64,
    pub loss_mass_kg: f64,
    /// Powder recovered after the build, never negative
    pub returnable_mass_kg: f64,
}

/// Time components of one build, in hours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBreakdown {
    pub build_hours: f64,
    pub setup_hours: f64,
    pub monitoring_hours: f64,
    pub post_processing_hours: f64,
}

impl TimeBreakdown {
    pub fn engineer_hours(&self) -> f64 {
        self.setup_hours + self.monitoring_hours
    }
}

/// Itemized sub-costs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostItems {
    /// The whole powder charge
    pub powder_all: f64,
    /// Powder fused into part and supports
    pub fused: f64,
    /// Powder lost during the build
    pub loss: f64,
    pub labor_engineers: f64,
    pub labor_technicians: f64,
    pub platform: f64,
    pub gas: f64,
    pub filter: f64,
    /// Gas cartridges consumed
    pub gas_units: u32,
    /// Filters consumed
    pub filter_units: u32,
}

impl CostItems {
    pub fn labor_total(&self) -> f64 {
        self.labor_engineers + self.labor_technicians
    }

    pub fn consumables_total(&self) -> f64 {
        self.platform + self.gas + self.filter
    }
}

/// Result of a powder-bed estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Cash needed to start the job: the whole powder charge plus labor
    /// and consumables
    pub launch_cost: f64,
    /// Cost of the part: fused and lost powder plus labor and consumables
    pub cost_price: f64,
    /// Per-unit sell price after margin and fixed overhead
    pub sell_price: f64,
    /// Sell price times quantity
    pub batch_price: f64,
    pub quantity: u32,
    pub material: MaterialUsage,
    pub time: TimeBreakdown,
    pub items: CostItems,
}

/// Units of a consumable needed for `build_hours`
fn units_needed(build_hours: f64, coverage_hours: f64) -> u32 {
    if coverage_hours <= 0.0 {
        return 0;
    }
    let units = (build_hours / coverage_hours).ceil();
    if units >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        units as u32
    }
}

/// Estimate the cost of building one part
///
/// The configuration is sanitised first, so out-of-domain values are
/// replaced by their defaults rather than propagated.
pub fn estimate(
    stats: &GeometryStats,
    config: &PowderBedConfig,
) -> Result<CostBreakdown, PreconditionError> {
    let height_mm = match stats.height_mm() {
        Some(h) if !stats.is_empty() => h,
        _ => return Err(PreconditionError::EmptyGeometry),
    };
    let cfg = config.sanitized();
    let mat = &cfg.material;

    // Material
    let part_volume_cm3 = stats.volume_cm3();
    let build_volume_cm3 = part_volume_cm3 * (1.0 + mat.support_fraction());
    let fused_mass_kg = mass_kg(build_volume_cm3, mat.density_solid);
    let chamber_volume_cm3 = cfg.machine.bed_area_mm2() * height_mm / MM3_PER_CM3;
    let powder_mass_kg = mass_kg(chamber_volume_cm3, mat.density_powder);
    let loss_mass_kg = powder_mass_kg * mat.loss_fraction();
    let returnable_mass_kg = (powder_mass_kg - fused_mass_kg - loss_mass_kg).max(0.0);

    // Time
    let build_hours = if cfg.machine.productivity > 0.0 {
        build_volume_cm3 / cfg.machine.productivity
    } else {
        0.0
    };
    let time = TimeBreakdown {
        build_hours,
        setup_hours: cfg.time.setup_hours(),
        monitoring_hours: build_hours / MONITORING_RATIO,
        post_processing_hours: cfg.time.post_processing_hours(),
    };

    // Labor and consumables
    let labor_engineers =
        time.engineer_hours() * f64::from(cfg.labor.engineers) * cfg.labor.rate_engineer;
    let labor_technicians = time.post_processing_hours
        * f64::from(cfg.labor.technicians)
        * cfg.labor.rate_technician;

    let gas_units = units_needed(build_hours, cfg.consumables.gas_hours);
    let filter_units = units_needed(build_hours, cfg.consumables.filter_hours);

    let items = CostItems {
        powder_all: powder_mass_kg * mat.price_per_kg,
        fused: fused_mass_kg * mat.price_per_kg,
        loss: loss_mass_kg * mat.price_per_kg,
        labor_engineers,
        labor_technicians,
        platform: cfg.consumables.platform,
        gas: f64::from(gas_units) * cfg.consumables.gas,
        filter: f64::from(filter_units) * cfg.consumables.filter,
        gas_units,
        filter_units,
    };

    // Pricing
    let fixed = items.labor_total() + items.consumables_total();
    let launch_cost = items.powder_all + fixed;
    let cost_price = items.fused + items.loss + fixed;
    let sell_price = cost_price * (1.0 + cfg.pricing.margin_fraction()) + cfg.pricing.overhead;
    let quantity = cfg.pricing.quantity;
    let batch_price = sell_price * f64::from(quantity);

    debug!(
        "Powder-bed estimate: build {:.2} h, powder {:.3} kg, cost {:.0}, sell {:.0} x{}",
        build_hours, powder_mass_kg, cost_price, sell_price, quantity
    );

    Ok(CostBreakdown {
        launch_cost,
        cost_price,
        sell_price,
        batch_price,
        quantity,
        material: MaterialUsage {
            part_volume_cm3,
            build_volume_cm3,
            fused_mass_kg,
            chamber_volume_cm3,
            powder_mass_kg,
            loss_mass_kg,
            returnable_mass_kg,
        },
        time,
        items,
    })
}
