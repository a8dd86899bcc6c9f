//! Cost configuration sections
//!
//! Provides the typed inputs of the powder-bed estimator, organized into
//! logical sections:
//! - Material (densities, powder price, support and loss overheads)
//! - Machine (build-bed extents, productivity)
//! - Time (pre-build and post-processing durations)
//! - Labor (staff counts and hourly rates)
//! - Consumables (platform, gas cartridges, filters)
//! - Pricing (margin, fixed overhead, quantity)
//!
//! Every section can be read from a flat [`ParameterSet`] and sanitised
//! against the same defaults table, so a value coming from a form, the
//! command line or a config file is treated identically.

use serde::{Deserialize, Serialize};
use slmquote_core::{parse_count, FieldSpec, ParameterSet, PowderMaterial};

/// Named fields and their defaults
pub mod fields {
    use slmquote_core::FieldSpec;

    pub const DENSITY_SOLID: FieldSpec = FieldSpec::nonzero("density_solid", 4.43);
    pub const DENSITY_POWDER: FieldSpec = FieldSpec::nonzero("density_powder", 2.2);
    pub const PRICE_PER_KG: FieldSpec = FieldSpec::nonzero("price_per_kg", 15000.0);
    pub const SUPPORT_PERCENT: FieldSpec = FieldSpec::nonzero("support_percent", 15.0);
    pub const LOSS_PERCENT: FieldSpec = FieldSpec::nonzero("loss_percent", 7.0);

    pub const BED_X: FieldSpec = FieldSpec::nonzero("bed_x", 350.0);
    pub const BED_Y: FieldSpec = FieldSpec::nonzero("bed_y", 350.0);
    pub const PRODUCTIVITY: FieldSpec = FieldSpec::nonzero("productivity", 6.5);

    pub const TIME_LAYOUT: FieldSpec = FieldSpec::zero_ok("time_layout", 0.0);
    pub const TIME_MACHINE_PREP: FieldSpec = FieldSpec::zero_ok("time_machine_prep", 0.0);
    pub const TIME_UNPACK: FieldSpec = FieldSpec::zero_ok("time_unpack", 0.0);
    pub const TIME_HEAT_TREAT: FieldSpec = FieldSpec::zero_ok("time_heat_treat", 0.0);
    pub const TIME_EDM: FieldSpec = FieldSpec::zero_ok("time_edm", 0.0);
    pub const TIME_MACH_ROUGH: FieldSpec = FieldSpec::zero_ok("time_mach_rough", 0.0);
    pub const TIME_MACH_FINE: FieldSpec = FieldSpec::zero_ok("time_mach_fine", 0.0);
    pub const TIME_ABRASIVE: FieldSpec = FieldSpec::zero_ok("time_abrasive", 0.0);

    pub const ENGINEERS: &str = "engineers";
    pub const DEFAULT_ENGINEERS: u32 = 2;
    pub const RATE_ENGINEER: FieldSpec = FieldSpec::nonzero("rate_engineer", 1500.0);
    pub const TECHNICIANS: &str = "technicians";
    pub const DEFAULT_TECHNICIANS: u32 = 3;
    pub const RATE_TECHNICIAN: FieldSpec = FieldSpec::nonzero("rate_technician", 600.0);

    pub const COST_PLATFORM: FieldSpec = FieldSpec::nonzero("cost_platform", 3000.0);
    pub const COST_GAS: FieldSpec = FieldSpec::nonzero("cost_gas", 4000.0);
    pub const GAS_HOURS: FieldSpec = FieldSpec::nonzero("gas_hours", 30.0);
    pub const COST_FILTER: FieldSpec = FieldSpec::nonzero("cost_filter", 7000.0);
    pub const FILTER_HOURS: FieldSpec = FieldSpec::nonzero("filter_hours", 48.0);

    pub const MARGIN_PERCENT: FieldSpec = FieldSpec::nonzero("margin_percent", 20.0);
    pub const OVERHEAD: FieldSpec = FieldSpec::zero_ok("overhead", 0.0);
    pub const QUANTITY: &str = "quantity";
}

use fields::*;

/// A configuration section readable from named parameters
pub trait ConfigSection: Sized + Default {
    /// Build the section from raw named values, falling back per field
    fn from_params(params: &ParameterSet) -> Self;

    /// Copy of the section with every out-of-domain value replaced
    fn sanitized(&self) -> Self;

    /// Write the section back as named values
    fn write_params(&self, params: &mut ParameterSet);

    /// The section as a fresh parameter set
    fn to_params(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        self.write_params(&mut params);
        params
    }
}

/// Replace a zero count with its default
fn sanitize_count(value: u32, default: u32) -> u32 {
    if value == 0 {
        default
    } else {
        value
    }
}

/// Material settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Density of the fused part in g/cm³
    pub density_solid: f64,
    /// Bulk density of the loose powder in g/cm³
    pub density_powder: f64,
    /// Powder price per kilogram
    pub price_per_kg: f64,
    /// Support volume as a percentage of the part volume
    pub support_percent: f64,
    /// Powder lost per build as a percentage of the charge
    pub loss_percent: f64,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            density_solid: DENSITY_SOLID.default,
            density_powder: DENSITY_POWDER.default,
            price_per_kg: PRICE_PER_KG.default,
            support_percent: SUPPORT_PERCENT.default,
            loss_percent: LOSS_PERCENT.default,
        }
    }
}

impl MaterialConfig {
    pub fn support_fraction(&self) -> f64 {
        self.support_percent / 100.0
    }

    pub fn loss_fraction(&self) -> f64 {
        self.loss_percent / 100.0
    }

    /// Overwrite densities and price with a powder preset
    pub fn apply_material(&mut self, material: &PowderMaterial) {
        self.density_solid = material.density_solid;
        self.density_powder = material.density_powder;
        self.price_per_kg = material.price_per_kg;
    }
}

impl ConfigSection for MaterialConfig {
    fn from_params(params: &ParameterSet) -> Self {
        Self {
            density_solid: params.number(&DENSITY_SOLID),
            density_powder: params.number(&DENSITY_POWDER),
            price_per_kg: params.number(&PRICE_PER_KG),
            support_percent: params.number(&SUPPORT_PERCENT),
            loss_percent: params.number(&LOSS_PERCENT),
        }
    }

    fn sanitized(&self) -> Self {
        Self {
            density_solid: DENSITY_SOLID.sanitize(self.density_solid),
            density_powder: DENSITY_POWDER.sanitize(self.density_powder),
            price_per_kg: PRICE_PER_KG.sanitize(self.price_per_kg),
            support_percent: SUPPORT_PERCENT.sanitize(self.support_percent),
            loss_percent: LOSS_PERCENT.sanitize(self.loss_percent),
        }
    }

    fn write_params(&self, params: &mut ParameterSet) {
        params.set_number(DENSITY_SOLID.key, self.density_solid);
        params.set_number(DENSITY_POWDER.key, self.density_powder);
        params.set_number(PRICE_PER_KG.key, self.price_per_kg);
        params.set_number(SUPPORT_PERCENT.key, self.support_percent);
        params.set_number(LOSS_PERCENT.key, self.loss_percent);
    }
}

/// Machine settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Build-bed X extent in mm
    pub bed_x: f64,
    /// Build-bed Y extent in mm
    pub bed_y: f64,
    /// Build rate in cm³/h
    pub productivity: f64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            bed_x: BED_X.default,
            bed_y: BED_Y.default,
            productivity: PRODUCTIVITY.default,
        }
    }
}

impl MachineConfig {
    /// Bed area in mm²
    pub fn bed_area_mm2(&self) -> f64 {
        self.bed_x * self.bed_y
    }
}

impl ConfigSection for MachineConfig {
    fn from_params(params: &ParameterSet) -> Self {
        Self {
            bed_x: params.number(&BED_X),
            bed_y: params.number(&BED_Y),
            productivity: params.number(&PRODUCTIVITY),
        }
    }

    fn sanitized(&self) -> Self {
        Self {
            bed_x: BED_X.sanitize(self.bed_x),
            bed_y: BED_Y.sanitize(self.bed_y),
            productivity: PRODUCTIVITY.sanitize(self.productivity),
        }
    }

    fn write_params(&self, params: &mut ParameterSet) {
        params.set_number(BED_X.key, self.bed_x);
        params.set_number(BED_Y.key, self.bed_y);
        params.set_number(PRODUCTIVITY.key, self.productivity);
    }
}

/// Manual operation durations in hours
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub layout: f64,
    pub machine_prep: f64,
    pub unpack: f64,
    pub heat_treat: f64,
    pub edm: f64,
    pub mach_rough: f64,
    pub mach_fine: f64,
    pub abrasive: f64,
}

impl TimeConfig {
    /// Pre-build engineering time
    pub fn setup_hours(&self) -> f64 {
        self.layout + self.machine_prep
    }

    /// Post-build technician time
    pub fn post_processing_hours(&self) -> f64 {
        self.unpack + self.heat_treat + self.edm + self.mach_rough + self.mach_fine + self.abrasive
    }
}

impl ConfigSection for TimeConfig {
    fn from_params(params: &ParameterSet) -> Self {
        Self {
            layout: params.number(&TIME_LAYOUT),
            machine_prep: params.number(&TIME_MACHINE_PREP),
            unpack: params.number(&TIME_UNPACK),
            heat_treat: params.number(&TIME_HEAT_TREAT),
            edm: params.number(&TIME_EDM),
            mach_rough: params.number(&TIME_MACH_ROUGH),
            mach_fine: params.number(&TIME_MACH_FINE),
            abrasive: params.number(&TIME_ABRASIVE),
        }
    }

    fn sanitized(&self) -> Self {
        Self {
            layout: TIME_LAYOUT.sanitize(self.layout),
            machine_prep: TIME_MACHINE_PREP.sanitize(self.machine_prep),
            unpack: TIME_UNPACK.sanitize(self.unpack),
            heat_treat: TIME_HEAT_TREAT.sanitize(self.heat_treat),
            edm: TIME_EDM.sanitize(self.edm),
            mach_rough: TIME_MACH_ROUGH.sanitize(self.mach_rough),
            mach_fine: TIME_MACH_FINE.sanitize(self.mach_fine),
            abrasive: TIME_ABRASIVE.sanitize(self.abrasive),
        }
    }

    fn write_params(&self, params: &mut ParameterSet) {
        params.set_number(TIME_LAYOUT.key, self.layout);
        params.set_number(TIME_MACHINE_PREP.key, self.machine_prep);
        params.set_number(TIME_UNPACK.key, self.unpack);
        params.set_number(TIME_HEAT_TREAT.key, self.heat_treat);
        params.set_number(TIME_EDM.key, self.edm);
        params.set_number(TIME_MACH_ROUGH.key, self.mach_rough);
        params.set_number(TIME_MACH_FINE.key, self.mach_fine);
        params.set_number(TIME_ABRASIVE.key, self.abrasive);
    }
}

/// Staffing settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborConfig {
    pub engineers: u32,
    /// Engineer hourly rate
    pub rate_engineer: f64,
    pub technicians: u32,
    /// Technician hourly rate
    pub rate_technician: f64,
}

impl Default for LaborConfig {
    fn default() -> Self {
        Self {
            engineers: DEFAULT_ENGINEERS,
            rate_engineer: RATE_ENGINEER.default,
            technicians: DEFAULT_TECHNICIANS,
            rate_technician: RATE_TECHNICIAN.default,
        }
    }
}

impl ConfigSection for LaborConfig {
    fn from_params(params: &ParameterSet) -> Self {
        Self {
            engineers: parse_count(params.get(ENGINEERS), DEFAULT_ENGINEERS, 1),
            rate_engineer: params.number(&RATE_ENGINEER),
            technicians: parse_count(params.get(TECHNICIANS), DEFAULT_TECHNICIANS, 1),
            rate_technician: params.number(&RATE_TECHNICIAN),
        }
    }

    fn sanitized(&self) -> Self {
        Self {
            engineers: sanitize_count(self.engineers, DEFAULT_ENGINEERS),
            rate_engineer: RATE_ENGINEER.sanitize(self.rate_engineer),
            technicians: sanitize_count(self.technicians, DEFAULT_TECHNICIANS),
            rate_technician: RATE_TECHNICIAN.sanitize(self.rate_technician),
        }
    }

    fn write_params(&self, params: &mut ParameterSet) {
        params.insert(ENGINEERS, self.engineers.to_string());
        params.set_number(RATE_ENGINEER.key, self.rate_engineer);
        params.insert(TECHNICIANS, self.technicians.to_string());
        params.set_number(RATE_TECHNICIAN.key, self.rate_technician);
    }
}

/// Consumable prices and service lives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumablesConfig {
    /// Build platform cost, charged once per job
    pub platform: f64,
    /// Price of one gas cartridge
    pub gas: f64,
    /// Build hours one gas cartridge covers
    pub gas_hours: f64,
    /// Price of one filter
    pub filter: f64,
    /// Build hours one filter covers
    pub filter_hours: f64,
}

impl Default for ConsumablesConfig {
    fn default() -> Self {
        Self {
            platform: COST_PLATFORM.default,
            gas: COST_GAS.default,
            gas_hours: GAS_HOURS.default,
            filter: COST_FILTER.default,
            filter_hours: FILTER_HOURS.default,
        }
    }
}

impl ConfigSection for ConsumablesConfig {
    fn from_params(params: &ParameterSet) -> Self {
        Self {
            platform: params.number(&COST_PLATFORM),
            gas: params.number(&COST_GAS),
            gas_hours: params.number(&GAS_HOURS),
            filter: params.number(&COST_FILTER),
            filter_hours: params.number(&FILTER_HOURS),
        }
    }

    fn sanitized(&self) -> Self {
        Self {
            platform: COST_PLATFORM.sanitize(self.platform),
            gas: COST_GAS.sanitize(self.gas),
            gas_hours: GAS_HOURS.sanitize(self.gas_hours),
            filter: COST_FILTER.sanitize(self.filter),
            filter_hours: FILTER_HOURS.sanitize(self.filter_hours),
        }
    }

    fn write_params(&self, params: &mut ParameterSet) {
        params.set_number(COST_PLATFORM.key, self.platform);
        params.set_number(COST_GAS.key, self.gas);
        params.set_number(GAS_HOURS.key, self.gas_hours);
        params.set_number(COST_FILTER.key, self.filter);
        params.set_number(FILTER_HOURS.key, self.filter_hours);
    }
}

/// Pricing settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub margin_percent: f64,
    /// Fixed amount added to every unit after margin
    pub overhead: f64,
    pub quantity: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            margin_percent: MARGIN_PERCENT.default,
            overhead: OVERHEAD.default,
            quantity: 1,
        }
    }
}

impl PricingConfig {
    pub fn margin_fraction(&self) -> f64 {
        self.margin_percent / 100.0
    }
}

impl ConfigSection for PricingConfig {
    fn from_params(params: &ParameterSet) -> Self {
        Self {
            margin_percent: params.number(&MARGIN_PERCENT),
            overhead: params.number(&OVERHEAD),
            quantity: parse_count(params.get(QUANTITY), 1, 1),
        }
    }

    fn sanitized(&self) -> Self {
        Self {
            margin_percent: MARGIN_PERCENT.sanitize(self.margin_percent),
            overhead: OVERHEAD.sanitize(self.overhead),
            quantity: self.quantity.max(1),
        }
    }

    fn write_params(&self, params: &mut ParameterSet) {
        params.set_number(MARGIN_PERCENT.key, self.margin_percent);
        params.set_number(OVERHEAD.key, self.overhead);
        params.insert(QUANTITY, self.quantity.to_string());
    }
}

/// Complete input of the powder-bed estimator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowderBedConfig {
    pub material: MaterialConfig,
    pub machine: MachineConfig,
    pub time: TimeConfig,
    pub labor: LaborConfig,
    pub consumables: ConsumablesConfig,
    pub pricing: PricingConfig,
}

impl PowderBedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite densities and price with a powder preset
    pub fn with_material(mut self, material: &PowderMaterial) -> Self {
        self.material.apply_material(material);
        self
    }
}

impl ConfigSection for PowderBedConfig {
    fn from_params(params: &ParameterSet) -> Self {
        Self {
            material: MaterialConfig::from_params(params),
            machine: MachineConfig::from_params(params),
            time: TimeConfig::from_params(params),
            labor: LaborConfig::from_params(params),
            consumables: ConsumablesConfig::from_params(params),
            pricing: PricingConfig::from_params(params),
        }
    }

    fn sanitized(&self) -> Self {
        Self {
            material: self.material.sanitized(),
            machine: self.machine.sanitized(),
            time: self.time.sanitized(),
            labor: self.labor.sanitized(),
            consumables: self.consumables.sanitized(),
            pricing: self.pricing.sanitized(),
        }
    }

    fn write_params(&self, params: &mut ParameterSet) {
        self.material.write_params(params);
        self.machine.write_params(params);
        self.time.write_params(params);
        self.labor.write_params(params);
        self.consumables.write_params(params);
        self.pricing.write_params(params);
    }
}

/// Every powder-bed field, in form order
pub const POWDER_BED_FIELDS: &[FieldSpec] = &[
    DENSITY_SOLID,
    DENSITY_POWDER,
    PRICE_PER_KG,
    SUPPORT_PERCENT,
    LOSS_PERCENT,
    BED_X,
    BED_Y,
    PRODUCTIVITY,
    TIME_LAYOUT,
    TIME_MACHINE_PREP,
    TIME_UNPACK,
    TIME_HEAT_TREAT,
    TIME_EDM,
    TIME_MACH_ROUGH,
    TIME_MACH_FINE,
    TIME_ABRASIVE,
    RATE_ENGINEER,
    RATE_TECHNICIAN,
    COST_PLATFORM,
    COST_GAS,
    GAS_HOURS,
    COST_FILTER,
    FILTER_HOURS,
    MARGIN_PERCENT,
    OVERHEAD,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_field_table() {
        let config = PowderBedConfig::default();
        assert_eq!(config.material.density_solid, 4.43);
        assert_eq!(config.material.support_fraction(), 0.15);
        assert_eq!(config.machine.bed_x, 350.0);
        assert_eq!(config.labor.engineers, 2);
        assert_eq!(config.labor.technicians, 3);
        assert_eq!(config.consumables.filter_hours, 48.0);
        assert_eq!(config.pricing.quantity, 1);
        assert_eq!(config.time.post_processing_hours(), 0.0);
    }

    #[test]
    fn test_empty_params_give_defaults() {
        let config = PowderBedConfig::from_params(&ParameterSet::new());
        assert_eq!(config, PowderBedConfig::default());
    }

    #[test]
    fn test_zero_policy_per_field() {
        let params = ParameterSet::new()
            .with("density_solid", "0")
            .with("productivity", "0")
            .with("support_percent", "0")
            .with("loss_percent", "0")
            .with("rate_engineer", "0")
            .with("cost_gas", "0")
            .with("margin_percent", "0")
            .with("time_edm", "0")
            .with("overhead", "0")
            .with("engineers", "0")
            .with("quantity", "-3");
        let config = PowderBedConfig::from_params(&params);
        assert_eq!(config.material.density_solid, 4.43);
        assert_eq!(config.machine.productivity, 6.5);
        assert_eq!(config.material.support_percent, 15.0);
        assert_eq!(config.material.loss_percent, 7.0);
        assert_eq!(config.labor.rate_engineer, 1500.0);
        assert_eq!(config.consumables.gas, 4000.0);
        assert_eq!(config.pricing.margin_percent, 20.0);
        assert_eq!(config.time.edm, 0.0);
        assert_eq!(config.pricing.overhead, 0.0);
        assert_eq!(config.labor.engineers, 2);
        assert_eq!(config.pricing.quantity, 1);
    }

    #[test]
    fn test_sanitized_repairs_values() {
        let mut config = PowderBedConfig::default();
        config.material.price_per_kg = f64::NAN;
        config.machine.bed_y = -10.0;
        config.time.edm = f64::INFINITY;
        config.labor.technicians = 0;
        config.pricing.quantity = 0;
        let clean = config.sanitized();
        assert_eq!(clean.material.price_per_kg, 15000.0);
        assert_eq!(clean.machine.bed_y, 350.0);
        assert_eq!(clean.time.edm, 0.0);
        assert_eq!(clean.labor.technicians, 3);
        assert_eq!(clean.pricing.quantity, 1);
    }

    #[test]
    fn test_setup_and_post_processing_sums() {
        let time = TimeConfig {
            layout: 1.0,
            machine_prep: 0.5,
            unpack: 2.0,
            heat_treat: 8.0,
            edm: 1.0,
            mach_rough: 0.0,
            mach_fine: 0.25,
            abrasive: 0.75,
        };
        assert_eq!(time.setup_hours(), 1.5);
        assert_eq!(time.post_processing_hours(), 12.0);
    }

    #[test]
    fn test_params_round_trip() {
        let mut config = PowderBedConfig::default();
        config.material.density_solid = 8.0;
        config.time.edm = 2.5;
        config.labor.engineers = 4;
        config.pricing.quantity = 10;
        let params = config.to_params();
        assert_eq!(params.get("density_solid"), Some("8"));
        assert_eq!(PowderBedConfig::from_params(&params), config);
    }

    #[test]
    fn test_every_field_default_is_accepted() {
        for field in POWDER_BED_FIELDS {
            assert_eq!(field.sanitize(field.default), field.default, "{}", field.key);
        }
    }
}
