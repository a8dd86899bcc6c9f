//! # SLM Quote Costing
//!
//! Cost estimation for SLM Quote, built on analyzed mesh geometry.
//! Provides the detailed powder-bed model, the simplified density and
//! machine-rate model, the batch tariff aggregator and the quote session
//! tying them together.

pub mod batch;
pub mod config;
pub mod powder_bed;
pub mod session;
pub mod simple;

pub use batch::{BatchLineItem, BatchQuote, SortDirection, SortKey, SortState};
pub use config::{
    ConfigSection, ConsumablesConfig, LaborConfig, MachineConfig, MaterialConfig,
    PowderBedConfig, PricingConfig, TimeConfig,
};
pub use powder_bed::{CostBreakdown, CostItems, MaterialUsage, TimeBreakdown};
pub use session::{part_name_from_file, QuoteSession, DEFAULT_PART_NAME};
pub use simple::{SimpleConfig, SimpleQuote, TimeSource, Trace, TraceStep};
