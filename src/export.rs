//! Export rendering
//!
//! Plain-text renderings of quotes for pasting into spreadsheets and
//! offers: the one-line powder-bed quote, a sectioned cost breakdown and the
//! tab-separated batch table.

use serde::{Deserialize, Serialize};
use slmquote_core::units::{format_money, format_volume};
use slmquote_core::VolumeUnit;
use slmquote_costing::{BatchQuote, CostBreakdown, DEFAULT_PART_NAME};
use std::fmt::Write;
use std::str::FromStr;

/// Rendering of an empty batch
pub const EMPTY_BATCH: &str = "—";

/// One-line quote: `index - name - sell price - quantity - batch price`
///
/// The index is clamped to at least one and a blank name is replaced by the
/// default part name.
pub fn quote_line(index: i64, name: &str, breakdown: &CostBreakdown) -> String {
    let index = index.max(1);
    let name = match name.trim() {
        "" => DEFAULT_PART_NAME,
        trimmed => trimmed,
    };
    format!(
        "{} - {} - {} - {} - {}",
        index,
        name,
        format_money(breakdown.sell_price),
        breakdown.quantity,
        format_money(breakdown.batch_price)
    )
}

/// Sectioned, human-readable powder-bed breakdown
pub fn breakdown_report(breakdown: &CostBreakdown) -> String {
    let m = &breakdown.material;
    let t = &breakdown.time;
    let c = &breakdown.items;
    let support_percent = if m.part_volume_cm3 > 0.0 {
        (m.build_volume_cm3 / m.part_volume_cm3 - 1.0) * 100.0
    } else {
        0.0
    };

    let mut out = String::new();
    let mut row = |label: &str, value: String| {
        let _ = writeln!(out, "  {:<28}{:>14}", label, value);
    };

    row("MATERIAL", String::new());
    row("Part volume", format!("{:.2} cm³", m.part_volume_cm3));
    row(
        &format!("+ supports ({:.0}%)", support_percent),
        format!("{:.2} cm³", m.build_volume_cm3),
    );
    row("Fused mass", format!("{:.3} kg", m.fused_mass_kg));
    row("Chamber powder volume", format!("{:.0} cm³", m.chamber_volume_cm3));
    row("Powder charge", format!("{:.2} kg", m.powder_mass_kg));
    row("Powder loss", format!("{:.3} kg", m.loss_mass_kg));
    row("Returnable powder", format!("{:.2} kg", m.returnable_mass_kg));

    row("TIME", String::new());
    row("Build", format!("{:.1} h", t.build_hours));
    row("Setup", format!("{:.1} h", t.setup_hours));
    row("Monitoring", format!("{:.1} h", t.monitoring_hours));
    row("Post-processing", format!("{:.1} h", t.post_processing_hours));

    row("COSTS", String::new());
    row("Powder (whole charge)", format_money(c.powder_all));
    row("Powder (fused)", format_money(c.fused));
    row("Powder loss", format_money(c.loss));
    row("Labor, engineers", format_money(c.labor_engineers));
    row("Labor, technicians", format_money(c.labor_technicians));
    row("Platform", format_money(c.platform));
    row(&format!("Gas (x{})", c.gas_units), format_money(c.gas));
    row(&format!("Filters (x{})", c.filter_units), format_money(c.filter));

    row("PRICE", String::new());
    row("Launch cost", format_money(breakdown.launch_cost));
    row("Cost price", format_money(breakdown.cost_price));
    row("Sell price", format_money(breakdown.sell_price));
    row(
        &format!("Batch price (x{})", breakdown.quantity),
        format_money(breakdown.batch_price),
    );

    out
}

/// Columns included in a batch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColumns {
    pub number: bool,
    pub name: bool,
    pub volume: bool,
    pub unit_price: bool,
    pub quantity: bool,
    pub total: bool,
}

impl Default for ExportColumns {
    fn default() -> Self {
        Self {
            number: true,
            name: true,
            volume: true,
            unit_price: true,
            quantity: true,
            total: true,
        }
    }
}

impl ExportColumns {
    /// No columns selected
    pub fn none() -> Self {
        Self {
            number: false,
            name: false,
            volume: false,
            unit_price: false,
            quantity: false,
            total: false,
        }
    }
}

impl FromStr for ExportColumns {
    type Err = String;

    /// Parse a comma-separated column list such as `num,name,total`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut columns = Self::none();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "num" | "number" => columns.number = true,
                "name" => columns.name = true,
                "volume" => columns.volume = true,
                "price" | "unit_price" => columns.unit_price = true,
                "qty" | "quantity" => columns.quantity = true,
                "total" => columns.total = true,
                other => return Err(format!("Unknown export column: {}", other)),
            }
        }
        Ok(columns)
    }
}

/// Batch table rendering options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub columns: ExportColumns,
    pub volume_unit: VolumeUnit,
}

/// Tab-separated batch table, one line per item in display order
///
/// Rows are numbered by position. Volumes use two decimals in cm³ or are
/// rounded in mm³; prices are rounded to whole units.
pub fn batch_table(batch: &BatchQuote, options: &ExportOptions) -> String {
    if batch.is_empty() {
        return EMPTY_BATCH.to_string();
    }

    let cols = &options.columns;
    batch
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let mut parts: Vec<String> = Vec::new();
            if cols.number {
                parts.push((index + 1).to_string());
            }
            if cols.name {
                parts.push(item.name.clone());
            }
            if cols.volume {
                parts.push(format_volume(item.volume_cm3, options.volume_unit));
            }
            if cols.unit_price {
                parts.push(format_money(item.unit_price));
            }
            if cols.quantity {
                parts.push(item.quantity.to_string());
            }
            if cols.total {
                parts.push(format_money(item.line_total));
            }
            parts.join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
