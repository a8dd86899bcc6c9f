//! Batch tariff aggregator
//!
//! A list of parts priced by volume at one run-wide tariff. Sequence numbers
//! stay contiguous from 1; sorting reorders items without touching any
//! computed value.

use serde::{Deserialize, Serialize};
use slmquote_core::{clamp_quantity, FieldSpec, GeometryStats, PreconditionError};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::{debug, warn};

/// Price per cm³
pub const TARIFF: FieldSpec = FieldSpec::zero_ok("tariff", 0.0);

/// One part in the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchLineItem {
    pub sequence: usize,
    pub name: String,
    pub volume_cm3: f64,
    /// Volume times tariff
    pub unit_price: f64,
    pub quantity: u32,
    /// Unit price times quantity
    pub line_total: f64,
}

impl BatchLineItem {
    fn reprice(&mut self, tariff: f64) {
        self.unit_price = self.volume_cm3 * tariff;
        self.line_total = self.unit_price * f64::from(self.quantity);
    }
}

/// Column a batch can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Number,
    Name,
    Volume,
    UnitPrice,
    Quantity,
    Total,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "num" | "number" => Ok(Self::Number),
            "name" => Ok(Self::Name),
            "volume" => Ok(Self::Volume),
            "price" | "unit_price" => Ok(Self::UnitPrice),
            "qty" | "quantity" => Ok(Self::Quantity),
            "total" => Ok(Self::Total),
            _ => Err(format!("Unknown sort column: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Current sort column and direction of a batch view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortState {
    /// Select a column: a new column sorts ascending, the same column flips
    pub fn toggle(&mut self, key: SortKey) {
        if self.column == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.column = Some(key);
            self.direction = SortDirection::Ascending;
        }
    }
}

fn compare(a: &BatchLineItem, b: &BatchLineItem, key: SortKey) -> Ordering {
    match key {
        SortKey::Number => a.sequence.cmp(&b.sequence),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Volume => a.volume_cm3.total_cmp(&b.volume_cm3),
        SortKey::UnitPrice => a.unit_price.total_cmp(&b.unit_price),
        SortKey::Quantity => a.quantity.cmp(&b.quantity),
        SortKey::Total => a.line_total.total_cmp(&b.line_total),
    }
}

/// The batch working set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchQuote {
    tariff: f64,
    items: Vec<BatchLineItem>,
}

impl BatchQuote {
    pub fn new(tariff: f64) -> Self {
        Self {
            tariff: TARIFF.sanitize(tariff),
            items: Vec::new(),
        }
    }

    pub fn tariff(&self) -> f64 {
        self.tariff
    }

    /// Change the tariff and reprice every item
    pub fn set_tariff(&mut self, tariff: f64) {
        self.tariff = TARIFF.sanitize(tariff);
        for item in &mut self.items {
            item.reprice(self.tariff);
        }
        debug!("Batch tariff set to {}", self.tariff);
    }

    /// Append a part with quantity 1
    pub fn add_item(&mut self, name: impl Into<String>, volume_cm3: f64) -> &BatchLineItem {
        let volume_cm3 = if volume_cm3.is_finite() && volume_cm3 >= 0.0 {
            volume_cm3
        } else {
            warn!("Invalid part volume {}, using 0", volume_cm3);
            0.0
        };
        let mut item = BatchLineItem {
            sequence: self.items.len() + 1,
            name: name.into(),
            volume_cm3,
            unit_price: 0.0,
            quantity: 1,
            line_total: 0.0,
        };
        item.reprice(self.tariff);
        debug!("Batch item {} added: {}", item.sequence, item.name);
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    /// Append an analyzed part
    pub fn add_geometry(
        &mut self,
        name: impl Into<String>,
        stats: &GeometryStats,
    ) -> Result<&BatchLineItem, PreconditionError> {
        if stats.is_empty() {
            return Err(PreconditionError::EmptyGeometry);
        }
        Ok(self.add_item(name, stats.volume_cm3()))
    }

    /// Remove an item and renumber the rest by position
    pub fn remove_item(&mut self, sequence: usize) -> Option<BatchLineItem> {
        let index = self.items.iter().position(|i| i.sequence == sequence)?;
        let removed = self.items.remove(index);
        self.renumber();
        Some(removed)
    }

    fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.sequence = index + 1;
        }
    }

    /// Set an item's quantity, clamped to at least one
    ///
    /// Returns `false` when no item has that sequence number.
    pub fn set_quantity(&mut self, sequence: usize, quantity: i64) -> bool {
        let tariff = self.tariff;
        match self.items.iter_mut().find(|i| i.sequence == sequence) {
            Some(item) => {
                item.quantity = clamp_quantity(quantity);
                item.reprice(tariff);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, sequence: usize) -> Option<&BatchLineItem> {
        self.items.iter().find(|i| i.sequence == sequence)
    }

    /// Items in display order
    pub fn items(&self) -> &[BatchLineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all line totals
    pub fn grand_total(&self) -> f64 {
        self.items.iter().map(|i| i.line_total).sum()
    }

    /// Stable sort by one column
    pub fn sort_by(&mut self, key: SortKey, direction: SortDirection) {
        self.items.sort_by(|a, b| {
            let ord = compare(a, b, key);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }

    /// Apply a sort state; no column leaves the order untouched
    pub fn apply_sort(&mut self, state: SortState) {
        if let Some(key) = state.column {
            self.sort_by(key, state.direction);
        }
    }
}
