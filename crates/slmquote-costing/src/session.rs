//! Quote session
//!
//! Holds the part currently being quoted and the batch it may be added to.
//! One session per quoting context; nothing is global.

use crate::batch::{BatchLineItem, BatchQuote};
use crate::config::PowderBedConfig;
use crate::powder_bed::{self, CostBreakdown};
use crate::simple::{self, SimpleConfig, SimpleQuote};
use slmquote_core::{GeometryStats, MeshFormatError, PreconditionError};
use slmquote_mesh::{analyze, decode, decode_str};
use tracing::{info, warn};

/// Name used for a part when none is given
pub const DEFAULT_PART_NAME: &str = "SLM part";

/// Derive a part name from a file name: drop a trailing `.stl`
pub fn part_name_from_file(file_name: &str) -> String {
    let trimmed = file_name.trim();
    let stem = match trimmed.len().checked_sub(4) {
        Some(cut)
            if trimmed.is_char_boundary(cut) && trimmed[cut..].eq_ignore_ascii_case(".stl") =>
        {
            &trimmed[..cut]
        }
        _ => trimmed,
    };
    if stem.is_empty() {
        DEFAULT_PART_NAME.to_string()
    } else {
        stem.to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuoteSession {
    part_name: String,
    geometry: Option<GeometryStats>,
    batch: BatchQuote,
}

impl QuoteSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose batch starts at `tariff`
    pub fn with_tariff(tariff: f64) -> Self {
        Self {
            batch: BatchQuote::new(tariff),
            ..Self::default()
        }
    }

    /// Decode and analyze a mesh, making it the current part
    ///
    /// On a decode error the previously loaded part stays current.
    pub fn load_mesh(
        &mut self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<&GeometryStats, MeshFormatError> {
        let mesh =
            decode(bytes).inspect_err(|e| warn!("Failed to decode {}: {}", file_name, e))?;
        Ok(self.set_current(file_name, analyze(&mesh)))
    }

    /// Text variant of [`load_mesh`](Self::load_mesh)
    pub fn load_mesh_str(
        &mut self,
        file_name: &str,
        text: &str,
    ) -> Result<&GeometryStats, MeshFormatError> {
        let mesh =
            decode_str(text).inspect_err(|e| warn!("Failed to decode {}: {}", file_name, e))?;
        Ok(self.set_current(file_name, analyze(&mesh)))
    }

    fn set_current(&mut self, file_name: &str, stats: GeometryStats) -> &GeometryStats {
        self.part_name = part_name_from_file(file_name);
        info!(
            "Loaded {}: {} triangles, {:.2} cm³",
            self.part_name,
            stats.triangle_count,
            stats.volume_cm3()
        );
        self.geometry.insert(stats)
    }

    pub fn geometry(&self) -> Option<&GeometryStats> {
        self.geometry.as_ref()
    }

    pub fn part_name(&self) -> &str {
        if self.part_name.is_empty() {
            DEFAULT_PART_NAME
        } else {
            &self.part_name
        }
    }

    pub fn set_part_name(&mut self, name: impl Into<String>) {
        self.part_name = name.into();
    }

    fn current(&self) -> Result<&GeometryStats, PreconditionError> {
        self.geometry.as_ref().ok_or(PreconditionError::NoGeometry)
    }

    pub fn quote_powder_bed(
        &self,
        config: &PowderBedConfig,
    ) -> Result<CostBreakdown, PreconditionError> {
        powder_bed::estimate(self.current()?, config)
    }

    pub fn quote_simple(&self, config: &SimpleConfig) -> Result<SimpleQuote, PreconditionError> {
        simple::estimate(self.current()?, config)
    }

    /// Append the current part to the batch
    pub fn add_current_to_batch(&mut self) -> Result<&BatchLineItem, PreconditionError> {
        let stats = *self.current()?;
        let name = self.part_name().to_string();
        self.batch.add_geometry(name, &stats)
    }

    pub fn batch(&self) -> &BatchQuote {
        &self.batch
    }

    pub fn batch_mut(&mut self) -> &mut BatchQuote {
        &mut self.batch
    }

    /// Forget the current part; the batch is kept
    pub fn clear_geometry(&mut self) {
        self.geometry = None;
        self.part_name.clear();
    }
}
