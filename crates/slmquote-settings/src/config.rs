//! Configuration file handling for SLM Quote
//!
//! Provides the persisted quoting configuration. Supports JSON and TOML
//! files stored in the platform configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Powder-bed costing (material, machine, time, labor, consumables, pricing)
//! - Simplified costing
//! - Batch tariff and export unit
//!
//! A loaded file goes through the same sanitising as named parameters, so an
//! out-of-range value in a file falls back to its default instead of failing.

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use slmquote_core::{MaterialLibrary, ParameterSet, PowderMaterial, VolumeUnit};
use slmquote_costing::batch::TARIFF;
use slmquote_costing::{ConfigSection, PowderBedConfig, SimpleConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Application directory name under the platform config dir
pub const APP_DIR: &str = "slmquote";

/// Default config file name
pub const CONFIG_FILE: &str = "config.toml";

/// File format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Batch settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Price per cm³
    pub tariff: f64,
    /// Volume unit of exported batch tables
    pub volume_unit: VolumeUnit,
}

/// Complete quoting configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Powder preset whose densities and price override the material section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_preset: Option<String>,
    /// Detailed powder-bed costing
    pub powder_bed: PowderBedConfig,
    /// Simplified costing
    pub simple: SimpleConfig,
    /// Batch aggregator
    pub batch: BatchSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        debug!("Loaded config from {}", path.display());
        Ok(config.sanitized())
    }

    /// Load config from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        let format = ConfigFormat::from_path(path)?;
        let clean = self.sanitized();

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(&clean)?,
            ConfigFormat::Toml => toml::to_string_pretty(&clean)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Copy with every numeric field inside its valid domain
    pub fn sanitized(&self) -> Self {
        Self {
            material_preset: self
                .material_preset
                .as_ref()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            powder_bed: self.powder_bed.sanitized(),
            simple: self.simple.sanitized(),
            batch: BatchSettings {
                tariff: TARIFF.sanitize(self.batch.tariff),
                volume_unit: self.batch.volume_unit,
            },
        }
    }

    /// Look up the configured preset, if any
    pub fn preset<'a>(
        &self,
        library: &'a MaterialLibrary,
    ) -> SettingsResult<Option<&'a PowderMaterial>> {
        match &self.material_preset {
            None => Ok(None),
            Some(key) => library
                .find(key)
                .map(Some)
                .ok_or_else(|| SettingsError::UnknownMaterial(key.clone())),
        }
    }

    /// Apply the configured preset to both costing sections
    pub fn resolve_material(&mut self, library: &MaterialLibrary) -> SettingsResult<()> {
        if let Some(material) = self.preset(library)? {
            debug!("Applying material preset {}", material.id);
            self.powder_bed.material.apply_material(material);
            self.simple.apply_material(material);
        }
        Ok(())
    }

    /// Powder-bed configuration with named overrides applied on top
    pub fn powder_bed_with(&self, overrides: &ParameterSet) -> PowderBedConfig {
        let mut params = self.powder_bed.to_params();
        params.merge(overrides);
        PowderBedConfig::from_params(&params)
    }

    /// Simplified configuration with named overrides applied on top
    pub fn simple_with(&self, overrides: &ParameterSet) -> SimpleConfig {
        let mut params = self.simple.to_params();
        params.merge(overrides);
        SimpleConfig::from_params(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/config.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("CONFIG.JSON")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("config.yaml")).is_err());
        assert!(ConfigFormat::from_path(Path::new("config")).is_err());
    }

    #[test]
    fn test_default_path_ends_with_app_file() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with("slmquote/config.toml"));
        }
    }

    #[test]
    fn test_blank_preset_is_dropped() {
        let config = Config {
            material_preset: Some("  ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.sanitized().material_preset, None);
    }
}
