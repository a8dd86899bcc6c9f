//! Powder Materials Database module
//!
//! This module provides:
//! - Alloy families for organization
//! - Powder material properties (solid density, bulk powder density, price)
//! - Material library management
//! - Custom material support

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Alloy families for organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum AlloyFamily {
    /// Aluminium casting alloys (AlSi10Mg, AlSi7Mg)
    Aluminium,
    /// Stainless and tool steels (316L, 17-4PH, maraging)
    Steel,
    /// Titanium alloys (Ti6Al4V)
    Titanium,
    /// Anything user-defined
    Other,
}

impl std::fmt::Display for AlloyFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aluminium => write!(f, "Aluminium"),
            Self::Steel => write!(f, "Steel"),
            Self::Titanium => write!(f, "Titanium"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Material identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct MaterialId(pub String);

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MaterialId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Complete powder material definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowderMaterial {
    /// Unique material identifier
    pub id: MaterialId,
    /// Display name
    pub name: String,
    /// Alloy family
    pub family: AlloyFamily,
    /// Brief description
    pub description: String,

    /// Density of the fused solid in g/cm³
    pub density_solid: f64,
    /// Bulk density of the loose powder in g/cm³
    pub density_powder: f64,
    /// Powder price per kilogram
    pub price_per_kg: f64,

    /// Whether this is a user-defined custom material
    pub custom: bool,
    /// Notes and tips
    pub notes: String,
}

impl PowderMaterial {
    /// Create a new material with basic properties
    pub fn new(id: MaterialId, name: String, family: AlloyFamily) -> Self {
        Self {
            id,
            name,
            family,
            description: String::new(),
            density_solid: 4.43,
            density_powder: 2.2,
            price_per_kg: 10000.0,
            custom: false,
            notes: String::new(),
        }
    }

    /// Set the density and price figures in one go
    pub fn with_properties(mut self, density_solid: f64, density_powder: f64, price: f64) -> Self {
        self.density_solid = density_solid;
        self.density_powder = density_powder;
        self.price_per_kg = price;
        self
    }
}

/// Materials library - manages collection of powder materials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialLibrary {
    /// Collection of materials by ID
    materials: HashMap<MaterialId, PowderMaterial>,
}

impl MaterialLibrary {
    /// Create a new empty library
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
        }
    }

    /// Add a material to the library
    pub fn add_material(&mut self, material: PowderMaterial) {
        self.materials.insert(material.id.clone(), material);
    }

    /// Look a material up by ID or (case-insensitive) name
    pub fn find(&self, key: &str) -> Option<&PowderMaterial> {
        self.materials.get(&MaterialId::from(key)).or_else(|| {
            self.materials
                .values()
                .find(|m| m.name.eq_ignore_ascii_case(key) || m.id.0.eq_ignore_ascii_case(key))
        })
    }

    /// Get all materials, ordered by ID
    pub fn get_all_materials(&self) -> Vec<&PowderMaterial> {
        let mut all: Vec<_> = self.materials.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Get the number of materials in the library
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check if library is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize the standard library with the common SLM powders
pub fn init_standard_library() -> MaterialLibrary {
    let mut library = MaterialLibrary::new();

    let mut alsi10mg = PowderMaterial::new(
        MaterialId("AlSi10Mg".to_string()),
        "AlSi10Mg".to_string(),
        AlloyFamily::Aluminium,
    )
    .with_properties(2.67, 1.3, 8000.0);
    alsi10mg.description = "Aluminium casting alloy, the workhorse SLM aluminium".to_string();
    library.add_material(alsi10mg);

    let mut ss316l = PowderMaterial::new(
        MaterialId("316L".to_string()),
        "316L".to_string(),
        AlloyFamily::Steel,
    )
    .with_properties(8.0, 4.0, 6000.0);
    ss316l.description = "Austenitic stainless steel".to_string();
    library.add_material(ss316l);

    let mut ti64 = PowderMaterial::new(
        MaterialId("Ti64".to_string()),
        "Ti6Al4V".to_string(),
        AlloyFamily::Titanium,
    )
    .with_properties(4.43, 2.2, 15000.0);
    ti64.description = "Titanium alloy grade 5".to_string();
    library.add_material(ti64);

    let mut custom = PowderMaterial::new(
        MaterialId("custom".to_string()),
        "Custom material".to_string(),
        AlloyFamily::Other,
    )
    .with_properties(4.43, 2.2, 10000.0);
    custom.custom = true;
    custom.notes = "Starting point for a user-defined powder; adjust densities and price".to_string();
    library.add_material(custom);

    library
}
