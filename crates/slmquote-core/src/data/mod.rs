//! Reference data
//!
//! - Powder materials database with densities and prices

pub mod materials;

pub use materials::{init_standard_library, AlloyFamily, MaterialId, MaterialLibrary, PowderMaterial};
