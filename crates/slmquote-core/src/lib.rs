//! # SLM Quote Core
//!
//! Core types and utilities shared by every SLM Quote crate.
//! Provides the mesh data model, the error taxonomy, the named-parameter
//! fallback layer, unit helpers and the powder materials database.

pub mod data;
pub mod error;
pub mod geometry;
pub mod params;
pub mod units;

pub use data::{init_standard_library, AlloyFamily, MaterialId, MaterialLibrary, PowderMaterial};

pub use error::{MeshFormatError, PreconditionError};

pub use geometry::{BoundingBox, GeometryStats, Mesh, Point3, Triangle};

pub use params::{clamp_quantity, parse_count, parse_number, FieldSpec, ParameterSet, ZeroPolicy};

pub use units::VolumeUnit;
