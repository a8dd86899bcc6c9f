//! Error handling for SLM Quote
//!
//! Provides error types for every layer of the engine:
//! - Mesh format errors (decoding STL buffers)
//! - Precondition errors (costing without usable geometry)
//!
//! Parameter fallbacks are not errors: a missing or invalid
//! configuration value is replaced by its default, never reported as an error.
//!
//! Each layer returns its own enum; the binary wraps them with `anyhow`.

use thiserror::Error;

/// Mesh format error type
///
/// Raised when a raw buffer matches neither STL layout, or matches one but
/// cannot be decoded into whole triangles. Fatal to that decode call only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshFormatError {
    /// The buffer contains no bytes
    #[error("Mesh buffer is empty")]
    Empty,

    /// The buffer is neither a textual nor a binary STL
    #[error("Buffer is neither ASCII nor binary STL ({length} bytes)")]
    Unrecognized {
        /// Length of the rejected buffer.
        length: usize,
    },

    /// Binary record table does not match the declared triangle count
    #[error(
        "Binary STL declares {declared} triangles ({expected} bytes) but buffer has {actual} bytes"
    )]
    LengthMismatch {
        /// Triangle count read from the header.
        declared: u32,
        /// Byte length implied by the declared count.
        expected: u64,
        /// Actual buffer length.
        actual: usize,
    },

    /// Textual STL vertex count is not a multiple of three
    #[error("ASCII STL contains {vertices} vertices, which is not a whole number of triangles")]
    IncompleteTriangle {
        /// Number of vertex records found.
        vertices: usize,
    },

    /// Textual STL without a single vertex record
    #[error("ASCII STL contains no vertex records")]
    NoVertices,
}

/// Precondition error type
///
/// A cost calculation was requested without geometry to base it on.
/// This is never silently computed as zero.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionError {
    /// No mesh has been analyzed yet
    #[error("No geometry loaded: analyze a mesh before requesting a quote")]
    NoGeometry,

    /// The analyzed mesh has no triangles
    #[error("Geometry is empty: the mesh has no triangles")]
    EmptyGeometry,
}
