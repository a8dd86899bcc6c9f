//! # SLM Quote Mesh
//!
//! STL decoding, encoding and geometric analysis for SLM Quote.
//! Turns a raw buffer into a triangle soup and the triangle soup into
//! volume, surface area and bounding extents.

pub mod analyzer;
pub mod decoder;
pub mod encoder;
pub mod fixtures;

pub use analyzer::{analyze, signed_volume};
pub use decoder::{decode, decode_ascii, decode_binary, decode_str, detect_format, StlFormat};
pub use encoder::{encode_ascii, encode_binary};
