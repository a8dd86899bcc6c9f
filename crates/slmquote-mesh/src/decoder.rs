//! # STL Decoder
//!
//! Turns a raw STL buffer into an ordered triangle soup.
//!
//! ## Supported Formats
//! - Binary: 80-byte header, little-endian `u32` triangle count, then one
//!   50-byte record per triangle (normal, three vertices, attribute word)
//! - ASCII: `solid ... endsolid` with `vertex x y z` records
//!
//! Format detection trusts the binary length check first, because plenty of
//! exporters write binary files whose header starts with `solid`.

use byteorder::{LittleEndian, ReadBytesExt};
use regex::Regex;
use slmquote_core::{Mesh, MeshFormatError, Point3, Triangle};
use std::io::{Cursor, Read};
use std::sync::OnceLock;
use tracing::debug;

/// Size of the free-form binary header
pub const HEADER_SIZE: usize = 80;
/// Size of the triangle count that follows the header
pub const COUNT_SIZE: usize = 4;
/// Size of one binary triangle record
pub const RECORD_SIZE: usize = 50;

/// Keyword that opens an ASCII STL
const ASCII_KEYWORD: &[u8] = b"solid";

/// The two STL serializations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlFormat {
    Binary,
    Ascii,
}

impl std::fmt::Display for StlFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Ascii => write!(f, "ASCII"),
        }
    }
}

/// Byte length a binary STL declaring `count` triangles must have
pub fn binary_len(count: u32) -> u64 {
    (HEADER_SIZE + COUNT_SIZE) as u64 + u64::from(count) * RECORD_SIZE as u64
}

fn declared_count(buffer: &[u8]) -> Option<u32> {
    let bytes = buffer.get(HEADER_SIZE..HEADER_SIZE + COUNT_SIZE)?;
    let mut cursor = Cursor::new(bytes);
    cursor.read_u32::<LittleEndian>().ok()
}

fn starts_with_keyword(buffer: &[u8]) -> bool {
    let start = buffer
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(buffer.len());
    buffer[start..]
        .get(..ASCII_KEYWORD.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(ASCII_KEYWORD))
}

/// Decide which layout a buffer uses
///
/// Binary wins when the declared count accounts for the buffer length
/// exactly; otherwise a leading `solid` keyword selects ASCII.
pub fn detect_format(buffer: &[u8]) -> Result<StlFormat, MeshFormatError> {
    if buffer.is_empty() {
        return Err(MeshFormatError::Empty);
    }

    let declared = declared_count(buffer);
    if let Some(count) = declared {
        if binary_len(count) == buffer.len() as u64 {
            return Ok(StlFormat::Binary);
        }
    }

    if starts_with_keyword(buffer) {
        return Ok(StlFormat::Ascii);
    }

    match declared {
        Some(count) => Err(MeshFormatError::LengthMismatch {
            declared: count,
            expected: binary_len(count),
            actual: buffer.len(),
        }),
        None => Err(MeshFormatError::Unrecognized {
            length: buffer.len(),
        }),
    }
}

/// Decode an STL buffer of either layout
pub fn decode(buffer: &[u8]) -> Result<Mesh, MeshFormatError> {
    match detect_format(buffer)? {
        StlFormat::Binary => decode_binary(buffer),
        StlFormat::Ascii => decode_ascii(&String::from_utf8_lossy(buffer)),
    }
}

/// Decode STL text that is already a string
///
/// Text that does not open with `solid` is still scanned for vertex
/// records; callers with raw bytes should use [`decode`].
pub fn decode_str(text: &str) -> Result<Mesh, MeshFormatError> {
    if text.is_empty() {
        return Err(MeshFormatError::Empty);
    }
    decode_ascii(text)
}

/// Decode a binary STL
///
/// The buffer length must match the declared triangle count exactly; a
/// truncated or padded record table is rejected rather than partially read.
pub fn decode_binary(buffer: &[u8]) -> Result<Mesh, MeshFormatError> {
    let count = declared_count(buffer).ok_or(MeshFormatError::Unrecognized {
        length: buffer.len(),
    })?;
    let mismatch = MeshFormatError::LengthMismatch {
        declared: count,
        expected: binary_len(count),
        actual: buffer.len(),
    };
    if binary_len(count) != buffer.len() as u64 {
        return Err(mismatch);
    }

    debug!("Decoding binary STL: {} triangles", count);

    let mut cursor = Cursor::new(&buffer[HEADER_SIZE + COUNT_SIZE..]);
    let mut mesh = Mesh::with_capacity(count as usize);
    for _ in 0..count {
        let triangle = read_record(&mut cursor).map_err(|_| mismatch.clone())?;
        mesh.push(triangle);
    }

    Ok(mesh)
}

fn read_record<R: Read>(reader: &mut R) -> std::io::Result<Triangle> {
    // Facet normal is recomputed from the winding when needed
    read_point(reader)?;
    let a = read_point(reader)?;
    let b = read_point(reader)?;
    let c = read_point(reader)?;
    reader.read_u16::<LittleEndian>()?;
    Ok(Triangle::new(a, b, c))
}

fn read_point<R: Read>(reader: &mut R) -> std::io::Result<Point3> {
    let x = reader.read_f32::<LittleEndian>()?;
    let y = reader.read_f32::<LittleEndian>()?;
    let z = reader.read_f32::<LittleEndian>()?;
    Ok(Point3::new(f64::from(x), f64::from(y), f64::from(z)))
}

fn vertex_regex() -> &'static Regex {
    static VERTEX_REGEX: OnceLock<Regex> = OnceLock::new();
    VERTEX_REGEX.get_or_init(|| {
        let num = r"([-+]?\d*\.?\d+(?:[eE][-+]?\d+)?)";
        Regex::new(&format!(r"(?i:vertex)\s+{num}\s+{num}\s+{num}"))
            .expect("invalid vertex regex")
    })
}

/// Decode ASCII STL text
///
/// Only the `vertex` records are consumed; facet and loop keywords are not
/// validated. Every three consecutive vertices form one triangle, so a
/// vertex count that is not a multiple of three is an error.
pub fn decode_ascii(text: &str) -> Result<Mesh, MeshFormatError> {
    let vertices: Vec<Point3> = vertex_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let coord = |i: usize| caps.get(i)?.as_str().parse::<f64>().ok();
            Some(Point3::new(coord(1)?, coord(2)?, coord(3)?))
        })
        .collect();

    if vertices.is_empty() {
        return Err(MeshFormatError::NoVertices);
    }
    if vertices.len() % 3 != 0 {
        return Err(MeshFormatError::IncompleteTriangle {
            vertices: vertices.len(),
        });
    }

    debug!(
        "Decoded ASCII STL: {} vertices, {} triangles",
        vertices.len(),
        vertices.len() / 3
    );

    Ok(vertices
        .chunks_exact(3)
        .map(|v| Triangle::new(v[0], v[1], v[2]))
        .collect())
}
