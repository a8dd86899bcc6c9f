//! STL writers
//!
//! Serialize a [`Mesh`] back into either STL layout. Facet normals are
//! derived from the vertex winding.

use crate::decoder::{binary_len, COUNT_SIZE, HEADER_SIZE, RECORD_SIZE};
use byteorder::{ByteOrder, LittleEndian};
use slmquote_core::{Mesh, Point3};

const BINARY_HEADER: &[u8] = b"binary STL written by slmquote";

/// Encode a mesh as binary STL
///
/// Meshes with more than `u32::MAX` triangles cannot be represented and are
/// truncated to that count.
pub fn encode_binary(mesh: &Mesh) -> Vec<u8> {
    let count = u32::try_from(mesh.triangle_count()).unwrap_or(u32::MAX);
    let mut buf = vec![0u8; binary_len(count) as usize];

    buf[..BINARY_HEADER.len()].copy_from_slice(BINARY_HEADER);
    LittleEndian::write_u32(&mut buf[HEADER_SIZE..HEADER_SIZE + COUNT_SIZE], count);

    let records = buf[HEADER_SIZE + COUNT_SIZE..].chunks_exact_mut(RECORD_SIZE);
    for (record, triangle) in records.zip(mesh.iter()) {
        let n = triangle.normal();
        write_f32s(&mut record[0..12], [n.x, n.y, n.z]);
        for (i, v) in triangle.vertices.iter().enumerate() {
            let offset = 12 + i * 12;
            write_point(&mut record[offset..offset + 12], v);
        }
        // attribute byte count stays zero
    }

    buf
}

fn write_point(dst: &mut [u8], p: &Point3) {
    write_f32s(dst, [p.x, p.y, p.z]);
}

fn write_f32s(dst: &mut [u8], values: [f64; 3]) {
    for (chunk, value) in dst.chunks_exact_mut(4).zip(values) {
        LittleEndian::write_f32(chunk, value as f32);
    }
}

/// Encode a mesh as ASCII STL named `name`
pub fn encode_ascii(mesh: &Mesh, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {}\n", name));
    for triangle in mesh {
        let n = triangle.normal();
        out.push_str(&format!("facet normal {} {} {}\n", n.x, n.y, n.z));
        out.push_str("outer loop\n");
        for v in &triangle.vertices {
            out.push_str(&format!("vertex {} {} {}\n", v.x, v.y, v.z));
        }
        out.push_str("endloop\n");
        out.push_str("endfacet\n");
    }
    out.push_str(&format!("endsolid {}\n", name));
    out
}
