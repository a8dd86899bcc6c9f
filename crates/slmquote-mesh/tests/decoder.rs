use slmquote_core::{Mesh, MeshFormatError, Point3, Triangle};
use slmquote_mesh::fixtures::{cube_binary, cube_mesh, CUBE_ASCII};
use slmquote_mesh::{decode, decode_str, detect_format, encode_ascii, encode_binary, StlFormat};

#[test]
fn test_decode_ascii_cube() {
    let mesh = decode(CUBE_ASCII.as_bytes()).unwrap();
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.triangles()[0].vertices[0], Point3::new(0.0, 0.0, 10.0));
}

#[test]
fn test_decode_binary_cube() {
    let bytes = cube_binary();
    assert_eq!(bytes.len(), 84 + 12 * 50);
    assert_eq!(detect_format(&bytes), Ok(StlFormat::Binary));
    assert_eq!(decode(&bytes).unwrap(), cube_mesh());
}

#[test]
fn test_binary_header_starting_with_solid_is_binary() {
    let mut bytes = cube_binary();
    bytes[..5].copy_from_slice(b"solid");
    assert_eq!(detect_format(&bytes), Ok(StlFormat::Binary));
    assert_eq!(decode(&bytes).unwrap().triangle_count(), 12);
}

#[test]
fn test_zero_triangle_binary_is_empty_mesh() {
    let bytes = encode_binary(&Mesh::default());
    assert_eq!(bytes.len(), 84);
    let mesh = decode(&bytes).unwrap();
    assert!(mesh.is_empty());
}

#[test]
fn test_truncated_binary_is_rejected() {
    let bytes = cube_binary();
    let truncated = &bytes[..bytes.len() - 10];
    assert_eq!(
        decode(truncated),
        Err(MeshFormatError::LengthMismatch {
            declared: 12,
            expected: 684,
            actual: 674,
        })
    );
}

#[test]
fn test_empty_buffer() {
    assert_eq!(decode(b""), Err(MeshFormatError::Empty));
    assert_eq!(decode_str(""), Err(MeshFormatError::Empty));
}

#[test]
fn test_short_garbage_is_unrecognized() {
    assert_eq!(
        decode(&[0xff; 20]),
        Err(MeshFormatError::Unrecognized { length: 20 })
    );
}

#[test]
fn test_incomplete_ascii_triangle() {
    let text = "solid broken\nvertex 0 0 0\nvertex 1 0 0\nendsolid broken\n";
    assert_eq!(
        decode(text.as_bytes()),
        Err(MeshFormatError::IncompleteTriangle { vertices: 2 })
    );
}

#[test]
fn test_ascii_without_vertices() {
    assert_eq!(
        decode(b"solid nothing\nendsolid nothing\n"),
        Err(MeshFormatError::NoVertices)
    );
}

#[test]
fn test_ascii_round_trip_preserves_order() {
    let mesh = Mesh::new(vec![
        Triangle::new(
            Point3::new(0.5, -1.25, 3.0),
            Point3::new(2.0, 0.0, 1e-3),
            Point3::new(-7.0, 8.0, 9.0),
        ),
        Triangle::new(
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
        ),
    ]);
    let text = encode_ascii(&mesh, "part");
    assert_eq!(decode_str(&text).unwrap(), mesh);
}

#[test]
fn test_decode_is_idempotent() {
    let first = decode(CUBE_ASCII.as_bytes()).unwrap();
    let second = decode(CUBE_ASCII.as_bytes()).unwrap();
    assert_eq!(first, second);
}
