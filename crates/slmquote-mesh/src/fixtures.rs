//! Canonical test geometry
//!
//! The 10 mm demo cube shipped with the quoting tool, plus a generator for
//! arbitrary axis-aligned boxes with the same outward winding.

use crate::encoder::encode_binary;
use slmquote_core::{Mesh, Point3, Triangle};

/// ASCII STL of a 10 x 10 x 10 mm cube with one corner at the origin
pub const CUBE_ASCII: &str = "solid cube
facet normal 0 0 1
outer loop
vertex 0 0 10
vertex 10 0 10
vertex 0 10 10
endloop
endfacet
facet normal 0 0 1
outer loop
vertex 10 0 10
vertex 10 10 10
vertex 0 10 10
endloop
endfacet
facet normal 0 0 -1
outer loop
vertex 0 0 0
vertex 0 10 0
vertex 10 0 0
endloop
endfacet
facet normal 0 0 -1
outer loop
vertex 10 0 0
vertex 0 10 0
vertex 10 10 0
endloop
endfacet
facet normal 0 1 0
outer loop
vertex 0 10 0
vertex 0 10 10
vertex 10 10 0
endloop
endfacet
facet normal 0 1 0
outer loop
vertex 10 10 0
vertex 0 10 10
vertex 10 10 10
endloop
endfacet
facet normal 0 -1 0
outer loop
vertex 0 0 0
vertex 10 0 0
vertex 0 0 10
endloop
endfacet
facet normal 0 -1 0
outer loop
vertex 10 0 0
vertex 10 0 10
vertex 0 0 10
endloop
endfacet
facet normal 1 0 0
outer loop
vertex 10 0 0
vertex 10 10 0
vertex 10 0 10
endloop
endfacet
facet normal 1 0 0
outer loop
vertex 10 0 10
vertex 10 10 0
vertex 10 10 10
endloop
endfacet
facet normal -1 0 0
outer loop
vertex 0 0 0
vertex 0 0 10
vertex 0 10 0
endloop
endfacet
facet normal -1 0 0
outer loop
vertex 0 0 10
vertex 0 10 10
vertex 0 10 0
endloop
endfacet
endsolid cube\n";

/// Corner indices of each triangle, as (x, y, z) bits where 1 selects the
/// far side of the box. Ordered top, bottom, +Y, -Y, +X, -X.
const BOX_TRIANGLES: [[(u8, u8, u8); 3]; 12] = [
    [(0, 0, 1), (1, 0, 1), (0, 1, 1)],
    [(1, 0, 1), (1, 1, 1), (0, 1, 1)],
    [(0, 0, 0), (0, 1, 0), (1, 0, 0)],
    [(1, 0, 0), (0, 1, 0), (1, 1, 0)],
    [(0, 1, 0), (0, 1, 1), (1, 1, 0)],
    [(1, 1, 0), (0, 1, 1), (1, 1, 1)],
    [(0, 0, 0), (1, 0, 0), (0, 0, 1)],
    [(1, 0, 0), (1, 0, 1), (0, 0, 1)],
    [(1, 0, 0), (1, 1, 0), (1, 0, 1)],
    [(1, 0, 1), (1, 1, 0), (1, 1, 1)],
    [(0, 0, 0), (0, 0, 1), (0, 1, 0)],
    [(0, 0, 1), (0, 1, 1), (0, 1, 0)],
];

/// Axis-aligned box with its minimum corner at `origin`
pub fn cuboid(origin: Point3, dx: f64, dy: f64, dz: f64) -> Mesh {
    let corner = |(x, y, z): (u8, u8, u8)| {
        Point3::new(
            origin.x + f64::from(x) * dx,
            origin.y + f64::from(y) * dy,
            origin.z + f64::from(z) * dz,
        )
    };
    BOX_TRIANGLES
        .iter()
        .map(|[a, b, c]| Triangle::new(corner(*a), corner(*b), corner(*c)))
        .collect()
}

/// The demo cube as a mesh
pub fn cube_mesh() -> Mesh {
    cuboid(Point3::origin(), 10.0, 10.0, 10.0)
}

/// The demo cube encoded as binary STL
pub fn cube_binary() -> Vec<u8> {
    encode_binary(&cube_mesh())
}
