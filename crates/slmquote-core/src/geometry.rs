//! Mesh geometry types
//!
//! Triangle soup representation of a part and the statistics derived from it.
//! Coordinates are millimetres throughout.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A point in 3D space (millimetres)
pub type Point3 = nalgebra::Point3<f64>;

/// A triangle made up of three vertices in file order
///
/// The winding of the vertices decides the sign of the triangle's
/// volume contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Point3; 3],
}

impl Triangle {
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Cross product of the two edges leaving the first vertex.
    ///
    /// Its length is twice the triangle area; its direction is the
    /// right-hand normal of the winding.
    pub fn edge_cross(&self) -> Vector3<f64> {
        let [a, b, c] = self.vertices;
        (b - a).cross(&(c - a))
    }

    pub fn area(&self) -> f64 {
        self.edge_cross().norm() * 0.5
    }

    /// Signed volume of the tetrahedron spanned by the origin and this triangle
    pub fn signed_volume(&self) -> f64 {
        self.vertices[0].coords.dot(&self.edge_cross()) / 6.0
    }

    /// Unit normal, or zero for a degenerate triangle
    pub fn normal(&self) -> Vector3<f64> {
        let cross = self.edge_cross();
        let len = cross.norm();
        if len > 0.0 {
            cross / len
        } else {
            Vector3::zeros()
        }
    }
}

/// An ordered triangle soup
///
/// No deduplication is done and no connectivity is built. Degenerate
/// triangles are kept and simply contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    pub fn into_triangles(self) -> Vec<Triangle> {
        self.triangles
    }
}

impl FromIterator<Triangle> for Mesh {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    /// Box containing a single point
    pub fn from_point(p: Point3) -> Self {
        Self { min: p, max: p }
    }

    /// Grow the box to contain `p`
    pub fn include(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Extent along each axis
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Vertical (Z) extent
    pub fn height(&self) -> f64 {
        self.max.z - self.min.z
    }

    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Statistics derived from one mesh
///
/// Computed once; a different mesh needs a new analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryStats {
    pub triangle_count: usize,
    /// Enclosed volume in mm³
    pub volume_mm3: f64,
    /// Surface area in mm²
    pub area_mm2: f64,
    /// `None` when the mesh has no triangles
    pub bounding_box: Option<BoundingBox>,
}

impl GeometryStats {
    /// Statistics of a mesh without triangles
    pub fn empty() -> Self {
        Self {
            triangle_count: 0,
            volume_mm3: 0.0,
            area_mm2: 0.0,
            bounding_box: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count == 0
    }

    pub fn volume_cm3(&self) -> f64 {
        self.volume_mm3 / 1000.0
    }

    pub fn area_cm2(&self) -> f64 {
        self.area_mm2 / 100.0
    }

    /// Part height along Z, if the mesh has any vertex
    pub fn height_mm(&self) -> Option<f64> {
        self.bounding_box.map(|b| b.height())
    }

    pub fn size_mm(&self) -> Option<Vector3<f64>> {
        self.bounding_box.map(|b| b.size())
    }
}
