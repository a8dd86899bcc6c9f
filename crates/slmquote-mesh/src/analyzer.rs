//! Geometry analysis
//!
//! Derives enclosed volume, surface area and bounding extents from a
//! triangle soup in a single pass.

use slmquote_core::{BoundingBox, GeometryStats, Mesh};
use tracing::debug;

/// Analyze a mesh
///
/// The volume is the absolute value of the summed signed tetrahedron
/// volumes, which is exact for a closed, consistently wound mesh. Open or
/// inconsistently wound meshes still produce a number, just not a
/// meaningful one.
pub fn analyze(mesh: &Mesh) -> GeometryStats {
    if mesh.is_empty() {
        debug!("Analyzed empty mesh");
        return GeometryStats::empty();
    }

    let mut signed_volume = 0.0;
    let mut area = 0.0;
    let mut bounds: Option<BoundingBox> = None;

    for triangle in mesh {
        let cross = triangle.edge_cross();
        signed_volume += triangle.vertices[0].coords.dot(&cross) / 6.0;
        area += cross.norm() * 0.5;

        for v in &triangle.vertices {
            match bounds.as_mut() {
                Some(b) => b.include(v),
                None => bounds = Some(BoundingBox::from_point(*v)),
            }
        }
    }

    let stats = GeometryStats {
        triangle_count: mesh.triangle_count(),
        volume_mm3: signed_volume.abs(),
        area_mm2: area,
        bounding_box: bounds,
    };

    debug!(
        "Analyzed mesh: {} triangles, volume {:.3} mm³, area {:.3} mm²",
        stats.triangle_count, stats.volume_mm3, stats.area_mm2
    );

    stats
}

/// Sum of signed tetrahedron volumes, before taking the absolute value
///
/// Negative for a closed mesh whose triangles are wound inward.
pub fn signed_volume(mesh: &Mesh) -> f64 {
    mesh.iter().map(|t| t.signed_volume()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cube_mesh, cuboid};
    use approx::assert_relative_eq;
    use slmquote_core::{Point3, Triangle};

    #[test]
    fn test_cube_stats() {
        let stats = analyze(&cube_mesh());
        assert_eq!(stats.triangle_count, 12);
        assert_relative_eq!(stats.volume_mm3, 1000.0, epsilon = 1e-9);
        assert_relative_eq!(stats.area_mm2, 600.0, epsilon = 1e-9);
        assert_relative_eq!(stats.height_mm().unwrap(), 10.0);
    }

    #[test]
    fn test_inward_winding_gives_same_volume() {
        let flipped: Mesh = cube_mesh()
            .iter()
            .map(|t| Triangle::new(t.vertices[0], t.vertices[2], t.vertices[1]))
            .collect();
        assert!(signed_volume(&flipped) < 0.0);
        assert_relative_eq!(analyze(&flipped).volume_mm3, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_translation_invariance() {
        let base = analyze(&cuboid(Point3::origin(), 20.0, 5.0, 3.0));
        let moved = analyze(&cuboid(Point3::new(-40.0, 12.5, 100.0), 20.0, 5.0, 3.0));
        assert_relative_eq!(base.volume_mm3, moved.volume_mm3, epsilon = 1e-6);
        assert_relative_eq!(base.area_mm2, moved.area_mm2, epsilon = 1e-6);
        assert_relative_eq!(base.volume_mm3, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_mesh() {
        let stats = analyze(&Mesh::default());
        assert_eq!(stats, GeometryStats::empty());
    }
}
