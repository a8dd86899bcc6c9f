use approx::assert_relative_eq;
use proptest::prelude::*;
use slmquote_core::{Mesh, Point3};
use slmquote_mesh::fixtures::{cube_binary, cube_mesh, cuboid, CUBE_ASCII};
use slmquote_mesh::{analyze, decode};

#[test]
fn test_ascii_and_binary_cube_agree() {
    let ascii = analyze(&decode(CUBE_ASCII.as_bytes()).unwrap());
    let binary = analyze(&decode(&cube_binary()).unwrap());
    assert_eq!(ascii, binary);
}

#[test]
fn test_cube_bounding_box() {
    let stats = analyze(&cube_mesh());
    let bbox = stats.bounding_box.unwrap();
    assert_eq!(bbox.min, Point3::new(0.0, 0.0, 0.0));
    assert_eq!(bbox.max, Point3::new(10.0, 10.0, 10.0));
    assert_relative_eq!(stats.volume_cm3(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(stats.area_cm2(), 6.0, epsilon = 1e-12);
}

#[test]
fn test_two_disjoint_boxes_add_up() {
    let mut triangles = cuboid(Point3::origin(), 10.0, 10.0, 10.0).into_triangles();
    triangles.extend(cuboid(Point3::new(50.0, 0.0, 0.0), 2.0, 3.0, 4.0).into_triangles());
    let stats = analyze(&Mesh::new(triangles));
    assert_eq!(stats.triangle_count, 24);
    assert_relative_eq!(stats.volume_mm3, 1024.0, epsilon = 1e-9);
    assert_relative_eq!(stats.size_mm().unwrap().x, 52.0);
}

proptest! {
    #[test]
    fn prop_triangle_order_does_not_matter(seed in any::<u64>()) {
        let mut triangles = cube_mesh().into_triangles();
        // deterministic Fisher-Yates driven by the seed
        let mut state = seed;
        for i in (1..triangles.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            triangles.swap(i, j);
        }
        let shuffled = analyze(&Mesh::new(triangles));
        let original = analyze(&cube_mesh());
        prop_assert!((shuffled.volume_mm3 - original.volume_mm3).abs() < 1e-9);
        prop_assert!((shuffled.area_mm2 - original.area_mm2).abs() < 1e-9);
        prop_assert_eq!(shuffled.bounding_box, original.bounding_box);
    }

    #[test]
    fn prop_box_volume_matches_dimensions(
        dx in 0.1f64..500.0,
        dy in 0.1f64..500.0,
        dz in 0.1f64..500.0,
        ox in -100.0f64..100.0,
    ) {
        let stats = analyze(&cuboid(Point3::new(ox, 0.0, 0.0), dx, dy, dz));
        let expected = dx * dy * dz;
        prop_assert!((stats.volume_mm3 - expected).abs() <= expected * 1e-9 + 1e-6);
        prop_assert!(stats.volume_mm3 >= 0.0);
        prop_assert!(stats.area_mm2 >= 0.0);
    }
}
