use crate::scene::bounds::compute_world_aabb;
use crate::scene::node::Node;
use log::{debug, warn};
use nalgebra::{Point3, Vector3};

/// Result of seating a model in the viewer frame.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    /// Center of the bounding volume under the final (centered, scaled,
    /// ground-seated) transform. This is what the camera framer targets.
    pub bounding_center: Point3<f32>,
    /// Uniform factor that was applied. Exactly 1.0 for degenerate geometry.
    pub scale_factor: f32,
    /// World-space extents of the model after scaling, for the info readout.
    pub scaled_size: Vector3<f32>,
}

/// Centers a model at the origin, scales its largest dimension to
/// `target_size` and seats its lowest point on the ground plane at
/// `ground_height`.
///
/// Only the root transform is touched; child transforms and vertex data are
/// left as authored. The bounding volume is recomputed from world space
/// after every mutation rather than patched, so the placement is exact for
/// arbitrarily transformed child hierarchies, and re-normalizing an already
/// normalized model is a no-op.
///
/// Empty hierarchies degenerate to a zero-size box at the origin: no
/// scaling happens (factor 1.0) and the root origin is seated on the ground.
pub fn normalize(root: &mut Node, ground_height: f32, target_size: f32) -> Placement {
    // 1. Bounding volume under the current transform.
    let initial = compute_world_aabb(root);
    if root.is_empty() {
        warn!("normalizing a model without renderable geometry");
    }

    // 2. Move the bounding center to the origin. This decouples the
    //    scaling below from wherever the asset was authored.
    let center = initial.center();
    root.transform.translation -= center.coords;

    // 3. Recompute and measure. Zero extent means degenerate geometry and
    //    must not divide.
    let centered = compute_world_aabb(root);
    let max_size = centered.max_extent();
    let scale_factor = if max_size > 0.0 {
        target_size / max_size
    } else {
        1.0
    };

    // 4. Apply the factor uniformly; proportions are never distorted. The
    //    centering translation is scaled along so the model stays centered
    //    at the origin (root composition is T * S, and s*(p - c) needs the
    //    -c term multiplied by s).
    root.transform.scale *= scale_factor;
    root.transform.translation *= scale_factor;

    // 5. Recompute once more and lift so the lowest point rests exactly on
    //    the ground plane, regardless of the asset's authored pivot.
    let scaled = compute_world_aabb(root);
    root.transform.translation.y += ground_height - scaled.min.y;

    // 6. Every renderable both casts and receives shadows.
    root.surfaces_mut(&mut |surface| {
        surface.cast_shadow = true;
        surface.receive_shadow = true;
    });

    let final_box = compute_world_aabb(root);
    let placement = Placement {
        bounding_center: final_box.center(),
        scale_factor,
        scaled_size: scaled.extents(),
    };
    debug!(
        "normalized model: center {:?}, scale {:.4}",
        placement.bounding_center, placement.scale_factor
    );
    placement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::Material;
    use crate::scene::node::{Geometry, NodeKind, Surface, Vertex};
    use nalgebra::{Vector2, Vector3};

    const TOL: f32 = 1e-5;

    fn box_geometry(min: Point3<f32>, max: Point3<f32>) -> Geometry {
        let mut vertices = Vec::new();
        for x in [min.x, max.x] {
            for y in [min.y, max.y] {
                for z in [min.z, max.z] {
                    vertices.push(Vertex::new(
                        Point3::new(x, y, z),
                        Vector3::y(),
                        Vector2::zeros(),
                    ));
                }
            }
        }
        Geometry::new(vertices, Vec::new())
    }

    fn model_with_box(min: Point3<f32>, max: Point3<f32>) -> Node {
        let mut root = Node::new_group("model");
        root.children.push(Node::new_renderable(
            "box",
            Surface::with_material(box_geometry(min, max), Material::default()),
        ));
        root
    }

    #[test]
    fn cube_scenario_matches_expected_placement() {
        // A 10x10x10 cube centered at (5,5,5), ground 0, target size 5.
        let mut root = model_with_box(Point3::origin(), Point3::new(10.0, 10.0, 10.0));
        let placement = normalize(&mut root, 0.0, 5.0);

        assert!((placement.scale_factor - 0.5).abs() < TOL);
        assert!((placement.bounding_center - Point3::new(0.0, 2.5, 0.0)).norm() < TOL);
        assert!((placement.scaled_size - Vector3::new(5.0, 5.0, 5.0)).norm() < TOL);

        let aabb = compute_world_aabb(&root);
        assert!(aabb.min.y.abs() < TOL);
        assert!((aabb.max.y - 5.0).abs() < TOL);
    }

    #[test]
    fn lowest_point_sits_on_a_raised_ground_plane() {
        let mut root = model_with_box(Point3::new(-3.0, 7.0, 1.0), Point3::new(4.0, 9.0, 2.0));
        normalize(&mut root, 1.5, 5.0);

        let aabb = compute_world_aabb(&root);
        assert!((aabb.min.y - 1.5).abs() < TOL);
    }

    #[test]
    fn largest_extent_equals_target_size() {
        let mut root = model_with_box(Point3::new(0.0, 0.0, 0.0), Point3::new(8.0, 2.0, 1.0));
        let placement = normalize(&mut root, 0.0, 5.0);

        let aabb = compute_world_aabb(&root);
        assert!((aabb.max_extent() - 5.0).abs() < TOL);
        // Proportions preserved: 8:2:1 scaled by the same factor.
        assert!((placement.scale_factor - 0.625).abs() < TOL);
        let extents = aabb.extents();
        assert!((extents.y - 1.25).abs() < TOL);
        assert!((extents.z - 0.625).abs() < TOL);
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let mut root = model_with_box(Point3::new(2.0, 3.0, -1.0), Point3::new(12.0, 5.0, 3.0));
        let first = normalize(&mut root, 0.0, 5.0);
        let box_after_first = compute_world_aabb(&root);

        let second = normalize(&mut root, 0.0, 5.0);
        let box_after_second = compute_world_aabb(&root);

        assert!((second.scale_factor - 1.0).abs() < TOL);
        assert!((first.bounding_center - second.bounding_center).norm() < TOL);
        assert!((box_after_first.min - box_after_second.min).norm() < TOL);
        assert!((box_after_first.max - box_after_second.max).norm() < TOL);
    }

    #[test]
    fn empty_model_gets_unit_scale_and_degenerate_bounds() {
        let mut root = Node::new_group("empty");
        let placement = normalize(&mut root, 2.0, 5.0);

        assert_eq!(placement.scale_factor, 1.0);
        // The bounding volume degenerates to a zero-size box at the origin.
        assert_eq!(placement.bounding_center, Point3::origin());
        assert_eq!(placement.scaled_size, Vector3::zeros());
        // The root origin still gets seated on the ground plane.
        assert!((root.transform.translation.y - 2.0).abs() < TOL);
    }

    #[test]
    fn renderables_cast_and_receive_shadows_after_normalization() {
        let mut root = model_with_box(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        normalize(&mut root, 0.0, 5.0);

        root.traverse(&mut |node| {
            if let NodeKind::Renderable(surface) = &node.kind {
                assert!(surface.cast_shadow);
                assert!(surface.receive_shadow);
            }
        });
    }

    #[test]
    fn nested_child_transforms_are_respected() {
        // Child shifted and scaled inside the model; only the root transform
        // may be touched by normalization.
        let mut child = Node::new_renderable(
            "box",
            Surface::with_material(
                box_geometry(Point3::origin(), Point3::new(1.0, 1.0, 1.0)),
                Material::default(),
            ),
        );
        child.transform.translation = Vector3::new(10.0, 0.0, 0.0);
        child.transform.scale = Vector3::new(4.0, 2.0, 2.0);

        let mut root = Node::new_group("model");
        root.children.push(child);
        normalize(&mut root, 0.0, 5.0);

        let aabb = compute_world_aabb(&root);
        assert!((aabb.max_extent() - 5.0).abs() < TOL);
        assert!(aabb.min.y.abs() < TOL);
        assert!((aabb.center().x).abs() < TOL);
        assert_eq!(
            root.children[0].transform.translation,
            Vector3::new(10.0, 0.0, 0.0)
        );
    }
}
