use crate::scene::node::{Node, NodeKind};
use nalgebra::{Matrix4, Point3, Vector3};

/// Axis-aligned bounding box in world space.
///
/// Derived data: recomputed on demand, never patched in place. Any transform
/// change invalidates a previously computed box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// An inverted box that absorbs the first point it grows over.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Point3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    /// The degenerate zero-size box at the origin, used for hierarchies
    /// without any renderable geometry.
    pub fn zero() -> Self {
        Self {
            min: Point3::origin(),
            max: Point3::origin(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn grow(&mut self, point: &Point3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extents(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Largest of the three extents.
    pub fn max_extent(&self) -> f32 {
        let e = self.extents();
        e.x.max(e.y).max(e.z)
    }
}

/// Computes the world-space bounding box of a hierarchy.
///
/// Every vertex of every renderable node is transformed by its accumulated
/// world matrix. A hierarchy with no geometry yields the degenerate
/// zero-size box at the origin, which callers must tolerate.
pub fn compute_world_aabb(root: &Node) -> Aabb {
    let mut aabb = Aabb::empty();
    root.traverse_world(&Matrix4::identity(), &mut |node, world| {
        if let NodeKind::Renderable(surface) = &node.kind {
            for vertex in &surface.geometry.vertices {
                aabb.grow(&world.transform_point(&vertex.position));
            }
        }
    });
    if aabb.is_empty() { Aabb::zero() } else { aabb }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::Material;
    use crate::scene::node::{Geometry, Surface, Vertex};
    use nalgebra::{Vector2, Vector3};

    fn unit_cube_corners() -> Geometry {
        // Eight corners are enough for bounds; faces are irrelevant here.
        let mut vertices = Vec::new();
        for x in [0.0f32, 1.0] {
            for y in [0.0f32, 1.0] {
                for z in [0.0f32, 1.0] {
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

    fn cube_node() -> Node {
        Node::new_renderable(
            "cube",
            Surface::with_material(unit_cube_corners(), Material::default()),
        )
    }

    #[test]
    fn empty_hierarchy_degenerates_to_origin() {
        let root = Node::new_group("root");
        let aabb = compute_world_aabb(&root);
        assert_eq!(aabb, Aabb::zero());
        assert_eq!(aabb.max_extent(), 0.0);
    }

    #[test]
    fn simple_box_bounds() {
        let aabb = compute_world_aabb(&cube_node());
        assert_eq!(aabb.min, Point3::origin());
        assert_eq!(aabb.max, Point3::new(1.0, 1.0, 1.0));
        assert_eq!(aabb.center(), Point3::new(0.5, 0.5, 0.5));
        assert_eq!(aabb.max_extent(), 1.0);
    }

    #[test]
    fn transforms_compose_down_the_tree() {
        let mut child = cube_node();
        child.transform.translation = Vector3::new(1.0, 0.0, 0.0);

        let mut root = Node::new_group("root");
        root.transform.scale = Vector3::new(2.0, 2.0, 2.0);
        root.children.push(child);

        // Child translation happens inside the parent's scaled space.
        let aabb = compute_world_aabb(&root);
        assert_eq!(aabb.min, Point3::new(2.0, 0.0, 0.0));
        assert_eq!(aabb.max, Point3::new(4.0, 2.0, 2.0));
    }
}
