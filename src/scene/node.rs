use crate::scene::backend::{GpuHandle, RenderBackend};
use crate::scene::material::Material;
use log::warn;
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector2, Vector3};

/// Represents a single vertex in 3D space.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
    /// Texture coordinates (UV).
    pub texcoord: Vector2<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, texcoord: Vector2<f32>) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }
}

/// Local TRS transform of a node.
///
/// World transforms compose parent-to-child: `world = parent_world * local`.
#[derive(Debug, Clone)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self::default()
    }

    /// Composition order is T * R * S, matching the usual scene-graph
    /// convention: a node's own translation is not affected by its scale.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.translation)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

/// Geometry data for a renderable surface, optionally mirrored on the GPU.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub gpu: Option<GpuHandle>,
}

impl Geometry {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            gpu: None,
        }
    }
}

/// A run of indices drawn with one material.
///
/// Surfaces merged from several glTF primitives keep one range per
/// primitive so that multi-material surfaces stay addressable.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveRange {
    pub first_index: u32,
    pub index_count: u32,
    /// Index into the surface's material list.
    pub material: usize,
}

/// Geometry plus the materials it is drawn with.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    pub geometry: Geometry,
    pub materials: Vec<Material>,
    pub ranges: Vec<PrimitiveRange>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Surface {
    pub fn new(geometry: Geometry, materials: Vec<Material>, ranges: Vec<PrimitiveRange>) -> Self {
        Self {
            geometry,
            materials,
            ranges,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Convenience for the common single-material case.
    pub fn with_material(geometry: Geometry, material: Material) -> Self {
        let index_count = geometry.indices.len() as u32;
        Self::new(
            geometry,
            vec![material],
            vec![PrimitiveRange {
                first_index: 0,
                index_count,
                material: 0,
            }],
        )
    }
}

/// What a node carries: either nothing (pure grouping/transform node) or a
/// renderable surface. Capability checks are done by matching on this enum
/// rather than probing dynamic properties.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    Renderable(Surface),
}

/// One node of the mesh hierarchy.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new_group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            kind: NodeKind::Group,
            children: Vec::new(),
        }
    }

    pub fn new_renderable(name: impl Into<String>, surface: Surface) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            kind: NodeKind::Renderable(surface),
            children: Vec::new(),
        }
    }

    /// Depth-first visit of the whole hierarchy.
    pub fn traverse(&self, visit: &mut impl FnMut(&Node)) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    /// Depth-first visit with mutable access to every node.
    pub fn traverse_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        for child in &mut self.children {
            child.traverse_mut(visit);
        }
    }

    /// Depth-first visit carrying the accumulated world transform.
    pub fn traverse_world(&self, parent: &Matrix4<f32>, visit: &mut impl FnMut(&Node, &Matrix4<f32>)) {
        let world = parent * self.transform.to_matrix();
        visit(self, &world);
        for child in &self.children {
            child.traverse_world(&world, visit);
        }
    }

    /// Visits every renderable surface in the hierarchy.
    pub fn surfaces_mut(&mut self, visit: &mut impl FnMut(&mut Surface)) {
        self.traverse_mut(&mut |node| {
            if let NodeKind::Renderable(surface) = &mut node.kind {
                visit(surface);
            }
        });
    }

    /// True if no node in the hierarchy carries geometry.
    pub fn is_empty(&self) -> bool {
        let mut empty = true;
        self.traverse(&mut |node| {
            if let NodeKind::Renderable(surface) = &node.kind
                && !surface.geometry.vertices.is_empty()
            {
                empty = false;
            }
        });
        empty
    }

    /// Uploads every surface's geometry and textures to the backend.
    pub fn upload_resources(&mut self, backend: &mut dyn RenderBackend) {
        self.surfaces_mut(&mut |surface| {
            if surface.geometry.gpu.is_none() && !surface.geometry.vertices.is_empty() {
                surface.geometry.gpu = Some(backend.upload_geometry(
                    surface.geometry.vertices.len(),
                    surface.geometry.indices.len(),
                ));
            }
            for material in &mut surface.materials {
                for texture in material.textures_mut() {
                    texture.upload(backend);
                }
            }
        });
    }

    /// Releases every GPU resource held below this node.
    ///
    /// Visits every node, every material slot and every texture slot exactly
    /// once. Failures (already released, unknown handle) are logged and
    /// skipped; they never block loading a replacement model.
    pub fn release_resources(&mut self, backend: &mut dyn RenderBackend) {
        self.surfaces_mut(&mut |surface| {
            if let Some(handle) = surface.geometry.gpu.take()
                && let Err(e) = backend.dispose_geometry(handle)
            {
                warn!("skipping geometry release: {e}");
            }
            for material in &mut surface.materials {
                for texture in material.textures_mut() {
                    texture.release(backend);
                }
            }
        });
    }
}
