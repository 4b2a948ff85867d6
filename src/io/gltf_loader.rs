use crate::error::ViewerError;
use crate::scene::material::Material;
use crate::scene::node::{Geometry, Node, NodeKind, PrimitiveRange, Surface, Transform, Vertex};
use crate::scene::texture::Texture;
use log::{info, warn};
use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector2, Vector3};
use std::path::Path;

/// Checks the file extension the way the upload zone does: only `.glb` and
/// `.gltf` are accepted.
pub fn check_extension(file_name: &str) -> Result<(), ViewerError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "glb" | "gltf" => Ok(()),
        other => Err(ViewerError::UnsupportedFormat(other.to_string())),
    }
}

/// Decodes GLB or glTF bytes into a mesh hierarchy.
///
/// Handles both the binary-packed variant and JSON glTF with embedded
/// (data-URI) buffers; glTF referencing external files fails with a decode
/// error, which the session reports without touching the current model.
pub fn decode_asset(name: &str, bytes: &[u8]) -> Result<Node, ViewerError> {
    let (document, buffers, images) =
        gltf::import_slice(bytes).map_err(|source| ViewerError::Decode {
            name: name.to_string(),
            source,
        })?;

    // Image data is shared between materials referencing the same source.
    let textures: Vec<Texture> = images
        .iter()
        .enumerate()
        .map(|(index, data)| {
            Texture::from_pixels(
                format!("{name}#image{index}"),
                data.width,
                data.height,
                data.pixels.clone(),
            )
        })
        .collect();

    let mut root = Node::new_group(name);
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next());

    if let Some(scene) = scene {
        for node in scene.nodes() {
            root.children.push(convert_node(&node, &buffers, &textures));
        }
    } else {
        warn!("asset '{name}' contains no scene");
    }

    let mut vertex_count = 0usize;
    root.traverse(&mut |node| {
        if let NodeKind::Renderable(surface) = &node.kind {
            vertex_count += surface.geometry.vertices.len();
        }
    });
    info!("decoded asset '{name}': {vertex_count} vertices");

    Ok(root)
}

fn convert_node(node: &gltf::Node, buffers: &[gltf::buffer::Data], textures: &[Texture]) -> Node {
    let name = node.name().unwrap_or("node").to_string();
    let kind = match node.mesh() {
        Some(mesh) => NodeKind::Renderable(convert_mesh(&mesh, buffers, textures)),
        None => NodeKind::Group,
    };

    let (translation, rotation, scale) = node.transform().decomposed();
    let transform = Transform {
        translation: Vector3::from(translation),
        // glTF stores quaternions as [x, y, z, w].
        rotation: UnitQuaternion::from_quaternion(Quaternion::new(
            rotation[3],
            rotation[0],
            rotation[1],
            rotation[2],
        )),
        scale: Vector3::from(scale),
    };

    let mut out = Node {
        name,
        transform,
        kind,
        children: Vec::new(),
    };
    for child in node.children() {
        out.children.push(convert_node(&child, buffers, textures));
    }
    out
}

/// Merges every primitive of a glTF mesh into one surface; each primitive
/// keeps its own material and index range.
fn convert_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    textures: &[Texture],
) -> Surface {
    let mut geometry = Geometry::default();
    let mut materials = Vec::new();
    let mut ranges = Vec::new();

    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .map(|iter| iter.collect())
            .unwrap_or_default();
        if positions.is_empty() {
            continue;
        }
        let vertex_count = positions.len();

        let normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map(|iter| iter.collect())
            .unwrap_or_else(|| {
                warn!(
                    "mesh '{}' is missing normals, using default (0, 1, 0)",
                    mesh.name().unwrap_or("unnamed")
                );
                vec![[0.0, 1.0, 0.0]; vertex_count]
            });

        let texcoords: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map(|iter| iter.into_f32().collect())
            .unwrap_or_else(|| vec![[0.0, 0.0]; vertex_count]);

        let indices: Vec<u32> = reader
            .read_indices()
            .map(|iter| iter.into_u32().collect())
            .unwrap_or_else(|| (0..vertex_count as u32).collect());

        let base_vertex = geometry.vertices.len() as u32;
        let first_index = geometry.indices.len() as u32;

        for i in 0..vertex_count {
            geometry.vertices.push(Vertex::new(
                Point3::from(positions[i]),
                Vector3::from(normals[i]),
                Vector2::from(texcoords[i]),
            ));
        }
        geometry
            .indices
            .extend(indices.iter().map(|index| index + base_vertex));

        ranges.push(PrimitiveRange {
            first_index,
            index_count: indices.len() as u32,
            material: materials.len(),
        });
        materials.push(convert_material(&primitive.material(), textures));
    }

    Surface::new(geometry, materials, ranges)
}

fn convert_material(material: &gltf::Material, textures: &[Texture]) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let base = pbr.base_color_factor();
    let emissive = material.emissive_factor();

    let lookup = |index: usize| textures.get(index).cloned();

    Material {
        name: material.name().unwrap_or("").to_string(),
        base_color: Some(Vector3::new(base[0], base[1], base[2])),
        metallic: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        emissive: Vector3::from(emissive),
        base_color_texture: pbr
            .base_color_texture()
            .and_then(|info| lookup(info.texture().source().index())),
        metallic_roughness_texture: pbr
            .metallic_roughness_texture()
            .and_then(|info| lookup(info.texture().source().index())),
        normal_texture: material
            .normal_texture()
            .and_then(|normal| lookup(normal.texture().source().index())),
        occlusion_texture: material
            .occlusion_texture()
            .and_then(|occlusion| lookup(occlusion.texture().source().index())),
        emissive_texture: material
            .emissive_texture()
            .and_then(|info| lookup(info.texture().source().index())),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scene::bounds::compute_world_aabb;

    /// Builds a minimal single-triangle GLB in memory: one scene, one node,
    /// one mesh with a red material.
    pub(crate) fn triangle_glb() -> Vec<u8> {
        let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let indices: [u16; 3] = [0, 1, 2];

        let mut bin = Vec::new();
        for p in &positions {
            for c in p {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        for i in &indices {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        let unpadded_bin_len = bin.len();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let json = format!(
            concat!(
                r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],"#,
                r#""nodes":[{{"mesh":0,"name":"tri"}}],"#,
                r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}},"indices":1,"material":0}}]}}],"#,
                r#""materials":[{{"name":"red","pbrMetallicRoughness":{{"baseColorFactor":[1.0,0.0,0.0,1.0]}}}}],"#,
                r#""buffers":[{{"byteLength":{}}}],"#,
                r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":36}},"#,
                r#"{{"buffer":0,"byteOffset":36,"byteLength":6}}],"#,
                r#""accessors":[{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","#,
                r#""min":[0.0,0.0,0.0],"max":[1.0,1.0,0.0]}},"#,
                r#"{{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}}]}}"#
            ),
            unpadded_bin_len
        );
        let mut json = json.into_bytes();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }

        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json);
        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"BIN\0");
        glb.extend_from_slice(&bin);
        glb
    }

    #[test]
    fn extension_check_accepts_glb_and_gltf_only() {
        assert!(check_extension("model.glb").is_ok());
        assert!(check_extension("Model.GLTF").is_ok());
        assert!(matches!(
            check_extension("model.obj"),
            Err(ViewerError::UnsupportedFormat(_))
        ));
        assert!(check_extension("noextension").is_err());
    }

    #[test]
    fn decodes_a_minimal_glb() {
        let root = decode_asset("triangle.glb", &triangle_glb()).unwrap();
        assert!(!root.is_empty());
        assert_eq!(root.children.len(), 1);

        let NodeKind::Renderable(surface) = &root.children[0].kind else {
            panic!("expected a renderable node");
        };
        assert_eq!(surface.geometry.vertices.len(), 3);
        assert_eq!(surface.geometry.indices, vec![0, 1, 2]);
        assert_eq!(surface.materials.len(), 1);
        assert_eq!(
            surface.materials[0].base_color(),
            Some(Vector3::new(1.0, 0.0, 0.0))
        );

        let aabb = compute_world_aabb(&root);
        assert_eq!(aabb.min, Point3::origin());
        assert_eq!(aabb.max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let err = decode_asset("junk.glb", &[0u8; 16]).unwrap_err();
        assert!(matches!(err, ViewerError::Decode { .. }));
    }
}
