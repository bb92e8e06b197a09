//! glTF binary import
//!
//! Flattens every triangle primitive reachable from the scene graph into one
//! vertex-coloured mesh in model space. Materials are reduced to their base
//! colour; images are never decoded, so any texture encoding is accepted.

use glam::{Mat4, Vec3};
use gltf::mesh::Mode;
use gltf::mesh::util::ReadIndices;
use thiserror::Error;

use crate::mesh::{Mesh, Vertex};

/// Colour for primitives without vertex colours or material
const FALLBACK_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to parse glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("model contains no triangle meshes")]
    NoMeshes,
}

/// Parse `.glb` (or `.gltf` with data URIs) bytes into a single merged mesh
pub fn import_glb(bytes: &[u8]) -> Result<Mesh, ImportError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, None, blob)?;

    let mut merged = Mesh::new();
    let scene = document.default_scene().or_else(|| document.scenes().next());

    match scene {
        Some(scene) => {
            for node in scene.nodes() {
                collect_node(&node, Mat4::IDENTITY, &buffers, &mut merged);
            }
        }
        // シーン定義のないファイルはメッシュをそのまま使う
        None => {
            for mesh in document.meshes() {
                collect_mesh(&mesh, Mat4::IDENTITY, &buffers, &mut merged);
            }
        }
    }

    if merged.is_empty() {
        return Err(ImportError::NoMeshes);
    }

    log::debug!(
        "imported model: {} vertices, {} triangles",
        merged.vertex_count(),
        merged.index_count() / 3
    );
    Ok(merged)
}

fn collect_node(node: &gltf::Node, parent: Mat4, buffers: &[gltf::buffer::Data], out: &mut Mesh) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        collect_mesh(&mesh, world, buffers, out);
    }
    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}

fn collect_mesh(mesh: &gltf::Mesh, matrix: Mat4, buffers: &[gltf::buffer::Data], out: &mut Mesh) {
    for primitive in mesh.primitives() {
        if primitive.mode() != Mode::Triangles {
            log::warn!(
                "skipping primitive of mesh {:?}: mode {:?}",
                mesh.name().unwrap_or("<unnamed>"),
                primitive.mode()
            );
            continue;
        }
        if let Some(part) = read_primitive(&primitive, buffers) {
            out.append_transformed(&part, matrix);
        }
    }
}

fn read_primitive(primitive: &gltf::Primitive, buffers: &[gltf::buffer::Data]) -> Option<Mesh> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    if positions.is_empty() {
        return None;
    }

    let base = primitive.material().pbr_metallic_roughness().base_color_factor();
    let material_color = [base[0], base[1], base[2]];
    let colors: Vec<[f32; 3]> = match reader.read_colors(0) {
        Some(colors) => colors.into_rgb_f32().collect(),
        None => vec![material_color; positions.len()],
    };

    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|n| n.collect());

    let indices: Vec<u32> = match reader.read_indices() {
        Some(ReadIndices::U8(iter)) => iter.map(u32::from).collect(),
        Some(ReadIndices::U16(iter)) => iter.map(u32::from).collect(),
        Some(ReadIndices::U32(iter)) => iter.collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            let normal = normals
                .as_ref()
                .and_then(|n| n.get(i).copied())
                .unwrap_or(Vec3::Y.to_array());
            let color = colors.get(i).copied().unwrap_or(FALLBACK_COLOR);
            Vertex::new(position, normal, color)
        })
        .collect();

    let mut mesh = Mesh {
        vertices,
        indices: indices.chunks_exact(3).flatten().copied().collect(),
    };
    if normals.is_none() {
        mesh.recompute_normals();
    }
    Some(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal .glb holding one triangle, with optional extras
    #[derive(Default)]
    struct Triangle {
        translation: Option<[f32; 3]>,
        colors: Option<[[f32; 3]; 3]>,
        base_color: Option<[f32; 4]>,
        image_mime: Option<&'static str>,
    }

    fn json_vec(v: &[f32]) -> String {
        let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
        format!("[{}]", parts.join(","))
    }

    impl Triangle {
        fn glb(&self) -> Vec<u8> {
            let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 0.0]];
            let mut bin: Vec<u8> = bytemuck::cast_slice(&positions).to_vec();
            let mut views = vec![r#"{"buffer":0,"byteOffset":0,"byteLength":36}"#.to_string()];
            let mut accessors = vec![
                r#"{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,2,0]}"#
                    .to_string(),
            ];
            let mut attributes = r#""POSITION":0"#.to_string();

            if let Some(colors) = &self.colors {
                let offset = bin.len();
                bin.extend_from_slice(bytemuck::cast_slice(colors));
                views.push(format!(r#"{{"buffer":0,"byteOffset":{offset},"byteLength":36}}"#));
                accessors.push(format!(
                    r#"{{"bufferView":{},"componentType":5126,"count":3,"type":"VEC3"}}"#,
                    views.len() - 1
                ));
                attributes.push_str(&format!(r#","COLOR_0":{}"#, accessors.len() - 1));
            }

            let mut extra = String::new();
            if let Some(mime) = self.image_mime {
                // 中身はデコードできないダミー
                let offset = bin.len();
                bin.extend_from_slice(b"RIFFjunk");
                views.push(format!(r#"{{"buffer":0,"byteOffset":{offset},"byteLength":8}}"#));
                extra.push_str(&format!(
                    r#","images":[{{"bufferView":{},"mimeType":"{mime}"}}]"#,
                    views.len() - 1
                ));
            }

            let material = match self.base_color {
                Some(color) => {
                    extra.push_str(&format!(
                        r#","materials":[{{"pbrMetallicRoughness":{{"baseColorFactor":{}}}}}]"#,
                        json_vec(&color)
                    ));
                    r#","material":0"#
                }
                None => "",
            };

            let node = match self.translation {
                Some(t) => format!(r#"{{"mesh":0,"translation":{}}}"#, json_vec(&t)),
                None => r#"{"mesh":0}"#.to_string(),
            };

            let json = format!(
                r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],"nodes":[{node}],
                "meshes":[{{"primitives":[{{"attributes":{{{attributes}}}{material}}}]}}],
                "accessors":[{}],"bufferViews":[{}],"buffers":[{{"byteLength":{}}}]{extra}}}"#,
                accessors.join(","),
                views.join(","),
                bin.len()
            );
            build_glb(json, bin)
        }
    }

    fn build_glb(json: String, mut bin: Vec<u8>) -> Vec<u8> {
        let mut json_chunk = json.into_bytes();
        while json_chunk.len() % 4 != 0 {
            json_chunk.push(b' ');
        }
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let total = 12 + 8 + json_chunk.len() + 8 + bin.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&json_chunk);
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
        out
    }

    #[test]
    fn test_import_single_triangle() {
        let mesh = import_glb(&Triangle::default().glb()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        // マテリアルなしは既定マテリアルの白
        assert_eq!(mesh.vertices[0].color, [1.0, 1.0, 1.0]);

        // 法線がないので面法線(+Z)が計算される
        let n = Vec3::from_array(mesh.vertices[0].normal);
        assert!((n - Vec3::Z).length() < 1e-5);

        let bounds = mesh.bounds();
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_node_transform_is_baked() {
        let glb = Triangle {
            translation: Some([5.0, 0.0, -1.0]),
            ..Default::default()
        }
        .glb();
        let bounds = import_glb(&glb).unwrap().bounds();
        assert_eq!(bounds.min, Vec3::new(5.0, 0.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(6.0, 2.0, -1.0));
    }

    #[test]
    fn test_vertex_colors_win_over_material() {
        let colors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let glb = Triangle {
            colors: Some(colors),
            base_color: Some([0.2, 0.4, 0.6, 1.0]),
            ..Default::default()
        }
        .glb();
        let mesh = import_glb(&glb).unwrap();
        let imported: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.color).collect();
        assert_eq!(imported, colors.to_vec());
    }

    #[test]
    fn test_material_base_color() {
        let glb = Triangle {
            base_color: Some([0.2, 0.4, 0.6, 1.0]),
            ..Default::default()
        }
        .glb();
        let mesh = import_glb(&glb).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.color == [0.2, 0.4, 0.6]));
    }

    #[test]
    fn test_undecodable_textures_are_ignored() {
        for mime in ["image/webp", "image/png"] {
            let glb = Triangle {
                image_mime: Some(mime),
                ..Default::default()
            }
            .glb();
            let mesh = import_glb(&glb).unwrap();
            assert_eq!(mesh.vertex_count(), 3, "{mime}");
        }
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(import_glb(b"not a model"), Err(ImportError::Gltf(_))));
    }
}
