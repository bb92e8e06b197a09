use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use planner_core::Aabb;
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexStepMode};

/// 頂点構造体
/// 位置、法線、色を含む
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, normal, color }
    }

    const ATTRIBUTES: [VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x3, // color
    ];

    /// 頂点バッファレイアウトを取得
    pub fn desc() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// メッシュ構造体
/// 1モデル分の頂点とインデックス（ノード変換は焼き込み済み）
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// キューブメッシュを生成（原点中心、辺の長さsize）
    pub fn cube(size: f32, color: [f32; 3]) -> Self {
        let h = size * 0.5;
        // (法線, 面内のu軸, 面内のv軸)
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut mesh = Self::new();
        for (normal, u, v) in faces {
            let base = mesh.vertices.len() as u32;
            let center = normal * h;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = center + u * (su * h) + v * (sv * h);
                mesh.vertices.push(Vertex::new(p.to_array(), normal.to_array(), color));
            }
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// 別メッシュを行列で変換して追加
    pub fn append_transformed(&mut self, other: &Mesh, matrix: Mat4) {
        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();
        let base = self.vertices.len() as u32;

        self.vertices.extend(other.vertices.iter().map(|v| {
            let position = matrix.transform_point3(Vec3::from_array(v.position));
            let normal = (normal_matrix * Vec3::from_array(v.normal)).normalize_or(Vec3::Y);
            Vertex::new(position.to_array(), normal.to_array(), v.color)
        }));

        // 負スケール（鏡像）の場合は巻き順を反転
        if matrix.determinant() < 0.0 {
            self.indices.extend(
                other
                    .indices
                    .chunks_exact(3)
                    .flat_map(|tri| [base + tri[0], base + tri[2], base + tri[1]]),
            );
        } else {
            self.indices.extend(other.indices.iter().map(|i| base + i));
        }
    }

    /// 法線を面法線の平均で再計算
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];
        for (a, b, c) in self.triangle_indices() {
            let [pa, pb, pc] = [a, b, c].map(|i| Vec3::from_array(self.vertices[i].position));
            let face = (pb - pa).cross(pc - pa);
            for i in [a, b, c] {
                accum[i] += face;
            }
        }
        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            vertex.normal = n.normalize_or(Vec3::Y).to_array();
        }
    }

    fn triangle_indices(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| (tri[0] as usize, tri[1] as usize, tri[2] as usize))
            .filter(|&(a, b, c)| a.max(b).max(c) < self.vertices.len())
    }

    /// 三角形を頂点座標で列挙（ピック用）
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.triangle_indices()
            .map(|(a, b, c)| [a, b, c].map(|i| Vec3::from_array(self.vertices[i].position)))
    }

    /// ローカル空間のバウンディングボックス
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from_array(v.position)))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
