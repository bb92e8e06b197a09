mod name;
mod placement;
mod transform;

pub use name::Name;
pub use placement::{Ground, LocalBounds, MeshId, MeshRef, PlacedItem};
pub use transform::Transform;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// GPU用モデル行列Uniform
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn identity() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }

    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
        }
    }
}

impl Default for ModelUniform {
    fn default() -> Self {
        Self::identity()
    }
}
