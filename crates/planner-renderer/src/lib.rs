pub mod mesh;
pub mod camera;
pub mod picking;
pub mod import;
pub mod library;

pub use mesh::{Mesh, Vertex};
pub use camera::{Camera, CameraUniform};
pub use picking::{pick, PickFilter, PickHit};
pub use import::{import_glb, ImportError};
pub use library::MeshLibrary;

// Re-export glam types for consistent version usage
pub use glam;
