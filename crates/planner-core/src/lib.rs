pub mod ecs;
pub mod math;
pub mod components;
pub mod catalog;
pub mod ledger;
pub mod placement;
pub mod manipulation;
pub mod error;

// Re-exports
pub use ecs::{EntityId, World};
pub use components::{Transform, ModelUniform, Name, PlacedItem, Ground, LocalBounds, MeshId, MeshRef};
pub use math::{Aabb, Ray};
pub use catalog::{Catalog, CatalogEntry};
pub use ledger::{format_price, Ledger, LineItem, LedgerSnapshot, DEFAULT_CURRENCY};
pub use manipulation::{Manipulator, ManipulationMode, PointerButton, PointerHit, DEFAULT_ROTATION_SENSITIVITY};
pub use error::{PlannerError, CatalogError};
