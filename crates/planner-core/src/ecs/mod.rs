pub mod entity;
pub mod component;
pub mod storage;
pub mod world;

pub use entity::EntityId;
pub use component::Component;
pub use storage::ComponentStorage;
pub use world::World;
