//! Scene state behind the `Engine` facade
//!
//! Owns the world, the mesh library, the catalog, the ledger and the
//! manipulation state machine, and tracks whether the camera currently
//! owns the pointer. Nothing here touches the GPU or the DOM, so
//! the whole edit flow runs under the native test harness.

use planner_core::{
    placement, Catalog, EntityId, Ground, Ledger, LineItem, LocalBounds, Manipulator, MeshId,
    MeshRef, Name, PlacedItem, PlannerError, PointerButton, PointerHit, Ray, Transform, World,
};
use glam::Vec3;
use planner_renderer::{pick, Mesh, MeshLibrary, PickFilter};

/// Outcome of deleting a placed item
#[derive(Debug)]
pub struct Removed {
    pub row: LineItem,
    /// The item was mid-gesture; the camera got the pointer back
    pub aborted_gesture: bool,
}

pub struct Editor {
    world: World,
    library: MeshLibrary,
    catalog: Catalog,
    ledger: Ledger,
    manipulator: Manipulator,
    camera_attached: bool,
}

impl Editor {
    pub fn new(catalog: Catalog, rotation_sensitivity: f32) -> Self {
        Self {
            world: World::new(),
            library: MeshLibrary::new(),
            catalog,
            ledger: Ledger::new(),
            manipulator: Manipulator::new(rotation_sensitivity),
            camera_attached: true,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn library(&self) -> &MeshLibrary {
        &self.library
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn manipulator(&self) -> &Manipulator {
        &self.manipulator
    }

    pub fn ground(&self) -> Option<EntityId> {
        self.world.find_with::<Ground>()
    }

    /// Install the playground at the origin, replacing any previous one
    pub fn load_ground(&mut self, mesh: Mesh) -> EntityId {
        let previous: Vec<EntityId> = self.world.iter_with::<Ground>().map(|(e, _)| e).collect();
        for entity in previous {
            self.despawn_with_mesh(entity);
        }

        let bounds = mesh.bounds();
        let mesh_id = self.library.insert(mesh);
        let entity = self.world.spawn();
        self.world.insert(entity, Name::ground());
        self.world.insert(entity, Ground);
        self.world.insert(entity, Transform::identity());
        self.world.insert(entity, MeshRef(mesh_id));
        self.world.insert(entity, LocalBounds(bounds));

        log::info!("ground loaded ({entity})");
        entity
    }

    /// Where a drop along `ray` lands; the origin when nothing is hit
    pub fn drop_point(&self, ray: &Ray) -> Vec3 {
        pick(&self.world, &self.library, ray, PickFilter::Any).map_or(Vec3::ZERO, |hit| hit.point)
    }

    /// Create a container for `mesh` at `drop_point`, normalized to the
    /// model's catalog size and resting on the ground, and bill it.
    pub fn place_model(&mut self, model: &str, mesh: Mesh, drop_point: Vec3) -> Result<EntityId, PlannerError> {
        if mesh.is_empty() {
            return Err(PlannerError::EmptyModel(model.to_string()));
        }
        if !self.catalog.contains(model) {
            log::warn!("{model} is not in the catalog, placing at unit size for free");
        }

        let local = mesh.bounds();
        let base_rotation = self.catalog.base_rotation_of(model);
        let mut transform = Transform::new(Vec3::ZERO, base_rotation, Vec3::ONE);
        placement::place(&mut transform, &local, drop_point, self.catalog.target_size_of(model));

        let price = self.catalog.price_of(model);
        let mesh_id = self.library.insert(mesh);

        let entity = self.world.spawn();
        self.world.insert(entity, Name::container());
        self.world.insert(entity, transform);
        self.world.insert(entity, MeshRef(mesh_id));
        self.world.insert(entity, LocalBounds(local));
        self.world.insert(entity, PlacedItem::new(model, price).with_base_rotation(base_rotation));
        self.ledger.add(entity.to_u32(), model, price);

        log::info!("placed {model} ({entity}) at {drop_point} for {price}");
        Ok(entity)
    }

    /// Delete one placed container and its ledger row. Removing the item
    /// under an active gesture ends the gesture and reattaches the camera.
    pub fn remove_item(&mut self, item_id: u32) -> Result<Removed, PlannerError> {
        let entity = EntityId::from_u32(item_id)
            .filter(|&e| self.world.has::<PlacedItem>(e))
            .ok_or(PlannerError::UnknownItem(item_id))?;

        let aborted_gesture = self.manipulator.selected() == Some(entity);
        if aborted_gesture {
            self.manipulator.reset();
            self.camera_attached = true;
        }
        self.despawn_with_mesh(entity);
        let row = self.ledger.remove(item_id).ok_or(PlannerError::UnknownItem(item_id))?;
        Ok(Removed { row, aborted_gesture })
    }

    /// Delete everything except the ground; returns the number of entities removed
    pub fn clear(&mut self) -> usize {
        let ground_meshes: Vec<MeshId> = self
            .world
            .iter_with::<Ground>()
            .filter_map(|(e, _)| self.world.get::<MeshRef>(e).map(|r| r.0))
            .collect();

        let removed = self.world.despawn_where(|world, e| !world.has::<Ground>(e));
        let released = self.library.retain_only(&ground_meshes);

        self.ledger.clear();
        self.manipulator.reset();
        self.camera_attached = true;
        log::info!("cleared {removed} items, released {released} meshes");
        removed
    }

    fn despawn_with_mesh(&mut self, entity: EntityId) {
        if let Some(&MeshRef(mesh_id)) = self.world.get::<MeshRef>(entity) {
            self.library.remove(mesh_id);
        }
        self.world.despawn(entity);
    }

    /// Returns true when the camera detached for the gesture
    pub fn pointer_down(&mut self, ray: &Ray, button: PointerButton, pointer_x: f32) -> bool {
        let hit = pick(&self.world, &self.library, ray, PickFilter::Any).map(PointerHit::from);
        let detach = self.manipulator.pointer_down(&self.world, hit, button, pointer_x);
        if detach {
            self.camera_attached = false;
        }
        detach
    }

    pub fn pointer_move(&mut self, ray: &Ray, pointer_x: f32) -> bool {
        if !self.manipulator.is_active() {
            return false;
        }
        // Dragging only follows the ground, never other containers
        let ground_point = if self.manipulator.is_dragging() {
            pick(&self.world, &self.library, ray, PickFilter::GroundOnly).map(|hit| hit.point)
        } else {
            None
        };
        self.manipulator.pointer_move(&mut self.world, ground_point, pointer_x)
    }

    /// Returns true when a gesture ended and the camera reattached
    pub fn pointer_up(&mut self) -> bool {
        let ended = self.manipulator.pointer_up();
        if ended {
            self.camera_attached = true;
        }
        ended
    }

    pub fn is_manipulating(&self) -> bool {
        self.manipulator.is_active()
    }

    /// Orbit, pan and zoom are only applied while this holds
    pub fn is_camera_attached(&self) -> bool {
        self.camera_attached
    }
}
