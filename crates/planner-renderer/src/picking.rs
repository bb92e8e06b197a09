//! Picking system for ray-mesh intersection
//!
//! CPU raycasting against the meshes of every entity that has a `MeshRef`.
//! Bounds are tested first so only candidates under the pointer pay for the
//! triangle loop.

use glam::Vec3;
use planner_core::{EntityId, Ground, LocalBounds, MeshRef, PlacedItem, PointerHit, Ray, Transform, World};

use crate::library::MeshLibrary;

/// Which entities a pick may return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickFilter {
    #[default]
    Any,
    /// Only the ground (drag targets)
    GroundOnly,
    /// Only placed containers
    ItemsOnly,
}

impl PickFilter {
    fn accepts(self, world: &World, entity: EntityId) -> bool {
        match self {
            PickFilter::Any => true,
            PickFilter::GroundOnly => world.has::<Ground>(entity),
            PickFilter::ItemsOnly => world.has::<PlacedItem>(entity),
        }
    }
}

/// Closest intersection found by `pick`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    /// World-space hit point
    pub point: Vec3,
    /// Distance along the world ray
    pub distance: f32,
}

impl From<PickHit> for PointerHit {
    fn from(hit: PickHit) -> Self {
        PointerHit {
            entity: hit.entity,
            point: hit.point,
        }
    }
}

/// Cast `ray` into the scene and return the nearest accepted hit
pub fn pick(world: &World, library: &MeshLibrary, ray: &Ray, filter: PickFilter) -> Option<PickHit> {
    let mut closest: Option<PickHit> = None;

    for (entity, &MeshRef(mesh_id)) in world.iter_with::<MeshRef>() {
        if !filter.accepts(world, entity) {
            continue;
        }
        let (Some(transform), Some(mesh)) = (world.get::<Transform>(entity), library.get(mesh_id)) else {
            continue;
        };

        let matrix = transform.to_matrix();
        if matrix.determinant().abs() < f32::EPSILON {
            continue;
        }
        let local_ray = ray.transformed(&matrix.inverse());

        // Broad phase
        let bounds = world
            .get::<LocalBounds>(entity)
            .map_or_else(|| mesh.bounds(), |b| b.0);
        let Some(entry) = local_ray.intersect_aabb(&bounds) else {
            continue;
        };
        if closest.is_some_and(|c| entry > c.distance) {
            continue;
        }

        // Narrow phase
        let nearest = mesh
            .triangles()
            .filter_map(|[a, b, c]| local_ray.intersect_triangle(a, b, c))
            .min_by(f32::total_cmp);

        if let Some(t) = nearest {
            if closest.is_none_or(|c| t < c.distance) {
                closest = Some(PickHit {
                    entity,
                    point: ray.point_at(t),
                    distance: t,
                });
            }
        }
    }

    closest
}
