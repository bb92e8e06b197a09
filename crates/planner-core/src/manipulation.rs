//! Pointer-driven manipulation of placed items
//!
//! Left-drag moves a container across the ground, right-drag spins it about
//! the vertical axis. The ground itself is never manipulated.

use glam::Vec3;

use crate::components::{Ground, LocalBounds, PlacedItem, Transform};
use crate::ecs::{EntityId, World};
use crate::placement;

/// Radians of yaw per pixel of horizontal pointer travel
pub const DEFAULT_ROTATION_SENSITIVITY: f32 = 0.01;

/// Mouse button as reported by `MouseEvent.button`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(i16),
}

impl From<i16> for PointerButton {
    fn from(button: i16) -> Self {
        match button {
            0 => PointerButton::Primary,
            1 => PointerButton::Auxiliary,
            2 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }
}

/// Result of a scene pick under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHit {
    pub entity: EntityId,
    pub point: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ManipulationMode {
    #[default]
    Idle,
    Dragging {
        entity: EntityId,
        /// container position minus the grabbed point
        offset: Vec3,
    },
    Rotating {
        entity: EntityId,
        initial_yaw: f32,
        initial_pointer_x: f32,
    },
}

#[derive(Debug, Clone)]
pub struct Manipulator {
    mode: ManipulationMode,
    selected: Option<EntityId>,
    sensitivity: f32,
}

impl Manipulator {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            mode: ManipulationMode::Idle,
            selected: None,
            sensitivity,
        }
    }

    pub fn mode(&self) -> ManipulationMode {
        self.mode
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, ManipulationMode::Dragging { .. })
    }

    pub fn is_active(&self) -> bool {
        self.mode != ManipulationMode::Idle
    }

    /// Start a gesture. Returns true when the camera must stop reacting to
    /// the pointer for the rest of the gesture.
    pub fn pointer_down(
        &mut self,
        world: &World,
        hit: Option<PointerHit>,
        button: PointerButton,
        pointer_x: f32,
    ) -> bool {
        let Some(hit) = hit else {
            return false;
        };

        if world.has::<Ground>(hit.entity) {
            self.selected = None;
            return false;
        }

        let (Some(transform), Some(item)) = (
            world.get::<Transform>(hit.entity),
            world.get::<PlacedItem>(hit.entity),
        ) else {
            self.selected = None;
            return false;
        };

        self.mode = match button {
            PointerButton::Primary => ManipulationMode::Dragging {
                entity: hit.entity,
                offset: transform.position - hit.point,
            },
            PointerButton::Secondary => ManipulationMode::Rotating {
                entity: hit.entity,
                initial_yaw: item.yaw,
                initial_pointer_x: pointer_x,
            },
            _ => return false,
        };
        self.selected = Some(hit.entity);
        log::debug!("manipulating {} ({})", item.model, hit.entity);
        true
    }

    /// Continue a gesture. `ground_point` is where the pointer ray meets the
    /// ground, if it does. Returns true if a transform changed.
    pub fn pointer_move(&mut self, world: &mut World, ground_point: Option<Vec3>, pointer_x: f32) -> bool {
        match self.mode {
            ManipulationMode::Idle => false,
            ManipulationMode::Dragging { entity, offset } => {
                let (Some(point), Some(&LocalBounds(local))) = (ground_point, world.get::<LocalBounds>(entity)) else {
                    return false;
                };
                let Some(transform) = world.get_mut::<Transform>(entity) else {
                    return false;
                };
                placement::drag_to(transform, &local, point, offset);
                true
            }
            ManipulationMode::Rotating {
                entity,
                initial_yaw,
                initial_pointer_x,
            } => {
                let Some(item) = world.get_mut::<PlacedItem>(entity) else {
                    return false;
                };
                item.yaw = initial_yaw + (pointer_x - initial_pointer_x) * self.sensitivity;
                let rotation = item.rotation();
                match world.get_mut::<Transform>(entity) {
                    Some(transform) => {
                        transform.rotation = rotation;
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// End the gesture. Returns true if one was in progress and the camera
    /// should take the pointer back.
    pub fn pointer_up(&mut self) -> bool {
        let was_active = self.is_active();
        self.reset();
        was_active
    }

    pub fn reset(&mut self) {
        self.mode = ManipulationMode::Idle;
        self.selected = None;
    }
}

impl Default for Manipulator {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_SENSITIVITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Name;
    use crate::math::Aabb;

    const EPS: f32 = 1e-4;

    struct Scene {
        world: World,
        ground: EntityId,
        swing: EntityId,
    }

    fn scene() -> Scene {
        let mut world = World::new();

        let ground = world.spawn();
        world.insert(ground, Name::ground());
        world.insert(ground, Ground);
        world.insert(ground, Transform::identity());

        let swing = world.spawn();
        let local = Aabb::unit_cube(Vec3::ZERO, Vec3::ONE);
        let mut transform = Transform::identity();
        placement::place(&mut transform, &local, Vec3::new(1.0, 0.0, 1.0), 1.0);
        world.insert(swing, Name::container());
        world.insert(swing, transform);
        world.insert(swing, LocalBounds(local));
        world.insert(swing, PlacedItem::new("swing.glb", 5000));

        Scene { world, ground, swing }
    }

    fn hit(entity: EntityId, point: Vec3) -> Option<PointerHit> {
        Some(PointerHit { entity, point })
    }

    #[test]
    fn test_button_mapping() {
        assert_eq!(PointerButton::from(0), PointerButton::Primary);
        assert_eq!(PointerButton::from(2), PointerButton::Secondary);
        assert_eq!(PointerButton::from(4), PointerButton::Other(4));
    }

    #[test]
    fn test_ground_is_not_selectable() {
        let s = scene();
        let mut m = Manipulator::default();
        let detach = m.pointer_down(&s.world, hit(s.ground, Vec3::ZERO), PointerButton::Primary, 0.0);
        assert!(!detach);
        assert_eq!(m.selected(), None);
        assert_eq!(m.mode(), ManipulationMode::Idle);
    }

    #[test]
    fn test_miss_does_nothing() {
        let s = scene();
        let mut m = Manipulator::default();
        assert!(!m.pointer_down(&s.world, None, PointerButton::Primary, 0.0));
        assert!(!m.pointer_up());
    }

    #[test]
    fn test_drag_moves_with_offset_and_stays_grounded() {
        let mut s = scene();
        let mut m = Manipulator::default();

        // grab the swing 0.25 off its center
        let grab = Vec3::new(1.25, 0.5, 1.0);
        assert!(m.pointer_down(&s.world, hit(s.swing, grab), PointerButton::Primary, 0.0));
        assert!(m.is_dragging());
        assert_eq!(m.selected(), Some(s.swing));

        assert!(m.pointer_move(&mut s.world, Some(Vec3::new(4.0, 0.0, -2.0)), 10.0));
        let t = *s.world.get::<Transform>(s.swing).unwrap();
        assert!((t.position.x - 3.75).abs() < EPS);
        assert!((t.position.z + 2.0).abs() < EPS);
        let bounds = placement::world_bounds(&t, &Aabb::unit_cube(Vec3::ZERO, Vec3::ONE));
        assert!(bounds.min.y.abs() < EPS);

        // pointer off the ground: the container stays put
        assert!(!m.pointer_move(&mut s.world, None, 20.0));
        assert_eq!(*s.world.get::<Transform>(s.swing).unwrap(), t);

        assert!(m.pointer_up());
        assert_eq!(m.selected(), None);
        assert!(!m.pointer_move(&mut s.world, Some(Vec3::ZERO), 0.0));
    }

    #[test]
    fn test_rotate_follows_horizontal_travel() {
        let mut s = scene();
        let mut m = Manipulator::default();

        assert!(m.pointer_down(&s.world, hit(s.swing, Vec3::new(1.0, 0.5, 1.0)), PointerButton::Secondary, 100.0));
        m.pointer_move(&mut s.world, None, 250.0);
        m.pointer_move(&mut s.world, None, 200.0);

        let item = s.world.get::<PlacedItem>(s.swing).unwrap();
        assert!((item.yaw - 1.0).abs() < EPS);
        let rotation = s.world.get::<Transform>(s.swing).unwrap().rotation;
        assert!(rotation.abs_diff_eq(glam::Quat::from_rotation_y(1.0), 1e-5));
        assert!(m.pointer_up());

        // second gesture starts from the accumulated yaw
        m.pointer_down(&s.world, hit(s.swing, Vec3::ZERO), PointerButton::Secondary, 0.0);
        m.pointer_move(&mut s.world, None, -50.0);
        assert!((s.world.get::<PlacedItem>(s.swing).unwrap().yaw - 0.5).abs() < EPS);
    }

    #[test]
    fn test_custom_sensitivity() {
        let mut s = scene();
        let mut m = Manipulator::new(0.02);
        m.pointer_down(&s.world, hit(s.swing, Vec3::ZERO), PointerButton::Secondary, 0.0);
        m.pointer_move(&mut s.world, None, 10.0);
        assert!((s.world.get::<PlacedItem>(s.swing).unwrap().yaw - 0.2).abs() < EPS);
    }

    #[test]
    fn test_middle_button_is_ignored() {
        let s = scene();
        let mut m = Manipulator::default();
        assert!(!m.pointer_down(&s.world, hit(s.swing, Vec3::ZERO), PointerButton::Auxiliary, 0.0));
        assert!(!m.is_active());
    }

    #[test]
    fn test_despawned_target_is_ignored() {
        let mut s = scene();
        let mut m = Manipulator::default();
        m.pointer_down(&s.world, hit(s.swing, Vec3::ZERO), PointerButton::Primary, 0.0);
        s.world.despawn(s.swing);
        assert!(!m.pointer_move(&mut s.world, Some(Vec3::ONE), 0.0));
        assert!(m.pointer_up());
    }
}
