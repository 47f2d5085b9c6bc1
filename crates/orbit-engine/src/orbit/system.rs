use std::f32::consts::TAU;
use glam::Vec3;
use crate::api::types::{EntityId, OrbitEvent};
use crate::components::entity::Entity;
use crate::core::error::OrbitError;
use crate::core::scene::Scene;
use crate::extensions::tween::TweenState;
use crate::renderer::camera::Camera3D;
use crate::systems::drift::tick_drift;
use super::config::{FocusMode, OrbitConfig};
use super::focus::{ActiveFocus, Flight};

/// The ring set around one central object, plus the focus state machine
/// that moves entities in and out of it.
///
/// The system owns its pivot nodes and tween scheduler; the entities
/// themselves live in the caller's [`Scene`].
pub struct OrbitSystem {
    pub(super) config: OrbitConfig,
    pub(super) center: EntityId,
    /// Unrotated pivot at the central object. All rings hang off it.
    pub(super) root: EntityId,
    pub(super) main_ring: EntityId,
    pub(super) focus_ring: EntityId,
    pub(super) transport_ring: Option<EntityId>,
    pub(super) mask: Option<EntityId>,
    /// Main Ring members in insertion order.
    pub(super) members: Vec<EntityId>,
    pub(super) tweens: TweenState,
    pub(super) now: f32,
    pub(super) ring_angle: f32,
    pub(super) current: Option<ActiveFocus>,
    /// Released subjects still on their way back.
    pub(super) flights: Vec<Flight>,
    pub(super) events: Vec<OrbitEvent>,
}

impl OrbitSystem {
    /// Build the rings around `center`. Clone mode also gets a Transport Ring.
    ///
    /// Clone mode needs the Transport Ring to move against the Main Ring,
    /// or parked stand-ins would never meet their originals.
    pub fn new(scene: &mut Scene, config: OrbitConfig, center: EntityId) -> Result<Self, OrbitError> {
        if !config.radius.is_finite() || config.radius <= 0.0 {
            return Err(OrbitError::InvalidRadius(config.radius));
        }
        if config.mode == FocusMode::Clone {
            let relative = config.angular_velocity * (config.transport_ratio - 1.0);
            if !relative.is_finite() || relative == 0.0 {
                return Err(OrbitError::StalledTransport(relative));
            }
        }
        let origin = scene
            .world_position(center)
            .ok_or(OrbitError::MissingCenter(center))?;

        let root = scene.next_id();
        scene.spawn(Entity::pivot(root).with_tag("orbit-root").with_pos(origin));

        let main_ring = scene.next_id();
        scene.spawn(Entity::pivot(main_ring).with_tag("main-ring").with_parent(root));

        let focus_ring = scene.next_id();
        scene.spawn(Entity::pivot(focus_ring).with_tag("focus-ring").with_parent(root));

        let transport_ring = match config.mode {
            FocusMode::Clone => {
                let id = scene.next_id();
                scene.spawn(Entity::pivot(id).with_tag("transport-ring").with_parent(root));
                Some(id)
            }
            FocusMode::Move => None,
        };

        log::info!(
            "orbit around {:?}: radius {}, {:?} mode",
            center, config.radius, config.mode
        );

        Ok(Self {
            config,
            center,
            root,
            main_ring,
            focus_ring,
            transport_ring,
            mask: None,
            members: Vec::new(),
            tweens: TweenState::new(),
            now: 0.0,
            ring_angle: 0.0,
            current: None,
            flights: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Use `mask` as the dimming overlay faded in while something is focused.
    pub fn set_mask(&mut self, scene: &mut Scene, mask: EntityId) -> Result<(), OrbitError> {
        let entity = scene.get_mut(mask).ok_or(OrbitError::UnknownEntity(mask))?;
        entity.opacity = 0.0;
        self.mask = Some(mask);
        Ok(())
    }

    /// Put `id` on the Main Ring at `angle`.
    ///
    /// With `redistribute`, the existing members are first re-spaced evenly
    /// starting at `angle`, and the new entity takes the slot left open after
    /// the last of them. Height is kept.
    pub fn add_entity(
        &mut self,
        scene: &mut Scene,
        id: EntityId,
        angle: f32,
        redistribute: bool,
    ) -> Result<(), OrbitError> {
        let parent = scene.get(id).ok_or(OrbitError::UnknownEntity(id))?.parent();
        if self.members.contains(&id) || parent.is_some_and(|p| self.is_ring(p)) {
            return Err(OrbitError::AlreadyInRing(id));
        }

        let slot = if redistribute {
            let count = self.members.len();
            let step = TAU / (count + 1) as f32;
            for (i, &member) in self.members.iter().enumerate() {
                self.place(scene, member, angle + i as f32 * step);
            }
            angle + count as f32 * step
        } else {
            angle
        };

        scene.set_parent(id, Some(self.main_ring));
        self.members.push(id);
        self.place(scene, id, slot);
        if let Some(entity) = scene.get_mut(id) {
            entity.rotation.y = -self.ring_angle;
        }
        Ok(())
    }

    fn place(&self, scene: &mut Scene, id: EntityId, angle: f32) {
        let radius = self.config.radius;
        match scene.get_mut(id) {
            Some(entity) if entity.parent() == Some(self.main_ring) => {
                entity.pos = Vec3::new(radius * angle.sin(), entity.pos.y, radius * angle.cos());
            }
            Some(_) => log::debug!("{:?} is away from the main ring, keeping its place", id),
            None => log::debug!("{:?} vanished from the scene", id),
        }
    }

    /// Spin the rings to `angle` and keep members facing the camera.
    /// Parked stand-ins that met their originals start docking.
    pub fn advance(&mut self, scene: &mut Scene, angle: f32, counter_rotate: bool) {
        self.rotate_rings(scene, angle, counter_rotate);
        self.dock(scene);
    }

    pub(super) fn rotate_rings(&mut self, scene: &mut Scene, angle: f32, counter_rotate: bool) {
        self.ring_angle = angle;
        if let Some(ring) = scene.get_mut(self.main_ring) {
            ring.rotation.y = angle;
        }
        if let Some(ring) = self.transport_ring.and_then(|id| scene.get_mut(id)) {
            ring.rotation.y = angle * self.config.transport_ratio;
        }
        if !counter_rotate {
            return;
        }

        let hidden_original = match (&self.current, self.config.mode) {
            (Some(focus), FocusMode::Clone) => Some(focus.target),
            _ => None,
        };
        for child in scene.children(self.main_ring) {
            if Some(child) == hidden_original {
                continue;
            }
            if let Some(entity) = scene.get_mut(child) {
                if !entity.rotation_frozen {
                    entity.rotation.y = -angle;
                }
            }
        }
    }

    /// One frame: drift, ring rotation, tweens, docking, then the fit pass.
    pub fn tick(&mut self, scene: &mut Scene, camera: &Camera3D, now: f32) {
        self.now = now;
        tick_drift(scene, now);
        self.rotate_rings(scene, now * self.config.angular_velocity, self.config.counter_rotate);

        for event in self.tweens.tick(now, scene) {
            self.on_tween_event(scene, event);
        }

        self.dock(scene);
        self.fit(scene, camera);
    }

    pub(super) fn is_ring(&self, id: EntityId) -> bool {
        id == self.main_ring || id == self.focus_ring || Some(id) == self.transport_ring
    }

    pub(super) fn emit(&mut self, kind: f32, id: EntityId) {
        self.events.push(OrbitEvent::new(kind, id));
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<OrbitEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn center(&self) -> EntityId {
        self.center
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    pub fn main_ring(&self) -> EntityId {
        self.main_ring
    }

    pub fn focus_ring(&self) -> EntityId {
        self.focus_ring
    }

    pub fn transport_ring(&self) -> Option<EntityId> {
        self.transport_ring
    }

    pub fn mask(&self) -> Option<EntityId> {
        self.mask
    }

    /// Main Ring members in insertion order.
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }

    pub fn ring_angle(&self) -> f32 {
        self.ring_angle
    }

    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn tweens(&self) -> &TweenState {
        &self.tweens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::easing::wrap_angle;

    fn setup(config: OrbitConfig) -> (Scene, OrbitSystem) {
        let mut scene = Scene::new();
        let center = scene.next_id();
        scene.spawn(Entity::new(center));
        let orbit = OrbitSystem::new(&mut scene, config, center).unwrap();
        (scene, orbit)
    }

    fn spawn_card(scene: &mut Scene) -> EntityId {
        let id = scene.next_id();
        scene.spawn(Entity::new(id).with_pos(Vec3::new(0.0, 0.3, 0.0)));
        id
    }

    fn slot_angle(scene: &Scene, id: EntityId) -> f32 {
        let pos = scene.get(id).unwrap().pos;
        pos.x.atan2(pos.z)
    }

    #[test]
    fn rejects_bad_construction() {
        let mut scene = Scene::new();
        let center = scene.spawn(Entity::new(EntityId(1)));
        let bad = OrbitConfig { radius: 0.0, ..Default::default() };
        assert_eq!(
            OrbitSystem::new(&mut scene, bad, center).err(),
            Some(OrbitError::InvalidRadius(0.0))
        );
        let nan = OrbitConfig { radius: f32::NAN, ..Default::default() };
        assert!(OrbitSystem::new(&mut scene, nan, center).is_err());
        assert_eq!(
            OrbitSystem::new(&mut scene, OrbitConfig::default(), EntityId(99)).err(),
            Some(OrbitError::MissingCenter(EntityId(99)))
        );
    }

    #[test]
    fn clone_mode_rejects_a_stalled_transport_ring() {
        let mut scene = Scene::new();
        let center = scene.spawn(Entity::new(EntityId(1)));
        let still = OrbitConfig { angular_velocity: 0.0, ..Default::default() };
        assert_eq!(
            OrbitSystem::new(&mut scene, still, center).err(),
            Some(OrbitError::StalledTransport(0.0))
        );
        let locked = OrbitConfig { transport_ratio: 1.0, ..Default::default() };
        assert!(matches!(
            OrbitSystem::new(&mut scene, locked, center),
            Err(OrbitError::StalledTransport(_))
        ));

        // Move mode has no transport ring to stall.
        let moving = OrbitConfig { angular_velocity: 0.0, mode: FocusMode::Move, ..Default::default() };
        assert!(OrbitSystem::new(&mut scene, moving, center).is_ok());
        // Reversed spin still passes the originals.
        let reversed = OrbitConfig { angular_velocity: -0.2, ..Default::default() };
        assert!(OrbitSystem::new(&mut scene, reversed, center).is_ok());
    }

    #[test]
    fn transport_ring_only_in_clone_mode() {
        let (_, clone) = setup(OrbitConfig::default());
        assert!(clone.transport_ring().is_some());
        let (_, moving) = setup(OrbitConfig { mode: FocusMode::Move, ..Default::default() });
        assert!(moving.transport_ring().is_none());
    }

    #[test]
    fn redistribution_spaces_members_evenly() {
        let (mut scene, mut orbit) = setup(OrbitConfig::default());
        for n in 1..=7 {
            let card = spawn_card(&mut scene);
            orbit.add_entity(&mut scene, card, 0.0, true).unwrap();

            let step = TAU / n as f32;
            for (i, &member) in orbit.members().iter().enumerate() {
                let expected = wrap_angle(i as f32 * step);
                let actual = slot_angle(&scene, member);
                assert!(
                    wrap_angle(actual - expected).abs() < 1e-4,
                    "n={} member {} at {} expected {}", n, i, actual, expected
                );
            }
        }
    }

    #[test]
    fn seven_cards_at_radius_six_and_a_half() {
        let (mut scene, mut orbit) = setup(OrbitConfig::default());
        let cards: Vec<EntityId> = (0..7).map(|_| spawn_card(&mut scene)).collect();
        for &card in &cards {
            orbit.add_entity(&mut scene, card, 0.0, true).unwrap();
        }

        let third = scene.get(cards[2]).unwrap().pos;
        let angle = 2.0 * TAU / 7.0;
        assert!((third.x - 6.5 * angle.sin()).abs() < 1e-4);
        assert!((third.z - 6.5 * angle.cos()).abs() < 1e-4);
        for &card in &cards {
            let pos = scene.get(card).unwrap().pos;
            assert!((Vec3::new(pos.x, 0.0, pos.z).length() - 6.5).abs() < 1e-4);
            assert_eq!(pos.y, 0.3, "height is kept");
        }
    }

    #[test]
    fn rejects_duplicates_and_unknown_entities() {
        let (mut scene, mut orbit) = setup(OrbitConfig::default());
        let card = spawn_card(&mut scene);
        orbit.add_entity(&mut scene, card, 0.0, true).unwrap();
        assert_eq!(
            orbit.add_entity(&mut scene, card, 1.0, false),
            Err(OrbitError::AlreadyInRing(card))
        );
        assert_eq!(
            orbit.add_entity(&mut scene, EntityId(500), 0.0, false),
            Err(OrbitError::UnknownEntity(EntityId(500)))
        );
    }

    #[test]
    fn advance_spins_rings_and_counter_rotates() {
        let (mut scene, mut orbit) = setup(OrbitConfig::default());
        let a = spawn_card(&mut scene);
        let b = spawn_card(&mut scene);
        orbit.add_entity(&mut scene, a, 0.0, true).unwrap();
        orbit.add_entity(&mut scene, b, 0.0, true).unwrap();
        scene.get_mut(b).unwrap().rotation_frozen = true;

        orbit.advance(&mut scene, 0.5, true);

        assert_eq!(scene.get(orbit.main_ring()).unwrap().rotation.y, 0.5);
        let transport = orbit.transport_ring().unwrap();
        assert!((scene.get(transport).unwrap().rotation.y - 1.5).abs() < 1e-6);
        assert_eq!(scene.get(a).unwrap().rotation.y, -0.5);
        assert_eq!(scene.get(b).unwrap().rotation.y, 0.0, "frozen members keep their yaw");

        // Counter-rotated members face the camera in world space.
        let world = scene.world_rotation(a).unwrap();
        assert!(world.abs_diff_eq(glam::Quat::IDENTITY, 1e-5));

        orbit.advance(&mut scene, 0.8, false);
        assert_eq!(scene.get(a).unwrap().rotation.y, -0.5);
    }
}
