//! Focus controller: pulls one ring member out to the focus point, decorates
//! it, and sends it back when released.
//!
//! In clone mode the member itself never leaves its slot. A stand-in copy
//! does the travelling, parks on the Transport Ring on the way back, and
//! docks onto the original once the two rings bring them close together.

use glam::{Vec2, Vec3};
use crate::api::types::{EntityId, OrbitEvent};
use crate::components::entity::Entity;
use crate::components::shape::Shape;
use crate::core::scene::Scene;
use crate::extensions::easing::{wrap_angle, Easing};
use crate::extensions::tween::{Tween, TweenEvent, TweenId, TweenRepeat};
use crate::renderer::camera::Camera3D;
use crate::systems::pick::{pick, raycast_entity};
use super::config::FocusMode;
use super::system::OrbitSystem;

/// Below this horizontal distance a position has no usable orbit angle.
const MIN_ORBIT_DISTANCE: f32 = 1e-4;

/// Externally visible focus state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Idle,
    EnteringFocus,
    Focused,
    /// Nothing focused, but a released entity is still returning.
    ExitingFocus,
}

/// What a subject goes back to when released.
#[derive(Debug, Clone, Copy)]
pub(super) struct Rest {
    y: f32,
    scale: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub(super) enum Phase {
    Entering {
        ring: TweenId,
        yaw: TweenId,
        position: TweenId,
        fade: Option<TweenId>,
    },
    Focused {
        outline: EntityId,
        button: EntityId,
    },
}

#[derive(Debug, Clone, Copy)]
pub(super) struct ActiveFocus {
    /// The Main Ring member being focused.
    pub(super) target: EntityId,
    /// The node that actually moves: a stand-in in clone mode, else the target.
    pub(super) subject: EntityId,
    rest: Rest,
    phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FlightPhase {
    /// Tweening back toward the orbit.
    Returning { position: TweenId },
    /// Riding the Transport Ring until it meets its original.
    Parked,
    /// Settling onto the original's slot.
    Docking { position: TweenId },
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Flight {
    target: EntityId,
    subject: EntityId,
    rest: Rest,
    phase: FlightPhase,
}

impl OrbitSystem {
    /// Focus `target`, or release the current focus with `None`.
    ///
    /// Unknown targets and refocusing the current target are ignored.
    pub fn set_focus(&mut self, scene: &mut Scene, target: Option<EntityId>) {
        let Some(target) = target else {
            self.release(scene);
            return;
        };
        if self.current.is_some_and(|c| c.target == target) {
            log::debug!("{:?} is already focused", target);
            return;
        }
        if !self.members.contains(&target) || !scene.contains(target) {
            log::debug!("ignoring focus on {:?}: not on the main ring", target);
            return;
        }
        self.release(scene);
        self.enter(scene, target);
    }

    /// Focus the next (or previous) Main Ring member, wrapping around.
    pub fn cycle_focus(&mut self, scene: &mut Scene, backwards: bool) {
        let count = self.members.len();
        if count == 0 {
            return;
        }
        let current = self
            .current
            .and_then(|c| self.members.iter().position(|&m| m == c.target));
        let next = match (current, backwards) {
            (Some(i), false) => (i + 1) % count,
            (Some(i), true) => (i + count - 1) % count,
            (None, false) => 0,
            (None, true) => count - 1,
        };
        self.set_focus(scene, Some(self.members[next]));
    }

    /// Handle a click at canvas pixel `screen`. Returns the focused target when
    /// the click landed on it or on one of its decorations.
    pub fn click(&mut self, scene: &Scene, camera: &Camera3D, screen: Vec2) -> Option<EntityId> {
        let focus = self.current?;
        let hit = pick(scene, camera, screen)?;
        if hit == focus.subject || scene.parent(hit) == Some(focus.subject) {
            self.emit(OrbitEvent::OPEN_DETAIL, focus.target);
            Some(focus.target)
        } else {
            None
        }
    }

    pub fn focus_state(&self) -> FocusState {
        match self.current.map(|c| c.phase) {
            Some(Phase::Entering { .. }) => FocusState::EnteringFocus,
            Some(Phase::Focused { .. }) => FocusState::Focused,
            None if self.flights.is_empty() => FocusState::Idle,
            None => FocusState::ExitingFocus,
        }
    }

    /// The Main Ring member currently focused (or being focused).
    pub fn focused(&self) -> Option<EntityId> {
        self.current.map(|c| c.target)
    }

    /// The node standing in at the focus point.
    pub fn subject(&self) -> Option<EntityId> {
        self.current.map(|c| c.subject)
    }

    /// Highlight and detail button of a fully focused subject.
    pub fn decorations(&self) -> Option<(EntityId, EntityId)> {
        match self.current?.phase {
            Phase::Focused { outline, button } => Some((outline, button)),
            Phase::Entering { .. } => None,
        }
    }

    /// Released subjects that have not rejoined the Main Ring yet.
    pub fn in_flight(&self) -> Vec<EntityId> {
        self.flights.iter().map(|f| f.subject).collect()
    }

    fn enter(&mut self, scene: &mut Scene, target: EntityId) {
        let now = self.now;

        let (subject, rest) = match self.config.mode {
            FocusMode::Clone => {
                let Some(original) = scene.get_mut(target) else { return };
                let rest = Rest { y: original.pos.y, scale: original.scale };
                original.visible = false;
                if let Some(drift) = original.drift.as_mut() {
                    drift.pause(now);
                }
                let mut stand_in = original.clone();

                let id = scene.next_id();
                stand_in.id = id;
                stand_in.visible = true;
                stand_in.drift = None;
                scene.spawn(stand_in);
                (id, rest)
            }
            FocusMode::Move => {
                // Pick it up mid-flight if it is still on the way back.
                let returning = self.flights.iter().position(|f| f.target == target);
                let resumed = returning.map(|i| self.flights.remove(i));
                self.tweens.stop_entity(target);

                let Some(entity) = scene.get_mut(target) else { return };
                if let Some(drift) = entity.drift.as_mut() {
                    drift.pause(now);
                }
                let rest = resumed
                    .map(|f| f.rest)
                    .unwrap_or(Rest { y: entity.pos.y, scale: entity.scale });
                (target, rest)
            }
        };

        if let Some(ring) = scene.get_mut(self.focus_ring) {
            ring.rotation = Vec3::ZERO;
        }
        scene.attach(subject, Some(self.focus_ring));
        let Some(pos) = scene.get(subject).map(|e| e.pos) else { return };

        let multiplier = self.config.focus_multiplier;
        let focus_point = Vec3::new(pos.x * multiplier, 0.0, pos.z * multiplier);
        let path = wrap_angle(-pos.x.atan2(pos.z));
        let duration = self.config.entry_duration;

        let ring = self.tweens.play(
            self.focus_ring,
            Tween::rotation_y(path + self.config.ring_bias, duration, Easing::CubicInOut),
            now,
        );
        let yaw = self.tweens.play(
            subject,
            Tween::rotation_y(-path + self.config.yaw_bias, duration, Easing::CubicInOut),
            now,
        );
        let position = self.tweens.play(
            subject,
            Tween::position(focus_point, duration, Easing::CubicInOut),
            now,
        );
        let fade = self.mask.map(|mask| {
            self.tweens.stop_entity(mask);
            let fade = self.tweens.add(
                mask,
                Tween::opacity(self.config.mask_opacity, self.config.fade_duration, Easing::Linear),
            );
            self.tweens.chain(ring, fade);
            fade
        });

        log::debug!("focusing {:?} (subject {:?}, path {:.3})", target, subject, path);
        self.current = Some(ActiveFocus {
            target,
            subject,
            rest,
            phase: Phase::Entering { ring, yaw, position, fade },
        });
        self.emit(OrbitEvent::FOCUS_STARTED, target);
    }

    /// Send the current subject back toward the orbit. No-op when idle.
    fn release(&mut self, scene: &mut Scene) {
        let Some(focus) = self.current.take() else {
            log::debug!("release with nothing focused");
            return;
        };

        let interrupted = match focus.phase {
            Phase::Entering { ring, yaw, position, fade } => {
                self.tweens.stop(ring);
                self.tweens.stop(yaw);
                self.tweens.stop(position);
                if let Some(fade) = fade {
                    self.tweens.stop(fade);
                }
                true
            }
            Phase::Focused { outline, button } => {
                for decoration in [outline, button] {
                    self.tweens.stop_entity(decoration);
                    scene.despawn_tree(decoration);
                }
                false
            }
        };
        self.tweens.stop_entity(focus.subject);

        scene.attach(focus.subject, Some(self.root));
        if let Some(ring) = scene.get_mut(self.focus_ring) {
            ring.rotation = Vec3::ZERO;
        }

        if let Some(mask) = self.mask {
            self.tweens.stop_entity(mask);
            self.tweens.play(
                mask,
                Tween::opacity(0.0, self.config.fade_duration, Easing::Linear),
                self.now,
            );
        }

        let current = scene.get(focus.subject).map(|e| e.pos).unwrap_or(Vec3::ZERO);
        let destination = self.reentry_point(current, interrupted, focus.rest.y);
        let duration = self.config.exit_duration;

        let position = self.tweens.play(
            focus.subject,
            Tween::position(destination, duration, Easing::CubicInOut),
            self.now,
        );
        self.tweens.play(
            focus.subject,
            Tween::rotation_y(0.0, duration, Easing::CubicInOut),
            self.now,
        );
        self.tweens.play(
            focus.subject,
            Tween::scale(focus.rest.scale, duration, Easing::CubicInOut),
            self.now,
        );

        log::debug!("releasing {:?} toward {:?}", focus.target, destination);
        self.flights.push(Flight {
            target: focus.target,
            subject: focus.subject,
            rest: focus.rest,
            phase: FlightPhase::Returning { position },
        });
        self.emit(OrbitEvent::UNFOCUSED, focus.target);
    }

    /// Where a released subject rejoins the orbit, in orbit-root space.
    fn reentry_point(&self, current: Vec3, interrupted: bool, y: f32) -> Vec3 {
        let radius = self.config.radius;
        if interrupted {
            let back = current / self.config.focus_multiplier;
            let flat = Vec2::new(back.x, back.z);
            if flat.length() > MIN_ORBIT_DISTANCE {
                let on_ring = flat.normalize() * radius;
                return Vec3::new(on_ring.x, y, on_ring.y);
            }
        }
        let angle = self.config.reentry_angle;
        Vec3::new(radius * angle.sin(), y, radius * angle.cos())
    }

    pub(super) fn on_tween_event(&mut self, scene: &mut Scene, event: TweenEvent) {
        let TweenEvent::Completed { id, .. } = event else { return };

        if let Some(focus) = self.current {
            if matches!(focus.phase, Phase::Entering { position, .. } if position == id) {
                self.settle(scene, focus);
                return;
            }
        }

        let Some(index) = self.flights.iter().position(|f| match f.phase {
            FlightPhase::Returning { position } | FlightPhase::Docking { position } => position == id,
            FlightPhase::Parked => false,
        }) else {
            return;
        };

        let flight = self.flights[index];
        match (flight.phase, self.config.mode) {
            (FlightPhase::Returning { .. }, FocusMode::Move) => {
                self.flights.remove(index);
                self.rejoin(scene, flight);
            }
            (FlightPhase::Returning { .. }, FocusMode::Clone) => {
                if let Some(transport) = self.transport_ring {
                    scene.attach(flight.subject, Some(transport));
                }
                self.flights[index].phase = FlightPhase::Parked;
            }
            (FlightPhase::Docking { .. }, _) => {
                self.flights.remove(index);
                self.finish_docking(scene, flight);
            }
            (FlightPhase::Parked, _) => {}
        }
    }

    /// Entry finished: decorate the subject.
    fn settle(&mut self, scene: &mut Scene, focus: ActiveFocus) {
        let (half_height, front) = match scene.get(focus.subject).and_then(|e| e.shape) {
            Some(Shape::Box { half_extents }) => (half_extents.y, half_extents.z),
            Some(Shape::Sphere { radius }) => (radius, radius),
            None => (0.5, 0.0),
        };

        let outline = scene.next_id();
        scene.spawn(
            Entity::new(outline)
                .with_tag("focus-outline")
                .with_pos(Vec3::new(0.0, 0.0, -front - 0.02))
                .with_scale(Vec3::new(1.06, 1.06, 1.0))
                .with_parent(focus.subject),
        );
        self.tweens.play(
            outline,
            Tween::opacity(0.35, self.config.pulse_period, Easing::SineInOut)
                .from_opacity(1.0)
                .with_repeat(TweenRepeat::Forever)
                .with_yoyo(),
            self.now,
        );

        let button = scene.next_id();
        scene.spawn(
            Entity::new(button)
                .with_tag("detail-button")
                .with_pos(Vec3::new(0.0, -half_height * 0.75, front + 0.02))
                .with_shape(Shape::card(1.2, 0.4))
                .with_parent(focus.subject),
        );

        self.current = Some(ActiveFocus {
            phase: Phase::Focused { outline, button },
            ..focus
        });
        self.emit(OrbitEvent::FOCUSED, focus.target);
    }

    /// Move mode: the travelling entity becomes a ring member again.
    fn rejoin(&mut self, scene: &mut Scene, flight: Flight) {
        scene.attach(flight.subject, Some(self.main_ring));
        if let Some(entity) = scene.get_mut(flight.subject) {
            entity.rotation.y = -self.ring_angle;
            if let Some(drift) = entity.drift.as_mut() {
                drift.resume(self.now);
            }
        }
        self.emit(OrbitEvent::RESTORED, flight.target);
    }

    /// Start docking every parked stand-in that has met its original.
    pub(super) fn dock(&mut self, scene: &mut Scene) {
        for index in 0..self.flights.len() {
            let flight = self.flights[index];
            if flight.phase != FlightPhase::Parked {
                continue;
            }
            let (Some(stand_in), Some(original)) = (
                scene.world_position(flight.subject),
                scene.world_position(flight.target),
            ) else {
                continue;
            };
            if stand_in.distance_squared(original) > self.config.dock_distance_sq {
                continue;
            }
            let Some(slot) = scene.get(flight.target).map(|e| e.local()) else { continue };

            if let Some(entity) = scene.get_mut(flight.subject) {
                entity.rotation_frozen = true;
            }
            scene.attach(flight.subject, Some(self.main_ring));
            self.tweens.stop_entity(flight.subject);

            // Aim where the original's counter-rotation will be when the
            // stand-in lands. The ring angle grows without bound; turn the
            // short way round.
            let duration = self.config.dock_duration;
            let lead = if self.config.counter_rotate {
                self.config.angular_velocity * duration
            } else {
                0.0
            };
            let yaw = scene.get(flight.subject).map_or(0.0, |e| e.rotation.y);
            let rotation = Vec3::new(
                slot.rotation.x,
                yaw + wrap_angle(slot.rotation.y - lead - yaw),
                slot.rotation.z,
            );

            let position = self.tweens.play(
                flight.subject,
                Tween::position(slot.position, duration, Easing::QuadOut),
                self.now,
            );
            self.tweens.play(
                flight.subject,
                Tween::rotation(rotation, duration, Easing::QuadOut),
                self.now,
            );
            log::debug!("docking {:?} onto {:?}", flight.subject, flight.target);
            self.flights[index].phase = FlightPhase::Docking { position };
        }
    }

    /// Stand-in landed: remove it and bring the original back, unless another
    /// stand-in of the same original is still out.
    fn finish_docking(&mut self, scene: &mut Scene, flight: Flight) {
        self.tweens.stop_entity(flight.subject);
        scene.despawn_tree(flight.subject);

        let still_out = self.current.is_some_and(|c| c.target == flight.target)
            || self.flights.iter().any(|f| f.target == flight.target);
        if still_out {
            return;
        }
        if let Some(original) = scene.get_mut(flight.target) {
            original.visible = true;
            if let Some(drift) = original.drift.as_mut() {
                drift.resume(self.now);
            }
        }
        self.emit(OrbitEvent::RESTORED, flight.target);
    }

    /// Shrink the focused subject until no fit probe touches it.
    pub(super) fn fit(&mut self, scene: &mut Scene, camera: &Camera3D) {
        let Some(focus) = self.current else { return };
        if !matches!(focus.phase, Phase::Focused { .. }) {
            return;
        }
        let shrink = self.config.fit_shrink;
        if !(shrink > 0.0 && shrink < 1.0) {
            return;
        }

        let rays: Vec<_> = self
            .config
            .fit_probes
            .iter()
            .map(|&[x, y]| camera.ray_from_ndc(Vec2::new(x, y)))
            .collect();

        for _ in 0..self.config.fit_max_steps {
            let touching = rays
                .iter()
                .any(|ray| raycast_entity(scene, focus.subject, ray).is_some());
            if !touching {
                return;
            }
            let Some(entity) = scene.get_mut(focus.subject) else { return };
            entity.scale *= shrink;
        }
        log::debug!("fit pass for {:?} hit the step limit", focus.subject);
    }
}
