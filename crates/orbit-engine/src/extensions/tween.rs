// extensions/tween.rs
//
// Tween scheduler — animated value transitions on entity fields, by EntityId.
// Every tween is a pure function of absolute time since its own start, so
// sampling the same timestamp twice never changes the result.
//
// Usage:
//   let mut tweens = TweenState::new();
//   let spin = tweens.play(ring, Tween::rotation_y(PI, 1.2, Easing::CubicInOut), now);
//   let fade = tweens.add(mask, Tween::opacity(0.6, 0.4, Easing::Linear));
//   tweens.chain(spin, fade);           // fade starts when spin completes
//   let events = tweens.tick(now, &mut scene);

use std::collections::BTreeMap;
use glam::Vec3;
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::core::scene::Scene;
use super::easing::{ease, ease_vec3, Easing};

/// What property a tween animates. A `from` of `None` is captured from the
/// entity the first time the tween is sampled after starting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    /// Animate Entity.pos
    Position { from: Option<Vec3>, to: Vec3 },
    /// Animate the full Euler rotation
    Rotation { from: Option<Vec3>, to: Vec3 },
    /// Animate yaw only
    RotationY { from: Option<f32>, to: f32 },
    Scale { from: Option<Vec3>, to: Vec3 },
    Opacity { from: Option<f32>, to: f32 },
}

/// How many extra times a tween runs after the first pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenRepeat {
    #[default]
    Never,
    Times(u32),
    Forever,
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Duration of one pass in seconds.
    pub duration: f32,
    pub easing: Easing,
    pub repeat: TweenRepeat,
    /// Reverse direction on every repeat (ping-pong).
    pub yoyo: bool,
}

impl Tween {
    pub fn new(target: TweenTarget, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            duration: duration.max(0.0),
            easing,
            repeat: TweenRepeat::Never,
            yoyo: false,
        }
    }

    pub fn position(to: Vec3, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Position { from: None, to }, duration, easing)
    }

    pub fn rotation(to: Vec3, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Rotation { from: None, to }, duration, easing)
    }

    pub fn rotation_y(to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::RotationY { from: None, to }, duration, easing)
    }

    pub fn scale(to: Vec3, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Scale { from: None, to }, duration, easing)
    }

    pub fn opacity(to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Opacity { from: None, to }, duration, easing)
    }

    // -- Builder methods --

    /// Start from an explicit value instead of the entity's current one.
    pub fn from_opacity(mut self, from: f32) -> Self {
        if let TweenTarget::Opacity { to, .. } = self.target {
            self.target = TweenTarget::Opacity { from: Some(from), to };
        }
        self
    }

    pub fn with_repeat(mut self, repeat: TweenRepeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    /// Total running time, or `None` for endless tweens.
    pub fn total_duration(&self) -> Option<f32> {
        match self.repeat {
            TweenRepeat::Never => Some(self.duration),
            TweenRepeat::Times(n) => Some(self.duration * (n as f32 + 1.0)),
            TweenRepeat::Forever => None,
        }
    }
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u32);

/// Reported by [`TweenState::tick`] in deterministic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenEvent {
    /// A pass finished and another one began.
    Repeated { id: TweenId, entity: EntityId },
    /// The tween finished and was removed.
    Completed { id: TweenId, entity: EntityId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    /// Added but not started; chained tweens wait here.
    Idle,
    Running { start: f32, passes: u32 },
}

#[derive(Debug, Clone)]
struct Slot {
    entity: EntityId,
    tween: Tween,
    status: Status,
    chain: Vec<TweenId>,
}

/// Manages all tweens of one owner. Iteration order is the TweenId order.
#[derive(Debug, Default)]
pub struct TweenState {
    slots: BTreeMap<TweenId, Slot>,
    next_id: u32,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tween without starting it.
    pub fn add(&mut self, entity: EntityId, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.slots.insert(id, Slot {
            entity,
            tween,
            status: Status::Idle,
            chain: Vec::new(),
        });
        id
    }

    /// Start a registered tween at `now`. Restarting resets its progress.
    pub fn start(&mut self, id: TweenId, now: f32) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.status = Status::Running { start: now, passes: 0 };
        }
    }

    /// Register and start in one call.
    pub fn play(&mut self, entity: EntityId, tween: Tween, now: f32) -> TweenId {
        let id = self.add(entity, tween);
        self.start(id, now);
        id
    }

    /// Start `next` automatically at the exact moment `first` completes.
    pub fn chain(&mut self, first: TweenId, next: TweenId) {
        if let Some(slot) = self.slots.get_mut(&first) {
            if !slot.chain.contains(&next) {
                slot.chain.push(next);
            }
        }
    }

    /// Remove a tween. Chained tweens that have not started yet go with it.
    pub fn stop(&mut self, id: TweenId) -> bool {
        let Some(slot) = self.slots.remove(&id) else { return false };
        for next in slot.chain {
            if matches!(self.slots.get(&next), Some(s) if s.status == Status::Idle) {
                self.stop(next);
            }
        }
        true
    }

    /// Remove every tween that animates `entity`.
    pub fn stop_entity(&mut self, entity: EntityId) {
        let ids: Vec<TweenId> = self
            .slots
            .iter()
            .filter(|(_, s)| s.entity == entity)
            .map(|(&id, _)| id)
            .collect();
        for id in ids {
            self.stop(id);
        }
    }

    /// Still registered (running or waiting on a chain).
    pub fn is_active(&self, id: TweenId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn is_running(&self, id: TweenId) -> bool {
        matches!(self.slots.get(&id), Some(s) if matches!(s.status, Status::Running { .. }))
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.slots.get(&id).map(|s| &s.tween)
    }

    /// Sample every running tween at absolute time `now` and write the values
    /// to the scene. Tweens whose entity has gone are dropped silently.
    pub fn tick(&mut self, now: f32, scene: &mut Scene) -> Vec<TweenEvent> {
        let mut events = Vec::new();
        let mut queue: Vec<TweenId> = self.slots.keys().copied().collect();
        let mut cursor = 0;

        while cursor < queue.len() {
            let id = queue[cursor];
            cursor += 1;

            let Some(slot) = self.slots.get_mut(&id) else { continue };
            let Status::Running { start, passes } = slot.status else { continue };

            let Some(entity) = scene.get_mut(slot.entity) else {
                self.slots.remove(&id);
                continue;
            };

            capture_from(&mut slot.tween.target, entity);

            let tween = &slot.tween;
            let elapsed = (now - start).max(0.0);
            let finished = tween.total_duration().is_some_and(|total| elapsed >= total);

            let (pass, t) = if tween.duration <= 0.0 {
                (0, 1.0)
            } else if finished {
                let last = match tween.repeat {
                    TweenRepeat::Times(n) => n,
                    _ => 0,
                };
                (last, 1.0)
            } else {
                let pass = (elapsed / tween.duration).floor();
                (pass as u32, (elapsed - pass * tween.duration) / tween.duration)
            };
            let t = if tween.yoyo && pass % 2 == 1 { 1.0 - t } else { t };

            apply(&tween.target, tween.easing, t, entity);

            if pass > passes {
                slot.status = Status::Running { start, passes: pass };
                events.push(TweenEvent::Repeated { id, entity: slot.entity });
            }

            if finished {
                let end = start + tween.total_duration().unwrap_or(0.0);
                let done_entity = slot.entity;
                let chain = std::mem::take(&mut slot.chain);
                self.slots.remove(&id);
                events.push(TweenEvent::Completed { id, entity: done_entity });

                for next in chain {
                    if let Some(next_slot) = self.slots.get_mut(&next) {
                        next_slot.status = Status::Running { start: end, passes: 0 };
                        if !queue[cursor..].contains(&next) {
                            queue.push(next);
                        }
                    }
                }
            }
        }

        events
    }

    /// Number of registered tweens.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

fn capture_from(target: &mut TweenTarget, entity: &Entity) {
    match target {
        TweenTarget::Position { from, .. } => {
            from.get_or_insert(entity.pos);
        }
        TweenTarget::Rotation { from, .. } => {
            from.get_or_insert(entity.rotation);
        }
        TweenTarget::RotationY { from, .. } => {
            from.get_or_insert(entity.rotation.y);
        }
        TweenTarget::Scale { from, .. } => {
            from.get_or_insert(entity.scale);
        }
        TweenTarget::Opacity { from, .. } => {
            from.get_or_insert(entity.opacity);
        }
    }
}

fn apply(target: &TweenTarget, easing: Easing, t: f32, entity: &mut Entity) {
    // Land exactly on `to`; lerp at t = 1 can be an ulp off.
    let done = t >= 1.0;
    match *target {
        TweenTarget::Position { from, to } => {
            entity.pos = if done { to } else { ease_vec3(from.unwrap_or(to), to, t, easing) };
        }
        TweenTarget::Rotation { from, to } => {
            entity.rotation = if done { to } else { ease_vec3(from.unwrap_or(to), to, t, easing) };
        }
        TweenTarget::RotationY { from, to } => {
            entity.rotation.y = if done { to } else { ease(from.unwrap_or(to), to, t, easing) };
        }
        TweenTarget::Scale { from, to } => {
            entity.scale = if done { to } else { ease_vec3(from.unwrap_or(to), to, t, easing) };
        }
        TweenTarget::Opacity { from, to } => {
            entity.opacity = if done { to } else { ease(from.unwrap_or(to), to, t, easing) };
        }
    }
}
