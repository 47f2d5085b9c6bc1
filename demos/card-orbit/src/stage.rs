/// Card Orbit — content cards circling a central sphere.
///
/// Menu selections and arrow keys move the focus, Escape releases it, and a
/// click on the focused card asks the page for its detail view.

use std::collections::BTreeMap;
use glam::{Vec2, Vec3};
use orbit_engine::*;

use crate::cards::CardManifest;

// ── Scene layout ─────────────────────────────────────────────────────

const SPHERE_RADIUS: f32 = 2.5;
const CARD_WIDTH: f32 = 2.0;
const CARD_HEIGHT: f32 = 2.8;
/// Dimming plane, between the ring and the focus point.
const MASK_DEPTH: f32 = 9.0;
const MASK_SIZE: f32 = 60.0;

// ── Drift ────────────────────────────────────────────────────────────

const DRIFT_DEVIATION: f32 = 0.35;
const DRIFT_MIN_SECONDS: f32 = 2.5;
const DRIFT_MAX_SECONDS: f32 = 4.0;

// ── Keys ─────────────────────────────────────────────────────────────

const KEY_ESCAPE: u32 = 27;
const KEY_LEFT: u32 = 37;
const KEY_RIGHT: u32 = 39;

pub struct CardOrbit {
    manifest: Option<CardManifest>,
    orbit: Option<OrbitSystem>,
    /// Card id → entity, and back.
    by_card: BTreeMap<u32, EntityId>,
    by_entity: BTreeMap<EntityId, u32>,
}

impl CardOrbit {
    pub fn new() -> Self {
        let manifest = match CardManifest::bundled() {
            Ok(manifest) => Some(manifest),
            Err(err) => {
                log::error!("card manifest is malformed: {}", err);
                None
            }
        };
        Self::with_manifest(manifest)
    }

    pub fn with_manifest(manifest: Option<CardManifest>) -> Self {
        Self {
            manifest,
            orbit: None,
            by_card: BTreeMap::new(),
            by_entity: BTreeMap::new(),
        }
    }

    fn build(&mut self, ctx: &mut StageContext, manifest: &CardManifest) -> Result<(), OrbitError> {
        let sphere = ctx.next_id();
        ctx.scene.spawn(
            Entity::new(sphere)
                .with_tag("sphere")
                .with_shape(Shape::Sphere { radius: SPHERE_RADIUS }),
        );

        let mut orbit = OrbitSystem::new(&mut ctx.scene, manifest.orbit.clone(), sphere)?;

        let mask = ctx.next_id();
        ctx.scene.spawn(
            Entity::new(mask)
                .with_tag("mask")
                .with_pos(Vec3::new(0.0, 0.0, MASK_DEPTH))
                .with_scale(Vec3::new(MASK_SIZE, MASK_SIZE, 1.0)),
        );
        orbit.set_mask(&mut ctx.scene, mask)?;

        for card in &manifest.cards {
            let id = ctx.next_id();
            let drift = DriftComponent::random(
                0.0,
                DRIFT_DEVIATION,
                DRIFT_MIN_SECONDS,
                DRIFT_MAX_SECONDS,
                &mut ctx.rng,
            );
            ctx.scene.spawn(
                Entity::new(id)
                    .with_tag(format!("card-{}", card.id))
                    .with_shape(Shape::card(CARD_WIDTH, CARD_HEIGHT))
                    .with_drift(drift),
            );
            orbit.add_entity(&mut ctx.scene, id, 0.0, true)?;
            self.by_card.insert(card.id, id);
            self.by_entity.insert(id, card.id);
        }

        log::info!("{} cards on a {} radius orbit", manifest.cards.len(), manifest.orbit.radius);
        self.orbit = Some(orbit);
        Ok(())
    }

    /// Focused card id, if any.
    pub fn focused_card(&self) -> Option<u32> {
        let entity = self.orbit.as_ref()?.focused()?;
        self.by_entity.get(&entity).copied()
    }

    pub fn orbit(&self) -> Option<&OrbitSystem> {
        self.orbit.as_ref()
    }
}

impl Default for CardOrbit {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for CardOrbit {
    fn config(&self) -> StageConfig {
        StageConfig {
            camera_position: [0.0, 1.5, 22.0],
            ..Default::default()
        }
    }

    fn init(&mut self, ctx: &mut StageContext) {
        let Some(manifest) = self.manifest.take() else { return };
        if let Err(err) = self.build(ctx, &manifest) {
            log::error!("could not build the orbit: {}", err);
        }
        self.manifest = Some(manifest);
    }

    fn update(&mut self, ctx: &mut StageContext, input: &InputQueue) {
        let Some(orbit) = self.orbit.as_mut() else { return };

        for event in input.iter() {
            match *event {
                InputEvent::PointerClick { x, y } => {
                    orbit.click(&ctx.scene, &ctx.camera, Vec2::new(x, y));
                }
                InputEvent::MenuSelect { id: Some(card) } => match self.by_card.get(&card) {
                    Some(&entity) => orbit.set_focus(&mut ctx.scene, Some(entity)),
                    None => log::debug!("menu selected unknown card {}", card),
                },
                InputEvent::MenuSelect { id: None } | InputEvent::KeyDown { key_code: KEY_ESCAPE } => {
                    orbit.set_focus(&mut ctx.scene, None);
                }
                InputEvent::Cycle { backwards } => orbit.cycle_focus(&mut ctx.scene, backwards),
                InputEvent::KeyDown { key_code: KEY_LEFT } => orbit.cycle_focus(&mut ctx.scene, true),
                InputEvent::KeyDown { key_code: KEY_RIGHT } => orbit.cycle_focus(&mut ctx.scene, false),
                InputEvent::KeyDown { .. } | InputEvent::Resize { .. } => {}
            }
        }

        orbit.tick(&mut ctx.scene, &ctx.camera, ctx.now);

        // The page knows cards, not entities: `a` = card id, `b` = entity id.
        for event in orbit.drain_events() {
            let entity = event.entity();
            let Some(&card) = self.by_entity.get(&entity) else { continue };
            ctx.emit_event(OrbitEvent {
                kind: event.kind,
                a: card as f32,
                b: entity.0 as f32,
                c: 0.0,
            });
        }
    }
}
