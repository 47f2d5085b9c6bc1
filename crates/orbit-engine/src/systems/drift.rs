use crate::core::scene::Scene;

/// Sample every drifting entity at `now` and write its height.
/// Paused drifts leave the entity where it is.
pub fn tick_drift(scene: &mut Scene, now: f32) {
    for entity in scene.iter_mut() {
        if let Some(y) = entity.drift.as_mut().and_then(|d| d.sample(now)) {
            entity.pos.y = y;
        }
    }
}
