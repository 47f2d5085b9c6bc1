use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use crate::api::types::{EntityId, OrbitEvent};
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera3D;

/// Configuration for the runtime, provided by the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Longest frame delta accepted, in seconds (default: 0.1).
    pub max_dt: f32,
    /// Initial canvas size in pixels.
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
    /// Maximum number of node instances written per frame (default: 256).
    pub max_instances: usize,
    /// Maximum number of orbit events per frame (default: 32).
    pub max_events: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            max_dt: 0.1,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            fov_y_degrees: 45.0,
            camera_position: [0.0, 2.0, 24.0],
            camera_target: [0.0, 0.0, 0.0],
            max_instances: 256,
            max_events: 32,
        }
    }
}

impl StageConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn camera(&self) -> Camera3D {
        Camera3D::new(
            Vec3::from(self.camera_position),
            Vec3::from(self.camera_target),
            self.fov_y_degrees.to_radians(),
            Vec2::new(self.viewport_width, self.viewport_height),
        )
    }
}

/// The contract every scene composition fulfills.
pub trait Stage {
    /// Return runtime configuration. Called once before init.
    fn config(&self) -> StageConfig {
        StageConfig::default()
    }

    /// Spawn entities and build the orbit.
    fn init(&mut self, ctx: &mut StageContext);

    /// Per-frame tick: route input, advance the orbit.
    fn update(&mut self, ctx: &mut StageContext, input: &InputQueue);
}

/// Mutable access to runtime state, passed to Stage::init and Stage::update.
pub struct StageContext {
    pub scene: Scene,
    pub camera: Camera3D,
    /// Events for the page, drained every frame.
    pub events: Vec<OrbitEvent>,
    /// Seconds since start.
    pub now: f32,
    pub rng: SmallRng,
}

impl StageContext {
    pub fn new(config: &StageConfig, seed: u64) -> Self {
        Self {
            scene: Scene::with_capacity(config.max_instances),
            camera: config.camera(),
            events: Vec::with_capacity(config.max_events),
            now: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        self.scene.next_id()
    }

    /// Emit an event to be forwarded to the page.
    pub fn emit_event(&mut self, event: OrbitEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}
