pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;
pub mod orbit;

// Re-export key types at crate root for convenience
pub use api::stage::{Stage, StageConfig, StageContext};
pub use api::types::{EntityId, OrbitEvent};
pub use components::drift::{DriftComponent, Heading};
pub use components::entity::Entity;
pub use components::shape::Shape;
pub use core::error::OrbitError;
pub use core::scene::Scene;
pub use core::time::FrameClock;
pub use renderer::camera::{Camera3D, Ray};
pub use renderer::instance::{NodeInstance, RenderBuffer};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use systems::{build_render_buffer, pick, raycast, tick_drift, Hit};
pub use orbit::{FocusMode, FocusState, OrbitConfig, OrbitSystem};

// Extensions — motion building blocks
pub use extensions::{
    Easing, lerp, lerp_vec3, ease, ease_vec3, wrap_angle,
    Transform,
    TweenState, Tween, TweenId, TweenTarget, TweenRepeat, TweenEvent,
};
