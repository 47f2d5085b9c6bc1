// extensions/mod.rs
//
// Motion building blocks shared by the orbit systems.
// Decoupled from the ring logic: easing curves, transform math, the tween scheduler.

pub mod easing;
pub mod transform;
pub mod tween;

pub use easing::{Easing, lerp, lerp_vec3, ease, ease_vec3, wrap_angle};
pub use transform::Transform;
pub use tween::{TweenState, Tween, TweenId, TweenTarget, TweenRepeat, TweenEvent};
