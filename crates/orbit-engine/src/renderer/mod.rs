pub mod instance;
pub mod camera;

pub use camera::{Camera3D, Ray};
pub use instance::{NodeInstance, RenderBuffer};
