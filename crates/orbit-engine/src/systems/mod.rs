pub mod drift;
pub mod pick;
pub mod render;

pub use drift::tick_drift;
pub use pick::{pick, raycast, raycast_entity, Hit};
pub use render::build_render_buffer;
