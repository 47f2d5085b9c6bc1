//! The orbit choreography: ring set, focus controller, and their tunables.

pub mod config;
pub mod focus;
pub mod system;

pub use config::{FocusMode, OrbitConfig};
pub use focus::FocusState;
pub use system::OrbitSystem;
