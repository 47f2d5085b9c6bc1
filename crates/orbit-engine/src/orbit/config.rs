use std::f32::consts::PI;
use serde::{Deserialize, Serialize};

/// How a focused entity leaves the Main Ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusMode {
    /// A stand-in copy flies to the focus point while the real entity stays
    /// hidden in its slot. The stand-in returns through the Transport Ring
    /// and docks back onto the original.
    #[default]
    Clone,
    /// The real entity travels, and rejoins the Main Ring wherever it lands.
    Move,
}

/// Tunables for one orbit. Every field has a default, so a JSON config only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Main Ring radius in world units. Must be positive.
    pub radius: f32,
    /// Main Ring yaw speed in radians per second.
    pub angular_velocity: f32,
    /// Keep ring members facing the camera while the ring spins.
    pub counter_rotate: bool,
    pub mode: FocusMode,
    /// Transport Ring speed as a multiple of the Main Ring's.
    pub transport_ratio: f32,
    /// Focus point distance as a multiple of the entity's orbit distance.
    pub focus_multiplier: f32,
    /// Extra Focus Ring yaw on entry, in radians.
    pub ring_bias: f32,
    /// Extra subject yaw on entry, in radians.
    pub yaw_bias: f32,
    /// Seconds.
    pub entry_duration: f32,
    pub exit_duration: f32,
    /// Dimming mask fade time.
    pub fade_duration: f32,
    /// Mask opacity while something is focused.
    pub mask_opacity: f32,
    /// Angle on the orbit where a fully focused entity is sent back.
    pub reentry_angle: f32,
    /// Squared world distance at which a parked stand-in docks.
    pub dock_distance_sq: f32,
    pub dock_duration: f32,
    /// NDC probe points bounding the region the focused entity must fit in.
    pub fit_probes: [[f32; 2]; 4],
    /// Scale factor applied per fit step.
    pub fit_shrink: f32,
    /// Upper bound on fit steps per frame.
    pub fit_max_steps: u32,
    /// Highlight pulse half-period in seconds.
    pub pulse_period: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius: 6.5,
            angular_velocity: 0.1,
            counter_rotate: true,
            mode: FocusMode::Clone,
            transport_ratio: 3.0,
            focus_multiplier: 1.8,
            ring_bias: PI / 14.0,
            yaw_bias: PI / 12.0,
            entry_duration: 1.2,
            exit_duration: 1.0,
            fade_duration: 0.4,
            mask_opacity: 0.6,
            reentry_angle: PI / 4.0,
            dock_distance_sq: 6.0,
            dock_duration: 0.6,
            // Right-hand half of the screen: top, bottom, left, right edges.
            fit_probes: [[0.5, 0.9], [0.5, -0.9], [0.05, 0.0], [0.95, 0.0]],
            fit_shrink: 0.9,
            fit_max_steps: 40,
            pulse_period: 0.8,
        }
    }
}

impl OrbitConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
