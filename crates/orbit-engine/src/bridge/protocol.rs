/// SharedArrayBuffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 8 floats]
/// [Instances: max_instances × 12 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically,
/// and spins on the lock flag while a frame is being published.

use crate::api::stage::StageConfig;
use crate::api::types::OrbitEvent;
use crate::renderer::instance::{NodeInstance, RenderBuffer};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_MAX_EVENTS: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
pub const HEADER_PROTOCOL_VERSION: usize = 6;
/// Clock time of the frame in seconds.
pub const HEADER_TIME: usize = 7;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per node instance (wire format — never changes).
pub const INSTANCE_FLOATS: usize = NodeInstance::FLOATS;

/// Floats per orbit event: kind, a, b, c (wire format — never changes).
pub const EVENT_FLOATS: usize = OrbitEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_events: usize,

    /// Size of instance data section in floats.
    pub instance_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_events: usize) -> Self {
        let instance_data_floats = max_instances * INSTANCE_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let instance_data_offset = HEADER_FLOATS;
        let event_data_offset = instance_data_offset + instance_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_instances,
            max_events,
            instance_data_floats,
            event_data_floats,
            instance_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Compute layout from a StageConfig.
    pub fn from_config(config: &StageConfig) -> Self {
        Self::new(config.max_instances, config.max_events)
    }

    /// A zeroed buffer with the capacities already in the header.
    pub fn allocate(&self) -> Vec<f32> {
        let mut buffer = vec![0.0; self.buffer_total_floats];
        buffer[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        buffer[HEADER_MAX_EVENTS] = self.max_events as f32;
        buffer[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        buffer
    }

    /// Copy one frame into a buffer from [`allocate`](Self::allocate).
    /// Instances and events beyond the capacities are dropped.
    pub fn publish(
        &self,
        buffer: &mut [f32],
        frame: u64,
        time: f32,
        instances: &RenderBuffer,
        events: &[OrbitEvent],
    ) {
        if buffer.len() < self.buffer_total_floats {
            log::warn!(
                "shared buffer holds {} floats, layout needs {}",
                buffer.len(),
                self.buffer_total_floats
            );
            return;
        }
        buffer[HEADER_LOCK] = 1.0;

        let instance_floats = instances.as_floats();
        let instance_floats = &instance_floats[..instance_floats.len().min(self.instance_data_floats)];
        buffer[self.instance_data_offset..self.instance_data_offset + instance_floats.len()]
            .copy_from_slice(instance_floats);

        let events = &events[..events.len().min(self.max_events)];
        let event_floats: &[f32] = bytemuck::cast_slice(events);
        buffer[self.event_data_offset..self.event_data_offset + event_floats.len()]
            .copy_from_slice(event_floats);

        buffer[HEADER_FRAME_COUNTER] = frame as f32;
        buffer[HEADER_INSTANCE_COUNT] = (instance_floats.len() / INSTANCE_FLOATS) as f32;
        buffer[HEADER_EVENT_COUNT] = events.len() as f32;
        buffer[HEADER_TIME] = time;
        buffer[HEADER_LOCK] = 0.0;
    }
}
