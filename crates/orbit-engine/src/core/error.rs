use thiserror::Error;
use crate::api::types::EntityId;

/// Programming errors caught while building an orbit.
/// Runtime no-ops (unknown focus target, pick miss) are not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbitError {
    #[error("orbit radius must be positive, got {0}")]
    InvalidRadius(f32),
    #[error("central object {0:?} is not in the scene")]
    MissingCenter(EntityId),
    #[error("entity {0:?} is not in the scene")]
    UnknownEntity(EntityId),
    #[error("entity {0:?} already belongs to a ring")]
    AlreadyInRing(EntityId),
    #[error("transport ring never passes the main ring (relative speed {0})")]
    StalledTransport(f32),
}
