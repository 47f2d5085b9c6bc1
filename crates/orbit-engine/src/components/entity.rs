use glam::{Mat4, Vec3};
use crate::api::types::EntityId;
use crate::components::drift::DriftComponent;
use crate::components::shape::Shape;
use crate::extensions::transform::Transform;

/// Fat Entity — a scene node with optional components.
/// Designed for simplicity over ECS purity: rings, cards, decorations and
/// the central object are all the same struct.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier, stable for the entity's lifetime.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Hidden entities (and their descendants) are neither drawn nor picked.
    pub visible: bool,
    /// Pure pivot/group nodes are not written to the render buffer.
    pub renderable: bool,
    /// Position relative to the parent.
    pub pos: Vec3,
    /// Euler rotation in radians relative to the parent. `rotation.y` is yaw.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub opacity: f32,
    /// Suppresses ambient counter-rotation while set.
    pub rotation_frozen: bool,
    /// Pick geometry in local space. Entities without one are never hit.
    pub shape: Option<Shape>,
    /// Vertical drift behaviour (optional).
    pub drift: Option<DriftComponent>,
    pub(crate) parent: Option<EntityId>,
}

impl Entity {
    /// Create a new visible entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            visible: true,
            renderable: true,
            pos: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            opacity: 1.0,
            rotation_frozen: false,
            shape: None,
            drift: None,
            parent: None,
        }
    }

    /// A non-rendered group node used as a rotation pivot.
    pub fn pivot(id: EntityId) -> Self {
        Self {
            renderable: false,
            ..Self::new(id)
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_drift(mut self, drift: DriftComponent) -> Self {
        self.drift = Some(drift);
        self
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn local(&self) -> Transform {
        Transform::new(self.pos, self.rotation, self.scale)
    }

    pub fn set_local(&mut self, local: Transform) {
        self.pos = local.position;
        self.rotation = local.rotation;
        self.scale = local.scale;
    }

    pub fn local_matrix(&self) -> Mat4 {
        self.local().matrix()
    }
}
