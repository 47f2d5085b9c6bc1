use bytemuck::{Pod, Zeroable};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// An event communicated from Rust to the page layer via the shared buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OrbitEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl OrbitEvent {
    pub const FLOATS: usize = 4;

    /// A focus transition started; `a` = target id.
    pub const FOCUS_STARTED: f32 = 1.0;
    /// The target reached the focus point; `a` = target id.
    pub const FOCUSED: f32 = 2.0;
    /// The focused target was released; `a` = target id.
    pub const UNFOCUSED: f32 = 3.0;
    /// The target is back in its Main Ring slot and visible; `a` = target id.
    pub const RESTORED: f32 = 4.0;
    /// A click on the focused target asked for its detail view; `a` = target id.
    pub const OPEN_DETAIL: f32 = 5.0;

    pub fn new(kind: f32, id: EntityId) -> Self {
        Self {
            kind,
            a: id.0 as f32,
            b: 0.0,
            c: 0.0,
        }
    }

    pub fn entity(&self) -> EntityId {
        EntityId(self.a as u32)
    }
}
