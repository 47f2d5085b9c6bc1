use bytemuck::{Pod, Zeroable};

/// Per-node render data written to SharedArrayBuffer for the browser renderer.
/// Must match the TypeScript protocol: 12 floats = 48 bytes stride.
///
/// All transform fields are world space; the renderer never walks the hierarchy.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct NodeInstance {
    /// Entity id, so the page can bind meshes and textures.
    pub id: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Rotation quaternion.
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    pub sx: f32,
    pub sy: f32,
    pub sz: f32,
}

impl NodeInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Render buffer containing every visible node, in scene order.
pub struct RenderBuffer {
    pub instances: Vec<NodeInstance>,
    /// Nodes beyond this are dropped.
    capacity: usize,
}

impl RenderBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Returns false once the buffer is full.
    pub fn push(&mut self, instance: NodeInstance) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Flat float view, for copying into the shared buffer.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_instance_is_12_floats() {
        assert_eq!(std::mem::size_of::<NodeInstance>(), 48);
        assert_eq!(NodeInstance::FLOATS, 12);
    }

    #[test]
    fn push_respects_capacity() {
        let mut buf = RenderBuffer::new(2);
        assert!(buf.push(NodeInstance::default()));
        assert!(buf.push(NodeInstance::default()));
        assert!(!buf.push(NodeInstance::default()));
        assert_eq!(buf.instance_count(), 2);
        assert_eq!(buf.as_floats().len(), 24);
    }
}
