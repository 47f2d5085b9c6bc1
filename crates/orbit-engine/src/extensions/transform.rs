// extensions/transform.rs
//
// Local transform value type — position, Euler rotation, scale.
// Rotation is applied yaw-first (EulerRot::YXZ) so a pure yaw survives a
// matrix round trip over the full (-PI, PI] range.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Transform relative to the parent node (or world if no parent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians; `y` is yaw about the vertical axis.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    pub fn quat(&self) -> Quat {
        euler_to_quat(self.rotation)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Decompose an affine matrix. Shear is discarded.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation: quat_to_euler(rotation),
            scale,
        }
    }
}

pub fn euler_to_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z)
}

pub fn quat_to_euler(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(pitch, yaw, roll)
}
