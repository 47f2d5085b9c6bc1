use glam::{Mat4, Vec2, Vec3};

/// A ray in world space. `dir` is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir: dir.normalize_or_zero() }
    }
}

/// Perspective camera looking at the orbit.
/// Produces view/projection matrices and turns screen positions into rays.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Canvas size in pixels.
    pub viewport: Vec2,
}

impl Camera3D {
    pub fn new(position: Vec3, target: Vec3, fov_y: f32, viewport: Vec2) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y,
            near: 0.1,
            far: 1000.0,
            viewport,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Resize the viewport (e.g. on canvas resize). Zero sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    /// Canvas pixels (origin top-left, y down) to normalized device coordinates.
    pub fn screen_to_ndc(&self, screen: Vec2) -> Vec2 {
        let size = self.viewport.max(Vec2::ONE);
        Vec2::new(
            screen.x / size.x * 2.0 - 1.0,
            1.0 - screen.y / size.y * 2.0,
        )
    }

    /// Ray from the eye through a point given in NDC (x, y in [-1, 1], y up).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }

    pub fn ray_from_screen(&self, screen: Vec2) -> Ray {
        self.ray_from_ndc(self.screen_to_ndc(screen))
    }

    /// Project a world-space point to NDC.
    pub fn world_to_ndc(&self, point: Vec3) -> Vec2 {
        self.view_projection().project_point3(point).truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera3D {
        Camera3D::new(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, 45f32.to_radians(), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn screen_center_is_ndc_origin() {
        let cam = camera();
        let ndc = cam.screen_to_ndc(Vec2::new(400.0, 300.0));
        assert!(ndc.length() < 1e-6);
        let corner = cam.screen_to_ndc(Vec2::new(0.0, 0.0));
        assert!((corner - Vec2::new(-1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = camera();
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert!((ray.dir - Vec3::NEG_Z).length() < 1e-4, "dir was {:?}", ray.dir);
        assert!(ray.origin.z < 20.0 && ray.origin.z > 19.0);
    }

    #[test]
    fn ray_passes_through_projected_point() {
        let cam = camera();
        let point = Vec3::new(3.0, -2.0, 1.0);
        let ray = cam.ray_from_ndc(cam.world_to_ndc(point));
        let to_point = (point - ray.origin).normalize();
        assert!(to_point.dot(ray.dir) > 0.9999);
    }

    #[test]
    fn resize_changes_aspect() {
        let mut cam = camera();
        cam.resize(1920.0, 1080.0);
        assert!((cam.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
        cam.resize(0.0, 100.0);
        assert_eq!(cam.viewport, Vec2::new(1920.0, 1080.0));
    }
}
