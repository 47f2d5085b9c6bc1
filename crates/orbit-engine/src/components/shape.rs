use glam::Vec3;

/// Local-space pick geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box centered on the node origin. Cards are thin boxes.
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl Shape {
    /// A flat card of the given width and height.
    pub fn card(width: f32, height: f32) -> Self {
        Shape::Box {
            half_extents: Vec3::new(width / 2.0, height / 2.0, 0.01),
        }
    }

    /// Ray parameter of the first intersection with a local-space ray.
    ///
    /// `dir` does not need to be normalized; the returned value is in units of
    /// `dir`, so a ray transformed from world space keeps world distances.
    pub fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        match *self {
            Shape::Box { half_extents } => intersect_box(origin, dir, half_extents),
            Shape::Sphere { radius } => intersect_sphere(origin, dir, radius),
        }
    }
}

/// Slab test.
fn intersect_box(origin: Vec3, dir: Vec3, half: Vec3) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let h = half[axis];
        if d.abs() < 1e-9 {
            if o < -h || o > h {
                return None;
            }
            continue;
        }
        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }

    if t_max < t_min || t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

fn intersect_sphere(origin: Vec3, dir: Vec3, radius: f32) -> Option<f32> {
    let a = dir.dot(dir);
    if a < 1e-12 {
        return None;
    }
    let b = 2.0 * origin.dot(dir);
    let c = origin.dot(origin) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let near = (-b - sqrt_disc) / (2.0 * a);
    let far = (-b + sqrt_disc) / (2.0 * a);
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_hit_from_front() {
        let shape = Shape::card(2.0, 2.0);
        let t = shape.intersect(Vec3::new(0.5, 0.5, 10.0), Vec3::NEG_Z).unwrap();
        assert!((t - 9.99).abs() < 1e-4);
    }

    #[test]
    fn box_miss_outside_extent() {
        let shape = Shape::card(2.0, 2.0);
        assert!(shape.intersect(Vec3::new(1.5, 0.0, 10.0), Vec3::NEG_Z).is_none());
    }

    #[test]
    fn box_behind_ray_is_missed() {
        let shape = Shape::card(2.0, 2.0);
        assert!(shape.intersect(Vec3::new(0.0, 0.0, 10.0), Vec3::Z).is_none());
    }

    #[test]
    fn sphere_near_hit() {
        let shape = Shape::Sphere { radius: 1.0 };
        let t = shape.intersect(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn unnormalized_direction_scales_parameter() {
        let shape = Shape::Sphere { radius: 1.0 };
        let t = shape.intersect(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0)).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }
}
