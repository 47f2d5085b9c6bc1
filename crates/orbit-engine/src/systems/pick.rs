use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use crate::renderer::camera::{Camera3D, Ray};

/// A ray hit: the node and the world-space distance along the ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub entity: EntityId,
    pub distance: f32,
}

/// Nearest hit among visible nodes with a pick shape.
pub fn raycast(scene: &Scene, ray: &Ray) -> Option<Hit> {
    let mut nearest: Option<Hit> = None;
    for entity in scene.iter() {
        if entity.shape.is_none() || !scene.is_visible(entity.id) {
            continue;
        }
        if let Some(distance) = raycast_entity(scene, entity.id, ray) {
            if nearest.map_or(true, |n| distance < n.distance) {
                nearest = Some(Hit { entity: entity.id, distance });
            }
        }
    }
    nearest
}

/// Hit distance against a single node's shape, ignoring visibility.
pub fn raycast_entity(scene: &Scene, id: EntityId, ray: &Ray) -> Option<f32> {
    let shape = scene.get(id)?.shape?;
    let world = scene.world_matrix(id)?;
    if world.determinant().abs() < 1e-12 {
        return None;
    }
    let inverse = world.inverse();
    let origin = inverse.transform_point3(ray.origin);
    let dir = inverse.transform_vector3(ray.dir);
    shape.intersect(origin, dir)
}

/// Screen pixel position to the nearest visible node under it.
pub fn pick(scene: &Scene, camera: &Camera3D, screen: Vec2) -> Option<EntityId> {
    let ray = camera.ray_from_screen(screen);
    raycast(scene, &ray).map(|hit| hit.entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use crate::components::shape::Shape;
    use glam::Vec3;

    fn camera() -> Camera3D {
        Camera3D::new(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, 45f32.to_radians(), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn picks_nearest_hit() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_shape(Shape::Sphere { radius: 3.0 }));
        scene.spawn(
            Entity::new(EntityId(2))
                .with_pos(Vec3::new(0.0, 0.0, 6.0))
                .with_shape(Shape::card(2.0, 3.0)),
        );

        let hit = raycast(&scene, &camera().ray_from_ndc(Vec2::ZERO)).unwrap();
        assert_eq!(hit.entity, EntityId(2));
        assert!((hit.distance - (20.0 - 6.01)).abs() < 0.2);
    }

    #[test]
    fn miss_returns_none() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_shape(Shape::Sphere { radius: 1.0 }));
        assert_eq!(pick(&scene, &camera(), Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn hidden_nodes_are_not_pickable() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_shape(Shape::Sphere { radius: 3.0 }).hidden());
        assert_eq!(pick(&scene, &camera(), Vec2::new(400.0, 300.0)), None);
    }

    #[test]
    fn scaled_parent_scales_the_shape() {
        let mut scene = Scene::new();
        let group = scene.spawn(Entity::pivot(EntityId(1)).with_scale(Vec3::splat(2.0)));
        let card = scene.spawn(
            Entity::new(EntityId(2))
                .with_shape(Shape::card(2.0, 2.0))
                .with_parent(group),
        );
        // 1.5 units up is outside the unscaled card but inside the scaled one.
        let ray = Ray::new(Vec3::new(0.0, 1.5, 10.0), Vec3::NEG_Z);
        let distance = raycast_entity(&scene, card, &ray).unwrap();
        assert!((distance - 9.98).abs() < 1e-3, "distance {}", distance);
    }
}
