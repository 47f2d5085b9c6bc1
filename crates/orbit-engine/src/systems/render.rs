use crate::core::scene::Scene;
use crate::renderer::instance::{NodeInstance, RenderBuffer};

/// Build the render buffer from the scene.
/// Writes every visible renderable node with its world transform, in scene order.
/// Pivot nodes and anything under a hidden ancestor are skipped.
pub fn build_render_buffer(scene: &Scene, buffer: &mut RenderBuffer) {
    buffer.clear();

    for entity in scene.iter() {
        if !entity.renderable || !scene.is_visible(entity.id) {
            continue;
        }
        let Some(world) = scene.world_matrix(entity.id) else { continue };
        let (scale, rotation, pos) = world.to_scale_rotation_translation();

        let instance = NodeInstance {
            id: entity.id.0 as f32,
            opacity: entity.opacity,
            x: pos.x,
            y: pos.y,
            z: pos.z,
            qx: rotation.x,
            qy: rotation.y,
            qz: rotation.z,
            qw: rotation.w,
            sx: scale.x,
            sy: scale.y,
            sz: scale.z,
        };

        if !buffer.push(instance) {
            log::warn!("render buffer full ({} nodes), dropping the rest", buffer.capacity());
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::entity::Entity;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn writes_world_transforms_of_visible_nodes() {
        let mut scene = Scene::new();
        let ring = scene.spawn(Entity::pivot(EntityId(1)).with_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0)));
        scene.spawn(
            Entity::new(EntityId(2))
                .with_pos(Vec3::new(0.0, 1.0, 4.0))
                .with_opacity(0.5)
                .with_parent(ring),
        );
        scene.spawn(Entity::new(EntityId(3)).hidden());

        let mut buffer = RenderBuffer::new(16);
        build_render_buffer(&scene, &mut buffer);

        assert_eq!(buffer.instance_count(), 1, "pivot and hidden nodes are skipped");
        let card = buffer.instances[0];
        assert_eq!(card.id, 2.0);
        assert_eq!(card.opacity, 0.5);
        assert!((Vec3::new(card.x, card.y, card.z) - Vec3::new(4.0, 1.0, 0.0)).length() < 1e-5);
        assert!((card.sx - 1.0).abs() < 1e-5);
    }
}
