use glam::{Mat4, Quat, Vec3};
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::extensions::transform::Transform;

/// Deepest parent chain walked before giving up (guards against cycles).
const MAX_DEPTH: usize = 64;

/// Entity storage plus the parent/child hierarchy.
///
/// A flat Vec designed for small entity counts (dozens, not millions).
/// Removal preserves order so iteration stays deterministic.
pub struct Scene {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
            next_id: 1,
        }
    }

    /// Create a scene with a specific entity capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity to the scene. IDs handed out later never collide with it.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.next_id = self.next_id.max(id.0 + 1);
        self.entities.push(entity);
        id
    }

    /// Remove an entity by ID. Its children become roots.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        let removed = self.entities.remove(idx);
        for entity in self.entities.iter_mut().filter(|e| e.parent == Some(id)) {
            entity.parent = None;
        }
        Some(removed)
    }

    /// Remove an entity together with all of its descendants.
    /// Returns the removed IDs, root first.
    pub fn despawn_tree(&mut self, id: EntityId) -> Vec<EntityId> {
        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            stack.extend(self.children(next));
            if self.entities.iter().any(|e| e.id == next) {
                removed.push(next);
            }
        }
        self.entities.retain(|e| !removed.contains(&e.id));
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    // -- Hierarchy --

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.get(id).and_then(|e| e.parent)
    }

    /// Direct children in spawn order.
    pub fn children(&self, id: EntityId) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.parent == Some(id))
            .map(|e| e.id)
            .collect()
    }

    /// Reparent keeping the local transform (the entity moves with its new parent).
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) {
        if parent == Some(child) || parent.is_some_and(|p| self.is_ancestor(child, p)) {
            log::warn!("refusing to parent {:?} under its own subtree", child);
            return;
        }
        if let Some(entity) = self.get_mut(child) {
            entity.parent = parent;
        }
    }

    /// Reparent preserving the world transform, so nothing visibly moves.
    pub fn attach(&mut self, child: EntityId, parent: Option<EntityId>) {
        if parent == Some(child) || parent.is_some_and(|p| self.is_ancestor(child, p)) {
            log::warn!("refusing to attach {:?} under its own subtree", child);
            return;
        }
        let Some(world) = self.world_matrix(child) else { return };
        let parent_world = parent
            .and_then(|p| self.world_matrix(p))
            .unwrap_or(Mat4::IDENTITY);
        let local = Transform::from_matrix(parent_world.inverse() * world);
        if let Some(entity) = self.get_mut(child) {
            entity.parent = parent;
            entity.set_local(local);
        }
    }

    /// Whether `ancestor` appears on the parent chain of `id` (or is `id`).
    pub fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = Some(id);
        let mut depth = 0;
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            depth += 1;
            if depth > MAX_DEPTH {
                return false;
            }
            current = self.parent(node);
        }
        false
    }

    // -- World transform queries --

    pub fn world_matrix(&self, id: EntityId) -> Option<Mat4> {
        let entity = self.get(id)?;
        let mut matrix = entity.local_matrix();
        let mut parent = entity.parent;
        let mut depth = 0;
        while let Some(pid) = parent {
            let Some(p) = self.get(pid) else { break };
            matrix = p.local_matrix() * matrix;
            parent = p.parent;
            depth += 1;
            if depth > MAX_DEPTH {
                log::warn!("parent chain of {:?} exceeds {} levels", id, MAX_DEPTH);
                break;
            }
        }
        Some(matrix)
    }

    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_point3(Vec3::ZERO))
    }

    pub fn world_rotation(&self, id: EntityId) -> Option<Quat> {
        self.world_matrix(id)
            .map(|m| m.to_scale_rotation_translation().1)
    }

    /// Visible itself and through every ancestor.
    pub fn is_visible(&self, id: EntityId) -> bool {
        let mut current = Some(id);
        let mut depth = 0;
        while let Some(node) = current {
            match self.get(node) {
                Some(e) if e.visible => current = e.parent,
                Some(_) => return false,
                None => return depth > 0,
            }
            depth += 1;
            if depth > MAX_DEPTH {
                break;
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = scene.next_id();
        scene.spawn(Entity::new(id).with_pos(Vec3::new(10.0, 20.0, 0.0)));
        assert_eq!(scene.get(id).unwrap().pos, Vec3::new(10.0, 20.0, 0.0));
    }

    #[test]
    fn manual_ids_bump_allocator() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(10)));
        assert_eq!(scene.next_id(), EntityId(11));
    }

    #[test]
    fn world_position_follows_rotating_parent() {
        let mut scene = Scene::new();
        let ring = scene.spawn(Entity::pivot(EntityId(1)).with_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0)));
        let card = scene.spawn(Entity::new(EntityId(2)).with_pos(Vec3::new(0.0, 0.0, 5.0)).with_parent(ring));

        let world = scene.world_position(card).unwrap();
        assert!((world - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5, "got {:?}", world);
    }

    #[test]
    fn attach_preserves_world_transform() {
        let mut scene = Scene::new();
        let ring_a = scene.spawn(Entity::pivot(EntityId(1)).with_rotation(Vec3::new(0.0, 0.7, 0.0)));
        let ring_b = scene.spawn(
            Entity::pivot(EntityId(2))
                .with_pos(Vec3::new(1.0, 0.0, 0.0))
                .with_rotation(Vec3::new(0.0, -2.1, 0.0)),
        );
        let card = scene.spawn(
            Entity::new(EntityId(3))
                .with_pos(Vec3::new(0.0, 0.5, 6.5))
                .with_rotation(Vec3::new(0.0, -0.7, 0.0))
                .with_parent(ring_a),
        );

        let before = scene.world_matrix(card).unwrap();
        scene.attach(card, Some(ring_b));
        let after = scene.world_matrix(card).unwrap();

        assert_eq!(scene.parent(card), Some(ring_b));
        assert!(before.abs_diff_eq(after, 1e-4));
    }

    #[test]
    fn despawn_tree_removes_descendants() {
        let mut scene = Scene::new();
        let root = scene.spawn(Entity::new(EntityId(1)));
        scene.spawn(Entity::new(EntityId(2)).with_parent(root));
        scene.spawn(Entity::new(EntityId(3)).with_parent(EntityId(2)));
        scene.spawn(Entity::new(EntityId(4)));

        let removed = scene.despawn_tree(root);
        assert_eq!(removed.len(), 3);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn hidden_parent_hides_children() {
        let mut scene = Scene::new();
        let parent = scene.spawn(Entity::new(EntityId(1)).hidden());
        let child = scene.spawn(Entity::new(EntityId(2)).with_parent(parent));
        assert!(!scene.is_visible(child));
    }

    #[test]
    fn refuses_cycles() {
        let mut scene = Scene::new();
        let a = scene.spawn(Entity::new(EntityId(1)));
        let b = scene.spawn(Entity::new(EntityId(2)).with_parent(a));
        scene.set_parent(a, Some(b));
        assert_eq!(scene.parent(a), None);
    }
}
