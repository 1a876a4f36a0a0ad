//! Entity-component store
//!
//! Entities are bare ids. Every piece of state lives in a typed
//! [`ComponentTable`] keyed by entity, and the [`Registry`] owns one table per
//! component type. Removing an entity means removing it from every table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::components::*;

/// Opaque entity identifier. Ids are never reused within a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(u32);

impl Entity {
    /// Raw id, for logging
    pub fn id(self) -> u32 {
        self.0
    }
}

/// Sparse table from entity to one component of type `T`
///
/// Components are stored densely; removal swaps the last element into the
/// hole, so iteration order is insertion order until something is removed.
#[derive(Debug, Clone)]
pub struct ComponentTable<T> {
    components: Vec<T>,
    entities: Vec<Entity>,
    index: HashMap<Entity, usize>,
}

impl<T> Default for ComponentTable<T> {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            entities: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> ComponentTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a component, replacing (and returning) any previous one
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        if let Some(&i) = self.index.get(&entity) {
            return Some(std::mem::replace(&mut self.components[i], component));
        }
        self.index.insert(entity, self.components.len());
        self.components.push(component);
        self.entities.push(entity);
        None
    }

    pub fn has(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.index.get(&entity).map(|&i| &self.components[i])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.index.get(&entity).map(|&i| &mut self.components[i])
    }

    /// Detach the component, if present
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let i = self.index.remove(&entity)?;
        let last = self.components.len() - 1;
        if i != last {
            let moved = self.entities[last];
            self.index.insert(moved, i);
        }
        self.entities.swap_remove(i);
        Some(self.components.swap_remove(i))
    }

    pub fn clear(&mut self) {
        self.components.clear();
        self.entities.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Entities in storage order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Components in storage order
    pub fn components(&self) -> &[T] {
        &self.components
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.components.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.components.iter_mut())
    }
}

/// Declares the registry's tables once so that whole-entity removal and the
/// per-table counts can never miss a table.
macro_rules! registry_tables {
    ($($(#[$doc:meta])* $field:ident: $ty:ty,)*) => {
        /// Owner of every component table
        #[derive(Debug, Default)]
        pub struct Registry {
            $($(#[$doc])* pub $field: ComponentTable<$ty>,)*
            /// Collision pairs gathered since the last resolution pass
            pub collisions: Vec<Collision>,
            /// Global screen effects (exactly one exists)
            pub screen: ScreenState,
            next_id: u32,
        }

        impl Registry {
            /// Erase the entity from every table
            pub fn remove_all_components_of(&mut self, entity: Entity) {
                $(self.$field.remove(entity);)*
            }

            /// Empty every table (ids keep counting up)
            pub fn clear_all_components(&mut self) {
                $(self.$field.clear();)*
                self.collisions.clear();
            }

            /// Number of components per non-empty table, for leak hunting
            pub fn component_counts(&self) -> Vec<(&'static str, usize)> {
                let mut counts = Vec::new();
                $(
                    if !self.$field.is_empty() {
                        counts.push((stringify!($field), self.$field.len()));
                    }
                )*
                counts
            }
        }
    };
}

registry_tables! {
    players: Player,
    motions: Motion,
    colliders: Collider,
    gravities: Gravity,
    colors: Color,
    color_changes: ColorChange,
    linear_movements: LinearMovement,
    bezier_paths: BezierPath,
    death_timers: DeathTimer,
    deduct_hp_timers: DeductHpTimer,
    invincible_timers: InvincibleTimer,
    speech: Speech,
    speech_points: SpeechPoint,
    zombies: Zombie,
    deadlys: Deadly,
    eatables: Eatable,
    foods: Food,
    bullets: BulletPickup,
    shoot_bullets: ShootBullet,
    keys: Key,
    golds: Gold,
    fireballs: Fireball,
    doors: Door,
    cabinets: Cabinet,
    platforms: Platform,
    npcs: Npc,
    text_blocks: TextBlock,
    texts: Text,
    hearts: Heart,
    small_bullets: SmallBullet,
    small_keys: SmallKey,
    menus: MenuElement,
    render_requests: RenderRequest,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh entity id
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id += 1;
        entity
    }

    /// Erase each listed entity from every table
    pub fn remove_entities(&mut self, entities: &[Entity]) {
        for &entity in entities {
            self.remove_all_components_of(entity);
        }
    }

    /// Log per-table counts at debug level
    pub fn log_component_counts(&self) {
        for (name, count) in self.component_counts() {
            log::debug!("{name}: {count}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_insert_get_has() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        assert!(!registry.motions.has(e));
        assert!(registry.motions.get(e).is_none());

        registry.motions.insert(e, Motion::at(Vec2::new(5.0, 6.0), Vec2::ONE));
        assert!(registry.motions.has(e));
        assert_eq!(registry.motions.get(e).map(|m| m.position), Some(Vec2::new(5.0, 6.0)));
    }

    #[test]
    fn test_insert_replaces() {
        let mut table = ComponentTable::new();
        let mut registry = Registry::new();
        let e = registry.create_entity();
        assert!(table.insert(e, 1u32).is_none());
        assert_eq!(table.insert(e, 2u32), Some(1));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(e), Some(&2));
    }

    #[test]
    fn test_swap_remove_keeps_index_consistent() {
        let mut registry = Registry::new();
        let ids: Vec<Entity> = (0..4).map(|_| registry.create_entity()).collect();
        let mut table = ComponentTable::new();
        for (i, &e) in ids.iter().enumerate() {
            table.insert(e, i);
        }

        assert_eq!(table.remove(ids[0]), Some(0));
        assert_eq!(table.remove(ids[0]), None);
        // The last element moved into slot 0 and is still addressable
        assert_eq!(table.get(ids[3]), Some(&3));
        assert_eq!(table.get(ids[1]), Some(&1));
        assert_eq!(table.len(), 3);
        assert_eq!(table.entities().len(), table.components().len());
    }

    #[test]
    fn test_remove_all_components_of() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        let other = registry.create_entity();
        registry.motions.insert(e, Motion::at(Vec2::ZERO, Vec2::ONE));
        registry.foods.insert(e, Food);
        registry.eatables.insert(e, Eatable);
        registry.foods.insert(other, Food);

        registry.remove_all_components_of(e);
        assert!(!registry.motions.has(e));
        assert!(!registry.foods.has(e));
        assert!(!registry.eatables.has(e));
        assert!(registry.foods.has(other));

        // Removing again is a no-op
        registry.remove_all_components_of(e);
        assert_eq!(registry.foods.len(), 1);
    }

    #[test]
    fn test_ids_never_reused() {
        let mut registry = Registry::new();
        let a = registry.create_entity();
        registry.motions.insert(a, Motion::at(Vec2::ZERO, Vec2::ONE));
        registry.remove_all_components_of(a);
        registry.clear_all_components();
        let b = registry.create_entity();
        assert_ne!(a, b);
    }

    #[test]
    fn test_component_counts() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.hearts.insert(e, Heart);
        let counts = registry.component_counts();
        assert_eq!(counts, vec![("hearts", 1)]);
    }
}
