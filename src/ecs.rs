//! Entity/component/resource store.
//!
//! Components live in a [`hecs::World`]; this wrapper adds stable, never-reused
//! [`EntityId`]s, id-sorted queries, and a singleton resource slot per type.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use hecs::{Component, Query, Ref, RefMut};
use thiserror::Error;

/// Opaque entity identifier, unique within a [`World`] and assigned in
/// increasing order starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
    #[error("component '{component}' not found on entity {entity}")]
    ComponentNotFound {
        component: &'static str,
        entity: EntityId,
    },
    #[error("resource '{0}' not found")]
    ResourceNotFound(&'static str),
}

/// Aggregate root owning every entity, component and resource.
pub struct World {
    inner: hecs::World,
    index: BTreeMap<EntityId, hecs::Entity>,
    last_id: u64,
    resources: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
            index: BTreeMap::new(),
            last_id: 0,
            resources: HashMap::new(),
        }
    }

    // -- Entity lifecycle --

    /// Allocate a fresh identifier. Ids are never handed out twice, even after
    /// the entity is destroyed.
    pub fn create_entity(&mut self) -> EntityId {
        self.last_id += 1;
        let id = EntityId(self.last_id);
        let handle = self.inner.spawn((id,));
        self.index.insert(id, handle);
        id
    }

    /// Remove the entity together with every component it carries.
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<(), WorldError> {
        let handle = self
            .index
            .remove(&id)
            .ok_or(WorldError::EntityNotFound(id))?;
        self.inner
            .despawn(handle)
            .map_err(|_| WorldError::EntityNotFound(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn handle(&self, id: EntityId) -> Result<hecs::Entity, WorldError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(WorldError::EntityNotFound(id))
    }

    // -- Components --

    /// Insert or overwrite the component of type `C` on `id`.
    pub fn set_component<C: Component>(
        &mut self,
        id: EntityId,
        component: C,
    ) -> Result<(), WorldError> {
        let handle = self.handle(id)?;
        self.inner
            .insert_one(handle, component)
            .map_err(|_| WorldError::EntityNotFound(id))
    }

    pub fn get<C: Component>(&self, id: EntityId) -> Result<Ref<'_, C>, WorldError> {
        let handle = self.handle(id)?;
        self.inner
            .get::<&C>(handle)
            .map_err(|_| missing::<C>(id))
    }

    pub fn get_mut<C: Component>(&self, id: EntityId) -> Result<RefMut<'_, C>, WorldError> {
        let handle = self.handle(id)?;
        self.inner
            .get::<&mut C>(handle)
            .map_err(|_| missing::<C>(id))
    }

    /// Copy a component out, releasing the borrow immediately.
    pub fn copied<C: Component + Copy>(&self, id: EntityId) -> Result<C, WorldError> {
        self.get::<C>(id).map(|c| *c)
    }

    pub fn has<C: Component>(&self, id: EntityId) -> bool {
        self.get::<C>(id).is_ok()
    }

    /// Remove and return the component. Absence is reported as an error but is
    /// never fatal; the entity is left untouched.
    pub fn remove_component<C: Component>(&mut self, id: EntityId) -> Result<C, WorldError> {
        let handle = self.handle(id)?;
        self.inner
            .remove_one::<C>(handle)
            .map_err(|_| missing::<C>(id))
    }

    /// Ids of every entity matching the query `Q` (e.g. `(&Position, &Velocity)`),
    /// sorted ascending so that callers iterate deterministically.
    pub fn entities<Q: Query>(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .inner
            .query::<&EntityId>()
            .with::<Q>()
            .iter()
            .map(|(_, id)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Lowest-id entity matching `Q`, if any.
    pub fn first<Q: Query>(&self) -> Option<EntityId> {
        self.entities::<Q>().into_iter().next()
    }

    // -- Resources --

    /// Store a singleton; replaces any previous value of the same type.
    pub fn set_resource<R: Any + Send + Sync>(&mut self, resource: R) {
        self.resources.insert(TypeId::of::<R>(), Box::new(resource));
    }

    pub fn resource<R: Any + Send + Sync>(&self) -> Result<&R, WorldError> {
        self.resources
            .get(&TypeId::of::<R>())
            .and_then(|boxed| boxed.downcast_ref::<R>())
            .ok_or(WorldError::ResourceNotFound(type_name::<R>()))
    }

    pub fn resource_mut<R: Any + Send + Sync>(&mut self) -> Result<&mut R, WorldError> {
        self.resources
            .get_mut(&TypeId::of::<R>())
            .and_then(|boxed| boxed.downcast_mut::<R>())
            .ok_or(WorldError::ResourceNotFound(type_name::<R>()))
    }

    pub fn has_resource<R: Any + Send + Sync>(&self) -> bool {
        self.resources.contains_key(&TypeId::of::<R>())
    }

    pub fn remove_resource<R: Any + Send + Sync>(&mut self) -> Option<R> {
        self.resources
            .remove(&TypeId::of::<R>())
            .and_then(|boxed| boxed.downcast::<R>().ok())
            .map(|boxed| *boxed)
    }
}

fn missing<C>(entity: EntityId) -> WorldError {
    WorldError::ComponentNotFound {
        component: type_name::<C>(),
        entity,
    }
}
