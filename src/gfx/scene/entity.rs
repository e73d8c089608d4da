//! # Entities
//!
//! A [`GenericEntity`] is the shared, uploaded form of a model: its material
//! groups in the order their names first appear in the model. An [`Entity`] places a generic entity in the
//! world with its own transform. Many entities share one generic entity
//! through an [`Rc`], which is also what the entity pass batches on.

use std::collections::HashSet;
use std::rc::Rc;

use cgmath::{Matrix4, Vector3};

use super::material::{MaterialGroup, RawModelMaterial};
use crate::gfx::render_api::{LoaderRenderApi, TextureId};
use crate::math;

/// Known model kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Fern,
    Tree,
    BananaTree,
    Grass,
    Flower,
    Marble,
    Player,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Fern,
        EntityKind::Tree,
        EntityKind::BananaTree,
        EntityKind::Grass,
        EntityKind::Flower,
        EntityKind::Marble,
        EntityKind::Player,
    ];

    /// Resource name of the model.
    pub fn model_name(&self) -> &'static str {
        match self {
            EntityKind::Fern => "models/fern.obj",
            EntityKind::Tree => "models/tree.obj",
            EntityKind::BananaTree => "models/banana_tree.obj",
            EntityKind::Grass => "models/grass.obj",
            EntityKind::Flower => "models/flower.obj",
            EntityKind::Marble => "models/marble.obj",
            EntityKind::Player => "models/player.obj",
        }
    }
}

/// The uploaded form of one model kind.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericEntity {
    pub kind: EntityKind,
    groups: Vec<MaterialGroup>,
}

impl GenericEntity {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            groups: Vec::new(),
        }
    }

    /// Adds a sub-mesh to `group`, creating the group on first use.
    pub fn add(&mut self, group: &str, item: RawModelMaterial) {
        match self.groups.iter_mut().find(|g| g.name == group) {
            Some(existing) => existing.push(item),
            None => {
                let mut created = MaterialGroup::new(group);
                created.push(item);
                self.groups.push(created);
            }
        }
    }

    /// Groups in first-appearance order.
    pub fn groups(&self) -> &[MaterialGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&MaterialGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Every sub-mesh, group by group.
    pub fn raw_model_materials(&self) -> impl Iterator<Item = &RawModelMaterial> {
        self.groups.iter().flat_map(MaterialGroup::iter)
    }

    pub fn raw_model_materials_mut(&mut self) -> impl Iterator<Item = &mut RawModelMaterial> {
        self.groups.iter_mut().flat_map(MaterialGroup::iter_mut)
    }

    /// Distinct textures referenced by the materials.
    pub fn textures(&self) -> HashSet<TextureId> {
        self.raw_model_materials()
            .filter_map(|item| item.material.diffuse.texture)
            .collect()
    }

    /// Releases every mesh and texture of this entity on the device.
    pub fn dispose<A: LoaderRenderApi + ?Sized>(&self, api: &mut A) {
        for texture in self.textures() {
            api.dispose_texture(texture);
        }
        for item in self.raw_model_materials() {
            api.dispose_raw_model(item.model);
        }
    }
}

/// A placed instance of a generic entity.
#[derive(Debug, Clone)]
pub struct Entity {
    pub generic: Rc<GenericEntity>,
    pub position: Vector3<f32>,
    /// Degrees about X, Y and Z
    pub rotation: Vector3<f32>,
    pub scale: f32,
}

impl Entity {
    pub fn new(generic: Rc<GenericEntity>, position: Vector3<f32>) -> Self {
        Self {
            generic,
            position,
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
        }
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.generic.kind
    }

    pub fn increase_position(&mut self, dx: f32, dy: f32, dz: f32) {
        self.position += Vector3::new(dx, dy, dz);
    }

    pub fn increase_rotation(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation += Vector3::new(dx, dy, dz);
    }

    pub fn transformation_matrix(&self) -> Matrix4<f32> {
        math::transformation_matrix(self.position, self.rotation, self.scale)
    }
}

/// Groups entities by their shared generic entity, in first-seen order.
pub fn batch_by_generic(entities: &[Entity]) -> Vec<(Rc<GenericEntity>, Vec<&Entity>)> {
    let mut batches: Vec<(Rc<GenericEntity>, Vec<&Entity>)> = Vec::new();
    for entity in entities {
        match batches
            .iter_mut()
            .find(|(generic, _)| Rc::ptr_eq(generic, &entity.generic))
        {
            Some((_, batch)) => batch.push(entity),
            None => batches.push((Rc::clone(&entity.generic), vec![entity])),
        }
    }
    batches
}
