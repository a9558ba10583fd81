use serde::{Deserialize, Serialize};
use walkroom_assets::TextureId;
use walkroom_common::{ObjectId, Transform};

use crate::object::{Material, ObjectKind, Quad, SceneObject};

/// Change records drained by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneEvent {
    TextureReplaced {
        object: ObjectId,
        old: TextureId,
        new: TextureId,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),
    #[error("object {0} has no texture to replace")]
    NotTextured(ObjectId),
    #[error("object {0} is not a media plane")]
    NotMedia(ObjectId),
}

/// The room's objects in insertion order.
///
/// `ObjectId(n)` is the n-th inserted object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    objects: Vec<SceneObject>,
    /// Clear colour, sRGB.
    background: [f32; 3],
    #[serde(skip)]
    events: Vec<SceneEvent>,
}

impl Scene {
    pub fn new(background: [f32; 3]) -> Self {
        Self {
            objects: Vec::new(),
            background,
            events: Vec::new(),
        }
    }

    pub fn background(&self) -> [f32; 3] {
        self.background
    }

    /// Add an object and return its id.
    pub fn insert(
        &mut self,
        kind: ObjectKind,
        transform: Transform,
        quad: Quad,
        material: Material,
    ) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(SceneObject {
            id,
            kind,
            transform,
            quad,
            material,
        });
        tracing::debug!(%id, ?kind, "object added");
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0 as usize)
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// First object of the given kind.
    pub fn find_kind(&self, kind: ObjectKind) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.kind == kind)
    }

    pub fn image_plane(&self) -> Option<ObjectId> {
        self.find_kind(ObjectKind::ImagePlane).map(|o| o.id)
    }

    pub fn video_plane(&self) -> Option<ObjectId> {
        self.find_kind(ObjectKind::VideoPlane).map(|o| o.id)
    }

    /// Every texture currently referenced by some object.
    pub fn textures_in_use(&self) -> Vec<TextureId> {
        let mut ids: Vec<TextureId> = self
            .objects
            .iter()
            .filter_map(|o| o.material.texture())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Point a textured object at a new texture, returning the previous one.
    pub fn replace_texture(
        &mut self,
        id: ObjectId,
        texture: TextureId,
    ) -> Result<TextureId, SceneError> {
        let object = self
            .objects
            .get_mut(id.0 as usize)
            .ok_or(SceneError::NotFound(id))?;
        let Material::Textured { texture: slot, .. } = &mut object.material else {
            return Err(SceneError::NotTextured(id));
        };
        let old = std::mem::replace(slot, texture);
        self.events.push(SceneEvent::TextureReplaced {
            object: id,
            old,
            new: texture,
        });
        tracing::info!(%id, %old, new = %texture, "texture replaced");
        Ok(old)
    }

    /// Swap the picture on the image or video plane. Other objects are refused.
    pub fn swap_media(&mut self, id: ObjectId, texture: TextureId) -> Result<TextureId, SceneError> {
        let object = self.get(id).ok_or(SceneError::NotFound(id))?;
        if object.kind.media_kind().is_none() {
            return Err(SceneError::NotMedia(id));
        }
        self.replace_texture(id, texture)
    }

    /// Pending events not yet drained.
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}
