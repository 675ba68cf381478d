//! Render-host interface consumed by the scheduler.

use glam::Vec3;

use crate::error::{MesherError, Result};
use crate::mesh::MaterialHandle;

/// What the mesher needs from the renderer each frame.
pub trait RenderHost {
    /// Material to draw chunk meshes with.
    ///
    /// An error disables meshing for the current frame only; the queue is
    /// kept and retried next frame.
    fn resolve_material(&mut self) -> Result<MaterialHandle>;

    /// Camera or streaming focus used to prioritise nearby chunks.
    /// `None` falls back to the world origin.
    fn focus_position(&self) -> Option<Vec3> {
        None
    }
}

/// A host with a fixed material and focus.
#[derive(Clone, Debug, Default)]
pub struct StaticHost {
    pub material: Option<MaterialHandle>,
    pub focus: Option<Vec3>,
}

impl StaticHost {
    pub fn new(material: MaterialHandle) -> Self {
        Self {
            material: Some(material),
            focus: None,
        }
    }

    pub fn with_focus(mut self, focus: Vec3) -> Self {
        self.focus = Some(focus);
        self
    }
}

impl RenderHost for StaticHost {
    fn resolve_material(&mut self) -> Result<MaterialHandle> {
        self.material
            .ok_or_else(|| MesherError::MaterialUnavailable("no material configured".into()))
    }

    fn focus_position(&self) -> Option<Vec3> {
        self.focus
    }
}
