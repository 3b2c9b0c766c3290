//! Highlighter - tints the selected part and restores the previous one

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use boat_scene::Appearance;

use crate::session::{ClickSet, PartSelected, PartTable, ViewerSession};

/// Emissive strength of the highlight tint
const HIGHLIGHT_EMISSIVE_SCALE: f32 = 4.0;

/// Per-mesh state saved the first time a part is highlighted
#[derive(Debug, Clone)]
pub struct SavedSurface {
    /// Material owned by this mesh alone after the first highlight
    pub material: Handle<StandardMaterial>,
    pub emissive: LinearRgba,
}

pub type SavedSurfaces = Vec<SavedSurface>;

pub struct HighlightPlugin;

impl Plugin for HighlightPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, apply_highlight.in_set(ClickSet::Highlight));
    }
}

fn apply_highlight(
    mut selections: MessageReader<PartSelected>,
    mut session: ResMut<ViewerSession>,
    mut surfaces: SceneSurfaces,
) {
    // Several clicks in one frame: only the last one stays highlighted
    let Some(selection) = selections.read().last() else {
        return;
    };
    let node = selection.node;

    session.highlight.select(&mut surfaces, Some(node));
    tracing::debug!("Highlighted {}", selection.part_id);
}

/// Materials of the meshes under a part node
#[derive(SystemParam)]
pub struct SceneSurfaces<'w, 's> {
    materials: ResMut<'w, Assets<StandardMaterial>>,
    mesh_materials: Query<'w, 's, &'static mut MeshMaterial3d<StandardMaterial>>,
    children: Query<'w, 's, &'static Children>,
    names: Query<'w, 's, &'static Name>,
    parts: Res<'w, PartTable>,
}

impl SceneSurfaces<'_, '_> {
    /// `node` and its descendants, minus subtrees that are parts of their own
    fn part_meshes(&self, node: Entity) -> Vec<Entity> {
        let mut found = Vec::new();
        let mut stack = vec![node];

        while let Some(entity) = stack.pop() {
            if entity != node && self.is_part(entity) {
                continue;
            }
            if self.mesh_materials.contains(entity) {
                found.push(entity);
            }
            if let Ok(children) = self.children.get(entity) {
                stack.extend(children.iter());
            }
        }
        found
    }

    fn is_part(&self, entity: Entity) -> bool {
        self.names
            .get(entity)
            .is_ok_and(|name| self.parts.0.contains(name.as_str()))
    }

    fn set_emissive(
        &mut self,
        saved: &SavedSurfaces,
        emissive: impl Fn(&SavedSurface) -> LinearRgba,
    ) {
        for surface in saved {
            if let Some(material) = self.materials.get_mut(&surface.material) {
                material.emissive = emissive(surface);
            }
        }
    }
}

impl Appearance<Entity> for SceneSurfaces<'_, '_> {
    type Saved = SavedSurfaces;

    fn capture(&mut self, node: Entity) -> Option<SavedSurfaces> {
        let mut saved = Vec::new();

        for entity in self.part_meshes(node) {
            let Ok(mut mesh_material) = self.mesh_materials.get_mut(entity) else {
                continue;
            };
            let Some(original) = self.materials.get(&mesh_material.0).cloned() else {
                continue;
            };

            // Give the mesh its own copy so shared materials elsewhere stay untouched
            let emissive = original.emissive;
            let handle = self.materials.add(original);
            mesh_material.0 = handle.clone();
            saved.push(SavedSurface {
                material: handle,
                emissive,
            });
        }

        if saved.is_empty() {
            tracing::debug!("Part {:?} has no tintable material", node);
            None
        } else {
            Some(saved)
        }
    }

    fn restore(&mut self, _node: Entity, saved: &SavedSurfaces) {
        self.set_emissive(saved, |surface| surface.emissive);
    }

    fn tint(&mut self, _node: Entity, saved: &SavedSurfaces, emissive: LinearRgba) {
        let tint = emissive * HIGHLIGHT_EMISSIVE_SCALE;
        self.set_emissive(saved, |_| tint);
    }
}
