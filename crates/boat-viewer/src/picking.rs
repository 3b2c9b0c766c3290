//! Hit-testing - resolves a click on the render surface to a registered part

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use boat_scene::{MainCamera, pointer_to_ndc, resolve_part};

use crate::input::PointerClick;
use crate::session::{ClickSet, PartSelected, PartTable, ViewerSession};

pub struct HitTestPlugin;

impl Plugin for HitTestPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<MeshHit>().add_systems(
            Update,
            (cast_clicks, resolve_hits).chain().in_set(ClickSet::HitTest),
        );
    }
}

/// Nearest asset mesh under a click
#[derive(Message, Debug, Clone, Copy)]
pub struct MeshHit {
    pub entity: Entity,
}

/// Cast each click into the scene and report the nearest asset mesh it hits
///
/// Clicks before the asset is attached and clicks on empty space produce
/// nothing.
fn cast_clicks(
    mut clicks: MessageReader<PointerClick>,
    mut hits: MessageWriter<MeshHit>,
    session: Res<ViewerSession>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    parents: Query<&ChildOf>,
    mut ray_cast: MeshRayCast,
) {
    for click in clicks.read() {
        let Some(root) = session.asset_root else {
            continue;
        };
        let Ok(window) = windows.single() else {
            continue;
        };
        let Ok((camera, camera_transform)) = cameras.single() else {
            continue;
        };

        let ndc = pointer_to_ndc(click.position, window.size());
        let Some(ray) = ray_from_ndc(camera, camera_transform, ndc) else {
            continue;
        };

        // Only the asset's descendants are pickable; nearest hit first
        let filter = |entity: Entity| parents.iter_ancestors(entity).any(|a| a == root);
        let settings = MeshRayCastSettings::default().with_filter(&filter);
        if let Some(entity) = ray_cast.cast_ray(ray, &settings).first().map(|(e, _)| *e) {
            hits.write(MeshHit { entity });
        }
    }
}

/// Walk from each hit mesh up to the registered part it belongs to
///
/// Hits whose ancestor chain has no registered name leave all state
/// untouched.
fn resolve_hits(
    mut hits: MessageReader<MeshHit>,
    mut selected: MessageWriter<PartSelected>,
    session: Res<ViewerSession>,
    parts: Res<PartTable>,
    parents: Query<&ChildOf>,
    names: Query<&Name>,
) {
    for hit in hits.read() {
        let Some(root) = session.asset_root else {
            continue;
        };

        let name_of = |entity: Entity| names.get(entity).ok().map(|n| n.as_str().to_string());
        tracing::info!("Clicked mesh: {}", name_of(hit.entity).unwrap_or_default());

        match resolve_part(hit.entity, root, &parts.0, name_of, |e| {
            parents.get(e).ok().map(|child_of| child_of.parent())
        }) {
            Some((node, part_id)) => {
                tracing::info!("Resolved part: {}", part_id);
                selected.write(PartSelected { node, part_id });
            }
            None => tracing::info!("Clicked part has no config entry"),
        }
    }
}

/// World-space ray through a point in normalized device coordinates
fn ray_from_ndc(camera: &Camera, transform: &GlobalTransform, ndc: Vec2) -> Option<Ray3d> {
    // Reverse-Z: depth 1 is the near plane
    let near = camera.ndc_to_world(transform, ndc.extend(1.0))?;
    let far = camera.ndc_to_world(transform, ndc.extend(f32::EPSILON))?;
    let direction = Dir3::new(far - near).ok()?;
    Some(Ray3d::new(near, direction))
}
