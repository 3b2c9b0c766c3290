//! Camera animator - eases the camera toward a selected part's viewpoint

use bevy::prelude::*;
use boat_scene::{CameraPose, CameraSet, CameraTween, MainCamera, OrbitControls};

use crate::session::{ClickSet, PartSelected, PartTable, ViewerSettings};

pub struct AnimatorPlugin;

impl Plugin for AnimatorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraAnimation>()
            .add_systems(Update, start_camera_transition.in_set(ClickSet::CameraTarget))
            .add_systems(Update, step_camera_transition.in_set(CameraSet::Animate));
    }
}

/// The single in-flight transition; a new one replaces it
#[derive(Resource, Default)]
pub struct CameraAnimation(pub Option<CameraTween>);

fn start_camera_transition(
    mut selections: MessageReader<PartSelected>,
    parts: Res<PartTable>,
    settings: Res<ViewerSettings>,
    cameras: Query<(&Transform, &OrbitControls), With<MainCamera>>,
    mut animation: ResMut<CameraAnimation>,
) {
    let Some(selection) = selections.read().last() else {
        return;
    };
    let Some(part) = parts.0.get(&selection.part_id) else {
        return;
    };
    let Ok((transform, controls)) = cameras.single() else {
        return;
    };

    // Start from wherever the camera is now, mid-flight or not
    let from = CameraPose::new(transform.translation, controls.target);
    let to = CameraPose::from_arrays(part.camera_position, part.look_at);
    if animation.0.is_some() {
        tracing::debug!("Retargeting camera transition to {}", part.id);
    }
    animation.0 = Some(CameraTween::new(from, to, settings.0.camera.transition_secs));
}

fn step_camera_transition(
    time: Res<Time>,
    mut animation: ResMut<CameraAnimation>,
    mut cameras: Query<(&mut Transform, &mut OrbitControls), With<MainCamera>>,
) {
    let Some(tween) = animation.0.as_mut() else {
        return;
    };
    let Ok((mut transform, mut controls)) = cameras.single_mut() else {
        return;
    };

    let pose = tween.advance(time.delta_secs());
    transform.translation = pose.position;
    controls.target = pose.target;
    transform.look_at(pose.target, Vec3::Y);

    if tween.is_finished() {
        animation.0 = None;
    }
}
