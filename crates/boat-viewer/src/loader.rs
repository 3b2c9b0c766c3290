//! Asset loading - fetches the boat model, attaches it, and frames the camera

use bevy::asset::LoadState;
use bevy::light::{NotShadowCaster, NotShadowReceiver};
use bevy::mesh::VertexAttributeValues;
use bevy::prelude::*;
use boat_scene::{Bounds, MainCamera, OrbitControls, fit_to_bounds};

use crate::session::{LoadPhase, ViewerSession, ViewerSettings};

pub struct AssetLoaderPlugin;

impl Plugin for AssetLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingAsset>()
            .add_systems(Startup, start_asset_load)
            .add_systems(Update, (poll_asset_load, prepare_asset_root).chain());
    }
}

/// Marker for the root entity of the loaded asset
#[derive(Component)]
pub struct AssetRoot;

/// Handle of the in-flight load
#[derive(Resource, Default)]
pub struct PendingAsset {
    pub handle: Option<Handle<Gltf>>,
}

/// Issue the single, fire-and-forget asset load
fn start_asset_load(
    asset_server: Res<AssetServer>,
    settings: Res<ViewerSettings>,
    mut pending: ResMut<PendingAsset>,
    mut session: ResMut<ViewerSession>,
) {
    if session.phase != LoadPhase::Idle {
        return;
    }

    let path = settings.0.asset.path.clone();
    // The asset server reports no byte counts, so there is no fraction to show
    tracing::info!("Loading model: {} (total size unknown)", path);
    pending.handle = Some(asset_server.load::<Gltf>(path));
    session.phase = LoadPhase::Loading;
}

/// Check load state and attach the default scene once the asset is in
fn poll_asset_load(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    mut pending: ResMut<PendingAsset>,
    mut session: ResMut<ViewerSession>,
) {
    if session.phase != LoadPhase::Loading {
        return;
    }
    let Some(handle) = pending.handle.clone() else {
        return;
    };

    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            let Some(gltf) = gltf_assets.get(&handle) else {
                return;
            };
            // Use the default scene, or the first scene if none is marked default
            let Some(scene) = gltf
                .default_scene
                .clone()
                .or_else(|| gltf.scenes.first().cloned())
            else {
                tracing::error!("Error loading GLB: no scenes in asset");
                session.phase = LoadPhase::Failed;
                pending.handle = None;
                return;
            };

            tracing::info!("GLB loaded");
            let root = commands
                .spawn((SceneRoot(scene), AssetRoot, Name::new("boat-root")))
                .id();
            session.asset_root = Some(root);
            session.phase = LoadPhase::Attached;
        }
        Some(LoadState::Failed(e)) => {
            tracing::error!("Error loading GLB: {}", e);
            session.phase = LoadPhase::Failed;
            pending.handle = None;
        }
        // Still loading
        _ => {}
    }
}

/// Once the scene instance has spawned: enable shadows on every mesh and
/// frame the camera on the whole asset
fn prepare_asset_root(
    mut commands: Commands,
    mut session: ResMut<ViewerSession>,
    settings: Res<ViewerSettings>,
    children_query: Query<&Children>,
    mesh_query: Query<(&Mesh3d, &GlobalTransform)>,
    meshes: Res<Assets<Mesh>>,
    mut cameras: Query<(&mut Transform, &mut OrbitControls), With<MainCamera>>,
) {
    if session.phase != LoadPhase::Attached {
        return;
    }
    let Some(root) = session.asset_root else {
        return;
    };

    let mut bounds: Option<Bounds> = None;
    let mut mesh_count = 0;

    for entity in children_query.iter_descendants(root) {
        let Ok((mesh_handle, transform)) = mesh_query.get(entity) else {
            continue;
        };

        commands
            .entity(entity)
            .remove::<(NotShadowCaster, NotShadowReceiver)>();
        mesh_count += 1;

        if let Some(mesh_bounds) = meshes
            .get(&mesh_handle.0)
            .and_then(|mesh| mesh_world_bounds(mesh, transform))
        {
            bounds = Some(match bounds {
                Some(b) => b.union(mesh_bounds),
                None => mesh_bounds,
            });
        }
    }

    // Scene instance not spawned yet
    let Some(bounds) = bounds else {
        return;
    };

    let camera = &settings.0.camera;
    let fit = fit_to_bounds(&bounds, settings.fov(), camera.fit_padding, camera.fit_elevation);

    if let Ok((mut transform, mut controls)) = cameras.single_mut() {
        transform.translation = fit.position;
        transform.look_at(fit.target, Vec3::Y);
        controls.target = fit.target;
        controls.update(&mut transform);
    }

    tracing::info!(
        "Framed asset: size {:?}, center {:?}, distance {:.3} ({} meshes)",
        bounds.size(),
        bounds.center(),
        fit.distance,
        mesh_count
    );
    session.phase = LoadPhase::Ready;
}

/// World-space bounds of a mesh's vertex positions
fn mesh_world_bounds(mesh: &Mesh, transform: &GlobalTransform) -> Option<Bounds> {
    let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return None;
    };

    positions
        .iter()
        .map(|p| transform.transform_point(Vec3::from_array(*p)))
        .fold(None, |acc: Option<Bounds>, point| {
            Some(match acc {
                Some(b) => b.union(Bounds::new(point, point)),
                None => Bounds::new(point, point),
            })
        })
}
