//! Viewport - camera, lighting rig, and render surface sizing

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use boat_scene::{MainCamera, OrbitControls, ViewportSize};

use crate::dom;
use crate::session::{ViewerSettings, srgb};

/// Ambient brightness for a fill intensity of 1.0
const FILL_BRIGHTNESS_SCALE: f32 = 500.0;
/// Directional illuminance (lux) for a sun intensity of 1.0
const SUN_ILLUMINANCE_SCALE: f32 = 10_000.0;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewportSize>()
            .add_systems(Startup, (setup_viewport, fit_to_container).chain());
    }
}

fn setup_viewport(
    mut commands: Commands,
    settings: Res<ViewerSettings>,
    viewport: Res<ViewportSize>,
) {
    let camera = &settings.0.camera;
    let lighting = &settings.0.lighting;

    // Hemisphere fill approximated by an ambient term between sky and ground
    let sky = srgb(&lighting.sky_color).to_srgba();
    let ground = srgb(&lighting.ground_color).to_srgba();
    let fill = Color::srgb(
        (sky.red + ground.red) * 0.5,
        (sky.green + ground.green) * 0.5,
        (sky.blue + ground.blue) * 0.5,
    );

    let mut controls = OrbitControls::with_damping(camera.damping_factor);
    let mut transform = Transform::from_translation(Vec3::from_array(camera.initial_position));
    controls.update(&mut transform);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: settings.fov(),
            near: camera.near,
            far: camera.far,
            aspect_ratio: viewport.aspect(),
            ..default()
        }),
        AmbientLight {
            color: fill,
            brightness: lighting.fill_intensity * FILL_BRIGHTNESS_SCALE,
            ..default()
        },
        transform,
        controls,
        MainCamera,
    ));

    commands.spawn((
        DirectionalLight {
            color: srgb(&lighting.sun_color),
            illuminance: lighting.sun_intensity * SUN_ILLUMINANCE_SCALE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(lighting.sun_position))
            .looking_at(Vec3::ZERO, Vec3::Y),
    ));

    tracing::debug!(
        "Viewport ready: fov {}°, near {}, far {}",
        camera.fov_degrees,
        camera.near,
        camera.far
    );
}

/// Size the surface to the container once the window exists
fn fit_to_container(
    settings: Res<ViewerSettings>,
    mut viewport: ResMut<ViewportSize>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut projections: Query<&mut Projection, With<MainCamera>>,
) {
    match dom::element_size(&settings.0.host.container_id) {
        Ok((width, height)) => {
            resize_viewport(width, height, &mut viewport, &mut windows, &mut projections);
        }
        Err(e) => tracing::warn!("Could not measure container: {}", e),
    }
}

/// Apply new container dimensions to the camera and render surface
///
/// Called on startup and for every window resize; always uses the size it
/// is given, never a cached one.
pub fn resize_viewport(
    width: f32,
    height: f32,
    viewport: &mut ViewportSize,
    windows: &mut Query<&mut Window, With<PrimaryWindow>>,
    projections: &mut Query<&mut Projection, With<MainCamera>>,
) {
    viewport.resize(width, height);

    for mut projection in projections.iter_mut() {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = viewport.aspect();
        }
    }

    if let Ok(mut window) = windows.single_mut() {
        if window.resolution.width() != width || window.resolution.height() != height {
            window.resolution.set(width.max(1.0), height.max(1.0));
        }
    }

    tracing::debug!("Viewport resized to {}x{}", width, height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::SystemState;

    type ResizeParams = (
        ResMut<'static, ViewportSize>,
        Query<'static, 'static, &'static mut Window, With<PrimaryWindow>>,
        Query<'static, 'static, &'static mut Projection, With<MainCamera>>,
    );

    fn resize(world: &mut World, state: &mut SystemState<ResizeParams>, width: f32, height: f32) {
        let (mut viewport, mut windows, mut projections) = state.get_mut(world);
        resize_viewport(width, height, &mut viewport, &mut windows, &mut projections);
        state.apply(world);
    }

    fn camera_aspect(world: &mut World) -> f32 {
        let mut projections = world.query_filtered::<&Projection, With<MainCamera>>();
        match projections.single(world).unwrap() {
            Projection::Perspective(perspective) => perspective.aspect_ratio,
            _ => panic!("expected a perspective projection"),
        }
    }

    #[test]
    fn test_resize_updates_camera_and_surface() {
        let mut world = World::new();
        world.init_resource::<ViewportSize>();
        world.spawn((Window::default(), PrimaryWindow));
        world.spawn((Projection::Perspective(PerspectiveProjection::default()), MainCamera));
        let mut state = SystemState::<ResizeParams>::new(&mut world);

        resize(&mut world, &mut state, 1280.0, 720.0);
        assert_eq!(camera_aspect(&mut world), 1280.0 / 720.0);

        resize(&mut world, &mut state, 600.0, 800.0);
        assert_eq!(camera_aspect(&mut world), 600.0 / 800.0);
        assert_eq!(*world.resource::<ViewportSize>(), ViewportSize::new(600.0, 800.0));

        let mut windows = world.query_filtered::<&Window, With<PrimaryWindow>>();
        let window = windows.single(&world).unwrap();
        assert_eq!((window.width(), window.height()), (600.0, 800.0));
    }
}
