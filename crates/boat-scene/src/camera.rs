//! Camera orbit controls with damped inertia
//!
//! The camera transform is the source of truth: every update re-derives the
//! orbit from the current camera position and pivot target, applies whatever
//! rotation, zoom, and pan are pending, and writes the result back. Anything
//! else that moves the camera (auto-framing, the focus transition) just sets
//! the transform and target and calls [`OrbitControls::update`].

use bevy::prelude::*;
use std::f32::consts::PI;

/// Keeps the camera off the poles so `look_at` with +Y up stays well defined
const POLE_EPSILON: f32 = 1e-4;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Ordering of per-frame camera work
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CameraSet {
    /// Pointer input queues orbit motion
    Input,
    /// Focus transitions drive the transform directly
    Animate,
    /// Damped orbit update, once per frame
    Controls,
}

/// Plugin for orbit camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (CameraSet::Input, CameraSet::Animate, CameraSet::Controls).chain(),
        )
        .add_systems(Update, update_orbit_controls.in_set(CameraSet::Controls));
    }
}

/// Step the damped controls and re-aim the camera every frame
fn update_orbit_controls(
    mut cameras: Query<(&mut OrbitControls, &mut Transform), With<MainCamera>>,
) {
    for (mut controls, mut transform) in cameras.iter_mut() {
        controls.update(&mut transform);
    }
}

/// Orbit camera controller state, attached to the main camera
#[derive(Debug, Clone, Component)]
pub struct OrbitControls {
    /// Pivot the camera orbits around and looks at
    pub target: Vec3,
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending azimuth change (radians, about +Y)
    theta_delta: f32,
    /// Pending polar change (radians, from +Y)
    phi_delta: f32,
    /// Pending radius multiplier
    scale: f32,
    /// Pending pivot translation
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn with_damping(damping_factor: f32) -> Self {
        Self {
            damping_factor,
            ..default()
        }
    }

    /// Queue a rotation about the vertical axis
    pub fn rotate_left(&mut self, angle: f32) {
        self.theta_delta -= angle;
    }

    /// Queue a rotation toward the top pole
    pub fn rotate_up(&mut self, angle: f32) {
        self.phi_delta -= angle;
    }

    /// Queue a rotation from a pointer drag in pixels
    pub fn rotate_by_pixels(&mut self, delta: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.rotate_left(2.0 * PI * delta.x / height * self.rotate_speed);
        self.rotate_up(2.0 * PI * delta.y / height * self.rotate_speed);
    }

    /// Queue a zoom from wheel input; positive scroll moves closer
    pub fn zoom_by_scroll(&mut self, scroll: f32) {
        if scroll == 0.0 {
            return;
        }
        let step = 0.95_f32.powf(self.zoom_speed * scroll.abs());
        if scroll > 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Queue a screen-space pan from a pointer drag in pixels
    ///
    /// The pan distance is scaled so the point under the pivot tracks the
    /// pointer at the pivot's depth.
    pub fn pan_by_pixels(
        &mut self,
        delta: Vec2,
        viewport_height: f32,
        fov: f32,
        camera: &Transform,
    ) {
        let distance = (camera.translation - self.target).length();
        let world_per_pixel = 2.0 * distance * (fov / 2.0).tan() / viewport_height.max(1.0);

        let right = camera.right().as_vec3();
        let up = camera.up().as_vec3();
        self.pan_offset += (-right * delta.x + up * delta.y) * world_per_pixel * self.pan_speed;
    }

    /// Whether any motion is still pending
    pub fn is_settled(&self) -> bool {
        const EPS: f32 = 1e-6;
        self.theta_delta.abs() < EPS
            && self.phi_delta.abs() < EPS
            && (self.scale - 1.0).abs() < EPS
            && self.pan_offset.length_squared() < EPS * EPS
    }

    /// Apply pending motion to `camera` and point it at the target
    pub fn update(&mut self, camera: &mut Transform) {
        let offset = camera.translation - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        theta += self.theta_delta * step;
        phi = (phi + self.phi_delta * step).clamp(POLE_EPSILON, PI - POLE_EPSILON);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * step;

        let sin_phi = phi.sin();
        let new_offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );

        camera.translation = self.target + new_offset;
        camera.look_at(self.target, Vec3::Y);

        self.scale = 1.0;
        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.theta_delta *= decay;
            self.phi_delta *= decay;
            self.pan_offset *= decay;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
    }
}
