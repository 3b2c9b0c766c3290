//! Input controller - pointer clicks, orbit gestures, and window resizes

use bevy::input::mouse::{AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use boat_scene::{CameraSet, MainCamera, OrbitControls, ViewportSize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::dom;
use crate::session::{ClickSet, ViewerSettings};
use crate::viewport::resize_viewport;

/// Pointer travel (px) beyond which a press/release is a drag, not a click
const CLICK_SLOP: f32 = 5.0;
/// Pixel-mode wheel delta per zoom step
const PIXELS_PER_SCROLL_LINE: f32 = 100.0;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PointerClick>()
            .init_resource::<PointerDrag>()
            .init_resource::<WindowResizeFlag>()
            .add_systems(Startup, watch_window_resize)
            .add_systems(Update, detect_clicks.in_set(ClickSet::Pointer))
            .add_systems(
                Update,
                queue_orbit_input
                    .in_set(CameraSet::Input)
                    .after(ClickSet::CameraTarget),
            )
            .add_systems(Update, apply_window_resize.before(CameraSet::Input));
    }
}

/// A press and release of the primary button without dragging
#[derive(Message, Debug, Clone, Copy)]
pub struct PointerClick {
    /// Cursor position in logical pixels, origin top-left
    pub position: Vec2,
}

/// Pointer state across frames
#[derive(Resource, Default)]
struct PointerDrag {
    /// Where the primary button went down
    press: Option<Vec2>,
    /// Cursor position last frame, while any orbit button is held
    last: Option<Vec2>,
    /// Primary button has left the click radius; rotation may start
    dragging: bool,
}

impl PointerDrag {
    /// Cursor motion since last frame to feed into the orbit
    ///
    /// A primary press only starts rotating once the pointer leaves the click
    /// radius, so a click never nudges the camera. Panning starts at once.
    fn orbit_delta(
        &mut self,
        cursor: Option<Vec2>,
        rotating: bool,
        panning: bool,
    ) -> Option<Vec2> {
        if !(rotating || panning) {
            self.last = None;
            self.dragging = false;
            return None;
        }

        if rotating && !self.dragging {
            match (self.press, cursor) {
                (Some(press), Some(current)) if !is_click(press, current) => {
                    self.dragging = true;
                    self.last = Some(press);
                }
                _ => return None,
            }
        }

        let delta = match (self.last, cursor) {
            (Some(last), Some(current)) => Some(current - last),
            _ => None,
        };
        self.last = cursor;
        delta.filter(|d| *d != Vec2::ZERO)
    }
}

/// Set from the browser's resize listener, drained once per frame
#[derive(Resource, Default, Clone)]
struct WindowResizeFlag(Arc<AtomicBool>);

fn detect_clicks(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut drag: ResMut<PointerDrag>,
    mut clicks: MessageWriter<PointerClick>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let cursor = window.cursor_position();

    if buttons.just_pressed(MouseButton::Left) {
        drag.press = cursor;
    }

    if buttons.just_released(MouseButton::Left) {
        let press = drag.press.take();
        if let (Some(press), Some(release)) = (press, cursor) {
            if is_click(press, release) {
                clicks.write(PointerClick { position: release });
            }
        }
    }
}

fn is_click(press: Vec2, release: Vec2) -> bool {
    press.distance(release) <= CLICK_SLOP
}

/// Turn drags and wheel motion into pending orbit motion
///
/// Left drag rotates, right drag pans, the wheel zooms.
fn queue_orbit_input(
    buttons: Res<ButtonInput<MouseButton>>,
    scroll: Res<AccumulatedMouseScroll>,
    windows: Query<&Window, With<PrimaryWindow>>,
    viewport: Res<ViewportSize>,
    settings: Res<ViewerSettings>,
    mut drag: ResMut<PointerDrag>,
    mut cameras: Query<(&mut OrbitControls, &Transform), With<MainCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((mut controls, transform)) = cameras.single_mut() else {
        return;
    };

    let cursor = window.cursor_position();
    let rotating = buttons.pressed(MouseButton::Left);
    let panning = buttons.pressed(MouseButton::Right);

    if let Some(delta) = drag.orbit_delta(cursor, rotating, panning) {
        if rotating {
            controls.rotate_by_pixels(delta, viewport.height);
        } else {
            controls.pan_by_pixels(delta, viewport.height, settings.fov(), transform);
        }
    }

    let lines = match scroll.unit {
        MouseScrollUnit::Line => scroll.delta.y,
        MouseScrollUnit::Pixel => scroll.delta.y / PIXELS_PER_SCROLL_LINE,
    };
    if cursor.is_some() {
        controls.zoom_by_scroll(lines);
    }
}

fn watch_window_resize(flag: Res<WindowResizeFlag>) {
    if let Err(e) = dom::watch_window_resize(flag.0.clone()) {
        tracing::warn!("Window resize listener not installed: {}", e);
    }
}

/// Re-measure the container after the browser window changed size
fn apply_window_resize(
    flag: Res<WindowResizeFlag>,
    settings: Res<ViewerSettings>,
    mut viewport: ResMut<ViewportSize>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut projections: Query<&mut Projection, With<MainCamera>>,
) {
    if !flag.0.swap(false, Ordering::Relaxed) {
        return;
    }

    match dom::element_size(&settings.0.host.container_id) {
        Ok((width, height)) => {
            resize_viewport(width, height, &mut viewport, &mut windows, &mut projections);
        }
        Err(e) => tracing::warn!("Could not measure container: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_motion_is_click() {
        assert!(is_click(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0)));
        assert!(is_click(Vec2::new(100.0, 100.0), Vec2::new(103.0, 104.0)));
    }

    #[test]
    fn test_drag_is_not_click() {
        assert!(!is_click(Vec2::new(100.0, 100.0), Vec2::new(140.0, 100.0)));
    }

    fn pressed_at(x: f32, y: f32) -> PointerDrag {
        PointerDrag {
            press: Some(Vec2::new(x, y)),
            ..default()
        }
    }

    #[test]
    fn test_click_motion_does_not_rotate() {
        let mut drag = pressed_at(100.0, 100.0);
        assert_eq!(drag.orbit_delta(Some(Vec2::new(100.0, 100.0)), true, false), None);
        assert_eq!(drag.orbit_delta(Some(Vec2::new(103.0, 102.0)), true, false), None);
        assert_eq!(drag.orbit_delta(Some(Vec2::new(104.0, 103.0)), true, false), None);
        // Released
        assert_eq!(drag.orbit_delta(Some(Vec2::new(104.0, 103.0)), false, false), None);
    }

    #[test]
    fn test_drag_rotates_from_press_point() {
        let mut drag = pressed_at(100.0, 100.0);
        assert_eq!(drag.orbit_delta(Some(Vec2::new(103.0, 100.0)), true, false), None);
        assert_eq!(
            drag.orbit_delta(Some(Vec2::new(120.0, 100.0)), true, false),
            Some(Vec2::new(20.0, 0.0))
        );
        assert_eq!(
            drag.orbit_delta(Some(Vec2::new(122.0, 101.0)), true, false),
            Some(Vec2::new(2.0, 1.0))
        );

        // Release clears the drag; the next press starts over
        drag.orbit_delta(None, false, false);
        drag.press = Some(Vec2::new(50.0, 50.0));
        assert_eq!(drag.orbit_delta(Some(Vec2::new(52.0, 50.0)), true, false), None);
    }

    #[test]
    fn test_pan_starts_immediately() {
        let mut drag = PointerDrag::default();
        assert_eq!(drag.orbit_delta(Some(Vec2::new(10.0, 10.0)), false, true), None);
        assert_eq!(
            drag.orbit_delta(Some(Vec2::new(12.0, 10.0)), false, true),
            Some(Vec2::new(2.0, 0.0))
        );
    }

    #[test]
    fn test_resize_flag_drains_once() {
        let flag = WindowResizeFlag::default();
        let listener = flag.0.clone();
        listener.store(true, Ordering::Relaxed);

        assert!(flag.0.swap(false, Ordering::Relaxed));
        assert!(!flag.0.swap(false, Ordering::Relaxed));
    }
}
