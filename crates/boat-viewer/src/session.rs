//! Viewer session state shared by every component

use bevy::prelude::*;
use boat_core::{PanelText, PartRegistry, ViewerConfig, parse_hex_color};
use boat_scene::HighlightState;

use crate::highlight::SavedSurfaces;

/// Part table loaded at startup; never mutated afterwards
#[derive(Resource, Debug, Clone)]
pub struct PartTable(pub PartRegistry);

/// Configuration the app was started with
#[derive(Resource, Debug, Clone)]
pub struct ViewerSettings(pub ViewerConfig);

impl ViewerSettings {
    pub fn fov(&self) -> f32 {
        self.0.camera.fov_degrees.to_radians()
    }

    pub fn background(&self) -> Color {
        srgb(&self.0.scene.background)
    }
}

/// Parse a validated config color into a Bevy color
pub fn srgb(hex: &str) -> Color {
    let [r, g, b] = parse_hex_color(hex).unwrap_or([1.0, 1.0, 1.0]);
    Color::srgb(r, g, b)
}

/// Progress of the single asset load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    /// Root spawned, waiting for the scene instance to be framed
    Attached,
    Ready,
    Failed,
}

/// Per-session mutable state
#[derive(Resource)]
pub struct ViewerSession {
    /// Root of the loaded asset; set once after a successful load
    pub asset_root: Option<Entity>,
    pub phase: LoadPhase,
    pub highlight: HighlightState<Entity, SavedSurfaces>,
    pub panel: PanelText,
}

impl ViewerSession {
    pub fn new(highlight: Color) -> Self {
        Self {
            asset_root: None,
            phase: LoadPhase::Idle,
            highlight: HighlightState::new(highlight.to_linear()),
            panel: PanelText::overview(),
        }
    }
}

/// A click that resolved to a registered part
#[derive(Message, Debug, Clone)]
pub struct PartSelected {
    /// Scene node whose name matched
    pub node: Entity,
    pub part_id: String,
}

/// Order of the click pipeline within a frame
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClickSet {
    /// Turn pointer press/release into clicks
    Pointer,
    HitTest,
    Highlight,
    InfoPanel,
    /// Start the focus transition toward the selected part
    CameraTarget,
}
