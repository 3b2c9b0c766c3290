//! Bevy application setup

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::winit::WinitSettings;
use boat_core::{PartRegistry, ViewerConfig};
use boat_scene::{CameraPlugin, CameraSet};

use crate::animator::AnimatorPlugin;
use crate::dom;
use crate::highlight::HighlightPlugin;
use crate::info_panel::InfoPanelPlugin;
use crate::input::InputPlugin;
use crate::loader::AssetLoaderPlugin;
use crate::picking::HitTestPlugin;
use crate::session::{ClickSet, PartSelected, PartTable, ViewerSession, ViewerSettings, srgb};
use crate::viewport::ViewportPlugin;

/// Run the Bevy application
///
/// Startup order: part registry, host canvas, then the app with viewport,
/// loader, and input wiring. A missing container or a broken part table
/// stops here and nothing renders.
pub fn run(config: ViewerConfig) {
    let registry = match PartRegistry::builtin() {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("Invalid part table: {}", e);
            return;
        }
    };
    if registry.is_empty() {
        tracing::warn!("Part table is empty; clicks will not select anything");
    }
    tracing::info!("Registered {} clickable parts", registry.len());
    for part in registry.iter() {
        tracing::debug!("Part {}: {}", part.id, part.title);
    }

    if let Err(e) = dom::attach_canvas(&config.host.container_id, &config.host.canvas_id) {
        tracing::error!("{}", e);
        return;
    }

    let settings = ViewerSettings(config);
    let session = ViewerSession::new(srgb(&settings.0.scene.highlight));

    App::new()
        .insert_resource(ClearColor(settings.background()))
        // Redraw every display refresh for the damped orbit and transitions
        .insert_resource(WinitSettings::game())
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Boat Viewer".to_string(),
                        canvas: Some(format!("#{}", settings.0.host.canvas_id)),
                        // Sized from the container on startup and on every resize
                        fit_canvas_to_parent: false,
                        prevent_default_event_handling: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Asset paths are relative to the page
                    file_path: "".to_string(),
                    // Don't look for .meta files - static hosting doesn't have them
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                })
                // tracing-wasm owns the global subscriber
                .disable::<LogPlugin>(),
        )
        .insert_resource(PartTable(registry))
        .insert_resource(settings)
        .insert_resource(session)
        .add_message::<PartSelected>()
        .add_plugins(CameraPlugin)
        .configure_sets(
            Update,
            (
                ClickSet::Pointer,
                ClickSet::HitTest,
                ClickSet::Highlight,
                ClickSet::InfoPanel,
                ClickSet::CameraTarget,
            )
                .chain()
                .in_set(CameraSet::Input),
        )
        .add_plugins(ViewportPlugin)
        .add_plugins(AssetLoaderPlugin)
        .add_plugins(HitTestPlugin)
        .add_plugins(HighlightPlugin)
        .add_plugins(InfoPanelPlugin)
        .add_plugins(AnimatorPlugin)
        .add_plugins(InputPlugin)
        .run();
}
