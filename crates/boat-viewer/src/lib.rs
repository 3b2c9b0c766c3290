//! Boat Viewer - Interactive 3D viewer for the boat model
//!
//! Loads the boat asset into a canvas inside the host page, lets the user
//! orbit around it, and focuses the camera on named parts when clicked while
//! showing their description in the page's info panel.

mod animator;
mod app;
mod dom;
mod highlight;
mod info_panel;
mod input;
mod loader;
mod picking;
mod session;
mod viewport;

use boat_core::ViewerConfig;
use wasm_bindgen::prelude::*;

/// Settings compiled into the build
const VIEWER_TOML: &str = include_str!("../viewer.toml");

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    let config = ViewerConfig::from_toml(VIEWER_TOML);

    let level = config
        .as_ref()
        .ok()
        .and_then(|config| config.host.log_level.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build(),
    );

    tracing::info!("boat-viewer: init");

    match config {
        Ok(config) => app::run(config),
        Err(e) => tracing::error!("Invalid viewer config: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config() {
        let config = ViewerConfig::from_toml(VIEWER_TOML).unwrap();
        assert_eq!(config.host.container_id, "boat-3d");
        assert_eq!(config.host.canvas_id, "boat-3d-canvas");
        assert_eq!(config.asset.path, "models/boat.glb");
        assert_eq!(config.camera.transition_secs, 1.2);
        // Sections not in the file keep their defaults
        assert_eq!(config.scene.background, "#f3f4f6");
    }
}
