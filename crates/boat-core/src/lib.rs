//! Boat Core - Part registry, info panel text, and viewer configuration
//!
//! This crate holds the engine-free pieces of the boat viewer:
//! - Part registry mapping asset node names to camera poses and text
//! - Info panel text selection with the overview fallback
//! - Viewer configuration (host element ids, camera, lighting, colors)

pub mod config;
pub mod panel;
pub mod parts;

pub use config::{ConfigError, ViewerConfig, parse_hex_color};
pub use panel::PanelText;
pub use parts::{PartEntry, PartRegistry, RegistryError};
