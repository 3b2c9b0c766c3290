//! Boat Scene - Camera, framing, and selection logic for the boat viewer
//!
//! Engine-aware but host-free: everything here runs the same natively and in
//! the browser build, so it is exercised by plain unit tests.

pub mod camera;
pub mod framing;
pub mod selection;
pub mod tween;
pub mod viewport;

// Re-export commonly used types
pub use camera::{CameraPlugin, CameraSet, MainCamera, OrbitControls};
pub use framing::{Bounds, FitPose, fit_to_bounds};
pub use selection::{Appearance, HighlightState, resolve_part};
pub use tween::{CameraPose, CameraTween};
pub use viewport::{ViewportSize, pointer_to_ndc};
