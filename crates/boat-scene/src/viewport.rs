//! Render surface dimensions and pointer normalization

use bevy::prelude::*;

/// Current size of the render container in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height; a collapsed container reports 1.0
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Record new container dimensions, returning whether anything changed
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let changed = self.width != width || self.height != height;
        self.width = width;
        self.height = height;
        changed
    }
}

/// Map a pointer position (pixels from the surface's top-left) to normalized
/// device coordinates in [-1, 1], with +Y up
pub fn pointer_to_ndc(pointer: Vec2, size: Vec2) -> Vec2 {
    let size = size.max(Vec2::ONE);
    Vec2::new(
        pointer.x / size.x * 2.0 - 1.0,
        -(pointer.y / size.y) * 2.0 + 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_tracks_resize() {
        let mut viewport = ViewportSize::new(800.0, 600.0);
        assert_eq!(viewport.aspect(), 800.0 / 600.0);

        assert!(viewport.resize(1280.0, 720.0));
        assert_eq!(viewport.aspect(), 1280.0 / 720.0);
        assert_eq!((viewport.width, viewport.height), (1280.0, 720.0));

        assert!(!viewport.resize(1280.0, 720.0));
    }

    #[test]
    fn test_collapsed_container() {
        assert_eq!(ViewportSize::new(0.0, 0.0).aspect(), 1.0);
    }

    #[test]
    fn test_pointer_to_ndc() {
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(pointer_to_ndc(Vec2::new(0.0, 0.0), size), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(Vec2::new(800.0, 600.0), size), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_to_ndc(Vec2::new(400.0, 300.0), size), Vec2::ZERO);
        // Screen-down is NDC-down
        assert!(pointer_to_ndc(Vec2::new(400.0, 450.0), size).y < 0.0);
    }
}
