//! Fit-to-object camera framing

use bevy::prelude::*;

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing both
    pub fn union(self, other: Bounds) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Camera pose that frames a bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitPose {
    pub position: Vec3,
    /// Look-at target and orbit pivot
    pub target: Vec3,
    /// Padded distance along each horizontal axis
    pub distance: f32,
}

/// Place the camera so the largest dimension of `bounds` fills the vertical FOV
///
/// `distance = padding * (max_dim / 2) / tan(fov / 2)`; the camera sits at
/// `center + (distance, distance * elevation, distance)` looking at the center.
pub fn fit_to_bounds(bounds: &Bounds, fov: f32, padding: f32, elevation: f32) -> FitPose {
    let size = bounds.size();
    let center = bounds.center();
    let max_dim = size.x.max(size.y).max(size.z);

    let distance = (max_dim / 2.0) / (fov / 2.0).tan() * padding;

    FitPose {
        position: center + Vec3::new(distance, distance * elevation, distance),
        target: center,
        distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_distance_formula() {
        let bounds = Bounds::new(Vec3::new(-2.0, 0.0, -1.0), Vec3::new(2.0, 1.5, 1.0));
        let fov = 45f32.to_radians();
        let pose = fit_to_bounds(&bounds, fov, 1.3, 0.3);

        let expected = 1.3 * (4.0 / 2.0) / (fov / 2.0).tan();
        assert!((pose.distance - expected).abs() < 1e-5);
        assert_eq!(pose.target, Vec3::new(0.0, 0.75, 0.0));

        let offset = pose.position - pose.target;
        assert!((offset.x - expected).abs() < 1e-5);
        assert!((offset.y - expected * 0.3).abs() < 1e-5);
        assert!((offset.z - expected).abs() < 1e-5);
    }

    #[test]
    fn test_fit_uses_largest_dimension() {
        let fov = 45f32.to_radians();
        let tall = Bounds::new(Vec3::ZERO, Vec3::new(1.0, 6.0, 1.0));
        let wide = Bounds::new(Vec3::ZERO, Vec3::new(6.0, 1.0, 1.0));

        let a = fit_to_bounds(&tall, fov, 1.3, 0.3);
        let b = fit_to_bounds(&wide, fov, 1.3, 0.3);
        assert!((a.distance - b.distance).abs() < 1e-5);
    }

    #[test]
    fn test_union_and_center() {
        let a = Bounds::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0));
        let b = Bounds::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(3.0, 0.0, 1.0));
        let both = a.union(b);

        assert_eq!(both.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(both.max, Vec3::new(3.0, 1.0, 1.0));
        assert_eq!(both.size(), Vec3::new(4.0, 2.0, 1.0));
        assert_eq!(both.center(), Vec3::new(1.0, 0.0, 0.5));
    }
}
