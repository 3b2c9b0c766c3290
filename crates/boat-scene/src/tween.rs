//! Timed camera transitions between poses

use bevy::math::curve::{Curve, EaseFunction};
use bevy::prelude::*;

/// Camera position plus orbit pivot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    pub fn from_arrays(position: [f32; 3], target: [f32; 3]) -> Self {
        Self {
            position: Vec3::from_array(position),
            target: Vec3::from_array(target),
        }
    }

    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(other.position, t),
            target: self.target.lerp(other.target, t),
        }
    }
}

/// An in-flight transition from one pose to another
#[derive(Debug, Clone)]
pub struct CameraTween {
    from: CameraPose,
    to: CameraPose,
    duration: f32,
    elapsed: f32,
}

impl CameraTween {
    /// Quadratic ease-in-out over `duration` seconds
    pub fn new(from: CameraPose, to: CameraPose, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Normalized progress in 0.0-1.0
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Interpolated pose at the current time
    pub fn pose(&self) -> CameraPose {
        let t = EaseFunction::QuadraticInOut.sample_clamped(self.progress());
        self.from.lerp(&self.to, t)
    }

    /// Advance by `dt` seconds and return the new pose
    pub fn advance(&mut self, dt: f32) -> CameraPose {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.pose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn hull_pose() -> CameraPose {
        CameraPose::from_arrays([8.0, 3.0, 0.0], [0.0, 0.5, 0.0])
    }

    #[test]
    fn test_reaches_destination() {
        let from = CameraPose::new(Vec3::new(6.0, 3.0, 8.0), Vec3::ZERO);
        let mut tween = CameraTween::new(from, hull_pose(), 1.2);

        let mut pose = tween.pose();
        assert!(approx(pose.position, from.position));

        for _ in 0..100 {
            pose = tween.advance(1.0 / 60.0);
        }

        assert!(tween.is_finished());
        assert!(approx(pose.position, Vec3::new(8.0, 3.0, 0.0)));
        assert!(approx(pose.target, Vec3::new(0.0, 0.5, 0.0)));
    }

    #[test]
    fn test_ease_in_out_shape() {
        let from = CameraPose::new(Vec3::ZERO, Vec3::ZERO);
        let to = CameraPose::new(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        let mut tween = CameraTween::new(from, to, 1.0);

        // Slow start, symmetric midpoint
        let early = tween.advance(0.1).position.x;
        assert!(early < 1.0);
        let mid = tween.advance(0.4).position.x;
        assert!((mid - 5.0).abs() < 1e-3);
        assert!(!tween.is_finished());
    }

    #[test]
    fn test_retarget_starts_from_current_pose() {
        let start = CameraPose::new(Vec3::ZERO, Vec3::ZERO);
        let first_goal = CameraPose::new(Vec3::new(10.0, 0.0, 0.0), Vec3::ONE);
        let mut first = CameraTween::new(start, first_goal, 1.2);
        let midway = first.advance(0.6);

        // A new click mid-flight starts from wherever the camera is now
        let mut second = CameraTween::new(midway, hull_pose(), 1.2);
        assert!(approx(second.pose().position, midway.position));
        assert!(!approx(second.pose().position, first_goal.position));

        second.advance(1.2);
        assert!(approx(second.pose().position, hull_pose().position));
        assert!(approx(second.pose().target, hull_pose().target));
    }

    #[test]
    fn test_zero_duration_jumps() {
        let from = CameraPose::new(Vec3::ZERO, Vec3::ZERO);
        let tween = CameraTween::new(from, hull_pose(), 0.0);
        assert!(tween.is_finished());
        assert!(approx(tween.pose().position, hull_pose().position));
    }
}
