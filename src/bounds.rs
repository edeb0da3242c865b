//! Surface bounds and boundary policies.
//!
//! The drawable domain is `[0, width] × [0, height]` in surface pixels with
//! the origin at the top-left corner. A [`BoundaryPolicy`] decides what
//! happens to a particle that leaves it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Size of the drawable surface in pixels. Both dimensions are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceBounds {
    width: u32,
    height: u32,
}

impl SurfaceBounds {
    /// Create bounds, or `None` if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bounds as a float extent.
    #[inline]
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Whether `point` lies inside the closed domain.
    pub fn contains(&self, point: Vec2) -> bool {
        let extent = self.extent();
        point.x >= 0.0 && point.y >= 0.0 && point.x <= extent.x && point.y <= extent.y
    }

    /// Clamp `point` into the closed domain.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(Vec2::ZERO, self.extent())
    }
}

/// What happens when a particle crosses the surface edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Reappear on the opposite edge (toroidal space).
    #[default]
    Wrap,
    /// Clamp to the edge and reflect the velocity, losing some energy.
    Bounce,
}

impl BoundaryPolicy {
    /// Apply the policy to a position/velocity pair in place.
    ///
    /// `restitution` only matters for [`BoundaryPolicy::Bounce`].
    pub fn apply(&self, position: &mut Vec2, velocity: &mut Vec2, bounds: SurfaceBounds, restitution: f32) {
        let extent = bounds.extent();
        match self {
            BoundaryPolicy::Wrap => {
                position.x = wrap_axis(position.x, extent.x);
                position.y = wrap_axis(position.y, extent.y);
            }
            BoundaryPolicy::Bounce => {
                bounce_axis(&mut position.x, &mut velocity.x, extent.x, restitution);
                bounce_axis(&mut position.y, &mut velocity.y, extent.y, restitution);
            }
        }
    }
}

fn wrap_axis(value: f32, bound: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    if (0.0..=bound).contains(&value) {
        return value;
    }
    // rem_euclid can round up to exactly `bound` for tiny negatives, which
    // is still inside the closed domain.
    value.rem_euclid(bound).min(bound)
}

fn bounce_axis(value: &mut f32, velocity: &mut f32, bound: f32, restitution: f32) {
    if !value.is_finite() {
        *value = 0.0;
    }
    if *value < 0.0 {
        *value = 0.0;
        *velocity = velocity.abs() * restitution;
    } else if *value > bound {
        *value = bound;
        *velocity = -velocity.abs() * restitution;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> SurfaceBounds {
        SurfaceBounds::new(200, 100).unwrap()
    }

    #[test]
    fn test_zero_sized_bounds_rejected() {
        assert!(SurfaceBounds::new(0, 10).is_none());
        assert!(SurfaceBounds::new(10, 0).is_none());
        assert_eq!(SurfaceBounds::new(3, 4).unwrap().extent(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_wrap_past_far_edge() {
        let mut pos = Vec2::new(200.0 + 7.5, 50.0);
        let mut vel = Vec2::new(3.0, 0.0);
        BoundaryPolicy::Wrap.apply(&mut pos, &mut vel, bounds(), 0.8);
        assert!((pos.x - 7.5).abs() < 1e-4);
        assert_eq!(vel, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_wrap_past_near_edge() {
        let mut pos = Vec2::new(20.0, -4.0);
        let mut vel = Vec2::ZERO;
        BoundaryPolicy::Wrap.apply(&mut pos, &mut vel, bounds(), 0.8);
        assert!((pos.y - 96.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_keeps_edge_values() {
        let mut pos = Vec2::new(200.0, 0.0);
        let mut vel = Vec2::ZERO;
        BoundaryPolicy::Wrap.apply(&mut pos, &mut vel, bounds(), 0.8);
        assert_eq!(pos, Vec2::new(200.0, 0.0));
    }

    #[test]
    fn test_bounce_low_edge() {
        let mut pos = Vec2::new(-2.0, 50.0);
        let mut vel = Vec2::new(-5.0, 1.0);
        BoundaryPolicy::Bounce.apply(&mut pos, &mut vel, bounds(), 0.8);
        assert_eq!(pos.x, 0.0);
        assert!((vel.x - 4.0).abs() < 1e-5);
        assert_eq!(vel.y, 1.0);
    }

    #[test]
    fn test_bounce_high_edge() {
        let mut pos = Vec2::new(50.0, 130.0);
        let mut vel = Vec2::new(0.0, 10.0);
        BoundaryPolicy::Bounce.apply(&mut pos, &mut vel, bounds(), 0.5);
        assert_eq!(pos.y, 100.0);
        assert!((vel.y + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_non_finite_position_recovered() {
        for policy in [BoundaryPolicy::Wrap, BoundaryPolicy::Bounce] {
            let mut pos = Vec2::new(f32::NAN, f32::INFINITY);
            let mut vel = Vec2::ZERO;
            policy.apply(&mut pos, &mut vel, bounds(), 0.8);
            assert!(bounds().contains(pos), "{policy:?} left {pos:?}");
        }
    }
}
