//! Static circular obstacles
//!
//! Obstacles are exclusion zones the optimizer must not pick a waypoint
//! inside. They only count once the robot can sense them: an obstacle is
//! "in view" when its circle intersects the robot's sensing circle.

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Maximum number of obstacles on the field
pub const MAX_OBSTACLES: usize = 32;

/// Circular exclusion zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleModel {
    center: Point2D,
    radius: f32,
}

impl ObstacleModel {
    /// Create a new obstacle
    pub const fn new(center: Point2D, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Obstacle center
    pub fn center(&self) -> Point2D {
        self.center
    }

    /// Obstacle radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// True when this obstacle intersects the sensing circle at `center`
    pub fn is_in_view(&self, center: Point2D, radius: f32) -> bool {
        self.center.distance_to(&center) < radius + self.radius
    }

    /// True when `p` lies strictly inside the obstacle
    pub fn contains(&self, p: &Point2D) -> bool {
        p.in_circle(&self.center, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_view_when_circles_overlap() {
        let obstacle = ObstacleModel::new(Point2D::new(500.0, 400.0), 100.0);
        assert!(obstacle.is_in_view(Point2D::new(250.0, 400.0), 200.0));
    }

    #[test]
    fn test_not_in_view_when_tangent_or_apart() {
        let obstacle = ObstacleModel::new(Point2D::new(500.0, 400.0), 100.0);
        // Exactly touching circles do not count
        assert!(!obstacle.is_in_view(Point2D::new(200.0, 400.0), 200.0));
        assert!(!obstacle.is_in_view(Point2D::new(100.0, 100.0), 200.0));
    }

    #[test]
    fn test_contains_is_strict() {
        let obstacle = ObstacleModel::new(Point2D::new(0.0, 0.0), 10.0);
        assert!(obstacle.contains(&Point2D::new(9.9, 0.0)));
        assert!(!obstacle.contains(&Point2D::new(10.0, 0.0)));
    }
}
