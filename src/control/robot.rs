//! Point robot with constant-speed seek-and-arrive motion

use crate::types::*;
use serde::{Deserialize, Serialize};

/// The planning agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotModel {
    position: Point2D,
    /// Travel speed (units per millisecond)
    speed: f32,
}

impl RobotModel {
    /// Create a robot at `position`
    pub const fn new(position: Point2D, speed: f32) -> Self {
        Self { position, speed }
    }

    /// Current position
    pub fn position(&self) -> Point2D {
        self.position
    }

    /// Travel speed
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Move toward `target` for `dt` milliseconds.
    ///
    /// The step is clamped so the robot never overshoots; when the remaining
    /// distance fits within the step the position snaps to `target` exactly.
    /// Returns `true` once the robot sits on `target`, so calling again after
    /// arrival is a no-op that keeps returning `true`.
    pub fn move_to(&mut self, target: Point2D, dt: f32) -> bool {
        let offset = target - self.position;
        let remaining = offset.length();
        let step = (self.speed * dt).max(0.0);

        if remaining <= step {
            self.position = target;
            return true;
        }

        self.position += offset * (step / remaining);
        // A step just short of `remaining` can still round onto the target
        self.position == target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_at_constant_speed() {
        let mut robot = RobotModel::new(Point2D::new(0.0, 0.0), 0.5);
        let arrived = robot.move_to(Point2D::new(100.0, 0.0), 10.0);

        assert!(!arrived);
        assert!((robot.position().x - 5.0).abs() < 1e-5);
        assert_eq!(robot.position().y, 0.0);
    }

    #[test]
    fn test_arrival_is_exact() {
        let mut robot = RobotModel::new(Point2D::new(0.0, 0.0), 1.0);
        let target = Point2D::new(3.0, 4.0);

        assert!(robot.move_to(target, 100.0));
        assert_eq!(robot.position(), target);
    }

    #[test]
    fn test_idempotent_after_arrival() {
        let mut robot = RobotModel::new(Point2D::new(0.0, 0.0), 1.0);
        let target = Point2D::new(1.0, 1.0);

        assert!(robot.move_to(target, 10.0));
        assert!(robot.move_to(target, 10.0));
        assert!(robot.move_to(target, 0.0));
        assert_eq!(robot.position(), target);
    }

    #[test]
    fn test_rounded_landing_reports_arrival() {
        // speed * dt is one ULP below the remaining 5.0, yet the step lands
        // exactly on the target
        let mut robot = RobotModel::new(Point2D::new(100.0, 100.0), 1.0);
        let target = Point2D::new(103.0, 104.0);

        let arrived = robot.move_to(target, 4.999_999_5);

        assert_eq!(arrived, robot.position() == target);
        assert!(arrived);
    }

    #[test]
    fn test_zero_dt_does_not_move() {
        let mut robot = RobotModel::new(Point2D::new(0.0, 0.0), 1.0);
        assert!(!robot.move_to(Point2D::new(10.0, 0.0), 0.0));
        assert_eq!(robot.position(), Point2D::new(0.0, 0.0));
    }

    #[test]
    fn test_many_small_steps_arrive() {
        let mut robot = RobotModel::new(Point2D::new(100.0, 100.0), 0.15);
        let target = Point2D::new(230.0, 170.0);
        let mut ticks = 0;
        while !robot.move_to(target, 16.0) {
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert_eq!(robot.position(), target);
    }
}
