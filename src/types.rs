//! Core type definitions for the path planner

use core::fmt;
use core::ops::{Add, AddAssign, Mul, Sub};
use serde::{Deserialize, Serialize};

/// Result type for planner operations
pub type Result<T> = core::result::Result<T, PlannerError>;

/// 2D point / vector on the planning field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate (field units)
    pub x: f32,
    /// Y coordinate (field units)
    pub y: f32,
}

impl Point2D {
    /// Origin of the field
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Create a new point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length when used as a vector
    pub fn length(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y)
    }

    /// Calculate Euclidean distance to another point
    pub fn distance_to(&self, other: &Point2D) -> f32 {
        (*self - *other).length()
    }

    /// Unit vector at `angle` radians scaled by `magnitude`
    pub fn from_polar(magnitude: f32, angle: f32) -> Self {
        Self {
            x: magnitude * libm::cosf(angle),
            y: magnitude * libm::sinf(angle),
        }
    }

    /// Strict point-in-circle test
    pub fn in_circle(&self, center: &Point2D, radius: f32) -> bool {
        self.distance_to(center) < radius
    }

    /// True when both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point2D {
    fn add_assign(&mut self, rhs: Point2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point2D {
    type Output = Point2D;

    fn mul(self, rhs: f32) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Axis-aligned field rectangle used for fitness evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum X
    pub min_x: f32,
    /// Maximum X
    pub max_x: f32,
    /// Minimum Y
    pub min_y: f32,
    /// Maximum Y
    pub max_y: f32,
}

impl Bounds {
    /// Create bounds from explicit limits
    pub const fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Canvas-style bounds anchored at the origin
    pub const fn from_canvas(width: f32, height: f32) -> Self {
        Self::new(0.0, width, 0.0, height)
    }

    /// Inclusive point-in-rectangle test
    pub fn contains(&self, p: &Point2D) -> bool {
        self.min_x <= p.x && p.x <= self.max_x && self.min_y <= p.y && p.y <= self.max_y
    }

    /// Width of the rectangle
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Height of the rectangle
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Length of the diagonal
    pub fn diagonal(&self) -> f32 {
        Point2D::new(self.width(), self.height()).length()
    }

    /// Center of the rectangle
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// The four corners, counter-clockwise from (min_x, min_y)
    pub fn corners(&self) -> [Point2D; 4] {
        [
            Point2D::new(self.min_x, self.min_y),
            Point2D::new(self.max_x, self.min_y),
            Point2D::new(self.max_x, self.max_y),
            Point2D::new(self.min_x, self.max_y),
        ]
    }

    /// Bounds are usable when finite and not inverted
    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
    }
}

/// Planner error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerError {
    /// Configuration or swarm construction inputs are unusable
    InvalidConfiguration,
    /// The phase controller observed an unrecognized or inconsistent state
    InvalidPhase,
    /// An operation was invoked out of order (e.g. stepping a converged swarm)
    ProtocolViolation,
    /// A fixed-capacity buffer is full
    CapacityExceeded,
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::InvalidConfiguration => write!(f, "Invalid configuration"),
            PlannerError::InvalidPhase => write!(f, "Invalid robot phase"),
            PlannerError::ProtocolViolation => write!(f, "Protocol violation"),
            PlannerError::CapacityExceeded => write!(f, "Capacity exceeded"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlannerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let a = Point2D::new(1.0, 2.0);
        let b = Point2D::new(3.0, -1.0);

        assert_eq!(a + b, Point2D::new(4.0, 1.0));
        assert_eq!(b - a, Point2D::new(2.0, -3.0));
        assert_eq!(a * 2.0, Point2D::new(2.0, 4.0));

        let mut c = a;
        c += b;
        assert_eq!(c, Point2D::new(4.0, 1.0));
    }

    #[test]
    fn test_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn test_in_circle_is_strict() {
        let center = Point2D::new(10.0, 10.0);
        assert!(Point2D::new(12.0, 10.0).in_circle(&center, 5.0));
        assert!(!Point2D::new(15.0, 10.0).in_circle(&center, 5.0));
    }

    #[test]
    fn test_bounds_contains_is_inclusive() {
        let bounds = Bounds::from_canvas(100.0, 50.0);
        assert!(bounds.contains(&Point2D::new(0.0, 0.0)));
        assert!(bounds.contains(&Point2D::new(100.0, 50.0)));
        assert!(!bounds.contains(&Point2D::new(100.1, 25.0)));
        assert!(!bounds.contains(&Point2D::new(50.0, -0.1)));
    }

    #[test]
    fn test_bounds_geometry() {
        let bounds = Bounds::from_canvas(30.0, 40.0);
        assert_eq!(bounds.diagonal(), 50.0);
        assert_eq!(bounds.center(), Point2D::new(15.0, 20.0));
        assert!(bounds.is_valid());
        assert!(!Bounds::new(10.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!Bounds::new(0.0, f32::NAN, 0.0, 10.0).is_valid());
    }

    #[test]
    fn test_polar() {
        let p = Point2D::from_polar(2.0, 0.0);
        assert!((p.x - 2.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }
}
