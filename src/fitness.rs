//! Fitness functions for local target search
//!
//! All functions return a cost to be minimized. A candidate the robot could
//! not actually use (outside its vision, off the field, inside a sensed
//! obstacle) receives a penalty derived from the field geometry, which is
//! always larger than any legitimate distance, so the swarm steers away from
//! it without any error signaling.

use crate::control::{ObstacleModel, MAX_OBSTACLES};
use crate::types::*;
use heapless::Vec;

/// Objective evaluated by the swarm
pub trait Fitness {
    /// Cost at `p` (lower is better)
    fn evaluate(&self, p: Point2D) -> f32;

    /// Field rectangle the particles are checked against
    fn bounds(&self) -> Bounds;
}

/// Shared parameters of the vision-limited objectives
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionContext {
    /// Sensing origin (robot position when the episode started)
    pub origin: Point2D,
    /// Sensing radius
    pub vision_radius: f32,
    /// The true goal
    pub target: Point2D,
    /// Field rectangle
    pub bounds: Bounds,
    penalty: f32,
}

impl VisionContext {
    fn new(origin: Point2D, vision_radius: f32, target: Point2D, bounds: Bounds) -> Self {
        Self {
            origin,
            vision_radius,
            target,
            bounds,
            penalty: penalty_for(&bounds, &target),
        }
    }

    fn is_visible(&self, p: &Point2D) -> bool {
        p.distance_to(&self.origin) <= self.vision_radius && self.bounds.contains(p)
    }
}

/// Sentinel cost for unusable candidates.
///
/// The farthest any field point can be from `target` is the distance to the
/// farthest corner; adding the diagonal keeps a margin above it.
pub fn penalty_for(bounds: &Bounds, target: &Point2D) -> f32 {
    let farthest = bounds
        .corners()
        .iter()
        .map(|corner| corner.distance_to(target))
        .fold(0.0_f32, f32::max);
    farthest + bounds.diagonal() + 1.0
}

/// Built-in objectives
#[derive(Debug, Clone, PartialEq)]
pub enum FitnessFunction {
    /// Distance to target, restricted to the vision circle and the field
    WithinVision(VisionContext),
    /// As [`FitnessFunction::WithinVision`], also excluding obstacle interiors
    AvoidObstacles {
        /// Vision and field parameters
        context: VisionContext,
        /// Obstacles already filtered as in view
        obstacles: Vec<ObstacleModel, MAX_OBSTACLES>,
    },
}

impl FitnessFunction {
    /// Distance from `target` for points the robot can sense from `origin`
    pub fn distance_from_target_within_vision(
        origin: Point2D,
        vision_radius: f32,
        target: Point2D,
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    ) -> Self {
        let bounds = Bounds::new(min_x, max_x, min_y, max_y);
        FitnessFunction::WithinVision(VisionContext::new(origin, vision_radius, target, bounds))
    }

    /// Distance from `target` for sensed points outside every given obstacle.
    ///
    /// `obstacles` should already be filtered with
    /// [`ObstacleModel::is_in_view`]; hazards the robot has not sensed must
    /// not shape the search.
    #[allow(clippy::too_many_arguments)]
    pub fn distance_from_target_within_vision_avoid_obstacles(
        origin: Point2D,
        vision_radius: f32,
        target: Point2D,
        obstacles: &[ObstacleModel],
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    ) -> Result<Self> {
        let bounds = Bounds::new(min_x, max_x, min_y, max_y);
        let obstacles =
            Vec::from_slice(obstacles).map_err(|_| PlannerError::CapacityExceeded)?;
        Ok(FitnessFunction::AvoidObstacles {
            context: VisionContext::new(origin, vision_radius, target, bounds),
            obstacles,
        })
    }

    /// Vision and field parameters
    pub fn context(&self) -> &VisionContext {
        match self {
            FitnessFunction::WithinVision(context) => context,
            FitnessFunction::AvoidObstacles { context, .. } => context,
        }
    }

    /// Obstacles considered by this objective
    pub fn obstacles(&self) -> &[ObstacleModel] {
        match self {
            FitnessFunction::WithinVision(_) => &[],
            FitnessFunction::AvoidObstacles { obstacles, .. } => obstacles.as_slice(),
        }
    }

    /// Sentinel cost returned for unusable candidates
    pub fn penalty(&self) -> f32 {
        self.context().penalty
    }
}

impl Fitness for FitnessFunction {
    fn evaluate(&self, p: Point2D) -> f32 {
        let context = self.context();
        if !context.is_visible(&p) {
            return context.penalty;
        }
        if self.obstacles().iter().any(|obstacle| obstacle.contains(&p)) {
            return context.penalty;
        }
        p.distance_to(&context.target)
    }

    fn bounds(&self) -> Bounds {
        self.context().bounds
    }
}
