//! Robot and environment models driven by the planner

pub mod obstacle;
pub mod robot;

pub use obstacle::*;
pub use robot::*;
