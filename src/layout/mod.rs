pub mod orientation;
pub mod planner;
