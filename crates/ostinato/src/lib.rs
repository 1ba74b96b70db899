//! Host-side tooling for the ostinato motion core: configuration loading
//! and offline simulation of the axis planner and kinematics switch.

pub mod config;
pub mod sim;
