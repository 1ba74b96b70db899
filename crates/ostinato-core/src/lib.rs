//! Real-time motion core for Ostinato.
//!
//! Both components run once per control period on the control loop thread:
//! the [`axis_planner`] advances a single limited axis toward its command and
//! [`kinematics`] maps joints to and from Cartesian space through a runtime
//! selectable transform. Neither allocates, blocks, or performs I/O.

pub mod axis_planner;
pub mod kinematics;

pub use axis_planner::{AxisPlanner, Branch, Limits, LimitsError, Step};
pub use kinematics::{JointVector, KinematicsSwitch, Method, Pose};
