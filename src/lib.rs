//! Workspace generation and entry point validation for a skull-mounted neurosurgical robot
//! with a parallel base and a remote center of motion (RCM) gimbal.
//!
//! The robot has seven axes: two axial leg stages whose separation sets the height of the
//! platform, a lateral stage, a pitch/yaw gimbal rotating the probe around the RCM, and the probe
//! stage (insertion and rotation). This crate computes
//!
//! - forward kinematics of the axis chain and the RCM position,
//! - inverse kinematics placing the RCM at a target with the probe through an entry point,
//! - the general (tip) and RCM workspaces by sweeping the boundary of the axis ranges,
//! - the part of the RCM workspace reachable from a given entry point within all joint limits,
//! - the insertion corridor from the entry point to the maximal probe reach.
//!
//! Points come in and go out in the imager (scanner) frame through the registration transform;
//! all kinematics happens in Z-frame coordinates, with the robot base mounted at a nominal
//! offset from the Z-frame origin.
//!
//! # Features
//!
//! - The sweep is evaluated in parallel (feature `parallel`), with deterministic output order.
//! - Configurations outside the model domain are detected, logged with their sample index and
//!   left out of the clouds.
//! - Unreachable entry points are a normal outcome, not an error.
//! - Setup can be read from YAML (feature `allow_filesystem`).
//!
//! ## Example
//!
//! ```
//! use neuro_workspace::kinematic_traits::{Kinematics, AXES_AT_HOME};
//! use neuro_workspace::kinematics_impl::KinematicsModel;
//! use neuro_workspace::parameters::ProbeGeometry;
//!
//! let robot = KinematicsModel::new(ProbeGeometry::nominal());
//! let fk = robot.forward(&AXES_AT_HOME);
//! let rcm = robot.rcm(&AXES_AT_HOME);
//! assert_eq!(fk.rcm(), rcm);
//! ```

pub mod parameters;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;
#[cfg(feature = "allow_filesystem")]
pub mod parameter_error;

#[path = "utils/utils.rs"]
pub mod utils;
pub mod kinematic_traits;
pub mod kinematics_error;
pub mod kinematics_impl;

pub mod constraints;

pub mod registration;

pub mod point_cloud;

pub mod workspace;

pub mod entry_point;

pub mod corridor;

pub mod pipeline;

#[cfg(test)]
mod tests;
