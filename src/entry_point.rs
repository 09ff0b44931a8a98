//! Reduces the RCM workspace to the part reachable through a given entry point.
//!
//! A candidate RCM point must first lie within the reach sphere around the entry point, then
//! the inverse kinematics solution placing the RCM there with the probe through the entry must
//! respect all joint limits.

use crate::constraints::{JointLimits, LimitViolation};
use crate::kinematic_traits::{Kinematics, Point};
use crate::kinematics_error::KinematicsError;
use crate::parameters::ProbeGeometry;
use crate::point_cloud::PointCloud;
use std::collections::HashMap;
use tracing::{debug, info};

/// True if `rcm` lies within the admissible radius `72.5 - robot_to_entry` around `entry`.
/// The boundary is inclusive: a point exactly at the radius is accepted.
pub fn check_sphere(entry: &Point, rcm: &Point, probe: &ProbeGeometry) -> bool {
    (rcm - entry).norm() <= probe.entry_reach()
}

/// Validated cloud together with the reasons the other points were dropped.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    pub cloud: PointCloud,
    /// Points outside the reach sphere.
    pub outside_sphere: usize,
    /// Points with no real inverse kinematics solution.
    pub unreachable: usize,
    /// Points whose solution violates a joint limit, by the first failing check.
    pub violations: HashMap<LimitViolation, usize>,
}

impl Validation {
    /// The entry point can be used if at least one RCM point survived.
    pub fn reachable(&self) -> bool {
        !self.cloud.is_empty()
    }

    /// Validated cloud, or [KinematicsError::EmptyValidatedWorkspace] if nothing survived.
    pub fn require_reachable(&self) -> Result<&PointCloud, KinematicsError> {
        if self.reachable() {
            Ok(&self.cloud)
        } else {
            Err(KinematicsError::EmptyValidatedWorkspace)
        }
    }

    pub fn rejected(&self) -> usize {
        self.outside_sphere + self.unreachable + self.violations.values().sum::<usize>()
    }
}

pub struct EntryPointValidator<'a> {
    robot: &'a dyn Kinematics,
    probe: ProbeGeometry,
    limits: JointLimits,
}

impl<'a> EntryPointValidator<'a> {
    pub fn new(robot: &'a dyn Kinematics, probe: ProbeGeometry, limits: JointLimits) -> Self {
        EntryPointValidator { robot, probe, limits }
    }

    /// Checks a single RCM candidate. Ok(()) if it passes both the sphere and the joint limits.
    pub fn admissible(&self, entry: &Point, rcm: &Point) -> Result<(), Rejection> {
        if !check_sphere(entry, rcm, &self.probe) {
            return Err(Rejection::OutsideSphere);
        }
        let axes = self.robot.inverse(entry, rcm).map_err(Rejection::Unreachable)?;
        match self.limits.violation(&axes) {
            Some(violation) => Err(Rejection::Limit(violation)),
            None => Ok(()),
        }
    }

    /// Filters the RCM cloud (robot base frame) down to the points reachable from `entry`,
    /// keeping the input order. An empty result is a normal outcome.
    pub fn validate(&self, entry: &Point, rcm_cloud: &PointCloud) -> Validation {
        let mut validation = Validation::default();
        for rcm in rcm_cloud {
            match self.admissible(entry, rcm) {
                Ok(()) => validation.cloud.push(*rcm),
                Err(Rejection::OutsideSphere) => validation.outside_sphere += 1,
                Err(Rejection::Unreachable(error)) => {
                    debug!("{:?}: {}", rcm, error);
                    validation.unreachable += 1;
                }
                Err(Rejection::Limit(violation)) => {
                    *validation.violations.entry(violation).or_insert(0) += 1
                }
            }
        }
        if validation.reachable() {
            info!(
                "entry point {:?}: {} of {} RCM points admissible",
                entry,
                validation.cloud.len(),
                rcm_cloud.len()
            );
        } else {
            info!(
                "entry point {:?} is not reachable ({} RCM points checked)",
                entry,
                rcm_cloud.len()
            );
        }
        validation
    }
}

/// Why a single RCM candidate was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    OutsideSphere,
    Unreachable(KinematicsError),
    Limit(LimitViolation),
}
