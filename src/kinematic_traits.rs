//! Defines the kinematic data types and the Kinematics trait

extern crate nalgebra as na;

use na::{Isometry3, Point3};
use crate::kinematics_error::{self, KinematicsError};

/// Pose is a rigid transform in the robot base (Z-frame) coordinates. It contains both Cartesian
/// position and rotation quaternion.
/// ```
/// extern crate nalgebra as na;
/// use na::{Isometry3, Translation3, UnitQuaternion};
///
/// type Pose = Isometry3<f64>;
///
/// let translation = Translation3::new(1.0, 0.0, 0.0);
/// let transform = Pose::from_parts(translation, UnitQuaternion::identity());
/// ```
pub type Pose = Isometry3<f64>;

/// Point in millimetres, either in the robot base frame or in the imager frame depending on context.
pub type Point = Point3<f64>;

/// The seven axis values of the robot. Translations are in millimetres, rotations in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisState {
    /// Axial translation of the head-side leg stage, travel 0 to -146 mm.
    pub axial_head: f64,

    /// Axial translation of the feet-side leg stage, travel 68 to -78 mm.
    pub axial_feet: f64,

    /// Lateral translation of the platform, travel 0 to -98 mm.
    pub lateral: f64,

    /// Pitch of the gimbal around the RCM. Negative tilts the probe toward the feet.
    pub pitch: f64,

    /// Yaw of the gimbal around the RCM. Negative tilts the probe toward the patient side.
    pub yaw: f64,

    /// Probe insertion along its own axis, mm.
    pub insertion: f64,

    /// Probe rotation around its own axis.
    pub probe_rotation: f64,
}

/// Axis state with all axes at home.
pub const AXES_AT_HOME: AxisState = AxisState {
    axial_head: 0.0,
    axial_feet: 0.0,
    lateral: 0.0,
    pitch: 0.0,
    yaw: 0.0,
    insertion: 0.0,
    probe_rotation: 0.0,
};

impl AxisState {
    /// Axis values in the order AxialHead, AxialFeet, Lateral, Pitch, Yaw, Insertion, Rotation.
    pub fn to_array(&self) -> [f64; 7] {
        [
            self.axial_head,
            self.axial_feet,
            self.lateral,
            self.pitch,
            self.yaw,
            self.insertion,
            self.probe_rotation,
        ]
    }

    /// Distance between the two axial leg stages. The stages are
    /// [LEG_SEPARATION_MIN](crate::parameters::LEG_SEPARATION_MIN) apart when both are at home.
    pub fn leg_separation(&self) -> f64 {
        crate::parameters::LEG_SEPARATION_MIN + self.axial_feet - self.axial_head
    }

    /// Checks if all axis values are finite
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Result of a single forward kinematics evaluation. Never mutated after creation.
#[derive(Debug, Clone, Copy)]
pub struct ForwardKinematicsResult {
    /// Robot base (Z-frame) to the remote center of motion. Rotates only if the robot is mounted rotated.
    pub z_frame_to_rcm: Pose,

    /// Offset from the RCM to the treatment point: gimbal rotation, insertion and probe rotation.
    pub rcm_to_treatment: Pose,

    /// Full chain from the robot base to the treatment tip.
    pub z_frame_to_treatment: Pose,
}

impl ForwardKinematicsResult {
    /// Tip position in robot base coordinates.
    pub fn tip(&self) -> Point {
        Point::from(self.z_frame_to_treatment.translation.vector)
    }

    /// RCM position in robot base coordinates.
    pub fn rcm(&self) -> Point {
        Point::from(self.z_frame_to_rcm.translation.vector)
    }

    /// Unit direction of the probe axis in robot base coordinates (from the entry side toward the tip).
    pub fn probe_direction(&self) -> na::Vector3<f64> {
        self.z_frame_to_treatment.rotation * -na::Vector3::<f64>::y()
    }

    /// Checks if all transforms in the chain are free of NaN and infinity.
    pub fn is_finite(&self) -> bool {
        [self.z_frame_to_rcm, self.rcm_to_treatment, self.z_frame_to_treatment]
            .iter()
            .all(|pose| pose.to_homogeneous().iter().all(|v| v.is_finite()))
    }
}

pub trait Kinematics {
    /// Composes the transform chain for the given axis values. The chain is returned as is and
    /// contains NaN for configurations outside the model domain; use [Kinematics::forward_checked]
    /// unless the axis values are known to be valid.
    fn forward(&self, axes: &AxisState) -> ForwardKinematicsResult;

    /// Forward kinematics that reports a chain with NaN or infinite entries as
    /// [KinematicsError::NumericalDegeneracy] carrying `sample`, the caller's index of this
    /// configuration.
    fn forward_checked(
        &self,
        axes: &AxisState,
        sample: usize,
    ) -> kinematics_error::Result<ForwardKinematicsResult> {
        let fk = self.forward(axes);
        crate::utils::nan_checker(&fk, sample)?;
        Ok(fk)
    }

    /// Remote center of motion for the given axis values, independent of pitch, yaw,
    /// insertion and probe rotation.
    fn rcm(&self, axes: &AxisState) -> Point;

    /// Finds the axis values placing the RCM at `target` while the probe axis passes through
    /// `entry`. Returns [KinematicsError::Unreachable] if there is no real solution.
    fn inverse(&self, entry: &Point, target: &Point) -> Result<AxisState, KinematicsError>;
}
