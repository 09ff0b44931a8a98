//! Helper functions

use crate::kinematic_traits::{AxisState, ForwardKinematicsResult, Point};
use crate::kinematics_error::KinematicsError;
use nalgebra::Isometry3;

/// Inspects the forward kinematics result for NaN or infinite entries. This is a diagnostic:
/// the sample index is carried in the error so that the degenerate configuration can be found.
pub fn nan_checker(result: &ForwardKinematicsResult, sample: usize) -> Result<(), KinematicsError> {
    if result.is_finite() {
        Ok(())
    } else {
        Err(KinematicsError::NumericalDegeneracy { sample })
    }
}

/// Checks if all coordinates of the point are finite
pub fn is_valid(point: &Point) -> bool {
    point.iter().all(|v| v.is_finite())
}

/// Rounds to the given number of decimal places.
pub fn round_to_decimal(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rounds every coordinate to one decimal place, the output stability contract of all
/// emitted point clouds. Negative zero becomes zero.
pub fn round_point(point: &Point) -> Point {
    point.map(|v| round_to_decimal(v, 1) + 0.0)
}

/// Builds axis state from translations in mm and angles in degrees.
pub fn axes_from_degrees(
    axial_head: f64,
    axial_feet: f64,
    lateral: f64,
    pitch_deg: f64,
    yaw_deg: f64,
    insertion: f64,
    probe_rotation_deg: f64,
) -> AxisState {
    AxisState {
        axial_head,
        axial_feet,
        lateral,
        pitch: pitch_deg.to_radians(),
        yaw: yaw_deg.to_radians(),
        insertion,
        probe_rotation: probe_rotation_deg.to_radians(),
    }
}

/// Print axis values, converting radians to degrees.
pub fn dump_axes(axes: &AxisState) {
    println!(
        "[head {:6.2} feet {:6.2} lateral {:6.2} pitch {:6.2} yaw {:6.2} insertion {:6.2} rotation {:6.2}]",
        axes.axial_head,
        axes.axial_feet,
        axes.lateral,
        axes.pitch.to_degrees(),
        axes.yaw.to_degrees(),
        axes.insertion,
        axes.probe_rotation.to_degrees()
    );
}

pub fn dump_pose(isometry: &Isometry3<f64>) {
    let translation = isometry.translation.vector;
    let rotation = isometry.rotation;

    println!(
        "x: {:.5}, y: {:.5}, z: {:.5},  quat: {:.5},{:.5},{:.5},{:.5}",
        translation.x, translation.y, translation.z, rotation.i, rotation.j, rotation.k, rotation.w
    );
}
