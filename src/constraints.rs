//! Joint limits applied to inverse kinematics solutions. All checks are inclusive
//! on both ends: a value exactly at the limit is compliant. A small tolerance absorbs
//! the round-off of the inverse solver, so that points sampled exactly at a travel
//! limit validate.

use std::fmt;
use crate::kinematic_traits::AxisState;
use crate::parameters::*;

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Range { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Inclusive check widened by `tolerance` on both ends. NaN is never contained.
    pub fn contains_within(&self, value: f64, tolerance: f64) -> bool {
        value >= self.min - tolerance && value <= self.max + tolerance
    }
}

/// The check that rejected an axis state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitViolation {
    LegSeparation,
    AxialHead,
    AxialFeet,
    Lateral,
    Yaw,
    Pitch,
}

impl fmt::Display for LimitViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            LimitViolation::LegSeparation => "leg separation",
            LimitViolation::AxialHead => "axial head translation",
            LimitViolation::AxialFeet => "axial feet translation",
            LimitViolation::Lateral => "lateral translation",
            LimitViolation::Yaw => "yaw",
            LimitViolation::Pitch => "pitch",
        };
        write!(f, "{} out of range", name)
    }
}

/// Round-off allowance of the limit checks, mm or radians.
pub const LIMIT_TOLERANCE: f64 = 1e-6;

/// Six joint limit checks. Translations in mm, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLimits {
    pub leg_separation: Range,
    pub axial_head: Range,
    pub axial_feet: Range,
    pub lateral: Range,
    pub yaw: Range,
    pub pitch: Range,
    pub tolerance: f64,
}

impl Default for JointLimits {
    fn default() -> Self {
        JointLimits {
            leg_separation: Range::new(LEG_SEPARATION_MIN, LEG_SEPARATION_MAX),
            axial_head: Range::new(AXIAL_HEAD_MIN, AXIAL_HEAD_MAX),
            axial_feet: Range::new(AXIAL_FEET_MIN, AXIAL_FEET_MAX),
            // Only the outer leg of the lateral stage positions the RCM for entry point planning
            lateral: Range::new(LATERAL_MIN, LATERAL_MIN + LATERAL_LEG_TRAVEL),
            yaw: Range::new(YAW_MIN_DEG.to_radians(), YAW_MAX_DEG.to_radians()),
            pitch: Range::new(PITCH_FEET_MAX_DEG.to_radians(), PITCH_HEAD_MAX_DEG.to_radians()),
            tolerance: LIMIT_TOLERANCE,
        }
    }
}

impl JointLimits {
    /// Returns the first failing check, or None if the state is within all limits.
    pub fn violation(&self, axes: &AxisState) -> Option<LimitViolation> {
        let checks = [
            (self.leg_separation, axes.leg_separation(), LimitViolation::LegSeparation),
            (self.axial_head, axes.axial_head, LimitViolation::AxialHead),
            (self.axial_feet, axes.axial_feet, LimitViolation::AxialFeet),
            (self.lateral, axes.lateral, LimitViolation::Lateral),
            (self.yaw, axes.yaw, LimitViolation::Yaw),
            (self.pitch, axes.pitch, LimitViolation::Pitch),
        ];
        checks
            .iter()
            .find(|(range, value, _)| !range.contains_within(*value, self.tolerance))
            .map(|(_, _, violation)| *violation)
    }

    pub fn compliant(&self, axes: &AxisState) -> bool {
        self.violation(axes).is_none()
    }

    pub fn filter(&self, states: &[AxisState]) -> Vec<AxisState> {
        states
            .iter()
            .filter(|axes| self.compliant(axes))
            .cloned()
            .collect()
    }
}
