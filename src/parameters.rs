//! Defines the probe geometry data structure and the fixed physical constants of the robot

use crate::utils::round_to_decimal;

/// Axial travel of the head-side leg stage, mm.
pub const AXIAL_HEAD_MIN: f64 = -146.0;
pub const AXIAL_HEAD_MAX: f64 = 0.0;

/// Axial travel of the feet-side leg stage, mm.
pub const AXIAL_FEET_MIN: f64 = -78.0;
pub const AXIAL_FEET_MAX: f64 = 68.0;

/// Lateral travel, two legs of 49 mm each.
pub const LATERAL_MIN: f64 = -98.0;
pub const LATERAL_MAX: f64 = 0.0;
pub const LATERAL_LEG_TRAVEL: f64 = 49.0;

/// Pitch limit toward the feet (RyF_max), degrees.
pub const PITCH_FEET_MAX_DEG: f64 = -37.0;
/// Pitch limit toward the head (RyB_max), degrees.
pub const PITCH_HEAD_MAX_DEG: f64 = 26.0;

/// Yaw travel, degrees.
pub const YAW_MIN_DEG: f64 = -88.0;
pub const YAW_MAX_DEG: f64 = 0.0;

/// Distance between the axial leg stages, mm. The stages are this far apart at home.
pub const LEG_SEPARATION_MIN: f64 = 75.0;
pub const LEG_SEPARATION_MAX: f64 = 146.0;

/// How far the legs can differ while one of them stays stationary, mm.
pub const LEG_STATIONARY_SPAN: f64 = 68.0;

/// Length of each leg between its axial stage and the platform joint, mm.
pub const LEG_LENGTH: f64 = 100.0;

/// Calibrated reach around the entry point. The admissible radius is this value
/// minus the robot-to-entry offset of the probe.
pub const ENTRY_REACH: f64 = 72.5;

/// Maximal probe insertion travel, mm.
pub const PROBE_INSERTION_MAX: f64 = 40.0;

/// Nominal origin of the robot base in Z-frame coordinates, mm. The base is mounted
/// with the Z-frame axes, only translated.
pub const Z_FRAME_TO_BASE: [f64; 3] = [0.0, 345.0, 45.0];

/// Rigid probe attached to the end effector. Offsets are in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeGeometry {
    /// From the cannula reference to the treatment zone.
    pub cannula_to_treatment: f64,

    /// From the treatment zone to the probe tip.
    pub treatment_to_tip: f64,

    /// From the robot to the entry point (the "B" offset of the reach sphere).
    pub robot_to_entry: f64,

    /// From the robot platform to the treatment zone with all axes at home.
    /// This is where the remote center of motion sits below the platform.
    pub robot_to_treatment_at_home: f64,
}

impl ProbeGeometry {
    pub fn new(
        cannula_to_treatment: f64,
        treatment_to_tip: f64,
        robot_to_entry: f64,
        robot_to_treatment_at_home: f64,
    ) -> Self {
        ProbeGeometry {
            cannula_to_treatment,
            treatment_to_tip,
            robot_to_entry,
            robot_to_treatment_at_home,
        }
    }

    /// Probe used for the reference registration scenario.
    pub fn nominal() -> Self {
        ProbeGeometry::new(0.0, 0.0, 5.0, 41.0)
    }

    /// Radius of the sphere around the entry point within which the RCM must lie.
    pub fn entry_reach(&self) -> f64 {
        ENTRY_REACH - self.robot_to_entry
    }

    /// Distance along the probe axis from the RCM to the tip at zero insertion.
    pub fn rcm_to_treatment(&self) -> f64 {
        self.cannula_to_treatment + self.treatment_to_tip
    }

    /// Convert to string yaml representation (quick viewing, etc).
    pub fn to_yaml(&self) -> String {
        format!(
            "probe_geometry:\n  \
              cannula_to_treatment: {}\n  \
              treatment_to_tip: {}\n  \
              robot_to_entry: {}\n  \
              robot_to_treatment_at_home: {}\n",
            round_to_decimal(self.cannula_to_treatment, 3),
            round_to_decimal(self.treatment_to_tip, 3),
            round_to_decimal(self.robot_to_entry, 3),
            round_to_decimal(self.robot_to_treatment_at_home, 3),
        )
    }
}

impl Default for ProbeGeometry {
    fn default() -> Self {
        ProbeGeometry::nominal()
    }
}
