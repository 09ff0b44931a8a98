#[cfg(test)]
pub mod tests {
    use crate::kinematic_traits::{AxisState, Point};
    use crate::registration::RegistrationTransform;
    use crate::utils::axes_from_degrees;
    use crate::workspace::SweepConfig;

    /// Translation-only registration measured on the phantom.
    pub fn phantom_registration() -> RegistrationTransform {
        RegistrationTransform::from_translation(-0.16, -124.35, 10.38)
    }

    /// Coarse sweep that keeps the tests fast but still visits every region.
    pub fn coarse_sweep() -> SweepConfig {
        SweepConfig {
            level_step: 20.0,
            axial_step: 20.0,
            lateral_step: 20.0,
            pitch_step_deg: 20.0,
            yaw_step_deg: 30.0,
            ..SweepConfig::default()
        }
    }

    /// Mid-travel configuration with the probe tilted towards the patient side.
    pub fn mid_travel_axes() -> AxisState {
        axes_from_degrees(-60.0, 10.0, -70.0, -10.0, -30.0, 0.0, 0.0)
    }

    pub fn assert_points_close(expected: &Point, actual: &Point, tolerance: f64) {
        let distance = (expected - actual).norm();
        assert!(
            distance <= tolerance,
            "points differ by {:.4} mm (> {}): expected {:?}, got {:?}",
            distance,
            tolerance,
            expected,
            actual
        );
    }
}
