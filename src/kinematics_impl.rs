use crate::kinematic_traits::{AxisState, ForwardKinematicsResult, Kinematics, Point, Pose};
use crate::kinematics_error::KinematicsError;
use crate::parameters::{ProbeGeometry, LEG_LENGTH, LEG_SEPARATION_MIN, Z_FRAME_TO_BASE};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

/// Kinematic model of the robot: two axial leg stages lifting the platform, lateral stage,
/// pitch/yaw gimbal around the remote center of motion and the probe stage.
#[derive(Debug, Clone, Copy)]
pub struct KinematicsModel {
    probe: ProbeGeometry,

    /// Where the robot base is mounted relative to the Z-frame.
    mount: Pose,
}

/// Nominal mount of the robot base on the Z-frame, see [Z_FRAME_TO_BASE].
pub fn nominal_mount() -> Pose {
    let [x, y, z] = Z_FRAME_TO_BASE;
    Isometry3::translation(x, y, z)
}

impl KinematicsModel {
    /// Creates a new `KinematicsModel` for the given probe, with the base at its nominal mount.
    pub fn new(probe: ProbeGeometry) -> Self {
        KinematicsModel {
            probe,
            mount: nominal_mount(),
        }
    }

    /// Creates a new `KinematicsModel` with the robot base displaced by `mount`.
    pub fn new_with_mount(probe: ProbeGeometry, mount: Pose) -> Self {
        KinematicsModel { probe, mount }
    }

    pub fn probe(&self) -> &ProbeGeometry {
        &self.probe
    }

    /// Platform position in the robot base frame (before mount). The legs form an isosceles
    /// triangle with the axial stages so the platform height follows from the leg separation.
    /// Separations beyond twice the leg length have no real height and produce NaN.
    fn platform(&self, axes: &AxisState) -> Vector3<f64> {
        let separation = axes.leg_separation();
        let half = separation / 2.0;
        let height = (LEG_LENGTH * LEG_LENGTH - half * half).sqrt();
        Vector3::new(axes.lateral, -height, axes.axial_head + half)
    }

    fn z_frame_to_rcm(&self, axes: &AxisState) -> Pose {
        let platform = self.platform(axes);
        let rcm_offset = Vector3::new(0.0, -self.probe.robot_to_treatment_at_home, 0.0);
        self.mount
            * Isometry3::from_parts(
                Translation3::from(platform + rcm_offset),
                UnitQuaternion::identity(),
            )
    }

    /// Gimbal rotation at the RCM. Probe points along -y at home.
    fn gimbal(pitch: f64, yaw: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch)
    }
}

impl Kinematics for KinematicsModel {
    fn forward(&self, axes: &AxisState) -> ForwardKinematicsResult {
        let p = &self.probe;
        let z_frame_to_rcm = self.z_frame_to_rcm(axes);

        let gimbal =
            Isometry3::from_parts(Translation3::identity(), Self::gimbal(axes.pitch, axes.yaw));
        let insertion = Isometry3::from_parts(
            Translation3::new(0.0, -(p.cannula_to_treatment + axes.insertion), 0.0),
            UnitQuaternion::identity(),
        );
        let rotation = Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), axes.probe_rotation),
        );
        let rcm_to_treatment = gimbal * insertion * rotation;

        let treatment_to_tip = Isometry3::from_parts(
            Translation3::new(0.0, -p.treatment_to_tip, 0.0),
            UnitQuaternion::identity(),
        );

        ForwardKinematicsResult {
            z_frame_to_rcm,
            rcm_to_treatment,
            z_frame_to_treatment: z_frame_to_rcm * rcm_to_treatment * treatment_to_tip,
        }
    }

    fn rcm(&self, axes: &AxisState) -> Point {
        Point::from(self.z_frame_to_rcm(axes).translation.vector)
    }

    fn inverse(&self, entry: &Point, target: &Point) -> Result<AxisState, KinematicsError> {
        // Work in the robot base frame.
        let mount_inverse = self.mount.inverse();
        let entry = mount_inverse * entry;
        let target = mount_inverse * target;

        let axis = target - entry;
        let distance = axis.norm();
        if distance <= f64::EPSILON {
            return Err(KinematicsError::Unreachable(
                "entry and target coincide, probe axis is undefined".to_string(),
            ));
        }
        let reach = self.probe.entry_reach();
        if distance > reach {
            return Err(KinematicsError::Unreachable(format!(
                "target is {:.2} mm from the entry, the probe reaches {:.2} mm",
                distance, reach
            )));
        }

        // Probe direction is (cos p sin y, -cos p cos y, -sin p)
        let direction = axis / distance;
        let pitch = (-direction.z).clamp(-1.0, 1.0).asin();
        let yaw = f64::atan2(direction.x, -direction.y);

        let home = self.probe.robot_to_treatment_at_home;
        let platform = target.coords + Vector3::new(0.0, home, 0.0);
        let height = -platform.y;
        if !(0.0..=LEG_LENGTH).contains(&height) {
            return Err(KinematicsError::Unreachable(format!(
                "platform would need height {:.2} mm, legs allow 0 to {:.2} mm",
                height, LEG_LENGTH
            )));
        }
        let separation = 2.0 * (LEG_LENGTH * LEG_LENGTH - height * height).sqrt();
        let axial_head = platform.z - separation / 2.0;
        let axial_feet = axial_head + separation - LEG_SEPARATION_MIN;

        let axes = AxisState {
            axial_head,
            axial_feet,
            lateral: platform.x,
            pitch,
            yaw,
            insertion: 0.0,
            probe_rotation: 0.0,
        };
        if !axes.is_finite() {
            return Err(KinematicsError::Unreachable(format!(
                "no finite solution for target {:?}",
                target
            )));
        }
        Ok(axes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematic_traits::AXES_AT_HOME;
    use crate::utils::axes_from_degrees;
    use approx::assert_abs_diff_eq;

    /// Model with the base at the Z-frame origin, so that coordinates below are base coordinates.
    fn model() -> KinematicsModel {
        KinematicsModel::new_with_mount(ProbeGeometry::nominal(), Isometry3::identity())
    }

    #[test]
    fn test_home_rcm() {
        let rcm = model().rcm(&AXES_AT_HOME);
        let height = (LEG_LENGTH * LEG_LENGTH - 37.5 * 37.5).sqrt();
        assert_abs_diff_eq!(rcm.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rcm.y, -height - 41.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rcm.z, 37.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rcm_independent_of_probe_axes() {
        let robot = model();
        let a = axes_from_degrees(-40.0, 10.0, -60.0, 0.0, 0.0, 0.0, 0.0);
        let b = axes_from_degrees(-40.0, 10.0, -60.0, -30.0, -70.0, 25.0, 90.0);
        assert_eq!(robot.rcm(&a), robot.rcm(&b));
        assert_eq!(robot.forward(&b).rcm(), robot.rcm(&b));
    }

    #[test]
    fn test_tip_follows_probe_direction() {
        let probe = ProbeGeometry::new(3.0, 2.0, 5.0, 41.0);
        let robot = KinematicsModel::new(probe);
        let axes = axes_from_degrees(-20.0, 20.0, -70.0, -25.0, -40.0, 10.0, 30.0);
        let fk = robot.forward(&axes);

        let expected_length = 3.0 + 10.0 + 2.0;
        let offset = fk.tip() - fk.rcm();
        assert_abs_diff_eq!(offset.norm(), expected_length, epsilon = 1e-9);

        let (p, y) = (axes.pitch, axes.yaw);
        let direction = Vector3::new(p.cos() * y.sin(), -p.cos() * y.cos(), -p.sin());
        assert_abs_diff_eq!((offset / expected_length - direction).norm(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!((fk.probe_direction() - direction).norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_pitch_tilts_to_feet() {
        let robot = KinematicsModel::new(ProbeGeometry::new(10.0, 0.0, 5.0, 41.0));
        let fk = robot.forward(&axes_from_degrees(0.0, 0.0, 0.0, -20.0, 0.0, 0.0, 0.0));
        assert!(fk.tip().z > fk.rcm().z);
        let fk = robot.forward(&axes_from_degrees(0.0, 0.0, 0.0, 0.0, -20.0, 0.0, 0.0));
        assert!(fk.tip().x < fk.rcm().x);
    }

    #[test]
    fn test_forward_is_nan_beyond_leg_length() {
        // Separation 75 + 68 + 146 = 289 mm exceeds twice the leg length
        let axes = axes_from_degrees(-146.0, 68.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(!model().forward(&axes).is_finite());
    }

    #[test]
    fn test_forward_checked_reports_degeneracy() {
        let robot = KinematicsModel::new(ProbeGeometry::nominal());
        let axes = axes_from_degrees(-146.0, 68.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(
            robot.forward_checked(&axes, 7).map(|fk| fk.tip()),
            Err(KinematicsError::NumericalDegeneracy { sample: 7 })
        );

        let fk = robot.forward_checked(&AXES_AT_HOME, 0).expect("home is in the model domain");
        assert_eq!(fk.tip(), robot.forward(&AXES_AT_HOME).tip());
    }

    #[test]
    fn test_nominal_mount_translates_base() {
        let axes = axes_from_degrees(-60.0, 10.0, -70.0, -10.0, -30.0, 20.0, 0.0);
        let unmounted = model();
        let mounted = KinematicsModel::new(ProbeGeometry::nominal());
        let offset = Vector3::from(Z_FRAME_TO_BASE);
        assert_eq!(mounted.rcm(&axes), unmounted.rcm(&axes) + offset);
        assert_abs_diff_eq!(
            (mounted.forward(&axes).tip() - (unmounted.forward(&axes).tip() + offset)).norm(),
            0.0,
            epsilon = 1e-9
        );

        // The inverse undoes the mount: same axes from the translated entry and target.
        let fk = mounted.forward(&axes);
        let entry = fk.rcm() - fk.probe_direction() * 25.0;
        let solved = mounted.inverse(&entry, &fk.rcm()).expect("must be reachable");
        assert_abs_diff_eq!(solved.axial_head, axes.axial_head, epsilon = 1e-9);
        assert_abs_diff_eq!(solved.lateral, axes.lateral, epsilon = 1e-9);
    }

    #[test]
    fn test_inverse_recovers_axes() {
        let robot = model();
        let axes = axes_from_degrees(-50.0, 20.0, -70.0, -15.0, -30.0, 0.0, 0.0);
        let fk = robot.forward(&axes);
        let entry = fk.rcm() - fk.probe_direction() * 30.0;

        let solved = robot.inverse(&entry, &fk.rcm()).expect("must be reachable");
        assert_abs_diff_eq!(solved.axial_head, axes.axial_head, epsilon = 1e-9);
        assert_abs_diff_eq!(solved.axial_feet, axes.axial_feet, epsilon = 1e-9);
        assert_abs_diff_eq!(solved.lateral, axes.lateral, epsilon = 1e-9);
        assert_abs_diff_eq!(solved.pitch, axes.pitch, epsilon = 1e-9);
        assert_abs_diff_eq!(solved.yaw, axes.yaw, epsilon = 1e-9);
    }

    #[test]
    fn test_inverse_with_mount() {
        let mount = Isometry3::from_parts(
            Translation3::new(10.0, 200.0, -5.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.3),
        );
        let robot = KinematicsModel::new_with_mount(ProbeGeometry::nominal(), mount);
        let axes = axes_from_degrees(-30.0, 0.0, -55.0, 10.0, -20.0, 0.0, 0.0);
        let fk = robot.forward(&axes);
        let entry = fk.rcm() - fk.probe_direction() * 20.0;

        let solved = robot.inverse(&entry, &fk.rcm()).expect("must be reachable");
        assert_abs_diff_eq!((robot.rcm(&solved) - fk.rcm()).norm(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solved.yaw, axes.yaw, epsilon = 1e-9);
    }

    #[test]
    fn test_inverse_too_far() {
        let robot = model();
        let entry = Point::new(0.0, -60.0, 0.0);
        let target = Point::new(0.0, -60.0 - 68.0, 0.0);
        assert!(matches!(robot.inverse(&entry, &target), Err(KinematicsError::Unreachable(_))));
    }

    #[test]
    fn test_inverse_coincident() {
        let robot = model();
        let p = Point::new(-50.0, -130.0, 10.0);
        assert!(matches!(robot.inverse(&p, &p), Err(KinematicsError::Unreachable(_))));
    }

    #[test]
    fn test_inverse_platform_above_base() {
        // RCM 41 mm below the platform; a target only 20 mm below the base would need the
        // platform above the leg stages.
        let robot = model();
        let target = Point::new(-60.0, -20.0, 0.0);
        let entry = Point::new(-60.0, 10.0, 0.0);
        assert!(matches!(robot.inverse(&entry, &target), Err(KinematicsError::Unreachable(_))));
    }
}
