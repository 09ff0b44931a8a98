#[cfg(test)]
mod tests {
    use crate::constraints::JointLimits;
    use crate::kinematic_traits::{AxisState, Kinematics, Point};
    use crate::kinematics_impl::KinematicsModel;
    use crate::parameters::*;
    use crate::registration::CoordinateTransformer;
    use crate::tests::test_utils::tests::{assert_points_close, phantom_registration};
    use crate::utils::round_point;
    use crate::workspace::{head_range, BoundaryRegion, SampleTarget, SweepConfig, WorkspaceSampler};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const SAMPLES: usize = 500;

    /// Random configuration within the travel of every stage.
    fn random_axes(rng: &mut StdRng) -> AxisState {
        let separation = rng.gen_range(LEG_SEPARATION_MIN..=LEG_SEPARATION_MAX);
        let head = head_range(separation);
        let axial_head = rng.gen_range(head.min..=head.max);
        AxisState {
            axial_head,
            axial_feet: axial_head + separation - LEG_SEPARATION_MIN,
            lateral: rng.gen_range(LATERAL_MIN..=LATERAL_MAX),
            pitch: rng.gen_range(PITCH_FEET_MAX_DEG..=PITCH_HEAD_MAX_DEG).to_radians(),
            yaw: rng.gen_range(YAW_MIN_DEG..=YAW_MAX_DEG).to_radians(),
            insertion: rng.gen_range(0.0..=PROBE_INSERTION_MAX),
            probe_rotation: rng.gen_range(-180.0_f64..180.0).to_radians(),
        }
    }

    #[test]
    fn test_registration_scenario() {
        let transformer = CoordinateTransformer::new(phantom_registration()).expect("invertible");
        let robot = transformer.to_robot(&Point::new(-62.009, 132.697, 65.521));
        assert_eq!(robot, Point::new(-61.8, 257.0, 55.1));
    }

    #[test]
    fn test_forward_finite_within_travel() {
        let mut rng = StdRng::seed_from_u64(42);
        let probes = [
            ProbeGeometry::nominal(),
            ProbeGeometry::new(2.5, 1.5, 5.0, 41.0),
            ProbeGeometry::new(0.0, 10.0, 12.0, 45.0),
        ];
        for probe in probes {
            let robot = KinematicsModel::new(probe);
            for _ in 0..SAMPLES {
                let axes = random_axes(&mut rng);
                let fk = robot.forward(&axes);
                assert!(fk.is_finite(), "NaN in forward kinematics for {:?}", axes);
                assert_eq!(fk.rcm(), robot.rcm(&axes));

                // The tip sits on the probe axis, the fixed offsets plus insertion beyond the RCM.
                let expected = probe.rcm_to_treatment() + axes.insertion;
                let distance = (fk.tip() - fk.rcm()).norm();
                assert!((distance - expected).abs() < 1e-9, "{} vs {}", distance, expected);
            }
        }
    }

    #[test]
    fn test_inverse_round_trip_rounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let robot = KinematicsModel::new(ProbeGeometry::nominal());
        let limits = JointLimits::default();
        let mut checked = 0;
        for _ in 0..SAMPLES {
            let axes = AxisState { insertion: 0.0, probe_rotation: 0.0, ..random_axes(&mut rng) };
            if !limits.compliant(&axes) {
                continue;
            }
            let fk = robot.forward(&axes);
            let rcm = round_point(&fk.rcm());
            let entry = round_point(&(fk.rcm() - fk.probe_direction() * 30.0));

            let solved = robot.inverse(&entry, &rcm).expect("reachable by construction");
            assert_points_close(&rcm, &robot.rcm(&solved), 0.1);
            checked += 1;
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_top_level_for_probes() {
        let probes = [
            ProbeGeometry::nominal(),
            ProbeGeometry::new(5.0, 5.0, 5.0, 41.0),
            ProbeGeometry::new(0.0, 0.0, 20.0, 60.0),
        ];
        for probe in probes {
            let robot = KinematicsModel::new(probe);
            let sampler = WorkspaceSampler::new(&robot, SweepConfig::default());
            for target in [SampleTarget::TipPosition, SampleTarget::RcmPosition] {
                let sweep = sampler.sample(&[BoundaryRegion::TopLevel], target, None);
                assert!(!sweep.cloud.is_empty(), "{:?} {:?}", probe, target);
                assert!(sweep.degenerate.is_empty());
            }
        }
    }
}
