//! Workspace sampling: sweeps the axis ranges of the robot over the boundary of its reachable
//! volume and collects either tip or RCM positions.
//!
//! The sweep is a nested loop over vertical levels (leg separation from its minimum to its
//! maximum), axial and lateral stage positions, and the angular range specific to each boundary
//! region. The first level carries the bottom face, the last one the top face; every level
//! carries the side walls. Step sizes are chosen to keep point density roughly uniform between
//! flat and curved patches. Each sweep always includes both ends of its range.
//!
//! Every sample is a pure function of its axis values, so the samples are materialized into an
//! indexed vector first and evaluated in parallel. The output order is the sample index order
//! whether or not the evaluation runs in parallel.

use crate::constraints::Range;
use crate::kinematic_traits::{AxisState, Kinematics, Point};
use crate::kinematics_error::KinematicsError;
use crate::parameters::*;
use crate::point_cloud::PointCloud;
use crate::registration::CoordinateTransformer;
use crate::utils::is_valid;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Leg separation step between vertical levels, mm.
pub const LEVEL_STEP: f64 = 7.1;
/// Axial step of the platform along a level, mm.
pub const AXIAL_STEP: f64 = 7.0;
/// Lateral step of the platform, mm.
pub const LATERAL_STEP: f64 = 7.0;
/// Pitch step, degrees.
pub const PITCH_STEP_DEG: f64 = 8.7;
/// Yaw step, degrees.
pub const YAW_STEP_DEG: f64 = 8.8;

/// Which point of the forward kinematics chain is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleTarget {
    /// Probe tip, full chain. Describes the general workspace.
    TipPosition,
    /// Remote center of motion. Does not depend on angles, insertion or probe rotation.
    RcmPosition,
}

/// Geometrically distinct patches of the workspace boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryRegion {
    /// Maximal leg separation, full axial and lateral face.
    TopLevel,
    /// Minimal leg separation, full axial and lateral face.
    BottomLevel,
    /// Platform at the head end of its axial range, probe pitched to the head.
    HeadFace,
    /// Platform at the feet end of its axial range, probe pitched to the feet.
    FeetFace,
    /// Lateral stage at home (bore side), no yaw.
    BoreSideWall,
    /// Lateral stage fully out (patient side), yaw at its limit.
    PatientSideWall,
    /// Bore side with yaw swept, rolling off into top and bottom faces.
    BoreSideTilt,
    /// Patient side with yaw swept.
    PatientSideTilt,
    /// Both axial ends with the full pitch range.
    PitchLimits,
}

impl BoundaryRegion {
    pub const ALL: [BoundaryRegion; 9] = [
        BoundaryRegion::TopLevel,
        BoundaryRegion::BottomLevel,
        BoundaryRegion::HeadFace,
        BoundaryRegion::FeetFace,
        BoundaryRegion::BoreSideWall,
        BoundaryRegion::PatientSideWall,
        BoundaryRegion::BoreSideTilt,
        BoundaryRegion::PatientSideTilt,
        BoundaryRegion::PitchLimits,
    ];

    /// Regions that differ from others only by probe angles. They add nothing to the RCM cloud.
    pub fn angular_only(&self) -> bool {
        matches!(
            self,
            BoundaryRegion::BoreSideTilt
                | BoundaryRegion::PatientSideTilt
                | BoundaryRegion::PitchLimits
        )
    }
}

/// Step sizes and probe settings of the sweep. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    pub level_step: f64,
    pub axial_step: f64,
    pub lateral_step: f64,
    pub pitch_step_deg: f64,
    pub yaw_step_deg: f64,

    /// Probe insertion used for the tip workspace. The maximum gives its outer shell.
    pub insertion: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            level_step: LEVEL_STEP,
            axial_step: AXIAL_STEP,
            lateral_step: LATERAL_STEP,
            pitch_step_deg: PITCH_STEP_DEG,
            yaw_step_deg: YAW_STEP_DEG,
            insertion: PROBE_INSERTION_MAX,
        }
    }
}

/// Evenly spaced values from `from` to `to` (both included) with spacing not above `step`.
pub fn sweep(from: f64, to: f64, step: f64) -> impl Iterator<Item = f64> {
    let span = to - from;
    let steps = if step > 0.0 && span != 0.0 {
        (span.abs() / step).ceil() as usize
    } else {
        0
    };
    (0..=steps).map(move |i| {
        if i == steps {
            to
        } else {
            from + span * i as f64 / steps as f64
        }
    })
}

/// Range of the head stage that keeps both stages within their travel at the given separation.
/// The platform sits half the separation ahead of the head stage.
pub fn head_range(separation: f64) -> Range {
    let offset = separation - LEG_SEPARATION_MIN;
    Range::new(
        AXIAL_HEAD_MIN.max(AXIAL_FEET_MIN - offset),
        AXIAL_HEAD_MAX.min(AXIAL_FEET_MAX - offset),
    )
}

/// One vertical level of the sweep.
#[derive(Debug, Clone, Copy)]
pub struct Level {
    pub index: usize,
    pub separation: f64,
    pub head: Range,
}

/// Result of a sweep: the cloud, and indices of samples dropped as numerically degenerate.
#[derive(Debug, Clone, Default)]
pub struct Sweep {
    pub cloud: PointCloud,
    pub degenerate: Vec<usize>,
    pub samples: usize,
}

pub struct WorkspaceSampler<'a> {
    robot: &'a (dyn Kinematics + Sync),
    config: SweepConfig,
}

impl<'a> WorkspaceSampler<'a> {
    pub fn new(robot: &'a (dyn Kinematics + Sync), config: SweepConfig) -> Self {
        WorkspaceSampler { robot, config }
    }

    pub fn levels(&self) -> Vec<Level> {
        sweep(LEG_SEPARATION_MIN, LEG_SEPARATION_MAX, self.config.level_step)
            .enumerate()
            .map(|(index, separation)| Level {
                index,
                separation,
                head: head_range(separation),
            })
            .collect()
    }

    /// All axis states of the sweep for the given regions, in evaluation order.
    pub fn axis_states(&self, regions: &[BoundaryRegion], target: SampleTarget) -> Vec<AxisState> {
        let c = &self.config;
        let tip = target == SampleTarget::TipPosition;

        let pitch_feet = PITCH_FEET_MAX_DEG.to_radians();
        let pitch_head = PITCH_HEAD_MAX_DEG.to_radians();
        let yaw_bore = YAW_MAX_DEG.to_radians();
        let yaw_patient = YAW_MIN_DEG.to_radians();

        // The RCM does not move with the angles, one angular sample is enough.
        let pitches: Vec<f64> = if tip {
            sweep(pitch_feet, pitch_head, c.pitch_step_deg.to_radians()).collect()
        } else {
            vec![0.0]
        };
        let yaws: Vec<f64> = if tip {
            sweep(yaw_bore, yaw_patient, c.yaw_step_deg.to_radians()).collect()
        } else {
            vec![0.0]
        };
        let laterals: Vec<f64> = sweep(LATERAL_MAX, LATERAL_MIN, c.lateral_step).collect();
        let insertion = if tip { c.insertion } else { 0.0 };

        let levels = self.levels();
        let last = levels.len().saturating_sub(1);
        let mut states = Vec::new();

        for level in &levels {
            let axes = |head: f64, lateral: f64, pitch: f64, yaw: f64| AxisState {
                axial_head: head,
                axial_feet: head + level.separation - LEG_SEPARATION_MIN,
                lateral,
                pitch,
                yaw,
                insertion,
                probe_rotation: 0.0,
            };
            let heads: Vec<f64> = sweep(level.head.max, level.head.min, c.axial_step).collect();

            for region in regions {
                if !tip && region.angular_only() {
                    continue;
                }
                let before = states.len();
                match region {
                    BoundaryRegion::TopLevel | BoundaryRegion::BottomLevel => {
                        let on_level = match region {
                            BoundaryRegion::TopLevel => level.index == last,
                            _ => level.index == 0,
                        };
                        if !on_level {
                            continue;
                        }
                        for &head in &heads {
                            for &lateral in &laterals {
                                for &pitch in &pitches {
                                    for &yaw in &yaws {
                                        states.push(axes(head, lateral, pitch, yaw));
                                    }
                                }
                            }
                        }
                    }
                    BoundaryRegion::HeadFace | BoundaryRegion::FeetFace => {
                        let (head, pitch) = match region {
                            BoundaryRegion::HeadFace => (level.head.min, pitch_head),
                            _ => (level.head.max, pitch_feet),
                        };
                        for &lateral in &laterals {
                            for &yaw in &yaws {
                                states.push(axes(head, lateral, pitch, yaw));
                            }
                        }
                    }
                    BoundaryRegion::BoreSideWall | BoundaryRegion::PatientSideWall => {
                        let (lateral, yaw) = match region {
                            BoundaryRegion::BoreSideWall => (LATERAL_MAX, yaw_bore),
                            _ => (LATERAL_MIN, yaw_patient),
                        };
                        for &head in &heads {
                            for &pitch in &pitches {
                                states.push(axes(head, lateral, pitch, yaw));
                            }
                        }
                    }
                    BoundaryRegion::BoreSideTilt | BoundaryRegion::PatientSideTilt => {
                        let lateral = match region {
                            BoundaryRegion::BoreSideTilt => LATERAL_MAX,
                            _ => LATERAL_MIN,
                        };
                        for &head in &heads {
                            for &yaw in &yaws {
                                states.push(axes(head, lateral, 0.0, yaw));
                            }
                        }
                    }
                    BoundaryRegion::PitchLimits => {
                        for head in [level.head.min, level.head.max] {
                            for &lateral in &laterals {
                                for &pitch in &pitches {
                                    states.push(axes(head, lateral, pitch, yaw_bore));
                                }
                            }
                        }
                    }
                }
                debug!(
                    "level {} (separation {:.1}): {:?} adds {} samples",
                    level.index,
                    level.separation,
                    region,
                    states.len() - before
                );
            }
        }
        states
    }

    /// Evaluates the sweep over the given regions. Without a transformer the cloud is in the robot
    /// base frame; with it, in the imager frame with coordinates rounded to one decimal.
    /// Degenerate samples are logged, recorded and left out of the cloud.
    pub fn sample(
        &self,
        regions: &[BoundaryRegion],
        target: SampleTarget,
        transformer: Option<&CoordinateTransformer>,
    ) -> Sweep {
        let states = self.axis_states(regions, target);

        let evaluate = |(index, axes): (usize, &AxisState)| -> Result<Point, KinematicsError> {
            match target {
                SampleTarget::TipPosition => {
                    Ok(self.robot.forward_checked(axes, index)?.tip())
                }
                SampleTarget::RcmPosition => {
                    let rcm = self.robot.rcm(axes);
                    if is_valid(&rcm) {
                        Ok(rcm)
                    } else {
                        Err(KinematicsError::NumericalDegeneracy { sample: index })
                    }
                }
            }
        };

        #[cfg(feature = "parallel")]
        let results: Vec<Result<Point, KinematicsError>> =
            states.par_iter().enumerate().map(evaluate).collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<Point, KinematicsError>> =
            states.iter().enumerate().map(evaluate).collect();

        let mut sweep = Sweep {
            cloud: PointCloud::with_capacity(results.len()),
            degenerate: Vec::new(),
            samples: states.len(),
        };
        for result in results {
            match result {
                Ok(point) => sweep.cloud.push(match transformer {
                    Some(transformer) => transformer.to_imager(&point),
                    None => point,
                }),
                Err(KinematicsError::NumericalDegeneracy { sample }) => {
                    warn!("NaN in forward kinematics at sample {}: {:?}", sample, states[sample]);
                    sweep.degenerate.push(sample);
                }
                Err(error) => warn!("{}", error),
            }
        }
        info!(
            "{:?} sweep: {} samples, {} points, {} degenerate",
            target,
            sweep.samples,
            sweep.cloud.len(),
            sweep.degenerate.len()
        );
        sweep
    }

    /// Tip positions over all boundary regions.
    pub fn general_workspace(&self, transformer: Option<&CoordinateTransformer>) -> Sweep {
        self.sample(&BoundaryRegion::ALL, SampleTarget::TipPosition, transformer)
    }

    /// RCM positions over all boundary regions.
    pub fn rcm_workspace(&self, transformer: Option<&CoordinateTransformer>) -> Sweep {
        self.sample(&BoundaryRegion::ALL, SampleTarget::RcmPosition, transformer)
    }
}
