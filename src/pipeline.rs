//! Runs the whole workspace chain for one entry point: general and RCM workspaces, entry point
//! validation and the insertion corridor. The result can be exported as point files in the
//! imager frame.

use std::io;
use std::path::Path;
use tracing::info;

use crate::constraints::JointLimits;
use crate::corridor::{CorridorConfig, CorridorMeshBuilder};
use crate::entry_point::{EntryPointValidator, Validation};
use crate::kinematic_traits::Point;
use crate::kinematics_error::KinematicsError;
use crate::kinematics_impl::KinematicsModel;
use crate::parameters::ProbeGeometry;
use crate::point_cloud::PointCloud;
use crate::registration::{CoordinateTransformer, RegistrationTransform};
use crate::workspace::{SweepConfig, WorkspaceSampler};

pub const GENERAL_WORKSPACE_FILE: &str = "general_workspace.xyz";
pub const RCM_WORKSPACE_FILE: &str = "rcm_workspace.xyz";
pub const VALIDATED_WORKSPACE_FILE: &str = "validated_workspace.xyz";
pub const CORRIDOR_FILE: &str = "corridor.xyz";

pub struct WorkspacePipeline {
    pub robot: KinematicsModel,
    pub transformer: CoordinateTransformer,
    pub sweep: SweepConfig,
    pub limits: JointLimits,
    pub corridor: CorridorConfig,
}

/// Everything computed for one entry point. Clouds are in the robot base frame.
#[derive(Debug, Clone)]
pub struct WorkspaceReport {
    pub entry: Point,
    pub general: PointCloud,
    pub rcm: PointCloud,
    pub validation: Validation,
    pub corridor: PointCloud,
    /// Sample indices of the general and RCM sweeps that were numerically degenerate.
    pub degenerate_general: Vec<usize>,
    pub degenerate_rcm: Vec<usize>,
    /// Indices into the validated cloud skipped by the corridor builder.
    pub skipped_corridor: Vec<usize>,
    transformer: CoordinateTransformer,
}

impl WorkspacePipeline {
    /// Pipeline with default sweep, limits and corridor settings. None if the registration is singular.
    pub fn new(probe: ProbeGeometry, registration: RegistrationTransform) -> Option<Self> {
        Some(WorkspacePipeline {
            robot: KinematicsModel::new(probe),
            transformer: CoordinateTransformer::new(registration)?,
            sweep: SweepConfig::default(),
            limits: JointLimits::default(),
            corridor: CorridorConfig::default(),
        })
    }

    /// Runs all stages for the entry point given in imager coordinates. An unreachable entry
    /// point is not an error: the report has an empty validated cloud and a corridor made of the
    /// entry point only.
    pub fn run(&self, entry_imager: &Point) -> WorkspaceReport {
        let probe = *self.robot.probe();
        let entry = self.transformer.to_robot(entry_imager);
        info!("entry point {:?} (imager) is {:?} in the robot frame", entry_imager, entry);

        let sampler = WorkspaceSampler::new(&self.robot, self.sweep);
        let general = sampler.general_workspace(None);
        let rcm = sampler.rcm_workspace(None);

        let validator = EntryPointValidator::new(&self.robot, probe, self.limits);
        let validation = validator.validate(&entry, &rcm.cloud);

        let builder = CorridorMeshBuilder::new(probe, self.corridor);
        let corridor = builder.build(&entry, &validation.cloud);

        WorkspaceReport {
            entry,
            general: general.cloud,
            rcm: rcm.cloud,
            validation,
            corridor: corridor.cloud,
            degenerate_general: general.degenerate,
            degenerate_rcm: rcm.degenerate,
            skipped_corridor: corridor.skipped,
            transformer: self.transformer,
        }
    }
}

impl WorkspaceReport {
    pub fn reachable(&self) -> bool {
        self.validation.reachable()
    }

    /// Validated cloud, or [KinematicsError::EmptyValidatedWorkspace] for an unreachable entry.
    pub fn require_reachable(&self) -> Result<&PointCloud, KinematicsError> {
        self.validation.require_reachable()
    }

    /// Writes the four stage clouds in imager coordinates into `directory`, which must exist.
    pub fn export<P: AsRef<Path>>(&self, directory: P) -> io::Result<()> {
        let directory = directory.as_ref();
        let stages = [
            (GENERAL_WORKSPACE_FILE, &self.general),
            (RCM_WORKSPACE_FILE, &self.rcm),
            (VALIDATED_WORKSPACE_FILE, &self.validation.cloud),
            (CORRIDOR_FILE, &self.corridor),
        ];
        for (name, cloud) in stages {
            self.transformer.to_imager_cloud(cloud).write_to_file(directory.join(name))?;
        }
        info!("exported workspace files to {}", directory.display());
        Ok(())
    }
}
