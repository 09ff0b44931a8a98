//! Error types of the kinematic core.

use thiserror::Error;

/// Conditions reported by kinematics, workspace sampling, validation and corridor construction.
/// None of them aborts a sweep; they are either logged and skipped or returned as a normal
/// negative result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Forward kinematics produced NaN for the sample with this index.
    #[error("forward kinematics is degenerate at sample {sample}")]
    NumericalDegeneracy { sample: usize },

    /// Inverse kinematics has no real solution for the entry/target pair.
    #[error("target is unreachable: {0}")]
    Unreachable(String),

    /// No RCM point of the sampled workspace can be reached from the entry point.
    #[error("entry point is not reachable")]
    EmptyValidatedWorkspace,

    /// Line/sphere intersection of the corridor has no real roots for the given RCM point.
    #[error("corridor geometry is inconsistent for RCM point {index}")]
    GeometryInconsistency { index: usize },
}

/// Result type for the kinematic core.
pub type Result<T> = std::result::Result<T, KinematicsError>;
