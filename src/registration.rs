//! Registration between the imager (scanner) frame and the robot base frame.
//!
//! The registration matrix is supplied by the imaging side. Imager coordinates are brought into
//! the robot frame through its inverse, robot coordinates go out to the imager through the matrix
//! itself. Every transformed coordinate is rounded to one decimal place so that exported clouds
//! are stable across runs.

use nalgebra::{Isometry3, Matrix4, Translation3, UnitQuaternion, Vector3};
use crate::kinematic_traits::Point;
use crate::point_cloud::PointCloud;
use crate::utils::round_point;

/// 4x4 homogeneous registration matrix. Assumed rigid; this is not verified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegistrationTransform {
    pub matrix: Matrix4<f64>,
}

impl RegistrationTransform {
    pub fn identity() -> Self {
        RegistrationTransform { matrix: Matrix4::identity() }
    }

    /// Identity rotation with the given translation column.
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_isometry(&Isometry3::from_parts(
            Translation3::new(x, y, z),
            UnitQuaternion::identity(),
        ))
    }

    pub fn from_isometry(isometry: &Isometry3<f64>) -> Self {
        RegistrationTransform { matrix: isometry.to_homogeneous() }
    }

    /// Builds from 16 values in row-major order, as registration matrices are usually printed.
    pub fn from_row_slice(values: &[f64; 16]) -> Self {
        RegistrationTransform { matrix: Matrix4::from_row_slice(values) }
    }
}

impl Default for RegistrationTransform {
    fn default() -> Self {
        RegistrationTransform::identity()
    }
}

/// Applies a registration transform to points, with consistent rounding.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateTransformer {
    registration: RegistrationTransform,
    inverse: Matrix4<f64>,
}

impl CoordinateTransformer {
    /// Returns None if the registration matrix is singular.
    pub fn new(registration: RegistrationTransform) -> Option<Self> {
        let inverse = registration.matrix.try_inverse()?;
        Some(CoordinateTransformer { registration, inverse })
    }

    /// Imager frame to robot base frame, rounded to one decimal.
    pub fn to_robot(&self, imager: &Point) -> Point {
        round_point(&apply(&self.inverse, imager))
    }

    /// Robot base frame to imager frame, rounded to one decimal.
    pub fn to_imager(&self, robot: &Point) -> Point {
        round_point(&apply(&self.registration.matrix, robot))
    }

    pub fn to_imager_cloud(&self, cloud: &PointCloud) -> PointCloud {
        cloud.iter().map(|p| self.to_imager(p)).collect()
    }
}

fn apply(matrix: &Matrix4<f64>, point: &Point) -> Point {
    let homogeneous = matrix * point.to_homogeneous();
    let w = homogeneous.w;
    Point::from(Vector3::new(homogeneous.x / w, homogeneous.y / w, homogeneous.z / w))
}
