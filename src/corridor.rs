//! Expands validated RCM points into the insertion corridor: for every RCM point, the segment
//! from the entry point through the RCM up to the maximal probe reach beyond it.

use crate::kinematic_traits::Point;
use crate::kinematics_error::KinematicsError;
use crate::parameters::{ProbeGeometry, PROBE_INSERTION_MAX};
use crate::point_cloud::PointCloud;
use nalgebra::Vector3;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorridorConfig {
    /// Points emitted per validated RCM point.
    pub density: usize,

    /// Maximal probe insertion, mm.
    pub max_insertion: f64,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        CorridorConfig {
            density: 5,
            max_insertion: PROBE_INSERTION_MAX,
        }
    }
}

/// Corridor cloud and the indices of validated points that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct Corridor {
    pub cloud: PointCloud,
    pub skipped: Vec<usize>,
}

/// Intersections of the line `origin + t * direction` with the sphere, as parameters `t`
/// (smaller first). None if the line misses the sphere or the direction is zero.
pub fn line_sphere_intersection(
    origin: &Point,
    direction: &Vector3<f64>,
    center: &Point,
    radius: f64,
) -> Option<(f64, f64)> {
    let a = direction.dot(direction);
    if a <= f64::EPSILON {
        return None;
    }
    let to_origin = origin - center;
    let b = 2.0 * direction.dot(&to_origin);
    let c = to_origin.dot(&to_origin) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    Some(((-b - root) / (2.0 * a), (-b + root) / (2.0 * a)))
}

pub struct CorridorMeshBuilder {
    probe: ProbeGeometry,
    config: CorridorConfig,
}

impl CorridorMeshBuilder {
    pub fn new(probe: ProbeGeometry, config: CorridorConfig) -> Self {
        CorridorMeshBuilder { probe, config }
    }

    /// Radius of the reach sphere around each RCM point.
    pub fn reach(&self) -> f64 {
        self.config.max_insertion + self.probe.rcm_to_treatment()
    }

    /// End of the corridor segment for one RCM point: the intersection of the entry-RCM line with
    /// the reach sphere that lies farther from the entry.
    pub fn terminal_point(
        &self,
        entry: &Point,
        rcm: &Point,
        index: usize,
    ) -> Result<Point, KinematicsError> {
        let direction = rcm - entry;
        let (t1, t2) = line_sphere_intersection(entry, &direction, rcm, self.reach())
            .ok_or(KinematicsError::GeometryInconsistency { index })?;
        let p1 = entry + direction * t1;
        let p2 = entry + direction * t2;
        if (p1 - entry).norm() > (p2 - entry).norm() {
            Ok(p1)
        } else {
            Ok(p2)
        }
    }

    /// Builds the corridor cloud: `density` evenly spaced points per validated RCM point, from the
    /// entry (exclusive) to the terminal point (inclusive), then the entry point once. Points with
    /// inconsistent geometry are logged and skipped.
    pub fn build(&self, entry: &Point, validated: &PointCloud) -> Corridor {
        let n = self.config.density;
        let mut corridor = Corridor {
            cloud: PointCloud::with_capacity(validated.len() * n + 1),
            skipped: Vec::new(),
        };
        for (index, rcm) in validated.iter().enumerate() {
            match self.terminal_point(entry, rcm, index) {
                Ok(terminal) => {
                    let segment = terminal - entry;
                    for k in 1..=n {
                        corridor.cloud.push(entry + segment * (k as f64 / n as f64));
                    }
                }
                Err(error) => {
                    warn!("{}: skipping {:?}", error, rcm);
                    corridor.skipped.push(index);
                }
            }
        }
        corridor.cloud.push(*entry);
        info!(
            "corridor: {} points from {} RCM points, {} skipped",
            corridor.cloud.len(),
            validated.len(),
            corridor.skipped.len()
        );
        corridor
    }
}
