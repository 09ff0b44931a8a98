//! Ordered point collections flowing through the workspace pipeline, and their plain text export.
//!
//! The export format has one line per point, `x y z nx ny nz`, with coordinates rounded to one
//! decimal place. Normals are not computed and are written as `0.00 0.00 0.00`, so the files can
//! be fed directly to surface reconstruction tools expecting oriented points.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use crate::kinematic_traits::Point;
use crate::utils::round_point;

/// Growable collection of points, kept in sample order. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<Point>,
}

impl PointCloud {
    pub fn new() -> Self {
        PointCloud { points: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PointCloud { points: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Checks if all coordinates of all points are finite
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(crate::utils::is_valid)
    }

    /// Writes the cloud in `x y z nx ny nz` format. Coordinates that round to zero are
    /// written as `0.0` regardless of sign.
    pub fn write_points<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for p in self.points.iter().map(round_point) {
            writeln!(out, "{:.1} {:.1} {:.1} 0.00 0.00 0.00", p.x, p.y, p.z)?;
        }
        Ok(())
    }

    /// Writes the cloud to the given file, replacing it if it exists.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_points(&mut out)?;
        out.flush()
    }
}

impl From<Vec<Point>> for PointCloud {
    fn from(points: Vec<Point>) -> Self {
        PointCloud { points }
    }
}

impl FromIterator<Point> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        PointCloud { points: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
