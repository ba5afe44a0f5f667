//! Geometry Projector
//!
//! Places the raw machine-frame points of each layer into the world frame for
//! a given displayed rotation.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{GcodeError, Result};
use crate::geometry::rotation::layer_transform;
use crate::model::{ParseResult, Point, Rotation};

/// Incline differences below this are treated as equal
const INCLINE_EPSILON: f64 = 1e-9;

/// Read-only view over a [`ParseResult`] that answers transform queries
#[derive(Debug, Clone, Copy)]
pub struct Projector<'a> {
    result: &'a ParseResult,
}

impl<'a> Projector<'a> {
    pub fn new(result: &'a ParseResult) -> Self {
        Self { result }
    }

    /// Rotation the points of `layer` were emitted under
    pub fn layer_rotation(&self, layer: usize) -> Result<Rotation> {
        let index = self
            .result
            .lays2rots()
            .get(layer)
            .copied()
            .ok_or_else(|| GcodeError::InvalidState(format!("no layer {}", layer)))?;
        self.rotation(index)
    }

    /// Matrix for all points of `layer` while rotation `active` is displayed
    pub fn layer_matrix(&self, layer: usize, active: usize) -> Result<Matrix4<f64>> {
        let from = self.layer_rotation(layer)?;
        let to = self.rotation(active)?;
        Ok(layer_transform(&from, &to))
    }

    /// Whether `point` was emitted under an incline other than its layer's
    pub fn needs_point_transform(&self, layer: usize, point: &Point) -> Result<bool> {
        let from = self.layer_rotation(layer)?;
        Ok((point.a - from.x_rot).abs() > INCLINE_EPSILON)
    }

    /// Matrix for a single point of `layer`.
    ///
    /// Equal to [`Projector::layer_matrix`] unless the point carries its own
    /// incline, in which case that incline replaces the layer's.
    pub fn point_matrix(&self, layer: usize, point: &Point, active: usize) -> Result<Matrix4<f64>> {
        let mut from = self.layer_rotation(layer)?;
        if (point.a - from.x_rot).abs() > INCLINE_EPSILON {
            from.x_rot = point.a;
        }
        let to = self.rotation(active)?;
        Ok(layer_transform(&from, &to))
    }

    /// World-frame coordinates of every path of `layer`
    pub fn project_layer(&self, layer: usize, active: usize) -> Result<Vec<Vec<Vector3<f64>>>> {
        let paths = self
            .result
            .layers()
            .get(layer)
            .ok_or_else(|| GcodeError::InvalidState(format!("no layer {}", layer)))?
            .paths();
        let layer_matrix = self.layer_matrix(layer, active)?;

        let mut projected = Vec::with_capacity(paths.len());
        for path in paths {
            let mut world = Vec::with_capacity(path.len());
            for point in path.points() {
                let m = if self.needs_point_transform(layer, point)? {
                    self.point_matrix(layer, point, active)?
                } else {
                    layer_matrix
                };
                world.push(m.transform_point(&Point3::from(point.position())).coords);
            }
            projected.push(world);
        }

        Ok(projected)
    }

    fn rotation(&self, index: usize) -> Result<Rotation> {
        self.result
            .rotations()
            .get(index)
            .copied()
            .ok_or_else(|| GcodeError::InvalidState(format!("no rotation {}", index)))
    }
}
