//! Layer Model
//!
//! Layer-indexed path model produced by the parser. All collections are
//! append-only while parsing and read-only once a [`ParseResult`] is returned.

pub mod assembler;
pub mod state;

pub use assembler::{Flow, Parser};
pub use state::ParserState;

use nalgebra::Vector3;
use serde::Serialize;

/// Bed orientation in degrees: incline about machine X, rotary angle about Z
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rotation {
    pub x_rot: f64,
    pub z_rot: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        x_rot: 0.0,
        z_rot: 0.0,
    };

    pub fn new(x_rot: f64, z_rot: f64) -> Self {
        Self { x_rot, z_rot }
    }
}

/// Endpoint of one motion.
///
/// `a` and `b` are the incline and bed angles that were active when the point
/// was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub a: f64,
    pub b: f64,
}

impl Point {
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// A contiguous run of motions, always at least two points long
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    /// Wrap `points`, or hand them back if there are fewer than two
    pub(crate) fn new(points: Vec<Point>) -> Result<Self, Vec<Point>> {
        if points.len() >= 2 {
            Ok(Self { points })
        } else {
            Err(points)
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Paths flushed together under one `LAYER:` number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    number: i64,
    paths: Vec<Path>,
}

impl Layer {
    pub(crate) fn new(number: i64, paths: Vec<Path>) -> Self {
        Self { number, paths }
    }

    /// Number of the `LAYER:` marker this layer was printed under
    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }
}

/// Metadata the slicer writes into comments
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Telemetry {
    /// Estimated print time in seconds
    pub print_time: Option<f64>,
    /// Estimated filament consumption in millimeters
    pub consumption: Option<f64>,
}

/// Axis-aligned box around a set of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

/// Immutable output of a parse
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    layers: Vec<Layer>,
    rotations: Vec<Rotation>,
    lays2rots: Vec<usize>,
    final_rotation: usize,
    telemetry: Telemetry,
}

impl ParseResult {
    pub(crate) fn new(
        layers: Vec<Layer>,
        rotations: Vec<Rotation>,
        lays2rots: Vec<usize>,
        telemetry: Telemetry,
    ) -> Self {
        let final_rotation = rotations.len().saturating_sub(1);
        Self {
            layers,
            rotations,
            lays2rots,
            final_rotation,
            telemetry,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Rotation table; entry 0 is always the identity
    pub fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }

    /// Index into [`ParseResult::rotations`] for every layer
    pub fn lays2rots(&self) -> &[usize] {
        &self.lays2rots
    }

    pub fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    /// Rotation index in effect once the whole program has run
    pub fn final_rotation_index(&self) -> usize {
        self.final_rotation
    }

    pub fn final_rotation(&self) -> Rotation {
        self.rotations
            .get(self.final_rotation)
            .copied()
            .unwrap_or(Rotation::IDENTITY)
    }

    /// Rotation index for layer `i`, where `i == layers().len()` means "after
    /// the last layer"
    pub fn rotation_index_at(&self, i: usize) -> Option<usize> {
        if i == self.lays2rots.len() {
            Some(self.final_rotation)
        } else {
            self.lays2rots.get(i).copied()
        }
    }

    pub fn path_count(&self) -> usize {
        self.layers.iter().map(|l| l.paths.len()).sum()
    }

    pub fn point_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| l.paths.iter())
            .map(Path::len)
            .sum()
    }

    /// Bounding box of all raw machine-frame points
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self
            .layers
            .iter()
            .flat_map(|l| l.paths.iter())
            .flat_map(|p| p.points.iter());

        let first = points.next()?;
        let mut bounds = Bounds {
            min: [first.x, first.y, first.z],
            max: [first.x, first.y, first.z],
        };
        for p in points {
            for (axis, v) in [p.x, p.y, p.z].into_iter().enumerate() {
                bounds.min[axis] = bounds.min[axis].min(v);
                bounds.max[axis] = bounds.max[axis].max(v);
            }
        }

        Some(bounds)
    }
}
