//! Positioning state
//!
//! Modal five-axis position plus extruder, and the coordinate transformer that
//! applies one line's parameters to it.

use nalgebra::Vector3;

use crate::config::ParserConfig;
use crate::error::{GcodeError, Result};
use crate::geometry::rotation::{cone_axis, rotate_about};
use crate::model::Point;
use crate::parser::{Channel, Letter, Parameter};

#[derive(Debug, Clone, PartialEq)]
pub struct ParserState {
    x: f64,
    y: f64,
    z: f64,
    a: f64,
    b: f64,
    e: f64,
    /// Last resolved `U` value
    u: f64,
    abs_mode: bool,
    current_layer: i64,
    pivot: Vector3<f64>,
    incline_axis: Vector3<f64>,
    channel: Channel,
}

impl ParserState {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            a: 0.0,
            b: 0.0,
            e: 0.0,
            u: 0.0,
            abs_mode: config.abs_mode_initial,
            current_layer: 0,
            pivot: config.pivot(),
            incline_axis: Vector3::z(),
            channel: Channel::default(),
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Current incline and bed angles, as `(a, b)`
    pub fn angles(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    /// Modal `U` angle in degrees, accumulated in relative mode
    pub fn rotary_angle(&self) -> f64 {
        self.u
    }

    pub fn extrusion(&self) -> f64 {
        self.e
    }

    pub fn is_absolute(&self) -> bool {
        self.abs_mode
    }

    pub fn current_layer(&self) -> i64 {
        self.current_layer
    }

    pub fn pivot(&self) -> Vector3<f64> {
        self.pivot
    }

    /// Axis `U` rotations turn about
    pub fn incline_axis(&self) -> Vector3<f64> {
        self.incline_axis
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Snapshot of the modal position as a path point
    pub fn modal_point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
            z: self.z,
            a: self.a,
            b: self.b,
        }
    }

    pub(crate) fn set_absolute(&mut self, abs_mode: bool) {
        self.abs_mode = abs_mode;
    }

    pub(crate) fn set_layer(&mut self, layer: i64) {
        self.current_layer = layer;
    }

    pub(crate) fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    /// Record a new incline; the cone axis follows it
    pub(crate) fn set_incline(&mut self, x_rot: f64) {
        self.a = x_rot;
        self.incline_axis = cone_axis(x_rot);
    }

    pub(crate) fn set_bed_angle(&mut self, z_rot: f64) {
        self.b = z_rot;
    }

    /// Apply the parameters of one motion line.
    ///
    /// Plain coordinates are applied first, in line order. A `U` value then
    /// turns the resulting `(X, Y, Z)` by `-U` degrees about the cone axis
    /// through the pivot; `Y` carries the radial distance at that point. In
    /// absolute mode the line's `U` is the full angle, in relative mode it is
    /// the increment. An `A` word moves the cone axis before `U` is applied.
    /// `V` never moves the head. Nothing is modified when an
    /// error is returned.
    pub(crate) fn apply(&mut self, params: &[Parameter<'_>], line: usize) -> Result<()> {
        let mut next = self.clone();
        let mut turn: Option<(f64, &str)> = None;
        let mut inclined = false;

        for param in params {
            let value = param.number(line)?;
            let slot = match param.letter {
                Letter::X => &mut next.x,
                Letter::Y => &mut next.y,
                Letter::Z => &mut next.z,
                Letter::A => {
                    inclined = true;
                    &mut next.a
                }
                Letter::B => &mut next.b,
                Letter::E => &mut next.e,
                Letter::U => {
                    let angle = match turn {
                        Some((prev, _)) if !self.abs_mode => prev + value,
                        _ => value,
                    };
                    turn = Some((angle, param.raw));
                    continue;
                }
                Letter::V => continue,
            };

            *slot = if self.abs_mode { value } else { *slot + value };
            if !slot.is_finite() {
                return Err(non_finite(line, param.raw));
            }
        }

        if inclined {
            next.incline_axis = cone_axis(next.a);
        }

        if let Some((angle, raw)) = turn {
            next.u = if self.abs_mode { angle } else { self.u + angle };
            if !next.u.is_finite() {
                return Err(non_finite(line, raw));
            }

            let turned = rotate_about(
                &next.position(),
                &next.incline_axis,
                -angle.to_radians(),
                &next.pivot,
            )?;
            if !turned.iter().all(|v| v.is_finite()) {
                return Err(non_finite(line, raw));
            }
            next.x = turned.x;
            next.y = turned.y;
            next.z = turned.z;
        }

        *self = next;
        Ok(())
    }
}

fn non_finite(line: usize, token: &str) -> GcodeError {
    GcodeError::NonFinite {
        line,
        token: token.to_string(),
    }
}
