//! Rotation algebra
//!
//! Angles are degrees at every public boundary that deals with machine
//! rotations ([`cone_axis`], [`layer_transform`]); the raw matrix helpers take
//! radians.

use nalgebra::{Matrix3, Matrix4, Rotation3, Vector3};

use crate::error::{GcodeError, Result};
use crate::model::Rotation;

/// Counter-clockwise rotation of `theta` radians about `axis`.
///
/// The axis does not need to be normalized. Built with the Rodrigues form
/// `I + sin(θ)K + (1 - cos(θ))K²` where `K` is the cross-product matrix of the
/// unit axis.
pub fn axis_angle_matrix(axis: &Vector3<f64>, theta: f64) -> Result<Matrix3<f64>> {
    let norm = axis.norm();
    if norm == 0.0 || !norm.is_finite() {
        return Err(GcodeError::ZeroAxis);
    }

    let k = (axis / norm).cross_matrix();
    Ok(Matrix3::identity() + k * theta.sin() + k * k * (1.0 - theta.cos()))
}

/// Rotate `point` about the line through `pivot` with direction `axis`
pub fn rotate_about(
    point: &Vector3<f64>,
    axis: &Vector3<f64>,
    theta: f64,
    pivot: &Vector3<f64>,
) -> Result<Vector3<f64>> {
    let m = axis_angle_matrix(axis, theta)?;
    Ok(m * (point - pivot) + pivot)
}

/// Rotary-bed axis for a bed inclined by `incline_deg` about machine X
pub fn cone_axis(incline_deg: f64) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), incline_deg.to_radians()) * Vector3::z()
}

/// Affine that moves a point emitted under `from` to where it sits while the
/// bed is at `to`.
///
/// Applied right to left: undo the incline of `from`, undo its bed angle,
/// apply the bed angle of `to`, apply its incline. Every step rotates about
/// the machine origin.
pub fn layer_transform(from: &Rotation, to: &Rotation) -> Matrix4<f64> {
    let about_x = |deg: f64| Rotation3::from_axis_angle(&Vector3::x_axis(), deg.to_radians());
    let about_z = |deg: f64| Rotation3::from_axis_angle(&Vector3::z_axis(), deg.to_radians());

    let composed =
        about_x(to.x_rot) * about_z(to.z_rot) * about_z(-from.z_rot) * about_x(-from.x_rot);
    composed.to_homogeneous()
}
