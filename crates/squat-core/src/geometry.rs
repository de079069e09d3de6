//! Geometric utilities for joint-angle computations.

use nalgebra::{Point2, Vector2};
use ndarray::{Array1, ArrayView1, ArrayView2, Zip};

use crate::error::{Error, Result};

/// Default guard added to the magnitude product before dividing
pub const DEFAULT_ANGLE_EPSILON: f64 = 1e-6;

/// Angle at vertex `b` formed by `a` and `c`, in degrees within `[0, 180]`.
///
/// Coincident points do not fail: the epsilon guard yields a finite angle
/// (90° when either limb vector is zero).
pub fn angle_at_vertex(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>, epsilon: f64) -> f64 {
    let v1: Vector2<f64> = a - b;
    let v2: Vector2<f64> = c - b;
    let cos = v1.dot(&v2) / (v1.norm() * v2.norm() + epsilon);
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Per-frame angle at vertex series `b` for three `(frames, 2)` point series.
pub fn joint_angles(
    a: ArrayView2<'_, f64>,
    b: ArrayView2<'_, f64>,
    c: ArrayView2<'_, f64>,
    epsilon: f64,
) -> Result<Array1<f64>> {
    for (name, dim) in [("first arm", a.dim()), ("second arm", c.dim())] {
        if dim != b.dim() {
            return Err(Error::input_shape(
                format!("joint angle {name}"),
                format!("{:?}", b.dim()),
                format!("{dim:?}"),
            ));
        }
    }
    if b.ncols() != 2 {
        return Err(Error::input_shape(
            "joint angle vertex",
            "2 columns",
            format!("{} columns", b.ncols()),
        ));
    }

    Ok(Zip::from(a.rows())
        .and(b.rows())
        .and(c.rows())
        .map_collect(|a, b, c| angle_at_vertex(&to_point(a), &to_point(b), &to_point(c), epsilon)))
}

fn to_point(row: ArrayView1<'_, f64>) -> Point2<f64> {
    Point2::new(row[0], row[1])
}
