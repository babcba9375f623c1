// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{project_point, FlatCurves};
use crate::curve::Curve;
use crate::tolerance::Tolerance;
use nalgebra::Point3;

/// Sample a curve, project the samples and join them with plan segments
///
/// Adjacent samples closer than `vertex` collapse into one, so no emitted
/// segment is degenerate. Fewer than two distinct samples yields nothing.
pub fn tessellate_to_plan(curve: &Curve, tol: &Tolerance) -> FlatCurves {
    if curve.validate().is_err() {
        return FlatCurves::new();
    }

    let mut points: Vec<Point3<f64>> = Vec::new();
    for p in curve.tessellate(tol).iter().map(project_point) {
        if !(p.x.is_finite() && p.y.is_finite()) {
            continue;
        }
        match points.last() {
            Some(last) if tol.points_coincident(last, &p) => {}
            _ => points.push(p),
        }
    }

    points
        .windows(2)
        .map(|w| Curve::line(w[0], w[1]))
        .collect()
}
