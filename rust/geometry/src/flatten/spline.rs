// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spline Reconstructor - rebuilds splines from projected control points

use super::project_point;
use crate::curve::{HermiteSpline, NurbSpline};
use crate::error::{Error, Result};
use crate::tolerance::Tolerance;
use nalgebra::Point3;

#[derive(Debug, Clone, Copy, Default)]
pub struct SplineReconstructor {
    tolerance: Tolerance,
}

impl SplineReconstructor {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    /// Project control points, dropping any within `vertex` of the last kept one
    pub fn projected_distinct(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        let mut kept: Vec<Point3<f64>> = Vec::with_capacity(points.len());
        for p in points.iter().map(project_point) {
            match kept.last() {
                Some(last) if self.tolerance.points_coincident(last, &p) => {}
                _ => kept.push(p),
            }
        }
        kept
    }

    /// Hermite spline through the distinct projected control points
    ///
    /// Fails when fewer than two distinct points survive projection.
    pub fn rebuild_hermite(&self, spline: &HermiteSpline) -> Result<HermiteSpline> {
        let points = self.projected_distinct(&spline.control_points);
        if points.len() < 2 {
            return Err(Error::SplineReconstruction(format!(
                "{} of {} control points distinct in plan",
                points.len(),
                spline.control_points.len()
            )));
        }
        HermiteSpline::new(points, spline.is_periodic)
    }

    /// NURBS with projected control points and the original degree, knots and weights
    pub fn rebuild_nurbs(&self, spline: &NurbSpline) -> Result<NurbSpline> {
        NurbSpline::new(
            spline.degree,
            spline.control_points.iter().map(project_point).collect(),
            spline.knots.clone(),
            spline.weights.clone(),
        )
    }
}
