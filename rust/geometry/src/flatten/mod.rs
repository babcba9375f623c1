// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curve Flattener - projects 3D curves onto the z = 0 plan plane
//!
//! Each curve kind is rebuilt as the same (or a simpler) kind lying in the
//! plan plane:
//!
//! - `spline`: Hermite and NURBS reconstruction from projected control points
//! - `tessellate`: sampled polyline fallback used whenever a rebuild fails
//!
//! `try_flatten` reports failures as errors; `flatten` turns every error into
//! the tessellation fallback and every empty result into `None`.

mod spline;
mod tessellate;


pub use spline::SplineReconstructor;
pub use tessellate::tessellate_to_plan;

use crate::curve::{Arc, Curve, Ellipse, LineSegment};
use crate::error::{Error, Result};
use crate::tolerance::Tolerance;
use nalgebra::{Point3, Vector3};
use smallvec::{smallvec, SmallVec};

/// Flattening output; nearly every curve flattens to exactly one curve
pub type FlatCurves = SmallVec<[Curve; 1]>;

/// Drop the z coordinate
#[inline]
pub fn project_point(p: &Point3<f64>) -> Point3<f64> {
    Point3::new(p.x, p.y, 0.0)
}

#[inline]
pub fn project_vector(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, v.y, 0.0)
}

/// Converts curves of any kind into plan curves
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveFlattener {
    tolerance: Tolerance,
    splines: SplineReconstructor,
}

impl CurveFlattener {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            splines: SplineReconstructor::new(tolerance),
        }
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Flatten a curve, falling back to tessellation on any failure
    ///
    /// Returns `None` when nothing non-degenerate survives.
    pub fn flatten(&self, curve: &Curve) -> Option<FlatCurves> {
        let flat = match self.try_flatten(curve) {
            Ok(flat) => flat,
            Err(err) => {
                tracing::debug!(kind = curve.kind(), error = %err, "flattening fell back to tessellation");
                tessellate_to_plan(curve, &self.tolerance)
            }
        };
        if flat.is_empty() {
            None
        } else {
            Some(flat)
        }
    }

    /// Flatten without the fallback
    ///
    /// `Ok` with no curves means the curve is degenerate in plan.
    pub fn try_flatten(&self, curve: &Curve) -> Result<FlatCurves> {
        curve.validate()?;
        match curve {
            Curve::Line(line) => Ok(self.flatten_line(line).into_iter().collect()),
            Curve::Arc(arc) => Ok(self.flatten_arc(arc)?.into_iter().collect()),
            Curve::Ellipse(ellipse) => Ok(self.flatten_ellipse(ellipse)?.into_iter().collect()),
            Curve::Hermite(spline) => Ok(smallvec![Curve::Hermite(self.splines.rebuild_hermite(spline)?)]),
            Curve::Nurbs(spline) => Ok(smallvec![Curve::Nurbs(self.splines.rebuild_nurbs(spline)?)]),
            // No planar counterpart
            Curve::Helix(_) => Ok(tessellate_to_plan(curve, &self.tolerance)),
        }
    }

    fn flatten_line(&self, line: &LineSegment) -> Option<Curve> {
        let start = project_point(&line.start);
        let end = project_point(&line.end);
        if self.tolerance.points_coincident(&start, &end) {
            return None;
        }
        Some(Curve::line(start, end))
    }

    fn flatten_arc(&self, arc: &Arc) -> Result<Option<Curve>> {
        let start = project_point(&arc.point_at(0.0));
        let mid = project_point(&arc.point_at(0.5));
        let end = project_point(&arc.point_at(1.0));

        if self.tolerance.points_coincident(&start, &end) {
            // Closed in plan: a full circle, possibly seen edge-on
            if arc.radius < self.tolerance.vertex {
                return Ok(None);
            }
            let circle = Arc::full_circle(
                project_point(&arc.center),
                arc.radius,
                Vector3::x(),
                Vector3::y(),
            );
            return Ok(Some(Curve::Arc(circle)));
        }

        Ok(Some(Curve::Arc(Arc::through_points(start, mid, end)?)))
    }

    fn flatten_ellipse(&self, ellipse: &Ellipse) -> Result<Option<Curve>> {
        if ellipse.radius_x.max(ellipse.radius_y) < self.tolerance.vertex {
            return Ok(None);
        }
        let x_axis = project_vector(&ellipse.x_axis)
            .try_normalize(f64::EPSILON)
            .ok_or(Error::NonPlanarAxes)?;
        let mut y_axis = Vector3::z().cross(&x_axis);
        // Keep the sweep direction seen from above
        if project_vector(&ellipse.y_axis).dot(&y_axis) < 0.0 {
            y_axis = -y_axis;
        }

        Ok(Some(Curve::Ellipse(Ellipse {
            center: project_point(&ellipse.center),
            x_axis,
            y_axis,
            ..*ellipse
        })))
    }
}
