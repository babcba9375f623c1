// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curve definitions and evaluation
//!
//! Every curve kind can be evaluated on a normalized parameter `t` in
//! `[0, 1]`, which is all tessellation, loop closure and loop length need.

use crate::error::{Error, Result};
use crate::tolerance::Tolerance;
use crate::transform::Transform;
use nalgebra::{Point3, Vector3};
use std::f64::consts::TAU;

/// Bounded straight segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl LineSegment {
    #[inline]
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end, `None` for a zero-length segment
    pub fn direction(&self) -> Option<Vector3<f64>> {
        (self.end - self.start).try_normalize(f64::EPSILON)
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.start + (self.end - self.start) * t
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            start: transform.apply_point(&self.start),
            end: transform.apply_point(&self.end),
        }
    }
}

/// Circular arc in an arbitrary plane
///
/// Angles are measured from `x_axis` towards `y_axis`; the arc runs from
/// `start_angle` to `end_angle` with `end_angle > start_angle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point3<f64>,
    pub radius: f64,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    /// Arc through three points, running from `start` via `mid` to `end`
    ///
    /// Fails when the points are collinear or coincident.
    pub fn through_points(
        start: Point3<f64>,
        mid: Point3<f64>,
        end: Point3<f64>,
    ) -> Result<Self> {
        let u = mid - start;
        let v = end - start;
        let w = u.cross(&v);
        let w_sq = w.norm_squared();
        if w_sq < 1e-18 {
            return Err(Error::degenerate("arc points are collinear"));
        }

        // Circumcenter of the triangle (start, mid, end)
        let offset = (v.cross(&w) * u.norm_squared() + w.cross(&u) * v.norm_squared()) / (2.0 * w_sq);
        let center = start + offset;
        let radius = offset.norm();

        // Normal (mid - start) x (end - start) orders the points counter-clockwise
        let normal = w / w_sq.sqrt();
        let x_axis = (start - center) / radius;
        let y_axis = normal.cross(&x_axis);

        let angle_of = |p: &Point3<f64>| {
            let d = p - center;
            let a = d.dot(&y_axis).atan2(d.dot(&x_axis));
            if a <= 0.0 {
                a + TAU
            } else {
                a
            }
        };

        Ok(Self {
            center,
            radius,
            x_axis,
            y_axis,
            start_angle: 0.0,
            end_angle: angle_of(&end),
        })
    }

    /// Closed circle in the plane spanned by `x_axis` and `y_axis`
    pub fn full_circle(
        center: Point3<f64>,
        radius: f64,
        x_axis: Vector3<f64>,
        y_axis: Vector3<f64>,
    ) -> Self {
        Self {
            center,
            radius,
            x_axis,
            y_axis,
            start_angle: 0.0,
            end_angle: TAU,
        }
    }

    #[inline]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn is_full_circle(&self) -> bool {
        (self.sweep() - TAU).abs() < 1e-9
    }

    pub fn point_at_angle(&self, angle: f64) -> Point3<f64> {
        self.center + (self.x_axis * angle.cos() + self.y_axis * angle.sin()) * self.radius
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.point_at_angle(self.start_angle + self.sweep() * t)
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.x_axis.cross(&self.y_axis)
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep()
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        let x = transform.apply_vector(&self.x_axis);
        let y = transform.apply_vector(&self.y_axis);
        let scale = x.norm();
        Self {
            center: transform.apply_point(&self.center),
            radius: self.radius * scale,
            x_axis: x / scale,
            y_axis: y / y.norm(),
            start_angle: self.start_angle,
            end_angle: self.end_angle,
        }
    }
}

/// Elliptical arc, parameterized by angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: Point3<f64>,
    pub radius_x: f64,
    pub radius_y: f64,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub param_start: f64,
    pub param_end: f64,
}

impl Ellipse {
    pub fn point_at_param(&self, param: f64) -> Point3<f64> {
        self.center
            + self.x_axis * (self.radius_x * param.cos())
            + self.y_axis * (self.radius_y * param.sin())
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.point_at_param(self.param_start + (self.param_end - self.param_start) * t)
    }

    pub fn is_closed(&self) -> bool {
        ((self.param_end - self.param_start).abs() - TAU).abs() < 1e-9
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        let x = transform.apply_vector(&self.x_axis);
        let y = transform.apply_vector(&self.y_axis);
        let (sx, sy) = (x.norm(), y.norm());
        Self {
            center: transform.apply_point(&self.center),
            radius_x: self.radius_x * sx,
            radius_y: self.radius_y * sy,
            x_axis: x / sx,
            y_axis: y / sy,
            param_start: self.param_start,
            param_end: self.param_end,
        }
    }
}

/// Interpolating cubic Hermite spline through its control points
///
/// Tangents are derived Catmull-Rom style from neighbouring points. A
/// periodic spline adds a closing span from the last point back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct HermiteSpline {
    pub control_points: Vec<Point3<f64>>,
    pub is_periodic: bool,
}

impl HermiteSpline {
    pub fn new(control_points: Vec<Point3<f64>>, is_periodic: bool) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(Error::SplineReconstruction(format!(
                "Hermite spline needs at least 2 points, got {}",
                control_points.len()
            )));
        }
        Ok(Self {
            control_points,
            is_periodic,
        })
    }

    fn span_count(&self) -> usize {
        let n = self.control_points.len();
        if self.is_periodic {
            n
        } else {
            n - 1
        }
    }

    fn tangent(&self, i: usize) -> Vector3<f64> {
        let pts = &self.control_points;
        let n = pts.len();
        if self.is_periodic {
            (pts[(i + 1) % n] - pts[(i + n - 1) % n]) * 0.5
        } else if i == 0 {
            pts[1] - pts[0]
        } else if i == n - 1 {
            pts[n - 1] - pts[n - 2]
        } else {
            (pts[i + 1] - pts[i - 1]) * 0.5
        }
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        let n = self.control_points.len();
        if n < 2 {
            return self.control_points.first().copied().unwrap_or_else(Point3::origin);
        }
        let spans = self.span_count();
        let scaled = t.clamp(0.0, 1.0) * spans as f64;
        let i = (scaled.floor() as usize).min(spans - 1);
        let s = scaled - i as f64;

        let p0 = self.control_points[i];
        let p1 = self.control_points[(i + 1) % n];
        let m0 = self.tangent(i);
        let m1 = self.tangent((i + 1) % n);

        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        Point3::from(p0.coords * h00 + m0 * h10 + p1.coords * h01 + m1 * h11)
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            control_points: self
                .control_points
                .iter()
                .map(|p| transform.apply_point(p))
                .collect(),
            is_periodic: self.is_periodic,
        }
    }
}

/// Non-uniform rational B-spline
#[derive(Debug, Clone, PartialEq)]
pub struct NurbSpline {
    pub degree: usize,
    pub control_points: Vec<Point3<f64>>,
    /// Knot vector, `control_points.len() + degree + 1` entries
    pub knots: Vec<f64>,
    /// One weight per control point; empty means non-rational
    pub weights: Vec<f64>,
}

impl NurbSpline {
    /// Validate and build a NURBS curve
    pub fn new(
        degree: usize,
        control_points: Vec<Point3<f64>>,
        knots: Vec<f64>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        check_nurbs(degree, &control_points, &knots, &weights)?;
        Ok(Self {
            degree,
            control_points,
            knots,
            weights,
        })
    }

    /// Re-run construction checks on a value built field by field
    pub fn validate(&self) -> Result<()> {
        check_nurbs(self.degree, &self.control_points, &self.knots, &self.weights)
    }

    fn weight(&self, i: usize) -> f64 {
        if self.weights.is_empty() {
            1.0
        } else {
            self.weights[i]
        }
    }

    /// Parameter domain `[t_min, t_max]`
    pub fn domain(&self) -> (f64, f64) {
        (
            self.knots[self.degree],
            self.knots[self.knots.len() - self.degree - 1],
        )
    }

    fn find_span(&self, t: f64) -> usize {
        let n = self.control_points.len() - 1;
        let p = self.degree;

        if t >= self.knots[n + 1] {
            return n;
        }
        if t <= self.knots[p] {
            return p;
        }

        let mut low = p;
        let mut high = n + 1;
        let mut mid = (low + high) / 2;
        while t < self.knots[mid] || t >= self.knots[mid + 1] {
            if t < self.knots[mid] {
                high = mid;
            } else {
                low = mid;
            }
            mid = (low + high) / 2;
        }
        mid
    }

    fn basis_functions(&self, span: usize, t: f64) -> Vec<f64> {
        let p = self.degree;
        let mut n_vals = vec![0.0; p + 1];
        let mut left = vec![0.0; p + 1];
        let mut right = vec![0.0; p + 1];

        n_vals[0] = 1.0;
        for j in 1..=p {
            left[j] = t - self.knots[span + 1 - j];
            right[j] = self.knots[span + j] - t;
            let mut saved = 0.0;
            for r in 0..j {
                let denom = right[r + 1] + left[j - r];
                let temp = if denom.abs() < f64::EPSILON {
                    0.0
                } else {
                    n_vals[r] / denom
                };
                n_vals[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            n_vals[j] = saved;
        }
        n_vals
    }

    /// Evaluate at a raw knot-space parameter
    pub fn evaluate(&self, t: f64) -> Point3<f64> {
        let span = self.find_span(t);
        let basis = self.basis_functions(span, t);
        let p = self.degree;

        let mut acc = Vector3::zeros();
        let mut w_sum = 0.0;
        for (i, b) in basis.iter().enumerate() {
            let idx = span - p + i;
            let bw = b * self.weight(idx);
            acc += self.control_points[idx].coords * bw;
            w_sum += bw;
        }
        if w_sum.abs() < f64::EPSILON {
            return self.control_points[span];
        }
        Point3::from(acc / w_sum)
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        let (t0, t1) = self.domain();
        self.evaluate(t0 + (t1 - t0) * t.clamp(0.0, 1.0))
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            degree: self.degree,
            control_points: self
                .control_points
                .iter()
                .map(|p| transform.apply_point(p))
                .collect(),
            knots: self.knots.clone(),
            weights: self.weights.clone(),
        }
    }
}

fn check_nurbs(
    degree: usize,
    control_points: &[Point3<f64>],
    knots: &[f64],
    weights: &[f64],
) -> Result<()> {
    let n = control_points.len();
    if degree == 0 {
        return Err(Error::SplineReconstruction("degree must be at least 1".into()));
    }
    if n < degree + 1 {
        return Err(Error::SplineReconstruction(format!(
            "degree {} needs at least {} control points, got {}",
            degree,
            degree + 1,
            n
        )));
    }
    if knots.len() != n + degree + 1 {
        return Err(Error::SplineReconstruction(format!(
            "expected {} knots, got {}",
            n + degree + 1,
            knots.len()
        )));
    }
    if knots.windows(2).any(|w| w[1] < w[0]) || knots.iter().any(|k| !k.is_finite()) {
        return Err(Error::SplineReconstruction("knot vector must be finite and non-decreasing".into()));
    }
    if knots[n] - knots[degree] <= 0.0 {
        return Err(Error::SplineReconstruction("empty parameter domain".into()));
    }
    if !weights.is_empty() {
        if weights.len() != n {
            return Err(Error::SplineReconstruction(format!(
                "expected {} weights, got {}",
                n,
                weights.len()
            )));
        }
        if weights.iter().any(|w| !(w.is_finite() && *w > 0.0)) {
            return Err(Error::SplineReconstruction("weights must be positive".into()));
        }
    }
    Ok(())
}

/// Circular helix around `axis`, starting on `x_axis`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helix {
    pub base: Point3<f64>,
    pub axis: Vector3<f64>,
    pub x_axis: Vector3<f64>,
    pub radius: f64,
    /// Rise along `axis` per full turn
    pub pitch: f64,
    /// Total swept angle in radians
    pub sweep: f64,
}

impl Helix {
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        let angle = self.sweep * t;
        let y_axis = self.axis.cross(&self.x_axis);
        self.base
            + (self.x_axis * angle.cos() + y_axis * angle.sin()) * self.radius
            + self.axis * (self.pitch * angle / TAU)
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            base: transform.apply_point(&self.base),
            axis: transform.apply_vector(&self.axis).normalize(),
            x_axis: transform.apply_vector(&self.x_axis).normalize(),
            ..*self
        }
    }
}

/// Any curve the pipeline can carry
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Line(LineSegment),
    Arc(Arc),
    Ellipse(Ellipse),
    Hermite(HermiteSpline),
    Nurbs(NurbSpline),
    Helix(Helix),
}

impl Curve {
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Self {
        Curve::Line(LineSegment::new(start, end))
    }

    /// Short kind name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Curve::Line(_) => "line",
            Curve::Arc(_) => "arc",
            Curve::Ellipse(_) => "ellipse",
            Curve::Hermite(_) => "hermite",
            Curve::Nurbs(_) => "nurbs",
            Curve::Helix(_) => "helix",
        }
    }

    pub fn as_line(&self) -> Option<&LineSegment> {
        match self {
            Curve::Line(l) => Some(l),
            _ => None,
        }
    }

    /// Check that the curve can be evaluated at all
    pub fn validate(&self) -> Result<()> {
        match self {
            Curve::Hermite(h) if h.control_points.is_empty() => {
                Err(Error::invalid("Hermite spline without control points"))
            }
            Curve::Nurbs(n) => n.validate(),
            _ => Ok(()),
        }
    }

    /// Evaluate on the normalized parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        match self {
            Curve::Line(l) => l.point_at(t),
            Curve::Arc(a) => a.point_at(t),
            Curve::Ellipse(e) => e.point_at(t),
            Curve::Hermite(h) => h.point_at(t),
            Curve::Nurbs(n) => n.point_at(t),
            Curve::Helix(h) => h.point_at(t),
        }
    }

    pub fn start_point(&self) -> Point3<f64> {
        match self {
            Curve::Line(l) => l.start,
            _ => self.point_at(0.0),
        }
    }

    pub fn end_point(&self) -> Point3<f64> {
        match self {
            Curve::Line(l) => l.end,
            _ => self.point_at(1.0),
        }
    }

    /// Whether the curve ends where it starts (full circle, closed ellipse,
    /// periodic spline)
    pub fn is_closed(&self, tol: &Tolerance) -> bool {
        match self {
            Curve::Line(_) => false,
            Curve::Arc(a) => a.is_full_circle(),
            Curve::Ellipse(e) => e.is_closed(),
            _ => tol.points_coincident(&self.start_point(), &self.end_point()),
        }
    }

    /// Arc length; exact for lines and arcs, sampled otherwise
    pub fn length(&self, tol: &Tolerance) -> f64 {
        match self {
            Curve::Line(l) => l.length(),
            Curve::Arc(a) => a.length(),
            _ => self
                .tessellate(tol)
                .windows(2)
                .map(|w| (w[1] - w[0]).norm())
                .sum(),
        }
    }

    /// Number of straight spans used to approximate this curve
    fn segment_count(&self, tol: &Tolerance) -> usize {
        let by_sagitta = |radius: f64, sweep: f64| -> usize {
            if radius <= tol.deflection {
                return 4;
            }
            // Chord angle whose sagitta equals the deflection
            let step = 2.0 * (1.0 - tol.deflection / radius).clamp(-1.0, 1.0).acos();
            if step <= 0.0 {
                return tol.max_segments;
            }
            (sweep.abs() / step).ceil() as usize
        };

        let count = match self {
            Curve::Line(_) => 1,
            Curve::Arc(a) => by_sagitta(a.radius, a.sweep()),
            Curve::Ellipse(e) => {
                by_sagitta(e.radius_x.max(e.radius_y), e.param_end - e.param_start)
            }
            Curve::Helix(h) => by_sagitta(h.radius, h.sweep),
            Curve::Hermite(h) => h.control_points.len() * 8,
            Curve::Nurbs(n) => n.control_points.len() * 8,
        };
        count.clamp(1, tol.max_segments.max(1))
    }

    /// Sample the curve into a dense polyline (start and end included)
    ///
    /// Curves that fail `validate` produce no samples.
    pub fn tessellate(&self, tol: &Tolerance) -> Vec<Point3<f64>> {
        if self.validate().is_err() {
            return Vec::new();
        }
        if let Curve::Line(l) = self {
            return vec![l.start, l.end];
        }
        let segments = self.segment_count(tol).max(2);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    pub fn transformed(&self, transform: &Transform) -> Curve {
        match self {
            Curve::Line(l) => Curve::Line(l.transformed(transform)),
            Curve::Arc(a) => Curve::Arc(a.transformed(transform)),
            Curve::Ellipse(e) => Curve::Ellipse(e.transformed(transform)),
            Curve::Hermite(h) => Curve::Hermite(h.transformed(transform)),
            Curve::Nurbs(n) => Curve::Nurbs(n.transformed(transform)),
            Curve::Helix(h) => Curve::Helix(h.transformed(transform)),
        }
    }
}

impl From<LineSegment> for Curve {
    fn from(line: LineSegment) -> Self {
        Curve::Line(line)
    }
}

impl From<Arc> for Curve {
    fn from(arc: Arc) -> Self {
        Curve::Arc(arc)
    }
}
