// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interchange data: curve loops, hatch regions and the `CadData` bundle

use crate::curve::Curve;
use crate::error::{Error, Result};
use crate::tolerance::Tolerance;
use crate::transform::Transform;
use nalgebra::Point3;
use std::fmt;

/// RGB color, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Stable name for the solid fill type of this color, e.g. `Solid_255_0_0`
    pub fn fill_type_name(&self) -> String {
        format!("Solid_{}_{}_{}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Ordered curves meant to chain head-to-tail
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveLoop {
    curves: Vec<Curve>,
}

impl CurveLoop {
    pub fn new() -> Self {
        Self { curves: Vec::new() }
    }

    pub fn from_curves(curves: Vec<Curve>) -> Self {
        Self { curves }
    }

    pub fn push(&mut self, curve: Curve) {
        self.curves.push(curve);
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn iter(&self) -> impl Iterator<Item = &Curve> {
        self.curves.iter()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Every curve starts where the previous one ends
    pub fn is_chained(&self, tol: &Tolerance) -> bool {
        self.curves
            .windows(2)
            .all(|w| tol.points_coincident(&w[0].end_point(), &w[1].start_point()))
    }

    /// Chained and the last curve returns to the first curve's start
    pub fn is_closed(&self, tol: &Tolerance) -> bool {
        match (self.curves.first(), self.curves.last()) {
            (Some(first), Some(last)) => {
                self.is_chained(tol) && tol.points_coincident(&last.end_point(), &first.start_point())
            }
            _ => false,
        }
    }

    pub fn length(&self, tol: &Tolerance) -> f64 {
        self.curves.iter().map(|c| c.length(tol)).sum()
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            curves: self.curves.iter().map(|c| c.transformed(transform)).collect(),
        }
    }
}

impl FromIterator<Curve> for CurveLoop {
    fn from_iter<I: IntoIterator<Item = Curve>>(iter: I) -> Self {
        Self {
            curves: iter.into_iter().collect(),
        }
    }
}

/// Filled area: an outer boundary plus optional holes sharing one color
#[derive(Debug, Clone, PartialEq)]
pub struct HatchRegion {
    pub color: Color,
    pub loops: Vec<CurveLoop>,
}

impl HatchRegion {
    pub fn new(color: Color, loops: Vec<CurveLoop>) -> Self {
        Self { color, loops }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds {
    fn from_point(p: Point3<f64>) -> Self {
        Self { min: p, max: p }
    }

    fn include(&mut self, p: &Point3<f64>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Curves and hatches produced by one conversion request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CadData {
    pub curves: Vec<Curve>,
    pub hatches: Vec<HatchRegion>,
}

impl CadData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty() && self.hatches.is_empty()
    }

    /// Curves plus hatches, the unit of progress reporting
    pub fn item_count(&self) -> usize {
        self.curves.len() + self.hatches.len()
    }

    /// Fail with `NoGeometryExtracted` when nothing survived
    pub fn ensure_has_geometry(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::NoGeometryExtracted);
        }
        Ok(())
    }

    /// Bounding box over sampled curve and loop points
    pub fn bounds(&self, tol: &Tolerance) -> Option<Bounds> {
        let loop_curves = self
            .hatches
            .iter()
            .flat_map(|h| h.loops.iter())
            .flat_map(|l| l.iter());

        let mut bounds: Option<Bounds> = None;
        for curve in self.curves.iter().chain(loop_curves) {
            for p in curve.tessellate(tol) {
                match bounds.as_mut() {
                    Some(b) => b.include(&p),
                    None => bounds = Some(Bounds::from_point(p)),
                }
            }
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::NurbSpline;
    use approx::assert_relative_eq;

    fn square(size: f64) -> CurveLoop {
        let p = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(size, 0.0, 0.0),
            Point3::new(size, size, 0.0),
            Point3::new(0.0, size, 0.0),
        ];
        (0..4).map(|i| Curve::line(p[i], p[(i + 1) % 4])).collect()
    }

    #[test]
    fn test_square_loop_is_closed() {
        let tol = Tolerance::default();
        let lp = square(2.0);
        assert!(lp.is_closed(&tol));
        assert_relative_eq!(lp.length(&tol), 8.0);
    }

    #[test]
    fn test_open_chain_is_not_closed() {
        let tol = Tolerance::default();
        let mut lp = square(2.0);
        lp.curves.pop();
        assert!(lp.is_chained(&tol));
        assert!(!lp.is_closed(&tol));
        assert!(!CurveLoop::new().is_closed(&tol));
    }

    #[test]
    fn test_fill_type_name() {
        assert_eq!(Color::new(255, 10, 0).fill_type_name(), "Solid_255_10_0");
        assert_eq!(Color::default(), Color::BLACK);
    }

    #[test]
    fn test_empty_data_is_rejected() {
        let data = CadData::new();
        assert_eq!(data.ensure_has_geometry(), Err(Error::NoGeometryExtracted));
        assert!(data.bounds(&Tolerance::default()).is_none());
    }

    #[test]
    fn test_bounds_cover_curves_and_hatches() {
        let mut data = CadData::new();
        data.curves.push(Curve::line(Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)));
        data.hatches.push(HatchRegion::new(Color::BLACK, vec![square(4.0)]));

        let bounds = data.bounds(&Tolerance::default()).unwrap();
        assert_relative_eq!(bounds.min, Point3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(bounds.max, Point3::new(4.0, 4.0, 0.0));
        assert_relative_eq!(bounds.center(), Point3::new(1.5, 2.0, 0.0));
    }

    #[test]
    fn test_bounds_skip_malformed_loop_curves() {
        let broken = Curve::Nurbs(NurbSpline {
            degree: 2,
            control_points: vec![
                Point3::new(50.0, 50.0, 0.0),
                Point3::new(60.0, 50.0, 0.0),
                Point3::new(60.0, 60.0, 0.0),
            ],
            knots: vec![0.0, 1.0],
            weights: vec![],
        });
        let mut data = CadData::new();
        data.hatches.push(HatchRegion::new(
            Color::BLACK,
            vec![square(4.0), std::iter::once(broken).collect()],
        ));

        let bounds = data.bounds(&Tolerance::default()).unwrap();
        assert_relative_eq!(bounds.max, Point3::new(4.0, 4.0, 0.0));
    }
}
