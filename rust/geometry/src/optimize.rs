// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Optimizer - flatten every curve, then merge the straight ones

use crate::cad_data::CadData;
use crate::curve::{Curve, LineSegment};
use crate::flatten::CurveFlattener;
use crate::merge::LineMerger;
use crate::tolerance::Tolerance;

#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryOptimizer {
    flattener: CurveFlattener,
    merger: LineMerger,
}

impl GeometryOptimizer {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            flattener: CurveFlattener::new(tolerance),
            merger: LineMerger::new(tolerance),
        }
    }

    /// Produce a new, optimized `CadData`
    ///
    /// Merged lines come first, followed by the remaining curves in input
    /// order. Hatches are copied unchanged; their loops are flattened when
    /// they are drawn.
    pub fn optimize(&self, data: &CadData) -> CadData {
        let mut lines: Vec<LineSegment> = Vec::new();
        let mut others: Vec<Curve> = Vec::new();
        let mut dropped = 0usize;

        for curve in &data.curves {
            let Some(flat) = self.flattener.flatten(curve) else {
                dropped += 1;
                continue;
            };
            for flat_curve in flat {
                match flat_curve {
                    Curve::Line(line) => lines.push(line),
                    other => others.push(other),
                }
            }
        }

        let line_count = lines.len();
        let mut curves: Vec<Curve> = self.merger.merge(&lines).into_iter().map(Curve::Line).collect();
        let merged_count = curves.len();
        curves.extend(others);

        tracing::info!(
            curves_in = data.curves.len(),
            dropped,
            lines = line_count,
            merged_lines = merged_count,
            curves_out = curves.len(),
            hatches = data.hatches.len(),
            "Optimized geometry"
        );

        CadData {
            curves,
            hatches: data.hatches.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cad_data::{Color, CurveLoop, HatchRegion};
    use crate::curve::Arc;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_lines_merge_and_arcs_pass_through() {
        let circle = Curve::Arc(Arc::full_circle(
            Point3::new(5.0, 5.0, 2.0),
            1.0,
            Vector3::x(),
            Vector3::y(),
        ));
        let data = CadData {
            curves: vec![
                Curve::line(Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 0.0, 1.0)),
                circle,
                Curve::line(Point3::new(1.0, 0.0, 3.0), Point3::new(2.0, 0.0, 3.0)),
                Curve::line(Point3::new(4.0, 4.0, 0.0), Point3::new(4.0, 4.0, 9.0)),
            ],
            hatches: vec![],
        };

        let out = GeometryOptimizer::default().optimize(&data);

        assert_eq!(out.curves.len(), 2);
        let line = out.curves[0].as_line().unwrap();
        assert_eq!(line.start.z, 0.0);
        assert!((line.length() - 2.0).abs() < 1e-9);
        assert!(matches!(out.curves[1], Curve::Arc(_)));
        // Input untouched
        assert_eq!(data.curves.len(), 4);
    }

    #[test]
    fn test_hatches_are_copied_unchanged() {
        let lp = CurveLoop::from_curves(vec![Curve::line(
            Point3::new(0.0, 0.0, 7.0),
            Point3::new(1.0, 0.0, 7.0),
        )]);
        let data = CadData {
            curves: vec![],
            hatches: vec![HatchRegion::new(Color::new(1, 2, 3), vec![lp])],
        };

        let out = GeometryOptimizer::default().optimize(&data);
        assert_eq!(out.hatches, data.hatches);
        assert!(out.curves.is_empty());
    }
}
