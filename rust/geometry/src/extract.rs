// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Extractor - walks the source tree into a `CadData`
//!
//! Traversal uses an explicit worklist of `(node, accumulated transform)`
//! pairs, so nesting depth is bounded by heap, not by the call stack.
//! Children are visited depth-first in their declared order.

use crate::cad_data::{CadData, Color, HatchRegion};
use crate::curve::Curve;
use crate::source::{SourceFace, SourceNode, SourceSolid, StyleResolver};
use crate::tolerance::Tolerance;
use crate::transform::Transform;
use nalgebra::Vector3;

pub struct GeometryExtractor<'a, S: StyleResolver + ?Sized> {
    styles: &'a S,
    tolerance: Tolerance,
}

impl<'a, S: StyleResolver + ?Sized> GeometryExtractor<'a, S> {
    pub fn new(styles: &'a S) -> Self {
        Self::with_tolerance(styles, Tolerance::default())
    }

    pub fn with_tolerance(styles: &'a S, tolerance: Tolerance) -> Self {
        Self { styles, tolerance }
    }

    /// Extract world-space curves and hatches from `root`
    pub fn extract(&self, root: &SourceNode) -> CadData {
        self.extract_with(root, &Transform::identity())
    }

    /// Extract with `root` placed by `transform`
    pub fn extract_with(&self, root: &SourceNode, transform: &Transform) -> CadData {
        let mut data = CadData::new();
        let mut skipped = 0usize;
        let mut stack: Vec<(&SourceNode, Transform)> = vec![(root, *transform)];

        while let Some((node, placement)) = stack.pop() {
            match node {
                SourceNode::Instance {
                    transform: local,
                    children,
                } => {
                    let composed = if local.is_identity() {
                        placement
                    } else {
                        placement.compose(local)
                    };
                    // Reversed so the first child pops first
                    stack.extend(children.iter().rev().map(|child| (child, composed)));
                }
                SourceNode::Curve(curve) => data.curves.push(curve.transformed(&placement)),
                SourceNode::Polyline(points) => {
                    data.curves.extend(points.windows(2).map(|w| {
                        Curve::line(placement.apply_point(&w[0]), placement.apply_point(&w[1]))
                    }));
                }
                SourceNode::Solid(solid) => self.extract_solid(solid, &placement, &mut data),
                SourceNode::Unsupported => skipped += 1,
            }
        }

        tracing::debug!(
            curves = data.curves.len(),
            hatches = data.hatches.len(),
            skipped,
            "extracted source geometry"
        );
        data
    }

    /// One hatch per plan-visible planar face
    fn extract_solid(&self, solid: &SourceSolid, placement: &Transform, data: &mut CadData) {
        let color = solid
            .style
            .and_then(|style| self.styles.resolve(style))
            .unwrap_or(Color::BLACK);

        for face in &solid.faces {
            let SourceFace::Planar(planar) = face else {
                continue;
            };
            if !self.is_plan_visible(&planar.normal, placement) {
                continue;
            }

            let loops: Vec<_> = planar
                .loops
                .iter()
                .filter(|lp| !lp.is_empty())
                .map(|lp| lp.transformed(placement))
                .collect();
            if !loops.is_empty() {
                data.hatches.push(HatchRegion::new(color, loops));
            }
        }
    }

    /// Transformed normal points straight up or straight down
    fn is_plan_visible(&self, normal: &Vector3<f64>, placement: &Transform) -> bool {
        let Some(n) = placement.apply_vector(normal).try_normalize(f64::EPSILON) else {
            return false;
        };
        let up = Vector3::z();
        self.tolerance.directions_equal(&n, &up) || self.tolerance.directions_equal(&n, &-up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cad_data::CurveLoop;
    use crate::source::{NoStyles, PlanarFace, StyleId};
    use nalgebra::Point3;
    use rustc_hash::FxHashMap;

    fn square_face(z: f64, normal: Vector3<f64>) -> SourceFace {
        let p = [
            Point3::new(0.0, 0.0, z),
            Point3::new(1.0, 0.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(0.0, 1.0, z),
        ];
        let lp: CurveLoop = (0..4).map(|i| Curve::line(p[i], p[(i + 1) % 4])).collect();
        SourceFace::Planar(PlanarFace {
            normal,
            loops: vec![lp],
        })
    }

    #[test]
    fn test_polyline_becomes_consecutive_segments() {
        let node = SourceNode::Polyline(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ]);
        let data = GeometryExtractor::new(&NoStyles).extract(&node);

        // Not flattened or filtered yet
        assert_eq!(data.curves.len(), 3);
        assert_eq!(data.curves[2].end_point(), Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_nested_instances_compose_transforms() {
        let inner = SourceNode::Instance {
            transform: Transform::translation(Vector3::new(0.0, 5.0, 0.0)),
            children: vec![SourceNode::Curve(Curve::line(Point3::origin(), Point3::new(1.0, 0.0, 0.0)))],
        };
        let root = SourceNode::Instance {
            transform: Transform::translation(Vector3::new(10.0, 0.0, 0.0)),
            children: vec![inner, SourceNode::Unsupported],
        };
        let data = GeometryExtractor::new(&NoStyles).extract(&root);

        assert_eq!(data.curves.len(), 1);
        assert_eq!(data.curves[0].start_point(), Point3::new(10.0, 5.0, 0.0));
        assert!(data.hatches.is_empty());
    }

    #[test]
    fn test_children_keep_declared_order() {
        let curve_at = |x: f64| SourceNode::Curve(Curve::line(Point3::new(x, 0.0, 0.0), Point3::new(x, 1.0, 0.0)));
        let root = SourceNode::Instance {
            transform: Transform::identity(),
            children: vec![
                curve_at(0.0),
                SourceNode::Instance {
                    transform: Transform::identity(),
                    children: vec![curve_at(1.0), curve_at(2.0)],
                },
                curve_at(3.0),
            ],
        };
        let data = GeometryExtractor::new(&NoStyles).extract(&root);

        let xs: Vec<f64> = data.curves.iter().map(|c| c.start_point().x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_only_horizontal_faces_become_hatches() {
        let solid = SourceSolid {
            faces: vec![
                square_face(0.0, -Vector3::z()),
                square_face(3.0, Vector3::z()),
                square_face(0.0, Vector3::x()),
                SourceFace::Curved,
            ],
            style: None,
        };
        let data = GeometryExtractor::new(&NoStyles).extract(&SourceNode::Solid(solid));

        assert_eq!(data.hatches.len(), 2);
        assert!(data.hatches.iter().all(|h| h.color == Color::BLACK));
    }

    #[test]
    fn test_rotated_face_is_tested_after_transform() {
        // Placement maps local Y to world Z and local Z to world X
        let placement = Transform::from_axes(Point3::origin(), Vector3::x(), Vector3::y());
        let solid = SourceSolid {
            faces: vec![square_face(0.0, Vector3::z()), square_face(0.0, Vector3::y())],
            style: None,
        };
        let data = GeometryExtractor::new(&NoStyles).extract_with(&SourceNode::Solid(solid), &placement);
        assert_eq!(data.hatches.len(), 1);
    }

    #[test]
    fn test_face_color_comes_from_style() {
        let mut styles: FxHashMap<StyleId, Color> = FxHashMap::default();
        styles.insert(StyleId(7), Color::new(200, 10, 10));

        let styled = SourceSolid {
            faces: vec![square_face(0.0, Vector3::z())],
            style: Some(StyleId(7)),
        };
        let unknown = SourceSolid {
            faces: vec![square_face(0.0, Vector3::z())],
            style: Some(StyleId(8)),
        };
        let root = SourceNode::Instance {
            transform: Transform::identity(),
            children: vec![SourceNode::Solid(styled), SourceNode::Solid(unknown)],
        };
        let data = GeometryExtractor::new(&styles).extract(&root);

        assert_eq!(data.hatches[0].color, Color::new(200, 10, 10));
        assert_eq!(data.hatches[1].color, Color::BLACK);
    }
}
