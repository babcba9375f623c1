// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line Merger - collinear segment consolidation
//!
//! Segments are grouped by their rounded, sign-normalized plan direction and
//! by their rounded perpendicular offset. Each group lies on one infinite
//! line; its spans are swept into the minimal set of covering segments.
//! Lines are treated in the XY plane and merged output lies at z = 0.
//!
//! Spans of a direction group are measured along the unit direction of the
//! first line seen in that group. Merged lines therefore key back into the
//! same groups, which keeps merging idempotent.

use crate::curve::LineSegment;
use crate::tolerance::Tolerance;
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;

/// Rounded direction components
type DirectionKey = (i64, i64);

/// Spans sharing one infinite line
struct Collinear {
    dir: Vector3<f64>,
    normal: Vector3<f64>,
    /// Rounded perpendicular offset from the origin
    offset: f64,
    intervals: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LineMerger {
    tolerance: Tolerance,
}

impl LineMerger {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    /// Merge overlapping or touching collinear segments
    ///
    /// Zero-length input segments are skipped. Output keeps the first-seen
    /// order of the collinear groups, spans ascending within each group.
    pub fn merge(&self, lines: &[LineSegment]) -> Vec<LineSegment> {
        let tol = &self.tolerance;
        let mut axes: FxHashMap<DirectionKey, (Vector3<f64>, Vector3<f64>)> = FxHashMap::default();
        let mut index: FxHashMap<(DirectionKey, i64), usize> = FxHashMap::default();
        let mut groups: Vec<Collinear> = Vec::new();

        for line in lines {
            let Some((dir_key, unit)) = self.direction_key(line) else {
                continue;
            };
            let (dir, normal) = *axes
                .entry(dir_key)
                .or_insert_with(|| (unit, Vector3::new(-unit.y, unit.x, 0.0)));

            let start = plan(&line.start);
            let end = plan(&line.end);
            let offset_key = tol.key(start.dot(&normal));

            let slot = *index.entry((dir_key, offset_key)).or_insert_with(|| {
                groups.push(Collinear {
                    dir,
                    normal,
                    offset: offset_key as f64 / tol.rounding_scale(),
                    intervals: Vec::new(),
                });
                groups.len() - 1
            });

            let (a, b) = (start.dot(&dir), end.dot(&dir));
            groups[slot].intervals.push((a.min(b), a.max(b)));
        }

        let mut merged = Vec::with_capacity(groups.len());
        for mut group in groups {
            let base = group.normal * group.offset;
            let dir = group.dir;
            let emit = |s0: f64, s1: f64, out: &mut Vec<LineSegment>| {
                if tol.is_short(s1 - s0) {
                    return;
                }
                out.push(LineSegment::new(
                    Point3::from(base + dir * s0),
                    Point3::from(base + dir * s1),
                ));
            };

            group.intervals.sort_by(|x, y| x.0.total_cmp(&y.0));
            let mut spans = group.intervals.into_iter();
            let Some((mut lo, mut hi)) = spans.next() else {
                continue;
            };
            for (s0, s1) in spans {
                if s0 <= hi + tol.merge_gap {
                    hi = hi.max(s1);
                } else {
                    emit(lo, hi, &mut merged);
                    lo = s0;
                    hi = s1;
                }
            }
            emit(lo, hi, &mut merged);
        }

        tracing::debug!(input = lines.len(), output = merged.len(), "merged collinear lines");
        merged
    }

    /// Rounded direction key and sign-normalized unit direction
    ///
    /// `None` when the segment has no plan extent.
    fn direction_key(&self, line: &LineSegment) -> Option<(DirectionKey, Vector3<f64>)> {
        let tol = &self.tolerance;
        let delta = plan(&line.end) - plan(&line.start);
        let length = delta.norm();
        if !length.is_finite() || tol.is_short(length) {
            return None;
        }

        let unit = delta / length;
        let (kx, ky) = (tol.key(unit.x), tol.key(unit.y));
        // Opposite directions share a group
        if kx < 0 || (kx == 0 && ky < 0) {
            Some(((-kx, -ky), -unit))
        } else {
            Some(((kx, ky), unit))
        }
    }
}

#[inline]
fn plan(p: &Point3<f64>) -> Vector3<f64> {
    Vector3::new(p.x, p.y, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> LineSegment {
        LineSegment::new(Point3::new(x0, y0, 0.0), Point3::new(x1, y1, 0.0))
    }

    /// Sorted (start, end) spans along x for horizontal output
    fn x_spans(lines: &[LineSegment]) -> Vec<(f64, f64)> {
        let mut spans: Vec<_> = lines
            .iter()
            .map(|l| (l.start.x.min(l.end.x), l.start.x.max(l.end.x)))
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));
        spans
    }

    #[test]
    fn test_touching_segments_merge_across_small_gap() {
        let merger = LineMerger::default();
        let out = merger.merge(&[
            seg(0.0, 0.0, 1.0, 0.0),
            seg(1.0, 0.0, 2.0, 0.0),
            seg(2.0005, 0.0, 3.0, 0.0),
        ]);

        assert_eq!(out.len(), 1);
        let (a, b) = x_spans(&out)[0];
        assert_relative_eq!(a, 0.0, epsilon = 1e-12);
        assert_relative_eq!(b, 3.0, epsilon = 1e-12);
        assert_eq!(out[0].start.y, 0.0);
    }

    #[test]
    fn test_distant_segments_stay_apart() {
        let out = LineMerger::default().merge(&[seg(0.0, 0.0, 1.0, 0.0), seg(5.0, 0.0, 6.0, 0.0)]);
        assert_eq!(out.len(), 2);
        let spans = x_spans(&out);
        assert_relative_eq!(spans[0].1, 1.0, epsilon = 1e-12);
        assert_relative_eq!(spans[1].0, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reversed_segments_share_a_group() {
        let out = LineMerger::default().merge(&[seg(0.0, 1.0, 2.0, 1.0), seg(3.0, 1.0, 1.5, 1.0)]);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].length(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(out[0].start.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_lines_at_different_offsets_do_not_merge() {
        let out = LineMerger::default().merge(&[seg(0.0, 0.0, 1.0, 0.0), seg(0.0, 0.5, 1.0, 0.5)]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_contained_span_is_absorbed() {
        let out = LineMerger::default().merge(&[seg(0.0, 0.0, 10.0, 0.0), seg(2.0, 0.0, 3.0, 0.0)]);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].length(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diagonal_segments_merge() {
        let out = LineMerger::default().merge(&[seg(0.0, 0.0, 1.0, 1.0), seg(1.0, 1.0, 2.0, 2.0)]);
        assert_eq!(out.len(), 1);
        let line = &out[0];
        assert_relative_eq!(line.length(), 8f64.sqrt(), epsilon = 1e-3);
        assert_relative_eq!(line.start, Point3::new(0.0, 0.0, 0.0), epsilon = 1e-3);
        assert_relative_eq!(line.end, Point3::new(2.0, 2.0, 0.0), epsilon = 1e-3);
    }

    #[test]
    fn test_zero_length_segments_are_skipped() {
        let out = LineMerger::default().merge(&[seg(1.0, 1.0, 1.0, 1.0), seg(4.0, 4.0, 4.0005, 4.0)]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let input = [
            seg(0.0, 0.0, 1.0, 0.0),
            seg(0.5, 0.0, 2.0, 0.0),
            seg(4.0, 0.0, 5.0, 0.0),
            seg(0.0, 0.0, 0.0, 3.0),
            seg(0.0, 2.0, 0.0, 4.0),
            seg(1.0, 1.0, 3.0, 3.0),
        ];
        let merger = LineMerger::default();
        let once = merger.merge(&input);
        let twice = merger.merge(&once);

        assert_eq!(once.len(), 4);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(&twice) {
            assert_relative_eq!(a.start, b.start, epsilon = 1e-9);
            assert_relative_eq!(a.end, b.end, epsilon = 1e-9);
        }
    }
}
