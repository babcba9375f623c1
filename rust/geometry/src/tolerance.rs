// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared tolerance configuration
//!
//! One set of constants drives the flattener, the line merger and the hatch
//! loop builder, so a span the merger treats as touching is also a span the
//! flattener treats as non-degenerate.

use nalgebra::{Point3, Vector3};

/// Tolerances in host/world linear units (typically feet)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Points closer than this are coincident; shorter curves are degenerate
    pub vertex: f64,
    /// Maximum gap between collinear spans that still merge
    pub merge_gap: f64,
    /// Closed loops at or below this total length are dropped
    pub min_loop_length: f64,
    /// Decimal places used to key line directions and offsets
    pub direction_decimals: i32,
    /// Unit vectors closer than this are parallel
    pub angular: f64,
    /// Maximum chord sagitta when tessellating curved geometry
    pub deflection: f64,
    /// Upper bound on tessellation segments per curve
    pub max_segments: usize,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            vertex: 0.001,
            merge_gap: 0.001,
            min_loop_length: 0.001,
            direction_decimals: 4,
            angular: 1e-9,
            deflection: 0.01,
            max_segments: 256,
        }
    }
}

impl Tolerance {
    #[inline]
    pub fn points_coincident(&self, a: &Point3<f64>, b: &Point3<f64>) -> bool {
        (a - b).norm() < self.vertex
    }

    #[inline]
    pub fn is_short(&self, length: f64) -> bool {
        length < self.vertex
    }

    /// Unit-vector equality used for the plan-visible face test
    #[inline]
    pub fn directions_equal(&self, a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
        (a - b).norm() <= self.angular
    }

    /// Scale factor for `direction_decimals`
    #[inline]
    pub fn rounding_scale(&self) -> f64 {
        10f64.powi(self.direction_decimals)
    }

    /// Integer grouping key for a scalar rounded to `direction_decimals`
    #[inline]
    pub fn key(&self, value: f64) -> i64 {
        (value * self.rounding_scale()).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rounds_to_direction_decimals() {
        let tol = Tolerance::default();
        assert_eq!(tol.key(0.123449), 1234);
        assert_eq!(tol.key(-0.00001), 0);
        assert_eq!(tol.key(0.00001), 0);
    }

    #[test]
    fn test_points_coincident() {
        let tol = Tolerance::default();
        let a = Point3::new(1.0, 1.0, 0.0);
        assert!(tol.points_coincident(&a, &Point3::new(1.0005, 1.0, 0.0)));
        assert!(!tol.points_coincident(&a, &Point3::new(1.002, 1.0, 0.0)));
    }

    #[test]
    fn test_directions_equal_uses_configured_angular() {
        let tilted = Vector3::new(0.0, 1e-6, 1.0).normalize();
        let loose = Tolerance {
            angular: 1e-3,
            ..Tolerance::default()
        };
        assert!(loose.directions_equal(&tilted, &Vector3::z()));
        assert!(!Tolerance::default().directions_equal(&tilted, &Vector3::z()));

        let exact = Tolerance {
            angular: 0.0,
            ..Tolerance::default()
        };
        assert!(exact.directions_equal(&Vector3::z(), &Vector3::z()));
        assert!(!exact.directions_equal(&Vector3::new(0.0, 1e-12, 1.0), &Vector3::z()));
    }
}
