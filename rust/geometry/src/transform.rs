// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Affine transforms for nested instance placement
//!
//! A `Transform` maps from an instance's local coordinates to its parent's
//! coordinates. Composition follows the placement-hierarchy convention:
//! `parent.compose(&local)` maps local points straight to the parent frame.

use nalgebra::{Matrix4, Point3, Vector3};

/// Rigid (rotation + translation) transform backed by a 4x4 matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    #[inline]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Pure translation
    pub fn translation(offset: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&offset),
        }
    }

    /// Wrap a raw matrix supplied by the host
    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Build a placement from an origin, a Z axis and a reference X direction
    ///
    /// The X direction is projected onto the plane perpendicular to Z. If the
    /// two are (nearly) parallel a perpendicular default is chosen, so any
    /// non-zero input yields an orthonormal frame.
    pub fn from_axes(location: Point3<f64>, z_axis: Vector3<f64>, x_axis: Vector3<f64>) -> Self {
        let z_axis_final = z_axis
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::z);
        let x_axis_normalized = x_axis
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::x);

        let dot_product = x_axis_normalized.dot(&z_axis_final);
        let x_axis_orthogonal = x_axis_normalized - z_axis_final * dot_product;
        let x_axis_final = if x_axis_orthogonal.norm() > 1e-6 {
            x_axis_orthogonal.normalize()
        } else if z_axis_final.z.abs() < 0.9 {
            Vector3::z().cross(&z_axis_final).normalize()
        } else {
            Vector3::x().cross(&z_axis_final).normalize()
        };

        // Y = Z x X keeps the frame right-handed
        let y_axis = z_axis_final.cross(&x_axis_final).normalize();

        Self {
            matrix: Matrix4::new(
                x_axis_final.x, y_axis.x, z_axis_final.x, location.x,
                x_axis_final.y, y_axis.y, z_axis_final.y, location.y,
                x_axis_final.z, y_axis.z, z_axis_final.z, location.z,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Compose: the result applies `local` first, then `self`
    #[inline]
    pub fn compose(&self, local: &Transform) -> Transform {
        Transform {
            matrix: self.matrix * local.matrix,
        }
    }

    #[inline]
    pub fn apply_point(&self, p: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(p)
    }

    /// Direction-only mapping (translation ignored)
    #[inline]
    pub fn apply_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.transform_vector(v)
    }

    pub fn inverse(&self) -> Option<Transform> {
        self.matrix.try_inverse().map(|matrix| Transform { matrix })
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }
}
