// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during 2D conversion
///
/// Per-curve variants never escape the flattener: they select the
/// tessellation fallback or drop the curve. Only `NoGeometryExtracted`
/// is fatal to a conversion request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Degenerate curve: {0}")]
    DegenerateCurve(String),

    #[error("Invalid curve: {0}")]
    InvalidCurve(String),

    #[error("Spline reconstruction failed: {0}")]
    SplineReconstruction(String),

    #[error("Curve axes have no extent in the XY plane")]
    NonPlanarAxes,

    #[error("No geometry extracted from source")]
    NoGeometryExtracted,
}

impl Error {
    /// Shorthand for a degenerate-curve error
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateCurve(msg.into())
    }

    /// Shorthand for an invalid-curve error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidCurve(msg.into())
    }
}
