// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CAD2D Geometry
//!
//! Turns realized 3D CAD geometry into plan content: z = 0 curves with
//! collinear lines merged, and validated hatch loops. Coordinates and
//! transforms use nalgebra.

pub mod cad_data;
pub mod curve;
pub mod error;
pub mod extract;
pub mod flatten;
pub mod hatch;
pub mod merge;
pub mod optimize;
pub mod source;
pub mod tolerance;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use cad_data::{Bounds, CadData, Color, CurveLoop, HatchRegion};
pub use curve::{Arc, Curve, Ellipse, Helix, HermiteSpline, LineSegment, NurbSpline};
pub use error::{Error, Result};
pub use extract::GeometryExtractor;
pub use flatten::{tessellate_to_plan, CurveFlattener, FlatCurves, SplineReconstructor};
pub use hatch::HatchLoopBuilder;
pub use merge::LineMerger;
pub use optimize::GeometryOptimizer;
pub use source::{NoStyles, PlanarFace, SourceFace, SourceNode, SourceSolid, StyleId, StyleResolver};
pub use tolerance::Tolerance;
pub use transform::Transform;
