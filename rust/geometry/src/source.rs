// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Source geometry tree handed over by the host import
//!
//! The host realizes an imported drawing into this tree before conversion;
//! nothing here parses a file format.

use crate::cad_data::{Color, CurveLoop};
use crate::curve::Curve;
use crate::transform::Transform;
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;

/// Host identifier of the graphics style a solid was drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleId(pub u64);

/// One node of the imported geometry tree
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNode {
    /// Nested reference: children are in the instance's local frame
    Instance {
        transform: Transform,
        children: Vec<SourceNode>,
    },
    Curve(Curve),
    /// Ordered vertices, one segment per consecutive pair
    Polyline(Vec<Point3<f64>>),
    Solid(SourceSolid),
    /// Anything the host could not classify (points, meshes, text...)
    Unsupported,
}

/// Solid with enumerable faces and its originating style
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceSolid {
    pub faces: Vec<SourceFace>,
    pub style: Option<StyleId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceFace {
    Planar(PlanarFace),
    /// Cylindrical, conical, free-form...
    Curved,
}

/// Flat face with its outward normal and boundary loops
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarFace {
    pub normal: Vector3<f64>,
    pub loops: Vec<CurveLoop>,
}

/// Resolves a solid's graphics style to its line color
pub trait StyleResolver {
    fn resolve(&self, style: StyleId) -> Option<Color>;
}

/// Resolver for imports without a style table
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStyles;

impl StyleResolver for NoStyles {
    fn resolve(&self, _style: StyleId) -> Option<Color> {
        None
    }
}

impl StyleResolver for FxHashMap<StyleId, Color> {
    fn resolve(&self, style: StyleId) -> Option<Color> {
        self.get(&style).copied()
    }
}
