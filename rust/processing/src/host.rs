// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Drawing contract implemented by the host document.
//!
//! The host wraps these calls in its own transaction; the pipeline never
//! commits or rolls back anything itself.

use crate::error::Result;
use cad2d_geometry::{Color, Curve, CurveLoop};

/// Named line style applied to every drawn curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStyle {
    pub name: String,
    pub color: Color,
    /// Host pen weight, 1-16.
    pub weight: u8,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            name: "CAD_Style".into(),
            color: Color::BLACK,
            weight: 1,
        }
    }
}

/// Solid fill derived from a hatch color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FillStyle {
    /// `Solid_<r>_<g>_<b>`
    pub type_name: String,
    pub color: Color,
}

impl FillStyle {
    pub fn solid(color: Color) -> Self {
        Self {
            type_name: color.fill_type_name(),
            color,
        }
    }
}

/// Host document that receives the converted content.
pub trait DrawingHost {
    /// Host reference to a created element.
    type Handle;

    /// Create or update the line style before any curve is drawn.
    fn ensure_line_style(&mut self, _style: &LineStyle) -> Result<()> {
        Ok(())
    }

    /// Create the fill type on first use of a color.
    fn ensure_fill_type(&mut self, _fill: &FillStyle) -> Result<()> {
        Ok(())
    }

    fn draw_curve(&mut self, curve: &Curve, style: &LineStyle) -> Result<Self::Handle>;

    fn create_filled_region(&mut self, loops: &[CurveLoop], fill: &FillStyle) -> Result<Self::Handle>;
}
