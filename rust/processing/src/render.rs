// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render Driver - hands optimized content to the drawing host.
//!
//! Curves are drawn first, then hatches. Each item is moved by the
//! context's `to_origin` transform and flattened again, since the offset may
//! carry a z component. A failed draw is logged and skipped.

use crate::error::Result;
use crate::host::{DrawingHost, FillStyle, LineStyle};
use crate::progress::{ProgressCadence, ProgressSink};
use cad2d_geometry::{
    CadData, Color, Curve, CurveFlattener, HatchLoopBuilder, HatchRegion, Point3, Tolerance,
    Transform,
};
use rustc_hash::FxHashMap;

/// Where and how content is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub line_style: LineStyle,
    /// Moves the content's reference point to the host origin.
    pub to_origin: Transform,
}

impl RenderContext {
    /// Context placing `offset` at the origin.
    pub fn new(offset: Point3<f64>, line_style: LineStyle) -> Self {
        Self {
            line_style,
            to_origin: Transform::translation(-offset.coords),
        }
    }
}

/// Counts of what reached the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Host curves created (a source curve may yield several).
    pub curves_drawn: usize,
    /// Source curves with nothing left after flattening.
    pub curves_dropped: usize,
    pub hatches_drawn: usize,
    /// Hatches without a single valid loop.
    pub hatches_dropped: usize,
    /// Host calls that failed and were skipped.
    pub failures: usize,
}

/// Drives one render of a `CadData` into a host.
pub struct RenderDriver<'h, H: DrawingHost> {
    host: &'h mut H,
    flattener: CurveFlattener,
    hatch_builder: HatchLoopBuilder,
    fill_styles: FxHashMap<Color, FillStyle>,
    progress_start: f64,
    progress_end: f64,
}

impl<'h, H: DrawingHost> RenderDriver<'h, H> {
    pub fn new(host: &'h mut H, tolerance: Tolerance) -> Self {
        Self {
            host,
            flattener: CurveFlattener::new(tolerance),
            hatch_builder: HatchLoopBuilder::new(tolerance),
            fill_styles: FxHashMap::default(),
            progress_start: 50.0,
            progress_end: 90.0,
        }
    }

    /// Percent window the draw phase reports into.
    pub fn with_progress_window(mut self, start: f64, end: f64) -> Self {
        self.progress_start = start;
        self.progress_end = end;
        self
    }

    /// Draw all curves, then all hatches.
    ///
    /// Only a failure to set up the line style aborts; individual draw
    /// failures are counted in the summary.
    pub fn draw(
        &mut self,
        data: &CadData,
        ctx: &RenderContext,
        progress: &mut dyn ProgressSink,
    ) -> Result<RenderSummary> {
        self.host.ensure_line_style(&ctx.line_style)?;

        let cadence = ProgressCadence::new(self.progress_start, self.progress_end, data.item_count());
        let mut summary = RenderSummary::default();
        let mut current = 0usize;

        let curve_count = data.curves.len();
        for (i, curve) in data.curves.iter().enumerate() {
            current += 1;
            if cadence.should_report(current) {
                progress.report(
                    cadence.percent(current),
                    &format!("Drawing curves... ({}/{})", i + 1, curve_count),
                );
            }
            self.draw_curve(curve, ctx, &mut summary);
        }

        let hatch_count = data.hatches.len();
        for (i, hatch) in data.hatches.iter().enumerate() {
            current += 1;
            if cadence.should_report(current) {
                progress.report(
                    cadence.percent(current),
                    &format!("Drawing hatches... ({}/{})", i + 1, hatch_count),
                );
            }
            self.draw_hatch(hatch, ctx, &mut summary);
        }

        tracing::info!(
            curves_drawn = summary.curves_drawn,
            curves_dropped = summary.curves_dropped,
            hatches_drawn = summary.hatches_drawn,
            hatches_dropped = summary.hatches_dropped,
            failures = summary.failures,
            "Render complete"
        );
        Ok(summary)
    }

    fn draw_curve(&mut self, curve: &Curve, ctx: &RenderContext, summary: &mut RenderSummary) {
        let moved = curve.transformed(&ctx.to_origin);
        let Some(flat) = self.flattener.flatten(&moved) else {
            summary.curves_dropped += 1;
            return;
        };
        for c in &flat {
            match self.host.draw_curve(c, &ctx.line_style) {
                Ok(_) => summary.curves_drawn += 1,
                Err(err) => {
                    tracing::warn!(kind = c.kind(), error = %err, "Failed to draw curve");
                    summary.failures += 1;
                }
            }
        }
    }

    fn draw_hatch(&mut self, hatch: &HatchRegion, ctx: &RenderContext, summary: &mut RenderSummary) {
        let fill = match self.fill_style(hatch.color) {
            Ok(fill) => fill,
            Err(err) => {
                tracing::warn!(color = %hatch.color, error = %err, "Failed to create fill type");
                summary.failures += 1;
                return;
            }
        };

        let loops = self.hatch_builder.prepare_loops(hatch, &ctx.to_origin);
        if loops.is_empty() {
            summary.hatches_dropped += 1;
            return;
        }
        match self.host.create_filled_region(&loops, &fill) {
            Ok(_) => summary.hatches_drawn += 1,
            Err(err) => {
                tracing::warn!(loops = loops.len(), error = %err, "Failed to create filled region");
                summary.failures += 1;
            }
        }
    }

    /// Fill style for `color`, created in the host on first use.
    fn fill_style(&mut self, color: Color) -> Result<FillStyle> {
        if let Some(fill) = self.fill_styles.get(&color) {
            return Ok(fill.clone());
        }
        let fill = FillStyle::solid(color);
        self.host.ensure_fill_type(&fill)?;
        self.fill_styles.insert(color, fill.clone());
        Ok(fill)
    }
}
