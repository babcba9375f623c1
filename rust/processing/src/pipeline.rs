// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion pipeline: extract -> optimize -> validate -> render.

use crate::config::ConversionConfig;
use crate::error::Result;
use crate::host::DrawingHost;
use crate::progress::ProgressSink;
use crate::render::{RenderContext, RenderDriver, RenderSummary};
use cad2d_geometry::{
    CadData, GeometryExtractor, GeometryOptimizer, Point3, SourceNode, StyleResolver, Transform,
};

/// Runs conversion requests with one configuration.
#[derive(Debug, Clone, Default)]
pub struct ConversionPipeline {
    config: ConversionConfig,
}

impl ConversionPipeline {
    /// Create a pipeline, rejecting invalid configuration.
    pub fn new(config: ConversionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Extract and optimize the source tree placed by `placement`.
    ///
    /// Fails with `NoGeometryExtracted` when nothing survives.
    pub fn prepare<S: StyleResolver + ?Sized>(
        &self,
        root: &SourceNode,
        placement: &Transform,
        styles: &S,
        progress: &mut dyn ProgressSink,
    ) -> Result<CadData> {
        let tolerance = self.config.tolerance;

        progress.report(10.0, "Extracting geometry from CAD...");
        let extracted = GeometryExtractor::with_tolerance(styles, tolerance).extract_with(root, placement);
        tracing::info!(
            curves = extracted.curves.len(),
            hatches = extracted.hatches.len(),
            "Extracted geometry"
        );

        progress.report(30.0, "Optimizing geometry...");
        let optimized = GeometryOptimizer::new(tolerance).optimize(&extracted);
        optimized.ensure_has_geometry()?;
        Ok(optimized)
    }

    /// Draw prepared data with `offset` moved to the host origin.
    ///
    /// Without an offset the content is centered on its own bounds.
    pub fn render<H: DrawingHost>(
        &self,
        host: &mut H,
        data: &CadData,
        offset: Option<Point3<f64>>,
        progress: &mut dyn ProgressSink,
    ) -> Result<RenderSummary> {
        let offset = offset
            .or_else(|| data.bounds(&self.config.tolerance).map(|b| b.center()))
            .unwrap_or_else(Point3::origin);
        let ctx = RenderContext::new(offset, self.config.line_style.clone());

        RenderDriver::new(host, self.config.tolerance)
            .with_progress_window(self.config.progress_start, self.config.progress_end)
            .draw(data, &ctx, progress)
    }

    /// Prepare and render in one call.
    pub fn convert<S: StyleResolver + ?Sized, H: DrawingHost>(
        &self,
        root: &SourceNode,
        placement: &Transform,
        styles: &S,
        host: &mut H,
        offset: Option<Point3<f64>>,
        progress: &mut dyn ProgressSink,
    ) -> Result<RenderSummary> {
        let data = self.prepare(root, placement, styles, progress)?;
        self.render(host, &data, offset, progress)
    }
}
