// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CAD2D processing pipeline
//!
//! Sits between a host application and `cad2d-geometry`: prepares plan
//! content from a source tree, then drives the host's drawing API with
//! progress reporting. The library logs through `tracing` and never
//! installs a subscriber.

pub mod config;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod progress;
pub mod render;

pub use config::{parse_color, ConversionConfig};
pub use error::{Error, Result};
pub use host::{DrawingHost, FillStyle, LineStyle};
pub use pipeline::ConversionPipeline;
pub use progress::{NoProgress, ProgressCadence, ProgressSink};
pub use render::{RenderContext, RenderDriver, RenderSummary};
