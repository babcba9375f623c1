// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hatch Loop Builder - flattened, validated boundary loops for fill regions

use crate::cad_data::{CurveLoop, HatchRegion};
use crate::flatten::CurveFlattener;
use crate::tolerance::Tolerance;
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, Default)]
pub struct HatchLoopBuilder {
    flattener: CurveFlattener,
}

impl HatchLoopBuilder {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            flattener: CurveFlattener::new(tolerance),
        }
    }

    /// Move each loop by `to_origin`, flatten it and keep it if still closed
    ///
    /// Open loops and loops no longer than `min_loop_length` are dropped. An
    /// empty result means the hatch should not be drawn.
    pub fn prepare_loops(&self, hatch: &HatchRegion, to_origin: &Transform) -> Vec<CurveLoop> {
        let tol = self.flattener.tolerance();
        let mut prepared = Vec::with_capacity(hatch.loops.len());

        for (i, source) in hatch.loops.iter().enumerate() {
            let mut rebuilt = CurveLoop::new();
            for curve in source.iter() {
                let moved = curve.transformed(to_origin);
                if let Some(flat) = self.flattener.flatten(&moved) {
                    for c in flat {
                        rebuilt.push(c);
                    }
                }
            }

            if !rebuilt.is_closed(tol) {
                tracing::debug!(loop_index = i, curves = rebuilt.len(), "dropped open hatch loop");
                continue;
            }
            let length = rebuilt.length(tol);
            if length <= tol.min_loop_length {
                tracing::debug!(loop_index = i, length, "dropped degenerate hatch loop");
                continue;
            }
            prepared.push(rebuilt);
        }
        prepared
    }
}
