// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the conversion pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Conversion errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Geometry error: {0}")]
    Geometry(#[from] cad2d_geometry::Error),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Nothing survived extraction and optimization
    pub fn is_no_geometry(&self) -> bool {
        matches!(self, Self::Geometry(cad2d_geometry::Error::NoGeometryExtracted))
    }
}
