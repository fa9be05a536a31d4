// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared processing pipeline used by the server.
//!
//! [`GeometryPipeline`] turns uploaded bytes into [`GeometryMetrics`];
//! the [`feasibility`] module defines the downstream verdict seam.

pub mod error;
pub mod feasibility;
pub mod pipeline;

pub use eshant_geometry::{BoundingBox, GeometryMetrics};
pub use error::{ProcessingError, Result};
pub use feasibility::{
    FeasibilityChecker, FeasibilityRequest, FeasibilityResult, Orientation,
    StubFeasibilityChecker, ToleranceClass,
};
pub use pipeline::{GeometryPipeline, MeshSource, ProcessingResult, ProcessingStats};
