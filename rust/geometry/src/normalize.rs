// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh normalization: multi-body merging and unit correction.
//!
//! Whatever shape a loader returned is folded into one triangle soup, then
//! checked for metre units. A file whose largest extent is below
//! [`METER_HEURISTIC_LIMIT`] is assumed to be in metres and scaled by
//! [`METERS_TO_MILLIMETERS`].

use eshant_core::{LoadedGeometry, RawMesh};

use crate::error::{Error, Result};
use crate::mesh::Mesh;

/// Largest extent below which a file is assumed to be in metres
pub const METER_HEURISTIC_LIMIT: f64 = 10.0;

/// Metre to millimetre factor
pub const METERS_TO_MILLIMETERS: f64 = 1000.0;

/// A merged mesh in millimetres
#[derive(Debug, Clone)]
pub struct NormalizedMesh {
    pub mesh: Mesh,
    /// Whether metre-to-millimetre scaling was applied
    pub unit_scaled: bool,
    /// Number of bodies merged into the mesh
    pub body_count: usize,
}

/// Merge loader output into one mesh and correct its unit scale.
pub fn normalize(geometry: &LoadedGeometry) -> Result<NormalizedMesh> {
    let body_count = geometry.body_count();
    let mut mesh = merge_bodies(geometry)?;
    let unit_scaled = correct_units(&mut mesh);

    tracing::debug!(
        bodies = body_count,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        unit_scaled,
        "Normalized mesh"
    );

    Ok(NormalizedMesh {
        mesh,
        unit_scaled,
        body_count,
    })
}

/// Fold any loader shape into one validated mesh.
///
/// Multi-body shapes must carry at least one body.
pub fn merge_bodies(geometry: &LoadedGeometry) -> Result<Mesh> {
    if let LoadedGeometry::Single(mesh) = geometry {
        return Mesh::from_raw(mesh);
    }
    if geometry.body_count() == 0 {
        return Err(Error::NoGeometry);
    }
    Mesh::from_raw(&RawMesh::concat(geometry.bodies()))
}

/// Scale a metre-unit mesh to millimetres. Returns whether scaling happened.
///
/// Meshes at or above the limit are untouched. Callers apply this once per
/// mesh.
pub fn correct_units(mesh: &mut Mesh) -> bool {
    let extents = mesh.extents();
    let largest = extents.x.max(extents.y).max(extents.z);

    if largest > 0.0 && largest < METER_HEURISTIC_LIMIT {
        tracing::info!(
            largest_extent = largest,
            factor = METERS_TO_MILLIMETERS,
            "Mesh looks like metre units, scaling to millimetres"
        );
        mesh.scale(METERS_TO_MILLIMETERS);
        true
    } else {
        false
    }
}
