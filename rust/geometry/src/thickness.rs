// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimum wall thickness proxy.
//!
//! The estimate is the shortest unique edge in the mesh. It is a
//! tessellation statistic, not a ray-cast measurement, and underestimates
//! true thickness on finely tessellated parts.

use crate::mesh::Mesh;

/// Shortest unique edge length, or 0 for a mesh without edges
pub fn estimate_min_wall_thickness(mesh: &Mesh) -> f64 {
    mesh.unique_edges()
        .into_iter()
        .map(|edge| mesh.edge_length(edge))
        .min_by(f64::total_cmp)
        .unwrap_or(0.0)
}
