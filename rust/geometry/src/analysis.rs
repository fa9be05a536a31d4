// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The four independent analysis stages over a normalized mesh.

use crate::complexity::complexity_index;
use crate::mesh::Mesh;
use crate::overhang::{detect_overhangs, OverhangAnalysis};
use crate::thickness::estimate_min_wall_thickness;
use crate::topology::count_features;

/// Raw stage outputs, before unit conversion and rounding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshAnalysis {
    pub feature_count: usize,
    pub overhang: OverhangAnalysis,
    /// Millimetres
    pub min_wall_thickness: f64,
    pub complexity_index: f64,
}

/// Run topology, overhang, thickness and complexity stages.
///
/// The stages only read the mesh, so they run concurrently on the rayon
/// pool.
pub fn analyze(mesh: &Mesh) -> MeshAnalysis {
    let ((feature_count, overhang), (min_wall_thickness, complexity)) = rayon::join(
        || rayon::join(|| count_features(mesh), || detect_overhangs(mesh)),
        || {
            rayon::join(
                || estimate_min_wall_thickness(mesh),
                || complexity_index(mesh.triangle_count(), mesh.vertex_count()),
            )
        },
    );

    tracing::debug!(
        features = feature_count,
        overhang_faces = overhang.overhang_faces,
        min_edge = min_wall_thickness,
        complexity,
        "Mesh analysis complete"
    );

    MeshAnalysis {
        feature_count,
        overhang,
        min_wall_thickness,
        complexity_index: complexity,
    }
}
