// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Final metrics record: unit conversion, mass estimate and warnings.

use serde::{Deserialize, Serialize};

use crate::analysis::{analyze, MeshAnalysis};
use crate::mesh::Mesh;

/// Default material density in g/cm³
pub const DEFAULT_DENSITY_G_PER_CM3: f64 = 1.24;

/// Wall thickness (mm) below which a thin-wall warning is raised
pub const THIN_WALL_THRESHOLD_MM: f64 = 0.5;

/// Largest extent (mm) of a typical build volume
pub const BUILD_VOLUME_LIMIT_MM: f64 = 300.0;

const MM3_PER_CM3: f64 = 1000.0;
const MM2_PER_CM2: f64 = 100.0;

pub const THIN_WALL_WARNING: &str = "Thin walls detected";
pub const BUILD_VOLUME_WARNING: &str = "Part exceeds typical build volume (300mm max dimension)";

/// Axis-aligned extents in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Manufacturability metrics for one part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryMetrics {
    /// Extents in mm
    pub bounding_box: BoundingBox,
    /// cm³
    pub volume: f64,
    /// cm²
    pub surface_area: f64,
    /// Grams at the default density
    pub estimated_mass: f64,
    pub feature_count: usize,
    /// 0.0 to 1.5
    pub complexity_index: f64,
    pub has_overhangs: bool,
    /// mm
    pub min_wall_thickness: f64,
    pub warnings: Vec<String>,
}

/// Analyze a normalized mesh and assemble its metrics
pub fn compute_metrics(mesh: &Mesh) -> GeometryMetrics {
    assemble(mesh, &analyze(mesh))
}

/// Combine stage outputs with volume and area into the final record
pub fn assemble(mesh: &Mesh, analysis: &MeshAnalysis) -> GeometryMetrics {
    let extents = mesh.extents();

    // Inverted winding gives a negative signed volume
    let volume = mesh.signed_volume().abs() / MM3_PER_CM3;
    let surface_area = mesh.surface_area() / MM2_PER_CM2;
    let estimated_mass = volume * DEFAULT_DENSITY_G_PER_CM3;

    let min_wall_thickness = round3(analysis.min_wall_thickness);
    let complexity_index = round3(analysis.complexity_index);

    let mut warnings = Vec::new();
    if analysis.min_wall_thickness < THIN_WALL_THRESHOLD_MM {
        warnings.push(THIN_WALL_WARNING.to_string());
    }
    if analysis.overhang.has_overhangs {
        warnings.push(format!(
            "Overhangs detected on {:.1}% of faces",
            analysis.overhang.percentage()
        ));
    }
    if extents.x.max(extents.y).max(extents.z) > BUILD_VOLUME_LIMIT_MM {
        warnings.push(BUILD_VOLUME_WARNING.to_string());
    }

    GeometryMetrics {
        bounding_box: BoundingBox {
            x: extents.x,
            y: extents.y,
            z: extents.z,
        },
        volume,
        surface_area,
        estimated_mass,
        feature_count: analysis.feature_count,
        complexity_index,
        has_overhangs: analysis.overhang.has_overhangs,
        min_wall_thickness,
        warnings,
    }
}

#[inline]
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
