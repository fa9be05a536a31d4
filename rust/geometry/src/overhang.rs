// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Overhang detection against a fixed build axis.
//!
//! A face counts as an overhang when the dot product of its unit normal with
//! the downward build direction is below cos 45°. That comparison also
//! catches vertical walls (dot 0), upward faces (dot -1) and degenerate
//! faces (zero normal). The behaviour is kept as-is for compatibility with
//! existing results.

use nalgebra::Vector3;

use crate::mesh::Mesh;

/// Downward build/gravity direction
pub const BUILD_DIRECTION: Vector3<f64> = Vector3::new(0.0, 0.0, -1.0);

/// cos 45°
pub const OVERHANG_COS_THRESHOLD: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Overhang fraction above which the mesh is flagged
pub const OVERHANG_FRACTION_LIMIT: f64 = 0.02;

/// Per-mesh overhang summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverhangAnalysis {
    pub overhang_faces: usize,
    pub total_faces: usize,
    /// `overhang_faces / total_faces`, 0 for a faceless mesh
    pub fraction: f64,
    pub has_overhangs: bool,
}

impl OverhangAnalysis {
    /// Overhang share as a percentage
    pub fn percentage(&self) -> f64 {
        self.fraction * 100.0
    }
}

/// Whether a single face normal falls below the overhang threshold
#[inline]
pub fn is_overhang(normal: &Vector3<f64>) -> bool {
    normal.dot(&BUILD_DIRECTION) < OVERHANG_COS_THRESHOLD
}

/// Classify every face and flag the mesh when more than 2% overhang.
pub fn detect_overhangs(mesh: &Mesh) -> OverhangAnalysis {
    let total_faces = mesh.triangle_count();
    let overhang_faces = (0..total_faces)
        .filter(|&face| is_overhang(&mesh.face_normal(face)))
        .count();

    let fraction = overhang_faces as f64 / total_faces.max(1) as f64;

    OverhangAnalysis {
        overhang_faces,
        total_faces,
        fraction,
        has_overhangs: fraction > OVERHANG_FRACTION_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    /// Append horizontal triangles, either facing down or up
    fn add_flat_faces(mesh: &mut Mesh, count: usize, facing_down: bool) {
        for _ in 0..count {
            let base = mesh.vertex_count() as u32;
            let x = base as f64;
            mesh.add_vertex(Point3::new(x, 0.0, 0.0));
            mesh.add_vertex(Point3::new(x + 1.0, 0.0, 0.0));
            mesh.add_vertex(Point3::new(x, 1.0, 0.0));
            if facing_down {
                mesh.add_triangle(base, base + 2, base + 1);
            } else {
                mesh.add_triangle(base, base + 1, base + 2);
            }
        }
    }

    fn flat_faces(count: usize, facing_down: bool) -> Mesh {
        let mut mesh = Mesh::new();
        add_flat_faces(&mut mesh, count, facing_down);
        mesh
    }

    #[test]
    fn test_downward_faces_are_not_below_threshold() {
        // Normal (0,0,-1) has dot 1 with the build direction
        let mesh = flat_faces(10, true);
        let result = detect_overhangs(&mesh);
        assert_eq!(result.overhang_faces, 0);
        assert!(!result.has_overhangs);
    }

    #[test]
    fn test_upward_faces_are_counted() {
        // Normal (0,0,1) has dot -1 with the build direction
        let mesh = flat_faces(10, false);
        let result = detect_overhangs(&mesh);
        assert_eq!(result.overhang_faces, 10);
        assert_eq!(result.fraction, 1.0);
        assert!(result.has_overhangs);
    }

    #[test]
    fn test_empty_mesh() {
        let result = detect_overhangs(&Mesh::new());
        assert_eq!(result.fraction, 0.0);
        assert!(!result.has_overhangs);
    }

    #[test]
    fn test_two_percent_is_not_flagged() {
        // 1 up-facing face among 50: exactly 2%
        let mut mesh = flat_faces(49, true);
        add_flat_faces(&mut mesh, 1, false);
        let result = detect_overhangs(&mesh);
        assert_eq!(result.fraction, 0.02);
        assert!(!result.has_overhangs);

        add_flat_faces(&mut mesh, 1, false);
        assert!(detect_overhangs(&mesh).has_overhangs);
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(!is_overhang(&Vector3::new(0.0, 0.0, -1.0)));
        assert!(is_overhang(&Vector3::new(1.0, 0.0, 0.0)));
        assert!(is_overhang(&Vector3::zeros()));
        let steep = Vector3::new(0.0, 0.5, -0.9).normalize();
        assert!(!is_overhang(&steep));
    }
}
