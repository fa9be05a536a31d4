// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh complexity score.

/// Face/vertex count at which each term reaches its full weight
pub const COMPLEXITY_REFERENCE_COUNT: f64 = 20_000.0;

/// Upper bound of the score
pub const COMPLEXITY_CAP: f64 = 1.5;

const FACE_WEIGHT: f64 = 0.8;
const VERTEX_WEIGHT: f64 = 0.2;

/// Weighted, capped combination of face and vertex counts
pub fn complexity_index(face_count: usize, vertex_count: usize) -> f64 {
    let faces = face_count as f64 / COMPLEXITY_REFERENCE_COUNT * FACE_WEIGHT;
    let vertices = vertex_count as f64 / COMPLEXITY_REFERENCE_COUNT * VERTEX_WEIGHT;
    (faces + vertices).min(COMPLEXITY_CAP)
}
