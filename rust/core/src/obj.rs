// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ loading via `tobj`.

use std::path::Path;

use crate::error::Result;
use crate::raw::RawMesh;

/// Load every model in an OBJ file as a named raw mesh.
///
/// Polygons are triangulated and positions re-indexed to a single index
/// buffer; materials are not read.
pub fn load_obj_models(path: &Path) -> Result<Vec<(String, RawMesh)>> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options)?;

    let parts = models
        .into_iter()
        .map(|model| {
            let mesh = &model.mesh;
            let vertices = mesh
                .positions
                .chunks_exact(3)
                .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
                .collect();
            let triangles = mesh
                .indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect();
            (model.name, RawMesh::from_parts(vertices, triangles))
        })
        .collect::<Vec<_>>();

    tracing::debug!(models = parts.len(), path = %path.display(), "Read OBJ");
    Ok(parts)
}
