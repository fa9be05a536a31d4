// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STL loading (binary and ASCII) via `stl_io`.

use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::raw::RawMesh;

/// Read an STL stream into an indexed raw mesh.
///
/// `stl_io` welds identical vertex positions, so faces that touch share
/// indices and topology analysis sees them as connected.
pub fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<RawMesh> {
    let stl = stl_io::read_stl(reader).map_err(|e| Error::Stl(e.to_string()))?;

    let vertices = stl
        .vertices
        .iter()
        .map(|v| [v.0[0] as f64, v.0[1] as f64, v.0[2] as f64])
        .collect();

    let triangles = stl
        .faces
        .iter()
        .map(|face| {
            [
                face.vertices[0] as u32,
                face.vertices[1] as u32,
                face.vertices[2] as u32,
            ]
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        vertices = stl.vertices.len(),
        triangles = triangles.len(),
        "Read STL"
    );

    Ok(RawMesh::from_parts(vertices, triangles))
}
