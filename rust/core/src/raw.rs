// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unvalidated geometry as produced by the parsers and loaders.

/// Vertex and triangle arrays straight out of a parser.
///
/// Indices are not checked here; validation happens when the geometry crate
/// builds its `Mesh`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMesh {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f64; 3]>,
    /// Triangles as 0-based vertex indices
    pub triangles: Vec<[u32; 3]>,
}

impl RawMesh {
    /// Create an empty raw mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from vertex and triangle arrays
    pub fn from_parts(vertices: Vec<[f64; 3]>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// True when there is nothing to build a solid from
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    /// Append another mesh, offsetting its triangle indices past our vertices
    pub fn append(&mut self, other: &RawMesh) {
        let vertex_offset = self.vertices.len() as u32;

        self.vertices.reserve(other.vertices.len());
        self.triangles.reserve(other.triangles.len());

        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|t| [t[0] + vertex_offset, t[1] + vertex_offset, t[2] + vertex_offset]),
        );
    }

    /// Concatenate sub-meshes into one triangle soup
    pub fn concat<'a, I>(parts: I) -> RawMesh
    where
        I: IntoIterator<Item = &'a RawMesh>,
    {
        let mut combined = RawMesh::new();
        for part in parts {
            combined.append(part);
        }
        combined
    }
}

/// Shapes a loader may hand back.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedGeometry {
    /// One mesh
    Single(RawMesh),
    /// Ordered bodies
    List(Vec<RawMesh>),
    /// Named bodies in file order; the names carry no meaning downstream
    Keyed(Vec<(String, RawMesh)>),
    /// Multi-body scene
    Scene(Scene),
}

impl LoadedGeometry {
    /// Number of bodies carried
    pub fn body_count(&self) -> usize {
        match self {
            LoadedGeometry::Single(_) => 1,
            LoadedGeometry::List(meshes) => meshes.len(),
            LoadedGeometry::Keyed(meshes) => meshes.len(),
            LoadedGeometry::Scene(scene) => scene.geometry.len(),
        }
    }

    /// Iterate over bodies in order
    pub fn bodies(&self) -> Box<dyn Iterator<Item = &RawMesh> + '_> {
        match self {
            LoadedGeometry::Single(mesh) => Box::new(std::iter::once(mesh)),
            LoadedGeometry::List(meshes) => Box::new(meshes.iter()),
            LoadedGeometry::Keyed(meshes) => Box::new(meshes.iter().map(|(_, m)| m)),
            LoadedGeometry::Scene(scene) => Box::new(scene.geometry.iter().map(|(_, m)| m)),
        }
    }
}

/// Scene with named geometry entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub geometry: Vec<(String, RawMesh)>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, name: impl Into<String>, mesh: RawMesh) {
        self.geometry.push((name.into(), mesh));
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f64) -> RawMesh {
        RawMesh::from_parts(
            vec![
                [offset, 0.0, 0.0],
                [offset + 1.0, 0.0, 0.0],
                [offset, 1.0, 0.0],
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn test_concat_offsets_indices() {
        let a = triangle(0.0);
        let b = triangle(5.0);
        let merged = RawMesh::concat([&a, &b]);

        assert_eq!(merged.vertices.len(), 6);
        assert_eq!(merged.triangles, vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(merged.vertices[3], [5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_is_empty_requires_both_lists() {
        assert!(RawMesh::new().is_empty());
        assert!(RawMesh::from_parts(vec![[0.0; 3]], vec![]).is_empty());
        assert!(!triangle(0.0).is_empty());
    }

    #[test]
    fn test_bodies_preserve_order() {
        let keyed = LoadedGeometry::Keyed(vec![
            ("b".to_string(), triangle(2.0)),
            ("a".to_string(), triangle(1.0)),
        ]);
        let firsts: Vec<f64> = keyed.bodies().map(|m| m.vertices[0][0]).collect();
        assert_eq!(firsts, vec![2.0, 1.0]);
        assert_eq!(keyed.body_count(), 2);
    }
}
