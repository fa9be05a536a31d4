// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use eshant_core::RawMesh;
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

/// Undirected edge with the smaller vertex index first
pub type EdgeKey = (u32, u32);

/// Canonical key for the edge between two vertices
#[inline]
pub fn edge_key(a: u32, b: u32) -> EdgeKey {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// The three undirected edges of a triangle
#[inline]
pub fn triangle_edges(tri: [u32; 3]) -> [EdgeKey; 3] {
    [
        edge_key(tri[0], tri[1]),
        edge_key(tri[1], tri[2]),
        edge_key(tri[2], tri[0]),
    ]
}

/// Triangle mesh in millimetres once normalized.
///
/// Normals, edges, bounds, volume and area are derived on demand rather
/// than stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f64>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(triangle_count * 3),
        }
    }

    /// Build a validated mesh from raw parser output
    pub fn from_raw(raw: &RawMesh) -> Result<Self> {
        let mut mesh = Self::with_capacity(raw.vertices.len(), raw.triangles.len());
        for v in &raw.vertices {
            mesh.positions.extend_from_slice(v);
        }
        for t in &raw.triangles {
            mesh.indices.extend_from_slice(t);
        }
        mesh.validate()?;
        Ok(mesh)
    }

    /// Validate the mesh invariants required by analysis
    pub fn validate(&self) -> Result<()> {
        if self.vertex_count() == 0 {
            return Err(Error::EmptyMesh("mesh has no vertices".into()));
        }
        if self.triangle_count() == 0 {
            return Err(Error::EmptyMesh("mesh has no faces".into()));
        }

        if let Some(pos) = self.positions.iter().position(|c| !c.is_finite()) {
            return Err(Error::NonFiniteVertex { vertex: pos / 3 });
        }

        let vertex_count = self.vertex_count();
        if let Some(pos) = self.indices.iter().position(|&i| i as usize >= vertex_count) {
            return Err(Error::IndexOutOfRange {
                triangle: pos / 3,
                index: self.indices[pos],
                vertex_count,
            });
        }
        Ok(())
    }

    /// Add a vertex
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) {
        self.positions.push(position.x);
        self.positions.push(position.y);
        self.positions.push(position.z);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Position of a vertex
    #[inline]
    pub fn vertex(&self, index: u32) -> Point3<f64> {
        let i = index as usize * 3;
        Point3::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }

    /// Vertex indices of a triangle
    #[inline]
    pub fn triangle(&self, face: usize) -> [u32; 3] {
        let i = face * 3;
        [self.indices[i], self.indices[i + 1], self.indices[i + 2]]
    }

    /// Iterate over triangles
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Corner positions of a triangle
    #[inline]
    pub fn triangle_points(&self, face: usize) -> [Point3<f64>; 3] {
        let [a, b, c] = self.triangle(face);
        [self.vertex(a), self.vertex(b), self.vertex(c)]
    }

    /// Unit normal of a face; zero for degenerate faces
    pub fn face_normal(&self, face: usize) -> Vector3<f64> {
        let [v0, v1, v2] = self.triangle_points(face);
        let normal = (v1 - v0).cross(&(v2 - v0));
        normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    /// Unique undirected edges in first-seen order
    pub fn unique_edges(&self) -> Vec<EdgeKey> {
        let mut seen = FxHashSet::default();
        let mut edges = Vec::with_capacity(self.indices.len());
        for tri in self.triangles() {
            for edge in triangle_edges(tri) {
                if seen.insert(edge) {
                    edges.push(edge);
                }
            }
        }
        edges
    }

    /// Euclidean length of an edge
    #[inline]
    pub fn edge_length(&self, edge: EdgeKey) -> f64 {
        (self.vertex(edge.1) - self.vertex(edge.0)).norm()
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        if self.positions.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }

    /// Axis-aligned bounding box size
    pub fn extents(&self) -> Vector3<f64> {
        let (min, max) = self.bounds();
        max - min
    }

    /// Signed enclosed volume (divergence theorem).
    ///
    /// Positive for closed meshes with outward winding; meaningless for open
    /// surfaces.
    pub fn signed_volume(&self) -> f64 {
        (0..self.triangle_count())
            .map(|face| {
                let [v0, v1, v2] = self.triangle_points(face);
                v0.coords.dot(&v1.coords.cross(&v2.coords))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Total surface area
    pub fn surface_area(&self) -> f64 {
        (0..self.triangle_count())
            .map(|face| {
                let [v0, v1, v2] = self.triangle_points(face);
                (v1 - v0).cross(&(v2 - v0)).norm() * 0.5
            })
            .sum()
    }

    /// Scale every vertex position uniformly in place
    pub fn scale(&mut self, factor: f64) {
        self.positions.iter_mut().for_each(|c| *c *= factor);
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
