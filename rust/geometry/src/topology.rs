// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connected components over mesh faces.
//!
//! Two faces belong to the same feature when a chain of shared edges links
//! them. The count comes from a disjoint-set over face indices, fed by a
//! streaming map from canonical edge to the faces seen on it so far.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::mesh::{triangle_edges, EdgeKey, Mesh};

/// Disjoint-set forest with path compression.
///
/// Unions attach one root under the other without ranking.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    /// One singleton set per element
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    /// Representative of `x`'s set
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Path compression
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`
    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }

    /// Number of distinct sets
    pub fn count_sets(&mut self) -> usize {
        (0..self.parent.len())
            .filter(|&x| self.find(x) == x)
            .count()
    }
}

/// Count edge-connected pieces of a mesh.
///
/// A mesh without faces has no features.
pub fn count_features(mesh: &Mesh) -> usize {
    let face_count = mesh.triangle_count();
    if face_count == 0 {
        return 0;
    }

    let mut sets = UnionFind::new(face_count);
    let mut edge_faces: FxHashMap<EdgeKey, SmallVec<[usize; 2]>> =
        FxHashMap::with_capacity_and_hasher(face_count * 3 / 2, Default::default());

    for (face, tri) in mesh.triangles().enumerate() {
        for edge in triangle_edges(tri) {
            let faces = edge_faces.entry(edge).or_default();
            for &other in faces.iter() {
                sets.union(other, face);
            }
            faces.push(face);
        }
    }

    let features = sets.count_sets();
    tracing::trace!(faces = face_count, edges = edge_faces.len(), features, "Counted features");
    features
}
