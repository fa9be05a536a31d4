//! Eshant Geometry Analysis
//!
//! Normalizes loaded part geometry into a single millimetre-scale mesh and
//! derives manufacturability metrics from it: feature count, overhangs,
//! wall thickness, complexity, volume, area and mass.

pub mod analysis;
pub mod complexity;
pub mod error;
pub mod mesh;
pub mod metrics;
pub mod normalize;
pub mod overhang;
pub mod thickness;
pub mod topology;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use analysis::{analyze, MeshAnalysis};
pub use complexity::complexity_index;
pub use error::{Error, Result};
pub use mesh::Mesh;
pub use metrics::{assemble, compute_metrics, BoundingBox, GeometryMetrics};
pub use normalize::{correct_units, merge_bodies, normalize, NormalizedMesh};
pub use overhang::{detect_overhangs, OverhangAnalysis};
pub use thickness::estimate_min_wall_thickness;
pub use topology::{count_features, UnionFind};
