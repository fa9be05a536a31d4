use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or normalizing a mesh
#[derive(Error, Debug)]
pub enum Error {
    #[error("No geometry found in file")]
    NoGeometry,

    #[error("Empty mesh: {0}")]
    EmptyMesh(String),

    #[error("Vertex {vertex} has a non-finite coordinate")]
    NonFiniteVertex { vertex: usize },

    #[error("Triangle {triangle} references vertex {index} but mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
}
