// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for mesh loading and container parsing.

use thiserror::Error;

/// Result type for loading operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a mesh file
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Archive does not contain a {0} part")]
    MissingModelPart(&'static str),

    #[error("Model part exceeds {limit} bytes")]
    ModelPartTooLarge { limit: u64 },

    #[error("Model root element has no XML namespace")]
    MissingNamespace,

    #[error("Invalid value {value:?} for attribute '{name}'")]
    InvalidAttribute { name: String, value: String },

    #[error("Vertex index {index} out of range (vertex count {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("No geometry found in file")]
    NoGeometry,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("STL parse error: {0}")]
    Stl(String),

    #[error("OBJ parse error: {0}")]
    Obj(#[from] tobj::LoadError),
}

impl Error {
    /// Create an invalid-attribute error from raw attribute bytes
    pub fn invalid_attribute(name: &[u8], value: &[u8]) -> Self {
        Error::InvalidAttribute {
            name: String::from_utf8_lossy(name).into_owned(),
            value: String::from_utf8_lossy(value).into_owned(),
        }
    }
}
