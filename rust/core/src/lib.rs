// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Eshant Core
//!
//! Input side of the geometry-analysis engine: turns uploaded mesh files into
//! raw vertex/triangle arrays.
//!
//! - **Container parser**: [`threemf::parse_container`] reads the 3MF
//!   archive format directly, without a general-purpose format library.
//! - **General loader**: [`FileLoader`] handles STL, OBJ and 3MF and returns
//!   one of the [`LoadedGeometry`] shapes (single mesh, list, keyed bodies
//!   or scene).
//!
//! ```rust,ignore
//! use eshant_core::{threemf, FileLoader, GeometryLoader, LoadOptions};
//!
//! let raw = threemf::parse_container(&bytes)?;
//! let loaded = FileLoader::new().load(path, &LoadOptions::merged())?;
//! ```

pub mod error;
pub mod format;
pub mod loader;
pub mod obj;
pub mod raw;
pub mod stl;
pub mod threemf;

pub use error::{Error, Result};
pub use format::{extension_hint, MeshFormat};
pub use loader::{FileLoader, GeometryLoader, LoadOptions};
pub use raw::{LoadedGeometry, RawMesh, Scene};
