// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! General-purpose mesh loader.
//!
//! The loader turns a staged file into one of the [`LoadedGeometry`] shapes.
//! Callers may ask for a single merged mesh with [`LoadOptions::force_mesh`];
//! without it, multi-body formats keep their bodies apart.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::format::MeshFormat;
use crate::raw::{LoadedGeometry, RawMesh, Scene};
use crate::{obj, stl, threemf};

/// Options for a load attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Merge all bodies into one mesh
    pub force_mesh: bool,
}

impl LoadOptions {
    /// Ask for one merged mesh
    pub fn merged() -> Self {
        Self { force_mesh: true }
    }

    /// Keep bodies apart
    pub fn bodies() -> Self {
        Self { force_mesh: false }
    }
}

/// Loads a mesh file from disk.
pub trait GeometryLoader: Send + Sync {
    fn load(&self, path: &Path, options: &LoadOptions) -> Result<LoadedGeometry>;
}

/// Extension-driven loader for STL, OBJ and 3MF
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl FileLoader {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryLoader for FileLoader {
    fn load(&self, path: &Path, options: &LoadOptions) -> Result<LoadedGeometry> {
        let format = MeshFormat::from_path(path).ok_or_else(|| {
            Error::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("<none>")
                    .to_string(),
            )
        })?;

        tracing::debug!(
            path = %path.display(),
            format = ?format,
            force_mesh = options.force_mesh,
            "Loading mesh file"
        );

        match format {
            MeshFormat::Stl => {
                let mut reader = BufReader::new(File::open(path)?);
                Ok(LoadedGeometry::Single(stl::read_stl(&mut reader)?))
            }
            MeshFormat::Obj => {
                let models = obj::load_obj_models(path)?;
                if models.is_empty() {
                    return Err(Error::NoGeometry);
                }
                Ok(shape_bodies(models, options, false))
            }
            MeshFormat::ThreeMf => {
                let data = std::fs::read(path)?;
                let scene = threemf::read_scene(&data)?;
                if scene.is_empty() {
                    return Err(Error::NoGeometry);
                }
                Ok(shape_bodies(scene.geometry, options, true))
            }
        }
    }
}

/// Pick the output shape for a multi-body file
fn shape_bodies(
    bodies: Vec<(String, RawMesh)>,
    options: &LoadOptions,
    scene: bool,
) -> LoadedGeometry {
    if options.force_mesh {
        return LoadedGeometry::Single(RawMesh::concat(bodies.iter().map(|(_, m)| m)));
    }

    if scene {
        return LoadedGeometry::Scene(Scene { geometry: bodies });
    }

    if bodies.len() == 1 {
        let (_, mesh) = bodies.into_iter().next().unwrap_or_default();
        return LoadedGeometry::Single(mesh);
    }

    let mut names = FxHashSet::default();
    if bodies.iter().all(|(name, _)| names.insert(name.as_str())) {
        LoadedGeometry::Keyed(bodies)
    } else {
        LoadedGeometry::List(bodies.into_iter().map(|(_, m)| m).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(name: &str) -> (String, RawMesh) {
        (
            name.to_string(),
            RawMesh::from_parts(vec![[0.0; 3]; 3], vec![[0, 1, 2]]),
        )
    }

    #[test]
    fn test_force_mesh_merges() {
        let shaped = shape_bodies(vec![body("a"), body("b")], &LoadOptions::merged(), false);
        match shaped {
            LoadedGeometry::Single(mesh) => assert_eq!(mesh.triangles[1], [3, 4, 5]),
            other => panic!("expected single mesh, got {:?}", other),
        }
    }

    #[test]
    fn test_unique_names_are_keyed() {
        let shaped = shape_bodies(vec![body("a"), body("b")], &LoadOptions::bodies(), false);
        assert!(matches!(shaped, LoadedGeometry::Keyed(ref v) if v.len() == 2));
    }

    #[test]
    fn test_duplicate_names_become_list() {
        let shaped = shape_bodies(vec![body("a"), body("a")], &LoadOptions::bodies(), false);
        assert!(matches!(shaped, LoadedGeometry::List(ref v) if v.len() == 2));
    }

    #[test]
    fn test_one_body_is_single() {
        let shaped = shape_bodies(vec![body("a")], &LoadOptions::bodies(), false);
        assert!(matches!(shaped, LoadedGeometry::Single(_)));
    }

    #[test]
    fn test_scene_shape() {
        let shaped = shape_bodies(vec![body("1"), body("1")], &LoadOptions::bodies(), true);
        assert!(matches!(shaped, LoadedGeometry::Scene(ref s) if s.geometry.len() == 2));
    }

    #[test]
    fn test_unknown_extension_fails() {
        let err = FileLoader::new()
            .load(Path::new("part.step"), &LoadOptions::merged())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref ext) if ext == "step"));
    }
}
