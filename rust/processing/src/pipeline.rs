// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request-scoped analysis pipeline: parse, normalize, analyze, assemble.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use eshant_core::{
    extension_hint, threemf, FileLoader, GeometryLoader, LoadOptions, LoadedGeometry,
};
use eshant_geometry::{compute_metrics, normalize, GeometryMetrics, NormalizedMesh};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{ProcessingError, Result};

/// Which parse path produced the geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshSource {
    /// Direct 3MF container parse
    Container,
    /// General file loader
    Loader,
}

/// Processing statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    pub source: MeshSource,
    /// Bodies merged into the analyzed mesh
    pub body_count: usize,
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Whether metre-to-millimetre scaling was applied
    pub unit_scaled: bool,
    /// Time spent parsing and normalizing (ms)
    pub parse_time_ms: u64,
    /// Time spent in the analysis stages (ms)
    pub analysis_time_ms: u64,
    pub total_time_ms: u64,
}

/// Result of analyzing one file.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub metrics: GeometryMetrics,
    pub stats: ProcessingStats,
}

/// Parses uploaded bytes and computes their metrics.
///
/// 3MF uploads first go through the container parser. Anything else, or a
/// 3MF the container parser rejects, is staged to a temp file and handed to
/// the loader: once asking for a merged mesh, then once more without.
#[derive(Debug, Clone, Default)]
pub struct GeometryPipeline<L: GeometryLoader = FileLoader> {
    loader: L,
}

impl GeometryPipeline<FileLoader> {
    pub fn new() -> Self {
        Self::with_loader(FileLoader::new())
    }
}

impl<L: GeometryLoader> GeometryPipeline<L> {
    pub fn with_loader(loader: L) -> Self {
        Self { loader }
    }

    /// Full analysis of one uploaded file
    pub fn analyze(&self, data: &[u8], file_name: &str) -> Result<ProcessingResult> {
        let total_start = Instant::now();

        tracing::info!(size = data.len(), file_name = %file_name, "Starting geometry analysis");

        let (normalized, source) = self.load_normalized(data, file_name)?;
        let parse_time = total_start.elapsed();

        let analysis_start = Instant::now();
        let metrics = compute_metrics(&normalized.mesh);
        let analysis_time = analysis_start.elapsed();

        let stats = ProcessingStats {
            source,
            body_count: normalized.body_count,
            vertex_count: normalized.mesh.vertex_count(),
            triangle_count: normalized.mesh.triangle_count(),
            unit_scaled: normalized.unit_scaled,
            parse_time_ms: parse_time.as_millis() as u64,
            analysis_time_ms: analysis_time.as_millis() as u64,
            total_time_ms: total_start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            source = ?stats.source,
            vertices = stats.vertex_count,
            triangles = stats.triangle_count,
            features = metrics.feature_count,
            parse_ms = stats.parse_time_ms,
            analysis_ms = stats.analysis_time_ms,
            total_ms = stats.total_time_ms,
            "Geometry analysis complete"
        );

        Ok(ProcessingResult { metrics, stats })
    }

    /// Parse and normalize without running the analysis stages
    pub fn load_mesh(&self, data: &[u8], file_name: &str) -> Result<NormalizedMesh> {
        self.load_normalized(data, file_name).map(|(mesh, _)| mesh)
    }

    fn load_normalized(&self, data: &[u8], file_name: &str) -> Result<(NormalizedMesh, MeshSource)> {
        let (geometry, source) = self.load(data, file_name)?;
        Ok((normalize(&geometry)?, source))
    }

    fn load(&self, data: &[u8], file_name: &str) -> Result<(LoadedGeometry, MeshSource)> {
        let hint = extension_hint(file_name);

        if hint.as_deref() == Some("3mf") {
            match threemf::parse_container(data) {
                Ok(raw) => return Ok((LoadedGeometry::Single(raw), MeshSource::Container)),
                Err(e) => {
                    tracing::warn!(error = %e, "3MF container parse failed, falling back to loader")
                }
            }
        }

        let staged = StagedFile::write(data, hint.as_deref())?;
        let result = self.load_with_fallback(staged.path());
        staged.close();

        result.map(|geometry| (geometry, MeshSource::Loader))
    }

    fn load_with_fallback(&self, path: &Path) -> Result<LoadedGeometry> {
        match self.loader.load(path, &LoadOptions::merged()) {
            Ok(geometry) => Ok(geometry),
            Err(first) => {
                tracing::debug!(error = %first, "Merged load failed, retrying without force_mesh");
                self.loader
                    .load(path, &LoadOptions::bodies())
                    .map_err(|e| ProcessingError::Unparseable(e.to_string()))
            }
        }
    }
}

/// Uploaded bytes on disk for the loader. Removed on drop.
struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    fn write(data: &[u8], extension: Option<&str>) -> Result<Self> {
        let suffix = extension.map(|ext| format!(".{ext}")).unwrap_or_default();
        let mut file = tempfile::Builder::new()
            .prefix("eshant-upload-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(data)?;
        file.flush()?;

        tracing::debug!(path = %file.path().display(), size = data.len(), "Staged upload");
        Ok(Self { file })
    }

    fn path(&self) -> &Path {
        self.file.path()
    }

    /// Remove the file now, logging instead of failing
    fn close(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::warn!(error = %e, path = %path.display(), "Failed to remove staged upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eshant_core::{Error as CoreError, RawMesh};
    use std::path::PathBuf;
    use std::sync::Mutex;

    fn tetrahedron(edge: f64) -> RawMesh {
        RawMesh::from_parts(
            vec![
                [0.0, 0.0, 0.0],
                [edge, 0.0, 0.0],
                [0.0, edge, 0.0],
                [0.0, 0.0, edge],
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
    }

    /// Records calls and fails the first `failures` of them
    struct ScriptedLoader {
        failures: usize,
        calls: Mutex<Vec<(PathBuf, bool, bool)>>,
    }

    impl ScriptedLoader {
        fn failing(failures: usize) -> Self {
            Self {
                failures,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(PathBuf, bool, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl GeometryLoader for ScriptedLoader {
        fn load(&self, path: &Path, options: &LoadOptions) -> eshant_core::Result<LoadedGeometry> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((path.to_path_buf(), options.force_mesh, path.exists()));
            if calls.len() <= self.failures {
                Err(CoreError::Stl("scripted failure".into()))
            } else {
                Ok(LoadedGeometry::List(vec![tetrahedron(20.0), tetrahedron(20.0)]))
            }
        }
    }

    #[test]
    fn test_merged_load_first() {
        let pipeline = GeometryPipeline::with_loader(ScriptedLoader::failing(0));
        let result = pipeline.analyze(b"solid", "part.stl").unwrap();

        let calls = pipeline.loader.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1);
        assert_eq!(result.stats.source, MeshSource::Loader);
        assert_eq!(result.stats.body_count, 2);
        assert_eq!(result.metrics.feature_count, 2);
    }

    #[test]
    fn test_retries_without_force_mesh() {
        let pipeline = GeometryPipeline::with_loader(ScriptedLoader::failing(1));
        pipeline.analyze(b"solid", "part.obj").unwrap();

        let flags: Vec<bool> = pipeline.loader.calls().iter().map(|c| c.1).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn test_both_attempts_failing_is_unparseable() {
        let pipeline = GeometryPipeline::with_loader(ScriptedLoader::failing(2));
        let err = pipeline.analyze(b"solid", "part.stl").unwrap_err();

        assert!(matches!(err, ProcessingError::Unparseable(_)));
        assert!(err.is_client_error());
        assert_eq!(pipeline.loader.calls().len(), 2);
    }

    #[test]
    fn test_staged_file_keeps_extension_and_is_removed() {
        for failures in [0, 2] {
            let pipeline = GeometryPipeline::with_loader(ScriptedLoader::failing(failures));
            let _ = pipeline.analyze(b"solid", "Part.STL");

            let calls = pipeline.loader.calls();
            let (path, _, existed) = &calls[0];
            assert!(existed);
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("stl"));
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_bad_container_falls_back_to_loader() {
        let pipeline = GeometryPipeline::with_loader(ScriptedLoader::failing(0));
        let result = pipeline.analyze(b"not a zip archive", "part.3mf").unwrap();

        assert_eq!(result.stats.source, MeshSource::Loader);
        assert_eq!(pipeline.loader.calls().len(), 1);
    }

    #[test]
    fn test_empty_body_list_is_client_error() {
        struct EmptyLoader;
        impl GeometryLoader for EmptyLoader {
            fn load(&self, _: &Path, _: &LoadOptions) -> eshant_core::Result<LoadedGeometry> {
                Ok(LoadedGeometry::Keyed(Vec::new()))
            }
        }

        let err = GeometryPipeline::with_loader(EmptyLoader)
            .analyze(b"", "part.obj")
            .unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyGeometry(_)));
        assert!(err.is_client_error());
    }
}
