// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File format detection from the declared filename.

use std::path::Path;

/// Mesh formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    Stl,
    Obj,
    ThreeMf,
}

impl MeshFormat {
    /// Detect format from a file extension (case-insensitive, no leading dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "stl" => Some(MeshFormat::Stl),
            "obj" => Some(MeshFormat::Obj),
            "3mf" => Some(MeshFormat::ThreeMf),
            _ => None,
        }
    }

    /// Detect format from a path or declared upload filename
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Extension of a declared filename, lowercased
pub fn extension_hint(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_case_insensitively() {
        assert_eq!(MeshFormat::from_path("part.STL"), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_path("dir/part.obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path("Part.3MF"), Some(MeshFormat::ThreeMf));
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(MeshFormat::from_path("part.step"), None);
        assert_eq!(MeshFormat::from_path("part"), None);
        assert_eq!(extension_hint("part"), None);
        assert_eq!(extension_hint("a.b.GLB"), Some("glb".to_string()));
    }
}
