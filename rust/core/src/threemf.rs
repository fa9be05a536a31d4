// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3MF container parsing.
//!
//! A 3MF file is a ZIP archive whose `3D/3dmodel.model` part holds an XML
//! model. Two readers live here:
//!
//! - [`parse_container`] is the strict fast path. It requires the model root
//!   to be namespace-qualified and only looks at elements in that namespace.
//! - [`read_scene`] is the lenient reader used by the general loader. It
//!   matches on local names and returns one geometry entry per object.
//!
//! Only per-object vertices and triangles are read. Build items, components
//! and transforms are ignored.

use std::io::{Cursor, Read};
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::reader::NsReader;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::raw::{RawMesh, Scene};

/// Suffix identifying the model part inside the archive (lowercase)
pub const MODEL_PART_NAME: &str = "3dmodel.model";

/// Largest model part read into memory
pub const MAX_MODEL_PART_BYTES: u64 = 512 * 1024 * 1024;

/// Upfront reservation per archive byte; the declared size is untrusted
const RESERVE_PER_ARCHIVE_BYTE: u64 = 4;

/// Parse a 3MF archive straight into one merged triangle soup.
///
/// Every `object` with a `mesh` child becomes a sub-mesh; objects with no
/// vertices or no triangles are dropped. Fails when the model part is
/// missing, the XML is malformed, the root has no namespace, or nothing
/// survives.
pub fn parse_container(data: &[u8]) -> Result<RawMesh> {
    let content = read_model_part(data, false)?;
    let objects = collect_objects(&content, true)?;

    if objects.is_empty() {
        return Err(Error::NoGeometry);
    }

    tracing::debug!(objects = objects.len(), "Parsed 3MF container");
    Ok(RawMesh::concat(objects.iter().map(|(_, mesh)| mesh)))
}

/// Read a 3MF archive as a scene keyed by object id.
pub fn read_scene(data: &[u8]) -> Result<Scene> {
    let content = read_model_part(data, true)?;

    let mut scene = Scene::new();
    for (id, mesh) in collect_objects(&content, false)? {
        scene.add_geometry(id, mesh);
    }
    Ok(scene)
}

/// Locate and read the model part. The lenient reader also accepts any
/// `.model` entry when the canonical name is absent.
fn read_model_part(data: &[u8], lenient: bool) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let mut part = archive
        .file_names()
        .find(|name| name.to_ascii_lowercase().ends_with(MODEL_PART_NAME))
        .map(str::to_owned);

    if part.is_none() && lenient {
        part = archive
            .file_names()
            .find(|name| name.to_ascii_lowercase().ends_with(".model"))
            .map(str::to_owned);
    }

    let name = part.ok_or(Error::MissingModelPart(MODEL_PART_NAME))?;
    let mut file = archive.by_name(&name)?;
    let reserve = file
        .size()
        .min(data.len() as u64 * RESERVE_PER_ARCHIVE_BYTE)
        .min(MAX_MODEL_PART_BYTES);
    let mut content = String::with_capacity(reserve as usize);
    (&mut file)
        .take(MAX_MODEL_PART_BYTES + 1)
        .read_to_string(&mut content)?;
    if content.len() as u64 > MAX_MODEL_PART_BYTES {
        return Err(Error::ModelPartTooLarge {
            limit: MAX_MODEL_PART_BYTES,
        });
    }

    tracing::trace!(part = %name, size = content.len(), "Read 3MF model part");
    Ok(content)
}

/// Walk the model XML and collect `(object id, mesh)` pairs.
fn collect_objects(content: &str, strict: bool) -> Result<Vec<(String, RawMesh)>> {
    let mut reader = NsReader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut namespace: Option<Vec<u8>> = None;
    let mut collector = ObjectCollector::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if let Some(local) = element_name(&reader, e.name(), strict, &mut namespace)? {
                    collector.open(local, &e, false)?;
                }
            }
            Event::Empty(e) => {
                if let Some(local) = element_name(&reader, e.name(), strict, &mut namespace)? {
                    collector.open(local, &e, true)?;
                }
            }
            Event::End(e) => {
                if let Some(local) = element_name(&reader, e.name(), strict, &mut namespace)? {
                    collector.close(local)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(collector.objects)
}

/// Local name of an element, or `None` when strict mode says it lives
/// outside the model namespace. The first element seen is the root and fixes
/// the namespace.
fn element_name<'e>(
    reader: &NsReader<&[u8]>,
    name: QName<'e>,
    strict: bool,
    namespace: &mut Option<Vec<u8>>,
) -> Result<Option<&'e [u8]>> {
    let (resolved, local) = reader.resolve_element(name);
    if !strict {
        return Ok(Some(local.into_inner()));
    }

    let bound = match resolved {
        ResolveResult::Bound(ns) => Some(ns.as_ref().to_vec()),
        _ => None,
    };

    match namespace {
        None => {
            let ns = bound.ok_or(Error::MissingNamespace)?;
            *namespace = Some(ns);
            Ok(Some(local.into_inner()))
        }
        Some(root) => Ok((bound.as_deref() == Some(root.as_slice())).then(|| local.into_inner())),
    }
}

/// Object currently being read
#[derive(Default)]
struct ObjectBuilder {
    id: Option<String>,
    has_mesh: bool,
    mesh: RawMesh,
}

#[derive(Default)]
struct ObjectCollector {
    objects: Vec<(String, RawMesh)>,
    current: Option<ObjectBuilder>,
    seen: usize,
    in_mesh: bool,
    in_vertices: bool,
    in_triangles: bool,
}

impl ObjectCollector {
    fn open(&mut self, local: &[u8], element: &BytesStart<'_>, empty: bool) -> Result<()> {
        match local {
            b"object" if !empty => {
                self.current = Some(ObjectBuilder {
                    id: attribute_string(element, b"id"),
                    ..ObjectBuilder::default()
                });
            }
            b"mesh" => {
                if let Some(object) = self.current.as_mut() {
                    object.has_mesh = true;
                    self.in_mesh = !empty;
                }
            }
            b"vertices" => self.in_vertices = self.in_mesh && !empty,
            b"triangles" => self.in_triangles = self.in_mesh && !empty,
            b"vertex" if self.in_vertices => {
                if let Some(object) = self.current.as_mut() {
                    object.mesh.vertices.push(parse_vertex(element)?);
                }
            }
            b"triangle" if self.in_triangles => {
                if let Some(object) = self.current.as_mut() {
                    object.mesh.triangles.push(parse_triangle(element)?);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, local: &[u8]) -> Result<()> {
        match local {
            b"object" => {
                if let Some(object) = self.current.take() {
                    self.finish(object)?;
                }
            }
            b"mesh" => {
                self.in_mesh = false;
                self.in_vertices = false;
                self.in_triangles = false;
            }
            b"vertices" => self.in_vertices = false,
            b"triangles" => self.in_triangles = false,
            _ => {}
        }
        Ok(())
    }

    fn finish(&mut self, object: ObjectBuilder) -> Result<()> {
        let index = self.seen;
        self.seen += 1;

        if !object.has_mesh || object.mesh.is_empty() {
            tracing::trace!(object = index, "Skipping object without usable mesh");
            return Ok(());
        }

        let vertex_count = object.mesh.vertices.len();
        if let Some(&index) = object
            .mesh
            .triangles
            .iter()
            .flatten()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(Error::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        let id = object.id.unwrap_or_else(|| format!("object_{}", index));
        self.objects.push((id, object.mesh));
        Ok(())
    }
}

fn attribute_string(element: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Vertex from `x`, `y`, `z`; missing coordinates default to 0.
/// `NaN` and infinities are rejected.
fn parse_vertex(element: &BytesStart<'_>) -> Result<[f64; 3]> {
    let mut coords = [0.0_f64; 3];
    for attr in element.attributes().flatten() {
        let slot = match attr.key.as_ref() {
            b"x" => 0,
            b"y" => 1,
            b"z" => 2,
            _ => continue,
        };
        let value: f64 = parse_number(attr.key.as_ref(), &attr.value)?;
        if !value.is_finite() {
            return Err(Error::invalid_attribute(attr.key.as_ref(), &attr.value));
        }
        coords[slot] = value;
    }
    Ok(coords)
}

/// Triangle from `v1`, `v2`, `v3`; missing indices default to 0
fn parse_triangle(element: &BytesStart<'_>) -> Result<[u32; 3]> {
    let mut indices = [0_u32; 3];
    for attr in element.attributes().flatten() {
        let slot = match attr.key.as_ref() {
            b"v1" => 0,
            b"v2" => 1,
            b"v3" => 2,
            _ => continue,
        };
        indices[slot] = parse_number(attr.key.as_ref(), &attr.value)?;
    }
    Ok(indices)
}

fn parse_number<T: FromStr>(name: &[u8], value: &[u8]) -> Result<T> {
    std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| Error::invalid_attribute(name, value))
}
