// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 The genapt Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The binary scenery object format (spec §6): a self-describing tagged
//! record stream — bounding sphere, WGS-84 vertex/normal/texcoord
//! arrays, then per-group index sets referencing those arrays.
//!
//! The spec notes the real format's "legacy magic number and section
//! tags are inherited from the consumer renderer and must be
//! byte-compatible"; no such renderer ships in this workspace, so the
//! magic number and tag values below are this crate's own, documented
//! placeholder rather than a verified match to any external reader.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Error;

const MAGIC: &[u8; 8] = b"GENAPT01";

const TAG_VERTICES: u32 = 1;
const TAG_NORMALS: u32 = 2;
const TAG_TEXCOORDS: u32 = 3;
const TAG_GROUP_POINTS: u32 = 10;
const TAG_GROUP_TRIANGLES: u32 = 11;
const TAG_GROUP_STRIP: u32 = 12;
const TAG_EOF: u32 = 0;

/// What kind of primitive a [`Group`]'s indices describe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GroupKind {
    Points,
    Triangles,
    TriangleStrip,
}

/// One material-tagged index set into the object's shared vertex,
/// normal and texcoord arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub material: String,
    pub kind: GroupKind,
    pub indices: Vec<u32>,
}

/// A complete scenery object ready to serialize: shared vertex/normal/
/// texcoord arrays plus the groups that index into them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneObject {
    pub bounding_center: (f64, f64, f64),
    pub bounding_radius: f32,
    pub vertices: Vec<(f64, f64, f64)>,
    pub normals: Vec<(f32, f32, f32)>,
    pub texcoords: Vec<(f32, f32)>,
    pub groups: Vec<Group>,
}

/// Computes a bounding sphere centered on the vertex centroid, with
/// radius at least the farthest vertex distance (spec property 6).
pub fn bounding_sphere(vertices: &[(f64, f64, f64)]) -> ((f64, f64, f64), f32) {
    if vertices.is_empty() {
        return ((0.0, 0.0, 0.0), 0.0);
    }
    let n = vertices.len() as f64;
    let sum = vertices.iter().fold((0.0, 0.0, 0.0), |acc, v| (acc.0 + v.0, acc.1 + v.1, acc.2 + v.2));
    let center = (sum.0 / n, sum.1 / n, sum.2 / n);
    let radius = vertices
        .iter()
        .map(|v| {
            let dx = v.0 - center.0;
            let dy = v.1 - center.1;
            let dz = v.2 - center.2;
            (dx * dx + dy * dy + dz * dz).sqrt()
        })
        .fold(0.0_f64, f64::max);
    (center, radius as f32)
}

impl SceneObject {
    /// Builds a scene object, deriving the bounding sphere from
    /// `vertices`.
    pub fn new(
        vertices: Vec<(f64, f64, f64)>,
        normals: Vec<(f32, f32, f32)>,
        texcoords: Vec<(f32, f32)>,
        groups: Vec<Group>,
    ) -> Self {
        let (bounding_center, bounding_radius) = bounding_sphere(&vertices);
        Self {
            bounding_center,
            bounding_radius,
            vertices,
            normals,
            texcoords,
            groups,
        }
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), Error> {
        let file = File::create(path)?;
        self.write(&mut BufWriter::new(file))
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        w.write_all(MAGIC)?;
        w.write_u32::<LittleEndian>(1)?; // format version

        w.write_f64::<LittleEndian>(self.bounding_center.0)?;
        w.write_f64::<LittleEndian>(self.bounding_center.1)?;
        w.write_f64::<LittleEndian>(self.bounding_center.2)?;
        w.write_f32::<LittleEndian>(self.bounding_radius)?;

        w.write_u32::<LittleEndian>(TAG_VERTICES)?;
        w.write_u32::<LittleEndian>(self.vertices.len() as u32)?;
        for v in &self.vertices {
            w.write_f64::<LittleEndian>(v.0)?;
            w.write_f64::<LittleEndian>(v.1)?;
            w.write_f64::<LittleEndian>(v.2)?;
        }

        w.write_u32::<LittleEndian>(TAG_NORMALS)?;
        w.write_u32::<LittleEndian>(self.normals.len() as u32)?;
        for n in &self.normals {
            w.write_f32::<LittleEndian>(n.0)?;
            w.write_f32::<LittleEndian>(n.1)?;
            w.write_f32::<LittleEndian>(n.2)?;
        }

        w.write_u32::<LittleEndian>(TAG_TEXCOORDS)?;
        w.write_u32::<LittleEndian>(self.texcoords.len() as u32)?;
        for t in &self.texcoords {
            w.write_f32::<LittleEndian>(t.0)?;
            w.write_f32::<LittleEndian>(t.1)?;
        }

        for group in &self.groups {
            let tag = match group.kind {
                GroupKind::Points => TAG_GROUP_POINTS,
                GroupKind::Triangles => TAG_GROUP_TRIANGLES,
                GroupKind::TriangleStrip => TAG_GROUP_STRIP,
            };
            w.write_u32::<LittleEndian>(tag)?;
            let material_bytes = group.material.as_bytes();
            w.write_u16::<LittleEndian>(material_bytes.len() as u16)?;
            w.write_all(material_bytes)?;
            w.write_u32::<LittleEndian>(group.indices.len() as u32)?;
            for &idx in &group.indices {
                w.write_u32::<LittleEndian>(idx)?;
            }
        }

        w.write_u32::<LittleEndian>(TAG_EOF)?;
        Ok(())
    }

    pub fn read_from_path(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        Self::read(&mut BufReader::new(file))
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self, Error> {
        let mut magic = [0u8; 8];
        r.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(Error::InputFormat("bad scenery object magic number".into()));
        }
        let _version = r.read_u32::<LittleEndian>()?;

        let bounding_center = (
            r.read_f64::<LittleEndian>()?,
            r.read_f64::<LittleEndian>()?,
            r.read_f64::<LittleEndian>()?,
        );
        let bounding_radius = r.read_f32::<LittleEndian>()?;

        let mut vertices = Vec::new();
        let mut normals = Vec::new();
        let mut texcoords = Vec::new();
        let mut groups = Vec::new();

        loop {
            let tag = r.read_u32::<LittleEndian>()?;
            match tag {
                TAG_EOF => break,
                TAG_VERTICES => {
                    let count = r.read_u32::<LittleEndian>()?;
                    for _ in 0..count {
                        vertices.push((
                            r.read_f64::<LittleEndian>()?,
                            r.read_f64::<LittleEndian>()?,
                            r.read_f64::<LittleEndian>()?,
                        ));
                    }
                }
                TAG_NORMALS => {
                    let count = r.read_u32::<LittleEndian>()?;
                    for _ in 0..count {
                        normals.push((
                            r.read_f32::<LittleEndian>()?,
                            r.read_f32::<LittleEndian>()?,
                            r.read_f32::<LittleEndian>()?,
                        ));
                    }
                }
                TAG_TEXCOORDS => {
                    let count = r.read_u32::<LittleEndian>()?;
                    for _ in 0..count {
                        texcoords.push((r.read_f32::<LittleEndian>()?, r.read_f32::<LittleEndian>()?));
                    }
                }
                TAG_GROUP_POINTS | TAG_GROUP_TRIANGLES | TAG_GROUP_STRIP => {
                    let kind = match tag {
                        TAG_GROUP_POINTS => GroupKind::Points,
                        TAG_GROUP_TRIANGLES => GroupKind::Triangles,
                        _ => GroupKind::TriangleStrip,
                    };
                    let material_len = r.read_u16::<LittleEndian>()? as usize;
                    let mut material_bytes = vec![0u8; material_len];
                    r.read_exact(&mut material_bytes)?;
                    let material = String::from_utf8(material_bytes)
                        .map_err(|e| Error::InputFormat(format!("bad material string: {e}")))?;
                    let index_count = r.read_u32::<LittleEndian>()?;
                    let mut indices = Vec::with_capacity(index_count as usize);
                    for _ in 0..index_count {
                        indices.push(r.read_u32::<LittleEndian>()?);
                    }
                    groups.push(Group { material, kind, indices });
                }
                other => {
                    return Err(Error::InputFormat(format!("unknown scenery object tag {other}")));
                }
            }
        }

        Ok(Self {
            bounding_center,
            bounding_radius,
            vertices,
            normals,
            texcoords,
            groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_object() -> SceneObject {
        let vertices = vec![(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (0.0, 10.0, 0.0)];
        let normals = vec![(0.0, 0.0, 1.0); 3];
        let texcoords = vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        let groups = vec![Group {
            material: "pa_rwy".into(),
            kind: GroupKind::Triangles,
            indices: vec![0, 1, 2],
        }];
        SceneObject::new(vertices, normals, texcoords, groups)
    }

    #[test]
    fn bounding_sphere_covers_every_vertex() {
        let object = sample_object();
        for v in &object.vertices {
            let dx = v.0 - object.bounding_center.0;
            let dy = v.1 - object.bounding_center.1;
            let dz = v.2 - object.bounding_center.2;
            let dist = (dx * dx + dy * dy + dz * dz).sqrt();
            assert!(dist <= object.bounding_radius as f64 + 1e-6);
        }
    }

    #[test]
    fn write_then_read_roundtrips() {
        let object = sample_object();
        let mut buf = Vec::new();
        object.write(&mut buf).unwrap();
        let back = SceneObject::read(&mut buf.as_slice()).unwrap();
        assert_eq!(back, object);
    }

    #[test]
    fn rejects_bad_magic() {
        let buf = vec![0u8; 32];
        assert!(SceneObject::read(&mut buf.as_slice()).is_err());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kxyz.btg");
        let object = sample_object();
        object.write_to_path(&path).unwrap();
        let back = SceneObject::read_from_path(&path).unwrap();
        assert_eq!(back, object);
    }
}
