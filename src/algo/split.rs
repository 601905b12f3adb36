/*!
 * Materializing split buckets as new meshes.
 *
 * Each bucket becomes a mesh holding exactly the bucket's vertices, renumbered to a contiguous
 * range in ascending source order, plus every face whose vertices all made it into the bucket.
 * Faces straddling a cut survive only on a side that contains all of their vertices; if no side
 * does, they are dropped.
 */

use log::debug;

use super::membership::Bucket;
use crate::error::{EmptyGroupError, Error, HostWriteError};
use crate::host::{MeshHandle, MeshReader, MeshWriter, ObjectHandle};
use crate::index::Index;
use crate::Real;

/// Options for separating vertex groups into new objects.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeparateOptions {
    /// Name each new object and its mesh after the group it was separated from, and drop vertex
    /// groups that end up with no members on the new mesh. Otherwise the host picks default
    /// names and the full group table is carried over.
    pub rename_separated: bool,
}

/// A vertex group's membership as read from the host.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupMembership {
    pub name: String,
    pub entries: Vec<(usize, f32)>,
}

/// Everything the splitter needs from the source mesh, read once up front.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceSnapshot<T> {
    pub mesh: MeshHandle,
    pub positions: Vec<[T; 3]>,
    pub faces: Vec<Vec<usize>>,
    pub groups: Vec<GroupMembership>,
    pub selection: Vec<bool>,
}

impl<T: Real> SourceSnapshot<T> {
    pub fn read<R: MeshReader<Scalar = T> + ?Sized>(reader: &R, mesh: MeshHandle) -> Self {
        let groups = reader
            .groups(mesh)
            .into_iter()
            .map(|g| GroupMembership {
                entries: reader.membership(mesh, g.index),
                name: g.name,
            })
            .collect();
        SourceSnapshot {
            mesh,
            positions: reader.vertex_positions(mesh),
            faces: reader.faces(mesh),
            groups,
            selection: reader.vertex_selection(mesh),
        }
    }
}

/// Geometry cut out of a mesh for a given set of vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction<T> {
    pub positions: Vec<[T; 3]>,
    pub faces: Vec<Vec<usize>>,
    /// Map from source vertex index to extracted vertex index. Vertices that were not kept
    /// map to `Index::INVALID`.
    pub vertex_map: Vec<Index>,
    /// Number of source faces that did not fit entirely inside the kept vertices.
    pub dropped_faces: usize,
}

/// Extract the vertices listed in `keep` along with all faces fully contained in them.
///
/// `keep` is expected in ascending order; out of range and repeated entries are skipped.
pub fn extract<T: Copy>(
    positions: &[[T; 3]],
    faces: &[Vec<usize>],
    keep: &[usize],
) -> Extraction<T> {
    // Record where the kept vertices end up.
    let mut vertex_map = vec![Index::INVALID; positions.len()];
    let mut new_positions = Vec::with_capacity(keep.len());
    for &vidx in keep {
        match vertex_map.get_mut(vidx) {
            Some(new_idx) if !new_idx.is_valid() => {
                *new_idx = new_positions.len().into();
                new_positions.push(positions[vidx]);
            }
            _ => {}
        }
    }

    let new_vertex_index_slice: &[usize] = bytemuck::cast_slice(vertex_map.as_slice());

    // Transfer faces. A face is kept only if all of its vertices were.
    let mut new_faces = Vec::new();
    let mut dropped_faces = 0;
    for face in faces {
        let inside = face
            .iter()
            .all(|&v| vertex_map.get(v).map_or(false, |i| i.is_valid()));
        if inside {
            new_faces.push(face.iter().map(|&v| new_vertex_index_slice[v]).collect());
        } else {
            dropped_faces += 1;
        }
    }

    Extraction {
        positions: new_positions,
        faces: new_faces,
        vertex_map,
        dropped_faces,
    }
}

/// Project every group's membership through `vertex_map`, keeping only entries whose vertex
/// survived.
pub fn project_groups(groups: &[GroupMembership], vertex_map: &[Index]) -> Vec<GroupMembership> {
    groups
        .iter()
        .map(|g| GroupMembership {
            name: g.name.clone(),
            entries: g
                .entries
                .iter()
                .filter_map(|&(v, w)| {
                    let new_v = vertex_map.get(v).copied().unwrap_or(Index::INVALID);
                    new_v.into_option().map(|new_v| (new_v, w))
                })
                .collect(),
        })
        .collect()
}

/// Project per-vertex selection flags through `vertex_map`.
pub fn project_selection(
    selection: &[bool],
    vertex_map: &[Index],
    num_vertices: usize,
) -> Vec<bool> {
    let mut projected = vec![false; num_vertices];
    for (&selected, new_idx) in selection.iter().zip(vertex_map.iter()) {
        new_idx.if_valid(|i| projected[i] = selected);
    }
    projected
}

/// A bucket that was turned into a new object.
#[derive(Clone, Debug, PartialEq)]
pub struct Separated {
    pub group: String,
    pub mesh: MeshHandle,
    pub object: ObjectHandle,
    pub vertex_count: usize,
    pub face_count: usize,
    /// Map from source vertex index to vertex index on the new mesh.
    pub vertex_map: Vec<Index>,
}

/// Create a new mesh and object for `bucket`.
///
/// Empty buckets produce an [`EmptyGroupError`] and create nothing. Host failures are returned
/// as they are; anything written before the failure stays written.
pub fn materialize<W: MeshWriter + ?Sized>(
    writer: &mut W,
    source: &SourceSnapshot<W::Scalar>,
    bucket: &Bucket,
    options: SeparateOptions,
) -> Result<Separated, Error> {
    if bucket.is_empty() {
        return Err(EmptyGroupError {
            group: bucket.name.clone(),
        }
        .into());
    }

    let Extraction {
        positions,
        faces,
        vertex_map,
        dropped_faces,
    } = extract(&source.positions, &source.faces, &bucket.vertices);
    let vertex_count = positions.len();
    let face_count = faces.len();

    let name = if options.rename_separated {
        Some(bucket.name.as_str())
    } else {
        None
    };

    let mesh = writer.create_mesh(name, positions, faces)?;

    for group in project_groups(&source.groups, &vertex_map) {
        if options.rename_separated && group.entries.is_empty() {
            continue;
        }
        writer.set_group_membership(mesh, &group.name, &group.entries)?;
    }

    let selection = project_selection(&source.selection, &vertex_map, vertex_count);
    writer.set_vertex_selection(mesh, &selection)?;

    let object = writer.create_object_from_mesh(mesh, name)?;

    debug!(
        "separated '{}' into mesh {} ({} vertices, {} faces, {} faces dropped)",
        bucket.name, mesh, vertex_count, face_count, dropped_faces
    );

    Ok(Separated {
        group: bucket.name.clone(),
        mesh,
        object,
        vertex_count,
        face_count,
        vertex_map,
    })
}

/// Shape of the source mesh after its separated vertices were removed.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceRewrite {
    pub vertex_count: usize,
    pub face_count: usize,
    pub vertex_map: Vec<Index>,
}

/// Reduce the source mesh to the vertices in `keep`, carrying over every group (including ones
/// left without members) and the vertex selection.
pub fn rewrite_source<W: MeshWriter + ?Sized>(
    writer: &mut W,
    source: &SourceSnapshot<W::Scalar>,
    keep: &[usize],
) -> Result<SourceRewrite, HostWriteError> {
    let Extraction {
        positions,
        faces,
        vertex_map,
        dropped_faces,
    } = extract(&source.positions, &source.faces, keep);
    let vertex_count = positions.len();
    let face_count = faces.len();

    writer.replace_geometry(source.mesh, positions, faces)?;
    for group in project_groups(&source.groups, &vertex_map) {
        writer.set_group_membership(source.mesh, &group.name, &group.entries)?;
    }
    let selection = project_selection(&source.selection, &vertex_map, vertex_count);
    writer.set_vertex_selection(source.mesh, &selection)?;

    debug!(
        "source mesh {} keeps {} vertices and {} faces ({} faces dropped)",
        source.mesh, vertex_count, face_count, dropped_faces
    );

    Ok(SourceRewrite {
        vertex_count,
        face_count,
        vertex_map,
    })
}
