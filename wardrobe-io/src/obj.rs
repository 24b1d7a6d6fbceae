//! OBJ format support
//!
//! Each `o` object (or, failing that, each `g` group) becomes one
//! [`MeshPart`]. `usemtl` switches never split a part. Corners are welded per
//! unique position/uv/normal triple and polygons are fan-triangulated.

use std::collections::HashMap;
use std::io::BufRead;

use obj::raw::object::{Polygon, Range};
use obj::raw::{parse_obj, RawObj};
use wardrobe_core::{Material, MeshPart, Model, Point3f, TriangleMesh, Vector3f};

use crate::error::IoError;
use crate::ModelReader;

pub struct ObjReader;

impl ModelReader for ObjReader {
    fn read_model<R: BufRead>(mut reader: R) -> Result<Model, IoError> {
        let mut text = String::new();
        std::io::Read::read_to_string(&mut reader, &mut text).map_err(|e| IoError::ParseError {
            message: format!("OBJ is not UTF-8 text: {}", e),
        })?;
        let raw = parse_obj(text.as_bytes()).map_err(|e| IoError::ParseError {
            message: e.to_string(),
        })?;
        build_model(&raw, &object_face_counts(&text))
    }
}

type CornerKey = (usize, Option<usize>, Option<usize>);

fn polygon_corners(polygon: &Polygon) -> Vec<CornerKey> {
    match polygon {
        Polygon::P(ps) => ps.iter().map(|&p| (p, None, None)).collect(),
        Polygon::PT(pts) => pts.iter().map(|&(p, t)| (p, Some(t), None)).collect(),
        Polygon::PN(pns) => pns.iter().map(|&(p, n)| (p, None, Some(n))).collect(),
        Polygon::PTN(ptns) => ptns.iter().map(|&(p, t, n)| (p, Some(t), Some(n))).collect(),
    }
}

/// `o` statements in file order, each with the number of faces it holds.
/// Faces before the first `o` form an object named "default". Empty when the
/// file has no `o` statement.
///
/// The raw parser keeps only the last object name, so object boundaries are
/// recovered from the text.
fn object_face_counts(text: &str) -> Vec<(String, usize)> {
    let mut objects: Vec<(String, usize)> = Vec::new();
    let mut named = false;
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("o") => {
                named = true;
                objects.push((tokens.collect::<Vec<_>>().join(" "), 0));
            }
            Some("f") => match objects.last_mut() {
                Some((_, count)) => *count += 1,
                None => objects.push(("default".to_string(), 1)),
            },
            _ => {}
        }
    }
    if named {
        objects
    } else {
        Vec::new()
    }
}

/// Named polygon ranges, one entry per leaf part, in file order
fn leaf_ranges(raw: &RawObj, objects: &[(String, usize)]) -> Vec<(String, Vec<Range>)> {
    let object_faces: usize = objects.iter().map(|(_, count)| count).sum();
    if !objects.is_empty() && object_faces == raw.polygons.len() {
        let mut start = 0;
        return objects
            .iter()
            .filter_map(|(name, count)| {
                let range = Range {
                    start,
                    end: start + count,
                };
                start += count;
                (*count > 0).then(|| (name.clone(), vec![range]))
            })
            .collect();
    }

    let mut leaves: Vec<(String, Vec<Range>)> = raw
        .groups
        .iter()
        .filter(|(_, group)| group.polygons.iter().any(|r| r.end > r.start))
        .map(|(name, group)| (name.clone(), group.polygons.clone()))
        .collect();
    leaves.sort_by_key(|(_, ranges)| ranges.iter().map(|r| r.start).min().unwrap_or(0));

    if leaves.is_empty() && !raw.polygons.is_empty() {
        let name = raw.name.clone().unwrap_or_else(|| "default".to_string());
        leaves.push((
            name,
            vec![Range {
                start: 0,
                end: raw.polygons.len(),
            }],
        ));
    }
    leaves
}

fn build_part(raw: &RawObj, name: String, ranges: &[Range]) -> Result<MeshPart, IoError> {
    let mut mesh = TriangleMesh::new();
    let mut normals: Vec<Vector3f> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut all_normals = true;
    let mut all_tex_coords = true;
    let mut welded: HashMap<CornerKey, usize> = HashMap::new();

    for range in ranges {
        let polygons = raw.polygons.get(range.start..range.end).ok_or_else(|| IoError::ParseError {
            message: format!("polygon range {}..{} out of bounds", range.start, range.end),
        })?;

        for polygon in polygons {
            let corners = polygon_corners(polygon);
            if corners.len() < 3 {
                continue;
            }

            let mut indices = Vec::with_capacity(corners.len());
            for key in corners {
                if let Some(&index) = welded.get(&key) {
                    indices.push(index);
                    continue;
                }

                let (p, t, n) = key;
                let &(x, y, z, _) = raw.positions.get(p).ok_or_else(|| IoError::ParseError {
                    message: format!("position index {} out of bounds", p),
                })?;
                let index = mesh.add_vertex(Point3f::new(x, y, z));

                match n.and_then(|n| raw.normals.get(n)) {
                    Some(&(nx, ny, nz)) => normals.push(Vector3f::new(nx, ny, nz)),
                    None => {
                        all_normals = false;
                        normals.push(Vector3f::zeros());
                    }
                }
                match t.and_then(|t| raw.tex_coords.get(t)) {
                    // Flip v: OBJ is bottom-left, textures are sampled top-left
                    Some(&(u, v, _)) => tex_coords.push([u, 1.0 - v]),
                    None => {
                        all_tex_coords = false;
                        tex_coords.push([0.0, 0.0]);
                    }
                }

                welded.insert(key, index);
                indices.push(index);
            }

            for i in 1..indices.len() - 1 {
                mesh.add_face([indices[0], indices[i], indices[i + 1]]);
            }
        }
    }

    if all_normals && !normals.is_empty() {
        mesh.set_normals(normals);
    } else {
        mesh.compute_vertex_normals();
    }
    if all_tex_coords && !tex_coords.is_empty() {
        mesh.set_tex_coords(tex_coords);
    }

    Ok(MeshPart::new(name, mesh, Material::default()))
}

fn build_model(raw: &RawObj, objects: &[(String, usize)]) -> Result<Model, IoError> {
    let parts = leaf_ranges(raw, objects)
        .into_iter()
        .map(|(name, ranges)| build_part(raw, name, &ranges))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Model::new(parts.into_iter().filter(|p| !p.mesh.is_empty()).collect()))
}
