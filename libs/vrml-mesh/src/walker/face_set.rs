//! # Indexed Geometry Assembly
//!
//! Turns `IndexedFaceSet`, `IndexedLineSet` and `PointSet` fields into
//! geometry. Every index is checked before it is used; a bad one fails the
//! whole Shape with [`MeshError::MalformedFaceSet`].
//!
//! ## Face-set pipeline
//!
//! ```text
//! coordIndex loops → fan triangulation → corner UVs → corner normals → weld
//! ```
//!
//! UV sources, first match wins:
//!
//! 1. `texCoordIndex` loops into `texCoord.point`
//! 2. the coordinate loops into `texCoord.point`
//! 3. the planar `(x, y)` of each corner's position
//!
//! Normals come from `normal.vector` when present (per vertex or per face,
//! following `normalPerVertex`); otherwise they are synthesized.

use crate::error::MeshError;
use crate::math::normalize_or_up;
use crate::mesh::{CompactMesh, LineSet, PointCloud, TriangleSoup};
use crate::normals::{synthesize_normals, Shading};
use crate::options::ConvertOptions;
use crate::triangulate::{triangle_count, triangulate_loop};
use crate::weld::weld;
use config::constants::MAX_VERTICES;
use glam::{DVec2, DVec3};
use vrml_nodes::{IndexedFaceSetFields, IndexedLineSetFields, PointSetFields};

/// Face-set settings after per-node overrides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceSetSettings {
    pub ccw: bool,
    pub shading: Shading,
    pub emit_uv: bool,
    pub weld_epsilon: f64,
}

impl FaceSetSettings {
    /// The node's own `ccw` and `creaseAngle` take precedence over the
    /// conversion options.
    pub fn resolve(fields: &IndexedFaceSetFields, options: &ConvertOptions) -> Self {
        Self {
            ccw: fields.ccw.unwrap_or(options.ccw),
            shading: Shading::from_crease_angle(fields.crease_angle.or(options.crease_angle)),
            emit_uv: options.emit_uv,
            weld_epsilon: options.weld_epsilon,
        }
    }
}

// =============================================================================
// FACE SETS
// =============================================================================

/// Builds the welded mesh of an `IndexedFaceSet`.
pub fn build_face_set(
    fields: &IndexedFaceSetFields,
    settings: &FaceSetSettings,
) -> Result<CompactMesh, MeshError> {
    let point_count = fields.points.len();
    let loops = match &fields.coord_index {
        Some(index) => checked_loops(index, point_count, "coordIndex", "coord.point")?,
        None => consecutive_triangles(point_count),
    };

    let triangles = triangle_count(&loops);
    if triangles * 3 > MAX_VERTICES {
        return Err(MeshError::TooManyVertices {
            count: triangles * 3,
            max: MAX_VERTICES,
        });
    }

    let mut soup = TriangleSoup::new(fields.points.clone());
    soup.triangles.reserve(triangles);
    for polygon in &loops {
        soup.append_polygon(polygon, settings.ccw);
    }

    if settings.emit_uv {
        soup.uvs = Some(corner_uvs(fields, &loops, &soup, settings.ccw)?);
    }
    soup.normals = Some(corner_normals(fields, &loops, &soup, settings)?);

    Ok(weld(&soup, settings.weld_epsilon))
}

fn corner_uvs(
    fields: &IndexedFaceSetFields,
    loops: &[Vec<u32>],
    soup: &TriangleSoup,
    ccw: bool,
) -> Result<Vec<DVec2>, MeshError> {
    match (&fields.tex_coord_index, &fields.tex_coords) {
        (Some(_), None) => Err(MeshError::malformed("texCoordIndex given without texCoord")),
        (Some(index), Some(points)) => {
            let uv_loops = checked_loops(index, points.len(), "texCoordIndex", "texCoord.point")?;
            require_parallel(loops, &uv_loops, "texCoordIndex")?;
            Ok(gather(&uv_loops, points, ccw))
        }
        (None, Some(points)) => {
            require_in_range(loops, points.len(), "coordIndex", "texCoord.point")?;
            Ok(gather(loops, points, ccw))
        }
        (None, None) => Ok(soup
            .triangles
            .iter()
            .flatten()
            .map(|&i| soup.positions[i as usize].truncate())
            .collect()),
    }
}

fn corner_normals(
    fields: &IndexedFaceSetFields,
    loops: &[Vec<u32>],
    soup: &TriangleSoup,
    settings: &FaceSetSettings,
) -> Result<Vec<DVec3>, MeshError> {
    let Some(vectors) = &fields.normals else {
        return Ok(synthesize_normals(
            &soup.positions,
            &soup.triangles,
            settings.shading,
        ));
    };

    let gathered = if fields.normal_per_vertex {
        match &fields.normal_index {
            Some(index) => {
                let normal_loops = checked_loops(index, vectors.len(), "normalIndex", "normal.vector")?;
                require_parallel(loops, &normal_loops, "normalIndex")?;
                gather(&normal_loops, vectors, settings.ccw)
            }
            None => {
                require_in_range(loops, vectors.len(), "coordIndex", "normal.vector")?;
                gather(loops, vectors, settings.ccw)
            }
        }
    } else {
        per_face_normals(fields, loops, vectors)?
    };

    Ok(gathered.into_iter().map(normalize_or_up).collect())
}

/// One normal per polygon, repeated over the polygon's corners.
///
/// `normalIndex` holds one index per face; without it face `i` uses
/// `normal.vector[i]`.
fn per_face_normals(
    fields: &IndexedFaceSetFields,
    loops: &[Vec<u32>],
    vectors: &[DVec3],
) -> Result<Vec<DVec3>, MeshError> {
    let face_indices: Vec<i64> = match &fields.normal_index {
        Some(index) => index.iter().flatten().copied().collect(),
        None => (0..loops.len() as i64).collect(),
    };
    if face_indices.len() < loops.len() {
        return Err(MeshError::malformed(format!(
            "normalIndex has {} entries for {} faces",
            face_indices.len(),
            loops.len()
        )));
    }

    let mut out = Vec::with_capacity(triangle_count(loops) * 3);
    for (face, (polygon, &index)) in loops.iter().zip(&face_indices).enumerate() {
        let normal = usize::try_from(index)
            .ok()
            .and_then(|i| vectors.get(i))
            .ok_or_else(|| {
                MeshError::malformed(format!(
                    "normalIndex face {face}: index {index} outside normal.vector ({} entries)",
                    vectors.len()
                ))
            })?;
        out.extend(std::iter::repeat(*normal).take(polygon.len().saturating_sub(2) * 3));
    }
    Ok(out)
}

// =============================================================================
// LINE AND POINT SETS
// =============================================================================

/// Builds the segments of an `IndexedLineSet`. A polyline of `n` indices
/// gives `n - 1` segments.
pub fn build_line_set(fields: &IndexedLineSetFields) -> Result<LineSet, MeshError> {
    let polylines = checked_loops(
        &fields.coord_index,
        fields.points.len(),
        "coordIndex",
        "coord.point",
    )?;

    let segments = polylines
        .iter()
        .flat_map(|line| line.windows(2).map(|pair| [pair[0], pair[1]]))
        .collect();

    Ok(LineSet {
        positions: fields.points.clone(),
        segments,
    })
}

/// Copies the points of a `PointSet`.
pub fn build_point_set(fields: &PointSetFields) -> PointCloud {
    PointCloud {
        positions: fields.points.clone(),
    }
}

// =============================================================================
// INDEX HELPERS
// =============================================================================

/// Converts raw loops to `u32`, rejecting indices outside `0..bound`.
fn checked_loops(
    loops: &[Vec<i64>],
    bound: usize,
    field: &str,
    target: &str,
) -> Result<Vec<Vec<u32>>, MeshError> {
    loops
        .iter()
        .enumerate()
        .map(|(polygon, indices)| {
            indices
                .iter()
                .map(|&index| {
                    u32::try_from(index)
                        .ok()
                        .filter(|&i| (i as usize) < bound)
                        .ok_or_else(|| out_of_range(field, polygon, index, target, bound))
                })
                .collect()
        })
        .collect()
}

/// Rejects already converted loops that reach past `bound`.
fn require_in_range(
    loops: &[Vec<u32>],
    bound: usize,
    field: &str,
    target: &str,
) -> Result<(), MeshError> {
    for (polygon, indices) in loops.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= bound) {
            return Err(out_of_range(field, polygon, i64::from(index), target, bound));
        }
    }
    Ok(())
}

/// Parallel loops must match the coordinate loops one-to-one in count and
/// length so their triangles line up.
fn require_parallel(coords: &[Vec<u32>], other: &[Vec<u32>], field: &str) -> Result<(), MeshError> {
    if coords.len() != other.len() {
        return Err(MeshError::malformed(format!(
            "{field} has {} polygons, coordIndex has {}",
            other.len(),
            coords.len()
        )));
    }
    for (polygon, (c, o)) in coords.iter().zip(other).enumerate() {
        if c.len() != o.len() {
            return Err(MeshError::malformed(format!(
                "{field} polygon {polygon} has {} indices, coordIndex has {}",
                o.len(),
                c.len()
            )));
        }
    }
    Ok(())
}

/// Reads `values` through the fan triangulation of `loops`, three per
/// triangle. Indices must already be in range.
fn gather<T: Copy>(loops: &[Vec<u32>], values: &[T], ccw: bool) -> Vec<T> {
    loops
        .iter()
        .flat_map(|polygon| triangulate_loop(polygon, ccw))
        .flatten()
        .map(|i| values[i as usize])
        .collect()
}

/// Without `coordIndex`, consecutive coordinate triples are triangles.
fn consecutive_triangles(point_count: usize) -> Vec<Vec<u32>> {
    if point_count % 3 != 0 {
        log::debug!(
            "IndexedFaceSet without coordIndex ignores {} trailing point(s)",
            point_count % 3
        );
    }
    (0..(point_count / 3) as u32)
        .map(|t| vec![3 * t, 3 * t + 1, 3 * t + 2])
        .collect()
}

fn out_of_range(field: &str, polygon: usize, index: i64, target: &str, bound: usize) -> MeshError {
    MeshError::malformed(format!(
        "{field} polygon {polygon}: index {index} outside {target} ({bound} entries)"
    ))
}
