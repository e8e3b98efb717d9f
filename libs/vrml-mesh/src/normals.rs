//! # Normal Synthesis
//!
//! Computes per-corner normals for a face set that carries none.
//!
//! ## Shading
//!
//! - [`Shading::Flat`]: every corner takes its face normal.
//! - [`Shading::Smooth`]: a corner averages the normals of the faces that
//!   share its position and lie within the crease angle of its own face.
//!
//! Faces with (near) zero area have no face normal. Their corners get
//! [`UP_AXIS`](crate::math::UP_AXIS), and they never contribute to a
//! neighbour's average.

use crate::math::{angle_between_unit, face_normal, UP_AXIS};
use crate::mesh::TriangleSoup;
use config::constants::EPSILON;
use glam::DVec3;

/// How corner normals are derived from face normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    Flat,
    /// Crease angle in radians
    Smooth { crease_angle: f64 },
}

impl Default for Shading {
    fn default() -> Self {
        Self::Flat
    }
}

impl Shading {
    /// Picks the shading for an optional crease angle.
    ///
    /// A missing, negative or non-finite angle gives flat shading.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vrml_mesh::Shading;
    ///
    /// assert_eq!(Shading::from_crease_angle(None), Shading::Flat);
    /// assert_eq!(Shading::from_crease_angle(Some(f64::NAN)), Shading::Flat);
    /// assert_eq!(
    ///     Shading::from_crease_angle(Some(0.5)),
    ///     Shading::Smooth { crease_angle: 0.5 }
    /// );
    /// ```
    pub fn from_crease_angle(angle: Option<f64>) -> Self {
        match angle {
            Some(crease_angle) if crease_angle.is_finite() && crease_angle >= 0.0 => {
                Self::Smooth { crease_angle }
            }
            _ => Self::Flat,
        }
    }
}

/// Face normal of every triangle, `None` for degenerate ones or ones with
/// an out-of-range index.
pub fn face_normals(positions: &[DVec3], triangles: &[[u32; 3]]) -> Vec<Option<DVec3>> {
    triangles
        .iter()
        .map(|tri| {
            let a = positions.get(tri[0] as usize)?;
            let b = positions.get(tri[1] as usize)?;
            let c = positions.get(tri[2] as usize)?;
            face_normal(*a, *b, *c)
        })
        .collect()
}

/// Computes three normals per triangle, in triangle order.
pub fn synthesize_normals(
    positions: &[DVec3],
    triangles: &[[u32; 3]],
    shading: Shading,
) -> Vec<DVec3> {
    let faces = face_normals(positions, triangles);

    match shading {
        Shading::Flat => faces
            .iter()
            .flat_map(|n| [n.unwrap_or(UP_AXIS); 3])
            .collect(),
        Shading::Smooth { crease_angle } => smooth(positions.len(), triangles, &faces, crease_angle),
    }
}

/// Replaces the soup's corner normals with synthesized ones.
pub fn apply_shading(soup: &mut TriangleSoup, shading: Shading) {
    soup.normals = Some(synthesize_normals(&soup.positions, &soup.triangles, shading));
}

fn smooth(
    position_count: usize,
    triangles: &[[u32; 3]],
    faces: &[Option<DVec3>],
    crease_angle: f64,
) -> Vec<DVec3> {
    // Faces incident to each position.
    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); position_count];
    for (face, tri) in triangles.iter().enumerate() {
        if faces[face].is_none() {
            continue;
        }
        for &index in tri {
            incident[index as usize].push(face);
        }
    }

    let mut normals = Vec::with_capacity(triangles.len() * 3);
    for (face, tri) in triangles.iter().enumerate() {
        let Some(own) = faces[face] else {
            normals.extend([UP_AXIS; 3]);
            continue;
        };
        for &index in tri {
            let sum: DVec3 = incident[index as usize]
                .iter()
                .filter_map(|&other| faces[other])
                .filter(|other| angle_between_unit(own, *other) <= crease_angle + EPSILON)
                .sum();
            normals.push(sum.try_normalize().unwrap_or(own));
        }
    }
    normals
}
