//! # Box Primitive
//!
//! Generates the mesh for the VRML `Box` node.

use super::require_positive;
use crate::error::MeshError;
use crate::mesh::{CompactMesh, TriangleSoup};
use crate::weld::weld;
use config::constants::DEFAULT_WELD_EPSILON;
use glam::{DVec2, DVec3};

/// Unit-cube corners of each face, counter-clockwise seen from outside,
/// paired with the face's outward normal.
const FACES: [(DVec3, [DVec3; 4]); 6] = [
    (
        DVec3::X,
        [
            DVec3::new(1.0, -1.0, 1.0),
            DVec3::new(1.0, -1.0, -1.0),
            DVec3::new(1.0, 1.0, -1.0),
            DVec3::new(1.0, 1.0, 1.0),
        ],
    ),
    (
        DVec3::NEG_X,
        [
            DVec3::new(-1.0, -1.0, -1.0),
            DVec3::new(-1.0, -1.0, 1.0),
            DVec3::new(-1.0, 1.0, 1.0),
            DVec3::new(-1.0, 1.0, -1.0),
        ],
    ),
    (
        DVec3::Y,
        [
            DVec3::new(-1.0, 1.0, 1.0),
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(1.0, 1.0, -1.0),
            DVec3::new(-1.0, 1.0, -1.0),
        ],
    ),
    (
        DVec3::NEG_Y,
        [
            DVec3::new(-1.0, -1.0, -1.0),
            DVec3::new(1.0, -1.0, -1.0),
            DVec3::new(1.0, -1.0, 1.0),
            DVec3::new(-1.0, -1.0, 1.0),
        ],
    ),
    (
        DVec3::Z,
        [
            DVec3::new(-1.0, -1.0, 1.0),
            DVec3::new(1.0, -1.0, 1.0),
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(-1.0, 1.0, 1.0),
        ],
    ),
    (
        DVec3::NEG_Z,
        [
            DVec3::new(1.0, -1.0, -1.0),
            DVec3::new(-1.0, -1.0, -1.0),
            DVec3::new(-1.0, 1.0, -1.0),
            DVec3::new(1.0, 1.0, -1.0),
        ],
    ),
];

const FACE_UVS: [DVec2; 4] = [
    DVec2::new(0.0, 0.0),
    DVec2::new(1.0, 0.0),
    DVec2::new(1.0, 1.0),
    DVec2::new(0.0, 1.0),
];

/// Creates an axis-aligned box centred on the origin.
///
/// # Arguments
///
/// * `half_extents` - Half the VRML `size` on each axis
///
/// # Returns
///
/// A mesh with 24 vertices (4 per face, so faces keep hard normals) and
/// 12 triangles.
///
/// # Example
///
/// ```rust
/// use vrml_mesh::primitives::create_box;
/// use glam::DVec3;
///
/// let mesh = create_box(DVec3::new(1.0, 2.0, 3.0)).unwrap();
/// let (min, max) = mesh.bounding_box();
/// assert_eq!(max, DVec3::new(1.0, 2.0, 3.0));
/// assert_eq!(min, -max);
/// ```
pub fn create_box(half_extents: DVec3) -> Result<CompactMesh, MeshError> {
    require_positive("Box", "size.x", half_extents.x)?;
    require_positive("Box", "size.y", half_extents.y)?;
    require_positive("Box", "size.z", half_extents.z)?;

    let mut soup = TriangleSoup::with_capacity(24, 12);

    for (normal, corners) in FACES {
        let [v0, v1, v2, v3] = corners.map(|c| soup.add_position(c * half_extents));
        let [uv0, uv1, uv2, uv3] = FACE_UVS;
        soup.add_shaded_triangle([v0, v1, v2], [normal; 3], [uv0, uv1, uv2]);
        soup.add_shaded_triangle([v0, v2, v3], [normal; 3], [uv0, uv2, uv3]);
    }

    Ok(weld(&soup, DEFAULT_WELD_EPSILON))
}
