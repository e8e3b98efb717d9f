//! # Fan Triangulation
//!
//! Splits a polygon loop `[i0, i1, ..., in-1]` into `n - 2` triangles that
//! all share slot 0. For `k` in `0..n-2` the triangle takes slots
//!
//! - `(0, k + 2, k + 1)` when the loop is counter-clockwise
//! - `(0, k + 1, k + 2)` when it is clockwise
//!
//! Loops shorter than three produce nothing. Parallel index loops (UV or
//! normal indices) of the same length map through the same slots, so their
//! triangles line up one-to-one with the coordinate triangles.
//!
//! Non-convex polygons are fanned like convex ones.

/// Yields the slot triples for a loop of `len` indices.
///
/// # Example
///
/// ```rust
/// use vrml_mesh::triangulate::fan_slots;
///
/// let slots: Vec<_> = fan_slots(4, true).collect();
/// assert_eq!(slots, vec![[0, 2, 1], [0, 3, 2]]);
/// ```
pub fn fan_slots(len: usize, ccw: bool) -> impl Iterator<Item = [usize; 3]> {
    (0..len.saturating_sub(2)).map(move |k| {
        if ccw {
            [0, k + 2, k + 1]
        } else {
            [0, k + 1, k + 2]
        }
    })
}

/// Triangulates one loop into index triples.
pub fn triangulate_loop<'a, T: Copy + 'a>(
    polygon: &'a [T],
    ccw: bool,
) -> impl Iterator<Item = [T; 3]> + 'a {
    fan_slots(polygon.len(), ccw).map(move |slots| slots.map(|s| polygon[s]))
}

/// Appends the triangulation of one loop to `out` and returns how many
/// triangles were added.
pub fn append_loop(out: &mut Vec<[u32; 3]>, polygon: &[u32], ccw: bool) -> usize {
    let before = out.len();
    out.extend(triangulate_loop(polygon, ccw));
    out.len() - before
}

/// Triangulates every loop in order.
pub fn triangulate(loops: &[Vec<u32>], ccw: bool) -> Vec<[u32; 3]> {
    let mut out = Vec::with_capacity(triangle_count(loops));
    for polygon in loops {
        append_loop(&mut out, polygon, ccw);
    }
    out
}

/// Number of triangles the loops will produce.
pub fn triangle_count<T>(loops: &[Vec<T>]) -> usize {
    loops.iter().map(|l| l.len().saturating_sub(2)).sum()
}
