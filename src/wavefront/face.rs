//! Face corner references produced by the geometry parser.

use std::rc::Rc;

use super::LineContext;
use crate::error::ParseError;

/// One corner of a triangle, referencing the position, texture-coordinate and
/// normal pools by 0-based index.
///
/// Corners are emitted in triangle order: every three consecutive corners of
/// the same partition form one triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonalFace {
    pub vertex_index: usize,
    pub texture_index: Option<usize>,
    pub normal_index: Option<usize>,
    pub group_name: Rc<str>,
    pub material_name: Option<Rc<str>>,
}

/// Pool lengths at the time a face line is read, used to resolve
/// relative (negative) indices.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PoolSizes {
    pub positions: usize,
    pub tex_coords: usize,
    pub normals: usize,
}

/// Indices of a single `v/vt/vn` token, already 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CornerIndices {
    pub vertex: usize,
    pub texture: Option<usize>,
    pub normal: Option<usize>,
}

/// Parses one face corner token: `v`, `v/vt`, `v//vn` or `v/vt/vn`.
pub(crate) fn parse_corner(
    ctx: &LineContext<'_>,
    token: &str,
    sizes: PoolSizes,
) -> Result<CornerIndices, ParseError> {
    let mut parts = token.split('/');

    let vertex = match parts.next() {
        Some(v) if !v.is_empty() => resolve(ctx, "position", v, sizes.positions)?,
        _ => return Err(ctx.missing("f", 1)),
    };
    let texture = match parts.next() {
        Some(t) if !t.is_empty() => Some(resolve(ctx, "texture", t, sizes.tex_coords)?),
        _ => None,
    };
    let normal = match parts.next() {
        Some(n) if !n.is_empty() => Some(resolve(ctx, "normal", n, sizes.normals)?),
        _ => None,
    };

    Ok(CornerIndices {
        vertex,
        texture,
        normal,
    })
}

/// Normalizes a 1-based or negative (relative) index to a 0-based one.
fn resolve(
    ctx: &LineContext<'_>,
    pool: &'static str,
    token: &str,
    len: usize,
) -> Result<usize, ParseError> {
    let raw = ctx.parse_i64(token)?;
    let absolute = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        len as i64 + raw
    } else {
        -1
    };

    if absolute < 0 || absolute >= len as i64 {
        return Err(ParseError::IndexOutOfRange {
            file: ctx.file.to_string(),
            line: ctx.line,
            pool,
            index: raw,
            len,
        });
    }
    Ok(absolute as usize)
}

/// Fan-triangulates a polygon of `n` corners around its first corner.
///
/// Returns corner positions in emission order: `(0, 1, 2), (0, 2, 3), ...`.
pub(crate) fn fan_triangulate(n: usize) -> impl Iterator<Item = usize> {
    (1..n.saturating_sub(1)).flat_map(|i| [0, i, i + 1])
}
