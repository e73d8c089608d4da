//! # Geometry parser
//!
//! Line-oriented parser for the Wavefront OBJ subset:
//! `v`, `vt`, `vn`, `f`, `g`/`o`, `usemtl`, `mtllib`, `s` and `#` comments.
//!
//! Faces are stored per corner, already triangulated, together with the group
//! and material current at the time the face was read.

use std::collections::HashSet;
use std::io::BufRead;
use std::rc::Rc;

use cgmath::{Vector2, Vector3};
use log::{trace, warn};

use super::face::{fan_triangulate, parse_corner, PolygonalFace, PoolSizes};
use super::LineContext;
use crate::error::ParseError;

/// Group assigned to faces that appear before any `g` or `o` directive.
pub const DEFAULT_GROUP: &str = "default";

/// Raw result of parsing an OBJ stream.
#[derive(Debug, Clone, Default)]
pub struct ObjDocument {
    pub positions: Vec<Vector3<f32>>,
    pub tex_coords: Vec<Vector2<f32>>,
    pub normals: Vec<Vector3<f32>>,
    /// Triangle corners, three per triangle
    pub faces: Vec<PolygonalFace>,
    /// Group names in order of first declaration
    pub groups: Vec<String>,
    /// Material libraries referenced by `mtllib`
    pub material_libraries: Vec<String>,
}

impl ObjDocument {
    pub fn triangle_count(&self) -> usize {
        self.faces.len() / 3
    }
}

/// Parser state for one OBJ file.
pub struct GeometryParser {
    file: String,
    document: ObjDocument,
    current_group: Rc<str>,
    current_material: Option<Rc<str>>,
    seen_groups: HashSet<String>,
}

impl GeometryParser {
    /// Creates a parser; `file` names the stream in error messages.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            document: ObjDocument::default(),
            current_group: Rc::from(DEFAULT_GROUP),
            current_material: None,
            seen_groups: HashSet::new(),
        }
    }

    pub fn parse_str(self, text: &str) -> Result<ObjDocument, ParseError> {
        self.parse_reader(text.as_bytes())
    }

    /// Consumes the whole stream. Any malformed line fails the parse.
    pub fn parse_reader<R: BufRead>(mut self, reader: R) -> Result<ObjDocument, ParseError> {
        for (number, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ParseError::Read {
                file: self.file.clone(),
                source,
            })?;
            self.parse_line(number + 1, &line)?;
        }
        Ok(self.document)
    }

    fn parse_line(&mut self, number: usize, line: &str) -> Result<(), ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let file = self.file.clone();
        let ctx = LineContext {
            file: &file,
            line: number,
        };
        let mut tokens = line.split_whitespace();
        let Some(prefix) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();

        match prefix {
            "v" => self.document.positions.push(ctx.vec3("v", &args)?),
            "vt" => self.document.tex_coords.push(ctx.vec2("vt", &args)?),
            "vn" => self.document.normals.push(ctx.vec3("vn", &args)?),
            "f" => self.parse_face(&ctx, &args)?,
            "g" | "o" => {
                let name = if args.is_empty() {
                    DEFAULT_GROUP.to_string()
                } else {
                    args.join(" ")
                };
                if self.seen_groups.insert(name.clone()) {
                    self.document.groups.push(name.clone());
                }
                self.current_group = Rc::from(name);
            }
            "usemtl" => {
                let name = args.join(" ");
                self.current_material = (!name.is_empty()).then(|| Rc::from(name));
            }
            "mtllib" => {
                let library = args.join(" ");
                if !library.is_empty() {
                    self.document.material_libraries.push(library);
                }
            }
            "s" => {}
            other => warn!("{}:{}: unknown prefix `{}` ignored", self.file, number, other),
        }
        Ok(())
    }

    fn parse_face(&mut self, ctx: &LineContext<'_>, args: &[&str]) -> Result<(), ParseError> {
        if args.len() < 3 {
            return Err(ParseError::DegenerateFace {
                file: ctx.file.to_string(),
                line: ctx.line,
                corners: args.len(),
            });
        }

        let sizes = PoolSizes {
            positions: self.document.positions.len(),
            tex_coords: self.document.tex_coords.len(),
            normals: self.document.normals.len(),
        };
        let corners = args
            .iter()
            .map(|token| parse_corner(ctx, token, sizes))
            .collect::<Result<Vec<_>, _>>()?;

        if self.seen_groups.insert(self.current_group.to_string()) {
            self.document.groups.push(self.current_group.to_string());
        }

        for i in fan_triangulate(corners.len()) {
            let corner = corners[i];
            self.document.faces.push(PolygonalFace {
                vertex_index: corner.vertex,
                texture_index: corner.texture,
                normal_index: corner.normal,
                group_name: Rc::clone(&self.current_group),
                material_name: self.current_material.clone(),
            });
        }
        trace!("{}:{}: face with {} corners", ctx.file, ctx.line, corners.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ObjDocument {
        GeometryParser::new("test.obj").parse_str(text).unwrap()
    }

    #[test]
    fn test_pools_and_comments() {
        let doc = parse(
            "# a comment\n\nv 1 2 3\nv 4 5 6\nvt 0.5 0.25\nvn 0 1 0\ns off\n",
        );
        assert_eq!(doc.positions, vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0)]);
        assert_eq!(doc.tex_coords, vec![Vector2::new(0.5, 0.25)]);
        assert_eq!(doc.normals, vec![Vector3::new(0.0, 1.0, 0.0)]);
        assert!(doc.faces.is_empty());
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let doc = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        let indices: Vec<usize> = doc.faces.iter().map(|f| f.vertex_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(doc.triangle_count(), 2);
        assert_eq!(doc.groups, vec![DEFAULT_GROUP.to_string()]);
    }

    #[test]
    fn test_group_and_material_tracking() {
        let doc = parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             f 1 2 3\n\
             o leaf\nusemtl green\nf 1 2 3\n\
             g stem\nf 1 2 3\n",
        );
        assert_eq!(doc.groups, vec!["default", "leaf", "stem"]);
        assert_eq!(&*doc.faces[0].group_name, "default");
        assert!(doc.faces[0].material_name.is_none());
        assert_eq!(&*doc.faces[3].group_name, "leaf");
        assert_eq!(doc.faces[3].material_name.as_deref(), Some("green"));
        assert_eq!(&*doc.faces[6].group_name, "stem");
        assert_eq!(doc.faces[6].material_name.as_deref(), Some("green"));
    }

    #[test]
    fn test_mtllib_is_recorded() {
        let doc = parse("mtllib tree.mtl\n");
        assert_eq!(doc.material_libraries, vec!["tree.mtl"]);
    }

    #[test]
    fn test_unknown_prefix_is_not_fatal() {
        let doc = parse("curv 0 1\nv 0 0 0\n");
        assert_eq!(doc.positions.len(), 1);
    }

    #[test]
    fn test_malformed_number_fails_with_line() {
        let err = GeometryParser::new("bad.obj")
            .parse_str("v 0 0 0\nv 1 zero 0\n")
            .unwrap_err();
        match err {
            ParseError::InvalidNumber { file, line, token } => {
                assert_eq!(file, "bad.obj");
                assert_eq!(line, 2);
                assert_eq!(token, "zero");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_short_vertex_fails() {
        let err = GeometryParser::new("bad.obj").parse_str("v 1 2\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingComponent { expected: 3, .. }));
    }

    #[test]
    fn test_degenerate_face_fails() {
        let err = GeometryParser::new("bad.obj")
            .parse_str("v 0 0 0\nv 1 0 0\nf 1 2\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::DegenerateFace { corners: 2, line: 3, .. }));
    }

    #[test]
    fn test_relative_indices_use_pool_at_read_time() {
        let doc = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\nv 5 5 5\nf -4 -3 -1\n");
        let indices: Vec<usize> = doc.faces.iter().map(|f| f.vertex_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 0, 1, 3]);
    }
}
