//! # Wavefront loading
//!
//! Parsers for the OBJ geometry and MTL material subsets used by the engine,
//! and the shape builder that turns parsed faces into renderable [`Shape`]s.
//!
//! ## Pipeline
//!
//! 1. [`GeometryParser`] reads `.obj` text into pools and per-corner faces
//! 2. [`MaterialParser`] reads each referenced `.mtl` into a [`MaterialLibrary`]
//! 3. [`ShapeBuilder`] partitions faces by `(group, material)` and resolves
//!    every corner into flat vertex arrays
//!
//! [`load_model`] runs the three steps against a [`ResourceProvider`].

pub mod face;
pub mod material;
pub mod mtl;
pub mod obj;
pub mod shape;

pub use face::PolygonalFace;
pub use material::{ExternalMaterial, MaterialLibrary};
pub use mtl::MaterialParser;
pub use obj::{GeometryParser, ObjDocument};
pub use shape::{ModelVertex, ObjOptions, Shape, ShapeBuilder};

use cgmath::{Vector2, Vector3};
use log::{debug, warn};

use crate::color::ColorRGB;
use crate::error::{GroveError, ParseError};
use crate::resources::ResourceProvider;

/// Loads a model and its material libraries through `provider`.
///
/// A material library that does not exist is logged and skipped, leaving the
/// affected shapes without material. Malformed geometry or material content
/// fails the whole load.
pub fn load_model(
    name: &str,
    provider: &dyn ResourceProvider,
    options: ObjOptions,
) -> Result<Vec<Shape>, GroveError> {
    let text = provider.read_text(name)?;
    let document = GeometryParser::new(name).parse_str(&text)?;

    let mut materials = MaterialLibrary::new();
    for library in &document.material_libraries {
        match provider.read_text(library) {
            Ok(text) => {
                let parsed = MaterialParser::new(library).parse_str(&text)?;
                materials.extend(parsed);
            }
            Err(err) if err.is_missing() => {
                warn!("{name}: material library `{library}` not found, shapes stay unmaterialed");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let shapes = ShapeBuilder::new(options).build(&document, &materials);
    debug!(
        "Loaded `{name}`: {} shapes, {} triangles, {} materials",
        shapes.len(),
        document.triangle_count(),
        materials.len()
    );
    Ok(shapes)
}

/// Position of a line being parsed, used to build errors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineContext<'a> {
    pub file: &'a str,
    pub line: usize,
}

impl<'a> LineContext<'a> {
    pub fn parse_f32(&self, token: &str) -> Result<f32, ParseError> {
        token.parse::<f32>().map_err(|_| ParseError::InvalidNumber {
            file: self.file.to_string(),
            line: self.line,
            token: token.to_string(),
        })
    }

    pub fn parse_i64(&self, token: &str) -> Result<i64, ParseError> {
        token.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
            file: self.file.to_string(),
            line: self.line,
            token: token.to_string(),
        })
    }

    /// Parses exactly the first `N` tokens as floats.
    pub fn floats<const N: usize>(
        &self,
        directive: &str,
        tokens: &[&str],
    ) -> Result<[f32; N], ParseError> {
        if tokens.len() < N {
            return Err(self.missing(directive, N));
        }
        let mut out = [0.0; N];
        for (slot, token) in out.iter_mut().zip(tokens) {
            *slot = self.parse_f32(token)?;
        }
        Ok(out)
    }

    pub fn vec2(&self, directive: &str, tokens: &[&str]) -> Result<Vector2<f32>, ParseError> {
        let [x, y] = self.floats::<2>(directive, tokens)?;
        Ok(Vector2::new(x, y))
    }

    pub fn vec3(&self, directive: &str, tokens: &[&str]) -> Result<Vector3<f32>, ParseError> {
        let [x, y, z] = self.floats::<3>(directive, tokens)?;
        Ok(Vector3::new(x, y, z))
    }

    pub fn color(&self, directive: &str, tokens: &[&str]) -> Result<ColorRGB, ParseError> {
        let [r, g, b] = self.floats::<3>(directive, tokens)?;
        Ok(ColorRGB::new(r, g, b))
    }

    pub fn missing(&self, directive: &str, expected: usize) -> ParseError {
        ParseError::MissingComponent {
            file: self.file.to_string(),
            line: self.line,
            directive: directive.to_string(),
            expected,
        }
    }
}
