//! # Material parser
//!
//! Line-oriented parser for the Wavefront MTL subset. Each `newmtl` starts a
//! material; the directives that follow fill it in until the next `newmtl`.

use std::io::BufRead;
use std::sync::Arc;

use log::warn;

use super::material::{ExternalMaterial, MaterialLibrary};
use super::LineContext;
use crate::error::ParseError;

/// Parser for one MTL file.
pub struct MaterialParser {
    file: String,
    library: MaterialLibrary,
    current: Option<ExternalMaterial>,
}

impl MaterialParser {
    /// Creates a parser; `file` names the stream in error messages.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            library: MaterialLibrary::new(),
            current: None,
        }
    }

    pub fn parse_str(self, text: &str) -> Result<MaterialLibrary, ParseError> {
        self.parse_reader(text.as_bytes())
    }

    /// Consumes the whole stream. A read error or malformed value fails the
    /// parse and no material is returned.
    pub fn parse_reader<R: BufRead>(mut self, reader: R) -> Result<MaterialLibrary, ParseError> {
        for (number, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ParseError::Read {
                file: self.file.clone(),
                source,
            })?;
            self.parse_line(number + 1, &line)?;
        }
        self.finish_current();
        Ok(self.library)
    }

    fn finish_current(&mut self) {
        if let Some(material) = self.current.take() {
            self.library
                .insert(material.name.clone(), Arc::new(material));
        }
    }

    fn parse_line(&mut self, number: usize, line: &str) -> Result<(), ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (prefix, rest) = match line.split_once(char::is_whitespace) {
            Some((prefix, rest)) => (prefix, rest.trim()),
            None => (line, ""),
        };

        if prefix == "newmtl" {
            self.finish_current();
            self.current = Some(ExternalMaterial::new(rest));
            return Ok(());
        }

        let file = self.file.clone();
        let ctx = LineContext {
            file: &file,
            line: number,
        };
        let Some(material) = self.current.as_mut() else {
            // No material to attach the directive to
            return Ok(());
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        match prefix {
            "Ns" => material.specular_weight = Some(single(&ctx, prefix, &args)?),
            "Ka" => material.ambient_color = Some(ctx.color(prefix, &args)?),
            "Kd" => material.diffuse_color = Some(ctx.color(prefix, &args)?),
            "Ks" => material.specular_color = Some(ctx.color(prefix, &args)?),
            "Ke" => material.emissive_color = Some(ctx.color(prefix, &args)?),
            "Ni" => material.optical_density = Some(single(&ctx, prefix, &args)?),
            "d" => material.dissolve = Some(single(&ctx, prefix, &args)?),
            "Tr" => material.dissolve = Some(1.0 - single(&ctx, prefix, &args)?),
            "illum" => material.illumination = Some(single(&ctx, prefix, &args)? as i32),
            "Tf" => {
                let args = match args.first() {
                    Some(&"xyz") => &args[1..],
                    _ => &args[..],
                };
                material.transmission_filter = Some(ctx.color(prefix, args)?);
            }
            "map_Kd" => material.diffuse_texture = file_name(rest),
            "map_Ks" => material.specular_texture = file_name(rest),
            "map_Ka" => material.ambient_texture = file_name(rest),
            "map_bump" | "bump" | "map_Bump" => material.bump_texture = file_name(rest),
            "map_d" => material.dissolve_texture = file_name(rest),
            other => warn!("{}:{}: unknown prefix `{}` ignored", ctx.file, number, other),
        }
        Ok(())
    }
}

fn single(ctx: &LineContext<'_>, directive: &str, args: &[&str]) -> Result<f32, ParseError> {
    let [value] = ctx.floats::<1>(directive, args)?;
    Ok(value)
}

fn file_name(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}
