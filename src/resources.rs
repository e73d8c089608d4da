//! # Resources
//!
//! Access to model, material, shader and image resources by name.
//!
//! The engine never touches the filesystem directly: everything goes through a
//! [`ResourceProvider`]. [`FsResourceProvider`] reads from a directory,
//! [`MemoryResourceProvider`] serves in-memory content (tests, embedded assets).
//!
//! Parsed models are cached in a [`ShapeCache`] keyed by model name so that
//! several entity kinds sharing a model only parse it once.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::error::{GroveError, ResourceError};
use crate::wavefront::{self, ObjOptions, Shape};

/// Decoded RGBA8 image data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA bytes, four per pixel
    pub pixels: Vec<u8>,
}

impl TextureData {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Builds an image from one 24-bit value per pixel, encoded as
    /// `(b << 16) + (g << 8) + r`.
    pub fn from_rgb_values(width: u32, height: u32, values: &[u32]) -> Self {
        let pixels = values
            .iter()
            .flat_map(|v| {
                [
                    (v & 0xff) as u8,
                    ((v >> 8) & 0xff) as u8,
                    ((v >> 16) & 0xff) as u8,
                    0xff,
                ]
            })
            .collect();
        Self::new(width, height, pixels)
    }

    /// The pixel at `(x, y)` as `(b << 16) + (g << 8) + r`, or `None` when the
    /// coordinates fall outside the image.
    pub fn rgb(&self, x: i64, y: i64) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let offset = ((y as usize) * self.width as usize + x as usize) * 4;
        let px = &self.pixels[offset..offset + 4];
        Some(((px[2] as u32) << 16) + ((px[1] as u32) << 8) + px[0] as u32)
    }
}

/// Delivers resources by name.
pub trait ResourceProvider {
    /// Reads a text resource such as an OBJ, MTL or shader file.
    fn read_text(&self, name: &str) -> Result<String, ResourceError>;

    /// Reads and decodes an image resource.
    fn texture_data(&self, name: &str) -> Result<TextureData, ResourceError>;
}

/// Reads resources from a directory.
#[derive(Debug, Clone)]
pub struct FsResourceProvider {
    root: PathBuf,
}

impl FsResourceProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl ResourceProvider for FsResourceProvider {
    fn read_text(&self, name: &str) -> Result<String, ResourceError> {
        let path = self.path(name);
        if !path.exists() {
            return Err(ResourceError::Missing(name.to_string()));
        }
        fs::read_to_string(&path).map_err(|source| ResourceError::Io {
            name: name.to_string(),
            source,
        })
    }

    fn texture_data(&self, name: &str) -> Result<TextureData, ResourceError> {
        let path = self.path(name);
        if !path.exists() {
            return Err(ResourceError::Missing(name.to_string()));
        }
        let image = image::open(&path)
            .map_err(|source| ResourceError::Image {
                name: name.to_string(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(TextureData::new(width, height, image.into_raw()))
    }
}

/// Serves resources from memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryResourceProvider {
    texts: HashMap<String, String>,
    textures: HashMap<String, TextureData>,
}

impl MemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(name.into(), text.into());
        self
    }

    pub fn with_texture(mut self, name: impl Into<String>, data: TextureData) -> Self {
        self.textures.insert(name.into(), data);
        self
    }
}

impl ResourceProvider for MemoryResourceProvider {
    fn read_text(&self, name: &str) -> Result<String, ResourceError> {
        self.texts
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceError::Missing(name.to_string()))
    }

    fn texture_data(&self, name: &str) -> Result<TextureData, ResourceError> {
        self.textures
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceError::Missing(name.to_string()))
    }
}

/// Parsed models keyed by resource name.
#[derive(Debug, Default)]
pub struct ShapeCache {
    shapes: HashMap<String, Arc<Vec<Shape>>>,
}

impl ShapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached shapes of `name`, parsing the model on first use.
    pub fn get_or_load(
        &mut self,
        name: &str,
        provider: &dyn ResourceProvider,
        options: ObjOptions,
    ) -> Result<Arc<Vec<Shape>>, GroveError> {
        if let Some(shapes) = self.shapes.get(name) {
            return Ok(Arc::clone(shapes));
        }
        let shapes = Arc::new(wavefront::load_model(name, provider, options)?);
        debug!("Cached model `{name}`");
        self.shapes.insert(name.to_string(), Arc::clone(&shapes));
        Ok(shapes)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_encoding() {
        let data = TextureData::new(2, 1, vec![1, 2, 3, 255, 255, 255, 255, 255]);
        assert_eq!(data.rgb(0, 0), Some((3 << 16) + (2 << 8) + 1));
        assert_eq!(data.rgb(1, 0), Some(0xff_ffff));
        assert_eq!(data.rgb(2, 0), None);
        assert_eq!(data.rgb(0, -1), None);
    }

    #[test]
    fn test_from_rgb_values_round_trips() {
        let data = TextureData::from_rgb_values(1, 2, &[0x010203, 0x7f7f7f]);
        assert_eq!(data.rgb(0, 0), Some(0x010203));
        assert_eq!(data.rgb(0, 1), Some(0x7f7f7f));
    }

    #[test]
    fn test_memory_provider_missing() {
        let provider = MemoryResourceProvider::new().with_text("a.obj", "v 0 0 0");
        assert_eq!(provider.read_text("a.obj").unwrap(), "v 0 0 0");
        assert!(provider.read_text("b.obj").unwrap_err().is_missing());
        assert!(provider.texture_data("a.png").unwrap_err().is_missing());
    }

    #[test]
    fn test_fs_provider_reads_directory() {
        let dir = std::env::temp_dir().join(format!("grove-fs-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("tri.obj"), "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let provider = FsResourceProvider::new(&dir);
        assert!(provider.read_text("tri.obj").unwrap().starts_with("v 0 0 0"));
        assert!(provider.read_text("nope.obj").unwrap_err().is_missing());
        assert!(provider.texture_data("nope.png").unwrap_err().is_missing());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_shape_cache_parses_once() {
        let provider =
            MemoryResourceProvider::new().with_text("tri.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mut cache = ShapeCache::new();

        let first = cache.get_or_load("tri.obj", &provider, ObjOptions::default()).unwrap();
        let second = cache.get_or_load("tri.obj", &provider, ObjOptions::default()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(first[0].vertex_count(), 3);
    }
}
