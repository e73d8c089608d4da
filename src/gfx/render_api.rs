//! # Render API boundary
//!
//! Capability traits through which the engine drives a graphics device, and
//! the opaque handles the device hands back.
//!
//! - [`LoaderRenderApi`] - uploads meshes and textures, releases them
//! - [`FrameRenderApi`] - per-frame state, binding and draw calls
//! - [`ShaderApi`] - program compile/link and uniform uploads
//!
//! [`GraphicsDevice`] is implemented for every type providing all three.
//! Handles are plain `Copy` tokens: the device owns the underlying resources
//! and only releases them on an explicit `dispose_*` / `delete_program` call.

use cgmath::{Matrix4, Vector3};

use crate::color::{ColorRGB, ColorRGBA};
use crate::wavefront::Shape;

/// A mesh uploaded to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawModel {
    id: u32,
    vertex_count: u32,
    index_count: u32,
}

impl RawModel {
    /// Builds a handle. Called by device implementations only.
    pub fn new(id: u32, vertex_count: u32, index_count: u32) -> Self {
        Self {
            id,
            vertex_count,
            index_count,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

/// A 2D texture or cube map on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// A linked (or partially built) shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Location of a uniform inside a program.
///
/// [`UniformLocation::NOT_FOUND`] is the sentinel for uniforms the program
/// does not expose; loads against it are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

impl UniformLocation {
    pub const NOT_FOUND: UniformLocation = UniformLocation(-1);

    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

/// Vertex attribute slots shared by every program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position,
    TextureCoords,
    Normal,
}

impl VertexAttribute {
    /// Attributes of a fully textured, lit mesh.
    pub const MESH: [VertexAttribute; 3] = [
        VertexAttribute::Position,
        VertexAttribute::TextureCoords,
        VertexAttribute::Normal,
    ];

    pub fn location(&self) -> u32 {
        match self {
            VertexAttribute::Position => 0,
            VertexAttribute::TextureCoords => 1,
            VertexAttribute::Normal => 2,
        }
    }

    /// Attribute name used by the shader sources.
    pub fn name(&self) -> &'static str {
        match self {
            VertexAttribute::Position => "position",
            VertexAttribute::TextureCoords => "textureCoords",
            VertexAttribute::Normal => "normal",
        }
    }
}

/// Shader stage, used in compile errors and by shader sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// Uploading and releasing device resources.
pub trait LoaderRenderApi {
    /// Uploads a shape's positions, texture coordinates, normals and indices.
    fn load_to_raw_model(&mut self, shape: &Shape) -> RawModel;

    /// Uploads a positions-only mesh drawn with array draws (skybox, GUI quad).
    ///
    /// `dimensions` is 2 or 3 floats per vertex.
    fn load_positions_to_raw_model(&mut self, positions: &[f32], dimensions: u32) -> RawModel;

    /// Loads a 2D texture. `None` when the image does not exist.
    fn load_texture(&mut self, path: &str, repeat: bool) -> Option<TextureId>;

    /// Loads a cube map from six faces (right, left, top, bottom, back, front).
    fn load_cube_map(&mut self, faces: &[&str; 6], repeat: bool) -> Option<TextureId>;

    fn dispose_raw_model(&mut self, model: RawModel);

    fn dispose_texture(&mut self, texture: TextureId);
}

/// Per-frame state and draw calls.
pub trait FrameRenderApi {
    /// Clears color and depth with `clear_color`.
    fn prepare_frame(&mut self, clear_color: ColorRGBA);

    /// Called once the frame's draws are issued; presenting is up to the device.
    fn end_frame(&mut self);

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Binds the model and enables `attributes`.
    fn prepare_model(&mut self, model: &RawModel, attributes: &[VertexAttribute]);

    /// Disables `attributes` and unbinds the model.
    fn unprepare_model(&mut self, attributes: &[VertexAttribute]);

    fn bind_texture(&mut self, unit: u32, texture: TextureId);

    fn bind_cube_texture(&mut self, unit: u32, texture: TextureId);

    fn draw_triangles_indexed(&mut self, model: &RawModel);

    fn draw_triangles_arrays(&mut self, model: &RawModel);

    fn draw_quad(&mut self, model: &RawModel);

    fn enable_culling(&mut self);

    fn disable_culling(&mut self);

    fn enable_depth_test(&mut self);

    fn disable_depth_test(&mut self);

    fn enable_blend(&mut self);

    fn disable_blend(&mut self);
}

/// Shader program management and uniform uploads.
pub trait ShaderApi {
    /// Compiles both stages into a program that still needs linking.
    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, (ShaderStage, String)>;

    fn bind_attribute_location(&mut self, program: ProgramId, location: u32, name: &str);

    /// Links the program; the error carries the link log.
    fn link_program(&mut self, program: ProgramId) -> Result<(), String>;

    /// Location of `name`, or [`UniformLocation::NOT_FOUND`].
    fn uniform_location(&mut self, program: ProgramId, name: &str) -> UniformLocation;

    fn start_program(&mut self, program: ProgramId);

    fn stop_program(&mut self);

    fn delete_program(&mut self, program: ProgramId);

    fn load_int(&mut self, location: UniformLocation, value: i32);

    fn load_float(&mut self, location: UniformLocation, value: f32);

    fn load_bool(&mut self, location: UniformLocation, value: bool);

    fn load_vector(&mut self, location: UniformLocation, value: Vector3<f32>);

    fn load_color_rgb(&mut self, location: UniformLocation, value: ColorRGB);

    fn load_color_rgba(&mut self, location: UniformLocation, value: ColorRGBA);

    fn load_matrix(&mut self, location: UniformLocation, value: &Matrix4<f32>);
}

/// A complete graphics device.
pub trait GraphicsDevice: LoaderRenderApi + FrameRenderApi + ShaderApi {}

impl<T: LoaderRenderApi + FrameRenderApi + ShaderApi> GraphicsDevice for T {}
