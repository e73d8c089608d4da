//! # Headless device
//!
//! A [`GraphicsDevice`] that performs no GPU work and records every call as a
//! [`RenderCommand`]. It backs the test-suite and the headless binary, and
//! tracks live resources so that leaks after `dispose` are observable.
//!
//! Failures can be injected: missing textures, shader sources that fail to
//! compile or link, and uniforms a program does not expose.

use std::collections::{HashMap, HashSet};

use cgmath::{Matrix4, Vector3};
use log::trace;

use super::render_api::{
    FrameRenderApi, LoaderRenderApi, ProgramId, RawModel, ShaderApi, ShaderStage, TextureId,
    UniformLocation, VertexAttribute,
};
use crate::color::{ColorRGB, ColorRGBA};
use crate::math::matrix_to_array;
use crate::wavefront::{ModelVertex, Shape};

/// A uniform value as it was uploaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    Vector([f32; 3]),
    Rgb([f32; 3]),
    Rgba([f32; 4]),
    Matrix([[f32; 4]; 4]),
}

impl UniformValue {
    pub fn as_matrix(&self) -> Option<Matrix4<f32>> {
        match self {
            UniformValue::Matrix(m) => Some(Matrix4::from(*m)),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    PrepareFrame(ColorRGBA),
    EndFrame,
    SetViewport { x: i32, y: i32, width: u32, height: u32 },
    PrepareModel { model: u32, attributes: Vec<VertexAttribute> },
    UnprepareModel,
    BindTexture { unit: u32, texture: TextureId },
    BindCubeTexture { unit: u32, texture: TextureId },
    DrawIndexed { model: u32, count: u32 },
    DrawArrays { model: u32, count: u32 },
    DrawQuad { model: u32 },
    EnableCulling,
    DisableCulling,
    EnableDepthTest,
    DisableDepthTest,
    EnableBlend,
    DisableBlend,
    StartProgram(ProgramId),
    StopProgram,
    LoadUniform { name: String, value: UniformValue },
}

impl RenderCommand {
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            RenderCommand::DrawIndexed { .. }
                | RenderCommand::DrawArrays { .. }
                | RenderCommand::DrawQuad { .. }
        )
    }
}

/// Recording device.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    commands: Vec<RenderCommand>,
    next_id: u32,
    live_models: HashSet<u32>,
    live_textures: HashSet<TextureId>,
    live_programs: HashSet<ProgramId>,
    uniform_names: HashMap<i32, String>,
    uploaded_bytes: usize,

    missing_textures: HashSet<String>,
    compile_failure_marker: Option<String>,
    link_failure_marker: Option<String>,
    missing_uniforms: HashSet<String>,
    program_sources: HashMap<ProgramId, String>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `path` fail to load as a texture or cube-map face.
    pub fn with_missing_texture(mut self, path: impl Into<String>) -> Self {
        self.missing_textures.insert(path.into());
        self
    }

    /// Makes any shader stage whose source contains `marker` fail to compile.
    pub fn with_compile_failure(mut self, marker: impl Into<String>) -> Self {
        self.compile_failure_marker = Some(marker.into());
        self
    }

    /// Makes any program whose sources contain `marker` fail to link.
    pub fn with_link_failure(mut self, marker: impl Into<String>) -> Self {
        self.link_failure_marker = Some(marker.into());
        self
    }

    /// Hides the uniform `name` from every program.
    pub fn with_missing_uniform(mut self, name: impl Into<String>) -> Self {
        self.missing_uniforms.insert(name.into());
        self
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Returns and clears the recorded commands.
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Every value uploaded to uniforms named `name`, in order.
    pub fn uniform_values(&self, name: &str) -> Vec<UniformValue> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::LoadUniform { name: n, value } if n == name => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_draw()).count()
    }

    pub fn live_models(&self) -> usize {
        self.live_models.len()
    }

    pub fn live_textures(&self) -> usize {
        self.live_textures.len()
    }

    pub fn live_programs(&self) -> usize {
        self.live_programs.len()
    }

    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, command: RenderCommand) {
        trace!("{command:?}");
        self.commands.push(command);
    }

    fn record_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        if !location.is_valid() {
            return;
        }
        let name = self
            .uniform_names
            .get(&location.0)
            .cloned()
            .unwrap_or_else(|| format!("#{}", location.0));
        self.record(RenderCommand::LoadUniform { name, value });
    }
}

impl LoaderRenderApi for HeadlessDevice {
    fn load_to_raw_model(&mut self, shape: &Shape) -> RawModel {
        let vertices: Vec<ModelVertex> = shape.interleaved();
        self.uploaded_bytes += bytemuck::cast_slice::<ModelVertex, u8>(&vertices).len()
            + bytemuck::cast_slice::<u32, u8>(&shape.indices).len();

        let id = self.next_id();
        self.live_models.insert(id);
        RawModel::new(id, shape.vertex_count() as u32, shape.indices.len() as u32)
    }

    fn load_positions_to_raw_model(&mut self, positions: &[f32], dimensions: u32) -> RawModel {
        self.uploaded_bytes += bytemuck::cast_slice::<f32, u8>(positions).len();

        let id = self.next_id();
        self.live_models.insert(id);
        let vertex_count = positions.len() as u32 / dimensions.max(1);
        RawModel::new(id, vertex_count, 0)
    }

    fn load_texture(&mut self, path: &str, _repeat: bool) -> Option<TextureId> {
        if self.missing_textures.contains(path) {
            return None;
        }
        let texture = TextureId(self.next_id());
        self.live_textures.insert(texture);
        Some(texture)
    }

    fn load_cube_map(&mut self, faces: &[&str; 6], _repeat: bool) -> Option<TextureId> {
        if faces.iter().any(|f| self.missing_textures.contains(*f)) {
            return None;
        }
        let texture = TextureId(self.next_id());
        self.live_textures.insert(texture);
        Some(texture)
    }

    fn dispose_raw_model(&mut self, model: RawModel) {
        self.live_models.remove(&model.id());
    }

    fn dispose_texture(&mut self, texture: TextureId) {
        self.live_textures.remove(&texture);
    }
}

impl FrameRenderApi for HeadlessDevice {
    fn prepare_frame(&mut self, clear_color: ColorRGBA) {
        self.record(RenderCommand::PrepareFrame(clear_color));
    }

    fn end_frame(&mut self) {
        self.record(RenderCommand::EndFrame);
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.record(RenderCommand::SetViewport {
            x,
            y,
            width,
            height,
        });
    }

    fn prepare_model(&mut self, model: &RawModel, attributes: &[VertexAttribute]) {
        self.record(RenderCommand::PrepareModel {
            model: model.id(),
            attributes: attributes.to_vec(),
        });
    }

    fn unprepare_model(&mut self, _attributes: &[VertexAttribute]) {
        self.record(RenderCommand::UnprepareModel);
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        self.record(RenderCommand::BindTexture { unit, texture });
    }

    fn bind_cube_texture(&mut self, unit: u32, texture: TextureId) {
        self.record(RenderCommand::BindCubeTexture { unit, texture });
    }

    fn draw_triangles_indexed(&mut self, model: &RawModel) {
        self.record(RenderCommand::DrawIndexed {
            model: model.id(),
            count: model.index_count(),
        });
    }

    fn draw_triangles_arrays(&mut self, model: &RawModel) {
        self.record(RenderCommand::DrawArrays {
            model: model.id(),
            count: model.vertex_count(),
        });
    }

    fn draw_quad(&mut self, model: &RawModel) {
        self.record(RenderCommand::DrawQuad { model: model.id() });
    }

    fn enable_culling(&mut self) {
        self.record(RenderCommand::EnableCulling);
    }

    fn disable_culling(&mut self) {
        self.record(RenderCommand::DisableCulling);
    }

    fn enable_depth_test(&mut self) {
        self.record(RenderCommand::EnableDepthTest);
    }

    fn disable_depth_test(&mut self) {
        self.record(RenderCommand::DisableDepthTest);
    }

    fn enable_blend(&mut self) {
        self.record(RenderCommand::EnableBlend);
    }

    fn disable_blend(&mut self) {
        self.record(RenderCommand::DisableBlend);
    }
}

impl ShaderApi for HeadlessDevice {
    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, (ShaderStage, String)> {
        if let Some(marker) = &self.compile_failure_marker {
            if vertex_source.contains(marker.as_str()) {
                return Err((ShaderStage::Vertex, format!("syntax error near `{marker}`")));
            }
            if fragment_source.contains(marker.as_str()) {
                return Err((ShaderStage::Fragment, format!("syntax error near `{marker}`")));
            }
        }
        let program = ProgramId(self.next_id());
        self.live_programs.insert(program);
        self.program_sources
            .insert(program, format!("{vertex_source}\n{fragment_source}"));
        Ok(program)
    }

    fn bind_attribute_location(&mut self, _program: ProgramId, _location: u32, _name: &str) {}

    fn link_program(&mut self, program: ProgramId) -> Result<(), String> {
        let sources = self.program_sources.get(&program).map(String::as_str).unwrap_or("");
        match &self.link_failure_marker {
            Some(marker) if sources.contains(marker.as_str()) => {
                Err(format!("unresolved symbol `{marker}`"))
            }
            _ => Ok(()),
        }
    }

    fn uniform_location(&mut self, _program: ProgramId, name: &str) -> UniformLocation {
        if self.missing_uniforms.contains(name) {
            return UniformLocation::NOT_FOUND;
        }
        let location = self.next_id() as i32;
        self.uniform_names.insert(location, name.to_string());
        UniformLocation(location)
    }

    fn start_program(&mut self, program: ProgramId) {
        self.record(RenderCommand::StartProgram(program));
    }

    fn stop_program(&mut self) {
        self.record(RenderCommand::StopProgram);
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.live_programs.remove(&program);
        self.program_sources.remove(&program);
    }

    fn load_int(&mut self, location: UniformLocation, value: i32) {
        self.record_uniform(location, UniformValue::Int(value));
    }

    fn load_float(&mut self, location: UniformLocation, value: f32) {
        self.record_uniform(location, UniformValue::Float(value));
    }

    fn load_bool(&mut self, location: UniformLocation, value: bool) {
        self.record_uniform(location, UniformValue::Bool(value));
    }

    fn load_vector(&mut self, location: UniformLocation, value: Vector3<f32>) {
        self.record_uniform(location, UniformValue::Vector(value.into()));
    }

    fn load_color_rgb(&mut self, location: UniformLocation, value: ColorRGB) {
        self.record_uniform(location, UniformValue::Rgb(value.to_array()));
    }

    fn load_color_rgba(&mut self, location: UniformLocation, value: ColorRGBA) {
        self.record_uniform(location, UniformValue::Rgba(value.to_array()));
    }

    fn load_matrix(&mut self, location: UniformLocation, value: &Matrix4<f32>) {
        self.record_uniform(location, UniformValue::Matrix(matrix_to_array(*value)));
    }
}
