//! # Shaders
//!
//! One generic [`ShaderManager`] drives every program. What differs between
//! the entity, terrain, skybox and GUI programs is only:
//!
//! - the source text, supplied by a [`ShaderSource`]
//! - the uniform set, a strongly typed enumeration implementing [`ShaderUniform`]
//!
//! The typed wrappers in [`programs`] add the per-kind load helpers used by the
//! render passes.

pub mod manager;
pub mod programs;
pub mod uniforms;

pub use manager::{ShaderManager, ShaderState, UniformTable};
pub use programs::{EntityShader, GuiShader, SkyBoxShader, TerrainShader};
pub use uniforms::{EntityUniform, GuiUniform, LitUniform, ShaderUniform, SkyBoxUniform, TerrainUniform};

use crate::error::ResourceError;
use crate::gfx::render_api::ShaderStage;
use crate::resources::ResourceProvider;

/// Maximum number of lights uploaded to the lit programs.
pub const MAX_LIGHTS: usize = 4;

/// The shader programs the renderer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Entity,
    Terrain,
    SkyBox,
    Gui,
}

impl ShaderKind {
    pub fn label(&self) -> &'static str {
        match self {
            ShaderKind::Entity => "entity",
            ShaderKind::Terrain => "terrain",
            ShaderKind::SkyBox => "skybox",
            ShaderKind::Gui => "gui",
        }
    }

    /// Resource name of a stage, e.g. `shaders/entity_vertex.glsl`.
    pub fn resource_name(&self, stage: ShaderStage) -> String {
        format!("shaders/{}_{}.glsl", self.label(), stage.name())
    }
}

/// Supplies shader source text.
pub trait ShaderSource {
    fn source(&self, kind: ShaderKind, stage: ShaderStage) -> Result<String, ResourceError>;
}

/// GLSL sources compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinShaders;

impl ShaderSource for BuiltinShaders {
    fn source(&self, kind: ShaderKind, stage: ShaderStage) -> Result<String, ResourceError> {
        let text = match (kind, stage) {
            (ShaderKind::Entity, ShaderStage::Vertex) => include_str!("glsl/entity_vertex.glsl"),
            (ShaderKind::Entity, ShaderStage::Fragment) => include_str!("glsl/entity_fragment.glsl"),
            (ShaderKind::Terrain, ShaderStage::Vertex) => include_str!("glsl/terrain_vertex.glsl"),
            (ShaderKind::Terrain, ShaderStage::Fragment) => {
                include_str!("glsl/terrain_fragment.glsl")
            }
            (ShaderKind::SkyBox, ShaderStage::Vertex) => include_str!("glsl/skybox_vertex.glsl"),
            (ShaderKind::SkyBox, ShaderStage::Fragment) => include_str!("glsl/skybox_fragment.glsl"),
            (ShaderKind::Gui, ShaderStage::Vertex) => include_str!("glsl/gui_vertex.glsl"),
            (ShaderKind::Gui, ShaderStage::Fragment) => include_str!("glsl/gui_fragment.glsl"),
        };
        Ok(text.to_string())
    }
}

/// Reads sources through a [`ResourceProvider`], under `shaders/`.
pub struct ProvidedShaders<'a> {
    provider: &'a dyn ResourceProvider,
}

impl<'a> ProvidedShaders<'a> {
    pub fn new(provider: &'a dyn ResourceProvider) -> Self {
        Self { provider }
    }
}

impl ShaderSource for ProvidedShaders<'_> {
    fn source(&self, kind: ShaderKind, stage: ShaderStage) -> Result<String, ResourceError> {
        self.provider.read_text(&kind.resource_name(stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::MemoryResourceProvider;

    #[test]
    fn test_builtin_sources_declare_their_uniforms() {
        let shaders = BuiltinShaders;
        let vertex = shaders.source(ShaderKind::Entity, ShaderStage::Vertex).unwrap();
        assert!(vertex.contains("transformationMatrix"));
        let fragment = shaders.source(ShaderKind::Terrain, ShaderStage::Fragment).unwrap();
        assert!(fragment.contains("weightMapTexture"));
        let sky = shaders.source(ShaderKind::SkyBox, ShaderStage::Fragment).unwrap();
        assert!(sky.contains("samplerCube"));
    }

    #[test]
    fn test_provided_sources_use_resource_names() {
        let provider = MemoryResourceProvider::new()
            .with_text("shaders/gui_vertex.glsl", "// gui vertex");
        let shaders = ProvidedShaders::new(&provider);
        assert_eq!(
            shaders.source(ShaderKind::Gui, ShaderStage::Vertex).unwrap(),
            "// gui vertex"
        );
        assert!(shaders
            .source(ShaderKind::Gui, ShaderStage::Fragment)
            .unwrap_err()
            .is_missing());
    }
}
