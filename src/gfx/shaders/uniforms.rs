//! Typed uniform sets, one enumeration per shader kind.

use std::borrow::Cow;
use std::fmt::Debug;
use std::hash::Hash;

use super::MAX_LIGHTS;

/// A uniform of one shader kind.
pub trait ShaderUniform: Copy + Eq + Hash + Debug {
    /// Every uniform the program declares.
    fn all() -> Vec<Self>;

    /// Name of the uniform in the shader source.
    fn name(&self) -> Cow<'static, str>;
}

/// Uniform sets that carry the shared light array.
pub trait LitUniform: ShaderUniform {
    fn light_position(index: usize) -> Self;
    fn light_color(index: usize) -> Self;
}

fn light_slot(base: &str, index: usize) -> Cow<'static, str> {
    Cow::Owned(format!("{base}[{index}]"))
}

/// Uniforms of the entity program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityUniform {
    ProjectionMatrix,
    ViewMatrix,
    TransformationMatrix,
    LightPosition(usize),
    LightColor(usize),
    ShineDamper,
    Reflectivity,
    SkyColor,
    NormalsPointingUp,
    TextureWeight,
    DiffuseColor,
}

impl ShaderUniform for EntityUniform {
    fn all() -> Vec<Self> {
        let mut all = vec![
            EntityUniform::ProjectionMatrix,
            EntityUniform::ViewMatrix,
            EntityUniform::TransformationMatrix,
        ];
        for i in 0..MAX_LIGHTS {
            all.push(EntityUniform::LightPosition(i));
            all.push(EntityUniform::LightColor(i));
        }
        all.extend([
            EntityUniform::ShineDamper,
            EntityUniform::Reflectivity,
            EntityUniform::SkyColor,
            EntityUniform::NormalsPointingUp,
            EntityUniform::TextureWeight,
            EntityUniform::DiffuseColor,
        ]);
        all
    }

    fn name(&self) -> Cow<'static, str> {
        match self {
            EntityUniform::ProjectionMatrix => "projectionMatrix".into(),
            EntityUniform::ViewMatrix => "viewMatrix".into(),
            EntityUniform::TransformationMatrix => "transformationMatrix".into(),
            EntityUniform::LightPosition(i) => light_slot("lightPosition", *i),
            EntityUniform::LightColor(i) => light_slot("lightColor", *i),
            EntityUniform::ShineDamper => "shineDamper".into(),
            EntityUniform::Reflectivity => "reflectivity".into(),
            EntityUniform::SkyColor => "skyColor".into(),
            EntityUniform::NormalsPointingUp => "normalsPointingUp".into(),
            EntityUniform::TextureWeight => "textureWeight".into(),
            EntityUniform::DiffuseColor => "diffuseColor".into(),
        }
    }
}

impl LitUniform for EntityUniform {
    fn light_position(index: usize) -> Self {
        EntityUniform::LightPosition(index)
    }

    fn light_color(index: usize) -> Self {
        EntityUniform::LightColor(index)
    }
}

/// Uniforms of the terrain program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainUniform {
    ProjectionMatrix,
    ViewMatrix,
    TransformationMatrix,
    LightPosition(usize),
    LightColor(usize),
    ShineDamper,
    Reflectivity,
    SkyColor,
    BackgroundTexture,
    MudTexture,
    GrassTexture,
    PathTexture,
    WeightMapTexture,
}

impl TerrainUniform {
    /// Samplers in texture-unit order.
    pub const SAMPLERS: [TerrainUniform; 5] = [
        TerrainUniform::BackgroundTexture,
        TerrainUniform::MudTexture,
        TerrainUniform::GrassTexture,
        TerrainUniform::PathTexture,
        TerrainUniform::WeightMapTexture,
    ];
}

impl ShaderUniform for TerrainUniform {
    fn all() -> Vec<Self> {
        let mut all = vec![
            TerrainUniform::ProjectionMatrix,
            TerrainUniform::ViewMatrix,
            TerrainUniform::TransformationMatrix,
        ];
        for i in 0..MAX_LIGHTS {
            all.push(TerrainUniform::LightPosition(i));
            all.push(TerrainUniform::LightColor(i));
        }
        all.extend([
            TerrainUniform::ShineDamper,
            TerrainUniform::Reflectivity,
            TerrainUniform::SkyColor,
        ]);
        all.extend(TerrainUniform::SAMPLERS);
        all
    }

    fn name(&self) -> Cow<'static, str> {
        match self {
            TerrainUniform::ProjectionMatrix => "projectionMatrix".into(),
            TerrainUniform::ViewMatrix => "viewMatrix".into(),
            TerrainUniform::TransformationMatrix => "transformationMatrix".into(),
            TerrainUniform::LightPosition(i) => light_slot("lightPosition", *i),
            TerrainUniform::LightColor(i) => light_slot("lightColor", *i),
            TerrainUniform::ShineDamper => "shineDamper".into(),
            TerrainUniform::Reflectivity => "reflectivity".into(),
            TerrainUniform::SkyColor => "skyColor".into(),
            TerrainUniform::BackgroundTexture => "backgroundTexture".into(),
            TerrainUniform::MudTexture => "mudTexture".into(),
            TerrainUniform::GrassTexture => "grassTexture".into(),
            TerrainUniform::PathTexture => "pathTexture".into(),
            TerrainUniform::WeightMapTexture => "weightMapTexture".into(),
        }
    }
}

impl LitUniform for TerrainUniform {
    fn light_position(index: usize) -> Self {
        TerrainUniform::LightPosition(index)
    }

    fn light_color(index: usize) -> Self {
        TerrainUniform::LightColor(index)
    }
}

/// Uniforms of the skybox program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkyBoxUniform {
    ProjectionMatrix,
    ViewMatrix,
}

impl ShaderUniform for SkyBoxUniform {
    fn all() -> Vec<Self> {
        vec![SkyBoxUniform::ProjectionMatrix, SkyBoxUniform::ViewMatrix]
    }

    fn name(&self) -> Cow<'static, str> {
        match self {
            SkyBoxUniform::ProjectionMatrix => "projectionMatrix".into(),
            SkyBoxUniform::ViewMatrix => "viewMatrix".into(),
        }
    }
}

/// Uniforms of the GUI program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuiUniform {
    TransformationMatrix,
}

impl ShaderUniform for GuiUniform {
    fn all() -> Vec<Self> {
        vec![GuiUniform::TransformationMatrix]
    }

    fn name(&self) -> Cow<'static, str> {
        match self {
            GuiUniform::TransformationMatrix => "transformationMatrix".into(),
        }
    }
}
