//! # Shader manager
//!
//! Builds one program and owns its uniform table.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --compile+link--> Linked --resolve uniforms--> Ready
//!        \                            \
//!         `-- compile error ----------`-- link error --> Failed (terminal)
//! Ready --dispose--> Disposed
//! ```
//!
//! A manager that is not [`ShaderState::Ready`] ignores `start`, `stop` and
//! every uniform load.

use std::collections::HashMap;

use cgmath::{Matrix4, Vector3};
use log::{debug, error, warn};

use super::uniforms::{LitUniform, ShaderUniform};
use super::{ShaderKind, ShaderSource, MAX_LIGHTS};
use crate::color::{ColorRGB, ColorRGBA};
use crate::error::ShaderError;
use crate::gfx::render_api::{ProgramId, ShaderApi, ShaderStage, UniformLocation, VertexAttribute};
use crate::gfx::scene::light::Light;

/// Lifecycle state of a [`ShaderManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderState {
    Uninitialized,
    Linked,
    Ready,
    Failed,
    Disposed,
}

/// Resolved uniform locations of one program.
#[derive(Debug, Clone)]
pub struct UniformTable<U: ShaderUniform> {
    locations: HashMap<U, UniformLocation>,
}

impl<U: ShaderUniform> Default for UniformTable<U> {
    fn default() -> Self {
        Self {
            locations: HashMap::new(),
        }
    }
}

impl<U: ShaderUniform> UniformTable<U> {
    /// Resolves every uniform of `U`. Missing ones keep the sentinel location.
    pub fn resolve<A: ShaderApi + ?Sized>(api: &mut A, program: ProgramId, label: &str) -> Self {
        let mut locations = HashMap::new();
        for uniform in U::all() {
            let name = uniform.name();
            let location = api.uniform_location(program, &name);
            if !location.is_valid() {
                warn!("{label}: uniform `{name}` not found in program");
            }
            locations.insert(uniform, location);
        }
        Self { locations }
    }

    /// Location of `uniform`, or the sentinel when it was never resolved.
    pub fn location(&self, uniform: U) -> UniformLocation {
        match self.locations.get(&uniform) {
            Some(location) => *location,
            None => {
                error!("uniform `{}` was never resolved", uniform.name());
                UniformLocation::NOT_FOUND
            }
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// A shader program together with its typed uniform table.
#[derive(Debug)]
pub struct ShaderManager<U: ShaderUniform> {
    kind: ShaderKind,
    program: Option<ProgramId>,
    state: ShaderState,
    uniforms: UniformTable<U>,
    error: Option<ShaderError>,
}

impl<U: ShaderUniform> ShaderManager<U> {
    /// Compiles, links and resolves the uniforms of `kind`.
    ///
    /// Never fails: a compile or link error leaves the manager in
    /// [`ShaderState::Failed`] with the error available through [`Self::error`].
    ///
    /// # Arguments
    ///
    /// * `kind` - Which program to build
    /// * `source` - Where the GLSL text comes from
    /// * `attributes` - Vertex attributes bound before linking
    /// * `api` - Device that compiles the program
    pub fn new<A: ShaderApi + ?Sized>(
        kind: ShaderKind,
        source: &dyn ShaderSource,
        attributes: &[VertexAttribute],
        api: &mut A,
    ) -> Self {
        let mut manager = Self {
            kind,
            program: None,
            state: ShaderState::Uninitialized,
            uniforms: UniformTable::default(),
            error: None,
        };

        match manager.build(source, attributes, api) {
            Ok(program) => {
                manager.program = Some(program);
                manager.state = ShaderState::Linked;
                manager.uniforms = UniformTable::resolve(api, program, kind.label());
                manager.state = ShaderState::Ready;
                debug!("{}: shader ready with {} uniforms", kind.label(), manager.uniforms.len());
            }
            Err(err) => {
                error!("{err}");
                manager.state = ShaderState::Failed;
                manager.error = Some(err);
            }
        }
        manager
    }

    fn build<A: ShaderApi + ?Sized>(
        &self,
        source: &dyn ShaderSource,
        attributes: &[VertexAttribute],
        api: &mut A,
    ) -> Result<ProgramId, ShaderError> {
        let label = self.kind.label();
        let load = |stage: ShaderStage| {
            source.source(self.kind, stage).map_err(|err| ShaderError::Compile {
                program: label.to_string(),
                stage: stage.name(),
                log: err.to_string(),
            })
        };
        let vertex = load(ShaderStage::Vertex)?;
        let fragment = load(ShaderStage::Fragment)?;

        let program = api
            .compile_program(&vertex, &fragment)
            .map_err(|(stage, log)| ShaderError::Compile {
                program: label.to_string(),
                stage: stage.name(),
                log,
            })?;

        for attribute in attributes {
            api.bind_attribute_location(program, attribute.location(), attribute.name());
        }

        if let Err(log) = api.link_program(program) {
            api.delete_program(program);
            return Err(ShaderError::Link {
                program: label.to_string(),
                log,
            });
        }
        Ok(program)
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn state(&self) -> ShaderState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ShaderState::Ready
    }

    /// The build error of a failed manager.
    pub fn error(&self) -> Option<&ShaderError> {
        self.error.as_ref()
    }

    pub fn uniforms(&self) -> &UniformTable<U> {
        &self.uniforms
    }

    /// Binds the program. Returns `false`, doing nothing, unless ready.
    pub fn start<A: ShaderApi + ?Sized>(&self, api: &mut A) -> bool {
        match (self.state, self.program) {
            (ShaderState::Ready, Some(program)) => {
                api.start_program(program);
                true
            }
            _ => {
                warn!("{}: start ignored in state {:?}", self.kind.label(), self.state);
                false
            }
        }
    }

    pub fn stop<A: ShaderApi + ?Sized>(&self, api: &mut A) {
        if self.is_ready() {
            api.stop_program();
        }
    }

    /// Deletes the program. Safe to call more than once.
    pub fn dispose<A: ShaderApi + ?Sized>(&mut self, api: &mut A) {
        if let Some(program) = self.program.take() {
            api.delete_program(program);
            debug!("{}: program deleted", self.kind.label());
        }
        if self.state != ShaderState::Failed {
            self.state = ShaderState::Disposed;
        }
    }

    fn location(&self, uniform: U) -> Option<UniformLocation> {
        if !self.is_ready() {
            return None;
        }
        let location = self.uniforms.location(uniform);
        location.is_valid().then_some(location)
    }

    pub fn load_int<A: ShaderApi + ?Sized>(&self, api: &mut A, uniform: U, value: i32) {
        if let Some(location) = self.location(uniform) {
            api.load_int(location, value);
        }
    }

    pub fn load_float<A: ShaderApi + ?Sized>(&self, api: &mut A, uniform: U, value: f32) {
        if let Some(location) = self.location(uniform) {
            api.load_float(location, value);
        }
    }

    pub fn load_bool<A: ShaderApi + ?Sized>(&self, api: &mut A, uniform: U, value: bool) {
        if let Some(location) = self.location(uniform) {
            api.load_bool(location, value);
        }
    }

    pub fn load_vector<A: ShaderApi + ?Sized>(&self, api: &mut A, uniform: U, value: Vector3<f32>) {
        if let Some(location) = self.location(uniform) {
            api.load_vector(location, value);
        }
    }

    pub fn load_color_rgb<A: ShaderApi + ?Sized>(&self, api: &mut A, uniform: U, value: ColorRGB) {
        if let Some(location) = self.location(uniform) {
            api.load_color_rgb(location, value);
        }
    }

    pub fn load_color_rgba<A: ShaderApi + ?Sized>(&self, api: &mut A, uniform: U, value: ColorRGBA) {
        if let Some(location) = self.location(uniform) {
            api.load_color_rgba(location, value);
        }
    }

    pub fn load_matrix<A: ShaderApi + ?Sized>(&self, api: &mut A, uniform: U, value: &Matrix4<f32>) {
        if let Some(location) = self.location(uniform) {
            api.load_matrix(location, value);
        }
    }
}

impl<U: LitUniform> ShaderManager<U> {
    /// Uploads up to [`MAX_LIGHTS`] lights; unused slots get a black light.
    pub fn load_lights<A: ShaderApi + ?Sized>(&self, api: &mut A, lights: &[Light]) {
        if lights.len() > MAX_LIGHTS {
            warn!(
                "{}: {} lights given, only the first {MAX_LIGHTS} are used",
                self.kind.label(),
                lights.len()
            );
        }
        for i in 0..MAX_LIGHTS {
            let (position, color) = match lights.get(i) {
                Some(light) => (light.position, light.color),
                None => (Vector3::new(0.0, 0.0, 0.0), ColorRGB::BLACK),
            };
            self.load_vector(api, U::light_position(i), position);
            self.load_color_rgb(api, U::light_color(i), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::headless::{HeadlessDevice, RenderCommand, UniformValue};
    use crate::gfx::shaders::{BuiltinShaders, EntityUniform, SkyBoxUniform};

    #[test]
    fn test_builtin_program_becomes_ready() {
        let mut device = HeadlessDevice::new();
        let manager: ShaderManager<EntityUniform> =
            ShaderManager::new(ShaderKind::Entity, &BuiltinShaders, &VertexAttribute::MESH, &mut device);
        assert_eq!(manager.state(), ShaderState::Ready);
        assert_eq!(manager.uniforms().len(), EntityUniform::all().len());
        assert!(manager.error().is_none());
        assert_eq!(device.live_programs(), 1);
    }

    #[test]
    fn test_fragment_compile_failure_is_terminal() {
        // Only the entity fragment stage declares `diffuseColor` as a vec4 uniform
        let mut device = HeadlessDevice::new().with_compile_failure("uniform vec4 diffuseColor");
        let mut manager: ShaderManager<EntityUniform> =
            ShaderManager::new(ShaderKind::Entity, &BuiltinShaders, &VertexAttribute::MESH, &mut device);

        assert_eq!(manager.state(), ShaderState::Failed);
        assert!(matches!(
            manager.error(),
            Some(ShaderError::Compile { stage: "fragment", .. })
        ));
        assert!(!manager.start(&mut device));
        manager.stop(&mut device);
        manager.load_float(&mut device, EntityUniform::ShineDamper, 1.0);
        assert!(device.commands().is_empty());

        manager.dispose(&mut device);
        assert_eq!(manager.state(), ShaderState::Failed);
    }

    #[test]
    fn test_link_failure_deletes_program() {
        let mut device = HeadlessDevice::new().with_link_failure("samplerCube");
        let manager: ShaderManager<SkyBoxUniform> = ShaderManager::new(
            ShaderKind::SkyBox,
            &BuiltinShaders,
            &[VertexAttribute::Position],
            &mut device,
        );
        assert_eq!(manager.state(), ShaderState::Failed);
        assert!(matches!(manager.error(), Some(ShaderError::Link { .. })));
        assert_eq!(device.live_programs(), 0);
    }

    #[test]
    fn test_missing_uniform_loads_are_skipped() {
        let mut device = HeadlessDevice::new().with_missing_uniform("reflectivity");
        let manager: ShaderManager<EntityUniform> =
            ShaderManager::new(ShaderKind::Entity, &BuiltinShaders, &VertexAttribute::MESH, &mut device);
        assert!(manager.is_ready());
        assert!(!manager.uniforms().location(EntityUniform::Reflectivity).is_valid());

        manager.load_float(&mut device, EntityUniform::Reflectivity, 1.0);
        manager.load_float(&mut device, EntityUniform::ShineDamper, 10.0);
        assert_eq!(device.commands().len(), 1);
        assert_eq!(device.uniform_values("shineDamper"), vec![UniformValue::Float(10.0)]);
    }

    #[test]
    fn test_start_stop_and_dispose() {
        let mut device = HeadlessDevice::new();
        let mut manager: ShaderManager<SkyBoxUniform> = ShaderManager::new(
            ShaderKind::SkyBox,
            &BuiltinShaders,
            &[VertexAttribute::Position],
            &mut device,
        );
        assert!(manager.start(&mut device));
        manager.stop(&mut device);
        assert!(matches!(device.commands()[0], RenderCommand::StartProgram(_)));
        assert_eq!(device.commands()[1], RenderCommand::StopProgram);

        manager.dispose(&mut device);
        manager.dispose(&mut device);
        assert_eq!(manager.state(), ShaderState::Disposed);
        assert_eq!(device.live_programs(), 0);
        assert!(!manager.start(&mut device));
    }

    #[test]
    fn test_lights_fill_unused_slots_with_black() {
        let mut device = HeadlessDevice::new();
        let manager: ShaderManager<EntityUniform> =
            ShaderManager::new(ShaderKind::Entity, &BuiltinShaders, &VertexAttribute::MESH, &mut device);
        let sun = Light::new(Vector3::new(10.0, 100.0, 10.0), ColorRGB::WHITE);
        manager.load_lights(&mut device, &[sun]);

        assert_eq!(
            device.uniform_values("lightPosition[0]"),
            vec![UniformValue::Vector([10.0, 100.0, 10.0])]
        );
        assert_eq!(
            device.uniform_values("lightColor[3]"),
            vec![UniformValue::Rgb([0.0, 0.0, 0.0])]
        );
    }
}
