//! # Grove Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use grove::prelude::*;
//! ```
//!
//! Driving a headless frame loop then reads:
//!
//! ```no_run
//! use grove::prelude::*;
//!
//! fn main() -> grove::Result<()> {
//!     let provider = FsResourceProvider::new("res");
//!     let config = EngineConfig::default();
//!     let mut device = HeadlessDevice::new();
//!     let mut world = WorldGenerator::new(&provider, config).generate(&mut device)?;
//!     let mut render = MasterRender::new(device, &BuiltinShaders, config);
//!
//!     let mut input = InputState::new();
//!     for _ in 0..60 {
//!         world.update(1.0 / 60.0, &mut input);
//!         render.render(&world, world.camera());
//!         input.end_frame();
//!     }
//!     world.dispose(render.device_mut());
//!     Ok(())
//! }
//! ```

// Core types
pub use crate::color::{ColorRGB, ColorRGBA};
pub use crate::config::{CameraConfig, EngineConfig, PlayerConfig, ProjectionConfig, TerrainConfig};
pub use crate::error::{GroveError, ParseError, ResourceError, ShaderError};

// Loading
pub use crate::loader::{Loader, MaterialOptions};
pub use crate::resources::{FsResourceProvider, MemoryResourceProvider, ResourceProvider, ShapeCache};
pub use crate::wavefront::{load_model, ExternalMaterial, GeometryParser, MaterialParser, ObjOptions, Shape};

// Graphics
pub use crate::gfx::camera::{Camera, ThirdPersonCamera};
pub use crate::gfx::headless::HeadlessDevice;
pub use crate::gfx::render_api::{FrameRenderApi, GraphicsDevice, LoaderRenderApi, ShaderApi};
pub use crate::gfx::rendering::MasterRender;
pub use crate::gfx::scene::{Entity, EntityKind, GuiTexture, Light, Player, Terrain, TerrainHeight};
pub use crate::gfx::shaders::{BuiltinShaders, ProvidedShaders, ShaderSource};

// Gameplay
pub use crate::input::{GamePadKey, InputState};
pub use crate::world::{EntitySpawn, World, WorldGenerator};

// Common external types
pub use cgmath::{Vector2, Vector3};
