//! Grove
//!
//! A small outdoor-scene engine: Wavefront OBJ/MTL loading, material
//! resolution, a terrain height sampler, a third-person camera and a frame
//! sequencer that drives any device implementing the render API.

pub mod color;
pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod loader;
pub mod math;
pub mod prelude;
pub mod resources;
pub mod wavefront;
pub mod world;

pub use error::{GroveError, Result};
pub use gfx::rendering::MasterRender;
pub use world::{World, WorldGenerator};
