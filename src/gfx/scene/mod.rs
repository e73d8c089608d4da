//! # Scene
//!
//! Everything the renderer draws and gameplay moves: placed entities and the
//! shared models behind them, terrain tiles, the skybox, GUI quads, lights
//! and the player.
//!
//! ## Key Components
//!
//! - [`GenericEntity`] / [`Entity`] - shared uploaded model and its placed instances
//! - [`MaterialGroup`] - the sub-meshes of one logical mesh part
//! - [`Terrain`] - a height-mapped tile, also the [`TerrainHeight`] sampler
//! - [`SkyBox`] - the cube-mapped sky
//! - [`GuiTexture`] - overlay quads, optionally bound to a game-pad key
//! - [`Player`] - the game-pad driven entity

pub mod entity;
pub mod gui;
pub mod light;
pub mod material;
pub mod player;
pub mod skybox;
pub mod terrain;

pub use entity::{batch_by_generic, Entity, EntityKind, GenericEntity};
pub use gui::GuiTexture;
pub use light::Light;
pub use material::{DiffuseLighting, Material, MaterialGroup, RawModelMaterial};
pub use player::Player;
pub use skybox::SkyBox;
pub use terrain::{HeightGrid, Terrain, TerrainHeight, TerrainTexturesPack};
