//! Render passes and the frame sequencer driving them.

pub mod entity_render;
pub mod gui_render;
pub mod master_render;
pub mod skybox_render;
pub mod terrain_render;

pub use entity_render::EntityRender;
pub use gui_render::GuiRender;
pub use master_render::MasterRender;
pub use skybox_render::SkyBoxRender;
pub use terrain_render::TerrainRender;
