//! # Graphics Module
//!
//! Everything between the scene and a graphics device.
//!
//! - **Render API** ([`render_api`]) - device capability traits and opaque handles
//! - **Headless device** ([`headless`]) - a device that records every call
//! - **Shaders** ([`shaders`]) - program lifecycle and typed uniforms
//! - **Scene** ([`scene`]) - entities, terrain, skybox, GUI, lights, player
//! - **Camera** ([`camera`]) - view state and the third-person follow camera
//! - **Rendering** ([`rendering`]) - the per-kind passes and [`MasterRender`]
//!
//! [`MasterRender`]: rendering::MasterRender

pub mod camera;
pub mod headless;
pub mod render_api;
pub mod rendering;
pub mod scene;
pub mod shaders;
