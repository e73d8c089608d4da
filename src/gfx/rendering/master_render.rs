//! # Master render
//!
//! Sequences one frame over the device it owns, in a fixed order:
//!
//! 1. begin frame (clear with the sky colour)
//! 2. terrain pass
//! 3. entity pass
//! 4. player pass
//! 5. skybox pass
//! 6. GUI pass
//! 7. end frame
//!
//! Every pass starts and stops its own program, and a pass whose program is
//! not ready is skipped for the frame without affecting the others.

use std::time::{Duration, Instant};

use log::{debug, trace};

use super::{EntityRender, GuiRender, SkyBoxRender, TerrainRender};
use crate::config::EngineConfig;
use crate::error::ShaderError;
use crate::gfx::camera::Camera;
use crate::gfx::render_api::GraphicsDevice;
use crate::gfx::shaders::ShaderSource;
use crate::math;
use crate::world::World;

pub struct MasterRender<D: GraphicsDevice> {
    device: D,
    config: EngineConfig,
    terrain: TerrainRender,
    entity: EntityRender,
    skybox: SkyBoxRender,
    gui: GuiRender,
    frame_start: Option<Instant>,
    last_frame: Duration,
    frames: u64,
    disposed: bool,
}

impl<D: GraphicsDevice> MasterRender<D> {
    /// Builds every pass on `device`. Projection matrices and texture units
    /// are loaded here, once.
    pub fn new(mut device: D, source: &dyn ShaderSource, config: EngineConfig) -> Self {
        let p = config.projection;
        let projection = math::projection_matrix(p.fov, p.aspect, p.near, p.far);

        let terrain = TerrainRender::new(source, &mut device, &projection);
        let entity = EntityRender::new(source, &mut device, &projection);
        let skybox = SkyBoxRender::new(source, &mut device, &projection);
        let gui = GuiRender::new(source, &mut device);
        debug!("Master render ready");

        Self {
            device,
            config,
            terrain,
            entity,
            skybox,
            gui,
            frame_start: None,
            last_frame: Duration::ZERO,
            frames: 0,
            disposed: false,
        }
    }

    /// Renders `world` as seen from `camera`.
    pub fn render(&mut self, world: &World, camera: &Camera) {
        if self.disposed {
            return;
        }
        let view = camera.view_matrix();
        let sky = self.config.sky_color;

        self.begin_frame();

        trace!("frame {}: terrain", self.frames);
        self.terrain
            .render(&mut self.device, &world.terrains, &world.lights, sky, &view);

        trace!("frame {}: entities", self.frames);
        self.entity
            .render(&mut self.device, &world.entities, &world.lights, sky, &view);

        trace!("frame {}: player", self.frames);
        self.entity.render(
            &mut self.device,
            std::slice::from_ref(&world.player.entity),
            &world.lights,
            sky,
            &view,
        );

        trace!("frame {}: skybox", self.frames);
        self.skybox.render(&mut self.device, &world.skybox, &view);

        trace!("frame {}: gui", self.frames);
        self.gui.render(&mut self.device, &world.guis);

        self.end_frame();
    }

    fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
        self.device.prepare_frame(self.config.sky_color);
    }

    fn end_frame(&mut self) {
        self.device.end_frame();
        if let Some(start) = self.frame_start.take() {
            self.last_frame = start.elapsed();
        }
        self.frames += 1;
    }

    /// Resizes the drawing area. The projection keeps its configured aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.device.set_viewport(0, 0, width, height);
    }

    /// Duration of the last rendered frame.
    pub fn last_frame_time(&self) -> Duration {
        self.last_frame
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Errors of the programs that failed to build.
    pub fn shader_errors(&self) -> Vec<&ShaderError> {
        [
            self.terrain.shader().error(),
            self.entity.shader().error(),
            self.skybox.shader().error(),
            self.gui.shader().error(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Deletes every program and the GUI quad. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.terrain.dispose(&mut self.device);
        self.entity.dispose(&mut self.device);
        self.skybox.dispose(&mut self.device);
        self.gui.dispose(&mut self.device);
        self.disposed = true;
        debug!("Master render disposed after {} frames", self.frames);
    }
}

impl<D: GraphicsDevice> Drop for MasterRender<D> {
    fn drop(&mut self) {
        self.dispose();
    }
}
