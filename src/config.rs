//! # Engine configuration
//!
//! Tunable constants of the engine grouped by concern. [`EngineConfig::default`]
//! reproduces the classic values; the `with_*` builder methods override them.
//!
//! ## Usage
//!
//! ```no_run
//! use grove::config::{EngineConfig, ProjectionConfig};
//! use grove::color::ColorRGBA;
//!
//! let config = EngineConfig::default()
//!     .with_projection(ProjectionConfig::default().with_fov(60.0))
//!     .with_sky_color(ColorRGBA::new(0.4, 0.6, 0.9, 1.0));
//! assert_eq!(config.projection.fov, 60.0);
//! ```

use crate::color::ColorRGBA;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl ProjectionConfig {
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn with_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }
}

/// Terrain generation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainConfig {
    /// Edge length of one terrain tile in world units
    pub size: f32,
    /// Vertices per edge of a flat terrain
    pub vertex_count: usize,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 500.0,
            vertex_count: 128,
            min_height: -40.0,
            max_height: 40.0,
        }
    }
}

impl TerrainConfig {
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_vertex_count(mut self, vertex_count: usize) -> Self {
        self.vertex_count = vertex_count;
        self
    }

    pub fn with_height_range(mut self, min_height: f32, max_height: f32) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self
    }
}

/// Third-person camera parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub distance: f32,
    pub pitch: f32,
    pub eye_height: f32,
    pub zoom_speed: f32,
    pub pitch_speed: f32,
    pub angle_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 25.0,
            pitch: 0.0,
            eye_height: 10.0,
            zoom_speed: 0.1,
            pitch_speed: 0.1,
            angle_speed: 0.3,
        }
    }
}

impl CameraConfig {
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_eye_height(mut self, eye_height: f32) -> Self {
        self.eye_height = eye_height;
        self
    }
}

/// Player movement parameters, in world units and seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    pub run_speed: f32,
    /// Degrees per second
    pub turn_speed: f32,
    pub gravity: f32,
    pub jump_power: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            run_speed: 20.0,
            turn_speed: 160.0,
            gravity: -50.0,
            jump_power: 30.0,
        }
    }
}

impl PlayerConfig {
    pub fn with_run_speed(mut self, run_speed: f32) -> Self {
        self.run_speed = run_speed;
        self
    }

    pub fn with_jump(mut self, gravity: f32, jump_power: f32) -> Self {
        self.gravity = gravity;
        self.jump_power = jump_power;
        self
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub projection: ProjectionConfig,
    pub terrain: TerrainConfig,
    pub camera: CameraConfig,
    pub player: PlayerConfig,
    pub sky_color: ColorRGBA,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionConfig::default(),
            terrain: TerrainConfig::default(),
            camera: CameraConfig::default(),
            player: PlayerConfig::default(),
            sky_color: ColorRGBA::new(0.5, 0.5, 0.5, 1.0),
        }
    }
}

impl EngineConfig {
    pub fn with_projection(mut self, projection: ProjectionConfig) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_terrain(mut self, terrain: TerrainConfig) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_player(mut self, player: PlayerConfig) -> Self {
        self.player = player;
        self
    }

    pub fn with_sky_color(mut self, sky_color: ColorRGBA) -> Self {
        self.sky_color = sky_color;
        self
    }
}
