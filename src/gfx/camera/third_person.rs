//! Orbit camera that follows the player over the terrain.

use cgmath::Vector3;

use super::Camera;
use crate::config::CameraConfig;
use crate::gfx::scene::terrain::TerrainHeight;
use crate::input::InputState;

/// Limits applied to the orbit. `None` leaves a side open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThirdPersonBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for ThirdPersonBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(1.0),
            max_distance: Some(200.0),
            min_pitch: -89.0,
            max_pitch: 89.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThirdPersonCamera {
    pub camera: Camera,
    pub distance: f32,
    /// Degrees around the player, added to its heading
    pub angle: f32,
    pub bounds: ThirdPersonBounds,
    config: CameraConfig,
}

impl ThirdPersonCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            camera: Camera {
                pitch: config.pitch,
                ..Camera::default()
            },
            distance: config.distance,
            angle: 0.0,
            bounds: ThirdPersonBounds::default(),
            config,
        }
    }

    pub fn with_bounds(mut self, bounds: ThirdPersonBounds) -> Self {
        self.bounds = bounds;
        self.set_distance(self.distance);
        self.set_pitch(self.camera.pitch);
        self
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.camera.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
    }

    /// Applies this frame's pointer input, then places the camera behind the
    /// target at `target_position` facing `target_rot_y` degrees.
    pub fn update<T: TerrainHeight + ?Sized>(
        &mut self,
        input: &InputState,
        target_position: Vector3<f32>,
        target_rot_y: f32,
        terrain: &T,
    ) {
        self.check_pointer_inputs(input);

        let pitch = self.camera.pitch.to_radians();
        let horizontal = self.distance * pitch.cos();
        let vertical = self.distance * pitch.sin();

        let theta = (target_rot_y + self.angle).to_radians();
        let x = target_position.x + horizontal * theta.sin();
        let z = target_position.z - horizontal * theta.cos();
        let ground = terrain.height_at(x, z).max(target_position.y);
        self.camera.position = Vector3::new(x, ground + self.config.eye_height + vertical, z);
        self.camera.yaw = 180.0 - target_rot_y + self.angle;
    }

    fn check_pointer_inputs(&mut self, input: &InputState) {
        self.set_distance(self.distance - input.wheel() * self.config.zoom_speed);

        let (dx, dy) = input.pointer_delta();
        if input.secondary_down() {
            self.set_pitch(self.camera.pitch - dy * self.config.pitch_speed);
        }
        if input.primary_down() {
            self.angle -= dx * self.config.angle_speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat(f32);

    impl TerrainHeight for Flat {
        fn height_at(&self, _x: f32, _z: f32) -> f32 {
            self.0
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_behind_player_at_rest() {
        let mut camera = ThirdPersonCamera::new(CameraConfig::default());
        camera.update(&InputState::new(), Vector3::new(5.0, 1.0, 5.0), 0.0, &Flat(0.0));
        let p = camera.camera.position;
        assert!(approx(p.x, 5.0));
        assert!(approx(p.z, -20.0));
        assert!(approx(p.y, 11.0));
        assert!(approx(camera.camera.yaw, 180.0));
    }

    #[test]
    fn test_terrain_above_player_lifts_camera() {
        let mut camera = ThirdPersonCamera::new(CameraConfig::default());
        camera.update(&InputState::new(), Vector3::new(0.0, 1.0, 0.0), 90.0, &Flat(7.0));
        let p = camera.camera.position;
        assert!(approx(p.x, 25.0));
        assert!(approx(p.z, 0.0));
        assert!(approx(p.y, 17.0));
        assert!(approx(camera.camera.yaw, 90.0));
    }

    #[test]
    fn test_pointer_inputs() {
        let mut camera = ThirdPersonCamera::new(CameraConfig::default());
        let mut input = InputState::new();
        input.add_wheel(50.0);
        input.add_pointer_delta(10.0, 100.0);
        // buttons up: only zoom applies
        camera.update(&input, Vector3::new(0.0, 0.0, 0.0), 0.0, &Flat(0.0));
        assert!(approx(camera.distance, 20.0));
        assert!(approx(camera.angle, 0.0));
        assert!(approx(camera.camera.pitch, 0.0));

        input.end_frame();
        input.add_pointer_delta(10.0, -100.0);
        input.set_primary_button(true);
        input.set_secondary_button(true);
        camera.update(&input, Vector3::new(0.0, 0.0, 0.0), 0.0, &Flat(0.0));
        assert!(approx(camera.angle, -3.0));
        assert!(approx(camera.camera.pitch, 10.0));
        assert!(approx(camera.camera.yaw, 177.0));
        let vertical = 20.0 * 10.0f32.to_radians().sin();
        assert!(approx(camera.camera.position.y, 10.0 + vertical));
    }

    #[test]
    fn test_bounds_clamp_zoom_and_pitch() {
        let mut camera = ThirdPersonCamera::new(CameraConfig::default());
        let mut input = InputState::new();
        input.add_wheel(10_000.0);
        input.add_pointer_delta(0.0, -5_000.0);
        input.set_secondary_button(true);
        camera.update(&input, Vector3::new(0.0, 0.0, 0.0), 0.0, &Flat(0.0));
        assert_eq!(camera.distance, 1.0);
        assert_eq!(camera.camera.pitch, 89.0);
    }
}
