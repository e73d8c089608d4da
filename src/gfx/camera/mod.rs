pub mod third_person;

pub use third_person::{ThirdPersonBounds, ThirdPersonCamera};

use cgmath::{Matrix4, Vector3};

use crate::math;

/// Eye of the scene. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 2.5, 0.0),
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vector3<f32>, pitch: f32, yaw: f32) -> Self {
        Self {
            position,
            pitch,
            yaw,
            roll: 0.0,
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        math::view_matrix(self.position, self.pitch, self.yaw)
    }
}
