//! # Transform math
//!
//! Matrix builders shared by the render passes and the height sampler.
//!
//! All matrices are column-major cgmath [`Matrix4<f32>`] in the OpenGL
//! clip-space convention. Angles coming from scene objects are in degrees.

use cgmath::{Deg, Matrix4, SquareMatrix, Vector2, Vector3};

/// Builds the model matrix of an entity or a terrain.
///
/// Starts from identity, translates by `position`, then rotates about X, Y and Z
/// (in that order) and finally scales uniformly.
///
/// # Arguments
///
/// * `position` - World position
/// * `rotation` - Rotation in degrees about X, Y and Z
/// * `scale` - Uniform scale factor
pub fn transformation_matrix(
    position: Vector3<f32>,
    rotation: Vector3<f32>,
    scale: f32,
) -> Matrix4<f32> {
    let t = Matrix4::from_translation(position);
    let rx = Matrix4::from_angle_x(Deg(rotation.x));
    let ry = Matrix4::from_angle_y(Deg(rotation.y));
    let rz = Matrix4::from_angle_z(Deg(rotation.z));
    let s = Matrix4::from_scale(scale);

    Matrix4::identity() * t * rx * ry * rz * s
}

/// Builds the 2D transform of a GUI quad: translate then scale, z fixed at 0.
pub fn gui_transformation_matrix(position: Vector2<f32>, scale: Vector2<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(position.x, position.y, 0.0))
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, 1.0)
}

/// Builds a view matrix: rotate by pitch about X, by yaw about Y, then move
/// the world by the negated camera position.
pub fn view_matrix(position: Vector3<f32>, pitch: f32, yaw: f32) -> Matrix4<f32> {
    Matrix4::from_angle_x(Deg(pitch)) * Matrix4::from_angle_y(Deg(yaw)) * Matrix4::from_translation(-position)
}

/// Perspective projection with a vertical field of view in degrees.
pub fn projection_matrix(fov: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    cgmath::perspective(Deg(fov), aspect, near, far)
}

/// Returns `matrix` with its translation column zeroed.
///
/// Used for the skybox, which rotates with the camera but never moves with it.
pub fn without_translation(mut matrix: Matrix4<f32>) -> Matrix4<f32> {
    matrix.w.x = 0.0;
    matrix.w.y = 0.0;
    matrix.w.z = 0.0;
    matrix
}

/// Interpolates the height (y) of `pos` on the triangle `p1 p2 p3`.
///
/// The triangle corners are given as `(x, height, z)` and `pos` as `(x, z)`.
pub fn barycentric(
    p1: Vector3<f32>,
    p2: Vector3<f32>,
    p3: Vector3<f32>,
    pos: Vector2<f32>,
) -> f32 {
    let det = (p2.z - p3.z) * (p1.x - p3.x) + (p3.x - p2.x) * (p1.z - p3.z);
    let l1 = ((p2.z - p3.z) * (pos.x - p3.x) + (p3.x - p2.x) * (pos.y - p3.z)) / det;
    let l2 = ((p3.z - p1.z) * (pos.x - p3.x) + (p1.x - p3.x) * (pos.y - p3.z)) / det;
    let l3 = 1.0 - l1 - l2;
    l1 * p1.y + l2 * p2.y + l3 * p3.y
}

/// Converts a cgmath matrix to a plain column-major array.
pub fn matrix_to_array(matrix: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix.into()
}
