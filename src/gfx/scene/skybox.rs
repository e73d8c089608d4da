//! Skybox cube and its cube-map texture.

use crate::gfx::render_api::{LoaderRenderApi, RawModel, TextureId};

/// Half edge length of the skybox cube.
pub const SKYBOX_SIZE: f32 = 500.0;

/// Cube-map faces in upload order: right, left, top, bottom, back, front.
pub const SKYBOX_FACES: [&str; 6] = [
    "textures/skybox/right.png",
    "textures/skybox/left.png",
    "textures/skybox/top.png",
    "textures/skybox/bottom.png",
    "textures/skybox/back.png",
    "textures/skybox/front.png",
];

#[rustfmt::skip]
const UNIT_CUBE: [f32; 108] = [
    -1.0,  1.0, -1.0,  -1.0, -1.0, -1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,   1.0,  1.0, -1.0,  -1.0,  1.0, -1.0,

    -1.0, -1.0,  1.0,  -1.0, -1.0, -1.0,  -1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,  -1.0,  1.0,  1.0,  -1.0, -1.0,  1.0,

     1.0, -1.0, -1.0,   1.0, -1.0,  1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,   1.0,  1.0, -1.0,   1.0, -1.0, -1.0,

    -1.0, -1.0,  1.0,  -1.0,  1.0,  1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,   1.0, -1.0,  1.0,  -1.0, -1.0,  1.0,

    -1.0,  1.0, -1.0,   1.0,  1.0, -1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,  -1.0,  1.0,  1.0,  -1.0,  1.0, -1.0,

    -1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,   1.0, -1.0,  1.0,
];

/// Positions of a cube of half edge `size`, 36 vertices, inward facing.
pub fn cube_positions(size: f32) -> Vec<f32> {
    UNIT_CUBE.iter().map(|v| v * size).collect()
}

/// The sky cube drawn around the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyBox {
    pub model: RawModel,
    pub texture: Option<TextureId>,
}

impl SkyBox {
    /// Uploads the cube and loads the six faces.
    pub fn load<A: LoaderRenderApi + ?Sized>(api: &mut A, faces: &[&str; 6], size: f32) -> Self {
        let model = api.load_positions_to_raw_model(&cube_positions(size), 3);
        let texture = api.load_cube_map(faces, false);
        if texture.is_none() {
            log::warn!("skybox cube map could not be loaded, sky stays unbound");
        }
        Self { model, texture }
    }

    pub fn dispose<A: LoaderRenderApi + ?Sized>(&self, api: &mut A) {
        api.dispose_raw_model(self.model);
        if let Some(texture) = self.texture {
            api.dispose_texture(texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::headless::HeadlessDevice;

    #[test]
    fn test_cube_has_36_vertices_on_the_shell() {
        let positions = cube_positions(SKYBOX_SIZE);
        assert_eq!(positions.len(), 108);
        for v in positions.chunks_exact(3) {
            let max = v.iter().fold(0.0f32, |m, c| m.max(c.abs()));
            assert_eq!(max, SKYBOX_SIZE);
        }
    }

    #[test]
    fn test_load_and_dispose() {
        let mut device = HeadlessDevice::new();
        let sky = SkyBox::load(&mut device, &SKYBOX_FACES, 10.0);
        assert_eq!(sky.model.vertex_count(), 36);
        assert!(sky.texture.is_some());
        sky.dispose(&mut device);
        assert_eq!(device.live_models(), 0);
        assert_eq!(device.live_textures(), 0);
    }
}
