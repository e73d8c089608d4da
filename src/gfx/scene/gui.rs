//! GUI quads drawn over the scene.

use cgmath::Vector2;

use crate::gfx::render_api::{LoaderRenderApi, RawModel, TextureId};
use crate::input::GamePadKey;

/// Slack on the quad edges so touches landing exactly on a border count
/// despite rounding in `position ± scale`.
const EDGE_EPSILON: f32 = 1e-5;

/// Triangle-strip positions of the unit quad spanning `[-1, 1]²`.
pub const QUAD_POSITIONS: [f32; 8] = [-1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0, -1.0];

/// Uploads the quad shared by every GUI element.
pub fn load_quad<A: LoaderRenderApi + ?Sized>(api: &mut A) -> RawModel {
    api.load_positions_to_raw_model(&QUAD_POSITIONS, 2)
}

/// A textured quad in normalized device coordinates, optionally acting as an
/// on-screen game-pad key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuiTexture {
    pub texture: Option<TextureId>,
    /// Centre of the quad
    pub position: Vector2<f32>,
    /// Half extents of the quad
    pub scale: Vector2<f32>,
    pub key: Option<GamePadKey>,
}

impl GuiTexture {
    pub fn new(texture: Option<TextureId>, position: Vector2<f32>, scale: Vector2<f32>) -> Self {
        Self {
            texture,
            position,
            scale,
            key: None,
        }
    }

    pub fn with_key(mut self, key: GamePadKey) -> Self {
        self.key = Some(key);
        self
    }

    /// True when `(x, y)` lies on the quad, edges included.
    pub fn contains_location(&self, x: f32, y: f32) -> bool {
        (x - self.position.x).abs() <= self.scale.x + EDGE_EPSILON
            && (y - self.position.y).abs() <= self.scale.y + EDGE_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_location() {
        let gui = GuiTexture::new(None, Vector2::new(0.0, 0.9), Vector2::new(0.1, 0.1));
        assert!(gui.contains_location(0.0, 0.9));
        assert!(gui.contains_location(0.1, 1.0));
        assert!(!gui.contains_location(0.0, 0.7));
        assert!(!gui.contains_location(-0.2, 0.9));
    }

    #[test]
    fn test_contains_location_edges() {
        let gui = GuiTexture::new(None, Vector2::new(0.0, 0.5), Vector2::new(0.25, 0.25));
        assert!(gui.contains_location(0.25, 0.75));
        assert!(gui.contains_location(-0.25, 0.25));
        assert!(gui.contains_location(0.1, 0.6));
        assert!(!gui.contains_location(0.2501, 0.5));
        assert!(!gui.contains_location(0.0, 0.7501));

        // corners that only hit after rounding in position + scale
        let pad = GuiTexture::new(None, Vector2::new(0.7, 0.9), Vector2::new(0.1, 0.1));
        assert!(pad.contains_location(0.8, 1.0));
        assert!(pad.contains_location(0.6, 0.8));
        assert!(!pad.contains_location(0.81, 0.9));
    }
}
