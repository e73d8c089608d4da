//! # Terrain
//!
//! Square terrain tiles built from a height grid.
//!
//! ## Height grid
//!
//! [`HeightGrid`] stores one height per vertex, indexed `[x][z]`. It is built
//! either flat or from a heightmap image, and never changes afterwards.
//!
//! ## Height sampling
//!
//! [`HeightGrid::height_at`] splits every grid cell into two triangles along
//! the diagonal from `(cell, 0)` to `(0, cell)` and interpolates the height
//! barycentrically inside the triangle containing the point. Points outside
//! the grid are at height 0.
//!
//! ## Mesh
//!
//! [`HeightGrid::to_shape`] produces one vertex per sample with normals from
//! central differences and two triangles per cell.

use cgmath::{InnerSpace, Vector2, Vector3};

use crate::config::TerrainConfig;
use crate::gfx::render_api::{FrameRenderApi, LoaderRenderApi, RawModel, TextureId};
use crate::math::{self, barycentric};
use crate::resources::TextureData;
use crate::wavefront::Shape;

/// Largest 24-bit pixel value of a heightmap, `255³`.
pub const MAX_PIXEL_COLOR: f32 = 255.0 * 255.0 * 255.0;

/// Heights of a square grid of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    len: usize,
    heights: Vec<f32>,
}

impl HeightGrid {
    /// A flat grid of `len × len` samples at height 0.
    pub fn flat(len: usize) -> Self {
        Self {
            len,
            heights: vec![0.0; len * len],
        }
    }

    /// Builds a grid from `heights[x][z]`.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Self {
        let len = rows.len();
        let heights = rows.into_iter().flatten().collect::<Vec<_>>();
        debug_assert_eq!(heights.len(), len * len);
        Self { len, heights }
    }

    /// Builds a grid from a heightmap, one sample per pixel row.
    ///
    /// The pixel at `(x, z)` maps linearly from `[0, 255³]` onto
    /// `[min_height, max_height]`. The mapping is not clamped, so 24-bit
    /// values above `255³` land slightly above `max_height`. Lookups outside
    /// the image give 0.
    pub fn from_heightmap(image: &TextureData, config: &TerrainConfig) -> Self {
        let len = image.height as usize;
        let mut heights = Vec::with_capacity(len * len);
        for x in 0..len {
            for z in 0..len {
                heights.push(heightmap_height(image, x as i64, z as i64, config));
            }
        }
        Self { len, heights }
    }

    /// Samples per edge.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height at grid sample `(x, z)`, 0 outside the grid.
    pub fn get(&self, x: i64, z: i64) -> f32 {
        if x < 0 || z < 0 || x >= self.len as i64 || z >= self.len as i64 {
            return 0.0;
        }
        self.heights[x as usize * self.len + z as usize]
    }

    /// Interpolated height at terrain-local `(x, z)` of a tile of edge `size`.
    pub fn height_at(&self, size: f32, x: f32, z: f32) -> f32 {
        if self.len < 2 {
            return 0.0;
        }
        let cell = size / (self.len - 1) as f32;
        let grid_x = (x / cell).floor();
        let grid_z = (z / cell).floor();
        let last = (self.len - 1) as f32;
        if grid_x < 0.0 || grid_z < 0.0 || grid_x >= last || grid_z >= last {
            return 0.0;
        }

        let (gx, gz) = (grid_x as i64, grid_z as i64);
        let x_coord = x % cell;
        let z_coord = z % cell;
        let at = Vector2::new(x_coord, z_coord);

        if x_coord <= cell - z_coord {
            barycentric(
                Vector3::new(0.0, self.get(gx, gz), 0.0),
                Vector3::new(cell, self.get(gx + 1, gz), 0.0),
                Vector3::new(0.0, self.get(gx, gz + 1), cell),
                at,
            )
        } else {
            barycentric(
                Vector3::new(cell, self.get(gx + 1, gz), 0.0),
                Vector3::new(cell, self.get(gx + 1, gz + 1), cell),
                Vector3::new(0.0, self.get(gx, gz + 1), cell),
                at,
            )
        }
    }

    fn normal(&self, x: i64, z: i64) -> Vector3<f32> {
        let left = self.get(x - 1, z);
        let right = self.get(x + 1, z);
        let down = self.get(x, z - 1);
        let up = self.get(x, z + 1);
        Vector3::new(left - right, 2.0, down - up).normalize()
    }

    /// Builds the terrain mesh for a tile of edge `size`.
    pub fn to_shape(&self, size: f32) -> Shape {
        let n = self.len;
        let mut shape = Shape::new("terrain");
        if n < 2 {
            return shape;
        }
        let step = (n - 1) as f32;

        for i in 0..n {
            for j in 0..n {
                let (x, z) = (j as i64, i as i64);
                shape.push_vertex(
                    Vector3::new(j as f32 / step * size, self.get(x, z), i as f32 / step * size),
                    Vector2::new(j as f32 / step, i as f32 / step),
                    self.normal(x, z),
                );
            }
        }

        for gz in 0..n - 1 {
            for gx in 0..n - 1 {
                let top_left = (gz * n + gx) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((gz + 1) * n + gx) as u32;
                let bottom_right = bottom_left + 1;
                shape.indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }
        shape
    }
}

fn heightmap_height(image: &TextureData, x: i64, z: i64, config: &TerrainConfig) -> f32 {
    match image.rgb(x, z) {
        Some(value) => {
            let normalized = value as f32 / MAX_PIXEL_COLOR;
            config.min_height + normalized * (config.max_height - config.min_height)
        }
        None => 0.0,
    }
}

/// The five textures blended by the terrain program, in texture-unit order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerrainTexturesPack {
    pub background: Option<TextureId>,
    pub mud: Option<TextureId>,
    pub grass: Option<TextureId>,
    pub path: Option<TextureId>,
    pub weight_map: Option<TextureId>,
}

impl TerrainTexturesPack {
    /// Resource names, in unit order.
    pub const FILES: [&'static str; 5] = [
        "textures/background.png",
        "textures/mud.png",
        "textures/grass.png",
        "textures/path.png",
        "textures/blend_map.png",
    ];

    /// Loads the five textures; missing ones stay unbound.
    pub fn load<A: LoaderRenderApi + ?Sized>(api: &mut A) -> Self {
        let [background, mud, grass, path, weight_map] =
            Self::FILES.map(|file| api.load_texture(file, true));
        Self {
            background,
            mud,
            grass,
            path,
            weight_map,
        }
    }

    pub fn units(&self) -> [Option<TextureId>; 5] {
        [self.background, self.mud, self.grass, self.path, self.weight_map]
    }

    /// Binds every loaded texture to its unit (0..4).
    pub fn bind<A: FrameRenderApi + ?Sized>(&self, api: &mut A) {
        for (unit, texture) in self.units().into_iter().enumerate() {
            if let Some(texture) = texture {
                api.bind_texture(unit as u32, texture);
            }
        }
    }
}

/// Lookup of ground height at world coordinates.
pub trait TerrainHeight {
    fn height_at(&self, world_x: f32, world_z: f32) -> f32;
}

/// A placed terrain tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    pub origin: Vector3<f32>,
    pub size: f32,
    pub heights: HeightGrid,
    pub model: RawModel,
    pub textures: TerrainTexturesPack,
}

impl Terrain {
    /// Uploads the mesh of `heights` and places it at tile `(grid_x, grid_z)`.
    pub fn new<A: LoaderRenderApi + ?Sized>(
        api: &mut A,
        grid_x: i32,
        grid_z: i32,
        heights: HeightGrid,
        textures: TerrainTexturesPack,
        size: f32,
    ) -> Self {
        let model = api.load_to_raw_model(&heights.to_shape(size));
        Self {
            origin: Vector3::new(grid_x as f32 * size, 0.0, grid_z as f32 * size),
            size,
            heights,
            model,
            textures,
        }
    }

    /// True when world `(x, z)` lies on this tile.
    pub fn contains(&self, world_x: f32, world_z: f32) -> bool {
        let x = world_x - self.origin.x;
        let z = world_z - self.origin.z;
        (0.0..self.size).contains(&x) && (0.0..self.size).contains(&z)
    }

    /// Translation-only model matrix.
    pub fn transformation_matrix(&self) -> cgmath::Matrix4<f32> {
        math::transformation_matrix(self.origin, Vector3::new(0.0, 0.0, 0.0), 1.0)
    }

    /// Releases the mesh and textures.
    pub fn dispose<A: LoaderRenderApi + ?Sized>(&self, api: &mut A) {
        api.dispose_raw_model(self.model);
        for texture in self.textures.units().into_iter().flatten() {
            api.dispose_texture(texture);
        }
    }
}

impl TerrainHeight for Terrain {
    fn height_at(&self, world_x: f32, world_z: f32) -> f32 {
        self.heights
            .height_at(self.size, world_x - self.origin.x, world_z - self.origin.z)
    }
}

impl TerrainHeight for [Terrain] {
    /// Height on the tile containing the point, 0 off every tile.
    fn height_at(&self, world_x: f32, world_z: f32) -> f32 {
        self.iter()
            .find(|t| t.contains(world_x, world_z))
            .map(|t| t.height_at(world_x, world_z))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::headless::HeadlessDevice;
    use rand::Rng;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn sloped(len: usize) -> HeightGrid {
        // h = x + 2z at every sample
        HeightGrid::from_rows(
            (0..len)
                .map(|x| (0..len).map(|z| x as f32 + 2.0 * z as f32).collect())
                .collect(),
        )
    }

    #[test]
    fn test_flat_grid_is_zero_everywhere() {
        let grid = HeightGrid::flat(16);
        let mut rng = rand::rng();
        for _ in 0..200 {
            let x = rng.random_range(0.0..100.0f32);
            let z = rng.random_range(0.0..100.0f32);
            assert_eq!(grid.height_at(100.0, x, z), 0.0);
        }
    }

    #[test]
    fn test_outside_footprint_is_zero() {
        let grid = sloped(5);
        assert_eq!(grid.height_at(4.0, -0.5, 1.0), 0.0);
        assert_eq!(grid.height_at(4.0, 1.0, -0.01), 0.0);
        assert_eq!(grid.height_at(4.0, 4.0, 1.0), 0.0);
        assert_eq!(grid.height_at(4.0, 1.0, 10.0), 0.0);
    }

    #[test]
    fn test_grid_points_are_exact() {
        let grid = sloped(5);
        // size 4 with 5 samples: one unit per cell
        assert!(approx(grid.height_at(4.0, 0.0, 0.0), 0.0));
        assert!(approx(grid.height_at(4.0, 1.0, 0.0), 1.0));
        assert!(approx(grid.height_at(4.0, 2.0, 3.0), 8.0));
    }

    #[test]
    fn test_planar_grid_interpolates_linearly() {
        let grid = sloped(5);
        let mut rng = rand::rng();
        for _ in 0..200 {
            let x = rng.random_range(0.0..3.99f32);
            let z = rng.random_range(0.0..3.99f32);
            assert!(approx(grid.height_at(4.0, x, z), x + 2.0 * z));
        }
    }

    #[test]
    fn test_triangle_selection_at_diagonal() {
        // Only the far corner of the first cell is raised
        let mut rows = vec![vec![0.0; 3]; 3];
        rows[1][1] = 4.0;
        let grid = HeightGrid::from_rows(rows);

        // Upper-left triangle never sees the far corner
        assert!(approx(grid.height_at(2.0, 0.25, 0.25), 0.0));
        assert!(approx(grid.height_at(2.0, 0.5, 0.5), 0.0));
        // Lower-right triangle does
        assert!(approx(grid.height_at(2.0, 0.75, 0.75), 2.0));
        assert!(approx(grid.height_at(2.0, 0.99, 0.99), 3.92));
    }

    #[test]
    fn test_heightmap_maps_to_range() {
        let config = TerrainConfig::default();
        let black = 0;
        let white = 0xff_ffff;
        let image = TextureData::from_rgb_values(2, 2, &[black, white, white, black]);
        let grid = HeightGrid::from_heightmap(&image, &config);
        assert_eq!(grid.len(), 2);
        assert!(approx(grid.get(0, 0), -40.0));
        // 0xffffff exceeds 255³, so white lands a little above max_height
        let top = -40.0 + 80.0 * (white as f32 / MAX_PIXEL_COLOR);
        assert!(grid.get(0, 1) > 40.0);
        assert!(approx(grid.get(0, 1), top));
        assert!(approx(grid.get(1, 0), top));
        assert_eq!(grid.get(5, 0), 0.0);
    }

    #[test]
    fn test_mesh_layout() {
        let grid = HeightGrid::flat(3);
        let shape = grid.to_shape(10.0);
        assert_eq!(shape.vertex_count(), 9);
        assert_eq!(shape.triangle_count(), 8);
        assert!(shape.is_consistent());
        assert_eq!(&shape.indices[..6], &[0, 3, 1, 1, 3, 4]);
        assert_eq!(shape.position(8), Vector3::new(10.0, 0.0, 10.0));
        assert_eq!(shape.tex_coord(5), Vector2::new(1.0, 0.5));
        assert_eq!(shape.normal(4), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_terrain_placement_and_lookup() {
        let mut device = HeadlessDevice::new();
        let terrain = Terrain::new(&mut device, 1, 0, sloped(5), TerrainTexturesPack::default(), 4.0);
        assert_eq!(terrain.origin, Vector3::new(4.0, 0.0, 0.0));
        assert!(terrain.contains(5.0, 1.0));
        assert!(!terrain.contains(3.0, 1.0));
        assert!(approx(terrain.height_at(5.0, 1.0), 3.0));

        let tiles = vec![terrain];
        assert!(approx(tiles.as_slice().height_at(6.0, 1.0), 4.0));
        assert_eq!(tiles.as_slice().height_at(-6.0, 1.0), 0.0);

        tiles[0].dispose(&mut device);
        assert_eq!(device.live_models(), 0);
    }

    #[test]
    fn test_texture_pack_binds_loaded_units() {
        let mut device = HeadlessDevice::new().with_missing_texture("textures/mud.png");
        let pack = TerrainTexturesPack::load(&mut device);
        assert!(pack.mud.is_none());
        pack.bind(&mut device);
        let units: Vec<u32> = device
            .commands()
            .iter()
            .filter_map(|c| match c {
                crate::gfx::headless::RenderCommand::BindTexture { unit, .. } => Some(*unit),
                _ => None,
            })
            .collect();
        assert_eq!(units, vec![0, 2, 3, 4]);
    }
}
