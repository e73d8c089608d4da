//! # Shapes
//!
//! A [`Shape`] is a fully resolved polygon group ready for upload: flat,
//! index-parallel position/texture/normal arrays plus a triangle index array.
//!
//! [`ShapeBuilder`] produces one shape per `(group, material)` partition of an
//! [`ObjDocument`]. Vertices are not shared between corners: every face corner
//! emits its own vertex and the index array is simply `0..n`.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use cgmath::{InnerSpace, Vector2, Vector3, Zero};

use super::face::PolygonalFace;
use super::material::{ExternalMaterial, MaterialLibrary};
use super::obj::ObjDocument;

/// Interleaved vertex layout used when a shape is uploaded to the device.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

/// A renderable polygon group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    /// Three floats per vertex
    pub positions: Vec<f32>,
    /// Two floats per vertex
    pub tex_coords: Vec<f32>,
    /// Three floats per vertex
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    pub group_name: String,
    pub material: Option<Arc<ExternalMaterial>>,
}

impl Shape {
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            ..Default::default()
        }
    }

    pub fn with_material(mut self, material: Option<Arc<ExternalMaterial>>) -> Self {
        self.material = material;
        self
    }

    /// Appends one vertex and returns its index.
    pub fn push_vertex(
        &mut self,
        position: Vector3<f32>,
        tex_coords: Vector2<f32>,
        normal: Vector3<f32>,
    ) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions.extend_from_slice(&[position.x, position.y, position.z]);
        self.tex_coords.extend_from_slice(&[tex_coords.x, tex_coords.y]);
        self.normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
        index
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, index: usize) -> Vector3<f32> {
        let p = &self.positions[index * 3..index * 3 + 3];
        Vector3::new(p[0], p[1], p[2])
    }

    pub fn tex_coord(&self, index: usize) -> Vector2<f32> {
        let t = &self.tex_coords[index * 2..index * 2 + 2];
        Vector2::new(t[0], t[1])
    }

    pub fn normal(&self, index: usize) -> Vector3<f32> {
        let n = &self.normals[index * 3..index * 3 + 3];
        Vector3::new(n[0], n[1], n[2])
    }

    /// Checks that the arrays are index-parallel and every index is in range.
    pub fn is_consistent(&self) -> bool {
        let n = self.vertex_count();
        self.positions.len() == n * 3
            && self.tex_coords.len() == n * 2
            && self.normals.len() == n * 3
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }

    /// Vertices in the interleaved upload layout.
    pub fn interleaved(&self) -> Vec<ModelVertex> {
        (0..self.vertex_count())
            .map(|i| ModelVertex {
                position: self.position(i).into(),
                tex_coords: self.tex_coord(i).into(),
                normal: self.normal(i).into(),
            })
            .collect()
    }
}

/// Options applied while resolving faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjOptions {
    /// Store `1 - v` instead of `v`, for textures with a bottom-left origin
    pub flip_texture_v: bool,
}

impl ObjOptions {
    pub fn with_flip_texture_v(mut self, flip: bool) -> Self {
        self.flip_texture_v = flip;
        self
    }
}

/// Resolves parsed faces into shapes.
pub struct ShapeBuilder {
    options: ObjOptions,
}

impl ShapeBuilder {
    pub fn new(options: ObjOptions) -> Self {
        Self { options }
    }

    /// Builds one shape per `(group, material)` pair in order of first
    /// appearance. Faces naming a material absent from `materials` produce a
    /// shape without material.
    pub fn build(&self, document: &ObjDocument, materials: &MaterialLibrary) -> Vec<Shape> {
        partition(&document.faces)
            .into_iter()
            .map(|(key, corners)| {
                let material = key
                    .material
                    .as_deref()
                    .and_then(|name| materials.get(name))
                    .cloned();
                let mut shape = Shape::new(&*key.group).with_material(material);
                for triangle in corners.chunks_exact(3) {
                    self.emit_triangle(document, triangle, &mut shape);
                }
                shape
            })
            .collect()
    }

    fn emit_triangle(&self, document: &ObjDocument, triangle: &[&PolygonalFace], shape: &mut Shape) {
        let positions: Vec<Vector3<f32>> = triangle
            .iter()
            .map(|corner| document.positions[corner.vertex_index])
            .collect();
        let face_normal = flat_normal(&positions);

        for (corner, position) in triangle.iter().zip(positions) {
            let mut uv = corner
                .texture_index
                .map(|i| document.tex_coords[i])
                .unwrap_or_else(Vector2::zero);
            if self.options.flip_texture_v {
                uv.y = 1.0 - uv.y;
            }
            let normal = corner
                .normal_index
                .map(|i| document.normals[i])
                .unwrap_or(face_normal);

            let index = shape.push_vertex(position, uv, normal);
            shape.indices.push(index);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PartitionKey {
    group: Rc<str>,
    material: Option<Rc<str>>,
}

/// Groups corners by `(group, material)`, keeping first-appearance order.
fn partition(faces: &[PolygonalFace]) -> Vec<(PartitionKey, Vec<&PolygonalFace>)> {
    let mut slots: HashMap<PartitionKey, usize> = HashMap::new();
    let mut partitions: Vec<(PartitionKey, Vec<&PolygonalFace>)> = Vec::new();

    for face in faces {
        let key = PartitionKey {
            group: Rc::clone(&face.group_name),
            material: face.material_name.clone(),
        };
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            partitions.push((key, Vec::new()));
            partitions.len() - 1
        });
        partitions[slot].1.push(face);
    }
    partitions
}

fn flat_normal(triangle: &[Vector3<f32>]) -> Vector3<f32> {
    let normal = (triangle[1] - triangle[0]).cross(triangle[2] - triangle[0]);
    if normal.magnitude2() > 0.0 {
        normal.normalize()
    } else {
        Vector3::unit_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wavefront::obj::GeometryParser;

    fn build(obj: &str, options: ObjOptions) -> Vec<Shape> {
        let doc = GeometryParser::new("test.obj").parse_str(obj).unwrap();
        ShapeBuilder::new(options).build(&doc, &MaterialLibrary::new())
    }

    #[test]
    fn test_single_triangle_is_verbatim() {
        let shapes = build(
            "v 1 2 3\nvt 0.25 0.75\nvn 0 0 1\nf 1/1/1 1/1/1 1/1/1\n",
            ObjOptions::default(),
        );
        assert_eq!(shapes.len(), 1);
        let shape = &shapes[0];
        assert_eq!(shape.indices, vec![0, 1, 2]);
        for i in 0..3 {
            assert_eq!(shape.position(i), Vector3::new(1.0, 2.0, 3.0));
            assert_eq!(shape.tex_coord(i), Vector2::new(0.25, 0.75));
            assert_eq!(shape.normal(i), Vector3::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_corner_order_is_kept() {
        let shapes = build(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 1\nf 1/1/1 2/2/1 3/3/1\n",
            ObjOptions::default(),
        );
        let shape = &shapes[0];
        assert_eq!(shape.position(0), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(shape.position(1), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(shape.position(2), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(shape.tex_coord(1), Vector2::new(1.0, 0.0));
    }

    #[test]
    fn test_quad_emits_two_triangles_without_sharing() {
        let shapes = build("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n", ObjOptions::default());
        let shape = &shapes[0];
        assert_eq!(shape.vertex_count(), 6);
        assert_eq!(shape.indices, vec![0, 1, 2, 3, 4, 5]);
        // (1,2,3) and (1,3,4) in source numbering
        assert_eq!(shape.position(3), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(shape.position(4), Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(shape.position(5), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_missing_normals_use_face_normal() {
        let shapes = build("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n", ObjOptions::default());
        let shape = &shapes[0];
        assert_eq!(shape.normal(0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(shape.tex_coord(0), Vector2::new(0.0, 0.0));
    }

    #[test]
    fn test_flip_texture_v() {
        let shapes = build(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.5 0.25\nf 1/1 2/1 3/1\n",
            ObjOptions::default().with_flip_texture_v(true),
        );
        assert_eq!(shapes[0].tex_coord(0), Vector2::new(0.5, 0.75));
    }

    #[test]
    fn test_partitions_by_group_and_material() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
                   g a\nusemtl red\nf 1 2 3\n\
                   usemtl blue\nf 1 2 3\n\
                   g b\nf 1 2 3\n\
                   g a\nusemtl red\nf 1 2 3 \n";
        let doc = GeometryParser::new("test.obj").parse_str(obj).unwrap();
        let mut materials = MaterialLibrary::new();
        materials.insert("red".into(), Arc::new(ExternalMaterial::new("red")));

        let shapes = ShapeBuilder::new(ObjOptions::default()).build(&doc, &materials);
        let keys: Vec<(&str, Option<&str>)> = shapes
            .iter()
            .map(|s| (s.group_name.as_str(), s.material.as_ref().map(|m| m.name.as_str())))
            .collect();
        // "blue" is not in the library, so those shapes carry no material
        assert_eq!(keys, vec![("a", Some("red")), ("a", None), ("b", None)]);
        assert_eq!(shapes[0].triangle_count(), 2);
        assert_eq!(shapes[1].triangle_count(), 1);
        assert_eq!(shapes[2].triangle_count(), 1);
    }

    #[test]
    fn test_random_meshes_stay_consistent() {
        use rand::Rng;
        let mut rng = rand::rng();

        for _ in 0..20 {
            let mut obj = String::new();
            let vertices = rng.random_range(3..30);
            for _ in 0..vertices {
                obj.push_str(&format!(
                    "v {} {} {}\nvt {} {}\nvn 0 1 0\n",
                    rng.random_range(-10.0..10.0f32),
                    rng.random_range(-10.0..10.0f32),
                    rng.random_range(-10.0..10.0f32),
                    rng.random::<f32>(),
                    rng.random::<f32>()
                ));
            }
            for f in 0..rng.random_range(1..20) {
                if f % 4 == 0 {
                    obj.push_str(&format!("g part{}\n", f % 3));
                }
                let corners = rng.random_range(3..7);
                obj.push('f');
                for _ in 0..corners {
                    let i = rng.random_range(1..=vertices);
                    obj.push_str(&format!(" {i}/{i}/{i}"));
                }
                obj.push('\n');
            }

            for shape in build(&obj, ObjOptions::default()) {
                assert!(shape.is_consistent());
                assert_eq!(shape.interleaved().len(), shape.vertex_count());
            }
        }
    }
}
