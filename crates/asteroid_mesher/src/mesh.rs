//! Mesh buffers and per-chunk mesh resources.
//!
//! [`MeshBuffers`] is the scratch storage the mesher writes into. It is
//! cleared, not reallocated, between chunk builds. [`MeshResource`] is the
//! uploaded artifact a chunk owns; uploading rewrites it in place.

use bytemuck::{Pod, Zeroable};
use glam::{UVec3, Vec3};

use crate::core::MAX_U16_VERTICES;

/// Initial vertex capacity of the scratch buffers.
pub const SCRATCH_VERTEX_CAPACITY: usize = 2048;
/// Initial index capacity of the scratch buffers.
pub const SCRATCH_INDEX_CAPACITY: usize = 4096;

/// 8-bit RGBA vertex colour.
///
/// The mesher packs `(material_id, ore_grade, 0, ambient_occlusion)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Axis-aligned bounding box in chunk-local space.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Aabb {
    pub center: Vec3,
    pub extents: Vec3,
}

impl Aabb {
    /// Bounds covering a whole chunk, from its origin corner.
    pub fn for_chunk(voxels_per_chunk: UVec3, voxel_size: f32) -> Self {
        let size = voxels_per_chunk.as_vec3() * voxel_size;
        Self {
            center: size * 0.5,
            extents: size * 0.5,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }
}

/// Scratch vertex/index storage filled by the mesher.
#[derive(Clone, Debug)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<Color32>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self {
            positions: Vec::with_capacity(SCRATCH_VERTEX_CAPACITY),
            normals: Vec::with_capacity(SCRATCH_VERTEX_CAPACITY),
            uvs: Vec::with_capacity(SCRATCH_VERTEX_CAPACITY),
            colors: Vec::with_capacity(SCRATCH_VERTEX_CAPACITY),
            indices: Vec::with_capacity(SCRATCH_INDEX_CAPACITY),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Clear all buffers, keeping their allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.colors.clear();
        self.indices.clear();
    }
}

impl Default for MeshBuffers {
    fn default() -> Self {
        Self::new()
    }
}

/// Width of the index buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IndexFormat {
    #[default]
    U16,
    U32,
}

impl IndexFormat {
    /// Narrowest format that can address `vertex_count` vertices.
    pub fn for_vertex_count(vertex_count: usize) -> Self {
        if vertex_count > MAX_U16_VERTICES {
            IndexFormat::U32
        } else {
            IndexFormat::U16
        }
    }
}

/// Index storage in the chosen format.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshIndices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl MeshIndices {
    pub fn format(&self) -> IndexFormat {
        match self {
            MeshIndices::U16(_) => IndexFormat::U16,
            MeshIndices::U32(_) => IndexFormat::U32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MeshIndices::U16(v) => v.len(),
            MeshIndices::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at position `i`, widened to u32.
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            MeshIndices::U16(v) => v.get(i).map(|&idx| idx as u32),
            MeshIndices::U32(v) => v.get(i).copied(),
        }
    }

    /// Raw bytes for a GPU index buffer.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MeshIndices::U16(v) => bytemuck::cast_slice(v),
            MeshIndices::U32(v) => bytemuck::cast_slice(v),
        }
    }

    /// Replace contents with `src`, converting into this variant's width.
    fn assign(&mut self, format: IndexFormat, src: &[u32]) {
        if self.format() != format {
            *self = match format {
                IndexFormat::U16 => MeshIndices::U16(Vec::with_capacity(src.len())),
                IndexFormat::U32 => MeshIndices::U32(Vec::with_capacity(src.len())),
            };
        }
        match self {
            MeshIndices::U16(v) => {
                v.clear();
                v.extend(src.iter().map(|&i| i as u16));
            }
            MeshIndices::U32(v) => {
                v.clear();
                v.extend_from_slice(src);
            }
        }
    }
}

impl Default for MeshIndices {
    fn default() -> Self {
        MeshIndices::U16(Vec::new())
    }
}

/// Handle to a render material resolved by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

/// Renderable mesh owned by exactly one chunk.
///
/// Uploads overwrite the existing storage instead of creating a new mesh.
#[derive(Clone, Debug, Default)]
pub struct MeshResource {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    colors: Vec<Color32>,
    indices: MeshIndices,
    bounds: Aabb,
    material: Option<MaterialHandle>,
    upload_count: u32,
}

impl MeshResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy scratch buffers into this mesh, choosing the index width from
    /// the vertex count.
    pub fn upload(&mut self, buffers: &MeshBuffers, bounds: Aabb, material: MaterialHandle) {
        self.positions.clear();
        self.positions.extend_from_slice(&buffers.positions);
        self.normals.clear();
        self.normals.extend_from_slice(&buffers.normals);
        self.uvs.clear();
        self.uvs.extend_from_slice(&buffers.uvs);
        self.colors.clear();
        self.colors.extend_from_slice(&buffers.colors);

        let format = IndexFormat::for_vertex_count(buffers.vertex_count());
        self.indices.assign(format, &buffers.indices);

        self.bounds = bounds;
        self.material = Some(material);
        self.upload_count += 1;
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn colors(&self) -> &[Color32] {
        &self.colors
    }

    pub fn indices(&self) -> &MeshIndices {
        &self.indices
    }

    pub fn index_format(&self) -> IndexFormat {
        self.indices.format()
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn material(&self) -> Option<MaterialHandle> {
        self.material
    }

    /// How many times this mesh has been rewritten.
    pub fn upload_count(&self) -> u32 {
        self.upload_count
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Raw position bytes for a GPU vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw colour bytes for a GPU vertex buffer.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn index_bytes(&self) -> &[u8] {
        self.indices.as_bytes()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.positions.len() * 12
            + self.normals.len() * 12
            + self.uvs.len() * 8
            + self.colors.len() * 4
            + self.indices.as_bytes().len()
    }
}
