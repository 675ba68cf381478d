//! Core type definitions for the asteroid chunk mesher.

use bytemuck::{Pod, Zeroable};
use glam::IVec3;

/// Material identifier stored per voxel.
pub type MaterialId = u8;

/// Number of ore-grade bins used when comparing faces for merging.
pub const ORE_GRADE_BINS: u32 = 7;

/// Vertex count above which a mesh needs 32-bit indices.
pub const MAX_U16_VERTICES: usize = 65535;

/// Identifier of the terrain volume (asteroid) a chunk belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VolumeId(pub u32);

/// Chunk coordinate in chunk-space (not world-space).
///
/// Coordinates can be negative; a volume's chunks extend in every direction
/// from its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Origin chunk at (0, 0, 0).
    pub const ZERO: ChunkCoord = ChunkCoord { x: 0, y: 0, z: 0 };

    /// Create a new chunk coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Get the 6 face-adjacent neighbors.
    ///
    /// Returns neighbors in order: +X, -X, +Y, -Y, +Z, -Z
    pub fn neighbors(&self) -> [ChunkCoord; 6] {
        [
            ChunkCoord { x: self.x + 1, y: self.y, z: self.z },
            ChunkCoord { x: self.x - 1, y: self.y, z: self.z },
            ChunkCoord { x: self.x, y: self.y + 1, z: self.z },
            ChunkCoord { x: self.x, y: self.y - 1, z: self.z },
            ChunkCoord { x: self.x, y: self.y, z: self.z + 1 },
            ChunkCoord { x: self.x, y: self.y, z: self.z - 1 },
        ]
    }

    /// Offset this coordinate by a chunk-space delta.
    pub fn offset(&self, delta: IVec3) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.z + delta.z)
    }

    pub fn as_ivec3(&self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }
}

impl From<IVec3> for ChunkCoord {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Stable identity of a chunk: the owning volume plus its coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkKey {
    pub volume: VolumeId,
    pub coord: ChunkCoord,
}

impl ChunkKey {
    pub const fn new(volume: VolumeId, coord: ChunkCoord) -> Self {
        Self { volume, coord }
    }

    /// The 6 face-adjacent chunk keys in the same volume.
    pub fn neighbors(&self) -> [ChunkKey; 6] {
        self.coord.neighbors().map(|coord| ChunkKey::new(self.volume, coord))
    }
}

/// A single voxel sample.
///
/// Layout is plain bytes so dense grids can be handed around with
/// `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Voxel {
    /// Non-zero when the voxel is occupied.
    pub solid_mask: u8,
    pub material_id: MaterialId,
    /// Ore concentration, 0-255.
    pub ore_grade: u8,
}

impl Voxel {
    /// Empty (non-solid) voxel.
    pub const EMPTY: Voxel = Voxel { solid_mask: 0, material_id: 0, ore_grade: 0 };

    /// Create a solid voxel.
    pub const fn solid(material_id: MaterialId, ore_grade: u8) -> Self {
        Self { solid_mask: 1, material_id, ore_grade }
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.solid_mask != 0
    }
}

/// Quantize an ore grade into one of 8 bins, mapped back onto 0-255.
///
/// Neighbouring voxels with near-identical grades land in the same bin and
/// can therefore share a merged quad.
#[inline]
pub fn quantize_ore_grade(ore_grade: u8) -> u8 {
    let bin = (ore_grade as u32 * ORE_GRADE_BINS + 127) / 255;
    (bin * 255 / ORE_GRADE_BINS).min(255) as u8
}

/// The six axis-aligned face directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceDirection {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl FaceDirection {
    /// All directions in meshing order.
    pub const ALL: [FaceDirection; 6] = [
        FaceDirection::PosX,
        FaceDirection::NegX,
        FaceDirection::PosY,
        FaceDirection::NegY,
        FaceDirection::PosZ,
        FaceDirection::NegZ,
    ];

    /// Outward unit normal in voxel space.
    pub fn normal(self) -> IVec3 {
        match self {
            FaceDirection::PosX => IVec3::X,
            FaceDirection::NegX => IVec3::NEG_X,
            FaceDirection::PosY => IVec3::Y,
            FaceDirection::NegY => IVec3::NEG_Y,
            FaceDirection::PosZ => IVec3::Z,
            FaceDirection::NegZ => IVec3::NEG_Z,
        }
    }

    /// Whether the normal points along the positive axis.
    pub fn is_positive(self) -> bool {
        matches!(self, FaceDirection::PosX | FaceDirection::PosY | FaceDirection::PosZ)
    }

    /// Slice basis `(u, v, w)` as axis indices (0 = X, 1 = Y, 2 = Z).
    ///
    /// `w` is the axis the face normal lies on; greedy merging grows
    /// width along `u` and height along `v`.
    pub fn basis(self) -> (usize, usize, usize) {
        match self {
            FaceDirection::PosX | FaceDirection::NegX => (1, 2, 0),
            FaceDirection::PosY | FaceDirection::NegY => (0, 2, 1),
            FaceDirection::PosZ | FaceDirection::NegZ => (0, 1, 2),
        }
    }

    /// Float normal for vertex output.
    pub fn normal_f32(self) -> [f32; 3] {
        self.normal().as_vec3().to_array()
    }
}
