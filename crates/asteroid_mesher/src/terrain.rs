//! Voxel access and the in-memory terrain store.
//!
//! The mesher never owns voxel data. It reads voxels through
//! [`VoxelAccessor`] and discovers chunks through [`TerrainSource`].
//! [`TerrainWorld`] is a plain implementation of both for hosts that keep
//! their asteroids in memory (and for tests).

use std::collections::HashMap;

use glam::{IVec3, UVec3, Vec3};

use crate::core::{ChunkCoord, ChunkKey, Voxel, VolumeId};
use crate::error::{MesherError, Result};

/// Samples voxels, resolving coordinates that fall outside a chunk into
/// its neighbours.
pub trait VoxelAccessor {
    /// Voxel at `local` inside `chunk`, or `None` if the owning chunk or the
    /// volume's config does not exist.
    ///
    /// `local` may lie outside `[0, voxels_per_chunk)`; the lookup then
    /// continues in the neighbouring chunk.
    fn sample(&self, volume: VolumeId, chunk: ChunkCoord, local: IVec3) -> Option<Voxel>;

    /// Sample the voxel at `local + offset`.
    fn sample_neighbor(
        &self,
        volume: VolumeId,
        chunk: ChunkCoord,
        local: IVec3,
        offset: IVec3,
    ) -> Option<Voxel> {
        self.sample(volume, chunk, local + offset)
    }

    /// Whether the voxel exists and is solid. Missing voxels count as empty.
    fn is_solid(&self, volume: VolumeId, chunk: ChunkCoord, local: IVec3) -> bool {
        self.sample(volume, chunk, local).is_some_and(|v| v.is_solid())
    }
}

/// Snapshot of a live chunk as the mesher sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkInfo {
    pub key: ChunkKey,
    pub voxels_per_chunk: UVec3,
    /// Edit counter maintained by terrain editors; `None` means never edited.
    pub edit_version: Option<u32>,
    /// World-space position of the chunk's minimum corner.
    pub world_origin: Vec3,
}

impl ChunkInfo {
    /// Edit version, treating an absent counter as 0.
    pub fn version(&self) -> u32 {
        self.edit_version.unwrap_or(0)
    }

    /// Squared distance from the chunk's position to `focus`.
    pub fn distance_squared_to(&self, focus: Vec3) -> f32 {
        self.world_origin.distance_squared(focus)
    }
}

/// The set of chunks that currently exist, plus voxel access.
pub trait TerrainSource: VoxelAccessor {
    /// Uniform voxel edge length in world units.
    fn voxel_size(&self) -> f32;

    /// Every chunk that currently exists and can be meshed.
    fn live_chunks(&self) -> Vec<ChunkInfo>;

    /// Look up one chunk.
    fn chunk(&self, key: ChunkKey) -> Option<ChunkInfo>;
}

/// Per-volume layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeConfig {
    pub voxels_per_chunk: UVec3,
    /// World position of chunk (0, 0, 0)'s minimum corner.
    pub origin: Vec3,
}

impl VolumeConfig {
    pub fn new(voxels_per_chunk: UVec3) -> Self {
        Self {
            voxels_per_chunk,
            origin: Vec3::ZERO,
        }
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    /// Total voxels in one chunk.
    pub fn voxel_count(&self) -> usize {
        let d = self.voxels_per_chunk;
        d.x as usize * d.y as usize * d.z as usize
    }
}

/// Dense voxel grid of one chunk.
#[derive(Clone, Debug)]
pub struct TerrainChunk {
    dims: UVec3,
    voxels: Vec<Voxel>,
    edit_version: Option<u32>,
}

impl TerrainChunk {
    /// Create an empty chunk.
    pub fn new(dims: UVec3) -> Self {
        let count = dims.x as usize * dims.y as usize * dims.z as usize;
        Self {
            dims,
            voxels: vec![Voxel::EMPTY; count],
            edit_version: None,
        }
    }

    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    pub fn edit_version(&self) -> Option<u32> {
        self.edit_version
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    #[inline]
    fn index(&self, local: IVec3) -> Option<usize> {
        if local.cmplt(IVec3::ZERO).any() || local.as_uvec3().cmpge(self.dims).any() {
            return None;
        }
        let (dx, dy) = (self.dims.x as usize, self.dims.y as usize);
        Some(local.x as usize + dx * (local.y as usize + dy * local.z as usize))
    }

    /// Voxel at local coordinates, `None` when out of bounds.
    pub fn get(&self, local: IVec3) -> Option<Voxel> {
        self.index(local).map(|i| self.voxels[i])
    }

    /// Write a voxel without touching the edit version.
    fn set_raw(&mut self, local: IVec3, voxel: Voxel) -> bool {
        match self.index(local) {
            Some(i) => {
                self.voxels[i] = voxel;
                true
            }
            None => false,
        }
    }

    /// Increment the edit version (an absent counter starts at 0).
    pub fn bump_version(&mut self) -> u32 {
        let next = self.edit_version.unwrap_or(0).wrapping_add(1);
        self.edit_version = Some(next);
        next
    }

    /// Overwrite the edit version.
    pub fn set_edit_version(&mut self, version: Option<u32>) {
        self.edit_version = version;
    }

    /// Faces of the chunk that `local` touches, as chunk-space offsets.
    fn boundary_offsets(&self, local: IVec3) -> Vec<IVec3> {
        let max = self.dims.as_ivec3() - IVec3::ONE;
        let mut offsets = Vec::new();
        for axis in 0..3 {
            let mut delta = IVec3::ZERO;
            if local[axis] == 0 {
                delta[axis] = -1;
                offsets.push(delta);
            }
            if local[axis] == max[axis] {
                let mut delta = IVec3::ZERO;
                delta[axis] = 1;
                offsets.push(delta);
            }
        }
        offsets
    }
}

/// In-memory terrain: volumes, their chunks and a global voxel size.
#[derive(Clone, Debug)]
pub struct TerrainWorld {
    voxel_size: f32,
    volumes: HashMap<VolumeId, VolumeConfig>,
    chunks: HashMap<ChunkKey, TerrainChunk>,
}

impl TerrainWorld {
    /// Create an empty world.
    pub fn new(voxel_size: f32) -> Result<Self> {
        if !(voxel_size > 0.0) || !voxel_size.is_finite() {
            return Err(MesherError::InvalidVoxelSize(voxel_size));
        }
        Ok(Self {
            voxel_size,
            volumes: HashMap::new(),
            chunks: HashMap::new(),
        })
    }

    /// Register (or replace) a volume's layout.
    pub fn insert_volume(&mut self, id: VolumeId, config: VolumeConfig) {
        self.volumes.insert(id, config);
    }

    /// Drop a volume's config. Its chunks stay but stop being live.
    pub fn remove_volume_config(&mut self, id: VolumeId) -> Option<VolumeConfig> {
        self.volumes.remove(&id)
    }

    pub fn volume(&self, id: VolumeId) -> Option<&VolumeConfig> {
        self.volumes.get(&id)
    }

    /// Stream a chunk in, empty. Returns `None` if the volume is unknown.
    pub fn insert_chunk(&mut self, key: ChunkKey) -> Option<&mut TerrainChunk> {
        let dims = self.volumes.get(&key.volume)?.voxels_per_chunk;
        Some(self.chunks.entry(key).or_insert_with(|| TerrainChunk::new(dims)))
    }

    /// Stream a chunk out.
    pub fn remove_chunk(&mut self, key: ChunkKey) -> Option<TerrainChunk> {
        self.chunks.remove(&key)
    }

    pub fn get_chunk(&self, key: ChunkKey) -> Option<&TerrainChunk> {
        self.chunks.get(&key)
    }

    pub fn get_chunk_mut(&mut self, key: ChunkKey) -> Option<&mut TerrainChunk> {
        self.chunks.get_mut(&key)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Set every voxel of a chunk, bumping its edit version once.
    pub fn fill(&mut self, key: ChunkKey, voxel: Voxel) -> bool {
        let Some(chunk) = self.chunks.get_mut(&key) else {
            return false;
        };
        chunk.voxels.fill(voxel);
        chunk.bump_version();
        true
    }

    /// Set every voxel for which `f` returns `Some`, bumping the edit
    /// version once.
    pub fn fill_with(&mut self, key: ChunkKey, mut f: impl FnMut(IVec3) -> Option<Voxel>) -> bool {
        let Some(chunk) = self.chunks.get_mut(&key) else {
            return false;
        };
        let d = chunk.dims.as_ivec3();
        for z in 0..d.z {
            for y in 0..d.y {
                for x in 0..d.x {
                    let local = IVec3::new(x, y, z);
                    if let Some(voxel) = f(local) {
                        chunk.set_raw(local, voxel);
                    }
                }
            }
        }
        chunk.bump_version();
        true
    }

    /// Edit a single voxel.
    ///
    /// Bumps the chunk's edit version. A voxel on a chunk face can change
    /// which faces the adjacent chunk exposes, so each existing neighbour
    /// across a touched face is bumped too.
    pub fn set_voxel(&mut self, key: ChunkKey, local: IVec3, voxel: Voxel) -> bool {
        let Some(chunk) = self.chunks.get_mut(&key) else {
            return false;
        };
        if !chunk.set_raw(local, voxel) {
            return false;
        }
        chunk.bump_version();

        for offset in chunk.boundary_offsets(local) {
            let neighbor = ChunkKey::new(key.volume, key.coord.offset(offset));
            if let Some(n) = self.chunks.get_mut(&neighbor) {
                n.bump_version();
            }
        }
        true
    }

    /// Sample the voxel containing a world position inside a volume.
    pub fn sample_world(&self, volume: VolumeId, position: Vec3) -> Option<Voxel> {
        let config = self.volumes.get(&volume)?;
        let chunk_size = config.voxels_per_chunk.as_vec3() * self.voxel_size;
        if chunk_size.cmple(Vec3::ZERO).any() {
            return None;
        }
        let local = position - config.origin;
        let chunk = (local / chunk_size).floor();
        let chunk_origin = chunk * chunk_size;
        let voxel = ((local - chunk_origin) / self.voxel_size).floor();
        self.sample(volume, ChunkCoord::from(chunk.as_ivec3()), voxel.as_ivec3())
    }

    fn info(&self, key: ChunkKey, chunk: &TerrainChunk, config: &VolumeConfig) -> ChunkInfo {
        let size = config.voxels_per_chunk.as_vec3() * self.voxel_size;
        ChunkInfo {
            key,
            voxels_per_chunk: chunk.dims,
            edit_version: chunk.edit_version,
            world_origin: config.origin + key.coord.as_ivec3().as_vec3() * size,
        }
    }
}

impl VoxelAccessor for TerrainWorld {
    fn sample(&self, volume: VolumeId, chunk: ChunkCoord, local: IVec3) -> Option<Voxel> {
        let config = self.volumes.get(&volume)?;
        let dims = config.voxels_per_chunk.as_ivec3();
        if dims.cmple(IVec3::ZERO).any() {
            return None;
        }

        let chunk_delta = IVec3::new(
            local.x.div_euclid(dims.x),
            local.y.div_euclid(dims.y),
            local.z.div_euclid(dims.z),
        );
        let wrapped = IVec3::new(
            local.x.rem_euclid(dims.x),
            local.y.rem_euclid(dims.y),
            local.z.rem_euclid(dims.z),
        );

        let key = ChunkKey::new(volume, chunk.offset(chunk_delta));
        self.chunks.get(&key)?.get(wrapped)
    }
}

impl TerrainSource for TerrainWorld {
    fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    fn live_chunks(&self) -> Vec<ChunkInfo> {
        self.chunks
            .iter()
            .filter_map(|(&key, chunk)| {
                let config = self.volumes.get(&key.volume)?;
                Some(self.info(key, chunk, config))
            })
            .collect()
    }

    fn chunk(&self, key: ChunkKey) -> Option<ChunkInfo> {
        let chunk = self.chunks.get(&key)?;
        let config = self.volumes.get(&key.volume)?;
        Some(self.info(key, chunk, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOL: VolumeId = VolumeId(1);

    fn world_with(coords: &[ChunkCoord]) -> TerrainWorld {
        let mut world = TerrainWorld::new(1.0).unwrap();
        world.insert_volume(VOL, VolumeConfig::new(UVec3::splat(4)));
        for &coord in coords {
            world.insert_chunk(ChunkKey::new(VOL, coord)).unwrap();
        }
        world
    }

    #[test]
    fn new_chunk_matches_volume_size() {
        let mut world = world_with(&[]);
        let volume = *world.volume(VOL).unwrap();
        let key = ChunkKey::new(VOL, ChunkCoord::ZERO);

        let chunk = world.insert_chunk(key).unwrap();
        assert_eq!(chunk.voxels().len(), volume.voxel_count());
        assert!(chunk.voxels().iter().all(|&v| v == Voxel::EMPTY));

        world.set_voxel(key, IVec3::new(1, 2, 3), Voxel::solid(2, 0));
        let voxels = world.get_chunk(key).unwrap().voxels();
        assert_eq!(voxels[1 + 4 * (2 + 4 * 3)], Voxel::solid(2, 0));
        assert_eq!(voxels.iter().filter(|&&v| v != Voxel::EMPTY).count(), 1);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn index_of_huge_chunk_does_not_overflow() {
        let chunk = TerrainChunk {
            dims: UVec3::splat(2000),
            voxels: Vec::new(),
            edit_version: None,
        };
        let last = 1999usize + 2000 * (1999 + 2000 * 1999);
        assert_eq!(chunk.index(IVec3::splat(1999)), Some(last));
        assert_eq!(chunk.index(IVec3::new(2000, 0, 0)), None);
        assert_eq!(chunk.index(IVec3::new(0, -1, 0)), None);
    }

    #[test]
    fn rejects_bad_voxel_size() {
        assert!(TerrainWorld::new(0.0).is_err());
        assert!(TerrainWorld::new(-1.0).is_err());
        assert!(TerrainWorld::new(f32::NAN).is_err());
    }

    #[test]
    fn sample_inside_chunk() {
        let mut world = world_with(&[ChunkCoord::ZERO]);
        let key = ChunkKey::new(VOL, ChunkCoord::ZERO);
        world.set_voxel(key, IVec3::new(1, 2, 3), Voxel::solid(5, 40));

        let v = world.sample(VOL, ChunkCoord::ZERO, IVec3::new(1, 2, 3)).unwrap();
        assert_eq!(v, Voxel::solid(5, 40));
        assert!(!world.is_solid(VOL, ChunkCoord::ZERO, IVec3::ZERO));
    }

    #[test]
    fn sample_resolves_into_neighbor() {
        let mut world = world_with(&[ChunkCoord::ZERO, ChunkCoord::new(-1, 0, 0)]);
        let west = ChunkKey::new(VOL, ChunkCoord::new(-1, 0, 0));
        world.set_voxel(west, IVec3::new(3, 0, 0), Voxel::solid(2, 0));

        // x = -1 in chunk 0 is x = 3 in chunk -1
        assert!(world.is_solid(VOL, ChunkCoord::ZERO, IVec3::new(-1, 0, 0)));
        assert!(world
            .sample_neighbor(VOL, ChunkCoord::ZERO, IVec3::ZERO, IVec3::NEG_X)
            .is_some());
    }

    #[test]
    fn sample_missing_neighbor_is_none() {
        let world = world_with(&[ChunkCoord::ZERO]);
        assert!(world.sample(VOL, ChunkCoord::ZERO, IVec3::new(4, 0, 0)).is_none());
        assert!(world.sample(VolumeId(99), ChunkCoord::ZERO, IVec3::ZERO).is_none());
    }

    #[test]
    fn missing_volume_config_hides_chunks() {
        let mut world = world_with(&[ChunkCoord::ZERO]);
        assert_eq!(world.live_chunks().len(), 1);

        world.remove_volume_config(VOL);
        assert!(world.live_chunks().is_empty());
        assert!(world.sample(VOL, ChunkCoord::ZERO, IVec3::ZERO).is_none());
    }

    #[test]
    fn set_voxel_bumps_version() {
        let mut world = world_with(&[ChunkCoord::ZERO]);
        let key = ChunkKey::new(VOL, ChunkCoord::ZERO);
        assert_eq!(world.chunk(key).unwrap().edit_version, None);

        world.set_voxel(key, IVec3::ONE, Voxel::solid(1, 0));
        world.set_voxel(key, IVec3::ONE, Voxel::EMPTY);
        assert_eq!(world.chunk(key).unwrap().version(), 2);
    }

    #[test]
    fn boundary_edit_bumps_neighbor() {
        let mut world = world_with(&[ChunkCoord::ZERO, ChunkCoord::new(1, 0, 0)]);
        let key = ChunkKey::new(VOL, ChunkCoord::ZERO);
        let east = ChunkKey::new(VOL, ChunkCoord::new(1, 0, 0));

        // Interior edit leaves the neighbour alone
        world.set_voxel(key, IVec3::new(1, 1, 1), Voxel::solid(1, 0));
        assert_eq!(world.chunk(east).unwrap().edit_version, None);

        // +X face edit reaches across
        world.set_voxel(key, IVec3::new(3, 1, 1), Voxel::solid(1, 0));
        assert_eq!(world.chunk(east).unwrap().version(), 1);
    }

    #[test]
    fn out_of_bounds_edit_is_rejected() {
        let mut world = world_with(&[ChunkCoord::ZERO]);
        let key = ChunkKey::new(VOL, ChunkCoord::ZERO);
        assert!(!world.set_voxel(key, IVec3::new(4, 0, 0), Voxel::solid(1, 0)));
        assert_eq!(world.chunk(key).unwrap().edit_version, None);
    }

    #[test]
    fn world_origin_uses_volume_origin() {
        let mut world = TerrainWorld::new(0.5).unwrap();
        world.insert_volume(VOL, VolumeConfig::new(UVec3::splat(4)).with_origin(Vec3::new(10.0, 0.0, 0.0)));
        let key = ChunkKey::new(VOL, ChunkCoord::new(2, -1, 0));
        world.insert_chunk(key);

        let info = world.chunk(key).unwrap();
        assert_eq!(info.world_origin, Vec3::new(14.0, -2.0, 0.0));
    }

    #[test]
    fn sample_world_position() {
        let mut world = world_with(&[ChunkCoord::ZERO, ChunkCoord::new(-1, 0, 0)]);
        let west = ChunkKey::new(VOL, ChunkCoord::new(-1, 0, 0));
        world.set_voxel(west, IVec3::new(3, 2, 1), Voxel::solid(8, 0));

        let v = world.sample_world(VOL, Vec3::new(-0.5, 2.5, 1.2)).unwrap();
        assert_eq!(v.material_id, 8);
        assert!(world.sample_world(VOL, Vec3::new(100.0, 0.0, 0.0)).is_none());
    }
}
