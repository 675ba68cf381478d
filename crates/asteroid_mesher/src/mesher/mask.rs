//! 2D face mask for one slice of a chunk.

use crate::core::{quantize_ore_grade, MaterialId, Voxel};

/// One texel of a slice mask: the exposed face of a single voxel, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FaceCell {
    pub exists: bool,
    pub material_id: MaterialId,
    /// Ore grade after quantization.
    pub ore_grade: u8,
}

impl FaceCell {
    pub const EMPTY: FaceCell = FaceCell { exists: false, material_id: 0, ore_grade: 0 };

    /// Cell for an exposed face of `voxel`.
    pub fn exposed(voxel: Voxel) -> Self {
        Self {
            exists: true,
            material_id: voxel.material_id,
            ore_grade: quantize_ore_grade(voxel.ore_grade),
        }
    }

    /// Whether `other` can join a quad started by `self`.
    #[inline]
    pub fn can_merge(&self, other: &FaceCell) -> bool {
        other.exists && self.material_id == other.material_id && self.ore_grade == other.ore_grade
    }
}

/// Cells plus "already covered by a quad" flags for a `u_dim × v_dim` slice.
///
/// Storage is kept between slices and chunks; [`reset`](SliceMask::reset)
/// only grows it.
#[derive(Clone, Debug, Default)]
pub struct SliceMask {
    u_dim: usize,
    v_dim: usize,
    cells: Vec<FaceCell>,
    used: Vec<bool>,
}

impl SliceMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize to `u_dim × v_dim` and clear every cell.
    pub fn reset(&mut self, u_dim: usize, v_dim: usize) {
        let len = u_dim * v_dim;
        self.u_dim = u_dim;
        self.v_dim = v_dim;
        self.cells.clear();
        self.cells.resize(len, FaceCell::EMPTY);
        self.used.clear();
        self.used.resize(len, false);
    }

    pub fn u_dim(&self) -> usize {
        self.u_dim
    }

    pub fn v_dim(&self) -> usize {
        self.v_dim
    }

    #[inline]
    fn index(&self, u: usize, v: usize) -> usize {
        debug_assert!(u < self.u_dim && v < self.v_dim, "mask coordinates out of bounds");
        u + v * self.u_dim
    }

    #[inline]
    pub fn get(&self, u: usize, v: usize) -> FaceCell {
        self.cells[self.index(u, v)]
    }

    #[inline]
    pub fn set(&mut self, u: usize, v: usize, cell: FaceCell) {
        let i = self.index(u, v);
        self.cells[i] = cell;
    }

    #[inline]
    pub fn is_used(&self, u: usize, v: usize) -> bool {
        self.used[self.index(u, v)]
    }

    /// Mark a `width × height` rectangle as covered.
    pub fn mark_used(&mut self, u: usize, v: usize, width: usize, height: usize) {
        for dv in 0..height {
            let row = self.index(u, v + dv);
            self.used[row..row + width].fill(true);
        }
    }

    /// Number of exposed faces in the mask.
    pub fn exposed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.exists).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposed_cell_quantizes_grade() {
        let cell = FaceCell::exposed(Voxel::solid(3, 14));
        assert!(cell.exists);
        assert_eq!(cell.material_id, 3);
        assert_eq!(cell.ore_grade, quantize_ore_grade(14));
    }

    #[test]
    fn merge_predicate() {
        let a = FaceCell::exposed(Voxel::solid(1, 10));
        assert!(a.can_merge(&FaceCell::exposed(Voxel::solid(1, 14))));
        assert!(!a.can_merge(&FaceCell::exposed(Voxel::solid(1, 200))));
        assert!(!a.can_merge(&FaceCell::exposed(Voxel::solid(2, 10))));
        assert!(!a.can_merge(&FaceCell::EMPTY));
    }

    #[test]
    fn reset_clears_cells_and_flags() {
        let mut mask = SliceMask::new();
        mask.reset(3, 2);
        mask.set(2, 1, FaceCell::exposed(Voxel::solid(1, 0)));
        mask.mark_used(0, 0, 3, 2);
        assert_eq!(mask.exposed_count(), 1);

        mask.reset(3, 2);
        assert_eq!(mask.exposed_count(), 0);
        assert!(!mask.is_used(2, 1));
    }

    #[test]
    fn mark_used_covers_rectangle_only() {
        let mut mask = SliceMask::new();
        mask.reset(4, 4);
        mask.mark_used(1, 1, 2, 2);

        assert!(mask.is_used(1, 1));
        assert!(mask.is_used(2, 2));
        assert!(!mask.is_used(3, 1));
        assert!(!mask.is_used(1, 3));
        assert!(!mask.is_used(0, 0));
    }
}
