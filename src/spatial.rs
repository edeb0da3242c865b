//! Uniform-grid neighbour index for the relation pass.
//!
//! Particles are bucketed into square cells at least as wide as the link
//! distance, so any pair closer than that distance sits in the same or an
//! adjacent cell. Buckets are stored as a counting sort (`cell_start` offsets
//! into `entries`), rebuilt from scratch every frame without reallocating.

use glam::Vec2;

use crate::particle::Particle;

/// Upper bound on cells along either axis. Very small link distances over a
/// large surface widen the cells instead of growing the table.
const MAX_CELLS_PER_AXIS: usize = 1024;

/// Marks particles with non-finite positions, which are never bucketed.
const UNBUCKETED: u32 = u32::MAX;

/// Grid of particle indices bucketed by position.
#[derive(Debug, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    origin: Vec2,
    cols: usize,
    rows: usize,
    /// Cell of each particle, or `UNBUCKETED`.
    cell_of: Vec<u32>,
    /// `cols * rows + 1` offsets into `entries`.
    cell_start: Vec<u32>,
    entries: Vec<u32>,
    cursor: Vec<u32>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of one cell after the last rebuild.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// `(cols, rows)` after the last rebuild.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Re-bucket `particles` with cells no narrower than `link_distance`.
    pub fn rebuild(&mut self, particles: &[Particle], link_distance: f32) {
        self.cell_of.clear();
        self.cell_start.clear();
        self.entries.clear();
        self.cols = 0;
        self.rows = 0;

        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for p in particles.iter().filter(|p| p.position.is_finite()) {
            min = min.min(p.position);
            max = max.max(p.position);
        }
        if !(link_distance > 0.0) || min.x > max.x {
            self.cell_of.resize(particles.len(), UNBUCKETED);
            return;
        }

        let span = max - min;
        self.cell_size = link_distance.max(span.max_element() / MAX_CELLS_PER_AXIS as f32);
        self.origin = min;
        self.cols = (span.x / self.cell_size) as usize + 1;
        self.rows = (span.y / self.cell_size) as usize + 1;

        let cells = self.cols * self.rows;
        self.cell_start.resize(cells + 1, 0);
        for p in particles {
            let cell = self.cell_index(p.position);
            self.cell_of.push(cell);
            if cell != UNBUCKETED {
                self.cell_start[cell as usize + 1] += 1;
            }
        }
        for i in 0..cells {
            self.cell_start[i + 1] += self.cell_start[i];
        }

        self.entries.resize(self.cell_start[cells] as usize, 0);
        self.cursor.clear();
        self.cursor.extend_from_slice(&self.cell_start[..cells]);
        for (index, &cell) in self.cell_of.iter().enumerate() {
            if cell != UNBUCKETED {
                let slot = &mut self.cursor[cell as usize];
                self.entries[*slot as usize] = index as u32;
                *slot += 1;
            }
        }
    }

    /// Call `visit` with every particle index in the 3×3 block of cells
    /// around particle `index`, including `index` itself.
    pub fn for_each_candidate<F: FnMut(usize)>(&self, index: usize, mut visit: F) {
        let Some(&cell) = self.cell_of.get(index) else {
            return;
        };
        if cell == UNBUCKETED {
            return;
        }
        let cx = cell as usize % self.cols;
        let cy = cell as usize / self.cols;
        for y in cy.saturating_sub(1)..=(cy + 1).min(self.rows - 1) {
            for x in cx.saturating_sub(1)..=(cx + 1).min(self.cols - 1) {
                let c = y * self.cols + x;
                let range = self.cell_start[c] as usize..self.cell_start[c + 1] as usize;
                for &other in &self.entries[range] {
                    visit(other as usize);
                }
            }
        }
    }

    fn cell_index(&self, position: Vec2) -> u32 {
        if !position.is_finite() {
            return UNBUCKETED;
        }
        let local = (position - self.origin) / self.cell_size;
        let x = (local.x.max(0.0) as usize).min(self.cols - 1);
        let y = (local.y.max(0.0) as usize).min(self.rows - 1);
        (y * self.cols + x) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO)
    }

    fn candidates(grid: &SpatialGrid, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        grid.for_each_candidate(index, |j| out.push(j));
        out.sort_unstable();
        out
    }

    #[test]
    fn test_neighbouring_cells_are_candidates() {
        let particles = [at(0.0, 0.0), at(15.0, 0.0), at(25.0, 0.0), at(0.0, 35.0)];
        let mut grid = SpatialGrid::new();
        grid.rebuild(&particles, 10.0);

        assert_eq!(grid.dimensions(), (3, 4));
        assert_eq!(candidates(&grid, 0), vec![0, 1]);
        assert_eq!(candidates(&grid, 1), vec![0, 1, 2]);
        assert_eq!(candidates(&grid, 3), vec![3]);
    }

    #[test]
    fn test_non_finite_positions_skipped() {
        let particles = [at(1.0, 1.0), at(f32::NAN, 2.0), at(2.0, 2.0)];
        let mut grid = SpatialGrid::new();
        grid.rebuild(&particles, 5.0);

        assert_eq!(candidates(&grid, 0), vec![0, 2]);
        assert!(candidates(&grid, 1).is_empty());
    }

    #[test]
    fn test_cell_count_is_capped() {
        let particles = [at(0.0, 0.0), at(1.0e6, 1.0e6)];
        let mut grid = SpatialGrid::new();
        grid.rebuild(&particles, 0.001);

        let (cols, rows) = grid.dimensions();
        assert!(cols <= MAX_CELLS_PER_AXIS + 1 && rows <= MAX_CELLS_PER_AXIS + 1);
        assert!(grid.cell_size() >= 0.001);
    }

    #[test]
    fn test_rebuild_with_nothing_to_index() {
        let mut grid = SpatialGrid::new();
        grid.rebuild(&[], 10.0);
        assert_eq!(grid.dimensions(), (0, 0));

        grid.rebuild(&[at(1.0, 1.0)], 0.0);
        assert!(candidates(&grid, 0).is_empty());
    }
}
