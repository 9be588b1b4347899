//! Launch grids: block × grid dimensions in the shape a GPU launch takes.

/// Threads per block along x (columns) and y (rows) used by the harness.
pub const DEFAULT_BLOCK: (usize, usize) = (16, 16);

/// A 2-D task grid.
///
/// Task `(tx, ty)` maps to output coordinate `(row, col) = (ty, tx)`. The
/// grid covers `[0, grid.1 * block.1) × [0, grid.0 * block.0)`, which may be
/// larger than the output; the kernel skips the excess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// (x, y) tasks per block.
    pub block: (usize, usize),
    /// (x, y) blocks in the grid.
    pub grid: (usize, usize),
}

impl Grid {
    /// Smallest grid of `block`-sized blocks covering an `m × n` output.
    ///
    /// ```
    /// use naive_gemm::launch::Grid;
    ///
    /// let g = Grid::covering(2, 2, (16, 16));
    /// assert_eq!(g.grid, (1, 1));
    /// assert_eq!((g.rows(), g.cols()), (16, 16));
    /// ```
    pub fn covering(m: usize, n: usize, block: (usize, usize)) -> Self {
        let block = (block.0.max(1), block.1.max(1));
        Self {
            block,
            grid: (n.div_ceil(block.0), m.div_ceil(block.1)),
        }
    }

    /// A grid with exactly one task per output coordinate.
    pub fn exact(m: usize, n: usize) -> Self {
        Self {
            block: (1, 1),
            grid: (n, m),
        }
    }

    /// Task rows (y extent).
    pub fn rows(&self) -> usize {
        self.grid.1 * self.block.1
    }

    /// Task columns (x extent).
    pub fn cols(&self) -> usize {
        self.grid.0 * self.block.0
    }

    pub fn task_count(&self) -> usize {
        self.rows() * self.cols()
    }

    /// True when every coordinate of an `m × n` output has a task.
    pub fn covers(&self, m: usize, n: usize) -> bool {
        self.rows() >= m && self.cols() >= n
    }

    /// Every task coordinate in row-major order, including ones past the
    /// output bounds.
    pub fn tasks(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols();
        (0..self.rows()).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covering_rounds_up() {
        let g = Grid::covering(17, 33, (16, 16));
        assert_eq!(g.grid, (3, 2));
        assert_eq!(g.rows(), 32);
        assert_eq!(g.cols(), 48);
        assert!(g.covers(17, 33));
    }

    #[test]
    fn exact_grid_has_one_task_per_element() {
        let g = Grid::exact(3, 5);
        assert_eq!(g.task_count(), 15);
        assert_eq!(g.tasks().last(), Some((2, 4)));
    }

    #[test]
    fn zero_block_is_clamped() {
        let g = Grid::covering(4, 4, (0, 0));
        assert_eq!(g.block, (1, 1));
        assert!(g.covers(4, 4));
    }
}
