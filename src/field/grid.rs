use crate::foundation::core::RasterSize;

/// Dense row-major grid addressed by `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    size: RasterSize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Grid of `size` with every cell set to `fill`.
    pub fn filled(size: RasterSize, fill: T) -> Self {
        Self {
            size,
            cells: vec![fill; size.pixel_count()],
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f(x, y)` in row-major order.
    pub fn from_fn(size: RasterSize, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut cells = Vec::with_capacity(size.pixel_count());
        for y in 0..size.height {
            for x in 0..size.width {
                cells.push(f(x, y));
            }
        }
        Self { size, cells }
    }

    /// Grid dimensions.
    pub fn size(&self) -> RasterSize {
        self.size
    }

    /// Cell at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Mutable cell at `(x, y)`, or `None` when out of bounds.
    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut T> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Iterate `(x, y, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> + '_ {
        let w = self.size.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| ((i as u32) % w, (i as u32) / w, c))
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/field/grid.rs"]
mod tests;
