//! Occupancy grid of a single stock sheet.
//!
//! Cells are stored column-major and addressed as `[x][y]`: the outer axis runs
//! along the width. A cell is free ([`FREE`]), outside the sheet ([`PADDING`]),
//! or occupied by anything else, normally the index of the product cut there.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Position, Rect};

pub const FREE: i32 = -1;
pub const PADDING: i32 = -2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i32>>", into = "Vec<Vec<i32>>")]
pub struct Stock {
    cells: Vec<i32>,
    cols: usize,
    rows: usize,
    usable: Rect,
}

impl Stock {
    /// A fully free sheet with no padding.
    pub fn new(size: Rect) -> Self {
        let cols = size.w as usize;
        let rows = size.h as usize;
        Self {
            cells: vec![FREE; cols * rows],
            cols,
            rows,
            usable: size,
        }
    }

    /// A free sheet of `size` in the top-left corner of a `grid` padded with [`PADDING`].
    pub fn padded(size: Rect, grid: Rect) -> Result<Self> {
        if !size.fits_in(&grid) {
            return Err(Error::InvalidStock(format!(
                "sheet {size} does not fit in grid {grid}"
            )));
        }
        let mut columns = vec![vec![PADDING; grid.h as usize]; grid.w as usize];
        for column in columns.iter_mut().take(size.w as usize) {
            column[..size.h as usize].fill(FREE);
        }
        Self::from_columns(columns)
    }

    pub fn from_columns(columns: Vec<Vec<i32>>) -> Result<Self> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(cols * rows);
        for (column, values) in columns.into_iter().enumerate() {
            if values.len() != rows {
                return Err(Error::RaggedGrid {
                    column,
                    expected: rows,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }
        u32::try_from(cols).map_err(|_| Error::GridTooLarge(cols))?;
        u32::try_from(rows).map_err(|_| Error::GridTooLarge(rows))?;

        let mut stock = Self {
            cells,
            cols,
            rows,
            usable: Rect::new(0, 0),
        };
        stock.usable = stock.measure_usable();
        Ok(stock)
    }

    // Width counts columns and height counts rows holding any non-padding cell.
    fn measure_usable(&self) -> Rect {
        let mut used_rows = vec![false; self.rows];
        let mut w = 0;
        for x in 0..self.cols {
            let column = self.column(x);
            if column.iter().any(|&c| c != PADDING) {
                w += 1;
            }
            for (y, &c) in column.iter().enumerate() {
                used_rows[y] |= c != PADDING;
            }
        }
        let h = used_rows.iter().filter(|&&r| r).count();
        Rect::new(w, h as u32)
    }

    fn column(&self, x: usize) -> &[i32] {
        &self.cells[x * self.rows..(x + 1) * self.rows]
    }

    /// Usable width × height, ignoring padding.
    pub fn size(&self) -> Rect {
        self.usable
    }

    /// Full grid extent, padding included.
    pub fn grid_size(&self) -> Rect {
        Rect::new(self.cols as u32, self.rows as u32)
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<i32> {
        let (x, y) = (x as usize, y as usize);
        (x < self.cols && y < self.rows).then(|| self.cells[x * self.rows + y])
    }

    /// True when every cell of the footprint lies on the grid and is free.
    pub fn can_place(&self, position: Position, size: Rect) -> bool {
        let x0 = position.x as usize;
        let y0 = position.y as usize;
        let x1 = x0 + size.w as usize;
        let y1 = y0 + size.h as usize;
        if x1 > self.cols || y1 > self.rows {
            return false;
        }
        (x0..x1).all(|x| self.column(x)[y0..y1].iter().all(|&c| c == FREE))
    }

    /// Writes `value` into the footprint. Callers check [`Stock::can_place`] first.
    pub(crate) fn fill(&mut self, position: Position, size: Rect, value: i32) {
        let y0 = position.y as usize;
        let y1 = y0 + size.h as usize;
        for x in position.x as usize..(position.x + size.w) as usize {
            let start = x * self.rows;
            self.cells[start + y0..start + y1].fill(value);
        }
    }

    /// Occupied cells inside the usable area; padding is never counted.
    pub fn occupied_cells(&self) -> u64 {
        self.cells
            .iter()
            .filter(|&&c| c != FREE && c != PADDING)
            .count() as u64
    }

    pub fn free_cells(&self) -> u64 {
        self.cells.iter().filter(|&&c| c == FREE).count() as u64
    }

    pub fn is_used(&self) -> bool {
        self.occupied_cells() > 0
    }

    pub fn columns(&self) -> Vec<Vec<i32>> {
        (0..self.cols).map(|x| self.column(x).to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<i32>>> for Stock {
    type Error = Error;

    fn try_from(columns: Vec<Vec<i32>>) -> Result<Self> {
        Self::from_columns(columns)
    }
}

impl From<Stock> for Vec<Vec<i32>> {
    fn from(stock: Stock) -> Self {
        stock.columns()
    }
}
