use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::stock::Stock;

/// Width × height of a product or of a stock's usable area, in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CellPair", into = "(u32, u32)")]
pub struct Rect {
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }

    pub fn short_side(&self) -> u32 {
        self.w.min(self.h)
    }

    pub fn long_side(&self) -> u32 {
        self.w.max(self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

impl From<Rect> for (u32, u32) {
    fn from(r: Rect) -> Self {
        (r.w, r.h)
    }
}

/// Top-left cell of a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "CellPair", into = "(u32, u32)")]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<Position> for (u32, u32) {
    fn from(p: Position) -> Self {
        (p.x, p.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// Wire form shared by `Rect` and `Position`: a two-element array whose
// entries may arrive as integral floats.
#[derive(Deserialize)]
struct CellPair(
    #[serde(deserialize_with = "deserialize_u32_from_number")] u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")] u32,
);

impl From<CellPair> for Rect {
    fn from(CellPair(w, h): CellPair) -> Self {
        Rect::new(w, h)
    }
}

impl From<CellPair> for Position {
    fn from(CellPair(x, y): CellPair) -> Self {
        Position::new(x, y)
    }
}

/// Accepts any JSON number with an integral value in `u32` range, so `3` and `3.0` both parse.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative integer, got {value}"
        )));
    }
    Ok(value as u32)
}

/// A rectangular cut still owed to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDemand {
    pub size: Rect,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
}

impl ProductDemand {
    pub fn new(size: Rect, quantity: u32) -> Self {
        Self { size, quantity }
    }

    /// Both ways the product may be laid down, original first.
    pub fn orientations(&self) -> [Rect; 2] {
        [self.size, self.size.rotated()]
    }

    pub fn accepts(&self, size: Rect) -> bool {
        self.orientations().contains(&size)
    }
}

/// Snapshot handed to a selector on every step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Observation {
    pub products: Vec<ProductDemand>,
    pub stocks: Vec<Stock>,
}

impl Observation {
    pub fn new(products: Vec<ProductDemand>, stocks: Vec<Stock>) -> Self {
        Self { products, stocks }
    }

    /// Rejects zero-sized products; grids are already checked when a `Stock` is built.
    pub fn validate(&self) -> Result<()> {
        for (idx, product) in self.products.iter().enumerate() {
            if product.size.is_empty() {
                return Err(Error::InvalidProduct(format!(
                    "product {idx} has zero-sized dimensions {}",
                    product.size
                )));
            }
        }
        Ok(())
    }

    pub fn remaining_demand(&self) -> u64 {
        self.products.iter().map(|p| p.quantity as u64).sum()
    }
}

/// Progress figures reported by the environment alongside each observation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    /// Fraction of stocks holding at least one cut.
    pub filled_ratio: f64,
    /// Mean share of free usable cells over the stocks in use.
    pub trim_loss: f64,
}

/// One cut chosen by a selector. `stock_idx == -1` means nothing fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub stock_idx: i64,
    pub size: Rect,
    pub position: Position,
}

impl Decision {
    pub const NONE: Decision = Decision {
        stock_idx: -1,
        size: Rect::new(0, 0),
        position: Position::new(0, 0),
    };

    pub fn place(stock_idx: usize, size: Rect, position: Position) -> Self {
        Self {
            stock_idx: stock_idx as i64,
            size,
            position,
        }
    }

    pub fn is_none(&self) -> bool {
        self.stock_idx < 0
    }

    /// Index of the target stock, or `None` for the sentinel.
    pub fn target(&self) -> Option<usize> {
        usize::try_from(self.stock_idx).ok()
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.target() {
            Some(idx) => write!(f, "stock {idx}: {} @ {}", self.size, self.position),
            None => write!(f, "no placement"),
        }
    }
}
