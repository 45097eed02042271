use thiserror::Error;

use crate::types::{Position, Rect};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("ragged stock grid: column {column} has {found} cells, expected {expected}")]
    RaggedGrid {
        column: usize,
        expected: usize,
        found: usize,
    },

    #[error("stock grid dimension {0} exceeds the supported range")]
    GridTooLarge(usize),

    #[error("invalid stock: {0}")]
    InvalidStock(String),

    #[error("invalid product: {0}")]
    InvalidProduct(String),

    #[error("decision does not place anything")]
    NoPlacement,

    #[error("stock index {0} is out of range")]
    UnknownStock(i64),

    #[error("no product of size {0} has remaining quantity")]
    UnknownProduct(Rect),

    #[error("{size} at {position} does not fit the free cells of stock {stock_idx}")]
    Blocked {
        stock_idx: usize,
        size: Rect,
        position: Position,
    },
}
