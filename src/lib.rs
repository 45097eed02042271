//! Placement policy for a 2D cutting-stock simulation.
//!
//! A [`selector::Selector`] picks one product, stock, orientation and position
//! per call; [`env::CuttingEnv`] applies those decisions to the stock grids.

pub mod efficiency;
pub mod env;
pub mod error;
pub mod render;
pub mod selector;
pub mod stock;
pub mod types;

pub use error::{Error, Result};
