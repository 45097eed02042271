use std::cmp::Reverse;

use crate::stock::Stock;
use crate::types::{Decision, Info, Observation, Position, ProductDemand, Rect};

/// Weight of the bottom margin relative to the right margin when scoring positions.
const VERTICAL_MARGIN_WEIGHT: f64 = 0.5;

/// Anything that turns an observation into a single cut.
pub trait Selector {
    /// Zero-sized products are never placed; they are skipped like exhausted ones.
    fn select(&self, observation: &Observation) -> Decision;

    /// Environment-facing entry point. `info` is accepted but not consulted.
    fn get_action(&self, observation: &Observation, _info: &Info) -> Decision {
        self.select(observation)
    }
}

/// Largest-first product ordering, first-fit over stocks, best-fit within a stock.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyBestFit {
    /// Carried for interface parity; has no effect on selection.
    pub policy_id: u32,
}

impl GreedyBestFit {
    pub fn new(policy_id: u32) -> Self {
        Self { policy_id }
    }

    /// Larger area first, then larger short side, then smaller long side.
    /// Full ties keep their input order.
    pub fn rank(products: &[ProductDemand]) -> Vec<&ProductDemand> {
        let mut ranked: Vec<&ProductDemand> = products.iter().collect();
        ranked.sort_by_key(|p| {
            (
                Reverse(p.size.area()),
                Reverse(p.size.short_side()),
                p.size.long_side(),
            )
        });
        ranked
    }

    /// Leftover margin to the right and below a placement; lower is tighter.
    pub fn score(stock: Rect, position: Position, piece: Rect) -> f64 {
        let right = stock.w - (position.x + piece.w);
        let bottom = stock.h - (position.y + piece.h);
        right as f64 + VERTICAL_MARGIN_WEIGHT * bottom as f64
    }

    /// Lowest-scoring free position for `piece`, scanning x-major. The first
    /// position seen wins a tie.
    pub fn find_placement(stock: &Stock, piece: Rect) -> Option<Position> {
        let size = stock.size();
        if !piece.fits_in(&size) {
            return None;
        }

        let mut best: Option<(f64, Position)> = None;
        for x in 0..=size.w - piece.w {
            for y in 0..=size.h - piece.h {
                let position = Position::new(x, y);
                if !stock.can_place(position, piece) {
                    continue;
                }
                let score = Self::score(size, position, piece);
                if best.is_none_or(|(best_score, _)| score < best_score) {
                    best = Some((score, position));
                }
            }
        }

        best.map(|(_, position)| position)
    }

    fn place_product(&self, stocks: &[Stock], product: &ProductDemand) -> Option<Decision> {
        for (idx, stock) in stocks.iter().enumerate() {
            let size = stock.size();
            for piece in product.orientations() {
                if !piece.fits_in(&size) {
                    continue;
                }
                if let Some(position) = Self::find_placement(stock, piece) {
                    return Some(Decision::place(idx, piece, position));
                }
            }
        }
        None
    }
}

impl Selector for GreedyBestFit {
    fn select(&self, observation: &Observation) -> Decision {
        for product in Self::rank(&observation.products) {
            if product.quantity == 0 || product.size.is_empty() {
                continue;
            }
            match self.place_product(&observation.stocks, product) {
                Some(decision) => {
                    tracing::debug!(
                        product = %product.size,
                        decision = %decision,
                        "placement selected"
                    );
                    return decision;
                }
                None => {
                    tracing::trace!(product = %product.size, "product fits no stock");
                }
            }
        }

        tracing::debug!(
            remaining = observation.remaining_demand(),
            "no feasible placement"
        );
        Decision::NONE
    }
}
