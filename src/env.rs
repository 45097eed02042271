//! Simulation loop that owns the observation, applies decisions and reports progress.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::selector::Selector;
use crate::stock::Stock;
use crate::types::{Decision, Info, Observation, ProductDemand};

#[derive(Debug, Clone)]
pub struct CuttingEnv {
    observation: Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Index of the product the cut was booked against.
    pub product_idx: usize,
    pub terminated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Episode {
    pub decisions: Vec<Decision>,
    pub terminated: bool,
    pub info: Info,
}

impl CuttingEnv {
    pub fn new(products: Vec<ProductDemand>, stocks: Vec<Stock>) -> Result<Self> {
        Self::from_observation(Observation::new(products, stocks))
    }

    pub fn from_observation(observation: Observation) -> Result<Self> {
        observation.validate()?;
        Ok(Self { observation })
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn into_observation(self) -> Observation {
        self.observation
    }

    pub fn is_terminated(&self) -> bool {
        self.observation.products.iter().all(|p| p.quantity == 0)
    }

    pub fn info(&self) -> Info {
        let stocks = &self.observation.stocks;
        let used: Vec<&Stock> = stocks.iter().filter(|s| s.is_used()).collect();
        if used.is_empty() {
            return Info::default();
        }

        let trim_loss = used
            .iter()
            .map(|s| {
                let area = s.size().area();
                if area == 0 {
                    0.0
                } else {
                    s.free_cells() as f64 / area as f64
                }
            })
            .sum::<f64>()
            / used.len() as f64;

        Info {
            filled_ratio: used.len() as f64 / stocks.len() as f64,
            trim_loss,
        }
    }

    /// Cuts the decided rectangle from its stock and books it against the first
    /// product with remaining quantity that matches in either orientation.
    pub fn step(&mut self, decision: Decision) -> Result<StepOutcome> {
        let stock_idx = decision.target().ok_or(Error::NoPlacement)?;

        let product_idx = self
            .observation
            .products
            .iter()
            .position(|p| p.quantity > 0 && p.accepts(decision.size))
            .ok_or(Error::UnknownProduct(decision.size))?;
        let value = i32::try_from(product_idx).map_err(|_| {
            Error::InvalidProduct(format!("product index {product_idx} exceeds grid range"))
        })?;

        let stock = self
            .observation
            .stocks
            .get_mut(stock_idx)
            .ok_or(Error::UnknownStock(decision.stock_idx))?;
        if !stock.can_place(decision.position, decision.size) {
            return Err(Error::Blocked {
                stock_idx,
                size: decision.size,
                position: decision.position,
            });
        }

        stock.fill(decision.position, decision.size, value);
        self.observation.products[product_idx].quantity -= 1;

        Ok(StepOutcome {
            product_idx,
            terminated: self.is_terminated(),
        })
    }

    /// Drives `selector` until every demand is met, it reports no placement,
    /// or `max_steps` decisions have been applied.
    pub fn run<S: Selector + ?Sized>(&mut self, selector: &S, max_steps: usize) -> Episode {
        let mut decisions = Vec::new();
        let mut terminated = self.is_terminated();

        while !terminated && decisions.len() < max_steps {
            let decision = selector.get_action(&self.observation, &self.info());
            if decision.is_none() {
                tracing::info!(
                    remaining = self.observation.remaining_demand(),
                    "selector found no placement"
                );
                break;
            }
            match self.step(decision) {
                Ok(outcome) => {
                    decisions.push(decision);
                    terminated = outcome.terminated;
                }
                Err(e) => {
                    tracing::warn!(error = %e, decision = %decision, "decision rejected");
                    break;
                }
            }
        }

        let info = self.info();
        tracing::info!(
            steps = decisions.len(),
            terminated,
            filled_ratio = info.filled_ratio,
            trim_loss = info.trim_loss,
            "episode finished"
        );

        Episode {
            decisions,
            terminated,
            info,
        }
    }
}
