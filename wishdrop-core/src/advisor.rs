//! Session-level advice: cached simulated history plus the signal for a product.
//!
//! An `Advisor` lives for one user session. It simulates each product's
//! history at most once (seeded per product from the session's master seed),
//! keeps it in a bounded [`SeriesCache`], and evaluates the signal against the
//! product's current price.

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::cache::SeriesCache;
use crate::catalog::Catalog;
use crate::config::WishdropConfig;
use crate::domain::{PriceSeries, Product, ProductId};
use crate::error::InvalidInput;
use crate::rng::SeedHierarchy;
use crate::signal::{Signal, SignalEngine};
use crate::simulator::PriceHistorySimulator;

/// Shown in place of advice when a product's data cannot be evaluated.
pub const FALLBACK_MESSAGE: &str = "Price advice is unavailable for this item.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdviceError {
    #[error("invalid input for product '{product_id}': {source}")]
    InvalidInput {
        product_id: ProductId,
        #[source]
        source: InvalidInput,
    },

    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),
}

/// Advice for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub product_id: ProductId,
    pub current_price: f64,
    pub signal: Signal,
}

/// What a view should render: the advice, or a neutral message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdviceView {
    Available(Advice),
    Unavailable { product_id: ProductId, message: &'static str },
}

pub struct Advisor {
    simulator: PriceHistorySimulator,
    engine: SignalEngine,
    seeds: SeedHierarchy,
    days: usize,
    cache: SeriesCache,
}

impl Advisor {
    pub fn new(
        simulator: PriceHistorySimulator,
        engine: SignalEngine,
        seeds: SeedHierarchy,
        cache_capacity: usize,
    ) -> Self {
        let days = simulator.config().days;
        Self {
            simulator,
            engine,
            seeds,
            days,
            cache: SeriesCache::new(cache_capacity),
        }
    }

    /// Build from configuration. `seed = None` draws a fresh session seed.
    pub fn from_config(config: &WishdropConfig, seed: Option<u64>) -> Self {
        let seeds = seed.map_or_else(SeedHierarchy::from_entropy, SeedHierarchy::new);
        Self::new(
            PriceHistorySimulator::new(config.simulator.clone()),
            SignalEngine::new(config.signal.clone()),
            seeds,
            config.cache.capacity,
        )
    }

    pub fn seeds(&self) -> SeedHierarchy {
        self.seeds
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// The product's history, simulated on first request.
    pub fn series_for(&mut self, product: &Product) -> Result<&PriceSeries, AdviceError> {
        cached_series(&mut self.cache, &self.simulator, self.seeds, self.days, product)
    }

    pub fn advise(&mut self, product: &Product) -> Result<Advice, AdviceError> {
        let series = cached_series(&mut self.cache, &self.simulator, self.seeds, self.days, product)?;
        let signal = self
            .engine
            .evaluate(series, product.price)
            .map_err(|source| AdviceError::InvalidInput {
                product_id: product.id.clone(),
                source,
            })?;
        Ok(Advice {
            product_id: product.id.clone(),
            current_price: product.price,
            signal,
        })
    }

    /// Look the product up in the catalog, then advise.
    pub fn advise_by_id(&mut self, catalog: &Catalog, product_id: &str) -> Result<Advice, AdviceError> {
        let product = catalog
            .get_product(product_id)
            .ok_or_else(|| AdviceError::UnknownProduct(product_id.to_string()))?;
        self.advise(product)
    }

    /// Like [`advise`](Self::advise), but degrades to a neutral message.
    pub fn advise_or_fallback(&mut self, product: &Product) -> AdviceView {
        match self.advise(product) {
            Ok(advice) => AdviceView::Available(advice),
            Err(e) => {
                tracing::warn!(product_id = %product.id, error = %e, "advice unavailable");
                AdviceView::Unavailable {
                    product_id: product.id.clone(),
                    message: FALLBACK_MESSAGE,
                }
            }
        }
    }

    /// Advice for many products. Missing histories are simulated in
    /// parallel; each uses its own derived seed, so the result does not
    /// depend on thread scheduling.
    pub fn advise_all(&mut self, products: &[Product]) -> Vec<AdviceView> {
        let missing: Vec<&Product> = products
            .iter()
            .filter(|p| !self.cache.contains(&p.id))
            .collect();

        let simulated: Vec<(ProductId, Result<PriceSeries, InvalidInput>)> = missing
            .par_iter()
            .map(|p| {
                let seed = self.seeds.sub_seed(&p.id);
                (p.id.clone(), self.simulator.simulate(p.price, self.days, Some(seed)))
            })
            .collect();

        for (id, result) in simulated {
            if let Ok(series) = result {
                self.cache.insert(id, series);
            }
        }

        products.iter().map(|p| self.advise_or_fallback(p)).collect()
    }
}

fn cached_series<'c>(
    cache: &'c mut SeriesCache,
    simulator: &PriceHistorySimulator,
    seeds: SeedHierarchy,
    days: usize,
    product: &Product,
) -> Result<&'c PriceSeries, AdviceError> {
    cache
        .get_or_try_insert_with(&product.id, || {
            simulator.simulate(product.price, days, Some(seeds.sub_seed(&product.id)))
        })
        .map_err(|source| AdviceError::InvalidInput {
            product_id: product.id.clone(),
            source,
        })
}
