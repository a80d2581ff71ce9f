use rand::Rng;
use std::cmp::Ordering;
use crate::models::{Asset, BandPoint, PricePoint, RankedPool, YieldPool};
use crate::sources::AssetQuote;

pub const DEFAULT_BAND_MULTIPLIER: f64 = 2.0;

/// Divisors for the ~30/60/90-day estimates
const HORIZON_DIVISORS: [f64; 3] = [12.0, 6.0, 4.0];

/// Bollinger bands over the whole series (not a rolling window).
/// Empty input gives an empty result.
pub fn bollinger_bands(series: &[PricePoint], multiplier: f64) -> Vec<BandPoint> {
    bollinger_bands_with(series, multiplier, &mut rand::thread_rng())
}

pub fn bollinger_bands_with<R: Rng>(series: &[PricePoint], multiplier: f64, rng: &mut R) -> Vec<BandPoint> {
    if series.is_empty() {
        return Vec::new();
    }

    let n = series.len() as f64;
    let mean = series.iter().map(|p| p.price).sum::<f64>() / n;
    // population variance
    let variance = series.iter().map(|p| (p.price - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    series
        .iter()
        .map(|p| BandPoint {
            day: p.day.clone(),
            price: p.price,
            middle: mean,
            upper: mean + std_dev * multiplier,
            lower: mean - std_dev * multiplier,
            // cosmetic only
            volume: rng.gen_range(1000..1500),
        })
        .collect()
}

/// Canonical asset with band-enriched chart
pub fn enrich(quote: AssetQuote) -> Asset {
    let chart = bollinger_bands(&quote.history, DEFAULT_BAND_MULTIPLIER);
    Asset {
        symbol: quote.symbol,
        name: quote.name,
        price: quote.price,
        change: quote.change,
        chart,
    }
}

/// AYAO ranking: descending by risk-adjusted return, ties keep input order
pub fn rank_yield_pools(pools: &[YieldPool], capital: f64) -> Vec<RankedPool> {
    let mut ranked: Vec<RankedPool> = pools
        .iter()
        .map(|pool| {
            let projected_return = capital * pool.apy / 100.0;
            let risk_adjusted_return = projected_return * (1.0 - pool.risk_factor);
            let [d30, d60, d90] = HORIZON_DIVISORS.map(|d| format!("{:.2}%", projected_return / d * 100.0));

            RankedPool {
                pool: pool.clone(),
                projected_return,
                risk_adjusted_return,
                estimated_30d: d30,
                estimated_60d: d60,
                estimated_90d: d90,
            }
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| {
        b.risk_adjusted_return
            .partial_cmp(&a.risk_adjusted_return)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}
