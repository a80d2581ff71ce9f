use serde::{Deserialize, Serialize};
use super::{round2, Asset};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub total_value: f64,
    pub weekly_change: f64,
    pub weekly_change_percent: f64,
}

impl Portfolio {
    /// Build from totals; percent is relative to the previous total, 0 when that is 0
    pub fn new(total_value: f64, weekly_change: f64) -> Self {
        let previous_total = total_value - weekly_change;
        let weekly_change_percent = if previous_total != 0.0 {
            weekly_change / previous_total * 100.0
        } else {
            0.0
        };

        Self {
            total_value: round2(total_value),
            weekly_change: round2(weekly_change),
            weekly_change_percent: round2(weekly_change_percent),
        }
    }

    /// One unit of every asset
    pub fn from_assets(assets: &[Asset]) -> Self {
        let total_value: f64 = assets.iter().map(|a| a.price).sum();
        let weekly_change: f64 = assets.iter().map(|a| a.price - a.prior_price()).sum();
        Self::new(total_value, weekly_change)
    }
}
