use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" => Some(RiskTier::Low),
            "medium" => Some(RiskTier::Medium),
            "high" => Some(RiskTier::High),
            _ => None,
        }
    }

    /// Tier implied by a numeric risk factor when none is published
    pub fn from_factor(risk_factor: f64) -> Self {
        if risk_factor < 0.2 {
            RiskTier::Low
        } else if risk_factor < 0.3 {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }
}

/// AYAO yield pool as published
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldPool {
    pub name: String,
    /// Annual percentage yield, in percent
    pub apy: f64,
    /// In [0, 1]
    pub risk_factor: f64,
    pub min_deposit: f64,
    pub risk: RiskTier,
    pub tvl: String,
}

/// Pool with projections for a given capital
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPool {
    #[serde(flatten)]
    pub pool: YieldPool,
    pub projected_return: f64,
    pub risk_adjusted_return: f64,
    pub estimated_30d: String,
    pub estimated_60d: String,
    pub estimated_90d: String,
}
