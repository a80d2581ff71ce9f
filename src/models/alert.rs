use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    Below,
}

impl AlertDirection {
    pub fn is_crossed(&self, price: f64, target: f64) -> bool {
        match self {
            AlertDirection::Above => price >= target,
            AlertDirection::Below => price <= target,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertDirection::Above => "above",
            AlertDirection::Below => "below",
        }
    }
}

/// User-defined price threshold. Goes inactive once, when triggered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomAlert {
    /// Creation timestamp in milliseconds
    pub id: i64,
    pub coin: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub direction: AlertDirection,
    pub active: bool,
}

impl CustomAlert {
    pub fn matches(&self, symbol: &str) -> bool {
        self.coin.to_uppercase() == symbol.to_uppercase()
    }
}

/// Server-side risk alert (support/resistance/breakout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub coin: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub urgency: String,
    pub message: String,
}
