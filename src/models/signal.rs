use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Buy,
    Sell,
    Hold,
}

impl Verdict {
    /// Case-insensitive; anything unrecognised reads as HOLD
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "BUY" => Verdict::Buy,
            "SELL" => Verdict::Sell,
            _ => Verdict::Hold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Buy => "BUY",
            Verdict::Sell => "SELL",
            Verdict::Hold => "HOLD",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub coin: String,
    pub signal: Verdict,
    /// In [0, 1]
    pub confidence: f64,
    pub reason: String,
    pub rsi: f64,
}
