//! Wire records for the dashboard API and their normalization into
//! canonical models. Every field the server may omit or spell differently
//! is resolved here by a named rule, never inline in the orchestrator.

use lazy_static::lazy_static;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use crate::models::{LedgerEntry, PricePoint, RiskAlert, RiskTier, Signal, Verdict, YieldPool};
use super::SourceError;

pub const DEFAULT_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_REASON: &str = "AI analysis active";
/// Neutral RSI used when the server sends none
pub const DEFAULT_RSI: f64 = 50.0;
pub const DEFAULT_TVL: &str = "n/a";

pub const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

lazy_static! {
    static ref KNOWN_NAMES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("BTC", "Bitcoin");
        m.insert("ETH", "Ethereum");
        m.insert("SOL", "Solana");
        m.insert("XRP", "Ripple");
        m.insert("MATIC", "Polygon");
        m
    };
}

/// Display name for a symbol, falling back to the symbol itself
pub fn display_name(symbol: &str) -> String {
    KNOWN_NAMES
        .get(symbol.to_uppercase().as_str())
        .map(|n| n.to_string())
        .unwrap_or_else(|| symbol.to_string())
}

/// Accepts numbers, numeric strings ("$67,200", "0.05") or nothing
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('$').replace(',', "").parse().ok(),
        Value::Object(obj) => obj.get("price").and_then(value_to_f64),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

fn lenient_series<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(items.iter().filter_map(value_to_f64).collect()),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// /api/harga

#[derive(Debug, Default, Deserialize)]
pub struct RawPrice {
    #[serde(default, deserialize_with = "lenient_f64")]
    current: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_series")]
    history: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "lenient_f64")]
    change: Option<f64>,
}

/// Canonical per-asset quote, before band enrichment
#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub history: Vec<PricePoint>,
}

impl RawPrice {
    /// First non-zero of `current`, then `price`; otherwise 0
    fn resolved_price(&self) -> f64 {
        [self.current, self.price]
            .into_iter()
            .flatten()
            .find(|p| *p != 0.0)
            .unwrap_or(0.0)
    }

    pub fn into_quote(self, symbol: &str) -> AssetQuote {
        let price = self.resolved_price();

        // No history (or an empty one) means a single-point series at the current price
        let series = match self.history {
            Some(h) if !h.is_empty() => h,
            _ => {
                tracing::trace!("{}: no history, using current price", symbol);
                vec![price]
            }
        };

        let history = series
            .into_iter()
            .enumerate()
            .map(|(i, p)| PricePoint::new(DAY_LABELS[i % DAY_LABELS.len()], p))
            .collect();

        AssetQuote {
            symbol: symbol.to_string(),
            name: display_name(symbol),
            price,
            change: self.change.unwrap_or(0.0),
            history,
        }
    }
}

/// Decode a keyed map body, keeping the server's key order
fn keyed_records<T>(body: &[u8], what: &str) -> Result<Vec<(String, T)>, SourceError>
where
    T: for<'de> Deserialize<'de>,
{
    let map: Map<String, Value> = serde_json::from_slice(body)
        .map_err(|e| SourceError::Parse(format!("{}: {}", what, e)))?;

    map.into_iter()
        .map(|(key, value)| {
            if !value.is_object() {
                return Err(SourceError::Parse(format!("{}: record {} is not an object", what, key)));
            }
            serde_json::from_value::<T>(value)
                .map(|record| (key.clone(), record))
                .map_err(|e| SourceError::Parse(format!("{} {}: {}", what, key, e)))
        })
        .collect()
}

pub fn parse_prices(body: &[u8]) -> Result<Vec<AssetQuote>, SourceError> {
    Ok(keyed_records::<RawPrice>(body, "prices")?
        .into_iter()
        .map(|(symbol, raw)| raw.into_quote(&symbol))
        .collect())
}

// ---------------------------------------------------------------------------
// /api/sinyal

#[derive(Debug, Default, Deserialize)]
pub struct RawSignal {
    #[serde(default, deserialize_with = "lenient_string")]
    signal: Option<String>,
    #[serde(default, rename = "prediksi", deserialize_with = "lenient_string")]
    prediction: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    reason: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rsi: Option<f64>,
}

impl RawSignal {
    pub fn into_signal(self, coin: &str) -> Signal {
        let verdict = self
            .signal
            .or(self.prediction)
            .filter(|s| !s.trim().is_empty())
            .map(|s| Verdict::parse(&s))
            .unwrap_or(Verdict::Hold);

        Signal {
            coin: coin.to_string(),
            signal: verdict,
            confidence: self
                .confidence
                .filter(|c| *c != 0.0)
                .map(|c| c.clamp(0.0, 1.0))
                .unwrap_or(DEFAULT_CONFIDENCE),
            reason: self
                .reason
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_REASON.to_string()),
            rsi: self.rsi.filter(|r| *r != 0.0).unwrap_or(DEFAULT_RSI),
        }
    }
}

pub fn parse_signals(body: &[u8]) -> Result<Vec<Signal>, SourceError> {
    Ok(keyed_records::<RawSignal>(body, "signals")?
        .into_iter()
        .map(|(coin, raw)| raw.into_signal(&coin))
        .collect())
}

// ---------------------------------------------------------------------------
// /api/ledger

#[derive(Debug, Default, Deserialize)]
pub struct RawLedgerEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    action: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    price: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    note: Option<String>,
}

impl From<RawLedgerEntry> for LedgerEntry {
    fn from(raw: RawLedgerEntry) -> Self {
        Self {
            date: raw.date.unwrap_or_default(),
            action: raw.action.unwrap_or_default(),
            amount: raw.amount.unwrap_or_default(),
            price: raw.price.unwrap_or_default(),
            note: raw.note.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LedgerResponse {
    #[serde(default)]
    entries: Option<Vec<RawLedgerEntry>>,
}

/// `None` when the body carries no `entries` key; the caller keeps its ledger
pub fn parse_ledger(body: &[u8]) -> Result<Option<Vec<LedgerEntry>>, SourceError> {
    let resp: LedgerResponse = serde_json::from_slice(body)
        .map_err(|e| SourceError::Parse(format!("ledger: {}", e)))?;
    Ok(resp.entries.map(|entries| entries.into_iter().map(LedgerEntry::from).collect()))
}

// ---------------------------------------------------------------------------
// /api/ayao

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPool {
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    apy: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    risk_factor: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    min_deposit: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    risk: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    tvl: Option<String>,
}

impl RawPool {
    /// Pools without a name carry nothing to rank and are dropped
    pub fn into_pool(self) -> Option<YieldPool> {
        let name = self.name.filter(|n| !n.is_empty())?;
        let risk_factor = self.risk_factor.unwrap_or(0.0).clamp(0.0, 1.0);
        let risk = self
            .risk
            .as_deref()
            .and_then(RiskTier::parse)
            .unwrap_or_else(|| RiskTier::from_factor(risk_factor));

        Some(YieldPool {
            name,
            apy: self.apy.unwrap_or(0.0),
            risk_factor,
            min_deposit: self.min_deposit.unwrap_or(0.0),
            risk,
            tvl: self.tvl.unwrap_or_else(|| DEFAULT_TVL.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PoolsResponse {
    #[serde(default)]
    pools: Vec<RawPool>,
}

pub fn parse_pools(body: &[u8]) -> Result<Vec<YieldPool>, SourceError> {
    let resp: PoolsResponse = serde_json::from_slice(body)
        .map_err(|e| SourceError::Parse(format!("pools: {}", e)))?;
    Ok(resp.pools.into_iter().filter_map(RawPool::into_pool).collect())
}

// ---------------------------------------------------------------------------
// /api/alerts

#[derive(Debug, Default, Deserialize)]
pub struct RawRiskAlert {
    #[serde(default, deserialize_with = "lenient_string")]
    coin: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    price: Option<f64>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    urgency: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    message: Option<String>,
}

impl From<RawRiskAlert> for RiskAlert {
    fn from(raw: RawRiskAlert) -> Self {
        Self {
            coin: raw.coin.unwrap_or_default(),
            price: raw.price.unwrap_or(0.0),
            kind: raw.kind.unwrap_or_default(),
            urgency: raw.urgency.unwrap_or_else(|| "medium".to_string()),
            message: raw.message.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RiskAlertsResponse {
    #[serde(default)]
    critical: Vec<RawRiskAlert>,
    #[serde(default)]
    warnings: Vec<RawRiskAlert>,
}

/// Critical alerts first, then warnings
pub fn parse_risk_alerts(body: &[u8]) -> Result<Vec<RiskAlert>, SourceError> {
    let resp: RiskAlertsResponse = serde_json::from_slice(body)
        .map_err(|e| SourceError::Parse(format!("alerts: {}", e)))?;
    Ok(resp
        .critical
        .into_iter()
        .chain(resp.warnings)
        .map(RiskAlert::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_accept_either_field_and_keep_order() {
        let body = br#"{
            "SOL": {"price": "142.35", "change": -0.45},
            "BTC": {"current": 67420.5, "history": [65800, "66200", 67420], "change": 2.34},
            "DOGE": {"current": 0, "price": 0.12}
        }"#;
        let quotes = parse_prices(body).unwrap();

        let symbols: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["SOL", "BTC", "DOGE"]);

        assert_eq!(quotes[0].price, 142.35);
        assert_eq!(quotes[0].name, "Solana");
        assert_eq!(quotes[0].history, vec![PricePoint::new("Mon", 142.35)]);

        assert_eq!(quotes[1].price, 67420.5);
        assert_eq!(quotes[1].history.len(), 3);
        assert_eq!(quotes[1].history[1], PricePoint::new("Tue", 66200.0));

        assert_eq!(quotes[2].price, 0.12);
        assert_eq!(quotes[2].name, "DOGE");
        assert_eq!(quotes[2].change, 0.0);
    }

    #[test]
    fn day_labels_wrap_after_a_week() {
        let raw = RawPrice {
            current: Some(1.0),
            history: Some((1..=9).map(|i| i as f64).collect()),
            ..Default::default()
        };
        let quote = raw.into_quote("X");
        assert_eq!(quote.history[7].day, "Mon");
        assert_eq!(quote.history[8].day, "Tue");
    }

    #[test]
    fn malformed_price_body_is_parse_error() {
        assert!(matches!(parse_prices(b"[1,2,3]"), Err(SourceError::Parse(_))));
        assert!(matches!(parse_prices(br#"{"BTC": 5}"#), Err(SourceError::Parse(_))));
        assert!(matches!(parse_prices(b"not json"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn signals_apply_defaults() {
        let body = br#"{
            "BTC": {"signal": "buy", "confidence": 0.85, "reason": "Momentum", "rsi": 68.4},
            "ETH": {"prediksi": "sell"},
            "SOL": {}
        }"#;
        let signals = parse_signals(body).unwrap();

        assert_eq!(signals[0].signal, Verdict::Buy);
        assert_eq!(signals[0].confidence, 0.85);
        assert_eq!(signals[1].signal, Verdict::Sell);
        assert_eq!(signals[1].confidence, DEFAULT_CONFIDENCE);
        assert_eq!(signals[1].reason, DEFAULT_REASON);
        assert_eq!(signals[2].signal, Verdict::Hold);
        assert_eq!(signals[2].rsi, DEFAULT_RSI);
    }

    #[test]
    fn ledger_without_entries_is_none() {
        assert_eq!(parse_ledger(b"{}").unwrap(), None);

        let body = br#"{"entries": [{"date": "2025-11-01", "action": "BUY BTC", "amount": 0.05, "price": "$67,200"}]}"#;
        let entries = parse_ledger(body).unwrap().unwrap();
        assert_eq!(entries[0].amount, "0.05");
        assert_eq!(entries[0].note, "");
    }

    #[test]
    fn pools_fill_tier_from_factor() {
        let body = br#"{"pools": [
            {"name": "A", "apy": 10, "riskFactor": 0.35},
            {"name": "B", "apy": "8", "riskFactor": 0, "risk": "low", "tvl": "$1B"},
            {"apy": 99}
        ]}"#;
        let pools = parse_pools(body).unwrap();
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].risk, RiskTier::High);
        assert_eq!(pools[0].tvl, DEFAULT_TVL);
        assert_eq!(pools[1].apy, 8.0);
        assert_eq!(pools[1].risk, RiskTier::Low);

        assert!(parse_pools(b"{}").unwrap().is_empty());
    }

    #[test]
    fn risk_alerts_critical_first() {
        let body = br#"{
            "warnings": [{"coin": "ETH", "price": 3500, "type": "support", "urgency": "medium", "message": "w"}],
            "critical": [{"coin": "BTC", "price": 70000, "type": "resistance", "urgency": "high", "message": "c"}]
        }"#;
        let alerts = parse_risk_alerts(body).unwrap();
        assert_eq!(alerts[0].coin, "BTC");
        assert_eq!(alerts[1].coin, "ETH");
    }
}
