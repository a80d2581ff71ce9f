//! Fixed baseline datasets used whenever the backend cannot be reached.

use crate::models::{
    ActivityEntry, ActivityStatus, LedgerEntry, Portfolio, PricePoint, RiskAlert, RiskTier,
    Signal, Verdict, YieldPool,
};
use crate::sources::raw::{display_name, DAY_LABELS};
use crate::sources::AssetQuote;

pub const BASELINE_TOTAL_VALUE: f64 = 72063.85;
pub const BASELINE_WEEKLY_CHANGE: f64 = 1538.45;

fn quote(symbol: &str, price: f64, change: f64, week: [f64; 7]) -> AssetQuote {
    AssetQuote {
        symbol: symbol.to_string(),
        name: display_name(symbol),
        price,
        change,
        history: DAY_LABELS
            .iter()
            .zip(week)
            .map(|(day, p)| PricePoint::new(*day, p))
            .collect(),
    }
}

pub fn quotes() -> Vec<AssetQuote> {
    vec![
        quote("BTC", 67420.50, 2.34, [65800.0, 66200.0, 65900.0, 66800.0, 67100.0, 67000.0, 67420.0]),
        quote("ETH", 3245.80, 1.87, [3180.0, 3200.0, 3190.0, 3220.0, 3235.0, 3240.0, 3246.0]),
        quote("SOL", 142.35, -0.45, [145.0, 144.0, 143.0, 144.0, 143.0, 142.0, 142.0]),
        quote("XRP", 0.5234, 3.12, [0.505, 0.510, 0.512, 0.518, 0.520, 0.521, 0.523]),
        quote("MATIC", 0.8945, 1.23, [0.880, 0.885, 0.882, 0.888, 0.891, 0.893, 0.895]),
    ]
}

pub fn signals() -> Vec<Signal> {
    let signal = |coin: &str, verdict: Verdict, confidence: f64, reason: &str, rsi: f64| Signal {
        coin: coin.to_string(),
        signal: verdict,
        confidence,
        reason: reason.to_string(),
        rsi,
    };

    vec![
        signal("BTC", Verdict::Buy, 0.85, "Positive momentum and rising volume", 68.4),
        signal("XRP", Verdict::Buy, 0.78, "Resistance level breakout", 72.1),
        signal("SOL", Verdict::Hold, 0.65, "Sideways, waiting for confirmation", 55.3),
    ]
}

pub fn ledger() -> Vec<LedgerEntry> {
    let entry = |date: &str, action: &str, amount: &str, price: &str, note: &str| LedgerEntry {
        date: date.to_string(),
        action: action.to_string(),
        amount: amount.to_string(),
        price: price.to_string(),
        note: note.to_string(),
    };

    vec![
        entry("2025-11-01", "BUY BTC", "0.05", "$67,200", "Entry after AI analysis"),
        entry("2025-10-28", "SELL ETH", "1.2", "$3,180", "Take profit 15%"),
        entry("2025-10-25", "BUY SOL", "10", "$145", "DCA strategy"),
    ]
}

pub fn portfolio() -> Portfolio {
    Portfolio::new(BASELINE_TOTAL_VALUE, BASELINE_WEEKLY_CHANGE)
}

/// Newest first
pub fn activity() -> Vec<ActivityEntry> {
    vec![
        ActivityEntry::at("10:30", "Royal Sync", ActivityStatus::Success, "All AI data synchronized"),
        ActivityEntry::at("09:15", "AYAO Optimization", ActivityStatus::Success, "Pool BTC-USDT recommended"),
        ActivityEntry::at("08:00", "Technical Analysis", ActivityStatus::Success, "Bollinger Bands updated"),
    ]
}

pub fn pools() -> Vec<YieldPool> {
    let pool = |name: &str, apy: f64, risk_factor: f64, min_deposit: f64, risk: RiskTier, tvl: &str| YieldPool {
        name: name.to_string(),
        apy,
        risk_factor,
        min_deposit,
        risk,
        tvl: tvl.to_string(),
    };

    vec![
        pool("BTC-USDT", 12.5, 0.1, 0.01, RiskTier::Low, "$2.5B"),
        pool("ETH-USDT", 15.2, 0.2, 0.05, RiskTier::Medium, "$1.8B"),
        pool("SOL-USDT", 18.7, 0.3, 1.0, RiskTier::High, "$850M"),
        pool("XRP-USDT", 10.8, 0.15, 10.0, RiskTier::Low, "$1.2B"),
        pool("MATIC-USDT", 14.3, 0.25, 5.0, RiskTier::Medium, "$650M"),
    ]
}

pub fn risk_alerts() -> Vec<RiskAlert> {
    let alert = |coin: &str, price: f64, kind: &str, urgency: &str, message: &str| RiskAlert {
        coin: coin.to_string(),
        price,
        kind: kind.to_string(),
        urgency: urgency.to_string(),
        message: message.to_string(),
    };

    vec![
        alert("BTC", 70000.0, "resistance", "high", "BTC approaching $70K resistance!"),
        alert("ETH", 3500.0, "support", "medium", "ETH testing support level"),
        alert("SOL", 150.0, "breakout", "high", "SOL breakout potential!"),
    ]
}
