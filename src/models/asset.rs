use serde::{Deserialize, Serialize};

/// Raw historical price point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub day: String,
    pub price: f64,
}

impl PricePoint {
    pub fn new(day: impl Into<String>, price: f64) -> Self {
        Self { day: day.into(), price }
    }
}

/// Price point enriched with Bollinger bands and a synthetic volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandPoint {
    pub day: String,
    pub price: f64,
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
    pub volume: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    /// Percent change over the period
    pub change: f64,
    pub chart: Vec<BandPoint>,
}

impl Asset {
    /// Price before the period's change was applied
    pub fn prior_price(&self) -> f64 {
        let factor = 1.0 + self.change / 100.0;
        if factor == 0.0 {
            return 0.0;
        }
        self.price / factor
    }
}

/// Console price format: large prices get thousands separators
pub fn format_price(price: f64) -> String {
    if price >= 1000.0 {
        let rounded = format!("{:.2}", price);
        let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, "00"));

        let mut grouped = String::new();
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let frac = frac_part.trim_end_matches('0');
        if frac.is_empty() {
            format!("${}", grouped)
        } else {
            format!("${}.{}", grouped, frac)
        }
    } else {
        format!("${:.4}", price)
    }
}
