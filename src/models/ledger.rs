use serde::{Deserialize, Serialize};

/// Transaction record; fields are kept as published display text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: String,
    pub action: String,
    pub amount: String,
    pub price: String,
    pub note: String,
}
