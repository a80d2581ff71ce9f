pub mod asset;
pub mod signal;
pub mod pool;
pub mod ledger;
pub mod portfolio;
pub mod alert;
pub mod status;
pub mod notification;

pub use asset::{Asset, PricePoint, BandPoint};
pub use signal::{Signal, Verdict};
pub use pool::{YieldPool, RankedPool, RiskTier};
pub use ledger::LedgerEntry;
pub use portfolio::Portfolio;
pub use alert::{CustomAlert, AlertDirection, RiskAlert};
pub use status::{SystemStatus, Subsystem, Health};
pub use notification::{Notification, NotificationLevel, ActivityEntry, ActivityStatus};

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
