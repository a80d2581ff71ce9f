use crate::models::{Asset, CustomAlert, Notification, NotificationLevel};
use super::store::{DashboardState, StateObserver};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AlertError {
    #[error("coin is required")]
    MissingCoin,
    #[error("target price must be a positive number")]
    InvalidPrice,
}

/// A custom alert that just crossed its threshold
#[derive(Debug, Clone, PartialEq)]
pub struct AlertTrigger {
    pub alert_id: i64,
    pub symbol: String,
    pub price: f64,
    pub target: f64,
    pub direction: crate::models::AlertDirection,
}

/// Tests active alerts against current prices. Triggered alerts are
/// switched off here and never looked at again.
pub fn evaluate(assets: &[Asset], alerts: &mut [CustomAlert]) -> Vec<AlertTrigger> {
    let mut triggers = Vec::new();

    for alert in alerts.iter_mut().filter(|a| a.active) {
        let Some(asset) = assets.iter().find(|a| alert.matches(&a.symbol)) else {
            continue;
        };

        if alert.direction.is_crossed(asset.price, alert.price) {
            alert.active = false;
            triggers.push(AlertTrigger {
                alert_id: alert.id,
                symbol: asset.symbol.clone(),
                price: asset.price,
                target: alert.price,
                direction: alert.direction,
            });
        }
    }

    triggers
}

/// Store observer that re-runs `evaluate` whenever prices or alerts change
pub struct AlertEvaluator {
    notification_ttl: u64,
}

impl AlertEvaluator {
    pub fn new(notification_ttl: u64) -> Self {
        Self { notification_ttl }
    }
}

impl StateObserver for AlertEvaluator {
    fn name(&self) -> &'static str {
        "AlertEvaluator"
    }

    fn on_change(&self, state: &mut DashboardState) -> Vec<Notification> {
        evaluate(&state.assets, &mut state.custom_alerts)
            .into_iter()
            .map(|t| {
                tracing::info!("🚨 Alert {} fired: {} {} {} (now {})",
                    t.alert_id, t.symbol, t.direction.as_str(), t.target, t.price);
                Notification::new(
                    NotificationLevel::Warning,
                    format!("🚨 Alert! {} {} ${}!", t.symbol, t.direction.as_str(), t.target),
                    self.notification_ttl,
                )
            })
            .collect()
    }
}
