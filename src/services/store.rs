use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::broadcast;
use crate::models::{
    ActivityEntry, AlertDirection, Asset, CustomAlert, LedgerEntry, Notification,
    NotificationLevel, Portfolio, RankedPool, RiskAlert, Signal, SystemStatus,
};
use super::alerts::AlertError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    #[default]
    Idle,
    Syncing,
    Success,
    Fallback,
}

/// Everything the dashboard renders
#[derive(Debug, Default)]
pub struct DashboardState {
    pub assets: Vec<Asset>,
    pub signals: Vec<Signal>,
    pub ledger: Vec<LedgerEntry>,
    pub portfolio: Portfolio,
    pub pools: Vec<RankedPool>,
    pub risk_alerts: Vec<RiskAlert>,
    pub custom_alerts: Vec<CustomAlert>,
    pub status: SystemStatus,
    pub phase: SyncPhase,
    pub last_sync: Option<DateTime<Utc>>,
    pub notification: Option<Notification>,
    pub activity: VecDeque<ActivityEntry>,
    last_alert_id: i64,
}

/// Listener on (assets, custom alerts). Runs under the store's write
/// lock, so it must not call back into the store.
pub trait StateObserver: Send + Sync {
    fn name(&self) -> &'static str;
    fn on_change(&self, state: &mut DashboardState) -> Vec<Notification>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub assets: Vec<Asset>,
    pub signals: Vec<Signal>,
    pub ledger: Vec<LedgerEntry>,
    pub portfolio: Portfolio,
    pub pools: Vec<RankedPool>,
    pub optimal_pool: Option<RankedPool>,
    pub risk_alerts: Vec<RiskAlert>,
    pub custom_alerts: Vec<CustomAlert>,
    pub status: SystemStatus,
    pub phase: SyncPhase,
    pub last_sync: Option<DateTime<Utc>>,
    pub notification: Option<Notification>,
    pub activity: Vec<ActivityEntry>,
    pub dark_mode: bool,
}

pub struct DashboardStore {
    state: RwLock<DashboardState>,
    observers: RwLock<Vec<Arc<dyn StateObserver>>>,
    notifier: broadcast::Sender<Notification>,
    notification_ttl: u64,
    log_capacity: usize,
}

impl DashboardStore {
    pub fn new(notification_ttl: u64, log_capacity: usize) -> Self {
        let (notifier, _) = broadcast::channel(64);
        Self {
            state: RwLock::new(DashboardState::default()),
            observers: RwLock::new(Vec::new()),
            notifier,
            notification_ttl,
            log_capacity: log_capacity.max(1),
        }
    }

    pub fn register(&self, observer: Arc<dyn StateObserver>) {
        tracing::debug!("Registered state observer {}", observer.name());
        self.observers.write().push(observer);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    pub fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&*self.state.read())
    }

    /// Mutate fields no observer watches
    pub fn update<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        f(&mut *self.state.write())
    }

    /// Mutate assets or custom alerts, then run every observer once
    pub fn update_watched<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        let (result, notes) = {
            let mut state = self.state.write();
            let result = f(&mut *state);

            let observers = self.observers.read();
            let notes: Vec<Notification> = observers
                .iter()
                .flat_map(|o| o.on_change(&mut *state))
                .collect();
            (result, notes)
        };

        for note in notes {
            self.publish(note);
        }
        result
    }

    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.publish(Notification::new(level, message, self.notification_ttl));
    }

    fn publish(&self, note: Notification) {
        self.state.write().notification = Some(note.clone());
        // no subscribers is fine
        let _ = self.notifier.send(note);
    }

    /// Newest first, bounded
    pub fn log_activity(&self, entry: ActivityEntry) {
        let mut state = self.state.write();
        state.activity.push_front(entry);
        state.activity.truncate(self.log_capacity);
    }

    pub fn add_alert(&self, coin: &str, price: f64, direction: AlertDirection) -> Result<CustomAlert, AlertError> {
        let coin = coin.trim();
        if coin.is_empty() {
            self.notify(NotificationLevel::Warning, "⚠️ Please fill in coin and price!");
            return Err(AlertError::MissingCoin);
        }
        if !price.is_finite() || price <= 0.0 {
            self.notify(NotificationLevel::Warning, "⚠️ Please fill in coin and price!");
            return Err(AlertError::InvalidPrice);
        }

        let alert = self.update_watched(|state| {
            let id = Utc::now().timestamp_millis().max(state.last_alert_id + 1);
            state.last_alert_id = id;

            let alert = CustomAlert {
                id,
                coin: coin.to_string(),
                price,
                direction,
                active: true,
            };
            state.custom_alerts.push(alert.clone());
            alert
        });

        tracing::info!("🔔 Alert {} added: {} {} {}", alert.id, alert.coin, direction.as_str(), price);
        self.notify(NotificationLevel::Success, format!("🔔 Alert added for {} @ ${}!", alert.coin, price));
        Ok(alert)
    }

    pub fn remove_alert(&self, id: i64) -> bool {
        let removed = self.update_watched(|state| {
            let before = state.custom_alerts.len();
            state.custom_alerts.retain(|a| a.id != id);
            before != state.custom_alerts.len()
        });

        if removed {
            self.notify(NotificationLevel::Info, "🗑️ Alert removed!");
        }
        removed
    }

    pub fn snapshot(&self, dark_mode: bool) -> DashboardSnapshot {
        let state = self.state.read();
        let now = Utc::now();

        DashboardSnapshot {
            assets: state.assets.clone(),
            signals: state.signals.clone(),
            ledger: state.ledger.clone(),
            portfolio: state.portfolio,
            pools: state.pools.clone(),
            optimal_pool: state.pools.first().cloned(),
            risk_alerts: state.risk_alerts.clone(),
            custom_alerts: state.custom_alerts.clone(),
            status: state.status.clone(),
            phase: state.phase,
            last_sync: state.last_sync,
            notification: state.notification.clone().filter(|n| !n.is_expired(now)),
            activity: state.activity.iter().cloned().collect(),
            dark_mode,
        }
    }
}
