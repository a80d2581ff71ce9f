use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient user-facing message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>, ttl_secs: u64) -> Self {
        let created_at = Utc::now();
        Self {
            level,
            message: message.into(),
            created_at,
            expires_at: created_at + Duration::seconds(ttl_secs as i64),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Success,
    Fallback,
    Failed,
}

/// Orchestrator activity log line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// "HH:MM" local time
    pub time: String,
    pub action: String,
    pub status: ActivityStatus,
    pub message: String,
}

impl ActivityEntry {
    pub fn now(action: impl Into<String>, status: ActivityStatus, message: impl Into<String>) -> Self {
        Self {
            time: Local::now().format("%H:%M").to_string(),
            action: action.into(),
            status,
            message: message.into(),
        }
    }

    pub fn at(time: &str, action: &str, status: ActivityStatus, message: &str) -> Self {
        Self {
            time: time.to_string(),
            action: action.to_string(),
            status,
            message: message.to_string(),
        }
    }
}
