use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    Bibot,
    Lechat,
    Claude,
    Gemini,
}

impl Subsystem {
    pub const ALL: [Subsystem; 4] = [
        Subsystem::Bibot,
        Subsystem::Lechat,
        Subsystem::Claude,
        Subsystem::Gemini,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Online,
    Offline,
}

/// Subsystem health, always replaced wholesale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemStatus(BTreeMap<Subsystem, Health>);

impl SystemStatus {
    pub fn all_online() -> Self {
        Self(Subsystem::ALL.iter().map(|s| (*s, Health::Online)).collect())
    }

    /// Fallback posture: only the reasoning subsystem stays up
    pub fn degraded() -> Self {
        Self(
            Subsystem::ALL
                .iter()
                .map(|s| {
                    let health = if *s == Subsystem::Claude { Health::Online } else { Health::Offline };
                    (*s, health)
                })
                .collect(),
        )
    }

    pub fn get(&self, subsystem: Subsystem) -> Health {
        self.0.get(&subsystem).copied().unwrap_or(Health::Offline)
    }

    pub fn offline(&self) -> Vec<Subsystem> {
        Subsystem::ALL
            .into_iter()
            .filter(|s| self.get(*s) == Health::Offline)
            .collect()
    }
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self::all_online()
    }
}
