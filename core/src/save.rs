//! Save snapshot — the persistence wire format.
//!
//! The snapshot carries only the mutable overlay (power scalars, owned
//! counts, unlock flags, purchase flags); catalog defaults are the base
//! on load, so the catalog can gain generators or upgrades without
//! breaking old saves. Field names follow the on-disk JSON.
//!
//! Loaded snapshots are sanitized once at this boundary: every field
//! defaults when missing, unknown fields are ignored, and non-finite or
//! negative scalars are clamped to zero. Past this point the engine
//! assumes well-formed data.

use crate::state::GameState;
use crate::types::{GeneratorId, TimestampMs, UpgradeId};
use serde::{Deserialize, Serialize};

/// Cadence of the external autosave timer.
pub const SAVE_INTERVAL_MS: TimestampMs = 30_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveData {
    pub power: f64,
    pub total_power: f64,
    /// Unix-epoch milliseconds of the last successful save.
    pub last_save: TimestampMs,
    pub generators: Vec<GeneratorSave>,
    pub upgrades: Vec<UpgradeSave>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSave {
    pub id: GeneratorId,
    pub owned: u32,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeSave {
    pub id: UpgradeId,
    pub purchased: bool,
}

impl SaveData {
    /// Extract a snapshot from live state, stamped with `now_ms`.
    pub fn from_state(state: &GameState, now_ms: TimestampMs) -> Self {
        Self {
            power: state.power,
            total_power: state.total_power,
            last_save: now_ms,
            generators: state
                .generators
                .iter()
                .map(|g| GeneratorSave {
                    id: g.id.clone(),
                    owned: g.owned,
                    unlocked: g.unlocked,
                })
                .collect(),
            upgrades: state
                .upgrades
                .iter()
                .map(|u| UpgradeSave {
                    id: u.id.clone(),
                    purchased: u.purchased,
                })
                .collect(),
        }
    }

    /// Clamp degenerate scalars so the engine never sees NaN, infinity
    /// or a negative balance from disk.
    pub fn sanitize(mut self) -> Self {
        self.power = clamp_non_negative(self.power);
        self.total_power = clamp_non_negative(self.total_power);
        if self.last_save < 0 {
            self.last_save = 0;
        }
        self
    }
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
