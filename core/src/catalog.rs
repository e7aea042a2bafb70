//! Static game catalog — generator and upgrade definitions.
//!
//! The catalog is configuration, not state: it is loaded (or built in)
//! once at startup, validated, and then treated as read-only. Runtime
//! state (`owned`, `unlocked`, `purchased`) lives in [`crate::state`].
//!
//! Invalid catalog data is a fatal startup error for the enclosing
//! application. The engine itself trusts a validated catalog and never
//! re-validates.

use crate::types::{GeneratorId, UpgradeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// Well-known upgrade ids the derivation formulas look up directly.
// Everything else in the catalog is interpreted purely by its kind.
pub const FOCUSED_LENS: &str = "focused_lens";
pub const SOLAR_CONCENTRATORS: &str = "solar_concentrators";
pub const QUANTUM_TAP: &str = "quantum_tap";
pub const SYNERGY: &str = "synergy";
pub const OFFLINE_PROGRESS: &str = "offline_progress";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorDef {
    pub id: GeneratorId,
    pub name: String,
    pub base_cost: f64,
    /// Power/second at ownership 1 with no multipliers.
    pub base_output: f64,
    /// Whether the generator is visible from the start of a fresh game.
    #[serde(default)]
    pub unlocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKind {
    /// Modifies the manual click yield.
    Click,
    /// Multiplies one named generator's output.
    Generator,
    /// Scales aggregate production.
    Global,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: String,
    pub description: String,
    pub cost: f64,
    #[serde(rename = "type")]
    pub kind: UpgradeKind,
    /// Target generator; required for `Generator`-kind upgrades.
    #[serde(default)]
    pub generator_id: Option<GeneratorId>,
    #[serde(default)]
    pub effect: Option<f64>,
    #[serde(default)]
    pub multiplier: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    generators: Vec<GeneratorDef>,
    upgrades: Vec<UpgradeDef>,
}

/// The validated, ordered catalog. Order is display-significant and
/// drives the unlock chain.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub generators: Vec<GeneratorDef>,
    pub upgrades: Vec<UpgradeDef>,
}

impl Catalog {
    /// Load and validate `game_config.json` from a file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: CatalogFile = serde_json::from_str(&content)?;
        let catalog = Self {
            generators: file.generators,
            upgrades: file.upgrades,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Structural validation of a deserialized catalog.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.generators.is_empty() {
            anyhow::bail!("catalog defines no generators");
        }

        let mut generator_ids = HashSet::new();
        for g in &self.generators {
            if g.id.is_empty() {
                anyhow::bail!("generator with empty id");
            }
            if !generator_ids.insert(g.id.as_str()) {
                anyhow::bail!("duplicate generator id '{}'", g.id);
            }
            if !(g.base_cost > 0.0) {
                anyhow::bail!("generator '{}': baseCost must be positive", g.id);
            }
            if !(g.base_output >= 0.0) {
                anyhow::bail!("generator '{}': baseOutput must be non-negative", g.id);
            }
        }

        let mut upgrade_ids = HashSet::new();
        for u in &self.upgrades {
            if u.id.is_empty() {
                anyhow::bail!("upgrade with empty id");
            }
            if !upgrade_ids.insert(u.id.as_str()) {
                anyhow::bail!("duplicate upgrade id '{}'", u.id);
            }
            if !(u.cost > 0.0) {
                anyhow::bail!("upgrade '{}': cost must be positive", u.id);
            }
            if u.kind == UpgradeKind::Generator {
                let target = u
                    .generator_id
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("upgrade '{}': missing generatorId", u.id))?;
                if !generator_ids.contains(target) {
                    anyhow::bail!("upgrade '{}': unknown generatorId '{target}'", u.id);
                }
                if u.multiplier.is_none() {
                    anyhow::bail!("upgrade '{}': generator upgrades need a multiplier", u.id);
                }
            }
        }

        Ok(())
    }

    /// The shipped catalog, identical to `data/game_config.json`.
    /// Used by tests and as the no-config default for the runner.
    pub fn builtin() -> Self {
        let generator = |id: &str, name: &str, base_cost: f64, base_output: f64, unlocked: bool| {
            GeneratorDef {
                id: id.into(),
                name: name.into(),
                base_cost,
                base_output,
                unlocked,
            }
        };

        let generators = vec![
            generator("solar_array", "Solar Array", 10.0, 0.1, true),
            generator("lunar_collector", "Lunar Collector", 100.0, 1.0, true),
            generator("fusion_plant", "Fusion Plant", 1_000.0, 8.0, true),
            generator("asteroid_harvester", "Asteroid Harvester", 10_000.0, 50.0, false),
            generator("gas_giant_siphon", "Gas Giant Siphon", 100_000.0, 300.0, false),
            generator("dyson_swarm", "Dyson Swarm Node", 1_000_000.0, 2_000.0, false),
            generator("dyson_sphere", "Dyson Sphere", 100_000_000.0, 20_000.0, false),
        ];

        let upgrade = |id: &str,
                       name: &str,
                       description: &str,
                       cost: f64,
                       kind: UpgradeKind,
                       generator_id: Option<&str>,
                       effect: Option<f64>,
                       multiplier: Option<f64>| {
            UpgradeDef {
                id: id.into(),
                name: name.into(),
                description: description.into(),
                cost,
                kind,
                generator_id: generator_id.map(Into::into),
                effect,
                multiplier,
            }
        };

        let upgrades = vec![
            upgrade(
                FOCUSED_LENS,
                "Focused Lens",
                "+1 Power per click",
                50.0,
                UpgradeKind::Click,
                None,
                Some(1.0),
                None,
            ),
            upgrade(
                SOLAR_CONCENTRATORS,
                "Solar Concentrators",
                "+50% Power per click",
                500.0,
                UpgradeKind::Click,
                None,
                None,
                Some(1.5),
            ),
            upgrade(
                QUANTUM_TAP,
                "Quantum Tap",
                "Click gains 1% of Power/sec",
                5_000.0,
                UpgradeKind::Click,
                None,
                Some(0.01),
                None,
            ),
            upgrade(
                "efficiency_1",
                "Efficiency I",
                "+25% output for Solar Array",
                100.0,
                UpgradeKind::Generator,
                Some("solar_array"),
                None,
                Some(1.25),
            ),
            upgrade(
                "efficiency_2",
                "Efficiency II",
                "+50% output for Solar Array",
                500.0,
                UpgradeKind::Generator,
                Some("solar_array"),
                None,
                Some(1.5),
            ),
            upgrade(
                "efficiency_3",
                "Efficiency III",
                "+100% output for Solar Array",
                2_500.0,
                UpgradeKind::Generator,
                Some("solar_array"),
                None,
                Some(2.0),
            ),
            upgrade(
                "lunar_efficiency_1",
                "Lunar Efficiency I",
                "+25% output for Lunar Collector",
                1_000.0,
                UpgradeKind::Generator,
                Some("lunar_collector"),
                None,
                Some(1.25),
            ),
            upgrade(
                "fusion_efficiency_1",
                "Fusion Efficiency I",
                "+25% output for Fusion Plant",
                10_000.0,
                UpgradeKind::Generator,
                Some("fusion_plant"),
                None,
                Some(1.25),
            ),
            upgrade(
                SYNERGY,
                "Synergy",
                "Each generator type boosts others by 1%",
                50_000.0,
                UpgradeKind::Global,
                None,
                None,
                Some(1.01),
            ),
            upgrade(
                OFFLINE_PROGRESS,
                "Deep Space Relay",
                "Earn full Power while away",
                25_000.0,
                UpgradeKind::Global,
                None,
                None,
                None,
            ),
        ];

        let catalog = Self {
            generators,
            upgrades,
        };
        debug_assert!(catalog.validate().is_ok());
        catalog
    }
}
