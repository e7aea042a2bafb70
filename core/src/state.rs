//! Mutable game state — owned exclusively by the engine.
//!
//! Constructed once per session from the catalog; only the mutable
//! fields (`owned`, `unlocked`, `purchased`, the power scalars) ever
//! change afterwards. Catalog order is preserved: it is
//! display-significant and drives the unlock chain.

use crate::catalog::{Catalog, GeneratorDef, UpgradeDef, UpgradeKind};
use crate::types::{GeneratorId, TimestampMs, UpgradeId};

/// Cost-scaling base: each owned unit raises the next unit's price
/// by 15%.
pub const COST_GROWTH: f64 = 1.15;

#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    pub id: GeneratorId,
    pub name: String,
    pub base_cost: f64,
    pub base_output: f64,
    pub owned: u32,
    pub unlocked: bool,
}

impl Generator {
    fn from_def(def: &GeneratorDef) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            base_cost: def.base_cost,
            base_output: def.base_output,
            owned: 0,
            unlocked: def.unlocked,
        }
    }

    /// Price of the next unit: `floor(base_cost × COST_GROWTH^owned)`.
    pub fn cost(&self) -> f64 {
        (self.base_cost * COST_GROWTH.powi(self.owned as i32)).floor()
    }

    /// Total price of the next `amount` units bought one at a time.
    /// There is no bulk discount. `amount = 0` costs nothing.
    pub fn cost_for_amount(&self, amount: u32) -> f64 {
        (0..amount)
            .map(|i| (self.base_cost * COST_GROWTH.powi((self.owned + i) as i32)).floor())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upgrade {
    pub id: UpgradeId,
    pub name: String,
    pub description: String,
    pub cost: f64,
    pub kind: UpgradeKind,
    pub generator_id: Option<GeneratorId>,
    pub effect: Option<f64>,
    pub multiplier: Option<f64>,
    /// One-way latch: set on purchase, cleared only by a full reset.
    pub purchased: bool,
}

impl Upgrade {
    fn from_def(def: &UpgradeDef) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            description: def.description.clone(),
            cost: def.cost,
            kind: def.kind,
            generator_id: def.generator_id.clone(),
            effect: def.effect,
            multiplier: def.multiplier,
            purchased: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Spendable balance.
    pub power: f64,
    /// Lifetime total earned; never debited.
    pub total_power: f64,
    pub generators: Vec<Generator>,
    pub upgrades: Vec<Upgrade>,
    pub last_save: TimestampMs,
}

impl GameState {
    /// Fresh state from catalog defaults. Independent copies: mutating
    /// the result never touches the catalog.
    pub fn from_catalog(catalog: &Catalog, now_ms: TimestampMs) -> Self {
        Self {
            power: 0.0,
            total_power: 0.0,
            generators: catalog.generators.iter().map(Generator::from_def).collect(),
            upgrades: catalog.upgrades.iter().map(Upgrade::from_def).collect(),
            last_save: now_ms,
        }
    }

    pub fn generator(&self, id: &str) -> Option<&Generator> {
        self.generators.iter().find(|g| g.id == id)
    }

    pub fn generator_mut(&mut self, id: &str) -> Option<&mut Generator> {
        self.generators.iter_mut().find(|g| g.id == id)
    }

    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn upgrade_mut(&mut self, id: &str) -> Option<&mut Upgrade> {
        self.upgrades.iter_mut().find(|u| u.id == id)
    }

    /// The upgrade with `id`, only if it exists and has been purchased.
    pub fn purchased_upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrade(id).filter(|u| u.purchased)
    }
}
