//! The economy engine — the heart of the game.
//!
//! RULES:
//!   - The engine owns GameState exclusively; collaborators go through
//!     its methods, never through shared state.
//!   - Derived values (click power, power/sec, costs) are pure
//!     functions of current state, recomputed on demand.
//!   - Transactions are atomic: fully applied or fully rejected, with
//!     rejection reported as `false`, never as an error.
//!   - A non-finite intermediate result is clamped to 0 before it can
//!     reach a stored balance.
//!   - Persistence failures are logged and swallowed; they never
//!     surface through a transaction result.

use crate::{
    catalog::{self, Catalog, UpgradeKind},
    clock::Clock,
    error::GameResult,
    save::SaveData,
    state::{GameState, Generator, Upgrade},
    store::SaveStore,
    types::TimestampMs,
};

/// Offline catch-up runs at half rate unless the offline-progress
/// upgrade has been purchased, which raises it to full rate.
const OFFLINE_RATE_BASE: f64 = 0.5;
const OFFLINE_RATE_UPGRADED: f64 = 1.0;

pub struct GameEngine {
    catalog:     Catalog,
    state:       GameState,
    store:       SaveStore,
    clock:       Clock,
    initialized: bool,
}

impl GameEngine {
    pub fn new(catalog: Catalog, store: SaveStore, clock: Clock) -> Self {
        let state = GameState::from_catalog(&catalog, clock.now_ms());
        Self {
            catalog,
            state,
            store,
            clock,
            initialized: false,
        }
    }

    /// Engine over the system clock. The runner's entry point.
    pub fn build(catalog: Catalog, store: SaveStore) -> Self {
        Self::new(catalog, store, Clock::system())
    }

    /// Engine over the builtin catalog, an in-memory store and a clock
    /// frozen at `now_ms`. Used in tests.
    pub fn build_test(now_ms: TimestampMs) -> GameResult<Self> {
        let store = SaveStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(Catalog::builtin(), store, Clock::fixed(now_ms)))
    }

    // ── Read accessors ─────────────────────────────────────────

    pub fn power(&self) -> f64 {
        self.state.power
    }

    pub fn total_power(&self) -> f64 {
        self.state.total_power
    }

    pub fn last_save(&self) -> TimestampMs {
        self.state.last_save
    }

    pub fn generators(&self) -> &[Generator] {
        &self.state.generators
    }

    pub fn upgrades(&self) -> &[Upgrade] {
        &self.state.upgrades
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    // ── Derived values ─────────────────────────────────────────

    /// Manual click yield: base 1, plus the flat click bonus if
    /// purchased, then times the click multiplier if purchased. The
    /// additive bonus applies strictly before the multiplicative one.
    pub fn click_power(&self) -> f64 {
        let mut base = 1.0;
        if let Some(u) = self.state.purchased_upgrade(catalog::FOCUSED_LENS) {
            base += u.effect.unwrap_or(0.0);
        }
        if let Some(u) = self.state.purchased_upgrade(catalog::SOLAR_CONCENTRATORS) {
            base *= u.multiplier.unwrap_or(1.0);
        }
        base
    }

    /// Fraction of power/sec each click additionally yields, once the
    /// quantum-tap upgrade is purchased. 0 otherwise.
    pub fn quantum_tap_bonus(&self) -> f64 {
        self.state
            .purchased_upgrade(catalog::QUANTUM_TAP)
            .and_then(|u| u.effect)
            .unwrap_or(0.0)
    }

    /// Product of every purchased generator-kind upgrade targeting
    /// `generator_id`. 1 when none apply.
    pub fn applied_generator_multiplier(&self, generator_id: &str) -> f64 {
        self.state
            .upgrades
            .iter()
            .filter(|u| {
                u.purchased
                    && u.kind == UpgradeKind::Generator
                    && u.generator_id.as_deref() == Some(generator_id)
            })
            .map(|u| u.multiplier.unwrap_or(1.0))
            .product()
    }

    /// Aggregate passive production across all unlocked generators,
    /// scaled by any purchased global multiplier raised to the number
    /// of distinct generator kinds owned. Never NaN: a degenerate
    /// computation yields 0.
    pub fn power_per_second(&self) -> f64 {
        let mut total = 0.0;
        for g in self.state.generators.iter().filter(|g| g.unlocked) {
            total += g.base_output * self.applied_generator_multiplier(&g.id) * g.owned as f64;
        }

        let owned_kinds = self
            .state
            .generators
            .iter()
            .filter(|g| g.owned > 0)
            .count() as i32;
        for u in &self.state.upgrades {
            if u.purchased && u.kind == UpgradeKind::Global {
                if let Some(m) = u.multiplier {
                    total *= m.powi(owned_kinds);
                }
            }
        }

        if total.is_finite() {
            total
        } else {
            0.0
        }
    }

    // ── Transactions ───────────────────────────────────────────

    /// Buy one unit of a generator. `false` (and no state change) on
    /// unknown id or insufficient power.
    pub fn buy_generator(&mut self, id: &str) -> bool {
        self.buy_generator_units(id, 1)
    }

    /// Buy `amount` units of a generator at the one-at-a-time price.
    /// `amount = 0` always fails.
    pub fn buy_generator_bulk(&mut self, id: &str, amount: u32) -> bool {
        if amount == 0 {
            return false;
        }
        self.buy_generator_units(id, amount)
    }

    fn buy_generator_units(&mut self, id: &str, amount: u32) -> bool {
        let Some(idx) = self.state.generators.iter().position(|g| g.id == id) else {
            return false;
        };
        let cost = self.state.generators[idx].cost_for_amount(amount);
        if self.state.power < cost {
            return false;
        }

        self.state.power -= cost;
        self.state.generators[idx].owned += amount;

        self.check_unlocks();
        self.save();
        true
    }

    /// Buy an upgrade. `false` on unknown id, already purchased, or
    /// insufficient power.
    pub fn buy_upgrade(&mut self, id: &str) -> bool {
        let Some(idx) = self.state.upgrades.iter().position(|u| u.id == id) else {
            return false;
        };
        let cost = self.state.upgrades[idx].cost;
        if self.state.upgrades[idx].purchased || self.state.power < cost {
            return false;
        }

        self.state.power -= cost;
        self.state.upgrades[idx].purchased = true;

        self.save();
        true
    }

    /// Manual click. Returns the power gained.
    pub fn click_sun(&mut self) -> f64 {
        let mut gain = self.click_power() + self.power_per_second() * self.quantum_tap_bonus();
        if !gain.is_finite() {
            gain = 0.0;
        }
        self.state.power += gain;
        self.state.total_power += gain;
        gain
    }

    /// Passive-accumulation entry point, driven by the external tick
    /// timer. Non-finite amounts are ignored entirely; sign is not
    /// clamped — the tick driver never supplies negative amounts.
    pub fn add_power(&mut self, amount: f64) {
        if !amount.is_finite() {
            return;
        }
        self.state.power += amount;
        self.state.total_power += amount;
    }

    // ── Unlock propagation ─────────────────────────────────────

    /// Positional unlock chain over catalog order: generator `i`
    /// (from the fourth onward) unlocks once generator `i - 1` is
    /// owned. Idempotent; unlocks are never revoked. Re-run after any
    /// bulk load so stale flags self-heal from owned counts.
    pub fn check_unlocks(&mut self) {
        for i in 3..self.state.generators.len() {
            if self.state.generators[i - 1].owned > 0 {
                self.state.generators[i].unlocked = true;
            }
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────

    /// Load the persisted snapshot (if any), overlay it onto catalog
    /// defaults, grant offline progress, and self-heal unlock flags.
    /// Guarded: repeat calls are no-ops.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        if let Some(save) = self.store.load_game() {
            self.state.power = save.power;
            self.state.total_power = save.total_power;
            self.state.last_save = save.last_save;

            // Overlay mutable fields for ids still in the catalog.
            // Snapshot-only ids are dropped; catalog-only ids keep
            // their defaults.
            for saved in &save.generators {
                if let Some(g) = self.state.generator_mut(&saved.id) {
                    g.owned = saved.owned;
                    g.unlocked = saved.unlocked;
                }
            }
            for saved in &save.upgrades {
                if let Some(u) = self.state.upgrade_mut(&saved.id) {
                    u.purchased = saved.purchased;
                }
            }

            if save.last_save > 0 {
                let offline_secs = (self.clock.now_ms() - save.last_save) as f64 / 1000.0;
                if offline_secs > 0.0 {
                    let gain =
                        self.power_per_second() * offline_secs * self.offline_multiplier();
                    if gain.is_finite() && gain > 0.0 {
                        self.state.power += gain;
                        self.state.total_power += gain;
                        log::info!(
                            "Offline for {offline_secs:.0}s, granted {gain:.1} power"
                        );
                    }
                }
            }
        }

        self.initialized = true;
        self.check_unlocks();
    }

    /// Unconditional reset to fresh catalog defaults. Also erases the
    /// stored snapshot.
    pub fn reset_game(&mut self) {
        self.state = GameState::from_catalog(&self.catalog, self.clock.now_ms());
        if let Err(e) = self.store.clear_save() {
            log::warn!("Failed to clear stored save: {e}");
        }
    }

    // ── Persistence ────────────────────────────────────────────

    /// Persist current state. Invoked after every purchase and by the
    /// external autosave timer. Failures are logged, never propagated.
    pub fn save(&mut self) {
        let now = self.clock.now_ms();
        let snapshot = SaveData::from_state(&self.state, now);
        match self.store.save_game(&snapshot, now) {
            Ok(()) => {
                self.state.last_save = now;
                log::debug!("Game saved");
            }
            Err(e) => log::warn!("Save failed (will retry on next cadence): {e}"),
        }
    }

    /// Read-only snapshot of current state, stamped with the current
    /// `last_save`. For collaborators that persist out-of-band.
    pub fn snapshot(&self) -> SaveData {
        SaveData::from_state(&self.state, self.state.last_save)
    }

    fn offline_multiplier(&self) -> f64 {
        if self.state.purchased_upgrade(catalog::OFFLINE_PROGRESS).is_some() {
            OFFLINE_RATE_UPGRADED
        } else {
            OFFLINE_RATE_BASE
        }
    }
}
