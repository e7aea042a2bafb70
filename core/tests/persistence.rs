//! Save/load contract tests: tolerance of bad payloads, round-trips,
//! and the reset transaction.

use solar_core::{
    catalog::Catalog,
    clock::Clock,
    engine::GameEngine,
    save::{GeneratorSave, SaveData},
    state::GameState,
    store::SaveStore,
};

const NOW: i64 = 1_722_000_000_000;

fn engine_with_save(save: &SaveData) -> GameEngine {
    let store = SaveStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.save_game(save, NOW).unwrap();
    let mut engine = GameEngine::new(Catalog::builtin(), store, Clock::fixed(NOW));
    engine.initialize();
    engine
}

#[test]
fn round_trip_reproduces_state() {
    let mut original = GameEngine::build_test(NOW).unwrap();
    original.add_power(5_000.0);
    assert!(original.buy_generator("solar_array"));
    assert!(original.buy_generator("solar_array"));
    assert!(original.buy_generator("lunar_collector"));
    assert!(original.buy_upgrade("efficiency_1"));
    original.save();

    let stored = original.store().load_game().expect("save should exist");
    let restored = engine_with_save(&stored);

    assert_eq!(restored.power(), original.power());
    assert_eq!(restored.total_power(), original.total_power());
    assert_eq!(restored.last_save(), original.last_save());
    for g in original.generators() {
        let r = restored.state().generator(&g.id).unwrap();
        assert_eq!(r.owned, g.owned, "owned mismatch for {}", g.id);
        assert_eq!(r.unlocked, g.unlocked, "unlocked mismatch for {}", g.id);
    }
    for u in original.upgrades() {
        let r = restored.state().upgrade(&u.id).unwrap();
        assert_eq!(r.purchased, u.purchased, "purchased mismatch for {}", u.id);
    }
}

#[test]
fn snapshot_extraction_matches_store_contents() {
    let mut engine = GameEngine::build_test(NOW).unwrap();
    engine.add_power(100.0);
    assert!(engine.buy_generator("solar_array"));
    engine.save();

    assert_eq!(engine.snapshot(), engine.store().load_game().unwrap());
}

#[test]
fn malformed_payload_is_treated_as_no_save() {
    let store = SaveStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.save_payload("{definitely not json", NOW).unwrap();

    assert!(store.load_game().is_none());

    let mut engine = GameEngine::new(Catalog::builtin(), store, Clock::fixed(NOW));
    engine.initialize();
    assert_eq!(engine.power(), 0.0, "fresh start after unreadable save");
}

#[test]
fn extra_fields_in_payload_are_ignored() {
    let store = SaveStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
        .save_payload(
            r#"{"power":42.0,"totalPower":42.0,"lastSave":1,"generators":[],"upgrades":[],"cloudSyncId":"abc","version":9}"#,
            NOW,
        )
        .unwrap();

    let loaded = store.load_game().expect("extra fields must not break parsing");
    assert_eq!(loaded.power, 42.0);
}

#[test]
fn missing_fields_default() {
    let store = SaveStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.save_payload(r#"{"power":12.5}"#, NOW).unwrap();

    let loaded = store.load_game().unwrap();
    assert_eq!(loaded.power, 12.5);
    assert_eq!(loaded.total_power, 0.0);
    assert_eq!(loaded.last_save, 0);
    assert!(loaded.generators.is_empty());
    assert!(loaded.upgrades.is_empty());
}

#[test]
fn negative_scalars_are_sanitized_on_load() {
    let store = SaveStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
        .save_payload(
            r#"{"power":-50.0,"totalPower":-1.0,"lastSave":-12345,"generators":[],"upgrades":[]}"#,
            NOW,
        )
        .unwrap();

    let loaded = store.load_game().unwrap();
    assert_eq!(loaded.power, 0.0);
    assert_eq!(loaded.total_power, 0.0);
    assert_eq!(loaded.last_save, 0);
}

#[test]
fn snapshot_ids_missing_from_catalog_are_dropped() {
    let save = SaveData {
        power: 10.0,
        total_power: 10.0,
        last_save: NOW,
        generators: vec![GeneratorSave {
            id: "tachyon_mine".into(),
            owned: 99,
            unlocked: true,
        }],
        upgrades: vec![],
    };
    let engine = engine_with_save(&save);

    assert!(engine.state().generator("tachyon_mine").is_none());
    assert!(engine.generators().iter().all(|g| g.owned == 0));
    assert_eq!(engine.power(), 10.0);
}

#[test]
fn catalog_entries_missing_from_snapshot_keep_defaults() {
    let save = SaveData {
        power: 0.0,
        total_power: 0.0,
        last_save: NOW,
        generators: vec![GeneratorSave {
            id: "lunar_collector".into(),
            owned: 3,
            unlocked: true,
        }],
        upgrades: vec![],
    };
    let engine = engine_with_save(&save);

    // Entries the old save never mentioned stay at catalog defaults,
    // so a catalog can grow without breaking old saves.
    let solar = engine.state().generator("solar_array").unwrap();
    assert_eq!(solar.owned, 0);
    assert!(solar.unlocked);
    let sphere = engine.state().generator("dyson_sphere").unwrap();
    assert!(!sphere.unlocked);
}

#[test]
fn reset_restores_catalog_defaults() {
    let mut engine = GameEngine::build_test(NOW).unwrap();
    engine.add_power(10_000.0);
    assert!(engine.buy_generator("fusion_plant"));
    assert!(engine.buy_upgrade("focused_lens"));

    engine.reset_game();

    let expected = GameState::from_catalog(&Catalog::builtin(), NOW);
    assert_eq!(engine.state(), &expected);
}

#[test]
fn reset_clears_the_stored_save() {
    let mut engine = GameEngine::build_test(NOW).unwrap();
    engine.add_power(100.0);
    assert!(engine.buy_generator("solar_array"));
    assert!(engine.store().load_game().is_some());

    engine.reset_game();

    assert!(engine.store().load_game().is_none());
}

#[test]
fn successive_resets_are_independent() {
    let mut engine = GameEngine::build_test(NOW).unwrap();

    engine.reset_game();
    engine.add_power(100.0);
    assert!(engine.buy_generator("solar_array"));

    // Mutations after the first reset must not bleed into the next
    // reset's defaults.
    engine.reset_game();
    let expected = GameState::from_catalog(&Catalog::builtin(), NOW);
    assert_eq!(engine.state(), &expected);
}
