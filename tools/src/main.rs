//! solar-runner: headless driver for Solar Clicker.
//!
//! Hosts the two external timers the engine itself does not own — the
//! passive-accumulation tick and the autosave cadence — plus a
//! line-delimited JSON command loop for UIs.
//!
//! Usage:
//!   solar-runner --seconds 600 --db save.db
//!   solar-runner --interactive --db save.db
//!   solar-runner --validate-config data/game_config.json

mod format;

use anyhow::Result;
use format::{format_number, format_number_detailed};
use solar_core::{
    catalog::Catalog,
    clock::TICK_INTERVAL_MS,
    engine::GameEngine,
    save::SAVE_INTERVAL_MS,
    store::SaveStore,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Click,
    BuyGenerator { id: String },
    BuyGeneratorBulk { id: String, amount: u32 },
    BuyUpgrade { id: String },
    Tick { seconds: f64 },
    Save,
    Reset,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    power: f64,
    total_power: f64,
    power_per_second: f64,
    click_power: f64,
    generators: Vec<GeneratorView>,
    upgrades: Vec<UpgradeView>,
}

#[derive(serde::Serialize)]
struct GeneratorView {
    id: String,
    name: String,
    owned: u32,
    unlocked: bool,
    cost: f64,
}

#[derive(serde::Serialize)]
struct UpgradeView {
    id: String,
    name: String,
    description: String,
    cost: f64,
    purchased: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if let Some(path) = flag_value(&args, "--validate-config") {
        return validate_config(path);
    }

    let seconds = parse_arg(&args, "--seconds", 60u64);
    let interactive = args.iter().any(|a| a == "--interactive");
    let db = flag_value(&args, "--db").unwrap_or("solar_save.db");

    let catalog = match flag_value(&args, "--config") {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };

    if !interactive {
        println!("Solar Clicker — solar-runner");
        println!("  db:      {db}");
        println!("  seconds: {seconds}");
        println!();
    }

    let store = SaveStore::open(db)?;
    store.migrate()?;

    let mut engine = GameEngine::build(catalog, store);
    engine.initialize();

    if interactive {
        run_ipc_loop(&mut engine)?;
    } else {
        run_batch(&mut engine, seconds);
        print_summary(&engine, seconds);
    }

    engine.save();
    Ok(())
}

/// Validate a catalog file and report the result. Exit code carries
/// the verdict for CI use.
fn validate_config(path: &str) -> Result<()> {
    match Catalog::load(path) {
        Ok(catalog) => {
            println!(
                "OK: {path} ({} generators, {} upgrades)",
                catalog.generators.len(),
                catalog.upgrades.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("INVALID: {path}: {e}");
            std::process::exit(1);
        }
    }
}

/// Simulate `seconds` of play headlessly: the 100ms passive tick plus
/// the 30s autosave cadence, without sleeping.
fn run_batch(engine: &mut GameEngine, seconds: u64) {
    let ticks_per_second = (1000 / TICK_INTERVAL_MS) as u64;
    let delta_secs = TICK_INTERVAL_MS as f64 / 1000.0;
    let ticks_per_save = (SAVE_INTERVAL_MS / TICK_INTERVAL_MS) as u64;

    for tick in 1..=seconds * ticks_per_second {
        let pps = engine.power_per_second();
        engine.add_power(pps * delta_secs);
        if tick % ticks_per_save == 0 {
            engine.save();
        }
    }
}

fn run_ipc_loop(engine: &mut GameEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Rejected malformed command: {e}");
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        let performed = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => true,
            IpcCommand::Click => {
                engine.click_sun();
                true
            }
            IpcCommand::BuyGenerator { id } => engine.buy_generator(&id),
            IpcCommand::BuyGeneratorBulk { id, amount } => {
                engine.buy_generator_bulk(&id, amount)
            }
            IpcCommand::BuyUpgrade { id } => engine.buy_upgrade(&id),
            IpcCommand::Tick { seconds } => {
                let pps = engine.power_per_second();
                engine.add_power(pps * seconds);
                true
            }
            IpcCommand::Save => {
                engine.save();
                true
            }
            IpcCommand::Reset => {
                engine.reset_game();
                true
            }
        };

        let response = serde_json::json!({
            "performed": performed,
            "state": build_ui_state(engine),
        });
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(engine: &GameEngine) -> UiState {
    UiState {
        power: engine.power(),
        total_power: engine.total_power(),
        power_per_second: engine.power_per_second(),
        click_power: engine.click_power(),
        generators: engine
            .generators()
            .iter()
            .map(|g| GeneratorView {
                id: g.id.clone(),
                name: g.name.clone(),
                owned: g.owned,
                unlocked: g.unlocked,
                cost: g.cost(),
            })
            .collect(),
        upgrades: engine
            .upgrades()
            .iter()
            .map(|u| UpgradeView {
                id: u.id.clone(),
                name: u.name.clone(),
                description: u.description.clone(),
                cost: u.cost,
                purchased: u.purchased,
            })
            .collect(),
    }
}

fn print_summary(engine: &GameEngine, seconds: u64) {
    println!("=== RUN SUMMARY ===");
    println!("  simulated:   {seconds}s");
    println!("  power:       {}", format_number(engine.power()));
    println!("  lifetime:    {}", format_number(engine.total_power()));
    println!(
        "  power/sec:   {}",
        format_number_detailed(engine.power_per_second())
    );
    println!(
        "  click yield: {}",
        format_number_detailed(engine.click_power())
    );
    println!();
    println!("  generators:");
    for g in engine.generators().iter().filter(|g| g.unlocked) {
        println!(
            "    {:<20} owned {:<5} next {}",
            g.name,
            g.owned,
            format_number(g.cost())
        );
    }
    let purchased: Vec<&str> = engine
        .upgrades()
        .iter()
        .filter(|u| u.purchased)
        .map(|u| u.name.as_str())
        .collect();
    println!(
        "  upgrades:    {}",
        if purchased.is_empty() {
            "none".to_string()
        } else {
            purchased.join(", ")
        }
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
