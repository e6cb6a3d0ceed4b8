#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Desktop Defender headless.
//!
//! The run advances in fixed ticks until the turret falls or the requested
//! simulated time elapses. Saves move in and out as single-line transfer
//! strings.

mod save_transfer;

use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use desktop_defender_core::{
    Event, EventKind, GameState, GearItem, PlayerProfile, UpgradeKind, WeaponKind,
};
use desktop_defender_simulation::{Simulation, SimulationConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Runs a Desktop Defender simulation without a window.
#[derive(Debug, Parser)]
#[command(name = "desktop-defender", version, about)]
struct Args {
    /// JSON file with simulation settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for every random stream of the run.
    #[arg(long)]
    seed: Option<u64>,
    /// Weapon to mount (basic, shotgun, laser, missile, tesla).
    #[arg(long)]
    weapon: Option<WeaponKind>,
    /// Simulated seconds to run before stopping.
    #[arg(long, default_value_t = 600)]
    seconds: u64,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16.0)]
    tick_ms: f32,
    /// File holding a save transfer string to resume from.
    #[arg(long)]
    load: Option<PathBuf>,
    /// File the save transfer string is written to when the run stops.
    #[arg(long)]
    save: Option<PathBuf>,
    /// Buy upgrades after each wave and equip better gear as it drops.
    #[arg(long)]
    autopilot: bool,
}

/// Entry point for the Desktop Defender command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut simulation = match args.load.as_deref() {
        Some(path) => {
            let state = load_save(path)?;
            let mut simulation =
                Simulation::resume(config, state).context("could not resume the saved run")?;
            if let Some(weapon) = args.weapon {
                simulation
                    .select_weapon(weapon)
                    .context("could not mount the requested weapon")?;
            }
            simulation
        }
        None => Simulation::new(config, PlayerProfile::default())
            .context("could not start a run")?
            .with_start_time(now_ms()),
    };

    let _ = simulation
        .bus_mut()
        .subscribe(EventKind::WaveComplete, |event| {
            if let Event::WaveComplete { wave } = event {
                info!(wave, "wave cleared");
            }
        });
    let _ = simulation.bus_mut().subscribe(EventKind::LevelUp, |event| {
        if let Event::LevelUp { level } = event {
            info!(level, "level up");
        }
    });

    let tick_ms = args.tick_ms.max(1.0);
    let ticks = (args.seconds as f64 * 1_000.0 / f64::from(tick_ms)).ceil() as u64;
    for _ in 0..ticks {
        simulation.update(tick_ms);
        if simulation.is_game_over() {
            break;
        }
        if args.autopilot {
            autopilot(&mut simulation);
        }
    }

    let progression = simulation.progression();
    println!(
        "wave {} | level {} | gold {} | kills {} | weapon {}",
        simulation.director().current_wave(),
        progression.level(),
        progression.gold(),
        progression.enemies_killed(),
        simulation.weapon(),
    );
    if simulation.is_game_over() {
        let reward = simulation
            .finish_run()
            .context("could not bank the finished run")?;
        println!("turret destroyed | earned {reward} ascendium");
    }

    if let Some(path) = &args.save {
        let encoded = save_transfer::encode(&simulation.game_state(now_ms()))
            .context("could not encode the save")?;
        fs::write(path, format!("{encoded}\n"))
            .with_context(|| format!("could not write save to {}", path.display()))?;
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("could not read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("could not parse config {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(weapon) = args.weapon {
        config.starting_weapon = weapon;
    }
    Ok(config)
}

fn load_save(path: &Path) -> Result<GameState> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read save {}", path.display()))?;
    save_transfer::decode(&text).with_context(|| format!("could not decode save {}", path.display()))
}

fn autopilot(simulation: &mut Simulation) {
    let drops: Vec<GearItem> = simulation
        .last_events()
        .iter()
        .filter_map(|event| match event {
            Event::LootDropped { item, .. } => Some(item.clone()),
            _ => None,
        })
        .collect();
    for item in drops {
        equip_if_better(simulation, &item);
    }

    let cleared = simulation
        .last_events()
        .iter()
        .any(|event| matches!(event, Event::WaveComplete { .. }));
    if cleared {
        buy_upgrades(simulation);
    }
}

fn equip_if_better(simulation: &mut Simulation, item: &GearItem) {
    let progression = simulation.progression();
    let held = progression
        .inventory()
        .iter()
        .any(|carried| carried.id == item.id);
    let better = progression
        .equipped()
        .get(&item.slot)
        .map_or(true, |worn| item.rarity > worn.rarity);
    if !held || !better {
        return;
    }
    if let Err(error) = simulation.equip(item.id) {
        warn!(%error, "autopilot could not equip gear");
        return;
    }

    let outclassed: Vec<_> = simulation
        .progression()
        .inventory()
        .iter()
        .filter(|carried| carried.slot == item.slot && carried.rarity <= item.rarity)
        .map(|carried| carried.id)
        .collect();
    for id in outclassed {
        match simulation.scrap(id) {
            Ok(gold) => info!(id = id.get(), gold, "autopilot scrapped gear"),
            Err(error) => warn!(%error, "autopilot could not scrap gear"),
        }
    }
}

fn buy_upgrades(simulation: &mut Simulation) {
    loop {
        let gold = simulation.progression().gold();
        let mut affordable: Vec<(u64, UpgradeKind)> = UpgradeKind::ALL
            .into_iter()
            .filter_map(|kind| {
                simulation
                    .progression()
                    .upgrade_cost(kind)
                    .map(|cost| (cost, kind))
            })
            .filter(|(cost, _)| *cost <= gold)
            .collect();
        affordable.sort();

        let bought = affordable.into_iter().find_map(|(_, kind)| {
            simulation
                .purchase_upgrade(kind)
                .ok()
                .map(|level| (kind, level))
        });
        match bought {
            Some((upgrade, level)) => info!(%upgrade, level, "autopilot bought upgrade"),
            None => break,
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}
