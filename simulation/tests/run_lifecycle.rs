use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use desktop_defender_core::{
    EnemyView, Event, EventKind, GameState, Overlap, PlayerProfile, ProjectileView, RunState,
    TurretSnapshot, UpgradeKind, Vec2, WeaponKind,
};
use desktop_defender_simulation::{
    save, CollisionLayer, Simulation, SimulationConfig, SimulationError,
};
use desktop_defender_world::query;

const DT_MS: f32 = 16.0;

/// Reports every enemy as touching the turret.
struct EverythingTouches;

impl CollisionLayer for EverythingTouches {
    fn overlaps(
        &mut self,
        _turret: &TurretSnapshot,
        enemies: &EnemyView,
        _projectiles: &ProjectileView,
        out: &mut Vec<Overlap>,
    ) {
        out.extend(enemies.iter().map(|enemy| Overlap::EnemyTurret { enemy: enemy.id }));
    }
}

fn run(turret_health: u32, gold: u64) -> RunState {
    RunState {
        current_wave: 3,
        turret_health,
        turret_max_health: 100,
        gold,
        total_gold_earned: 400,
        level: 2,
        current_xp: 0,
        upgrade_levels: BTreeMap::new(),
        equipped_gear: BTreeMap::new(),
        inventory: Vec::new(),
        active_weapon_id: WeaponKind::Basic,
        enemies_killed_this_run: 25,
        run_start_time: 1_000,
        run_duration: 60_000,
    }
}

fn resumed(run: RunState) -> Simulation {
    let state = GameState {
        version: 1,
        last_saved: 0,
        profile: PlayerProfile::default(),
        run: Some(run),
    };
    Simulation::resume(SimulationConfig::default(), state).expect("resume")
}

#[test]
fn game_over_fires_once_and_freezes_the_run() {
    let mut simulation = resumed(run(1, 0)).with_collision_layer(Box::new(EverythingTouches));
    let overs = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&overs);
    let _ = simulation
        .bus_mut()
        .subscribe(EventKind::GameOver, move |event| sink.borrow_mut().push(event.clone()));

    for _ in 0..1_000 {
        simulation.update(DT_MS);
    }

    assert_eq!(*overs.borrow(), vec![Event::GameOver { wave: 3 }]);
    assert!(simulation.is_game_over());
    assert_eq!(simulation.run_state(), None);
    assert_eq!(simulation.game_state(5).run, None);
    assert_eq!(
        simulation.purchase_upgrade(UpgradeKind::Damage),
        Err(SimulationError::RunOver)
    );

    let reward = simulation.finish_run().expect("first finish");
    assert!(reward >= 1);
    assert_eq!(simulation.profile().total_ascendium, reward);
    assert_eq!(simulation.profile().highest_wave_ever, 3);
    assert_eq!(simulation.profile().total_enemies_killed, 25);
    assert_eq!(simulation.finish_run(), Err(SimulationError::AlreadyFinished));
}

#[test]
fn finishing_a_live_run_is_refused() {
    let mut simulation = Simulation::new(SimulationConfig::default(), PlayerProfile::default())
        .expect("basic weapon");
    assert_eq!(simulation.finish_run(), Err(SimulationError::RunInProgress));
}

#[test]
fn purchases_reach_the_turret_and_publish_next_tick() {
    let mut simulation = resumed(run(80, 100));
    assert_eq!(simulation.purchase_upgrade(UpgradeKind::Range), Ok(1));
    assert_eq!(query::turret(simulation.world()).stats.range, 210.0);
    assert_eq!(simulation.progression().gold(), 80);

    simulation.update(DT_MS);
    assert!(simulation.last_events().contains(&Event::UpgradePurchased {
        upgrade: UpgradeKind::Range,
        new_level: 1
    }));
}

#[test]
fn autosave_is_requested_on_the_configured_cadence() {
    let config = SimulationConfig {
        autosave_interval_ms: 1_000.0,
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::new(config, PlayerProfile::default()).expect("basic weapon");
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let _ = simulation
        .bus_mut()
        .subscribe(EventKind::AutosaveRequested, move |_| *counter.borrow_mut() += 1);

    for _ in 0..130 {
        simulation.update(DT_MS);
    }

    assert_eq!(*count.borrow(), 2);
}

#[test]
fn locked_weapons_are_refused() {
    let config = SimulationConfig {
        starting_weapon: WeaponKind::Tesla,
        ..SimulationConfig::default()
    };
    assert_eq!(
        Simulation::new(config, PlayerProfile::default()).err(),
        Some(SimulationError::WeaponLocked(WeaponKind::Tesla))
    );

    let mut simulation = Simulation::new(SimulationConfig::default(), PlayerProfile::default())
        .expect("basic weapon");
    assert_eq!(
        simulation.select_weapon(WeaponKind::Laser),
        Err(SimulationError::WeaponLocked(WeaponKind::Laser))
    );
    assert_eq!(simulation.weapon(), WeaponKind::Basic);
}

#[test]
fn resize_recentres_the_turret() {
    let mut simulation = Simulation::new(SimulationConfig::default(), PlayerProfile::default())
        .expect("basic weapon");
    assert_eq!(query::turret(simulation.world()).position, Vec2::new(150.0, 150.0));
    simulation.resize(Vec2::new(640.0, 480.0));
    assert_eq!(query::turret(simulation.world()).position, Vec2::new(320.0, 240.0));
}

#[test]
fn saved_run_round_trips_through_json() {
    let mut simulation = resumed(run(80, 100));
    for _ in 0..50 {
        simulation.update(DT_MS);
    }
    let state = simulation.game_state(42);
    let restored = save::decode(&save::encode(&state).expect("encode")).expect("decode");
    assert_eq!(restored, state);
    let run = restored.run.expect("run in progress");
    assert_eq!(run.current_wave, 3);
    assert_eq!(run.run_start_time, 1_000);
    assert_eq!(run.run_duration, 60_800);
}
