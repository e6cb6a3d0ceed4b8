#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-order tick loop tying the world and every system together.
//!
//! A [`Simulation`] owns the world, the systems, the player profile and the
//! [`SignalBus`]. Each [`Simulation::update`] runs the wave director, entity
//! stepping, targeting and weapons, the collision pass, combat, the wave
//! completion check and progression in that order, then fans the tick's
//! events out to subscribers. Host actions between ticks (purchases, gear
//! changes) are applied immediately and their events are published with the
//! next tick.

mod collision;
mod config;
mod error;
pub mod save;

use desktop_defender_core::{
    profile::SAVE_VERSION, Command, Event, GameState, GearId, GearSlot, Overlap, PlayerProfile,
    RunState, SignalBus, UpgradeKind, Vec2, WeaponKind,
};
use desktop_defender_system_combat::Combat;
use desktop_defender_system_progression::{finish_run, Progression, RunSummary};
use desktop_defender_system_wave_director::WaveDirector;
use desktop_defender_system_weapons::{select_target, Weapons};
use desktop_defender_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

pub use collision::{CircleOverlap, CollisionLayer};
pub use config::{SimulationConfig, DEFAULT_AUTOSAVE_INTERVAL_MS};
pub use error::SimulationError;

/// Stream of the run seed reserved for weapon rolls.
const WEAPON_STREAM: u64 = 1;

/// A single run of the game, from the first wave to game over.
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    director: WaveDirector,
    weapons: Weapons,
    combat: Combat,
    progression: Progression,
    collision: Box<dyn CollisionLayer>,
    profile: PlayerProfile,
    bus: SignalBus,
    rng: ChaCha8Rng,
    overlaps: Vec<Overlap>,
    pending: Vec<Event>,
    last_events: Vec<Event>,
    run_start_time: u64,
    run_duration_ms: f64,
    autosave_ms: f32,
    game_over: bool,
    finished: bool,
}

impl Simulation {
    /// Starts a fresh run for `profile`.
    pub fn new(config: SimulationConfig, profile: PlayerProfile) -> Result<Self, SimulationError> {
        if !profile.has_weapon(config.starting_weapon) {
            return Err(SimulationError::WeaponLocked(config.starting_weapon));
        }
        let director = WaveDirector::new(config.seed, config.viewport);
        let progression = Progression::new(&profile, config.seed);
        let weapon = config.starting_weapon;
        info!(seed = config.seed, %weapon, "run started");
        Ok(Self::assemble(config, profile, director, progression, weapon, None))
    }

    /// Continues the run stored in `state`, or starts a fresh one when the
    /// save holds no run.
    pub fn resume(config: SimulationConfig, state: GameState) -> Result<Self, SimulationError> {
        let GameState { profile, run, .. } = state;
        let Some(run) = run else {
            return Self::new(config, profile);
        };
        if !profile.has_weapon(run.active_weapon_id) {
            return Err(SimulationError::WeaponLocked(run.active_weapon_id));
        }
        let director = WaveDirector::starting_at(config.seed, config.viewport, run.current_wave);
        let progression = Progression::resume(&profile, &run, config.seed);
        info!(wave = run.current_wave, "run resumed");
        Ok(Self::assemble(
            config,
            profile,
            director,
            progression,
            run.active_weapon_id,
            Some(&run),
        ))
    }

    fn assemble(
        config: SimulationConfig,
        profile: PlayerProfile,
        director: WaveDirector,
        progression: Progression,
        weapon: WeaponKind,
        run: Option<&RunState>,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        rng.set_stream(WEAPON_STREAM);
        let world = World::with_capacity(config.enemy_capacity, config.projectile_capacity);
        let mut simulation = Self {
            world,
            director,
            weapons: Weapons::new(weapon),
            combat: Combat::new(),
            progression,
            collision: Box::new(CircleOverlap),
            profile,
            bus: SignalBus::new(),
            rng,
            overlaps: Vec::new(),
            pending: Vec::new(),
            last_events: Vec::new(),
            run_start_time: run.map_or(0, |run| run.run_start_time),
            run_duration_ms: run.map_or(0.0, |run| run.run_duration as f64),
            autosave_ms: 0.0,
            game_over: false,
            finished: false,
            config,
        };

        let mut commands = vec![Command::PlaceTurret {
            position: simulation.config.viewport / 2.0,
        }];
        let mut events = Vec::new();
        simulation.progression.begin(&mut commands, &mut events);
        simulation.apply_all(&mut commands, &mut events);
        simulation.pending = events;
        simulation
    }

    /// Replaces the overlap source used by the collision pass.
    #[must_use]
    pub fn with_collision_layer(mut self, layer: Box<dyn CollisionLayer>) -> Self {
        self.collision = layer;
        self
    }

    /// Records the wall-clock start of the run, in milliseconds since the
    /// Unix epoch, for the persisted run state.
    #[must_use]
    pub fn with_start_time(mut self, run_start_time: u64) -> Self {
        self.run_start_time = run_start_time;
        self
    }

    /// Advances the run by `dt_ms` milliseconds. Does nothing after game over.
    pub fn update(&mut self, dt_ms: f32) {
        if self.game_over {
            return;
        }

        let mut events = std::mem::take(&mut self.pending);
        let mut commands = vec![Command::Tick { dt_ms }];
        self.apply_all(&mut commands, &mut events);

        self.director.spawn_phase(
            dt_ms,
            query::active_enemy_count(&self.world),
            &mut commands,
            &mut events,
        );
        commands.push(Command::StepEntities { dt_ms });
        self.apply_all(&mut commands, &mut events);

        let turret = query::turret(&self.world);
        let enemies = query::enemy_view(&self.world);
        let target = select_target(&turret, &enemies);
        self.weapons.handle(
            dt_ms,
            &turret,
            &enemies,
            target,
            &mut self.rng,
            &mut commands,
            &mut events,
        );
        self.apply_all(&mut commands, &mut events);

        let turret = query::turret(&self.world);
        let enemies = query::enemy_view(&self.world);
        let projectiles = query::projectile_view(&self.world);
        self.overlaps.clear();
        self.collision
            .overlaps(&turret, &enemies, &projectiles, &mut self.overlaps);
        self.combat
            .handle(&self.overlaps, &enemies, &projectiles, &mut commands);
        self.apply_all(&mut commands, &mut events);

        let mut reactions = Vec::new();
        self.director.observe(&events, &mut commands, &mut reactions);
        events.append(&mut reactions);
        self.apply_all(&mut commands, &mut events);

        let boss_alive = self
            .director
            .boss_enemy()
            .map_or(false, |boss| query::is_enemy_active(&self.world, boss));
        self.director.check_completion(
            query::active_enemy_count(&self.world),
            boss_alive,
            &mut events,
        );

        let turret = query::turret(&self.world);
        self.progression
            .handle(dt_ms, &events, &turret, &mut commands, &mut reactions);
        events.append(&mut reactions);
        self.apply_all(&mut commands, &mut events);

        self.run_duration_ms += f64::from(dt_ms);
        if query::turret(&self.world).health == 0 {
            self.game_over = true;
            let wave = self.director.current_wave();
            info!(wave, kills = self.progression.enemies_killed(), "turret destroyed");
            events.push(Event::GameOver { wave });
        } else {
            self.autosave_ms += dt_ms;
            if self.autosave_ms >= self.config.autosave_interval_ms {
                self.autosave_ms = 0.0;
                events.push(Event::AutosaveRequested);
            }
        }

        self.bus.publish_all(&events);
        self.last_events = events;
    }

    /// Buys the next level of `upgrade`, returning the new level.
    pub fn purchase_upgrade(&mut self, upgrade: UpgradeKind) -> Result<u32, SimulationError> {
        self.ensure_running()?;
        let mut commands = Vec::new();
        let mut events = Vec::new();
        let level = self
            .progression
            .purchase_upgrade(upgrade, &mut commands, &mut events)?;
        self.apply_all(&mut commands, &mut events);
        self.pending.append(&mut events);
        Ok(level)
    }

    /// Equips an inventory item.
    pub fn equip(&mut self, id: GearId) -> Result<(), SimulationError> {
        self.ensure_running()?;
        let mut commands = Vec::new();
        let mut events = Vec::new();
        self.progression.equip(id, &mut commands, &mut events)?;
        self.apply_all(&mut commands, &mut events);
        self.pending.append(&mut events);
        Ok(())
    }

    /// Returns the item in `slot` to the inventory.
    pub fn unequip(&mut self, slot: GearSlot) -> Result<(), SimulationError> {
        self.ensure_running()?;
        let mut commands = Vec::new();
        let mut events = Vec::new();
        self.progression.unequip(slot, &mut commands, &mut events)?;
        self.apply_all(&mut commands, &mut events);
        self.pending.append(&mut events);
        Ok(())
    }

    /// Scraps an inventory item for gold, returning the gold paid.
    pub fn scrap(&mut self, id: GearId) -> Result<u32, SimulationError> {
        self.ensure_running()?;
        Ok(self.progression.scrap(id, &mut self.pending)?)
    }

    /// Mounts `weapon` if the profile has unlocked it.
    pub fn select_weapon(&mut self, weapon: WeaponKind) -> Result<(), SimulationError> {
        self.ensure_running()?;
        if !self.profile.has_weapon(weapon) {
            return Err(SimulationError::WeaponLocked(weapon));
        }
        self.weapons.mount(weapon);
        Ok(())
    }

    /// Moves the turret to the centre of the new viewport and re-rings spawns.
    pub fn resize(&mut self, viewport: Vec2) {
        self.config.viewport = viewport;
        self.director.set_viewport(viewport);
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::PlaceTurret {
                position: viewport / 2.0,
            },
            &mut events,
        );
        self.pending.append(&mut events);
    }

    /// Banks the finished run into the profile and returns the ascendium
    /// awarded.
    pub fn finish_run(&mut self) -> Result<u64, SimulationError> {
        if !self.game_over {
            return Err(SimulationError::RunInProgress);
        }
        if self.finished {
            return Err(SimulationError::AlreadyFinished);
        }
        self.finished = true;
        let summary = RunSummary {
            highest_wave: self.director.current_wave(),
            total_gold_earned: self.progression.total_gold_earned(),
            enemies_killed: self.progression.enemies_killed(),
            run_duration: self.run_duration_ms as u64,
        };
        Ok(finish_run(&mut self.profile, &summary))
    }

    /// Snapshot of the run for persistence, or `None` once it is over.
    #[must_use]
    pub fn run_state(&self) -> Option<RunState> {
        if self.game_over {
            return None;
        }
        let turret = query::turret(&self.world);
        let wave = self.director.current_wave();
        Some(RunState {
            current_wave: if self.director.is_in_break() { wave + 1 } else { wave },
            turret_health: turret.health,
            turret_max_health: turret.max_health,
            gold: self.progression.gold(),
            total_gold_earned: self.progression.total_gold_earned(),
            level: self.progression.level(),
            current_xp: self.progression.current_xp(),
            upgrade_levels: self.progression.upgrade_levels().clone(),
            equipped_gear: self.progression.equipped().clone(),
            inventory: self.progression.inventory().to_vec(),
            active_weapon_id: self.weapons.weapon(),
            enemies_killed_this_run: self.progression.enemies_killed(),
            run_start_time: self.run_start_time,
            run_duration: self.run_duration_ms as u64,
        })
    }

    /// Full save state stamped with `now_ms`, milliseconds since the Unix epoch.
    #[must_use]
    pub fn game_state(&self, now_ms: u64) -> GameState {
        GameState {
            version: SAVE_VERSION,
            last_saved: now_ms,
            profile: self.profile.clone(),
            run: self.run_state(),
        }
    }

    /// Bus that receives every event at the end of each tick.
    pub fn bus_mut(&mut self) -> &mut SignalBus {
        &mut self.bus
    }

    /// Events published by the most recent tick.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.last_events
    }

    /// Authoritative world state, for read-only queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Wave director state.
    #[must_use]
    pub fn director(&self) -> &WaveDirector {
        &self.director
    }

    /// Run progression state.
    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Player profile, including anything banked by [`Simulation::finish_run`].
    #[must_use]
    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    /// Weapon currently mounted.
    #[must_use]
    pub fn weapon(&self) -> WeaponKind {
        self.weapons.weapon()
    }

    /// Settings the run was created with, including the current viewport.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Whether the turret has been destroyed.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn ensure_running(&self) -> Result<(), SimulationError> {
        if self.game_over {
            return Err(SimulationError::RunOver);
        }
        Ok(())
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("wave", &self.director.current_wave())
            .field("weapon", &self.weapons.weapon())
            .field("game_over", &self.game_over)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}
