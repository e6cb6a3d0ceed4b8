#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director that schedules spawns and choreographs boss fights.
//!
//! The director alternates between a break countdown and an active wave.
//! While a wave is active it spawns one unit per spawn interval until the
//! wave quota is met, respecting the concurrency cap. Boss waves open with
//! the boss, which stays shielded until a quota of minions has fallen.
//!
//! Each wave draws from its own RNG stream derived from the run seed and the
//! wave number, so a wave's composition does not depend on how earlier waves
//! played out.

use desktop_defender_core::{
    balance::{
        boss_minion_quota, EnemyKind, WaveConfig, BOSS_DAMAGE_MULTIPLIER,
        BOSS_ENRAGED_SPEED_MULTIPLIER, BOSS_SPEED_MULTIPLIER, ELITE, OPENING_BREAK_MS,
        SPAWN_MARGIN, SWARM_CLUSTER_SIZE, TROJAN_SCOUT_RING,
    },
    wave_config, Command, EnemyId, EnemySpawn, Event, Vec2,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Boss choreography phase of the current wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BossPhase {
    /// No boss is in play.
    None,
    /// The boss is shielded and minions are spawning.
    Orbit,
    /// The shield dropped; the wave ends when the boss leaves play.
    Vulnerable,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum WavePhase {
    Break { remaining_ms: f32 },
    Active,
}

#[derive(Clone, Debug)]
struct BossTracker {
    phase: BossPhase,
    spawned: bool,
    awaiting_spawn: bool,
    enemy: Option<EnemyId>,
    minion_quota: u32,
    minions_to_kill: u32,
}

impl BossTracker {
    const fn idle() -> Self {
        Self {
            phase: BossPhase::None,
            spawned: false,
            awaiting_spawn: false,
            enemy: None,
            minion_quota: 0,
            minions_to_kill: 0,
        }
    }
}

/// Stateful system that owns wave progression.
#[derive(Debug)]
pub struct WaveDirector {
    run_seed: u64,
    viewport: Vec2,
    current_wave: u32,
    config: WaveConfig,
    phase: WavePhase,
    enemies_spawned: u32,
    spawn_timer_ms: f32,
    boss: BossTracker,
    rng: ChaCha8Rng,
}

impl WaveDirector {
    /// Creates a director that opens wave one after the opening break.
    #[must_use]
    pub fn new(run_seed: u64, viewport: Vec2) -> Self {
        Self::starting_at(run_seed, viewport, 1)
    }

    /// Creates a director whose next wave is `wave`, used to resume a run.
    #[must_use]
    pub fn starting_at(run_seed: u64, viewport: Vec2, wave: u32) -> Self {
        let current_wave = wave.max(1) - 1;
        Self {
            run_seed,
            viewport,
            current_wave,
            config: wave_config(current_wave),
            phase: WavePhase::Break {
                remaining_ms: OPENING_BREAK_MS,
            },
            enemies_spawned: 0,
            spawn_timer_ms: 0.0,
            boss: BossTracker::idle(),
            rng: ChaCha8Rng::seed_from_u64(derive_wave_seed(run_seed, current_wave)),
        }
    }

    /// Updates the area enemies spawn around.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Runs the break countdown or the spawn cadence for one tick.
    pub fn spawn_phase(
        &mut self,
        dt_ms: f32,
        active_enemies: usize,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        match &mut self.phase {
            WavePhase::Break { remaining_ms } => {
                *remaining_ms -= dt_ms;
                if *remaining_ms <= 0.0 {
                    self.start_next_wave(out_events);
                }
            }
            WavePhase::Active => {
                self.spawn_timer_ms -= dt_ms;
                if self.spawn_timer_ms > 0.0 || self.enemies_spawned >= self.config.enemy_count {
                    return;
                }
                if active_enemies >= self.config.max_concurrent as usize {
                    return;
                }
                self.spawn_next(out_commands);
                self.spawn_timer_ms = self.config.spawn_interval_ms;
            }
        }
    }

    /// Reacts to world events: boss arrival, minion kills and trojan deaths.
    pub fn observe(
        &mut self,
        events: &[Event],
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        for event in events {
            match event {
                Event::EnemySpawned {
                    enemy,
                    kind: EnemyKind::Boss,
                    ..
                } if self.boss.awaiting_spawn => {
                    self.boss.awaiting_spawn = false;
                    self.boss.enemy = Some(*enemy);
                    self.boss.phase = BossPhase::Orbit;
                    self.boss.minion_quota = boss_minion_quota(self.current_wave);
                    self.boss.minions_to_kill = self.boss.minion_quota;
                    info!(
                        wave = self.current_wave,
                        minions = self.boss.minion_quota,
                        "boss shielded"
                    );
                    out_events.push(Event::BossPhaseStarted {
                        total: self.boss.minion_quota,
                    });
                }
                Event::EnemyKilled {
                    kind: EnemyKind::BossMinion,
                    ..
                } if self.boss.phase == BossPhase::Orbit => {
                    self.boss.minions_to_kill = self.boss.minions_to_kill.saturating_sub(1);
                    out_events.push(Event::BossMinionKilled {
                        remaining: self.boss.minions_to_kill,
                        total: self.boss.minion_quota,
                    });
                    if self.boss.minions_to_kill == 0 {
                        self.transition_to_vulnerable(out_commands, out_events);
                    }
                }
                Event::SpawnScouts { position, count } => {
                    self.spawn_scouts(*position, *count, out_commands);
                }
                _ => {}
            }
        }
    }

    /// Ends the wave when its win condition holds, emitting `WaveComplete`
    /// and `WaveHeal` and starting the break.
    ///
    /// `active_enemies` must reflect the pools after combat for this tick.
    pub fn check_completion(
        &mut self,
        active_enemies: usize,
        boss_alive: bool,
        out_events: &mut Vec<Event>,
    ) {
        if self.phase != WavePhase::Active {
            return;
        }

        if self.boss.phase == BossPhase::Orbit && !boss_alive {
            debug!(wave = self.current_wave, "boss left play while shielded");
            self.boss.phase = BossPhase::Vulnerable;
        }

        let cleared = self.enemies_spawned >= self.config.enemy_count && active_enemies == 0;
        let boss_down = self.boss.phase == BossPhase::Vulnerable && !boss_alive;
        if !cleared && !boss_down {
            return;
        }

        info!(wave = self.current_wave, "wave complete");
        self.phase = WavePhase::Break {
            remaining_ms: self.config.break_time_ms,
        };
        out_events.push(Event::WaveComplete {
            wave: self.current_wave,
        });
        out_events.push(Event::WaveHeal);
    }

    /// Wave currently in progress or most recently completed.
    #[must_use]
    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Configuration of the current wave.
    #[must_use]
    pub fn wave_config(&self) -> &WaveConfig {
        &self.config
    }

    /// Whether the director is counting down between waves.
    #[must_use]
    pub fn is_in_break(&self) -> bool {
        matches!(self.phase, WavePhase::Break { .. })
    }

    /// Milliseconds left in the current break, if any.
    #[must_use]
    pub fn break_remaining_ms(&self) -> Option<f32> {
        match self.phase {
            WavePhase::Break { remaining_ms } => Some(remaining_ms.max(0.0)),
            WavePhase::Active => None,
        }
    }

    /// Spawn slots consumed in the current wave.
    #[must_use]
    pub fn enemies_spawned(&self) -> u32 {
        self.enemies_spawned
    }

    /// Boss choreography phase.
    #[must_use]
    pub fn boss_phase(&self) -> BossPhase {
        self.boss.phase
    }

    /// Handle of the wave's boss once it spawned.
    #[must_use]
    pub fn boss_enemy(&self) -> Option<EnemyId> {
        self.boss.enemy
    }

    /// Minions still required to break the boss shield.
    #[must_use]
    pub fn minions_to_kill(&self) -> u32 {
        self.boss.minions_to_kill
    }

    fn start_next_wave(&mut self, out_events: &mut Vec<Event>) {
        self.current_wave += 1;
        self.config = wave_config(self.current_wave);
        self.rng = ChaCha8Rng::seed_from_u64(derive_wave_seed(self.run_seed, self.current_wave));
        self.enemies_spawned = 0;
        self.spawn_timer_ms = 0.0;
        self.boss = BossTracker::idle();
        self.phase = WavePhase::Active;

        info!(
            wave = self.current_wave,
            boss = self.config.is_boss_wave,
            enemies = self.config.enemy_count,
            "wave started"
        );
        out_events.push(Event::WaveStarted {
            wave: self.current_wave,
            is_boss_wave: self.config.is_boss_wave,
        });
        if self.config.is_boss_wave {
            out_events.push(Event::BossSpawned {
                wave: self.current_wave,
            });
        }
    }

    fn spawn_next(&mut self, out_commands: &mut Vec<Command>) {
        let position = self.spawn_position();

        if self.config.is_boss_wave && !self.boss.spawned {
            self.boss.spawned = true;
            self.boss.awaiting_spawn = true;
            self.enemies_spawned += 1;
            out_commands.push(Command::SpawnEnemy {
                spawn: self.boss_spawn(position),
            });
            return;
        }

        let mut kind = self.pick_enemy_kind();
        match self.boss.phase {
            BossPhase::Orbit => kind = EnemyKind::BossMinion,
            BossPhase::Vulnerable => {
                self.enemies_spawned = self.config.enemy_count;
                return;
            }
            BossPhase::None => {}
        }

        let is_elite = self.current_wave >= ELITE.unlock_wave
            && self.rng.gen::<f64>() < ELITE.chance
            && !kind.is_elite_excluded();

        let mut spawn = self.regular_spawn(kind, position);
        if is_elite {
            spawn.is_elite = true;
            spawn.health = spawn.health.saturating_mul(ELITE.health_multiplier);
            spawn.gold_value = spawn.gold_value.saturating_mul(ELITE.gold_multiplier);
            spawn.xp_value = spawn.xp_value.saturating_mul(ELITE.xp_multiplier);
        }

        if kind == EnemyKind::Swarm {
            for member in 0..SWARM_CLUSTER_SIZE {
                let offset = member as f32 - 1.0;
                out_commands.push(Command::SpawnEnemy {
                    spawn: EnemySpawn {
                        position: position + Vec2::new(offset * 12.0, offset * 8.0),
                        ..spawn
                    },
                });
            }
        } else {
            out_commands.push(Command::SpawnEnemy { spawn });
        }

        if self.boss.phase != BossPhase::Orbit {
            self.enemies_spawned += 1;
        }
    }

    fn spawn_scouts(&mut self, origin: Vec2, count: u32, out_commands: &mut Vec<Command>) {
        if count == 0 {
            return;
        }
        let step = std::f32::consts::TAU / count as f32;
        for index in 0..count {
            let angle = step * index as f32;
            let position = origin + Vec2::new(angle.cos(), angle.sin()) * TROJAN_SCOUT_RING;
            out_commands.push(Command::SpawnEnemy {
                spawn: self.regular_spawn(EnemyKind::Scout, position),
            });
        }
    }

    fn transition_to_vulnerable(
        &mut self,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        self.boss.phase = BossPhase::Vulnerable;
        info!(wave = self.current_wave, "boss shield down");
        if let Some(enemy) = self.boss.enemy {
            out_commands.push(Command::OverloadBoss {
                enemy,
                enraged_speed: self.config.base_speed * BOSS_ENRAGED_SPEED_MULTIPLIER,
            });
        }
        out_events.push(Event::BossVulnerableStarted);
    }

    /// Grunts are always eligible; other archetypes join as they unlock.
    fn pick_enemy_kind(&mut self) -> EnemyKind {
        let wave = self.current_wave;
        let mut eligible = vec![EnemyKind::Grunt];
        eligible.extend(
            EnemyKind::ALL
                .into_iter()
                .filter(|kind| *kind != EnemyKind::Grunt && kind.is_unlocked(wave)),
        );
        eligible[self.rng.gen_range(0..eligible.len())]
    }

    fn spawn_position(&mut self) -> Vec2 {
        let width = self.viewport.x.max(0.0);
        let height = self.viewport.y.max(0.0);
        match self.rng.gen_range(0..4) {
            0 => Vec2::new(self.rng.gen_range(0.0..=width), -SPAWN_MARGIN),
            1 => Vec2::new(width + SPAWN_MARGIN, self.rng.gen_range(0.0..=height)),
            2 => Vec2::new(self.rng.gen_range(0.0..=width), height + SPAWN_MARGIN),
            _ => Vec2::new(-SPAWN_MARGIN, self.rng.gen_range(0.0..=height)),
        }
    }

    fn regular_spawn(&self, kind: EnemyKind, position: Vec2) -> EnemySpawn {
        let archetype = kind.archetype();
        let config = &self.config;
        EnemySpawn {
            kind,
            position,
            health: scale(config.base_health, archetype.health),
            speed: (config.base_speed * archetype.speed).floor(),
            damage: scale(config.base_damage, archetype.damage),
            xp_value: scale(config.xp_value, archetype.xp),
            gold_value: scale(config.gold_value, archetype.gold),
            is_elite: false,
            boss_number: None,
        }
    }

    fn boss_spawn(&self, position: Vec2) -> EnemySpawn {
        let config = &self.config;
        EnemySpawn {
            kind: EnemyKind::Boss,
            position,
            health: scale(config.base_health, config.boss_health_multiplier),
            speed: (config.base_speed * BOSS_SPEED_MULTIPLIER).floor(),
            damage: scale(config.base_damage, BOSS_DAMAGE_MULTIPLIER),
            xp_value: scale(config.xp_value, config.boss_xp_multiplier),
            gold_value: scale(config.gold_value, config.boss_gold_multiplier),
            is_elite: false,
            boss_number: Some(config.boss_number.unwrap_or(1)),
        }
    }
}

fn scale(base: u32, multiplier: f32) -> u32 {
    (base as f32 * multiplier).floor() as u32
}

/// Derives the RNG seed for `wave` from the run seed.
#[must_use]
pub fn derive_wave_seed(run_seed: u64, wave: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(run_seed.to_le_bytes());
    hasher.update(wave.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
