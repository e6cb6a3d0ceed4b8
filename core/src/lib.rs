#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Desktop Defender engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point and reports what happened as [`Event`] values. Events
//! are fanned out to external listeners through the [`SignalBus`] at the end
//! of every tick. Balance tables, weapon definitions and the persisted save
//! shape live here as well so that every layer agrees on the same numbers.

pub mod balance;
mod error;
pub mod gear;
pub mod profile;
pub mod signals;
pub mod upgrades;
pub mod weapons;

pub use balance::{wave_config, EnemyKind, WaveConfig};
pub use error::ConfigError;
pub use gear::{GearId, GearItem, GearSlot, GearStats, Rarity};
pub use glam::Vec2;
pub use profile::{GameState, PlayerProfile, RunState};
pub use signals::{EventKind, ListenerId, SignalBus};
pub use upgrades::{AscensionUpgradeKind, UpgradeKind};
pub use weapons::{WeaponDefinition, WeaponKind, WeaponPattern};

/// Radius of the turret's collision circle in pixels.
pub const TURRET_RADIUS: f32 = 20.0;

/// Radius of a projectile's collision circle in pixels.
pub const PROJECTILE_RADIUS: f32 = 4.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Opens a new simulation tick.
    Tick {
        /// Milliseconds of simulated time covered by the tick.
        dt_ms: f32,
    },
    /// Advances enemy behavior and projectile flight.
    StepEntities {
        /// Milliseconds of simulated time to integrate.
        dt_ms: f32,
    },
    /// Requests that an enemy be acquired from the pool.
    SpawnEnemy {
        /// Fully specified spawn parameters.
        spawn: EnemySpawn,
    },
    /// Drops a shielded boss into its stationary overload window.
    OverloadBoss {
        /// Boss entering overload.
        enemy: EnemyId,
        /// Speed the boss pursues at once the overload ends.
        enraged_speed: f32,
    },
    /// Requests that a projectile be acquired from the pool.
    FireProjectile {
        /// Fully specified projectile parameters.
        projectile: ProjectileSpawn,
    },
    /// Applies direct damage to an enemy.
    DamageEnemy {
        /// Enemy receiving the damage.
        enemy: EnemyId,
        /// Damage to subtract.
        amount: u32,
        /// Knockback impulse pushing the enemy away from the turret.
        knockback: f32,
        /// Whether the hit was critical.
        is_crit: bool,
    },
    /// Resolves an overlap between a projectile and an enemy.
    ProjectileHitEnemy {
        /// Projectile involved in the overlap.
        projectile: ProjectileId,
        /// Enemy involved in the overlap.
        enemy: EnemyId,
    },
    /// Resolves an enemy reaching the turret.
    EnemyReachedTurret {
        /// Enemy that made contact.
        enemy: EnemyId,
    },
    /// Restores turret health, clamped to the maximum.
    HealTurret {
        /// Health to restore.
        amount: u32,
    },
    /// Sets the turret's current health directly, clamped to the maximum.
    RestoreTurretHealth {
        /// Health the turret should hold.
        health: u32,
    },
    /// Replaces the turret's combat stats after a recompute.
    ConfigureTurret {
        /// Recomputed combat stats.
        stats: TurretStats,
        /// Recomputed maximum health.
        max_health: u32,
    },
    /// Moves the turret, typically after a viewport resize.
    PlaceTurret {
        /// New turret centre.
        position: Vec2,
    },
}

/// Events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Milliseconds of simulated time that elapsed in the tick.
        dt_ms: f32,
    },
    /// A new wave began.
    WaveStarted {
        /// Wave number.
        wave: u32,
        /// Whether the wave opens with a boss.
        is_boss_wave: bool,
    },
    /// Every enemy of the wave has been dealt with.
    WaveComplete {
        /// Wave number.
        wave: u32,
    },
    /// The turret should be healed for clearing a wave.
    WaveHeal,
    /// An enemy was acquired from the pool.
    EnemySpawned {
        /// Identifier of the new enemy.
        enemy: EnemyId,
        /// Archetype of the new enemy.
        kind: EnemyKind,
        /// Spawn position.
        position: Vec2,
        /// Whether the enemy rolled elite.
        is_elite: bool,
    },
    /// A glitch jumped toward the turret.
    EnemyTeleported {
        /// Enemy that teleported.
        enemy: EnemyId,
        /// Position after the jump.
        position: Vec2,
    },
    /// A seeker fired its beam at the turret.
    EnemyBeamFired {
        /// Enemy that fired.
        enemy: EnemyId,
        /// Position of the firing enemy.
        position: Vec2,
        /// Damage dealt to the turret.
        damage: u32,
    },
    /// An enemy reached the turret and was consumed.
    EnemyReachedTurret {
        /// Enemy that made contact.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
    },
    /// A boss spawned.
    BossSpawned {
        /// Wave the boss belongs to.
        wave: u32,
    },
    /// The boss raised its shield and summoned minions.
    BossPhaseStarted {
        /// Minions that must fall to break the shield.
        total: u32,
    },
    /// A minion fell while the boss was shielded.
    BossMinionKilled {
        /// Minions still required.
        remaining: u32,
        /// Minions required in total.
        total: u32,
    },
    /// The boss shield dropped and the overload window began.
    BossVulnerableStarted,
    /// The overload window ended and the boss resumed pursuit.
    BossEnraged,
    /// The boss crossed a health threshold and entered recovery.
    BossRecoveryState,
    /// The boss took damage.
    BossDamaged {
        /// Remaining health.
        current: u32,
        /// Maximum health.
        max: u32,
    },
    /// The boss died.
    BossKilled {
        /// Death position.
        position: Vec2,
    },
    /// An enemy died in combat.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Death position.
        position: Vec2,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Experience payout.
        xp_value: u32,
        /// Gold payout.
        gold_value: u32,
        /// Whether the enemy was elite.
        is_elite: bool,
    },
    /// A trojan died and released scouts.
    SpawnScouts {
        /// Death position the scouts ring around.
        position: Vec2,
        /// Number of scouts.
        count: u32,
    },
    /// An enemy took damage.
    DamageDealt {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Position of the enemy when hit.
        position: Vec2,
        /// Damage subtracted.
        amount: u32,
        /// Whether the hit was critical.
        is_crit: bool,
    },
    /// The turret's health changed. Heals re-emit this with the new health.
    TurretDamaged {
        /// Health after the change.
        current: u32,
        /// Maximum health.
        max: u32,
        /// Turret position.
        position: Vec2,
    },
    /// The mounted weapon fired.
    WeaponFired {
        /// Weapon that fired.
        weapon: WeaponKind,
    },
    /// Muzzle flash position for the shot.
    WeaponFiredVfx {
        /// Barrel tip position.
        position: Vec2,
    },
    /// A projectile struck an enemy.
    ProjectileHit {
        /// Impact position.
        position: Vec2,
        /// Whether the projectile carried a critical hit.
        is_crit: bool,
        /// Weapon that fired the projectile.
        weapon: WeaponKind,
    },
    /// Gold on hand changed.
    GoldChanged {
        /// Gold now on hand.
        amount: u64,
    },
    /// Experience changed.
    XpChanged {
        /// Experience toward the next level.
        current: u64,
        /// Experience required for the next level.
        required: u64,
        /// Current level.
        level: u32,
    },
    /// The player gained a level.
    LevelUp {
        /// Level reached.
        level: u32,
    },
    /// A run upgrade was purchased.
    UpgradePurchased {
        /// Upgrade bought.
        upgrade: UpgradeKind,
        /// Level after the purchase.
        new_level: u32,
    },
    /// Gear dropped from a kill.
    LootDropped {
        /// Drop position.
        position: Vec2,
        /// Item that dropped.
        item: GearItem,
    },
    /// The inventory contents changed.
    InventoryChanged,
    /// The equipped gear changed.
    GearChanged,
    /// The host should persist a checkpoint.
    AutosaveRequested,
    /// The turret was destroyed and the run is over.
    GameOver {
        /// Wave the run ended on.
        wave: u32,
    },
}

/// Fully specified parameters for a new enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawn {
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Spawn position.
    pub position: Vec2,
    /// Starting and maximum health.
    pub health: u32,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Contact and beam damage.
    pub damage: u32,
    /// Experience payout.
    pub xp_value: u32,
    /// Gold payout.
    pub gold_value: u32,
    /// Whether the enemy rolled elite.
    pub is_elite: bool,
    /// Boss ordinal; present only for bosses.
    pub boss_number: Option<u32>,
}

/// Fully specified parameters for a new projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSpawn {
    /// Launch position.
    pub position: Vec2,
    /// Velocity in pixels per second.
    pub velocity: Vec2,
    /// Damage dealt on hit.
    pub damage: u32,
    /// Knockback applied on hit.
    pub knockback: f32,
    /// Extra enemies the projectile may pass through.
    pub piercing: u32,
    /// Milliseconds before the projectile expires.
    pub lifetime_ms: f32,
    /// Weapon that fired the projectile.
    pub weapon: WeaponKind,
    /// Whether the shot rolled a critical hit.
    pub is_crit: bool,
}

/// Combat stats of the turret.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TurretStats {
    /// Damage per hit before critical multipliers.
    pub base_damage: u32,
    /// Multiplier applied to the weapon's fire rate.
    pub fire_rate_multiplier: f32,
    /// Targeting range in pixels.
    pub range: f32,
    /// Knockback added to projectile hits.
    pub knockback: f32,
    /// Probability in `[0, 1]` that a shot is critical.
    pub crit_chance: f64,
    /// Damage multiplier applied to critical shots.
    pub crit_multiplier: f32,
    /// Extra projectiles or rays per shot.
    pub multishot: u32,
}

impl Default for TurretStats {
    fn default() -> Self {
        Self {
            base_damage: 10,
            fire_rate_multiplier: 1.0,
            range: 200.0,
            knockback: 0.0,
            crit_chance: 0.0,
            crit_multiplier: 2.0,
            multishot: 0,
        }
    }
}

/// Base maximum health of the turret before upgrades.
pub const TURRET_BASE_HEALTH: u32 = 100;

/// Generational handle to a pooled enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId {
    index: u32,
    generation: u32,
}

impl EnemyId {
    /// Creates a handle for the provided slot index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Pool slot the handle points at.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation the slot had when the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Generational handle to a pooled projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId {
    index: u32,
    generation: u32,
}

impl ProjectileId {
    /// Creates a handle for the provided slot index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Pool slot the handle points at.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation the slot had when the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Overlap reported by the collision layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Overlap {
    /// A projectile touched an enemy.
    ProjectileEnemy {
        /// Projectile involved.
        projectile: ProjectileId,
        /// Enemy involved.
        enemy: EnemyId,
    },
    /// An enemy touched the turret.
    EnemyTurret {
        /// Enemy involved.
        enemy: EnemyId,
    },
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Handle of the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Current position.
    pub position: Vec2,
    /// Current velocity in pixels per second.
    pub velocity: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Remaining health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Whether damage is currently ignored.
    pub invulnerable: bool,
    /// Whether the enemy rolled elite.
    pub is_elite: bool,
}

/// Read-only snapshot describing all active enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of `id`, if the handle is still live.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Handle of the projectile.
    pub id: ProjectileId,
    /// Current position.
    pub position: Vec2,
    /// Current velocity in pixels per second.
    pub velocity: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Damage dealt on hit.
    pub damage: u32,
    /// Remaining pierce budget.
    pub piercing: u32,
    /// Weapon that fired the projectile.
    pub weapon: WeaponKind,
}

/// Read-only snapshot describing all active projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of `id`, if the handle is still live.
    #[must_use]
    pub fn get(&self, id: ProjectileId) -> Option<&ProjectileSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of the turret used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretSnapshot {
    /// Turret centre.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Remaining health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Combat stats.
    pub stats: TurretStats,
}
