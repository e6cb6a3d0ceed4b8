//! Wave scaling formulas and the enemy archetype table.
//!
//! Everything in this module is a pure function of its inputs so that the
//! wave director, tests, and tooling agree on the exact numbers a wave uses.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Maximum movement speed any wave configuration may report.
pub const MAX_BASE_SPEED: f32 = 120.0;

/// Shortest spawn interval, in milliseconds, any wave configuration may report.
pub const MIN_SPAWN_INTERVAL_MS: f32 = 400.0;

/// Break between waves after a regular wave, in milliseconds.
pub const WAVE_BREAK_MS: f32 = 3_000.0;

/// Break between waves after a boss wave, in milliseconds.
pub const BOSS_WAVE_BREAK_MS: f32 = 4_000.0;

/// Delay before the very first wave starts, in milliseconds.
pub const OPENING_BREAK_MS: f32 = 1_500.0;

/// Fraction of the turret's maximum health restored when a wave completes.
pub const WAVE_HEAL_PERCENT: f32 = 0.15;

/// Multiplier applied to the wave's base speed for a boss.
pub const BOSS_SPEED_MULTIPLIER: f32 = 0.6;

/// Multiplier applied to the wave's base damage for a boss.
pub const BOSS_DAMAGE_MULTIPLIER: f32 = 5.0;

/// Multiplier applied to a boss's spawn speed once it becomes enraged.
pub const BOSS_ENRAGED_SPEED_MULTIPLIER: f32 = 0.5;

/// Health ratios at which a boss enters recovery, consumed in order.
pub const BOSS_RECOVERY_THRESHOLDS: [f32; 3] = [0.75, 0.5, 0.25];

/// Duration of a boss recovery window, in milliseconds.
pub const BOSS_RECOVERY_MS: f32 = 3_000.0;

/// Duration of the stationary overload window, in milliseconds.
pub const BOSS_OVERLOAD_MS: f32 = 3_000.0;

/// Knockback dampening factor applied to bosses.
pub const BOSS_KNOCKBACK_FACTOR: f32 = 0.3;

/// Distance outside the viewport at which enemies spawn.
pub const SPAWN_MARGIN: f32 = 20.0;

/// Number of members produced by a single swarm spawn.
pub const SWARM_CLUSTER_SIZE: u32 = 3;

/// Number of scouts released when a trojan dies.
pub const TROJAN_SCOUT_COUNT: u32 = 4;

/// Radius of the ring trojan scouts spawn on.
pub const TROJAN_SCOUT_RING: f32 = 20.0;

/// Wave-derived configuration describing a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// One-based wave number the configuration belongs to.
    pub wave_number: u32,
    /// Whether the wave opens with a boss.
    pub is_boss_wave: bool,
    /// Ordinal of the boss fought on this wave, if any.
    pub boss_number: Option<u32>,
    /// Number of spawn slots in the wave, including the boss.
    pub enemy_count: u32,
    /// Base health before archetype multipliers.
    pub base_health: u32,
    /// Base movement speed in pixels per second.
    pub base_speed: f32,
    /// Base contact damage.
    pub base_damage: u32,
    /// Milliseconds between consecutive spawns.
    pub spawn_interval_ms: f32,
    /// Base gold awarded per kill.
    pub gold_value: u32,
    /// Base experience awarded per kill.
    pub xp_value: u32,
    /// Break following the wave, in milliseconds.
    pub break_time_ms: f32,
    /// Health multiplier applied to the boss.
    pub boss_health_multiplier: f32,
    /// Gold multiplier applied to the boss.
    pub boss_gold_multiplier: f32,
    /// Experience multiplier applied to the boss.
    pub boss_xp_multiplier: f32,
    /// Upper bound on simultaneously active enemies.
    pub max_concurrent: u32,
}

/// Returns the boss ordinal fought on `wave`, or `None` for a regular wave.
#[must_use]
pub const fn boss_number(wave: u32) -> Option<u32> {
    match wave {
        5 => Some(1),
        12 => Some(2),
        20 => Some(3),
        w if w >= 30 && w % 10 == 0 => Some(3 + (w - 20) / 10),
        _ => None,
    }
}

/// Derives the configuration for `wave`. Wave zero is treated as wave one.
#[must_use]
pub fn wave_config(wave: u32) -> WaveConfig {
    let wave = wave.max(1);
    let w = f64::from(wave);
    let boss_number = boss_number(wave);
    let is_boss_wave = boss_number.is_some();

    let base_count = 2 + (w * 0.8 + w.powf(1.3) * 0.3).floor() as u32;
    let enemy_count = if is_boss_wave {
        base_count + 1
    } else {
        base_count
    };

    let base_health = (20.0 * 1.12_f64.powi(wave as i32 - 1)).floor() as u32;
    let base_speed = (40.0 * 1.05_f64.powi(wave as i32 - 1)).min(f64::from(MAX_BASE_SPEED)) as f32;
    let base_damage = (5.0 + w * 0.5).floor() as u32;
    let spawn_interval_ms = (2_000.0 - 40.0 * w).max(f64::from(MIN_SPAWN_INTERVAL_MS)) as f32;
    let gold_value = (5.0 + 2.0 * w + w.powf(1.2)).floor() as u32;
    let xp_value = (10.0 + 3.0 * w).floor() as u32;
    let surge = if wave > 10 { 2 * (wave - 10) } else { 0 };
    let max_concurrent = 10 + wave / 2 + surge;

    let (boss_health_multiplier, boss_gold_multiplier, boss_xp_multiplier) = match boss_number {
        Some(number) => (
            1.5_f32.powi(number as i32 - 1),
            10.0 + 5.0 * number as f32,
            5.0 + 2.0 * number as f32,
        ),
        None => (1.0, 10.0, 5.0),
    };

    WaveConfig {
        wave_number: wave,
        is_boss_wave,
        boss_number,
        enemy_count,
        base_health,
        base_speed,
        base_damage,
        spawn_interval_ms,
        gold_value,
        xp_value,
        break_time_ms: if is_boss_wave {
            BOSS_WAVE_BREAK_MS
        } else {
            WAVE_BREAK_MS
        },
        boss_health_multiplier,
        boss_gold_multiplier,
        boss_xp_multiplier,
        max_concurrent,
    }
}

/// Number of boss minions that must fall before the boss loses its shield.
#[must_use]
pub fn boss_minion_quota(wave: u32) -> u32 {
    5 + (f64::from(wave) * 1.5).floor() as u32
}

/// Enemy archetypes the simulation knows how to spawn and steer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnemyKind {
    /// Baseline chaser.
    Grunt,
    /// Fast chaser that weaves side to side.
    Runner,
    /// Slow, heavily armoured chaser.
    Tank,
    /// Fragile unit that always arrives in clusters.
    Swarm,
    /// Durable escort.
    Shield,
    /// Support unit.
    Healer,
    /// Chaser that periodically teleports toward the turret.
    Glitch,
    /// Orbiting unit that fires beams at the turret.
    Seeker,
    /// Heavy unit that releases scouts on death.
    Trojan,
    /// Very slow wall of health.
    Firewall,
    /// Fast fragment released by a dying trojan.
    Scout,
    /// Escort summoned while a boss is shielded.
    BossMinion,
    /// Wave boss.
    Boss,
}

impl EnemyKind {
    /// Every archetype in table order.
    pub const ALL: [EnemyKind; 13] = [
        EnemyKind::Grunt,
        EnemyKind::Runner,
        EnemyKind::Tank,
        EnemyKind::Swarm,
        EnemyKind::Shield,
        EnemyKind::Healer,
        EnemyKind::Glitch,
        EnemyKind::Seeker,
        EnemyKind::Trojan,
        EnemyKind::Firewall,
        EnemyKind::Scout,
        EnemyKind::BossMinion,
        EnemyKind::Boss,
    ];

    /// Stable string key used by configuration files and signal payloads.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Grunt => "grunt",
            Self::Runner => "runner",
            Self::Tank => "tank",
            Self::Swarm => "swarm",
            Self::Shield => "shield",
            Self::Healer => "healer",
            Self::Glitch => "glitch",
            Self::Seeker => "seeker",
            Self::Trojan => "trojan",
            Self::Firewall => "firewall",
            Self::Scout => "scout",
            Self::BossMinion => "boss-minion",
            Self::Boss => "boss",
        }
    }

    /// Stat multipliers and unlock wave for the archetype.
    ///
    /// The boss row is neutral because boss stats come from the wave's boss
    /// multipliers instead.
    #[must_use]
    pub const fn archetype(self) -> Archetype {
        let (health, speed, damage, gold, xp, unlocks_at_wave) = match self {
            Self::Grunt => (1.0, 1.0, 1.0, 1.0, 1.0, Some(1)),
            Self::Runner => (0.5, 2.0, 0.7, 0.8, 0.8, Some(5)),
            Self::Glitch => (0.8, 2.2, 1.5, 1.2, 1.2, Some(6)),
            Self::Seeker => (1.2, 0.9, 1.5, 1.5, 1.5, Some(8)),
            Self::Tank => (3.0, 0.5, 2.0, 2.0, 2.0, Some(10)),
            Self::Trojan => (3.5, 0.4, 2.0, 3.0, 3.0, Some(12)),
            Self::Firewall => (5.0, 0.3, 3.0, 2.5, 2.5, Some(14)),
            Self::Swarm => (0.3, 1.3, 0.4, 0.4, 0.4, Some(15)),
            Self::Shield => (1.5, 0.8, 1.2, 1.5, 1.5, Some(20)),
            Self::Healer => (1.0, 0.7, 0.8, 1.8, 1.8, Some(25)),
            Self::Scout => (0.2, 3.0, 0.5, 0.1, 0.1, None),
            Self::BossMinion => (0.5, 1.2, 0.5, 0.2, 0.2, None),
            Self::Boss => (1.0, 1.0, 1.0, 1.0, 1.0, None),
        };
        Archetype {
            health,
            speed,
            damage,
            gold,
            xp,
            unlocks_at_wave,
        }
    }

    /// Whether the archetype may appear as a random spawn on `wave`.
    #[must_use]
    pub const fn is_unlocked(self, wave: u32) -> bool {
        match self.archetype().unlocks_at_wave {
            Some(unlock) => unlock <= wave,
            None => false,
        }
    }

    /// Collision radius of the archetype in pixels.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Grunt | Self::Healer | Self::Seeker => 8.0,
            Self::Runner => 6.0,
            Self::Tank | Self::Trojan => 12.0,
            Self::Swarm => 5.0,
            Self::Shield => 10.0,
            Self::Glitch => 7.0,
            Self::Firewall => 14.0,
            Self::Scout => 4.0,
            Self::BossMinion => 6.0,
            Self::Boss => 24.0,
        }
    }

    /// Whether elite promotion can never apply to the archetype.
    #[must_use]
    pub const fn is_elite_excluded(self) -> bool {
        matches!(
            self,
            Self::Boss | Self::BossMinion | Self::Scout | Self::Swarm
        )
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EnemyKind {
    type Err = ConfigError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        EnemyKind::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| ConfigError::UnknownEnemyType(key.to_owned()))
    }
}

/// Stat template for an enemy archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Archetype {
    /// Health multiplier against the wave's base health.
    pub health: f32,
    /// Speed multiplier against the wave's base speed.
    pub speed: f32,
    /// Damage multiplier against the wave's base damage.
    pub damage: f32,
    /// Gold multiplier against the wave's gold value.
    pub gold: f32,
    /// Experience multiplier against the wave's experience value.
    pub xp: f32,
    /// First wave on which the archetype joins the random pool.
    pub unlocks_at_wave: Option<u32>,
}

/// Elite promotion rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EliteConfig {
    /// First wave on which elites may roll.
    pub unlock_wave: u32,
    /// Probability of promoting an eligible spawn.
    pub chance: f64,
    /// Health multiplier applied to elites.
    pub health_multiplier: u32,
    /// Gold multiplier applied to elites.
    pub gold_multiplier: u32,
    /// Experience multiplier applied to elites.
    pub xp_multiplier: u32,
}

/// Elite promotion rules used by the wave director.
pub const ELITE: EliteConfig = EliteConfig {
    unlock_wave: 8,
    chance: 0.10,
    health_multiplier: 3,
    gold_multiplier: 3,
    xp_multiplier: 3,
};
