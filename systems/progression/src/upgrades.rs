//! Run upgrade levels and the turret stats derived from them.

use std::collections::BTreeMap;

use desktop_defender_core::{GearStats, TurretStats, UpgradeKind, TURRET_BASE_HEALTH};

use crate::StartingBonuses;

/// Milliseconds between regeneration ticks.
pub const REGEN_INTERVAL_MS: f32 = 5_000.0;

/// Turret and payout figures produced by a stat recompute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputedStats {
    /// Combat stats pushed to the turret.
    pub turret: TurretStats,
    /// Maximum turret health.
    pub max_health: u32,
    /// Multiplier applied to gold income.
    pub gold_multiplier: f64,
    /// Multiplier applied to experience income.
    pub xp_multiplier: f64,
}

/// Folds upgrade levels, equipped gear and ascension bonuses into turret stats.
#[must_use]
pub fn compute_stats(
    levels: &BTreeMap<UpgradeKind, u32>,
    gear: &GearStats,
    bonuses: &StartingBonuses,
) -> ComputedStats {
    let level = |kind: UpgradeKind| f64::from(levels.get(&kind).copied().unwrap_or(0));
    let percent = |value: u32| f64::from(value) / 100.0;

    let flat_damage = f64::from(10 + bonuses.base_damage_bonus + gear.damage_flat);
    let damage_scale = 1.0 + 0.10 * level(UpgradeKind::Damage) + percent(gear.damage_percent);
    let fire_rate = (1.0 + 0.08 * level(UpgradeKind::FireRate))
        * (1.0 + percent(gear.fire_rate_percent));

    let turret = TurretStats {
        base_damage: (flat_damage * damage_scale).floor() as u32,
        fire_rate_multiplier: fire_rate as f32,
        range: (200.0 + 10.0 * level(UpgradeKind::Range) + f64::from(gear.range)) as f32,
        knockback: (5.0 * level(UpgradeKind::Knockback) + f64::from(gear.knockback)) as f32,
        crit_chance: (0.02 * level(UpgradeKind::Crit) + percent(gear.crit_chance)).min(1.0),
        crit_multiplier: (2.0 + percent(gear.crit_damage)) as f32,
        multishot: level(UpgradeKind::Multishot) as u32,
    };

    let max_health = TURRET_BASE_HEALTH
        + 20 * level(UpgradeKind::MaxHealth) as u32
        + bonuses.max_health_bonus
        + gear.health_flat;

    ComputedStats {
        turret,
        max_health,
        gold_multiplier: (1.0 + 0.10 * level(UpgradeKind::Gold))
            * (1.0 + percent(gear.gold_percent)),
        xp_multiplier: bonuses.xp_multiplier * (1.0 + percent(gear.xp_percent)),
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Upgrades {
    levels: BTreeMap<UpgradeKind, u32>,
    regen_timer_ms: f32,
}

impl Upgrades {
    pub(crate) fn new(levels: BTreeMap<UpgradeKind, u32>) -> Self {
        Self {
            levels,
            regen_timer_ms: 0.0,
        }
    }

    pub(crate) fn levels(&self) -> &BTreeMap<UpgradeKind, u32> {
        &self.levels
    }

    pub(crate) fn level(&self, kind: UpgradeKind) -> u32 {
        self.levels.get(&kind).copied().unwrap_or(0)
    }

    pub(crate) fn set_level(&mut self, kind: UpgradeKind, level: u32) {
        let _ = self.levels.insert(kind, level);
    }

    /// Advances the regeneration timer and returns the heal due, if any.
    pub(crate) fn tick_regen(&mut self, dt_ms: f32, health: u32, max_health: u32) -> Option<u32> {
        let level = self.level(UpgradeKind::Regen);
        if level == 0 || health == 0 || health >= max_health {
            return None;
        }
        self.regen_timer_ms += dt_ms;
        if self.regen_timer_ms < REGEN_INTERVAL_MS {
            return None;
        }
        self.regen_timer_ms = 0.0;
        Some(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_stats_match_turret_defaults() {
        let stats = compute_stats(
            &BTreeMap::new(),
            &GearStats::default(),
            &StartingBonuses::default(),
        );
        assert_eq!(stats.turret, TurretStats::default());
        assert_eq!(stats.max_health, TURRET_BASE_HEALTH);
        assert_eq!(stats.gold_multiplier, 1.0);
        assert_eq!(stats.xp_multiplier, 1.0);
    }

    #[test]
    fn upgrades_gear_and_bonuses_combine() {
        let levels = BTreeMap::from([
            (UpgradeKind::Damage, 5),
            (UpgradeKind::Range, 2),
            (UpgradeKind::MaxHealth, 3),
            (UpgradeKind::Crit, 10),
            (UpgradeKind::Multishot, 2),
        ]);
        let gear = GearStats {
            damage_flat: 4,
            crit_chance: 90,
            health_flat: 12,
            range: 5,
            ..GearStats::default()
        };
        let bonuses = StartingBonuses {
            base_damage_bonus: 6,
            max_health_bonus: 30,
            ..StartingBonuses::default()
        };

        let stats = compute_stats(&levels, &gear, &bonuses);

        assert_eq!(stats.turret.base_damage, 30);
        assert_eq!(stats.turret.range, 225.0);
        assert_eq!(stats.turret.crit_chance, 1.0);
        assert_eq!(stats.turret.multishot, 2);
        assert_eq!(stats.max_health, 100 + 60 + 30 + 12);
    }

    #[test]
    fn regen_heals_every_interval_only_while_damaged() {
        let mut upgrades = Upgrades::new(BTreeMap::from([(UpgradeKind::Regen, 3)]));
        assert_eq!(upgrades.tick_regen(4_000.0, 50, 100), None);
        assert_eq!(upgrades.tick_regen(1_000.0, 50, 100), Some(3));
        assert_eq!(upgrades.tick_regen(6_000.0, 100, 100), None);
        assert_eq!(upgrades.tick_regen(4_999.0, 90, 100), None);
    }
}
