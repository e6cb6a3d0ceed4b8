//! Enemy entity state.

use desktop_defender_core::{
    balance::{BOSS_KNOCKBACK_FACTOR, BOSS_OVERLOAD_MS, BOSS_RECOVERY_MS, BOSS_RECOVERY_THRESHOLDS},
    EnemyKind, EnemySpawn, Vec2,
};
use desktop_defender_system_enemy_behavior::{BehaviorTimers, BossMotion};

/// Milliseconds a knockback impulse persists before the enemy re-homes.
pub(crate) const KNOCKBACK_RECOVERY_MS: f32 = 150.0;

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
    pub(crate) speed: f32,
    pub(crate) damage: u32,
    pub(crate) xp_value: u32,
    pub(crate) gold_value: u32,
    pub(crate) is_elite: bool,
    pub(crate) age_ms: f32,
    pub(crate) timers: BehaviorTimers,
    pub(crate) knockback_ms: f32,
    pub(crate) boss: Option<BossState>,
}

/// Sub-states layered on top of a boss.
///
/// `shielded` and `overload_ms` form the minion-gauntlet sequence; recovery
/// is orthogonal to it. While recovering the overload countdown is frozen.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BossState {
    pub(crate) number: u32,
    pub(crate) shielded: bool,
    pub(crate) overload_ms: Option<f32>,
    pub(crate) enraged_speed: f32,
    pub(crate) recovery_ms: Option<f32>,
    pub(crate) speed_before_recovery: f32,
    pub(crate) thresholds_passed: usize,
}

/// What happened to a boss while its sub-state countdowns advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BossTransition {
    None,
    RecoveryEnded,
    Enraged,
}

/// Result of applying damage to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DamageOutcome {
    Ignored,
    Survived {
        entered_recovery: bool,
    },
    Killed,
}

impl Enemy {
    pub(crate) fn spawn(spawn: &EnemySpawn) -> Self {
        let boss = spawn.boss_number.map(|number| BossState {
            number,
            shielded: true,
            overload_ms: None,
            enraged_speed: spawn.speed,
            recovery_ms: None,
            speed_before_recovery: spawn.speed,
            thresholds_passed: 0,
        });
        Self {
            kind: spawn.kind,
            position: spawn.position,
            velocity: Vec2::ZERO,
            health: spawn.health.max(1),
            max_health: spawn.health.max(1),
            speed: spawn.speed,
            damage: spawn.damage,
            xp_value: spawn.xp_value,
            gold_value: spawn.gold_value,
            is_elite: spawn.is_elite,
            age_ms: 0.0,
            timers: BehaviorTimers::for_kind(spawn.kind),
            knockback_ms: 0.0,
            boss,
        }
    }

    pub(crate) fn invulnerable(&self) -> bool {
        self.boss.as_ref().map_or(false, |boss| {
            boss.shielded || boss.overload_ms.is_some() || boss.recovery_ms.is_some()
        })
    }

    pub(crate) fn boss_motion(&self) -> Option<BossMotion> {
        let boss = self.boss.as_ref()?;
        Some(if boss.recovery_ms.is_some() || boss.overload_ms.is_some() {
            BossMotion::Stationary
        } else if boss.shielded {
            BossMotion::Shielded
        } else {
            BossMotion::Enraged
        })
    }

    pub(crate) fn radius(&self) -> f32 {
        match &self.boss {
            Some(boss) => self.kind.radius() * (1.0 + 0.15 * boss.number.saturating_sub(1) as f32),
            None => self.kind.radius(),
        }
    }

    /// Drops the shield and starts the stationary overload window.
    pub(crate) fn overload(&mut self, enraged_speed: f32) -> bool {
        let Some(boss) = self.boss.as_mut() else {
            return false;
        };
        if !boss.shielded {
            return false;
        }
        boss.shielded = false;
        boss.overload_ms = Some(BOSS_OVERLOAD_MS);
        boss.enraged_speed = enraged_speed;
        self.velocity = Vec2::ZERO;
        true
    }

    /// Advances recovery and overload countdowns.
    pub(crate) fn advance_boss(&mut self, dt_ms: f32) -> BossTransition {
        let Some(boss) = self.boss.as_mut() else {
            return BossTransition::None;
        };
        if let Some(remaining) = boss.recovery_ms.as_mut() {
            *remaining -= dt_ms;
            if *remaining > 0.0 {
                return BossTransition::None;
            }
            boss.recovery_ms = None;
            self.speed = boss.speed_before_recovery;
            return BossTransition::RecoveryEnded;
        }
        if let Some(remaining) = boss.overload_ms.as_mut() {
            *remaining -= dt_ms;
            if *remaining > 0.0 {
                return BossTransition::None;
            }
            boss.overload_ms = None;
            self.speed = boss.enraged_speed;
            return BossTransition::Enraged;
        }
        BossTransition::None
    }

    /// Subtracts health and applies knockback away from `origin`.
    pub(crate) fn take_damage(&mut self, amount: u32, knockback: f32, origin: Vec2) -> DamageOutcome {
        if self.invulnerable() {
            return DamageOutcome::Ignored;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            return DamageOutcome::Killed;
        }

        let entered_recovery = self.check_thresholds();

        if knockback > 0.0 {
            let force = if self.kind == EnemyKind::Boss {
                knockback * BOSS_KNOCKBACK_FACTOR
            } else {
                knockback
            };
            let away = (self.position - origin).normalize_or_zero();
            self.velocity += away * force;
            self.knockback_ms = KNOCKBACK_RECOVERY_MS;
        }

        DamageOutcome::Survived { entered_recovery }
    }

    fn check_thresholds(&mut self) -> bool {
        let ratio = self.health as f32 / self.max_health as f32;
        let Some(boss) = self.boss.as_mut() else {
            return false;
        };
        let Some(threshold) = BOSS_RECOVERY_THRESHOLDS.get(boss.thresholds_passed) else {
            return false;
        };
        if ratio > *threshold {
            return false;
        }
        boss.thresholds_passed += 1;
        boss.recovery_ms = Some(BOSS_RECOVERY_MS);
        boss.speed_before_recovery = self.speed;
        self.speed = 0.0;
        self.velocity = Vec2::ZERO;
        self.knockback_ms = 0.0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boss() -> Enemy {
        Enemy::spawn(&EnemySpawn {
            kind: EnemyKind::Boss,
            position: Vec2::new(300.0, 0.0),
            health: 100,
            speed: 24.0,
            damage: 35,
            xp_value: 100,
            gold_value: 200,
            is_elite: false,
            boss_number: Some(1),
        })
    }

    fn enraged_boss() -> Enemy {
        let mut boss = boss();
        assert!(boss.overload(20.0));
        let _ = boss.advance_boss(BOSS_OVERLOAD_MS);
        boss
    }

    #[test]
    fn shielded_boss_ignores_damage() {
        let mut boss = boss();
        assert!(boss.invulnerable());
        assert_eq!(boss.take_damage(50, 0.0, Vec2::ZERO), DamageOutcome::Ignored);
        assert_eq!(boss.health, 100);
    }

    #[test]
    fn overload_ends_in_enraged_pursuit() {
        let mut boss = boss();
        assert!(boss.overload(20.0));
        assert!(!boss.overload(20.0));
        assert_eq!(boss.boss_motion(), Some(BossMotion::Stationary));
        assert_eq!(boss.advance_boss(1_000.0), BossTransition::None);
        assert_eq!(boss.advance_boss(2_000.0), BossTransition::Enraged);
        assert!(!boss.invulnerable());
        assert_eq!(boss.boss_motion(), Some(BossMotion::Enraged));
        assert!((boss.speed - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn thresholds_trigger_recovery_once_each_in_order() {
        let mut boss = enraged_boss();
        assert_eq!(
            boss.take_damage(30, 0.0, Vec2::ZERO),
            DamageOutcome::Survived {
                entered_recovery: true
            }
        );
        assert!(boss.invulnerable());
        assert!(boss.speed.abs() < f32::EPSILON);
        assert_eq!(boss.advance_boss(BOSS_RECOVERY_MS), BossTransition::RecoveryEnded);
        assert!((boss.speed - 20.0).abs() < f32::EPSILON);

        // 70 % is still under 75 %, but that threshold is spent; 50 % is next.
        assert_eq!(
            boss.take_damage(5, 0.0, Vec2::ZERO),
            DamageOutcome::Survived {
                entered_recovery: false
            }
        );
        assert_eq!(
            boss.take_damage(20, 0.0, Vec2::ZERO),
            DamageOutcome::Survived {
                entered_recovery: true
            }
        );
        assert_eq!(boss.boss.as_ref().map(|b| b.thresholds_passed), Some(2));
    }

    #[test]
    fn recovery_freezes_overload_countdown() {
        let mut boss = boss();
        assert!(boss.overload(20.0));
        if let Some(state) = boss.boss.as_mut() {
            state.recovery_ms = Some(BOSS_RECOVERY_MS);
        }
        assert_eq!(boss.advance_boss(BOSS_RECOVERY_MS), BossTransition::RecoveryEnded);
        assert_eq!(boss.boss.as_ref().and_then(|b| b.overload_ms), Some(BOSS_OVERLOAD_MS));
        assert!(boss.invulnerable());
    }

    #[test]
    fn boss_knockback_is_dampened() {
        let mut boss = enraged_boss();
        boss.velocity = Vec2::ZERO;
        let _ = boss.take_damage(1, 100.0, Vec2::ZERO);
        assert!((boss.velocity.x - 30.0).abs() < 1e-4);
        assert!((boss.knockback_ms - KNOCKBACK_RECOVERY_MS).abs() < f32::EPSILON);
    }
}
