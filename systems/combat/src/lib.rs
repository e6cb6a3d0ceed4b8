#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns collision overlaps into combat commands.
//!
//! The collision layer reports overlaps for the state at the start of the
//! pass. Combat walks them in order and keeps a running ledger of pierce
//! budgets, pending enemy health and consumed enemies, so an overlap that an
//! earlier one in the same batch made stale is skipped rather than forwarded.

use desktop_defender_core::{
    Command, EnemyId, EnemyView, Overlap, ProjectileId, ProjectileSnapshot, ProjectileView,
};
use tracing::debug;

/// Combat system that reuses its ledger buffers between passes.
#[derive(Debug, Default)]
pub struct Combat {
    budgets: Vec<(ProjectileId, u32)>,
    health: Vec<(EnemyId, u32)>,
    consumed: Vec<EnemyId>,
}

impl Combat {
    /// Creates a combat system with empty ledgers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits hit, splash and contact commands for the provided overlaps.
    pub fn handle(
        &mut self,
        overlaps: &[Overlap],
        enemies: &EnemyView,
        projectiles: &ProjectileView,
        out: &mut Vec<Command>,
    ) {
        if overlaps.is_empty() {
            return;
        }

        self.budgets.clear();
        self.health.clear();
        self.consumed.clear();

        for overlap in overlaps {
            match *overlap {
                Overlap::ProjectileEnemy { projectile, enemy } => {
                    let Some(shot) = projectiles.get(projectile) else {
                        debug!(projectile = projectile.index(), "overlap with inactive projectile");
                        continue;
                    };
                    if !self.enemy_alive(enemies, enemy) || !self.take_budget(shot) {
                        continue;
                    }
                    out.push(Command::ProjectileHitEnemy { projectile, enemy });
                    self.record_damage(enemies, enemy, shot.damage);
                    self.splash(enemies, enemy, shot, out);
                }
                Overlap::EnemyTurret { enemy } => {
                    if !self.enemy_alive(enemies, enemy) {
                        continue;
                    }
                    self.consumed.push(enemy);
                    out.push(Command::EnemyReachedTurret { enemy });
                }
            }
        }
    }

    fn enemy_alive(&self, enemies: &EnemyView, enemy: EnemyId) -> bool {
        if enemies.get(enemy).is_none() || self.consumed.contains(&enemy) {
            return false;
        }
        self.health
            .iter()
            .find(|(id, _)| *id == enemy)
            .map_or(true, |(_, remaining)| *remaining > 0)
    }

    /// Spends one hit from the projectile's pierce budget.
    fn take_budget(&mut self, shot: &ProjectileSnapshot) -> bool {
        let index = match self.budgets.iter().position(|(id, _)| *id == shot.id) {
            Some(index) => index,
            None => {
                self.budgets.push((shot.id, shot.piercing.saturating_add(1)));
                self.budgets.len() - 1
            }
        };
        let remaining = &mut self.budgets[index].1;
        if *remaining == 0 {
            return false;
        }
        *remaining -= 1;
        true
    }

    fn record_damage(&mut self, enemies: &EnemyView, enemy: EnemyId, amount: u32) {
        let Some(snapshot) = enemies.get(enemy) else {
            return;
        };
        if snapshot.invulnerable {
            return;
        }
        match self.health.iter_mut().find(|(id, _)| *id == enemy) {
            Some((_, remaining)) => *remaining = remaining.saturating_sub(amount),
            None => self
                .health
                .push((enemy, snapshot.health.saturating_sub(amount))),
        }
    }

    fn splash(
        &mut self,
        enemies: &EnemyView,
        struck: EnemyId,
        shot: &ProjectileSnapshot,
        out: &mut Vec<Command>,
    ) {
        let Some(radius) = shot.weapon.definition().splash_radius else {
            return;
        };
        let Some(centre) = enemies.get(struck).map(|snapshot| snapshot.position) else {
            return;
        };
        let amount = shot.damage / 2;
        if amount == 0 {
            return;
        }

        let caught: Vec<EnemyId> = enemies
            .iter()
            .filter(|other| other.id != struck)
            .filter(|other| other.position.distance_squared(centre) <= radius * radius)
            .map(|other| other.id)
            .collect();
        for enemy in caught {
            if !self.enemy_alive(enemies, enemy) {
                continue;
            }
            out.push(Command::DamageEnemy {
                enemy,
                amount,
                knockback: 0.0,
                is_crit: false,
            });
            self.record_damage(enemies, enemy, amount);
        }
    }
}
