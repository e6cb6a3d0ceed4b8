#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Desktop Defender.
//!
//! The world owns the enemy and projectile pools and the turret. It only
//! changes through [`apply`], and every observable change is reported as an
//! [`Event`]. Pool handles carry a generation so commands aimed at entities
//! that already left play are ignored instead of touching a recycled slot.

mod enemy;
mod pool;
mod projectile;
mod turret;

use desktop_defender_core::{
    balance::TROJAN_SCOUT_COUNT, Command, EnemyId, EnemyKind, Event, Vec2,
};
use desktop_defender_system_enemy_behavior::{steer, SteeringInput};
use tracing::debug;

use crate::{
    enemy::{BossTransition, DamageOutcome, Enemy},
    pool::Pool,
    projectile::{PierceOutcome, Projectile},
    turret::Turret,
};

/// Default capacity of the enemy pool.
pub const DEFAULT_ENEMY_CAPACITY: usize = 80;

/// Default capacity of the projectile pool.
pub const DEFAULT_PROJECTILE_CAPACITY: usize = 150;

/// Represents the authoritative Desktop Defender world state.
#[derive(Debug)]
pub struct World {
    enemies: Pool<Enemy>,
    projectiles: Pool<Projectile>,
    turret: Turret,
    tick_index: u64,
}

impl World {
    /// Creates a world with default pool capacities and the turret at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ENEMY_CAPACITY, DEFAULT_PROJECTILE_CAPACITY)
    }

    /// Creates a world with the provided pool capacities.
    #[must_use]
    pub fn with_capacity(enemy_capacity: usize, projectile_capacity: usize) -> Self {
        Self {
            enemies: Pool::with_capacity(enemy_capacity),
            projectiles: Pool::with_capacity(projectile_capacity),
            turret: Turret::new(Vec2::ZERO),
            tick_index: 0,
        }
    }

    fn step_enemies(&mut self, dt_ms: f32, out_events: &mut Vec<Event>) {
        let target = self.turret.position;
        for (index, generation) in self.enemies.handles() {
            let Some(enemy) = self.enemies.get_mut(index, generation) else {
                continue;
            };
            let id = EnemyId::new(index, generation);
            enemy.age_ms += dt_ms;

            if enemy.advance_boss(dt_ms) == BossTransition::Enraged {
                debug!(enemy = index, "boss overload ended");
                out_events.push(Event::BossEnraged);
            }

            let steering = steer(&SteeringInput {
                kind: enemy.kind,
                position: enemy.position,
                target,
                speed: enemy.speed,
                age_ms: enemy.age_ms,
                dt_ms,
                timers: enemy.timers,
                boss: enemy.boss_motion(),
                invulnerable: enemy.invulnerable(),
            });
            enemy.timers = steering.timers;

            if let Some(position) = steering.teleport_to {
                enemy.position = position;
                out_events.push(Event::EnemyTeleported { enemy: id, position });
            }

            if enemy.knockback_ms > 0.0 {
                enemy.knockback_ms -= dt_ms;
            } else {
                enemy.velocity = steering.velocity;
            }
            enemy.position += enemy.velocity * (dt_ms / 1_000.0);

            if steering.fire_beam {
                let damage = enemy.damage;
                out_events.push(Event::EnemyBeamFired {
                    enemy: id,
                    position: enemy.position,
                    damage,
                });
                self.damage_turret(damage, out_events);
            }
        }
    }

    fn step_projectiles(&mut self, dt_ms: f32) {
        for (index, generation) in self.projectiles.handles() {
            let expired = match self.projectiles.get_mut(index, generation) {
                Some(projectile) => !projectile.advance(dt_ms),
                None => false,
            };
            if expired {
                let _ = self.projectiles.release(index, generation, self.tick_index);
            }
        }
    }

    fn damage_turret(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        self.turret.take_damage(amount);
        out_events.push(Event::TurretDamaged {
            current: self.turret.health,
            max: self.turret.max_health,
            position: self.turret.position,
        });
    }

    fn damage_enemy(
        &mut self,
        id: EnemyId,
        amount: u32,
        knockback: f32,
        is_crit: bool,
        out_events: &mut Vec<Event>,
    ) {
        let origin = self.turret.position;
        let Some(enemy) = self.enemies.get_mut(id.index(), id.generation()) else {
            debug!(enemy = id.index(), "damage for inactive enemy ignored");
            return;
        };
        let position = enemy.position;
        let outcome = enemy.take_damage(amount, knockback, origin);
        if outcome == DamageOutcome::Ignored {
            return;
        }

        out_events.push(Event::DamageDealt {
            enemy: id,
            position,
            amount,
            is_crit,
        });

        if enemy.kind == EnemyKind::Boss {
            if let DamageOutcome::Survived {
                entered_recovery: true,
            } = outcome
            {
                out_events.push(Event::BossRecoveryState);
            }
            out_events.push(Event::BossDamaged {
                current: enemy.health,
                max: enemy.max_health,
            });
        }

        if outcome == DamageOutcome::Killed {
            self.kill_enemy(id, out_events);
        }
    }

    fn kill_enemy(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        let Some(enemy) = self
            .enemies
            .release(id.index(), id.generation(), self.tick_index)
        else {
            return;
        };
        match enemy.kind {
            EnemyKind::Boss => out_events.push(Event::BossKilled {
                position: enemy.position,
            }),
            EnemyKind::Trojan => out_events.push(Event::SpawnScouts {
                position: enemy.position,
                count: TROJAN_SCOUT_COUNT,
            }),
            _ => {}
        }
        out_events.push(Event::EnemyKilled {
            enemy: id,
            position: enemy.position,
            kind: enemy.kind,
            xp_value: enemy.xp_value,
            gold_value: enemy.gold_value,
            is_elite: enemy.is_elite,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt_ms } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt_ms });
        }
        Command::StepEntities { dt_ms } => {
            world.step_enemies(dt_ms, out_events);
            world.step_projectiles(dt_ms);
        }
        Command::SpawnEnemy { spawn } => {
            let enemy = Enemy::spawn(&spawn);
            match world.enemies.acquire(world.tick_index, enemy) {
                Some((index, generation)) => out_events.push(Event::EnemySpawned {
                    enemy: EnemyId::new(index, generation),
                    kind: spawn.kind,
                    position: spawn.position,
                    is_elite: spawn.is_elite,
                }),
                None => debug!(kind = %spawn.kind, "enemy pool exhausted; spawn dropped"),
            }
        }
        Command::OverloadBoss {
            enemy,
            enraged_speed,
        } => {
            let overloaded = world
                .enemies
                .get_mut(enemy.index(), enemy.generation())
                .map_or(false, |boss| boss.overload(enraged_speed));
            if !overloaded {
                debug!(enemy = enemy.index(), "overload request ignored");
            }
        }
        Command::FireProjectile { projectile } => {
            let launched = Projectile::launch(&projectile);
            if world
                .projectiles
                .acquire(world.tick_index, launched)
                .is_none()
            {
                debug!(weapon = %projectile.weapon, "projectile pool exhausted; shot dropped");
            }
        }
        Command::DamageEnemy {
            enemy,
            amount,
            knockback,
            is_crit,
        } => world.damage_enemy(enemy, amount, knockback, is_crit, out_events),
        Command::ProjectileHitEnemy { projectile, enemy } => {
            let Some(shot) = world
                .projectiles
                .get(projectile.index(), projectile.generation())
                .cloned()
            else {
                debug!(projectile = projectile.index(), "stale projectile overlap skipped");
                return;
            };
            let Some(position) = world
                .enemies
                .get(enemy.index(), enemy.generation())
                .map(|target| target.position)
            else {
                debug!(enemy = enemy.index(), "stale enemy overlap skipped");
                return;
            };

            out_events.push(Event::ProjectileHit {
                position,
                is_crit: shot.is_crit,
                weapon: shot.weapon,
            });
            world.damage_enemy(enemy, shot.damage, shot.knockback, shot.is_crit, out_events);

            let spent = world
                .projectiles
                .get_mut(projectile.index(), projectile.generation())
                .map_or(false, |live| live.register_hit() == PierceOutcome::Spent);
            if spent {
                let _ = world.projectiles.release(
                    projectile.index(),
                    projectile.generation(),
                    world.tick_index,
                );
            }
        }
        Command::EnemyReachedTurret { enemy } => {
            let Some(consumed) =
                world
                    .enemies
                    .release(enemy.index(), enemy.generation(), world.tick_index)
            else {
                return;
            };
            world.damage_turret(consumed.damage, out_events);
            out_events.push(Event::EnemyReachedTurret {
                enemy,
                kind: consumed.kind,
            });
        }
        Command::HealTurret { amount } => {
            world.turret.heal(amount);
            out_events.push(Event::TurretDamaged {
                current: world.turret.health,
                max: world.turret.max_health,
                position: world.turret.position,
            });
        }
        Command::RestoreTurretHealth { health } => {
            world.turret.health = health.min(world.turret.max_health);
        }
        Command::ConfigureTurret { stats, max_health } => {
            world.turret.stats = stats;
            world.turret.set_max_health(max_health);
        }
        Command::PlaceTurret { position } => {
            world.turret.position = position;
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use desktop_defender_core::{
        EnemyId, EnemySnapshot, EnemyView, ProjectileId, ProjectileSnapshot, ProjectileView,
        TurretSnapshot, PROJECTILE_RADIUS, TURRET_RADIUS,
    };

    use super::World;

    /// Captures a read-only view of every active enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|(index, generation, enemy)| EnemySnapshot {
                    id: EnemyId::new(index, generation),
                    kind: enemy.kind,
                    position: enemy.position,
                    velocity: enemy.velocity,
                    radius: enemy.radius(),
                    health: enemy.health,
                    max_health: enemy.max_health,
                    invulnerable: enemy.invulnerable(),
                    is_elite: enemy.is_elite,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of every active projectile.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|(index, generation, projectile)| ProjectileSnapshot {
                    id: ProjectileId::new(index, generation),
                    position: projectile.position,
                    velocity: projectile.velocity,
                    radius: PROJECTILE_RADIUS,
                    damage: projectile.damage,
                    piercing: projectile.piercing,
                    weapon: projectile.weapon,
                })
                .collect(),
        )
    }

    /// Captures the turret state.
    #[must_use]
    pub fn turret(world: &World) -> TurretSnapshot {
        TurretSnapshot {
            position: world.turret.position,
            radius: TURRET_RADIUS,
            health: world.turret.health,
            max_health: world.turret.max_health,
            stats: world.turret.stats,
        }
    }

    /// Number of enemies currently occupying pool slots.
    #[must_use]
    pub fn active_enemy_count(world: &World) -> usize {
        world.enemies.active_count()
    }

    /// Number of projectiles currently occupying pool slots.
    #[must_use]
    pub fn active_projectile_count(world: &World) -> usize {
        world.projectiles.active_count()
    }

    /// Capacities of the enemy and projectile pools.
    #[must_use]
    pub fn pool_capacities(world: &World) -> (usize, usize) {
        (world.enemies.capacity(), world.projectiles.capacity())
    }

    /// Whether the handle still refers to a live enemy.
    #[must_use]
    pub fn is_enemy_active(world: &World, enemy: EnemyId) -> bool {
        world.enemies.get(enemy.index(), enemy.generation()).is_some()
    }

    /// Index of the current tick.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Sub-state of a live boss.
    #[must_use]
    pub fn boss_status(world: &World, enemy: EnemyId) -> Option<BossStatus> {
        let boss = world
            .enemies
            .get(enemy.index(), enemy.generation())?
            .boss
            .as_ref()?;
        Some(BossStatus {
            shielded: boss.shielded,
            overloaded: boss.overload_ms.is_some(),
            recovering: boss.recovery_ms.is_some(),
            thresholds_passed: boss.thresholds_passed,
        })
    }

    /// Read-only description of a boss's layered sub-states.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BossStatus {
        /// Shield raised during the minion gauntlet.
        pub shielded: bool,
        /// Stationary overload window after the shield drops.
        pub overloaded: bool,
        /// Health-threshold recovery window.
        pub recovering: bool,
        /// Recovery thresholds already consumed.
        pub thresholds_passed: usize,
    }
}
