#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks the turret's target and fires the mounted weapon.
//!
//! Projectile weapons emit `Command::FireProjectile`; beam and chain weapons
//! resolve instantly and emit `Command::DamageEnemy` for every enemy struck.

use desktop_defender_core::{
    weapons::{
        BARREL_LENGTH, BEAM_DAMAGE_MULTIPLIER, BEAM_LENGTH, MULTISHOT_BEAM_STEP_DEGREES,
        MULTISHOT_SINGLE_STEP_DEGREES,
    },
    Command, EnemyId, EnemySnapshot, EnemyView, Event, ProjectileSpawn, TurretSnapshot,
    TurretStats, Vec2, WeaponDefinition, WeaponKind, WeaponPattern,
};
use rand::Rng;

/// Nearest enemy strictly inside the turret's range.
///
/// Ties go to the lower slot because the view iterates in slot order.
#[must_use]
pub fn select_target(turret: &TurretSnapshot, enemies: &EnemyView) -> Option<EnemyId> {
    let mut best = None;
    let mut limit = turret.stats.range * turret.stats.range;
    for enemy in enemies.iter() {
        let distance_sq = enemy.position.distance_squared(turret.position);
        if distance_sq < limit {
            limit = distance_sq;
            best = Some(enemy.id);
        }
    }
    best
}

/// Rolls a critical hit and returns the damage of one shot.
pub fn roll_damage<R: Rng + ?Sized>(stats: &TurretStats, rng: &mut R) -> (u32, bool) {
    let is_crit = rng.gen::<f64>() < stats.crit_chance;
    if is_crit {
        let damage = (stats.base_damage as f32 * stats.crit_multiplier).floor() as u32;
        (damage, true)
    } else {
        (stats.base_damage, false)
    }
}

/// Point a projectile of `speed` should aim at to meet a target moving at
/// `velocity`, using the straight-line time to impact.
#[must_use]
pub fn lead_aim(origin: Vec2, position: Vec2, velocity: Vec2, speed: f32) -> Vec2 {
    if speed <= 0.0 {
        return position;
    }
    let time_to_impact = origin.distance(position) / speed;
    position + velocity * time_to_impact
}

/// Angles of `count` shots spaced evenly across `arc` radians around `center`.
#[must_use]
pub fn fan_angles(center: f32, count: u32, arc: f32) -> Vec<f32> {
    if count <= 1 {
        return vec![center];
    }
    let start = center - arc / 2.0;
    let step = arc / (count - 1) as f32;
    (0..count).map(|index| start + step * index as f32).collect()
}

/// Whether the segment `start..end` touches the circle at `center`.
#[must_use]
pub fn segment_hits_circle(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> bool {
    let segment = end - start;
    let length_sq = segment.length_squared();
    let t = if length_sq > 0.0 {
        ((center - start).dot(segment) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = start + segment * t;
    closest.distance_squared(center) <= radius * radius
}

/// Weapon system holding the mounted weapon and its cooldown.
#[derive(Debug)]
pub struct Weapons {
    weapon: WeaponKind,
    cooldown_ms: f32,
    struck: Vec<EnemyId>,
}

impl Weapons {
    /// Creates a weapon system ready to fire `weapon` immediately.
    #[must_use]
    pub fn new(weapon: WeaponKind) -> Self {
        Self {
            weapon,
            cooldown_ms: 0.0,
            struck: Vec::new(),
        }
    }

    /// Currently mounted weapon.
    #[must_use]
    pub fn weapon(&self) -> WeaponKind {
        self.weapon
    }

    /// Swaps the mounted weapon; the running cooldown carries over.
    pub fn mount(&mut self, weapon: WeaponKind) {
        self.weapon = weapon;
    }

    /// Milliseconds until the next shot once a target is present.
    #[must_use]
    pub fn cooldown_ms(&self) -> f32 {
        self.cooldown_ms
    }

    /// Advances the cooldown and fires at `target` when it elapses.
    ///
    /// Nothing happens, the cooldown included, while there is no live target.
    #[allow(clippy::too_many_arguments)]
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        turret: &TurretSnapshot,
        enemies: &EnemyView,
        target: Option<EnemyId>,
        rng: &mut R,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(target) = target.and_then(|id| enemies.get(id)) else {
            return;
        };

        self.cooldown_ms -= dt_ms;
        if self.cooldown_ms > 0.0 {
            return;
        }

        let definition = self.weapon.definition();
        self.fire(&definition, turret, enemies, target, rng, out_commands);
        self.cooldown_ms = definition.cooldown_ms(turret.stats.fire_rate_multiplier);

        let heading = (target.position - turret.position).normalize_or_zero();
        out_events.push(Event::WeaponFired {
            weapon: self.weapon,
        });
        out_events.push(Event::WeaponFiredVfx {
            position: turret.position + heading * BARREL_LENGTH,
        });
    }

    fn fire<R: Rng + ?Sized>(
        &mut self,
        definition: &WeaponDefinition,
        turret: &TurretSnapshot,
        enemies: &EnemyView,
        target: &EnemySnapshot,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) {
        let stats = &turret.stats;
        let (damage, is_crit) = roll_damage(stats, rng);
        let offset = target.position - turret.position;
        let angle = offset.y.atan2(offset.x);
        let knockback = definition.knockback + stats.knockback;

        match definition.pattern {
            WeaponPattern::Single => {
                let aim = lead_aim(
                    turret.position,
                    target.position,
                    target.velocity,
                    definition.projectile_speed,
                );
                let aim_offset = aim - turret.position;
                let arc = (MULTISHOT_SINGLE_STEP_DEGREES * stats.multishot as f32).to_radians();
                for heading in fan_angles(aim_offset.y.atan2(aim_offset.x), 1 + stats.multishot, arc)
                {
                    out.push(projectile(definition, turret, heading, damage, knockback, is_crit));
                }
            }
            WeaponPattern::Spread { count, arc_degrees } => {
                for heading in fan_angles(angle, count + stats.multishot, arc_degrees.to_radians()) {
                    out.push(projectile(definition, turret, heading, damage, knockback, is_crit));
                }
            }
            WeaponPattern::Beam => {
                let amount = ((damage as f32 * BEAM_DAMAGE_MULTIPLIER).floor() as u32).max(1);
                let arc = (MULTISHOT_BEAM_STEP_DEGREES * stats.multishot as f32).to_radians();
                let rays: Vec<Vec2> = fan_angles(angle, 1 + stats.multishot, arc)
                    .into_iter()
                    .map(|heading| turret.position + Vec2::from_angle(heading) * BEAM_LENGTH)
                    .collect();
                for enemy in enemies.iter() {
                    let crossed = rays.iter().any(|end| {
                        segment_hits_circle(turret.position, *end, enemy.position, enemy.radius)
                    });
                    if crossed {
                        out.push(Command::DamageEnemy {
                            enemy: enemy.id,
                            amount,
                            knockback,
                            is_crit,
                        });
                    }
                }
            }
            WeaponPattern::Chain {
                chain_count,
                chain_range,
                decay,
            } => {
                self.struck.clear();
                let mut link = Some(target);
                let mut index = 0;
                while let Some(current) = link {
                    if index > chain_count {
                        break;
                    }
                    out.push(Command::DamageEnemy {
                        enemy: current.id,
                        amount: (f64::from(damage) * decay.powi(index as i32)).floor() as u32,
                        knockback: 0.0,
                        is_crit: is_crit && index == 0,
                    });
                    self.struck.push(current.id);
                    link = nearest_unstruck(enemies, &self.struck, current.position, chain_range);
                    index += 1;
                }
            }
        }
    }
}

fn projectile(
    definition: &WeaponDefinition,
    turret: &TurretSnapshot,
    heading: f32,
    damage: u32,
    knockback: f32,
    is_crit: bool,
) -> Command {
    Command::FireProjectile {
        projectile: ProjectileSpawn {
            position: turret.position,
            velocity: Vec2::from_angle(heading) * definition.projectile_speed,
            damage,
            knockback,
            piercing: definition.piercing,
            lifetime_ms: definition.projectile_lifetime_ms,
            weapon: definition.kind,
            is_crit,
        },
    }
}

fn nearest_unstruck<'a>(
    enemies: &'a EnemyView,
    struck: &[EnemyId],
    from: Vec2,
    range: f32,
) -> Option<&'a EnemySnapshot> {
    let mut best = None;
    let mut limit = range * range;
    for enemy in enemies.iter() {
        if struck.contains(&enemy.id) {
            continue;
        }
        let distance_sq = enemy.position.distance_squared(from);
        if distance_sq < limit {
            limit = distance_sq;
            best = Some(enemy);
        }
    }
    best
}
