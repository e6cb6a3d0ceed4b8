#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure steering table for Desktop Defender enemies.
//!
//! Every archetype maps to a [`Movement`] pattern plus optional interval
//! effects. [`steer`] takes the full behavior state of one enemy and returns
//! the velocity it should adopt together with any effect that fired during
//! the step. The world owns the state; this crate never stores any, so an
//! enemy that leaves its pool slot simply stops being steered and none of its
//! countdowns can fire afterwards.

use desktop_defender_core::{EnemyKind, Vec2};

/// Milliseconds between glitch teleports.
pub const TELEPORT_INTERVAL_MS: f32 = 1_500.0;

/// Distance covered by a single glitch teleport.
pub const TELEPORT_DISTANCE: f32 = 50.0;

/// Glitches closer than this to the turret do not teleport.
pub const TELEPORT_MIN_RANGE: f32 = 60.0;

/// Milliseconds between seeker beam attacks.
pub const BEAM_INTERVAL_MS: f32 = 3_000.0;

/// Orbit radius held by seekers.
pub const SEEKER_ORBIT_RADIUS: f32 = 180.0;

/// Orbit radius held by a shielded boss.
pub const BOSS_ORBIT_RADIUS: f32 = 200.0;

/// Slack, in squared pixels, around the orbit radius.
const ORBIT_BAND: f32 = 1_000.0;

/// Movement pattern an enemy follows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Movement {
    /// Head straight for the turret.
    Chase,
    /// Chase with a sinusoidal sideways wobble.
    Waving {
        /// Wobble amplitude as a fraction of speed.
        amplitude: f32,
        /// Wobble frequency per millisecond of age.
        frequency: f32,
    },
    /// Approach to a radius, then circle the turret.
    Orbit {
        /// Distance to hold from the turret.
        radius: f32,
    },
    /// Stand still.
    Hold,
}

/// Motion-relevant sub-state of a boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BossMotion {
    /// Shield is up; the boss orbits.
    Shielded,
    /// Overloaded or recovering; the boss stands still.
    Stationary,
    /// Damageable pursuit with an erratic wobble.
    Enraged,
}

/// Movement pattern for `kind`, taking the boss sub-state into account.
#[must_use]
pub fn movement(kind: EnemyKind, boss: Option<BossMotion>) -> Movement {
    match (kind, boss) {
        (EnemyKind::Boss, Some(BossMotion::Shielded)) => Movement::Orbit {
            radius: BOSS_ORBIT_RADIUS,
        },
        (EnemyKind::Boss, Some(BossMotion::Stationary)) => Movement::Hold,
        (EnemyKind::Boss, _) => Movement::Waving {
            amplitude: 0.5,
            frequency: 0.005,
        },
        (EnemyKind::Runner, _) => Movement::Waving {
            amplitude: 0.8,
            frequency: 0.01,
        },
        (EnemyKind::Seeker, _) => Movement::Orbit {
            radius: SEEKER_ORBIT_RADIUS,
        },
        _ => Movement::Chase,
    }
}

/// Interval countdowns owned by a single enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BehaviorTimers {
    /// Milliseconds until the next teleport attempt.
    pub teleport_ms: Option<f32>,
    /// Milliseconds until the next beam attack.
    pub beam_ms: Option<f32>,
}

impl BehaviorTimers {
    /// Countdowns a freshly spawned enemy of `kind` starts with.
    #[must_use]
    pub fn for_kind(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Glitch => Self {
                teleport_ms: Some(TELEPORT_INTERVAL_MS),
                beam_ms: None,
            },
            EnemyKind::Seeker => Self {
                teleport_ms: None,
                beam_ms: Some(BEAM_INTERVAL_MS),
            },
            _ => Self::default(),
        }
    }
}

/// Behavior state of one enemy for a single step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteeringInput {
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Current position.
    pub position: Vec2,
    /// Position being pursued.
    pub target: Vec2,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Milliseconds since the enemy spawned.
    pub age_ms: f32,
    /// Milliseconds covered by the step.
    pub dt_ms: f32,
    /// Interval countdowns before the step.
    pub timers: BehaviorTimers,
    /// Boss sub-state; `None` for every other archetype.
    pub boss: Option<BossMotion>,
    /// Whether the enemy currently ignores damage.
    pub invulnerable: bool,
}

/// Outcome of a single steering step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Steering {
    /// Velocity to adopt, in pixels per second.
    pub velocity: Vec2,
    /// Position to jump to before moving, if a teleport fired.
    pub teleport_to: Option<Vec2>,
    /// Whether a beam attack fired.
    pub fire_beam: bool,
    /// Interval countdowns after the step.
    pub timers: BehaviorTimers,
}

/// Computes the velocity and effects for one enemy step.
#[must_use]
pub fn steer(input: &SteeringInput) -> Steering {
    let mut timers = input.timers;
    let to_target = input.target - input.position;
    let distance = to_target.length();
    let direction = to_target.normalize_or_zero();
    let active = !input.invulnerable;

    let mut teleport_to = None;
    if let Some(remaining) = timers.teleport_ms.as_mut() {
        if tick_interval(remaining, input.dt_ms, TELEPORT_INTERVAL_MS)
            && active
            && distance > TELEPORT_MIN_RANGE
        {
            teleport_to = Some(input.position + direction * TELEPORT_DISTANCE);
        }
    }

    let mut fire_beam = false;
    if let Some(remaining) = timers.beam_ms.as_mut() {
        fire_beam = tick_interval(remaining, input.dt_ms, BEAM_INTERVAL_MS) && active;
    }

    let from = teleport_to.unwrap_or(input.position);
    let velocity = velocity_for(
        movement(input.kind, input.boss),
        from,
        input.target,
        input.speed,
        input.age_ms,
    );

    Steering {
        velocity,
        teleport_to,
        fire_beam,
        timers,
    }
}

/// Velocity that `movement` produces from `position` toward `target`.
#[must_use]
pub fn velocity_for(
    movement: Movement,
    position: Vec2,
    target: Vec2,
    speed: f32,
    age_ms: f32,
) -> Vec2 {
    let offset = target - position;
    let direction = offset.normalize_or_zero();
    match movement {
        Movement::Chase => direction * speed,
        Movement::Waving {
            amplitude,
            frequency,
        } => {
            let wobble = (age_ms * frequency).sin() * speed * amplitude;
            direction * speed + direction.perp() * wobble
        }
        Movement::Orbit { radius } => {
            let distance_sq = offset.length_squared();
            let radius_sq = radius * radius;
            if distance_sq > radius_sq + ORBIT_BAND {
                direction * speed
            } else if distance_sq < radius_sq - ORBIT_BAND {
                -direction * speed
            } else {
                direction.perp() * speed
            }
        }
        Movement::Hold => Vec2::ZERO,
    }
}

/// Advances an interval countdown, returning `true` when it elapsed.
fn tick_interval(remaining: &mut f32, dt_ms: f32, interval_ms: f32) -> bool {
    *remaining -= dt_ms;
    if *remaining > 0.0 {
        return false;
    }
    *remaining += interval_ms;
    if *remaining <= 0.0 {
        *remaining = interval_ms;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(kind: EnemyKind, position: Vec2) -> SteeringInput {
        SteeringInput {
            kind,
            position,
            target: Vec2::ZERO,
            speed: 40.0,
            age_ms: 0.0,
            dt_ms: 16.0,
            timers: BehaviorTimers::for_kind(kind),
            boss: None,
            invulnerable: false,
        }
    }

    #[test]
    fn grunt_chases_directly() {
        let steering = steer(&input(EnemyKind::Grunt, Vec2::new(100.0, 0.0)));
        assert!((steering.velocity - Vec2::new(-40.0, 0.0)).length() < 1e-4);
        assert!(steering.teleport_to.is_none());
        assert!(!steering.fire_beam);
    }

    #[test]
    fn runner_wobbles_perpendicular_to_heading() {
        let mut runner = input(EnemyKind::Runner, Vec2::new(100.0, 0.0));
        runner.age_ms = 157.0;
        let steering = steer(&runner);
        assert!((steering.velocity.x + 40.0).abs() < 1e-3);
        assert!(steering.velocity.y.abs() > 30.0);
    }

    #[test]
    fn orbit_band_approaches_retreats_and_circles() {
        let target = Vec2::ZERO;
        let orbit = Movement::Orbit { radius: 180.0 };
        let far = velocity_for(orbit, Vec2::new(400.0, 0.0), target, 10.0, 0.0);
        let near = velocity_for(orbit, Vec2::new(50.0, 0.0), target, 10.0, 0.0);
        let on = velocity_for(orbit, Vec2::new(180.0, 0.0), target, 10.0, 0.0);
        assert!(far.x < 0.0);
        assert!(near.x > 0.0);
        assert!(on.x.abs() < 1e-4);
        assert!((on.y.abs() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn glitch_teleports_on_interval_when_far() {
        let mut glitch = input(EnemyKind::Glitch, Vec2::new(300.0, 0.0));
        glitch.dt_ms = TELEPORT_INTERVAL_MS;
        let steering = steer(&glitch);
        assert_eq!(steering.teleport_to, Some(Vec2::new(250.0, 0.0)));
        assert_eq!(steering.timers.teleport_ms, Some(TELEPORT_INTERVAL_MS));
    }

    #[test]
    fn glitch_stays_put_when_close() {
        let mut glitch = input(EnemyKind::Glitch, Vec2::new(40.0, 0.0));
        glitch.dt_ms = TELEPORT_INTERVAL_MS;
        assert!(steer(&glitch).teleport_to.is_none());
    }

    #[test]
    fn seeker_fires_beam_every_interval() {
        let mut seeker = input(EnemyKind::Seeker, Vec2::new(180.0, 0.0));
        let mut fired = 0;
        for _ in 0..(6_100 / 16) {
            let steering = steer(&seeker);
            seeker.timers = steering.timers;
            if steering.fire_beam {
                fired += 1;
            }
        }
        assert_eq!(fired, 2);
    }

    #[test]
    fn boss_sub_states_select_movement() {
        assert_eq!(
            movement(EnemyKind::Boss, Some(BossMotion::Shielded)),
            Movement::Orbit {
                radius: BOSS_ORBIT_RADIUS
            }
        );
        assert_eq!(
            movement(EnemyKind::Boss, Some(BossMotion::Stationary)),
            Movement::Hold
        );
        assert!(matches!(
            movement(EnemyKind::Boss, Some(BossMotion::Enraged)),
            Movement::Waving { .. }
        ));
    }
}
