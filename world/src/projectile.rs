//! Projectile entity state.

use desktop_defender_core::{ProjectileSpawn, Vec2, WeaponKind};

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) damage: u32,
    pub(crate) knockback: f32,
    pub(crate) piercing: u32,
    pub(crate) lifetime_ms: f32,
    pub(crate) weapon: WeaponKind,
    pub(crate) is_crit: bool,
}

/// What a hit did to the projectile's pierce budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PierceOutcome {
    Continue,
    Spent,
}

impl Projectile {
    pub(crate) fn launch(spawn: &ProjectileSpawn) -> Self {
        Self {
            position: spawn.position,
            velocity: spawn.velocity,
            damage: spawn.damage,
            knockback: spawn.knockback,
            piercing: spawn.piercing,
            lifetime_ms: spawn.lifetime_ms,
            weapon: spawn.weapon,
            is_crit: spawn.is_crit,
        }
    }

    /// Moves the projectile; returns `false` once its lifetime has run out.
    pub(crate) fn advance(&mut self, dt_ms: f32) -> bool {
        self.lifetime_ms -= dt_ms;
        if self.lifetime_ms <= 0.0 {
            return false;
        }
        self.position += self.velocity * (dt_ms / 1_000.0);
        true
    }

    pub(crate) fn register_hit(&mut self) -> PierceOutcome {
        match self.piercing.checked_sub(1) {
            Some(remaining) => {
                self.piercing = remaining;
                PierceOutcome::Continue
            }
            None => PierceOutcome::Spent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile(piercing: u32) -> Projectile {
        Projectile::launch(&ProjectileSpawn {
            position: Vec2::ZERO,
            velocity: Vec2::new(300.0, 0.0),
            damage: 10,
            knockback: 0.0,
            piercing,
            lifetime_ms: 2_000.0,
            weapon: WeaponKind::Basic,
            is_crit: false,
        })
    }

    #[test]
    fn pierce_budget_allows_exactly_p_plus_one_hits() {
        let mut shot = projectile(2);
        assert_eq!(shot.register_hit(), PierceOutcome::Continue);
        assert_eq!(shot.register_hit(), PierceOutcome::Continue);
        assert_eq!(shot.register_hit(), PierceOutcome::Spent);
    }

    #[test]
    fn lifetime_expires() {
        let mut shot = projectile(0);
        assert!(shot.advance(1_000.0));
        assert!((shot.position.x - 300.0).abs() < 1e-4);
        assert!(!shot.advance(1_000.0));
    }
}
