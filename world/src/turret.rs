//! The turret singleton.

use desktop_defender_core::{TurretStats, Vec2, TURRET_BASE_HEALTH};

#[derive(Clone, Debug)]
pub(crate) struct Turret {
    pub(crate) position: Vec2,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
    pub(crate) stats: TurretStats,
}

impl Turret {
    pub(crate) fn new(position: Vec2) -> Self {
        Self {
            position,
            health: TURRET_BASE_HEALTH,
            max_health: TURRET_BASE_HEALTH,
            stats: TurretStats::default(),
        }
    }

    pub(crate) fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub(crate) fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Applies a recomputed maximum, carrying any increase into current health.
    pub(crate) fn set_max_health(&mut self, max_health: u32) {
        let max_health = max_health.max(1);
        if max_health > self.max_health {
            self.health = self
                .health
                .saturating_add(max_health - self.max_health);
        }
        self.max_health = max_health;
        self.health = self.health.min(max_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero_and_heal_at_max() {
        let mut turret = Turret::new(Vec2::ZERO);
        turret.take_damage(150);
        assert_eq!(turret.health, 0);
        turret.heal(500);
        assert_eq!(turret.health, TURRET_BASE_HEALTH);
    }

    #[test]
    fn raising_max_health_grants_the_difference() {
        let mut turret = Turret::new(Vec2::ZERO);
        turret.take_damage(40);
        turret.set_max_health(120);
        assert_eq!(turret.health, 80);
        turret.set_max_health(50);
        assert_eq!(turret.health, 50);
    }
}
