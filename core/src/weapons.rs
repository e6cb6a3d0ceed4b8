//! Static weapon table.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Multiplier applied to turret damage for every beam ray.
pub const BEAM_DAMAGE_MULTIPLIER: f32 = 0.6;

/// Length of a beam ray in pixels.
pub const BEAM_LENGTH: f32 = 600.0;

/// Angular spacing added per extra multishot projectile on single-shot weapons.
pub const MULTISHOT_SINGLE_STEP_DEGREES: f32 = 10.0;

/// Angular spacing added per extra multishot ray on beam weapons.
pub const MULTISHOT_BEAM_STEP_DEGREES: f32 = 6.0;

/// Distance from the turret centre to its barrel tip.
pub const BARREL_LENGTH: f32 = 14.0;

/// Weapons the turret can mount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Single projectile starter weapon.
    Basic,
    /// Short-range fan of pellets.
    Shotgun,
    /// Rapid instantaneous beam.
    Laser,
    /// Slow projectile with splash damage.
    Missile,
    /// Chain lightning that jumps between nearby enemies.
    Tesla,
}

impl WeaponKind {
    /// Every weapon in unlock order.
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Basic,
        WeaponKind::Shotgun,
        WeaponKind::Laser,
        WeaponKind::Missile,
        WeaponKind::Tesla,
    ];

    /// Stable identifier used in save state and signal payloads.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Shotgun => "shotgun",
            Self::Laser => "laser",
            Self::Missile => "missile",
            Self::Tesla => "tesla",
        }
    }

    /// Full definition of the weapon.
    #[must_use]
    pub const fn definition(self) -> WeaponDefinition {
        match self {
            Self::Basic => WeaponDefinition {
                kind: self,
                pattern: WeaponPattern::Single,
                base_fire_rate: 1.0,
                base_damage: 10,
                projectile_speed: 300.0,
                projectile_lifetime_ms: 2_000.0,
                piercing: 0,
                knockback: 0.0,
                splash_radius: None,
            },
            Self::Shotgun => WeaponDefinition {
                kind: self,
                pattern: WeaponPattern::Spread {
                    count: 5,
                    arc_degrees: 30.0,
                },
                base_fire_rate: 0.5,
                base_damage: 5,
                projectile_speed: 250.0,
                projectile_lifetime_ms: 800.0,
                piercing: 0,
                knockback: 30.0,
                splash_radius: None,
            },
            Self::Laser => WeaponDefinition {
                kind: self,
                pattern: WeaponPattern::Beam,
                base_fire_rate: 10.0,
                base_damage: 3,
                projectile_speed: 0.0,
                projectile_lifetime_ms: 0.0,
                piercing: 0,
                knockback: 0.0,
                splash_radius: None,
            },
            Self::Missile => WeaponDefinition {
                kind: self,
                pattern: WeaponPattern::Single,
                base_fire_rate: 0.3,
                base_damage: 50,
                projectile_speed: 150.0,
                projectile_lifetime_ms: 3_000.0,
                piercing: 0,
                knockback: 60.0,
                splash_radius: Some(50.0),
            },
            Self::Tesla => WeaponDefinition {
                kind: self,
                pattern: WeaponPattern::Chain {
                    chain_count: 3,
                    chain_range: 80.0,
                    decay: 0.7,
                },
                base_fire_rate: 0.8,
                base_damage: 15,
                projectile_speed: 0.0,
                projectile_lifetime_ms: 0.0,
                piercing: 0,
                knockback: 0.0,
                splash_radius: None,
            },
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for WeaponKind {
    type Err = ConfigError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        WeaponKind::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| ConfigError::UnknownWeapon(key.to_owned()))
    }
}

/// Firing pattern dispatched when a weapon's cooldown elapses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WeaponPattern {
    /// One lead-aimed projectile.
    Single,
    /// Projectiles fanned evenly across an arc centred on the aim angle.
    Spread {
        /// Number of projectiles in the fan.
        count: u32,
        /// Total width of the fan in degrees.
        arc_degrees: f32,
    },
    /// Instantaneous ray that damages everything it crosses.
    Beam,
    /// Direct damage that jumps between nearby enemies.
    Chain {
        /// Additional targets after the first.
        chain_count: u32,
        /// Maximum distance between consecutive links.
        chain_range: f32,
        /// Damage retained per jump.
        decay: f64,
    },
}

/// Immutable description of a weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponDefinition {
    /// Weapon the definition describes.
    pub kind: WeaponKind,
    /// Firing pattern.
    pub pattern: WeaponPattern,
    /// Shots per second before turret modifiers.
    pub base_fire_rate: f32,
    /// Nominal damage of the weapon.
    pub base_damage: u32,
    /// Projectile speed in pixels per second.
    pub projectile_speed: f32,
    /// Projectile lifetime in milliseconds.
    pub projectile_lifetime_ms: f32,
    /// Extra enemies a projectile may pass through.
    pub piercing: u32,
    /// Knockback contributed by the weapon itself.
    pub knockback: f32,
    /// Radius of splash damage around the struck enemy.
    pub splash_radius: Option<f32>,
}

impl WeaponDefinition {
    /// Cooldown in milliseconds between shots for the provided fire-rate multiplier.
    #[must_use]
    pub fn cooldown_ms(&self, fire_rate_multiplier: f32) -> f32 {
        let rate = self.base_fire_rate * fire_rate_multiplier;
        if rate <= 0.0 {
            return f32::INFINITY;
        }
        1_000.0 / rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_scales_inversely_with_fire_rate() {
        let basic = WeaponKind::Basic.definition();
        assert!((basic.cooldown_ms(1.0) - 1_000.0).abs() < f32::EPSILON);
        assert!((basic.cooldown_ms(2.0) - 500.0).abs() < f32::EPSILON);
        assert!(basic.cooldown_ms(0.0).is_infinite());
    }

    #[test]
    fn only_missile_splashes() {
        for kind in WeaponKind::ALL {
            let splash = kind.definition().splash_radius;
            assert_eq!(splash.is_some(), kind == WeaponKind::Missile);
        }
    }

    #[test]
    fn weapon_keys_parse() {
        assert_eq!("tesla".parse::<WeaponKind>().ok(), Some(WeaponKind::Tesla));
        assert!("railgun".parse::<WeaponKind>().is_err());
    }
}
