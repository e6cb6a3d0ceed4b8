//! Run upgrade and ascension upgrade tables.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, WeaponKind};

/// Pricing and gating shared by run and ascension upgrades.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradeCost {
    /// Price of the first level.
    pub base_cost: u32,
    /// Growth factor applied per purchased level.
    pub cost_multiplier: f64,
    /// Highest purchasable level.
    pub max_level: u32,
}

impl UpgradeCost {
    /// Price of the next level when `level` levels are already owned.
    ///
    /// Returns `None` once the upgrade is maxed.
    #[must_use]
    pub fn cost_at(&self, level: u32) -> Option<u32> {
        if level >= self.max_level {
            return None;
        }
        let cost = f64::from(self.base_cost) * self.cost_multiplier.powi(level as i32);
        Some((cost.floor() as u32).max(1))
    }
}

/// Upgrades bought with gold during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    /// +10 % damage per level.
    Damage,
    /// +8 % fire rate per level.
    FireRate,
    /// +10 px range per level.
    Range,
    /// +5 knockback per level.
    Knockback,
    /// +20 maximum health per level.
    MaxHealth,
    /// +10 % gold per level.
    Gold,
    /// +2 % critical chance per level.
    Crit,
    /// Heals one point per level every five seconds.
    Regen,
    /// One extra projectile or ray per level.
    Multishot,
}

impl UpgradeKind {
    /// Every run upgrade in shop order.
    pub const ALL: [UpgradeKind; 9] = [
        UpgradeKind::Damage,
        UpgradeKind::FireRate,
        UpgradeKind::Range,
        UpgradeKind::Knockback,
        UpgradeKind::MaxHealth,
        UpgradeKind::Gold,
        UpgradeKind::Crit,
        UpgradeKind::Regen,
        UpgradeKind::Multishot,
    ];

    /// Stable identifier used in save state and signal payloads.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Damage => "damage",
            Self::FireRate => "fire_rate",
            Self::Range => "range",
            Self::Knockback => "knockback",
            Self::MaxHealth => "max_health",
            Self::Gold => "gold",
            Self::Crit => "crit",
            Self::Regen => "regen",
            Self::Multishot => "multishot",
        }
    }

    /// Pricing for the upgrade.
    #[must_use]
    pub const fn cost(self) -> UpgradeCost {
        let (base_cost, cost_multiplier, max_level) = match self {
            Self::Damage => (25, 1.5, 50),
            Self::FireRate => (30, 1.55, 40),
            Self::Range => (20, 1.4, 20),
            Self::Knockback => (15, 1.4, 20),
            Self::MaxHealth => (20, 1.45, 50),
            Self::Gold => (50, 1.6, 25),
            Self::Crit => (40, 1.6, 25),
            Self::Regen => (35, 1.5, 20),
            Self::Multishot => (250, 3.0, 3),
        };
        UpgradeCost {
            base_cost,
            cost_multiplier,
            max_level,
        }
    }

    /// Player level required before the upgrade appears in the shop.
    #[must_use]
    pub const fn unlock_level(self) -> u32 {
        match self {
            Self::Damage | Self::FireRate | Self::Range | Self::MaxHealth => 1,
            Self::Knockback => 3,
            Self::Regen => 4,
            Self::Gold => 5,
            Self::Crit => 8,
            Self::Multishot => 15,
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for UpgradeKind {
    type Err = ConfigError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        UpgradeKind::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| ConfigError::UnknownUpgrade(key.to_owned()))
    }
}

/// Permanent upgrades bought with ascendium between runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AscensionUpgradeKind {
    /// +50 starting gold per level.
    StartingGold,
    /// +5 % experience per level.
    XpBoost,
    /// +3 starting damage per level.
    StartingDamage,
    /// +15 starting maximum health per level.
    StartingHealth,
    /// +8 % gear drop rate per level.
    DropRate,
    /// +10 % ascendium earned per level.
    AscendiumBoost,
    /// Unlocks the shotgun.
    WeaponUnlockShotgun,
    /// Unlocks the laser.
    WeaponUnlockLaser,
    /// Unlocks the missile launcher.
    WeaponUnlockMissile,
    /// Unlocks the tesla coil.
    WeaponUnlockTesla,
}

impl AscensionUpgradeKind {
    /// Every ascension upgrade in shop order.
    pub const ALL: [AscensionUpgradeKind; 10] = [
        AscensionUpgradeKind::StartingGold,
        AscensionUpgradeKind::XpBoost,
        AscensionUpgradeKind::StartingDamage,
        AscensionUpgradeKind::StartingHealth,
        AscensionUpgradeKind::DropRate,
        AscensionUpgradeKind::AscendiumBoost,
        AscensionUpgradeKind::WeaponUnlockShotgun,
        AscensionUpgradeKind::WeaponUnlockLaser,
        AscensionUpgradeKind::WeaponUnlockMissile,
        AscensionUpgradeKind::WeaponUnlockTesla,
    ];

    /// Pricing for the upgrade, denominated in ascendium.
    #[must_use]
    pub const fn cost(self) -> UpgradeCost {
        let (base_cost, cost_multiplier, max_level) = match self {
            Self::StartingGold => (5, 1.5, 20),
            Self::XpBoost => (8, 1.6, 15),
            Self::StartingDamage => (10, 1.7, 15),
            Self::StartingHealth => (8, 1.5, 20),
            Self::DropRate => (15, 1.8, 10),
            Self::AscendiumBoost => (25, 2.0, 10),
            Self::WeaponUnlockShotgun => (30, 1.0, 1),
            Self::WeaponUnlockLaser => (60, 1.0, 1),
            Self::WeaponUnlockMissile => (100, 1.0, 1),
            Self::WeaponUnlockTesla => (150, 1.0, 1),
        };
        UpgradeCost {
            base_cost,
            cost_multiplier,
            max_level,
        }
    }

    /// Weapon granted by the upgrade, if it is a weapon unlock.
    #[must_use]
    pub const fn unlocks_weapon(self) -> Option<WeaponKind> {
        match self {
            Self::WeaponUnlockShotgun => Some(WeaponKind::Shotgun),
            Self::WeaponUnlockLaser => Some(WeaponKind::Laser),
            Self::WeaponUnlockMissile => Some(WeaponKind::Missile),
            Self::WeaponUnlockTesla => Some(WeaponKind::Tesla),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_grows_geometrically_and_stops_at_max() {
        let cost = UpgradeKind::Damage.cost();
        assert_eq!(cost.cost_at(0), Some(25));
        assert_eq!(cost.cost_at(1), Some(37));
        assert_eq!(cost.cost_at(2), Some(56));
        assert_eq!(cost.cost_at(50), None);
    }

    #[test]
    fn weapon_unlocks_are_single_level() {
        for kind in AscensionUpgradeKind::ALL {
            if kind.unlocks_weapon().is_some() {
                assert_eq!(kind.cost().max_level, 1);
                assert_eq!(kind.cost().cost_at(1), None);
            }
        }
    }

    #[test]
    fn upgrade_keys_parse() {
        assert_eq!("fire_rate".parse::<UpgradeKind>().ok(), Some(UpgradeKind::FireRate));
        assert_eq!(
            "laser_eyes".parse::<UpgradeKind>(),
            Err(ConfigError::UnknownUpgrade("laser_eyes".to_owned()))
        );
    }
}
