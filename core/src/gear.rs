//! Gear items dropped by enemies and equipped onto the turret.

use serde::{Deserialize, Serialize};

/// Unique identifier assigned to a gear item when it drops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GearId(u64);

impl GearId {
    /// Creates a new gear identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Rarity tier of a gear item, ordered from least to most valuable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Most frequent tier.
    Common,
    /// Second tier.
    Uncommon,
    /// Third tier; the floor for boss drops.
    Rare,
    /// Fourth tier, available from wave 18.
    Epic,
    /// Top tier, available from wave 25.
    Legendary,
}

impl Rarity {
    /// Number of stat lines rolled for the tier.
    #[must_use]
    pub const fn stat_count(self) -> usize {
        match self {
            Self::Common => 1,
            Self::Uncommon | Self::Rare => 2,
            Self::Epic => 3,
            Self::Legendary => 4,
        }
    }

    /// Magnitude factor applied to every rolled stat.
    #[must_use]
    pub const fn magnitude(self) -> f64 {
        match self {
            Self::Common => 1.0,
            Self::Uncommon => 1.5,
            Self::Rare => 2.0,
            Self::Epic => 3.0,
            Self::Legendary => 5.0,
        }
    }

    /// Scrap multiplier for the tier.
    #[must_use]
    pub const fn scrap_multiplier(self) -> u32 {
        match self {
            Self::Common => 1,
            Self::Uncommon => 3,
            Self::Rare => 8,
            Self::Epic => 20,
            Self::Legendary => 50,
        }
    }

    /// Name prefixes drawn for items of the tier.
    #[must_use]
    pub const fn prefixes(self) -> &'static [&'static str] {
        match self {
            Self::Common => &["Basic", "Simple", "Standard"],
            Self::Uncommon => &["Enhanced", "Improved", "Tuned"],
            Self::Rare => &["Advanced", "Superior", "Refined"],
            Self::Epic => &["Elite", "Masterwork", "Prototype"],
            Self::Legendary => &["Quantum", "Singularity", "Omega"],
        }
    }
}

/// Equipment slot a gear item occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearSlot {
    /// Barrel attachment.
    Barrel,
    /// Turret chassis.
    Chassis,
    /// Targeting scope.
    Scope,
    /// Ammunition module.
    Ammo,
    /// Power core.
    Core,
}

impl GearSlot {
    /// Every slot in display order.
    pub const ALL: [GearSlot; 5] = [
        GearSlot::Barrel,
        GearSlot::Chassis,
        GearSlot::Scope,
        GearSlot::Ammo,
        GearSlot::Core,
    ];

    /// Base names drawn for items in the slot.
    #[must_use]
    pub const fn base_names(self) -> &'static [&'static str] {
        match self {
            Self::Barrel => &["Barrel", "Cannon", "Muzzle"],
            Self::Chassis => &["Chassis", "Frame", "Plating"],
            Self::Scope => &["Scope", "Lens", "Sight"],
            Self::Ammo => &["Rounds", "Shells", "Cartridge"],
            Self::Core => &["Core", "Reactor", "Capacitor"],
        }
    }
}

/// Stat lines a gear item can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GearStatKind {
    /// Flat damage bonus.
    DamageFlat,
    /// Percentage damage bonus.
    DamagePercent,
    /// Percentage fire-rate bonus.
    FireRatePercent,
    /// Percentage-point critical chance bonus.
    CritChance,
    /// Percentage-point critical multiplier bonus.
    CritDamage,
    /// Flat knockback bonus.
    Knockback,
    /// Flat maximum-health bonus.
    HealthFlat,
    /// Percentage gold bonus.
    GoldPercent,
    /// Percentage experience bonus.
    XpPercent,
    /// Flat range bonus.
    Range,
}

impl GearStatKind {
    /// Every stat line in roll order.
    pub const ALL: [GearStatKind; 10] = [
        GearStatKind::DamageFlat,
        GearStatKind::DamagePercent,
        GearStatKind::FireRatePercent,
        GearStatKind::CritChance,
        GearStatKind::CritDamage,
        GearStatKind::Knockback,
        GearStatKind::HealthFlat,
        GearStatKind::GoldPercent,
        GearStatKind::XpPercent,
        GearStatKind::Range,
    ];

    /// Value of the stat line for an item of `rarity` dropped on `wave`.
    #[must_use]
    pub fn roll_value(self, rarity: Rarity, wave: u32) -> u32 {
        let magnitude = rarity.magnitude();
        let w = f64::from(wave);
        let base = 1.0 + w * 0.3;
        let value = match self {
            Self::DamageFlat => base * magnitude * 2.0,
            Self::DamagePercent => 3.0 * magnitude + 0.2 * w,
            Self::FireRatePercent => 2.0 * magnitude + 0.15 * w,
            Self::CritChance => 2.0 * magnitude,
            Self::CritDamage | Self::Knockback | Self::Range => 5.0 * magnitude,
            Self::HealthFlat => base * magnitude * 3.0,
            Self::GoldPercent | Self::XpPercent => 3.0 * magnitude,
        };
        value.floor() as u32
    }
}

/// Aggregated stat lines, either for one item or for everything equipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GearStats {
    /// Flat damage bonus.
    pub damage_flat: u32,
    /// Percentage damage bonus.
    pub damage_percent: u32,
    /// Percentage fire-rate bonus.
    pub fire_rate_percent: u32,
    /// Percentage-point critical chance bonus.
    pub crit_chance: u32,
    /// Percentage-point critical multiplier bonus.
    pub crit_damage: u32,
    /// Flat knockback bonus.
    pub knockback: u32,
    /// Flat maximum-health bonus.
    pub health_flat: u32,
    /// Percentage gold bonus.
    pub gold_percent: u32,
    /// Percentage experience bonus.
    pub xp_percent: u32,
    /// Flat range bonus.
    pub range: u32,
}

impl GearStats {
    /// Mutable access to the field backing `kind`.
    pub fn line_mut(&mut self, kind: GearStatKind) -> &mut u32 {
        match kind {
            GearStatKind::DamageFlat => &mut self.damage_flat,
            GearStatKind::DamagePercent => &mut self.damage_percent,
            GearStatKind::FireRatePercent => &mut self.fire_rate_percent,
            GearStatKind::CritChance => &mut self.crit_chance,
            GearStatKind::CritDamage => &mut self.crit_damage,
            GearStatKind::Knockback => &mut self.knockback,
            GearStatKind::HealthFlat => &mut self.health_flat,
            GearStatKind::GoldPercent => &mut self.gold_percent,
            GearStatKind::XpPercent => &mut self.xp_percent,
            GearStatKind::Range => &mut self.range,
        }
    }

    /// Adds every line of `other` onto `self`.
    pub fn accumulate(&mut self, other: &GearStats) {
        for kind in GearStatKind::ALL {
            let value = other.line(kind);
            let line = self.line_mut(kind);
            *line = line.saturating_add(value);
        }
    }

    /// Value of the line backing `kind`.
    #[must_use]
    pub fn line(&self, kind: GearStatKind) -> u32 {
        match kind {
            GearStatKind::DamageFlat => self.damage_flat,
            GearStatKind::DamagePercent => self.damage_percent,
            GearStatKind::FireRatePercent => self.fire_rate_percent,
            GearStatKind::CritChance => self.crit_chance,
            GearStatKind::CritDamage => self.crit_damage,
            GearStatKind::Knockback => self.knockback,
            GearStatKind::HealthFlat => self.health_flat,
            GearStatKind::GoldPercent => self.gold_percent,
            GearStatKind::XpPercent => self.xp_percent,
            GearStatKind::Range => self.range,
        }
    }
}

/// A single piece of gear.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearItem {
    /// Identifier assigned at drop time.
    pub id: GearId,
    /// Display name built from the rarity prefix and slot base name.
    pub name: String,
    /// Slot the item occupies when equipped.
    pub slot: GearSlot,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Rolled stat lines.
    pub stats: GearStats,
    /// Wave on which the item dropped.
    pub level: u32,
}

impl GearItem {
    /// Gold returned when the item is scrapped.
    #[must_use]
    pub fn scrap_value(&self) -> u32 {
        let base = 5u32.saturating_add(self.level.saturating_mul(2));
        base.saturating_mul(self.rarity.scrap_multiplier()).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(rarity: Rarity, level: u32) -> GearItem {
        GearItem {
            id: GearId::new(1),
            name: "Basic Barrel".to_owned(),
            slot: GearSlot::Barrel,
            rarity,
            stats: GearStats::default(),
            level,
        }
    }

    #[test]
    fn scrap_value_scales_with_rarity_and_level() {
        assert_eq!(item(Rarity::Common, 0).scrap_value(), 5);
        assert_eq!(item(Rarity::Rare, 10).scrap_value(), 200);
        assert_eq!(item(Rarity::Legendary, 25).scrap_value(), 2_750);
    }

    #[test]
    fn stat_rolls_follow_magnitude() {
        assert_eq!(GearStatKind::DamageFlat.roll_value(Rarity::Common, 10), 8);
        assert_eq!(GearStatKind::CritChance.roll_value(Rarity::Epic, 1), 6);
        assert_eq!(GearStatKind::DamagePercent.roll_value(Rarity::Uncommon, 20), 8);
    }

    #[test]
    fn rarity_orders_from_common_to_legendary() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Epic < Rarity::Legendary);
    }

    #[test]
    fn gear_item_round_trips_through_bincode() {
        let dropped = item(Rarity::Epic, 18);
        let bytes = bincode::serialize(&dropped).expect("serialize");
        let restored: GearItem = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, dropped);
    }
}
