//! Persisted player profile and run state.
//!
//! These types only describe the save-state shape. Reading and writing them
//! is left to whoever hosts the simulation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AscensionUpgradeKind, GearItem, GearSlot, UpgradeKind, WeaponKind};

/// Save-state schema version written by this crate.
pub const SAVE_VERSION: u32 = 1;

/// Top-level save state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Schema version.
    pub version: u32,
    /// Milliseconds since the Unix epoch when the state was captured.
    pub last_saved: u64,
    /// Meta progression surviving across runs.
    pub profile: PlayerProfile,
    /// Run in progress, or `None` once the run has ended.
    pub run: Option<RunState>,
}

/// Meta progression surviving across runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProfile {
    /// Ascendium available to spend.
    pub total_ascendium: u64,
    /// Number of completed runs.
    pub ascension_count: u32,
    /// Best wave reached across all runs.
    pub highest_wave_ever: u32,
    /// Lifetime kill count.
    pub total_enemies_killed: u64,
    /// Lifetime play time in milliseconds.
    pub total_play_time: u64,
    /// Purchased ascension upgrade levels.
    pub ascension_upgrade_levels: BTreeMap<AscensionUpgradeKind, u32>,
    /// Weapons available when starting a run.
    pub unlocked_weapons: Vec<WeaponKind>,
    /// Presentation preferences carried alongside the profile.
    pub settings: GameSettings,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            total_ascendium: 0,
            ascension_count: 0,
            highest_wave_ever: 0,
            total_enemies_killed: 0,
            total_play_time: 0,
            ascension_upgrade_levels: BTreeMap::new(),
            unlocked_weapons: vec![WeaponKind::Basic],
            settings: GameSettings::default(),
        }
    }
}

impl PlayerProfile {
    /// Level purchased for `upgrade`.
    #[must_use]
    pub fn ascension_level(&self, upgrade: AscensionUpgradeKind) -> u32 {
        self.ascension_upgrade_levels
            .get(&upgrade)
            .copied()
            .unwrap_or(0)
    }

    /// Whether `weapon` may be selected at the start of a run.
    #[must_use]
    pub fn has_weapon(&self, weapon: WeaponKind) -> bool {
        weapon == WeaponKind::Basic || self.unlocked_weapons.contains(&weapon)
    }
}

/// Presentation preferences. The simulation stores them without reading them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    /// Master volume between 0 and 1.
    pub master_volume: f32,
    /// Whether floating damage numbers are shown.
    pub show_damage_numbers: bool,
    /// Whether screen shake is enabled.
    pub screen_shake: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            show_damage_numbers: true,
            screen_shake: true,
        }
    }
}

/// State of a run in progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    /// Wave the run is on.
    pub current_wave: u32,
    /// Current turret health.
    pub turret_health: u32,
    /// Maximum turret health.
    pub turret_max_health: u32,
    /// Gold on hand.
    pub gold: u64,
    /// Gold earned over the run.
    pub total_gold_earned: u64,
    /// Player level.
    pub level: u32,
    /// Experience accumulated toward the next level.
    #[serde(rename = "currentXP")]
    pub current_xp: u64,
    /// Purchased run upgrade levels.
    pub upgrade_levels: BTreeMap<UpgradeKind, u32>,
    /// Gear currently equipped, keyed by slot.
    pub equipped_gear: BTreeMap<GearSlot, GearItem>,
    /// Gear carried but not equipped.
    pub inventory: Vec<GearItem>,
    /// Weapon mounted on the turret.
    pub active_weapon_id: WeaponKind,
    /// Enemies killed during the run.
    pub enemies_killed_this_run: u64,
    /// Milliseconds since the Unix epoch when the run started.
    pub run_start_time: u64,
    /// Simulated milliseconds elapsed during the run.
    pub run_duration: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_unlocks_basic_only() {
        let profile = PlayerProfile::default();
        assert_eq!(profile.unlocked_weapons, vec![WeaponKind::Basic]);
        assert!(profile.has_weapon(WeaponKind::Basic));
        assert!(!profile.has_weapon(WeaponKind::Tesla));
    }

    #[test]
    fn game_state_uses_camel_case_keys() {
        let mut profile = PlayerProfile::default();
        let _ = profile
            .ascension_upgrade_levels
            .insert(AscensionUpgradeKind::StartingGold, 2);
        let state = GameState {
            version: SAVE_VERSION,
            last_saved: 42,
            profile,
            run: None,
        };
        let json = serde_json::to_value(&state).expect("serialize");
        assert_eq!(json["lastSaved"], 42);
        assert_eq!(json["run"], serde_json::Value::Null);
        assert_eq!(json["profile"]["unlockedWeapons"][0], "basic");
        assert_eq!(
            json["profile"]["ascensionUpgradeLevels"]["starting_gold"],
            2
        );
    }

    #[test]
    fn missing_profile_fields_fall_back_to_defaults() {
        let profile: PlayerProfile =
            serde_json::from_str(r#"{"totalAscendium": 12}"#).expect("deserialize");
        assert_eq!(profile.total_ascendium, 12);
        assert_eq!(profile.unlocked_weapons, vec![WeaponKind::Basic]);
    }
}
