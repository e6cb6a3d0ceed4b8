//! Meta progression paid out between runs.

use desktop_defender_core::{AscensionUpgradeKind, PlayerProfile};
use tracing::info;

use crate::ProgressionError;

/// Bonuses a fresh run inherits from purchased ascension upgrades.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartingBonuses {
    /// Gold on hand when the run starts.
    pub starting_gold: u64,
    /// Multiplier applied to experience income.
    pub xp_multiplier: f64,
    /// Flat damage added before percentage scaling.
    pub base_damage_bonus: u32,
    /// Flat maximum health added to the turret.
    pub max_health_bonus: u32,
    /// Multiplier applied to the gear drop chance.
    pub drop_rate_multiplier: f64,
}

impl Default for StartingBonuses {
    fn default() -> Self {
        Self {
            starting_gold: 0,
            xp_multiplier: 1.0,
            base_damage_bonus: 0,
            max_health_bonus: 0,
            drop_rate_multiplier: 1.0,
        }
    }
}

/// Bonuses granted by the upgrades recorded in `profile`.
#[must_use]
pub fn starting_bonuses(profile: &PlayerProfile) -> StartingBonuses {
    let level = |kind| profile.ascension_level(kind);
    StartingBonuses {
        starting_gold: 50 * u64::from(level(AscensionUpgradeKind::StartingGold)),
        xp_multiplier: 1.0 + 0.05 * f64::from(level(AscensionUpgradeKind::XpBoost)),
        base_damage_bonus: 3 * level(AscensionUpgradeKind::StartingDamage),
        max_health_bonus: 15 * level(AscensionUpgradeKind::StartingHealth),
        drop_rate_multiplier: 1.0 + 0.08 * f64::from(level(AscensionUpgradeKind::DropRate)),
    }
}

/// Totals describing a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Highest wave reached.
    pub highest_wave: u32,
    /// Gold earned across the run.
    pub total_gold_earned: u64,
    /// Enemies killed during the run.
    pub enemies_killed: u64,
    /// Simulated milliseconds the run lasted.
    pub run_duration: u64,
}

/// Ascendium awarded for `summary`.
#[must_use]
pub fn ascendium_reward(summary: &RunSummary, profile: &PlayerProfile) -> u64 {
    let wave = f64::from(summary.highest_wave);
    let gold = summary.total_gold_earned as f64;
    let base = (wave.sqrt() * (gold + 1.0).log2() * 0.5).floor();
    let boost = 1.0 + 0.1 * f64::from(profile.ascension_level(AscensionUpgradeKind::AscendiumBoost));
    ((base * boost).floor() as u64).max(1)
}

/// Buys one level of `upgrade` with banked ascendium and returns the new level.
pub fn purchase_ascension(
    profile: &mut PlayerProfile,
    upgrade: AscensionUpgradeKind,
) -> Result<u32, ProgressionError> {
    let level = profile.ascension_level(upgrade);
    let cost = upgrade
        .cost()
        .cost_at(level)
        .map(u64::from)
        .ok_or(ProgressionError::AscensionMaxed(upgrade))?;
    if profile.total_ascendium < cost {
        return Err(ProgressionError::InsufficientAscendium {
            cost,
            available: profile.total_ascendium,
        });
    }

    profile.total_ascendium -= cost;
    let _ = profile.ascension_upgrade_levels.insert(upgrade, level + 1);
    if let Some(weapon) = upgrade.unlocks_weapon() {
        if !profile.unlocked_weapons.contains(&weapon) {
            profile.unlocked_weapons.push(weapon);
        }
    }
    Ok(level + 1)
}

/// Banks the run's ascendium and lifetime totals into `profile`.
///
/// Returns the ascendium awarded.
pub fn finish_run(profile: &mut PlayerProfile, summary: &RunSummary) -> u64 {
    let reward = ascendium_reward(summary, profile);
    profile.total_ascendium += reward;
    profile.ascension_count += 1;
    profile.highest_wave_ever = profile.highest_wave_ever.max(summary.highest_wave);
    profile.total_enemies_killed += summary.enemies_killed;
    profile.total_play_time += summary.run_duration;
    info!(
        wave = summary.highest_wave,
        reward,
        ascensions = profile.ascension_count,
        "run finished"
    );
    reward
}
