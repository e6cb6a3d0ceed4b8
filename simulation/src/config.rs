//! Tunables supplied by the host when a simulation is created.

use desktop_defender_core::{Vec2, WeaponKind};
use desktop_defender_world::{DEFAULT_ENEMY_CAPACITY, DEFAULT_PROJECTILE_CAPACITY};
use serde::{Deserialize, Serialize};

/// Milliseconds between autosave checkpoints.
pub const DEFAULT_AUTOSAVE_INTERVAL_MS: f32 = 30_000.0;

/// Host-provided simulation settings. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    /// Size of the play area in pixels; the turret sits at its centre.
    pub viewport: Vec2,
    /// Seed for every random stream of the run.
    pub seed: u64,
    /// Number of enemy pool slots.
    pub enemy_capacity: usize,
    /// Number of projectile pool slots.
    pub projectile_capacity: usize,
    /// Weapon mounted when a fresh run starts.
    pub starting_weapon: WeaponKind,
    /// Milliseconds between autosave checkpoint requests.
    pub autosave_interval_ms: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(300.0, 300.0),
            seed: 0,
            enemy_capacity: DEFAULT_ENEMY_CAPACITY,
            projectile_capacity: DEFAULT_PROJECTILE_CAPACITY,
            starting_weapon: WeaponKind::Basic,
            autosave_interval_ms: DEFAULT_AUTOSAVE_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"seed": 9, "startingWeapon": "laser"}"#).expect("config");
        assert_eq!(config.seed, 9);
        assert_eq!(config.starting_weapon, WeaponKind::Laser);
        assert_eq!(config.viewport, Vec2::new(300.0, 300.0));
        assert_eq!(config.autosave_interval_ms, DEFAULT_AUTOSAVE_INTERVAL_MS);
    }
}
