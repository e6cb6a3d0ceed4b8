use thiserror::Error;

/// Lookup failures raised while resolving configuration keys.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The key does not name an enemy archetype.
    #[error("unknown enemy type `{0}`")]
    UnknownEnemyType(String),
    /// The key does not name a weapon.
    #[error("unknown weapon `{0}`")]
    UnknownWeapon(String),
    /// The key does not name a run upgrade.
    #[error("unknown upgrade `{0}`")]
    UnknownUpgrade(String),
}
