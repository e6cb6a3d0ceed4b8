use desktop_defender_core::{AscensionUpgradeKind, GearId, GearSlot, UpgradeKind};
use thiserror::Error;

/// Reasons a player-initiated progression action was refused.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProgressionError {
    /// The run upgrade is already at its maximum level.
    #[error("upgrade `{0}` is already maxed")]
    UpgradeMaxed(UpgradeKind),
    /// The run upgrade requires a higher player level.
    #[error("upgrade `{upgrade}` unlocks at level {required_level}")]
    UpgradeLocked {
        /// Upgrade that was requested.
        upgrade: UpgradeKind,
        /// Player level at which it unlocks.
        required_level: u32,
    },
    /// Not enough gold on hand.
    #[error("costs {cost} gold but only {available} is available")]
    InsufficientGold {
        /// Price of the action.
        cost: u64,
        /// Gold on hand.
        available: u64,
    },
    /// The ascension upgrade is already at its maximum level.
    #[error("ascension upgrade {0:?} is already maxed")]
    AscensionMaxed(AscensionUpgradeKind),
    /// Not enough ascendium banked.
    #[error("costs {cost} ascendium but only {available} is banked")]
    InsufficientAscendium {
        /// Price of the upgrade.
        cost: u64,
        /// Ascendium banked.
        available: u64,
    },
    /// No inventory item carries the identifier.
    #[error("no inventory item with id {}", .0.get())]
    UnknownItem(GearId),
    /// The inventory has no room left.
    #[error("inventory is full")]
    InventoryFull,
    /// Nothing is equipped in the slot.
    #[error("no gear equipped in the {0:?} slot")]
    EmptySlot(GearSlot),
}
