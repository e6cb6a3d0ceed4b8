use desktop_defender_core::WeaponKind;
use desktop_defender_system_progression::ProgressionError;
use thiserror::Error;

/// Reasons a host request against the simulation was refused.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// The profile has not unlocked the weapon.
    #[error("weapon `{0}` is locked")]
    WeaponLocked(WeaponKind),
    /// The run already ended.
    #[error("the run is over")]
    RunOver,
    /// The run is still going.
    #[error("the run is still in progress")]
    RunInProgress,
    /// The run's rewards were already banked.
    #[error("the run was already finished")]
    AlreadyFinished,
    /// A progression action failed.
    #[error(transparent)]
    Progression(#[from] ProgressionError),
}
