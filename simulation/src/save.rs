//! JSON encoding of the persisted save state.

use desktop_defender_core::{profile::SAVE_VERSION, GameState};
use thiserror::Error;

/// Failures raised while encoding or decoding a save.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The payload is not valid save JSON.
    #[error("malformed save data")]
    Json(#[from] serde_json::Error),
    /// The save was written by an incompatible schema.
    #[error("save version {found} is not supported (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the payload.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
}

/// Serializes `state` to compact JSON.
pub fn encode(state: &GameState) -> Result<String, SaveError> {
    Ok(serde_json::to_string(state)?)
}

/// Parses a save produced by [`encode`].
pub fn decode(json: &str) -> Result<GameState, SaveError> {
    let state: GameState = serde_json::from_str(json)?;
    if state.version != SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion {
            found: state.version,
            expected: SAVE_VERSION,
        });
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use desktop_defender_core::PlayerProfile;

    fn state(version: u32) -> GameState {
        GameState {
            version,
            last_saved: 1_700_000_000_000,
            profile: PlayerProfile {
                total_ascendium: 12,
                ..PlayerProfile::default()
            },
            run: None,
        }
    }

    #[test]
    fn encoded_state_decodes_unchanged() {
        let json = encode(&state(SAVE_VERSION)).expect("encode");
        assert!(json.contains(r#""run":null"#));
        assert_eq!(decode(&json).expect("decode"), state(SAVE_VERSION));
    }

    #[test]
    fn foreign_versions_are_rejected() {
        let json = encode(&state(SAVE_VERSION + 1)).expect("encode");
        assert!(matches!(
            decode(&json),
            Err(SaveError::UnsupportedVersion { found, .. }) if found == SAVE_VERSION + 1
        ));
        assert!(matches!(decode("{"), Err(SaveError::Json(_))));
    }
}
