use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use desktop_defender_core::GameState;
use desktop_defender_simulation::save::{self, SaveError};

const TRANSFER_DOMAIN: &str = "defender";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded save payload.
pub(crate) const TRANSFER_HEADER: &str = "defender:v1";
/// Delimiter used to separate the prefix and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a save into a single-line string suitable for copy and paste.
pub(crate) fn encode(state: &GameState) -> Result<String, SaveTransferError> {
    let json = save::encode(state).map_err(SaveTransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{TRANSFER_HEADER}:{encoded}"))
}

/// Decodes a save from the provided transfer string.
pub(crate) fn decode(value: &str) -> Result<GameState, SaveTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SaveTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(SaveTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(SaveTransferError::MissingVersion)?;
    let payload = parts.next().ok_or(SaveTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(SaveTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(SaveTransferError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(SaveTransferError::InvalidEncoding)?;
    let json = String::from_utf8_lossy(&bytes);
    save::decode(&json).map_err(SaveTransferError::InvalidPayload)
}

/// Errors that can occur while encoding or decoding save transfer strings.
#[derive(Debug)]
pub(crate) enum SaveTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The payload segment was missing.
    MissingPayload,
    /// The string used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The string used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload was not a readable save.
    InvalidPayload(SaveError),
}

impl fmt::Display for SaveTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "save string was empty"),
            Self::MissingPrefix => write!(f, "save string is missing the prefix"),
            Self::MissingVersion => write!(f, "save string is missing the version"),
            Self::MissingPayload => write!(f, "save string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "save prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "save string version '{version}' is not supported")
            }
            Self::InvalidEncoding(error) => write!(f, "could not decode save payload: {error}"),
            Self::InvalidPayload(error) => write!(f, "could not read save payload: {error}"),
        }
    }
}

impl Error for SaveTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desktop_defender_core::{profile::SAVE_VERSION, PlayerProfile, WeaponKind};

    fn state() -> GameState {
        GameState {
            version: SAVE_VERSION,
            last_saved: 1_700_000_000_000,
            profile: PlayerProfile {
                total_ascendium: 75,
                unlocked_weapons: vec![WeaponKind::Basic, WeaponKind::Missile],
                ..PlayerProfile::default()
            },
            run: None,
        }
    }

    #[test]
    fn round_trip_profile_only_save() {
        let encoded = encode(&state()).expect("save encodes");
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:")));
        assert!(!encoded.contains('\n'));

        let decoded = decode(&format!("  {encoded}\n")).expect("save decodes");
        assert_eq!(decoded, state());
    }

    #[test]
    fn foreign_prefixes_and_versions_are_rejected() {
        assert!(matches!(decode(""), Err(SaveTransferError::EmptyPayload)));
        assert!(matches!(
            decode("arcade:v1:abc"),
            Err(SaveTransferError::InvalidPrefix(prefix)) if prefix == "arcade"
        ));
        assert!(matches!(
            decode("defender:v2:abc"),
            Err(SaveTransferError::UnsupportedVersion(version)) if version == "v2"
        ));
        assert!(matches!(
            decode("defender:v1"),
            Err(SaveTransferError::MissingPayload)
        ));
        assert!(matches!(
            decode("defender:v1:!!!"),
            Err(SaveTransferError::InvalidEncoding(_))
        ));
    }
}
