//! File-backed slot for the persisted high score.
//!
//! The slot is a single line of the form `chroma:v1:<payload>` where the
//! payload is base64 over a small JSON document. Persistence is best
//! effort: callers log failures and keep the in-memory state authoritative.

use std::{fs, io, path::PathBuf};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SLOT_DOMAIN: &str = "chroma";
const SLOT_VERSION: &str = "v1";
/// Identifier prefix emitted before the encoded slot payload.
const SLOT_HEADER: &str = "chroma:v1";
const FIELD_DELIMITER: char = ':';

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SlotPayload {
    high_score: u32,
}

/// Handle on the persisted high score slot.
#[derive(Clone, Debug)]
pub(crate) struct HighScoreVault {
    path: PathBuf,
}

impl HighScoreVault {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the stored record; a missing file simply means no record yet.
    pub(crate) fn load(&self) -> Result<u32, VaultError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => decode(&text),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(error) => Err(VaultError::Io(error)),
        }
    }

    /// Overwrites the stored record with the provided value.
    pub(crate) fn save(&self, high_score: u32) -> Result<(), VaultError> {
        fs::write(&self.path, encode(high_score)).map_err(VaultError::Io)
    }
}

fn encode(high_score: u32) -> String {
    let json = serde_json::to_vec(&SlotPayload { high_score })
        .expect("slot payload serialization never fails");
    format!("{SLOT_HEADER}:{}", STANDARD_NO_PAD.encode(json))
}

fn decode(text: &str) -> Result<u32, VaultError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(VaultError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(VaultError::MissingPrefix)?;
    let version = parts.next().ok_or(VaultError::MissingVersion)?;
    let payload = parts.next().ok_or(VaultError::MissingPayload)?;

    if domain != SLOT_DOMAIN {
        return Err(VaultError::InvalidPrefix(domain.to_owned()));
    }
    if version != SLOT_VERSION {
        return Err(VaultError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(VaultError::InvalidEncoding)?;
    let decoded: SlotPayload =
        serde_json::from_slice(&bytes).map_err(VaultError::InvalidPayload)?;
    Ok(decoded.high_score)
}

/// Errors that can occur while reading or writing the high score slot.
#[derive(Debug, Error)]
pub(crate) enum VaultError {
    #[error("could not access the high score file: {0}")]
    Io(#[from] io::Error),
    #[error("high score slot was empty")]
    EmptyPayload,
    #[error("high score slot is missing the prefix")]
    MissingPrefix,
    #[error("high score slot is missing the version")]
    MissingVersion,
    #[error("high score slot is missing the payload")]
    MissingPayload,
    #[error("high score prefix '{0}' is not supported")]
    InvalidPrefix(String),
    #[error("high score version '{0}' is not supported")]
    UnsupportedVersion(String),
    #[error("could not decode the high score payload: {0}")]
    InvalidEncoding(base64::DecodeError),
    #[error("could not parse the high score payload: {0}")]
    InvalidPayload(serde_json::Error),
}
