//! Error types for the NPC engine.

use std::io;
use std::path::PathBuf;

use lobby_shared::TagError;
use thiserror::Error;

pub type NpcResult<T> = Result<T, NpcError>;

#[derive(Debug, Error)]
pub enum NpcError {
    /// A persisted record could not be parsed into an NPC
    #[error("corrupt NPC record {}: {reason}", .path.display())]
    CorruptRecord { path: PathBuf, reason: String },

    #[error("an NPC named `{0}` already exists")]
    DuplicateName(String),

    #[error("no NPC named `{0}`")]
    NotFound(String),

    /// File write or delete failure
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("record codec error: {0}")]
    Codec(#[from] TagError),

    /// Name cannot be used as a record file key
    #[error("invalid NPC name `{0}`")]
    InvalidName(String),

    /// Behavior that cannot be stored and read back
    #[error("invalid behavior for NPC `{name}`: {reason}")]
    InvalidBehavior { name: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl NpcError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorruptRecord {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Check that a name is usable as a record file stem
pub fn validate_name(name: &str) -> NpcResult<()> {
    let bad = name.is_empty()
        || name.starts_with('.')
        || name.chars().any(|c| matches!(c, '/' | '\\' | '\0') || c.is_control());
    if bad {
        return Err(NpcError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("ArenaGuide").is_ok());
        assert!(validate_name("vendor_2").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("../etc").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name(".hidden").is_err());
    }

    #[test]
    fn test_messages_name_the_file() {
        let err = NpcError::corrupt("npcs/broken.nbt", "missing field `Skin`");
        let text = err.to_string();
        assert!(text.contains("broken.nbt"));
        assert!(text.contains("Skin"));
    }
}
