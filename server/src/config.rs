//! Engine configuration.
//!
//! Loaded from an optional JSON file; every field falls back to a default so
//! an absent file or a partial file is valid.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use crate::catalog::VendorEntry;
use crate::error::{NpcError, NpcResult};

/// Distance within which an NPC notices a player
pub const DEFAULT_DETECTION_RADIUS: f64 = 30.0;

/// Ticks to wait after a join before the first range check
pub const DEFAULT_JOIN_CHECK_DELAY_TICKS: u64 = 20;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    /// Directory holding one record file per NPC
    pub data_dir: PathBuf,
    /// Extension of record files, without the dot
    pub file_extension: String,
    pub detection_radius: f64,
    pub join_check_delay_ticks: u64,
    pub vendor_title: String,
    /// Vendor pages; the built-in catalog is used when absent
    pub catalog: Option<Vec<VendorEntry>>,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("npcs"),
            file_extension: "nbt".to_string(),
            detection_radius: DEFAULT_DETECTION_RADIUS,
            join_check_delay_ticks: DEFAULT_JOIN_CHECK_DELAY_TICKS,
            vendor_title: "Item Vendor".to_string(),
            catalog: None,
        }
    }
}

impl NpcConfig {
    /// Load configuration from a JSON file, using defaults if it doesn't exist
    pub fn load<P: AsRef<Path>>(path: P) -> NpcResult<Self> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(NpcError::io(path, e)),
        };

        let config: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| NpcError::Config(format!("failed to parse {:?}: {}", path, e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> NpcResult<()> {
        if !(self.detection_radius.is_finite() && self.detection_radius > 0.0) {
            return Err(NpcError::Config(format!(
                "detection_radius must be positive, got {}",
                self.detection_radius
            )));
        }
        if self.file_extension.is_empty() || self.file_extension.contains('.') {
            return Err(NpcError::Config(format!(
                "file_extension must be a bare extension, got {:?}",
                self.file_extension
            )));
        }
        if matches!(&self.catalog, Some(entries) if entries.is_empty()) {
            return Err(NpcError::Config("catalog must not be empty".to_string()));
        }
        Ok(())
    }

    /// Path of the record file for an NPC name
    pub fn record_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", name, self.file_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = NpcConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config.detection_radius, DEFAULT_DETECTION_RADIUS);
        assert_eq!(config.join_check_delay_ticks, 20);
        assert_eq!(config.record_path("Guide"), PathBuf::from("npcs").join("Guide.nbt"));
    }

    #[test]
    fn test_partial_file_overrides_some_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{ "detection_radius": 12.5, "data_dir": "data/npcs" }}"#).unwrap();

        let config = NpcConfig::load(&path).unwrap();
        assert_eq!(config.detection_radius, 12.5);
        assert_eq!(config.data_dir, PathBuf::from("data/npcs"));
        assert_eq!(config.file_extension, "nbt");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "detection_radius": -1.0 }"#).unwrap();
        assert!(matches!(NpcConfig::load(&path), Err(NpcError::Config(_))));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(NpcConfig::load(&path), Err(NpcError::Config(_))));
    }
}
