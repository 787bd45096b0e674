//! Depth profile
//!
//! The only state that survives a restart of the process: how deep the
//! player got, so a new session can continue from there.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current profile version for compatibility
const PROFILE_VERSION: u32 = 1;

/// Persistent depth counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthProfile {
    /// Version for compatibility checking
    pub version: u32,
    /// Depth to continue at
    pub depth: u32,
    /// Deepest level ever reached
    pub highest_depth: u32,
}

impl Default for DepthProfile {
    fn default() -> Self {
        Self {
            version: PROFILE_VERSION,
            depth: 1,
            highest_depth: 1,
        }
    }
}

impl DepthProfile {
    pub fn new(depth: u32, highest_depth: u32) -> Self {
        let depth = depth.max(1);
        Self {
            version: PROFILE_VERSION,
            depth,
            highest_depth: highest_depth.max(depth),
        }
    }
}

/// Profile IO failures
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Profile version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Get the profile file path
pub fn profile_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "treasuremine", "TreasureMine") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("profile.json");
        path
    } else {
        PathBuf::from("./profile.json")
    }
}

/// Read a profile from a specific file
pub fn load_profile_from(path: &Path) -> Result<DepthProfile, ProfileError> {
    let data = fs::read_to_string(path)?;
    let profile: DepthProfile = serde_json::from_str(&data)?;
    if profile.version != PROFILE_VERSION {
        return Err(ProfileError::VersionMismatch {
            expected: PROFILE_VERSION,
            found: profile.version,
        });
    }
    Ok(DepthProfile::new(profile.depth, profile.highest_depth))
}

/// Write a profile to a specific file, creating parent directories
pub fn save_profile_to(profile: &DepthProfile, path: &Path) -> Result<(), ProfileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(path, json)?;
    log::info!("Profile saved to {:?}", path);
    Ok(())
}

/// Load the profile (or create default)
pub fn load_profile() -> DepthProfile {
    let path = profile_path();
    if !path.exists() {
        log::info!("Creating new profile");
        return DepthProfile::default();
    }

    match load_profile_from(&path) {
        Ok(profile) => {
            log::info!("Profile loaded from {:?}", path);
            profile
        }
        Err(e) => {
            log::warn!("Failed to load profile: {}, creating new", e);
            DepthProfile::default()
        }
    }
}

/// Save the profile to the default location
pub fn save_profile(profile: &DepthProfile) -> Result<(), ProfileError> {
    save_profile_to(profile, &profile_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("treasure_mine_{}_{}", name, std::process::id()))
            .join("profile.json")
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let profile = DepthProfile::new(4, 6);
        save_profile_to(&profile, &path).unwrap();
        assert_eq!(load_profile_from(&path).unwrap(), profile);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_version_mismatch() {
        let path = temp_path("version");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"version": 99, "depth": 3, "highest_depth": 3}"#).unwrap();
        assert!(matches!(
            load_profile_from(&path),
            Err(ProfileError::VersionMismatch { expected: 1, found: 99 })
        ));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_bad_json_and_missing_file() {
        let path = temp_path("garbage");
        assert!(matches!(load_profile_from(&path), Err(ProfileError::Io(_))));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ depth: ").unwrap();
        assert!(matches!(load_profile_from(&path), Err(ProfileError::Parse(_))));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_depth_is_clamped() {
        let profile = DepthProfile::new(0, 0);
        assert_eq!(profile.depth, 1);
        assert_eq!(profile.highest_depth, 1);
    }
}
