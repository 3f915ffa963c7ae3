use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::AppError,
    profile::{Profile, ProfileMap},
};

/// Profiles file in user's home directory
const GLOBAL_PROFILES_FILE: &str = ".gitprofiles.json";

/// Gets the path to the profiles file in the home directory
pub fn default_profiles_path() -> Result<PathBuf, AppError> {
    let home_dir: PathBuf = dirs::home_dir().ok_or(AppError::HomeDirNotFound)?;
    Ok(home_dir.join(GLOBAL_PROFILES_FILE))
}

/// JSON-backed profile store.
///
/// Every operation reads the file fresh and writes it back in full. There is
/// no locking, so two processes mutating the store at once race and the last
/// writer wins.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Store backed by an explicit file path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `~/.gitprofiles.json`
    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self::at(default_profiles_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all profiles, treating a missing file as empty
    pub fn load(&self) -> Result<ProfileMap, AppError> {
        let file_contents: String = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "profiles file missing, starting empty");
                return Ok(ProfileMap::new());
            }
            Err(source) => {
                return Err(AppError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let profiles: ProfileMap =
            serde_json::from_str(&file_contents).map_err(|source| AppError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), count = profiles.len(), "loaded profiles");
        Ok(profiles)
    }

    /// Replaces the profiles file with the given map
    ///
    /// The JSON is written to a sibling temporary file and renamed over the
    /// target, so readers never observe a half-written store.
    pub fn save(&self, profiles: &ProfileMap) -> Result<(), AppError> {
        let json: String = serde_json::to_string_pretty(profiles).map_err(|source| {
            AppError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp_path: PathBuf = self.tmp_path();
        let io_err = |source: io::Error| AppError::Io {
            path: self.path.clone(),
            source,
        };
        if let Err(source) =
            fs::write(&tmp_path, json).and_then(|()| fs::rename(&tmp_path, &self.path))
        {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_err(source));
        }

        debug!(path = %self.path.display(), count = profiles.len(), "saved profiles");
        Ok(())
    }

    /// Gets a single profile by exact name
    pub fn get(&self, profile_name: &str) -> Result<Profile, AppError> {
        self.load()?
            .remove(profile_name)
            .ok_or_else(|| AppError::ProfileNotFound(profile_name.to_string()))
    }

    /// Adds a profile, overwriting any profile stored under the same name
    ///
    /// Returns the replaced profile, if there was one.
    pub fn add(&self, profile_name: &str, profile: Profile) -> Result<Option<Profile>, AppError> {
        let mut profiles: ProfileMap = self.load()?;
        let previous: Option<Profile> = profiles.insert(profile_name.to_string(), profile);
        self.save(&profiles)?;
        Ok(previous)
    }

    /// Replaces an existing profile wholesale
    pub fn update(&self, profile_name: &str, profile: Profile) -> Result<(), AppError> {
        let mut profiles: ProfileMap = self.load()?;
        match profiles.get_mut(profile_name) {
            Some(existing) => *existing = profile,
            None => return Err(AppError::ProfileNotFound(profile_name.to_string())),
        }
        self.save(&profiles)
    }

    /// Deletes a profile, leaving the file untouched if the name is unknown
    pub fn delete(&self, profile_name: &str) -> Result<Profile, AppError> {
        let mut profiles: ProfileMap = self.load()?;
        let removed: Profile = profiles
            .remove(profile_name)
            .ok_or_else(|| AppError::ProfileNotFound(profile_name.to_string()))?;
        self.save(&profiles)?;
        Ok(removed)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| GLOBAL_PROFILES_FILE.into());
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}
