use std::path::PathBuf;

use directories::ProjectDirs;

use crate::{Result, StoreError};

/// Application configuration settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where the notes and categories blobs are stored
    pub data_dir: PathBuf,
}

impl Config {
    /// Creates a config rooted at an explicit data directory.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Creates a config using the platform-conventional data directory.
    pub fn from_project_dirs() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "pocketnotes", "pocketnotes").ok_or(
            StoreError::Directory {
                path: PathBuf::from("~"),
            },
        )?;

        Ok(Self {
            data_dir: dirs.data_dir().to_path_buf(),
        })
    }
}
