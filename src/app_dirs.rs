use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory holding the stats database and snapshot file
    pub fn data_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("kanadrill"),
            )
        } else {
            ProjectDirs::from("", "", "kanadrill")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn config_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", "kanadrill") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("kanadrill_config.json")
        }
    }
}
