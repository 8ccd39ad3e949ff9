use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "wordpace";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from(format!("{APP_NAME}_config.json")))
    }

    /// Log file under $HOME/.local/state/wordpace, or the platform data dir
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
                .join(format!("{APP_NAME}.log"))
        } else {
            Self::project()
                .map(|pd| pd.data_local_dir().join(format!("{APP_NAME}.log")))
                .unwrap_or_else(|| PathBuf::from(format!("{APP_NAME}.log")))
        }
    }
}
