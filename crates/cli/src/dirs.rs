//! Platform-specific locations for the session, configuration and logs

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::warn;

pub struct AppDirs {
    project_dirs: Option<ProjectDirs>,
    override_dir: Option<PathBuf>,
}

impl AppDirs {
    /// Use `override_dir` when given, the platform directories otherwise
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        if override_dir.is_some() {
            return Self {
                project_dirs: None,
                override_dir,
            };
        }

        let project_dirs = ProjectDirs::from("br.edu.utfpr", "ELLP", "ellp");
        if project_dirs.is_none() {
            warn!("Failed to determine platform-specific directories, will use fallback");
        }
        Self {
            project_dirs,
            override_dir: None,
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.override_dir {
            return dir.clone();
        }
        match &self.project_dirs {
            Some(dirs) => dirs.data_dir().to_path_buf(),
            None => PathBuf::from(".ellp"),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        if let Some(dir) = &self.override_dir {
            return dir.join("config.toml");
        }
        match &self.project_dirs {
            Some(dirs) => dirs.config_dir().join("config.toml"),
            None => PathBuf::from(".ellp").join("config.toml"),
        }
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir().join("cli.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_dir_holds_everything() {
        let dirs = AppDirs::new(Some(PathBuf::from("/tmp/ellp-test")));
        assert_eq!(dirs.session_file(), PathBuf::from("/tmp/ellp-test/session.json"));
        assert_eq!(dirs.config_file(), PathBuf::from("/tmp/ellp-test/config.toml"));
        assert_eq!(dirs.log_file(), PathBuf::from("/tmp/ellp-test/cli.log"));
    }
}
