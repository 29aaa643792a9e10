use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "portfolio.yaml";
pub const PROJECTS_FILE: &str = "projects.json";
pub const SKILLS_FILE: &str = "skills.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve the configured data directory against `root`. Absolute
/// `data_dir` values are used as-is.
pub fn data_dir(root: &Path, data_dir: &Path) -> PathBuf {
    if data_dir.is_absolute() {
        data_dir.to_path_buf()
    } else {
        root.join(data_dir)
    }
}

pub fn collection_path(data_dir: &Path, file_name: &str) -> PathBuf {
    data_dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_data_dir_joins_root() {
        let dir = data_dir(Path::new("/srv/app"), Path::new("database"));
        assert_eq!(dir, PathBuf::from("/srv/app/database"));
    }

    #[test]
    fn absolute_data_dir_ignores_root() {
        let dir = data_dir(Path::new("/srv/app"), Path::new("/var/lib/portfolio"));
        assert_eq!(dir, PathBuf::from("/var/lib/portfolio"));
    }

    #[test]
    fn collection_path_uses_file_name() {
        let path = collection_path(Path::new("/data"), PROJECTS_FILE);
        assert_eq!(path, PathBuf::from("/data/projects.json"));
    }
}
