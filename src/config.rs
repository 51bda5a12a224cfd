use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserboxConfig {
    pub database: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("userbox.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("userbox.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<UserboxConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: UserboxConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

/// Database path precedence: CLI flag, then config file, then the default
pub fn resolve_database_path(cli: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli {
        return Ok(path);
    }
    if let Some(config) = load_config(None)? {
        if let Some(database) = config.database {
            return Ok(PathBuf::from(database));
        }
    }
    Ok(default_database_path())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userbox.toml");
        assert!(load_config(Some(&path)).unwrap().is_none());
    }

    #[test]
    fn test_load_config_reads_database_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userbox.toml");
        std::fs::write(&path, "database = \"/tmp/users.db\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database.as_deref(), Some("/tmp/users.db"));
    }

    #[test]
    fn test_cli_flag_wins() {
        let path = resolve_database_path(Some(PathBuf::from("/tmp/cli.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/cli.db"));
    }

    #[test]
    fn test_ensure_db_dir_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("userbox.db");

        ensure_db_dir(&db_path).unwrap();
        assert!(db_path.parent().unwrap().exists());
    }
}
