use crate::core::context::Context;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Namespace of this installation inside the local store.
    #[serde(default = "default_storage_prefix")]
    pub storage_prefix: String,
    #[serde(default = "default_member")]
    pub member: String,
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Shared directory of the host session. Unset means local storage only.
    #[serde(default)]
    pub host_dir: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_storage_prefix() -> String {
    "rtimetracker".to_string()
}
fn default_member() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "local".to_string())
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            storage_prefix: default_storage_prefix(),
            member: default_member(),
            card: None,
            locale: default_locale(),
            host_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rtimetracker")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rtimetracker")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtimetracker.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtimetracker.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Initialize configuration and database files.
    ///
    /// In test mode the configuration file is left alone.
    pub fn init_all(base: &Config, custom_db: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => PathBuf::from(&base.database),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..base.clone()
        };

        if !is_test {
            config.save_to(&Self::config_file())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }

    /// Acting member and card.
    pub fn context(&self) -> Context {
        let ctx = Context::new(&self.member);
        match &self.card {
            Some(card) => ctx.with_card(card),
            None => ctx,
        }
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("member: alice\ncard: card-9\n").unwrap();
        assert_eq!(cfg.member, "alice");
        assert_eq!(cfg.card.as_deref(), Some("card-9"));
        assert_eq!(cfg.storage_prefix, "rtimetracker");
        assert_eq!(cfg.locale, "en");
        assert!(cfg.host_dir.is_none());
        assert_eq!(cfg.log_level_filter(), log::LevelFilter::Warn);
    }

    #[test]
    fn save_and_reload() {
        let path = env::temp_dir().join(format!("rtimetracker_cfg_{}.conf", std::process::id()));
        let cfg = Config {
            member: "bob".into(),
            host_dir: Some("/srv/shared".into()),
            log_level: "debug".into(),
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.log_level_filter(), log::LevelFilter::Debug);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn context_carries_member_and_card() {
        let cfg = Config {
            member: "m1".into(),
            card: Some("c1".into()),
            ..Config::default()
        };
        let ctx = cfg.context();
        assert_eq!(ctx.member, "m1");
        assert_eq!(ctx.require_card().unwrap(), "c1");
    }
}
