use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Root application configuration, loaded from `~/.config/fetchdoi/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub doi: DoiConfig,
    pub registries: RegistriesConfig,
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Upper bound for a single outbound request, connect included.
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoiConfig {
    /// Resolver that answers content-negotiated DOI lookups.
    pub proxy_url: String,
    /// Host that short DOIs (`doi.org/abc12`) redirect from.
    pub short_doi_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistriesConfig {
    pub person_registry_url: String,
    pub channel_registry_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub enabled: bool,
    pub max_unverified_contributors: usize,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "fetchdoi/0.1".to_string(),
        }
    }
}

impl Default for DoiConfig {
    fn default() -> Self {
        Self {
            proxy_url: "https://doi.org".to_string(),
            short_doi_url: "https://doi.org".to_string(),
        }
    }
}

impl Default for RegistriesConfig {
    fn default() -> Self {
        Self {
            person_registry_url: "https://api.nva.unit.no/cristin".to_string(),
            channel_registry_url: "https://api.nva.unit.no/publication-channels".to_string(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_unverified_contributors: 10,
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/fetchdoi/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("FETCHDOI_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("fetchdoi")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.http.timeout_secs, 10);
        assert_eq!(cfg.enrichment.max_unverified_contributors, 10);
        assert!(cfg.enrichment.enabled);
        assert_eq!(cfg.doi.proxy_url, "https://doi.org");
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = AppConfig::default();
        cfg.registries.channel_registry_url = "http://localhost:9000".to_string();
        cfg.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.registries.channel_registry_url, "http://localhost:9000");
        assert_eq!(loaded.http.user_agent, cfg.http.user_agent);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = 3\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.http.timeout_secs, 3);
        assert_eq!(loaded.http.user_agent, "fetchdoi/0.1");
        assert_eq!(loaded.enrichment.max_unverified_contributors, 10);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let cfg = AppConfig::load_from(Path::new("/tmp/nonexistent_fetchdoi_config.toml")).unwrap();
        assert_eq!(cfg.http.timeout_secs, 10);
    }
}
