use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tasklet::export::DEFAULT_DATE_FORMAT;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub storage: StorageConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the task and folder collections
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// chrono format string for dates in CSV and shared text
    pub date_format: String,
    /// Where exports are written when no output path is given
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            output_dir: None,
        }
    }
}

impl StorageConfig {
    /// Configured data directory, or `<data_local_dir>/tasklet/data`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(env!("CARGO_PKG_NAME"))
                .join("data")
        })
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Returns the config plus a warning for every candidate file that exists
    /// but could not be loaded. Loading runs before logging is set up, so the
    /// caller reports them.
    pub fn load(config_path: Option<&PathBuf>) -> Result<(Self, Vec<String>)> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            let config =
                Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()))?;
            return Ok((config, Vec::new()));
        }

        let project_name = env!("CARGO_PKG_NAME");
        let mut candidates = Vec::new();

        // Primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(project_name).join(format!("{}.yml", project_name)));
        }

        // Fallback location: ./<project>.yml
        candidates.push(PathBuf::from(format!("{}.yml", project_name)));

        Ok(Self::load_first(&candidates))
    }

    fn load_first(candidates: &[PathBuf]) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return (config, warnings),
                Err(e) => warnings.push(format!("Failed to load config from {}: {:#}", path.display(), e)),
            }
        }

        // No usable config file found, use defaults
        (Self::default(), warnings)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.log_level.is_none());
        assert_eq!(config.export.date_format, DEFAULT_DATE_FORMAT);
        assert!(config.storage.resolve_data_dir().ends_with("tasklet/data"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("storage:\n  data_dir: /srv/tasklet\n").unwrap();
        assert_eq!(config.storage.resolve_data_dir(), PathBuf::from("/srv/tasklet"));
        assert_eq!(config.export.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yml");
        fs::write(&path, "log_level: debug\nexport:\n  date_format: \"%Y-%m-%d\"\n").unwrap();

        let (config, warnings) = Config::load(Some(&path)).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.export.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_load_explicit_path_missing_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_broken_candidate_is_reported_and_skipped() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("broken.yml");
        let good = temp.path().join("good.yml");
        fs::write(&broken, "storage: [not, a, map").unwrap();
        fs::write(&good, "log_level: warn\n").unwrap();

        let (config, warnings) = Config::load_first(&[temp.path().join("absent.yml"), broken.clone(), good]);
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains(&broken.display().to_string()));
    }

    #[test]
    fn test_no_candidates_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let (config, warnings) = Config::load_first(&[temp.path().join("absent.yml")]);
        assert!(warnings.is_empty());
        assert!(config.log_level.is_none());
    }
}
