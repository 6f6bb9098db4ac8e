use crate::prelude::{CoreError, CoreResult};
use crate::remote::http::{HttpBackend, API_URL_ENV, DEFAULT_API_URL};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const HISTORY_DIR_ENV: &str = "NETVISOR_HISTORY_DIR";
pub const CONFIG_FILE_NAME: &str = "netvisor.yaml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "netvisor", "netvisor")
}

/// Settings shared by the command-line client and the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub history_dir: PathBuf,
    /// Zero disables the request timeout.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let history_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("netvisor"));
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            history_dir,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Reads `path` if given, otherwise the per-user config file when one
    /// exists, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    /// Defaults plus environment overrides, ignoring any config file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            CoreError::Config(format!("reading {}: {}", path.display(), err))
        })?;
        serde_yaml::from_str(&contents)
            .map_err(|err| CoreError::Config(format!("parsing {}: {}", path.display(), err)))
    }

    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Blank values are ignored.
    pub fn apply_overrides(&mut self, api_url: Option<String>, history_dir: Option<String>) {
        if let Some(url) = api_url.filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(dir) = history_dir.filter(|v| !v.trim().is_empty()) {
            self.history_dir = PathBuf::from(dir);
        }
    }

    fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(HISTORY_DIR_ENV).ok(),
        );
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// HTTP backend for `api_url`, bounded by the configured timeout.
    pub fn http_backend(&self) -> CoreResult<HttpBackend> {
        match self.request_timeout() {
            Some(timeout) => HttpBackend::with_timeout(&self.api_url, timeout)
                .map_err(|err| CoreError::Config(format!("building HTTP client: {}", err))),
            None => Ok(HttpBackend::new(&self.api_url)),
        }
    }
}
