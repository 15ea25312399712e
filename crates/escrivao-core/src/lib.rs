use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub mod backend;
pub mod config_file;
pub mod credential;
mod error;
pub mod extract;
pub mod gemini;
pub mod identification;
pub mod mock;
pub mod model;
pub mod prompts;
mod reply;
mod service;
mod session;
pub mod tab;

// Re-export for convenience
pub use backend::{BackendError, PageFragments, PdfBackend};
pub use credential::{CredentialStore, KeyValueStore, build_store};
pub use error::ServiceError;
pub use extract::{PdfTextExtractor, TextExtractor};
pub use gemini::{ApiSettings, GeminiClient, GenerativeApi};
pub use identification::IdentificationPolicy;
pub use model::{InitialExtraction, Person, Procedure, RoleCategory};
pub use prompts::{OitivaOptions, ReportKind};
pub use reply::{Operation, Reply};
pub use service::Orchestrator;
pub use session::Session;
pub use tab::{ActiveTab, TabInspector};

/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "ESCRIVAO_MODEL";
/// Environment variable overriding the API base URL.
pub const API_BASE_ENV: &str = "ESCRIVAO_API_BASE";

/// Resolved runtime configuration for the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub api: ApiSettings,
    /// Credential store location. `None` means the platform default.
    pub storage_path: Option<PathBuf>,
    pub identification: IdentificationPolicy,
}

impl Config {
    /// Fill a config from the merged TOML file, keeping defaults for
    /// anything the file leaves out.
    pub fn from_file(file: &config_file::ConfigFile) -> Self {
        let mut config = Config::default();

        if let Some(api) = &file.api {
            if let Some(model) = api.model.as_ref().filter(|m| !m.trim().is_empty()) {
                config.api.model = model.clone();
            }
            if let Some(base) = api.base_url.as_ref().filter(|b| !b.trim().is_empty()) {
                config.api.base_url = base.clone();
            }
            config.api.timeout = api
                .timeout_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs);
        }
        if let Some(storage) = &file.storage {
            config.storage_path = storage.path.as_ref().map(PathBuf::from);
        }
        if let Some(ident) = &file.identification {
            let policy = &mut config.identification;
            if let Some(n) = ident.max_missing_fields {
                policy.max_missing_fields = n;
            }
            if let Some(b) = ident.single_name_is_incomplete {
                policy.single_name_is_incomplete = b;
            }
            if let Some(b) = ident.honor_model_flag {
                policy.honor_model_flag = b;
            }
        }
        config
    }

    /// Apply `ESCRIVAO_MODEL` / `ESCRIVAO_API_BASE` from `lookup`
    /// (normally `std::env::var`).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.model = model;
        }
        if let Some(base) = lookup(API_BASE_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = base;
        }
    }

    /// The resolved values as a config file, e.g. to write a starter config.
    pub fn to_file(&self) -> config_file::ConfigFile {
        config_file::ConfigFile {
            api: Some(config_file::ApiConfig {
                model: Some(self.api.model.clone()),
                base_url: Some(self.api.base_url.clone()),
                timeout_secs: self.api.timeout.map(|t| t.as_secs()),
            }),
            storage: Some(config_file::StorageConfig {
                path: self.storage_path.as_ref().map(|p| p.display().to_string()),
            }),
            identification: Some(config_file::IdentificationConfig {
                max_missing_fields: Some(self.identification.max_missing_fields),
                single_name_is_incomplete: Some(self.identification.single_name_is_incomplete),
                honor_model_flag: Some(self.identification.honor_model_flag),
            }),
            display: None,
            pdf: None,
        }
    }

    /// Load the config cascade and process environment in one go.
    pub fn load() -> Self {
        let mut config = Self::from_file(&config_file::load_config());
        config.apply_env(|k| std::env::var(k).ok());
        config
    }
}

/// Wire the production collaborators around `tab` and `pdf`.
pub fn build_orchestrator(
    config: &Config,
    tab: Arc<dyn TabInspector>,
    pdf: Arc<dyn PdfBackend>,
) -> Result<Orchestrator, ServiceError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("escrivao/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let extractor = Arc::new(PdfTextExtractor::new(client.clone(), pdf));
    let api = Arc::new(GeminiClient::new(client, config.api.clone()));
    let store = build_store(config.storage_path.as_deref());

    tracing::debug!(model = %config.api.model, base = %config.api.base_url, "orchestrator configured");
    Ok(Orchestrator::new(tab, extractor, api, store).with_policy(config.identification.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_file::{ApiConfig, ConfigFile, IdentificationConfig, StorageConfig};

    #[test]
    fn defaults_without_file() {
        let config = Config::from_file(&ConfigFile::default());
        assert_eq!(config.api, ApiSettings::default());
        assert_eq!(config.storage_path, None);
        assert_eq!(config.identification, IdentificationPolicy::default());
    }

    #[test]
    fn file_values_applied() {
        let file = ConfigFile {
            api: Some(ApiConfig {
                model: Some("gemini-2.0-flash".into()),
                base_url: None,
                timeout_secs: Some(45),
            }),
            storage: Some(StorageConfig {
                path: Some("/tmp/escrivao.json".into()),
            }),
            identification: Some(IdentificationConfig {
                max_missing_fields: Some(3),
                ..Default::default()
            }),
            display: None,
            pdf: None,
        };
        let config = Config::from_file(&file);
        assert_eq!(config.api.model, "gemini-2.0-flash");
        assert_eq!(config.api.base_url, gemini::DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout, Some(Duration::from_secs(45)));
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/escrivao.json")));
        assert_eq!(config.identification.max_missing_fields, 3);
        assert!(config.identification.honor_model_flag);
    }

    #[test]
    fn zero_timeout_means_none() {
        let file = ConfigFile {
            api: Some(ApiConfig {
                timeout_secs: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(Config::from_file(&file).api.timeout, None);
    }

    #[test]
    fn resolved_config_survives_file_round_trip() {
        let mut config = Config::default();
        config.api.timeout = Some(Duration::from_secs(20));
        config.identification.max_missing_fields = 1;
        assert_eq!(Config::from_file(&config.to_file()), config);
    }

    #[test]
    fn env_overrides_file() {
        let mut config = Config::default();
        config.apply_env(|k| match k {
            MODEL_ENV => Some("env-model".into()),
            API_BASE_ENV => Some("  ".into()),
            _ => None,
        });
        assert_eq!(config.api.model, "env-model");
        assert_eq!(config.api.base_url, gemini::DEFAULT_BASE_URL);
    }
}
