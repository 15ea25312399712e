use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub storage: Option<StorageConfig>,
    pub identification: Option<IdentificationConfig>,
    pub display: Option<DisplayConfig>,
    pub pdf: Option<PdfConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON file holding the API credential.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentificationConfig {
    pub max_missing_fields: Option<usize>,
    pub single_name_is_incomplete: Option<bool>,
    pub honor_model_flag: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub fps: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Fraction of page height cut from the top of every page (0.0 keeps it).
    pub header_exclusion: Option<f32>,
    /// Fraction of page height cut from the bottom of every page.
    pub footer_exclusion: Option<f32>,
}

/// Platform config directory path: `<config_dir>/escrivao/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("escrivao").join("config.toml"))
}

/// Load config by cascading CWD `.escrivao.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".escrivao.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// First value present in `overlay`, else in `base`.
fn pick<S, T>(overlay: &Option<S>, base: &Option<S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&field)
        .or_else(|| base.as_ref().and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        api: Some(ApiConfig {
            model: pick(&overlay.api, &base.api, |a| a.model.clone()),
            base_url: pick(&overlay.api, &base.api, |a| a.base_url.clone()),
            timeout_secs: pick(&overlay.api, &base.api, |a| a.timeout_secs),
        }),
        storage: Some(StorageConfig {
            path: pick(&overlay.storage, &base.storage, |s| s.path.clone()),
        }),
        identification: Some(IdentificationConfig {
            max_missing_fields: pick(&overlay.identification, &base.identification, |i| {
                i.max_missing_fields
            }),
            single_name_is_incomplete: pick(&overlay.identification, &base.identification, |i| {
                i.single_name_is_incomplete
            }),
            honor_model_flag: pick(&overlay.identification, &base.identification, |i| {
                i.honor_model_flag
            }),
        }),
        display: Some(DisplayConfig {
            theme: pick(&overlay.display, &base.display, |d| d.theme.clone()),
            fps: pick(&overlay.display, &base.display, |d| d.fps),
        }),
        pdf: Some(PdfConfig {
            header_exclusion: pick(&overlay.pdf, &base.pdf, |p| p.header_exclusion),
            footer_exclusion: pick(&overlay.pdf, &base.pdf, |p| p.footer_exclusion),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    save_to_path(config, &path)?;
    Ok(path)
}

pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_round_trip_toml() {
        let config = ConfigFile {
            api: Some(ApiConfig {
                model: Some("gemini-2.0-flash".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api.unwrap().model.unwrap(), "gemini-2.0-flash");
    }

    #[test]
    fn partial_sections_deserialize() {
        let toml_str = "[identification]\nmax_missing_fields = 3\n\n[display]\ntheme = \"modern\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let ident = parsed.identification.unwrap();
        assert_eq!(ident.max_missing_fields, Some(3));
        assert!(ident.honor_model_flag.is_none());
        assert!(parsed.api.is_none());
        assert_eq!(parsed.display.unwrap().theme.as_deref(), Some("modern"));
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            api: Some(ApiConfig {
                model: Some("base-model".to_string()),
                timeout_secs: Some(30),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            api: Some(ApiConfig {
                model: Some("overlay-model".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let api = merge(base, overlay).api.unwrap();
        assert_eq!(api.model.as_deref(), Some("overlay-model"));
        assert_eq!(api.timeout_secs, Some(30));
    }

    #[test]
    fn pdf_margins_merge_per_field() {
        let base: ConfigFile =
            toml::from_str("[pdf]\nheader_exclusion = 0.05\nfooter_exclusion = 0.1\n").unwrap();
        let overlay: ConfigFile = toml::from_str("[pdf]\nfooter_exclusion = 0.0\n").unwrap();
        let pdf = merge(base, overlay).pdf.unwrap();
        assert_eq!(pdf.header_exclusion, Some(0.05));
        assert_eq!(pdf.footer_exclusion, Some(0.0));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            storage: Some(StorageConfig {
                path: Some("/base/storage.json".to_string()),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(
            merged.storage.unwrap().path.as_deref(),
            Some("/base/storage.json")
        );
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ConfigFile {
            display: Some(DisplayConfig {
                theme: Some("hacker".to_string()),
                fps: Some(20),
            }),
            ..Default::default()
        };
        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from_path(&path), Some(config));
    }

    #[test]
    fn unparseable_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nmodel = ").unwrap();
        assert_eq!(load_from_path(&path), None);
    }
}
