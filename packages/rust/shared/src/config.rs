//! Application configuration for SapScout.
//!
//! User config lives at `~/.sapscout/sapscout.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SapScoutError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sapscout.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sapscout";

/// Page URL template; `{name}` is replaced with the lowercased table name.
pub const DEFAULT_BASE_URL: &str = "https://leanx.eu/en/sap/table/{name}.html";

// ---------------------------------------------------------------------------
// Config structs (matching sapscout.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Gemini settings.
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory for batch-mode output documents.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Output path for single-URL runs.
    #[serde(default = "default_single_output")]
    pub single_output: String,

    /// Batch input CSV path.
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            single_output: default_single_output(),
            csv_path: default_csv_path(),
        }
    }
}

fn default_output_dir() -> String {
    "output".into()
}
fn default_single_output() -> String {
    "output/output.json".into()
}
fn default_csv_path() -> String {
    "input/sap_tables.csv".into()
}

/// `[gemini]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model to use for table analysis.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
        }
    }
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".into()
}
fn default_model() -> String {
    "gemini-pro".into()
}

// ---------------------------------------------------------------------------
// Run config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Resolved runtime configuration, constructed once at process entry and
/// passed by parameter into every component that needs it.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory for batch-mode per-table and consolidated documents.
    pub output_dir: PathBuf,
    /// Output path for single-URL runs.
    pub single_output: PathBuf,
    /// Model identifier for the text-generation collaborator.
    pub model: String,
    /// Page URL template containing a `{name}` placeholder.
    pub base_url: String,
}

impl RunConfig {
    /// Derive the page URL for a table name by lowercasing it into the
    /// URL template.
    pub fn page_url(&self, table_name: &str) -> String {
        self.base_url.replace("{name}", &table_name.to_lowercase())
    }
}

impl From<&AppConfig> for RunConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.defaults.output_dir),
            single_output: PathBuf::from(&config.defaults.single_output),
            model: config.gemini.model.clone(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sapscout/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SapScoutError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.sapscout/sapscout.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SapScoutError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SapScoutError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SapScoutError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SapScoutError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SapScoutError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the Gemini API key from the configured env var.
/// Missing or empty keys are a fatal startup error.
pub fn resolve_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.gemini.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(SapScoutError::config(format!(
            "Gemini API key not found. Set the {var_name} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("GOOGLE_API_KEY"));
        assert!(toml_str.contains("gemini-pro"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.csv_path, "input/sap_tables.csv");
        assert_eq!(parsed.defaults.single_output, "output/output.json");
        assert_eq!(parsed.gemini.api_key_env, "GOOGLE_API_KEY");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
output_dir = "/tmp/tables"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.output_dir, "/tmp/tables");
        assert_eq!(config.defaults.csv_path, "input/sap_tables.csv");
        assert_eq!(config.gemini.model, "gemini-pro");
    }

    #[test]
    fn run_config_from_app_config() {
        let app = AppConfig::default();
        let run = RunConfig::from(&app);
        assert_eq!(run.output_dir, PathBuf::from("output"));
        assert_eq!(run.single_output, PathBuf::from("output/output.json"));
        assert_eq!(run.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn page_url_lowercases_table_name() {
        let run = RunConfig::from(&AppConfig::default());
        assert_eq!(
            run.page_url("MARA"),
            "https://leanx.eu/en/sap/table/mara.html"
        );
        assert_eq!(
            run.page_url("bseg"),
            "https://leanx.eu/en/sap/table/bseg.html"
        );
    }

    #[test]
    fn api_key_resolution_fails_when_unset() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.gemini.api_key_env = "SAPSCOUT_TEST_NONEXISTENT_KEY_12345".into();
        let result = resolve_api_key(&config);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("API key not found")
        );
    }
}
