//! Application configuration for lakekit.
//!
//! Config is read from `--config`, then `./lakekit.toml`, then
//! `~/.lakekit/lakekit.toml`. CLI flags override config file values, which
//! override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LakeKitError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "lakekit.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".lakekit";

// ---------------------------------------------------------------------------
// Config structs (matching lakekit.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The hand-maintained source file with text-block records.
    #[serde(default = "CatalogPathsConfig::text_default")]
    pub text_catalog: CatalogPathsConfig,

    /// The record-sequence (JSON array) document.
    #[serde(default = "CatalogPathsConfig::json_default")]
    pub json_catalog: CatalogPathsConfig,

    /// Structural key names.
    #[serde(default)]
    pub fields: FieldNames,

    /// Placeholder values of the enrichment fragment.
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            text_catalog: CatalogPathsConfig::text_default(),
            json_catalog: CatalogPathsConfig::json_default(),
            fields: FieldNames::default(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

/// `[text_catalog]` / `[json_catalog]` sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPathsConfig {
    /// Document to read.
    pub input_path: PathBuf,

    /// Document to write. Defaults to `input_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

impl CatalogPathsConfig {
    fn text_default() -> Self {
        Self {
            input_path: PathBuf::from("src/app/services/lake.service.ts"),
            output_path: None,
        }
    }

    fn json_default() -> Self {
        Self {
            input_path: PathBuf::from("src/assets/data/lakes.json"),
            output_path: None,
        }
    }
}

/// `[fields]` section: key names used to recognise and extend records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    /// Human-readable record name.
    pub name: String,
    /// Marker field whose presence makes a text block enrichable.
    pub marker: String,
    /// Pricing block key; its presence means "already enriched".
    pub pricing: String,
    /// Regulations block key.
    pub regulations: String,
    /// Image path list key.
    pub images: String,
    /// Derived identifier key.
    pub identifier: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            name: "name".into(),
            marker: "permitRequired".into(),
            pricing: "permitPrices".into(),
            regulations: "regulations".into(),
            images: "images".into(),
            identifier: "id".into(),
        }
    }
}

/// `[enrichment]` section: the placeholder values a human fills in later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub daily: String,
    pub weekly: String,
    pub monthly: String,
    pub annual: String,
    pub youth: String,
    pub link: String,
    pub closed_seasons: String,
    pub bag_limit: String,
    pub additional_rules: Vec<String>,
    /// Directory prefix for generated image paths.
    pub image_base: String,
    /// Number of image placeholders per record.
    pub image_count: usize,
    /// Ordered minimum-size table.
    pub min_sizes: Vec<MinSize>,
}

/// One row of the minimum-size table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinSize {
    pub label: String,
    pub size: String,
}

impl MinSize {
    fn new(label: &str, size: &str) -> Self {
        Self {
            label: label.into(),
            size: size.into(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        let check = "Bitte Kantonsvorschriften prüfen".to_string();
        Self {
            daily: "CHF 25.00".into(),
            weekly: "CHF 55.00".into(),
            monthly: "CHF 130.00".into(),
            annual: "CHF 320.00".into(),
            youth: "CHF 90.00".into(),
            link: "https://www.sana.ch/".into(),
            closed_seasons: check.clone(),
            bag_limit: check,
            additional_rules: vec![
                "Kantonsvorschriften beachten".into(),
                "Schonzeiten einhalten".into(),
                "Mindestmaße kontrollieren".into(),
            ],
            image_base: "/assets/lakes".into(),
            image_count: 3,
            min_sizes: vec![
                MinSize::new("Hecht", "50 cm"),
                MinSize::new("Zander", "45 cm"),
                MinSize::new("Forelle", "24 cm"),
                MinSize::new("Barsch", "15 cm"),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Run config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime configuration of one pipeline run.
#[derive(Debug, Clone)]
pub struct CatalogRunConfig {
    /// Document to read.
    pub input_path: PathBuf,
    /// Document to write.
    pub output_path: PathBuf,
    /// Process in memory and report, but never write.
    pub dry_run: bool,
}

impl From<&CatalogPathsConfig> for CatalogRunConfig {
    fn from(config: &CatalogPathsConfig) -> Self {
        Self {
            input_path: config.input_path.clone(),
            output_path: config
                .output_path
                .clone()
                .unwrap_or_else(|| config.input_path.clone()),
            dry_run: false,
        }
    }
}

impl CatalogRunConfig {
    /// Apply CLI overrides. An `--input` without `--output` rewrites in place.
    pub fn with_overrides(
        mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        dry_run: bool,
    ) -> Self {
        if let Some(input) = input {
            self.output_path = output.clone().unwrap_or_else(|| input.clone());
            self.input_path = input;
        }
        if let Some(output) = output {
            self.output_path = output;
        }
        self.dry_run |= dry_run;
        self
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.lakekit/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LakeKitError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Resolve which config file applies, if any.
///
/// An explicit path must exist. Otherwise the working directory is checked
/// before the user config directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(LakeKitError::config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(Some(local));
    }

    let user = config_dir()?.join(CONFIG_FILE_NAME);
    Ok(user.exists().then_some(user))
}

/// Load the application config. Returns defaults if no config file exists.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match resolve_config_path(explicit)? {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LakeKitError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        LakeKitError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write a default config file into `dir`. Refuses to overwrite.
/// Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(LakeKitError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| LakeKitError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LakeKitError::io(&path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(path)
}

impl AppConfig {
    /// Reject configurations that would produce broken documents.
    pub fn validate(&self) -> Result<()> {
        let f = &self.fields;
        for (label, key) in [
            ("name", &f.name),
            ("marker", &f.marker),
            ("pricing", &f.pricing),
            ("regulations", &f.regulations),
            ("images", &f.images),
            ("identifier", &f.identifier),
        ] {
            let valid = key
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(LakeKitError::validation(format!(
                    "fields.{label} = {key:?} is not a plain identifier"
                )));
            }
        }
        if self.enrichment.image_count == 0 {
            return Err(LakeKitError::validation(
                "enrichment.image_count must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("lake.service.ts"));
        assert!(toml_str.contains("lakes.json"));
        assert!(toml_str.contains("permitRequired"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.fields, FieldNames::default());
        assert_eq!(parsed.enrichment.min_sizes.len(), 4);
        assert_eq!(parsed.enrichment.min_sizes[0].label, "Hecht");
        assert_eq!(
            parsed.json_catalog.input_path,
            PathBuf::from("src/assets/data/lakes.json")
        );
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[text_catalog]
input_path = "/tmp/lakes.ts"

[fields]
marker = "requiredPermit"
pricing = "pricing"
identifier = "identifier"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.text_catalog.input_path, PathBuf::from("/tmp/lakes.ts"));
        assert_eq!(config.fields.marker, "requiredPermit");
        assert_eq!(config.fields.name, "name");
        assert_eq!(config.fields.images, "images");
        assert_eq!(
            config.json_catalog.input_path,
            PathBuf::from("src/assets/data/lakes.json")
        );
        assert_eq!(config.enrichment.image_count, 3);
    }

    #[test]
    fn run_config_from_paths() {
        let app = AppConfig::default();
        let run = CatalogRunConfig::from(&app.text_catalog);
        assert_eq!(run.input_path, run.output_path);
        assert!(!run.dry_run);

        let run = run.with_overrides(Some("/tmp/in.ts".into()), None, true);
        assert_eq!(run.input_path, PathBuf::from("/tmp/in.ts"));
        assert_eq!(run.output_path, PathBuf::from("/tmp/in.ts"));
        assert!(run.dry_run);

        let run = run.with_overrides(None, Some("/tmp/out.ts".into()), false);
        assert_eq!(run.input_path, PathBuf::from("/tmp/in.ts"));
        assert_eq!(run.output_path, PathBuf::from("/tmp/out.ts"));
        assert!(run.dry_run);
    }

    #[test]
    fn invalid_field_name_rejected() {
        let mut config = AppConfig::default();
        config.fields.marker = "permit Required".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fields.marker"));
    }

    #[test]
    fn init_config_writes_and_refuses_overwrite() {
        let dir = std::env::temp_dir().join(format!("lakekit-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();

        let path = init_config(&dir).expect("init");
        let loaded = load_config_from(&path).expect("load");
        assert_eq!(loaded.fields.pricing, "permitPrices");
        assert!(init_config(&dir).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let result = load_config(Some(Path::new("/nonexistent/lakekit-test.toml")));
        assert!(result.is_err());
    }
}
