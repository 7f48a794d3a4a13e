//! Shared types, error model, and configuration for lakekit.
//!
//! This crate is the foundation depended on by the other lakekit crates.
//! It provides:
//! - [`LakeKitError`] — the unified error type
//! - Run reporting types ([`RecordStatus`], [`RecordOutcome`], [`RunReport`])
//! - Configuration ([`AppConfig`], [`CatalogRunConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, CatalogPathsConfig, CatalogRunConfig, EnrichmentConfig,
    FieldNames, MinSize, config_dir, init_config, load_config, load_config_from,
    resolve_config_path,
};
pub use error::{LakeKitError, Result};
pub use types::{IdCollision, IneligibleReason, RecordOutcome, RecordStatus, RunReport};
