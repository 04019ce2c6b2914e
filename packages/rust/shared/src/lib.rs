//! Shared domain types, errors, and configuration for SapScout.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AppConfig, DEFAULT_BASE_URL, DefaultsConfig, GeminiConfig, RunConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, resolve_api_key,
};
pub use error::{Result, SapScoutError};
pub use types::{
    BatchResult, ErrorResult, FeedbackBlock, FieldRecord, TableDefinition, TableResult,
};
