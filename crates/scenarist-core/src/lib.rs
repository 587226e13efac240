//! Core types, configuration, and error handling for scenarist.
//!
//! This crate provides the shared foundation used by the other scenarist crates:
//! - [`ScenaristError`]: unified error type using `thiserror`
//! - [`ScenaristConfig`]: configuration loaded from `.scenarist.toml`
//! - Shared types: [`OutputFormat`], [`PrContext`]

mod config;
mod error;
mod types;

pub use config::{
    CodegenConfig, GeneratorConfig, PromptConfig, ReportConfig, ScenaristConfig,
    DEFAULT_CONFIG_FILE,
};
pub use error::ScenaristError;
pub use types::{OutputFormat, PrContext};

/// A convenience `Result` type for scenarist operations.
pub type Result<T> = std::result::Result<T, ScenaristError>;
