use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScenaristError;
use crate::Result;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = ".scenarist.toml";

/// Top-level configuration loaded from `.scenarist.toml`.
///
/// Every section is optional; missing keys fall back to their defaults.
///
/// # Examples
///
/// ```
/// use scenarist_core::ScenaristConfig;
///
/// let config = ScenaristConfig::default();
/// assert_eq!(config.prompt.max_files, 5);
/// assert_eq!(config.report.max_files, 10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenaristConfig {
    /// Limits applied while building the scenario prompt.
    #[serde(default)]
    pub prompt: PromptConfig,
    /// Limits applied to rendered reports.
    #[serde(default)]
    pub report: ReportConfig,
    /// Defaults for the test-code request.
    #[serde(default)]
    pub codegen: CodegenConfig,
    /// External text-generation command.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl ScenaristConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenaristError::FileNotFound`] if the file does not exist,
    /// [`ScenaristError::Io`] if it cannot be read, or
    /// [`ScenaristError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use scenarist_core::ScenaristConfig;
    /// use std::path::Path;
    ///
    /// let config = ScenaristConfig::from_file(Path::new(".scenarist.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScenaristError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ScenaristError::Toml`] if parsing fails, or
    /// [`ScenaristError::Config`] if a limit is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use scenarist_core::ScenaristConfig;
    ///
    /// let toml = r#"
    /// [prompt]
    /// max_files = 8
    /// "#;
    /// let config = ScenaristConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.prompt.max_files, 8);
    /// assert_eq!(config.prompt.max_additions_per_file, 10);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.prompt.max_files == 0 {
            return Err(ScenaristError::Config(
                "prompt.max_files must be at least 1".into(),
            ));
        }
        if self.report.max_files == 0 {
            return Err(ScenaristError::Config(
                "report.max_files must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Scenario prompt limits.
///
/// # Examples
///
/// ```
/// use scenarist_core::PromptConfig;
///
/// let config = PromptConfig::default();
/// assert_eq!(config.max_files, 5);
/// assert_eq!(config.max_additions_per_file, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Files given a detailed section in the prompt (default: 5).
    #[serde(default = "default_prompt_max_files")]
    pub max_files: usize,
    /// Leading additions quoted per file (default: 10).
    #[serde(default = "default_max_additions_per_file")]
    pub max_additions_per_file: usize,
}

fn default_prompt_max_files() -> usize {
    5
}

fn default_max_additions_per_file() -> usize {
    10
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_files: default_prompt_max_files(),
            max_additions_per_file: default_max_additions_per_file(),
        }
    }
}

/// Report rendering limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Files listed in the per-file table (default: 10).
    #[serde(default = "default_report_max_files")]
    pub max_files: usize,
}

fn default_report_max_files() -> usize {
    10
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_files: default_report_max_files(),
        }
    }
}

/// Target language and framework for generated test code.
///
/// # Examples
///
/// ```
/// use scenarist_core::CodegenConfig;
///
/// let config = CodegenConfig::default();
/// assert_eq!(config.language, "python");
/// assert_eq!(config.framework, "pytest");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Programming language of the generated tests.
    #[serde(default = "default_language")]
    pub language: String,
    /// Test framework of the generated tests.
    #[serde(default = "default_framework")]
    pub framework: String,
}

fn default_language() -> String {
    "python".into()
}

fn default_framework() -> String {
    "pytest".into()
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            framework: default_framework(),
        }
    }
}

/// Shell command that turns a prompt on stdin into text on stdout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Command line run through the platform shell, e.g. `"llm -m sonnet"`.
    pub command: Option<String>,
}
