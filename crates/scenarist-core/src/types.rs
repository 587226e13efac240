use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Optional pull-request metadata handed to the prompt builder.
///
/// # Examples
///
/// ```
/// use scenarist_core::PrContext;
///
/// let ctx = PrContext {
///     title: Some("Add user signup".into()),
///     description: None,
/// };
/// assert!(!ctx.is_empty());
/// assert!(PrContext::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrContext {
    /// Pull-request title.
    pub title: Option<String>,
    /// Pull-request body.
    pub description: Option<String>,
}

impl PrContext {
    /// `true` when neither a title nor a description is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Output format for CLI results.
///
/// # Examples
///
/// ```
/// use scenarist_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
/// assert_eq!(fmt.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
    /// GitHub-flavored Markdown.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!(
                "unknown output format: '{s}' (expected text, json, or markdown)"
            )),
        }
    }
}
