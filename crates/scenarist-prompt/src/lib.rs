//! Prompt construction and text generation.
//!
//! Builds the test-scenario and test-code prompts from a classified diff and
//! hands them to a [`generator::TextGenerator`], an opaque capability that
//! maps a prompt string to generated text. [`generator::CommandGenerator`]
//! backs it with any command that reads a prompt on stdin.

pub mod document;
pub mod generator;
pub mod prompt;

pub use document::render_document;
pub use generator::{CommandGenerator, ScenarioPipeline, TextGenerator};
pub use prompt::{build_scenario_prompt, build_test_code_prompt};
