use std::io::Write;
use std::process::{Command, Stdio};

use scenarist_core::{CodegenConfig, PrContext, PromptConfig, Result, ScenaristError};
use scenarist_difflens::{classify, summarize, FileChange};

use crate::prompt::{build_scenario_prompt, build_test_code_prompt};

/// Anything that turns a prompt into generated text.
///
/// Closures of the right shape implement it, which keeps tests free of
/// subprocesses and network access.
///
/// # Examples
///
/// ```
/// use scenarist_prompt::TextGenerator;
///
/// let echo = |prompt: &str| -> scenarist_core::Result<String> { Ok(prompt.len().to_string()) };
/// assert_eq!(echo.generate("abc").unwrap(), "3");
/// ```
pub trait TextGenerator {
    /// Generate text for `prompt`.
    ///
    /// # Errors
    ///
    /// Implementations report failures as [`ScenaristError::Generation`].
    fn generate(&self, prompt: &str) -> Result<String>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str) -> Result<String>,
{
    fn generate(&self, prompt: &str) -> Result<String> {
        self(prompt)
    }
}

/// Runs a shell command with the prompt on stdin and returns its stdout.
///
/// The command is interpreted by `sh -c` (or `cmd /C` on Windows), so
/// pipes and arguments work as typed, e.g. `llm -m gpt-4o-mini` or
/// `ollama run llama3`.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    command: String,
}

impl CommandGenerator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn shell(&self) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.command);
            cmd
        }
    }
}

impl TextGenerator for CommandGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        tracing::debug!(command = %self.command, prompt_bytes = prompt.len(), "running generator");

        let mut child = self
            .shell()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ScenaristError::Generation(format!("failed to start '{}': {e}", self.command))
            })?;

        // stdin is written off-thread; the child may fill stdout before
        // reading the whole prompt.
        let stdin = child.stdin.take();
        let input = prompt.to_string();
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes())?;
            }
            Ok(())
        });

        let output = child.wait_with_output().map_err(|e| {
            ScenaristError::Generation(format!("failed to wait for '{}': {e}", self.command))
        })?;

        if let Ok(Err(e)) = writer.join() {
            // Broken pipe when the command ignores stdin.
            tracing::debug!(error = %e, "generator did not consume the whole prompt");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScenaristError::Generation(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(ScenaristError::Generation(format!(
                "'{}' produced no output",
                self.command
            )));
        }
        Ok(text)
    }
}

/// Two-step generation: scenarios from a diff, then test code from scenarios.
///
/// # Examples
///
/// ```
/// use scenarist_core::{CodegenConfig, PromptConfig};
/// use scenarist_difflens::parse;
/// use scenarist_prompt::ScenarioPipeline;
///
/// let generator = |prompt: &str| -> scenarist_core::Result<String> {
///     Ok(if prompt.contains("## Your Task") { "1. foo returns 1".into() } else { "def test_foo(): ...".into() })
/// };
/// let pipeline = ScenarioPipeline::new(generator, PromptConfig::default(), CodegenConfig::default());
///
/// let files = parse("diff --git a/app.py b/app.py\n+def foo():\n");
/// let scenarios = pipeline.scenarios(&files, None).unwrap();
/// assert_eq!(scenarios, "1. foo returns 1");
/// assert_eq!(pipeline.test_code(&scenarios).unwrap(), "def test_foo(): ...");
/// ```
pub struct ScenarioPipeline<G> {
    generator: G,
    prompt: PromptConfig,
    codegen: CodegenConfig,
}

impl<G: TextGenerator> ScenarioPipeline<G> {
    pub fn new(generator: G, prompt: PromptConfig, codegen: CodegenConfig) -> Self {
        Self {
            generator,
            prompt,
            codegen,
        }
    }

    /// Generate test scenarios for the parsed diff.
    ///
    /// # Errors
    ///
    /// Propagates the generator's error.
    pub fn scenarios(&self, files: &[FileChange], pr_context: Option<&PrContext>) -> Result<String> {
        let summary = summarize(files);
        let change_types = classify(files);
        let prompt = build_scenario_prompt(&summary, files, &change_types, pr_context, &self.prompt);
        tracing::info!(files = files.len(), findings = change_types.len(), "generating test scenarios");
        self.generator.generate(&prompt)
    }

    /// Generate test code implementing `scenarios` in the configured
    /// language and framework.
    ///
    /// # Errors
    ///
    /// Propagates the generator's error.
    pub fn test_code(&self, scenarios: &str) -> Result<String> {
        let prompt = build_test_code_prompt(scenarios, &self.codegen.language, &self.codegen.framework);
        tracing::info!(
            language = %self.codegen.language,
            framework = %self.codegen.framework,
            "generating test code"
        );
        self.generator.generate(&prompt)
    }
}
