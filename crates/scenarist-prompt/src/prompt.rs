use std::fmt::Write;

use scenarist_core::{PrContext, PromptConfig};
use scenarist_difflens::{ChangeTypeMap, FileChange};

const SCENARIO_PREAMBLE: &str = "\
You are a senior software test engineer. Study the code changes below and \
design the test scenarios needed to ship them with confidence.
";

const SCENARIO_TASK: &str = "
## Your Task
Write test scenarios covering these changes:

1. **Unit Tests**: individual functions and methods
2. **Integration Tests**: components working together
3. **Edge Cases**: boundary values and error paths
4. **Regression Tests**: behavior that must keep working
5. **Security Tests**: only where the change touches a security surface
6. **Performance Tests**: only where the change has performance impact

For every scenario give:
- **Test Name**: short and descriptive
- **Test Type**: Unit, Integration, E2E, ...
- **Objective**: what the test proves
- **Steps**: how to run it
- **Expected Result**: the observable outcome
- **Priority**: High, Medium or Low

Format the answer as a structured test plan a QA engineer can follow.
";

/// Build the prompt asking for test scenarios.
///
/// Sections, in order: change summary, optional pull-request context, every
/// non-empty change category, a detailed section for the first
/// `config.max_files` files quoting up to `config.max_additions_per_file`
/// non-blank additions each, and the task instructions.
///
/// # Examples
///
/// ```
/// use scenarist_core::PromptConfig;
/// use scenarist_difflens::{classify, parse, summarize};
/// use scenarist_prompt::build_scenario_prompt;
///
/// let files = parse("diff --git a/app.py b/app.py\n+def foo():\n");
/// let prompt = build_scenario_prompt(
///     &summarize(&files),
///     &files,
///     &classify(&files),
///     None,
///     &PromptConfig::default(),
/// );
/// assert!(prompt.contains("### New Functions"));
/// assert!(prompt.contains("- app.py: def foo():"));
/// assert!(prompt.contains("### File: app.py"));
/// ```
pub fn build_scenario_prompt(
    summary: &str,
    files: &[FileChange],
    change_types: &ChangeTypeMap,
    pr_context: Option<&PrContext>,
    config: &PromptConfig,
) -> String {
    let mut prompt = String::from(SCENARIO_PREAMBLE);

    prompt.push_str("\n## Code Changes Summary\n");
    prompt.push_str(summary);
    prompt.push_str("\n\n");

    if let Some(ctx) = pr_context.filter(|ctx| !ctx.is_empty()) {
        prompt.push_str("## Pull Request Context\n");
        let _ = writeln!(prompt, "Title: {}", ctx.title.as_deref().unwrap_or("N/A"));
        let _ = writeln!(
            prompt,
            "Description: {}\n",
            ctx.description.as_deref().unwrap_or("N/A")
        );
    }

    prompt.push_str("## Types of Changes Detected\n");
    for (category, findings) in change_types.non_empty() {
        let _ = writeln!(prompt, "\n### {}", category.title());
        for finding in findings {
            let _ = writeln!(prompt, "- {finding}");
        }
    }

    prompt.push_str("\n## Detailed File Changes\n");
    for file in files.iter().take(config.max_files) {
        let _ = writeln!(prompt, "\n### File: {}", file.path);
        let _ = writeln!(prompt, "Additions: {} lines", file.additions.len());
        let _ = writeln!(prompt, "Deletions: {} lines", file.deletions.len());

        if !file.additions.is_empty() {
            prompt.push_str("\nKey additions:\n");
            for line in file
                .additions
                .iter()
                .take(config.max_additions_per_file)
                .filter(|line| !line.trim().is_empty())
            {
                let _ = writeln!(prompt, "  + {line}");
            }
        }
    }
    if files.len() > config.max_files {
        tracing::debug!(
            shown = config.max_files,
            total = files.len(),
            "truncated file details in scenario prompt"
        );
    }

    prompt.push_str(SCENARIO_TASK);
    prompt
}

/// Build the prompt asking for runnable test code implementing `scenarios`.
///
/// # Examples
///
/// ```
/// use scenarist_prompt::build_test_code_prompt;
///
/// let prompt = build_test_code_prompt("1. login works", "rust", "cargo test");
/// assert!(prompt.contains("rust"));
/// assert!(prompt.contains("cargo test"));
/// assert!(prompt.contains("1. login works"));
/// ```
pub fn build_test_code_prompt(scenarios: &str, language: &str, framework: &str) -> String {
    format!(
        "Turn the test scenarios below into test code written in {language} \
         using {framework}.

Test Scenarios:
{scenarios}

The code must be complete and runnable, with:
- all imports and setup
- one clearly named test per scenario
- explicit assertions
- short comments on what each test checks
- mocks or fixtures wherever external data is needed

Return the code ready to paste into a test file.
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenarist_difflens::{classify, parse, summarize};

    fn prompt_for(diff: &str, pr: Option<&PrContext>, config: &PromptConfig) -> String {
        let files = parse(diff);
        build_scenario_prompt(&summarize(&files), &files, &classify(&files), pr, config)
    }

    #[test]
    fn sections_appear_in_order() {
        let prompt = prompt_for(
            "diff --git a/app.py b/app.py\n+def foo():\n",
            None,
            &PromptConfig::default(),
        );
        let summary = prompt.find("## Code Changes Summary").unwrap();
        let types = prompt.find("## Types of Changes Detected").unwrap();
        let details = prompt.find("## Detailed File Changes").unwrap();
        let task = prompt.find("## Your Task").unwrap();
        assert!(summary < types && types < details && details < task);
        assert!(prompt.contains("- Files changed: 1"));
    }

    #[test]
    fn only_non_empty_categories_are_listed() {
        let prompt = prompt_for(
            "diff --git a/config.yaml b/config.yaml\n+debug: false\n",
            None,
            &PromptConfig::default(),
        );
        assert!(prompt.contains("### Config Changes\n- config.yaml\n"));
        assert!(!prompt.contains("### New Functions"));
        assert!(!prompt.contains("### Modified Classes"));
    }

    #[test]
    fn pr_context_is_included_with_fallbacks() {
        let ctx = PrContext {
            title: Some("Add signup".into()),
            description: None,
        };
        let prompt = prompt_for(
            "diff --git a/a.py b/a.py\n+x\n",
            Some(&ctx),
            &PromptConfig::default(),
        );
        assert!(prompt.contains("## Pull Request Context\nTitle: Add signup\nDescription: N/A\n"));
    }

    #[test]
    fn empty_pr_context_is_omitted() {
        let prompt = prompt_for(
            "diff --git a/a.py b/a.py\n+x\n",
            Some(&PrContext::default()),
            &PromptConfig::default(),
        );
        assert!(!prompt.contains("Pull Request Context"));
    }

    #[test]
    fn file_sections_respect_max_files() {
        let diff = "\
diff --git a/one.py b/one.py
+a
diff --git a/two.py b/two.py
+b
diff --git a/three.py b/three.py
+c
";
        let config = PromptConfig {
            max_files: 2,
            ..PromptConfig::default()
        };
        let prompt = prompt_for(diff, None, &config);
        assert!(prompt.contains("### File: one.py"));
        assert!(prompt.contains("### File: two.py"));
        assert!(!prompt.contains("### File: three.py"));
        // The summary still names every file.
        assert!(prompt.contains("  - three.py (+1, -0)"));
    }

    #[test]
    fn additions_are_capped_and_blank_ones_skipped() {
        let diff = "\
diff --git a/m.py b/m.py
+first
+
+second
+third
+fourth
";
        let config = PromptConfig {
            max_additions_per_file: 3,
            ..PromptConfig::default()
        };
        let prompt = prompt_for(diff, None, &config);
        assert!(prompt.contains("Key additions:\n  + first\n  + second\n\n## Your Task"));
        assert!(!prompt.contains("+ third"));
        assert!(prompt.contains("Additions: 5 lines"));
    }

    #[test]
    fn files_without_additions_have_no_key_additions_block() {
        let prompt = prompt_for(
            "diff --git a/gone.py b/gone.py\n-old\n",
            None,
            &PromptConfig::default(),
        );
        assert!(prompt.contains("### File: gone.py\nAdditions: 0 lines\nDeletions: 1 lines\n"));
        assert!(!prompt.contains("Key additions"));
    }

    #[test]
    fn test_code_prompt_embeds_inputs() {
        let prompt = build_test_code_prompt("scenario text", "python", "pytest");
        assert!(prompt.starts_with("Turn the test scenarios below into test code written in python using pytest."));
        assert!(prompt.contains("Test Scenarios:\nscenario text\n"));
    }
}
