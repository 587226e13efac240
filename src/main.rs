use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use scenarist_core::{OutputFormat, PrContext, ScenaristConfig, DEFAULT_CONFIG_FILE};
use scenarist_difflens::{parse, summarize, ChangeReport, FileChange};
use scenarist_prompt::{
    build_scenario_prompt, build_test_code_prompt, render_document, CommandGenerator,
    ScenarioPipeline,
};

#[derive(Parser)]
#[command(
    name = "scenarist",
    version,
    about = "Turn code diffs into change reports and test-scenario prompts",
    long_about = "Scenarist reads a unified diff, works out what kind of code changed, and\n\
                   builds the prompt that asks a text generator for test scenarios.\n\n\
                   Examples:\n  \
                     git diff | scenarist analyze              Categorize a diff from stdin\n  \
                     scenarist compare --base main --compare HEAD\n  \
                     scenarist prompt --file pr.diff --title 'Add signup'\n  \
                     scenarist generate --base main --compare HEAD --command 'llm -m gpt-4o-mini'\n  \
                     scenarist init                            Write a default .scenarist.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .scenarist.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,
}

/// Where the diff comes from: a file, stdin, or two revisions of a repository.
#[derive(Args)]
struct DiffSource {
    /// Read diff from file instead of stdin
    #[arg(long, conflicts_with_all = ["base", "compare"])]
    file: Option<PathBuf>,

    /// Base revision to diff from (requires --compare)
    #[arg(long, requires = "compare")]
    base: Option<String>,

    /// Revision to diff to (requires --base)
    #[arg(long, requires = "base")]
    compare: Option<String>,

    /// Repository used with --base/--compare
    #[arg(long, default_value = ".")]
    repo: PathBuf,
}

#[derive(Args)]
struct PrArgs {
    /// Pull request title to include in the prompt
    #[arg(long)]
    title: Option<String>,

    /// Pull request description to include in the prompt
    #[arg(long)]
    description: Option<String>,
}

impl PrArgs {
    fn context(&self) -> Option<PrContext> {
        let ctx = PrContext {
            title: self.title.clone(),
            description: self.description.clone(),
        };
        (!ctx.is_empty()).then_some(ctx)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Parse a diff and report what changed
    #[command(long_about = "Parse a unified diff and report what changed.\n\n\
        Counts added and deleted lines per file and flags new functions, classes,\n\
        API endpoints, config files and database files. Reads from stdin or a file.\n\n\
        Examples:\n  git diff | scenarist analyze\n  scenarist analyze --file changes.patch --format json")]
    Analyze {
        /// Read diff from file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Diff two revisions of a local repository and report what changed
    #[command(long_about = "Diff two revisions of a local git repository and report what changed.\n\n\
        Revisions accept anything git rev-parse does: branches, tags, commit ids, HEAD~1.\n\n\
        Examples:\n  scenarist compare --base main --compare feature/signup\n  scenarist compare --base HEAD~3 --compare HEAD --repo ../api")]
    Compare {
        /// Base revision
        #[arg(long)]
        base: String,

        /// Revision to compare against the base
        #[arg(long)]
        compare: String,

        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
    /// Print the test-scenario prompt for a diff
    #[command(long_about = "Print the test-scenario prompt for a diff.\n\n\
        The prompt holds the change summary, detected change types and the first\n\
        additions of each file. Pipe it into any text generator.\n\n\
        Examples:\n  git diff | scenarist prompt --title 'Add signup'\n  scenarist prompt --base main --compare HEAD | llm")]
    Prompt {
        #[command(flatten)]
        source: DiffSource,

        #[command(flatten)]
        pr: PrArgs,
    },
    /// Generate test scenarios (and optionally test code) with an external command
    #[command(long_about = "Generate test scenarios with an external text generator.\n\n\
        The generator is any shell command that reads a prompt on stdin and writes\n\
        text to stdout. It comes from --command or [generator] command in the config.\n\n\
        Examples:\n  git diff | scenarist generate --command 'llm -m gpt-4o-mini'\n  scenarist generate --base main --compare HEAD --with-code --output TESTS.md")]
    Generate {
        #[command(flatten)]
        source: DiffSource,

        #[command(flatten)]
        pr: PrArgs,

        /// Generator command (overrides [generator] command)
        #[arg(long)]
        command: Option<String>,

        /// Also generate test code for the scenarios
        #[arg(long)]
        with_code: bool,

        /// Write the markdown document to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the test-code prompt for a scenarios file
    CodegenPrompt {
        /// File holding generated test scenarios
        #[arg(long)]
        scenarios: PathBuf,

        /// Target language (overrides [codegen] language)
        #[arg(long)]
        language: Option<String>,

        /// Test framework (overrides [codegen] framework)
        #[arg(long)]
        framework: Option<String>,
    },
    /// Create a default .scenarist.toml configuration file
    Init,
    /// Generate shell completions
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a ChangeReport,
    generated_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonGeneration<'a> {
    scenarios: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_code: Option<&'a str>,
    generated_at: DateTime<Utc>,
}

const EMPTY_DIFF_NOTICE: &str = "No file changes found in diff.";

const DEFAULT_CONFIG: &str = r#"# Scenarist Configuration

[prompt]
# Files described in detail in the scenario prompt
# max_files = 5
# Added lines quoted per file
# max_additions_per_file = 10

[report]
# Files listed individually in analyze/compare output
# max_files = 10

[codegen]
# language = "python"
# framework = "pytest"

[generator]
# Shell command that reads a prompt on stdin and prints the answer
# command = "llm -m gpt-4o-mini"
"#;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<ScenaristConfig> {
    let config = match explicit {
        Some(path) => ScenaristConfig::from_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                ScenaristConfig::from_file(default_path)?
            } else {
                ScenaristConfig::default()
            }
        }
    };
    Ok(config)
}

fn read_diff_input(file: &Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .into_diagnostic()
                .wrap_err("reading stdin")?;
            Ok(input)
        }
    }
}

fn load_changes(source: &DiffSource) -> Result<Vec<FileChange>> {
    let text = match (&source.base, &source.compare) {
        (Some(base), Some(compare)) => scenarist_git::diff_between(&source.repo, base, compare)?,
        _ => read_diff_input(&source.file)?,
    };
    Ok(parse(&text))
}

fn print_report(files: &[FileChange], config: &ScenaristConfig, format: OutputFormat) -> Result<()> {
    if files.is_empty() {
        println!("{EMPTY_DIFF_NOTICE}");
        return Ok(());
    }
    let report = ChangeReport::build(files, config.report.max_files);
    tracing::info!(
        files = report.stats.total_files,
        findings = report.change_types.len(),
        "analyzed diff"
    );

    match format {
        OutputFormat::Json => {
            let json = JsonReport {
                report: &report,
                generated_at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        OutputFormat::Markdown => print!("{}", report.to_markdown()),
        OutputFormat::Text => print!("{report}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(format = %cli.format, "loaded configuration");

    match cli.command {
        None => {
            Cli::command().print_help().into_diagnostic()?;
        }
        Some(Command::Analyze { ref file }) => {
            let input = read_diff_input(file)?;
            print_report(&parse(&input), &config, cli.format)?;
        }
        Some(Command::Compare {
            ref base,
            ref compare,
            ref repo,
        }) => {
            let text = scenarist_git::diff_between(repo, base, compare)?;
            print_report(&parse(&text), &config, cli.format)?;
        }
        Some(Command::Prompt { ref source, ref pr }) => {
            let files = load_changes(source)?;
            if files.is_empty() {
                println!("{EMPTY_DIFF_NOTICE}");
                return Ok(());
            }
            let change_types = scenarist_difflens::classify(&files);
            let prompt = build_scenario_prompt(
                &summarize(&files),
                &files,
                &change_types,
                pr.context().as_ref(),
                &config.prompt,
            );
            match cli.format {
                OutputFormat::Json => {
                    let json = serde_json::json!({ "prompt": prompt });
                    println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
                }
                OutputFormat::Markdown | OutputFormat::Text => print!("{prompt}"),
            }
        }
        Some(Command::Generate {
            ref source,
            ref pr,
            ref command,
            with_code,
            ref output,
        }) => {
            let Some(command) = command.clone().or_else(|| config.generator.command.clone())
            else {
                miette::bail!(miette::miette!(
                    help = "Pass --command or set `command` under [generator] in .scenarist.toml",
                    "No generator command configured"
                ));
            };

            let files = load_changes(source)?;
            if files.is_empty() {
                println!("{EMPTY_DIFF_NOTICE}");
                return Ok(());
            }

            let pipeline = ScenarioPipeline::new(
                CommandGenerator::new(command),
                config.prompt.clone(),
                config.codegen.clone(),
            );
            let scenarios = pipeline.scenarios(&files, pr.context().as_ref())?;
            let test_code = if with_code {
                Some(pipeline.test_code(&scenarios)?)
            } else {
                None
            };

            let document = render_document(&summarize(&files), &scenarios, test_code.as_deref());
            if let Some(path) = output {
                std::fs::write(path, &document)
                    .into_diagnostic()
                    .wrap_err(format!("writing {}", path.display()))?;
                println!("Wrote {}", path.display());
                return Ok(());
            }

            match cli.format {
                OutputFormat::Json => {
                    let json = JsonGeneration {
                        scenarios: &scenarios,
                        test_code: test_code.as_deref(),
                        generated_at: Utc::now(),
                    };
                    println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
                }
                OutputFormat::Markdown | OutputFormat::Text => print!("{document}"),
            }
        }
        Some(Command::CodegenPrompt {
            ref scenarios,
            ref language,
            ref framework,
        }) => {
            let text = std::fs::read_to_string(scenarios)
                .into_diagnostic()
                .wrap_err(format!("reading {}", scenarios.display()))?;
            let language = language.as_deref().unwrap_or(&config.codegen.language);
            let framework = framework.as_deref().unwrap_or(&config.codegen.framework);
            let prompt = build_test_code_prompt(text.trim(), language, framework);
            match cli.format {
                OutputFormat::Json => {
                    let json = serde_json::json!({ "prompt": prompt });
                    println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
                }
                OutputFormat::Markdown | OutputFormat::Text => print!("{prompt}"),
            }
        }
        Some(Command::Init) => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                miette::bail!("{DEFAULT_CONFIG_FILE} already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created {DEFAULT_CONFIG_FILE} with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "scenarist", &mut std::io::stdout());
        }
    }

    Ok(())
}
