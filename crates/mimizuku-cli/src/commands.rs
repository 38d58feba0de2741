//! CLI command definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimizuku_core::{JsonModelLoader, ModelLoader};
use mimizuku_dl::{DlOntology, Renderer};
use mimizuku_engine::{CompilerConfig, Translation, Translator};
use mimizuku_ocl::{ConstraintNormalizer, DEFAULT_MAX_FIXPOINT_ITERATIONS, DEFAULT_MAX_RESOLUTION_DEPTH};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "mimizuku")]
#[command(about = "Compile entity models and their constraints into Description-Logic axioms")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check and compile an entity model
    Compile {
        /// Entity model as JSON
        model: PathBuf,

        /// Instance model to close over, as JSON
        #[arg(short, long)]
        extend: Option<PathBuf>,

        /// Compiler configuration as JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Render identifiers without the ontology IRI
        #[arg(long)]
        short: bool,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the well-formedness check only
    Check {
        /// Entity model as JSON
        model: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Normalize a constraint expression
    Normalize {
        /// Constraint text
        expression: String,

        /// Fixpoint iteration cap
        #[arg(long, default_value_t = DEFAULT_MAX_FIXPOINT_ITERATIONS)]
        max_iterations: usize,
    },

    /// Print the default compiler configuration
    ExplainConfig,
}

/// Output format options
#[derive(Clone, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

impl OutputFormat {
    fn json<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(match self {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(value)?,
            _ => serde_json::to_string(value)?,
        })
    }
}

/// Command execution result
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// JSON shape of a compiled ontology
#[derive(Serialize)]
struct CompileOutput<'a> {
    ontology: &'a str,
    axioms: Vec<String>,
    diagnostics: Vec<String>,
    constraints: &'a [mimizuku_engine::ConstraintReport],
}

/// Execute CLI commands
#[derive(Default)]
pub struct CommandExecutor {
    loader: JsonModelLoader,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a CLI command
    pub fn execute(&self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::Compile {
                model,
                extend,
                config,
                format,
                short,
                output,
            } => {
                let renderer = if short { Renderer::short() } else { Renderer::full() };
                self.execute_compile(&model, extend.as_deref(), config.as_deref(), format, renderer, output)
            }
            Commands::Check { model, format } => self.execute_check(&model, format),
            Commands::Normalize {
                expression,
                max_iterations,
            } => self.execute_normalize(&expression, max_iterations),
            Commands::ExplainConfig => self.execute_explain_config(),
        }
    }

    fn load_config(&self, path: Option<&Path>) -> Result<CompilerConfig> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read configuration {}", path.display()))?;
                CompilerConfig::from_json(&json).with_context(|| format!("invalid configuration {}", path.display()))
            }
            None => Ok(CompilerConfig::default()),
        }
    }

    fn execute_compile(
        &self,
        model_path: &Path,
        extend: Option<&Path>,
        config: Option<&Path>,
        format: OutputFormat,
        renderer: Renderer,
        output: Option<PathBuf>,
    ) -> Result<CommandResult> {
        let config = self.load_config(config)?;
        let model = self
            .loader
            .load_model_file(model_path)
            .with_context(|| format!("failed to load model {}", model_path.display()))?;

        let translator = Translator::new(config);
        let translation = translator
            .translate(&model)
            .with_context(|| format!("failed to compile {}", model_path.display()))?;

        let ontology = match extend {
            Some(path) => {
                let instances = self
                    .loader
                    .load_instances_file(path)
                    .with_context(|| format!("failed to load instances {}", path.display()))?;
                translator
                    .extend(&translation, &instances)
                    .with_context(|| format!("failed to extend with {}", path.display()))?
            }
            None => translation.ontology.clone(),
        };

        let rendered = match format {
            OutputFormat::Text => render_text(&translation, &ontology, renderer),
            OutputFormat::Json | OutputFormat::JsonPretty => format.json(&CompileOutput {
                ontology: ontology.iri.as_str(),
                axioms: ontology.iter().map(|axiom| renderer.axiom(axiom)).collect(),
                diagnostics: translation.diagnostics.iter().map(ToString::to_string).collect(),
                constraints: &translation.constraints,
            })?,
        };
        emit(&rendered, output.as_deref())?;

        let skipped = translation.skipped_constraints().count();
        info!(axioms = ontology.len(), skipped, "compile finished");
        Ok(CommandResult {
            success: true,
            message: format!("Compiled {} axioms", ontology.len()),
            data: Some(serde_json::json!({
                "axioms": ontology.len(),
                "diagnostics": translation.diagnostics.len(),
                "constraints": translation.constraints.len(),
                "skipped_constraints": skipped,
            })),
        })
    }

    fn execute_check(&self, model_path: &Path, format: OutputFormat) -> Result<CommandResult> {
        let mut model = self
            .loader
            .load_model_file(model_path)
            .with_context(|| format!("failed to load model {}", model_path.display()))?;
        let report = Translator::default()
            .check(&mut model)
            .with_context(|| format!("{} is not well-formed", model_path.display()))?;

        let rendered = match format {
            OutputFormat::Text => {
                let mut text = format!(
                    "{} is well-formed ({} warnings, {} notes)",
                    model_path.display(),
                    report.warning_count(),
                    report.info_count()
                );
                for message in report.messages() {
                    text.push_str(&format!("\n  - {}", message));
                }
                text
            }
            OutputFormat::Json | OutputFormat::JsonPretty => format.json(&report)?,
        };
        println!("{}", rendered);

        Ok(CommandResult {
            success: true,
            message: "Model is well-formed".to_string(),
            data: Some(serde_json::json!({ "diagnostics": report.messages() })),
        })
    }

    fn execute_normalize(&self, expression: &str, max_iterations: usize) -> Result<CommandResult> {
        let normalized = ConstraintNormalizer::new(max_iterations, DEFAULT_MAX_RESOLUTION_DEPTH)
            .normalize(expression)
            .with_context(|| format!("failed to normalize '{}'", expression))?;

        println!("{}", normalized.text);
        println!("rounds: {}", normalized.rounds);

        Ok(CommandResult {
            success: true,
            message: format!("Normalized in {} rounds", normalized.rounds),
            data: Some(serde_json::json!({
                "text": normalized.text,
                "rounds": normalized.rounds,
            })),
        })
    }

    fn execute_explain_config(&self) -> Result<CommandResult> {
        let config = serde_json::to_value(CompilerConfig::default())?;
        println!("{}", serde_json::to_string_pretty(&config)?);

        Ok(CommandResult {
            success: true,
            message: "Default configuration".to_string(),
            data: Some(config),
        })
    }
}

fn render_text(translation: &Translation, ontology: &DlOntology, renderer: Renderer) -> String {
    let mut lines = vec![format!("Ontology {} ({} axioms)", ontology.iri, ontology.len())];

    if !translation.diagnostics.is_empty() {
        lines.push(format!("Diagnostics ({}):", translation.diagnostics.len()));
        lines.extend(translation.diagnostics.iter().map(|d| format!("  - {}", d)));
    }
    if !translation.constraints.is_empty() {
        lines.push(format!("Constraints ({}):", translation.constraints.len()));
        lines.extend(translation.constraints.iter().map(|c| format!("  - {}", c)));
    }

    lines.push("Axioms:".to_string());
    lines.extend(ontology.iter().map(|axiom| format!("  {}", renderer.axiom(axiom))));
    lines.join("\n")
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            println!("{}", rendered);
            Ok(())
        }
    }
}
