//! Command-line entry point for the Giotto asset pipeline.

use clap::{Parser, Subcommand};
use giotto::{
    ExecutionContext, ExecutionEngine, FileSystemStorage, GiottoConfig, GiottoResult,
    MemoryStorage, ScriptError, ScriptErrorKind, ScriptParser, SimulatedGenerator, ValidationError,
};
use giotto_storage::AssetStorage;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "giotto", version, about = "Action script compiler and asset pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Emit JSON-formatted logs
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a script and print its execution plan
    Compile {
        /// Path to the action script (JSON)
        script: PathBuf,
    },
    /// Predict the cost of executing a script
    Estimate {
        /// Path to the action script (JSON)
        script: PathBuf,
    },
    /// Execute a script against the simulated generation backend
    Run {
        /// Path to the action script (JSON)
        script: PathBuf,
        /// Store assets under this directory instead of in memory
        #[arg(long)]
        assets_dir: Option<PathBuf>,
    },
}

fn load_script(path: &PathBuf) -> GiottoResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        ScriptError::new(ScriptErrorKind::FileRead(format!(
            "{}: {}",
            path.display(),
            e
        )))
        .into()
    })
}

fn report_diagnostics(errors: &[ValidationError]) {
    eprintln!("script failed validation with {} error(s):", errors.len());
    for error in errors {
        eprintln!("  {}", error);
    }
}

async fn run(cli: Cli) -> GiottoResult<i32> {
    let parser = ScriptParser::new();

    match cli.command {
        Command::Compile { script } => {
            let source = load_script(&script)?;
            match parser.parse(&source) {
                Ok(graph) => {
                    println!(
                        "{} nodes ({} asset, {} game)",
                        graph.len(),
                        graph.asset_actions().len(),
                        graph.game_actions().len()
                    );
                    println!("execution order: {}", graph.execution_order().join(" -> "));
                    Ok(0)
                }
                Err(errors) => {
                    report_diagnostics(&errors);
                    Ok(2)
                }
            }
        }
        Command::Estimate { script } => {
            let source = load_script(&script)?;
            match parser.parse(&source) {
                Ok(graph) => {
                    let estimate = ExecutionEngine::standard().estimate_batch(&graph);
                    println!(
                        "estimated cost: {:.4} - {:.4} {}",
                        estimate.min, estimate.max, estimate.currency
                    );
                    Ok(0)
                }
                Err(errors) => {
                    report_diagnostics(&errors);
                    Ok(2)
                }
            }
        }
        Command::Run { script, assets_dir } => {
            let source = load_script(&script)?;
            let graph = match parser.parse(&source) {
                Ok(graph) => graph,
                Err(errors) => {
                    report_diagnostics(&errors);
                    return Ok(2);
                }
            };

            let storage: Arc<dyn AssetStorage> = match assets_dir {
                Some(dir) => Arc::new(FileSystemStorage::new(dir)?),
                None => Arc::new(MemoryStorage::new()),
            };
            let config = GiottoConfig::load()?;
            let ctx = ExecutionContext::from_config(
                &config,
                storage,
                Arc::new(SimulatedGenerator::new()),
            )?;

            let batch = ExecutionEngine::standard().execute_batch(&graph, &ctx).await;
            let rendered = serde_json::to_string_pretty(&batch)
                .map_err(|e| giotto::JsonError::new(e.to_string()))?;
            println!("{}", rendered);
            Ok(if batch.success { 0 } else { 1 })
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let observability =
        giotto::ObservabilityConfig::default().with_json_logs(cli.json_logs);
    if let Err(e) = giotto::init_observability_with_config(observability) {
        eprintln!("failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
