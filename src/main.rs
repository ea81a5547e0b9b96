//! Stagehand command line
//!
//! Runs the stage operations against a JSON document snapshot. Commands that
//! change the document write it back to the same file.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use stagehand::{
    Config, Document, FileManager, MemoryNotifier, NodeKind, Severity, StageError, StageTools,
    Template,
};

#[derive(Parser)]
#[command(name = "stagehand", version, about = "Scene hierarchy and visibility tools")]
struct Cli {
    /// Document snapshot to operate on (created if missing)
    document: PathBuf,

    /// Config file (defaults to <config dir>/stagehand/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical path of a model/SKU/release
    Resolve { model: String, sku: String, release: String },
    /// Create the canonical hierarchy of a model/SKU/release
    Ensure { model: String, sku: String, release: String },
    /// Attach an asset to a node
    Import { asset: String, target: String },
    /// Build the hierarchy of a SKU and attach its payload
    ImportSku { model: String, sku: String, release: String },
    /// Attach a studio template below /World/Setup
    Template {
        kind: TemplateKind,
        /// Brand for camera templates
        #[arg(long)]
        brand: Option<String>,
    },
    /// Show one scope and hide the other scopes
    Isolate {
        target: String,
        /// Scopes to keep visible (defaults to the configured keep list)
        #[arg(long = "keep", value_name = "NAME")]
        keep: Vec<String>,
    },
    /// List the scopes available for selection
    Scopes,
    /// Print the frames a capture of the given scopes would write
    Plan {
        output_dir: PathBuf,
        /// Scopes to capture (defaults to every selectable scope)
        #[arg(long = "sku", value_name = "NAME")]
        skus: Vec<String>,
    },
    /// Print the document hierarchy
    Tree,
}

#[derive(Clone, Copy, ValueEnum)]
enum TemplateKind {
    Camera,
    Lights,
    Limbo,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), StageError> {
    let config = Config::load(cli.config.as_deref())?;
    let notifier = Arc::new(MemoryNotifier::new());
    let tools = StageTools::with_notifier(config, notifier.clone());

    if let Command::Resolve { model, sku, release } = &cli.command {
        println!("{}", tools.resolve_path(model, sku, release)?);
        return Ok(());
    }

    let mut files = FileManager::new();
    let mut document = files.load_or_new(&cli.document)?;
    let before = document.clone();

    let result = execute(&tools, &mut document, cli.command);

    for notification in notifier.drain() {
        match notification.severity {
            Severity::Info => println!("{}", notification.message),
            Severity::Warning => eprintln!("warning: {}", notification.message),
        }
    }

    files.save_if_changed(&cli.document, &before, &document)?;

    result
}

fn execute(
    tools: &StageTools<Arc<MemoryNotifier>>,
    document: &mut Document,
    command: Command,
) -> Result<(), StageError> {
    match command {
        Command::Resolve { .. } => {}
        Command::Ensure { model, sku, release } => {
            let id = tools.ensure_hierarchy(document, &model, &sku, &release)?;
            if let Some(node) = document.node(id) {
                println!("{}", node.path);
            }
        }
        Command::Import { asset, target } => {
            tools.import_reference(document, &asset, &target)?;
        }
        Command::ImportSku { model, sku, release } => {
            tools.import_sku(document, &model, &sku, &release)?;
        }
        Command::Template { kind, brand } => {
            let template = match kind {
                TemplateKind::Camera => Template::Camera {
                    brand: brand.ok_or_else(|| {
                        StageError::InvalidArgument("--brand is required for cameras".to_string())
                    })?,
                },
                TemplateKind::Lights => Template::Lights,
                TemplateKind::Limbo => Template::Limbo,
            };
            tools.import_template(document, &template)?;
        }
        Command::Isolate { target, keep } => {
            let report = if keep.is_empty() {
                tools.isolate_model(document, &target)?
            } else {
                tools.isolate_scope(document, &target, &keep)?
            };
            println!(
                "{} visible, {} hidden",
                report.visible_count(),
                report.hidden_count()
            );
            for name in &report.hidden {
                println!("  hidden: {}", name);
            }
        }
        Command::Scopes => {
            for name in tools.selectable_scopes(document)? {
                println!("{}", name);
            }
        }
        Command::Plan { output_dir, skus } => {
            let skus = if skus.is_empty() {
                tools.selectable_scopes(document)?
            } else {
                skus
            };
            let queue = tools.render_queue(&skus, &output_dir)?;
            for plan in queue.plans() {
                println!("{} ({}x{})", plan.sku, plan.resolution.0, plan.resolution.1);
                for file in plan.expected_files() {
                    println!("  {}", file.display());
                }
            }
        }
        Command::Tree => print_tree(document),
    }
    Ok(())
}

fn print_tree(document: &Document) {
    for id in document.traverse() {
        let Some(node) = document.node(id) else {
            continue;
        };

        let indent = "  ".repeat(node.path.depth().saturating_sub(1));
        let mut line = format!("{}{} [{}]", indent, node.name, node.kind);
        if node.transform.as_ref().is_some_and(|t| t.is_animated()) {
            line.push_str(" (turntable)");
        }
        if node.is_hidden() {
            line.push_str(" (hidden)");
        }
        if document.default_node() == Some(id) {
            line.push_str(" (default)");
        }
        for reference in &node.references {
            line.push_str(&format!(" -> {}", reference.asset_path));
        }
        println!("{}", line);
    }
    println!(
        "{} groups, {} scopes",
        document.count_kind(NodeKind::Group),
        document.count_kind(NodeKind::Scope)
    );
}
