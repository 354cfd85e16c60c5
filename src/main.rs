mod config;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gitalk_graph::core::format::to_str;
use gitalk_graph::{CommitsLines, CommitsTree, GitWalker, GraphElement, GraphModel, Hash, NodeId};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::RenderConfig;

#[derive(Parser)]
#[command(name = "gitalk")]
#[command(about = "Lay out and draw git commit graphs", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Render config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the active lines of every row
    Lines {
        #[command(flatten)]
        input: LogInput,
    },
    /// Draw the commit graph
    Graph {
        #[command(flatten)]
        input: LogInput,
        /// Collapse the linear run around this commit (repeatable)
        #[arg(long, value_name = "HASH")]
        collapse: Vec<String>,
    },
    /// Print the graph in its node/edge string form
    Dump {
        #[command(flatten)]
        input: LogInput,
    },
    /// Write repository history as log text
    Export {
        /// Path to the repository
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Number of commits to read
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Where the commit log comes from: a log file or a repository
#[derive(Args)]
struct LogInput {
    /// Log file with one `hash|-parents|-author|-timestamp|-message` line per commit
    #[arg(conflicts_with = "repo")]
    file: Option<PathBuf>,
    /// Read history from a repository instead
    #[arg(long)]
    repo: Option<PathBuf>,
    /// Number of commits to read from the repository
    #[arg(short, long, requires = "repo")]
    limit: Option<usize>,
    /// The file only has `hash|-parents` lines
    #[arg(long, requires = "file")]
    parents_only: bool,
}

impl LogInput {
    fn read(&self) -> Result<String> {
        match (&self.file, &self.repo) {
            (Some(file), _) => std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read log file {}", file.display())),
            (None, Some(repo)) => {
                let path = repo.to_str().context("Repository path is not valid UTF-8")?;
                GitWalker::new(Some(path))?.log_text(self.limit)
            }
            (None, None) => bail!("Either a log file or --repo is required"),
        }
    }

    fn model(&self) -> Result<GraphModel> {
        let text = self.read()?;
        let model = if self.parents_only {
            GraphModel::from_parents_log(&text)?
        } else {
            GraphModel::from_log(&text)?
        };
        debug!(rows = model.graph().row_count(), "graph built");
        Ok(model)
    }
}

/// Full hash or unique prefix of a commit in the graph
fn resolve_commit(model: &GraphModel, hash: &str) -> Result<NodeId> {
    if let Some(node) = model.commit_node(&Hash::new(hash)) {
        return Ok(node);
    }
    let mut matches = model
        .graph()
        .nodes()
        .filter(|(_, node)| node.is_commit() && node.hash().as_str().starts_with(hash))
        .map(|(id, _)| id);
    match (matches.next(), matches.next()) {
        (Some(node), None) => Ok(node),
        (Some(_), Some(_)) => bail!("Commit prefix {} is ambiguous", hash),
        (None, _) => bail!("Unknown commit {}", hash),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Lines { input } => {
            if input.parents_only {
                bail!("lines needs full log records");
            }
            let tree = CommitsTree::parse(&input.read()?)?;
            let lines = CommitsLines::new(&tree);
            info!(rows = lines.len(), width = lines.width(), "lines computed");

            for (row, line) in lines.iter().enumerate() {
                let hashes: Vec<&str> = line.iter().map(|&i| tree.node(i).hash().as_str()).collect();
                println!("{}: {}", row, hashes.join(" "));
            }
        }
        Commands::Graph { input, collapse } => {
            let config = RenderConfig::resolve(cli.config)?;
            let mut model = input.model()?;

            for hash in collapse {
                let node = resolve_commit(&model, &hash)?;
                if model.collapse(GraphElement::Node(node))?.is_none() {
                    info!(commit = %hash, "nothing to collapse");
                }
            }

            print!("{}", config.renderer().render(&model));
        }
        Commands::Dump { input } => {
            let model = input.model()?;
            println!("{}", to_str(model.graph()));
        }
        Commands::Export { repo, limit } => {
            let path = repo.to_str().context("Repository path is not valid UTF-8")?;
            print!("{}", GitWalker::new(Some(path))?.log_text(limit)?);
        }
    }

    Ok(())
}
