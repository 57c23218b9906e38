//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Binary search-tree diagrams: build from adjacency lists, prune blank nodes, lay out and render
#[derive(Parser, Debug)]
#[command(name = "treeplot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .treeplot.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Dataset selection shared by all diagram commands.
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Dataset file (TOML, one [[diagram]] table per tree)
    #[arg(value_hint = ValueHint::FilePath)]
    pub dataset: PathBuf,

    /// Only process the diagram with this description
    #[arg(long)]
    pub only: Option<String>,

    /// Keep blank-label nodes
    #[arg(long)]
    pub keep_blank: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render diagrams to SVG
    Render {
        #[command(flatten)]
        args: DatasetArgs,

        /// Output directory (default: settings output_dir)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        out_dir: Option<PathBuf>,
    },

    /// Show trees as hierarchy
    Tree {
        #[command(flatten)]
        args: DatasetArgs,
    },

    /// Show node ids per depth
    Levels {
        #[command(flatten)]
        args: DatasetArgs,
    },

    /// Show computed positions (id row column, pre-order)
    Layout {
        #[command(flatten)]
        args: DatasetArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
