//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

/// Snapshot neural-network module hierarchies as trees and export them to JSON
#[derive(Parser, Debug)]
#[command(name = "nntree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Local config file (default: ./.nntree.toml if present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Built-in reference models.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModelKind {
    /// ResNet-18, 1000 classes
    #[default]
    Resnet18,
    /// 784-128-64-10 perceptron
    Mlp,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the model tree as JSON
    Json {
        #[arg(short, long, value_enum, default_value_t)]
        model: ModelKind,
        /// Output file (default: configured output, else stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print node names level by level
    Text {
        #[arg(short, long, value_enum, default_value_t)]
        model: ModelKind,
    },

    /// Show the model hierarchy as a tree
    Tree {
        #[arg(short, long, value_enum, default_value_t)]
        model: ModelKind,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
