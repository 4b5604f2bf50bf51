//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::ExportService;
use crate::cli::args::{Cli, Commands, ModelKind};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{local_config_path, Settings};
use crate::domain::{ModuleLike, TreeView};
use crate::zoo;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Json {
            model,
            output,
            compact,
        } => cmd_json(cli, *model, output.as_deref(), *compact),
        Commands::Text { model } => cmd_text(cli, *model),
        Commands::Tree { model } => cmd_tree(cli, *model),
        Commands::Config => cmd_config(cli),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    if let Some(path) = &cli.config {
        if !path.exists() {
            return Err(CliError::InvalidArgs(format!(
                "config file not found: {}",
                path.display()
            )));
        }
    }
    let local = local_config_path(cli.config.as_deref());
    debug!(?local, "loading settings");
    Ok(Settings::load(local.as_deref())?)
}

fn load_model(kind: ModelKind) -> Box<dyn ModuleLike> {
    match kind {
        ModelKind::Resnet18 => Box::new(zoo::resnet18()),
        ModelKind::Mlp => Box::new(zoo::mlp(&[784, 128, 64, 10])),
    }
}

#[instrument(skip(cli))]
fn cmd_json(cli: &Cli, model: ModelKind, output: Option<&Path>, compact: bool) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let mut service = ExportService::new(&settings);
    if compact {
        service.set_pretty(false);
    }

    let export = service.export(&*load_model(model))?;
    let rendered = service.render_json(&export.json)?;

    match output.map(Path::to_path_buf).or(settings.output) {
        Some(path) => {
            std::fs::write(&path, rendered + "\n")
                .map_err(|e| CliError::io(format!("write {}", path.display()), e))?;
            output::success(&format!(
                "{} nodes written to {}",
                export.tree.node_count(),
                path.display()
            ));
        }
        None => output::info(&rendered),
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_text(cli: &Cli, model: ModelKind) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let tree = ExportService::new(&settings).build(&*load_model(model))?;
    output::raw(&tree.to_string());
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_tree(cli: &Cli, model: ModelKind) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let tree = ExportService::new(&settings).build(&*load_model(model))?;
    output::raw(&tree.to_tree_string().to_string());
    Ok(())
}

fn cmd_config(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    output::raw(&settings.to_toml()?);
    Ok(())
}
