//! Command dispatch: one function per subcommand.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::DiagramService;
use crate::application::{Dataset, DiagramSpec};
use crate::cli::args::{Cli, Commands, ConfigCommands, DatasetArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

/// Execute the parsed command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see 'treeplot --help'".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "treeplot", &mut io::stdout());
        return Ok(());
    }

    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Render { args, out_dir } => {
            cmd_render(&container, &project_dir, args, out_dir.as_deref())
        }
        Commands::Tree { args } => cmd_tree(&container, args),
        Commands::Levels { args } => cmd_levels(&container, args),
        Commands::Layout { args } => cmd_layout(&container, args),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cmd_config_show(&container),
            ConfigCommands::Path => cmd_config_path(&project_dir),
            ConfigCommands::Init { global } => cmd_config_init(&container, &project_dir, *global),
        },
        Commands::Completion { .. } => Ok(()),
    }
}

fn resolve_project_dir(project_dir: Option<&Path>) -> CliResult<PathBuf> {
    match project_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| CliError::from(InfraError::io("determine current directory", e))),
    }
}

fn diagram_service(container: &ServiceContainer, args: &DatasetArgs) -> DiagramService {
    let service = container.diagram_service();
    if args.keep_blank {
        service.with_prune_blank(false)
    } else {
        service
    }
}

/// Load the dataset and pick the requested diagrams.
fn with_selected<F>(service: &DiagramService, args: &DatasetArgs, mut f: F) -> CliResult<()>
where
    F: FnMut(&DiagramSpec) -> CliResult<()>,
{
    let dataset: Dataset = service.load_dataset(&args.dataset)?;
    let selected = dataset.select(args.only.as_deref())?;
    if selected.is_empty() {
        output::warning(&format!("{}: no diagrams", args.dataset.display()));
    }
    for spec in selected {
        f(spec)?;
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_render(
    container: &ServiceContainer,
    project_dir: &Path,
    args: &DatasetArgs,
    out_dir: Option<&Path>,
) -> CliResult<()> {
    let service = diagram_service(container, args);
    let out_dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => project_dir.join(&container.settings.output_dir),
    };
    debug!("out_dir: {}", out_dir.display());

    with_selected(&service, args, |spec| {
        let destination = out_dir.join(spec.output_file_name());
        let mut renderer = container.svg_renderer();
        let summary = service.render(spec, &mut renderer, &destination)?;
        output::success(&format!(
            "{} -> {} ({} nodes, {} levels)",
            summary.description,
            summary.destination.display(),
            summary.nodes,
            summary.levels
        ));
        Ok(())
    })
}

fn cmd_tree(container: &ServiceContainer, args: &DatasetArgs) -> CliResult<()> {
    let service = diagram_service(container, args);
    with_selected(&service, args, |spec| {
        let tree = service.prepare(spec)?;
        output::header(&spec.description);
        output::info(&tree.to_tree_string());
        Ok(())
    })
}

fn cmd_levels(container: &ServiceContainer, args: &DatasetArgs) -> CliResult<()> {
    let service = diagram_service(container, args);
    with_selected(&service, args, |spec| {
        let tree = service.prepare(spec)?;
        output::header(&spec.description);
        for (depth, ids) in tree.level_ids().iter().enumerate() {
            output::detail(&format!("{}: {}", depth, ids.iter().join(" ")));
        }
        Ok(())
    })
}

fn cmd_layout(container: &ServiceContainer, args: &DatasetArgs) -> CliResult<()> {
    let service = diagram_service(container, args);
    with_selected(&service, args, |spec| {
        let tree = service.prepare(spec)?;
        output::header(&spec.description);
        for (_, node) in tree.iter() {
            if let Some(p) = node.position {
                output::info(&format!("{} {} {}", node.data.id, p.row, p.column));
            }
        }
        Ok(())
    })
}

fn cmd_config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

fn cmd_config_path(project_dir: &Path) -> CliResult<()> {
    match global_config_path() {
        Some(path) => output::action("global", &path.display()),
        None => output::warning("no config directory for this platform"),
    }
    output::action("local", &local_config_path(project_dir).display());
    Ok(())
}

fn cmd_config_init(container: &ServiceContainer, project_dir: &Path, global: bool) -> CliResult<()> {
    let path = if global {
        global_config_path()
            .ok_or_else(|| CliError::Usage("no config directory for this platform".to_string()))?
    } else {
        local_config_path(project_dir)
    };
    if container.fs.exists(&path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    container
        .fs
        .ensure_parent(&path)
        .map_err(|e| InfraError::io(format!("create directory for {}", path.display()), e))?;
    container
        .fs
        .write(&path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::success(&format!("created {}", path.display()));
    Ok(())
}
