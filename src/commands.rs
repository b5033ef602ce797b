//! Command execution for the `synoptiq` binary.

use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use synoptiq_core::{AttributeValue, Synoptique};
use synoptiq_data::{DataPaths, FloorPlanData, LocalFileStore, PersistTarget};
use synoptiq_settings::Config;
use synoptiq_viewer::{FloorPlanViewer, PixmapHost, ViewerOptions};

use crate::cli::{collect_filters, Cli, Commands, PlanArgs, TargetArgs};

/// Loads the configuration named on the command line, or the default one.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match Config::default_path() {
            Ok(path) => Config::load_or_default(&path)
                .with_context(|| format!("loading config {}", path.display()))?,
            Err(e) => {
                tracing::debug!("{}, using default config", e);
                Config::default()
            }
        },
    };
    Ok(config)
}

/// Store root: the command line wins over the config file.
pub fn store_root(cli_root: Option<&Path>, config: &Config) -> PathBuf {
    cli_root
        .map(Path::to_path_buf)
        .or_else(|| config.data.store_root.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resource paths to load for one invocation.
///
/// Without `--attributes`, a target's saved collection is loaded when it
/// already exists under the store root.
pub fn data_paths(
    plan: &PlanArgs,
    target: Option<&TargetArgs>,
    config: &Config,
    root: &Path,
) -> DataPaths {
    let attributes = plan.attributes.clone().or_else(|| {
        let target = target?;
        let saved = format!(
            "{}/{}/{}.json",
            target.exercise, config.data.attributes_folder, target.model
        );
        root.join(&saved).exists().then_some(saved)
    });

    DataPaths {
        attributes,
        features: Some(plan.features.clone()),
        metadata: Some(plan.metadata.clone()),
        ..DataPaths::default()
    }
}

async fn open(cli: &Cli, config: &Config) -> anyhow::Result<Arc<FloorPlanData>> {
    let root = store_root(cli.root.as_deref(), config);
    let paths = data_paths(&cli.plan, cli.command.target(), config, &root);
    tracing::debug!("Loading {:?} from {}", paths, root.display());

    let store = Arc::new(LocalFileStore::new(root));
    let data = Arc::new(FloorPlanData::from_settings(store, &config.data));
    data.load_data(&paths, &cli.plan.token)
        .await
        .context("loading floor plan")?;
    Ok(data)
}

fn persist_target(target: &TargetArgs, token: &str) -> PersistTarget {
    PersistTarget::new(&target.exercise, &target.model, token)
}

fn require_synoptique(data: &FloorPlanData, synoptique_id: &str) -> anyhow::Result<Synoptique> {
    data.get_synoptique(synoptique_id)
        .with_context(|| format!("unknown synoptique '{}'", synoptique_id))
}

fn join(values: &[AttributeValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_synoptique(synoptique: &Synoptique) {
    println!(
        "{}  {}  ({} assigned)",
        synoptique.id,
        synoptique.name,
        synoptique.mapping.len()
    );
    for category in &synoptique.categories {
        let count = synoptique
            .mapping
            .values()
            .filter(|id| **id == category.id)
            .count();
        println!(
            "    {}  {}  {}  ({})",
            category.id, category.name, category.color, count
        );
    }
}

/// Runs one parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let data = open(&cli, &config).await?;
    let token = cli.plan.token.as_str();

    match &cli.command {
        Commands::Floors => {
            for floor in data.get_unique_floor_ids() {
                println!("{}", floor);
            }
        }

        Commands::Presets { filters } => {
            let presets = if filters.is_empty() {
                data.get_metadata_presets()
            } else {
                data.get_available_presets(&collect_filters(filters))
            };
            for (key, values) in presets {
                println!("{}: {}", key, join(&values));
            }
        }

        Commands::Render {
            out,
            floor,
            synoptique,
            filters,
            width,
            height,
        } => {
            if *width == 0 || *height == 0 {
                bail!("render size must be non-zero, got {}x{}", width, height);
            }
            if !data.is_loaded() {
                bail!("no features or metadata to render");
            }
            data.set_active_filters(collect_filters(filters));

            let mut options = ViewerOptions::new().with_settings(config.viewer.clone());
            if let Some(floor) = floor {
                options = options.with_floor(crate::cli::parse_value(floor));
            }
            if let Some(synoptique) = synoptique {
                require_synoptique(&data, synoptique)?;
                options = options.with_synoptique(synoptique.clone());
            }

            let host = Arc::new(PixmapHost::new(*width, *height));
            let mut viewer = FloorPlanViewer::new(data.clone(), host.clone(), options);
            viewer.draw();
            host.save_png(out)
                .with_context(|| format!("writing {}", out.display()))?;
            viewer.dispose();
            tracing::info!("Rendered {}x{} to {}", width, height, out.display());
        }

        Commands::Synoptiques { .. } => {
            for synoptique in data.get_synoptiques() {
                print_synoptique(&synoptique);
            }
        }

        Commands::AddSynoptique { target, name } => {
            let target = persist_target(target, token);
            let id = data
                .add_synoptique(name, &target)
                .await
                .context("saving synoptiques")?
                .context("synoptique name must not be empty")?;
            println!("{}", id);
        }

        Commands::AddCategory {
            target,
            synoptique,
            name,
            color,
        } => {
            require_synoptique(&data, synoptique)?;
            let target = persist_target(target, token);
            let category = data
                .add_category_to_synoptique(synoptique, name, color, &target)
                .await
                .with_context(|| {
                    format!(
                        "could not add category '{}' to synoptique '{}'",
                        name, synoptique
                    )
                })?;
            println!("{}", category.id);
        }

        Commands::RemoveCategory {
            target,
            synoptique,
            category,
        } => {
            let target = persist_target(target, token);
            let removed = data
                .remove_category_from_synoptique(synoptique, category, &target)
                .await
                .context("saving synoptiques")?;
            if !removed {
                bail!(
                    "no category '{}' in synoptique '{}'",
                    category,
                    synoptique
                );
            }
        }

        Commands::Assign {
            target,
            synoptique,
            feature,
            category,
        } => {
            require_synoptique(&data, synoptique)?;
            let known = data
                .features()
                .is_some_and(|fc| fc.features.iter().any(|f| f.id == *feature));
            if !known {
                tracing::warn!("Feature {} is not part of the loaded plan", feature);
            }

            if data.assign_category_to_feature(synoptique, category.as_deref(), feature) {
                data.save_attributes(&persist_target(target, token))
                    .await
                    .context("saving synoptiques")?;
                println!("updated");
            } else if let Some(category) = category {
                let already = data
                    .get_synoptique(synoptique)
                    .is_some_and(|s| s.mapping.get(feature) == Some(category));
                if !already {
                    bail!("no category '{}' in synoptique '{}'", category, synoptique);
                }
                println!("unchanged");
            } else {
                println!("unchanged");
            }
        }
    }

    Ok(())
}
