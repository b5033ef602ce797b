//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use synoptiq_core::{ActiveFilters, AttributeValue};

#[derive(Parser, Debug)]
#[command(name = "synoptiq", about = "Floor-plan synoptique annotation", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory of the local file store (defaults to the configured root, then ".")
    #[arg(long, global = true, env = "SYNOPTIQ_ROOT")]
    pub root: Option<PathBuf>,

    /// Path to config file (.toml or .json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub plan: PlanArgs,
}

/// Where the floor plan is read from, relative to the store root.
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Feature geometry resource
    #[arg(long, global = true, default_value = "features.json")]
    pub features: String,

    /// Feature metadata resource
    #[arg(long, global = true, default_value = "metadata.json")]
    pub metadata: String,

    /// Synoptique collection resource (defaults to the saved collection of --exercise/--model)
    #[arg(long, global = true)]
    pub attributes: Option<String>,

    /// Access token passed to the store
    #[arg(long, global = true, env = "SYNOPTIQ_TOKEN", default_value = "local")]
    pub token: String,
}

/// Exercise and model the synoptique collection is saved under.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Exercise id
    #[arg(long)]
    pub exercise: String,

    /// Model id, used as the saved file name
    #[arg(long)]
    pub model: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the distinct floor ids of the plan
    Floors,

    /// List filter facets and the values still reachable under --filter
    Presets {
        /// Active filter as key=value (repeatable)
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, AttributeValue)>,
    },

    /// Render one floor to a PNG file
    Render {
        /// Output PNG path
        #[arg(long, short)]
        out: PathBuf,

        /// Floor id to show (all floors when omitted)
        ///
        /// Read as integer, then boolean, then float, then text, and compared
        /// by exact equality: `1` never matches a `floor_id` stored as "1".
        #[arg(long)]
        floor: Option<String>,

        /// Synoptique whose categories color the features
        #[arg(long)]
        synoptique: Option<String>,

        /// Active filter as key=value (repeatable)
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, AttributeValue)>,

        #[arg(long, default_value = "1024")]
        width: u32,

        #[arg(long, default_value = "768")]
        height: u32,
    },

    /// List the synoptiques and their categories
    Synoptiques {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Create a synoptique and save the collection
    AddSynoptique {
        #[command(flatten)]
        target: TargetArgs,

        /// Display name
        name: String,
    },

    /// Add a category to a synoptique and save the collection
    AddCategory {
        #[command(flatten)]
        target: TargetArgs,

        /// Synoptique id
        #[arg(long)]
        synoptique: String,

        /// Category name, unique within the synoptique
        name: String,

        /// CSS color
        color: String,
    },

    /// Remove a category and every assignment to it, then save
    RemoveCategory {
        #[command(flatten)]
        target: TargetArgs,

        /// Synoptique id
        #[arg(long)]
        synoptique: String,

        /// Category id
        category: String,
    },

    /// Assign a feature to a category (or clear it) and save the collection
    Assign {
        #[command(flatten)]
        target: TargetArgs,

        /// Synoptique id
        #[arg(long)]
        synoptique: String,

        /// Feature id
        feature: String,

        /// Category id; omit to clear the assignment
        #[arg(long)]
        category: Option<String>,
    },
}

impl Commands {
    /// Persist target of commands that save the collection.
    pub fn target(&self) -> Option<&TargetArgs> {
        match self {
            Commands::Synoptiques { target }
            | Commands::AddSynoptique { target, .. }
            | Commands::AddCategory { target, .. }
            | Commands::RemoveCategory { target, .. }
            | Commands::Assign { target, .. } => Some(target),
            Commands::Floors | Commands::Presets { .. } | Commands::Render { .. } => None,
        }
    }
}

/// Reads a command-line token as the most specific attribute value.
pub fn parse_value(raw: &str) -> AttributeValue {
    if let Ok(i) = raw.parse::<i64>() {
        return AttributeValue::Integer(i);
    }
    if let Ok(b) = raw.parse::<bool>() {
        return AttributeValue::Bool(b);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => AttributeValue::Float(f),
        _ => AttributeValue::Text(raw.to_string()),
    }
}

fn parse_filter(raw: &str) -> Result<(String, AttributeValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("filter key must not be empty".to_string());
    }
    Ok((key.to_string(), parse_value(value.trim())))
}

/// Groups repeated `key=value` pairs into a filter set.
pub fn collect_filters(pairs: &[(String, AttributeValue)]) -> ActiveFilters {
    let mut filters = ActiveFilters::new();
    for (key, value) in pairs {
        let mut values = filters.get(key).map(<[_]>::to_vec).unwrap_or_default();
        if !values.contains(value) {
            values.push(value.clone());
        }
        filters.set(key.clone(), values);
    }
    filters
}
