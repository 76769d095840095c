//! wikidex - builds a clustered index for a markdown wiki
//!
//! Two batch stages sharing the feature snapshot:
//! - vectorize: markdown pages to `featurized_text.tsv`
//! - index: snapshot to a grouped markdown index

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};
use wikidex::{
    cluster::LinkageMethod,
    config::AppConfig,
    log_error, log_info, log_warn, logging,
    pipeline::{index_from_features, vectorize_wiki},
};

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Parse a wiki folder and write the feature snapshot
    Vectorize {
        /// Folder with the wiki's .md files
        wiki: PathBuf,
    },
    /// Cluster the feature snapshot and print the index
    Index {
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Vectorize then index in one run
    Build {
        /// Folder with the wiki's .md files
        wiki: PathBuf,
        #[command(flatten)]
        index: IndexArgs,
    },
}

#[derive(clap::Args, Debug)]
struct IndexArgs {
    /// Cluster level to render (index into the thresholds)
    #[arg(long)]
    level: Option<usize>,

    /// Linkage method: ward, single, complete, average, weighted
    #[arg(long)]
    linkage: Option<LinkageMethod>,

    /// Write the index here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the merge table to stderr
    #[arg(long)]
    dendrogram: bool,
}

#[derive(Parser, Debug)]
#[command(name = "wikidex")]
#[command(version)]
#[command(about = "Build a clustered index for a markdown wiki", long_about = None)]
struct Args {
    /// Configuration file path (overrides defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Feature snapshot path
    #[arg(long)]
    features: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Append logs to the default log file
    #[arg(long)]
    log: bool,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_handle = init_logging(args.verbose);
    let mut config = AppConfig::load(args.config.as_deref())?;
    if config.debug && !args.verbose {
        if let Some(handle) = &log_handle {
            if let Err(e) = handle.reload(EnvFilter::new(log_filter(true))) {
                tracing::warn!("Could not raise log level: {}", e);
            }
        }
    }

    let log_path = args
        .log_file
        .clone()
        .or_else(|| args.log.then(logging::default_log_path));
    if let Some(path) = log_path {
        logging::init_logger(&path).with_context(|| format!("opening log file {:?}", path))?;
    }

    if let Some(features) = args.features {
        config.features_path = features;
    }

    let result = match args.command {
        Command::Vectorize { wiki } => run_vectorize(&config, &wiki),
        Command::Index { index } => run_index(&mut config, index),
        Command::Build { wiki, index } => {
            run_vectorize(&config, &wiki).and_then(|_| run_index(&mut config, index))
        }
    };

    if let Err(ref e) = result {
        log_error!("{:#}", e);
    }
    result
}

fn run_vectorize(config: &AppConfig, wiki: &Path) -> anyhow::Result<()> {
    log_info!("Vectorizing {:?}", wiki);
    let report = vectorize_wiki(wiki, &config.features_path)
        .with_context(|| format!("vectorizing wiki at {:?}", wiki))?;

    for path in &report.skipped {
        log_warn!("Skipped unreadable document {:?}", path);
    }
    tracing::info!(
        "Vectorized {} documents ({} skipped) into {} rows of width {}",
        report.documents,
        report.skipped.len(),
        report.rows,
        report.width
    );
    log_info!(
        "Wrote {} rows to {:?}",
        report.rows,
        config.features_path
    );
    Ok(())
}

fn run_index(config: &mut AppConfig, args: IndexArgs) -> anyhow::Result<()> {
    if let Some(level) = args.level {
        config.index_level = level;
    }
    if let Some(method) = args.linkage {
        config.linkage = method;
    }
    config.validate()?;

    let report = index_from_features(
        &config.features_path,
        &config.cluster_options(),
        config.index_level,
        &config.render_options(),
    )
    .with_context(|| format!("indexing {:?}", config.features_path))?;

    if args.dendrogram {
        eprint!("{}", report.linkage.render());
    }

    match args.output {
        Some(path) => {
            std::fs::write(&path, &report.markdown)
                .with_context(|| format!("writing index to {:?}", path))?;
            tracing::info!("Index written to {:?}", path);
        }
        None => print!("{}", report.markdown),
    }

    log_info!(
        "Rendered {} groups at level {} (threshold {})",
        report.groups.len(),
        config.index_level,
        report.levels.thresholds[config.index_level]
    );
    Ok(())
}

fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "wikidex=debug,info"
    } else {
        "wikidex=info,warn"
    }
}

/// Initialize logging on stderr so stdout stays clean for the index.
///
/// Returns a handle to adjust the level once the config is read, unless
/// `RUST_LOG` fixed it.
fn init_logging(verbose: bool) -> Option<reload::Handle<EnvFilter, Registry>> {
    if let Ok(env_filter) = EnvFilter::try_from_default_env() {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
        return None;
    }

    let (filter, handle) = reload::Layer::new(EnvFilter::new(log_filter(verbose)));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
    Some(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_levels() {
        assert_eq!(log_filter(true), "wikidex=debug,info");
        assert_eq!(log_filter(false), "wikidex=info,warn");
    }

    #[test]
    fn test_parse_build_command() {
        let args = Args::try_parse_from([
            "wikidex", "-v", "--features", "f.tsv", "build", "wiki", "--level", "2",
            "--linkage", "single",
        ])
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.features, Some(PathBuf::from("f.tsv")));
        match args.command {
            Command::Build { wiki, index } => {
                assert_eq!(wiki, PathBuf::from("wiki"));
                assert_eq!(index.level, Some(2));
                assert_eq!(index.linkage, Some(LinkageMethod::Single));
            }
            other => panic!("expected build, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_linkage_is_rejected() {
        assert!(Args::try_parse_from(["wikidex", "index", "--linkage", "centroid"]).is_err());
    }
}
