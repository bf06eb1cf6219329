use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use feature_summary::{summary_file_name, DatasetKind, DatasetLoader, FeatureSummary};

/// Count lifted and unlifted points per genome feature type and save a
/// combined summary as `<lifted prefix>_summary.csv`.
#[derive(Parser, Debug)]
#[command(name = "summarize-features")]
#[command(author, version, about)]
struct Cli {
    /// Lifted point table (tab-delimited, `qkey`/`qftype` columns)
    lifted: PathBuf,

    /// Unlifted point table (tab-delimited, `ukey`/`uftype` columns)
    unlifted: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let lifted = DatasetLoader::new()
        .expect(DatasetKind::Lifted)
        .load_from_path(&cli.lifted)
        .with_context(|| format!("reading lifted points from {}", cli.lifted.display()))?;

    let unlifted = DatasetLoader::new()
        .expect(DatasetKind::Unlifted)
        .load_from_path(&cli.unlifted)
        .with_context(|| format!("reading unlifted points from {}", cli.unlifted.display()))?;

    let summary = FeatureSummary::from_datasets(&lifted, &unlifted);

    println!();
    println!("{summary}");

    let out = PathBuf::from(summary_file_name(&cli.lifted));
    summary
        .save(&out)
        .with_context(|| format!("writing summary to {}", out.display()))?;
    info!("{} feature rows written", summary.rows.len());

    println!("The result was saved as {}", out.display());

    Ok(())
}
