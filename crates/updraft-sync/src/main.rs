//! Updraft - per-device release catalog sync
//!
//! Polls the upstream release API for every repository named in the
//! device manifest and writes one JSON catalog per (device, mode). Each
//! run fully replaces the catalogs it touches; a failed fetch degrades
//! that catalog to empty rather than aborting the run.

mod assemble;
mod fetch;
mod manifest;
mod writer;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use updraft_core::Mode;

#[derive(Parser, Debug)]
#[command(name = "updraft")]
#[command(about = "Per-device firmware and kernel release catalog sync")]
#[command(version)]
struct Args {
    /// Path to the device manifest
    #[arg(short, long, default_value = "sync.json")]
    manifest: PathBuf,

    /// Directory the per-device catalogs are written under
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Root of the release API
    #[arg(long, default_value = fetch::DEFAULT_API_BASE)]
    api_base: String,

    /// Sync only this mode (kernel or system)
    #[arg(long)]
    mode: Option<Mode>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Updraft v{}", env!("CARGO_PKG_VERSION"));

    let manifest = manifest::load_manifest(&args.manifest)?;
    let client = fetch::ReleaseClient::new(&args.api_base)?;

    let mut failures = 0usize;
    for (device, repos) in &manifest {
        let units = [
            (Mode::Kernel, repos.kernel_repo.as_str()),
            (Mode::System, repos.system_repo.as_str()),
        ];
        for (mode, slug) in units {
            if slug.is_empty() {
                continue;
            }
            if args.mode.is_some_and(|only| only != mode) {
                continue;
            }
            let Some((owner, repo)) = manifest::split_repo_slug(slug) else {
                warn!(device = %device, slug = %slug, "Malformed repository slug, skipping");
                continue;
            };

            let catalog = assemble::assemble_catalog(&client, owner, repo, mode, device).await;
            match writer::write_catalog(&args.output_dir, device, mode, &catalog) {
                Ok(path) => {
                    info!(
                        device = %device,
                        mode = %mode,
                        path = %path.display(),
                        entries = catalog.len(),
                        "Synced catalog"
                    );
                }
                Err(e) => {
                    // One unit failing must not block its siblings
                    error!(device = %device, mode = %mode, error = %e, "Failed to write catalog");
                    failures += 1;
                }
            }
        }
    }

    if failures > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
