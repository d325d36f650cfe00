use std::path::{
    Path,
    PathBuf,
};
use std::time::Duration;

use anyhow::{
    bail,
    Context,
};
use clap::{
    Args,
    ValueEnum,
};
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use log::LevelFilter;
use pileup_sites::prelude::*;
use pileup_sites::utils::NUM_THREADS_ENV;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        long,
        help = "Number of threads to use. Defaults to all available cores."
    )]
    pub threads: Option<usize>,

    #[arg(
        short,
        long,
        default_value_t = false,
        help = "Print debug messages."
    )]
    pub verbose: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Display progress spinner."
    )]
    pub progress: bool,
}

impl UtilsArgs {
    pub fn setup(&self) -> anyhow::Result<()> {
        init_logger(self.verbose)?;
        if let Some(threads) = self.threads {
            if threads == 0 {
                bail!("Number of threads must be positive");
            }
            std::env::set_var(NUM_THREADS_ENV, threads.to_string());
            std::env::set_var("POLARS_MAX_THREADS", threads.to_string());
        }
        Ok(())
    }
}

pub(crate) fn init_logger(verbose: bool) -> anyhow::Result<()> {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    }
    else {
        LevelFilter::Info
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder
        .try_init()
        .context("Failed to set up logger")
}

pub(crate) fn init_progress(utils: &UtilsArgs) -> anyhow::Result<ProgressBar> {
    if !utils.progress {
        return Ok(ProgressBar::hidden());
    }
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    progress_bar.enable_steady_tick(Duration::from_millis(100));
    Ok(progress_bar)
}

pub(crate) fn validate_input(path: &Path) -> anyhow::Result<PathBuf> {
    if !path.exists() {
        bail!("Input file {} does not exist", path.display());
    }
    if !path.is_file() {
        bail!("Input path {} is not a file", path.display());
    }
    Ok(path.to_path_buf())
}

pub(crate) fn validate_output(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_dir() {
        bail!("Output path {} is a directory", path.display());
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            bail!("Output directory {} does not exist", parent.display())
        },
        _ => Ok(path.to_path_buf()),
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Eq, PartialEq)]
pub(crate) enum CliIpcCompression {
    None,
    Lz4,
    Zstd,
}

impl From<CliIpcCompression> for Option<IpcCompression> {
    fn from(value: CliIpcCompression) -> Self {
        match value {
            CliIpcCompression::None => None,
            CliIpcCompression::Lz4 => Some(IpcCompression::LZ4),
            CliIpcCompression::Zstd => Some(IpcCompression::ZSTD),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Eq, PartialEq)]
pub(crate) enum CliJoinStrategy {
    Tree,
    Sequential,
}

impl From<CliJoinStrategy> for JoinStrategy {
    fn from(value: CliJoinStrategy) -> Self {
        match value {
            CliJoinStrategy::Tree => JoinStrategy::Tree,
            CliJoinStrategy::Sequential => JoinStrategy::Sequential,
        }
    }
}
