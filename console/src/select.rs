use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use itertools::Itertools;
use log::info;
use pileup_sites::prelude::*;
use polars::prelude::DataFrame;

use crate::utils::{
    init_progress,
    validate_input,
    validate_output,
    UtilsArgs,
};
use crate::PipelineCommand;

#[derive(Args, Debug, Clone)]
pub(crate) struct SelectArgs {
    #[arg(
        short = 'i',
        long = "input-files",
        num_args = 1..,
        required = true,
        help = "Combined Arrow IPC tables, one per sample, named <sample>_genome*."
    )]
    input_files: Vec<PathBuf>,

    #[arg(
        short = 'o',
        long = "output-file",
        required = true,
        help = "Path for the selected sites (TSV without header)."
    )]
    output_file: PathBuf,

    #[arg(
        long = "stats-output",
        help = "Also write metrics of the selected sites to this TSV file."
    )]
    stats_output: Option<PathBuf>,

    #[arg(
        long = "filter-config",
        help_heading = "FILTER ARGS",
        help = "JSON file with filter thresholds. Flags below override it."
    )]
    filter_config: Option<PathBuf>,

    #[arg(
        long,
        help_heading = "FILTER ARGS",
        help = "Minimal filtered-uniq depth summed over samples [default: 20]."
    )]
    min_depth: Option<i64>,

    #[arg(
        long,
        help_heading = "FILTER ARGS",
        help = "Minimal unconverted count summed over samples [default: 3]."
    )]
    min_support: Option<i64>,

    #[arg(
        long,
        help_heading = "FILTER ARGS",
        help = "Minimal unconverted ratio [default: 0.02]."
    )]
    min_unconverted_ratio: Option<f64>,

    #[arg(
        long,
        help_heading = "FILTER ARGS",
        help = "Clipped ratio must be below this value [default: 0.5]."
    )]
    max_clipped_ratio: Option<f64>,

    #[arg(
        long,
        help_heading = "FILTER ARGS",
        help = "Multi-mapping ratio must be below this value [default: 0.2]."
    )]
    max_multi_ratio: Option<f64>,
}

impl SelectArgs {
    pub(crate) fn site_filter(&self) -> anyhow::Result<SiteFilter> {
        let mut filter = match &self.filter_config {
            Some(path) => {
                SiteFilter::from_json(path).with_context(|| {
                    format!("Failed to read filter config {}", path.display())
                })?
            },
            None => SiteFilter::default(),
        };

        if let Some(value) = self.min_depth {
            filter = filter.with_min_depth(value);
        }
        if let Some(value) = self.min_support {
            filter = filter.with_min_support(value);
        }
        if let Some(value) = self.min_unconverted_ratio {
            filter = filter.with_min_unconverted_ratio(value);
        }
        if let Some(value) = self.max_clipped_ratio {
            filter = filter.with_max_clipped_ratio(value);
        }
        if let Some(value) = self.max_multi_ratio {
            filter = filter.with_max_multi_ratio(value);
        }
        Ok(filter)
    }
}

impl PipelineCommand for SelectArgs {
    fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let inputs = self
            .input_files
            .iter()
            .map(|path| validate_input(path))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let output = validate_output(&self.output_file)?;
        let stats_output = self
            .stats_output
            .as_deref()
            .map(validate_output)
            .transpose()?;

        let filter = self.site_filter()?;
        info!("Using filter {:?}", filter);
        let selector = SiteSelector::new(filter);

        let pbar = init_progress(utils)?;
        pbar.set_message(format!(
            "Selecting sites from {} samples...",
            inputs.len()
        ));

        let mut sites: DataFrame = match stats_output {
            Some(stats_output) => {
                let mut metrics = selector.select_with_metrics(&inputs)?;
                write_site_stats(&mut metrics, &stats_output)?;
                metrics.select(colnames::KEY_NAMES)?
            },
            None => selector.select(&inputs)?,
        };

        pbar.set_message(format!("Writing {}", output.display()));
        write_sites(&mut sites, &output)?;
        pbar.finish_and_clear();

        info!(
            "Done: {} sites from samples {}",
            sites.height(),
            SiteSelector::sample_ids(&inputs)?.iter().join(", ")
        );
        Ok(())
    }
}
