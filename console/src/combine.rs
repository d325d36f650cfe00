use std::path::PathBuf;

use clap::Args;
use log::info;
use pileup_sites::prelude::*;

use crate::utils::{
    init_progress,
    validate_input,
    validate_output,
    CliIpcCompression,
    CliJoinStrategy,
    UtilsArgs,
};
use crate::PipelineCommand;

#[derive(Args, Debug, Clone)]
pub(crate) struct CombineArgs {
    #[arg(
        short = 'i',
        long = "input-files",
        num_args = 4,
        required = true,
        help = "4 input files: unfiltered_uniq, unfiltered_multi, filtered_uniq, \
                filtered_multi"
    )]
    input_files: Vec<PathBuf>,

    #[arg(
        short = 'o',
        long = "output-file",
        required = true,
        help = "Path for the combined Arrow IPC table."
    )]
    output_file: PathBuf,

    #[clap(
        short = 'T',
        long = "compression",
        value_enum,
        default_value_t = CliIpcCompression::None,
        help = "Compression of the output table."
    )]
    compression: CliIpcCompression,

    #[clap(
        long = "join-strategy",
        value_enum,
        default_value_t = CliJoinStrategy::Tree,
        help = "Join pairs of tables concurrently (tree) or fold them left to right."
    )]
    join_strategy: CliJoinStrategy,
}

impl PipelineCommand for CombineArgs {
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

        let pbar = init_progress(utils)?;
        pbar.set_message("Combining pileup tables...");

        let mut combined = PileupCombiner::new()
            .with_strategy(self.join_strategy.into())
            .combine(&inputs)?;

        pbar.set_message(format!("Writing {}", output.display()));
        write_combined(&mut combined, &output, self.compression.into())?;
        pbar.finish_and_clear();

        info!("Done: {} sites", combined.height());
        Ok(())
    }
}
