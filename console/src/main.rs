mod combine;
mod select;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use combine::CombineArgs;
use select::SelectArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Merge the four per-class pileup tables of one sample.
    Combine {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  CombineArgs,
    },

    /// Select sites passing quality thresholds jointly over samples.
    Select {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  SelectArgs,
    },
}

pub(crate) trait PipelineCommand {
    fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()>;
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    let (utils, command): (&UtilsArgs, &dyn PipelineCommand) = match &cli.command {
        MainMenu::Combine { utils, args } => (utils, args as &dyn PipelineCommand),
        MainMenu::Select { utils, args } => (utils, args as &dyn PipelineCommand),
    };
    utils.setup()?;
    command.run(utils).map_err(|e| {
        eprintln!("{}", console::style("Run failed").red());
        e
    })
}
